//! In-memory stand-in for the Instagram v1 relationships endpoints.
//!
//! # Design
//! One seeded `Graph` per router, shared behind a `RwLock`, so every test
//! gets its own state. Responses use the API's `{meta, data, pagination}`
//! envelope and errors come back as status 400 with a `meta` block, which is
//! what the client crate has to decode. `next_url` locators are absolute and
//! built from the public URL the router was created with.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// Users per page on the paginated listing endpoints.
pub const PAGE_SIZE: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub profile_picture: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub outgoing_status: String,
    pub incoming_status: String,
    pub target_user_is_private: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub next_url: String,
    pub next_cursor: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    fn ok(data: T, pagination: Option<Pagination>) -> Self {
        Self {
            meta: Meta {
                code: 200,
                error_type: None,
                error_message: None,
            },
            data,
            pagination,
        }
    }
}

/// An error rendered the way the API renders them: status 400 and a bare
/// `meta` envelope.
#[derive(Debug)]
pub struct Failure {
    error_type: &'static str,
    message: String,
}

impl Failure {
    fn new(error_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let meta = Meta {
            code: StatusCode::BAD_REQUEST.as_u16(),
            error_type: Some(self.error_type.to_string()),
            error_message: Some(self.message),
        };
        (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "meta": meta }))).into_response()
    }
}

/// Social graph of the authenticated user (`self`).
#[derive(Debug, Default)]
pub struct Graph {
    users: BTreeMap<String, (User, bool)>,
    follows: BTreeSet<String>,
    outgoing_requests: BTreeSet<String>,
    followed_by: BTreeSet<String>,
    requested_by: BTreeSet<String>,
    blocked: BTreeSet<String>,
}

impl Graph {
    /// Six fixture accounts: self follows 10, 11 and 13, is followed by 10, 11
    /// and 15, and has a pending request from the private account 14.
    pub fn seeded() -> Self {
        let mut graph = Graph::default();
        for (id, username, private) in [
            ("10", "alice", false),
            ("11", "bob", false),
            ("12", "carol", true),
            ("13", "dave", false),
            ("14", "erin", true),
            ("15", "frank", false),
        ] {
            let user = User {
                id: id.to_string(),
                username: username.to_string(),
                full_name: format!("{}{}", username[..1].to_uppercase(), &username[1..]),
                profile_picture: format!("https://images.example/{username}.jpg"),
            };
            graph.users.insert(id.to_string(), (user, private));
        }
        graph.follows.extend(["10", "11", "13"].map(String::from));
        graph.followed_by.extend(["10", "11", "15"].map(String::from));
        graph.requested_by.insert("14".to_string());
        graph
    }

    fn users_in(&self, ids: &BTreeSet<String>) -> Vec<User> {
        ids.iter()
            .filter_map(|id| self.users.get(id).map(|(user, _)| user.clone()))
            .collect()
    }

    fn relationship(&self, id: &str) -> Result<Relationship, Failure> {
        let (_, private) = self
            .users
            .get(id)
            .ok_or_else(|| Failure::new("APINotFoundError", "this user does not exist"))?;

        let outgoing = if self.follows.contains(id) {
            "follows"
        } else if self.outgoing_requests.contains(id) {
            "requested"
        } else {
            "none"
        };
        let incoming = if self.blocked.contains(id) {
            "blocked_by_you"
        } else if self.followed_by.contains(id) {
            "followed_by"
        } else if self.requested_by.contains(id) {
            "requested_by"
        } else {
            "none"
        };

        Ok(Relationship {
            outgoing_status: outgoing.to_string(),
            incoming_status: incoming.to_string(),
            target_user_is_private: *private,
        })
    }

    fn apply(&mut self, id: &str, action: &str) -> Result<Relationship, Failure> {
        let private = self
            .users
            .get(id)
            .map(|(_, private)| *private)
            .ok_or_else(|| Failure::new("APINotFoundError", "this user does not exist"))?;
        let id = id.to_string();

        match action {
            "follow" if private && !self.follows.contains(&id) => {
                self.outgoing_requests.insert(id.clone());
            }
            "follow" => {
                self.follows.insert(id.clone());
            }
            "unfollow" => {
                self.follows.remove(&id);
                self.outgoing_requests.remove(&id);
            }
            "block" => {
                self.follows.remove(&id);
                self.outgoing_requests.remove(&id);
                self.followed_by.remove(&id);
                self.requested_by.remove(&id);
                self.blocked.insert(id.clone());
            }
            "unblock" => {
                self.blocked.remove(&id);
            }
            "approve" => {
                if self.requested_by.remove(&id) {
                    self.followed_by.insert(id.clone());
                }
            }
            "deny" => {
                self.requested_by.remove(&id);
            }
            other => {
                return Err(Failure::new(
                    "APIInvalidParametersError",
                    format!("invalid action: {other}"),
                ));
            }
        }

        self.relationship(&id)
    }
}

#[derive(Clone)]
struct AppState {
    graph: Arc<RwLock<Graph>>,
    public_url: Arc<str>,
}

#[derive(Deserialize)]
struct ListParams {
    access_token: Option<String>,
    cursor: Option<usize>,
}

#[derive(Deserialize)]
struct AuthParams {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct ActionForm {
    action: String,
}

/// Router over a freshly seeded graph. `public_url` (scheme and authority,
/// no trailing slash) prefixes the `next_url` locators handed to clients.
pub fn app(public_url: &str) -> Router {
    let state = AppState {
        graph: Arc::new(RwLock::new(Graph::seeded())),
        public_url: Arc::from(public_url.trim_end_matches('/')),
    };
    Router::new()
        .route("/v1/users/self/follows", get(list_follows))
        .route("/v1/users/self/followed-by", get(list_followed_by))
        .route("/v1/users/self/requested-by", get(list_requested_by))
        .route(
            "/v1/users/{id}/relationship",
            get(get_relationship).post(post_relationship),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    info!(%addr, "mock relationships API listening");
    axum::serve(listener, app(&format!("http://{addr}"))).await
}

fn authorize(access_token: Option<&str>) -> Result<&str, Failure> {
    access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
        Failure::new(
            "OAuthParameterException",
            "Missing client_id or access_token URL parameter.",
        )
    })
}

fn page(
    state: &AppState,
    users: Vec<User>,
    path: &str,
    token: &str,
    cursor: Option<usize>,
) -> Envelope<Vec<User>> {
    let start = cursor.unwrap_or(0).min(users.len());
    let end = (start + PAGE_SIZE).min(users.len());
    let pagination = (end < users.len()).then(|| {
        let next = end.to_string();
        let query =
            serde_urlencoded::to_string([("access_token", token), ("cursor", next.as_str())])
                .unwrap_or_default();
        Pagination {
            next_url: format!("{}/v1/{path}?{query}", state.public_url),
            next_cursor: next,
        }
    });
    Envelope::ok(users[start..end].to_vec(), pagination)
}

async fn list_follows(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Envelope<Vec<User>>>, Failure> {
    let token = authorize(params.access_token.as_deref())?;
    let graph = state.graph.read().await;
    let users = graph.users_in(&graph.follows);
    Ok(Json(page(&state, users, "users/self/follows", token, params.cursor)))
}

async fn list_followed_by(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Envelope<Vec<User>>>, Failure> {
    let token = authorize(params.access_token.as_deref())?;
    let graph = state.graph.read().await;
    let users = graph.users_in(&graph.followed_by);
    Ok(Json(page(&state, users, "users/self/followed-by", token, params.cursor)))
}

async fn list_requested_by(
    State(state): State<AppState>,
    Query(params): Query<AuthParams>,
) -> Result<Json<Envelope<Vec<User>>>, Failure> {
    authorize(params.access_token.as_deref())?;
    let graph = state.graph.read().await;
    Ok(Json(Envelope::ok(graph.users_in(&graph.requested_by), None)))
}

async fn get_relationship(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AuthParams>,
) -> Result<Json<Envelope<Relationship>>, Failure> {
    authorize(params.access_token.as_deref())?;
    let relationship = state.graph.read().await.relationship(&id)?;
    Ok(Json(Envelope::ok(relationship, None)))
}

async fn post_relationship(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AuthParams>,
    Form(form): Form<ActionForm>,
) -> Result<Json<Envelope<Relationship>>, Failure> {
    authorize(params.access_token.as_deref())?;
    let relationship = state.graph.write().await.apply(&id, &form.action)?;
    info!(user = %id, action = %form.action, "relationship changed");
    Ok(Json(Envelope::ok(relationship, None)))
}
