//! Relationships endpoints of the Instagram v1 API.
//!
//! Each operation maps to exactly one request and one typed decode. The
//! `build_*` methods produce the request without sending it, for callers that
//! execute I/O themselves and decode with `Client::parse_response`.
//!
//! API docs: <http://instagram.com/developer/endpoints/relationships/>

use serde::Serialize;

use crate::client::Client;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::types::{Action, Pagination, Relationship, User};

const FOLLOWS_PATH: &str = "users/self/follows";
const FOLLOWED_BY_PATH: &str = "users/self/followed-by";
const REQUESTED_BY_PATH: &str = "users/self/requested-by";

#[derive(Serialize)]
struct ActionForm {
    action: &'static str,
}

/// Relationship operations for the authenticated user.
#[derive(Debug)]
pub struct Relationships<'a, T> {
    client: &'a Client<T>,
}

impl<T> Clone for Relationships<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Relationships<'_, T> {}

impl<'a, T: Transport> Relationships<'a, T> {
    pub fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Users the authenticated user follows.
    ///
    /// Pass the cursor returned by a previous call to fetch the next page.
    /// The returned cursor is empty once the last page has been read.
    pub fn follows(&self, cursor: Option<&Pagination>) -> Result<(Vec<User>, Pagination), ApiError> {
        self.list(self.build_follows(cursor)?)
    }

    /// Users following the authenticated user. Same paging as `follows`.
    pub fn followed_by(
        &self,
        cursor: Option<&Pagination>,
    ) -> Result<(Vec<User>, Pagination), ApiError> {
        self.list(self.build_followed_by(cursor)?)
    }

    /// Users who have requested permission to follow the authenticated user.
    ///
    /// The endpoint takes no cursor; whatever pagination it returns is passed
    /// through.
    pub fn requested_by(&self) -> Result<(Vec<User>, Pagination), ApiError> {
        self.list(self.build_requested_by()?)
    }

    /// Walk every page of `follows`.
    pub fn all_follows(&self) -> Result<Vec<User>, ApiError> {
        self.collect_pages(|cursor| self.follows(cursor))
    }

    /// Walk every page of `followed_by`.
    pub fn all_followed_by(&self) -> Result<Vec<User>, ApiError> {
        self.collect_pages(|cursor| self.followed_by(cursor))
    }

    pub fn relationship(&self, user_id: &str) -> Result<Relationship, ApiError> {
        self.relationship_action(user_id, None)
    }

    pub fn follow(&self, user_id: &str) -> Result<Relationship, ApiError> {
        self.relationship_action(user_id, Some(Action::Follow))
    }

    pub fn unfollow(&self, user_id: &str) -> Result<Relationship, ApiError> {
        self.relationship_action(user_id, Some(Action::Unfollow))
    }

    pub fn block(&self, user_id: &str) -> Result<Relationship, ApiError> {
        self.relationship_action(user_id, Some(Action::Block))
    }

    pub fn unblock(&self, user_id: &str) -> Result<Relationship, ApiError> {
        self.relationship_action(user_id, Some(Action::Unblock))
    }

    /// Approve a pending follow request from `user_id`.
    pub fn approve(&self, user_id: &str) -> Result<Relationship, ApiError> {
        self.relationship_action(user_id, Some(Action::Approve))
    }

    /// Deny a pending follow request from `user_id`.
    pub fn deny(&self, user_id: &str) -> Result<Relationship, ApiError> {
        self.relationship_action(user_id, Some(Action::Deny))
    }

    /// GET the relationship when `action` is `None`, otherwise POST the action.
    pub fn relationship_action(
        &self,
        user_id: &str,
        action: Option<Action>,
    ) -> Result<Relationship, ApiError> {
        let request = self.build_relationship_action(user_id, action)?;
        Ok(self.client.send::<Relationship>(request)?.data)
    }

    pub fn build_follows(&self, cursor: Option<&Pagination>) -> Result<HttpRequest, ApiError> {
        self.build_list(FOLLOWS_PATH, cursor)
    }

    pub fn build_followed_by(&self, cursor: Option<&Pagination>) -> Result<HttpRequest, ApiError> {
        self.build_list(FOLLOWED_BY_PATH, cursor)
    }

    pub fn build_requested_by(&self) -> Result<HttpRequest, ApiError> {
        self.client.new_request(HttpMethod::Get, REQUESTED_BY_PATH, None)
    }

    pub fn build_relationship_action(
        &self,
        user_id: &str,
        action: Option<Action>,
    ) -> Result<HttpRequest, ApiError> {
        validate_user_id(user_id)?;
        let path = format!("users/{user_id}/relationship");
        match action {
            None => self.client.new_request(HttpMethod::Get, &path, None),
            Some(action) => {
                let body = serde_urlencoded::to_string(ActionForm {
                    action: action.as_str(),
                })
                .map_err(|e| ApiError::SerializationError(e.to_string()))?;
                self.client.new_request(HttpMethod::Post, &path, Some(body))
            }
        }
    }

    fn build_list(&self, default_path: &str, cursor: Option<&Pagination>) -> Result<HttpRequest, ApiError> {
        let path = match cursor.and_then(|c| c.next_url.as_deref()) {
            Some(next_url) if !next_url.is_empty() => self.client.relative_path(next_url),
            _ => default_path,
        };
        self.client.new_request(HttpMethod::Get, path, None)
    }

    fn list(&self, request: HttpRequest) -> Result<(Vec<User>, Pagination), ApiError> {
        let response = self.client.send::<Vec<User>>(request)?;
        Ok((response.data, response.pagination.unwrap_or_default()))
    }

    fn collect_pages<F>(&self, mut fetch: F) -> Result<Vec<User>, ApiError>
    where
        F: FnMut(Option<&Pagination>) -> Result<(Vec<User>, Pagination), ApiError>,
    {
        let (mut users, mut cursor) = fetch(None)?;
        while cursor.has_next() {
            let (page, next) = fetch(Some(&cursor))?;
            users.extend(page);
            cursor = next;
        }
        Ok(users)
    }
}

fn validate_user_id(user_id: &str) -> Result<(), ApiError> {
    // Ids are a single path segment: no separators, dot segments or escapes.
    let valid = !user_id.is_empty()
        && user_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if !valid {
        return Err(ApiError::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}
