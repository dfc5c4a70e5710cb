//! Synchronous client for the relationships endpoints of the Instagram v1 API.
//!
//! # Overview
//! Follow, unfollow, block, unblock, approve and deny another account, look
//! up the current relationship, and page through follows, followed-by and
//! requested-by lists.
//!
//! # Design
//! - `Client` resolves relative endpoint paths, appends credentials and
//!   decodes the `{meta, data, pagination}` envelope. It holds no mutable
//!   state; pagination is returned, never remembered.
//! - `Relationships` is the facade: one request and one decode per call.
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`);
//!   only a `Transport` performs I/O. `UreqTransport` (feature `ureq`, on by
//!   default) is the blocking implementation.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use relationships_core::{Client, ClientConfig};
//!
//! let client = Client::with_ureq(ClientConfig::authenticated("ACCESS_TOKEN"));
//! let (users, cursor) = client.relationships().follows(None)?;
//! if cursor.has_next() {
//!     let (more, _) = client.relationships().follows(Some(&cursor))?;
//!     println!("{} + {} users", users.len(), more.len());
//! }
//! # Ok::<(), relationships_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod relationships;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::{ApiResponse, Client};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use relationships::Relationships;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Action, IncomingStatus, Meta, OutgoingStatus, Pagination, Relationship, User, UserCounts};
