//! Peer Wire Protocol
//!
//! Peers ask each other for values with a plain GET:
//!
//! ```text
//! GET <base_path><url-encoded group>/<url-encoded key>
//! ```
//!
//! | Status | Body                        | When                                    |
//! |--------|-----------------------------|-----------------------------------------|
//! | 200    | raw value bytes             | the group produced a value              |
//! | 400    | `bad request`               | path is not exactly `<group>/<key>`     |
//! | 404    | `no such group: <name>`     | group is not registered on this node    |
//! | 500    | error message               | the group's `get` failed                |

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

/// Prefix every peer request path starts with.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";
/// Virtual nodes per peer on the hash ring.
pub const DEFAULT_REPLICAS: usize = 50;

pub const CONTENT_TYPE_VALUE: &str = "application/octet-stream";
pub const BAD_REQUEST_BODY: &str = "bad request";

/// Framework-neutral outcome of serving one peer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl PeerReply {
    pub fn value(body: Bytes) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Bytes::from(message.into()),
        }
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BAD_REQUEST, BAD_REQUEST_BODY)
    }

    pub fn no_such_group(name: &str) -> Self {
        Self::error(StatusCode::NOT_FOUND, format!("no such group: {}", name))
    }
}

impl IntoResponse for PeerReply {
    fn into_response(self) -> Response {
        let content_type = if self.status == StatusCode::OK {
            CONTENT_TYPE_VALUE
        } else {
            "text/plain; charset=utf-8"
        };
        (self.status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}
