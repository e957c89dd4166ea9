use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use blogapp_common::model::post::PostId;
use blogapp_db::{DbError, PostStore};
use json::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;

mod json;
mod routes;
pub mod view;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, FromRef)]
pub struct ServerState {
    pub store: Arc<dyn PostStore>,
}

impl ServerState {
    #[must_use]
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }
}

pub fn routes() -> ServerRouter {
    routes::routes()
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
}

/// The full application with request tracing, ready to be served.
pub fn app(state: ServerState) -> Router {
    routes().layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub async fn method_not_allowed(request: Request) -> ServerError {
    let (parts, _) = request.into_parts();
    ServerError::MethodNotAllowed {
        method: parts.method,
        uri: parts.uri,
    }
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Method {method} is not allowed on {uri}")]
    MethodNotAllowed { method: Method, uri: Uri },
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(PostId),
    #[error("Post id in the body ({body}) does not match the id in the path ({path}).")]
    PostIdMismatch { path: PostId, body: PostId },
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::JsonRejection(_) | ServerError::PostIdMismatch { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
        };
        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::server::ServerError;
    use axum::http::{Method, StatusCode, Uri};
    use blogapp_common::object_id::ObjectIdTimestampError;
    use blogapp_db::DbError;

    #[test]
    fn error_status_codes() {
        let id = "6592008001020304050a0b0c".parse().unwrap();
        let other_id = "6592008001020304050a0b0d".parse().unwrap();

        assert_eq!(
            ServerError::UnknownRoute(Uri::from_static("/nope")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::MethodNotAllowed {
                method: Method::PATCH,
                uri: Uri::from_static("/posts")
            }
            .status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ServerError::PostByIdNotFound(id).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::PostIdMismatch {
                path: id,
                body: other_id
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::Database(DbError::IdGeneration(
                ObjectIdTimestampError::TimestampTooLarge
            ))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
