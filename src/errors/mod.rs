use std::io;
use std::path::PathBuf;

use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Errors that end a single request
#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error("invalid page path: {0}")]
    InvalidPath(String),

    #[error("could not load page {title}: {source}")]
    PageNotFound { title: String, source: io::Error },

    #[error("could not save page {title}: {source}")]
    Persistence { title: String, source: io::Error },

    #[error("could not read submitted form: {message}")]
    BadForm { status: StatusCode, message: String },

    #[error("template error: {0}")]
    TemplateError(String),
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        match self {
            WikiError::InvalidPath(_) => {
                (StatusCode::NOT_FOUND, "404 page not found").into_response()
            }
            WikiError::PageNotFound { .. } => {
                (StatusCode::NOT_FOUND, "could not find page.").into_response()
            }
            WikiError::BadForm { status, .. } => (status, self.to_string()).into_response(),
            WikiError::Persistence { .. } | WikiError::TemplateError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("something went wrong: {}", self),
            )
                .into_response(),
        }
    }
}

/// Errors that keep the server from starting
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not read template {name} from {path:?}: {source}")]
    TemplateSource { name: &'static str, path: PathBuf, source: io::Error },

    #[error("could not parse template {name}: {reason}")]
    TemplateSyntax { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not prepare data directory {path:?}: {source}")]
    DataDir { path: PathBuf, source: io::Error },

    #[error("could not install logger: {0}")]
    Logger(String),

    #[error("could not bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("server stopped: {0}")]
    Serve(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_is_not_found() {
        let response = WikiError::InvalidPath("/view/a.b".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_page_is_not_found() {
        let err = WikiError::PageNotFound {
            title: "Missing".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_persistence_failure_is_server_error() {
        let err = WikiError::Persistence {
            title: "Foo".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("could not save page Foo"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_form_keeps_rejection_status() {
        let err = WikiError::BadForm {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "could not read submitted form: length limit exceeded");
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
