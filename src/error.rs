use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("Review text is empty")]
    EmptyReview,

    #[error("Review is too long: {len} characters, at most {max} allowed")]
    ReviewTooLong { len: usize, max: usize },

    #[error("Module '{0}' not found")]
    UnknownModule(String),

    #[error("Section '{0}' not found")]
    UnknownSection(String),

    #[error("Lab '{0}' not found")]
    UnknownLab(String),

    #[error("Round {round} does not exist, lab has {rounds} rounds")]
    RoundOutOfRange { round: usize, rounds: usize },

    #[error("Section '{0}' has no quiz")]
    NoQuiz(String),

    #[error("Answer {answer} is out of range, quiz has {options} options")]
    InvalidAnswer { answer: usize, options: usize },

    #[error("Lab session cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: String },

    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Workflow step {index} does not exist")]
    UnknownStep { index: usize },

    #[error("Chat completion is not configured")]
    ChatUnavailable,

    #[error("Chat completion failed: {0}")]
    Upstream(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRating(_)
            | AppError::EmptyReview
            | AppError::ReviewTooLong { .. }
            | AppError::RoundOutOfRange { .. }
            | AppError::NoQuiz(_)
            | AppError::InvalidAnswer { .. }
            | AppError::InvalidTransition { .. }
            | AppError::EmptyPrompt
            | AppError::UnknownStep { .. } => StatusCode::BAD_REQUEST,
            AppError::UnknownModule(_) | AppError::UnknownSection(_) | AppError::UnknownLab(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::ChatUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream(_) | AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::Io(_) | AppError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(AppError::InvalidRating(9).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::EmptyReview.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::UnknownSection("x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_chat_errors() {
        assert_eq!(
            AppError::ChatUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Upstream("HTTP 500".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_display() {
        let err = AppError::ReviewTooLong { len: 6000, max: 5000 };
        assert!(err.to_string().contains("6000"));
        assert!(err.to_string().contains("5000"));
    }
}
