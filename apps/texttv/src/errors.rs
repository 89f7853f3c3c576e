use thiserror::Error;

use crate::page_client::FetchError;

/// Application-level error type.
/// Anything that reaches `main` through this type ends the session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not load start page {page}: {source}")]
    StartupFetch {
        page: u32,
        #[source]
        source: FetchError,
    },

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::StartupFetch { .. } => 2,
            AppError::Terminal(_) => 3,
            AppError::Internal(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_fetch_message_names_page() {
        let err = AppError::StartupFetch {
            page: 100,
            source: FetchError::Status("error".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("100"), "message should name the page: {msg}");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_io_error_converts_to_terminal() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Terminal(_)));
    }
}
