use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloraError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("HTTP error {status} from {url}")]
    Http { status: u16, url: String },

    #[error("{0}")]
    Backend(String),

    #[error("{0}")]
    Validation(String),

    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },

    #[error("Invalid structure file: {0}")]
    InvalidStructure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("FloraError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for FloraError {
    fn from(error: std::io::Error) -> Self {
        FloraError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for FloraError {
    fn from(error: reqwest::Error) -> Self {
        FloraError::Reqwest(Box::new(error))
    }
}

impl FloraError {
    /// Message shown to the user in banners and modals.
    pub fn user_message(&self) -> String {
        match self {
            FloraError::Backend(message) | FloraError::Validation(message) => message.clone(),
            FloraError::Reqwest(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            FloraError::Reqwest(e) if e.is_connect() => "Could not reach the server".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_messages_are_verbatim() {
        let err = FloraError::Backend("Stage parameter is required".to_string());
        assert_eq!(err.user_message(), "Stage parameter is required");
        assert_eq!(err.to_string(), "Stage parameter is required");
    }

    #[test]
    fn page_out_of_range_mentions_bounds() {
        let err = FloraError::PageOutOfRange { page: 7, total_pages: 3 };
        assert_eq!(err.user_message(), "Page 7 is out of range (1..=3)");
    }
}
