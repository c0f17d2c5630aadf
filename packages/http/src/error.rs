#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid header: {message}")]
    InvalidHeader { message: String },

    #[error("{context}: {status} {status_text}")]
    Status {
        context: String,
        status: u16,
        status_text: String,
    },

    #[error("The fetched content from '{url}' is empty.")]
    EmptyBody { url: String },

    #[error("Invalid GitHub repository URL.")]
    InvalidRepositoryUrl { url: String },

    #[error("{message}")]
    MalformedTree { message: String },

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failure happened on the wire rather than in the payload.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Status { .. } | Error::EmptyBody { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_code_and_reason() {
        let e = Error::Status {
            context: "Failed to fetch URL".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(e.to_string(), "Failed to fetch URL: 404 Not Found");
        assert!(e.is_network());
    }

    #[test]
    fn repository_url_message() {
        let e = Error::InvalidRepositoryUrl {
            url: "https://example.com/x".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid GitHub repository URL.");
        assert!(!e.is_network());
    }

    #[test]
    fn empty_body_message_names_url() {
        let e = Error::EmptyBody {
            url: "https://example.com/a.txt".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "The fetched content from 'https://example.com/a.txt' is empty."
        );
    }
}
