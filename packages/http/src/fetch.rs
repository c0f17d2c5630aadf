//! Fetching a URL as text.

use crate::error::Error;
use crate::executor::HttpExecutor;
use crate::types::HttpRequest;

/// GET `url` and return its body.
///
/// Fails on a non-2xx status or when the body is empty, since there is
/// nothing worth saving in either case.
pub async fn fetch_text(executor: &dyn HttpExecutor, url: &str) -> Result<String, Error> {
    let response = executor.execute(&HttpRequest::get(url)).await?;
    if !response.is_success() {
        return Err(Error::Status {
            context: "Failed to fetch URL".to_string(),
            status: response.status,
            status_text: response.status_text,
        });
    }
    if response.body.trim().is_empty() {
        return Err(Error::EmptyBody {
            url: url.to_string(),
        });
    }
    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::{self, MockExecutor};

    const URL: &str = "https://example.com/readme.md";

    #[tokio::test]
    async fn returns_body_on_success() {
        let mock = MockExecutor::new().with_body(URL, "# Readme");
        assert_eq!(fetch_text(&mock, URL).await.unwrap(), "# Readme");
    }

    #[tokio::test]
    async fn non_success_status_reports_code_and_reason() {
        let mock = MockExecutor::new().with_response(URL, mock::status(500, "Internal Server Error"));
        let err = fetch_text(&mock, URL).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch URL: 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn empty_body_is_an_error() {
        let mock = MockExecutor::new().with_body(URL, "");
        assert!(matches!(
            fetch_text(&mock, URL).await,
            Err(Error::EmptyBody { .. })
        ));
    }
}
