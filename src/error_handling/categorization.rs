//! Transport error categorization.

/// Categorizes a `reqwest::Error` for logging.
///
/// The node only learns that a response is absent; this label keeps the reason
/// visible in the transport's warning log.
pub fn categorize_transport_error(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_builder() {
        "builder"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_request() {
        "request"
    } else if error.is_body() {
        "body"
    } else if error.is_decode() {
        "decode"
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_categorize_builder_error() {
        let error = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("invalid URL should fail to build");
        assert_eq!(categorize_transport_error(&error), "builder");
    }

    #[tokio::test]
    async fn test_categorize_connect_error() {
        // Port 9 (discard) on localhost is closed on test machines
        let error = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("closed port should refuse the connection");
        assert_eq!(categorize_transport_error(&error), "connect");
    }
}
