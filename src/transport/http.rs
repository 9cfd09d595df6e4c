//! `reqwest`-backed transport.

use std::sync::Arc;

use futures::FutureExt;

use super::{HttpResponse, ResponseFuture, Transport};
use crate::error_handling::{categorize_transport_error, TransportError};

/// Transport issuing requests through a shared `reqwest::Client`.
///
/// The client carries timeouts and the User-Agent (see
/// [`init_client`](crate::initialization::init_client)); this type adds nothing
/// on top of a plain GET.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
}

impl HttpTransport {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<ResponseFuture, TransportError> {
        let request = self
            .client
            .get(url)
            .build()
            .map_err(|source| TransportError::Build {
                url: url.to_string(),
                source,
            })?;
        let client = Arc::clone(&self.client);
        let url = url.to_string();

        Ok(async move {
            let response = match client.execute(request).await {
                Ok(response) => response,
                Err(e) => {
                    log::warn!(
                        "Request to {} failed ({}): {}",
                        url,
                        categorize_transport_error(&e),
                        e
                    );
                    return None;
                }
            };

            let status = response.status().as_u16();
            match response.bytes().await {
                Ok(body) => Some(HttpResponse::new(status, body.to_vec())),
                Err(e) => {
                    log::warn!(
                        "Failed to read response body from {} ({}): {}",
                        url,
                        categorize_transport_error(&e),
                        e
                    );
                    None
                }
            }
        }
        .boxed())
    }
}
