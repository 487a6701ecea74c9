//! HTTP transport seam used by the fetcher.
//!
//! [`UreqTransport`] is the production implementation. Tests substitute an
//! in-memory [`Transport`].

use std::io::Read;
use std::time::Duration;

use crate::error::TransportError;

/// Request timeout for the authoring service.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Blocking GET returning the response body.
///
/// Implementations report non-2xx responses as [`TransportError::Status`].
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, TransportError> {
        (**self).get(url, query)
    }
}

/// `ureq`-backed transport with a fixed timeout.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, TransportError> {
        let mut request = self
            .agent
            .get(url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");
        for (name, value) in query {
            request = request.query(name, value);
        }

        match request.call() {
            Ok(response) => read_body(response).map_err(|e| TransportError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                tracing::warn!("request endpoint {url} answered {status}: {body}");
                Err(TransportError::Status {
                    url: url.to_string(),
                    status,
                    body,
                })
            }
            Err(ureq::Error::Transport(err)) => Err(TransportError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Whole response body. `Response::into_string` stops at 10 MB, which a
/// standard set can exceed.
fn read_body(response: ureq::Response) -> std::io::Result<String> {
    read_all(response.into_reader())
}

fn read_all(mut reader: impl Read) -> std::io::Result<String> {
    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    Ok(body)
}
