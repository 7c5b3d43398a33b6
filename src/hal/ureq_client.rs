//! HTTPS transport backed by `ureq`.
//!
//! TLS uses rustls with the bundled web PKI roots; certificate verification
//! is always on and there is no setting to turn it off. Deadlines come from
//! [`CcamsConfig`]: connect, send (request + body) and receive (response +
//! body) are bounded separately.

use std::time::Duration;

use ureq::Agent;

use crate::config::CcamsConfig;
use crate::traits::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// Blocking HTTP client for the remote allocator.
#[derive(Clone)]
pub struct UreqClient {
    agent: Agent,
}

impl std::fmt::Debug for UreqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqClient").finish_non_exhaustive()
    }
}

impl UreqClient {
    /// Build a client with the timeouts and scheme policy from `config`.
    pub fn new(config: &CcamsConfig) -> Self {
        Self::with_timeouts(
            config.connect_timeout(),
            config.read_timeout(),
            config.write_timeout(),
            config.https_only,
        )
    }

    /// Build a client with explicit timeouts.
    pub fn with_timeouts(
        connect: Duration,
        read: Duration,
        write: Duration,
        https_only: bool,
    ) -> Self {
        let agent = Agent::config_builder()
            .timeout_connect(Some(connect))
            .timeout_send_request(Some(write))
            .timeout_send_body(Some(write))
            .timeout_recv_response(Some(read))
            .timeout_recv_body(Some(read))
            .https_only(https_only)
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl HttpClient for UreqClient {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.get(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.call().map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(map_error)?;

        Ok(HttpResponse { status, body })
    }
}

fn map_error(e: ureq::Error) -> TransportError {
    match e {
        ureq::Error::Timeout(which) => TransportError::Timeout(format!("{which:?}")),
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            TransportError::Timeout(io.to_string())
        }
        other => TransportError::Connection(other.to_string()),
    }
}
