use std::io::Read;

use tracing::{debug, instrument};

use crate::{
    BoxError, SoapRequest, TransportConfig,
    request::RequestBody,
    transport::{Transport, TransportResponse},
};

/// Blocking transport backed by a pooled [`ureq::Agent`].
///
/// The agent is cheap to clone and safe to share, so one `UreqTransport` can serve
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.read_timeout)
            .timeout_write(config.write_timeout)
            .user_agent(&config.user_agent);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
        }
    }

    /// Uses an agent configured elsewhere, e.g. with a custom TLS connector or proxy.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    type Body = Box<dyn Read + Send + Sync + 'static>;

    #[instrument(name = "ureq_transport.send", level = "debug", skip_all, fields(url = %request.url()))]
    fn send(&self, request: SoapRequest) -> Result<TransportResponse<Self::Body>, BoxError> {
        let method = request.method();
        let (url, headers, body) = request.into_parts();

        let mut call = self.agent.request_url(method, &url);
        for (name, value) in &headers {
            call = call.set(name, value);
        }

        debug!(
            headers_count = headers.len(),
            content_length = ?body.content_length(),
            "sending request"
        );

        let result = match body {
            RequestBody::Bytes(bytes) => call.send_bytes(&bytes),
            RequestBody::Stream(reader) => call.send(reader),
        };

        let response = match result {
            Ok(response) => response,
            // A status is still a response; SOAP faults come back as 500.
            Err(ureq::Error::Status(status, response)) => {
                debug!(status, "received status response");
                response
            }
            Err(e) => return Err(e.into()),
        };

        let status_code = response.status();
        let headers = response
            .headers_names()
            .iter()
            .filter_map(|name| {
                response
                    .header(name)
                    .map(|value| (name.clone(), value.to_owned()))
            })
            .collect();

        debug!(status_code, "response received");

        Ok(TransportResponse {
            status_code,
            headers,
            body: response.into_reader(),
        })
    }
}
