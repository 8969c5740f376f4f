use std::io::BufReader;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    SoapError, SoapRequest, TransportConfig, UreqTransport,
    transport::{ResponseBody, Transport},
};

/// SOAP call executor.
///
/// Holds nothing but the injected transport, so a client can be shared between
/// threads whenever its transport can.
#[derive(Debug, Clone)]
pub struct SoapClient<T> {
    transport: T,
}

impl<T> SoapClient<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn builder() -> SoapClientBuilder<T> {
        SoapClientBuilder::default()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Makes a SOAP call: frames `payload`, posts it to `endpoint` with the given
    /// `SOAPAction`, and decodes the response body into `R`.
    ///
    /// A fault returned by the endpoint is not an error here. It decodes like any
    /// other body, so pick a fault-aware `R` such as [`Envelope`] to see it.
    ///
    /// [`Envelope`]: crate::Envelope
    #[instrument(name = "soap_client.soap", level = "debug", skip(self, payload))]
    pub fn soap<P, R>(&self, payload: &P, endpoint: &str, action: &str) -> Result<R, SoapError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = SoapRequest::build(payload, endpoint, action)?;
        self.execute(request)
    }

    /// Sends a request prepared by the caller, who may have added credentials or
    /// other headers, and decodes the response body into `R`.
    #[instrument(name = "soap_client.custom", level = "debug", skip_all, fields(url = %request.url()))]
    pub fn custom<R>(&self, request: SoapRequest) -> Result<R, SoapError>
    where
        R: DeserializeOwned,
    {
        self.execute(request)
    }

    fn execute<R>(&self, request: SoapRequest) -> Result<R, SoapError>
    where
        R: DeserializeOwned,
    {
        debug!(action = ?request.header(crate::request::SOAP_ACTION_HEADER), "sending SOAP request");

        let response = self
            .transport
            .send(request)
            .map_err(SoapError::Transport)?;

        debug!(status_code = response.status_code, "decoding response body");

        // The guard moves into the decoder and is dropped with it, on every path out.
        let body = ResponseBody::new(response.body);
        let destination = ironsoap_envelope::from_reader(BufReader::new(body))?;

        Ok(destination)
    }
}

impl SoapClient<UreqTransport> {
    pub fn with_config(config: &TransportConfig) -> Self {
        Self::new(UreqTransport::new(config))
    }
}

impl Default for SoapClient<UreqTransport> {
    fn default() -> Self {
        Self::new(UreqTransport::default())
    }
}

#[derive(Debug)]
pub struct SoapClientBuilder<T> {
    transport: Option<T>,
}

impl<T> Default for SoapClientBuilder<T> {
    fn default() -> Self {
        Self { transport: None }
    }
}

impl<T> SoapClientBuilder<T>
where
    T: Transport,
{
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn maybe_transport(mut self, transport: Option<T>) -> Self {
        self.transport = transport;
        self
    }

    pub fn build(self) -> Result<SoapClient<T>, SoapError> {
        self.transport
            .map(SoapClient::new)
            .ok_or(SoapError::ClientNotConfigured)
    }
}
