//! Minimal blocking SOAP-over-HTTP client.
//!
//! [`SoapRequest`] frames a payload into a SOAP envelope and prepares the HTTP POST,
//! [`SoapClient`] sends it through a [`Transport`] and decodes the answer into
//! whatever shape the caller asks for. One call is one network attempt: retries,
//! middleware and authentication schemes belong to the transport or to the caller
//! of [`SoapClient::custom`].

pub mod client;
pub mod config;
pub mod http;
pub mod request;
pub mod transport;

pub use client::{SoapClient, SoapClientBuilder};
pub use config::TransportConfig;
pub use http::UreqTransport;
pub use ironsoap_envelope::{Body, DecodeError, EncodeError, Envelope, Fault, FaultDetail};
pub use request::{RequestBody, SoapRequest};
pub use transport::{BoxError, ResponseBody, Transport, TransportResponse};

#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    #[error("SOAP client has no HTTP transport configured")]
    ClientNotConfigured,

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Invalid endpoint address '{address}': {reason}")]
    TransportConstruction {
        address: String,
        #[source]
        reason: EndpointError,
    },

    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("{0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
}
