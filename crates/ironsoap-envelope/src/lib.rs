//! SOAP 1.1 envelope framing.
//!
//! This crate owns the data shapes exchanged with a SOAP endpoint ([`Envelope`],
//! [`Body`], [`Fault`]) and the serialization capability the client calls into:
//! [`Envelope::to_xml_document`] on the way out and [`codec::from_reader`] on the
//! way back. It performs no I/O of its own.

pub mod codec;
pub mod envelope;
pub mod fault;

pub use codec::{from_reader, from_slice, from_str};
pub use envelope::{Body, Envelope};
pub use fault::{Fault, FaultDetail};

/// Namespace of the SOAP 1.1 `Envelope` and `Body` elements.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace bound to the `xsi` prefix on every outgoing envelope.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace bound to the `xsd` prefix on every outgoing envelope.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] quick_xml::SeError),

    #[error("Failed to write envelope: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid XML document at '{path}': {source}")]
pub struct DecodeError {
    /// Location inside the destination shape where decoding stopped, `.` for the root.
    pub path: String,
    #[source]
    pub source: quick_xml::DeError,
}

impl From<serde_path_to_error::Error<quick_xml::DeError>> for DecodeError {
    fn from(err: serde_path_to_error::Error<quick_xml::DeError>) -> Self {
        let path = err.path().to_string();
        Self {
            path,
            source: err.into_inner(),
        }
    }
}
