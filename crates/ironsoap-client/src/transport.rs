use std::{io::Read, sync::Arc};

use crate::SoapRequest;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a transport hands back: status and headers for the caller's curiosity, and
/// the body stream. Dropping `body` closes the stream.
#[derive(Debug)]
pub struct TransportResponse<B> {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: B,
}

/// The HTTP capable half of a SOAP call.
///
/// An implementation sends exactly one POST per [`Transport::send`] and must not
/// treat non-2xx statuses as failures: faults travel with status 500 and are the
/// caller's to decode. Only failures to get any response at all (refused
/// connection, DNS, TLS, timeout) are errors.
///
/// Whether a transport may be shared between threads is up to the transport.
pub trait Transport {
    type Body: Read;

    fn send(&self, request: SoapRequest) -> Result<TransportResponse<Self::Body>, BoxError>;
}

impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    type Body = T::Body;

    fn send(&self, request: SoapRequest) -> Result<TransportResponse<Self::Body>, BoxError> {
        (**self).send(request)
    }
}

impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    type Body = T::Body;

    fn send(&self, request: SoapRequest) -> Result<TransportResponse<Self::Body>, BoxError> {
        (**self).send(request)
    }
}

impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    type Body = T::Body;

    fn send(&self, request: SoapRequest) -> Result<TransportResponse<Self::Body>, BoxError> {
        (**self).send(request)
    }
}

/// Scoped ownership of a response body stream.
///
/// The stream is released when the guard goes out of scope, which happens exactly
/// once whether decoding succeeds, fails, or unwinds.
#[derive(Debug)]
pub struct ResponseBody<B> {
    inner: B,
    read: u64,
}

impl<B> ResponseBody<B>
where
    B: Read,
{
    pub fn new(inner: B) -> Self {
        Self { inner, read: 0 }
    }

    /// Bytes consumed from the stream so far.
    pub fn bytes_read(&self) -> u64 {
        self.read
    }
}

impl<B> Read for ResponseBody<B>
where
    B: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n as u64;
        Ok(n)
    }
}

impl<B> Drop for ResponseBody<B> {
    fn drop(&mut self) {
        tracing::debug!(bytes_read = self.read, "response body released");
    }
}
