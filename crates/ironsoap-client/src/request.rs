use std::{fmt, io::Read};

use base64::Engine;
use ironsoap_envelope::Envelope;
use serde::Serialize;
use url::Url;

use crate::{EndpointError, SoapError};

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const SOAP_ACTION_HEADER: &str = "SOAPAction";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Content type sent with every request. Strict endpoints compare it literally.
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// SOAP 1.1 over HTTP only ever uses POST.
pub const METHOD: &str = "POST";

pub enum RequestBody {
    /// A document serialized by [`SoapRequest::build`].
    Bytes(Vec<u8>),
    /// A caller supplied stream, read by the transport while sending.
    Stream(Box<dyn Read + Send>),
}

impl RequestBody {
    /// Length in bytes when known up front.
    pub fn content_length(&self) -> Option<usize> {
        match self {
            Self::Bytes(bytes) => Some(bytes.len()),
            Self::Stream(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Stream(_) => None,
        }
    }

    pub fn into_reader(self) -> Box<dyn Read + Send> {
        match self {
            Self::Bytes(bytes) => Box::new(std::io::Cursor::new(bytes)),
            Self::Stream(reader) => reader,
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// A fully assembled SOAP request, ready for a [`Transport`] but not sent yet.
///
/// [`Transport`]: crate::Transport
#[derive(Debug)]
pub struct SoapRequest {
    url: Url,
    headers: Vec<(String, String)>,
    body: RequestBody,
}

impl SoapRequest {
    /// Wraps `payload` in an envelope and prepares the POST to `endpoint`.
    ///
    /// `action` goes verbatim into the `SOAPAction` header; an empty action is sent
    /// as an empty header, not dropped. No I/O happens here.
    pub fn build<T>(payload: &T, endpoint: &str, action: &str) -> Result<Self, SoapError>
    where
        T: Serialize + ?Sized,
    {
        let document = Envelope::new(payload).to_xml_document()?;
        Self::post(endpoint, action, RequestBody::Bytes(document))
    }

    /// Prepares a POST around an already serialized document, e.g. a hand written
    /// envelope or a captured request being replayed. The reader is not touched until
    /// the request is sent.
    pub fn build_raw<R>(body: R, endpoint: &str, action: &str) -> Result<Self, SoapError>
    where
        R: Read + Send + 'static,
    {
        Self::post(endpoint, action, RequestBody::Stream(Box::new(body)))
    }

    fn post(endpoint: &str, action: &str, body: RequestBody) -> Result<Self, SoapError> {
        let url = parse_endpoint(endpoint).map_err(|reason| SoapError::TransportConstruction {
            address: endpoint.to_owned(),
            reason,
        })?;

        Ok(Self {
            url,
            headers: vec![
                (CONTENT_TYPE_HEADER.to_owned(), SOAP_CONTENT_TYPE.to_owned()),
                (SOAP_ACTION_HEADER.to_owned(), action.to_owned()),
            ],
            body,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &'static str {
        METHOD
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Sets a header, replacing every existing header of the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Adds `Authorization: Basic <base64(username:password)>`.
    /// WARNING: never log the resulting header value.
    pub fn with_basic_auth(self, username: &str, password: &str) -> Self {
        let creds = format!("{username}:{password}");
        let b64 = base64::engine::general_purpose::STANDARD.encode(creds.as_bytes());
        self.with_header(AUTHORIZATION_HEADER, format!("Basic {b64}"))
    }

    pub fn into_parts(self) -> (Url, Vec<(String, String)>, RequestBody) {
        (self.url, self.headers, self.body)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, EndpointError> {
    let url = Url::parse(endpoint)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(EndpointError::UnsupportedScheme(other.to_owned())),
    }
}
