use std::{fmt, marker::PhantomData};

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error as _, IgnoredAny, MapAccess, Visitor},
};

use crate::{EncodeError, Fault, SOAP_ENV_NS, XSD_NS, XSI_NS};

const SOAP_ENVELOPE: &str = "soap:Envelope";
const SOAP_BODY: &str = "soap:Body";
const SOAP_FAULT: &str = "soap:Fault";

/// Local name of the fault element inside a body, whatever its prefix.
const FAULT_LOCAL_NAME: &str = "Fault";

/// A SOAP envelope holding exactly one [`Body`].
///
/// See <https://www.w3.org/TR/2000/NOTE-SOAP-20000508/#_Toc478383494>
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub body: Body<T>,
}

/// Content of the `soap:Body` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<T> {
    Payload(T),
    Fault(Fault),
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            body: Body::Payload(payload),
        }
    }

    /// Builds a fault response. Meant for code answering requests, such as test
    /// endpoints; a client request never carries a fault.
    pub fn from_fault(fault: Fault) -> Self {
        Self {
            body: Body::Fault(fault),
        }
    }

    pub fn payload(&self) -> Option<&T> {
        self.body.payload()
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.body.fault()
    }

    pub fn is_fault(&self) -> bool {
        self.body.is_fault()
    }

    pub fn into_body(self) -> Body<T> {
        self.body
    }

    pub fn into_result(self) -> Result<T, Fault> {
        self.body.into_result()
    }
}

impl<T> Body<T> {
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Payload(payload) => Some(payload),
            Self::Fault(_) => None,
        }
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Payload(_) => None,
            Self::Fault(fault) => Some(fault),
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    pub fn into_result(self) -> Result<T, Fault> {
        match self {
            Self::Payload(payload) => Ok(payload),
            Self::Fault(fault) => Err(fault),
        }
    }
}

impl<T> Envelope<T>
where
    T: Serialize,
{
    /// Serializes the envelope as a complete XML document.
    ///
    /// The payload is written as the single child of `soap:Body` under its own serde
    /// name, so payload types pick their element name (and any namespace attributes)
    /// through `#[serde(rename = ...)]`.
    pub fn to_xml_document(&self) -> Result<Vec<u8>, EncodeError> {
        let content = match &self.body {
            Body::Payload(payload) => quick_xml::se::to_string(payload)?,
            Body::Fault(fault) => quick_xml::se::to_string_with_root(SOAP_FAULT, fault)?,
        };

        let mut writer = Writer::new(Vec::new());

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        // The envelope and body are written by hand so that the namespace
        // declarations are always present, whatever the payload looks like.
        writer.write_event(Event::Start(BytesStart::new(SOAP_ENVELOPE).with_attributes([
            ("xmlns:xsi", XSI_NS),
            ("xmlns:xsd", XSD_NS),
            ("xmlns:soap", SOAP_ENV_NS),
        ])))?;
        writer.write_event(Event::Start(BytesStart::new(SOAP_BODY)))?;

        writer.get_mut().extend_from_slice(content.as_bytes());

        writer.write_event(Event::End(BytesEnd::new(SOAP_BODY)))?;
        writer.write_event(Event::End(BytesEnd::new(SOAP_ENVELOPE)))?;

        let document = writer.into_inner();
        tracing::trace!(length = document.len(), "envelope serialized");

        Ok(document)
    }
}

impl<'de, T> Deserialize<'de> for Body<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(BodyVisitor(PhantomData))
    }
}

/// Picks the single element of a body apart, routing `Fault` to [`Fault`] and
/// anything else to the caller's payload type.
struct BodyVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for BodyVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = Body<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a SOAP body holding a single element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut body = None;

        while let Some(name) = map.next_key::<String>()? {
            // quick-xml hands attributes over as `@name` keys and loose text as
            // `$text`; neither is part of the body content.
            if name.starts_with('@') || name == "$text" {
                map.next_value::<IgnoredAny>()?;
                continue;
            }

            if body.is_some() {
                return Err(A::Error::custom(format_args!(
                    "unexpected element `{name}`, a SOAP body holds a single element"
                )));
            }

            body = Some(if name == FAULT_LOCAL_NAME {
                Body::Fault(map.next_value()?)
            } else {
                Body::Payload(map.next_value()?)
            });
        }

        body.ok_or_else(|| A::Error::custom("SOAP body is empty"))
    }
}
