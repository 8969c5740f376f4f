use std::{collections::BTreeMap, fmt};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{IgnoredAny, MapAccess, Visitor},
};

/// A SOAP 1.1 fault, returned by an endpoint in place of a regular body payload.
///
/// Only ever produced by decoding a response; requests never carry one.
///
/// See <https://www.w3.org/TR/2000/NOTE-SOAP-20000508/#_Toc478383507>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("SOAP fault {code}: {message}")]
pub struct Fault {
    /// Qualified fault code, e.g. `soap:Server`. Kept verbatim, prefix included.
    #[serde(rename = "faultcode")]
    pub code: String,

    #[serde(rename = "faultstring")]
    pub message: String,

    /// URI of the node that caused the fault.
    #[serde(rename = "faultactor", default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    #[serde(rename = "detail", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<FaultDetail>,
}

impl Fault {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            actor: None,
            detail: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_detail(mut self, detail: FaultDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Application specific entries of a fault `<detail>` element, keyed by the local
/// name of each child element.
///
/// Only text entries are kept. A child element holding further elements is
/// skipped, so a structured detail never stops the fault itself from decoding.
/// Callers who need it can decode the body into their own fault type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FaultDetail {
    pub entries: BTreeMap<String, String>,
}

impl FaultDetail {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for FaultDetail {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DetailVisitor)
    }
}

struct DetailVisitor;

impl<'de> Visitor<'de> for DetailVisitor {
    type Value = FaultDetail;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("fault detail entries")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut detail = FaultDetail::default();

        while let Some(name) = map.next_key::<String>()? {
            if name.starts_with('@') || name == "$text" {
                map.next_value::<IgnoredAny>()?;
                continue;
            }

            if let DetailEntry(Some(text)) = map.next_value::<DetailEntry>()? {
                detail.entries.insert(name, text);
            }
        }

        Ok(detail)
    }
}

/// Text of one detail entry, `None` when the entry holds child elements.
struct DetailEntry(Option<String>);

impl<'de> Deserialize<'de> for DetailEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DetailEntryVisitor)
    }
}

struct DetailEntryVisitor;

impl<'de> Visitor<'de> for DetailEntryVisitor {
    type Value = DetailEntry;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a fault detail entry")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut text = None;
        let mut nested = false;

        while let Some(key) = map.next_key::<String>()? {
            if key == "$text" {
                text = Some(map.next_value::<String>()?);
                continue;
            }

            nested |= !key.starts_with('@');
            map.next_value::<IgnoredAny>()?;
        }

        Ok(DetailEntry((!nested).then(|| text.unwrap_or_default())))
    }
}
