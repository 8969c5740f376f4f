use std::io::BufRead;

use quick_xml::de::Deserializer;
use serde::de::DeserializeOwned;

use crate::DecodeError;

/// Decodes a document read from `reader` into `T`.
///
/// `T` is whatever shape the caller expects back: usually an [`Envelope`], but any
/// type mirroring the whole document works as well. Element prefixes are not
/// significant, only local names are matched.
///
/// [`Envelope`]: crate::Envelope
pub fn from_reader<T, R>(reader: R) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let de = &mut Deserializer::from_reader(reader);

    // Plain serde errors only describe the innermost failure; the path tells
    // which field of the destination did not fit.
    let value = serde_path_to_error::deserialize(de)?;
    Ok(value)
}

pub fn from_slice<T>(document: &[u8]) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    from_reader(document)
}

pub fn from_str<T>(document: &str) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    from_reader(document.as_bytes())
}
