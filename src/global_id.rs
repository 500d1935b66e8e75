//! Opaque global entity identifiers.
//!
//! A global ID is base64 of `"<TypeName>:<pk>"`, reversibly encoding the
//! entity type together with its local primary key. The catalogue predicate
//! stores these strings, so decoding has to tolerate whatever ended up in
//! the database.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlobalIdError {
    #[error("global id is not valid base64")]
    InvalidEncoding,

    #[error("global id payload is malformed")]
    Malformed,

    #[error("expected a {expected} id, got {actual}")]
    UnexpectedType { expected: String, actual: String },
}

/// Encode a typed local key into a global ID.
pub fn encode(type_name: &str, pk: i32) -> String {
    STANDARD.encode(format!("{type_name}:{pk}"))
}

/// Decode a global ID into its type name and local key.
pub fn decode(value: &str) -> Result<(String, i32), GlobalIdError> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|_| GlobalIdError::InvalidEncoding)?;
    let payload = String::from_utf8(bytes).map_err(|_| GlobalIdError::Malformed)?;
    let (type_name, pk) = payload.split_once(':').ok_or(GlobalIdError::Malformed)?;
    let pk = pk.parse::<i32>().map_err(|_| GlobalIdError::Malformed)?;
    Ok((type_name.to_string(), pk))
}

/// Decode a global ID, checking that it names the expected type.
pub fn decode_expecting(type_name: &str, value: &str) -> Result<i32, GlobalIdError> {
    let (actual, pk) = decode(value)?;
    if actual != type_name {
        return Err(GlobalIdError::UnexpectedType {
            expected: type_name.to_string(),
            actual,
        });
    }
    Ok(pk)
}
