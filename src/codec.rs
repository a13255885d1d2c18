//! Encoding layer. JSON via serde_json.
//!
//! Keys are written in sorted order, so encoding the same logical map twice
//! gives the same bytes. The store always writes through
//! [`Codec::encode_verified`], so it never puts a file on disk that it
//! couldn't read back.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Converts the store's map to/from bytes for persistence.
pub trait Codec: Send + Sync {
    /// Encode a map to bytes.
    fn encode<T: Serialize>(&self, data: &HashMap<String, T>) -> Result<Vec<u8>>;

    /// Decode bytes back into a map.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<HashMap<String, T>>;

    /// Encode, then decode the output as `T` again. Values the format can't
    /// represent faithfully (JSON writes NaN and infinities as `null`) turn
    /// into [`Error::Serialize`] instead of a file that no longer opens.
    fn encode_verified<T>(&self, data: &HashMap<String, T>) -> Result<Vec<u8>>
    where
        T: Serialize + DeserializeOwned,
    {
        let bytes = self.encode(data)?;
        if let Err(e) = self.decode::<T>(&bytes) {
            return Err(Error::Serialize(format!("encoded map does not read back: {e}")));
        }
        Ok(bytes)
    }
}

/// JSON codec, pretty-printed (two-space indent) or compact.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON (single line, no extra whitespace).
    pub fn compact() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with a trailing newline. Easier to read by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// `true` if this codec indents its output.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, data: &HashMap<String, T>) -> Result<Vec<u8>> {
        let sorted: BTreeMap<&String, &T> = data.iter().collect();
        if self.pretty {
            let mut bytes =
                serde_json::to_vec_pretty(&sorted).map_err(|e| Error::Serialize(e.to_string()))?;
            bytes.push(b'\n');
            Ok(bytes)
        } else {
            serde_json::to_vec(&sorted).map_err(|e| Error::Serialize(e.to_string()))
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<HashMap<String, T>> {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialize(e.to_string()))
    }
}
