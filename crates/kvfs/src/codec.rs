//! Conversion between structured values and the text a store holds.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

/// A lossless, symmetric value codec: `decode(encode(v)) == v`.
pub trait Codec: Send + Sync {
    type Value: Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    /// Returns the codec's own error if `value` cannot be represented as text.
    fn encode(&self, value: &Self::Value) -> Result<String, Self::Error>;

    /// # Errors
    /// Returns the codec's own error if `text` is not a valid encoding.
    fn decode(&self, text: &str) -> Result<Self::Value, Self::Error>;
}

/// Stores arbitrary JSON documents as compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Value = serde_json::Value;
    type Error = serde_json::Error;

    fn encode(&self, value: &Self::Value) -> Result<String, Self::Error> {
        serde_json::to_string(value)
    }

    fn decode(&self, text: &str) -> Result<Self::Value, Self::Error> {
        serde_json::from_str(text)
    }
}

/// Stores one concrete serde type as JSON text.
pub struct TypedJsonCodec<T> {
    _value: PhantomData<fn() -> T>,
}

impl<T> TypedJsonCodec<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { _value: PhantomData }
    }
}

impl<T> Default for TypedJsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedJsonCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedJsonCodec<T> {}

impl<T> fmt::Debug for TypedJsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedJsonCodec").field("value", &std::any::type_name::<T>()).finish()
    }
}

impl<T> Codec for TypedJsonCodec<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    type Value = T;
    type Error = serde_json::Error;

    fn encode(&self, value: &T) -> Result<String, Self::Error> {
        serde_json::to_string(value)
    }

    fn decode(&self, text: &str) -> Result<T, Self::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        theme: String,
        volume: u8,
    }

    #[test]
    fn test_json_codec_is_compact_and_lossless() {
        let value = json!({ "a": [1, 2.5, null], "b": { "c": "d" }, "e": true });
        let text = JsonCodec.encode(&value).unwrap();

        assert!(!text.contains(' '));
        assert_eq!(JsonCodec.decode(&text).unwrap(), value);
    }

    #[test]
    fn test_json_codec_rejects_garbage() {
        assert!(JsonCodec.decode("{not json").is_err());
    }

    #[test]
    fn test_typed_codec_roundtrip() {
        let codec = TypedJsonCodec::<Settings>::new();
        let settings = Settings { theme: "dark".into(), volume: 7 };

        let text = codec.encode(&settings).unwrap();
        assert_eq!(text, r#"{"theme":"dark","volume":7}"#);
        assert_eq!(codec.decode(&text).unwrap(), settings);
        assert!(codec.decode(r#"{"theme":"dark"}"#).is_err());
    }
}
