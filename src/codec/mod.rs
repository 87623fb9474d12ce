//! Codec contracts and the built-in format adapters

pub mod json;
pub mod multipart;
pub mod text;

pub use json::JsonCodec;
pub use multipart::MultipartCodec;
pub use text::TextCodec;

use std::{
    io::{Read, Write},
    sync::Arc,
};

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::CodecResult;

/// Writes one value at a time to the sink it was created for
///
/// On error the sink may hold partial output; the caller decides what to do with it.
pub trait Encoder {
    /// Encode a single value
    fn encode(&mut self, value: &Value) -> CodecResult<()>;
}

/// Reads one value at a time from the source it was created for
pub trait Decoder {
    /// Decode the next value
    fn decode(&mut self) -> CodecResult<Value>;
}

/// Typed encoding on top of [`Encoder`]
pub trait EncoderExt: Encoder {
    /// Serialize `value` through the JSON data model and encode it
    fn encode_as<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        let value = serde_json::to_value(value)?;
        self.encode(&value)
    }
}

impl<E: Encoder + ?Sized> EncoderExt for E {}

/// Typed decoding on top of [`Decoder`]
pub trait DecoderExt: Decoder {
    /// Decode the next value into `T`
    fn decode_into<T: DeserializeOwned>(&mut self) -> CodecResult<T> {
        let value = self.decode()?;
        Ok(serde_json::from_value(value)?)
    }
}

impl<D: Decoder + ?Sized> DecoderExt for D {}

/// A data format identified by a mime type
///
/// Implementations are stateless apart from parameters fixed at construction time
/// (e.g. a multipart boundary).
pub trait Codec: Send + Sync {
    /// Create an encoder writing to `sink`
    fn encoder<'a>(&self, sink: &'a mut dyn Write) -> Box<dyn Encoder + 'a>;

    /// Create a decoder reading from `source`
    fn decoder<'a>(&self, source: &'a mut dyn Read) -> Box<dyn Decoder + 'a>;

    /// Get the (main) mime type of this codec
    fn mime_type(&self) -> &str;

    /// Encode a single value into a byte buffer
    fn encode_to_bytes(&self, value: &Value) -> CodecResult<Bytes> {
        let mut buf = Vec::new();
        self.encoder(&mut buf).encode(value)?;
        Ok(Bytes::from(buf))
    }

    /// Decode a single value from a byte slice
    fn decode_from_slice(&self, body: &[u8]) -> CodecResult<Value> {
        let mut source = body;
        let value = self.decoder(&mut source).decode();
        value
    }
}

/// Any set of codecs that can be searched by mime type
pub trait Registry: Send + Sync {
    /// Find a codec for `mime_type`, or `None` if nothing matches
    fn lookup(&self, mime_type: &str) -> Option<Arc<dyn Codec>>;
}

impl<R: Registry + ?Sized> Registry for Arc<R> {
    fn lookup(&self, mime_type: &str) -> Option<Arc<dyn Codec>> {
        (**self).lookup(mime_type)
    }
}

impl<R: Registry + ?Sized> Registry for &R {
    fn lookup(&self, mime_type: &str) -> Option<Arc<dyn Codec>> {
        (**self).lookup(mime_type)
    }
}

/// Constructor stored in a registry for one mime type
///
/// Stateless codecs share one instance; codecs that depend on header parameters are
/// built from the raw lookup input on every call.
#[derive(Clone)]
pub enum CodecFactory {
    /// Always return the same instance
    Singleton(Arc<dyn Codec>),

    /// Build a fresh instance from the raw mime header
    PerCall(Arc<dyn Fn(&str) -> Arc<dyn Codec> + Send + Sync>),
}

impl CodecFactory {
    /// Share a single codec instance across all lookups
    pub fn singleton<C: Codec + 'static>(codec: C) -> Self {
        CodecFactory::Singleton(Arc::new(codec))
    }

    /// Build a new codec from the header on every lookup
    pub fn per_call<F, C>(build: F) -> Self
    where
        F: Fn(&str) -> C + Send + Sync + 'static,
        C: Codec + 'static,
    {
        CodecFactory::PerCall(Arc::new(move |header: &str| {
            Arc::new(build(header)) as Arc<dyn Codec>
        }))
    }

    /// Produce a codec for the given raw header
    pub fn build(&self, header: &str) -> Arc<dyn Codec> {
        match self {
            CodecFactory::Singleton(codec) => Arc::clone(codec),
            CodecFactory::PerCall(build) => build(header),
        }
    }
}

impl std::fmt::Debug for CodecFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecFactory::Singleton(codec) => f
                .debug_tuple("Singleton")
                .field(&codec.mime_type())
                .finish(),
            CodecFactory::PerCall(_) => f.debug_tuple("PerCall").finish(),
        }
    }
}
