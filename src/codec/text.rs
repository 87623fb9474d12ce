//! Plain text codec
//!
//! Strings are written verbatim; any other value is written as its JSON text. The
//! concrete [`TextEncoder`] and [`TextDecoder`] also accept anything implementing
//! [`Display`] or [`FromStr`].

use std::{
    fmt::Display,
    io::{Read, Write},
    str::FromStr,
    sync::Arc,
};

use serde_json::Value;

use crate::{
    codec::{Codec, CodecFactory, Decoder, Encoder},
    error::{CodecError, CodecResult},
    registry::CodecRegistry,
};

/// Mime type handled by [`TextCodec`]
pub const MIME_TYPE: &str = "text/plain";

/// Plain text codec
#[derive(Debug, Clone, Default)]
pub struct TextCodec;

impl TextCodec {
    /// Create a new text codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for TextCodec {
    fn encoder<'a>(&self, sink: &'a mut dyn Write) -> Box<dyn Encoder + 'a> {
        Box::new(TextEncoder::new(sink))
    }

    fn decoder<'a>(&self, source: &'a mut dyn Read) -> Box<dyn Decoder + 'a> {
        Box::new(TextDecoder::new(source))
    }

    fn mime_type(&self) -> &str {
        MIME_TYPE
    }
}

/// Text encoder
pub struct TextEncoder<'a> {
    sink: &'a mut dyn Write,
}

impl<'a> TextEncoder<'a> {
    /// Create a text encoder writing to `sink`
    pub fn new(sink: &'a mut dyn Write) -> Self {
        Self { sink }
    }

    /// Write the textual form of `value`
    pub fn encode_text<T: Display + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        write!(self.sink, "{}", value)?;
        Ok(())
    }
}

impl Encoder for TextEncoder<'_> {
    fn encode(&mut self, value: &Value) -> CodecResult<()> {
        match value {
            Value::String(text) => self.sink.write_all(text.as_bytes())?,
            other => write!(self.sink, "{}", other)?,
        }
        Ok(())
    }
}

/// Text decoder, reads the whole source on every call
pub struct TextDecoder<'a> {
    source: &'a mut dyn Read,
}

impl<'a> TextDecoder<'a> {
    /// Create a text decoder reading from `source`
    pub fn new(source: &'a mut dyn Read) -> Self {
        Self { source }
    }

    /// Read the remaining raw bytes
    pub fn decode_bytes(&mut self) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.source.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Read the remaining text and parse it into `T`
    pub fn decode_text<T>(&mut self) -> CodecResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let text = String::from_utf8(self.decode_bytes()?)?;
        text.parse().map_err(|err: T::Err| {
            CodecError::Unsupported(format!(
                "cannot parse {:?} as {}: {}",
                text,
                std::any::type_name::<T>(),
                err
            ))
        })
    }
}

impl Decoder for TextDecoder<'_> {
    fn decode(&mut self) -> CodecResult<Value> {
        let text = String::from_utf8(self.decode_bytes()?)?;
        Ok(Value::String(text))
    }
}

/// Factory sharing a single text codec
pub fn factory() -> CodecFactory {
    CodecFactory::Singleton(Arc::new(TextCodec))
}

/// Register the text codec
pub fn register(registry: &CodecRegistry) -> CodecResult<()> {
    registry.register(MIME_TYPE, factory())
}
