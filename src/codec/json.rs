//! JSON codec

use std::{
    io::{self, Read, Write},
    sync::Arc,
};

use serde_json::{de::IoRead, StreamDeserializer, Value};

use crate::{
    codec::{Codec, CodecFactory, Decoder, Encoder},
    error::{CodecError, CodecResult},
    registry::CodecRegistry,
};

/// Mime type handled by [`JsonCodec`]
pub const MIME_TYPE: &str = "application/json";

/// JSON codec backed by `serde_json`
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encoder<'a>(&self, sink: &'a mut dyn Write) -> Box<dyn Encoder + 'a> {
        Box::new(JsonEncoder { sink })
    }

    fn decoder<'a>(&self, source: &'a mut dyn Read) -> Box<dyn Decoder + 'a> {
        Box::new(JsonDecoder {
            stream: serde_json::Deserializer::from_reader(source).into_iter(),
        })
    }

    fn mime_type(&self) -> &str {
        MIME_TYPE
    }
}

/// Writes newline-terminated JSON documents
pub struct JsonEncoder<'a> {
    sink: &'a mut dyn Write,
}

impl Encoder for JsonEncoder<'_> {
    fn encode(&mut self, value: &Value) -> CodecResult<()> {
        serde_json::to_writer(&mut *self.sink, value)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }
}

/// Reads consecutive JSON documents from a stream
pub struct JsonDecoder<'a> {
    stream: StreamDeserializer<'a, IoRead<&'a mut dyn Read>, Value>,
}

impl Decoder for JsonDecoder<'_> {
    fn decode(&mut self) -> CodecResult<Value> {
        match self.stream.next() {
            Some(value) => Ok(value?),
            None => Err(CodecError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no more JSON values",
            ))),
        }
    }
}

/// Factory sharing a single JSON codec, it holds no per-request state
pub fn factory() -> CodecFactory {
    CodecFactory::Singleton(Arc::new(JsonCodec))
}

/// Register the JSON codec
pub fn register(registry: &CodecRegistry) -> CodecResult<()> {
    registry.register(MIME_TYPE, factory())
}
