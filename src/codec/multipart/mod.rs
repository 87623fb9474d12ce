//! Multipart form codec
//!
//! Unlike the JSON and text codecs, a multipart codec depends on the `boundary`
//! parameter of the header it was looked up with, so the registry builds a fresh
//! instance for every lookup.

pub mod decoder;
pub mod encoder;

pub use decoder::{parse_parts, DecodedForm, MultipartDecoder, Part};
pub use encoder::MultipartEncoder;

use std::io::{Read, Write};

use mime::Mime;

use crate::{
    codec::{Codec, CodecFactory, Decoder, Encoder},
    config::MultipartConfig,
    error::CodecResult,
    registry::CodecRegistry,
};

/// Mime type handled by [`MultipartCodec`]
pub const MIME_TYPE: &str = "multipart/form-data";

/// `multipart/form-data` codec
#[derive(Debug, Clone, Default)]
pub struct MultipartCodec {
    boundary: Option<String>,
    config: MultipartConfig,
}

impl MultipartCodec {
    /// Create a codec without a known boundary
    ///
    /// Encoders generate a fresh boundary; decoders fail until one is provided.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec from a raw `Content-Type` header, keeping its boundary
    pub fn from_header(header: &str) -> Self {
        Self::from_header_with_config(header, MultipartConfig::default())
    }

    /// Create a codec from a raw header with a custom configuration
    pub fn from_header_with_config(header: &str, config: MultipartConfig) -> Self {
        let boundary = header
            .parse::<Mime>()
            .ok()
            .filter(|media| media.type_() == mime::MULTIPART && media.subtype() == mime::FORM_DATA)
            .and_then(|media| media.get_param(mime::BOUNDARY).map(|b| b.as_str().to_string()))
            .filter(|b| !b.is_empty());
        Self { boundary, config }
    }

    /// Use an explicit boundary
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: MultipartConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the boundary taken from the header, if any
    pub fn boundary(&self) -> Option<&str> {
        self.boundary.as_deref()
    }

    /// Get the configuration
    pub fn config(&self) -> &MultipartConfig {
        &self.config
    }

    /// Create a concrete encoder, generating a boundary when none is known
    pub fn new_encoder<'a>(&self, sink: &'a mut dyn Write) -> MultipartEncoder<'a> {
        let boundary = self.boundary.clone().unwrap_or_else(generate_boundary);
        MultipartEncoder::new(sink, boundary)
    }

    /// Create a concrete decoder
    pub fn new_decoder<'a>(&self, source: &'a mut dyn Read) -> MultipartDecoder<'a> {
        MultipartDecoder::new(source, self.boundary.clone(), self.config.clone())
    }
}

impl Codec for MultipartCodec {
    fn encoder<'a>(&self, sink: &'a mut dyn Write) -> Box<dyn Encoder + 'a> {
        Box::new(self.new_encoder(sink))
    }

    fn decoder<'a>(&self, source: &'a mut dyn Read) -> Box<dyn Decoder + 'a> {
        Box::new(self.new_decoder(source))
    }

    fn mime_type(&self) -> &str {
        MIME_TYPE
    }
}

fn generate_boundary() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

/// Factory building a new codec per lookup, since each request has its own boundary
pub fn factory() -> CodecFactory {
    factory_with_config(MultipartConfig::default())
}

/// Per-lookup factory with a custom configuration
pub fn factory_with_config(config: MultipartConfig) -> CodecFactory {
    CodecFactory::per_call(move |header: &str| {
        MultipartCodec::from_header_with_config(header, config.clone())
    })
}

/// Register the multipart codec
pub fn register(registry: &CodecRegistry) -> CodecResult<()> {
    registry.register(MIME_TYPE, factory())
}

/// Register the multipart codec with a custom configuration
pub fn register_with_config(registry: &CodecRegistry, config: MultipartConfig) -> CodecResult<()> {
    registry.register(MIME_TYPE, factory_with_config(config))
}
