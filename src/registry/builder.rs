//! Builder for assembling a registry at startup

use crate::{
    codec::{self, Codec, CodecFactory},
    config::MultipartConfig,
    error::CodecResult,
    registry::CodecRegistry,
};

/// Builder for constructing a [`CodecRegistry`]
///
/// Registrations are applied in the order they were added; the first duplicate or
/// unknown default is returned from [`build`](RegistryBuilder::build).
///
/// # Example
///
/// ```rust
/// use mime_codec::prelude::*;
///
/// # fn example() -> Result<(), CodecError> {
/// let registry = RegistryBuilder::new()
///     .with_builtin_codecs()
///     .with_default("application/json")
///     .build()?;
///
/// let codec = registry.lookup("*/*").unwrap();
/// assert_eq!(codec.mime_type(), "application/json");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    codecs: Vec<(String, CodecFactory)>,
    default: Option<String>,
}

impl RegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the JSON codec
    pub fn with_json(self) -> Self {
        self.with_factory(codec::json::MIME_TYPE, codec::json::factory())
    }

    /// Add the plain text codec
    pub fn with_text(self) -> Self {
        self.with_factory(codec::text::MIME_TYPE, codec::text::factory())
    }

    /// Add the multipart form codec
    ///
    /// # Arguments
    ///
    /// * `config` - Limits applied by every decoder the codec creates
    pub fn with_multipart(self, config: MultipartConfig) -> Self {
        self.with_factory(
            codec::multipart::MIME_TYPE,
            codec::multipart::factory_with_config(config),
        )
    }

    /// Add the JSON, text and multipart codecs with default configuration
    pub fn with_builtin_codecs(self) -> Self {
        self.with_json()
            .with_text()
            .with_multipart(MultipartConfig::default())
    }

    /// Add a shared codec instance under its own mime type
    pub fn with_codec<C: Codec + 'static>(self, codec: C) -> Self {
        let mime_type = codec.mime_type().to_string();
        self.with_factory(mime_type, CodecFactory::singleton(codec))
    }

    /// Add a factory under an explicit mime type
    pub fn with_factory(mut self, mime_type: impl Into<String>, factory: CodecFactory) -> Self {
        self.codecs.push((mime_type.into(), factory));
        self
    }

    /// Set the codec returned for `""` and `*/*`
    pub fn with_default(mut self, mime_type: impl Into<String>) -> Self {
        self.default = Some(mime_type.into());
        self
    }

    /// Build the registry
    pub fn build(self) -> CodecResult<CodecRegistry> {
        let registry = CodecRegistry::new();
        for (mime_type, factory) in self.codecs {
            registry.register(mime_type, factory)?;
        }
        if let Some(mime_type) = self.default {
            registry.set_default(&mime_type)?;
        }
        Ok(registry)
    }
}
