//! # Mime Codec
//!
//! Runtime selection of data encodings by mime type.
//!
//! A [`CodecRegistry`](registry::CodecRegistry) maps mime types to codec
//! constructors. Request handling code looks a codec up by the raw `Content-Type`
//! or `Accept` value and gets encoders and decoders bound to its byte sinks and
//! sources, without knowing which format it is dealing with.
//!
//! ## Features
//!
//! - **Exact and parameterized lookup**: `multipart/form-data; boundary=xyz`
//!   resolves to the codec registered for `multipart/form-data`
//! - **Singleton or per-call codecs**: stateless codecs are shared, header-dependent
//!   codecs are rebuilt from every lookup
//! - **Default codec**: `""` and `*/*` resolve to a configurable default
//! - **Form paths**: bracketed field names (`user[tags][0]`) are turned back into
//!   nested values
//!
//! ## Example
//!
//! ```rust
//! use mime_codec::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), CodecError> {
//! let registry = RegistryBuilder::new()
//!     .with_builtin_codecs()
//!     .with_default("application/json")
//!     .build()?;
//!
//! let codec = registry.lookup("application/json").unwrap();
//! let body = codec.encode_to_bytes(&json!({"name": "widget"}))?;
//! assert_eq!(codec.decode_from_slice(&body)?, json!({"name": "widget"}));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod form;
pub mod registry;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        codec::{
            Codec, CodecFactory, Decoder, DecoderExt, Encoder, EncoderExt, JsonCodec,
            MultipartCodec, Registry, TextCodec,
        },
        config::MultipartConfig,
        error::{CodecError, CodecResult},
        registry::{CodecList, CodecRegistry, RegistryBuilder},
    };
}
