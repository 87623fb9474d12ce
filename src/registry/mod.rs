//! Mime-type keyed codec registry
//!
//! A [`CodecRegistry`] stores one [`CodecFactory`] per mime type and resolves raw
//! header values to codecs:
//!
//! 1. an exact key match wins (`""` and `*/*` resolve to the default codec);
//! 2. otherwise a registered mime type `m` matches when the input contains `m;`,
//!    so `multipart/form-data; boundary=xyz` resolves to `multipart/form-data`.
//!    When several registered types match, the longest one wins and equal lengths
//!    go to the one registered first;
//! 3. otherwise there is no codec.

pub mod builder;
pub mod list;

pub use builder::RegistryBuilder;
pub use list::CodecList;

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;

use crate::{
    codec::{self, Codec, CodecFactory, Registry},
    error::{CodecError, CodecResult},
};

/// Key that resolves to the default codec when no content type is given
pub const DEFAULT_KEY: &str = "";

/// Key that resolves to the default codec when any content type is accepted
pub const WILDCARD_KEY: &str = "*/*";

static GLOBAL_REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();

/// Get the process-wide registry, preloaded with the built-in codecs
///
/// Prefer passing an explicit [`CodecRegistry`] to the code that needs it; this is a
/// convenience for small programs.
pub fn global() -> &'static CodecRegistry {
    GLOBAL_REGISTRY.get_or_init(CodecRegistry::with_builtin_codecs)
}

#[derive(Default)]
struct Entries {
    factories: HashMap<String, CodecFactory>,
    /// Registration order, used to break submatch ties
    order: Vec<String>,
    default: Option<(String, CodecFactory)>,
}

impl Entries {
    fn insert(&mut self, mime_type: impl Into<String>, factory: CodecFactory) {
        let mime_type = mime_type.into();
        self.order.push(mime_type.clone());
        self.factories.insert(mime_type, factory);
    }
}

/// Thread-safe registry of codec constructors keyed by mime type
///
/// Entries are never removed. Constructors run while the registry lock is held, so
/// they must be fast and must not call back into the registry.
#[derive(Default)]
pub struct CodecRegistry {
    entries: RwLock<Entries>,
}

impl CodecRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the JSON, text and multipart codecs
    pub fn with_builtin_codecs() -> Self {
        let mut entries = Entries::default();
        entries.insert(codec::json::MIME_TYPE, codec::json::factory());
        entries.insert(codec::text::MIME_TYPE, codec::text::factory());
        entries.insert(codec::multipart::MIME_TYPE, codec::multipart::factory());
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Create a builder for a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Make a codec available for `mime_type`
    ///
    /// Fails if the mime type is already registered (the existing entry is kept) or if
    /// it is one of the default aliases.
    pub fn register(&self, mime_type: impl Into<String>, factory: CodecFactory) -> CodecResult<()> {
        let mime_type = mime_type.into();
        if mime_type == DEFAULT_KEY || mime_type == WILDCARD_KEY {
            return Err(CodecError::ReservedMimeType { mime_type });
        }

        let mut entries = self.entries.write();
        if entries.factories.contains_key(&mime_type) {
            return Err(CodecError::AlreadyRegistered { mime_type });
        }

        tracing::debug!(mime_type = %mime_type, factory = ?factory, "registering codec");
        entries.insert(mime_type, factory);
        Ok(())
    }

    /// Make the codec registered for `mime_type` the default
    ///
    /// After this call, lookups of `""` and `*/*` resolve to that codec. May be called
    /// any number of times; each call replaces the previous default.
    pub fn set_default(&self, mime_type: &str) -> CodecResult<()> {
        let mut entries = self.entries.write();
        let factory = entries
            .factories
            .get(mime_type)
            .cloned()
            .ok_or_else(|| CodecError::NotRegistered {
                mime_type: mime_type.to_string(),
            })?;

        tracing::debug!(mime_type = %mime_type, "setting default codec");
        entries.default = Some((mime_type.to_string(), factory));
        Ok(())
    }

    /// Find a codec for a raw mime type or header value
    pub fn lookup(&self, mime_type: &str) -> Option<Arc<dyn Codec>> {
        let entries = self.entries.read();

        if mime_type == DEFAULT_KEY || mime_type == WILDCARD_KEY {
            let codec = entries
                .default
                .as_ref()
                .map(|(_, factory)| factory.build(mime_type));
            tracing::trace!(mime_type = %mime_type, found = codec.is_some(), "default codec lookup");
            return codec;
        }

        if let Some(factory) = entries.factories.get(mime_type) {
            tracing::trace!(mime_type = %mime_type, "exact codec match");
            return Some(factory.build(mime_type));
        }

        let mut best: Option<&str> = None;
        for registered in &entries.order {
            let longer = best.map_or(true, |b| registered.len() > b.len());
            if longer && contains_parameterized(mime_type, registered) {
                best = Some(registered.as_str());
            }
        }

        match best.and_then(|key| entries.factories.get(key).map(|f| (key, f))) {
            Some((key, factory)) => {
                tracing::trace!(mime_type = %mime_type, matched = %key, "parameterized codec match");
                Some(factory.build(mime_type))
            }
            None => {
                tracing::trace!(mime_type = %mime_type, "no codec found");
                None
            }
        }
    }

    /// Check whether `mime_type` has its own entry
    pub fn contains(&self, mime_type: &str) -> bool {
        self.entries.read().factories.contains_key(mime_type)
    }

    /// Get the registered mime types in registration order
    pub fn mime_types(&self) -> Vec<String> {
        self.entries.read().order.clone()
    }

    /// Get the mime type currently aliased as default
    pub fn default_mime_type(&self) -> Option<String> {
        self.entries
            .read()
            .default
            .as_ref()
            .map(|(mime_type, _)| mime_type.clone())
    }

    /// Number of registered mime types, not counting the default aliases
    pub fn len(&self) -> usize {
        self.entries.read().factories.len()
    }

    /// Whether no codec has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Registry for CodecRegistry {
    fn lookup(&self, mime_type: &str) -> Option<Arc<dyn Codec>> {
        CodecRegistry::lookup(self, mime_type)
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read();
        f.debug_struct("CodecRegistry")
            .field("mime_types", &entries.order)
            .field(
                "default",
                &entries.default.as_ref().map(|(mime_type, _)| mime_type),
            )
            .finish()
    }
}

/// `registered` followed by `;` occurs somewhere in `input`
fn contains_parameterized(input: &str, registered: &str) -> bool {
    input.contains(&format!("{};", registered))
}
