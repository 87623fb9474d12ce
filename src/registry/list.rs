//! Fixed list of codec instances

use std::sync::Arc;

use crate::codec::{Codec, Registry};

/// Registry over a plain list of codecs, matched by exact mime type
///
/// Useful when a handler only supports a known set of formats and should not see
/// everything registered process-wide.
#[derive(Clone, Default)]
pub struct CodecList {
    codecs: Vec<Arc<dyn Codec>>,
}

impl CodecList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a codec to the list
    pub fn with(mut self, codec: impl Codec + 'static) -> Self {
        self.codecs.push(Arc::new(codec));
        self
    }

    /// Add a shared codec to the list
    pub fn push(&mut self, codec: Arc<dyn Codec>) {
        self.codecs.push(codec);
    }

    /// Number of codecs in the list
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Registry for CodecList {
    fn lookup(&self, mime_type: &str) -> Option<Arc<dyn Codec>> {
        self.codecs
            .iter()
            .find(|codec| codec.mime_type() == mime_type)
            .cloned()
    }
}

impl FromIterator<Arc<dyn Codec>> for CodecList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Codec>>>(iter: I) -> Self {
        Self {
            codecs: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for CodecList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.codecs.iter().map(|codec| codec.mime_type()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{JsonCodec, MultipartCodec, TextCodec};

    #[test]
    fn test_exact_lookup_only() {
        let list = CodecList::new()
            .with(JsonCodec::new())
            .with(MultipartCodec::new());

        assert_eq!(list.len(), 2);
        assert!(list.lookup("application/json").is_some());
        assert!(list.lookup("multipart/form-data").is_some());
        assert!(list.lookup("multipart/form-data; boundary=x").is_none());
        assert!(list.lookup("text/plain").is_none());
        assert!(list.lookup("").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let first: Arc<dyn Codec> = Arc::new(TextCodec::new());
        let second: Arc<dyn Codec> = Arc::new(TextCodec::new());
        let list: CodecList = vec![Arc::clone(&first), second].into_iter().collect();

        let found = list.lookup("text/plain").unwrap();
        assert!(Arc::ptr_eq(&found, &first));
    }

    #[test]
    fn test_usable_as_dyn_registry() {
        let mut list = CodecList::new();
        list.push(Arc::new(JsonCodec::new()));
        let registry: &dyn Registry = &list;
        assert!(registry.lookup("application/json").is_some());
        assert_eq!(format!("{:?}", list), "[\"application/json\"]");
    }
}
