//! Codec configuration

/// Default read limit for multipart bodies (2 MiB)
pub const DEFAULT_MAX_MEMORY: usize = 2 << 20;

/// Default upper bound for array indices in form field names
pub const DEFAULT_MAX_ARRAY_INDEX: usize = 10_000;

/// Configuration for the multipart form codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartConfig {
    /// Maximum number of body bytes read by a decoder
    pub max_memory: usize,

    /// Log and skip invalid fields instead of failing the decode
    pub skip_invalid_fields: bool,

    /// Largest array index accepted in a field name
    pub max_array_index: usize,
}

impl MultipartConfig {
    /// Create a configuration with default limits
    pub fn new() -> Self {
        Self {
            max_memory: DEFAULT_MAX_MEMORY,
            skip_invalid_fields: false,
            max_array_index: DEFAULT_MAX_ARRAY_INDEX,
        }
    }

    /// Set the body read limit
    pub fn with_max_memory(mut self, max_memory: usize) -> Self {
        self.max_memory = max_memory;
        self
    }

    /// Skip invalid fields instead of failing
    pub fn with_skip_invalid_fields(mut self, enabled: bool) -> Self {
        self.skip_invalid_fields = enabled;
        self
    }

    /// Set the largest accepted array index
    pub fn with_max_array_index(mut self, max_array_index: usize) -> Self {
        self.max_array_index = max_array_index;
        self
    }
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self::new()
    }
}
