//! Registry and form path contract tests
//!
//! These tests exercise the public API the way request handling code uses it.

use std::{
    io::{Read, Write},
    sync::Arc,
    thread,
};

use mime_codec::{
    form::{self, PathSegment},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Codec that only carries a mime type
struct NamedCodec(String);

impl Codec for NamedCodec {
    fn encoder<'a>(&self, sink: &'a mut dyn Write) -> Box<dyn Encoder + 'a> {
        JsonCodec::new().encoder(sink)
    }

    fn decoder<'a>(&self, source: &'a mut dyn Read) -> Box<dyn Decoder + 'a> {
        JsonCodec::new().decoder(source)
    }

    fn mime_type(&self) -> &str {
        &self.0
    }
}

fn named(mime_type: &str) -> CodecFactory {
    CodecFactory::singleton(NamedCodec(mime_type.to_string()))
}

#[test]
fn test_duplicate_registration_leaves_entry_untouched() {
    let registry = CodecRegistry::new();
    registry.register("application/json", named("original")).unwrap();

    let err = registry
        .register("application/json", named("replacement"))
        .unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        registry.lookup("application/json").unwrap().mime_type(),
        "original"
    );
}

#[test]
fn test_exact_match_priority() {
    let registry = CodecRegistry::new();
    registry.register("multipart/form-data", named("base")).unwrap();
    registry
        .register("multipart/form-data; boundary=fixed", named("exact"))
        .unwrap();

    assert_eq!(
        registry
            .lookup("multipart/form-data; boundary=fixed")
            .unwrap()
            .mime_type(),
        "exact"
    );
}

#[test]
fn test_submatch_resolution() {
    let registry = CodecRegistry::with_builtin_codecs();
    let codec = registry.lookup("multipart/form-data; boundary=XYZ").unwrap();
    assert_eq!(codec.mime_type(), "multipart/form-data");
    assert!(registry.lookup("application/xml").is_none());
}

#[test]
fn test_default_aliasing_lifecycle() {
    let registry = CodecRegistry::with_builtin_codecs();
    assert!(registry.lookup("").is_none());
    assert!(registry.lookup("*/*").is_none());

    registry.set_default("application/json").unwrap();
    assert_eq!(registry.lookup("").unwrap().mime_type(), "application/json");
    assert_eq!(registry.lookup("*/*").unwrap().mime_type(), "application/json");

    registry.set_default("text/plain").unwrap();
    assert_eq!(registry.lookup("").unwrap().mime_type(), "text/plain");
    assert_eq!(registry.lookup("*/*").unwrap().mime_type(), "text/plain");
}

#[test]
fn test_default_on_unregistered_creates_nothing() {
    let registry = CodecRegistry::new();
    let err = registry.set_default("application/json").unwrap_err();
    assert!(matches!(err, CodecError::NotRegistered { .. }));
    assert!(registry.is_empty());
    assert!(registry.lookup("application/json").is_none());
    assert!(registry.lookup("").is_none());
}

#[test]
fn test_error_kinds_distinguishable() {
    let registry = CodecRegistry::new();
    let config_err = registry.set_default("text/plain").unwrap_err();
    let input_err = form::parse_path("bad[unterminated").unwrap_err();

    assert!(config_err.is_configuration() && !config_err.is_malformed_input());
    assert!(input_err.is_malformed_input() && !input_err.is_configuration());
    // a miss is neither: it is just None
    assert!(registry.lookup("image/png").is_none());
}

#[test]
fn test_path_parsing() {
    assert_eq!(
        form::parse_path("a[b][0]").unwrap(),
        vec![
            PathSegment::Key("a".to_string()),
            PathSegment::Key("b".to_string()),
            PathSegment::Index(0),
        ]
    );
    assert_eq!(
        form::parse_path("list[]").unwrap(),
        vec![PathSegment::Key("list".to_string()), PathSegment::Append]
    );
    assert!(matches!(
        form::parse_path("bad[unterminated"),
        Err(CodecError::MalformedFieldName { .. })
    ));
    assert_eq!(form::classify_segment(""), (0, true));
    assert_eq!(form::classify_segment("12"), (12, true));
    assert!(!form::classify_segment("b").1);
}

#[test]
fn test_value_coercion() {
    assert_eq!(form::coerce_value("42").unwrap(), json!(42));
    assert_eq!(form::coerce_value("true").unwrap(), json!(true));
    assert_eq!(form::coerce_value("hello world").unwrap(), json!("hello world"));
    assert!(form::coerce_value("an \"unescaped\" quote").is_err());
}

#[test]
fn test_concurrent_register_and_lookup() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 50;

    let registry = Arc::new(CodecRegistry::new());
    registry.register("application/json", named("application/json")).unwrap();

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                for i in 0..PER_WRITER {
                    let mime_type = format!("application/x-{}-{}", writer, i);
                    registry.register(mime_type.as_str(), named(&mime_type)).unwrap();
                }
            });
        }

        for _ in 0..WRITERS {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                for i in 0..PER_WRITER {
                    let codec = registry.lookup("application/json").unwrap();
                    assert_eq!(codec.mime_type(), "application/json");

                    // a codec is either fully registered or absent
                    let candidate = format!("application/x-0-{}", i);
                    if let Some(codec) = registry.lookup(&candidate) {
                        assert_eq!(codec.mime_type(), candidate);
                    }
                }
            });
        }
    });

    assert_eq!(registry.len(), WRITERS * PER_WRITER + 1);
    for writer in 0..WRITERS {
        for i in 0..PER_WRITER {
            assert!(registry.contains(&format!("application/x-{}-{}", writer, i)));
        }
    }
}

#[test]
fn test_concurrent_duplicate_registration_has_one_winner() {
    let registry = CodecRegistry::new();
    let shared = &registry;
    let results: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(move || shared.register("text/csv", named("text/csv")).is_ok()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(registry.len(), 1);
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Order {
    customer: String,
    items: Vec<Item>,
    express: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Item {
    sku: String,
    qty: u32,
}

#[test]
fn test_typed_form_round_trip_through_registry() {
    let registry = CodecRegistry::with_builtin_codecs();
    let order = Order {
        customer: "Ada Lovelace".to_string(),
        items: vec![
            Item {
                sku: "gear-1".to_string(),
                qty: 2,
            },
            Item {
                sku: "cam-7".to_string(),
                qty: 1,
            },
        ],
        express: true,
    };

    let mut body = Vec::new();
    let mut encoder = MultipartCodec::new().new_encoder(&mut body);
    encoder.encode_as(&order).unwrap();
    let content_type = encoder.content_type();

    let codec = registry.lookup(&content_type).unwrap();
    let mut source = body.as_slice();
    let decoded: Order = codec.decoder(&mut source).decode_into().unwrap();
    assert_eq!(decoded, order);
}

#[test]
fn test_codec_list_as_registry() {
    fn negotiate(registry: &dyn Registry, content_type: &str) -> Option<String> {
        registry
            .lookup(content_type)
            .map(|codec| codec.mime_type().to_string())
    }

    let list = CodecList::new().with(TextCodec::new());
    let registry = CodecRegistry::with_builtin_codecs();

    assert_eq!(negotiate(&list, "text/plain").as_deref(), Some("text/plain"));
    assert_eq!(negotiate(&list, "application/json"), None);
    assert_eq!(
        negotiate(&registry, "application/json").as_deref(),
        Some("application/json")
    );
}
