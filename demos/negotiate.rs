use mime_codec::{config::MultipartConfig, prelude::*};
use serde_json::json;
use tracing_subscriber::EnvFilter;

// Content types as they might arrive on incoming requests
const REQUEST_CONTENT_TYPES: &[&str] = &[
    "application/json",
    "text/plain",
    "*/*",
    "",
    "image/png",
];

fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging, RUST_LOG=mime_codec=trace shows lookups
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Mime Codec Negotiation Example\n");

    let registry = RegistryBuilder::new()
        .with_json()
        .with_text()
        .with_multipart(MultipartConfig::new().with_skip_invalid_fields(true))
        .with_default("application/json")
        .build()?;

    println!("Registered: {:?}\n", registry.mime_types());

    let payload = json!({
        "title": "quarterly report",
        "pages": 12,
        "authors": ["ada", "charles"]
    });

    for content_type in REQUEST_CONTENT_TYPES {
        match registry.lookup(content_type) {
            Some(codec) => {
                let body = codec.encode_to_bytes(&payload)?;
                println!(
                    "{:>18} -> {} ({} bytes)",
                    format!("{:?}", content_type),
                    codec.mime_type(),
                    body.len()
                );
            }
            None => println!("{:>18} -> no codec", format!("{:?}", content_type)),
        }
    }

    // Multipart needs the boundary from the header, so the codec is built per lookup
    println!("\nMultipart form round trip:");
    let mut body = Vec::new();
    let mut encoder = MultipartCodec::new().new_encoder(&mut body);
    encoder.encode(&payload)?;
    let content_type = encoder.content_type();

    let codec = registry
        .lookup(&content_type)
        .ok_or_else(|| anyhow::anyhow!("no codec for {}", content_type))?;
    let decoded = codec.decode_from_slice(&body)?;

    println!("  Content-Type: {}", content_type);
    println!("  Decoded: {}", decoded);
    assert_eq!(decoded, payload);

    // Invalid fields are logged and skipped by the configured decoder
    let broken = "--b\r\nContent-Disposition: form-data; name=\"broken[\"\r\n\r\nx\r\n\
                  --b\r\nContent-Disposition: form-data; name=\"kept\"\r\n\r\n1\r\n--b--\r\n";
    let codec = registry
        .lookup("multipart/form-data; boundary=b")
        .ok_or_else(|| anyhow::anyhow!("no multipart codec"))?;
    println!("  Lenient decode: {}", codec.decode_from_slice(broken.as_bytes())?);

    Ok(())
}
