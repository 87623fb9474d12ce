use std::io::Write;

use serde_json::Value;

use crate::{
    codec::{multipart::MIME_TYPE, Encoder},
    error::{CodecError, CodecResult},
    form,
};

const MAX_BOUNDARY_LEN: usize = 70;

/// Encodes a JSON object as `multipart/form-data`
///
/// Nested objects and arrays are flattened into bracketed field names
/// (`user[tags][0]`). Each call to [`Encoder::encode`] writes one complete body
/// including the closing delimiter.
pub struct MultipartEncoder<'a> {
    sink: &'a mut dyn Write,
    boundary: String,
}

impl<'a> MultipartEncoder<'a> {
    /// Create an encoder writing parts separated by `boundary`
    pub fn new(sink: &'a mut dyn Write, boundary: impl Into<String>) -> Self {
        Self {
            sink,
            boundary: boundary.into(),
        }
    }

    /// Get the boundary used by this encoder
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the `Content-Type` header value matching the encoded body
    pub fn content_type(&self) -> String {
        if self.boundary.chars().all(is_token_char) {
            format!("{}; boundary={}", MIME_TYPE, self.boundary)
        } else {
            format!("{}; boundary=\"{}\"", MIME_TYPE, self.boundary)
        }
    }

    fn write_field(&mut self, name: &str, value: &str) -> CodecResult<()> {
        write!(
            self.sink,
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
            self.boundary,
            name.replace('\\', "\\\\").replace('"', "\\\"")
        )?;
        self.sink.write_all(value.as_bytes())?;
        self.sink.write_all(b"\r\n")?;
        Ok(())
    }
}

impl Encoder for MultipartEncoder<'_> {
    fn encode(&mut self, value: &Value) -> CodecResult<()> {
        validate_boundary(&self.boundary)?;
        let fields = form::flatten(value)?;
        for (name, raw) in &fields {
            self.write_field(name, raw)?;
        }
        write!(self.sink, "--{}--\r\n", self.boundary)?;
        Ok(())
    }
}

/// Boundary characters allowed outside a quoted header parameter
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "'+_-.".contains(c)
}

/// Check a boundary against the RFC 2046 character set and length
pub(crate) fn validate_boundary(boundary: &str) -> CodecResult<()> {
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
        return Err(CodecError::Multipart(format!(
            "boundary must be 1 to {} characters",
            MAX_BOUNDARY_LEN
        )));
    }
    let valid = boundary.chars().all(|c| {
        c.is_ascii_alphanumeric() || "'()+_,-./:=? ".contains(c)
    });
    if !valid || boundary.ends_with(' ') {
        return Err(CodecError::Multipart(format!(
            "invalid boundary {:?}",
            boundary
        )));
    }
    Ok(())
}
