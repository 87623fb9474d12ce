use std::{convert::Infallible, io::Read};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use futures::{executor::block_on, stream};
use serde_json::{json, Map, Value};

use crate::{
    codec::Decoder,
    config::MultipartConfig,
    error::{CodecError, CodecResult},
    form,
};

const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// One part of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Form field name from `Content-Disposition`
    pub name: String,

    /// File name, present for file uploads
    pub filename: Option<String>,

    /// Part `Content-Type` header
    pub content_type: Option<String>,

    /// Raw part body
    pub data: Bytes,
}

/// Result of decoding a form, with the fields that could not be placed
#[derive(Debug)]
pub struct DecodedForm {
    /// Nested value rebuilt from all valid fields
    pub value: Value,

    /// Errors for the fields that were left out, in body order
    pub errors: Vec<CodecError>,
}

/// Decodes `multipart/form-data` into a nested JSON object
///
/// Text fields go through [`form::coerce_value`]; file parts become objects with
/// `filename`, `contentType` and base64 `data`.
pub struct MultipartDecoder<'a> {
    source: &'a mut dyn Read,
    boundary: Option<String>,
    config: MultipartConfig,
}

impl<'a> MultipartDecoder<'a> {
    /// Create a decoder for parts separated by `boundary`
    pub fn new(source: &'a mut dyn Read, boundary: Option<String>, config: MultipartConfig) -> Self {
        Self {
            source,
            boundary,
            config,
        }
    }

    /// Read the body and split it into parts
    pub fn read_parts(&mut self) -> CodecResult<Vec<Part>> {
        let boundary = self.boundary.clone().ok_or(CodecError::MissingBoundary)?;
        let body = self.read_body()?;
        parse_parts(body, &boundary)
    }

    /// Decode the form, collecting per-field errors instead of stopping at the first
    pub fn decode_form(&mut self) -> CodecResult<DecodedForm> {
        let parts = self.read_parts()?;

        let mut value = Value::Object(Map::new());
        let mut errors = Vec::new();
        for part in &parts {
            if let Err(err) = place_part(&mut value, part, self.config.max_array_index) {
                errors.push(err);
            }
        }

        Ok(DecodedForm { value, errors })
    }

    fn read_body(&mut self) -> CodecResult<Bytes> {
        let limit = self.config.max_memory;
        let mut body = Vec::new();
        (&mut *self.source)
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut body)?;
        if body.len() > limit {
            return Err(CodecError::BodyTooLarge { limit });
        }
        Ok(Bytes::from(body))
    }
}

impl Decoder for MultipartDecoder<'_> {
    fn decode(&mut self) -> CodecResult<Value> {
        let DecodedForm { value, errors } = self.decode_form()?;

        if !self.config.skip_invalid_fields {
            if let Some(err) = errors.into_iter().next() {
                return Err(err);
            }
            return Ok(value);
        }

        for err in &errors {
            tracing::warn!(error = %err, "skipping invalid form field");
        }
        Ok(value)
    }
}

fn place_part(root: &mut Value, part: &Part, max_index: usize) -> CodecResult<()> {
    match &part.filename {
        Some(filename) => {
            let path = form::parse_path(&part.name)?;
            let file = json!({
                "filename": filename,
                "contentType": part
                    .content_type
                    .as_deref()
                    .unwrap_or(DEFAULT_FILE_CONTENT_TYPE),
                "data": STANDARD.encode(&part.data),
            });
            form::insert(root, &part.name, &path, file, max_index)
        }
        None => {
            let raw = std::str::from_utf8(&part.data).map_err(|_| {
                CodecError::Multipart(format!("field {:?} is not valid UTF-8", part.name))
            })?;
            form::insert_field(root, &part.name, raw, max_index)
        }
    }
}

/// Split a buffered multipart body into parts
///
/// The body is already in memory, so the part reader never waits on its stream and
/// is driven to completion on the current thread.
pub fn parse_parts(body: impl Into<Bytes>, boundary: &str) -> CodecResult<Vec<Part>> {
    let chunk = body.into();
    let stream = stream::once(async move { Ok::<Bytes, Infallible>(chunk) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    block_on(async {
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field
                .name()
                .map(str::to_string)
                .ok_or_else(|| CodecError::Multipart("part without a name".to_string()))?;
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(|mime| mime.to_string());
            let data = field.bytes().await?;

            tracing::trace!(name = %name, len = data.len(), "read multipart part");
            parts.push(Part {
                name,
                filename,
                content_type,
                data,
            });
        }
        Ok::<_, CodecError>(parts)
    })
}
