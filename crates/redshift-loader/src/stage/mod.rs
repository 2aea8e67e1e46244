//! Staging: delimited serialization and the object-store hand-off.
//!
//! The warehouse bulk-load interface reads from object storage rather than
//! accepting inline data, so the frame is serialized to delimited text and
//! uploaded under a deterministic key before the COPY runs. The staged
//! object outlives the pipeline call; nothing here deletes it.

use std::borrow::Cow;
use std::sync::Arc;

use object_store::path::Path as ObjectPath;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStore, PutOptions, PutPayload};
use tracing::{debug, info};

use crate::core::Frame;
use crate::error::Result;

/// Passthrough storage options applied to the uploaded object.
///
/// This is the restricted subset the object store accepts per put; absent
/// fields are silently skipped rather than rejected. Access control and
/// encryption are settings of the injected store itself, not per-object
/// options.
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// `Cache-Control` header for the object.
    pub cache_control: Option<String>,

    /// `Content-Disposition` header.
    pub content_disposition: Option<String>,

    /// `Content-Encoding` header.
    pub content_encoding: Option<String>,

    /// `Content-Language` header.
    pub content_language: Option<String>,

    /// `Content-Type` header.
    pub content_type: Option<String>,

    /// User metadata key/value pairs.
    pub metadata: Vec<(String, String)>,
}

impl StorageOptions {
    fn to_put_options(&self) -> PutOptions {
        let mut attributes = Attributes::new();
        if let Some(v) = &self.cache_control {
            attributes.insert(Attribute::CacheControl, AttributeValue::from(v.clone()));
        }
        if let Some(v) = &self.content_disposition {
            attributes.insert(
                Attribute::ContentDisposition,
                AttributeValue::from(v.clone()),
            );
        }
        if let Some(v) = &self.content_encoding {
            attributes.insert(Attribute::ContentEncoding, AttributeValue::from(v.clone()));
        }
        if let Some(v) = &self.content_language {
            attributes.insert(Attribute::ContentLanguage, AttributeValue::from(v.clone()));
        }
        if let Some(v) = &self.content_type {
            attributes.insert(Attribute::ContentType, AttributeValue::from(v.clone()));
        }
        for (key, value) in &self.metadata {
            attributes.insert(
                Attribute::Metadata(Cow::Owned(key.clone())),
                AttributeValue::from(value.clone()),
            );
        }
        let mut opts = PutOptions::default();
        opts.attributes = attributes;
        opts
    }
}

/// Serialization and upload options for one staging run.
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Materialize the index (row number) as the first column.
    pub include_index: bool,

    /// Field delimiter.
    pub delimiter: char,

    /// CSV quote character.
    pub quote_char: char,

    /// Also write an identically-formatted copy to the current directory.
    pub save_local: bool,

    /// Storage options passed through to the object store.
    pub storage: StorageOptions,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            include_index: false,
            delimiter: ',',
            quote_char: '"',
            save_local: false,
            storage: StorageOptions::default(),
        }
    }
}

/// Quote a field when it contains the delimiter, the quote character or a
/// line break; embedded quote characters are doubled.
fn quote_field(raw: &str, delimiter: char, quote: char) -> String {
    if raw.contains(delimiter) || raw.contains(quote) || raw.contains('\n') || raw.contains('\r') {
        let doubled = raw.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{doubled}{quote}")
    } else {
        raw.to_string()
    }
}

/// Serialize a frame to delimited text with a header row.
///
/// Row order is preserved. When `include_index` is set the first column is
/// the 0-based row number under the frame's resolved index name.
pub fn to_delimited(frame: &Frame, delimiter: char, quote: char, include_index: bool) -> String {
    let mut out = String::new();

    let mut header: Vec<String> = Vec::new();
    if include_index {
        header.push(quote_field(frame.index_name(), delimiter, quote));
    }
    for column in frame.columns() {
        header.push(quote_field(&column.name, delimiter, quote));
    }
    out.push_str(&header.join(&delimiter.to_string()));
    out.push('\n');

    for row in 0..frame.row_count() {
        let mut fields: Vec<String> = Vec::new();
        if include_index {
            fields.push(row.to_string());
        }
        for column in frame.columns() {
            fields.push(quote_field(&column.values[row].render(), delimiter, quote));
        }
        out.push_str(&fields.join(&delimiter.to_string()));
        out.push('\n');
    }

    out
}

/// Uploads serialized frames to the staging bucket.
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    subdirectory: String,
}

impl Uploader {
    /// Create an uploader bound to a bucket and optional key prefix.
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, subdirectory: Option<&str>) -> Self {
        let subdirectory = match subdirectory {
            Some(s) if !s.is_empty() => format!("{}/", s.trim_end_matches('/')),
            _ => String::new(),
        };
        Self {
            store,
            bucket: bucket.into(),
            subdirectory,
        }
    }

    /// Full object key (prefix + caller key).
    pub fn object_key(&self, key: &str) -> String {
        format!("{}{}", self.subdirectory, key)
    }

    /// `s3://bucket/key` URI consumed by the warehouse COPY statement.
    pub fn uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, self.object_key(key))
    }

    /// Serialize the frame and upload it under `key`.
    ///
    /// Optionally persists a local copy first. A store failure propagates
    /// as-is; there is no retry.
    pub async fn upload(&self, frame: &Frame, key: &str, opts: &StageOptions) -> Result<String> {
        let text = to_delimited(frame, opts.delimiter, opts.quote_char, opts.include_index);

        if opts.save_local {
            std::fs::write(key, &text)?;
            info!(file = key, "saved local copy of staged file");
        }

        let object_key = self.object_key(key);
        let path = ObjectPath::from(object_key.as_str());
        let size = text.len();
        self.store
            .put_opts(&path, PutPayload::from(text.into_bytes()), opts.storage.to_put_options())
            .await?;

        let uri = self.uri(key);
        debug!(bytes = size, "staged object uploaded");
        info!("saved file {} in bucket {}", key, object_key);
        Ok(uri)
    }
}
