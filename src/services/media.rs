// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Object storage for report photos.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use dashmap::DashMap;

use crate::error::{AppError, Result};

/// Largest accepted decoded image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Bucket of report images served back under `{public_url}/media/reports/{key}`.
#[derive(Debug)]
pub struct ReportImageStore {
    public_url: String,
    objects: DashMap<String, Vec<u8>>,
}

impl ReportImageStore {
    pub fn new(public_url: &str) -> Self {
        Self {
            public_url: public_url.trim_end_matches('/').to_string(),
            objects: DashMap::new(),
        }
    }

    /// Decode a base64 image (optionally a `data:image/...;base64,` URL),
    /// store it and return its public URL.
    pub fn upload_base64(&self, encoded: &str) -> Result<String> {
        let payload = strip_data_url(encoded);
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::BadRequest(format!("Invalid image encoding: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Image is empty".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(format!(
                "Image too large: {} bytes",
                bytes.len()
            )));
        }

        let key = format!(
            "report-{}-{}.jpg",
            chrono::Utc::now().timestamp_millis(),
            &uuid::Uuid::new_v4().simple().to_string()[..6]
        );
        tracing::info!(key = %key, size = bytes.len(), "Stored report image");
        self.objects.insert(key.clone(), bytes);

        Ok(format!("{}/media/reports/{}", self.public_url, key))
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.get(key).map(|b| b.value().clone())
    }

    pub fn clear(&self) {
        self.objects.clear();
    }
}

fn strip_data_url(encoded: &str) -> &str {
    match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:image/") => data,
        _ => encoded,
    }
}
