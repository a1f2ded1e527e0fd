//! Album cover download for embedding.
//!
//! Covers come from the image URLs attached to the matched album. A failed
//! download never blocks tagging: the caller logs it and writes the text
//! fields without a picture.

mod client;

pub use client::CoverArtClient;

/// Downloaded cover art ready to embed
#[derive(Debug, Clone, PartialEq)]
pub struct CoverArt {
    /// Image data (JPEG or PNG)
    pub data: Vec<u8>,
    /// MIME type (image/jpeg or image/png)
    pub mime_type: String,
    /// Source URL
    pub url: String,
}

/// MIME type for image data, from the server's Content-Type when it names
/// an image, otherwise from the leading magic bytes.
pub fn detect_mime_type(content_type: Option<&str>, data: &[u8]) -> String {
    if let Some(ct) = content_type {
        let essence = ct.split(';').next().unwrap_or_default().trim();
        if essence.starts_with("image/") {
            return essence.to_ascii_lowercase();
        }
    }

    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png".to_string()
    } else {
        "image/jpeg".to_string()
    }
}
