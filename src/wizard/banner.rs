use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

pub const MAX_BANNER_BYTES: usize = 5 * 1024 * 1024;

const ACCEPTED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BannerError {
    #[error("Banner must be a JPEG, PNG, GIF, or WebP image.")]
    UnsupportedType(String),
    #[error("Image must be under 5MB.")]
    TooLarge(usize),
}

/// The image shown at the top of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Banner {
    #[default]
    None,
    Uploaded { data_url: String },
    Linked(String),
}

impl Banner {
    pub fn from_pasted(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Banner::None
        } else {
            Banner::Linked(trimmed.to_string())
        }
    }

    pub fn from_upload(mime: &str, bytes: &[u8]) -> Result<Self, BannerError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !ACCEPTED_TYPES.contains(&mime.as_str()) {
            return Err(BannerError::UnsupportedType(mime));
        }
        if bytes.len() > MAX_BANNER_BYTES {
            return Err(BannerError::TooLarge(bytes.len()));
        }
        Ok(Banner::Uploaded {
            data_url: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
        })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Banner::None => None,
            Banner::Uploaded { data_url } => Some(data_url),
            Banner::Linked(url) => Some(url),
        }
    }
}
