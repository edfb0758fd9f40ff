//! Profile picture decoding: `data:` URL → raw RGB pixels for the PDF writer.

use base64::prelude::*;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Longest edge kept in the exported PDF; larger pictures are downscaled.
const MAX_EDGE_PX: u32 = 512;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Profile picture must be a base64 data URL")]
    NotDataUrl,

    #[error("Unsupported profile picture type '{0}'. Use PNG or JPEG.")]
    UnsupportedType(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Could not decode profile picture: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded picture, 8-bit RGB, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Decodes `data:image/png;base64,...` or `data:image/jpeg;base64,...`.
pub fn decode_data_url(url: &str) -> Result<ProfileImage, ImageError> {
    let (meta, payload) = url
        .trim()
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or(ImageError::NotDataUrl)?;
    let mime = meta.strip_suffix(";base64").ok_or(ImageError::NotDataUrl)?;

    let format = match mime.to_ascii_lowercase().as_str() {
        "image/png" => ImageFormat::Png,
        "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
        other => return Err(ImageError::UnsupportedType(other.to_string())),
    };

    let bytes = BASE64_STANDARD.decode(payload.trim())?;
    let mut decoded = image::load_from_memory_with_format(&bytes, format)?;
    if decoded.width() > MAX_EDGE_PX || decoded.height() > MAX_EDGE_PX {
        decoded = decoded.thumbnail(MAX_EDGE_PX, MAX_EDGE_PX);
    }
    Ok(into_profile_image(decoded))
}

fn into_profile_image(decoded: DynamicImage) -> ProfileImage {
    let rgb = decoded.to_rgb8();
    ProfileImage {
        width: rgb.width(),
        height: rgb.height(),
        rgb: rgb.into_raw(),
    }
}
