// Output materialization: paint program → PDF bytes, plus the profile picture
// the header block draws. PDF writing is CPU-bound; async callers run it on
// tokio::task::spawn_blocking.

pub mod image;
pub mod pdf;

pub use image::{decode_data_url, ImageError, ProfileImage};
pub use pdf::{write_pdf, RenderError};
