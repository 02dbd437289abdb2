//! Image loading: path, encoded bytes or an already-decoded image in,
//! dithered [`Bitmap`] out.

use std::fmt;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::bitmap::Bitmap;
use super::dither;
use crate::error::DirectiveError;

/// Where an image comes from
#[derive(Clone)]
pub enum ImageSource {
    /// Image file on disk (PNG, JPEG, GIF, BMP, ...)
    Path(PathBuf),
    /// Encoded image file contents
    Bytes(Vec<u8>),
    /// Already decoded
    Decoded(DynamicImage),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            ImageSource::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            ImageSource::Decoded(img) => {
                let (w, h) = img.dimensions();
                write!(f, "Decoded({w}x{h})")
            }
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(p) => write!(f, "{}", p.display()),
            ImageSource::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            ImageSource::Decoded(img) => {
                let (w, h) = img.dimensions();
                write!(f, "<{w}x{h} image>")
            }
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        ImageSource::Path(p)
    }
}

impl From<&Path> for ImageSource {
    fn from(p: &Path) -> Self {
        ImageSource::Path(p.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(p: &str) -> Self {
        ImageSource::Path(PathBuf::from(p))
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(b: Vec<u8>) -> Self {
        ImageSource::Bytes(b)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        ImageSource::Decoded(img)
    }
}

impl ImageSource {
    /// Decode the image.
    pub fn decode(&self) -> Result<DynamicImage, DirectiveError> {
        let img = match self {
            ImageSource::Path(path) => image::open(path).map_err(|e| {
                DirectiveError::ImageUnreadable(format!("{}: {e}", path.display()))
            })?,
            ImageSource::Bytes(bytes) => image::load_from_memory(bytes)
                .map_err(|e| DirectiveError::ImageUnreadable(e.to_string()))?,
            ImageSource::Decoded(img) => img.clone(),
        };

        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(DirectiveError::ImageUnreadable(format!(
                "{self} has no pixels"
            )));
        }
        Ok(img)
    }
}

/// Decode, shrink to at most `max_width` dots, and dither.
///
/// Narrower images keep their size; wider ones are scaled down with their
/// aspect ratio preserved.
pub fn load(source: &ImageSource, max_width: u32) -> Result<Bitmap, DirectiveError> {
    let img = source.decode()?;
    let (w, h) = img.dimensions();
    debug!(source = %source, width = w, height = h, "image decoded");

    let img = if max_width > 0 && w > max_width {
        let ratio = max_width as f64 / w as f64;
        let new_h = ((h as f64 * ratio) as u32).max(1);
        info!(from = ?(w, h), to = ?(max_width, new_h), "image resized to paper width");
        img.resize_exact(max_width, new_h, FilterType::Triangle)
    } else {
        img
    };

    Ok(dither::dither(&img.to_rgba8()))
}
