//! I/O helpers for RGBA frames and JSON reports.
//!
//! - `load_rgba_image`: read a PNG/JPEG/etc. into an owned RGBA buffer.
//! - `write_json_file`: pretty-print a serializable value to disk.

use std::fs;
use std::path::Path;

use serde::Serialize;

use super::rgba::ImageRgba8;
use crate::error::Result;

/// Owned RGBA frame with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct RgbaBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Construct an owned frame from raw RGBA bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        ImageRgba8::new(&data, width, height)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageRgba8` view
    pub fn as_view(&self) -> ImageRgba8<'_> {
        ImageRgba8 {
            w: self.width,
            h: self.height,
            data: &self.data,
        }
    }
}

/// Load an image from disk and convert to RGBA bytes.
pub fn load_rgba_image(path: &Path) -> Result<RgbaBuffer> {
    let img = image::open(path)?.into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    RgbaBuffer::new(width, height, img.into_raw())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
