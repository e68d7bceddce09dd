//! Shared test utilities: synthetic images, in memory and on disk.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encode a `height` x `width` RGBA gradient as PNG bytes.
pub fn gradient_png(height: u32, width: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Write a gradient PNG named `name` into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, height: u32, width: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, gradient_png(height, width)).unwrap();
    path
}
