//! Pure Rust host backend: decoding, surfaces and file reading without a browser.
//!
//! ## Crate mapping
//!
//! | Capability | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::load_from_memory` (format sniffed from bytes) |
//! | Surface | `image::RgbaImage`, transparent on allocation |
//! | Scaled blit | `image::imageops::resize` + `overlay` (source-over) |
//! | Export | `PngEncoder` / `JpegEncoder` / `WebPEncoder` (lossless) |
//! | Data URL | `base64` via [`EncodedImage`] |
//! | File list | `std::fs` + `walkdir` for directory expansion |
//!
//! Decodes and file reads run on rayon's global pool and fire their
//! completion from the worker, so the caller's future stays pending (and can
//! time out) until the work is done. A request whose future was dropped before
//! a worker picked it up is skipped. Drawing and export happen on the caller's
//! thread, inside the scale future.

use super::backend::{
    AbortEvent, Completion, FileHandle, FileList, FileSource, ImageBackend, RasterSurface,
};
use super::params::{OutputFormat, Quality, ResampleFilter};
use crate::data_url::{EncodedImage, FALLBACK_MIME};
use crate::types::{Dimensions, ImageHandle};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;
use walkdir::WalkDir;

/// Largest surface, in pixels, the backend will allocate.
///
/// Matches the canvas area ceiling of mainstream browsers (16384 x 16384).
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 268_435_456;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// How surfaces are allocated, drawn and exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub format: OutputFormat,
    pub quality: Quality,
    pub filter: ResampleFilter,
    pub max_surface_pixels: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: Quality::default(),
            filter: ResampleFilter::default(),
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-capability mapping.
#[derive(Debug, Clone, Default)]
pub struct RustBackend {
    settings: RenderSettings,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

fn decode_image(source: &EncodedImage) -> Result<ImageHandle<DynamicImage>, AbortEvent> {
    let bytes = source
        .decode_bytes()
        .map_err(|e| AbortEvent::new(format!("unreadable image source: {e}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| AbortEvent::new(format!("failed to decode image: {e}")))?;
    let dimensions = Dimensions::new(image.height(), image.width());
    Ok(ImageHandle { image, dimensions })
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;
    type Surface = RustSurface;

    fn decode(&self, source: &EncodedImage, done: Completion<ImageHandle<DynamicImage>>) {
        let source = source.clone();
        rayon::spawn(move || {
            if done.is_abandoned() {
                debug!("decode abandoned before it started");
                return;
            }
            let result = decode_image(&source);
            match &result {
                Ok(handle) => debug!(
                    height = handle.dimensions.height,
                    width = handle.dimensions.width,
                    "decoded image"
                ),
                Err(event) => debug!(%event, "image decode aborted"),
            }
            done.complete(result);
        });
    }

    fn create_surface(&self, size: Dimensions) -> Result<RustSurface, AbortEvent> {
        if size.area() == 0 {
            return Err(AbortEvent::new(format!(
                "cannot allocate a {}x{} surface",
                size.height, size.width
            )));
        }
        if size.area() > self.settings.max_surface_pixels {
            return Err(AbortEvent::new(format!(
                "{}x{} surface exceeds the {} pixel limit",
                size.height, size.width, self.settings.max_surface_pixels
            )));
        }
        debug!(height = size.height, width = size.width, "allocated surface");
        Ok(RustSurface {
            canvas: RgbaImage::new(size.width, size.height),
            settings: self.settings,
        })
    }
}

/// In-memory RGBA surface.
pub struct RustSurface {
    canvas: RgbaImage,
    settings: RenderSettings,
}

impl RasterSurface for RustSurface {
    type Image = DynamicImage;

    fn draw_image(&mut self, image: &DynamicImage, source: Dimensions) {
        let full_extent = source.width == image.width() && source.height == image.height();
        let region = if full_extent {
            image.to_rgba8()
        } else {
            image.crop_imm(0, 0, source.width, source.height).to_rgba8()
        };
        let scaled = imageops::resize(
            &region,
            self.canvas.width(),
            self.canvas.height(),
            self.settings.filter.into(),
        );
        imageops::overlay(&mut self.canvas, &scaled, 0, 0);
    }

    fn to_data_url(&self) -> Result<EncodedImage, AbortEvent> {
        let mut buf = Vec::new();
        let format = self.settings.format;
        let written = match format {
            OutputFormat::Png => DynamicImage::ImageRgba8(self.canvas.clone())
                .write_with_encoder(PngEncoder::new(&mut buf)),
            OutputFormat::Jpeg => {
                // JPEG has no alpha; transparent pixels flatten to black
                let quality = self.settings.quality.value() as u8;
                DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(self.canvas.clone()).to_rgb8())
                    .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
            }
            OutputFormat::Webp => DynamicImage::ImageRgba8(self.canvas.clone())
                .write_with_encoder(WebPEncoder::new_lossless(&mut buf)),
        };
        written.map_err(|e| AbortEvent::new(format!("{format:?} export failed: {e}")))?;
        debug!(bytes = buf.len(), mime = format.mime(), "exported surface");
        Ok(EncodedImage::from_bytes(format.mime(), &buf))
    }
}

/// A file on the local filesystem, standing in for a user-selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsFile {
    path: PathBuf,
    name: String,
}

impl FsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for FsFile {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered list of [`FsFile`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FsFileList {
    files: Vec<FsFile>,
}

impl FsFileList {
    /// Build a list from paths, keeping their order.
    ///
    /// Directories are expanded in place to the image files beneath them,
    /// sorted by file name. Paths that do not exist are an error.
    pub fn from_paths<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
    ) -> std::io::Result<Self> {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if std::fs::metadata(path)?.is_dir() {
                for entry in WalkDir::new(path).sort_by_file_name() {
                    let entry = entry?;
                    if entry.file_type().is_file() && has_supported_extension(entry.path()) {
                        files.push(FsFile::new(entry.path()));
                    }
                }
            } else {
                files.push(FsFile::new(path));
            }
        }
        Ok(Self { files })
    }
}

impl FileList for FsFileList {
    type File = FsFile;

    fn len(&self) -> usize {
        self.files.len()
    }

    fn item(&self, index: usize) -> Option<FsFile> {
        self.files.get(index).cloned()
    }
}

/// Mime type a browser would report for the file: by extension, then by content.
fn mime_for(path: &Path, bytes: &[u8]) -> &'static str {
    ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(bytes))
        .map(|f| f.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

impl FileSource for RustBackend {
    type File = FsFile;

    fn supports_file_reading(&self) -> bool {
        true
    }

    fn read_as_data_url(&self, file: &FsFile, done: Completion<EncodedImage>) {
        let file = file.clone();
        rayon::spawn(move || {
            if done.is_abandoned() {
                debug!(name = %file.name, "read abandoned before it started");
                return;
            }
            done.complete(read_file(&file));
        });
    }
}

fn read_file(file: &FsFile) -> Result<EncodedImage, AbortEvent> {
    match std::fs::read(&file.path) {
        Ok(bytes) => {
            let mime = mime_for(&file.path, &bytes);
            debug!(name = %file.name, bytes = bytes.len(), mime, "read file");
            Ok(EncodedImage::from_bytes(mime, &bytes))
        }
        Err(e) => {
            debug!(name = %file.name, error = %e, "file read aborted");
            Err(AbortEvent::new(format!(
                "failed to read {}: {e}",
                file.path.display()
            )))
        }
    }
}
