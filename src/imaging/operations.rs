//! High-level image operations.
//!
//! These functions combine the sizing calculations with backend calls. Each
//! one returns a future that resolves exactly once, with a value or an error.
//!
//! Host work starts when the function is *called*, not when the future is
//! first polled: a decode or file read is already in flight by the time the
//! caller holds the future. Dropping the future abandons the call; the host
//! may still fire its completion, which is then ignored.
//!
//! ```text
//! scale ──validate──▶ InvalidOptionsError (returned immediately)
//!   │
//!   └─load_image──▶ ImageDecodeError
//!        │
//!        └─plan_scale──▶ Unchanged: original data URL
//!             │
//!             └─create_surface──▶ RenderContextError
//!                  │
//!                  └─draw_image + to_data_url──▶ ScaleResult
//! ```

use super::backend::{
    AbortEvent, Completion, FileHandle, FileList, FileSource, ImageBackend, Pending,
    RasterSurface,
};
use super::calculations::{ScalePlan, plan_scale};
use super::params::{InvalidOptionsError, ScaleOptions};
use crate::data_url::EncodedImage;
use crate::types::{BlobDetails, ImageHandle, ScaleResult};
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// The host could not read a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to read {name}: {event}")]
pub struct FileReadError {
    pub name: String,
    pub event: AbortEvent,
}

/// The host could not decode an image source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to decode image: {0}")]
pub struct ImageDecodeError(pub AbortEvent);

/// The host could not provide a drawable surface, or could not export it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no rendering context: {0}")]
pub struct RenderContextError(pub AbortEvent);

/// Failure of [`read_as_encoded_image`]. Inner errors pass through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error(transparent)]
    FileRead(#[from] FileReadError),
    #[error(transparent)]
    ImageDecode(#[from] ImageDecodeError),
}

/// Asynchronous failure of [`scale`]. Inner errors pass through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    #[error(transparent)]
    ImageDecode(#[from] ImageDecodeError),
    #[error(transparent)]
    RenderContext(#[from] RenderContextError),
}

/// List every file in `files`, in host order.
pub fn enumerate_files<L: FileList + ?Sized>(files: &L) -> Vec<L::File> {
    (0..files.len()).filter_map(|i| files.item(i)).collect()
}

/// Whether `host` can read files at all. Check before [`read_as_encoded_image`].
pub fn environment_supports_file_reading<H: FileSource + ?Sized>(host: &H) -> bool {
    host.supports_file_reading()
}

/// Decode `source` and report its natural dimensions.
///
/// One decode attempt, no retries.
pub fn load_image<B: ImageBackend + ?Sized>(
    backend: &B,
    source: &EncodedImage,
) -> impl Future<Output = Result<ImageHandle<B::Image>, ImageDecodeError>> + use<B> {
    let (done, pending) = Completion::channel();
    backend.decode(source, done);
    async move { pending.await.map_err(ImageDecodeError) }
}

/// Read `file` into a data URL and attach its dimensions and name.
pub fn read_as_encoded_image<'a, H>(
    host: &'a H,
    file: &H::File,
) -> impl Future<Output = Result<BlobDetails, ConvertError>> + use<'a, H>
where
    H: FileSource + ImageBackend + ?Sized,
{
    let name = file.name().to_string();
    let (done, pending) = Completion::channel();
    host.read_as_data_url(file, done);
    finish_read(host, name, pending)
}

async fn finish_read<H: ImageBackend + ?Sized>(
    host: &H,
    name: String,
    pending: Pending<EncodedImage>,
) -> Result<BlobDetails, ConvertError> {
    let base64 = match pending.await {
        Ok(encoded) => encoded,
        Err(event) => return Err(FileReadError { name, event }.into()),
    };
    let loaded = load_image(host, &base64).await?;
    debug!(
        %name,
        height = loaded.dimensions.height,
        width = loaded.dimensions.width,
        "converted file"
    );
    Ok(BlobDetails {
        base64,
        dimensions: loaded.dimensions,
        name,
    })
}

/// Scale `source` to fit `options`.
///
/// Options are validated before anything else happens: with no height and no
/// width the call fails right here, and no decode is attempted. Every other
/// failure arrives through the returned future.
///
/// When the image already fits in ratio mode the original data URL is
/// returned as-is, without touching a surface.
pub fn scale<'a, B>(
    backend: &'a B,
    source: &EncodedImage,
    options: &ScaleOptions,
) -> Result<impl Future<Output = Result<ScaleResult, ScaleError>> + use<'a, B>, InvalidOptionsError>
where
    B: ImageBackend + ?Sized,
{
    options.validate()?;
    let options = *options;
    let source = source.clone();
    let loading = load_image(backend, &source);

    Ok(finish_scale(backend, source, options, loading))
}

async fn finish_scale<B, F>(
    backend: &B,
    source: EncodedImage,
    options: ScaleOptions,
    loading: F,
) -> Result<ScaleResult, ScaleError>
where
    B: ImageBackend + ?Sized,
    F: Future<Output = Result<ImageHandle<B::Image>, ImageDecodeError>>,
{
    let loaded = loading.await?;
    match plan_scale(loaded.dimensions, &options) {
        ScalePlan::Unchanged(dimensions) => {
            debug!(
                height = dimensions.height,
                width = dimensions.width,
                "image already fits"
            );
            Ok(ScaleResult {
                base64: source,
                dimensions,
            })
        }
        ScalePlan::Render(dimensions) => {
            let mut surface = backend
                .create_surface(dimensions)
                .map_err(RenderContextError)?;
            surface.draw_image(&loaded.image, loaded.dimensions);
            let base64 = surface.to_data_url().map_err(RenderContextError)?;
            debug!(
                from_height = loaded.dimensions.height,
                from_width = loaded.dimensions.width,
                height = dimensions.height,
                width = dimensions.width,
                "scaled image"
            );
            Ok(ScaleResult { base64, dimensions })
        }
    }
}
