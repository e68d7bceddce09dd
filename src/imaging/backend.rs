//! Host capability traits and the completion plumbing that bridges them to futures.
//!
//! The operations in [`operations`](super::operations) never touch pixels or
//! files directly. They talk to a host through four narrow seams:
//!
//! | Capability | Trait | Browser equivalent |
//! |---|---|---|
//! | Decode an image source | [`ImageBackend::decode`] | `new Image()` + `onload` / `onabort` |
//! | Allocate an off-screen raster | [`ImageBackend::create_surface`] | `<canvas>` + `getContext("2d")` |
//! | Draw and export | [`RasterSurface`] | `drawImage` + `toDataURL` |
//! | Read a selected file | [`FileSource`], [`FileList`], [`FileHandle`] | `FileReader.readAsDataURL`, `FileList` |
//!
//! Hosts report asynchronous results through a [`Completion`], a single-use
//! callback: `complete` consumes it, so a result can be delivered at most once.
//! The operation side awaits the paired [`Pending`] future.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the recording
//! `MockBackend` in this module's test submodule.

use crate::data_url::EncodedImage;
use crate::types::{Dimensions, ImageHandle};
use futures::FutureExt;
use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;

/// The event or reason a host reported when it aborted an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AbortEvent(pub String);

impl AbortEvent {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Reported when the host drops a [`Completion`] without delivering a result.
    pub fn dropped() -> Self {
        Self("host dropped the request without completing it".to_string())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Single-use callback through which a host delivers one result.
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<Result<T, AbortEvent>>,
}

impl<T> Completion<T> {
    /// Create a completion and the future that resolves when it fires.
    pub fn channel() -> (Self, Pending<T>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, Pending { rx })
    }

    pub fn complete(self, result: Result<T, AbortEvent>) {
        // The receiver is gone when the caller dropped the operation future;
        // nobody is left to notify.
        let _ = self.tx.send(result);
    }

    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn abort(self, event: AbortEvent) {
        self.complete(Err(event));
    }

    /// Whether the waiting side has already gone away.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_canceled()
    }
}

/// Future side of a [`Completion`].
///
/// Resolves with the delivered result, or with [`AbortEvent::dropped`] if the
/// completion was dropped unfired.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T, AbortEvent>>,
}

impl<T> Future for Pending<T> {
    type Output = Result<T, AbortEvent>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx.poll_unpin(cx).map(|settled| {
            settled.unwrap_or_else(|_| {
                tracing::warn!("host completion dropped before delivering a result");
                Err(AbortEvent::dropped())
            })
        })
    }
}

/// Image decode and raster capabilities.
pub trait ImageBackend {
    /// Host-decoded image object.
    type Image;
    /// Off-screen drawing surface.
    type Surface: RasterSurface<Image = Self::Image>;

    /// Start decoding `source`. The host must eventually fire `done` with the
    /// decoded image and its natural dimensions, or abort it.
    fn decode(&self, source: &EncodedImage, done: Completion<ImageHandle<Self::Image>>);

    /// Allocate a surface of exactly `size` pixels with a usable drawing context.
    fn create_surface(&self, size: Dimensions) -> Result<Self::Surface, AbortEvent>;
}

/// A drawable raster surface that can be exported as a data URL.
pub trait RasterSurface {
    type Image;

    /// Blit the full `source` extent of `image` onto the full surface extent.
    fn draw_image(&mut self, image: &Self::Image, source: Dimensions);

    /// Export the current surface contents.
    fn to_data_url(&self) -> Result<EncodedImage, AbortEvent>;
}

/// One user-selected file.
pub trait FileHandle {
    /// Client-side file name.
    fn name(&self) -> &str;
}

/// An indexed snapshot of user-selected files, in host order.
pub trait FileList {
    type File: FileHandle;

    fn len(&self) -> usize;

    fn item(&self, index: usize) -> Option<Self::File>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: FileHandle + Clone> FileList for Vec<F> {
    type File = F;

    fn len(&self) -> usize {
        <[F]>::len(self)
    }

    fn item(&self, index: usize) -> Option<F> {
        self.get(index).cloned()
    }
}

/// Raw file reading capability.
pub trait FileSource {
    type File: FileHandle;

    /// Capability probe: can this host read files at all?
    fn supports_file_reading(&self) -> bool;

    /// Start reading `file` as a base64 data URL, firing `done` once.
    fn read_as_data_url(&self, file: &Self::File, done: Completion<EncodedImage>);
}
