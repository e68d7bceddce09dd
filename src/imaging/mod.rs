//! Image loading and scaling in pure Rust, with host capabilities behind traits.
//!
//! | Operation | Function | Host capability |
//! |---|---|---|
//! | **Enumerate** | [`enumerate_files`] | [`FileList`] |
//! | **Load** | [`load_image`] | [`ImageBackend::decode`] |
//! | **Convert** | [`read_as_encoded_image`] | [`FileSource`] + decode |
//! | **Scale** | [`scale`] | decode + [`ImageBackend::create_surface`] |
//! | **Probe** | [`environment_supports_file_reading`] | [`FileSource`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a scale request and export settings
//! - **Backend**: Host traits, [`Completion`] plumbing + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{
    AbortEvent, Completion, FileHandle, FileList, FileSource, ImageBackend, Pending,
    RasterSurface,
};
pub use calculations::{ScalePlan, plan_scale};
pub use operations::{
    ConvertError, FileReadError, ImageDecodeError, RenderContextError, ScaleError,
    enumerate_files, environment_supports_file_reading, load_image, read_as_encoded_image, scale,
};
pub use params::{InvalidOptionsError, OutputFormat, Quality, ResampleFilter, ScaleOptions};
pub use rust_backend::{FsFile, FsFileList, RenderSettings, RustBackend};
