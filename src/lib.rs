//! # Simple Fit
//!
//! Read user-selected image files as `data:` URLs and scale them to fit a
//! bounding box, optionally keeping the aspect ratio.
//!
//! # Operations
//!
//! ```text
//! enumerate_files(list)            → Vec<File>
//! read_as_encoded_image(host, f)   → BlobDetails   (data URL + dimensions + name)
//! load_image(host, url)            → ImageHandle   (decoded image + natural dimensions)
//! scale(host, url, options)        → ScaleResult   (data URL + produced dimensions)
//! environment_supports_file_reading(host) → bool
//! ```
//!
//! Each asynchronous operation resolves once, with a value or an error. The
//! one exception is a scale request without any size constraint: [`imaging::scale`]
//! rejects it synchronously, before a decode is even attempted.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Host traits, sizing policy, operations, and the pure-Rust backend |
//! | [`data_url`] | [`EncodedImage`](data_url::EncodedImage), the base64 `data:` URL type |
//! | [`types`] | Shared value types (`Dimensions`, `BlobDetails`, `ScaleResult`) |
//! | [`config`] | `simple-fit.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Host Capabilities Behind Traits
//!
//! Decoding, off-screen surfaces and file reading are host services. The
//! operations only see them through [`imaging::ImageBackend`] and
//! [`imaging::FileSource`], so the sizing logic is exercised in tests against
//! a recording mock, and [`imaging::RustBackend`] provides the real thing with
//! the `image` crate.
//!
//! ## Callbacks Become Futures
//!
//! A host reports completion through a single-use [`imaging::Completion`];
//! the operation awaits the paired future. Delivery is exactly-once by
//! construction. A completion dropped without firing fails the call instead
//! of leaving it pending forever.
//!
//! ## Absent Is Not Zero
//!
//! Size constraints are `Option<u32>`. `None` means "no constraint";
//! `Some(0)` is a real constraint: it passes validation and is used as-is when
//! stretching. When keeping the ratio only positive constraints set the factor.
//!
//! ## No Runtime Lock-In
//!
//! The operations depend on `futures` only. Any executor can drive them;
//! [`imaging::RustBackend`] does its decoding on rayon's pool and wakes the
//! waiting future from there. The CLI uses a current-thread tokio runtime so
//! it can apply a timeout.

pub mod config;
pub mod data_url;
pub mod imaging;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
