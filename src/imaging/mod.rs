//! Image inspection and placement. Pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` (header only) |
//! | **Place** | [`calculate_placement`] (pure arithmetic, EMU) |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Calculations**: Pure functions for placement math (unit testable)

pub mod backend;
mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{GeometryError, Placement, calculate_placement, pixels_to_emu};
pub use rust_backend::{RustBackend, supported_input_extensions};
