//! Rendering utilities for notification surfaces.

#![forbid(unsafe_code)]

mod message;
mod model;

pub use message::render_message;
pub use model::{FileListing, RenderableFile, RenderableReport, RenderableStatus, RenderableVerdict};
