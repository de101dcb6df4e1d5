//! WebGPU rendering module
//!
//! Everything is drawn as flat-colored triangles in world space; the
//! pipeline maps them to the screen through the fit viewport.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
