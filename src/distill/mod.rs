//! Page distillation: reduce a live, multi-frame page to a compact,
//! filtered, addressable summary, and resolve issued identifiers back to
//! live elements.
//!
//! The pipeline is `frames` (frame-tree enumeration) feeding
//! `distiller` (per-frame candidate collection, `visibility` filtering,
//! `ids` allocation, `offset` translation, fragment rendering), with
//! `resolver` as the reverse mapping.

pub mod distiller;
pub mod frames;
pub mod ids;
pub mod offset;
pub mod resolver;
pub mod visibility;

pub use distiller::{MARKER_ATTR, distill};
pub use frames::{FrameNode, MAX_FRAME_DEPTH};
pub use ids::IdAllocator;
pub use offset::FrameOffset;
pub use resolver::{ActionTarget, ElementResolver};
