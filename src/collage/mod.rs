// src/collage/mod.rs
// =============================================================================
// This module packs a folder of images into a single collage picture.
//
// Submodules:
// - layout: pure row-packing arithmetic on image sizes (no files touched)
// - render: opens the images, scales them and paints them onto a canvas
// =============================================================================

mod layout;
mod render;

pub use layout::{pack_rows, thumbnail_size, Layout, Row, Size};
pub use render::{make_collage, CollageSummary, BACKGROUND};
