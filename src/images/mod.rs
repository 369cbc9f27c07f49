// src/images/mod.rs
// =============================================================================
// This module turns the image references found by the crawler into files.
//
// Submodules:
// - naming: derives a safe, deduplicated file name from alt text
// - download: fetches image bytes, filters junk, drops duplicate content
// - directory: the small set of folder operations the program needs
// =============================================================================

mod directory;
mod download;
mod naming;

pub use directory::{clear_dir, ensure_dir, list_images};
pub use download::{checksum_file, ChecksumSet, DownloadReport, Downloader};
pub use naming::{is_unnamed, name_for, ImageRecord, IMAGE_EXTENSION};
