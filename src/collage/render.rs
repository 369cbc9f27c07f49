// src/collage/render.rs
// =============================================================================
// Paints a packed layout onto a canvas and saves it.
//
// Steps:
// 1. Read each image's dimensions (unreadable files are dropped)
// 2. Pack the sizes into rows (see layout.rs)
// 3. Allocate a canvas of width x total height, filled with the background
// 4. For each row, scale every image to the row's height and paste it
// 5. Save; the file format follows the output extension
//
// Downloaded images always end in .jpeg even when the bytes are PNG or GIF,
// so files are opened with format sniffing instead of trusting extensions.
// =============================================================================

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use log::{debug, info, warn};
use serde::Serialize;

use super::layout::{pack_rows, Size};
use crate::config::CollageConfig;
use crate::error::CollageError;

/// Canvas color behind and between the images.
pub const BACKGROUND: Rgb<u8> = Rgb([248, 248, 255]);

/// What was produced.
#[derive(Debug, Clone, Serialize)]
pub struct CollageSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    pub images: usize,
    /// Starting row height after compaction
    pub row_height: u32,
}

/// Build a collage from `paths` (in the given order) and save it to `output`.
pub fn make_collage(
    paths: &[PathBuf],
    output: &Path,
    config: &CollageConfig,
) -> Result<CollageSummary, CollageError> {
    if paths.is_empty() {
        return Err(CollageError::NoImages);
    }

    let mut usable = Vec::with_capacity(paths.len());
    let mut sizes = Vec::with_capacity(paths.len());
    for path in paths {
        match read_dimensions(path) {
            Ok(size) => {
                usable.push(path.as_path());
                sizes.push(size);
            }
            Err(e) => warn!("An image could not be used: {e}"),
        }
    }
    if usable.is_empty() {
        return Err(CollageError::NoImages);
    }

    let width = config.width;
    let margin = config.margin;
    let layout = pack_rows(
        &sizes,
        width,
        config.init_height,
        config.row_height_step,
        margin,
    );
    debug!(
        "Packed {} image(s) into {} row(s) at height {}",
        layout.image_count(),
        layout.rows.len(),
        layout.row_height
    );

    let height = layout.total_height(margin);
    if height == 0 {
        return Err(CollageError::ZeroHeight);
    }

    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    let mut y: u32 = 0;
    for row in layout.rows.iter().filter(|row| !row.items.is_empty()) {
        let target_height = layout.row_target_height(row);
        // Rows thinner than a pixel only add their margin
        if target_height > 0 {
            let max_width = ((f64::from(width) / row.coef) as u32).max(1);
            let mut x: u32 = 0;
            for &index in &row.items {
                let img = open_image(usable[index])?;
                let placed = scale_to_row(&img, target_height, max_width);
                imageops::overlay(&mut canvas, &placed.to_rgb8(), i64::from(x), i64::from(y));
                x += placed.width() + margin;
            }
        }
        y += target_height + margin;
    }

    canvas.save(output).map_err(|source| CollageError::Image {
        path: output.display().to_string(),
        source,
    })?;
    info!("Collage saved to {} ({}x{})", output.display(), width, height);

    Ok(CollageSummary {
        output: output.to_path_buf(),
        width,
        height,
        rows: layout.rows.iter().filter(|row| !row.items.is_empty()).count(),
        images: layout.image_count(),
        row_height: layout.row_height,
    })
}

// Enlarging needs a smooth filter; shrinking can use the faster thumbnail
fn scale_to_row(img: &DynamicImage, target_height: u32, max_width: u32) -> DynamicImage {
    let k = f64::from(target_height) / f64::from(img.height().max(1));
    if k > 1.0 {
        let new_width = ((f64::from(img.width()) * k) as u32).max(1);
        let new_height = ((f64::from(img.height()) * k) as u32).max(1);
        img.resize_exact(new_width, new_height, FilterType::Lanczos3)
    } else {
        img.thumbnail(max_width, target_height)
    }
}

fn read_dimensions(path: &Path) -> Result<Size, CollageError> {
    let (width, height) = reader(path)?
        .into_dimensions()
        .map_err(|source| image_error(path, source))?;
    Ok(Size::new(width, height))
}

fn open_image(path: &Path) -> Result<DynamicImage, CollageError> {
    reader(path)?
        .decode()
        .map_err(|source| image_error(path, source))
}

fn reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, CollageError> {
    let io_error = |source| CollageError::Io {
        path: path.display().to_string(),
        source,
    };
    ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)
}

fn image_error(path: &Path, source: image::ImageError) -> CollageError {
    CollageError::Image {
        path: path.display().to_string(),
        source,
    }
}
