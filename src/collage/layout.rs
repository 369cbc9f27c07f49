// src/collage/layout.rs
// =============================================================================
// Row packing.
//
// Images are laid left to right at a common starting height. Once a row runs
// past the target width it is closed and a new one begins. Each closed row
// remembers how far it overshot (coef = row width / target width); dividing
// the row height by that coef later makes the row fit the width exactly.
//
// A row holding a single image usually means one very wide picture that would
// tower over the rest, so while there is more than one row and any row has at
// most one image, the starting height is lowered and everything is packed
// again.
// =============================================================================

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One row of the collage.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Accumulated row width divided by the target width
    pub coef: f64,
    /// Indices into the input list, left to right
    pub items: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Starting row height the final packing was made with
    pub row_height: u32,
    pub rows: Vec<Row>,
}

impl Layout {
    /// Height a row is drawn at once it is scaled to the full width.
    ///
    /// Fractional heights are truncated, never rounded up, so a row never
    /// grows past the width it was packed for.
    pub fn row_target_height(&self, row: &Row) -> u32 {
        if row.items.is_empty() || row.coef <= 0.0 {
            return 0;
        }
        (f64::from(self.row_height) / row.coef) as u32
    }

    /// Total canvas height: every non-empty row plus one margin each.
    pub fn total_height(&self, margin: u32) -> u32 {
        self.rows
            .iter()
            .filter(|row| !row.items.is_empty())
            .map(|row| self.row_target_height(row) + margin)
            .sum()
    }

    pub fn image_count(&self) -> usize {
        self.rows.iter().map(|row| row.items.len()).sum()
    }
}

/// Size of `size` after a bounded downscale that keeps the aspect ratio.
///
/// Images already inside the box are returned unchanged; nothing is enlarged.
pub fn thumbnail_size(size: Size, max_width: u32, max_height: u32) -> Size {
    if size.width <= max_width && size.height <= max_height {
        return size;
    }

    let ratio = (f64::from(max_width) / f64::from(size.width))
        .min(f64::from(max_height) / f64::from(size.height));

    let width = (f64::from(size.width) * ratio).round() as u32;
    let height = (f64::from(size.height) * ratio).round() as u32;
    Size {
        width: width.clamp(1, max_width.max(1)),
        height: height.clamp(1, max_height.max(1)),
    }
}

/// Pack `sizes` into rows for a collage `width` pixels wide.
///
/// The starting height shrinks by `step` per retry and never drops below 1,
/// so this always terminates.
pub fn pack_rows(
    sizes: &[Size],
    width: u32,
    init_height: u32,
    step: u32,
    margin: u32,
) -> Layout {
    let mut row_height = init_height.max(1);

    loop {
        let rows = place(sizes, width, row_height, margin);

        let degenerate = rows.len() > 1 && rows.iter().any(|row| row.items.len() <= 1);
        if !degenerate || row_height <= step {
            return Layout { row_height, rows };
        }

        log::debug!("Row with a single image at height {row_height}, retrying");
        row_height -= step;
    }
}

// One packing pass at a fixed row height
fn place(sizes: &[Size], width: u32, row_height: u32, margin: u32) -> Vec<Row> {
    let target = f64::from(width.max(1));
    let mut rows = Vec::new();
    let mut line = Vec::new();
    let mut x: u64 = 0;

    for (index, size) in sizes.iter().enumerate() {
        let thumb = thumbnail_size(*size, width, row_height);

        // Close the row only after it has gone past the width
        if x > u64::from(width) {
            rows.push(Row {
                coef: x as f64 / target,
                items: std::mem::take(&mut line),
            });
            x = 0;
        }

        x += u64::from(thumb.width) + u64::from(margin);
        line.push(index);
    }

    rows.push(Row {
        coef: x as f64 / target,
        items: line,
    });
    rows
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why f64::from(x) instead of x as f64?
//    - From only exists for lossless conversions (u32 -> f64 is exact)
//    - Going back (f64 -> u32) has no From, so `as` truncates on purpose
//
// 2. What does std::mem::take do?
//    - Moves the Vec out and leaves an empty one in its place
//    - Lets us hand the finished row away and keep filling a fresh one
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_keeps_small_images() {
        assert_eq!(thumbnail_size(Size::new(20, 10), 100, 25), Size::new(20, 10));
    }

    #[test]
    fn test_thumbnail_bounds_both_sides() {
        // Height bound wins
        assert_eq!(thumbnail_size(Size::new(400, 200), 1000, 25), Size::new(50, 25));
        // Width bound wins
        assert_eq!(thumbnail_size(Size::new(4000, 40), 1000, 25), Size::new(1000, 10));
    }

    #[test]
    fn test_single_row_when_everything_fits() {
        let sizes = vec![Size::new(50, 25); 4];
        let layout = pack_rows(&sizes, 1000, 25, 10, 2);

        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.rows[0].items, vec![0, 1, 2, 3]);
        assert!((layout.rows[0].coef - 0.208).abs() < 1e-9);
        assert_eq!(layout.row_height, 25);
    }

    #[test]
    fn test_rows_break_after_passing_width() {
        // Each thumbnail is 100 wide, +2 margin
        let sizes = vec![Size::new(100, 25); 25];
        let layout = pack_rows(&sizes, 1000, 25, 10, 2);

        assert_eq!(layout.rows.len(), 3);
        // 10 images reach 1020 > 1000, so the row closes before the 11th
        assert_eq!(layout.rows[0].items.len(), 10);
        assert!((layout.rows[0].coef - 1.02).abs() < 1e-9);
        assert_eq!(layout.image_count(), 25);
        assert!(layout.rows.iter().all(|row| row.items.len() > 1));
    }

    #[test]
    fn test_lonely_last_row_triggers_smaller_height() {
        // At height 40 the images are 400 wide: rows of [0,1,2] and [3]
        let sizes = vec![Size::new(400, 40); 4];
        let layout = pack_rows(&sizes, 1000, 40, 10, 2);

        assert!(layout.row_height < 40);
        assert!(layout.rows.len() == 1 || layout.rows.iter().all(|r| r.items.len() > 1));
    }

    #[test]
    fn test_reduction_is_bounded() {
        // A single huge image next to tiny ones can never be balanced
        let sizes = vec![Size::new(1000, 1000), Size::new(1, 1)];
        let layout = pack_rows(&sizes, 10, 95, 10, 2);
        assert!(layout.row_height >= 1);
        assert_eq!(layout.image_count(), 2);
    }

    #[test]
    fn test_total_height() {
        let layout = Layout {
            row_height: 25,
            rows: vec![
                Row { coef: 1.25, items: vec![0, 1] },
                Row { coef: 0.5, items: vec![2, 3] },
                Row { coef: 0.0, items: vec![] },
            ],
        };
        // 25 / 1.25 = 20, 25 / 0.5 = 50, plus a margin of 2 per non-empty row
        assert_eq!(layout.total_height(2), 74);
    }

    #[test]
    fn test_row_height_truncates() {
        let layout = Layout {
            row_height: 25,
            rows: vec![Row { coef: 1.6, items: vec![0, 1] }],
        };
        // 25 / 1.6 = 15.625
        assert_eq!(layout.row_target_height(&layout.rows[0]), 15);
        assert_eq!(layout.total_height(2), 17);
    }

    #[test]
    fn test_empty_input_has_zero_height() {
        let layout = pack_rows(&[], 1000, 25, 10, 2);
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.total_height(2), 0);
    }
}
