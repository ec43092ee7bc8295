//! Partitions the screen into one cell per button.

use tracing::debug;

use crate::config::LayoutMode;
use crate::error::LayoutError;

/// Axis-aligned pixel rectangle, `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Cell {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Hit-test. Points on the right or bottom edge belong to the neighbour.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let (px, py) = (i64::from(px), i64::from(py));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        px >= x && px < x + i64::from(self.width) && py >= y && py < y + i64::from(self.height)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn intersects(&self, other: &Cell) -> bool {
        let (ax1, ay1) = (self.x + self.width, self.y + self.height);
        let (bx1, by1) = (other.x + other.width, other.y + other.height);
        self.x < bx1 && other.x < ax1 && self.y < by1 && other.y < ay1
    }
}

/// Grid shape as `(rows, columns)`.
pub type Shape = (usize, usize);

pub fn layout(
    buttons: usize,
    mode: LayoutMode,
    width: u32,
    height: u32,
) -> Result<Vec<Cell>, LayoutError> {
    if buttons == 0 {
        return Err(LayoutError::NoButtons);
    }
    if width == 0 || height == 0 {
        return Err(LayoutError::EmptyScreen { width, height });
    }

    let shape = match mode {
        LayoutMode::Horizontal => (1, buttons),
        LayoutMode::Vertical => (buttons, 1),
        LayoutMode::Grid => grid_shape(buttons),
    };
    place(buttons, shape, width, height)
}

/// Places `buttons` row-major into a `(rows, columns)` grid covering the
/// screen. Fails rather than dropping buttons the shape cannot hold.
pub fn place(
    buttons: usize,
    (rows, columns): Shape,
    width: u32,
    height: u32,
) -> Result<Vec<Cell>, LayoutError> {
    if rows * columns < buttons {
        return Err(LayoutError::Capacity {
            buttons,
            rows,
            columns,
        });
    }

    let xs = boundaries(width, columns);
    let ys = boundaries(height, rows);
    debug!(rows, columns, ?xs, ?ys, "computed layout boundaries");

    let cells = (0..buttons)
        .map(|i| {
            let (row, col) = (i / columns, i % columns);
            Cell::new(xs[col], ys[row], xs[col + 1] - xs[col], ys[row + 1] - ys[row])
        })
        .collect();
    Ok(cells)
}

/// `parts + 1` monotonic boundaries from 0 to `extent`, each the rounded
/// value of `i * extent / parts`.
pub fn boundaries(extent: u32, parts: usize) -> Vec<u32> {
    let extent = u64::from(extent);
    let parts = parts.max(1) as u64;
    (0..=parts)
        .map(|i| ((2 * i * extent + parts) / (2 * parts)) as u32)
        .collect()
}

/// Closest-to-square factor pair for `buttons`.
///
/// Primes above 4 would otherwise collapse into a single row, so they are
/// shaped as `buttons + 1` and leave the last slot empty.
pub fn grid_shape(buttons: usize) -> Shape {
    let slots = if buttons > 4 && is_prime(buttons) {
        buttons + 1
    } else {
        buttons
    };
    let mut shape = (1, slots);
    let mut i = 1;
    while i * i <= slots {
        if slots % i == 0 {
            shape = (i, slots / i);
        }
        i += 1;
    }
    shape
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_disjoint(cells: &[Cell]) {
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    fn total_area(cells: &[Cell]) -> u64 {
        cells.iter().map(Cell::area).sum()
    }

    #[test]
    fn single_button_covers_screen() {
        for mode in [LayoutMode::Horizontal, LayoutMode::Vertical, LayoutMode::Grid] {
            let cells = layout(1, mode, 320, 240).unwrap();
            assert_eq!(cells, vec![Cell::new(0, 0, 320, 240)]);
        }
    }

    #[test]
    fn horizontal_two_buttons() {
        let cells = layout(2, LayoutMode::Horizontal, 200, 100).unwrap();
        assert_eq!(cells, vec![Cell::new(0, 0, 100, 100), Cell::new(100, 0, 100, 100)]);
    }

    #[test]
    fn vertical_three_buttons_round_boundaries() {
        let cells = layout(3, LayoutMode::Vertical, 320, 100).unwrap();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0, 320, 33),
                Cell::new(0, 33, 320, 34),
                Cell::new(0, 67, 320, 33),
            ]
        );
    }

    #[test]
    fn one_d_layouts_partition_screen() {
        for n in 1..=40 {
            for mode in [LayoutMode::Horizontal, LayoutMode::Vertical] {
                let cells = layout(n, mode, 317, 239).unwrap();
                assert_eq!(cells.len(), n);
                assert_disjoint(&cells);
                assert_eq!(total_area(&cells), 317 * 239, "n={n} mode={mode:?}");
            }
        }
    }

    #[test]
    fn grid_partitions_screen_when_exact() {
        for n in 1..=40 {
            let (rows, columns) = grid_shape(n);
            let cells = layout(n, LayoutMode::Grid, 480, 321).unwrap();
            assert_eq!(cells.len(), n);
            assert_disjoint(&cells);
            if rows * columns == n {
                assert_eq!(total_area(&cells), 480 * 321, "n={n}");
            } else {
                assert!(total_area(&cells) < 480 * 321);
            }
        }
    }

    #[test]
    fn grid_six_is_two_by_three_row_major() {
        assert_eq!(grid_shape(6), (2, 3));
        let cells = layout(6, LayoutMode::Grid, 300, 200).unwrap();
        assert_eq!(cells[0], Cell::new(0, 0, 100, 100));
        assert_eq!(cells[2], Cell::new(200, 0, 100, 100));
        assert_eq!(cells[3], Cell::new(0, 100, 100, 100));
        assert_eq!(cells[5], Cell::new(200, 100, 100, 100));
    }

    #[test]
    fn grid_seven_pads_to_two_by_four() {
        assert_eq!(grid_shape(7), (2, 4));
        let cells = layout(7, LayoutMode::Grid, 400, 200).unwrap();
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[6], Cell::new(200, 100, 100, 100));
        // The eighth slot stays empty.
        assert!(!cells.iter().any(|c| c.contains(350, 150)));
    }

    #[test]
    fn small_primes_stay_in_one_row() {
        assert_eq!(grid_shape(2), (1, 2));
        assert_eq!(grid_shape(3), (1, 3));
        assert_eq!(grid_shape(5), (2, 3));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(12), (3, 4));
        assert_eq!(grid_shape(13), (2, 7));
    }

    #[test]
    fn zero_buttons_is_an_error() {
        assert_eq!(
            layout(0, LayoutMode::Grid, 320, 240),
            Err(LayoutError::NoButtons)
        );
    }

    #[test]
    fn empty_screen_is_an_error() {
        assert!(matches!(
            layout(2, LayoutMode::Horizontal, 0, 240),
            Err(LayoutError::EmptyScreen { .. })
        ));
    }

    #[test]
    fn shape_too_small_is_rejected() {
        assert_eq!(
            place(5, (2, 2), 320, 240),
            Err(LayoutError::Capacity {
                buttons: 5,
                rows: 2,
                columns: 2,
            })
        );
        assert_eq!(place(4, (2, 2), 320, 240).unwrap().len(), 4);
    }

    #[test]
    fn grid_shape_always_holds_every_button() {
        for n in 1..=64 {
            let (rows, columns) = grid_shape(n);
            assert!(rows * columns >= n, "{n} -> {rows}x{columns}");
        }
    }

    #[test]
    fn more_buttons_than_pixels_still_places_everything() {
        let cells = layout(5, LayoutMode::Horizontal, 3, 10).unwrap();
        assert_eq!(cells.len(), 5);
        assert_eq!(cells.last().unwrap().x + cells.last().unwrap().width, 3);
        assert!(cells.windows(2).all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn hit_test_is_half_open() {
        let cell = Cell::new(100, 0, 100, 100);
        assert!(cell.contains(100, 0));
        assert!(cell.contains(199, 99));
        assert!(!cell.contains(200, 50));
        assert!(!cell.contains(150, 100));
        assert!(!cell.contains(-1, 10));
    }
}
