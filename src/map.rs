//! Layer 0: Occupancy grid
//!
//! An immutable wall/empty grid. Cells are addressed in grid units; world
//! coordinates are converted by the caller using the tile size.

use std::fmt;

/// Contents of a single in-bounds grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

/// Reasons a map is rejected at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// No rows, or rows with zero cells
    Empty,
    /// A row whose length differs from the first row
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Unrecognized character in a text map
    InvalidCell { row: usize, col: usize, ch: char },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Empty => write!(f, "map has no cells"),
            MapError::RaggedRow { row, expected, found } => write!(
                f,
                "row {} has {} cells, expected {}",
                row, found, expected
            ),
            MapError::InvalidCell { row, col, ch } => {
                write!(f, "invalid map character {:?} at row {}, col {}", ch, row, col)
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Row-major occupancy grid: index = y * width + x
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl GridMap {
    /// Build a map from numeric rows (0 = empty, anything else = wall).
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row.iter().map(|&v| if v == 0 { Cell::Empty } else { Cell::Wall }));
        }

        Ok(Self { width, height, cells })
    }

    /// Parse a text map, one line per row.
    ///
    /// `#` and `1` are walls; `.`, `0` and space are empty. Leading and
    /// trailing blank lines are ignored, everything else must be rectangular.
    /// Error positions are line numbers in `text`.
    pub fn from_char_rows(text: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = text.lines().collect();
        let blank = |l: &&str| l.trim().is_empty();
        let first = lines.iter().position(|l| !blank(l)).unwrap_or(lines.len());
        let end = lines.iter().rposition(|l| !blank(l)).map(|i| i + 1).unwrap_or(first);

        let mut rows = Vec::with_capacity(end - first);
        for (y, line) in lines.iter().enumerate().take(end).skip(first) {
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let v = match ch {
                    '#' | '1' => 1,
                    '.' | '0' | ' ' => 0,
                    _ => return Err(MapError::InvalidCell { row: y, col: x, ch }),
                };
                row.push(v);
            }
            if let Some(expected) = rows.first().map(Vec::len) {
                if row.len() != expected {
                    return Err(MapError::RaggedRow { row: y, expected, found: row.len() });
                }
            }
            rows.push(row);
        }

        Self::new(rows)
    }

    /// Small 8x6 level with a few interior pillars
    pub fn demo() -> Self {
        const DEMO: [[u8; 8]; 6] = [
            [1, 1, 1, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 1, 0, 1, 0, 0, 1],
            [1, 0, 1, 0, 1, 0, 0, 1],
            [1, 0, 0, 0, 0, 1, 0, 1],
            [1, 1, 1, 1, 1, 1, 1, 1],
        ];
        let cells = DEMO
            .iter()
            .flatten()
            .map(|&v| if v == 0 { Cell::Empty } else { Cell::Wall })
            .collect();
        Self { width: 8, height: 6, cells }
    }

    /// A walled room of the given size with an empty interior
    pub fn bordered(width: usize, height: usize) -> Result<Self, MapError> {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                        u8::from(edge)
                    })
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at grid coordinates, `None` when outside the map
    #[inline]
    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        self.cell(x, y) == Some(Cell::Wall)
    }

    /// Grid cell containing a world-space point
    #[inline]
    pub fn cell_at_world(&self, wx: f32, wy: f32, tile_size: f32) -> Option<Cell> {
        let (gx, gy) = world_to_grid(wx, wy, tile_size);
        self.cell(gx, gy)
    }
}

/// floor(coord / tile_size) for both axes
#[inline]
pub fn world_to_grid(wx: f32, wy: f32, tile_size: f32) -> (i64, i64) {
    ((wx / tile_size).floor() as i64, (wy / tile_size).floor() as i64)
}

/// Converts a map to a string for debugging
pub fn map_to_string(map: &GridMap) -> String {
    let mut result = String::with_capacity((map.width + 1) * map.height);
    for y in 0..map.height as i64 {
        for x in 0..map.width as i64 {
            result.push(if map.is_wall(x, y) { '#' } else { '.' });
        }
        result.push('\n');
    }
    result
}
