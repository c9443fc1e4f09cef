use crate::error::{PuzzleError, Result};

/// The eight ways to lay a square down: four rotations, each optionally mirrored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {Id, Cw, R2, Cc, FlipRows, FlipCols, Transpose, AntiTranspose}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Id, Orientation::Cw, Orientation::R2, Orientation::Cc,
        Orientation::FlipRows, Orientation::FlipCols, Orientation::Transpose, Orientation::AntiTranspose,
    ];
}

/// Square grid of byte cells, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<u8>,
}

impl Grid {
    pub fn parse(rows: &[&str]) -> Result<Grid> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(PuzzleError::Malformed(format!("row {row:?} does not fit a {size}x{size} grid")));
        }
        Ok(Grid { size, cells: rows.iter().flat_map(|row| row.bytes()).collect() })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    pub fn count(&self, cell: u8) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    fn from_fn(size: usize, f: impl Fn(usize, usize) -> u8) -> Grid {
        let cells = (0 .. size).flat_map(|row| (0 .. size).map(move |col| (row, col)))
            .map(|(row, col)| f(row, col))
            .collect();
        Grid { size, cells }
    }

    pub fn transpose(&self) -> Grid {
        Grid::from_fn(self.size, |row, col| self.get(col, row))
    }

    /// Upside down.
    pub fn flip_rows(&self) -> Grid {
        Grid::from_fn(self.size, |row, col| self.get(self.size - 1 - row, col))
    }

    /// Left to right.
    pub fn flip_cols(&self) -> Grid {
        Grid::from_fn(self.size, |row, col| self.get(row, self.size - 1 - col))
    }

    pub fn oriented(&self, orientation: Orientation) -> Grid {
        match orientation {
            Orientation::Id => self.clone(),
            Orientation::Cw => self.flip_rows().transpose(),
            Orientation::R2 => self.flip_rows().flip_cols(),
            Orientation::Cc => self.transpose().flip_rows(),
            Orientation::FlipRows => self.flip_rows(),
            Orientation::FlipCols => self.flip_cols(),
            Orientation::Transpose => self.transpose(),
            Orientation::AntiTranspose => self.flip_rows().transpose().flip_rows(),
        }
    }

    pub fn orientations(&self) -> impl Iterator<Item = Grid> + '_ {
        Orientation::ALL.into_iter().map(|orientation| self.oriented(orientation))
    }

    pub fn top(&self) -> Vec<u8> {
        self.cells[.. self.size].to_vec()
    }

    pub fn bottom(&self) -> Vec<u8> {
        self.cells[self.cells.len() - self.size ..].to_vec()
    }

    pub fn left(&self) -> Vec<u8> {
        (0 .. self.size).map(|row| self.get(row, 0)).collect()
    }

    pub fn right(&self) -> Vec<u8> {
        (0 .. self.size).map(|row| self.get(row, self.size - 1)).collect()
    }

    /// Top, right, bottom and left borders, each read left to right or top to bottom.
    pub fn borders(&self) -> [Vec<u8>; 4] {
        [self.top(), self.right(), self.bottom(), self.left()]
    }

    /// The grid without its outermost ring of cells.
    pub fn interior(&self) -> Grid {
        let size = self.size.saturating_sub(2);
        Grid::from_fn(size, |row, col| self.get(row + 1, col + 1))
    }

    /// Lays equally sized grids out edge to edge, `layout[row][col]`.
    pub fn stitch(layout: &[Vec<Grid>]) -> Grid {
        let piece = layout.first().and_then(|row| row.first()).map_or(0, Grid::size);
        Grid::from_fn(layout.len() * piece, |row, col| {
            layout[row / piece][col / piece].get(row % piece, col % piece)
        })
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            writeln!(f, "{}", String::from_utf8_lossy(row))?;
        }
        Ok(())
    }
}
