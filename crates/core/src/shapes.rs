//! Shape library - canonical piece matrices and display identity
//!
//! Each kind is stored once, in its spawn orientation, as a square cell
//! matrix (2x2 for O, 4x4 for I, 3x3 otherwise). Other orientations are not
//! tabulated; they are derived on demand with [`ShapeMatrix::rotate_cw`] and
//! [`ShapeMatrix::rotate_ccw`].

use crate::types::PieceKind;

/// Largest matrix edge of any kind (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square occupancy matrix of a piece in one orientation.
///
/// Stored inline in a fixed 4x4 array; only the top-left `size x size` block
/// is meaningful and everything outside it stays `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl ShapeMatrix {
    /// Build a matrix from rows of 0/1 values.
    ///
    /// Panics if `rows` is not square or larger than 4x4; only called on
    /// the static tables below and in tests.
    pub fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(N > 0 && N <= MAX_SHAPE_SIZE, "shape size out of range");
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                cells[y][x] = v != 0;
            }
        }
        Self {
            size: N as u8,
            cells,
        }
    }

    /// Edge length of the matrix
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether the cell at column `x`, row `y` is occupied
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.size as usize && y < self.size as usize && self.cells[y][x]
    }

    /// Occupied cells as `(x, y)` offsets from the top-left anchor
    pub fn occupied(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let n = self.size as usize;
        (0..n).flat_map(move |y| {
            (0..n).filter_map(move |x| self.cells[y][x].then_some((x as i8, y as i8)))
        })
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.occupied().count()
    }

    /// Rotate 90° clockwise: `dst[x][h-1-y] = src[y][x]`
    pub fn rotate_cw(&self) -> Self {
        let h = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for y in 0..h {
            for x in 0..h {
                cells[x][h - 1 - y] = self.cells[y][x];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Rotate 90° counter-clockwise: `dst[w-1-x][y] = src[y][x]`
    pub fn rotate_ccw(&self) -> Self {
        let w = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for y in 0..w {
            for x in 0..w {
                cells[w - 1 - x][y] = self.cells[y][x];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }
}

/// Canonical spawn-orientation matrix for a piece kind
pub fn get_shape(kind: PieceKind) -> ShapeMatrix {
    match kind {
        PieceKind::I => ShapeMatrix::from_rows([
            [0, 0, 0, 0],
            [1, 1, 1, 1],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]),
        PieceKind::O => ShapeMatrix::from_rows([[1, 1], [1, 1]]),
        PieceKind::T => ShapeMatrix::from_rows([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
        PieceKind::S => ShapeMatrix::from_rows([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
        PieceKind::Z => ShapeMatrix::from_rows([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
        PieceKind::J => ShapeMatrix::from_rows([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
        PieceKind::L => ShapeMatrix::from_rows([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
    }
}

/// Display color of a piece kind as `[r, g, b]`
pub const fn display_rgb(kind: PieceKind) -> [u8; 3] {
    match kind {
        PieceKind::I => [0x67, 0xe8, 0xf9],
        PieceKind::O => [0xfd, 0xe0, 0x47],
        PieceKind::T => [0xc0, 0x84, 0xfc],
        PieceKind::S => [0x86, 0xef, 0xac],
        PieceKind::Z => [0xfd, 0xa4, 0xaf],
        PieceKind::J => [0x93, 0xc5, 0xfd],
        PieceKind::L => [0xfd, 0xba, 0x74],
    }
}
