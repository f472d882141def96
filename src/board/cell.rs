//! Hex cell topology.
//!
//! A board is a dense array of cells indexed by cell index, so every lookup
//! is O(1). Each cell records its soil richness and its six neighbor slots.
//! The standard board is a radius-3 hexagon of 37 cells numbered from the
//! center outward: index 0 is the center, then each ring is listed in walk
//! order starting from its direction-0 corner.

use std::collections::HashMap;

/// Number of hex directions around a cell.
pub const DIRECTION_COUNT: usize = 6;

/// Number of rings around the center on the standard board.
pub const RING_COUNT: usize = 3;

/// Number of cells on the standard board (1 + 6 + 12 + 18).
pub const STANDARD_CELL_COUNT: usize = 37;

/// Highest soil richness a cell can have.
pub const MAX_RICHNESS: u8 = 3;

/// Cube-coordinate offsets for each direction, used only to build the
/// standard board. Opposite directions are three apart.
const CUBE_DIRECTIONS: [(i32, i32, i32); DIRECTION_COUNT] = [
    (1, -1, 0),
    (1, 0, -1),
    (0, 1, -1),
    (-1, 1, 0),
    (-1, 0, 1),
    (0, -1, 1),
];

/// Errors raised when a neighbor table does not describe a valid board.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no cells")]
    Empty,

    #[error("cell indices are not dense: expected {expected}, found {found}")]
    NonDenseIndex { expected: usize, found: usize },

    #[error("cell {cell} has out-of-range neighbor {neighbor}")]
    NeighborOutOfRange { cell: usize, neighbor: usize },

    #[error("cell {cell} neighbor in direction {direction} does not point back")]
    AsymmetricNeighbor { cell: usize, direction: usize },

    #[error("cell {cell} has invalid richness {richness}")]
    InvalidRichness { cell: usize, richness: u8 },
}

/// A single board cell. Immutable for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub index: usize,
    /// Soil tier: 0 is unusable, 1-3 are usable.
    pub richness: u8,
    /// Neighbor index per direction, `None` at the board edge.
    pub neighbors: [Option<usize>; DIRECTION_COUNT],
}

impl Cell {
    /// Returns the neighbor in the given direction (taken modulo 6).
    #[inline]
    pub fn neighbor(&self, direction: usize) -> Option<usize> {
        self.neighbors[direction % DIRECTION_COUNT]
    }

    /// Returns true if trees may grow on this cell.
    #[inline]
    pub const fn is_usable(&self) -> bool {
        self.richness > 0
    }

    /// Iterates over the existing neighbors of this cell.
    pub fn neighbor_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().flatten().copied()
    }
}

/// The static board: cells stored densely by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from a list of cells in any order.
    ///
    /// Validates that indices are dense (0..N-1), that neighbor references
    /// stay in range, and that the neighbor relation is symmetric.
    pub fn from_cells(mut cells: Vec<Cell>) -> Result<Board, BoardError> {
        if cells.is_empty() {
            return Err(BoardError::Empty);
        }
        cells.sort_by_key(|c| c.index);

        for (expected, cell) in cells.iter().enumerate() {
            if cell.index != expected {
                return Err(BoardError::NonDenseIndex {
                    expected,
                    found: cell.index,
                });
            }
            if cell.richness > MAX_RICHNESS {
                return Err(BoardError::InvalidRichness {
                    cell: cell.index,
                    richness: cell.richness,
                });
            }
        }

        let len = cells.len();
        for cell in &cells {
            for (direction, neighbor) in cell.neighbors.iter().enumerate() {
                let Some(n) = *neighbor else { continue };
                if n >= len {
                    return Err(BoardError::NeighborOutOfRange {
                        cell: cell.index,
                        neighbor: n,
                    });
                }
                let back = cells[n].neighbors[(direction + 3) % DIRECTION_COUNT];
                if back != Some(cell.index) {
                    return Err(BoardError::AsymmetricNeighbor {
                        cell: cell.index,
                        direction,
                    });
                }
            }
        }

        Ok(Board { cells })
    }

    /// Builds the standard 37-cell board with no unusable cells.
    ///
    /// Richness is 3 on the center and first ring, 2 on the second ring and
    /// 1 on the outer ring.
    pub fn standard() -> Board {
        let mut coords: Vec<(i32, i32, i32)> = Vec::with_capacity(STANDARD_CELL_COUNT);
        let mut coord = (0, 0, 0);
        coords.push(coord);
        for distance in 1..=RING_COUNT {
            coord = cube_add(coord, CUBE_DIRECTIONS[0]);
            for orientation in 0..DIRECTION_COUNT {
                for _ in 0..distance {
                    coords.push(coord);
                    coord = cube_add(coord, CUBE_DIRECTIONS[(orientation + 2) % DIRECTION_COUNT]);
                }
            }
        }

        let lookup: HashMap<(i32, i32, i32), usize> =
            coords.iter().enumerate().map(|(i, c)| (*c, i)).collect();

        let cells = coords
            .iter()
            .enumerate()
            .map(|(index, &c)| {
                let mut neighbors = [None; DIRECTION_COUNT];
                for (d, offset) in CUBE_DIRECTIONS.iter().enumerate() {
                    neighbors[d] = lookup.get(&cube_add(c, *offset)).copied();
                }
                let richness = match ring_of(index) {
                    0 | 1 => 3,
                    2 => 2,
                    _ => 1,
                };
                Cell {
                    index,
                    richness,
                    neighbors,
                }
            })
            .collect();

        Board { cells }
    }

    /// Marks the given cells and their point-symmetric partners unusable.
    ///
    /// The center cell and out-of-range indices are ignored.
    pub fn with_holes(mut self, holes: &[usize]) -> Board {
        for &hole in holes {
            if hole == 0 || hole >= self.cells.len() {
                continue;
            }
            self.cells[hole].richness = 0;
            if let Some(opposite) = self.opposite(hole) {
                self.cells[opposite].richness = 0;
            }
        }
        self
    }

    /// Number of cells on the board.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `index`. Panics on an out-of-range index, which
    /// can only come from a tree or action that bypassed validation.
    #[inline]
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    /// All cells in index order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Richness of the cell at `index`.
    #[inline]
    pub fn richness(&self, index: usize) -> u8 {
        self.cells[index].richness
    }

    /// Returns true if `index` names a cell on this board.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// Returns all cells within hex distance `range` of `center`, excluding
    /// the center itself.
    ///
    /// Expands ring by ring over the neighbor table: ring 1 is the direct
    /// neighbors, ring k+1 the neighbors of ring k not already included.
    /// Results are ordered by ring, then by discovery order.
    pub fn cells_within(&self, center: usize, range: usize) -> Vec<usize> {
        let mut seen = vec![false; self.cells.len()];
        seen[center] = true;
        let mut result = Vec::new();
        let mut frontier = vec![center];

        for _ in 0..range {
            let mut next = Vec::new();
            for &idx in &frontier {
                for n in self.cells[idx].neighbor_indices() {
                    if !seen[n] {
                        seen[n] = true;
                        next.push(n);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            result.extend_from_slice(&next);
            frontier = next;
        }

        result
    }

    /// Walks the neighbor chain from `from` in `direction`, yielding each
    /// cell reached until the board edge.
    pub fn ray(&self, from: usize, direction: usize) -> impl Iterator<Item = usize> + '_ {
        let mut current = from;
        std::iter::from_fn(move || {
            let next = self.cells[current].neighbor(direction)?;
            current = next;
            Some(next)
        })
    }

    /// Returns the point-symmetric cell of `index` in ring-spiral numbering.
    pub fn opposite(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(0);
        }
        let ring = ring_of(index);
        let start = ring_start(ring);
        let len = 6 * ring;
        let opposite = start + (index - start + 3 * ring) % len;
        self.contains(opposite).then_some(opposite)
    }

    /// Cells on the board edge (fewer than six neighbors).
    pub fn edge_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .filter(|c| c.neighbors.iter().any(|n| n.is_none()))
            .map(|c| c.index)
    }
}

/// Ring number of a cell index in ring-spiral numbering (0 for the center).
pub fn ring_of(index: usize) -> usize {
    let mut ring = 0;
    while index >= ring_start(ring + 1) {
        ring += 1;
    }
    ring
}

/// First index of the given ring (1 + 3r(r-1) for r > 0).
const fn ring_start(ring: usize) -> usize {
    if ring == 0 {
        0
    } else {
        1 + 3 * ring * (ring - 1)
    }
}

#[inline]
fn cube_add(a: (i32, i32, i32), b: (i32, i32, i32)) -> (i32, i32, i32) {
    (a.0 + b.0, a.1 + b.1, a.2 + b.2)
}
