use core::fmt::{self, Display, Formatter};

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MAX_GRID_SIZE;
use crate::coordinate::Coordinate;
use crate::error::BoardError;

/// Stable tile identity: the tile's index in the solved image, row-major.
/// The highest index is always the empty tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub coordinate: Coordinate,
    pub is_empty: bool,
}

/// Authoritative mapping between cells and tiles.
///
/// `cells` is row-major and answers "which tile is here", `coordinates` is
/// indexed by [`TileId`] and answers "where is this tile". Both are kept in
/// sync by every mutation except while a committed move is waiting on its
/// animations, see [`crate::Gameboard::complete_motion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid_size: usize,
    cells: Vec<TileId>,
    coordinates: Vec<Coordinate>,
    empty: Coordinate,
}

/// Serializable board snapshot, enough to rebuild an identical board after
/// the view owning it has been torn down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBoard {
    pub grid_size: usize,
    pub order: Vec<usize>,
}

impl Board {
    /// Solved board: tile `i` at row-major cell `i`, empty tile bottom-right.
    pub fn new(grid_size: usize) -> Result<Self, BoardError> {
        let tiles = Self::tile_count(grid_size)?;
        Self::from_cells(grid_size, (0..tiles).map(TileId).collect())
    }

    /// Uniformly random assignment of the image tiles to every cell but the
    /// bottom-right one, which receives the empty tile.
    pub fn shuffled(grid_size: usize, rng: &mut Rng) -> Result<Self, BoardError> {
        let tiles = Self::tile_count(grid_size)?;
        let mut cells: Vec<TileId> = (0..tiles - 1).map(TileId).collect();
        rng.shuffle(&mut cells);
        cells.push(TileId(tiles - 1));
        Self::from_cells(grid_size, cells)
    }

    /// Rebuilds a board from original tile indices listed in row-major order,
    /// as produced by [`Board::serialize_order`].
    pub fn from_order(grid_size: usize, order: &[usize]) -> Result<Self, BoardError> {
        let tiles = Self::tile_count(grid_size)?;
        if order.len() != tiles {
            return Err(BoardError::OrderLength {
                expected: tiles,
                actual: order.len(),
            });
        }
        let mut seen = vec![false; tiles];
        for &index in order {
            let Some(slot) = seen.get_mut(index) else {
                return Err(BoardError::IndexOutOfRange { index, tiles });
            };
            if *slot {
                return Err(BoardError::DuplicateIndex(index));
            }
            *slot = true;
        }
        Self::from_cells(grid_size, order.iter().copied().map(TileId).collect())
    }

    pub fn from_saved(saved: &SavedBoard) -> Result<Self, BoardError> {
        Self::from_order(saved.grid_size, &saved.order)
    }

    /// Replaces every tile with a fresh random layout.
    pub fn new_game(&mut self, rng: &mut Rng) -> Result<(), BoardError> {
        *self = Self::shuffled(self.grid_size, rng)?;
        Ok(())
    }

    fn tile_count(grid_size: usize) -> Result<usize, BoardError> {
        if grid_size < 2 {
            return Err(BoardError::GridTooSmall(grid_size));
        }
        if grid_size > MAX_GRID_SIZE {
            return Err(BoardError::GridTooLarge {
                grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        grid_size
            .checked_mul(grid_size)
            .ok_or(BoardError::GridTooLarge {
                grid_size,
                max: MAX_GRID_SIZE,
            })
    }

    /// `cells` must already be a permutation of `0..grid_size²`.
    fn from_cells(grid_size: usize, cells: Vec<TileId>) -> Result<Self, BoardError> {
        let empty_tile = TileId(cells.len() - 1);
        let mut coordinates = vec![Coordinate::default(); cells.len()];
        let mut empty = Coordinate::default();
        for (index, tile) in cells.iter().enumerate() {
            let coordinate = Coordinate::from_index(index, grid_size);
            if let Some(slot) = coordinates.get_mut(tile.0) {
                *slot = coordinate;
            }
            if *tile == empty_tile {
                empty = coordinate;
            }
        }
        let board = Self {
            grid_size,
            cells,
            coordinates,
            empty,
        };
        board.check_invariants()?;
        Ok(board)
    }

    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn empty_tile(&self) -> TileId {
        TileId(self.cells.len() - 1)
    }

    pub const fn empty_coordinate(&self) -> Coordinate {
        self.empty
    }

    pub fn is_empty_tile(&self, tile: TileId) -> bool {
        tile == self.empty_tile()
    }

    pub fn tile_at(&self, coordinate: Coordinate) -> Option<TileId> {
        if !coordinate.is_within(self.grid_size) {
            return None;
        }
        self.cells.get(coordinate.index(self.grid_size)).copied()
    }

    pub fn coordinate_of(&self, tile: TileId) -> Option<Coordinate> {
        self.coordinates.get(tile.0).copied()
    }

    pub fn tile(&self, id: TileId) -> Option<Tile> {
        let coordinate = self.coordinate_of(id)?;
        Some(Tile {
            id,
            coordinate,
            is_empty: self.is_empty_tile(id),
        })
    }

    /// Every tile, in tile id order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.cells.len()).filter_map(|id| self.tile(TileId(id)))
    }

    pub fn tiles_in_row(&self, row: usize) -> impl Iterator<Item = Tile> + '_ {
        self.tiles().filter(move |tile| tile.coordinate.row == row)
    }

    pub fn tiles_in_column(&self, column: usize) -> impl Iterator<Item = Tile> + '_ {
        self.tiles().filter(move |tile| tile.coordinate.column == column)
    }

    /// Original tile indices in row-major scan order.
    pub fn serialize_order(&self) -> Vec<usize> {
        self.cells.iter().map(|tile| tile.0).collect()
    }

    pub fn save(&self) -> SavedBoard {
        SavedBoard {
            grid_size: self.grid_size,
            order: self.serialize_order(),
        }
    }

    /// Verifies that the two lookup tables agree and that exactly one cell
    /// holds the empty tile.
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        let tiles = self.grid_size * self.grid_size;
        if self.cells.len() != tiles || self.coordinates.len() != tiles {
            return Err(BoardError::OrderLength {
                expected: tiles,
                actual: self.cells.len(),
            });
        }
        for (index, &cell) in self.cells.iter().enumerate() {
            let coordinate = Coordinate::from_index(index, self.grid_size);
            let Some(recorded) = self.coordinate_of(cell) else {
                return Err(BoardError::IndexOutOfRange { index: cell.0, tiles });
            };
            if recorded != coordinate {
                return Err(BoardError::CellMismatch {
                    coordinate,
                    cell,
                    recorded,
                });
            }
        }
        if self.tile_at(self.empty) != Some(self.empty_tile()) {
            return Err(BoardError::EmptyMismatch {
                recorded: self.empty,
                found: self.coordinate_of(self.empty_tile()),
            });
        }
        Ok(())
    }

    /// Moves the empty tile onto `coordinate`. The tile previously there keeps
    /// its own coordinate until it is placed.
    pub(crate) fn move_empty_to(&mut self, coordinate: Coordinate) {
        self.empty = coordinate;
        self.place(self.empty_tile(), coordinate);
    }

    pub(crate) fn place(&mut self, tile: TileId, coordinate: Coordinate) {
        if let Some(slot) = self.coordinates.get_mut(tile.0) {
            *slot = coordinate;
        }
        let index = coordinate.index(self.grid_size);
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = tile;
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..self.grid_size {
            for column in 0..self.grid_size {
                match self.tile_at(Coordinate::new(row, column)) {
                    Some(tile) if self.is_empty_tile(tile) => write!(f, "   ")?,
                    Some(tile) => write!(f, "{:>02} ", tile.0 + 1)?,
                    None => {}
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_board_has_empty_bottom_right() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.len(), 16);
        assert_eq!(board.empty_tile(), TileId(15));
        assert_eq!(board.empty_coordinate(), Coordinate::new(3, 3));
        assert_eq!(board.tile_at(Coordinate::new(0, 1)), Some(TileId(1)));
        assert_eq!(board.coordinate_of(TileId(6)), Some(Coordinate::new(1, 2)));
        assert_eq!(board.check_invariants(), Ok(()));
    }

    #[test]
    fn shuffled_board_keeps_empty_in_the_corner() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..20 {
            let board = Board::shuffled(4, &mut rng).unwrap();
            assert_eq!(board.empty_coordinate(), Coordinate::new(3, 3));
            assert_eq!(board.tile_at(Coordinate::new(3, 3)), Some(board.empty_tile()));
            assert_eq!(board.check_invariants(), Ok(()));
        }
    }

    #[test]
    fn new_game_rebuilds_every_tile() {
        let mut rng = Rng::with_seed(42);
        let mut board = Board::new(4).unwrap();
        let solved = board.serialize_order();
        let mut changed = false;
        for _ in 0..5 {
            board.new_game(&mut rng).unwrap();
            assert_eq!(board.check_invariants(), Ok(()));
            changed |= board.serialize_order() != solved;
        }
        assert!(changed, "five shuffles should not all be the solved order");
    }

    #[test]
    fn order_round_trips() {
        let mut rng = Rng::with_seed(3);
        let board = Board::shuffled(4, &mut rng).unwrap();
        let restored = Board::from_order(4, &board.serialize_order()).unwrap();
        assert_eq!(restored, board);

        let saved = board.save();
        assert_eq!(Board::from_saved(&saved).unwrap(), board);
    }

    #[test]
    fn order_may_put_the_empty_tile_anywhere() {
        let mut order: Vec<usize> = (0..16).collect();
        order.swap(15, 5);
        let board = Board::from_order(4, &order).unwrap();
        assert_eq!(board.empty_coordinate(), Coordinate::new(1, 1));
        assert_eq!(board.coordinate_of(TileId(5)), Some(Coordinate::new(3, 3)));
    }

    #[test]
    fn invalid_orders_are_rejected() {
        assert_eq!(
            Board::from_order(4, &[0, 1, 2]),
            Err(BoardError::OrderLength {
                expected: 16,
                actual: 3
            })
        );

        let mut duplicate: Vec<usize> = (0..16).collect();
        duplicate[3] = 4;
        assert_eq!(
            Board::from_order(4, &duplicate),
            Err(BoardError::DuplicateIndex(4))
        );

        let mut out_of_range: Vec<usize> = (0..16).collect();
        out_of_range[0] = 16;
        assert_eq!(
            Board::from_order(4, &out_of_range),
            Err(BoardError::IndexOutOfRange {
                index: 16,
                tiles: 16
            })
        );

        assert_eq!(Board::new(1), Err(BoardError::GridTooSmall(1)));
    }

    #[test]
    fn oversized_grids_fail_before_allocating() {
        let too_large = |grid_size| BoardError::GridTooLarge {
            grid_size,
            max: MAX_GRID_SIZE,
        };
        assert_eq!(Board::new(1 << 33), Err(too_large(1 << 33)));
        assert_eq!(Board::new(usize::MAX), Err(too_large(usize::MAX)));
        assert_eq!(
            Board::shuffled(MAX_GRID_SIZE + 1, &mut Rng::with_seed(1)),
            Err(too_large(MAX_GRID_SIZE + 1))
        );
        assert_eq!(Board::from_order(usize::MAX, &[]), Err(too_large(usize::MAX)));
        assert_eq!(
            Board::new(MAX_GRID_SIZE).map(|board| board.len()),
            Ok(MAX_GRID_SIZE * MAX_GRID_SIZE)
        );
    }

    #[test]
    fn row_and_column_queries() {
        let board = Board::new(4).unwrap();
        let row: Vec<TileId> = board.tiles_in_row(2).map(|tile| tile.id).collect();
        assert_eq!(row, vec![TileId(8), TileId(9), TileId(10), TileId(11)]);
        let column: Vec<TileId> = board.tiles_in_column(3).map(|tile| tile.id).collect();
        assert_eq!(column, vec![TileId(3), TileId(7), TileId(11), TileId(15)]);
        assert!(board.tile(TileId(15)).unwrap().is_empty);
        assert!(board.tile(TileId(16)).is_none());
    }

    #[test]
    fn half_applied_move_is_detected() {
        let mut board = Board::new(4).unwrap();
        board.move_empty_to(Coordinate::new(3, 2));
        assert!(board.check_invariants().is_err());
        board.place(TileId(14), Coordinate::new(3, 3));
        assert_eq!(board.check_invariants(), Ok(()));
    }

    #[test]
    fn display_leaves_the_empty_cell_blank() {
        let board = Board::new(2).unwrap();
        assert_eq!(board.to_string(), "01 02 \n03    \n");
    }
}
