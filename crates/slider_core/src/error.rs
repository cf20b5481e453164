use thiserror::Error;

use crate::board::TileId;
use crate::coordinate::Coordinate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Grid size must be at least 2, got {0}")]
    GridTooSmall(usize),

    #[error("Grid size {grid_size} exceeds the maximum of {max}")]
    GridTooLarge { grid_size: usize, max: usize },

    #[error("Tile order has {actual} entries, expected {expected}")]
    OrderLength { expected: usize, actual: usize },

    #[error("Tile index {index} is out of range for {tiles} tiles")]
    IndexOutOfRange { index: usize, tiles: usize },

    #[error("Tile index {0} appears more than once")]
    DuplicateIndex(usize),

    #[error("Empty tile is recorded at {recorded} but the grid holds it at {found:?}")]
    EmptyMismatch {
        recorded: Coordinate,
        found: Option<Coordinate>,
    },

    #[error("Cell {coordinate} holds {cell:?} but that tile thinks it is at {recorded}")]
    CellMismatch {
        coordinate: Coordinate,
        cell: TileId,
        recorded: Coordinate,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Viewport {width}x{height} is too small for a {grid_size}x{grid_size} board")]
    ViewportTooSmall {
        width: i32,
        height: i32,
        grid_size: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    #[error("No pending motion for {0:?}")]
    NotPending(TileId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameboardError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Motion(#[from] MotionError),
}
