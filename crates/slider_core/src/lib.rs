//! Interactive core of a sliding tile puzzle.
//!
//! Owns the board, maps cells to pixels and runs the drag gesture that slides
//! a run of tiles into the empty cell. Rendering stays outside: a front-end
//! feeds pointer events into a [`Gameboard`], animates the [`TileMotion`]s of
//! every [`MoveOutcome`] and reports each finished animation back through
//! [`Gameboard::complete_motion`].

mod board;
mod collision;
mod config;
mod coordinate;
mod drag;
mod error;
mod gameboard;
mod geometry;
mod planner;
mod positions;

pub use board::{Board, SavedBoard, Tile, TileId};
pub use collision::{collides, in_bounds, Obstacle};
pub use config::{
    PointerTracking, SliderConfig, CLICK_THRESHOLD_DIVISOR, GRID_SIZE, MAX_GRID_SIZE,
    TILE_MARGIN,
};
pub use coordinate::{Axis, Coordinate, Relation};
pub use drag::{
    Drag, DragController, DragState, GestureResponse, MoveOutcome, Rejection, TileMotion,
};
pub use error::{BoardError, GameboardError, GeometryError, MotionError};
pub use gameboard::Gameboard;
pub use geometry::GeometryContext;
pub use planner::{plan_move, MotionDescriptor};
pub use positions::TilePositions;
