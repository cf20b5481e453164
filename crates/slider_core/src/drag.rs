//! Gesture state machine for a single pointer dragging a run of tiles.
//!
//! `Idle` → `Dragging` on pointer-down over a tile in line with the empty
//! cell. Each pointer-move shifts the whole planned run along its axis, or
//! nothing when any tile of the run would leave the board or hit another
//! tile. Pointer-up decides between commit and revert from the touched
//! tile's offset; see [`DragController::pointer_up`].

use bevy_math::{Rect, Vec2};

use crate::board::{Board, TileId};
use crate::collision::{collides, in_bounds, Obstacle};
use crate::config::{PointerTracking, SliderConfig};
use crate::coordinate::Axis;
use crate::geometry::GeometryContext;
use crate::planner::{plan_move, MotionDescriptor};
use crate::positions::TilePositions;

/// Why a pointer event was not handled. These are ordinary outcomes, not
/// faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The event names a tile that does not exist on this board.
    UnknownTile,
    EmptyTile,
    /// The tile shares neither row nor column with the empty cell.
    OffAxis,
    /// Move or up without a preceding down.
    NoActiveGesture,
    /// Move for a tile other than the one being dragged.
    NotDraggedTile,
    /// A down while a previous move is still animating.
    MotionPending,
}

/// A tile the renderer has to animate from `from` to `to`, then report
/// through [`crate::Gameboard::complete_motion`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMotion {
    pub tile: TileId,
    pub axis: Axis,
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The run snaps one cell toward the gap.
    Commit(Vec<TileMotion>),
    /// The run returns to its settled cells.
    Revert(Vec<TileMotion>),
}

impl MoveOutcome {
    pub fn motions(&self) -> &[TileMotion] {
        match self {
            Self::Commit(motions) | Self::Revert(motions) => motions,
        }
    }

    pub const fn is_commit(&self) -> bool {
        matches!(self, Self::Commit(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureResponse {
    Started,
    /// `applied` is false when the shift was blocked and nothing moved.
    Dragged { applied: bool },
    Resolved(MoveOutcome),
    Rejected(Rejection),
}

impl GestureResponse {
    pub const fn is_handled(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Drag),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    pub moved: TileId,
    pub planned: Vec<MotionDescriptor>,
    pub last_pointer: Option<Vec2>,
    pub move_events: u32,
}

/// End of a gesture, before the gameboard applies it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Release {
    pub moved: TileId,
    pub commit: bool,
    pub planned: Vec<MotionDescriptor>,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub(crate) fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    pub(crate) fn pointer_down(
        &mut self,
        tile: TileId,
        board: &Board,
        geometry: &GeometryContext,
        positions: &TilePositions,
    ) -> GestureResponse {
        let Some(touched) = board.tile(tile) else {
            return GestureResponse::Rejected(Rejection::UnknownTile);
        };
        if touched.is_empty {
            return GestureResponse::Rejected(Rejection::EmptyTile);
        }
        if !touched.coordinate.shares_axis_with(&board.empty_coordinate()) {
            return GestureResponse::Rejected(Rejection::OffAxis);
        }
        let planned = plan_move(tile, board, geometry, positions);
        tracing::debug!(
            "Start dragging {tile:?} at {} with {} tile(s) in the run",
            touched.coordinate,
            planned.len()
        );
        self.state = DragState::Dragging(Drag {
            moved: tile,
            planned,
            last_pointer: None,
            move_events: 0,
        });
        GestureResponse::Started
    }

    pub(crate) fn pointer_move(
        &mut self,
        tile: TileId,
        position: Vec2,
        tracking: PointerTracking,
        board: &Board,
        geometry: &GeometryContext,
        positions: &mut TilePositions,
    ) -> GestureResponse {
        let DragState::Dragging(drag) = &mut self.state else {
            return GestureResponse::Rejected(Rejection::NoActiveGesture);
        };
        if drag.moved != tile {
            return GestureResponse::Rejected(Rejection::NotDraggedTile);
        }
        drag.move_events += 1;

        let applied = drag.last_pointer.is_some_and(|last| {
            let delta = position - last;
            let admissible = is_admissible(&drag.planned, delta, board, geometry, positions);
            if admissible {
                for descriptor in &drag.planned {
                    positions.translate(descriptor.tile, descriptor.axis.project(delta));
                }
            } else {
                tracing::trace!("Blocked drag of {tile:?} by {delta}");
            }
            admissible
        });

        match tracking {
            PointerTracking::Always => drag.last_pointer = Some(position),
            PointerTracking::OnlyWhenApplied => {
                if applied || drag.last_pointer.is_none() {
                    drag.last_pointer = Some(position);
                }
            }
        }
        GestureResponse::Dragged { applied }
    }

    /// Ends the gesture and decides its fate from a fresh plan.
    ///
    /// The move commits when the touched tile travelled more than half a tile
    /// or when the gesture was a tap: no drag at all, or a drag shorter than
    /// the configured click threshold within the allowed number of move
    /// events. Anything else reverts, including a release reported for a
    /// tile other than the dragged one.
    pub(crate) fn pointer_up(
        &mut self,
        tile: TileId,
        config: &SliderConfig,
        board: &Board,
        geometry: &GeometryContext,
        positions: &TilePositions,
    ) -> Result<Release, Rejection> {
        let DragState::Dragging(drag) = &self.state else {
            return Err(Rejection::NoActiveGesture);
        };
        if drag.moved != tile {
            tracing::debug!("Release on {tile:?} ends the drag of {:?}", drag.moved);
            return self
                .cancel(board, geometry, positions)
                .ok_or(Rejection::NoActiveGesture);
        }

        let planned = plan_move(drag.moved, board, geometry, positions);
        let dragged = drag.last_pointer.is_some();
        let axial_delta = planned.first().map_or(0., |first| first.axial_delta);
        let tile_size = geometry.tile_size;

        let halfway = dragged && axial_delta > (tile_size / 2) as f32;
        let click = !dragged
            || (axial_delta < config.click_threshold(tile_size) as f32
                && config.allows_click_after(drag.move_events));
        let commit = halfway || click;
        tracing::debug!(
            "Release {tile:?}: offset {axial_delta} after {} move event(s), {}",
            drag.move_events,
            if commit { "commit" } else { "revert" }
        );

        let release = Release {
            moved: drag.moved,
            commit,
            planned,
        };
        self.state = DragState::Idle;
        Ok(release)
    }

    /// Abandons the gesture. The run goes back to where it started.
    pub(crate) fn cancel(
        &mut self,
        board: &Board,
        geometry: &GeometryContext,
        positions: &TilePositions,
    ) -> Option<Release> {
        let DragState::Dragging(drag) = core::mem::take(&mut self.state) else {
            return None;
        };
        Some(Release {
            moved: drag.moved,
            commit: false,
            planned: plan_move(drag.moved, board, geometry, positions),
        })
    }
}

/// The whole run may shift by `delta` only if every tile stays on the board
/// and clear of every other tile on its line. Tiles of the run are tested at
/// their shifted positions since they move together.
fn is_admissible(
    planned: &[MotionDescriptor],
    delta: Vec2,
    board: &Board,
    geometry: &GeometryContext,
    positions: &TilePositions,
) -> bool {
    let candidates: Vec<(TileId, Rect)> = planned
        .iter()
        .filter_map(|descriptor| {
            let origin = positions.get(descriptor.tile)? + descriptor.axis.project(delta);
            Some((descriptor.tile, geometry.tile_rect_at(origin)))
        })
        .collect();
    if candidates.len() != planned.len() {
        return false;
    }

    let bounds = geometry.board_bounds();
    let empty = board.empty_coordinate();
    candidates
        .iter()
        .zip(planned)
        .all(|(&(tile, candidate), descriptor)| {
            if !in_bounds(candidate, bounds) {
                return false;
            }
            let line: Vec<_> = match descriptor.axis {
                Axis::X => board.tiles_in_row(empty.row).collect(),
                Axis::Y => board.tiles_in_column(empty.column).collect(),
            };
            let obstacles = line.into_iter().filter_map(|other| {
                let rect = candidates
                    .iter()
                    .find(|(id, _)| *id == other.id)
                    .map(|(_, rect)| *rect)
                    .or_else(|| positions.rect(other.id, geometry))?;
                Some(Obstacle {
                    tile: other.id,
                    rect,
                    is_empty: other.is_empty,
                })
            });
            !collides(candidate, tile, obstacles)
        })
}
