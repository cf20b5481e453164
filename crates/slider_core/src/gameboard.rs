use bevy_math::{IVec2, Vec2};
use fastrand::Rng;

use crate::board::{Board, SavedBoard, TileId};
use crate::config::SliderConfig;
use crate::coordinate::Coordinate;
use crate::drag::{DragController, GestureResponse, MoveOutcome, Rejection, Release, TileMotion};
use crate::error::{GameboardError, MotionError};
use crate::geometry::GeometryContext;
use crate::positions::TilePositions;

/// A motion handed to the renderer, applied when it reports completion.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingMotion {
    tile: TileId,
    target: Vec2,
    /// `Some` for committed moves, `None` for reverts.
    final_coordinate: Option<Coordinate>,
}

/// Board state, its pixel layout and the gesture in progress.
///
/// Feed pointer events in with `on_pointer_*`, animate every [`TileMotion`]
/// of a resolved gesture, then call [`Gameboard::complete_motion`] exactly
/// once per animated tile.
#[derive(Debug, Clone)]
pub struct Gameboard {
    config: SliderConfig,
    board: Board,
    geometry: GeometryContext,
    positions: TilePositions,
    controller: DragController,
    pending: Vec<PendingMotion>,
}

impl Gameboard {
    /// Starts a new random game laid out in a `viewport` sized window.
    pub fn new(
        viewport: IVec2,
        config: SliderConfig,
        rng: &mut Rng,
    ) -> Result<Self, GameboardError> {
        let geometry = Self::layout(viewport, config.grid_size, config.margin)?;
        let board = Board::shuffled(config.grid_size, rng)?;
        Ok(Self::assemble(board, geometry, config))
    }

    /// Rebuilds a game from [`Gameboard::serialize_order`] output.
    pub fn restore(
        order: &[usize],
        viewport: IVec2,
        config: SliderConfig,
    ) -> Result<Self, GameboardError> {
        let geometry = Self::layout(viewport, config.grid_size, config.margin)?;
        let board = Board::from_order(config.grid_size, order)?;
        Ok(Self::assemble(board, geometry, config))
    }

    pub fn from_saved(
        saved: &SavedBoard,
        viewport: IVec2,
        config: SliderConfig,
    ) -> Result<Self, GameboardError> {
        let config = SliderConfig {
            grid_size: saved.grid_size,
            ..config
        };
        let geometry = Self::layout(viewport, saved.grid_size, config.margin)?;
        let board = Board::from_saved(saved)?;
        Ok(Self::assemble(board, geometry, config))
    }

    pub fn from_board(
        board: Board,
        viewport: IVec2,
        config: SliderConfig,
    ) -> Result<Self, GameboardError> {
        let geometry = Self::layout(viewport, board.grid_size(), config.margin)?;
        Ok(Self::assemble(board, geometry, config))
    }

    /// Checked before any board is built, so a grid that cannot fit the
    /// viewport is rejected without allocating it.
    fn layout(
        viewport: IVec2,
        grid_size: usize,
        margin: i32,
    ) -> Result<GeometryContext, GameboardError> {
        Ok(GeometryContext::from_viewport(
            viewport.x, viewport.y, grid_size, margin,
        )?)
    }

    fn assemble(board: Board, geometry: GeometryContext, config: SliderConfig) -> Self {
        let positions = TilePositions::settled(&board, &geometry);
        Self {
            config,
            board,
            geometry,
            positions,
            controller: DragController::default(),
            pending: Vec::new(),
        }
    }

    /// Throws away the current layout, any gesture and any pending motion.
    pub fn new_game(&mut self, rng: &mut Rng) -> Result<(), GameboardError> {
        self.board.new_game(rng)?;
        self.controller.reset();
        self.pending.clear();
        self.positions = TilePositions::settled(&self.board, &self.geometry);
        tracing::debug!("New game\n{}", self.board);
        Ok(())
    }

    /// Original tile indices in row-major order. Settle first if a move may
    /// still be animating.
    pub fn serialize_order(&self) -> Vec<usize> {
        self.board.serialize_order()
    }

    pub fn save(&self) -> SavedBoard {
        self.board.save()
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn geometry(&self) -> &GeometryContext {
        &self.geometry
    }

    pub const fn positions(&self) -> &TilePositions {
        &self.positions
    }

    pub const fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub const fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn has_pending_motions(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The visible tile whose displayed rectangle contains `point`.
    pub fn tile_at_point(&self, point: Vec2) -> Option<TileId> {
        self.positions
            .iter()
            .filter(|(tile, _)| !self.board.is_empty_tile(*tile))
            .find(|(_, origin)| self.geometry.tile_rect_at(*origin).contains(point))
            .map(|(tile, _)| tile)
    }

    pub fn on_pointer_down(&mut self, tile: TileId, position: Vec2) -> GestureResponse {
        if self.has_pending_motions() {
            return GestureResponse::Rejected(Rejection::MotionPending);
        }
        if self.controller.is_dragging() {
            tracing::warn!("Pointer down on {tile:?} during another drag, reverting that one");
            self.settle();
        }
        tracing::trace!("Pointer down on {tile:?} at {position}");
        self.controller
            .pointer_down(tile, &self.board, &self.geometry, &self.positions)
    }

    pub fn on_pointer_move(&mut self, tile: TileId, position: Vec2) -> GestureResponse {
        self.controller.pointer_move(
            tile,
            position,
            self.config.pointer_tracking,
            &self.board,
            &self.geometry,
            &mut self.positions,
        )
    }

    pub fn on_pointer_up(&mut self, tile: TileId, position: Vec2) -> GestureResponse {
        tracing::trace!("Pointer up on {tile:?} at {position}");
        match self.controller.pointer_up(
            tile,
            &self.config,
            &self.board,
            &self.geometry,
            &self.positions,
        ) {
            Ok(release) => GestureResponse::Resolved(self.resolve(release)),
            Err(rejection) => GestureResponse::Rejected(rejection),
        }
    }

    /// Abandons the current gesture through the revert path.
    pub fn on_pointer_cancel(&mut self) -> GestureResponse {
        match self
            .controller
            .cancel(&self.board, &self.geometry, &self.positions)
        {
            Some(release) => GestureResponse::Resolved(self.resolve(release)),
            None => GestureResponse::Rejected(Rejection::NoActiveGesture),
        }
    }

    fn resolve(&mut self, release: Release) -> MoveOutcome {
        if release.planned.is_empty() {
            tracing::error!("Released {:?} with an empty plan", release.moved);
        }
        let commit = release.commit && !release.planned.is_empty();
        if commit {
            if let Some(origin) = self.board.coordinate_of(release.moved) {
                self.board.move_empty_to(origin);
                self.positions
                    .set(self.board.empty_tile(), self.geometry.origin_for(origin));
            }
        }

        let mut motions = Vec::with_capacity(release.planned.len());
        for descriptor in &release.planned {
            let (target, final_coordinate) = if commit {
                (descriptor.final_origin(), Some(descriptor.final_coordinate))
            } else {
                (descriptor.original_origin(), None)
            };
            let from = self
                .positions
                .get(descriptor.tile)
                .unwrap_or_else(|| descriptor.original_origin());
            motions.push(TileMotion {
                tile: descriptor.tile,
                axis: descriptor.axis,
                from,
                to: target,
            });
            self.pending.push(PendingMotion {
                tile: descriptor.tile,
                target,
                final_coordinate,
            });
        }

        if commit {
            MoveOutcome::Commit(motions)
        } else {
            MoveOutcome::Revert(motions)
        }
    }

    /// Applies the end state of `tile`'s animation: its final position and,
    /// for a commit, its new coordinate. Must be called once per motion.
    pub fn complete_motion(&mut self, tile: TileId) -> Result<(), MotionError> {
        let Some(index) = self.pending.iter().position(|motion| motion.tile == tile) else {
            tracing::warn!("Completion for {tile:?} without a pending motion");
            return Err(MotionError::NotPending(tile));
        };
        let motion = self.pending.swap_remove(index);
        self.positions.set(tile, motion.target);
        if let Some(coordinate) = motion.final_coordinate {
            self.board.place(tile, coordinate);
        }
        if self.pending.is_empty() {
            self.verify_board();
        }
        Ok(())
    }

    /// Completes every pending motion and drops any gesture, reverting its
    /// tiles. Leaves the gameboard idle with every tile on its cell.
    pub fn settle(&mut self) {
        if let Some(release) =
            self.controller
                .cancel(&self.board, &self.geometry, &self.positions)
        {
            self.resolve(release);
        }
        for motion in core::mem::take(&mut self.pending) {
            self.positions.set(motion.tile, motion.target);
            if let Some(coordinate) = motion.final_coordinate {
                self.board.place(motion.tile, coordinate);
            }
        }
        self.verify_board();
    }

    fn verify_board(&self) {
        let result = self.board.check_invariants();
        debug_assert!(result.is_ok(), "board invariants broken: {result:?}");
        if let Err(err) = result {
            tracing::error!("{err}\n{}", self.board);
        }
    }
}
