use bevy_math::{Rect, Vec2};

use crate::board::{Board, TileId};
use crate::geometry::GeometryContext;

/// Displayed top-left corner of every tile, indexed by [`TileId`].
///
/// Matches the settled rectangles whenever no gesture or animation is in
/// flight. The render adapter reads these, only the gameboard writes them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TilePositions(Vec<Vec2>);

impl TilePositions {
    pub fn settled(board: &Board, geometry: &GeometryContext) -> Self {
        Self(
            board
                .tiles()
                .map(|tile| geometry.origin_for(tile.coordinate))
                .collect(),
        )
    }

    pub fn get(&self, tile: TileId) -> Option<Vec2> {
        self.0.get(tile.0).copied()
    }

    pub fn rect(&self, tile: TileId, geometry: &GeometryContext) -> Option<Rect> {
        self.get(tile).map(|origin| geometry.tile_rect_at(origin))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, Vec2)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(id, position)| (TileId(id), *position))
    }

    pub(crate) fn set(&mut self, tile: TileId, position: Vec2) {
        if let Some(slot) = self.0.get_mut(tile.0) {
            *slot = position;
        }
    }

    pub(crate) fn translate(&mut self, tile: TileId, delta: Vec2) {
        if let Some(slot) = self.0.get_mut(tile.0) {
            *slot += delta;
        }
    }
}
