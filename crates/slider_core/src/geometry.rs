use bevy_math::{IRect, IVec2, Rect, Vec2};

use crate::coordinate::Coordinate;
use crate::error::GeometryError;

/// Pixel layout of the board inside a viewport. Screen space: origin at
/// the top-left, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryContext {
    pub tile_size: i32,
    pub board_rect: IRect,
}

impl GeometryContext {
    /// Fits a square board into the viewport, shrinks each tile by `margin`
    /// and centers the result.
    pub fn from_viewport(
        width: i32,
        height: i32,
        grid_size: usize,
        margin: i32,
    ) -> Result<Self, GeometryError> {
        let cells = i32::try_from(grid_size).unwrap_or(0);
        let tile_size = if cells > 0 {
            width.min(height) / cells - margin
        } else {
            0
        };
        if tile_size <= 0 {
            return Err(GeometryError::ViewportTooSmall {
                width,
                height,
                grid_size,
            });
        }
        let board_size = tile_size * cells;
        let top = height / 2 - board_size / 2;
        let left = width / 2 - board_size / 2;
        Ok(Self {
            tile_size,
            board_rect: IRect::new(left, top, left + board_size, top + board_size),
        })
    }

    pub fn rect_for_coordinate(&self, coordinate: Coordinate) -> IRect {
        let top = coordinate.row as i32 * self.tile_size + self.board_rect.min.y;
        let left = coordinate.column as i32 * self.tile_size + self.board_rect.min.x;
        IRect::from_corners(
            IVec2::new(left, top),
            IVec2::new(left + self.tile_size, top + self.tile_size),
        )
    }

    /// Top-left corner of `coordinate`'s settled rectangle.
    pub fn origin_for(&self, coordinate: Coordinate) -> Vec2 {
        self.rect_for_coordinate(coordinate).min.as_vec2()
    }

    /// Rectangle of a tile whose top-left corner is at `origin`.
    pub fn tile_rect_at(&self, origin: Vec2) -> Rect {
        Rect::from_corners(origin, origin + Vec2::splat(self.tile_size as f32))
    }

    pub fn board_bounds(&self) -> Rect {
        self.board_rect.as_rect()
    }
}
