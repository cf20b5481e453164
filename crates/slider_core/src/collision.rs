//! Pure predicates deciding whether a dragged tile may occupy a rectangle.
//!
//! Overlap means a shared area: tiles that only touch along an edge do not
//! collide. Containment includes the edges, so a tile may sit flush against
//! the board border.

use bevy_math::Rect;

use crate::board::TileId;

/// A tile that could block a dragged one, at the rectangle it occupies for
/// this check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub tile: TileId,
    pub rect: Rect,
    pub is_empty: bool,
}

/// True iff any other non-empty obstacle overlaps `candidate`.
pub fn collides(
    candidate: Rect,
    tile: TileId,
    others: impl IntoIterator<Item = Obstacle>,
) -> bool {
    others
        .into_iter()
        .filter(|other| !other.is_empty && other.tile != tile)
        .any(|other| overlaps(candidate, other.rect))
}

/// True iff `board` fully contains `candidate`.
pub fn in_bounds(candidate: Rect, board: Rect) -> bool {
    board.contains(candidate.min) && board.contains(candidate.max)
}

fn overlaps(a: Rect, b: Rect) -> bool {
    !a.intersect(b).is_empty()
}

#[cfg(test)]
mod tests {
    use bevy_math::Vec2;

    use super::*;

    fn square(x: f32, y: f32) -> Rect {
        Rect::from_corners(Vec2::new(x, y), Vec2::new(x + 10., y + 10.))
    }

    fn obstacle(id: usize, x: f32, y: f32) -> Obstacle {
        Obstacle {
            tile: TileId(id),
            rect: square(x, y),
            is_empty: false,
        }
    }

    #[test]
    fn touching_edges_do_not_collide_on_either_axis() {
        let candidate = square(0., 0.);
        assert!(!collides(candidate, TileId(0), [obstacle(1, 10., 0.)]));
        assert!(!collides(candidate, TileId(0), [obstacle(1, 0., 10.)]));
        assert!(collides(candidate, TileId(0), [obstacle(1, 9.5, 0.)]));
        assert!(collides(candidate, TileId(0), [obstacle(1, 0., 9.5)]));
    }

    #[test]
    fn self_and_empty_tiles_are_ignored() {
        let candidate = square(0., 0.);
        let empty = Obstacle {
            is_empty: true,
            ..obstacle(2, 5., 0.)
        };
        assert!(!collides(candidate, TileId(0), [obstacle(0, 5., 0.), empty]));
    }

    #[test]
    fn bounds_are_inclusive() {
        let board = Rect::new(0., 0., 40., 40.);
        assert!(in_bounds(square(0., 0.), board));
        assert!(in_bounds(square(30., 30.), board));
        assert!(!in_bounds(square(-0.5, 0.), board));
        assert!(!in_bounds(square(0., -0.5), board));
        assert!(!in_bounds(square(30.5, 0.), board));
        assert!(!in_bounds(square(0., 30.5), board));
    }
}
