use bevy_math::{IRect, Vec2};

use crate::board::{Board, TileId};
use crate::coordinate::{Axis, Coordinate};
use crate::geometry::GeometryContext;
use crate::positions::TilePositions;

/// How one tile of the dragged run moves if the gesture commits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionDescriptor {
    pub tile: TileId,
    pub axis: Axis,
    /// Displayed position on `axis` when the plan was made.
    pub from: f32,
    /// Position on `axis` once the move is committed.
    pub to: f32,
    pub final_coordinate: Coordinate,
    pub final_rect: IRect,
    pub original_rect: IRect,
    /// Absolute displayed-vs-settled offset on `axis`.
    pub axial_delta: f32,
}

impl MotionDescriptor {
    pub fn final_origin(&self) -> Vec2 {
        self.final_rect.min.as_vec2()
    }

    pub fn original_origin(&self) -> Vec2 {
        self.original_rect.min.as_vec2()
    }

    pub fn original_position(&self) -> f32 {
        self.axis.component(self.original_origin())
    }
}

/// Plans the run of tiles between `touched` and the empty cell.
///
/// The first descriptor is always the touched tile, the last one is the tile
/// next to the empty cell. Each tile shifts by exactly one cell toward the
/// gap. Returns an empty plan when `touched` is the empty tile or does not
/// share a row or column with it.
pub fn plan_move(
    touched: TileId,
    board: &Board,
    geometry: &GeometryContext,
    positions: &TilePositions,
) -> Vec<MotionDescriptor> {
    let mut descriptors = Vec::new();
    let Some(tile) = board.tile(touched) else {
        return descriptors;
    };
    if tile.is_empty {
        return descriptors;
    }
    let empty = board.empty_coordinate();
    let Some(relation) = tile.coordinate.relation_to(&empty) else {
        return descriptors;
    };
    let axis = relation.axis();

    let mut current = tile.coordinate;
    while current != empty {
        let Some(next) = current.step_toward(relation) else {
            break;
        };
        let found = if current == tile.coordinate {
            Some(touched)
        } else {
            board.tile_at(current)
        };
        let found = found.filter(|found| !board.is_empty_tile(*found));
        debug_assert!(found.is_some(), "planned cell {current} has no tile");
        let Some(found) = found else {
            tracing::error!("No tile at {current} while planning a move toward {empty}");
            break;
        };

        let original_rect = geometry.rect_for_coordinate(current);
        let final_rect = geometry.rect_for_coordinate(next);
        let settled = axis.component(original_rect.min.as_vec2());
        let displayed = positions.get(found).map_or(settled, |p| axis.component(p));
        descriptors.push(MotionDescriptor {
            tile: found,
            axis,
            from: displayed,
            to: axis.component(final_rect.min.as_vec2()),
            final_coordinate: next,
            final_rect,
            original_rect,
            axial_delta: (displayed - settled).abs(),
        });
        current = next;
    }
    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Board, GeometryContext, TilePositions) {
        let board = Board::new(4).unwrap();
        let geometry = GeometryContext::from_viewport(400, 400, 4, 0).unwrap();
        let positions = TilePositions::settled(&board, &geometry);
        (board, geometry, positions)
    }

    fn cells(plan: &[MotionDescriptor], board: &Board) -> Vec<(Coordinate, Coordinate)> {
        plan.iter()
            .map(|d| (board.coordinate_of(d.tile).unwrap(), d.final_coordinate))
            .collect()
    }

    #[test]
    fn bottom_row_run_toward_corner() {
        let (board, geometry, positions) = setup();
        let plan = plan_move(TileId(12), &board, &geometry, &positions);

        assert_eq!(
            cells(&plan, &board),
            vec![
                (Coordinate::new(3, 0), Coordinate::new(3, 1)),
                (Coordinate::new(3, 1), Coordinate::new(3, 2)),
                (Coordinate::new(3, 2), Coordinate::new(3, 3)),
            ]
        );
        assert!(plan.iter().all(|d| d.axis == Axis::X), "row runs slide on X");
        let first = plan.first().unwrap();
        assert_eq!(first.tile, TileId(12));
        assert_eq!(first.from, 0.);
        assert_eq!(first.to, 100.);
        assert_eq!(first.axial_delta, 0.);
        assert_eq!(first.original_rect, IRect::new(0, 300, 100, 400));
        assert_eq!(first.final_rect, IRect::new(100, 300, 200, 400));
    }

    #[test]
    fn column_run_moves_down_on_y() {
        let (board, geometry, positions) = setup();
        let plan = plan_move(TileId(7), &board, &geometry, &positions);

        assert_eq!(
            cells(&plan, &board),
            vec![
                (Coordinate::new(1, 3), Coordinate::new(2, 3)),
                (Coordinate::new(2, 3), Coordinate::new(3, 3)),
            ]
        );
        assert!(plan.iter().all(|d| d.axis == Axis::Y), "column runs slide on Y");
        assert_eq!(plan.last().unwrap().to, 300.);
    }

    #[test]
    fn adjacent_tile_plans_a_single_step() {
        let (board, geometry, positions) = setup();
        let plan = plan_move(TileId(14), &board, &geometry, &positions);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].final_coordinate, Coordinate::new(3, 3));
    }

    #[test]
    fn off_axis_and_empty_tiles_plan_nothing() {
        let (board, geometry, positions) = setup();
        assert!(plan_move(TileId(0), &board, &geometry, &positions).is_empty());
        assert!(plan_move(TileId(15), &board, &geometry, &positions).is_empty());
        assert!(plan_move(TileId(99), &board, &geometry, &positions).is_empty());
    }

    #[test]
    fn axial_delta_measures_the_displayed_offset() {
        let (board, geometry, mut positions) = setup();
        positions.translate(TileId(13), Vec2::new(30., 0.));
        let plan = plan_move(TileId(13), &board, &geometry, &positions);
        assert_eq!(plan[0].from, 130.);
        assert_eq!(plan[0].axial_delta, 30.);
        assert_eq!(plan[0].original_position(), 100.);
    }

    #[test]
    fn committed_run_plans_back_as_its_mirror_image() {
        let (mut board, geometry, positions) = setup();
        let forward = plan_move(TileId(12), &board, &geometry, &positions);

        board.move_empty_to(Coordinate::new(3, 0));
        for d in &forward {
            board.place(d.tile, d.final_coordinate);
        }
        assert_eq!(board.check_invariants(), Ok(()));
        let positions = TilePositions::settled(&board, &geometry);

        let back = plan_move(TileId(14), &board, &geometry, &positions);
        let forward_tiles: Vec<TileId> = forward.iter().rev().map(|d| d.tile).collect();
        let back_tiles: Vec<TileId> = back.iter().map(|d| d.tile).collect();
        assert_eq!(back_tiles, forward_tiles);

        let forward_origins: Vec<IRect> = forward.iter().rev().map(|d| d.original_rect).collect();
        let back_finals: Vec<IRect> = back.iter().map(|d| d.final_rect).collect();
        assert_eq!(back_finals, forward_origins);
    }
}
