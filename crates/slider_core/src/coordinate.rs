use core::fmt::{self, Display, Formatter};

use bevy_math::Vec2;
use strum::{EnumIter, IntoEnumIterator};

/// Row/column position of a cell on the board, 0-indexed from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

impl Coordinate {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub const fn shares_axis_with(&self, other: &Self) -> bool {
        self.row == other.row || self.column == other.column
    }

    pub const fn is_to_right_of(&self, other: &Self) -> bool {
        self.shares_axis_with(other) && self.column > other.column
    }

    pub const fn is_to_left_of(&self, other: &Self) -> bool {
        self.shares_axis_with(other) && self.column < other.column
    }

    pub const fn is_above(&self, other: &Self) -> bool {
        self.shares_axis_with(other) && self.row < other.row
    }

    pub const fn is_below(&self, other: &Self) -> bool {
        self.shares_axis_with(other) && self.row > other.row
    }

    /// The single relation `self` has to `other`, if any.
    ///
    /// Returns `None` for the same cell and for cells that share no axis.
    pub fn relation_to(&self, other: &Self) -> Option<Relation> {
        Relation::iter().find(|relation| relation.holds(self, other))
    }

    /// Neighbouring cell one step in `relation`'s closing direction.
    pub(crate) fn step_toward(&self, relation: Relation) -> Option<Self> {
        let (rows, columns) = relation.step();
        Some(Self {
            row: self.row.checked_add_signed(rows)?,
            column: self.column.checked_add_signed(columns)?,
        })
    }

    /// Row-major index on a square grid of side `grid_size`.
    pub const fn index(&self, grid_size: usize) -> usize {
        self.row * grid_size + self.column
    }

    pub const fn from_index(index: usize, grid_size: usize) -> Self {
        Self {
            row: index / grid_size,
            column: index % grid_size,
        }
    }

    pub const fn is_within(&self, grid_size: usize) -> bool {
        self.row < grid_size && self.column < grid_size
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Movement axis in screen space. Tiles sharing a row slide along `X`,
/// tiles sharing a column slide along `Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const fn component(self, v: Vec2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// Drops the cross-axis part of `delta`.
    pub const fn project(self, delta: Vec2) -> Vec2 {
        match self {
            Self::X => Vec2::new(delta.x, 0.),
            Self::Y => Vec2::new(0., delta.y),
        }
    }
}

/// Where a tile sits relative to the empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Relation {
    RightOf,
    LeftOf,
    Above,
    Below,
}

impl Relation {
    const fn holds(self, a: &Coordinate, b: &Coordinate) -> bool {
        match self {
            Self::RightOf => a.is_to_right_of(b),
            Self::LeftOf => a.is_to_left_of(b),
            Self::Above => a.is_above(b),
            Self::Below => a.is_below(b),
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Self::RightOf | Self::LeftOf => Axis::X,
            Self::Above | Self::Below => Axis::Y,
        }
    }

    /// `(rows, columns)` step that closes the gap toward the empty cell.
    const fn step(self) -> (isize, isize) {
        match self {
            Self::RightOf => (0, -1),
            Self::LeftOf => (0, 1),
            Self::Above => (1, 0),
            Self::Below => (-1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_coordinates(grid_size: usize) -> impl Iterator<Item = Coordinate> + Clone {
        (0..grid_size * grid_size).map(move |i| Coordinate::from_index(i, grid_size))
    }

    #[test]
    fn at_most_one_relation_holds() {
        for a in all_coordinates(4) {
            for b in all_coordinates(4) {
                let held = [
                    a.is_to_right_of(&b),
                    a.is_to_left_of(&b),
                    a.is_above(&b),
                    a.is_below(&b),
                ]
                .into_iter()
                .filter(|held| *held)
                .count();

                if a == b || !a.shares_axis_with(&b) {
                    assert_eq!(held, 0, "{a} vs {b}");
                    assert_eq!(a.relation_to(&b), None);
                } else {
                    assert_eq!(held, 1, "{a} vs {b}");
                    assert!(a.relation_to(&b).is_some(), "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn relations_follow_screen_orientation() {
        let empty = Coordinate::new(3, 3);
        assert_eq!(
            Coordinate::new(3, 0).relation_to(&empty),
            Some(Relation::LeftOf)
        );
        assert_eq!(
            Coordinate::new(0, 3).relation_to(&empty),
            Some(Relation::Above)
        );
        assert_eq!(
            Coordinate::new(1, 1).relation_to(&Coordinate::new(1, 0)),
            Some(Relation::RightOf)
        );
        assert_eq!(
            Coordinate::new(2, 1).relation_to(&Coordinate::new(0, 1)),
            Some(Relation::Below)
        );
        assert_eq!(Coordinate::new(0, 0).relation_to(&empty), None);
    }

    #[test]
    fn row_relations_move_along_x() {
        assert_eq!(Relation::RightOf.axis(), Axis::X);
        assert_eq!(Relation::LeftOf.axis(), Axis::X);
        assert_eq!(Relation::Above.axis(), Axis::Y);
        assert_eq!(Relation::Below.axis(), Axis::Y);
    }

    #[test]
    fn projection_ignores_the_cross_axis() {
        let delta = Vec2::new(12., -7.);
        assert_eq!(Axis::X.project(delta), Vec2::new(12., 0.));
        assert_eq!(Axis::Y.project(delta), Vec2::new(0., -7.));
        assert_eq!(Axis::Y.component(delta), -7.);
    }

    #[test]
    fn step_toward_stays_on_the_shared_axis() {
        let c = Coordinate::new(2, 2);
        assert_eq!(c.step_toward(Relation::RightOf), Some(Coordinate::new(2, 1)));
        assert_eq!(c.step_toward(Relation::LeftOf), Some(Coordinate::new(2, 3)));
        assert_eq!(c.step_toward(Relation::Above), Some(Coordinate::new(3, 2)));
        assert_eq!(c.step_toward(Relation::Below), Some(Coordinate::new(1, 2)));
        assert_eq!(Coordinate::new(0, 0).step_toward(Relation::Below), None);
    }

    #[test]
    fn index_round_trips_through_row_major_order() {
        for (i, c) in all_coordinates(4).enumerate() {
            assert_eq!(c.index(4), i);
            assert!(c.is_within(4), "{c} should be on a 4x4 board");
        }
        assert!(!Coordinate::new(4, 0).is_within(4), "row 4 is off the board");
    }
}
