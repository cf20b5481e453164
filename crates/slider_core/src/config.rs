use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 4;
/// Largest board side accepted from a config or a saved board.
pub const MAX_GRID_SIZE: usize = 32;
/// Pixels shaved off each tile so the board does not touch the viewport edges.
pub const TILE_MARGIN: i32 = 5;
/// A drag shorter than `tile_size / CLICK_THRESHOLD_DIVISOR` counts as a tap.
pub const CLICK_THRESHOLD_DIVISOR: i32 = 20;

/// When the controller advances its remembered pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerTracking {
    /// Every move event, admitted or not. Movement blocked by an obstacle is
    /// dropped, so the tile follows the pointer again as soon as it is free.
    #[default]
    Always,
    /// Only after the tiles actually moved. Blocked movement accumulates and
    /// is replayed once the obstruction clears.
    OnlyWhenApplied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub grid_size: usize,
    pub margin: i32,
    pub click_threshold_divisor: i32,
    /// A gesture with more move events than this is never a tap.
    pub click_max_move_events: Option<u32>,
    pub pointer_tracking: PointerTracking,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            margin: TILE_MARGIN,
            click_threshold_divisor: CLICK_THRESHOLD_DIVISOR,
            click_max_move_events: None,
            pointer_tracking: PointerTracking::default(),
        }
    }
}

impl SliderConfig {
    /// Largest axial offset, exclusive, that still counts as a tap.
    pub const fn click_threshold(&self, tile_size: i32) -> i32 {
        if self.click_threshold_divisor > 0 {
            tile_size / self.click_threshold_divisor
        } else {
            0
        }
    }

    pub fn allows_click_after(&self, move_events: u32) -> bool {
        self.click_max_move_events
            .is_none_or(|max_events| move_events <= max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_board() {
        let config = SliderConfig::default();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.click_threshold(115), 5);
        assert!(config.allows_click_after(1000), "no move-count gate by default");
    }

    #[test]
    fn move_event_gate() {
        let config = SliderConfig {
            click_max_move_events: Some(2),
            ..SliderConfig::default()
        };
        assert!(config.allows_click_after(2), "two events are within the gate");
        assert!(!config.allows_click_after(3), "three events exceed the gate");
    }
}
