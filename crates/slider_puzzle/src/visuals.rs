use bevy::prelude::*;
use slider_core::{Gameboard, TileId};

const FRAME_WIDTH: f32 = 8.;
const TILE_GAP: f32 = 2.;
const LABEL_SIZE_RATIO: f32 = 0.5;

/// Everything drawn for the current layout, despawned when it changes.
#[derive(Component)]
pub struct BoardVisual;

#[derive(Component)]
pub struct TileSprite {
    pub tile: TileId,
}

/// Maps the gameboard's window coordinates (origin top-left, y down) to a
/// centered 2D camera's world (origin center, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    pub viewport: Vec2,
    pub tile_size: f32,
}

impl ScreenLayout {
    pub fn new(viewport: IVec2, gameboard: &Gameboard) -> Self {
        Self {
            viewport: viewport.as_vec2(),
            tile_size: gameboard.geometry().tile_size as f32,
        }
    }

    pub fn world_point(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x - self.viewport.x / 2.,
            self.viewport.y / 2. - screen.y,
        )
    }

    /// Sprite translation for a tile whose top-left corner is at `origin`.
    pub fn tile_translation(&self, origin: Vec2) -> Vec3 {
        let center = origin + Vec2::splat(self.tile_size / 2.);
        self.world_point(center).extend(0.)
    }
}

pub fn spawn_board(commands: &mut Commands, gameboard: &Gameboard, layout: ScreenLayout) {
    let board_rect = gameboard.geometry().board_rect.as_rect();
    let board_center = layout.world_point(board_rect.center());
    let board_size = board_rect.size();

    commands
        .spawn((
            Sprite::from_color(Color::WHITE, board_size + Vec2::splat(FRAME_WIDTH * 2.)),
            Transform::from_translation(board_center.extend(-10.)),
            BoardVisual,
        ))
        .with_child((
            Sprite::from_color(Color::BLACK, board_size),
            Transform::from_xyz(0., 0., 5.),
        ));

    let sprite_size = Vec2::splat((layout.tile_size - TILE_GAP).max(1.));
    for tile in gameboard.board().tiles().filter(|tile| !tile.is_empty) {
        let Some(origin) = gameboard.positions().get(tile.id) else {
            continue;
        };
        commands
            .spawn((
                Sprite::from_color(Color::WHITE, sprite_size),
                Transform::from_translation(layout.tile_translation(origin)),
                TileSprite { tile: tile.id },
                BoardVisual,
            ))
            .with_child((
                Text2d::new((tile.id.0 + 1).to_string()),
                TextFont {
                    font_size: layout.tile_size * LABEL_SIZE_RATIO,
                    ..default()
                },
                TextColor(Color::BLACK),
                Transform::from_xyz(0., 0., 10.),
            ));
    }
}

pub fn despawn_board(commands: &mut Commands, visual_query: &Query<Entity, With<BoardVisual>>) {
    for entity in visual_query {
        commands.entity(entity).despawn_recursive();
    }
}
