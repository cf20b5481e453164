use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use fastrand::Rng;
use slider_core::{Gameboard, GestureResponse, SliderConfig, TileId, TileMotion};
use slider_helpers::input::{pointer_events, PointerEvent};
use slider_helpers::restart::{handle_restart, spawn_restart_button, Restartable};
use slider_helpers::window::viewport_size;
use visuals::{despawn_board, spawn_board, BoardVisual, ScreenLayout, TileSprite};

mod visuals;

const SLIDE_SPEED: f32 = 8.;

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
enum GameState {
    #[default]
    Init,
    Game,
}

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
enum PanelState {
    #[default]
    StandBy,
    Slide,
}

#[derive(Component)]
struct MainCamera;

#[derive(Resource, Debug, Clone, Copy)]
pub struct PuzzleSettings {
    pub slider: SliderConfig,
    /// Fraction of a slide animation covered per second.
    pub slide_speed: f32,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            slider: SliderConfig::default(),
            slide_speed: SLIDE_SPEED,
        }
    }
}

#[derive(Resource)]
pub struct PuzzleBoard {
    gameboard: Gameboard,
    rng: Rng,
    viewport: IVec2,
}

impl PuzzleBoard {
    fn layout(&self) -> ScreenLayout {
        ScreenLayout::new(self.viewport, &self.gameboard)
    }
}

impl Restartable for PuzzleBoard {
    fn restart(&mut self) {
        match self.gameboard.new_game(&mut self.rng) {
            Ok(()) => info!("New game\n{}", self.gameboard.board()),
            Err(err) => warn!("Cannot start a new game: {err}"),
        }
    }
}

/// The tile under the pointer since it went down.
#[derive(Resource, Default)]
struct PuzzlePlayer {
    grabbed: Option<TileId>,
    last_position: Option<Vec2>,
}

impl PuzzlePlayer {
    fn release(&mut self) -> Option<(TileId, Option<Vec2>)> {
        let tile = self.grabbed.take()?;
        Some((tile, self.last_position.take()))
    }

    /// Forwards one pointer event to the gameboard. `None` when the event
    /// concerns no tile.
    fn handle(
        &mut self,
        gameboard: &mut Gameboard,
        event: PointerEvent,
    ) -> Option<GestureResponse> {
        match event {
            PointerEvent::Pressed(position) => {
                let tile = gameboard.tile_at_point(position)?;
                let response = gameboard.on_pointer_down(tile, position);
                if response.is_handled() {
                    self.grabbed = Some(tile);
                    self.last_position = Some(position);
                }
                Some(response)
            }
            PointerEvent::Held(position) => {
                let tile = self.grabbed?;
                // Only report moves where the pointer actually moved
                if self.last_position == Some(position) {
                    return None;
                }
                self.last_position = Some(position);
                Some(gameboard.on_pointer_move(tile, position))
            }
            PointerEvent::Released(position) => {
                let (tile, last_position) = self.release()?;
                let position = position.or(last_position).unwrap_or_default();
                Some(gameboard.on_pointer_up(tile, position))
            }
            PointerEvent::Canceled => {
                self.release()?;
                Some(gameboard.on_pointer_cancel())
            }
        }
    }
}

#[derive(Resource, Default)]
struct SlideAnimation {
    motions: Vec<TileMotion>,
    alpha: f32,
}

pub fn run() {
    slider_helpers::get_default_app(env!("CARGO_PKG_NAME"))
        .init_state::<GameState>()
        .init_state::<PanelState>()
        .init_resource::<PuzzleSettings>()
        .init_resource::<PuzzlePlayer>()
        .init_resource::<SlideAnimation>()
        .add_systems(Startup, spawn_camera)
        .add_systems(
            Update,
            (
                init_puzzle.run_if(in_state(GameState::Init)),
                window_resized_puzzle.run_if(in_state(GameState::Game)),
                (
                    pointer_events_puzzle,
                    handle_restart::<PuzzleBoard>,
                    sync_tile_transforms.run_if(resource_exists_and_changed::<PuzzleBoard>),
                )
                    .chain()
                    .run_if(in_state(GameState::Game))
                    .run_if(in_state(PanelState::StandBy)),
                panel_slide_system
                    .run_if(in_state(GameState::Game))
                    .run_if(in_state(PanelState::Slide)),
            ),
        )
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d).insert(MainCamera);
}

fn init_puzzle(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<PuzzleSettings>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let viewport = viewport_size(window);
    let mut rng = Rng::new();
    let gameboard = match Gameboard::new(viewport, settings.slider, &mut rng) {
        Ok(gameboard) => gameboard,
        Err(err) => {
            debug!("Waiting for a usable window: {err}");
            return;
        }
    };
    info!("New game\n{}", gameboard.board());

    let puzzle = PuzzleBoard {
        gameboard,
        rng,
        viewport,
    };
    spawn_board(&mut commands, &puzzle.gameboard, puzzle.layout());
    spawn_restart_button(&mut commands, "New game");
    commands.insert_resource(puzzle);
    next_state.set(GameState::Game);
}

fn pointer_events_puzzle(
    windows: Query<&Window>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    mut puzzle: ResMut<PuzzleBoard>,
    mut player: ResMut<PuzzlePlayer>,
    mut animation: ResMut<SlideAnimation>,
    mut next_state: ResMut<NextState<PanelState>>,
) {
    for event in pointer_events(&mouse_button_input, &touch_input, &windows) {
        let Some(response) = player.handle(&mut puzzle.gameboard, event) else {
            continue;
        };
        match response {
            GestureResponse::Resolved(outcome) => {
                debug!(
                    "{} {} tile(s)",
                    if outcome.is_commit() { "Sliding" } else { "Reverting" },
                    outcome.motions().len()
                );
                animation.motions = outcome.motions().to_vec();
                animation.alpha = 0.;
                next_state.set(PanelState::Slide);
            }
            GestureResponse::Rejected(rejection) => debug!("Ignored {event:?}: {rejection:?}"),
            GestureResponse::Started | GestureResponse::Dragged { .. } => {}
        }
    }
}

fn sync_tile_transforms(
    puzzle: Res<PuzzleBoard>,
    mut tile_query: Query<(&TileSprite, &mut Transform)>,
) {
    let layout = puzzle.layout();
    for (sprite, mut transform) in &mut tile_query {
        if let Some(origin) = puzzle.gameboard.positions().get(sprite.tile) {
            transform.translation = layout.tile_translation(origin);
        }
    }
}

fn panel_slide_system(
    time: Res<Time>,
    settings: Res<PuzzleSettings>,
    mut animation: ResMut<SlideAnimation>,
    mut puzzle: ResMut<PuzzleBoard>,
    mut tile_query: Query<(&TileSprite, &mut Transform)>,
    mut next_state: ResMut<NextState<PanelState>>,
) {
    animation.alpha = time
        .delta_secs()
        .mul_add(settings.slide_speed, animation.alpha)
        .min(1.);

    let layout = puzzle.layout();
    for (sprite, mut transform) in &mut tile_query {
        if let Some(motion) = animation.motions.iter().find(|m| m.tile == sprite.tile) {
            let origin = motion.from.lerp(motion.to, animation.alpha);
            transform.translation = layout.tile_translation(origin);
        }
    }

    if animation.alpha >= 1. {
        for motion in core::mem::take(&mut animation.motions) {
            if let Err(err) = puzzle.gameboard.complete_motion(motion.tile) {
                warn!("{err}");
            }
        }
        animation.alpha = 0.;
        next_state.set(PanelState::StandBy);
    }
}

/// Lays the same board out again for the new window size. Any drag or slide
/// in flight is finished first so the tile order is stable.
fn window_resized_puzzle(
    mut commands: Commands,
    mut resize_reader: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut puzzle: ResMut<PuzzleBoard>,
    mut player: ResMut<PuzzlePlayer>,
    mut animation: ResMut<SlideAnimation>,
    visual_query: Query<Entity, With<BoardVisual>>,
    mut next_state: ResMut<NextState<PanelState>>,
) {
    if resize_reader.read().last().is_none() {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let viewport = viewport_size(window);
    if viewport == puzzle.viewport {
        return;
    }

    puzzle.gameboard.settle();
    player.release();
    animation.motions.clear();
    animation.alpha = 0.;
    next_state.set(PanelState::StandBy);

    let order = puzzle.gameboard.serialize_order();
    let config = *puzzle.gameboard.config();
    match Gameboard::restore(&order, viewport, config) {
        Ok(gameboard) => {
            puzzle.gameboard = gameboard;
            puzzle.viewport = viewport;
            info!(
                "Restored board for {}x{} with {} px tiles",
                viewport.x,
                viewport.y,
                puzzle.gameboard.geometry().tile_size
            );
        }
        Err(err) => warn!("Keeping the previous layout: {err}"),
    }
    despawn_board(&mut commands, &visual_query);
    spawn_board(&mut commands, &puzzle.gameboard, puzzle.layout());
}

#[cfg(test)]
mod tests {
    use slider_core::{Board, Coordinate};

    use super::*;

    /// Solved board, 100 px tiles filling a 400x400 window.
    fn solved() -> Gameboard {
        let config = SliderConfig {
            margin: 0,
            ..SliderConfig::default()
        };
        Gameboard::from_board(Board::new(4).unwrap(), IVec2::new(400, 400), config).unwrap()
    }

    #[test]
    fn tap_pressed_and_released_in_one_frame_commits() {
        let mut gameboard = solved();
        let mut player = PuzzlePlayer::default();
        let tap = Vec2::new(250., 350.);

        assert_eq!(
            player.handle(&mut gameboard, PointerEvent::Pressed(tap)),
            Some(GestureResponse::Started)
        );
        let Some(GestureResponse::Resolved(outcome)) =
            player.handle(&mut gameboard, PointerEvent::Released(Some(tap)))
        else {
            panic!("the release should resolve the tap");
        };
        assert!(outcome.is_commit(), "a tap on a legal tile commits");
        assert!(player.grabbed.is_none(), "nothing stays grabbed");
        assert_eq!(gameboard.board().empty_coordinate(), Coordinate::new(3, 2));
    }

    #[test]
    fn press_outside_the_tiles_grabs_nothing() {
        let mut gameboard = solved();
        let mut player = PuzzlePlayer::default();
        let empty_cell = Vec2::new(350., 350.);
        assert_eq!(player.handle(&mut gameboard, PointerEvent::Pressed(empty_cell)), None);
        assert_eq!(
            player.handle(&mut gameboard, PointerEvent::Released(Some(empty_cell))),
            None
        );
        assert!(!gameboard.controller().is_dragging(), "no gesture started");
    }

    #[test]
    fn unchanged_held_position_is_not_a_move() {
        let mut gameboard = solved();
        let mut player = PuzzlePlayer::default();
        let start = Vec2::new(250., 350.);
        player.handle(&mut gameboard, PointerEvent::Pressed(start));
        assert_eq!(player.handle(&mut gameboard, PointerEvent::Held(start)), None);
        assert_eq!(
            player.handle(&mut gameboard, PointerEvent::Held(start + Vec2::X)),
            Some(GestureResponse::Dragged { applied: false })
        );
    }
}
