use bevy::prelude::*;

#[derive(Component)]
pub struct RestartButton;

/// A resource that knows how to start over, driven by a [`RestartButton`].
pub trait Restartable: Resource {
    fn restart(&mut self);
}

pub fn spawn_restart_button(commands: &mut Commands, label: &str) {
    commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Px(24.0),
                padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgb(0.2, 0.2, 0.25)),
            RestartButton,
        ))
        .with_child((
            Text::new(label),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
}

pub fn handle_restart<T: Restartable>(
    mut restartable: ResMut<T>,
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
) {
    for interaction in &interaction_query {
        if *interaction == Interaction::Pressed {
            restartable.restart();
        }
    }
}
