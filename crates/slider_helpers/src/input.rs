use bevy::prelude::*;

/// One frame's worth of primary pointer activity, mouse or first touch, in
/// window coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Vec2),
    /// Still held; reported every frame the position is known.
    Held(Vec2),
    /// Released. The position is unknown when the cursor left the window.
    Released(Option<Vec2>),
    /// The platform took the touch away, e.g. for a system gesture.
    Canceled,
}

pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

pub fn pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        touch_input.iter().next().map(|touch| touch.position())
    }
}

pub fn just_released(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
) -> bool {
    button_input.just_released(MouseButton::Left) || touch_input.any_just_released()
}

pub fn just_released_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_released(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        touch_input
            .iter_just_released()
            .next()
            .map(|touch| touch.position())
    }
}

/// This frame's mouse and touch input, before it is turned into events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerFrame {
    pub pressed: Option<Vec2>,
    /// `Some` when released this frame, holding the position if known.
    pub released: Option<Option<Vec2>>,
    pub canceled: bool,
    pub held: Option<Vec2>,
}

impl PointerFrame {
    pub fn read(
        button_input: &Res<ButtonInput<MouseButton>>,
        touch_input: &Res<Touches>,
        windows: &Query<&Window>,
    ) -> Self {
        Self {
            pressed: just_pressed_screen_position(button_input, touch_input, windows),
            released: just_released(button_input, touch_input)
                .then(|| just_released_screen_position(button_input, touch_input, windows)),
            canceled: touch_input.any_just_canceled(),
            held: pressed_screen_position(button_input, touch_input, windows),
        }
    }

    /// Events in the order they are handled. A quick tap can be pressed and
    /// released within one frame, so both are reported, press first.
    pub fn events(self) -> Vec<PointerEvent> {
        let mut events = Vec::with_capacity(2);
        if let Some(position) = self.pressed {
            events.push(PointerEvent::Pressed(position));
        }
        if let Some(position) = self.released {
            events.push(PointerEvent::Released(position.or(self.pressed)));
        } else if self.canceled {
            events.push(PointerEvent::Canceled);
        } else if self.pressed.is_none() {
            events.extend(self.held.map(PointerEvent::Held));
        }
        events
    }
}

/// Turns this frame's mouse and touch input into pointer events.
pub fn pointer_events(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Vec<PointerEvent> {
    PointerFrame::read(button_input, touch_input, windows).events()
}
