use bevy::prelude::*;
#[cfg(target_arch = "wasm32")]
use bevy::window::PrimaryWindow;

// wgpu refuses surfaces above the max texture extent on most browsers
#[cfg(target_arch = "wasm32")]
const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Logical window size in whole pixels, the unit the puzzle lays out in.
pub fn viewport_size(window: &Window) -> IVec2 {
    IVec2::new(
        window.resolution.width().floor() as i32,
        window.resolution.height().floor() as i32,
    )
}

/// Follows the browser window size, clamped to what the surface supports.
/// Each change surfaces as a regular `WindowResized` event.
#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(mut primary_query: Query<&mut Window, With<PrimaryWindow>>) {
    let Some(browser) = web_sys::window() else {
        return;
    };
    let (Ok(width), Ok(height)) = (browser.inner_width(), browser.inner_height()) else {
        return;
    };
    let (Some(width), Some(height)) = (width.as_f64(), height.as_f64()) else {
        return;
    };
    let width = (width as f32).min(MAX_SURFACE_EXTENT);
    let height = (height as f32).min(MAX_SURFACE_EXTENT);

    for mut window in &mut primary_query {
        if (window.resolution.width() - width).abs() > f32::EPSILON
            || (window.resolution.height() - height).abs() > f32::EPSILON
        {
            window.resolution.set(width, height);
        }
    }
}
