mod app;
pub use app::*;

pub mod input;
pub mod restart;

pub mod window;
