//! A sine curve `f(x) = a * sin(bx + c) + d` animated in a fixed-size character grid.
//!
//! Each frame measures elapsed time, samples input, updates the curve, rasterizes it and hands
//! the finished buffer to a [`render::Presenter`].

pub mod animation;
pub mod clock;
pub mod config;
pub mod curve;
pub mod input;
pub mod render;

pub use animation::{AnimationError, Mode, SineAnimation};
pub use config::{ConfigError, ScreenConfig};
