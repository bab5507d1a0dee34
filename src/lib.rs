//! Parametric terminal animations that can modulate each other.
//!
//! Generators live in [`viz`], the parameter contract and composites in
//! [`anim`], and [`driver::AnimationDriver`] steps whichever entry is active.

pub mod anim;
pub mod colors;
pub mod driver;
pub mod error;
pub mod frame;
pub mod help;
pub mod input;
pub mod presets;
pub mod settings;
pub mod terminal;
pub mod viz;

pub use error::{Error, Result};
