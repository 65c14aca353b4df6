//! Core data models for the pairing engine.

mod ids;
mod pairing;
mod player;
mod points;
mod result;
mod round;
mod section;

pub use ids::*;
pub use pairing::*;
pub use player::*;
pub use points::*;
pub use result::*;
pub use round::*;
pub use section::*;
