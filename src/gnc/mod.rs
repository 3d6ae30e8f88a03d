pub mod controller;
pub mod gravity_turn;

pub use controller::Guidance;
pub use gravity_turn::{GravityTurnGuidance, Phase};
