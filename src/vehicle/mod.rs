pub mod rocket;

pub use rocket::{Rocket, RocketSnapshot};
