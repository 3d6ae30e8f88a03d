pub mod trial;

pub use trial::{StopReason, TelemetrySample, Trial};
