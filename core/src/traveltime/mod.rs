pub mod calculator;
pub mod reference;
pub mod velocity;

pub use calculator::{PhaseArrivals, TravelTimeCalculator};
pub use reference::{Phase, ReferenceModel};
pub use velocity::VelocityModel;
