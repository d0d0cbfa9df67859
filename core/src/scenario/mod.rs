pub mod builder;

pub use builder::{build_scenario, Scenario, ScenarioConfig, StationRecord};
