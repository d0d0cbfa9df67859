pub mod compare;
pub mod table;

pub use compare::{compare_delays, PhaseDeviation};
pub use table::TableReferenceModel;
