pub mod buffer_pool;
pub mod decimate;
pub mod envelope;
pub mod filter;
pub mod noise;
pub mod spikes;
pub mod wavelet;

pub use buffer_pool::BufferPool;
pub use decimate::DecimateStage;
pub use envelope::EnvelopeStage;
pub use filter::BandpassStage;
pub use noise::NoiseStage;
pub use spikes::build_spike_train;
pub use wavelet::{ricker_wavelet, WaveletStage};
