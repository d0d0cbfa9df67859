pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f32>() / samples.len() as f32
    }

    /// Population standard deviation.
    pub fn std_dev(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let mean = Self::mean(samples);
        let var = samples.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>()
            / samples.len() as f32;
        var.sqrt()
    }

    pub fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }

    /// Standardizes the samples to zero mean and unit variance in place.
    /// Flat sequences are left unchanged.
    pub fn zscore_in_place(samples: &mut [f32]) {
        let mean = Self::mean(samples);
        let std = Self::std_dev(samples);
        if std <= f32::EPSILON {
            return;
        }
        for value in samples.iter_mut() {
            *value = (*value - mean) / std;
        }
    }
}
