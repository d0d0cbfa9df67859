use seiscore::prelude::{ModelError, ModelResult};
use seiscore::traveltime::{Phase, ReferenceModel};

/// Depth grid of the embedded table, kilometers.
const DEPTHS_KM: [f64; 13] = [
    0.0, 25.0, 50.0, 75.0, 100.0, 150.0, 200.0, 250.0, 300.0, 400.0, 500.0, 600.0, 700.0,
];
/// Distance grid, degrees.
const DISTANCES_DEG: [f64; 13] = [
    0.0, 2.5, 5.0, 7.5, 10.0, 12.5, 15.0, 17.5, 20.0, 22.5, 25.0, 27.5, 30.0,
];

/// P travel times in seconds over the depth x distance grid, exported from a
/// reference phase-table run over the layered spherical model.
const P_TABLE: [[f64; 13]; 13] = [
    [0.000, 45.568, 91.114, 136.617, 182.055, 222.843, 246.788, 273.294, 301.348, 330.382, 360.047, 390.118, 420.438],
    [4.098, 45.663, 91.028, 136.411, 179.518, 208.702, 237.751, 267.112, 296.860, 326.944, 357.283, 387.795, 418.409],
    [7.545, 42.455, 83.879, 125.487, 167.090, 200.109, 231.474, 262.410, 293.216, 324.016, 354.842, 385.688, 416.530],
    [10.557, 40.303, 78.485, 117.089, 155.754, 194.340, 226.857, 258.705, 290.193, 321.487, 352.667, 383.764, 414.781],
    [13.569, 39.804, 76.043, 113.006, 150.117, 187.236, 223.324, 255.712, 287.642, 319.278, 350.714, 381.998, 413.147],
    [19.593, 40.879, 74.367, 109.336, 144.675, 180.118, 215.564, 250.957, 283.576, 315.603, 347.349, 378.865, 410.182],
    [25.617, 43.406, 74.600, 108.132, 142.319, 176.734, 211.217, 245.688, 280.097, 312.677, 344.553, 376.171, 407.558],
    [31.641, 46.801, 75.864, 108.119, 141.357, 174.975, 208.740, 242.540, 276.310, 310.005, 342.203, 373.833, 405.223],
    [37.665, 50.786, 77.838, 108.861, 141.223, 174.135, 207.288, 240.532, 273.782, 306.983, 340.096, 371.796, 403.136],
    [49.714, 59.916, 83.327, 111.917, 142.568, 174.151, 206.193, 238.461, 270.823, 303.198, 335.529, 367.774, 399.594],
    [60.293, 68.342, 88.174, 113.761, 141.991, 171.524, 201.745, 232.340, 263.131, 294.006, 324.890, 355.732, 386.488],
    [70.710, 77.278, 94.267, 117.206, 143.233, 170.905, 199.498, 228.623, 258.053, 287.647, 317.312, 346.979, 376.599],
    [81.127, 86.633, 101.365, 122.004, 146.037, 172.012, 199.131, 226.942, 255.175, 283.659, 312.277, 340.949, 369.613],
];

const PP_TABLE: [[f64; 13]; 13] = [
    [0.000, 45.568, 91.114, 136.617, 182.055, 222.843, 246.788, 273.294, 301.348, 330.382, 360.047, 390.118, 420.438],
    [4.098, 49.666, 95.213, 140.716, 186.154, 226.941, 250.887, 277.392, 305.446, 334.480, 364.146, 394.216, 424.536],
    [7.545, 53.113, 98.659, 144.162, 189.600, 230.388, 254.333, 280.839, 308.893, 337.926, 367.592, 397.663, 427.983],
    [10.557, 56.125, 101.671, 147.174, 192.612, 233.400, 257.345, 283.851, 311.905, 340.939, 370.604, 400.675, 430.995],
    [13.569, 59.137, 104.683, 150.187, 195.625, 236.412, 260.357, 286.863, 314.917, 343.951, 373.616, 403.687, 434.007],
    [19.593, 65.161, 110.708, 156.211, 201.649, 242.436, 266.381, 292.887, 320.941, 349.975, 379.640, 409.711, 440.031],
    [25.617, 71.185, 116.732, 162.235, 207.673, 248.460, 272.406, 298.911, 326.965, 355.999, 385.664, 415.735, 446.055],
    [31.641, 77.209, 122.756, 168.259, 213.697, 254.484, 278.430, 304.935, 332.989, 362.023, 391.689, 421.759, 452.079],
    [37.665, 83.233, 128.780, 174.283, 219.721, 260.508, 284.454, 310.959, 339.013, 368.047, 397.713, 427.784, 458.103],
    [49.714, 95.282, 140.828, 186.331, 231.769, 272.557, 296.502, 323.007, 351.061, 380.095, 409.761, 439.832, 470.151],
    [60.293, 105.862, 151.408, 196.911, 242.349, 283.136, 307.082, 333.587, 361.641, 390.675, 420.341, 450.412, 480.731],
    [70.710, 116.278, 161.825, 207.328, 252.766, 293.553, 317.498, 344.004, 372.058, 401.092, 430.757, 460.828, 491.148],
    [81.127, 126.695, 172.241, 217.744, 263.182, 303.970, 327.915, 354.421, 382.475, 411.508, 441.174, 471.245, 501.565],
];

const SP_TABLE: [[f64; 13]; 13] = [
    [0.000, 45.568, 91.114, 136.617, 182.055, 222.843, 246.788, 273.294, 301.348, 330.382, 360.047, 390.118, 420.438],
    [7.042, 52.610, 98.157, 143.660, 189.098, 229.885, 253.831, 280.336, 308.390, 337.424, 367.090, 397.160, 427.480],
    [13.120, 58.688, 104.234, 149.738, 195.176, 235.963, 259.908, 286.414, 314.468, 343.502, 373.167, 403.238, 433.558],
    [18.555, 64.123, 109.669, 155.172, 200.610, 241.398, 265.343, 291.849, 319.903, 348.936, 378.602, 408.673, 438.993],
    [23.990, 69.558, 115.104, 160.607, 206.045, 246.833, 270.778, 297.283, 325.337, 354.371, 384.037, 414.108, 444.427],
    [34.859, 80.427, 125.974, 171.477, 216.915, 257.702, 281.647, 308.153, 336.207, 365.241, 394.906, 424.977, 455.297],
    [45.729, 91.297, 136.843, 182.346, 227.784, 268.572, 292.517, 319.022, 347.077, 376.110, 405.776, 435.847, 466.167],
    [56.598, 102.166, 147.713, 193.216, 238.654, 279.441, 303.387, 329.892, 357.946, 386.980, 416.646, 446.716, 477.036],
    [67.468, 113.036, 158.582, 204.085, 249.523, 290.311, 314.256, 340.762, 368.816, 397.849, 427.515, 457.586, 487.906],
    [89.207, 134.775, 180.321, 225.824, 271.262, 312.050, 335.995, 362.501, 390.555, 419.589, 449.254, 479.325, 509.645],
    [108.362, 153.930, 199.476, 244.980, 290.418, 331.205, 355.150, 381.656, 409.710, 438.744, 468.409, 498.480, 528.800],
    [127.230, 172.798, 218.344, 263.847, 309.285, 350.073, 374.018, 400.524, 428.578, 457.611, 487.277, 517.348, 547.668],
    [146.098, 191.666, 237.212, 282.715, 328.153, 368.941, 392.886, 419.392, 447.446, 476.479, 506.145, 536.216, 566.536],
];

/// Coarse embedded travel-time table with bilinear interpolation, standing in
/// for the external reference phase model during comparison runs.
pub struct TableReferenceModel;

impl TableReferenceModel {
    pub fn new() -> Self {
        Self
    }

    fn bracket(grid: &[f64], value: f64) -> ModelResult<(usize, f64)> {
        let last = grid.len() - 1;
        if !value.is_finite() || value < grid[0] || value > grid[last] {
            return Err(ModelError::InvalidInput(format!(
                "value {} outside table range {}..{}",
                value, grid[0], grid[last]
            )));
        }
        let upper = grid
            .iter()
            .position(|&edge| value <= edge)
            .unwrap_or(last)
            .max(1);
        let lower = upper - 1;
        let span = grid[upper] - grid[lower];
        let fraction = if span > 0.0 {
            (value - grid[lower]) / span
        } else {
            0.0
        };
        Ok((lower, fraction))
    }

    fn lookup(table: &[[f64; 13]; 13], depth_km: f64, distance_deg: f64) -> ModelResult<f64> {
        let (d0, fd) = Self::bracket(&DEPTHS_KM, depth_km)?;
        let (x0, fx) = Self::bracket(&DISTANCES_DEG, distance_deg)?;
        let top = table[d0][x0] * (1.0 - fx) + table[d0][x0 + 1] * fx;
        let bottom = table[d0 + 1][x0] * (1.0 - fx) + table[d0 + 1][x0 + 1] * fx;
        Ok(top * (1.0 - fd) + bottom * fd)
    }
}

impl Default for TableReferenceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceModel for TableReferenceModel {
    fn reference_times(
        &self,
        depth_km: f64,
        distance_deg: f64,
        phases: &[Phase],
    ) -> ModelResult<Vec<f64>> {
        phases
            .iter()
            .map(|phase| {
                let table = match phase {
                    Phase::P => &P_TABLE,
                    Phase::Pp => &PP_TABLE,
                    Phase::Sp => &SP_TABLE,
                };
                Self::lookup(table, depth_km, distance_deg)
            })
            .collect()
    }
}
