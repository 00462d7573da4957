/// Fixed tuning for the multi-scale cascade scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Image shrink factor between scan scales.
    pub scale_step: f64,
    /// Overlapping candidates a detection needs to be kept.
    pub min_neighbors: i32,
    pub min_size: (i32, i32),
    pub max_size: (i32, i32),
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_step: 1.1,
            min_neighbors: 7,
            min_size: (100, 100),
            max_size: (400, 400),
        }
    }
}
