//! Delivery throughput over consecutive windows.

/// Deliveries per window with their mean and sample standard deviation.
#[derive(Clone, Debug, PartialEq)]
pub struct Throughput {
    pub windows: Vec<u64>,
    pub mean: f64,
    pub std_dev: f64,
}

impl Throughput {
    /// Summarise per-window counts.  The deviation uses `n - 1`; a single
    /// window has a deviation of zero.
    pub fn from_counts(windows: Vec<u64>) -> Self {
        let n = windows.len();
        if n == 0 {
            return Self { windows, mean: 0.0, std_dev: 0.0 };
        }
        let mean = windows.iter().map(|&c| c as f64).sum::<f64>() / n as f64;
        let std_dev = if n < 2 {
            0.0
        } else {
            let var = windows.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        };
        Self { windows, mean, std_dev }
    }
}
