use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmaIndicator {
    pub value: f64,
    pub period: u32,
}

/// Short and long SMA values on the current and the preceding bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverSnapshot {
    pub short_period: u32,
    pub long_period: u32,
    pub current_short: f64,
    pub current_long: f64,
    pub previous_short: f64,
    pub previous_long: f64,
}

impl CrossoverSnapshot {
    pub fn spread(&self) -> f64 {
        self.current_short - self.current_long
    }

    pub fn previous_spread(&self) -> f64 {
        self.previous_short - self.previous_long
    }
}
