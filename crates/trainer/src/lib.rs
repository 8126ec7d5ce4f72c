pub mod data;
pub mod dataset;
pub mod eval;
pub mod train;

pub use train::Trainer;

use serde::{Deserialize, Serialize};
use tch::Device;

/// Compute backend, picked once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Prefer CUDA when available, otherwise CPU.
    Auto,
    Cpu,
    Cuda,
}

impl DeviceKind {
    pub fn resolve(self) -> Device {
        match self {
            DeviceKind::Auto => Device::cuda_if_available(),
            DeviceKind::Cpu => Device::Cpu,
            DeviceKind::Cuda => Device::Cuda(0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    /// Fraction of the training rows held out for validation.
    pub validation_fraction: f64,
    /// Seed for the train/validation shuffle; fixed for reproducible splits.
    pub split_seed: u64,
    pub device: DeviceKind,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            batch_size: 64,
            epochs: 5,
            validation_fraction: 0.2,
            split_seed: 42,
            device: DeviceKind::Auto,
        }
    }
}
