//! Accelerator pool configuration: `serde`-deserializable so a circuit's
//! device topology can be loaded from a config file instead of built in
//! code.

use crate::error::{SchedulerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{device_name -> count}` plus the handful of recognized knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceleratorConfig {
    /// Logical piece count owned by each named device; supports one physical
    /// device owning more than one logical piece.
    pub accelerators: BTreeMap<String, usize>,
    #[serde(default = "default_memory_device")]
    pub memory_device: String,
    /// Bytes available per device before a dispatch reports
    /// `ResourceExhausted`. Exists so the failure path is exercisable
    /// without real hardware.
    #[serde(default)]
    pub memory_budget_bytes: Option<usize>,
}

fn default_memory_device() -> String {
    "host".to_string()
}

impl AcceleratorConfig {
    pub fn total_devices(&self) -> usize {
        self.accelerators.values().sum()
    }

    /// `log2` of `total_devices()`; validated to be a legal power of two.
    pub fn nglobal(&self) -> Result<usize> {
        let d = self.total_devices();
        if d < 2 || !d.is_power_of_two() {
            return Err(SchedulerError::InvalidConfig {
                reason: format!("accelerator count must be a power of two >= 2, got {d}"),
            });
        }
        Ok(d.trailing_zeros() as usize)
    }

    /// Expands `{device_name -> count}` into the ordered list of piece
    /// indices each device name owns.
    pub fn device_to_pieces(&self) -> Vec<(String, Vec<usize>)> {
        let mut out = Vec::new();
        let mut next_piece = 0usize;
        for (name, count) in &self.accelerators {
            let ids: Vec<usize> = (next_piece..next_piece + count).collect();
            next_piece += count;
            out.push((name.clone(), ids));
        }
        out
    }
}
