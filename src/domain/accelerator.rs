use std::fmt;

use serde::{Deserialize, Serialize};

/// Hardware the training and sampling backends run on.
///
/// `Cpu` maps to Burn's NdArray backend, `Gpu` to the Wgpu backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accelerator {
    #[default]
    Cpu,
    Gpu,
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accelerator::Cpu => write!(f, "cpu"),
            Accelerator::Gpu => write!(f, "gpu"),
        }
    }
}
