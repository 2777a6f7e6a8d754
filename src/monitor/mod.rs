//! Self-observability: uptime, request counter and host resource sampling.

pub mod process;
pub mod sampler;

pub use process::ProcessMetrics;
pub use sampler::{FixedSampler, SysinfoSampler, SystemSample, SystemSampler};
