//! Instantaneous CPU and memory sampling.

use std::time::Duration;

use serde::Serialize;
use sysinfo::System;

use super::process::round2;

/// One reading of host CPU and memory usage, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Source of host resource readings.
///
/// `sample` blocks for the sampling window; call it off the async workers.
pub trait SystemSampler: Send + Sync + 'static {
    fn sample(&self) -> SystemSample;
}

/// Reads the host through `sysinfo`.
///
/// Each call measures with its own `System`, so concurrent samples overlap
/// instead of queueing behind one another's window.
#[derive(Debug, Clone)]
pub struct SysinfoSampler {
    window: Duration,
}

impl SysinfoSampler {
    /// CPU usage is measured across `window`, never shorter than sysinfo's minimum interval.
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

impl SystemSampler for SysinfoSampler {
    fn sample(&self) -> SystemSample {
        let mut system = System::new();

        system.refresh_cpu();
        std::thread::sleep(self.window);
        system.refresh_cpu();
        let cpu_percent = f64::from(system.global_cpu_info().cpu_usage());

        system.refresh_memory();
        let total = system.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            system.used_memory() as f64 / total as f64 * 100.0
        };

        SystemSample {
            cpu_percent: round2(cpu_percent),
            memory_percent: round2(memory_percent),
        }
    }
}

/// Returns the same reading every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(pub SystemSample);

impl SystemSampler for FixedSampler {
    fn sample(&self) -> SystemSample {
        self.0
    }
}
