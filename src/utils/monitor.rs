use crate::domain::model::ResolutionReport;
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Process memory and CPU around a resolution run, logged through tracing.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    peak_memory_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("Process stats unavailable: {}", e))
                .ok()
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            peak_memory_mb: Mutex::new(0),
        }
    }

    /// Current `(cpu %, memory MB)` of this process, updating the peak.
    fn sample(&self) -> Option<(f32, u64)> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory_mb.lock().ok()?;
        *peak = (*peak).max(memory_mb);
        Some((process.cpu_usage(), memory_mb))
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some((cpu, memory_mb)) = self.sample() {
            tracing::info!("📊 {} - CPU: {:.1}%, Memory: {}MB", phase, cpu, memory_mb);
        }
    }

    pub fn log_report(&self, report: &ResolutionReport) {
        if self.sample().is_none() {
            return;
        }
        let peak = self.peak_memory_mb.lock().map(|p| *p).unwrap_or(0);
        let elapsed = report.finished_at - report.started_at;
        let seconds = elapsed.num_milliseconds().max(1) as f64 / 1000.0;
        tracing::info!(
            "📊 {} entries in {:.2}s ({:.1}/s), peak memory {}MB",
            report.outcomes.len(),
            seconds,
            report.outcomes.len() as f64 / seconds,
            peak
        );
    }
}

// Without the cli feature there is no sysinfo; the engine still calls these.
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str) {}

    pub fn log_report(&self, _report: &ResolutionReport) {}
}
