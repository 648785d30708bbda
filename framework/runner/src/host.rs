use dyno_summary_model::HostInfo;
use sysinfo::System;

/// Capture the host details recorded in the summary metadata.
pub(crate) fn capture_host() -> HostInfo {
    let mut sys = System::new_all();
    sys.refresh_all();

    let os = match (System::name(), System::os_version()) {
        (Some(name), Some(version)) => Some(format!("{name} {version}")),
        (Some(name), None) => Some(name),
        _ => None,
    };

    HostInfo {
        os,
        cpu_count: sys.cpus().len(),
        total_memory_mb: sys.total_memory() / (1024 * 1024),
    }
}

/// Warn when the host looks busy before the sweep starts.
///
/// This won't stop the sweep proceeding, it will just log a warning to let the user know that
/// their measurements might be affected. The cache and branch predictor state under measurement
/// is shared with whatever else is running on the host.
pub(crate) fn warn_if_busy(host: &HostInfo) {
    let load = System::load_average();
    if host.cpu_count > 0 && load.one > host.cpu_count as f64 / 2.0 {
        log::warn!(
            "High system load detected. The one minute load average is {:.2} with {} available cores, which may distort the measured counters",
            load.one,
            host.cpu_count
        );
    }
}
