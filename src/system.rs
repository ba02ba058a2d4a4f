use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use models::system::{CpuInfo, CurrentData, DiskInfo, GpuInfo, RamInfo, SystemInfo, UNKNOWN};
use nvml_wrapper::{
    enum_wrappers::device::{Clock, TemperatureSensor},
    Nvml,
};
use sysinfo::{Disks, System};

#[derive(Clone)]
pub struct SystemMonitor {
    system: Arc<Mutex<System>>,
    nvml: Option<Arc<Nvml>>,
}

impl SystemMonitor {
    /// Loads every sysinfo counter and, when the NVIDIA driver is present, NVML. Blocking.
    pub fn new() -> Self {
        let nvml = match Nvml::init() {
            Ok(nvml) => {
                tracing::info!("NVML loaded, reporting gpu data");
                Some(Arc::new(nvml))
            }
            Err(e) => {
                tracing::info!("no gpu data: {e}");
                None
            }
        };

        SystemMonitor {
            system: Arc::new(Mutex::new(System::new_all())),
            nvml,
        }
    }

    /// Refreshes the host counters and collects them. Runs on the blocking pool.
    pub async fn snapshot(&self) -> anyhow::Result<CurrentData> {
        let system = self.system.clone();
        let nvml = self.nvml.clone();
        tokio::task::spawn_blocking(move || {
            let mut system = system
                .lock()
                .map_err(|_| anyhow!("system monitor lock poisoned"))?;
            system.refresh_all();
            let disks = Disks::new_with_refreshed_list();
            let gpu = nvml.as_deref().and_then(collect_gpu);
            Ok::<_, anyhow::Error>(collect(&system, &disks, gpu))
        })
        .await?
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(system: &System, disks: &Disks, gpu: Option<GpuInfo>) -> CurrentData {
    let or_unknown = |s: Option<String>| s.unwrap_or_else(|| UNKNOWN.to_string());

    let cpu = system
        .cpus()
        .iter()
        .map(|cpu| CpuInfo {
            brand: cpu.brand().to_string(),
            usage: cpu.cpu_usage(),
            frequency: cpu.frequency(),
        })
        .collect();

    let disk = disks
        .list()
        .iter()
        .map(|disk| {
            DiskInfo::new(
                disk.mount_point()
                    .to_str()
                    .unwrap_or(UNKNOWN)
                    .to_string(),
                disk.name().to_str().unwrap_or(UNKNOWN).to_string(),
                disk.total_space(),
                disk.available_space(),
            )
        })
        .collect();

    CurrentData {
        system_details: SystemInfo {
            name: or_unknown(System::name()),
            kernel_ver: or_unknown(System::kernel_version()),
            os_ver: or_unknown(System::os_version()),
            host_name: or_unknown(System::host_name()),
            uptime: System::uptime(),
        },
        cpu,
        ram: RamInfo {
            total_memory: system.total_memory(),
            used_memory: system.used_memory(),
            total_swap: system.total_swap(),
            used_swap: system.used_swap(),
        },
        disk,
        gpu,
    }
}

/// Reads the first device. Counters the driver refuses to report come back as zero.
fn collect_gpu(nvml: &Nvml) -> Option<GpuInfo> {
    let device = match nvml.device_by_index(0) {
        Ok(device) => device,
        Err(e) => {
            tracing::debug!("no gpu at index 0: {e}");
            return None;
        }
    };

    let memory = device.memory_info().ok();
    let clock = |clock| device.clock_info(clock).unwrap_or_default();
    let max_clock = |clock| device.max_clock_info(clock).unwrap_or_default();

    Some(GpuInfo {
        name: device.name().unwrap_or_else(|_| UNKNOWN.to_string()),
        util: device.utilization_rates().map(|u| u.gpu).unwrap_or_default(),
        encoder_util: device
            .encoder_utilization()
            .map(|u| u.utilization)
            .unwrap_or_default(),
        decoder_util: device
            .decoder_utilization()
            .map(|u| u.utilization)
            .unwrap_or_default(),
        used_memory: memory.as_ref().map(|m| m.used).unwrap_or_default(),
        total_memory: memory.as_ref().map(|m| m.total).unwrap_or_default(),
        graphic_clock: clock(Clock::Graphics),
        max_graphic_clock: max_clock(Clock::Graphics),
        memory_clock: clock(Clock::Memory),
        memory_clock_max: max_clock(Clock::Memory),
        sm_clock: clock(Clock::SM),
        sm_clock_max: max_clock(Clock::SM),
        video_clock: clock(Clock::Video),
        video_clock_max: max_clock(Clock::Video),
        // milliwatts
        power: device.power_usage().unwrap_or_default() / 1000,
        max_power: device.power_management_limit_default().unwrap_or_default() / 1000,
        temperature: device
            .temperature(TemperatureSensor::Gpu)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_reports_the_host() {
        let data = SystemMonitor::new().snapshot().await.unwrap();
        assert!(data.ram.total_memory > 0);
        assert!(data.ram.used_memory <= data.ram.total_memory);
        assert!(data.disk.iter().all(|d| d.used_space <= d.size));
    }

    #[tokio::test]
    async fn gpu_follows_nvml_availability() {
        let monitor = SystemMonitor::new();
        let data = monitor.snapshot().await.unwrap();

        if monitor.nvml.is_none() {
            assert_eq!(data.gpu, None);
        }
        if let Some(gpu) = data.gpu {
            assert!(gpu.used_memory <= gpu.total_memory);
        }
    }
}
