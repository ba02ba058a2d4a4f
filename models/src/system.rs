use serde::{Deserialize, Serialize};

/// Placeholder for string fields the host could not report.
pub const UNKNOWN: &str = "error";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CurrentData {
    pub system_details: SystemInfo,
    pub cpu: Vec<CpuInfo>,
    pub ram: RamInfo,
    pub disk: Vec<DiskInfo>,
    /// `None` on hosts without an NVIDIA driver.
    pub gpu: Option<GpuInfo>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemInfo {
    pub name: String,
    pub kernel_ver: String,
    pub os_ver: String,
    pub host_name: String,
    /// Seconds
    pub uptime: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CpuInfo {
    pub brand: String,
    /// Percent
    pub usage: f32,
    /// MHz
    pub frequency: u64,
}

/// All values in bytes
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RamInfo {
    pub total_memory: u64,
    pub used_memory: u64,
    pub total_swap: u64,
    pub used_swap: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiskInfo {
    pub mount_point: String,
    pub name: String,
    pub size: u64,
    pub used_space: u64,
}

impl DiskInfo {
    pub fn new(mount_point: String, name: String, size: u64, available: u64) -> Self {
        DiskInfo {
            mount_point,
            name,
            size,
            used_space: size.saturating_sub(available),
        }
    }
}

/// First NVIDIA device. Clocks in MHz, memory in bytes, power in watts, temperature in °C.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GpuInfo {
    pub name: String,
    pub util: u32,
    pub encoder_util: u32,
    pub decoder_util: u32,
    pub used_memory: u64,
    pub total_memory: u64,
    pub graphic_clock: u32,
    pub max_graphic_clock: u32,
    pub memory_clock: u32,
    pub memory_clock_max: u32,
    pub sm_clock: u32,
    pub sm_clock_max: u32,
    pub video_clock: u32,
    pub video_clock_max: u32,
    pub power: u32,
    pub max_power: u32,
    pub temperature: u32,
}
