//! Compute device selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DevPerfError;

/// Device a batch is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Cpu,
    Cuda(usize),
}

impl Device {
    pub fn is_accelerated(&self) -> bool {
        matches!(self, Device::Cuda(_))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(index) => write!(f, "cuda:{index}"),
        }
    }
}

/// Requested device, before resolution against the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceRequest {
    #[default]
    Auto,
    Cpu,
    Cuda(usize),
}

impl DeviceRequest {
    /// Resolve with the host's accelerator availability.
    pub fn resolve(self) -> Device {
        self.resolve_with(accelerator_available())
    }

    pub fn resolve_with(self, accelerator: bool) -> Device {
        match self {
            DeviceRequest::Cpu => Device::Cpu,
            DeviceRequest::Cuda(index) => Device::Cuda(index),
            DeviceRequest::Auto if accelerator => Device::Cuda(0),
            DeviceRequest::Auto => {
                tracing::debug!("no accelerator reported, evaluating on cpu");
                Device::Cpu
            }
        }
    }
}

impl FromStr for DeviceRequest {
    type Err = DevPerfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "auto" => Ok(DeviceRequest::Auto),
            "cpu" => Ok(DeviceRequest::Cpu),
            "cuda" | "gpu" => Ok(DeviceRequest::Cuda(0)),
            other => match other.strip_prefix("cuda:") {
                Some(index) => index.parse().map(DeviceRequest::Cuda).map_err(|_| {
                    DevPerfError::ConfigError(format!("invalid cuda device index: {index}"))
                }),
                None => Err(DevPerfError::ConfigError(format!(
                    "unknown device '{s}' (use auto|cpu|cuda|cuda:N)"
                ))),
            },
        }
    }
}

impl TryFrom<String> for DeviceRequest {
    type Error = DevPerfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceRequest> for String {
    fn from(value: DeviceRequest) -> Self {
        match value {
            DeviceRequest::Auto => "auto".to_string(),
            DeviceRequest::Cpu => "cpu".to_string(),
            DeviceRequest::Cuda(index) => format!("cuda:{index}"),
        }
    }
}

/// An accelerator counts as available when `CUDA_VISIBLE_DEVICES` names one.
pub fn accelerator_available() -> bool {
    visible_devices_enabled(std::env::var("CUDA_VISIBLE_DEVICES").ok().as_deref())
}

fn visible_devices_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some("") | Some("-1") | None => false,
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_request() {
        assert_eq!("auto".parse::<DeviceRequest>().unwrap(), DeviceRequest::Auto);
        assert_eq!("CPU".parse::<DeviceRequest>().unwrap(), DeviceRequest::Cpu);
        assert_eq!("cuda".parse::<DeviceRequest>().unwrap(), DeviceRequest::Cuda(0));
        assert_eq!("cuda:2".parse::<DeviceRequest>().unwrap(), DeviceRequest::Cuda(2));
        assert!("cuda:x".parse::<DeviceRequest>().is_err());
        assert!("tpu".parse::<DeviceRequest>().is_err());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(DeviceRequest::Auto.resolve_with(true), Device::Cuda(0));
        assert_eq!(DeviceRequest::Auto.resolve_with(false), Device::Cpu);
        assert_eq!(DeviceRequest::Cpu.resolve_with(true), Device::Cpu);
        assert_eq!(DeviceRequest::Cuda(1).resolve_with(false), Device::Cuda(1));
    }

    #[test]
    fn test_visible_devices() {
        assert!(!visible_devices_enabled(None));
        assert!(!visible_devices_enabled(Some("")));
        assert!(!visible_devices_enabled(Some("-1")));
        assert!(visible_devices_enabled(Some("0,1")));
    }

    #[test]
    fn test_display() {
        assert_eq!(Device::Cuda(1).to_string(), "cuda:1");
        assert_eq!(String::from(DeviceRequest::Cuda(3)), "cuda:3");
    }
}
