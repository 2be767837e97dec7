use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("unknown device '{0}', expected one of: cpu, coreml, directml")]
    Unknown(String),
    #[error("device '{0}' is not available on this platform")]
    Unavailable(&'static str),
}

/// Compute device a detection model is bound to at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    Cpu,
    CoreMl,
    DirectMl,
}

impl Device {
    pub fn name(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::CoreMl => "coreml",
            Device::DirectMl => "directml",
        }
    }

    /// ONNX Runtime execution providers backing this device.
    ///
    /// An empty list means the built-in CPU provider. Accelerated providers
    /// are compiled in per platform, so requesting one elsewhere fails.
    pub fn execution_providers(
        &self,
    ) -> Result<Vec<ort::execution_providers::ExecutionProviderDispatch>, DeviceError> {
        match self {
            Device::Cpu => Ok(Vec::new()),
            Device::CoreMl => {
                #[cfg(target_os = "macos")]
                {
                    Ok(vec![
                        ort::execution_providers::CoreMLExecutionProvider::default().build(),
                    ])
                }
                #[cfg(not(target_os = "macos"))]
                {
                    Err(DeviceError::Unavailable(self.name()))
                }
            }
            Device::DirectMl => {
                #[cfg(target_os = "windows")]
                {
                    Ok(vec![
                        ort::execution_providers::DirectMLExecutionProvider::default().build(),
                    ])
                }
                #[cfg(not(target_os = "windows"))]
                {
                    Err(DeviceError::Unavailable(self.name()))
                }
            }
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Device {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "coreml" => Ok(Device::CoreMl),
            "directml" => Ok(Device::DirectMl),
            other => Err(DeviceError::Unknown(other.to_string())),
        }
    }
}
