use crate::acquisition::AcquisitionError;
use serde::{Deserialize, Serialize};

/// Identity of a discovered acquisition device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub product_name: String,
    pub unique_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    /// Channel high against analog ground.
    #[default]
    SingleEnded,
    Differential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VoltageRange {
    #[default]
    Bipolar10V,
    Bipolar5V,
    Bipolar1V,
}

impl VoltageRange {
    /// Full-scale magnitude in volts.
    pub fn full_scale(&self) -> f64 {
        match self {
            VoltageRange::Bipolar10V => 10.0,
            VoltageRange::Bipolar5V => 5.0,
            VoltageRange::Bipolar1V => 1.0,
        }
    }
}

/// Channel selection for a single-channel scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChannelConfig {
    pub channel: u8,
    pub input_mode: InputMode,
    pub range: VoltageRange,
}

/// Parameters of one analog-input scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub low_channel: u8,
    pub high_channel: u8,
    pub input_mode: InputMode,
    pub range: VoltageRange,
    pub sample_rate_hz: u32,
    pub samples_per_channel: usize,
}

impl ScanSettings {
    /// Single-channel scan on channel 0 collecting `rate × duration` samples.
    pub fn single_channel(
        sample_rate_hz: u32,
        duration_seconds: u32,
    ) -> Result<Self, AcquisitionError> {
        Self::for_channel(&ChannelConfig::default(), sample_rate_hz, duration_seconds)
    }

    pub fn for_channel(
        channel: &ChannelConfig,
        sample_rate_hz: u32,
        duration_seconds: u32,
    ) -> Result<Self, AcquisitionError> {
        if sample_rate_hz == 0 || duration_seconds == 0 {
            return Err(AcquisitionError::Buffer(format!(
                "rate ({sample_rate_hz} Hz) and duration ({duration_seconds} s) must both be positive"
            )));
        }
        let samples_per_channel = (sample_rate_hz as usize)
            .checked_mul(duration_seconds as usize)
            .ok_or_else(|| AcquisitionError::Buffer("sample count overflows".into()))?;

        Ok(Self {
            low_channel: channel.channel,
            high_channel: channel.channel,
            input_mode: channel.input_mode,
            range: channel.range,
            sample_rate_hz,
            samples_per_channel,
        })
    }

    pub fn channel_count(&self) -> usize {
        usize::from(self.high_channel.saturating_sub(self.low_channel)) + 1
    }
}

/// Progress of a running scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Running { transferred: usize },
    Idle,
}

/// Contract of an analog-input acquisition device.
pub trait DaqDevice {
    fn descriptor(&self) -> &DeviceDescriptor;
    fn connect(&mut self) -> Result<(), AcquisitionError>;
    fn is_connected(&self) -> bool;
    fn start_scan(&mut self, settings: &ScanSettings) -> Result<(), AcquisitionError>;
    fn scan_status(&mut self) -> Result<ScanStatus, AcquisitionError>;
    /// Samples transferred by the last scan, channel-interleaved.
    fn read_buffer(&mut self) -> Result<Vec<f64>, AcquisitionError>;
    fn stop_scan(&mut self) -> Result<(), AcquisitionError>;
    fn disconnect(&mut self) -> Result<(), AcquisitionError>;
    /// Frees the driver handle. Called exactly once per acquired device.
    fn release(&mut self);
}

/// Discovers devices on the host and creates handles for them.
pub trait DeviceInventory {
    type Device: DaqDevice;

    fn discover(&mut self) -> Result<Vec<DeviceDescriptor>, AcquisitionError>;
    /// Creates an unconnected handle; the caller owns its release.
    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<Self::Device, AcquisitionError>;
}
