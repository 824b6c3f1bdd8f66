//! Boundary to the data-acquisition hardware.
//!
//! The driver itself is external; this module fixes the contract a device
//! must satisfy, the scoped connect/release discipline around a scan, and
//! the wait for scan completion.

pub mod device;
pub mod session;
pub mod wait;

pub use device::{
    ChannelConfig, DaqDevice, DeviceDescriptor, DeviceInventory, InputMode, ScanSettings, ScanStatus, VoltageRange,
};
pub use session::{capture, capture_channel, AcquisitionSession};
pub use wait::{PollWait, WaitLimit};

/// Failures surfaced by the acquisition boundary.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AcquisitionError {
    #[error("no acquisition device discovered")]
    DeviceNotFound,
    #[error("device error: {0}")]
    Device(String),
    #[error("scan still running after {polls} status checks")]
    WaitExhausted { polls: u64 },
    #[error("invalid capture: {0}")]
    Buffer(String),
}
