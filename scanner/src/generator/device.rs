use crate::generator::profile::{build_samples, SimulationConfig};
use fieldcore::acquisition::{
    AcquisitionError, DaqDevice, DeviceDescriptor, DeviceInventory, ScanSettings, ScanStatus,
};
use log::debug;

/// Software stand-in for a USB analog-input module.
pub struct SimulatedDaq {
    descriptor: DeviceDescriptor,
    config: SimulationConfig,
    connected: bool,
    samples: Option<Vec<f64>>,
    polls: u32,
}

impl SimulatedDaq {
    pub fn new(descriptor: DeviceDescriptor, config: SimulationConfig) -> Self {
        Self {
            descriptor,
            config,
            connected: false,
            samples: None,
            polls: 0,
        }
    }
}

impl DaqDevice for SimulatedDaq {
    fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    fn connect(&mut self) -> Result<(), AcquisitionError> {
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn start_scan(&mut self, settings: &ScanSettings) -> Result<(), AcquisitionError> {
        if !self.connected {
            return Err(AcquisitionError::Device("scan requested while disconnected".into()));
        }
        let samples = build_samples(&self.config, settings)
            .map_err(|err| AcquisitionError::Device(err.to_string()))?;
        self.samples = Some(samples);
        self.polls = 0;
        Ok(())
    }

    fn scan_status(&mut self) -> Result<ScanStatus, AcquisitionError> {
        let total = self
            .samples
            .as_ref()
            .map(Vec::len)
            .ok_or_else(|| AcquisitionError::Device("no scan in progress".into()))?;

        self.polls += 1;
        if self.config.fault_on_poll == Some(self.polls) {
            return Err(AcquisitionError::Device(format!(
                "simulated fault on status check {}",
                self.polls
            )));
        }
        if self.polls > self.config.scan_polls {
            return Ok(ScanStatus::Idle);
        }
        let steps = self.config.scan_polls as usize + 1;
        Ok(ScanStatus::Running {
            transferred: total * self.polls as usize / steps,
        })
    }

    fn read_buffer(&mut self) -> Result<Vec<f64>, AcquisitionError> {
        self.samples
            .clone()
            .ok_or_else(|| AcquisitionError::Device("no scan data available".into()))
    }

    fn stop_scan(&mut self) -> Result<(), AcquisitionError> {
        debug!("simulated scan stopped after {} status checks", self.polls);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), AcquisitionError> {
        self.connected = false;
        Ok(())
    }

    fn release(&mut self) {
        self.samples = None;
        debug!("simulated device {} released", self.descriptor.unique_id);
    }
}

/// Inventory exposing at most one simulated device.
pub struct SimulatedInventory {
    config: SimulationConfig,
}

impl SimulatedInventory {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl DeviceInventory for SimulatedInventory {
    type Device = SimulatedDaq;

    fn discover(&mut self) -> Result<Vec<DeviceDescriptor>, AcquisitionError> {
        if !self.config.available {
            return Ok(Vec::new());
        }
        Ok(vec![DeviceDescriptor {
            product_name: "Simulated USB-1608FS-Plus".into(),
            unique_id: format!("SIM-{:04}", self.config.seed % 10_000),
        }])
    }

    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<SimulatedDaq, AcquisitionError> {
        Ok(SimulatedDaq::new(descriptor.clone(), self.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcore::acquisition::{capture, PollWait, WaitLimit};
    use std::time::Duration;

    fn fast_wait() -> PollWait {
        PollWait::new(Duration::from_millis(1), WaitLimit::Unbounded)
    }

    #[test]
    fn simulated_capture_produces_full_buffer() {
        let mut inventory = SimulatedInventory::new(SimulationConfig::default());
        let buffer = capture(&mut inventory, 100_000, 1, &fast_wait()).unwrap();
        assert_eq!(buffer.len(), 100_000);
    }

    #[test]
    fn unavailable_device_is_not_found() {
        let mut inventory = SimulatedInventory::new(SimulationConfig {
            available: false,
            ..Default::default()
        });
        assert_eq!(
            capture(&mut inventory, 1_000, 1, &fast_wait()),
            Err(AcquisitionError::DeviceNotFound)
        );
    }

    #[test]
    fn injected_fault_surfaces_as_device_error() {
        let mut inventory = SimulatedInventory::new(SimulationConfig {
            fault_on_poll: Some(2),
            ..Default::default()
        });
        let result = capture(&mut inventory, 1_000, 1, &fast_wait());
        assert!(matches!(result, Err(AcquisitionError::Device(_))));
    }

    #[test]
    fn status_reports_progress_until_idle() {
        let descriptor = DeviceDescriptor {
            product_name: "sim".into(),
            unique_id: "SIM-0000".into(),
        };
        let mut device = SimulatedDaq::new(
            descriptor,
            SimulationConfig {
                scan_polls: 1,
                ..Default::default()
            },
        );
        device.connect().unwrap();
        device
            .start_scan(&ScanSettings::single_channel(1_000, 1).unwrap())
            .unwrap();

        assert_eq!(
            device.scan_status().unwrap(),
            ScanStatus::Running { transferred: 500 }
        );
        assert_eq!(device.scan_status().unwrap(), ScanStatus::Idle);
    }
}
