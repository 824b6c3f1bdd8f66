use crate::acquisition::device::{ChannelConfig, DaqDevice, DeviceInventory, ScanSettings};
use crate::acquisition::wait::PollWait;
use crate::acquisition::AcquisitionError;
use crate::interface::SampleBuffer;
use crate::telemetry::log::LogManager;

/// Connected device whose teardown is tied to scope.
///
/// Dropping the session stops any scan and disconnects (when still
/// connected) and then releases the device, on every exit path including
/// early returns and unwinding.
pub struct AcquisitionSession<D: DaqDevice> {
    device: D,
    logger: LogManager,
}

impl<D: DaqDevice> AcquisitionSession<D> {
    /// Takes ownership of `device` and connects it. The device is released
    /// even if connecting fails.
    pub fn open(device: D) -> Result<Self, AcquisitionError> {
        let mut session = Self {
            device,
            logger: LogManager::new("acquisition"),
        };
        session.device.connect()?;
        session.logger.record(&format!(
            "connected to {} ({})",
            session.device.descriptor().product_name,
            session.device.descriptor().unique_id
        ));
        Ok(session)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn start_scan(&mut self, settings: &ScanSettings) -> Result<(), AcquisitionError> {
        self.logger.record(&format!(
            "Sampling_Rate: {} kHz, Samples_Per_Channel: {} samples, Number of Channels: {}",
            f64::from(settings.sample_rate_hz) / 1000.0,
            settings.samples_per_channel,
            settings.channel_count()
        ));
        self.device.start_scan(settings)
    }

    /// Blocks until the device reports the scan finished.
    pub fn wait_for_scan(&mut self, wait: &PollWait) -> Result<u64, AcquisitionError> {
        let device = &mut self.device;
        wait.until_idle(|| device.scan_status())
    }

    pub fn read_buffer(&mut self) -> Result<Vec<f64>, AcquisitionError> {
        self.device.read_buffer()
    }
}

impl<D: DaqDevice> Drop for AcquisitionSession<D> {
    fn drop(&mut self) {
        if self.device.is_connected() {
            if let Err(err) = self.device.stop_scan() {
                self.logger.caution(&format!("stopping scan failed: {err}"));
            }
            if let Err(err) = self.device.disconnect() {
                self.logger.caution(&format!("disconnect failed: {err}"));
            }
        }
        self.device.release();
        self.logger.record("device released");
    }
}

/// Captures `rate × duration` samples on channel 0 of the first discovered
/// device.
///
/// The device is released before this function returns, whatever the outcome.
pub fn capture<I: DeviceInventory>(
    inventory: &mut I,
    sample_rate_hz: u32,
    duration_seconds: u32,
    wait: &PollWait,
) -> Result<SampleBuffer, AcquisitionError> {
    capture_channel(
        inventory,
        &ChannelConfig::default(),
        sample_rate_hz,
        duration_seconds,
        wait,
    )
}

/// [`capture`] on an explicit channel, input mode and range.
pub fn capture_channel<I: DeviceInventory>(
    inventory: &mut I,
    channel: &ChannelConfig,
    sample_rate_hz: u32,
    duration_seconds: u32,
    wait: &PollWait,
) -> Result<SampleBuffer, AcquisitionError> {
    let settings = ScanSettings::for_channel(channel, sample_rate_hz, duration_seconds)?;

    let descriptors = inventory.discover()?;
    let Some(descriptor) = descriptors.first() else {
        log::error!("DAQ discovery found no device");
        return Err(AcquisitionError::DeviceNotFound);
    };
    let device = inventory.open(descriptor)?;

    let raw = {
        let mut session = AcquisitionSession::open(device)?;
        session.start_scan(&settings)?;
        let polls = session.wait_for_scan(wait)?;
        log::info!("scan done after {polls} status checks");
        session.read_buffer()?
    };

    if raw.len() != settings.samples_per_channel {
        return Err(AcquisitionError::Buffer(format!(
            "expected {} samples, device returned {}",
            settings.samples_per_channel,
            raw.len()
        )));
    }

    SampleBuffer::new(raw, f64::from(sample_rate_hz), f64::from(duration_seconds))
        .map_err(|err| AcquisitionError::Buffer(err.to_string()))
}
