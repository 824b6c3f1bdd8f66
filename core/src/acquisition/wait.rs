use crate::acquisition::{AcquisitionError, ScanStatus};
use std::thread;
use std::time::Duration;

/// How many status checks a wait may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitLimit {
    /// Keep polling until the device reports completion. A device that never
    /// does stalls the caller forever.
    #[default]
    Unbounded,
    MaxPolls(u64),
}

/// Check-then-sleep wait for a scan to finish.
///
/// There is no cancellation: once started, the wait ends only when the
/// device reports [`ScanStatus::Idle`], a status check fails, or the
/// configured [`WaitLimit`] is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWait {
    pub interval: Duration,
    pub limit: WaitLimit,
}

impl Default for PollWait {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            limit: WaitLimit::Unbounded,
        }
    }
}

impl PollWait {
    pub fn new(interval: Duration, limit: WaitLimit) -> Self {
        Self { interval, limit }
    }

    /// Polls `status` until it reports idle. Returns the number of status
    /// checks performed.
    pub fn until_idle<F>(&self, mut status: F) -> Result<u64, AcquisitionError>
    where
        F: FnMut() -> Result<ScanStatus, AcquisitionError>,
    {
        let mut polls = 0u64;
        loop {
            polls += 1;
            match status()? {
                ScanStatus::Idle => return Ok(polls),
                ScanStatus::Running { transferred } => {
                    log::trace!("scan running, {transferred} samples transferred");
                }
            }
            if let WaitLimit::MaxPolls(max) = self.limit {
                if polls >= max {
                    return Err(AcquisitionError::WaitExhausted { polls });
                }
            }
            thread::sleep(self.interval);
        }
    }
}
