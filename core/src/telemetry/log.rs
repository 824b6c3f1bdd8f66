use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that prefixes every line with the
/// emitting component.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.component, message);
    }

    pub fn caution(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }
}
