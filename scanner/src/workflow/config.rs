use crate::generator::SimulationConfig;
use anyhow::Context;
use fieldcore::acquisition::{ChannelConfig, PollWait, WaitLimit};
use fieldviz::OutputPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output locations for rendered figures and the optional field summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub waveform: PathBuf,
    pub spectrum: PathBuf,
    pub heatmap: PathBuf,
    pub field_summary: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let paths = OutputPaths::default();
        Self {
            waveform: paths.waveform,
            spectrum: paths.spectrum,
            heatmap: paths.heatmap,
            field_summary: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub poll_interval_ms: u64,
    /// Unset means wait for the device indefinitely.
    pub max_polls: Option<u64>,
    pub capture: ChannelConfig,
    pub field_log: PathBuf,
    pub outputs: OutputConfig,
    pub simulation: SimulationConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_polls: None,
            capture: ChannelConfig::default(),
            field_log: PathBuf::from("Data.txt"),
            outputs: OutputConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn poll_wait(&self) -> PollWait {
        let limit = match self.max_polls {
            Some(max) => WaitLimit::MaxPolls(max),
            None => WaitLimit::Unbounded,
        };
        PollWait::new(Duration::from_millis(self.poll_interval_ms), limit)
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            waveform: self.outputs.waveform.clone(),
            spectrum: self.outputs.spectrum.clone(),
            heatmap: self.outputs.heatmap.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcore::acquisition::{InputMode, VoltageRange};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_follow_scan_tooling() {
        let cfg = WorkflowConfig::default();
        assert_eq!(cfg.field_log, PathBuf::from("Data.txt"));
        assert_eq!(cfg.outputs.heatmap, PathBuf::from("heatmap_normalized.png"));
        assert_eq!(cfg.poll_wait().interval, Duration::from_millis(100));
        assert_eq!(cfg.poll_wait().limit, WaitLimit::Unbounded);
        assert_eq!(cfg.capture.channel, 0);
        assert_eq!(cfg.capture.input_mode, InputMode::SingleEnded);
        assert_eq!(cfg.capture.range, VoltageRange::Bipolar10V);
    }

    #[test]
    fn config_load_reads_capture_section() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"capture:\n  channel: 2\n  input_mode: Differential\n  range: Bipolar1V\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();

        assert_eq!(
            cfg.capture,
            ChannelConfig {
                channel: 2,
                input_mode: InputMode::Differential,
                range: VoltageRange::Bipolar1V,
            }
        );
        assert_eq!(cfg.poll_interval_ms, 100);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"poll_interval_ms: 20\nmax_polls: 50\nfield_log: scans/run1.txt\noutputs:\n  heatmap: out/field.png\nsimulation:\n  tone_hz: 25000.0\n  seed: 7\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();

        assert_eq!(cfg.poll_wait().limit, WaitLimit::MaxPolls(50));
        assert_eq!(cfg.field_log, PathBuf::from("scans/run1.txt"));
        assert_eq!(cfg.output_paths().heatmap, PathBuf::from("out/field.png"));
        assert_eq!(cfg.outputs.waveform, PathBuf::from("ultrasonic_waveform.png"));
        assert_eq!(cfg.simulation.tone_hz, 25_000.0);
        assert_eq!(cfg.simulation.seed, 7);
        assert!(cfg.simulation.available);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorkflowConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
