use std::fs;
use std::path::{Path, PathBuf};

use fieldcore::field::FieldGrid;
use fieldcore::interface::{Renderer, SampleBuffer, ScaleBounds, TimeAxis};
use fieldcore::processing::Spectrum;
use log::info;

use crate::error::RenderError;
use crate::plot::{render_heatmap_png, render_spectrum_png, render_waveform_png};
use crate::style::PlotStyle;

/// Where each rendered figure is written.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputPaths {
    pub waveform: PathBuf,
    pub spectrum: PathBuf,
    pub heatmap: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            waveform: PathBuf::from("ultrasonic_waveform.png"),
            spectrum: PathBuf::from("ultrasonic_spectrum.png"),
            heatmap: PathBuf::from("heatmap_normalized.png"),
        }
    }
}

/// [`Renderer`] that writes each figure to a PNG file.
#[derive(Clone, Debug)]
pub struct PngRenderer {
    outputs: OutputPaths,
    signal_style: PlotStyle,
    heatmap_style: PlotStyle,
}

impl PngRenderer {
    pub fn new(outputs: OutputPaths) -> Self {
        Self {
            outputs,
            signal_style: PlotStyle::signal(),
            heatmap_style: PlotStyle::heatmap(),
        }
    }

    pub fn with_styles(mut self, signal: PlotStyle, heatmap: PlotStyle) -> Self {
        self.signal_style = signal;
        self.heatmap_style = heatmap;
        self
    }

    pub fn outputs(&self) -> &OutputPaths {
        &self.outputs
    }

    fn write(path: &Path, png: &[u8]) -> Result<(), RenderError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, png)?;
        Ok(())
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(OutputPaths::default())
    }
}

impl Renderer for PngRenderer {
    type Error = RenderError;

    fn render_waveform(&self, axis: &TimeAxis, buffer: &SampleBuffer) -> Result<(), RenderError> {
        let png = render_waveform_png(axis, buffer, &self.signal_style)?;
        Self::write(&self.outputs.waveform, &png)?;
        info!("Waveform saved to {}", self.outputs.waveform.display());
        Ok(())
    }

    fn render_spectrum(&self, spectrum: &Spectrum) -> Result<(), RenderError> {
        let png = render_spectrum_png(spectrum, &self.signal_style)?;
        Self::write(&self.outputs.spectrum, &png)?;
        info!("Spectrum saved to {}", self.outputs.spectrum.display());
        Ok(())
    }

    fn render_field(&self, grid: &FieldGrid, scale: ScaleBounds) -> Result<(), RenderError> {
        let png = render_heatmap_png(grid, scale, &self.heatmap_style)?;
        Self::write(&self.outputs.heatmap, &png)?;
        info!("Heatmap saved to {}", self.outputs.heatmap.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FigureSize;
    use fieldcore::field::aggregate;
    use fieldcore::interface::MeasurementRecord;

    #[test]
    fn default_heatmap_path_matches_scan_tooling() {
        let renderer = PngRenderer::default();
        assert_eq!(
            renderer.outputs().heatmap,
            PathBuf::from("heatmap_normalized.png")
        );
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("plots/nested/out.png");
        PngRenderer::write(&target, b"\x89PNG").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"\x89PNG");
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn render_field_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = OutputPaths {
            heatmap: dir.path().join("field.png"),
            ..OutputPaths::default()
        };
        let tiny = PlotStyle {
            figure: FigureSize {
                width_in: 4.0,
                height_in: 3.0,
                dpi: 50,
            },
            ..PlotStyle::default()
        };
        let renderer = PngRenderer::new(outputs).with_styles(tiny.clone(), tiny);
        let grid = aggregate(&[
            MeasurementRecord::new(0.0, 0.0, 1.0),
            MeasurementRecord::new(1.0, 0.0, 0.5),
        ])
        .unwrap();

        renderer.render_field(&grid, ScaleBounds::NORMALIZED).unwrap();
        assert!(dir.path().join("field.png").exists());
    }
}
