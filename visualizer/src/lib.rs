//! PNG rendering for ultrasonic captures and field maps.

pub mod colormap;
pub mod error;
pub mod plot;
pub mod renderer;
pub mod style;

pub use error::RenderError;
pub use plot::{render_heatmap_png, render_spectrum_png, render_waveform_png};
pub use renderer::{OutputPaths, PngRenderer};
pub use style::{FigureSize, PlotStyle};
