use plotters::prelude::{RGBColor, BLACK, WHITE};

/// Physical figure size; pixel dimensions follow from the dpi.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl FigureSize {
    pub const HEATMAP: FigureSize = FigureSize {
        width_in: 10.0,
        height_in: 8.0,
        dpi: 300,
    };

    pub const SIGNAL: FigureSize = FigureSize {
        width_in: 8.0,
        height_in: 5.0,
        dpi: 300,
    };

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * f64::from(self.dpi)).round() as u32,
            (self.height_in * f64::from(self.dpi)).round() as u32,
        )
    }

    /// Converts a typographic point size to pixels at this dpi.
    pub fn points(&self, pt: f64) -> u32 {
        (pt * f64::from(self.dpi) / 72.0).round() as u32
    }
}

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub figure: FigureSize,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub line: RGBColor,
}

impl PlotStyle {
    pub fn signal() -> Self {
        Self {
            figure: FigureSize::SIGNAL,
            ..Self::default()
        }
    }

    pub fn heatmap() -> Self {
        Self {
            figure: FigureSize::HEATMAP,
            ..Self::default()
        }
    }
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            figure: FigureSize::SIGNAL,
            background: WHITE,
            foreground: BLACK,
            line: RGBColor(31, 119, 180),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heatmap_figure_is_ten_by_eight_inches_at_300_dpi() {
        assert_eq!(FigureSize::HEATMAP.pixels(), (3000, 2400));
    }

    #[test]
    fn point_sizes_scale_with_dpi() {
        assert_eq!(FigureSize::HEATMAP.points(12.0), 50);
        let screen = FigureSize {
            dpi: 72,
            ..FigureSize::SIGNAL
        };
        assert_eq!(screen.points(12.0), 12);
    }
}
