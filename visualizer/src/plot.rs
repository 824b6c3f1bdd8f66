use fieldcore::field::FieldGrid;
use fieldcore::interface::{SampleBuffer, ScaleBounds, TimeAxis};
use fieldcore::processing::Spectrum;
use plotters::prelude::*;

use crate::colormap::viridis;
use crate::error::RenderError;
use crate::style::PlotStyle;

const FONT: &str = "sans-serif";
const COLORBAR_STEPS: usize = 200;
const METRES_PER_INCH: f64 = 0.0254;

/// Reduces a long trace to a min/max envelope with at most `2 * buckets`
/// points, keeping every local extreme visible at plot resolution.
pub fn envelope(xs: &[f64], ys: &[f64], buckets: usize) -> Vec<(f64, f64)> {
    let len = xs.len().min(ys.len());
    if buckets == 0 || len <= buckets * 2 {
        return xs.iter().copied().zip(ys.iter().copied()).take(len).collect();
    }

    let chunk = len.div_ceil(buckets);
    let mut points = Vec::with_capacity(buckets * 2);
    for start in (0..len).step_by(chunk) {
        let end = (start + chunk).min(len);
        let (mut lo, mut hi) = (start, start);
        for idx in start..end {
            if ys[idx] < ys[lo] {
                lo = idx;
            }
            if ys[idx] > ys[hi] {
                hi = idx;
            }
        }
        let (first, second) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        points.push((xs[first], ys[first]));
        if second != first {
            points.push((xs[second], ys[second]));
        }
    }
    points
}

fn value_bounds(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < f64::EPSILON {
        let centre = if lo.is_finite() { lo } else { 0.0 };
        return (centre - 1.0, centre + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// PNG stores resolution as pixels per metre.
fn pixels_per_metre(dpi: u32) -> u32 {
    (f64::from(dpi) / METRES_PER_INCH).round() as u32
}

/// Encodes an RGB buffer as PNG with a pHYs chunk carrying `dpi`.
fn encode_png(buffer: &[u8], width: u32, height: u32, dpi: u32) -> Result<Vec<u8>, RenderError> {
    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let density = pixels_per_metre(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: density,
            yppu: density,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(buffer)?;
        writer.finish()?;
    }
    Ok(output)
}

struct LineFigure<'a> {
    title: String,
    x_desc: &'a str,
    y_desc: &'a str,
    x_range: (f64, f64),
    y_range: (f64, f64),
    points: Vec<(f64, f64)>,
}

fn render_line_png(figure: LineFigure<'_>, style: &PlotStyle) -> Result<Vec<u8>, RenderError> {
    let (width, height) = style.figure.pixels();
    let title_px = f64::from(style.figure.points(16.0));
    let label_px = f64::from(style.figure.points(11.0));
    let margin = style.figure.points(8.0);

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&style.background)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(margin)
            .caption(figure.title, (FONT, title_px).into_font().color(&style.foreground))
            .set_label_area_size(LabelAreaPosition::Left, style.figure.points(60.0))
            .set_label_area_size(LabelAreaPosition::Bottom, style.figure.points(40.0))
            .build_cartesian_2d(
                figure.x_range.0..figure.x_range.1,
                figure.y_range.0..figure.y_range.1,
            )?;
        chart
            .configure_mesh()
            .x_desc(figure.x_desc)
            .y_desc(figure.y_desc)
            .label_style((FONT, label_px))
            .axis_desc_style((FONT, label_px))
            .bold_line_style(&style.foreground.mix(0.2))
            .light_line_style(&style.foreground.mix(0.05))
            .draw()?;
        chart.draw_series(LineSeries::new(
            figure.points,
            style.line.stroke_width(style.figure.points(0.8).max(1)),
        ))?;
        root.present()?;
    }
    encode_png(&buffer, width, height, style.figure.dpi)
}

/// Time-domain plot of a conditioned capture.
pub fn render_waveform_png(
    axis: &TimeAxis,
    buffer: &SampleBuffer,
    style: &PlotStyle,
) -> Result<Vec<u8>, RenderError> {
    if buffer.is_empty() || axis.is_empty() {
        return Err(RenderError::EmptyInput("capture has no samples"));
    }
    let (width, _) = style.figure.pixels();
    let times = axis.values();
    let x_end = times.last().copied().unwrap_or(0.0).max(f64::EPSILON);

    render_line_png(
        LineFigure {
            title: format!(
                "Ultrasonic Recording For {} kHz",
                buffer.sample_rate_hz() / 1000.0
            ),
            x_desc: "Time (s)",
            y_desc: "Voltage (V)",
            x_range: (0.0, x_end),
            y_range: value_bounds(buffer.samples()),
            points: envelope(times, buffer.samples(), width as usize),
        },
        style,
    )
}

/// One-sided magnitude spectrum plot.
pub fn render_spectrum_png(spectrum: &Spectrum, style: &PlotStyle) -> Result<Vec<u8>, RenderError> {
    if spectrum.is_empty() {
        return Err(RenderError::EmptyInput("spectrum has no bins"));
    }
    let (width, _) = style.figure.pixels();
    let peak = spectrum
        .magnitudes()
        .iter()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(1e-3);
    let x_end = spectrum
        .frequencies_hz()
        .last()
        .copied()
        .unwrap_or(0.0)
        .max(spectrum.resolution_hz());

    render_line_png(
        LineFigure {
            title: format!("FFT Domain For {} kHz", spectrum.sample_rate_hz() / 1000.0),
            x_desc: "Frequency (Hz)",
            y_desc: "Magnitude (V)",
            x_range: (0.0, x_end),
            y_range: (0.0, peak * 1.05),
            points: envelope(spectrum.frequencies_hz(), spectrum.magnitudes(), width as usize),
        },
        style,
    )
}

/// Width of one heatmap cell along an axis: the smallest gap between
/// neighbouring positions, or 1 cm when the axis has a single position.
pub fn cell_extent(axis: &[f64]) -> f64 {
    let gap = axis
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0.0)
        .fold(f64::INFINITY, f64::min);
    if gap.is_finite() {
        gap
    } else {
        1.0
    }
}

/// Corners of the rectangle drawn for cell `(row, col)`, in centimetres,
/// centred on the measured position.
pub fn cell_bounds(grid: &FieldGrid, row: usize, col: usize) -> Option<((f64, f64), (f64, f64))> {
    let x = *grid.xs().get(col)?;
    let y = *grid.ys().get(row)?;
    let half_w = cell_extent(grid.xs()) / 2.0;
    let half_h = cell_extent(grid.ys()) / 2.0;
    Some(((x - half_w, y - half_h), (x + half_w, y + half_h)))
}

/// Normalized field heatmap. Lowest `y` is drawn at the bottom and lowest
/// `x` at the left; unmeasured cells are left as background.
pub fn render_heatmap_png(
    grid: &FieldGrid,
    scale: ScaleBounds,
    style: &PlotStyle,
) -> Result<Vec<u8>, RenderError> {
    let (Some(&x_first), Some(&x_last), Some(&y_first), Some(&y_last)) = (
        grid.xs().first(),
        grid.xs().last(),
        grid.ys().first(),
        grid.ys().last(),
    ) else {
        return Err(RenderError::EmptyInput("field grid has no cells"));
    };

    let (width, height) = style.figure.pixels();
    let title_px = f64::from(style.figure.points(14.0));
    let label_px = f64::from(style.figure.points(11.0));
    let margin = style.figure.points(8.0);
    let half_w = cell_extent(grid.xs()) / 2.0;
    let half_h = cell_extent(grid.ys()) / 2.0;

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&style.background)?;
        let (map_area, bar_area) = root.split_horizontally((f64::from(width) * 0.85) as u32);

        let mut chart = ChartBuilder::on(&map_area)
            .margin(margin)
            .caption(
                "Normalized Ultrasonic Field Distribution",
                (FONT, title_px).into_font().color(&style.foreground),
            )
            .set_label_area_size(LabelAreaPosition::Left, style.figure.points(50.0))
            .set_label_area_size(LabelAreaPosition::Bottom, style.figure.points(40.0))
            .build_cartesian_2d(
                (x_first - half_w)..(x_last + half_w),
                (y_first - half_h)..(y_last + half_h),
            )?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("X Position (cm)")
            .y_desc("Y Position (cm)")
            .label_style((FONT, label_px))
            .axis_desc_style((FONT, label_px))
            .draw()?;

        let cells = (0..grid.rows()).flat_map(|row| (0..grid.cols()).map(move |col| (row, col)));
        chart.draw_series(cells.filter_map(|(row, col)| {
            let value = grid.cell(row, col)?;
            let (low, high) = cell_bounds(grid, row, col)?;
            Some(Rectangle::new(
                [low, high],
                viridis(value, scale.min, scale.max).filled(),
            ))
        }))?;

        let mut bar = ChartBuilder::on(&bar_area)
            .margin(margin)
            .margin_top(margin + title_px as u32)
            .set_label_area_size(LabelAreaPosition::Right, style.figure.points(60.0))
            .build_cartesian_2d(0f64..1f64, scale.min..scale.max)?;
        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc("Normalized Power (P / Pmax)")
            .label_style((FONT, label_px))
            .axis_desc_style((FONT, label_px))
            .draw()?;
        let step = (scale.max - scale.min) / COLORBAR_STEPS as f64;
        bar.draw_series((0..COLORBAR_STEPS).map(|idx| {
            let low = scale.min + step * idx as f64;
            Rectangle::new(
                [(0.0, low), (1.0, low + step)],
                viridis(low + step / 2.0, scale.min, scale.max).filled(),
            )
        }))?;

        root.present()?;
    }
    encode_png(&buffer, width, height, style.figure.dpi)
}
