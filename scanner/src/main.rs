use anyhow::Context;
use clap::{Parser, Subcommand};
use fieldcore::interface::{Renderer, ScaleBounds};
use fieldviz::PngRenderer;
use generator::SimulatedInventory;
use std::fs;
use std::io;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod prompt;
mod workflow;

const RATE_PROMPT: &str = "Sampling_Rate (In Hz):";
const DURATION_PROMPT: &str = "Time_Duration (In s):";

#[derive(Parser)]
#[command(author, version, about = "Ultrasonic capture and field-mapping driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long, global = true)]
    workflow: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct CaptureArgs {
    /// Sampling rate in Hz; prompted for when omitted
    #[arg(long)]
    rate: Option<u32>,
    /// Capture duration in seconds; prompted for when omitted
    #[arg(long)]
    duration: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Capture one point and plot the conditioned time-domain signal
    Time(CaptureArgs),
    /// Capture one point and plot both the signal and its spectrum
    Fft(CaptureArgs),
    /// Build the normalized field heatmap from a scan log
    Heatmap {
        #[arg(long)]
        log: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn capture_parameters(args: &CaptureArgs) -> anyhow::Result<(u32, u32)> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let rate = prompt::resolve(args.rate, &mut input, &mut output, RATE_PROMPT)?;
    let duration = prompt::resolve(args.duration, &mut input, &mut output, DURATION_PROMPT)?;
    Ok((rate, duration))
}

fn run_capture(
    runner: &Runner,
    renderer: &PngRenderer,
    args: &CaptureArgs,
    with_spectrum: bool,
) -> anyhow::Result<()> {
    let (rate, duration) = capture_parameters(args)?;
    let mut inventory = SimulatedInventory::new(runner.config().simulation.clone());
    let result = runner.capture(&mut inventory, rate, duration)?;

    println!(
        "Capture -> {} samples at {} kHz, {}",
        result.raw.len(),
        f64::from(rate) / 1000.0,
        result.notes.join("; ")
    );
    renderer
        .render_waveform(&result.time_axis, &result.conditioned)
        .context("rendering waveform")?;

    if with_spectrum {
        let spectrum = runner.spectrum(&result.conditioned)?;
        if let Some((freq, mag)) = spectrum.peak() {
            println!(
                "Spectrum -> {} bins at {:.3} Hz resolution, peak {:.1} Hz ({:.4} V)",
                spectrum.len(),
                spectrum.resolution_hz(),
                freq,
                mag
            );
        }
        renderer
            .render_spectrum(&spectrum)
            .context("rendering spectrum")?;
    }
    Ok(())
}

fn run_heatmap(
    runner: &Runner,
    renderer: &PngRenderer,
    log: Option<PathBuf>,
) -> anyhow::Result<()> {
    let log_path = log.unwrap_or_else(|| runner.config().field_log.clone());
    let result = runner.field(&log_path)?;
    let grid = &result.grid;

    println!(
        "Field -> {} positions on a {} x {} grid from {} log lines",
        grid.points().len(),
        grid.cols(),
        grid.rows(),
        result.parse_summary.lines
    );
    renderer
        .render_field(grid, ScaleBounds::NORMALIZED)
        .context("rendering heatmap")?;

    if let Some(summary_path) = runner.config().outputs.field_summary.as_ref() {
        let json = grid
            .summary()
            .to_json_pretty()
            .context("serializing field summary")?;
        if let Some(parent) = summary_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(summary_path, json)
            .with_context(|| format!("writing field summary {}", summary_path.display()))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut workflow_config = match args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    };
    if let Command::Heatmap {
        output: Some(output),
        ..
    } = &args.command
    {
        workflow_config.outputs.heatmap = output.clone();
    }

    let renderer = PngRenderer::new(workflow_config.output_paths());
    let runner = Runner::new(workflow_config);

    match args.command {
        Command::Time(capture) => run_capture(&runner, &renderer, &capture, false),
        Command::Fft(capture) => run_capture(&runner, &renderer, &capture, true),
        Command::Heatmap { log, .. } => run_heatmap(&runner, &renderer, log),
    }
}
