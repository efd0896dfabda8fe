use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::info;

use mandelbrot_viewport::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_PASSES, PlanePoint, PpmFilePresenter, PrecisionMode,
    PresenterPort, RenderConfig, Smoothing, Viewport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Precision {
    Standard,
    Arbitrary,
}

impl From<Precision> for PrecisionMode {
    fn from(precision: Precision) -> Self {
        match precision {
            Precision::Standard => PrecisionMode::Standard,
            Precision::Arbitrary => PrecisionMode::Arbitrary,
        }
    }
}

/// Renders one Mandelbrot frame into a PPM file.
#[derive(Debug, Parser)]
#[command(name = "mandelbrot_viewport", version)]
struct Args {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Center, real part. Decimal text, any number of digits
    #[arg(long, default_value = "-0.5", allow_hyphen_values = true)]
    real: String,

    /// Center, imaginary part
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    imag: String,

    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Saved location `(re, im, zoom)` or `(re_min, re_max, im_min, im_max)`.
    /// Overrides --real, --imag and --zoom
    #[arg(long, allow_hyphen_values = true)]
    location: Option<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    iterations: u32,

    #[arg(long, default_value_t = DEFAULT_PASSES)]
    passes: u32,

    /// Defaults to the number of cores
    #[arg(long)]
    workers: Option<usize>,

    #[arg(long, value_enum, default_value_t = Precision::Standard)]
    precision: Precision,

    /// Plain integer escape counts instead of smoothed ones
    #[arg(long)]
    integer_counts: bool,

    #[arg(long, default_value = "output/mandelbrot.ppm")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    run(Args::parse())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = RenderConfig::default()
        .with_passes(args.passes)?
        .with_resize_debounce(Duration::ZERO)
        .with_initial_max_iterations(args.iterations);
    if let Some(workers) = args.workers {
        config = config.with_workers(workers)?;
    }
    if args.integer_counts {
        config = config.with_smoothing(Smoothing::Integer);
    }

    let (presenter, outcomes) = PpmFilePresenter::new(&args.output);
    let mut viewport = Viewport::new(config, Arc::new(presenter) as Arc<dyn PresenterPort>)?;

    match &args.location {
        Some(location) => viewport.go_to_saved_location(location)?,
        None => viewport.go_to_location(
            Some(PlanePoint::parse(&args.real, &args.imag)?),
            Some(args.zoom),
        )?,
    }
    viewport.set_precision(args.precision.into())?;

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Sizing last: the view has no area until now, so this starts the only
    // render.
    viewport.set_dimensions(args.width, args.height)?;
    info!("rendering {}", viewport.status_string());

    let generation = outcomes.recv()??;
    info!("generation {} written, location {}", generation, viewport.location());
    viewport.close();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_writes_frame() {
        let output = std::env::temp_dir()
            .join(format!("mandelbrot_viewport_{}", std::process::id()))
            .join("frame.ppm");
        let output_arg = output.to_string_lossy().into_owned();

        let args = Args::parse_from([
            "mandelbrot_viewport",
            "--width",
            "24",
            "--height",
            "16",
            "--location",
            "(-0.75, 0.1, 2)",
            "--iterations",
            "50",
            "--workers",
            "2",
            "--output",
            &output_arg,
        ]);
        let result = run(args);

        assert!(result.is_ok(), "{:?}", result.err());
        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"P6\n24 16\n255\n"));
        std::fs::remove_dir_all(output.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_run_rejects_malformed_location() {
        let args = Args::parse_from(["mandelbrot_viewport", "--location", "(1, 2"]);

        assert!(run(args).is_err());
    }
}
