//! dehaze CLI: remove haze from a photograph with the Dark Channel Prior.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dehazer_rust::io::{load_image, save_gray, save_image};
use dehazer_rust::{dehaze_with_config, DehazeConfig, DehazeError};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(name = "dehaze")]
#[command(about = "Remove haze from an image using the Dark Channel Prior")]
#[command(version)]
struct Cli {
    /// Path to the hazy input image.
    #[arg(short, long)]
    image: PathBuf,

    /// Path to save the dehazed image.
    #[arg(short, long, default_value = "dehazed.jpg")]
    output: PathBuf,

    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dark channel neighborhood size (positive, odd).
    #[arg(long)]
    patch_size: Option<usize>,

    /// Fraction of brightest dark-channel pixels used for the airlight.
    #[arg(long)]
    top_percent: Option<f64>,

    /// Haze removal strength in [0, 1].
    #[arg(long)]
    omega: Option<f32>,

    /// Guided filter window radius in pixels.
    #[arg(long)]
    radius: Option<usize>,

    /// Guided filter regularization.
    #[arg(long)]
    epsilon: Option<f32>,

    /// Minimum transmission used during recovery.
    #[arg(long)]
    t0: Option<f32>,

    /// Directory to write the dark channel and transmission map into.
    #[arg(long)]
    intermediates: Option<PathBuf>,
}

impl Cli {
    fn build_config(&self) -> CliResult<DehazeConfig> {
        let mut config = match &self.config {
            Some(path) => DehazeConfig::from_json_file(path)?,
            None => DehazeConfig::default(),
        };

        if let Some(v) = self.patch_size {
            config.patch_size = v;
        }
        if let Some(v) = self.top_percent {
            config.top_percent = v;
        }
        if let Some(v) = self.omega {
            config.omega = v;
        }
        if let Some(v) = self.radius {
            config.radius = v;
        }
        if let Some(v) = self.epsilon {
            config.epsilon = v;
        }
        if let Some(v) = self.t0 {
            config.t0 = v;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = cli.build_config()?;

    tracing::info!("Loading image: {}", cli.image.display());
    let image = load_image(&cli.image)?;
    let (h, w, _) = image.dim();
    tracing::info!("Image size: {}x{}", w, h);

    let output = dehaze_with_config(image.view(), &config)?;
    let [r, g, b] = output.atmospheric_light;
    tracing::info!("Atmospheric light: ({:.3}, {:.3}, {:.3})", r, g, b);

    save_image(&cli.output, output.dehazed.view())?;

    if let Some(dir) = &cli.intermediates {
        if let Err(e) = write_intermediates(dir, &output) {
            // A failed run leaves no output behind
            if let Err(remove) = std::fs::remove_file(&cli.output) {
                tracing::warn!("Cannot remove {}: {}", cli.output.display(), remove);
            }
            return Err(e);
        }
    }

    tracing::info!("Dehazed image saved at: {}", cli.output.display());
    Ok(())
}

/// Exit code 2 for bad input or parameters, 1 for everything else.
fn exit_code(err: &CliError) -> ExitCode {
    match err.downcast_ref::<DehazeError>() {
        Some(e) if e.is_input_error() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn write_intermediates(dir: &Path, output: &dehazer_rust::DehazeOutput) -> CliResult<()> {
    let dark_path = dir.join("dark_channel.png");
    save_gray(&dark_path, output.dark_channel.view())?;

    let transmission_path = dir.join("transmission.png");
    save_gray(&transmission_path, output.transmission.view())?;

    tracing::info!("Intermediate maps written to {}", dir.display());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", e);
            exit_code(&e)
        }
    }
}
