use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use photic::config::{Config, InputFiles};
use photic::field::FieldProcessor;
use photic::optics::Instrument;
use photic::readers::{read_profiles, read_surface};
use photic::utils::log_field_statistics;
use photic::writers::{write_estimates, write_grid_cells};

/// Reconstructs the underwater light field from radiometer casts and a
/// surface irradiance time series
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, default_value = "./data/config/light_field.json")]
    config: PathBuf,

    /// Glob pattern of the profile tables, overrides the configuration
    #[arg(long)]
    profiles: Option<String>,

    /// Surface radiometer table, overrides the configuration
    #[arg(long)]
    surface: Option<String>,

    /// Output table of grid cells, overrides the configuration
    #[arg(short, long)]
    output: Option<String>,

    /// Profiler instrument (cops, trios, si), overrides the configuration
    #[arg(long)]
    instrument: Option<Instrument>,
}

fn pick(arg: &Option<String>, configured: Option<&String>, name: &str) -> Result<String, String> {
    arg.clone()
        .or_else(|| configured.cloned())
        .ok_or_else(|| format!("No {} given on the command line or in the configuration", name))
}

fn resolve_inputs(args: &Args, config: &Config) -> Result<InputFiles, Box<dyn std::error::Error>> {
    let configured = config.inputs();

    Ok(InputFiles {
        profiles: pick(&args.profiles, configured.map(|i| &i.profiles), "profiles")?,
        surface: pick(&args.surface, configured.map(|i| &i.surface), "surface")?,
        output: pick(&args.output, configured.map(|i| &i.output), "output")?,
        estimates_output: configured.and_then(|i| i.estimates_output.clone()),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = Config::from_file(&args.config)?;
    if let Some(instrument) = args.instrument {
        config = config.with_profile_instrument(instrument);
    }
    let inputs = resolve_inputs(&args, &config)?;

    let profiles = read_profiles(&inputs.profiles)?;
    let surface = read_surface(Path::new(&inputs.surface))?;

    let processor = FieldProcessor::new(config);
    let field = processor.process(&profiles, &surface);

    log_field_statistics(&field);

    write_grid_cells(Path::new(&inputs.output), &field.cells)?;
    if let Some(path) = &inputs.estimates_output {
        write_estimates(Path::new(path), &field.estimates)?;
    }

    Ok(())
}
