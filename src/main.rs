use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use htscreen::assets::{AssetLoader, PresetSource, CONFIG_ENV};
use htscreen::error::OutputError;
use htscreen::models::{AppConfig, ScreenConfig};
use htscreen::rendering::{default_file_name, encode, ScreenFormat};
use ordered_screen::{
    generate_ordered_screen, solve_cell_shape, ScreenParams, SpotFunction,
};

#[derive(Parser)]
#[command(name = "htscreen")]
#[command(about = "Ordered-dither halftone screen generator")]
struct Cli {
    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a halftone screen and write it to a file
    Generate {
        #[command(flatten)]
        screen: ScreenArgs,

        /// Write the dots in turn-on order instead of a threshold grid
        #[arg(long)]
        sequence: bool,

        /// Output format: raw, pgm, ps, png, tos or json
        #[arg(short, long)]
        format: Option<ScreenFormat>,

        /// Output file path (default: Screen_<type>_<w>x<h>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the lattice cell search for an angle and frequency
    Cell {
        #[command(flatten)]
        screen: ScreenArgs,
    },
    /// List the spot functions
    Spots,
    /// List the presets of the active configuration
    Presets {
        /// Preset file (default: embedded presets, or $HTSCREEN_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write the embedded presets to a file for customization
    Init {
        /// Destination file
        #[arg(short, long, default_value = "screens.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Screen parameters shared by `generate` and `cell`
#[derive(Args)]
struct ScreenArgs {
    /// Named preset from the configuration
    #[arg(short, long)]
    preset: Option<String>,

    /// Preset file (default: embedded presets, or $HTSCREEN_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Device resolution for both axes, in dots per inch
    #[arg(short, long)]
    resolution: Option<f64>,

    /// Horizontal resolution
    #[arg(long)]
    hdpi: Option<f64>,

    /// Vertical resolution
    #[arg(long)]
    vdpi: Option<f64>,

    /// Target screen frequency in lines per inch
    #[arg(short, long)]
    lpi: Option<f64>,

    /// Screen angle in degrees
    #[arg(short, long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// Requested number of gray levels
    #[arg(short, long)]
    quantization: Option<u32>,

    /// Minimum supercell size in pixels
    #[arg(short, long)]
    size: Option<u32>,

    /// Spot function (see `htscreen spots`)
    #[arg(long)]
    spot: Option<String>,

    /// Output only the Holladay brick, without dithering
    #[arg(long)]
    holladay: bool,

    /// Gamma applied to the thresholds
    #[arg(long)]
    gamma: Option<f64>,

    /// Seed for the random dot placement of dithered screens
    #[arg(long)]
    seed: Option<u64>,
}

impl ScreenArgs {
    fn overrides(&self) -> ScreenConfig {
        ScreenConfig {
            angle: self.angle,
            lpi: self.lpi,
            dpi: self.resolution,
            hdpi: self.hdpi,
            vdpi: self.vdpi,
            spot: self.spot.clone(),
            quantization: self.quantization,
            size: self.size,
            holladay: self.holladay.then_some(true),
            gamma: self.gamma,
            seed: self.seed,
        }
    }

    /// Resolve the preset and apply the command-line overrides
    fn params(&self, verbose: u8) -> anyhow::Result<ScreenParams> {
        let loader = AssetLoader::from_env(self.config.clone());
        let config = AppConfig::load_from_assets(&loader)?;
        let preset = config.resolve(self.preset.as_deref())?;
        let params = preset.merge(&self.overrides()).to_params()?;
        Ok(params.verbose(verbose))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Generate {
            screen,
            sequence,
            format,
            output,
        }) => run_generate_command(&screen, sequence, format, output, cli.verbose),
        Some(Commands::Cell { screen }) => run_cell_command(&screen, cli.verbose),
        Some(Commands::Spots) => {
            run_spots_command();
            Ok(())
        }
        Some(Commands::Presets { config }) => run_presets_command(config),
        Some(Commands::Init { output, force }) => run_init_command(&output, force),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "htscreen=info,ordered_screen=info",
        1 => "htscreen=debug,ordered_screen=debug",
        _ => "htscreen=trace,ordered_screen=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Generate a screen and write it in the requested format
fn run_generate_command(
    screen: &ScreenArgs,
    sequence: bool,
    format: Option<ScreenFormat>,
    output: Option<PathBuf>,
    verbose: u8,
) -> anyhow::Result<()> {
    let format = format.unwrap_or(if sequence {
        ScreenFormat::Tos
    } else {
        ScreenFormat::Raw
    });
    let data = format.data_shape(sequence)?;

    let params = screen.params(verbose)?.output_format(data);
    let generated = generate_ordered_screen(&params)?;

    let cell = &generated.cell;
    println!(
        "Cell: x={} y={} u={} v={}, angle {:.2}, {:.2} lpi, {} pixels",
        cell.x, cell.y, cell.u, cell.v, cell.angle, cell.lpi, cell.n
    );
    for warning in &generated.warnings {
        println!("Warning: {warning}");
    }

    let bytes = encode(&generated, format)?;
    let path = output.unwrap_or_else(|| PathBuf::from(default_file_name(&generated, format)));
    std::fs::write(&path, &bytes).map_err(OutputError::from)?;
    println!(
        "Wrote {} ({}x{}, {} bytes)",
        path.display(),
        generated.mask.width(),
        generated.mask.height(),
        bytes.len()
    );

    Ok(())
}

/// Print the candidate table of the lattice search
fn run_cell_command(screen: &ScreenArgs, verbose: u8) -> anyhow::Result<()> {
    let params = screen.params(verbose)?;
    params.validate()?;

    let search = solve_cell_shape(
        params.wrapped_angle(),
        params.lpi,
        params.hdpi,
        params.vdpi,
        params.verbose,
    );

    println!(
        "{:>6} {:>6} {:>6} {:>6} {:>10} {:>10} {:>8}",
        "x", "y", "u", "v", "Angle", "LPI", "Levels"
    );
    for c in &search.candidates {
        println!(
            "{:>6} {:>6} {:>6} {:>6} {:>10.4} {:>10.4} {:>8}",
            c.x, c.y, c.u, c.v, c.angle, c.lpi, c.levels
        );
    }
    for warning in &search.warnings {
        println!("Warning: {warning}");
    }

    let cell = search.cell;
    println!(
        "\nUsing x={} y={} u={} v={}: angle {:.4}, {:.4} lpi, {} pixels per cell",
        cell.x,
        cell.y,
        cell.u,
        cell.v,
        cell.angle,
        cell.lpi,
        cell.n
    );
    Ok(())
}

fn run_spots_command() {
    for spot in SpotFunction::ALL {
        println!("{spot}");
    }
}

fn run_presets_command(config: Option<PathBuf>) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env(config);
    let app_config = AppConfig::load_from_assets(&loader)?;

    println!("Presets ({}):\n", loader.source());
    if app_config.screens.is_empty() {
        println!("  (none)");
    }
    for (name, preset) in &app_config.screens {
        let marker = if app_config.default_screen.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {name:<16} {}", describe(preset));
    }
    Ok(())
}

fn describe(preset: &ScreenConfig) -> String {
    let mut parts = Vec::new();
    if let Some(angle) = preset.angle {
        parts.push(format!("{angle}°"));
    }
    if let Some(lpi) = preset.lpi {
        parts.push(format!("{lpi} lpi"));
    }
    match (preset.hdpi.or(preset.dpi), preset.vdpi.or(preset.dpi)) {
        (Some(h), Some(v)) if h == v => parts.push(format!("{h} dpi")),
        (Some(h), Some(v)) => parts.push(format!("{h}x{v} dpi")),
        (Some(h), None) => parts.push(format!("{h} hdpi")),
        (None, Some(v)) => parts.push(format!("{v} vdpi")),
        (None, None) => {}
    }
    if let Some(ref spot) = preset.spot {
        parts.push(spot.clone());
    }
    if let Some(levels) = preset.quantization {
        parts.push(format!("{levels} levels"));
    }
    if let Some(size) = preset.size {
        parts.push(format!("size {size}"));
    }
    if preset.holladay == Some(true) {
        parts.push("holladay".to_string());
    }
    if let Some(gamma) = preset.gamma {
        parts.push(format!("gamma {gamma}"));
    }
    parts.join(", ")
}

fn run_init_command(output: &Path, force: bool) -> anyhow::Result<()> {
    if AssetLoader::extract_default(output, force)? {
        println!("  + {}", output.display());
    } else {
        println!(
            "Skipped existing {} (use --force to overwrite)",
            output.display()
        );
    }
    Ok(())
}

/// Display version and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("htscreen v{VERSION} - ordered-dither halftone screen generator\n");

    let config_env = std::env::var(CONFIG_ENV).ok();
    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV} = {}",
        config_env.as_deref().unwrap_or("(not set)")
    );

    let loader = AssetLoader::from_env(None);
    let source = match loader.source() {
        PresetSource::Embedded if config_env.is_some() => {
            "embedded (file not found)".to_string()
        }
        source => source.to_string(),
    };
    println!("\nPresets: {source}");
    match AppConfig::load_from_assets(&loader) {
        Ok(config) => println!(
            "  {} presets, default {}",
            config.screens.len(),
            config.default_screen.as_deref().unwrap_or("(none)")
        ),
        Err(e) => println!("  failed to load: {e}"),
    }

    println!("\nRun 'htscreen generate --help' to build a screen.");
}
