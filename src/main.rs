use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use osm2scene::config::FileConfig;
use osm2scene::diagnostics::Diagnostics;
use osm2scene::geometry::Scaler;
use osm2scene::layers::Converter;
use osm2scene::mesh::write_pov;
use osm2scene::osm::{GeoBounds, load_file};

/// Convert OpenStreetMap data into a POV-Ray scene
///
/// Examples:
///   # Render an Overpass export with the built-in layer list
///   osm2scene prague.json -o prague.pov
///
///   # Same area, other trees, custom layers
///   osm2scene prague.json --seed 42 --config my-layers.toml
///
///   # Only part of the exported area
///   osm2scene prague.json --bounds 50.08,14.41,50.09,14.43
#[derive(Parser, Debug)]
#[command(name = "osm2scene")]
#[command(version, about, long_about = None)]
struct Args {
    /// Overpass JSON file (`[out:json]` output)
    input: PathBuf,

    /// Output scene file (defaults to the input name with a .pov extension)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Path to config file (optional, auto-searches osm2scene.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Area to draw as minlat,minlon,maxlat,maxlon (defaults to the file's bounds)
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<GeoBounds>,

    /// Seed for tree placement and object variants
    #[arg(long)]
    seed: Option<u64>,

    /// Suppress geometry warnings and progress output
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    // RUST_LOG overrides the level picked by the flags
    let log_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let file_config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        FileConfig::load_from(config_path)?
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let quiet = args.quiet || (file_config.quiet && !args.verbose);
    let verbose = args.verbose || (file_config.verbose && !quiet);

    let seed = args.seed.unwrap_or(file_config.seed);
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| args.input.with_extension("pov"));

    if !quiet {
        println!("osm2scene - OpenStreetMap to POV-Ray scene");
        println!("==========================================");
        println!();
    }
    if verbose {
        println!("Configuration:");
        println!("  Input: {}", args.input.display());
        println!("  Output: {}", output_path.display());
        println!("  Scene size: {}", file_config.scene_size);
        println!("  Margin: {}%", file_config.margin_percent);
        println!("  Seed: {}", seed);
        println!(
            "  Trees: density {}, clearance {}m",
            file_config.scatter.density, file_config.scatter.clearance
        );
        println!("  Layers: {}", file_config.layers.len());
        println!();
    }

    let mut diag = Diagnostics::new(quiet);

    let spinner = create_spinner("Reading source data...", quiet);
    let start = Instant::now();
    let store = load_file(&args.input, args.bounds, &mut diag)?;
    spinner.finish_with_message(format!(
        "Read {} nodes, {} ways, {} relations [{:.1}s]",
        store.node_count(),
        store.way_count(),
        store.relation_count(),
        start.elapsed().as_secs_f32()
    ));

    let bounds = *store.bounds();
    let interest = bounds.enlarged_by_percent(file_config.margin_percent);

    let spinner = create_spinner("Drawing layers...", quiet);
    let start = Instant::now();
    let mut converter = Converter::new(
        &store,
        Some(interest),
        file_config.scatter.clone(),
        seed,
        diag,
    );
    let layer_count = file_config.layers.len();
    for (i, layer) in file_config.layers.iter().enumerate() {
        spinner.set_message(format!(
            "Drawing layer {}/{}: {}",
            i + 1,
            layer_count,
            layer.selector()
        ));
        converter
            .draw(layer)
            .with_context(|| format!("Failed to draw layer {}", layer.selector()))?;
    }
    let conversion = converter.finish();
    spinner.finish_with_message(format!(
        "Drew {} layers [{:.1}s]",
        layer_count,
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Writing scene file...", quiet);
    let start = Instant::now();
    let scaler = Scaler::from_bounds(&bounds, file_config.scene_size);
    write_pov(
        &output_path,
        &conversion.commands,
        scaler,
        file_config.scene_size,
        &file_config.style_include,
    )?;
    spinner.finish_with_message(format!(
        "Wrote {} commands [{:.1}s]",
        conversion.commands.len(),
        start.elapsed().as_secs_f32()
    ));

    if !quiet {
        let stats = conversion.stats;
        println!();
        println!(
            "Map area: {:.0}m x {:.0}m -> {} scene units",
            bounds.width(),
            bounds.height(),
            file_config.scene_size
        );
        println!(
            "Scene: {} triangles, {} boxes, {} walls, {} cylinders, {} sprites",
            stats.triangles, stats.boxes, stats.walls, stats.cylinders, stats.sprites
        );
        if verbose {
            println!("  Occupied points: {}", conversion.occupied_points);
        }
        println!("{}", conversion.diagnostics.summary());
        println!();
        println!("Output: {}", output_path.display());
        println!(
            "Total time: {:.1}s",
            total_start.elapsed().as_secs_f32()
        );
    }

    Ok(())
}

fn create_spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
