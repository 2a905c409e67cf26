use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;

use terrain_panorama::config::{preset, presets, PanoramaUserParameters};
use terrain_panorama::io::{save_labels_csv, save_panorama_csv};
use terrain_panorama::labels::Labelizer;
use terrain_panorama::panorama::{Panorama, PanoramaComputer, PanoramaParameters};
use terrain_panorama::summit::gazetteer::read_summits_lenient_from;
use terrain_panorama::terrain::{ContinuousElevationModel, TerrainLoader, TerrainManager};

/// Computes a mountain panorama from SRTM elevation tiles and labels the visible summits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding the `.hgt` tiles.
    #[arg(long, default_value = "assets")]
    hgt_dir: PathBuf,

    /// Summit gazetteer. Without one no labels are produced.
    #[arg(long)]
    summits: Option<PathBuf>,

    /// Name of a predefined panorama.
    #[arg(long, default_value = "niesen", conflicts_with = "config")]
    preset: String,

    /// JSON file with the panorama parameters, instead of a preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where `panorama.csv` and `labels.csv` are written.
    #[arg(long, default_value = "out")]
    output_dir: PathBuf,

    /// Number of tiles kept mapped at once.
    #[arg(long, default_value_t = 16)]
    tile_cache: usize,

    /// Print the predefined panoramas and exit.
    #[arg(long)]
    list_presets: bool,
}

fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    if cli.list_presets {
        for (name, parameters) in presets() {
            println!("{name}: {}", serde_json::to_string(&parameters)?);
        }
        return Ok(());
    }

    let user_parameters = match &cli.config {
        Some(path) => PanoramaUserParameters::from_json_file(path)
            .with_context(|| format!("failed to read parameters from {}", path.display()))?,
        None => preset(&cli.preset).with_context(|| format!("unknown preset {:?}", cli.preset))?,
    };
    let parameters = user_parameters.panorama_parameters()?;
    info!("Panorama from {} at {} m", parameters.observer_position(), parameters.observer_elevation());

    let manager = TerrainManager::new(TerrainLoader::new(cli.hgt_dir.clone()), cli.tile_cache);
    let dem = manager
        .region_around(parameters.observer_position(), parameters.max_distance())
        .with_context(|| format!("failed to load elevation tiles from {}", cli.hgt_dir.display()))?;
    drop(manager);

    let (panorama, labels) = {
        let cem = ContinuousElevationModel::new(&dem);
        let panorama = compute_panorama(&cem, &parameters)?;
        let labels = match &cli.summits {
            Some(path) => {
                let summits = read_summits_lenient_from(path)
                    .with_context(|| format!("failed to read summits from {}", path.display()))?;
                Labelizer::new(&cem, summits).labels(&user_parameters.panorama_display_parameters()?)?
            }
            None => Vec::new(),
        };
        (panorama, labels)
    };
    dem.close();

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;
    save_panorama_csv(&panorama, cli.output_dir.join("panorama.csv"))?;
    save_labels_csv(&labels, cli.output_dir.join("labels.csv"))?;

    Ok(())
}

fn setup_logging() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive("terrain_panorama=info".parse()?)
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Runs the computation on a worker thread and reports column progress.
fn compute_panorama(cem: &ContinuousElevationModel<'_>, parameters: &PanoramaParameters) -> Result<Panorama> {
    let progress = Arc::new(AtomicU32::new(0));
    let width = parameters.width();

    thread::scope(|s| {
        let worker = s.spawn(|| {
            PanoramaComputer::new(cem).compute_panorama_with_progress(parameters, Some(progress.clone()))
        });
        while !worker.is_finished() {
            thread::sleep(Duration::from_millis(500));
            info!("{}/{width} columns", progress.load(Ordering::Relaxed));
        }
        let panorama = worker.join().map_err(|_| anyhow!("panorama worker panicked"))??;
        Ok(panorama)
    })
}
