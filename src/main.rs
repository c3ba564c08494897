//! COVID-19 geographic analysis tool
//!
//! Reads locations from CSV or JSON files and prints clusters, spread vectors
//! or heatmap descriptions as JSON.

use clap::{Parser, Subcommand};
use csv::ReaderBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use covid_geo::config::AnalysisConfig;
use covid_geo::error::{AnalysisError, ConfigError};
use covid_geo::location::{CaseSnapshot, Coordinates, Location, LocationId};
use covid_geo::{Clusterer, DistanceMode, HeatmapBuilder, spread};


#[derive(Parser)]
#[command(name = "covid_geo")]
#[command(about = "Geographic analysis of COVID-19 case data", long_about = None)]
struct Args {
    /// TOML configuration file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output (when RUST_LOG is not set)
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Group locations into DBSCAN clusters
    Clusters(ClustersArgs),
    /// Case trend per location over a window of days
    Spread(SpreadArgs),
    /// Per-coordinate case change from a list of snapshots
    Magnitudes(MagnitudesArgs),
    /// Heatmap description for a map renderer
    Heatmap(HeatmapArgs),
}

#[derive(clap::Args)]
struct IoArgs {
    /// Input file: CSV with id,latitude,longitude[,cases] columns or a JSON array
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ClustersArgs {
    #[command(flatten)]
    io: IoArgs,

    /// DBSCAN epsilon parameter (clustering radius in km)
    #[arg(short, long)]
    eps: Option<f64>,

    /// DBSCAN minPoints parameter (minimum points in cluster)
    #[arg(short = 'm', long)]
    min_points: Option<usize>,

    /// Distance evaluation mode
    #[arg(long, value_enum)]
    mode: Option<DistanceMode>,

    /// Report noise points as clusters of their own
    #[arg(long)]
    singletons: bool,

    /// Report noise points under a separate "noise" key
    #[arg(long, conflicts_with = "summary")]
    with_noise: bool,

    /// Print one label per input location instead of members (-1 for noise)
    #[arg(long, conflicts_with_all = ["summary", "with_noise"])]
    labels: bool,

    /// Print per-cluster summaries instead of members
    #[arg(long)]
    summary: bool,

    /// Ignore locations with fewer cases than this
    #[arg(long, default_value_t = 0)]
    min_cases: u64,
}

#[derive(clap::Args)]
struct SpreadArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Window length in days
    #[arg(long)]
    days: Option<u32>,

    /// Key the output by location id
    #[arg(long)]
    by_location: bool,
}

#[derive(clap::Args)]
struct MagnitudesArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Window length in days
    #[arg(long, default_value_t = 7)]
    days: u32,
}

#[derive(clap::Args)]
struct HeatmapArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Latitude of the map center
    #[arg(long, requires = "center_lon", allow_hyphen_values = true)]
    center_lat: Option<f64>,

    /// Longitude of the map center
    #[arg(long, requires = "center_lat", allow_hyphen_values = true)]
    center_lon: Option<f64>,
}

/// Cluster label of one input location, noise as -1
#[derive(Serialize)]
struct LabeledLocation<'a> {
    id: &'a LocationId,
    label: i32,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Bad input on line {line}: {message}")]
    Input { line: usize, message: String },
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    if debug && std::env::var_os("RUST_LOG").is_none() {
        pretty_env_logger::formatted_builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        pretty_env_logger::init();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    match args.command {
        Command::Clusters(cmd) => run_clusters(config, cmd),
        Command::Spread(cmd) => run_spread(config, cmd),
        Command::Magnitudes(cmd) => run_magnitudes(cmd),
        Command::Heatmap(cmd) => run_heatmap(config, cmd),
    }
}

fn run_clusters(config: AnalysisConfig, cmd: ClustersArgs) -> Result<(), CliError> {
    let mut cluster_config = config.cluster;
    if let Some(eps) = cmd.eps {
        cluster_config.eps_km = eps;
    }
    if let Some(min_points) = cmd.min_points {
        cluster_config.min_points = min_points;
    }
    if let Some(mode) = cmd.mode {
        cluster_config.mode = mode;
    }
    cluster_config.singletons |= cmd.singletons;
    let clusterer = Clusterer::new(cluster_config)?;
    log::debug!("Clustering with {:?}", clusterer.config());

    let mut locations = read_locations(&cmd.io.input)?;
    log::info!("Read {} locations from {:?}", locations.len(), cmd.io.input);
    filter_min_cases(&mut locations, cmd.min_cases);

    if cmd.labels {
        let labels = build_labels(&clusterer, &locations);
        return write_json(cmd.io.output.as_deref(), &labels);
    }

    let clustering = clusterer.cluster_with_noise(&locations);
    log::info!(
        "Found {} clusters and {} noise points",
        clustering.clusters.len(),
        clustering.noise.len()
    );

    let output = cmd.io.output.as_deref();
    if cmd.summary {
        write_json(output, &clustering.summaries())
    } else if cmd.with_noise {
        write_json(output, &clustering)
    } else {
        write_json(output, &clustering.clusters)
    }
}

fn run_spread(config: AnalysisConfig, cmd: SpreadArgs) -> Result<(), CliError> {
    let days = cmd.days.unwrap_or(config.spread.window_days);
    let locations = read_locations(&cmd.io.input)?;
    let vectors = spread::spread_vectors(&locations, days);
    log::info!(
        "Computed {} spread vectors over {days} days for {} locations",
        vectors.len(),
        locations.len()
    );

    let output = cmd.io.output.as_deref();
    if cmd.by_location {
        write_json(output, &spread::by_location(vectors))
    } else {
        write_json(output, &vectors)
    }
}

fn run_magnitudes(cmd: MagnitudesArgs) -> Result<(), CliError> {
    let snapshots: Vec<CaseSnapshot> =
        serde_json::from_reader(BufReader::new(File::open(&cmd.io.input)?))?;
    let magnitudes = spread::spread_magnitudes(&snapshots, cmd.days);
    log::info!(
        "{} coordinates changed over {} days",
        magnitudes.len(),
        cmd.days
    );
    write_json(cmd.io.output.as_deref(), &magnitudes)
}

fn run_heatmap(config: AnalysisConfig, cmd: HeatmapArgs) -> Result<(), CliError> {
    let center = match (cmd.center_lat, cmd.center_lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
        _ => None,
    };
    let locations = read_locations(&cmd.io.input)?;
    let spec = HeatmapBuilder::new(config.heatmap).build(&locations, center)?;
    log::info!(
        "Heatmap centred at ({:.4}, {:.4}) with {} points",
        spec.center.latitude(),
        spec.center.longitude(),
        spec.points.len()
    );
    write_json(cmd.io.output.as_deref(), &spec)
}

fn build_labels<'a>(clusterer: &Clusterer, locations: &'a [Location]) -> Vec<LabeledLocation<'a>> {
    locations
        .iter()
        .zip(clusterer.labels(locations))
        .map(|(loc, label)| LabeledLocation {
            id: &loc.id,
            label: label.as_i32(),
        })
        .collect()
}

/// Drops locations below `min_cases`; zero disables the filter
fn filter_min_cases(locations: &mut Vec<Location>, min_cases: u64) {
    if min_cases > 0 {
        locations.retain(|loc| loc.cases.is_some_and(|c| c >= min_cases));
    }
}

/// Reads locations from a `.json` array or from CSV
fn read_locations(path: &Path) -> Result<Vec<Location>, CliError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    } else {
        read_locations_csv(path)
    }
}

/// Reads locations from a CSV file
///
/// Expected format: `id,latitude,longitude[,cases]` (header row is optional,
/// an empty cases column means no figure)
fn read_locations_csv(path: &Path) -> Result<Vec<Location>, CliError> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut locations = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = idx + 1;

        // Header row: latitude column is not a number
        if idx == 0 && record.get(1).is_some_and(|lat| lat.parse::<f64>().is_err()) {
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < 3 {
            return Err(CliError::Input {
                line,
                message: format!("expected at least 3 columns, got {}", record.len()),
            });
        }

        let parse_f64 = |col: usize, name: &str| {
            record[col].parse::<f64>().map_err(|e| CliError::Input {
                line,
                message: format!("{name} {:?}: {e}", &record[col]),
            })
        };
        let lat = parse_f64(1, "latitude")?;
        let lon = parse_f64(2, "longitude")?;
        let coordinates = Coordinates::new(lat, lon).map_err(|e| CliError::Input {
            line,
            message: e.to_string(),
        })?;

        let cases = match record.get(3).filter(|c| !c.is_empty()) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| CliError::Input {
                line,
                message: format!("cases {raw:?}: {e}"),
            })?),
            None => None,
        };

        locations.push(Location::new(parse_id(&record[0]), coordinates, cases));
    }

    Ok(locations)
}

fn parse_id(raw: &str) -> LocationId {
    raw.parse::<i64>()
        .map_or_else(|_| LocationId::from(raw), LocationId::from)
}

/// Writes `value` as pretty JSON to `output`, or to stdout
fn write_json<T: Serialize + ?Sized>(output: Option<&Path>, value: &T) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            writer.flush()?;
            log::debug!("Output written to {path:?}");
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
