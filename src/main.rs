use clap::Parser;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use territorio::geocode::{CachedGeocoder, GeocodeCache, Geocoder, NominatimClient};
use territorio::pipeline::{Pipeline, PipelineConfig, RunSummary};
use territorio::records::{self, LocationRecord, ResolvedLocation};

/// Territorio — administrative hierarchy resolver with coordinate enrichment
///
/// Reads a flat CSV of {id, name} location records, infers the
/// region → province → commune hierarchy from code shape, geocodes every
/// commune via OpenStreetMap Nominatim (one request per second), and writes
/// the enriched table as CSV.
///
/// Examples:
///   territorio records.csv --output gerarchia.csv
///   territorio records.csv --prefix ITC --context Liguria
///   territorio records.csv --offline
#[derive(Parser)]
#[command(name = "territorio", version, about, long_about = None)]
struct Cli {
    /// Input CSV with `id` and `name` columns.
    input: PathBuf,

    /// Macro-region code prefix that roots the hierarchy.
    #[arg(long, default_value = "ITC")]
    prefix: String,

    /// Country appended to every geocoding query.
    #[arg(long, default_value = "Italy")]
    country: String,

    /// Context label for communes without a resolved province.
    #[arg(long, default_value = "Liguria")]
    context: String,

    /// Output CSV path. Defaults to stdout.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Pacing interval between geocoding calls, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Skip geocoding; hierarchy and fallback passes only.
    #[arg(long)]
    offline: bool,

    /// Bypass the on-disk geocode cache.
    #[arg(long)]
    no_cache: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let records = records::read_records(&cli.input).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let config = PipelineConfig {
        macro_prefix: cli.prefix.clone(),
        default_context: cli.context.clone(),
        geocode: !cli.offline,
    };
    let pipeline = Pipeline::new(config);

    let client = NominatimClient::new(&cli.country, Duration::from_millis(cli.delay_ms));
    let (table, summary) = if cli.no_cache {
        run(&pipeline, &records, client)
    } else {
        run(
            &pipeline,
            &records,
            CachedGeocoder::new(client, GeocodeCache::load()),
        )
    };

    eprintln!(
        "  Resolved {} regions, {} provinces, {} communes ({} records)",
        summary.hierarchy.regions,
        summary.hierarchy.provinces,
        summary.hierarchy.communes,
        records.len()
    );
    eprintln!(
        "  Coordinates: {} geocoded, {} borrowed, {} total",
        summary.geocoded, summary.borrowed, summary.with_coordinates
    );

    match &cli.output {
        Some(path) => {
            let file = File::create(path).unwrap_or_else(|e| {
                eprintln!("Error: cannot create {}: {}", path.display(), e);
                std::process::exit(1);
            });
            if let Err(e) = records::write_table(file, &table) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            eprintln!("  Table written to {}", path.display());
        }
        None => {
            if let Err(e) = records::write_table(io::stdout().lock(), &table) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run<G: Geocoder>(
    pipeline: &Pipeline,
    records: &[LocationRecord],
    mut geocoder: G,
) -> (Vec<ResolvedLocation>, RunSummary) {
    pipeline.run(records, &mut geocoder)
}
