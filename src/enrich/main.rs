//! Batch enrichment of earthquake locations.
//!
//! Loads the reference layers once, resolves every input point against them
//! in parallel and writes the results as CSV or JSON lines.

mod output;
mod postprocess;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use seisloc::area::AreaBuckets;
use seisloc::config::LayerConfig;
use seisloc::engine::{AdminLabels, CountryAliases};
use seisloc::loaders::{
    discover_layers, load_admin_regions, load_coastline, load_countries, load_maritime_zones,
    load_places, load_records,
};
use seisloc::{EnrichConfig, Enricher, LayerError, LayerSources, PointRecord, ReferenceLayers};

use crate::output::{write_results, OutputFormat};
use crate::postprocess::TokenStripper;

#[derive(Parser, Debug)]
#[command(name = "enrich")]
#[command(about = "Add country, region, nearest place and coast context to earthquake locations")]
struct Args {
    /// Input CSV with id, latitude and longitude columns
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory searched for any layer without an explicit path
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Country polygons (GeoJSON)
    #[arg(long)]
    countries: Option<PathBuf>,

    /// Admin region polygons (GeoJSON)
    #[arg(long)]
    admin_regions: Option<PathBuf>,

    /// GeoNames cities file (.txt or .txt.gz)
    #[arg(long)]
    places: Option<PathBuf>,

    /// Maritime zone polygons (GeoJSON)
    #[arg(long)]
    maritime_zones: Option<PathBuf>,

    /// Coastline lines (GeoJSON)
    #[arg(long)]
    coastline: Option<PathBuf>,

    /// Distance under which the nearest place may override the country
    #[arg(long)]
    override_km: Option<f64>,

    /// Population at which a place counts as major
    #[arg(long)]
    major_population: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    /// Command-line values take precedence over the configuration file.
    fn apply_to(&self, config: &mut EnrichConfig) {
        let layers = &mut config.layers;
        for (flag, slot) in [
            (&self.data_dir, &mut layers.data_dir),
            (&self.countries, &mut layers.countries),
            (&self.admin_regions, &mut layers.admin_regions),
            (&self.places, &mut layers.places),
            (&self.maritime_zones, &mut layers.maritime_zones),
            (&self.coastline, &mut layers.coastline),
        ] {
            if flag.is_some() {
                *slot = flag.clone();
            }
        }

        if let Some(km) = self.override_km {
            config.policy.country_override_km = km;
        }
        if let Some(population) = self.major_population {
            config.policy.major_place_population = population;
        }
    }
}

/// Load one layer; a missing path or a load failure leaves it empty.
fn load_or_empty<T, F>(label: &str, path: Option<&Path>, load: F) -> T
where
    T: Default,
    F: FnOnce(&Path) -> Result<T, LayerError>,
{
    let Some(path) = path else {
        return T::default();
    };
    load(path).unwrap_or_else(|e| {
        warn!("Could not load {} layer: {}", label, e);
        T::default()
    })
}

fn load_sources(layers: &LayerConfig, config: &EnrichConfig) -> LayerSources {
    let props = &config.properties;
    LayerSources {
        countries: load_or_empty("country", layers.countries.as_deref(), |p| {
            load_countries(p, props)
        }),
        admin_regions: load_or_empty("admin-region", layers.admin_regions.as_deref(), |p| {
            load_admin_regions(p, props)
        }),
        maritime_zones: load_or_empty("maritime-zone", layers.maritime_zones.as_deref(), |p| {
            load_maritime_zones(p, props)
        }),
        places: load_or_empty("place", layers.places.as_deref(), |p| {
            load_places(p, config.policy.min_place_population)
        }),
        coastline: load_or_empty("coastline", layers.coastline.as_deref(), |p| {
            load_coastline(p).map(Some)
        }),
    }
}

fn main() -> Result<()> {
    // Initialize logging; stdout may carry the results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("seisloc enrich");
    info!("Input: {}", args.input.display());

    let mut config = match &args.config {
        Some(path) => EnrichConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EnrichConfig::default(),
    };
    args.apply_to(&mut config);

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let layer_paths = discover_layers(&config.layers);
    let layers = ReferenceLayers::build(load_sources(&layer_paths, &config), &config.policy);

    let enricher = Enricher::new(&layers, config.policy)
        .with_admin_labels(AdminLabels::new(&config.admin_labels))
        .with_country_aliases(CountryAliases::new(&config.country_aliases));

    let records = load_records(&args.input).context("Failed to load input records")?;
    let (valid, invalid): (Vec<PointRecord>, Vec<PointRecord>) =
        records.into_iter().partition(|r| r.is_valid());
    for record in &invalid {
        warn!(
            "Skipping record {} with invalid coordinates ({}, {})",
            record.id, record.lat, record.lon
        );
    }

    // Create progress bar
    let pb = ProgressBar::new(valid.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let results: Vec<_> = valid
        .par_iter()
        .map(|record| {
            let result = enricher.enrich(record);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_with_message("Enrichment complete");

    let buckets = AreaBuckets::new(&config.area_buckets);
    let mut stripper = TokenStripper::default();
    let results: Vec<_> = results
        .into_iter()
        .map(|r| postprocess::finalize(r, &buckets, &mut stripper))
        .collect();

    let on_land = results.iter().filter(|r| r.on_land).count();
    info!(
        "Enriched {} records ({} on land, {} offshore, {} skipped)",
        results.len(),
        on_land,
        results.len() - on_land,
        invalid.len()
    );

    write_results(&results, args.format, args.output.as_deref())?;
    if let Some(path) = &args.output {
        info!("Wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "enrich",
            "--input",
            "events.csv",
            "--places",
            "cities500.txt",
            "--override-km",
            "40",
            "--format",
            "jsonl",
        ]);
        let mut config = EnrichConfig::default();
        config.layers.places = Some(PathBuf::from("cities1000.txt"));
        config.layers.countries = Some(PathBuf::from("countries.geojson"));
        args.apply_to(&mut config);

        assert_eq!(args.format, OutputFormat::Jsonl);
        assert_eq!(config.layers.places, Some(PathBuf::from("cities500.txt")));
        assert_eq!(config.layers.countries, Some(PathBuf::from("countries.geojson")));
        assert_eq!(config.policy.country_override_km, 40.0);
        assert_eq!(config.policy.major_place_population, 100_000);
    }

    #[test]
    fn test_missing_layer_loads_empty() {
        let sources = load_sources(
            &LayerConfig {
                countries: Some(PathBuf::from("/nonexistent/countries.geojson")),
                ..Default::default()
            },
            &EnrichConfig::default(),
        );
        assert!(sources.countries.is_empty());
        assert!(sources.places.is_empty());
        assert!(sources.coastline.is_none());
    }
}
