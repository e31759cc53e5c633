#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for generating the recreation site map.
//!
//! Loads the configured GeoJSON sources, splits the sites into open and
//! closed layers, and writes a static Leaflet page to the output directory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rec_map_generate::config::load_config;
use rec_map_generate::{GenerateArgs, inspect, output_dir, run, summarize};
use rec_map_site_models::CampsiteFilter;
use rec_map_source::LoadOptions;

#[derive(Parser)]
#[command(name = "rec_map", about = "Recreation site map generator")]
struct Cli {
    /// Config file (defaults to `$REC_MAP_CONFIG`, then the built-in config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(multiple = false)]
struct FilterArgs {
    /// Include every site, regardless of campsite count
    #[arg(long)]
    all_sites: bool,

    /// Only include sites with at least one campsite
    #[arg(long)]
    campsites_only: bool,
}

impl FilterArgs {
    const fn filter(&self) -> Option<CampsiteFilter> {
        if self.all_sites {
            Some(CampsiteFilter::AllSites)
        } else if self.campsites_only {
            Some(CampsiteFilter::CampsitesOnly)
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load sources and write the map page, layers, and summary
    Generate {
        /// Output directory (default: `data/generated`)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print open/closed/excluded/skipped counts
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print each site's resolved attributes and classification as JSON lines
    Inspect {
        /// Maximum number of features to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref())?;
    let load = LoadOptions {
        base_dir: loaded.base_dir,
        ..LoadOptions::default()
    };
    let config = loaded.config;

    match cli.command {
        Commands::Generate { output, filter } => {
            let args = GenerateArgs {
                output_dir: output_dir(output.as_deref()),
                filter: filter.filter(),
                load,
            };
            let summary = run(&config, &args).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Summary { filter } => {
            let counts = summarize(&config, filter.filter(), &load).await?;
            println!("Open:     {}", counts.open);
            println!("Closed:   {}", counts.closed);
            println!("Excluded: {}", counts.excluded);
            println!("Skipped:  {}", counts.skipped);
        }
        Commands::Inspect { limit } => {
            for record in inspect(&config, &load, limit).await? {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
    }

    Ok(())
}
