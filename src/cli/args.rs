use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "points2postgis")]
#[command(about = "Store satellite point observations in a PostGIS database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store the observations of one or more scenes
    Store {
        #[arg(short, long, help = "Product list YAML file")]
        config: PathBuf,

        #[arg(short, long, required = true, num_args = 1.., help = "Scene JSON file(s)")]
        scene: Vec<PathBuf>,

        #[arg(short, long, help = "Region catalog YAML file")]
        areas: Option<PathBuf>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, help = "Print rows instead of writing them")]
        dry_run: bool,

        #[arg(long, help = "Reject scenes whose datasets differ in length")]
        strict_lengths: bool,
    },

    /// Check a product list without touching the database
    Validate {
        #[arg(short, long, help = "Product list YAML file")]
        config: PathBuf,

        #[arg(short, long, help = "Region catalog YAML file")]
        areas: Option<PathBuf>,
    },

    /// List the available conversions
    Conversions,
}
