use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cropwatch", version, about = "Precision agriculture advisory CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
    /// Fetch current conditions and forecast, then persist them
    Refresh,
    /// Show the last fetched conditions and forecast
    Status,
    /// Show alerts for the current conditions
    Alerts,
    /// List the built-in crop profiles
    Crops,
    /// Choose which crops to evaluate and compare
    Select {
        /// Crop ids, e.g. `cropwatch select rice wheat`
        ids: Vec<String>,
    },
    /// Score crop suitability against current conditions
    Evaluate {
        /// Evaluate a single crop instead of the selected set
        #[arg(short, long)]
        crop: Option<String>,
    },
    /// Compare crops across suitability axes
    Compare {
        /// Crop ids to compare (defaults to the selected set)
        #[arg(short, long, num_args = 1..)]
        crops: Option<Vec<String>>,
    },
    /// Show prediction model performance metrics
    Performance,
    /// Manage saved locations
    Location {
        #[command(subcommand)]
        command: LocationCommands,
    },
}

#[derive(Subcommand)]
pub enum LocationCommands {
    /// Save a named location
    Add {
        name: String,
        latitude: f64,
        longitude: f64,
    },
    /// List saved locations
    List,
    /// Delete a saved location
    Remove { name: String },
    /// Make a saved location the active one
    Use { name: String },
}
