use crate::config::toml_config::SessionConfig;
use crate::core::addressing::SectionGrid;
use crate::domain::model::Coordinate;
use crate::utils::error::Result;
use crate::utils::units::parse_distance;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "plss-restore")]
#[command(about = "Restore lost PLSS corners by single or double proportion")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Coordinates of a section corner, quarter corner or center
    Resolve {
        #[arg(long)]
        section: u8,

        /// NW, NE, SW, SE, N, S, E, W or C
        #[arg(long, default_value = "C")]
        corner: String,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Section containing a coordinate
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        northing: f64,

        #[arg(long, allow_hyphen_values = true)]
        easting: f64,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Nearest corner or quarter corner to a coordinate
    Snap {
        #[arg(long, allow_hyphen_values = true)]
        northing: f64,

        #[arg(long, allow_hyphen_values = true)]
        easting: f64,

        /// Snap radius in feet
        #[arg(long, default_value_t = 1056.0)]
        tolerance: f64,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Restore the lost corner described by a TOML session file
    Restore {
        #[arg(short, long, default_value = "session.toml")]
        config: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Show the session without computing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct GridArgs {
    /// Take the grid from a session file instead of the flags below
    #[arg(long)]
    pub grid_config: Option<PathBuf>,

    /// Northing of the township's northwest corner
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub origin_northing: f64,

    /// Easting of the township's northwest corner
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub origin_easting: f64,

    /// Side length of every section, in feet or chains
    #[arg(long, default_value = "80 ch")]
    pub section_size: String,
}

impl GridArgs {
    pub fn to_grid(&self) -> Result<SectionGrid> {
        if let Some(path) = &self.grid_config {
            return SessionConfig::from_file(path)?.grid();
        }

        let origin = Coordinate::new(self.origin_northing, self.origin_easting);
        SectionGrid::uniform(origin, parse_distance("section_size", &self.section_size)?)
    }
}
