use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{Choice, FilterSelection};

/// Command-line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "crime-dash", version, about = "US crime statistics dashboard")]
pub struct Config {
    /// Dataset to load at startup (.csv or .parquet).
    #[arg(long, env = "CRIME_DASH_DATA", default_value = "clean_data_crime.csv")]
    pub data: PathBuf,

    /// Banner image shown above the title; skipped when the file is absent.
    #[arg(long, default_value = "header2.jpg")]
    pub header: PathBuf,

    /// Write the dashboard summary as JSON to this path instead of opening a window.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Initial Disposition filter.
    #[arg(long, default_value = "All")]
    pub disposition: String,

    /// Initial Category filter.
    #[arg(long, default_value = "All")]
    pub category: String,
}

impl Config {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::new(Choice::parse(&self.disposition), Choice::parse(&self.category))
    }

    /// `file://` URI of the banner, if the file exists.
    pub fn header_uri(&self) -> Option<String> {
        if self.header.is_file() {
            Some(format!("file://{}", self.header.display()))
        } else {
            log::debug!("no header image at {}", self.header.display());
            None
        }
    }
}
