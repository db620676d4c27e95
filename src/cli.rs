use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use raidtree_api::constants::OMREPORT_PATH_DEFAULT;

use crate::{report::ReportOptions, RAIDTREE_VERSION};

/// Show the hardware RAID topology as an indented status report.
#[derive(Parser, Debug)]
#[clap(version = RAIDTREE_VERSION)]
pub struct Cli {
    /// Logging verbosity [OFF, ERROR, WARN, INFO, DEBUG, TRACE]
    #[arg(short, long, default_value_t = LevelFilter::Warn)]
    pub verbosity: LevelFilter,

    /// Only report this controller
    #[arg(short, long)]
    pub controller: Option<u32>,

    /// Show the bus protocol of every physical disk
    #[arg(short, long)]
    pub protocol: bool,

    /// Show the model of every physical disk
    #[arg(short, long)]
    pub model: bool,

    /// Print the attribute mask of every physical disk instead of the report
    #[arg(long)]
    pub attribute_masks: bool,

    /// Read saved inventory documents from this directory instead of running
    /// the inventory command
    #[arg(long, conflicts_with = "omreport")]
    pub snapshot: Option<PathBuf>,

    /// Path to the inventory command
    #[arg(long, default_value = OMREPORT_PATH_DEFAULT)]
    pub omreport: PathBuf,

    /// Also write JSON log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// What to print once the topology is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Report,
    AttributeMasks,
}

impl Cli {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            controller: self.controller,
            show_protocol: self.protocol,
            show_model: self.model,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.attribute_masks {
            Mode::AttributeMasks
        } else {
            Mode::Report
        }
    }
}
