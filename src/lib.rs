use std::io::Write;

use log::info;

use raidtree_api::error::{InternalError, RaidTreeError, RaidTreeResultExt, ReportError};

pub mod cli;
pub mod collect;
pub mod logging;
pub mod records;
pub mod report;
pub mod source;
pub mod topology;

#[cfg(test)]
pub(crate) mod testutils;

use cli::{Cli, Mode};
use collect::RecordSource;
use report::ReportOptions;
use source::{OmReportSource, SnapshotSource};

/// Version reported by `--version`, overridable at build time.
pub const RAIDTREE_VERSION: &str = match option_env!("RAIDTREE_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Done,
    /// The inventory holds no controller, or none matching the filter.
    NoControllers,
}

/// Builds the topology from the source selected on the command line and
/// writes the requested output to `out`.
pub fn run(args: &Cli, out: &mut impl Write) -> Result<ExitKind, RaidTreeError> {
    info!("raidtree version: {RAIDTREE_VERSION}");

    match &args.snapshot {
        Some(directory) => {
            info!("Reading inventory snapshot from '{}'", directory.display());
            generate(
                &SnapshotSource::new(directory),
                args.mode(),
                &args.report_options(),
                out,
            )
        }
        None => generate(
            &OmReportSource::new(&args.omreport),
            args.mode(),
            &args.report_options(),
            out,
        ),
    }
}

/// Builds the topology from `source` and writes the requested output to
/// `out`. Nothing is written unless the whole topology could be built.
pub fn generate(
    source: &impl RecordSource,
    mode: Mode,
    options: &ReportOptions,
    out: &mut impl Write,
) -> Result<ExitKind, RaidTreeError> {
    let Some(topology) = collect::collect(source, options.controller)
        .message("Failed to build the storage topology")?
    else {
        return Ok(ExitKind::NoControllers);
    };

    let text = match mode {
        Mode::Report => report::render(&topology, options),
        Mode::AttributeMasks => report::render_attribute_masks(&topology),
    };
    out.write_all(text.as_bytes())
        .structured(InternalError::WriteOutput)?;

    Ok(ExitKind::Done)
}
