//! Record sources backed by the inventory command or by saved documents.

use std::path::{Path, PathBuf};

use log::debug;

use osutils::{files, omreport::OmReport};
use raidtree_api::error::{AcquisitionError, RaidTreeError, ReportError};

use crate::{
    collect::RecordSource,
    records::{parse_document, Record},
    topology::VirtualDiskKey,
};

fn parse(document: &str, what: String) -> Result<Vec<Record>, RaidTreeError> {
    let records =
        parse_document(document).structured(AcquisitionError::ParseDocument { what: what.clone() })?;
    debug!("Parsed {} records for {what}", records.len());
    Ok(records)
}

/// Queries the live system through the inventory command.
#[derive(Debug, Clone, Default)]
pub struct OmReportSource {
    omreport: OmReport,
}

impl OmReportSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            omreport: OmReport::new(path),
        }
    }
}

impl RecordSource for OmReportSource {
    fn controllers(&self) -> Result<Vec<Record>, RaidTreeError> {
        let what = "controllers".to_string();
        let document = self
            .omreport
            .controllers()
            .structured(AcquisitionError::Query { what: what.clone() })?;
        parse(&document, what)
    }

    fn virtual_disks(&self, controller: u32) -> Result<Vec<Record>, RaidTreeError> {
        let what = format!("virtual disks of controller {controller}");
        let document = self
            .omreport
            .virtual_disks(controller)
            .structured(AcquisitionError::Query { what: what.clone() })?;
        parse(&document, what)
    }

    fn array_disks(&self, controller: u32) -> Result<Vec<Record>, RaidTreeError> {
        let what = format!("physical disks of controller {controller}");
        let document = self
            .omreport
            .array_disks(controller)
            .structured(AcquisitionError::Query { what: what.clone() })?;
        parse(&document, what)
    }

    fn assigned_disks(&self, vdisk: VirtualDiskKey) -> Result<Vec<Record>, RaidTreeError> {
        let what = format!("physical disks of virtual disk {vdisk}");
        let document = self
            .omreport
            .assigned_disks(vdisk.controller, vdisk.logical_drive)
            .structured(AcquisitionError::Query { what: what.clone() })?;
        parse(&document, what)
    }
}

/// Reads documents previously saved from the inventory command:
///
/// - `controllers.xml`
/// - `vdisks-<controller>.xml`
/// - `pdisks-<controller>.xml`
/// - `assigned-<controller>-<logical drive>.xml`
///
/// Only `controllers.xml` is required; any other missing document is read as
/// an empty collection.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    directory: PathBuf,
}

impl SnapshotSource {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    fn read(&self, name: &str, required: bool) -> Result<Vec<Record>, RaidTreeError> {
        let path = self.directory.join(name);
        let path_text = path.display().to_string();

        let document = files::read_optional(&path).structured(AcquisitionError::ReadDocument {
            path: path_text.clone(),
        })?;
        match document {
            Some(document) => parse(&document, path_text),
            None if required => Err(RaidTreeError::new(AcquisitionError::ReadDocument {
                path: path_text,
            })),
            None => {
                debug!("No document at '{path_text}'");
                Ok(Vec::new())
            }
        }
    }
}

impl RecordSource for SnapshotSource {
    fn controllers(&self) -> Result<Vec<Record>, RaidTreeError> {
        self.read("controllers.xml", true)
    }

    fn virtual_disks(&self, controller: u32) -> Result<Vec<Record>, RaidTreeError> {
        self.read(&format!("vdisks-{controller}.xml"), false)
    }

    fn array_disks(&self, controller: u32) -> Result<Vec<Record>, RaidTreeError> {
        self.read(&format!("pdisks-{controller}.xml"), false)
    }

    fn assigned_disks(&self, vdisk: VirtualDiskKey) -> Result<Vec<Record>, RaidTreeError> {
        self.read(
            &format!("assigned-{}-{}.xml", vdisk.controller, vdisk.logical_drive),
            false,
        )
    }
}
