//! Drives record acquisition in the order the topology needs it.

use log::{debug, info};

use raidtree_api::{
    constants::FIELD_CONTROLLER_NUM,
    error::{RaidTreeError, RaidTreeResultExt},
};

use crate::{
    records::Record,
    topology::{Topology, TopologyBuilder, VirtualDiskKey},
};

/// Provider of the four record collections a report is built from.
pub trait RecordSource {
    fn controllers(&self) -> Result<Vec<Record>, RaidTreeError>;

    fn virtual_disks(&self, controller: u32) -> Result<Vec<Record>, RaidTreeError>;

    /// Every physical disk attached to the controller.
    fn array_disks(&self, controller: u32) -> Result<Vec<Record>, RaidTreeError>;

    /// Physical disks making up one top-level virtual disk, spans included.
    fn assigned_disks(&self, vdisk: VirtualDiskKey) -> Result<Vec<Record>, RaidTreeError>;
}

/// Builds the topology of every controller, or only of `filter` when given.
///
/// Returns `None` when no controller was found.
pub fn collect(
    source: &impl RecordSource,
    filter: Option<u32>,
) -> Result<Option<Topology>, RaidTreeError> {
    let mut builder = TopologyBuilder::new();

    let mut controllers = Vec::new();
    for record in source.controllers().message("Failed to list controllers")? {
        if let Some(wanted) = filter {
            if record.optional_u32(FIELD_CONTROLLER_NUM)? != Some(wanted) {
                continue;
            }
        }
        controllers.push(builder.add_controller(&record)?);
    }

    if controllers.is_empty() {
        info!("No controllers found");
        return Ok(None);
    }

    for &controller in &controllers {
        for record in source.virtual_disks(controller).message(format!(
            "Failed to list virtual disks of controller {controller}"
        ))? {
            builder.add_virtual_disk(controller, &record)?;
        }
    }

    for &controller in &controllers {
        for record in source.array_disks(controller).message(format!(
            "Failed to list physical disks of controller {controller}"
        ))? {
            builder.add_physical_disk(controller, &record)?;
        }
    }

    let mut topology = builder.link().message("Failed to link virtual disks")?;

    let owners = topology
        .top_level_virtual_disks()
        .map(|vdisk| vdisk.key)
        .collect::<Vec<_>>();
    for owner in owners {
        let records = source
            .assigned_disks(owner)
            .message(format!("Failed to list disks of virtual disk {owner}"))?;
        debug!("Virtual disk {owner} has {} assigned disks", records.len());
        for record in records {
            topology.assign(owner, &record)?;
        }
    }

    info!(
        "Found {} controllers, {} virtual disks and {} physical disks",
        topology.controllers().count(),
        topology.virtual_disks().count(),
        topology.physical_disks().count()
    );

    Ok(Some(topology))
}
