use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use raidtree_api::error::{RaidTreeError, RaidTreeResultExt, ReportError, TopologyError};

use crate::records::Record;

use super::{
    Controller, PhysicalDisk, PhysicalDiskKey, Topology, VirtualDisk, VirtualDiskKey,
};

/// Collects controllers and disks without cross-linking them. Linking happens
/// once, in [`TopologyBuilder::link`], over the complete set of entities.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    controllers: BTreeMap<u32, Controller>,
    virtual_disks: BTreeMap<VirtualDiskKey, VirtualDisk>,
    physical_disks: BTreeMap<PhysicalDiskKey, PhysicalDisk>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller and returns its number.
    pub fn add_controller(&mut self, record: &Record) -> Result<u32, RaidTreeError> {
        let controller = Controller::from_record(record).message("Invalid controller record")?;
        let number = controller.number;
        if self.controllers.contains_key(&number) {
            return Err(RaidTreeError::new(TopologyError::DuplicateController {
                controller: number,
            }));
        }

        debug!(
            "Adding controller {number} '{}' ({})",
            controller.name, controller.state
        );
        self.controllers.insert(number, controller);
        Ok(number)
    }

    pub fn add_virtual_disk(
        &mut self,
        controller: u32,
        record: &Record,
    ) -> Result<VirtualDiskKey, RaidTreeError> {
        let vdisk = VirtualDisk::from_record(controller, record)
            .message(format!("Invalid virtual disk record on controller {controller}"))?;
        let key = vdisk.key;

        let owner = self
            .controllers
            .get_mut(&controller)
            .structured(TopologyError::UnknownController { controller })?;
        if self.virtual_disks.contains_key(&key) {
            return Err(RaidTreeError::new(TopologyError::DuplicateVirtualDisk {
                controller,
                logical_drive: key.logical_drive,
            }));
        }

        debug!("Adding virtual disk {key} '{}' ({})", vdisk.name, vdisk.layout);
        owner.virtual_disks.push(key);
        self.virtual_disks.insert(key, vdisk);
        Ok(key)
    }

    pub fn add_physical_disk(
        &mut self,
        controller: u32,
        record: &Record,
    ) -> Result<PhysicalDiskKey, RaidTreeError> {
        let disk = PhysicalDisk::from_record(controller, record)
            .message(format!("Invalid physical disk record on controller {controller}"))?;
        let key = disk.key;

        let owner = self
            .controllers
            .get_mut(&controller)
            .structured(TopologyError::UnknownController { controller })?;
        if self.physical_disks.contains_key(&key) {
            return Err(RaidTreeError::new(TopologyError::DuplicatePhysicalDisk {
                disk: key.to_string(),
            }));
        }

        debug!(
            "Adding physical disk {key} ({}, {:?})",
            disk.state, disk.attributes
        );
        owner.physical_disks.push(key);
        self.physical_disks.insert(key, disk);
        Ok(key)
    }

    /// Links every span to its parent virtual disk and checks that the
    /// resulting hierarchy is acyclic.
    ///
    /// Spans are linked in logical drive order. A virtual disk whose declared
    /// parent is not registered on the same controller, or whose array number
    /// is already taken by a sibling span, stays top-level.
    pub fn link(mut self) -> Result<Topology, RaidTreeError> {
        let declared = self
            .virtual_disks
            .values()
            .filter_map(|vdisk| {
                vdisk
                    .parent_logical_drive
                    .map(|parent| (vdisk.key, parent, vdisk.array))
            })
            .collect::<Vec<_>>();

        for (key, parent, array) in declared {
            if parent == key.logical_drive {
                return Err(RaidTreeError::new(TopologyError::CyclicHierarchy {
                    controller: key.controller,
                    logical_drive: key.logical_drive,
                }));
            }

            let parent_key = VirtualDiskKey {
                controller: key.controller,
                logical_drive: parent,
            };
            let Some(parent_vdisk) = self.virtual_disks.get_mut(&parent_key) else {
                warn!("Virtual disk {key} declares parent {parent_key}, which is not registered; keeping it top-level");
                continue;
            };
            if let Some(linked) = parent_vdisk.children.get(&array) {
                warn!(
                    "Virtual disk {parent_key} already has span {linked} with array number {array}; keeping {key} top-level"
                );
                continue;
            }
            parent_vdisk.children.insert(array, key);

            if let Some(child) = self.virtual_disks.get_mut(&key) {
                child.parent = Some(parent_key);
            }
            debug!("Linked span {key} (array {array}) to virtual disk {parent_key}");
        }

        self.check_acyclic()?;

        Ok(Topology {
            controllers: self.controllers,
            virtual_disks: self.virtual_disks,
            physical_disks: self.physical_disks,
        })
    }

    fn check_acyclic(&self) -> Result<(), RaidTreeError> {
        for start in self.virtual_disks.keys() {
            let mut visited = BTreeSet::new();
            let mut current = Some(*start);
            while let Some(key) = current {
                if !visited.insert(key) {
                    return Err(RaidTreeError::new(TopologyError::CyclicHierarchy {
                        controller: key.controller,
                        logical_drive: key.logical_drive,
                    }));
                }
                current = self
                    .virtual_disks
                    .get(&key)
                    .and_then(|vdisk| vdisk.parent);
            }
        }
        Ok(())
    }
}
