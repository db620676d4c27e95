//! Controllers, virtual disks and physical disks, linked into the hierarchy
//! the report walks.

use std::collections::BTreeMap;

use log::{debug, warn};

use raidtree_api::{
    constants::{FIELD_ARRAY_NUM, OBJ_TYPE_PHYSICAL_DISK},
    error::{RaidTreeError, ReportError, TopologyError},
};

use crate::records::Record;

mod builder;
mod entities;

pub use builder::TopologyBuilder;
pub use entities::{
    Controller, PhysicalDisk, PhysicalDiskKey, VirtualDisk, VirtualDiskKey,
};

/// A linked storage topology, produced by [`TopologyBuilder::link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    controllers: BTreeMap<u32, Controller>,
    virtual_disks: BTreeMap<VirtualDiskKey, VirtualDisk>,
    physical_disks: BTreeMap<PhysicalDiskKey, PhysicalDisk>,
}

impl Topology {
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Controllers in ascending number.
    pub fn controllers(&self) -> impl Iterator<Item = &Controller> {
        self.controllers.values()
    }

    pub fn controller(&self, number: u32) -> Option<&Controller> {
        self.controllers.get(&number)
    }

    pub fn virtual_disk(&self, key: VirtualDiskKey) -> Option<&VirtualDisk> {
        self.virtual_disks.get(&key)
    }

    pub fn physical_disk(&self, key: PhysicalDiskKey) -> Option<&PhysicalDisk> {
        self.physical_disks.get(&key)
    }

    /// All virtual disks, spans included, sorted by key.
    pub fn virtual_disks(&self) -> impl Iterator<Item = &VirtualDisk> {
        self.virtual_disks.values()
    }

    /// All physical disks sorted by key.
    pub fn physical_disks(&self) -> impl Iterator<Item = &PhysicalDisk> {
        self.physical_disks.values()
    }

    pub fn virtual_disks_of<'a>(
        &'a self,
        controller: &'a Controller,
    ) -> impl Iterator<Item = &'a VirtualDisk> {
        self.virtual_disks
            .values()
            .filter(move |vdisk| vdisk.key.controller == controller.number)
    }

    pub fn physical_disks_of<'a>(
        &'a self,
        controller: &'a Controller,
    ) -> impl Iterator<Item = &'a PhysicalDisk> {
        self.physical_disks
            .values()
            .filter(move |disk| disk.key.controller == controller.number)
    }

    /// Virtual disks that are not a span of another one.
    pub fn top_level_virtual_disks(&self) -> impl Iterator<Item = &VirtualDisk> {
        self.virtual_disks.values().filter(|vdisk| !vdisk.is_child())
    }

    /// Spans of `vdisk` in ascending array-number order.
    pub fn children_of<'a>(
        &'a self,
        vdisk: &'a VirtualDisk,
    ) -> impl Iterator<Item = &'a VirtualDisk> {
        vdisk
            .children()
            .filter_map(|(_, key)| self.virtual_disks.get(&key))
    }

    /// Binds the physical disk described by `record` to the top-level virtual
    /// disk `owner`, or to the span of `owner` matching the disk's array
    /// number. Returns the key of the virtual disk the disk was bound to.
    pub fn assign(
        &mut self,
        owner: VirtualDiskKey,
        record: &Record,
    ) -> Result<VirtualDiskKey, RaidTreeError> {
        record.expect_object_type(OBJ_TYPE_PHYSICAL_DISK)?;
        let disk_key = PhysicalDiskKey::from_record(owner.controller, record)?;

        let vdisk = self
            .virtual_disks
            .get(&owner)
            .structured(TopologyError::UnknownVirtualDisk {
                controller: owner.controller,
                logical_drive: owner.logical_drive,
            })?;
        if vdisk.is_child() {
            return Err(RaidTreeError::new(TopologyError::AssignToSpan {
                controller: owner.controller,
                logical_drive: owner.logical_drive,
            }));
        }

        let disk = self
            .physical_disks
            .get_mut(&disk_key)
            .structured(TopologyError::UnknownPhysicalDisk {
                disk: disk_key.to_string(),
            })?;

        let array = record.optional_u32(FIELD_ARRAY_NUM)?.or(disk.array);
        let target = match array {
            Some(array) if vdisk.is_parent() => match vdisk.children.get(&array) {
                Some(span) => *span,
                None => {
                    warn!(
                        "Physical disk {disk_key} declares array {array}, which is not a span \
                        of virtual disk {owner}"
                    );
                    owner
                }
            },
            _ => owner,
        };

        if let Some(first) = disk.vdisk {
            if first != target {
                debug!("Physical disk {disk_key} is shared by {first} and {target}");
            }
        } else {
            disk.vdisk = Some(target);
        }

        if let Some(bound) = self.virtual_disks.get_mut(&target) {
            if !bound.disks.contains(&disk_key) {
                bound.disks.push(disk_key);
            }
        }

        debug!("Assigned physical disk {disk_key} to virtual disk {target}");
        Ok(target)
    }
}
