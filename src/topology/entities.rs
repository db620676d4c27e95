use std::{collections::BTreeMap, fmt::Display};

use raidtree_api::{
    attributes::DiskAttributes,
    constants::*,
    enums::{BusProtocol, Layout, State, Status},
    error::RaidTreeError,
    primitives::bytes::ByteCount,
};

use crate::records::Record;

/// A RAID controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    pub number: u32,
    pub name: String,
    pub state: State,
    pub status: Status,
    pub attributes: u64,

    /// Virtual disks in discovery order.
    pub(super) virtual_disks: Vec<VirtualDiskKey>,

    /// Physical disks in discovery order.
    pub(super) physical_disks: Vec<PhysicalDiskKey>,
}

impl Controller {
    pub fn from_record(record: &Record) -> Result<Self, RaidTreeError> {
        record.expect_object_type(OBJ_TYPE_CONTROLLER)?;

        Ok(Controller {
            number: record.require_u32(FIELD_CONTROLLER_NUM)?,
            name: record.text_or_default(FIELD_NAME)?,
            state: State::from_code(record.require_u64(FIELD_OBJ_STATE)?),
            status: Status::from_code(record.require_u64(FIELD_OBJ_STATUS)?),
            attributes: record
                .optional_u64(FIELD_ATTRIBUTES_MASK)?
                .unwrap_or_default(),
            virtual_disks: Vec::new(),
            physical_disks: Vec::new(),
        })
    }

    pub fn virtual_disks(&self) -> &[VirtualDiskKey] {
        &self.virtual_disks
    }

    pub fn physical_disks(&self) -> &[PhysicalDiskKey] {
        &self.physical_disks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualDiskKey {
    pub controller: u32,
    pub logical_drive: u32,
}

impl Display for VirtualDiskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.controller, self.logical_drive)
    }
}

/// A virtual disk (array) exposed by a controller. Spanned arrays are a
/// parent virtual disk whose spans are child virtual disks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDisk {
    pub key: VirtualDiskKey,
    pub name: String,
    pub device_name: String,
    pub array: u32,
    pub parent_logical_drive: Option<u32>,
    pub span: u32,
    pub capacity: ByteCount,
    pub layout: Layout,
    pub state: State,
    pub status: Status,
    pub attributes: u64,
    pub progress: Option<u64>,

    pub(super) parent: Option<VirtualDiskKey>,

    /// Spans, keyed by array number.
    pub(super) children: BTreeMap<u32, VirtualDiskKey>,

    pub(super) disks: Vec<PhysicalDiskKey>,
}

impl VirtualDisk {
    pub fn from_record(controller: u32, record: &Record) -> Result<Self, RaidTreeError> {
        record.expect_object_type(OBJ_TYPE_VIRTUAL_DISK)?;

        Ok(VirtualDisk {
            key: VirtualDiskKey {
                controller,
                logical_drive: record.require_u32(FIELD_LOGICAL_DRIVE_NUM)?,
            },
            name: record.text_or_default(FIELD_NAME)?,
            device_name: record.text_or_default(FIELD_DEVICE_NAME)?,
            array: record.optional_u32(FIELD_ARRAY_NUM)?.unwrap_or_default(),
            parent_logical_drive: record.optional_u32(FIELD_PARENT_LOGICAL_DRIVE_NUM)?,
            span: record.optional_u32(FIELD_SPAN_NUM)?.unwrap_or_default(),
            capacity: record.require_u64(FIELD_LENGTH)?.into(),
            layout: Layout::from_code(record.require_u64(FIELD_LAYOUT)?),
            state: State::from_code(record.require_u64(FIELD_OBJ_STATE)?),
            status: Status::from_code(record.require_u64(FIELD_OBJ_STATUS)?),
            attributes: record
                .optional_u64(FIELD_ATTRIBUTES_MASK)?
                .unwrap_or_default(),
            progress: record.optional_u64(FIELD_PROGRESS)?,
            parent: None,
            children: BTreeMap::new(),
            disks: Vec::new(),
        })
    }

    /// Whether this virtual disk is a span of another one.
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Whether this virtual disk is made of spans.
    pub fn is_parent(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn parent(&self) -> Option<VirtualDiskKey> {
        self.parent
    }

    /// Spans in ascending array-number order.
    pub fn children(&self) -> impl Iterator<Item = (u32, VirtualDiskKey)> + '_ {
        self.children.iter().map(|(array, key)| (*array, *key))
    }

    /// Physical disks bound to this virtual disk, in assignment order.
    pub fn disks(&self) -> &[PhysicalDiskKey] {
        &self.disks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicalDiskKey {
    pub controller: u32,
    pub channel: u32,
    /// Absent for disks that are not behind an enclosure.
    pub enclosure: Option<u32>,
    pub target: u32,
}

impl PhysicalDiskKey {
    pub fn from_record(controller: u32, record: &Record) -> Result<Self, RaidTreeError> {
        Ok(PhysicalDiskKey {
            controller,
            channel: record.require_u32(FIELD_CHANNEL)?,
            enclosure: record.optional_u32(FIELD_ENCLOSURE_ID)?,
            target: record.require_u32(FIELD_TARGET_ID)?,
        })
    }

    /// Identifier shown in the report, unique within a controller.
    pub fn display_id(&self) -> String {
        match self.enclosure {
            Some(enclosure) => format!("{}:{}:{}", self.channel, enclosure, self.target),
            None => format!("{}:{}", self.channel, self.target),
        }
    }
}

impl Display for PhysicalDiskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.controller, self.display_id())
    }
}

/// A physical (array) disk attached to a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalDisk {
    pub key: PhysicalDiskKey,
    /// Array the disk belongs to, if any.
    pub array: Option<u32>,
    pub device_id: Option<u32>,
    pub nexus: String,
    pub attributes: DiskAttributes,
    pub vendor: String,
    pub product_id: String,
    pub serial_number: String,
    pub sas_address: String,
    pub bus_protocol: BusProtocol,
    pub enclosure_index: Option<u32>,
    pub associated_virtual_disks: u32,
    pub progress: Option<u64>,
    pub capacity: ByteCount,
    pub state: State,
    pub status: Status,

    pub(super) vdisk: Option<VirtualDiskKey>,
}

impl PhysicalDisk {
    pub fn from_record(controller: u32, record: &Record) -> Result<Self, RaidTreeError> {
        record.expect_object_type(OBJ_TYPE_PHYSICAL_DISK)?;

        Ok(PhysicalDisk {
            key: PhysicalDiskKey::from_record(controller, record)?,
            array: record.optional_u32(FIELD_ARRAY_NUM)?,
            device_id: record.optional_u32(FIELD_DEVICE_ID)?,
            nexus: record.text_or_default(FIELD_NEXUS)?,
            attributes: DiskAttributes::from_mask(
                record
                    .optional_u64(FIELD_ATTRIBUTES_MASK)?
                    .unwrap_or_default(),
            ),
            vendor: record.text_or_default(FIELD_VENDOR)?,
            product_id: record.text_or_default(FIELD_PRODUCT_ID)?,
            serial_number: record.text_or_default(FIELD_SERIAL_NUMBER)?,
            sas_address: record.text_or_default(FIELD_SAS_ADDRESS)?,
            bus_protocol: BusProtocol::from_code(record.require_u64(FIELD_BUS_PROTOCOL)?),
            enclosure_index: record.optional_u32(FIELD_ENCLOSURE_INDEX)?,
            associated_virtual_disks: record
                .optional_u32(FIELD_ASSOC_VDISK_COUNT)?
                .unwrap_or_default(),
            progress: record.optional_u64(FIELD_PROGRESS)?,
            capacity: record.require_u64(FIELD_LENGTH)?.into(),
            state: State::from_code(record.require_u64(FIELD_OBJ_STATE)?),
            status: Status::from_code(record.require_u64(FIELD_OBJ_STATUS)?),
            vdisk: None,
        })
    }

    /// Virtual disk or span the disk was assigned to.
    pub fn vdisk(&self) -> Option<VirtualDiskKey> {
        self.vdisk
    }

    pub fn is_global_hot_spare(&self) -> bool {
        self.attributes.is_global_hot_spare()
    }

    pub fn is_dedicated_hot_spare(&self) -> bool {
        self.attributes.is_dedicated_hot_spare()
    }

    pub fn is_failure_predicted(&self) -> bool {
        self.attributes.is_failure_predicted()
    }
}
