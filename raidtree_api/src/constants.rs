// Object type tags

/// Object type tag of a controller record.
pub const OBJ_TYPE_CONTROLLER: u64 = 769;

/// Object type tag of an array (physical) disk record.
pub const OBJ_TYPE_PHYSICAL_DISK: u64 = 772;

/// Object type tag of a virtual disk record.
pub const OBJ_TYPE_VIRTUAL_DISK: u64 = 773;

// Field names shared by every record

pub const FIELD_OBJ_TYPE: &str = "ObjType";
pub const FIELD_OBJ_STATE: &str = "ObjState";
pub const FIELD_OBJ_STATUS: &str = "ObjStatus";
pub const FIELD_ATTRIBUTES_MASK: &str = "AttributesMask";
pub const FIELD_CONTROLLER_NUM: &str = "ControllerNum";
pub const FIELD_NAME: &str = "Name";
pub const FIELD_LENGTH: &str = "Length";
pub const FIELD_PROGRESS: &str = "Progress";
pub const FIELD_ARRAY_NUM: &str = "ArrayNum";

// Virtual disk fields

pub const FIELD_DEVICE_NAME: &str = "DeviceName";
pub const FIELD_LOGICAL_DRIVE_NUM: &str = "LogicalDriveNum";
pub const FIELD_PARENT_LOGICAL_DRIVE_NUM: &str = "ParentLogicalDriveNum";
pub const FIELD_SPAN_NUM: &str = "SpanNum";
pub const FIELD_LAYOUT: &str = "Layout";

// Physical disk fields

pub const FIELD_CHANNEL: &str = "Channel";
pub const FIELD_ENCLOSURE_ID: &str = "EnclosureID";
pub const FIELD_TARGET_ID: &str = "TargetID";
pub const FIELD_DEVICE_ID: &str = "DeviceID";
pub const FIELD_NEXUS: &str = "Nexus";
pub const FIELD_VENDOR: &str = "Vendor";
pub const FIELD_PRODUCT_ID: &str = "ProductID";
pub const FIELD_SERIAL_NUMBER: &str = "DeviceSerialNumber";
pub const FIELD_SAS_ADDRESS: &str = "SASAddress";
pub const FIELD_BUS_PROTOCOL: &str = "BusProtocol";
pub const FIELD_ENCLOSURE_INDEX: &str = "EnclosureIndex";
pub const FIELD_ASSOC_VDISK_COUNT: &str = "AssociatedVDCount";

/// Suffix of numeric fields that hold a base-2 literal instead of a decimal.
pub const MASK_FIELD_SUFFIX: &str = "Mask";

/// Element wrapping each record in an inventory document.
pub const RECORD_ELEMENT: &str = "DCStorageObject";

/// Default inventory command.
pub const OMREPORT_PATH_DEFAULT: &str = "/opt/dell/srvadmin/bin/omreport";
