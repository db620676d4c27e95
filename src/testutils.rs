//! Record fixtures shared by unit tests.

use quick_xml::escape::escape;

use crate::records::Record;

pub(crate) fn controller_record(number: u32, name: &str) -> Record {
    Record::default()
        .with_field("ObjType", "u32", "769")
        .with_field("ControllerNum", "u32", number.to_string())
        .with_field("Name", "astring", name)
        .with_field("ObjState", "u64", "4")
        .with_field("ObjStatus", "u32", "2")
        .with_field("AttributesMask", "u64", "101")
}

/// Online RAID virtual disk of 4 TB whose array number equals its logical
/// drive number.
pub(crate) fn vdisk_record(logical_drive: u32, layout: u64) -> Record {
    let device = char::from(b'a' + (logical_drive % 26) as u8);
    Record::default()
        .with_field("ObjType", "u32", "773")
        .with_field("LogicalDriveNum", "u32", logical_drive.to_string())
        .with_field("Name", "astring", format!("Virtual Disk {logical_drive}"))
        .with_field("DeviceName", "astring", format!("/dev/sd{device}"))
        .with_field("ArrayNum", "u32", logical_drive.to_string())
        .with_field("Layout", "u64", layout.to_string())
        .with_field("Length", "u64", "4000000000000")
        .with_field("ObjState", "u64", "4")
        .with_field("ObjStatus", "u32", "2")
        .with_field("AttributesMask", "u64", "0")
}

/// Span of a spanned virtual disk.
pub(crate) fn span_record(logical_drive: u32, parent: u32, array: u32) -> Record {
    vdisk_record(logical_drive, 64)
        .with_field("ParentLogicalDriveNum", "u32", parent.to_string())
        .with_field("ArrayNum", "u32", array.to_string())
        .with_field("Length", "u64", "2000000000000")
}

/// Online 1.2 TB SAS disk.
pub(crate) fn pdisk_record(channel: u32, enclosure: u32, target: u32) -> Record {
    Record::default()
        .with_field("ObjType", "u32", "772")
        .with_field("Channel", "u32", channel.to_string())
        .with_field("EnclosureID", "u32", enclosure.to_string())
        .with_field("TargetID", "u32", target.to_string())
        .with_field("Vendor", "astring", "SEAGATE")
        .with_field("ProductID", "astring", "ST1200MM0099")
        .with_field("DeviceSerialNumber", "astring", format!("WFK0{target:04}"))
        .with_field("BusProtocol", "u32", "8")
        .with_field("Length", "u64", "1200000000000")
        .with_field("ObjState", "u64", "4")
        .with_field("ObjStatus", "u32", "2")
        .with_field("AttributesMask", "u64", "0")
}

/// Renders records as an inventory document.
pub(crate) fn to_document(records: &[Record]) -> String {
    let mut document = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<OMA cli=\"true\">\n");
    for record in records {
        document.push_str("<DCStorageObject>\n");
        for (name, field) in record.fields() {
            document.push_str(&format!(
                "<{name} type=\"{}\">{}</{name}>\n",
                escape(field.declared.as_str()),
                escape(field.text.as_str())
            ));
        }
        document.push_str("</DCStorageObject>\n");
    }
    document.push_str("<SMStatus type=\"u32\">0</SMStatus>\n</OMA>\n");
    document
}
