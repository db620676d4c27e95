use crate::topology::{PhysicalDisk, Topology, VirtualDisk};

use super::{ReportOptions, INDENT};

/// Deepest level a row can sit at when no virtual disk has spans.
const MAX_LEVEL_PLAIN: usize = 3;

/// Deepest level a row can sit at when spans are rendered.
const MAX_LEVEL_SPANNED: usize = 4;

/// Column widths shared by every row of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Columns {
    pub id: usize,
    pub state: usize,
    pub status: usize,
    pub size: usize,
    pub protocol: usize,
    pub model: usize,
    pub max_level: usize,
}

impl Columns {
    /// Measures every physical disk and every non-span virtual disk of the
    /// topology.
    pub fn compute(topology: &Topology, options: &ReportOptions) -> Self {
        let mut columns = Columns {
            max_level: MAX_LEVEL_PLAIN,
            ..Default::default()
        };

        for vdisk in topology.top_level_virtual_disks() {
            columns.fit_virtual_disk(vdisk);
        }
        for disk in topology.physical_disks() {
            columns.fit_physical_disk(disk, options);
        }

        columns
    }

    fn fit_virtual_disk(&mut self, vdisk: &VirtualDisk) {
        self.id = self.id.max(vdisk.layout.name().len());
        self.state = self.state.max(vdisk.state.name().len());
        self.status = self.status.max(vdisk.status.name().len());
        self.size = self.size.max(vdisk.capacity.to_human_readable().len());
        if vdisk.is_parent() {
            self.max_level = MAX_LEVEL_SPANNED;
        }
    }

    fn fit_physical_disk(&mut self, disk: &PhysicalDisk, options: &ReportOptions) {
        self.id = self.id.max(disk.key.display_id().len());
        self.state = self.state.max(disk.state.name().len());
        self.status = self.status.max(disk.status.name().len());
        self.size = self.size.max(disk.capacity.to_human_readable().len());
        if options.show_protocol {
            self.protocol = self.protocol.max(disk.bus_protocol.name().len());
        }
        if options.show_model {
            self.model = self.model.max(disk.product_id.len());
        }
    }

    /// Width of the identifier cell of a row at `level`, so that the columns
    /// after it line up across levels.
    pub fn id_width(&self, level: usize) -> usize {
        self.id + INDENT * self.max_level.saturating_sub(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        testutils::{controller_record, pdisk_record, span_record, vdisk_record},
        topology::TopologyBuilder,
    };

    #[test]
    fn test_widths_are_global() {
        let mut builder = TopologyBuilder::new();
        builder.add_controller(&controller_record(0, "PERC")).unwrap();
        builder.add_controller(&controller_record(1, "PERC")).unwrap();
        builder.add_virtual_disk(0, &vdisk_record(0, 64)).unwrap();
        builder.add_physical_disk(0, &pdisk_record(0, 1, 0)).unwrap();
        builder
            .add_physical_disk(
                1,
                &pdisk_record(0, 32, 12)
                    .with_field("ObjState", "u64", "34359738368")
                    .with_field("ProductID", "astring", "MZ7KM480HMHQ0D3"),
            )
            .unwrap();
        let topology = builder.link().unwrap();

        let columns = Columns::compute(&topology, &ReportOptions::default());
        assert_eq!(
            columns,
            Columns {
                id: "0:32:12".len(),
                state: "Background Initialization".len(),
                status: "Ok".len(),
                size: "3.64 TiB".len(),
                protocol: 0,
                model: 0,
                max_level: 3,
            }
        );
        assert_eq!(columns.id_width(3), 7);
        assert_eq!(columns.id_width(1), 15);

        let columns = Columns::compute(
            &topology,
            &ReportOptions {
                show_protocol: true,
                show_model: true,
                ..Default::default()
            },
        );
        assert_eq!(columns.protocol, 3);
        assert_eq!(columns.model, "MZ7KM480HMHQ0D3".len());
    }

    #[test]
    fn test_layout_names_and_spans_widen() {
        let mut builder = TopologyBuilder::new();
        builder.add_controller(&controller_record(0, "PERC")).unwrap();
        builder
            .add_virtual_disk(0, &vdisk_record(0, 1 << 40))
            .unwrap();
        builder.add_virtual_disk(0, &vdisk_record(1, 8192)).unwrap();
        builder.add_virtual_disk(0, &span_record(2, 1, 0)).unwrap();
        builder.add_physical_disk(0, &pdisk_record(0, 1, 0)).unwrap();
        let topology = builder.link().unwrap();

        let columns = Columns::compute(&topology, &ReportOptions::default());
        assert_eq!(columns.id, "Unknown (1099511627776)".len());
        assert_eq!(columns.max_level, 4);
        assert_eq!(columns.id_width(4), columns.id);
    }
}
