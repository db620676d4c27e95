//! Hierarchical, column-aligned rendering of a [`Topology`].

use crate::topology::{Controller, PhysicalDisk, PhysicalDiskKey, Topology, VirtualDisk};

mod columns;

pub use columns::Columns;

/// Spaces per indentation level.
pub const INDENT: usize = 4;

/// Separator between columns.
const GAP: &str = "  ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Only report this controller.
    pub controller: Option<u32>,
    /// Show the bus protocol of every physical disk.
    pub show_protocol: bool,
    /// Show the product ID of every physical disk.
    pub show_model: bool,
}

impl ReportOptions {
    pub fn includes(&self, controller: &Controller) -> bool {
        self.controller
            .map_or(true, |number| number == controller.number)
    }
}

/// Renders the full report: every controller with its virtual disks, their
/// spans and member disks, spares and unused disks.
pub fn render(topology: &Topology, options: &ReportOptions) -> String {
    Renderer {
        topology,
        options,
        columns: Columns::compute(topology, options),
        out: String::new(),
    }
    .render()
}

/// Renders one line per physical disk with the binary expansion of its
/// attribute mask.
pub fn render_attribute_masks(topology: &Topology) -> String {
    let rows = topology
        .physical_disks()
        .map(|disk| (disk.key.to_string(), format!("{:b}", disk.attributes.bits())))
        .collect::<Vec<_>>();

    let id_width = rows.iter().map(|(id, _)| id.len()).max().unwrap_or_default();
    let mask_width = rows
        .iter()
        .map(|(_, mask)| mask.len())
        .max()
        .unwrap_or_default();

    rows.into_iter()
        .map(|(id, mask)| format!("{id:<id_width$}{GAP}{mask:0>mask_width$}\n"))
        .collect()
}

struct Renderer<'a> {
    topology: &'a Topology,
    options: &'a ReportOptions,
    columns: Columns,
    out: String,
}

impl<'a> Renderer<'a> {
    fn render(mut self) -> String {
        let topology = self.topology;
        for controller in topology.controllers() {
            if self.options.includes(controller) {
                self.controller(controller);
            }
        }
        self.out
    }

    fn controller(&mut self, controller: &Controller) {
        let topology = self.topology;
        self.line(
            0,
            &format!(
                "Controller {}: {} ({}, {})",
                controller.number, controller.name, controller.state, controller.status
            ),
        );

        for vdisk in topology
            .virtual_disks_of(controller)
            .filter(|vdisk| !vdisk.is_child())
        {
            self.virtual_disk(vdisk);
        }

        let disks = topology.physical_disks_of(controller).collect::<Vec<_>>();
        let global_spares = disks
            .iter()
            .copied()
            .filter(|disk| disk.is_global_hot_spare())
            .collect::<Vec<_>>();
        let unused = disks
            .iter()
            .copied()
            .filter(|disk| disk.vdisk().is_none() && !disk.is_global_hot_spare())
            .collect::<Vec<_>>();

        self.group(1, "Global Spares", &global_spares);
        self.group(1, "Unused", &unused);
    }

    fn virtual_disk(&mut self, vdisk: &VirtualDisk) {
        let topology = self.topology;
        self.line(
            1,
            &format!("{} ({}) {}", vdisk.name, vdisk.key, vdisk.device_name),
        );

        let progress = vdisk.progress.map(|p| format!("{p}%"));
        self.row(
            2,
            &vdisk.layout.name(),
            &vdisk.state.name(),
            &vdisk.status.name(),
            &vdisk.capacity.to_human_readable(),
            progress.into_iter().collect(),
        );

        let mut spares = self.dedicated_spares(vdisk);
        if vdisk.is_parent() {
            for span in topology.children_of(vdisk) {
                spares.extend(self.dedicated_spares(span));
                let members = self.members(span);
                self.group(3, &format!("Span {}", span.array), &members);
            }
            // Disks whose array number matched no span
            let members = self.members(vdisk);
            self.disks(3, &members);
        } else {
            let members = self.members(vdisk);
            self.disks(3, &members);
        }

        spares.sort_by_key(|disk| disk.key);
        spares.dedup_by_key(|disk| disk.key);
        self.group(2, "Spares", &spares);
    }

    /// Disks bound to `vdisk` that are not dedicated spares, sorted by key.
    fn members(&self, vdisk: &VirtualDisk) -> Vec<&'a PhysicalDisk> {
        self.bound(vdisk, false)
    }

    fn dedicated_spares(&self, vdisk: &VirtualDisk) -> Vec<&'a PhysicalDisk> {
        self.bound(vdisk, true)
    }

    fn bound(&self, vdisk: &VirtualDisk, dedicated: bool) -> Vec<&'a PhysicalDisk> {
        let mut keys = vdisk.disks().to_vec();
        keys.sort();
        keys.into_iter()
            .filter_map(|key: PhysicalDiskKey| self.topology.physical_disk(key))
            .filter(|disk| disk.is_dedicated_hot_spare() == dedicated)
            .collect()
    }

    /// Label at `level` followed by the disks one level deeper. Nothing is
    /// printed for an empty group.
    fn group(&mut self, level: usize, label: &str, disks: &[&PhysicalDisk]) {
        if disks.is_empty() {
            return;
        }
        self.line(level, label);
        self.disks(level + 1, disks);
    }

    fn disks(&mut self, level: usize, disks: &[&PhysicalDisk]) {
        for disk in disks {
            self.disk(level, disk);
        }
    }

    fn disk(&mut self, level: usize, disk: &PhysicalDisk) {
        let mut extras = Vec::new();
        if self.options.show_protocol {
            extras.push(format!(
                "{:<width$}",
                disk.bus_protocol.name(),
                width = self.columns.protocol
            ));
        }
        if self.options.show_model {
            extras.push(format!(
                "{:<width$}",
                disk.product_id,
                width = self.columns.model
            ));
        }
        if let Some(progress) = disk.progress {
            extras.push(format!("{progress}%"));
        }
        if disk.is_failure_predicted() {
            extras.push("failure predicted".into());
        }

        self.row(
            level,
            &disk.key.display_id(),
            &disk.state.name(),
            &disk.status.name(),
            &disk.capacity.to_human_readable(),
            extras,
        );
    }

    fn row(
        &mut self,
        level: usize,
        id: &str,
        state: &str,
        status: &str,
        size: &str,
        extras: Vec<String>,
    ) {
        let columns = self.columns;
        let mut text = format!(
            "{id:<id_width$}{GAP}{state:<state_width$}{GAP}{status:<status_width$}{GAP}{size:>size_width$}",
            id_width = columns.id_width(level),
            state_width = columns.state,
            status_width = columns.status,
            size_width = columns.size,
        );
        for extra in extras {
            text.push_str(GAP);
            text.push_str(&extra);
        }
        self.line(level, &text);
    }

    fn line(&mut self, level: usize, text: &str) {
        self.out.push_str(&" ".repeat(level * INDENT));
        self.out.push_str(text.trim_end());
        self.out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::{
        testutils::{controller_record, pdisk_record, span_record, vdisk_record},
        topology::{TopologyBuilder, VirtualDiskKey},
    };

    const DEDICATED_SPARE: &str = "100000000";
    const GLOBAL_SPARE: &str = "10000000";
    const FAILURE_PREDICTED: &str = "100000";

    fn spare(target: u32, mask: &str) -> crate::records::Record {
        pdisk_record(0, 1, target)
            .with_field("ObjState", "u64", "1")
            .with_field("AttributesMask", "u64", mask)
    }

    fn key(logical_drive: u32) -> VirtualDiskKey {
        VirtualDiskKey {
            controller: 0,
            logical_drive,
        }
    }

    /// One RAID-5 with three members and a dedicated spare, plus a global
    /// spare that belongs to no virtual disk.
    fn perc_h730p() -> Topology {
        let mut builder = TopologyBuilder::new();
        builder
            .add_controller(&controller_record(0, "PERC H730P"))
            .unwrap();
        builder.add_virtual_disk(0, &vdisk_record(0, 64)).unwrap();
        for target in 0..3 {
            builder
                .add_physical_disk(0, &pdisk_record(0, 1, target))
                .unwrap();
        }
        builder
            .add_physical_disk(0, &spare(3, DEDICATED_SPARE))
            .unwrap();
        builder.add_physical_disk(0, &spare(4, GLOBAL_SPARE)).unwrap();

        let mut topology = builder.link().unwrap();
        for target in 0..3 {
            topology
                .assign(key(0), &pdisk_record(0, 1, target).with_field("ArrayNum", "u32", "0"))
                .unwrap();
        }
        topology.assign(key(0), &spare(3, DEDICATED_SPARE)).unwrap();
        topology
    }

    #[test]
    fn test_render_single_raid5() {
        let report = render(&perc_h730p(), &ReportOptions::default());
        assert_eq!(
            report,
            indoc! {"
                Controller 0: PERC H730P (Online, Ok)
                    Virtual Disk 0 (0:0) /dev/sda
                        RAID-5      Online  Ok  3.64 TiB
                            0:1:0   Online  Ok  1.09 TiB
                            0:1:1   Online  Ok  1.09 TiB
                            0:1:2   Online  Ok  1.09 TiB
                        Spares
                            0:1:3   Ready   Ok  1.09 TiB
                    Global Spares
                        0:1:4       Ready   Ok  1.09 TiB
            "}
        );
        assert!(!report.contains("Unused"));
    }

    #[test]
    fn test_render_extras() {
        let mut builder = TopologyBuilder::new();
        builder.add_controller(&controller_record(0, "PERC H330")).unwrap();
        builder
            .add_physical_disk(
                0,
                &pdisk_record(0, 1, 0)
                    .with_field("Progress", "u32", "35")
                    .with_field("AttributesMask", "u64", FAILURE_PREDICTED),
            )
            .unwrap();
        builder
            .add_physical_disk(
                0,
                &pdisk_record(0, 1, 1)
                    .with_field("BusProtocol", "u32", "7")
                    .with_field("ProductID", "astring", "MZ7KM480"),
            )
            .unwrap();
        let topology = builder.link().unwrap();

        let report = render(
            &topology,
            &ReportOptions {
                show_protocol: true,
                show_model: true,
                ..Default::default()
            },
        );
        assert_eq!(
            report,
            indoc! {"
                Controller 0: PERC H330 (Online, Ok)
                    Unused
                        0:1:0      Online  Ok  1.09 TiB  SAS   ST1200MM0099  35%  failure predicted
                        0:1:1      Online  Ok  1.09 TiB  SATA  MZ7KM480
            "}
        );
    }

    #[test]
    fn test_render_spans_in_array_order() {
        let mut builder = TopologyBuilder::new();
        builder.add_controller(&controller_record(0, "PERC H740P")).unwrap();
        // Spans are added in descending array order
        builder.add_virtual_disk(0, &span_record(2, 0, 1)).unwrap();
        builder.add_virtual_disk(0, &span_record(1, 0, 0)).unwrap();
        builder
            .add_virtual_disk(0, &vdisk_record(0, 512).with_field("Progress", "u32", "7"))
            .unwrap();
        for target in 0..5 {
            builder
                .add_physical_disk(0, &pdisk_record(0, 1, target))
                .unwrap();
        }
        builder
            .add_physical_disk(0, &spare(5, DEDICATED_SPARE))
            .unwrap();
        let mut topology = builder.link().unwrap();

        for (target, array) in [(3, "1"), (0, "0"), (2, "1"), (1, "0")] {
            topology
                .assign(key(0), &pdisk_record(0, 1, target).with_field("ArrayNum", "u32", array))
                .unwrap();
        }
        topology
            .assign(key(0), &spare(5, DEDICATED_SPARE).with_field("ArrayNum", "u32", "1"))
            .unwrap();

        let report = render(&topology, &ReportOptions::default());
        assert_eq!(
            report,
            indoc! {"
                Controller 0: PERC H740P (Online, Ok)
                    Virtual Disk 0 (0:0) /dev/sda
                        RAID-10          Online  Ok  3.64 TiB  7%
                            Span 0
                                0:1:0    Online  Ok  1.09 TiB
                                0:1:1    Online  Ok  1.09 TiB
                            Span 1
                                0:1:2    Online  Ok  1.09 TiB
                                0:1:3    Online  Ok  1.09 TiB
                        Spares
                            0:1:5        Ready   Ok  1.09 TiB
                    Unused
                        0:1:4            Online  Ok  1.09 TiB
            "}
        );
    }

    #[test]
    fn test_render_filters_controllers() {
        let mut builder = TopologyBuilder::new();
        builder.add_controller(&controller_record(0, "PERC H730P")).unwrap();
        builder.add_controller(&controller_record(1, "BOSS-S1")).unwrap();
        let topology = builder.link().unwrap();

        assert_eq!(
            render(&topology, &ReportOptions::default()),
            "Controller 0: PERC H730P (Online, Ok)\nController 1: BOSS-S1 (Online, Ok)\n"
        );
        assert_eq!(
            render(
                &topology,
                &ReportOptions {
                    controller: Some(1),
                    ..Default::default()
                }
            ),
            "Controller 1: BOSS-S1 (Online, Ok)\n"
        );
    }

    #[test]
    fn test_render_attribute_masks() {
        let topology = perc_h730p();
        assert_eq!(
            render_attribute_masks(&topology),
            indoc! {"
                0:0:1:0  000000000
                0:0:1:1  000000000
                0:0:1:2  000000000
                0:0:1:3  100000000
                0:0:1:4  010000000
            "}
        );

        let empty = TopologyBuilder::new().link().unwrap();
        assert_eq!(render_attribute_masks(&empty), "");
        assert_eq!(render(&empty, &ReportOptions::default()), "");
    }
}
