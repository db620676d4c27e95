bitflags::bitflags! {
    /// Flags decoded from a physical disk's attribute mask. The flags are
    /// independent bit tests; a disk may carry any combination of them.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DiskAttributes: u64 {
        const FailurePredicted = 1 << 5;
        const GlobalHotSpare = 1 << 7;
        const DedicatedHotSpare = 1 << 8;
        const LogicalConnector = 1 << 21;
        const NonRaid = 1 << 25;
    }
}

impl DiskAttributes {
    /// Builds the flag set from a raw attribute mask, keeping undocumented
    /// bits so that they survive for the attribute-mask dump.
    pub fn from_mask(mask: u64) -> Self {
        DiskAttributes::from_bits_retain(mask)
    }

    pub fn is_global_hot_spare(&self) -> bool {
        self.contains(DiskAttributes::GlobalHotSpare)
    }

    pub fn is_dedicated_hot_spare(&self) -> bool {
        self.contains(DiskAttributes::DedicatedHotSpare)
    }

    pub fn is_failure_predicted(&self) -> bool {
        self.contains(DiskAttributes::FailurePredicted)
    }

    pub fn is_non_raid(&self) -> bool {
        self.contains(DiskAttributes::NonRaid)
    }

    pub fn is_logical_connector(&self) -> bool {
        self.contains(DiskAttributes::LogicalConnector)
    }
}
