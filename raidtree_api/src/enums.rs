use std::{borrow::Cow, fmt::Display};

/// Macro to define a closed code enumeration with a catch-all `Unknown`
/// variant, a total `from_code()`, `code()` and a display `name()`.
macro_rules! code_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal => $display:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A code that has not been catalogued yet.
            Unknown(u64),
        }

        impl $name {
            pub fn from_code(code: u64) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }

            pub fn code(&self) -> u64 {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unknown(code) => *code,
                }
            }

            pub fn name(&self) -> Cow<'static, str> {
                match self {
                    $($name::$variant => Cow::Borrowed($display),)+
                    $name::Unknown(code) => Cow::Owned(format!("Unknown ({code})")),
                }
            }
        }

        impl From<u64> for $name {
            fn from(code: u64) -> Self {
                $name::from_code(code)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.name())
            }
        }
    };
}

code_enum! {
    /// RAID layout of a virtual disk.
    Layout {
        Raid0 = 2 => "RAID-0",
        Raid1 = 4 => "RAID-1",
        Raid5 = 64 => "RAID-5",
        Raid6 = 128 => "RAID-6",
        Raid10 = 512 => "RAID-10",
        Raid50 = 8192 => "RAID-50",
        Raid60 = 262144 => "RAID-60",
    }
}

code_enum! {
    /// Operational state of a controller, virtual disk or physical disk.
    State {
        Ready = 1 => "Ready",
        Failed = 2 => "Failed",
        Online = 4 => "Online",
        Offline = 8 => "Offline",
        Degraded = 32 => "Degraded",
        NonRaid = 4096 => "Non-RAID",
        Replacing = 2097152 => "Replacing",
        Rebuilding = 8388608 => "Rebuilding",
        BackgroundInitialization = 34359738368 => "Background Initialization",
        Foreign = 274877906944 => "Foreign",
        Clear = 549755813888 => "Clear",
        DegradedRedundancy = 9007199254740992 => "Degraded Redundancy",
    }
}

code_enum! {
    /// Health rollup of a controller, virtual disk or physical disk.
    Status {
        Ok = 2 => "Ok",
        NonCritical = 3 => "Non-Critical",
        Critical = 4 => "Critical",
    }
}

code_enum! {
    /// Bus protocol a physical disk is attached with.
    BusProtocol {
        Scsi = 1 => "SCSI",
        Ide = 2 => "IDE",
        Sata = 7 => "SATA",
        Sas = 8 => "SAS",
        Pcie = 9 => "PCIe",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Layout::from_code(64), Layout::Raid5);
        assert_eq!(Layout::Raid5.name(), "RAID-5");
        assert_eq!(Layout::from_code(262144).to_string(), "RAID-60");

        assert_eq!(State::from_code(4), State::Online);
        assert_eq!(
            State::from_code(34359738368).name(),
            "Background Initialization"
        );
        assert_eq!(State::from_code(9007199254740992), State::DegradedRedundancy);

        assert_eq!(Status::from_code(3).name(), "Non-Critical");
        assert_eq!(BusProtocol::from_code(9).name(), "PCIe");
    }

    #[test]
    fn test_unknown_codes() {
        for code in [0, 3, 16, 65, 1 << 40, u64::MAX] {
            let layout = Layout::from_code(code);
            assert_eq!(layout, Layout::Unknown(code));
            assert_eq!(layout.code(), code);
            assert!(layout.name().contains(&code.to_string()));
        }

        assert_eq!(State::from_code(16).to_string(), "Unknown (16)");
        assert_eq!(Status::from_code(1).to_string(), "Unknown (1)");
        assert_eq!(BusProtocol::from_code(3).to_string(), "Unknown (3)");
    }

    #[test]
    fn test_code_round_trip_for_catalogued_states() {
        for state in [
            State::Ready,
            State::Failed,
            State::Online,
            State::Offline,
            State::Degraded,
            State::NonRaid,
            State::Replacing,
            State::Rebuilding,
            State::BackgroundInitialization,
            State::Foreign,
            State::Clear,
            State::DegradedRedundancy,
        ] {
            assert_eq!(State::from(state.code()), state);
            assert!(!state.name().is_empty());
        }
    }
}
