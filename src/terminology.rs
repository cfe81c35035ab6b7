/// Naming of the device grouping in user facing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminology {
    /// "application", the pre-v13 name.
    Legacy,
    /// "fleet", the current name.
    Fleet,
}

pub const LEGACY_WARNING: &str = "[FLEETCTL][WARN] The \"application\" terminology is deprecated; rerun with --v13 (or set FLEETCTL_V13=1) to see \"fleet\" output.";

impl Terminology {
    /// Legacy wording survives only when neither the flag nor the environment opt in to v13.
    pub fn resolve(v13_flag: bool, environment_is_v13: bool) -> Self {
        if v13_flag || environment_is_v13 {
            Terminology::Fleet
        } else {
            Terminology::Legacy
        }
    }

    /// Field spec for the owning application row.
    pub fn application_field(self) -> &'static str {
        match self {
            Terminology::Legacy => "application_name",
            Terminology::Fleet => "application_name => FLEET",
        }
    }

    pub fn is_legacy(self) -> bool {
        self == Terminology::Legacy
    }
}
