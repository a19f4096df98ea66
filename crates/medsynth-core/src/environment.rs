use serde::Serialize;

/// Storage prefix and record volume of one logical environment.
///
/// Each preset is generated as an independent batch; no records are shared
/// between presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvironmentPreset {
    pub name: &'static str,
    pub prefix: &'static str,
    /// Patients per batch. Encounters and claims use the same count.
    pub records: usize,
}

impl EnvironmentPreset {
    pub const DEV: EnvironmentPreset = EnvironmentPreset {
        name: "dev",
        prefix: "dev/",
        records: 5_000,
    };

    pub const PROD: EnvironmentPreset = EnvironmentPreset {
        name: "prod",
        prefix: "prod/",
        records: 20_000,
    };

    /// Presets in publication order.
    pub const ALL: [EnvironmentPreset; 2] = [Self::DEV, Self::PROD];
}
