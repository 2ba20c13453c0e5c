//! Fragment and slot catalog, plus the fixed rules (costs and metric deltas)
//! of every action.

use std::fmt;
use std::str::FromStr;

use super::Rejection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mass {
    Light,
    Medium,
    Heavy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Climate {
    Humid,
    Arid,
    Cold,
    Temperate,
}

impl Climate {
    pub fn as_str(self) -> &'static str {
        match self {
            Climate::Humid => "humid",
            Climate::Arid => "arid",
            Climate::Cold => "cold",
            Climate::Temperate => "temperate",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tectonic {
    Stable,
    Volatile,
}

impl Tectonic {
    pub fn as_str(self) -> &'static str {
        match self {
            Tectonic::Stable => "stable",
            Tectonic::Volatile => "volatile",
        }
    }
}

/// A piece of a lost world waiting to be placed.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Fragment {
    pub id: &'static str,
    pub biome: &'static str,
    pub mass: Mass,
    pub civilization: &'static str,
    pub tags: &'static [&'static str],
}

impl Fragment {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

/// A hole in the world that one fragment can fill.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Slot {
    pub id: &'static str,
    pub expects: &'static [&'static str],
    pub climate: Climate,
    pub tectonic: Tectonic,
}

pub const FRAGMENTS: &[Fragment] = &[
    Fragment {
        id: "F-07",
        biome: "Mangrove delta",
        mass: Mass::Medium,
        civilization: "Tidewardens",
        tags: &["forest", "coastal"],
    },
    Fragment {
        id: "F-13",
        biome: "Salt flats",
        mass: Mass::Light,
        civilization: "Glass nomads",
        tags: &["arid", "mineral"],
    },
    Fragment {
        id: "F-22",
        biome: "Aurora shelf",
        mass: Mass::Heavy,
        civilization: "Lumen keepers",
        tags: &["polar", "energy"],
    },
    Fragment {
        id: "F-31",
        biome: "Glacier vale",
        mass: Mass::Medium,
        civilization: "Frost choir",
        tags: &["polar", "ice", "energy"],
    },
    Fragment {
        id: "F-40",
        biome: "Reactor steppe",
        mass: Mass::Light,
        civilization: "Coil guild",
        tags: &["energy", "urban"],
    },
    Fragment {
        id: "F-58",
        biome: "Cloud orchard",
        mass: Mass::Light,
        civilization: "Canopy weavers",
        tags: &["forest", "highland"],
    },
];

pub const SLOTS: &[Slot] = &[
    Slot {
        id: "S1",
        expects: &["forest", "coastal"],
        climate: Climate::Humid,
        tectonic: Tectonic::Stable,
    },
    Slot {
        id: "S2",
        expects: &["arid"],
        climate: Climate::Arid,
        tectonic: Tectonic::Volatile,
    },
    Slot {
        id: "S3",
        expects: &["polar", "energy"],
        climate: Climate::Cold,
        tectonic: Tectonic::Volatile,
    },
    Slot {
        id: "S4",
        expects: &["energy"],
        climate: Climate::Temperate,
        tectonic: Tectonic::Stable,
    },
    Slot {
        id: "S5",
        expects: &["forest"],
        climate: Climate::Temperate,
        tectonic: Tectonic::Volatile,
    },
];

/// Amounts added by an action. Hope is tracked here too even though it is not
/// one of the four world metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deltas {
    pub gravity: u32,
    pub climate: u32,
    pub biosphere: u32,
    pub population: u32,
    pub hope: u32,
}

pub const SEAL_COST: u32 = 8;
pub const POLICY_COST: u32 = 5;

pub const SEAL_DELTAS: Deltas = Deltas {
    gravity: 4,
    climate: 5,
    biosphere: 6,
    population: 3,
    hope: 5,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Policy {
    Supply,
    Microclimate,
    Species,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Supply, Policy::Microclimate, Policy::Species];

    pub fn id(self) -> &'static str {
        match self {
            Policy::Supply => "supply",
            Policy::Microclimate => "microclimate",
            Policy::Species => "species",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Policy::Supply => "Supply drop",
            Policy::Microclimate => "Microclimate shield",
            Policy::Species => "Species revival",
        }
    }

    pub fn deltas(self) -> Deltas {
        match self {
            Policy::Supply => Deltas {
                population: 6,
                ..Deltas::default()
            },
            Policy::Microclimate => Deltas {
                climate: 7,
                biosphere: 4,
                ..Deltas::default()
            },
            Policy::Species => Deltas {
                biosphere: 8,
                hope: 6,
                ..Deltas::default()
            },
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Policy {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| Rejection::UnknownPolicy(s.to_string()))
    }
}
