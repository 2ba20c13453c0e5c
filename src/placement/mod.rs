//! World fragment placement puzzle.
//!
//! The player selects a fragment from the catalog and seals it into a slot.
//! Sealing is one-way: the slot is closed for good and the fragment is
//! deployed. Every successful action spends reconstruction energy, which never
//! regenerates, and pushes the world metrics up. Policies are a second kind of
//! action that trade energy for targeted metric boosts.

use thiserror::Error;

use crate::config::{MAX_ENERGY, PlacementConfig};

pub mod catalog;
pub mod dom;
mod validate;

pub use catalog::{
    Climate, Deltas, FRAGMENTS, Fragment, Mass, POLICY_COST, Policy, SEAL_COST, SEAL_DELTAS,
    SLOTS, Slot, Tectonic,
};
pub use validate::{POLAR_TAG, validate};

pub const IDLE_MESSAGE: &str = "Select a fragment, then a slot to seal it into.";
pub const COMPLETE_MESSAGE: &str = "Every slot is stabilized. The world holds together.";

/// Why an action was refused. The display text is what the player sees.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No fragment selected")]
    NoFragmentSelected,
    #[error("Unknown fragment {0}")]
    UnknownFragment(String),
    #[error("Fragment {0} is already deployed")]
    FragmentDeployed(String),
    #[error("Unknown slot {0}")]
    UnknownSlot(String),
    #[error("Slot {0} already stabilized")]
    SlotSealed(String),
    #[error("Unknown policy {0}")]
    UnknownPolicy(String),
    #[error("Insufficient reconstruction energy")]
    InsufficientEnergy,
    #[error("Tectonic mismatch")]
    TectonicMismatch,
    #[error("Climate incompatibility")]
    ClimateIncompatible,
    #[error("Magnetic polarity conflict")]
    MagneticConflict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Gravity,
    Climate,
    Biosphere,
    Population,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Gravity,
        Metric::Climate,
        Metric::Biosphere,
        Metric::Population,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Gravity => "Gravity",
            Metric::Climate => "Climate",
            Metric::Biosphere => "Biosphere",
            Metric::Population => "Population",
        }
    }
}

/// World health. No upper bound; values only ever grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metrics {
    pub gravity: u32,
    pub climate: u32,
    pub biosphere: u32,
    pub population: u32,
}

impl Metrics {
    pub fn get(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Gravity => self.gravity,
            Metric::Climate => self.climate,
            Metric::Biosphere => self.biosphere,
            Metric::Population => self.population,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Good,
    Warn,
    Bad,
}

impl Band {
    pub fn css_class(self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::Warn => "warn",
            Band::Bad => "bad",
        }
    }
}

/// Display classification of a metric value.
pub fn status_band(value: u32) -> Band {
    if value >= 70 {
        Band::Good
    } else if value >= 40 {
        Band::Warn
    } else {
        Band::Bad
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FragmentState {
    pub fragment: &'static Fragment,
    pub deployed: bool,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotState {
    pub slot: &'static Slot,
    pub sealed: bool,
    /// Id of the fragment sealed here.
    pub occupant: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SealReport {
    pub slot: &'static str,
    pub fragment: &'static str,
    pub energy: u32,
}

pub struct PlacementEngine {
    config: PlacementConfig,
    fragments: Vec<FragmentState>,
    slots: Vec<SlotState>,
    metrics: Metrics,
    hope: u32,
    energy: u32,
    selected: Option<usize>,
    message: String,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self::with_catalog(config, FRAGMENTS, SLOTS)
    }

    pub fn with_catalog(
        config: PlacementConfig,
        fragments: &'static [Fragment],
        slots: &'static [Slot],
    ) -> Self {
        let mut engine = Self {
            config,
            fragments: fragments
                .iter()
                .map(|fragment| FragmentState {
                    fragment,
                    deployed: false,
                })
                .collect(),
            slots: slots
                .iter()
                .map(|slot| SlotState {
                    slot,
                    sealed: false,
                    occupant: None,
                })
                .collect(),
            metrics: Metrics {
                gravity: 0,
                climate: 0,
                biosphere: 0,
                population: 0,
            },
            hope: 0,
            energy: 0,
            selected: None,
            message: String::new(),
        };
        engine.reset();
        engine
    }

    /// Back to the initial world: nothing sealed, nothing deployed.
    pub fn reset(&mut self) {
        let cfg = &self.config;
        self.metrics = Metrics {
            gravity: cfg.gravity,
            climate: cfg.climate,
            biosphere: cfg.biosphere,
            population: cfg.population,
        };
        self.hope = cfg.hope;
        self.energy = cfg.energy.min(MAX_ENERGY);
        for state in &mut self.fragments {
            state.deployed = false;
        }
        for state in &mut self.slots {
            state.sealed = false;
            state.occupant = None;
        }
        self.selected = None;
        self.message = IDLE_MESSAGE.to_string();
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn hope(&self) -> u32 {
        self.hope
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fragments(&self) -> &[FragmentState] {
        &self.fragments
    }

    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn fragment(&self, id: &str) -> Option<&FragmentState> {
        self.fragments.iter().find(|s| s.fragment.id == id)
    }

    pub fn slot(&self, id: &str) -> Option<&SlotState> {
        self.slots.iter().find(|s| s.slot.id == id)
    }

    pub fn selected(&self) -> Option<&'static Fragment> {
        self.selected.map(|i| self.fragments[i].fragment)
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.sealed)
    }

    /// Makes `id` the current selection, replacing any earlier one. Deployed
    /// fragments cannot be picked up again.
    pub fn select_fragment(&mut self, id: &str) -> Result<&'static Fragment, Rejection> {
        let outcome = match self.fragments.iter().position(|s| s.fragment.id == id) {
            None => Err(Rejection::UnknownFragment(id.to_string())),
            Some(i) if self.fragments[i].deployed => {
                Err(Rejection::FragmentDeployed(id.to_string()))
            }
            Some(i) => {
                self.selected = Some(i);
                Ok(self.fragments[i].fragment)
            }
        };
        self.message = match &outcome {
            Ok(f) => format!("Fragment {} selected: {}, {}.", f.id, f.biome, f.civilization),
            Err(rejection) => rejection.to_string(),
        };
        outcome
    }

    /// Runs [`validate`] for the current selection against `slot_id` without
    /// changing anything. The view uses it to preview compatibility.
    pub fn check(&self, slot_id: &str) -> Result<(), Rejection> {
        let state = self
            .slot(slot_id)
            .ok_or_else(|| Rejection::UnknownSlot(slot_id.to_string()))?;
        validate(state.slot, self.selected())
    }

    pub fn seal(&mut self, slot_id: &str) -> Result<SealReport, Rejection> {
        let outcome = self.try_seal(slot_id);
        match &outcome {
            Ok(report) => {
                log::debug!(
                    "sealed {} into {}, energy now {}",
                    report.fragment,
                    report.slot,
                    report.energy
                );
                self.message = if self.is_complete() {
                    COMPLETE_MESSAGE.to_string()
                } else {
                    format!("Fragment {} sealed into {}.", report.fragment, report.slot)
                };
            }
            Err(rejection) => {
                log::debug!("seal into {slot_id} refused: {rejection}");
                self.message = rejection.to_string();
            }
        }
        outcome
    }

    fn try_seal(&mut self, slot_id: &str) -> Result<SealReport, Rejection> {
        let fragment_index = self.selected.ok_or(Rejection::NoFragmentSelected)?;
        let slot_index = self
            .slots
            .iter()
            .position(|s| s.slot.id == slot_id)
            .ok_or_else(|| Rejection::UnknownSlot(slot_id.to_string()))?;
        if self.slots[slot_index].sealed {
            return Err(Rejection::SlotSealed(slot_id.to_string()));
        }
        if self.energy < SEAL_COST {
            return Err(Rejection::InsufficientEnergy);
        }
        let fragment = self.fragments[fragment_index].fragment;
        let slot = self.slots[slot_index].slot;
        validate(slot, Some(fragment))?;

        self.slots[slot_index].sealed = true;
        self.slots[slot_index].occupant = Some(fragment.id);
        self.fragments[fragment_index].deployed = true;
        self.apply(SEAL_DELTAS);
        self.adjust_energy(-i64::from(SEAL_COST));
        self.selected = None;
        Ok(SealReport {
            slot: slot.id,
            fragment: fragment.id,
            energy: self.energy,
        })
    }

    /// Enacts a policy and returns the remaining energy.
    ///
    /// The metric deltas land before the energy check, so a policy the player
    /// cannot afford still moves the metrics and only the energy charge is
    /// skipped.
    pub fn apply_policy(&mut self, policy: Policy) -> Result<u32, Rejection> {
        self.apply(policy.deltas());
        if self.energy < POLICY_COST {
            log::debug!("policy {} applied without energy", policy.id());
            self.message = Rejection::InsufficientEnergy.to_string();
            return Err(Rejection::InsufficientEnergy);
        }
        self.adjust_energy(-i64::from(POLICY_COST));
        log::debug!("policy {} enacted, energy now {}", policy.id(), self.energy);
        self.message = format!("{policy} enacted.");
        Ok(self.energy)
    }

    /// [`Self::apply_policy`] by policy id; unknown ids change nothing.
    pub fn apply_policy_id(&mut self, id: &str) -> Result<u32, Rejection> {
        match id.parse::<Policy>() {
            Ok(policy) => self.apply_policy(policy),
            Err(rejection) => {
                self.message = rejection.to_string();
                Err(rejection)
            }
        }
    }

    /// Shifts energy by `delta`, clamped to `0..=MAX_ENERGY`.
    pub fn adjust_energy(&mut self, delta: i64) -> u32 {
        let next = i64::from(self.energy)
            .saturating_add(delta)
            .clamp(0, i64::from(MAX_ENERGY));
        self.energy = next as u32;
        self.energy
    }

    fn apply(&mut self, d: Deltas) {
        let m = &mut self.metrics;
        m.gravity = m.gravity.saturating_add(d.gravity);
        m.climate = m.climate.saturating_add(d.climate);
        m.biosphere = m.biosphere.saturating_add(d.biosphere);
        m.population = m.population.saturating_add(d.population);
        self.hope = self.hope.saturating_add(d.hope);
    }

    #[cfg(feature = "serde")]
    pub fn snapshot(&self) -> PlacementSnapshot<'_> {
        PlacementSnapshot {
            metrics: &self.metrics,
            hope: self.hope,
            energy: self.energy,
            selected: self.selected().map(|f| f.id),
            complete: self.is_complete(),
            message: &self.message,
            fragments: &self.fragments,
            slots: &self.slots,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
pub struct PlacementSnapshot<'a> {
    pub metrics: &'a Metrics,
    pub hope: u32,
    pub energy: u32,
    pub selected: Option<&'static str>,
    pub complete: bool,
    pub message: &'a str,
    pub fragments: &'a [FragmentState],
    pub slots: &'a [SlotState],
}
