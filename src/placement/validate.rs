//! Fragment-to-slot compatibility.

use super::Rejection;
use super::catalog::{Climate, Fragment, Mass, Slot, Tectonic};

/// Tag a fragment needs to survive in a cold slot.
pub const POLAR_TAG: &str = "polar";

/// Checks whether `fragment` may be sealed into `slot`. Pure; the first failed
/// rule wins, in this order: nothing selected, missing required tags, cold
/// climate without a polar tag, heavy mass on a volatile plate.
pub fn validate(slot: &Slot, fragment: Option<&Fragment>) -> Result<(), Rejection> {
    let Some(fragment) = fragment else {
        return Err(Rejection::NoFragmentSelected);
    };
    if !slot.expects.iter().all(|tag| fragment.has_tag(tag)) {
        return Err(Rejection::TectonicMismatch);
    }
    if slot.climate == Climate::Cold && !fragment.has_tag(POLAR_TAG) {
        return Err(Rejection::ClimateIncompatible);
    }
    if slot.tectonic == Tectonic::Volatile && fragment.mass == Mass::Heavy {
        return Err(Rejection::MagneticConflict);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLD_VOLATILE: Slot = Slot {
        id: "T1",
        expects: &["polar", "energy"],
        climate: Climate::Cold,
        tectonic: Tectonic::Volatile,
    };

    const COLD_OPEN: Slot = Slot {
        id: "T2",
        expects: &[],
        climate: Climate::Cold,
        tectonic: Tectonic::Stable,
    };

    fn fragment(tags: &'static [&'static str], mass: Mass) -> Fragment {
        Fragment {
            id: "T-F",
            biome: "test",
            mass,
            civilization: "test",
            tags,
        }
    }

    #[test]
    fn nothing_selected_fails_first() {
        assert_eq!(validate(&COLD_VOLATILE, None), Err(Rejection::NoFragmentSelected));
    }

    #[test]
    fn heavy_on_volatile_is_magnetic_conflict() {
        let f = fragment(&["polar", "energy"], Mass::Heavy);
        let err = validate(&COLD_VOLATILE, Some(&f)).unwrap_err();
        assert_eq!(err, Rejection::MagneticConflict);
        assert_eq!(err.to_string(), "Magnetic polarity conflict");
    }

    #[test]
    fn tag_check_precedes_mass_check() {
        let f = fragment(&["polar"], Mass::Heavy);
        assert_eq!(validate(&COLD_VOLATILE, Some(&f)), Err(Rejection::TectonicMismatch));
    }

    #[test]
    fn cold_needs_polar_even_without_required_tags() {
        let f = fragment(&["forest"], Mass::Light);
        assert_eq!(validate(&COLD_OPEN, Some(&f)), Err(Rejection::ClimateIncompatible));
        let g = fragment(&["polar"], Mass::Heavy);
        assert_eq!(validate(&COLD_OPEN, Some(&g)), Ok(()));
    }

    #[test]
    fn superset_of_tags_passes() {
        let f = fragment(&["energy", "ice", "polar"], Mass::Medium);
        assert_eq!(validate(&COLD_VOLATILE, Some(&f)), Ok(()));
    }
}
