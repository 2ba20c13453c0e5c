// Placement puzzle scenarios against the public engine API.

use city_mender::PlacementConfig;
use city_mender::placement::{
    FRAGMENTS, PlacementEngine, Policy, Rejection, SEAL_COST, SLOTS, validate,
};

fn engine_with_energy(energy: u32) -> PlacementEngine {
    PlacementEngine::new(PlacementConfig {
        energy,
        ..PlacementConfig::default()
    })
}

#[test]
fn heavy_polar_fragment_conflicts_with_volatile_cold_slot() {
    let f22 = FRAGMENTS.iter().find(|f| f.id == "F-22").unwrap();
    let s3 = SLOTS.iter().find(|s| s.id == "S3").unwrap();
    let err = validate(s3, Some(f22)).unwrap_err();
    assert_eq!(err.to_string(), "Magnetic polarity conflict");

    let mut e = engine_with_energy(70);
    e.select_fragment("F-22").unwrap();
    let metrics = *e.metrics();
    let hope = e.hope();
    assert_eq!(e.seal("S3"), Err(Rejection::MagneticConflict));
    assert_eq!(*e.metrics(), metrics);
    assert_eq!(e.hope(), hope);
    assert_eq!(e.energy(), 70);
    assert!(!e.slot("S3").unwrap().sealed);
    assert!(!e.fragment("F-22").unwrap().deployed);
    // A failed seal keeps the selection.
    assert_eq!(e.selected().map(|f| f.id), Some("F-22"));
}

#[test]
fn mangrove_fragment_seals_into_humid_slot() {
    let mut e = engine_with_energy(70);
    let before = *e.metrics();
    let hope = e.hope();
    e.select_fragment("F-07").unwrap();
    let report = e.seal("S1").unwrap();
    assert_eq!((report.slot, report.fragment, report.energy), ("S1", "F-07", 62));

    let after = e.metrics();
    assert_eq!(after.gravity, before.gravity + 4);
    assert_eq!(after.climate, before.climate + 5);
    assert_eq!(after.biosphere, before.biosphere + 6);
    assert_eq!(after.population, before.population + 3);
    assert_eq!(e.hope(), hope + 5);
    assert_eq!(e.energy(), 62);
    assert!(e.slot("S1").unwrap().sealed);
    assert_eq!(e.slot("S1").unwrap().occupant, Some("F-07"));
    assert!(e.fragment("F-07").unwrap().deployed);
    assert_eq!(e.selected(), None);
    assert_eq!(e.message(), "Fragment F-07 sealed into S1.");
}

#[test]
fn sealed_slot_always_refuses() {
    let mut e = engine_with_energy(100);
    e.select_fragment("F-07").unwrap();
    e.seal("S1").unwrap();
    for f in FRAGMENTS.iter().filter(|f| f.id != "F-07") {
        e.select_fragment(f.id).unwrap();
        let err = e.seal("S1").unwrap_err();
        assert!(err.to_string().contains("already stabilized"), "got '{err}'");
    }
    assert_eq!(e.energy(), 100 - SEAL_COST);
}

#[test]
fn energy_stays_in_bounds_through_any_action_sequence() {
    let mut e = engine_with_energy(12);
    for round in 0..10 {
        let _ = e.apply_policy(Policy::ALL[round % 3]);
        assert!(e.energy() <= 100);
    }
    assert_eq!(e.energy(), 2);
    e.select_fragment("F-07").unwrap();
    assert_eq!(e.seal("S1"), Err(Rejection::InsufficientEnergy));
    assert_eq!(e.energy(), 2);
}

#[test]
fn whole_world_can_be_completed() {
    let mut e = PlacementEngine::new(PlacementConfig::default());
    let plan = [
        ("F-07", "S1"),
        ("F-13", "S2"),
        ("F-31", "S3"),
        ("F-22", "S4"),
        ("F-58", "S5"),
    ];
    for (fragment, slot) in plan {
        e.select_fragment(fragment).unwrap();
        e.seal(slot).unwrap();
    }
    assert!(e.is_complete());
    assert_eq!(e.energy(), 70 - 5 * SEAL_COST);
    assert_eq!(e.message(), city_mender::placement::COMPLETE_MESSAGE);
}

#[cfg(feature = "serde_json")]
#[test]
fn snapshot_reports_world_state() {
    let mut e = PlacementEngine::new(PlacementConfig::default());
    e.select_fragment("F-13").unwrap();
    let json = serde_json::to_value(e.snapshot()).unwrap();
    assert_eq!(json["energy"], 70);
    assert_eq!(json["selected"], "F-13");
    assert_eq!(json["complete"], false);
    assert_eq!(json["slots"][2]["slot"]["climate"], "cold");
    assert_eq!(json["fragments"][2]["fragment"]["mass"], "heavy");
}
