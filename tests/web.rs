// Browser tests for the DOM bindings. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use city_mender::{PlacementGame, ReflexGame};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_root(id: &str) {
    let doc = web_sys::window().unwrap().document().unwrap();
    let root = doc.create_element("div").unwrap();
    root.set_id(id);
    doc.body().unwrap().append_child(&root).unwrap();
}

#[wasm_bindgen_test]
fn reflex_game_mounts_full_grid() {
    fresh_root("reflex-root");
    let game = ReflexGame::new("reflex-root").unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    let blocks = doc.query_selector_all("#reflex-root .block").unwrap();
    assert_eq!(blocks.length(), 64);
    assert!(!game.is_running());
    game.start().unwrap();
    assert!(game.is_running());
    assert_eq!(game.message(), "Repair red blocks before they stack up.");
    let unstable = doc.query_selector_all("#reflex-root .block.unstable").unwrap();
    assert_eq!(unstable.length(), 1);
}

#[wasm_bindgen_test]
fn placement_game_seals_through_handle() {
    fresh_root("placement-root");
    let game = PlacementGame::new("placement-root").unwrap();
    assert!(!game.seal("S1"));
    assert!(game.select_fragment("F-07"));
    assert!(game.seal("S1"));
    assert_eq!(game.energy(), 62);
    let doc = web_sys::window().unwrap().document().unwrap();
    let sealed = doc.query_selector_all("#placement-root .slot.sealed").unwrap();
    assert_eq!(sealed.length(), 1);
}

#[wasm_bindgen_test]
fn missing_root_is_an_error() {
    assert!(ReflexGame::new("no-such-root").is_err());
}
