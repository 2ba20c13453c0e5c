//! Browser binding for the placement puzzle. Entirely click driven: every
//! handler performs one engine action and re-renders the whole view.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

use super::{Metric, PlacementEngine, Policy, status_band};
use crate::config::PlacementConfig;
use crate::dom::{browser, button, element, mount_root, on_click, set_class, stat};
use crate::error::{Result, js_error};

struct PlacementView {
    metrics: Vec<(Metric, HtmlElement)>,
    hope: HtmlElement,
    energy: HtmlElement,
    message: HtmlElement,
    fragments: Vec<(&'static str, HtmlButtonElement)>,
    slots: Vec<(&'static str, HtmlButtonElement)>,
    policies: Vec<(Policy, HtmlButtonElement)>,
    reset: HtmlButtonElement,
}

impl PlacementView {
    fn build(doc: &Document, root: &Element, engine: &PlacementEngine) -> Result<Self> {
        let shell = element(doc, "div", "placement")?;

        let hud = element(doc, "div", "hud")?;
        let mut metrics = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            let value = stat(doc, &hud, metric.label(), "metric")?;
            metrics.push((metric, value));
        }
        let hope = stat(doc, &hud, "Hope", "hope")?;
        let energy = stat(doc, &hud, "Energy", "energy")?;
        shell.append_child(&hud)?;

        let message = element(doc, "p", "message")?;
        shell.append_child(&message)?;

        let fragment_list = element(doc, "div", "fragments")?;
        let mut fragments = Vec::with_capacity(engine.fragments().len());
        for state in engine.fragments() {
            let f = state.fragment;
            let btn = button(doc, "fragment", &format!("{} · {}", f.id, f.biome))?;
            btn.set_title(&format!("{} | {:?} | {}", f.civilization, f.mass, f.tags.join(", ")));
            fragment_list.append_child(&btn)?;
            fragments.push((f.id, btn));
        }
        shell.append_child(&fragment_list)?;

        let slot_list = element(doc, "div", "slots")?;
        let mut slots = Vec::with_capacity(engine.slots().len());
        for state in engine.slots() {
            let s = state.slot;
            let btn = button(doc, "slot", s.id)?;
            btn.set_title(&format!(
                "needs {} | {} | {}",
                s.expects.join(", "),
                s.climate.as_str(),
                s.tectonic.as_str()
            ));
            slot_list.append_child(&btn)?;
            slots.push((s.id, btn));
        }
        shell.append_child(&slot_list)?;

        let policy_bar = element(doc, "div", "policies")?;
        let mut policies = Vec::with_capacity(Policy::ALL.len());
        for policy in Policy::ALL {
            let btn = button(doc, "policy", policy.label())?;
            btn.set_attribute("data-policy", policy.id())?;
            policy_bar.append_child(&btn)?;
            policies.push((policy, btn));
        }
        let reset = button(doc, "reset", "Reset world")?;
        policy_bar.append_child(&reset)?;
        shell.append_child(&policy_bar)?;

        root.append_child(&shell)?;
        Ok(Self {
            metrics,
            hope,
            energy,
            message,
            fragments,
            slots,
            policies,
            reset,
        })
    }

    fn render(&self, engine: &PlacementEngine) {
        for (metric, el) in &self.metrics {
            let value = engine.metrics().get(*metric);
            el.set_text_content(Some(&format!("{value}%")));
            let band = status_band(value);
            for class in ["good", "warn", "bad"] {
                set_class(el, class, class == band.css_class());
            }
        }
        self.hope.set_text_content(Some(&engine.hope().to_string()));
        self.energy.set_text_content(Some(&engine.energy().to_string()));
        self.message.set_text_content(Some(engine.message()));
        set_class(&self.message, "complete", engine.is_complete());

        let selected = engine.selected().map(|f| f.id);
        for (id, btn) in &self.fragments {
            let deployed = engine.fragment(id).is_some_and(|s| s.deployed);
            set_class(btn, "selected", selected == Some(*id));
            set_class(btn, "deployed", deployed);
            btn.set_disabled(deployed);
        }
        for (id, btn) in &self.slots {
            let Some(state) = engine.slot(id) else {
                continue;
            };
            set_class(btn, "sealed", state.sealed);
            let label = match state.occupant {
                Some(fragment) => format!("{id} ◆ {fragment}"),
                None => id.to_string(),
            };
            btn.set_text_content(Some(&label));
            // Compatibility preview only while something is selected.
            let preview = (selected.is_some() && !state.sealed).then(|| engine.check(id).is_ok());
            set_class(btn, "compatible", preview == Some(true));
            set_class(btn, "incompatible", preview == Some(false));
        }
    }
}

struct PlacementRuntime {
    engine: PlacementEngine,
    view: PlacementView,
}

fn drive(runtime: &Weak<RefCell<PlacementRuntime>>, action: impl FnOnce(&mut PlacementEngine)) {
    let Some(runtime) = runtime.upgrade() else {
        return;
    };
    let mut state = runtime.borrow_mut();
    action(&mut state.engine);
    let PlacementRuntime { engine, view } = &*state;
    view.render(engine);
}

fn wire(runtime: &Rc<RefCell<PlacementRuntime>>) -> Result<()> {
    let state = runtime.borrow();
    for (id, btn) in &state.view.fragments {
        let (weak, id) = (Rc::downgrade(runtime), *id);
        on_click(btn, move || {
            drive(&weak, |engine| {
                let _ = engine.select_fragment(id);
            })
        })?;
    }
    for (id, btn) in &state.view.slots {
        let (weak, id) = (Rc::downgrade(runtime), *id);
        on_click(btn, move || {
            drive(&weak, |engine| {
                let _ = engine.seal(id);
            })
        })?;
    }
    for (policy, btn) in &state.view.policies {
        let (weak, policy) = (Rc::downgrade(runtime), *policy);
        on_click(btn, move || {
            drive(&weak, |engine| {
                let _ = engine.apply_policy(policy);
            })
        })?;
    }
    let weak = Rc::downgrade(runtime);
    on_click(&state.view.reset, move || drive(&weak, PlacementEngine::reset))?;
    Ok(())
}

/// JS handle to a mounted placement puzzle.
#[wasm_bindgen]
pub struct PlacementGame {
    inner: Rc<RefCell<PlacementRuntime>>,
}

#[wasm_bindgen]
impl PlacementGame {
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> std::result::Result<PlacementGame, JsValue> {
        Self::mount(root_id, PlacementConfig::default()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = selectFragment)]
    pub fn select_fragment(&self, id: &str) -> bool {
        self.act(|engine| engine.select_fragment(id).is_ok())
    }

    pub fn seal(&self, slot_id: &str) -> bool {
        self.act(|engine| engine.seal(slot_id).is_ok())
    }

    #[wasm_bindgen(js_name = applyPolicy)]
    pub fn apply_policy(&self, policy_id: &str) -> bool {
        self.act(|engine| engine.apply_policy_id(policy_id).is_ok())
    }

    pub fn reset(&self) {
        self.act(PlacementEngine::reset);
    }

    pub fn energy(&self) -> u32 {
        self.inner.borrow().engine.energy()
    }

    pub fn message(&self) -> String {
        self.inner.borrow().engine.message().to_string()
    }

    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.inner.borrow().engine.is_complete()
    }
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
impl PlacementGame {
    #[wasm_bindgen(js_name = newWithOptions)]
    pub fn new_with_options(
        root_id: &str,
        options: &str,
    ) -> std::result::Result<PlacementGame, JsValue> {
        let config = PlacementConfig::from_json(options).map_err(js_error)?;
        Self::mount(root_id, config).map_err(js_error)
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> std::result::Result<String, JsValue> {
        let state = self.inner.borrow();
        serde_json::to_string(&state.engine.snapshot()).map_err(js_error)
    }
}

impl PlacementGame {
    fn mount(root_id: &str, config: PlacementConfig) -> Result<Self> {
        config.validate()?;
        let (_, doc) = browser()?;
        let root = mount_root(&doc, root_id)?;
        let engine = PlacementEngine::new(config);
        let view = PlacementView::build(&doc, &root, &engine)?;
        view.render(&engine);
        let inner = Rc::new(RefCell::new(PlacementRuntime { engine, view }));
        wire(&inner)?;
        log::info!("placement game mounted into #{root_id}");
        Ok(Self { inner })
    }

    fn act<T>(&self, action: impl FnOnce(&mut PlacementEngine) -> T) -> T {
        let mut state = self.inner.borrow_mut();
        let out = action(&mut state.engine);
        let PlacementRuntime { engine, view } = &*state;
        view.render(engine);
        out
    }
}
