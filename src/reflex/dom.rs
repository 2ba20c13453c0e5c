//! Browser binding for the reflex game: builds the block grid, routes clicks
//! into the engine and owns the tick / spawn intervals of the current session.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, Window, window};

use super::{CellPicker, CellState, ReflexEngine};
use crate::config::ReflexConfig;
use crate::dom::{browser, button, element, mount_root, on_click, set_class, stat};
use crate::error::{Error, Result, js_error};

/// A `setInterval` registration. Clearing happens by id, so a cancelled
/// interval may still hold its closure; the closure is released on drop.
struct Interval {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    fn every(win: &Window, period_ms: u32, callback: impl FnMut() + 'static) -> Result<Self> {
        // ReflexConfig::validate bounds periods to MAX_TIMER_PERIOD_MS.
        let timeout = i32::try_from(period_ms).map_err(|_| {
            Error::InvalidConfig(format!("timer period {period_ms}ms is too long"))
        })?;
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            timeout,
        )?;
        Ok(Self {
            id,
            _callback: callback,
        })
    }
}

/// Something that can stop firing.
trait Cancel {
    fn cancel(&self);
}

impl Cancel for Interval {
    fn cancel(&self) {
        if let Some(win) = window() {
            win.clear_interval_with_handle(self.id);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The two periodic actions of one session. They are armed together and
/// cancelled together; neither outlives the session that created it.
struct Timers<T: Cancel = Interval> {
    tick: T,
    spawn: T,
}

impl<T: Cancel> Timers<T> {
    fn cancel(&self) {
        self.tick.cancel();
        self.spawn.cancel();
    }
}

/// Cancels both timers once the engine has stopped. Returns whether it did.
fn settle_timers<P: CellPicker, T: Cancel>(
    engine: &ReflexEngine<P>,
    timers: Option<&Timers<T>>,
) -> bool {
    if engine.is_running() {
        return false;
    }
    // Cancel only: this may be running inside one of the interval closures.
    match timers {
        Some(timers) => {
            timers.cancel();
            true
        }
        None => false,
    }
}

struct ReflexView {
    blocks: Vec<HtmlButtonElement>,
    score: HtmlElement,
    lives: HtmlElement,
    time: HtmlElement,
    message: HtmlElement,
    start: HtmlButtonElement,
    restart: HtmlButtonElement,
}

impl ReflexView {
    fn build(doc: &Document, root: &Element, cells: usize) -> Result<Self> {
        let shell = element(doc, "div", "reflex")?;

        let hud = element(doc, "div", "hud")?;
        let score = stat(doc, &hud, "Score", "score")?;
        let lives = stat(doc, &hud, "Lives", "lives")?;
        let time = stat(doc, &hud, "Time", "time")?;
        shell.append_child(&hud)?;

        let message = element(doc, "p", "message")?;
        shell.append_child(&message)?;

        let controls = element(doc, "div", "controls")?;
        let start = button(doc, "start", "Start")?;
        let restart = button(doc, "restart", "Restart")?;
        controls.append_child(&start)?;
        controls.append_child(&restart)?;
        shell.append_child(&controls)?;

        let grid = element(doc, "div", "grid")?;
        let mut blocks = Vec::with_capacity(cells);
        for i in 0..cells {
            let block = button(doc, "block", "")?;
            block.set_attribute("aria-label", &format!("Block {}", i + 1))?;
            grid.append_child(&block)?;
            blocks.push(block);
        }
        shell.append_child(&grid)?;
        root.append_child(&shell)?;

        Ok(Self {
            blocks,
            score,
            lives,
            time,
            message,
            start,
            restart,
        })
    }

    fn render(&self, engine: &ReflexEngine, started: bool) {
        for (block, state) in self.blocks.iter().zip(engine.cells()) {
            let _ = block.set_attribute("data-state", state.as_str());
            set_class(block, "unstable", *state == CellState::Unstable);
            set_class(block, "repaired", *state == CellState::Repaired);
        }
        let session = engine.session();
        self.score.set_text_content(Some(&session.score.to_string()));
        self.lives.set_text_content(Some(&session.lives.to_string()));
        self.time.set_text_content(Some(&session.time_left.to_string()));
        self.message.set_text_content(Some(&session.message));
        let won = session.outcome.is_some_and(|o| o.is_win());
        set_class(&self.message, "win", won);
        set_class(&self.message, "lose", session.outcome.is_some() && !won);
        self.start.set_disabled(session.running);
        self.restart.set_disabled(!started);
    }
}

struct ReflexRuntime {
    engine: ReflexEngine,
    view: ReflexView,
    timers: Option<Timers>,
    started: bool,
}

impl ReflexRuntime {
    fn render(&self) {
        self.view.render(&self.engine, self.started);
    }
}

/// Runs one engine action from an event or timer callback, stops the timers if
/// the action ended the session, and re-renders.
fn drive(runtime: &Weak<RefCell<ReflexRuntime>>, action: impl FnOnce(&mut ReflexEngine)) {
    let Some(runtime) = runtime.upgrade() else {
        return;
    };
    let mut state = runtime.borrow_mut();
    action(&mut state.engine);
    settle_timers(&state.engine, state.timers.as_ref());
    state.render();
}

fn start_session(runtime: &Rc<RefCell<ReflexRuntime>>) -> Result<()> {
    let (win, _) = browser()?;
    let (tick_ms, spawn_ms) = {
        let mut state = runtime.borrow_mut();
        // Drop the previous session's intervals before arming new ones.
        state.timers = None;
        state.engine.start();
        state.started = true;
        state.render();
        let config = state.engine.config();
        (config.tick_ms, config.spawn_ms)
    };

    let weak = Rc::downgrade(runtime);
    let tick = Interval::every(&win, tick_ms, {
        let weak = weak.clone();
        move || {
            drive(&weak, |engine| {
                engine.tick();
            })
        }
    })?;
    let spawn = Interval::every(&win, spawn_ms, move || {
        drive(&weak, |engine| {
            engine.spawn();
        })
    })?;
    runtime.borrow_mut().timers = Some(Timers { tick, spawn });
    Ok(())
}

fn wire(runtime: &Rc<RefCell<ReflexRuntime>>) -> Result<()> {
    let state = runtime.borrow();
    for (index, block) in state.view.blocks.iter().enumerate() {
        let weak = Rc::downgrade(runtime);
        on_click(block, move || {
            drive(&weak, |engine| {
                engine.repair(index);
            })
        })?;
    }
    for control in [&state.view.start, &state.view.restart] {
        let weak = Rc::downgrade(runtime);
        on_click(control, move || {
            if let Some(runtime) = weak.upgrade() {
                if let Err(err) = start_session(&runtime) {
                    log::error!("failed to start reflex session: {err}");
                }
            }
        })?;
    }
    Ok(())
}

/// JS handle to a mounted reflex game.
#[wasm_bindgen]
pub struct ReflexGame {
    inner: Rc<RefCell<ReflexRuntime>>,
}

#[wasm_bindgen]
impl ReflexGame {
    /// Mounts a game with default settings into the element with id `root_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> std::result::Result<ReflexGame, JsValue> {
        Self::mount(root_id, ReflexConfig::default()).map_err(js_error)
    }

    /// Starts a session, or restarts the current one from scratch.
    pub fn start(&self) -> std::result::Result<(), JsValue> {
        start_session(&self.inner).map_err(js_error)
    }

    /// Same as clicking block `index`. Returns whether it was repaired.
    pub fn repair(&self, index: usize) -> bool {
        let before = self.inner.borrow().engine.session().score;
        drive(&Rc::downgrade(&self.inner), |engine| {
            engine.repair(index);
        });
        self.inner.borrow().engine.session().score > before
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.borrow().engine.is_running()
    }

    pub fn message(&self) -> String {
        self.inner.borrow().engine.session().message.clone()
    }
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
impl ReflexGame {
    /// Mounts a game configured from a JSON object of `ReflexConfig` fields.
    #[wasm_bindgen(js_name = newWithOptions)]
    pub fn new_with_options(
        root_id: &str,
        options: &str,
    ) -> std::result::Result<ReflexGame, JsValue> {
        let config = ReflexConfig::from_json(options).map_err(js_error)?;
        Self::mount(root_id, config).map_err(js_error)
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> std::result::Result<String, JsValue> {
        let state = self.inner.borrow();
        serde_json::to_string(&state.engine.snapshot()).map_err(js_error)
    }
}

impl ReflexGame {
    fn mount(root_id: &str, config: ReflexConfig) -> Result<Self> {
        config.validate()?;
        let (_, doc) = browser()?;
        let root = mount_root(&doc, root_id)?;
        let engine = ReflexEngine::new(config);
        let view = ReflexView::build(&doc, &root, engine.cells().len())?;
        let inner = Rc::new(RefCell::new(ReflexRuntime {
            engine,
            view,
            timers: None,
            started: false,
        }));
        wire(&inner)?;
        inner.borrow().render();
        log::info!("reflex game mounted into #{root_id}");
        Ok(Self { inner })
    }
}
