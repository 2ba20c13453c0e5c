//! Block repair reflex game.
//!
//! A fixed grid of city blocks. While a session runs, a spawn timer marks a
//! random block unstable and a one second tick counts the clock down. The
//! player repairs unstable blocks for points. A spawn that lands on a block that
//! is *still* unstable costs a life, so leaving damage unrepaired is punished
//! whenever the spawner happens to pick it again, not on a fixed deadline.
//!
//! [`ReflexEngine`] is timer-agnostic: the browser binding in [`dom`] owns the
//! two intervals and calls [`ReflexEngine::tick`] / [`ReflexEngine::spawn`].

use std::fmt;

use crate::config::ReflexConfig;

pub mod dom;
mod rng;

pub use rng::{CellPicker, EntropyPicker, ScriptedPicker};

pub const IDLE_MESSAGE: &str = "Press start to defend the city.";
pub const START_MESSAGE: &str = "Repair red blocks before they stack up.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CellState {
    #[default]
    Normal,
    Unstable,
    Repaired,
}

impl CellState {
    /// Value mirrored into the block's `data-state` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            CellState::Normal => "normal",
            CellState::Unstable => "unstable",
            CellState::Repaired => "repaired",
        }
    }
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    Saved { score: u32 },
    TimeUp { score: u32, target: u32 },
    Collapsed,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Saved { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Saved { score } => write!(f, "You saved the city! Final score: {score}"),
            Outcome::TimeUp { score, target } => {
                write!(f, "Time's up. Final score: {score}. Reach {target} to win.")
            }
            Outcome::Collapsed => f.write_str("The city collapsed. You ran out of lives."),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Session {
    pub score: u32,
    pub lives: u32,
    pub time_left: u32,
    pub running: bool,
    pub outcome: Option<Outcome>,
    pub message: String,
}

impl Session {
    fn fresh(config: &ReflexConfig) -> Self {
        Self {
            score: 0,
            lives: config.initial_lives,
            time_left: config.initial_time,
            running: false,
            outcome: None,
            message: IDLE_MESSAGE.to_string(),
        }
    }
}

/// Result of a click on a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repair {
    Ignored,
    Repaired { index: usize, score: u32 },
}

/// Result of one spawn timer firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
    Idle,
    Destabilized { index: usize },
    /// Picked a block that was already unstable; it stays unstable.
    LifeLost { index: usize, lives: u32 },
    Collapsed { index: usize },
}

/// Result of one clock tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Counted { time_left: u32 },
    Finished(Outcome),
}

pub struct ReflexEngine<P: CellPicker = EntropyPicker> {
    config: ReflexConfig,
    cells: Vec<CellState>,
    session: Session,
    picker: P,
}

impl ReflexEngine<EntropyPicker> {
    pub fn new(config: ReflexConfig) -> Self {
        Self::with_picker(config, EntropyPicker::new())
    }
}

impl<P: CellPicker> ReflexEngine<P> {
    pub fn with_picker(config: ReflexConfig, picker: P) -> Self {
        // A zero-sized grid would leave spawn nothing to pick from.
        let size = config.grid_size.max(1);
        Self {
            cells: vec![CellState::Normal; size],
            session: Session::fresh(&config),
            config,
            picker,
        }
    }

    pub fn config(&self) -> &ReflexConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<CellState> {
        self.cells.get(index).copied()
    }

    pub fn is_running(&self) -> bool {
        self.session.running
    }

    pub fn unstable_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == CellState::Unstable).count()
    }

    /// Resets every block and counter, then destabilizes one block right away.
    /// Also used for restart; the caller (re)arms the timers afterwards.
    pub fn start(&mut self) -> Spawn {
        self.cells.fill(CellState::Normal);
        self.session = Session::fresh(&self.config);
        self.session.running = true;
        self.session.message = START_MESSAGE.to_string();
        log::info!(
            "reflex session started: {} blocks, {}s, {} lives",
            self.cells.len(),
            self.session.time_left,
            self.session.lives
        );
        self.spawn()
    }

    pub fn repair(&mut self, index: usize) -> Repair {
        if !self.session.running {
            return Repair::Ignored;
        }
        match self.cells.get_mut(index) {
            Some(cell) if *cell == CellState::Unstable => {
                *cell = CellState::Repaired;
                self.session.score = self.session.score.saturating_add(self.config.repair_points);
                Repair::Repaired {
                    index,
                    score: self.session.score,
                }
            }
            _ => Repair::Ignored,
        }
    }

    pub fn spawn(&mut self) -> Spawn {
        if !self.session.running {
            return Spawn::Idle;
        }
        let index = self.picker.pick(self.cells.len());
        if self.cells[index] == CellState::Unstable {
            self.session.lives = self.session.lives.saturating_sub(1);
            log::debug!("spawn hit unstable block {index}, lives {}", self.session.lives);
            if self.session.lives == 0 {
                self.end(Outcome::Collapsed);
                return Spawn::Collapsed { index };
            }
            return Spawn::LifeLost {
                index,
                lives: self.session.lives,
            };
        }
        self.cells[index] = CellState::Unstable;
        Spawn::Destabilized { index }
    }

    pub fn tick(&mut self) -> Tick {
        if !self.session.running {
            return Tick::Idle;
        }
        self.session.time_left = self.session.time_left.saturating_sub(1);
        if self.session.time_left > 0 {
            return Tick::Counted {
                time_left: self.session.time_left,
            };
        }
        let score = self.session.score;
        let outcome = if score >= self.config.win_score {
            Outcome::Saved { score }
        } else {
            Outcome::TimeUp {
                score,
                target: self.config.win_score,
            }
        };
        self.end(outcome);
        Tick::Finished(outcome)
    }

    /// Stops the session. Block states and counters are left as they were so
    /// the final board stays visible until the next start.
    pub fn end(&mut self, outcome: Outcome) {
        self.session.running = false;
        self.session.outcome = Some(outcome);
        self.session.message = outcome.to_string();
        log::info!("reflex session ended: {}", self.session.message);
    }

    #[cfg(feature = "serde")]
    pub fn snapshot(&self) -> ReflexSnapshot<'_> {
        ReflexSnapshot {
            session: &self.session,
            cells: &self.cells,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
pub struct ReflexSnapshot<'a> {
    pub session: &'a Session,
    pub cells: &'a [CellState],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(picks: Vec<usize>) -> ReflexEngine<ScriptedPicker> {
        ReflexEngine::with_picker(ReflexConfig::default(), ScriptedPicker::new(picks))
    }

    #[test]
    fn start_resets_and_spawns_once() {
        let mut e = engine(vec![5]);
        assert_eq!(e.start(), Spawn::Destabilized { index: 5 });
        let s = e.session();
        assert!(s.running);
        assert_eq!((s.score, s.lives, s.time_left), (0, 3, 45));
        assert_eq!(s.message, START_MESSAGE);
        assert_eq!(e.unstable_count(), 1);
    }

    #[test]
    fn repair_requires_running_and_unstable() {
        let mut e = engine(vec![2]);
        assert_eq!(e.repair(2), Repair::Ignored);
        e.start();
        assert_eq!(e.repair(3), Repair::Ignored);
        assert_eq!(e.repair(999), Repair::Ignored);
        assert_eq!(e.repair(2), Repair::Repaired { index: 2, score: 10 });
        assert_eq!(e.cell(2), Some(CellState::Repaired));
        // Already repaired.
        assert_eq!(e.repair(2), Repair::Ignored);
        assert_eq!(e.session().score, 10);
    }

    #[test]
    fn spawn_over_repaired_destabilizes_again() {
        let mut e = engine(vec![4, 4]);
        e.start();
        e.repair(4);
        assert_eq!(e.spawn(), Spawn::Destabilized { index: 4 });
        assert_eq!(e.cell(4), Some(CellState::Unstable));
        assert_eq!(e.session().lives, 3);
    }

    #[test]
    fn repeated_spawn_costs_lives_until_collapse() {
        let mut e = engine(vec![7]);
        e.start();
        assert_eq!(e.spawn(), Spawn::LifeLost { index: 7, lives: 2 });
        assert_eq!(e.cell(7), Some(CellState::Unstable));
        assert_eq!(e.spawn(), Spawn::LifeLost { index: 7, lives: 1 });
        assert_eq!(e.spawn(), Spawn::Collapsed { index: 7 });
        let s = e.session();
        assert!(!s.running);
        assert_eq!(s.lives, 0);
        assert_eq!(s.outcome, Some(Outcome::Collapsed));
        assert_eq!(s.message, "The city collapsed. You ran out of lives.");
        // Stopped sessions ignore further timer fires.
        assert_eq!(e.spawn(), Spawn::Idle);
        assert_eq!(e.tick(), Tick::Idle);
        assert_eq!(e.session().lives, 0);
    }

    #[test]
    fn clock_runout_without_target_loses() {
        let mut e = engine(vec![0]);
        e.start();
        for expected in (1..45).rev() {
            assert_eq!(e.tick(), Tick::Counted { time_left: expected });
        }
        let outcome = Outcome::TimeUp { score: 0, target: 300 };
        assert_eq!(e.tick(), Tick::Finished(outcome));
        assert_eq!(e.session().message, "Time's up. Final score: 0. Reach 300 to win.");
        assert!(!outcome.is_win());
    }

    #[test]
    fn clock_runout_at_target_wins() {
        let cfg = ReflexConfig {
            initial_time: 1,
            win_score: 20,
            ..ReflexConfig::default()
        };
        let mut e = ReflexEngine::with_picker(cfg, ScriptedPicker::new(vec![0, 1]));
        e.start();
        e.spawn();
        e.repair(0);
        e.repair(1);
        assert_eq!(e.tick(), Tick::Finished(Outcome::Saved { score: 20 }));
        assert_eq!(e.session().message, "You saved the city! Final score: 20");
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let cfg = ReflexConfig {
            repair_points: u32::MAX - 5,
            ..ReflexConfig::default()
        };
        let mut e = ReflexEngine::with_picker(cfg, ScriptedPicker::new(vec![0, 1]));
        e.start();
        e.spawn();
        e.repair(0);
        assert_eq!(e.repair(1), Repair::Repaired { index: 1, score: u32::MAX });
        assert_eq!(e.session().score, u32::MAX);
    }

    #[test]
    fn restart_clears_board_and_counters() {
        let mut e = engine(vec![1, 1, 9]);
        e.start();
        e.spawn();
        e.tick();
        assert_eq!(e.session().lives, 2);
        e.start();
        let s = e.session();
        assert_eq!((s.score, s.lives, s.time_left), (0, 3, 45));
        assert_eq!(s.outcome, None);
        assert_eq!(e.cell(1), Some(CellState::Normal));
        assert_eq!(e.cell(9), Some(CellState::Unstable));
    }
}
