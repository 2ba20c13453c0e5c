//! Cell selection for spawns.

/// Source of uniformly distributed cell indices.
pub trait CellPicker {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Default picker. Draws from `getrandom` (browser crypto on wasm) and falls
/// back to a clock-seeded LCG when entropy is unavailable or the `rng`
/// feature is off.
pub struct EntropyPicker {
    lcg: Option<u64>,
}

impl EntropyPicker {
    pub fn new() -> Self {
        Self { lcg: None }
    }

    fn next_lcg(&mut self) -> u64 {
        let state = self.lcg.get_or_insert_with(clock_seed);
        // Knuth MMIX constants
        *state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *state >> 33
    }
}

impl Default for EntropyPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl CellPicker for EntropyPicker {
    fn pick(&mut self, len: usize) -> usize {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return (u64::from_le_bytes(buf) % len as u64) as usize;
            }
        }
        (self.next_lcg() % len as u64) as usize
    }
}

fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (crate::performance_now() * 1_000.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Replays a fixed sequence of indices, cycling when exhausted. Values are
/// reduced modulo the grid length.
#[derive(Clone, Debug)]
pub struct ScriptedPicker {
    sequence: Vec<usize>,
    cursor: usize,
}

impl ScriptedPicker {
    pub fn new(sequence: impl Into<Vec<usize>>) -> Self {
        Self {
            sequence: sequence.into(),
            cursor: 0,
        }
    }
}

impl CellPicker for ScriptedPicker {
    fn pick(&mut self, len: usize) -> usize {
        if self.sequence.is_empty() {
            return 0;
        }
        let value = self.sequence[self.cursor % self.sequence.len()];
        self.cursor += 1;
        value % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_picks_stay_in_range() {
        let mut picker = EntropyPicker::new();
        for len in [1usize, 2, 7, 64] {
            for _ in 0..200 {
                assert!(picker.pick(len) < len);
            }
        }
    }

    #[test]
    fn lcg_fallback_stays_in_range() {
        let mut picker = EntropyPicker { lcg: Some(42) };
        for _ in 0..500 {
            let v = (picker.next_lcg() % 64) as usize;
            assert!(v < 64);
        }
    }

    #[test]
    fn scripted_cycles_and_wraps() {
        let mut picker = ScriptedPicker::new(vec![3, 70]);
        assert_eq!(picker.pick(64), 3);
        assert_eq!(picker.pick(64), 6);
        assert_eq!(picker.pick(64), 3);
    }
}
