//! Injectable randomness for tile spawning.
//!
//! Every random decision the engine makes goes through [`RandomSource`],
//! so tests can script exact placements while production code hands in
//! any [`rand::Rng`].

use rand::Rng;

/// Probability that a spawned tile is a 2 rather than a 4.
pub const TWO_PROBABILITY: f64 = 0.9;

/// Probability that a successful move spawns one tile rather than two.
pub const SINGLE_SPAWN_PROBABILITY: f64 = 0.9;

/// Upper bound of the uniform initial tile count (inclusive, lower bound 1).
pub const MAX_INITIAL_TILES: usize = 3;

/// Source of the engine's random decisions.
pub trait RandomSource {
    /// Returns an index uniformly drawn from `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Returns `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.gen_bool(p)
    }
}

/// Value of a freshly spawned tile: 2 (90%) or 4 (10%).
pub fn spawn_value(rng: &mut impl RandomSource) -> u32 {
    if rng.chance(TWO_PROBABILITY) { 2 } else { 4 }
}

/// Number of tiles placed on a new game: uniform over 1..=3.
pub fn initial_tile_count(rng: &mut impl RandomSource) -> usize {
    1 + rng.pick_index(MAX_INITIAL_TILES)
}

/// Number of tiles spawned after a successful move: 1 (90%) or 2 (10%).
pub fn spawn_count(rng: &mut impl RandomSource) -> usize {
    if rng.chance(SINGLE_SPAWN_PROBABILITY) { 1 } else { 2 }
}
