//! RNG module - 7-bag random piece generation
//!
//! Each bag holds one of each piece (I, O, T, S, Z, J, L) in shuffled order.
//! Pieces are drawn until the bag is empty, then a fresh bag is shuffled, so
//! any 7 draws starting at a bag boundary contain every kind exactly once.
//!
//! Shuffling uses a small LCG so a seed reproduces a sequence within one
//! build; no stronger guarantee is made.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (((self.next_u32() >> 16) as u64 * max as u64) >> 16) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece source
#[derive(Debug, Clone)]
pub struct Bag {
    /// Current shuffled bag
    pieces: [PieceKind; 7],
    /// Number of pieces already drawn from `pieces`
    drawn: usize,
    rng: SimpleRng,
}

impl Bag {
    /// Create a bag source with the given seed; the first bag is shuffled
    /// immediately.
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            pieces: PieceKind::ALL,
            drawn: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    /// Shuffle a complete new bag
    fn refill(&mut self) {
        self.pieces = PieceKind::ALL;
        self.rng.shuffle(&mut self.pieces);
        self.drawn = 0;
    }

    /// Discard whatever is left and start from a fresh bag
    pub fn reset(&mut self) {
        self.refill();
    }

    /// Draw the next piece, refilling when the bag is exhausted
    pub fn draw(&mut self) -> PieceKind {
        if self.drawn >= self.pieces.len() {
            self.refill();
        }
        let piece = self.pieces[self.drawn];
        self.drawn += 1;
        piece
    }

    /// Pieces still waiting in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.pieces[self.drawn..]
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new(1)
    }
}
