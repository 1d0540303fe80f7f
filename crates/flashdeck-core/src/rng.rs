// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A minimal, completely insecure PRNG to shuffle the cards. Seeded by the
/// caller so the core never touches a clock.
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }

    /// Uniform number in `[0, max)`, or 0 when `max` is 0. Rejects draws
    /// from the biased tail so that every value is equally likely.
    pub fn below(&mut self, max: u32) -> u32 {
        if max <= 1 {
            return 0;
        }
        let zone = u32::MAX - (u32::MAX % max);
        loop {
            let n = self.next_u32();
            if n < zone {
                return n % max;
            }
        }
    }
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<T>(items: &mut [T], rng: &mut TinyRng) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}
