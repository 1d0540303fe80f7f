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

//! The session cursor: a position within the visible cards plus the flip
//! state of the card shown there.
//!
//! The cursor never stores the length of the view. Every operation that
//! needs it takes the length as an argument, and the position actually shown
//! is always recomputed by clamping, so a stale position can never index
//! past the end of the view.

use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Last intended position. May exceed the current view.
    raw_index: usize,
    flipped: bool,
    /// Moves begun but not yet committed, oldest first.
    pending: VecDeque<Direction>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_index(&self) -> usize {
        self.raw_index
    }

    /// The raw position clamped into `[0, visible_len - 1]`, or 0 for an
    /// empty view.
    pub fn effective_index(&self, visible_len: usize) -> usize {
        self.raw_index.min(visible_len.saturating_sub(1))
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// The move the next commit will apply.
    pub fn pending(&self) -> Option<Direction> {
        self.pending.front().copied()
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn unflip(&mut self) {
        self.flipped = false;
    }

    /// Move one forward from what is currently shown, wrapping at the end.
    pub fn next(&mut self, visible_len: usize) {
        if visible_len == 0 {
            return;
        }
        self.flipped = false;
        self.raw_index = (self.effective_index(visible_len) + 1) % visible_len;
    }

    /// Move one back from what is currently shown, wrapping at the start.
    pub fn prev(&mut self, visible_len: usize) {
        if visible_len == 0 {
            return;
        }
        self.flipped = false;
        let current = self.effective_index(visible_len);
        self.raw_index = if current == 0 {
            visible_len - 1
        } else {
            current - 1
        };
    }

    /// Back to the first card, face up. Used when the identity of the view
    /// changed too much to keep a position in it.
    pub fn reset(&mut self) {
        self.raw_index = 0;
        self.flipped = false;
        self.pending.clear();
    }

    /// Reconcile after the view lost one card. `old_len` is the length of
    /// the view before the loss.
    ///
    /// If the cursor sat on the last card of the old view it steps back onto
    /// the card before it. Otherwise it stays put, and the card after the
    /// removed one slides into its slot.
    pub fn on_shrink(&mut self, old_len: usize) {
        if old_len == 0 {
            return;
        }
        let old_last = old_len - 1;
        let current = self.effective_index(old_len);
        self.raw_index = if current >= old_last {
            current.saturating_sub(1)
        } else {
            current
        };
    }

    /// First phase of an animated move: turn the card face up now, move
    /// later. Each call queues one move; each commit applies one.
    pub fn begin_advance(&mut self, direction: Direction) {
        self.flipped = false;
        self.pending.push_back(direction);
    }

    /// Second phase: apply the oldest pending move against the view as it
    /// is now. Returns false if nothing was pending.
    pub fn commit_advance(&mut self, visible_len: usize) -> bool {
        match self.pending.pop_front() {
            Some(Direction::Forward) => {
                self.next(visible_len);
                true
            }
            Some(Direction::Backward) => {
                self.prev(visible_len);
                true
            }
            None => false,
        }
    }

    /// Drop every pending move.
    pub fn cancel_advance(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw_index: usize) -> Cursor {
        Cursor {
            raw_index,
            ..Cursor::default()
        }
    }

    #[test]
    fn test_effective_index_clamps() {
        let cursor = at(7);
        assert_eq!(cursor.effective_index(3), 2);
        assert_eq!(cursor.effective_index(10), 7);
        assert_eq!(cursor.effective_index(0), 0);
    }

    #[test]
    fn test_next_wraps_and_unflips() {
        let mut cursor = at(2);
        cursor.flip();
        cursor.next(3);
        assert_eq!(cursor.raw_index(), 0);
        assert!(!cursor.is_flipped());
    }

    #[test]
    fn test_prev_wraps() {
        let mut cursor = at(0);
        cursor.prev(4);
        assert_eq!(cursor.raw_index(), 3);
        cursor.prev(4);
        assert_eq!(cursor.raw_index(), 2);
    }

    #[test]
    fn test_next_uses_clamped_base() {
        // The view shrank from 10 to 3 while the cursor pointed at 8: the
        // last card is shown, so the next one is the first.
        let mut cursor = at(8);
        cursor.next(3);
        assert_eq!(cursor.raw_index(), 0);
        let mut cursor = at(8);
        cursor.prev(3);
        assert_eq!(cursor.raw_index(), 1);
    }

    #[test]
    fn test_empty_view_is_noop() {
        let mut cursor = at(0);
        cursor.flip();
        cursor.next(0);
        cursor.prev(0);
        assert_eq!(cursor.raw_index(), 0);
        assert!(cursor.is_flipped());
        assert_eq!(cursor.effective_index(0), 0);
    }

    #[test]
    fn test_flip_toggles_without_moving() {
        let mut cursor = at(1);
        cursor.flip();
        assert!(cursor.is_flipped());
        cursor.flip();
        assert!(!cursor.is_flipped());
        assert_eq!(cursor.raw_index(), 1);
    }

    #[test]
    fn test_shrink_at_tail_steps_back() {
        // [A, B, C] -> [A, B] with the cursor on C.
        let mut cursor = at(2);
        cursor.on_shrink(3);
        assert_eq!(cursor.raw_index(), 1);
    }

    #[test]
    fn test_shrink_in_middle_holds() {
        // [A, B, C] -> [A, C] with the cursor on B: C slides in.
        let mut cursor = at(1);
        cursor.on_shrink(3);
        assert_eq!(cursor.raw_index(), 1);
        let mut cursor = at(0);
        cursor.on_shrink(3);
        assert_eq!(cursor.raw_index(), 0);
    }

    #[test]
    fn test_shrink_last_remaining() {
        let mut cursor = at(0);
        cursor.on_shrink(1);
        assert_eq!(cursor.raw_index(), 0);
        assert_eq!(cursor.effective_index(0), 0);
    }

    #[test]
    fn test_shrink_with_stale_position() {
        // Raw position beyond the old view counts as being on its tail.
        let mut cursor = at(9);
        cursor.on_shrink(4);
        assert_eq!(cursor.raw_index(), 2);
    }

    #[test]
    fn test_two_phase_advance() {
        let mut cursor = at(0);
        cursor.flip();
        cursor.begin_advance(Direction::Forward);
        assert!(!cursor.is_flipped());
        assert_eq!(cursor.raw_index(), 0);
        assert_eq!(cursor.pending(), Some(Direction::Forward));
        assert!(cursor.commit_advance(3));
        assert_eq!(cursor.raw_index(), 1);
        assert!(!cursor.commit_advance(3));
        assert_eq!(cursor.raw_index(), 1);
    }

    #[test]
    fn test_queued_advances_each_move() {
        // Two quick presses on [A, B, C] land on C.
        let mut cursor = at(0);
        cursor.begin_advance(Direction::Forward);
        cursor.begin_advance(Direction::Forward);
        assert!(cursor.commit_advance(3));
        assert!(cursor.commit_advance(3));
        assert!(!cursor.commit_advance(3));
        assert_eq!(cursor.raw_index(), 2);
    }

    #[test]
    fn test_queued_advances_apply_in_order() {
        let mut cursor = at(1);
        cursor.begin_advance(Direction::Backward);
        cursor.begin_advance(Direction::Forward);
        assert_eq!(cursor.pending(), Some(Direction::Backward));
        assert!(cursor.commit_advance(3));
        assert_eq!(cursor.raw_index(), 0);
        assert!(cursor.commit_advance(3));
        assert_eq!(cursor.raw_index(), 1);
    }

    #[test]
    fn test_cancel_drops_every_queued_advance() {
        let mut cursor = at(0);
        cursor.begin_advance(Direction::Forward);
        cursor.begin_advance(Direction::Forward);
        cursor.cancel_advance();
        assert_eq!(cursor.pending(), None);
        assert!(!cursor.commit_advance(3));
        assert!(!cursor.commit_advance(3));
        assert_eq!(cursor.raw_index(), 0);
    }

    #[test]
    fn test_random_walk_stays_in_bounds() {
        let mut cursor = Cursor::new();
        let mut len = 5;
        for step in 0..200usize {
            match step % 7 {
                0 | 3 => cursor.next(len),
                1 => cursor.prev(len),
                2 => cursor.flip(),
                4 => {
                    cursor.on_shrink(len);
                    len = len.saturating_sub(1);
                }
                5 => len = (len + step) % 6,
                _ => cursor.reset(),
            }
            if len > 0 {
                assert!(cursor.effective_index(len) < len);
            }
        }
    }
}
