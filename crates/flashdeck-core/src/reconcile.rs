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

//! How the cursor reacts when a mutation changes which cards are visible.

use crate::cursor::Cursor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    /// Behave like a user-requested `next`.
    Advance,
    /// The view lost one card without the user navigating.
    Shrink,
    /// The view did not lose anything the cursor cares about.
    Hold,
}

/// A card changed mastery. `was_visible` and `still_visible` are membership
/// in the view before and after the change.
pub fn after_mark(was_visible: bool, still_visible: bool) -> Adjustment {
    match (was_visible, still_visible) {
        (true, true) => Adjustment::Advance,
        (true, false) => Adjustment::Shrink,
        (false, _) => Adjustment::Hold,
    }
}

/// A card was deleted.
pub fn after_delete(was_visible: bool) -> Adjustment {
    if was_visible {
        Adjustment::Shrink
    } else {
        Adjustment::Hold
    }
}

impl Adjustment {
    /// Apply to `cursor`. `old_len` and `new_len` are the view lengths
    /// before and after the mutation. Any pending animated move is dropped
    /// when the cursor moves.
    pub fn apply(self, cursor: &mut Cursor, old_len: usize, new_len: usize) {
        match self {
            Adjustment::Advance => {
                cursor.cancel_advance();
                cursor.next(new_len);
            }
            Adjustment::Shrink => {
                cursor.cancel_advance();
                cursor.on_shrink(old_len);
                cursor.unflip();
            }
            Adjustment::Hold => {}
        }
    }
}
