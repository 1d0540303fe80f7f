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

//! The study session: one controller owning the collection, the filter and
//! the cursor. Presentation layers drive it only through these methods.
//!
//! Derived state (visible cards, tags, progress) is recomputed from the
//! collection on every call rather than cached.

use serde::Serialize;

use crate::cursor::Cursor;
use crate::cursor::Direction;
use crate::error::PersistenceError;
use crate::error::ValidationError;
use crate::filter::Filter;
use crate::filter::ProficiencyFilter;
use crate::filter::visible;
use crate::import::CardDraft;
use crate::reconcile::after_delete;
use crate::reconcile::after_mark;
use crate::repository::Repository;
use crate::rng::TinyRng;
use crate::store::CardStore;
use crate::tags::tag_index;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::card::Proficiency;

/// Counts shown alongside the current card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based position in the view, or 0 if the view is empty.
    pub position: usize,
    pub visible: usize,
    pub total: usize,
    pub new: usize,
    pub known: usize,
    pub unknown: usize,
}

impl Progress {
    /// Share of the whole collection marked known, in `[0, 1]`.
    pub fn known_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.known as f64 / self.total as f64
        }
    }
}

pub struct Session<S: CardStore> {
    repository: Repository<S>,
    filter: Filter,
    cursor: Cursor,
}

impl<S: CardStore> Session<S> {
    pub fn open(store: S) -> Self {
        Self {
            repository: Repository::open(store),
            filter: Filter::default(),
            cursor: Cursor::new(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        self.repository.cards()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn visible_cards(&self) -> Vec<&Card> {
        visible(self.repository.cards(), &self.filter)
    }

    pub fn tags(&self) -> Vec<String> {
        tag_index(self.repository.cards())
    }

    pub fn current_index(&self) -> usize {
        self.cursor.effective_index(self.visible_len())
    }

    pub fn current(&self) -> Option<&Card> {
        self.visible_cards().get(self.current_index()).copied()
    }

    pub fn is_flipped(&self) -> bool {
        self.cursor.is_flipped()
    }

    pub fn progress(&self) -> Progress {
        let visible = self.visible_len();
        let mut progress = Progress {
            position: if visible == 0 {
                0
            } else {
                self.current_index() + 1
            },
            visible,
            total: self.cards().len(),
            ..Progress::default()
        };
        for card in self.cards() {
            match card.proficiency {
                Proficiency::New => progress.new += 1,
                Proficiency::Known => progress.known += 1,
                Proficiency::Unknown => progress.unknown += 1,
            }
        }
        progress
    }

    // Navigation

    pub fn next(&mut self) {
        let len = self.visible_len();
        self.cursor.next(len);
    }

    pub fn prev(&mut self) {
        let len = self.visible_len();
        self.cursor.prev(len);
    }

    pub fn flip(&mut self) {
        self.cursor.flip();
    }

    /// Turn the current card face up now; the move itself happens in
    /// [`Session::commit_advance`].
    pub fn begin_advance(&mut self, direction: Direction) {
        self.cursor.begin_advance(direction);
    }

    pub fn commit_advance(&mut self) -> bool {
        let len = self.visible_len();
        self.cursor.commit_advance(len)
    }

    // Filtering

    /// Changing the filter always restarts from the first visible card.
    pub fn set_filter(&mut self, filter: Filter) {
        log::debug!(
            "Filter set to proficiency={} tag={:?}",
            filter.proficiency,
            filter.tag
        );
        self.filter = filter;
        self.cursor.reset();
    }

    pub fn set_proficiency_filter(&mut self, proficiency: ProficiencyFilter) {
        let tag = self.filter.tag.clone();
        self.set_filter(Filter::new(proficiency, tag));
    }

    pub fn set_tag_filter(&mut self, tag: Option<String>) {
        self.set_filter(Filter::new(self.filter.proficiency, tag));
    }

    // Mutations

    /// Set a card's mastery and reconcile the cursor. Returns false if no
    /// card has this id.
    pub fn mark(&mut self, id: &CardId, proficiency: Proficiency) -> bool {
        let old_len = self.visible_len();
        let was_visible = self.is_visible(id);
        if !self.repository.set_proficiency(id, proficiency) {
            return false;
        }
        let still_visible = self.is_visible(id);
        let new_len = self.visible_len();
        after_mark(was_visible, still_visible).apply(&mut self.cursor, old_len, new_len);
        true
    }

    pub fn mark_current(&mut self, proficiency: Proficiency) -> bool {
        match self.current().map(|c| c.id().clone()) {
            Some(id) => self.mark(&id, proficiency),
            None => false,
        }
    }

    /// Delete a card and reconcile the cursor. Returns false if no card has
    /// this id.
    pub fn delete(&mut self, id: &CardId) -> bool {
        let old_len = self.visible_len();
        let was_visible = self.is_visible(id);
        if !self.repository.remove(id) {
            return false;
        }
        let new_len = self.visible_len();
        after_delete(was_visible).apply(&mut self.cursor, old_len, new_len);
        true
    }

    pub fn delete_current(&mut self) -> bool {
        match self.current().map(|c| c.id().clone()) {
            Some(id) => self.delete(&id),
            None => false,
        }
    }

    /// Replace a card's content. The cursor keeps its raw position.
    pub fn update(&mut self, card: Card) -> Result<bool, ValidationError> {
        self.repository.update(card)
    }

    pub fn replace_all(&mut self, drafts: Vec<CardDraft>) -> Result<(), ValidationError> {
        self.repository.replace_all(drafts)?;
        self.cursor.reset();
        Ok(())
    }

    pub fn append(&mut self, drafts: Vec<CardDraft>) -> Result<usize, ValidationError> {
        self.repository.append(drafts)
    }

    pub fn shuffle(&mut self, rng: &mut TinyRng) {
        self.repository.shuffle(rng);
        self.cursor.reset();
    }

    pub fn reset(&mut self) {
        self.repository.reset();
        self.cursor.reset();
    }

    pub fn take_persistence_error(&mut self) -> Option<PersistenceError> {
        self.repository.take_persistence_error()
    }

    fn visible_len(&self) -> usize {
        self.visible_cards().len()
    }

    fn is_visible(&self, id: &CardId) -> bool {
        self.repository
            .get(id)
            .is_some_and(|card| self.filter.matches(card))
    }
}
