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

use std::collections::HashSet;

use crate::error::PersistenceError;
use crate::error::ValidationError;
use crate::import::CardDraft;
use crate::import::normalize;
use crate::import::revalidate;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::seed::seed_cards;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::card::Proficiency;

/// The authoritative in-memory collection.
///
/// Every mutation is forwarded to the store right away. A failed save never
/// undoes the mutation: it is logged and held until the caller collects it
/// with [`Repository::take_persistence_error`].
pub struct Repository<S: CardStore> {
    cards: Vec<Card>,
    store: S,
    persistence_error: Option<PersistenceError>,
    /// Set when the store could not be read. Saving would overwrite
    /// whatever it holds with the seed deck.
    detached: bool,
}

impl<S: CardStore> Repository<S> {
    /// Load the collection from `store`. Stored cards that fail validation
    /// are dropped and reported. If the store cannot be read at all, the
    /// seed deck is shown but nothing is saved until the collection is
    /// replaced or reset.
    pub fn open(store: S) -> Self {
        let mut repository = Self {
            cards: Vec::new(),
            store,
            persistence_error: None,
            detached: false,
        };
        repository.cards = match repository.store.load() {
            Ok(stored) => {
                let (cards, dropped) = restore(stored);
                if !dropped.is_empty() {
                    repository.report(PersistenceError::new(format!(
                        "dropped {} invalid stored cards at positions {dropped:?}",
                        dropped.len()
                    )));
                }
                cards
            }
            Err(e) => {
                repository.report(e);
                repository.detached = true;
                seed_cards()
            }
        };
        log::debug!("Opened collection with {} cards", repository.cards.len());
        repository
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the whole collection. Nothing changes if any draft is
    /// invalid.
    pub fn replace_all(&mut self, drafts: Vec<CardDraft>) -> Result<(), ValidationError> {
        let cards = normalize(drafts, &HashSet::new())?;
        log::info!("Replacing collection with {} cards", cards.len());
        self.cards = cards;
        self.detached = false;
        self.persist();
        Ok(())
    }

    /// Add cards after the existing ones. Returns how many were added.
    pub fn append(&mut self, drafts: Vec<CardDraft>) -> Result<usize, ValidationError> {
        let taken: HashSet<CardId> = self.cards.iter().map(|c| c.id().clone()).collect();
        let cards = normalize(drafts, &taken)?;
        let added = cards.len();
        log::info!("Appending {added} cards");
        self.cards.extend(cards);
        self.persist();
        Ok(added)
    }

    /// Replace the card with the same id. Returns false if there is none.
    pub fn update(&mut self, card: Card) -> Result<bool, ValidationError> {
        let card = revalidate(card)?;
        match self.cards.iter_mut().find(|c| c.id() == card.id()) {
            Some(slot) => {
                *slot = card;
                self.persist();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_proficiency(&mut self, id: &CardId, proficiency: Proficiency) -> bool {
        match self.cards.iter_mut().find(|c| c.id() == id) {
            Some(card) => {
                card.proficiency = proficiency;
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Returns false if no card has this id.
    pub fn remove(&mut self, id: &CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id() != id);
        if self.cards.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn shuffle(&mut self, rng: &mut TinyRng) {
        shuffle(&mut self.cards, rng);
        self.persist();
    }

    /// Discard the stored collection and start over from the seed deck.
    pub fn reset(&mut self) {
        self.cards = match self.store.reset() {
            Ok(cards) => cards,
            Err(e) => {
                self.report(e);
                seed_cards()
            }
        };
        log::info!("Collection reset to {} seed cards", self.cards.len());
        self.detached = false;
        self.persist();
    }

    /// The oldest unreported persistence failure, if any. Each failure is
    /// handed out once.
    pub fn take_persistence_error(&mut self) -> Option<PersistenceError> {
        self.persistence_error.take()
    }

    fn persist(&mut self) {
        if self.detached {
            log::debug!("Store unreadable, not saving");
            return;
        }
        if let Err(e) = self.store.save(&self.cards) {
            self.report(e);
        }
    }

    fn report(&mut self, error: PersistenceError) {
        log::warn!("Card store failure: {error}");
        if self.persistence_error.is_none() {
            self.persistence_error = Some(error);
        }
    }
}

/// Re-check stored cards one at a time. Returns the valid cards and the
/// positions of the ones dropped.
fn restore(stored: Vec<Card>) -> (Vec<Card>, Vec<usize>) {
    let mut taken: HashSet<CardId> = HashSet::new();
    let mut cards = Vec::with_capacity(stored.len());
    let mut dropped = Vec::new();
    for (index, card) in stored.into_iter().enumerate() {
        match normalize(vec![CardDraft::from(card)], &taken) {
            Ok(mut restored) => {
                let card = restored.remove(0);
                taken.insert(card.id().clone());
                cards.push(card);
            }
            Err(e) => {
                log::warn!("Dropping stored card {index}: {e}");
                dropped.push(index);
            }
        }
    }
    (cards, dropped)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::store::MemoryStore;

    /// A store whose saves fail while `failing` is set.
    #[derive(Default)]
    pub(crate) struct FlakyStore {
        pub(crate) inner: MemoryStore,
        pub(crate) failing: bool,
        pub(crate) attempts: Cell<usize>,
    }

    impl CardStore for FlakyStore {
        fn load(&self) -> Result<Vec<Card>, PersistenceError> {
            self.inner.load()
        }

        fn save(&mut self, cards: &[Card]) -> Result<(), PersistenceError> {
            self.attempts.set(self.attempts.get() + 1);
            if self.failing {
                return Err(PersistenceError::new("disk full"));
            }
            self.inner.save(cards)
        }

        fn reset(&mut self) -> Result<Vec<Card>, PersistenceError> {
            self.inner.reset()
        }
    }

    #[derive(Default)]
    struct UnreadableStore {
        saves: usize,
    }

    impl CardStore for UnreadableStore {
        fn load(&self) -> Result<Vec<Card>, PersistenceError> {
            Err(PersistenceError::new("corrupt"))
        }

        fn save(&mut self, _cards: &[Card]) -> Result<(), PersistenceError> {
            self.saves += 1;
            Ok(())
        }

        fn reset(&mut self) -> Result<Vec<Card>, PersistenceError> {
            Ok(seed_cards())
        }
    }

    fn empty_repository() -> Repository<MemoryStore> {
        Repository::open(MemoryStore::with_cards(Vec::new()))
    }

    fn drafts(n: usize) -> Vec<CardDraft> {
        (0..n)
            .map(|i| CardDraft::new(format!("Q{i}"), format!("A{i}")))
            .collect()
    }

    fn ids<S: CardStore>(repository: &Repository<S>) -> Vec<CardId> {
        repository.cards().iter().map(|c| c.id().clone()).collect()
    }

    #[test]
    fn test_open_uses_seed_when_nothing_saved() {
        let repository = Repository::open(MemoryStore::new());
        assert_eq!(repository.cards(), seed_cards().as_slice());
    }

    #[test]
    fn test_open_falls_back_on_load_failure() {
        let mut repository = Repository::open(UnreadableStore::default());
        assert_eq!(repository.cards(), seed_cards().as_slice());
        assert_eq!(
            repository.take_persistence_error(),
            Some(PersistenceError::new("corrupt"))
        );
    }

    #[test]
    fn test_unreadable_store_is_not_overwritten() -> Result<(), ValidationError> {
        let mut repository = Repository::open(UnreadableStore::default());
        let id = repository.cards()[0].id().clone();
        assert!(repository.set_proficiency(&id, Proficiency::Known));
        repository.shuffle(&mut TinyRng::from_seed(1));
        assert_eq!(repository.store().saves, 0);
        // An explicit import takes over the store again.
        repository.replace_all(drafts(2))?;
        assert_eq!(repository.store().saves, 1);
        Ok(())
    }

    #[test]
    fn test_open_drops_only_invalid_stored_cards() {
        let mut stored: Vec<Card> = (0..50)
            .map(|i| Card::new(CardId::new(format!("c{i}")), "", format!("Q{i}"), "A"))
            .collect();
        stored.insert(20, Card::new(CardId::new("legacy"), "", "", "A"));
        let expected: Vec<CardId> = (0..50).map(|i| CardId::new(format!("c{i}"))).collect();

        let mut repository = Repository::open(MemoryStore::with_cards(stored));
        assert_eq!(ids(&repository), expected);
        let error = repository.take_persistence_error();
        assert!(error.is_some_and(|e| e.to_string().contains("[20]")));

        assert!(repository.set_proficiency(&expected[0], Proficiency::Known));
        let saved = repository.store().saved().unwrap_or_default();
        let saved_ids: Vec<CardId> = saved.iter().map(|c| c.id().clone()).collect();
        assert_eq!(saved_ids, expected);
        assert_eq!(saved[0].proficiency, Proficiency::Known);
    }

    #[test]
    fn test_open_repairs_duplicate_ids() {
        let dup = Card::new(CardId::new("x"), "", "Q", "A");
        let repository = Repository::open(MemoryStore::with_cards(vec![dup.clone(), dup]));
        let ids = ids(&repository);
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_replace_all_normalizes() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        let mut batch = drafts(3);
        batch[1].tags = Some(Vec::new());
        batch[2].tags = Some(vec!["verbs".to_string()]);
        repository.replace_all(batch)?;
        let cards = repository.cards();
        assert_eq!(cards.len(), 3);
        let unique: HashSet<&CardId> = cards.iter().map(|c| c.id()).collect();
        assert_eq!(unique.len(), 3);
        assert!(cards.iter().all(|c| !c.id().as_str().is_empty()));
        assert!(cards.iter().all(|c| c.proficiency == Proficiency::New));
        assert_eq!(cards[1].tags, None);
        assert_eq!(cards[2].tags, Some(vec!["verbs".to_string()]));
        assert_eq!(repository.store().saved(), Some(cards));
        Ok(())
    }

    #[test]
    fn test_replace_all_is_atomic() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        repository.replace_all(drafts(2))?;
        let before = repository.cards().to_vec();
        let mut batch = drafts(3);
        batch[2].question = None;
        let result = repository.replace_all(batch);
        assert_eq!(
            result,
            Err(ValidationError::invalid_field(2, "question", "is required"))
        );
        assert_eq!(repository.cards(), before.as_slice());
        assert_eq!(repository.store().save_count(), 1);
        Ok(())
    }

    #[test]
    fn test_append_preserves_existing() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        repository.replace_all(drafts(3))?;
        let existing = ids(&repository);
        let mut batch = drafts(2);
        // Colliding id gets replaced.
        batch[0].id = Some(existing[0].to_string());
        let added = repository.append(batch)?;
        assert_eq!(added, 2);
        let merged = ids(&repository);
        assert_eq!(merged.len(), 5);
        assert_eq!(&merged[..3], existing.as_slice());
        let unique: HashSet<&CardId> = merged.iter().collect();
        assert_eq!(unique.len(), 5);
        Ok(())
    }

    #[test]
    fn test_append_rejects_invalid_batch() {
        let mut repository = empty_repository();
        let mut batch = drafts(2);
        batch[0].answer = Some(String::new());
        assert!(repository.append(batch).is_err());
        assert!(repository.cards().is_empty());
    }

    #[test]
    fn test_update() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        repository.replace_all(drafts(2))?;
        let mut card = repository.cards()[1].clone();
        card.answer = "changed".to_string();
        card.tags = Some(Vec::new());
        assert!(repository.update(card.clone())?);
        assert_eq!(repository.cards()[1].answer, "changed");
        assert_eq!(repository.cards()[1].tags, None);

        let stranger = Card::new(CardId::new("nope"), "", "Q", "A");
        assert!(!repository.update(stranger)?);
        assert_eq!(repository.cards().len(), 2);

        card.question = String::new();
        assert!(repository.update(card).is_err());
        Ok(())
    }

    #[test]
    fn test_remove() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        repository.replace_all(drafts(3))?;
        let target = repository.cards()[1].id().clone();
        assert!(repository.remove(&target));
        assert!(repository.get(&target).is_none());
        assert_eq!(repository.cards().len(), 2);
        assert!(!repository.remove(&target));
        Ok(())
    }

    #[test]
    fn test_set_proficiency() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        repository.replace_all(drafts(1))?;
        let id = repository.cards()[0].id().clone();
        assert!(repository.set_proficiency(&id, Proficiency::Known));
        assert_eq!(repository.cards()[0].proficiency, Proficiency::Known);
        assert!(!repository.set_proficiency(&CardId::new("nope"), Proficiency::Known));
        Ok(())
    }

    #[test]
    fn test_shuffle_keeps_cards() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        repository.replace_all(drafts(5))?;
        let mut before = repository.cards().to_vec();
        repository.shuffle(&mut TinyRng::from_seed(3));
        let mut after = repository.cards().to_vec();
        assert_eq!(after.len(), 5);
        before.sort_by(|a, b| a.id().cmp(b.id()));
        after.sort_by(|a, b| a.id().cmp(b.id()));
        assert_eq!(before, after);
        Ok(())
    }

    #[test]
    fn test_reset_restores_seed_and_persists() -> Result<(), ValidationError> {
        let mut repository = empty_repository();
        repository.replace_all(drafts(2))?;
        repository.reset();
        assert_eq!(repository.cards(), seed_cards().as_slice());
        assert_eq!(repository.store().saved(), Some(seed_cards().as_slice()));
        Ok(())
    }

    #[test]
    fn test_save_failure_keeps_memory_state() -> Result<(), ValidationError> {
        let store = FlakyStore {
            failing: true,
            ..FlakyStore::default()
        };
        let mut repository = Repository::open(store);
        repository.replace_all(drafts(2))?;
        repository.append(drafts(1))?;
        assert_eq!(repository.cards().len(), 3);
        assert_eq!(repository.store().attempts.get(), 2);
        // Reported once, then cleared.
        assert_eq!(
            repository.take_persistence_error(),
            Some(PersistenceError::new("disk full"))
        );
        assert_eq!(repository.take_persistence_error(), None);
        Ok(())
    }
}
