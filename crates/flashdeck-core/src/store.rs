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

//! The card store contract, the snapshot format shared by the key-value
//! backed stores, and an in-memory store.

use serde::Deserialize;
use serde::Serialize;

use crate::error::PersistenceError;
use crate::seed::seed_cards;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// The key under which key-value stores keep the collection.
pub const STORAGE_KEY: &str = "flashdeck_cards";

const SNAPSHOT_VERSION: u32 = 1;

/// Durable persistence of the full collection. Every save overwrites the
/// previous snapshot.
pub trait CardStore {
    /// The last saved collection, or the seed deck if nothing was saved.
    fn load(&self) -> Result<Vec<Card>, PersistenceError>;

    fn save(&mut self, cards: &[Card]) -> Result<(), PersistenceError>;

    /// Clear persisted state and return the seed deck.
    fn reset(&mut self) -> Result<Vec<Card>, PersistenceError>;
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    saved_at: Timestamp,
    cards: &'a [Card],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Snapshot {
        version: u32,
        #[allow(dead_code)]
        saved_at: Option<Timestamp>,
        cards: Vec<Card>,
    },
    Legacy(Vec<Card>),
}

/// Serialize a collection into the stored snapshot format.
pub fn encode_snapshot(cards: &[Card], saved_at: Timestamp) -> Result<String, PersistenceError> {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        saved_at,
        cards,
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Parse a stored snapshot. A bare JSON array of cards is also accepted.
pub fn decode_snapshot(text: &str) -> Result<Vec<Card>, PersistenceError> {
    match serde_json::from_str::<Stored>(text) {
        Ok(Stored::Snapshot { version, cards, .. }) if version == SNAPSHOT_VERSION => Ok(cards),
        Ok(Stored::Snapshot { version, .. }) => Err(PersistenceError::new(format!(
            "unsupported snapshot version {version}"
        ))),
        Ok(Stored::Legacy(cards)) => Ok(cards),
        Err(_) => Err(PersistenceError::new(
            "stored card data is not a card snapshot",
        )),
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Option<Vec<Card>>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `cards`, as if saved by an earlier run.
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            saved: Some(cards),
            saves: 0,
        }
    }

    pub fn saved(&self) -> Option<&[Card]> {
        self.saved.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl CardStore for MemoryStore {
    fn load(&self) -> Result<Vec<Card>, PersistenceError> {
        Ok(self.saved.clone().unwrap_or_else(seed_cards))
    }

    fn save(&mut self, cards: &[Card]) -> Result<(), PersistenceError> {
        self.saved = Some(cards.to_vec());
        self.saves += 1;
        Ok(())
    }

    fn reset(&mut self) -> Result<Vec<Card>, PersistenceError> {
        self.saved = None;
        Ok(seed_cards())
    }
}
