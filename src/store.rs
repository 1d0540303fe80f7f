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

use std::path::Path;

use flashdeck_core::Card;
use flashdeck_core::CardStore;
use flashdeck_core::PersistenceError;
use flashdeck_core::Timestamp;
use flashdeck_core::seed::seed_cards;
use flashdeck_core::store::STORAGE_KEY;
use flashdeck_core::store::decode_snapshot;
use flashdeck_core::store::encode_snapshot;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

/// A card store backed by a single-table key-value SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `path`, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        log::debug!("Opening database {}", path.display());
        let conn = Connection::open(path).map_err(sqlite_error)?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory().map_err(sqlite_error)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, PersistenceError> {
        conn.execute_batch(
            "create table if not exists kv (
                key text primary key,
                value text not null
            );",
        )
        .map_err(sqlite_error)?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.conn
            .query_row("select value from kv where key = ?1;", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(sqlite_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.conn
            .execute(
                "insert into kv (key, value) values (?1, ?2)
                 on conflict (key) do update set value = excluded.value;",
                params![key, value],
            )
            .map_err(sqlite_error)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), PersistenceError> {
        self.conn
            .execute("delete from kv where key = ?1;", params![key])
            .map_err(sqlite_error)?;
        Ok(())
    }
}

impl CardStore for SqliteStore {
    fn load(&self) -> Result<Vec<Card>, PersistenceError> {
        match self.get(STORAGE_KEY)? {
            Some(text) => decode_snapshot(&text),
            None => Ok(seed_cards()),
        }
    }

    fn save(&mut self, cards: &[Card]) -> Result<(), PersistenceError> {
        let text = encode_snapshot(cards, Timestamp::now())?;
        self.set(STORAGE_KEY, &text)
    }

    fn reset(&mut self) -> Result<Vec<Card>, PersistenceError> {
        self.delete(STORAGE_KEY)?;
        Ok(seed_cards())
    }
}

fn sqlite_error(error: rusqlite::Error) -> PersistenceError {
    PersistenceError::new(format!("database error: {error}"))
}
