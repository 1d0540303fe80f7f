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

//! Browser localStorage as a card store.

use flashdeck_core::Card;
use flashdeck_core::CardStore;
use flashdeck_core::PersistenceError;
use flashdeck_core::Timestamp;
use flashdeck_core::seed::seed_cards;
use flashdeck_core::store::STORAGE_KEY;
use flashdeck_core::store::decode_snapshot;
use flashdeck_core::store::encode_snapshot;
use wasm_bindgen::prelude::*;
use web_sys::Storage as WebStorage;

pub struct LocalStorageStore {
    inner: Option<WebStorage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { inner }
    }

    fn storage(&self) -> Result<&WebStorage, PersistenceError> {
        self.inner
            .as_ref()
            .ok_or_else(|| PersistenceError::new("localStorage is not available"))
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CardStore for LocalStorageStore {
    fn load(&self) -> Result<Vec<Card>, PersistenceError> {
        // Without storage there is nothing to restore; start from the seed.
        let Some(storage) = &self.inner else {
            return Ok(seed_cards());
        };
        match storage.get_item(STORAGE_KEY).map_err(js_error)? {
            Some(text) => decode_snapshot(&text),
            None => Ok(seed_cards()),
        }
    }

    fn save(&mut self, cards: &[Card]) -> Result<(), PersistenceError> {
        let text = encode_snapshot(cards, now()?)?;
        self.storage()?
            .set_item(STORAGE_KEY, &text)
            .map_err(js_error)
    }

    fn reset(&mut self) -> Result<Vec<Card>, PersistenceError> {
        self.storage()?.remove_item(STORAGE_KEY).map_err(js_error)?;
        Ok(seed_cards())
    }
}

/// localStorage throws a `DOMException` when the quota is exceeded.
fn js_error(value: JsValue) -> PersistenceError {
    let message = value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"));
    PersistenceError::new(format!("localStorage: {message}"))
}

/// The browser's local time as a timestamp.
fn now() -> Result<Timestamp, PersistenceError> {
    let date = js_sys::Date::new_0();
    let text = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds(),
        date.get_milliseconds()
    );
    Timestamp::try_from(text).map_err(|e| PersistenceError::new(e.to_string()))
}
