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

//! WASM bindings for flashdeck: runs a study session in the browser, backed
//! by localStorage.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

use flashdeck_core::Card;
use flashdeck_core::CardId;
use flashdeck_core::Direction;
use flashdeck_core::Filter;
use flashdeck_core::PersistenceError;
use flashdeck_core::Proficiency;
use flashdeck_core::ProficiencyFilter;
use flashdeck_core::Session;
use flashdeck_core::parse_import;
use flashdeck_core::rng::TinyRng;

mod storage;

use storage::LocalStorageStore;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"flashdeck WASM initialized".into());
}

/// A card as the page renders it.
#[derive(Serialize)]
struct CardView<'a> {
    id: &'a str,
    category: &'a str,
    question_html: String,
    answer_html: String,
    details_html: Vec<String>,
    tags: &'a [String],
    proficiency: Proficiency,
    flipped: bool,
}

impl<'a> CardView<'a> {
    fn new(card: &'a Card, flipped: bool) -> Self {
        Self {
            id: card.id().as_str(),
            category: &card.category,
            question_html: card.html_question(),
            answer_html: card.html_answer(),
            details_html: card.html_details(),
            tags: card.tags(),
            proficiency: card.proficiency,
            flipped,
        }
    }
}

/// The study session managed from JavaScript.
#[wasm_bindgen]
pub struct FlashdeckApp {
    session: Session<LocalStorageStore>,
    /// Storage failure already logged but not yet shown to the user.
    unreported: Option<PersistenceError>,
}

#[wasm_bindgen]
impl FlashdeckApp {
    /// Restore the saved collection, or start from the seed deck.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let mut app = Self {
            session: Session::open(LocalStorageStore::new()),
            unreported: None,
        };
        app.warn_persistence();
        app
    }

    /// Replace the whole collection with the cards in `json`. Nothing
    /// changes if any card is invalid.
    #[wasm_bindgen]
    pub fn import_cards(&mut self, json: &str) -> Result<usize, JsValue> {
        let drafts = parse_import(json).map_err(to_js)?;
        let count = drafts.len();
        self.session.replace_all(drafts).map_err(to_js)?;
        self.warn_persistence();
        Ok(count)
    }

    /// Add the cards in `json` to the collection.
    #[wasm_bindgen]
    pub fn append_cards(&mut self, json: &str) -> Result<usize, JsValue> {
        let drafts = parse_import(json).map_err(to_js)?;
        let count = self.session.append(drafts).map_err(to_js)?;
        self.warn_persistence();
        Ok(count)
    }

    /// The whole collection in the import format.
    #[wasm_bindgen]
    pub fn export_cards(&self) -> Result<String, JsValue> {
        serde_json::to_string_pretty(self.session.cards()).map_err(to_js)
    }

    /// The card under the cursor, or `null` if the view is empty.
    #[wasm_bindgen]
    pub fn current_card_json(&self) -> Result<String, JsValue> {
        let view = self
            .session
            .current()
            .map(|card| CardView::new(card, self.session.is_flipped()));
        serde_json::to_string(&view).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn visible_cards_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.visible_cards()).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn tags_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.tags()).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn progress_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.progress()).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn next(&mut self) {
        self.session.next();
    }

    #[wasm_bindgen]
    pub fn prev(&mut self) {
        self.session.prev();
    }

    #[wasm_bindgen]
    pub fn flip(&mut self) {
        self.session.flip();
    }

    /// Turn the card face up before an animated move. `direction` is
    /// "forward" or "backward".
    #[wasm_bindgen]
    pub fn begin_advance(&mut self, direction: &str) -> Result<(), JsValue> {
        let direction = match direction {
            "forward" => Direction::Forward,
            "backward" => Direction::Backward,
            _ => {
                return Err(JsValue::from_str(&format!(
                    "Invalid direction: {direction}"
                )));
            }
        };
        self.session.begin_advance(direction);
        Ok(())
    }

    /// Finish the pending move. Returns false if it was cancelled.
    #[wasm_bindgen]
    pub fn commit_advance(&mut self) -> bool {
        self.session.commit_advance()
    }

    /// An empty `tag` clears the tag filter.
    #[wasm_bindgen]
    pub fn set_filter(&mut self, proficiency: &str, tag: Option<String>) -> Result<(), JsValue> {
        let proficiency: ProficiencyFilter = proficiency.parse().map_err(to_js)?;
        self.session.set_filter(Filter::new(proficiency, tag));
        Ok(())
    }

    /// Set the mastery of card `id`. Returns false if no card has this id.
    #[wasm_bindgen]
    pub fn mark(&mut self, id: &str, proficiency: &str) -> Result<bool, JsValue> {
        let proficiency: Proficiency = proficiency.parse().map_err(to_js)?;
        let found = self.session.mark(&CardId::new(id), proficiency);
        self.warn_persistence();
        Ok(found)
    }

    #[wasm_bindgen]
    pub fn delete(&mut self, id: &str) -> bool {
        let found = self.session.delete(&CardId::new(id));
        self.warn_persistence();
        found
    }

    #[wasm_bindgen]
    pub fn shuffle(&mut self) {
        let mut rng = TinyRng::from_seed(js_sys::Date::now() as u64);
        self.session.shuffle(&mut rng);
        self.warn_persistence();
    }

    /// Discard the saved collection and restore the seed deck.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset();
        self.warn_persistence();
    }

    /// The first storage failure not yet shown to the user, if any.
    #[wasm_bindgen]
    pub fn take_persistence_error(&mut self) -> Option<String> {
        self.warn_persistence();
        self.unreported.take().map(|e| e.to_string())
    }
}

impl FlashdeckApp {
    /// Log a new storage failure to the console. Only the first one is
    /// kept until the page asks for it.
    fn warn_persistence(&mut self) {
        if let Some(error) = self.session.take_persistence_error() {
            console::warn_1(&error.to_string().into());
            self.unreported.get_or_insert(error);
        }
    }
}

impl Default for FlashdeckApp {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}
