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

//! flashdeck-core: the study-session engine behind flashdeck.
//!
//! This library is free of I/O and provides:
//! - The card data model and bulk-import normalization
//! - The card store contract and an in-memory store
//! - The card repository, tag index and view filter
//! - The session cursor and the policy reconciling it with mutations
//! - Markdown to HTML rendering of card text

pub mod cursor;
pub mod error;
pub mod filter;
pub mod import;
pub mod markdown;
pub mod reconcile;
pub mod repository;
pub mod rng;
pub mod seed;
pub mod session;
pub mod store;
pub mod tags;
pub mod types;

// Re-exports for convenience
pub use cursor::Direction;
pub use error::{ErrorReport, Fallible, PersistenceError, ValidationError, fail};
pub use filter::{Filter, ProficiencyFilter, visible};
pub use import::{CardDraft, parse_import};
pub use session::{Progress, Session};
pub use store::{CardStore, MemoryStore};
pub use tags::tag_index;
pub use types::card::{Card, CardId, Proficiency};
pub use types::timestamp::Timestamp;
