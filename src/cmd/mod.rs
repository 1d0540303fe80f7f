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

pub mod export;
pub mod import;
pub mod list;
pub mod reset;
pub mod stats;
pub mod study;

use std::path::Path;

use flashdeck_core::Fallible;
use flashdeck_core::Session;

use crate::store::SqliteStore;

/// Open the collection in `database`. A collection that cannot be read
/// falls back to the seed deck, and the failure is left pending on the
/// session.
pub fn open_session(database: &Path) -> Fallible<Session<SqliteStore>> {
    let store = SqliteStore::open(database)?;
    Ok(Session::open(store))
}

/// Turn a pending storage failure into an error.
pub fn check_persisted(session: &mut Session<SqliteStore>) -> Fallible<()> {
    match session.take_persistence_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
