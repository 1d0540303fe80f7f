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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use flashdeck_core::ErrorReport;
use flashdeck_core::Fallible;
use flashdeck_core::Session;

use crate::store::SqliteStore;

#[derive(Clone)]
pub struct ServerState {
    /// How long `Next`/`Prev` wait between turning the card and moving.
    pub advance_delay: Duration,
    pub session: Arc<Mutex<Session<SqliteStore>>>,
}

impl ServerState {
    pub fn new(session: Session<SqliteStore>, advance_delay: Duration) -> Self {
        Self {
            advance_delay,
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub fn lock(&self) -> Fallible<MutexGuard<'_, Session<SqliteStore>>> {
        self.session
            .lock()
            .map_err(|_| ErrorReport::new("session state is poisoned."))
    }
}
