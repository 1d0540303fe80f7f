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

use flashdeck_core::Fallible;

use crate::cmd::check_persisted;
use crate::cmd::open_session;

/// Discard the stored collection and go back to the seed deck.
pub fn reset_collection(database: &Path) -> Fallible<()> {
    let mut session = open_session(database)?;
    // An unreadable collection is exactly what a reset is for.
    session.take_persistence_error();
    session.reset();
    check_persisted(&mut session)?;
    println!("Collection reset. {} cards.", session.cards().len());
    Ok(())
}
