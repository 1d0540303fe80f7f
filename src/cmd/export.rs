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

use std::fs::write;
use std::path::Path;

use flashdeck_core::Fallible;

use crate::cmd::check_persisted;
use crate::cmd::open_session;

/// Write the collection as an import document, to `output` or stdout.
pub fn export_collection(database: &Path, output: Option<String>) -> Fallible<()> {
    let mut session = open_session(database)?;
    check_persisted(&mut session)?;
    let json = serde_json::to_string_pretty(session.cards())?;
    match output {
        Some(path) => {
            write(&path, json)?;
            log::info!("Exported {} cards to {path}", session.cards().len());
        }
        None => println!("{json}"),
    }
    Ok(())
}
