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

//! Bulk import of cards from JSON files.

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use flashdeck_core::CardDraft;
use flashdeck_core::ErrorReport;
use flashdeck_core::Fallible;
use flashdeck_core::fail;
use flashdeck_core::import::drafts_from_value;
use flashdeck_core::import::normalize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::cmd::check_persisted;
use crate::cmd::open_session;

/// Import every card found under `paths`. Each path is a JSON file or a
/// directory searched recursively for `*.json` files. Every file is
/// validated before the collection is touched.
pub fn import_cards(database: &Path, paths: Vec<String>, append: bool) -> Fallible<()> {
    let files = collect_files(&paths)?;
    if files.is_empty() {
        return fail("no JSON files to import.");
    }
    let mut drafts = Vec::new();
    for file in &files {
        drafts.extend(read_file(file)?);
    }
    let count = drafts.len();

    let mut session = open_session(database)?;
    // A collection that could not be loaded is being replaced anyway.
    if !append {
        session.take_persistence_error();
    }
    check_persisted(&mut session)?;
    if append {
        session.append(drafts)?;
    } else {
        session.replace_all(drafts)?;
    }
    check_persisted(&mut session)?;
    log::info!(
        "Imported {count} cards from {} files ({})",
        files.len(),
        if append { "appended" } else { "replaced" }
    );
    println!(
        "Imported {count} cards. The collection has {} cards.",
        session.cards().len()
    );
    Ok(())
}

/// Expand directories into the JSON files beneath them, in path order.
fn collect_files(paths: &[String]) -> Fallible<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = Path::new(path);
        if !path.exists() {
            return fail(format!("{} does not exist.", path.display()));
        }
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(path) {
                let entry = entry.map_err(|e| ErrorReport::new(e.to_string()))?;
                let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
                if entry.file_type().is_file() && is_json {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Parse and fully validate one file, naming it in any error.
fn read_file(path: &Path) -> Fallible<Vec<CardDraft>> {
    let text = read_to_string(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|e| {
        ErrorReport::new(format!("{}: malformed JSON: {e}", path.display()))
    })?;
    let drafts = drafts_from_value(&value)
        .map_err(|e| ErrorReport::new(format!("{}: {e}", path.display())))?;
    normalize(drafts.clone(), &HashSet::new())
        .map_err(|e| ErrorReport::new(format!("{}: {e}", path.display())))?;
    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use flashdeck_core::CardStore;
    use flashdeck_core::Proficiency;
    use flashdeck_core::seed::seed_cards;

    use super::*;
    use crate::helper::CHEMISTRY;
    use crate::helper::GEOGRAPHY;
    use crate::helper::Scratch;
    use crate::helper::path_string;
    use crate::store::SqliteStore;

    fn saved(scratch: &Scratch) -> Fallible<Vec<flashdeck_core::Card>> {
        Ok(SqliteStore::open(&scratch.database())?.load()?)
    }

    #[test]
    fn test_import_replaces_collection() -> Fallible<()> {
        let scratch = Scratch::new()?;
        let file = scratch.write("geo.json", GEOGRAPHY)?;
        import_cards(&scratch.database(), vec![path_string(&file)], false)?;
        let cards = saved(&scratch)?;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id().as_str(), "paris");
        assert_eq!(cards[1].proficiency, Proficiency::Known);
        Ok(())
    }

    #[test]
    fn test_import_append_keeps_existing() -> Fallible<()> {
        let scratch = Scratch::new()?;
        let file = scratch.write("chem.json", CHEMISTRY)?;
        import_cards(&scratch.database(), vec![path_string(&file)], true)?;
        let cards = saved(&scratch)?;
        let seed = seed_cards();
        assert_eq!(cards.len(), seed.len() + 1);
        assert_eq!(cards[..seed.len()], seed[..]);
        assert_eq!(cards[seed.len()].answer, "Au");
        Ok(())
    }

    #[test]
    fn test_import_directory() -> Fallible<()> {
        let scratch = Scratch::new()?;
        scratch.write("decks/a/geo.json", GEOGRAPHY)?;
        scratch.write("decks/b/chem.json", CHEMISTRY)?;
        scratch.write("decks/notes.txt", "not cards")?;
        let decks = scratch.path("decks");
        import_cards(&scratch.database(), vec![path_string(&decks)], false)?;
        let cards = saved(&scratch)?;
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2].question, "Symbol for gold?");
        Ok(())
    }

    #[test]
    fn test_one_bad_file_applies_nothing() -> Fallible<()> {
        let scratch = Scratch::new()?;
        let good = scratch.write("good.json", GEOGRAPHY)?;
        let bad = scratch.write("bad.json", r#"[{"question": "No answer?"}]"#)?;
        let result = import_cards(
            &scratch.database(),
            vec![path_string(&good), path_string(&bad)],
            false,
        );
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("bad.json"));
        assert!(err.contains("answer"));
        assert_eq!(saved(&scratch)?, seed_cards());
        Ok(())
    }

    #[test]
    fn test_malformed_json_is_rejected() -> Fallible<()> {
        let scratch = Scratch::new()?;
        let bad = scratch.write("bad.json", "[{")?;
        let result = import_cards(&scratch.database(), vec![path_string(&bad)], false);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_missing_path_is_rejected() -> Fallible<()> {
        let scratch = Scratch::new()?;
        let missing = scratch.path("missing.json");
        let result = import_cards(&scratch.database(), vec![path_string(&missing)], false);
        assert!(result.is_err());
        Ok(())
    }
}
