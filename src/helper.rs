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
use std::path::PathBuf;

use flashdeck_core::Fallible;
use tempfile::TempDir;
use tempfile::tempdir;

/// A scratch directory holding a database path and a few import files.
pub struct Scratch {
    pub dir: TempDir,
}

impl Scratch {
    pub fn new() -> Fallible<Self> {
        Ok(Self { dir: tempdir()? })
    }

    pub fn database(&self) -> PathBuf {
        self.dir.path().join("flashdeck.db")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `name` inside the scratch directory.
    pub fn write(&self, name: &str, contents: &str) -> Fallible<PathBuf> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write(&path, contents)?;
        Ok(path)
    }
}

pub const GEOGRAPHY: &str = r#"[
    {"id": "paris", "category": "Geography", "question": "Capital of France?", "answer": "Paris", "tags": ["europe"]},
    {"id": "lima", "category": "Geography", "question": "Capital of Peru?", "answer": "Lima", "tags": ["americas"], "proficiency": "known"}
]"#;

pub const CHEMISTRY: &str = r#"[
    {"question": "Symbol for gold?", "answer": "Au", "tags": ["elements"], "details": ["From the Latin *aurum*."]}
]"#;

pub fn path_string(path: &Path) -> String {
    path.display().to_string()
}
