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
use flashdeck_core::tags::tag_counts;

use crate::cmd::check_persisted;
use crate::cmd::open_session;

pub fn print_stats(database: &Path) -> Fallible<()> {
    let mut session = open_session(database)?;
    check_persisted(&mut session)?;
    let progress = session.progress();
    println!("Total cards: {}", progress.total);
    println!("New:         {}", progress.new);
    println!("Known:       {}", progress.known);
    println!("Unknown:     {}", progress.unknown);
    println!("Mastered:    {:.0}%", progress.known_ratio() * 100.0);
    let counts = tag_counts(session.cards());
    if !counts.is_empty() {
        println!();
        println!("Tags:");
        for (tag, count) in counts {
            println!("  {tag}: {count}");
        }
    }
    Ok(())
}
