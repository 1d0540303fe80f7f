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

use flashdeck_core::Card;
use flashdeck_core::Fallible;
use flashdeck_core::Filter;
use flashdeck_core::ProficiencyFilter;

use crate::cmd::check_persisted;
use crate::cmd::open_session;

/// Print the cards visible under the given filter.
pub fn list_cards(
    database: &Path,
    proficiency: ProficiencyFilter,
    tag: Option<String>,
) -> Fallible<()> {
    let mut session = open_session(database)?;
    check_persisted(&mut session)?;
    session.set_filter(Filter::new(proficiency, tag));
    for card in session.visible_cards() {
        println!("{}", format_card(card));
    }
    Ok(())
}

/// Print every tag in the collection, one per line.
pub fn list_tags(database: &Path) -> Fallible<()> {
    let mut session = open_session(database)?;
    check_persisted(&mut session)?;
    for tag in session.tags() {
        println!("{tag}");
    }
    Ok(())
}

fn format_card(card: &Card) -> String {
    let mut line = format!("[{}] {}", card.proficiency, card.question);
    if !card.tags().is_empty() {
        let tags: Vec<String> = card.tags().iter().map(|t| format!("#{t}")).collect();
        line.push_str("  ");
        line.push_str(&tags.join(" "));
    }
    line
}
