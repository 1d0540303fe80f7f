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

//! The built-in deck restored by a reset.

use crate::types::card::Card;
use crate::types::card::CardId;

struct SeedCard {
    id: &'static str,
    category: &'static str,
    question: &'static str,
    answer: &'static str,
    details: &'static [&'static str],
    tags: &'static [&'static str],
}

const SEED: &[SeedCard] = &[
    SeedCard {
        id: "seed-ownership",
        category: "Rust",
        question: "What are the three ownership rules?",
        answer: "Each value has one owner; there is only one owner at a time; the value is dropped when the owner goes out of scope.",
        details: &[
            "Assignment of a non-`Copy` value moves ownership.",
            "`Clone` makes an explicit deep copy.",
        ],
        tags: &["ownership", "basics"],
    },
    SeedCard {
        id: "seed-borrowing",
        category: "Rust",
        question: "What does the borrow checker guarantee about references?",
        answer: "Any number of shared references, or exactly one mutable reference, but never both at once.",
        details: &["References must never outlive their referent."],
        tags: &["ownership", "borrowing"],
    },
    SeedCard {
        id: "seed-option",
        category: "Rust",
        question: "What replaces null in Rust?",
        answer: "`Option<T>`, with the variants `Some(T)` and `None`.",
        details: &[],
        tags: &["basics", "types"],
    },
    SeedCard {
        id: "seed-question-mark",
        category: "Rust",
        question: "What does the `?` operator do?",
        answer: "Returns early with the error (converted via `From`) if the `Result` is `Err`, otherwise unwraps the `Ok` value.",
        details: &["Also works on `Option`, returning `None` early."],
        tags: &["errors"],
    },
    SeedCard {
        id: "seed-trait-object",
        category: "Rust",
        question: "What is a trait object?",
        answer: "A `dyn Trait` value behind a pointer, dispatched dynamically through a vtable.",
        details: &[
            "Only object-safe traits can be made into trait objects.",
        ],
        tags: &["traits", "types"],
    },
    SeedCard {
        id: "seed-send-sync",
        category: "Rust",
        question: "What is the difference between `Send` and `Sync`?",
        answer: "`Send` types can be moved to another thread; `Sync` types can be shared between threads by reference.",
        details: &["`T` is `Sync` if and only if `&T` is `Send`."],
        tags: &["concurrency", "traits"],
    },
    SeedCard {
        id: "seed-lifetime-elision",
        category: "Rust",
        question: "When can lifetime annotations be omitted on a function?",
        answer: "When the elision rules apply: each input reference gets its own lifetime, and a single input lifetime (or `&self`) is assigned to all outputs.",
        details: &[],
        tags: &["borrowing", "lifetimes"],
    },
    SeedCard {
        id: "seed-cargo-workspace",
        category: "Cargo",
        question: "What do crates in a Cargo workspace share?",
        answer: "A single `Cargo.lock` and a single `target` directory.",
        details: &[],
        tags: &[],
    },
];

/// The seed deck, in display order. Every card starts out `new`.
pub fn seed_cards() -> Vec<Card> {
    SEED.iter()
        .map(|s| {
            Card::new(CardId::new(s.id), s.category, s.question, s.answer)
                .with_details(s.details.iter().map(|d| d.to_string()).collect())
                .with_tags(s.tags.iter().map(|t| t.to_string()).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::types::card::Proficiency;

    #[test]
    fn test_seed_ids_unique() {
        let cards = seed_cards();
        let ids: HashSet<&CardId> = cards.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), cards.len());
    }

    #[test]
    fn test_seed_is_normalized() {
        for card in seed_cards() {
            assert!(!card.question.is_empty());
            assert!(!card.answer.is_empty());
            assert_eq!(card.proficiency, Proficiency::New);
            assert_ne!(card.tags, Some(Vec::new()));
            assert_ne!(card.details, Some(Vec::new()));
        }
    }
}
