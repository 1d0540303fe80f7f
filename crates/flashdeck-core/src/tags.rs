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

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::types::card::Card;

/// Every distinct tag in the collection, in lexicographic order.
pub fn tag_index(cards: &[Card]) -> Vec<String> {
    let tags: BTreeSet<&str> = cards
        .iter()
        .flat_map(|card| card.tags())
        .map(String::as_str)
        .collect();
    tags.into_iter().map(str::to_string).collect()
}

/// Like [`tag_index`], paired with the number of cards carrying each tag.
pub fn tag_counts(cards: &[Card]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for tag in cards.iter().flat_map(|card| card.tags()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect()
}
