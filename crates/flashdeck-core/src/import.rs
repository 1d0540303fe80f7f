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

//! Bulk import: parsing untrusted JSON into drafts, and normalizing drafts
//! into cards.

use std::collections::HashSet;

use serde_json::Map;
use serde_json::Value;

use crate::error::Fallible;
use crate::error::ValidationError;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::card::Proficiency;
use crate::types::card::normalize_details;
use crate::types::card::normalize_tags;

/// A card as supplied by an import or an editor, before validation. Every
/// field may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardDraft {
    pub id: Option<String>,
    pub category: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub details: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub proficiency: Option<Proficiency>,
}

impl CardDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            answer: Some(answer.into()),
            ..Self::default()
        }
    }
}

impl From<Card> for CardDraft {
    fn from(card: Card) -> Self {
        Self {
            id: Some(card.id().to_string()),
            category: Some(card.category),
            question: Some(card.question),
            answer: Some(card.answer),
            details: card.details,
            tags: card.tags,
            proficiency: Some(card.proficiency),
        }
    }
}

/// Parse an import document. The document must be a JSON array of objects.
pub fn parse_import(text: &str) -> Fallible<Vec<CardDraft>> {
    let value: Value = serde_json::from_str(text)?;
    Ok(drafts_from_value(&value)?)
}

/// Type-check an already-parsed import document. Required fields are not
/// checked here; see [`normalize`].
pub fn drafts_from_value(value: &Value) -> Result<Vec<CardDraft>, ValidationError> {
    let items = value.as_array().ok_or(ValidationError::NotASequence)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item
                .as_object()
                .ok_or(ValidationError::NotAnObject { index })?;
            draft_from_object(index, obj)
        })
        .collect()
}

fn draft_from_object(index: usize, obj: &Map<String, Value>) -> Result<CardDraft, ValidationError> {
    let id = match obj.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        // Older exports used numeric ids.
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            return Err(ValidationError::invalid_field(
                index,
                "id",
                "must be a string",
            ));
        }
    };
    let proficiency = match optional_string(index, obj, "proficiency")? {
        None => None,
        Some(s) => Some(s.parse::<Proficiency>().map_err(|_| {
            ValidationError::invalid_field(
                index,
                "proficiency",
                "must be one of \"new\", \"known\", \"unknown\"",
            )
        })?),
    };
    Ok(CardDraft {
        id,
        category: optional_string(index, obj, "category")?,
        question: optional_string(index, obj, "question")?,
        answer: optional_string(index, obj, "answer")?,
        details: optional_strings(index, obj, "details")?,
        tags: optional_strings(index, obj, "tags")?,
        proficiency,
    })
}

fn optional_string(
    index: usize,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::invalid_field(
            index,
            field,
            "must be a string",
        )),
    }
}

fn optional_strings(
    index: usize,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<String>>, ValidationError> {
    let not_strings = || ValidationError::invalid_field(index, field, "must be a list of strings");
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(not_strings))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(not_strings()),
    }
}

/// Validate and normalize a batch of drafts into cards.
///
/// Ids already in `taken`, or repeated within the batch, are replaced by
/// fresh ones, as are missing ids. Fails on the first draft without a
/// question or answer; no card is produced in that case.
pub fn normalize(
    drafts: Vec<CardDraft>,
    taken: &HashSet<CardId>,
) -> Result<Vec<Card>, ValidationError> {
    let mut used: HashSet<CardId> = HashSet::new();
    let mut cards = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let question = required(index, "question", draft.question)?;
        let answer = required(index, "answer", draft.answer)?;
        let id = match draft.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => CardId::new(id),
            None => CardId::generate(),
        };
        let id = if taken.contains(&id) || used.contains(&id) {
            fresh_id(taken, &used)
        } else {
            id
        };
        used.insert(id.clone());
        let card = Card::new(id, draft.category.unwrap_or_default(), question, answer)
            .with_details(draft.details.unwrap_or_default())
            .with_tags(draft.tags.unwrap_or_default())
            .with_proficiency(draft.proficiency.unwrap_or_default());
        cards.push(card);
    }
    Ok(cards)
}

/// Re-check a single edited card, keeping its id.
pub fn revalidate(card: Card) -> Result<Card, ValidationError> {
    let id = card.id().clone();
    let mut cards = normalize(vec![CardDraft::from(card)], &HashSet::new())?;
    let mut card = cards.remove(0);
    card.set_id(id);
    Ok(card)
}

fn required(
    index: usize,
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(ValidationError::invalid_field(
            index,
            field,
            "must not be empty",
        )),
        None => Err(ValidationError::invalid_field(index, field, "is required")),
    }
}

fn fresh_id(taken: &HashSet<CardId>, used: &HashSet<CardId>) -> CardId {
    loop {
        let id = CardId::generate();
        if !taken.contains(&id) && !used.contains(&id) {
            return id;
        }
    }
}
