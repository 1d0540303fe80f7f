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

use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ErrorReport;
use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;

/// Opaque, stable card identifier. Never reused within a collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flat three-state mastery tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    /// Never marked.
    #[default]
    New,
    /// The user knows the answer.
    Known,
    /// The user got it wrong.
    Unknown,
}

impl Proficiency {
    pub const ALL: [Proficiency; 3] = [Proficiency::New, Proficiency::Known, Proficiency::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Proficiency::New => "new",
            Proficiency::Known => "known",
            Proficiency::Unknown => "unknown",
        }
    }
}

impl Display for Proficiency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Proficiency {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Proficiency::New),
            "known" => Ok(Proficiency::Known),
            "unknown" => Ok(Proficiency::Unknown),
            _ => Err(ErrorReport::new(format!(
                "invalid proficiency '{s}': expected one of new, known, unknown"
            ))),
        }
    }
}

/// A question/answer study unit.
///
/// `details` and `tags` are `None` rather than empty: the normalizing
/// constructors below never store an empty list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    #[serde(default)]
    pub category: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub proficiency: Proficiency,
}

impl Card {
    pub fn new(
        id: CardId,
        category: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            question: question.into(),
            answer: answer.into(),
            details: None,
            tags: None,
            proficiency: Proficiency::New,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = normalize_details(details);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn with_proficiency(mut self, proficiency: Proficiency) -> Self {
        self.proficiency = proficiency;
        self
    }

    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: CardId) {
        self.id = id;
    }

    pub fn details(&self) -> &[String] {
        self.details.as_deref().unwrap_or(&[])
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    pub fn html_question(&self) -> String {
        markdown_to_html(&self.question)
    }

    pub fn html_answer(&self) -> String {
        markdown_to_html(&self.answer)
    }

    /// Each detail rendered as inline HTML, for use as list items.
    pub fn html_details(&self) -> Vec<String> {
        self.details()
            .iter()
            .map(|d| markdown_to_html_inline(d))
            .collect()
    }
}

/// Trim, drop blanks and duplicates. An empty result is `None`.
pub fn normalize_tags(tags: Vec<String>) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect();
    if tags.is_empty() { None } else { Some(tags) }
}

pub fn normalize_details(details: Vec<String>) -> Option<Vec<String>> {
    let details: Vec<String> = details
        .into_iter()
        .filter(|d| !d.trim().is_empty())
        .collect();
    if details.is_empty() { None } else { Some(details) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_absent_proficiency_is_new() -> Fallible<()> {
        let card: Card = serde_json::from_str(r#"{"id":"a","question":"Q","answer":"A"}"#)?;
        assert_eq!(card.proficiency, Proficiency::New);
        assert_eq!(card.category, "");
        assert!(card.tags.is_none());
        Ok(())
    }

    #[test]
    fn test_serialize_omits_absent_fields() -> Fallible<()> {
        let card = Card::new(CardId::new("a"), "c", "Q", "A").with_proficiency(Proficiency::Known);
        let json = serde_json::to_string(&card)?;
        assert_eq!(
            json,
            r#"{"id":"a","category":"c","question":"Q","answer":"A","proficiency":"known"}"#
        );
        Ok(())
    }

    #[test]
    fn test_empty_tags_are_absent() {
        let card = Card::new(CardId::new("a"), "", "Q", "A").with_tags(vec![" ".to_string()]);
        assert!(card.tags.is_none());
        assert!(!card.has_tag(" "));
    }

    #[test]
    fn test_tags_deduplicated() {
        let tags = normalize_tags(vec!["b".into(), "a".into(), " b ".into()]);
        assert_eq!(tags, Some(vec!["b".to_string(), "a".to_string()]));
    }

    #[test]
    fn test_proficiency_from_str() {
        assert_eq!("known".parse::<Proficiency>(), Ok(Proficiency::Known));
        assert!("mastered".parse::<Proficiency>().is_err());
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(CardId::generate(), CardId::generate());
    }

    #[test]
    fn test_html_details() {
        let card = Card::new(CardId::new("a"), "", "Q", "A")
            .with_details(vec!["uses **borrowing**".to_string()]);
        assert_eq!(
            card.html_details(),
            vec!["uses <strong>borrowing</strong>".to_string()]
        );
    }
}
