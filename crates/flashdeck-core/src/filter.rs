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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::error::ErrorReport;
use crate::types::card::Card;
use crate::types::card::Proficiency;

/// Which mastery states are shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProficiencyFilter {
    #[default]
    All,
    New,
    Known,
    Unknown,
}

impl ProficiencyFilter {
    pub const ALL: [ProficiencyFilter; 4] = [
        ProficiencyFilter::All,
        ProficiencyFilter::New,
        ProficiencyFilter::Known,
        ProficiencyFilter::Unknown,
    ];

    pub fn accepts(self, proficiency: Proficiency) -> bool {
        match self {
            ProficiencyFilter::All => true,
            ProficiencyFilter::New => proficiency == Proficiency::New,
            ProficiencyFilter::Known => proficiency == Proficiency::Known,
            ProficiencyFilter::Unknown => proficiency == Proficiency::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProficiencyFilter::All => "all",
            ProficiencyFilter::New => "new",
            ProficiencyFilter::Known => "known",
            ProficiencyFilter::Unknown => "unknown",
        }
    }
}

impl Display for ProficiencyFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProficiencyFilter {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ProficiencyFilter::All),
            other => other
                .parse::<Proficiency>()
                .map(ProficiencyFilter::from)
                .map_err(|_| {
                    ErrorReport::new(format!(
                        "invalid filter '{s}': expected one of all, new, known, unknown"
                    ))
                }),
        }
    }
}

impl From<Proficiency> for ProficiencyFilter {
    fn from(value: Proficiency) -> Self {
        match value {
            Proficiency::New => ProficiencyFilter::New,
            Proficiency::Known => ProficiencyFilter::Known,
            Proficiency::Unknown => ProficiencyFilter::Unknown,
        }
    }
}

/// The active view configuration. Not persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub proficiency: ProficiencyFilter,
    pub tag: Option<String>,
}

impl Filter {
    /// A blank `tag` means no tag filter. Others are trimmed.
    pub fn new(proficiency: ProficiencyFilter, tag: Option<String>) -> Self {
        let tag = tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { proficiency, tag }
    }

    /// Both stages must pass. With a tag filter active, untagged cards never
    /// match.
    pub fn matches(&self, card: &Card) -> bool {
        self.proficiency.accepts(card.proficiency)
            && match &self.tag {
                Some(tag) => card.has_tag(tag),
                None => true,
            }
    }
}

/// The subsequence of `cards` passing `filter`, in collection order.
pub fn visible<'a>(cards: &'a [Card], filter: &Filter) -> Vec<&'a Card> {
    cards.iter().filter(|card| filter.matches(card)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card::CardId;

    fn card(id: &str, proficiency: Proficiency, tags: &[&str]) -> Card {
        Card::new(CardId::new(id), "", "Q", "A")
            .with_proficiency(proficiency)
            .with_tags(tags.iter().map(|t| t.to_string()).collect())
    }

    fn ids(cards: &[&Card]) -> Vec<String> {
        cards.iter().map(|c| c.id().to_string()).collect()
    }

    #[test]
    fn test_blank_tag_is_no_filter() {
        for blank in ["", " ", "\t "] {
            let filter = Filter::new(ProficiencyFilter::All, Some(blank.to_string()));
            assert_eq!(filter, Filter::default());
            assert_eq!(visible(&sample(), &filter).len(), sample().len());
        }
        let padded = Filter::new(ProficiencyFilter::All, Some(" y ".to_string()));
        assert_eq!(padded.tag.as_deref(), Some("y"));
        assert_eq!(ids(&visible(&sample(), &padded)), vec!["b", "d"]);
    }

    fn sample() -> Vec<Card> {
        vec![
            card("a", Proficiency::New, &["x"]),
            card("b", Proficiency::Known, &["x", "y"]),
            card("c", Proficiency::Unknown, &[]),
            card("d", Proficiency::New, &["y"]),
        ]
    }

    #[test]
    fn test_all_keeps_everything() {
        let cards = sample();
        assert_eq!(ids(&visible(&cards, &Filter::default())), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_new_keeps_order_and_is_idempotent() {
        let cards = sample();
        let filter = Filter::new(ProficiencyFilter::New, None);
        let once: Vec<Card> = visible(&cards, &filter).into_iter().cloned().collect();
        assert_eq!(ids(&once.iter().collect::<Vec<_>>()), vec!["a", "d"]);
        let twice = visible(&once, &filter);
        assert_eq!(ids(&twice), vec!["a", "d"]);
    }

    #[test]
    fn test_exact_match() {
        let cards = sample();
        let known = Filter::new(ProficiencyFilter::Known, None);
        assert_eq!(ids(&visible(&cards, &known)), vec!["b"]);
        let unknown = Filter::new(ProficiencyFilter::Unknown, None);
        assert_eq!(ids(&visible(&cards, &unknown)), vec!["c"]);
    }

    #[test]
    fn test_tag_excludes_untagged() {
        let cards = sample();
        let filter = Filter::new(ProficiencyFilter::All, Some("x".to_string()));
        assert_eq!(ids(&visible(&cards, &filter)), vec!["a", "b"]);
    }

    #[test]
    fn test_stages_are_conjunctive() {
        let cards = sample();
        let filter = Filter::new(ProficiencyFilter::New, Some("y".to_string()));
        assert_eq!(ids(&visible(&cards, &filter)), vec!["d"]);
    }

    #[test]
    fn test_unknown_tag_gives_empty_view() {
        let cards = sample();
        let filter = Filter::new(ProficiencyFilter::All, Some("zzz".to_string()));
        assert!(visible(&cards, &filter).is_empty());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("all".parse::<ProficiencyFilter>(), Ok(ProficiencyFilter::All));
        assert_eq!(
            "unknown".parse::<ProficiencyFilter>(),
            Ok(ProficiencyFilter::Unknown)
        );
        assert!("most".parse::<ProficiencyFilter>().is_err());
    }
}
