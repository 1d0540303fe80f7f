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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use flashdeck_core::Card;
use flashdeck_core::CardStore;
use flashdeck_core::Fallible;
use flashdeck_core::ProficiencyFilter;
use flashdeck_core::Session;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::cmd::study::state::ServerState;
use crate::cmd::study::template::error_page;
use crate::cmd::study::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    match render_page(&state) {
        Ok(markup) => (StatusCode::OK, Html(markup.into_string())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(error_page(&e.to_string()).into_string()),
        ),
    }
}

fn render_page(state: &ServerState) -> Fallible<Markup> {
    let mut session = state.lock()?;
    // Shown once: the next render no longer carries it.
    let banner = session.take_persistence_error().map(|e| e.to_string());
    Ok(page_template(render_session(&session, banner.as_deref())))
}

pub fn render_session<S: CardStore>(session: &Session<S>, banner: Option<&str>) -> Markup {
    let progress = session.progress();
    let mastered = format!("width: {:.0}%;", progress.known_ratio() * 100.0);
    let empty = session.current().is_none();
    html! {
        div.root {
            @if let Some(message) = banner {
                div.banner role="alert" {
                    "Your changes could not be saved: " (message)
                }
            }
            div.header {
                div.position {
                    (progress.position) " / " (progress.visible)
                }
                div.progress-bar title="Share of cards marked known" {
                    div.progress-fill style=(mastered) {}
                }
                div.counts {
                    span.count data-proficiency="new" { "New " (progress.new) }
                    span.count data-proficiency="known" { "Known " (progress.known) }
                    span.count data-proficiency="unknown" { "Unknown " (progress.unknown) }
                }
            }
            (render_filters(session))
            @match session.current() {
                Some(card) => (render_card(card, session.is_flipped())),
                None => div.empty {
                    p { "No cards match this filter." }
                },
            }
            div.controls {
                form action="/" method="post" {
                    input #prev type="submit" name="action" value="Prev" title="Previous card. Shortcut: left arrow or h." disabled[empty];
                    input #flip type="submit" name="action" value="Flip" title="Turn the card over. Shortcut: space." disabled[empty];
                    input #next type="submit" name="action" value="Next" title="Next card. Shortcut: right arrow or l." disabled[empty];
                }
                form action="/" method="post" {
                    input #known type="submit" name="action" value="Known" title="Mark as known. Shortcut: k." disabled[empty];
                    input #unknown type="submit" name="action" value="Unknown" title="Mark as unknown. Shortcut: u." disabled[empty];
                    input #new type="submit" name="action" value="New" title="Mark as new." disabled[empty];
                    input #delete type="submit" name="action" value="Delete" title="Delete this card." disabled[empty];
                }
            }
            div.footer {
                form action="/" method="post" {
                    input #shuffle type="submit" name="action" value="Shuffle" title="Shuffle the whole collection.";
                    input #reset type="submit" name="action" value="Reset" title="Discard the collection and restore the built-in deck.";
                }
                a href="/cards.json" download="flashdeck.json" { "Export cards" }
            }
        }
    }
}

fn render_filters<S: CardStore>(session: &Session<S>) -> Markup {
    let filter = session.filter();
    let tags = session.tags();
    html! {
        form.filters action="/" method="post" {
            select name="proficiency" {
                @for choice in ProficiencyFilter::ALL {
                    option value=(choice.as_str()) selected[choice == filter.proficiency] {
                        (filter_label(choice))
                    }
                }
            }
            select name="tag" {
                option value="" selected[filter.tag.is_none()] { "All tags" }
                @for tag in &tags {
                    option value=(tag) selected[filter.tag.as_deref() == Some(tag.as_str())] {
                        (tag)
                    }
                }
            }
            input #filter type="submit" name="action" value="Filter";
        }
    }
}

fn filter_label(filter: ProficiencyFilter) -> &'static str {
    match filter {
        ProficiencyFilter::All => "All cards",
        ProficiencyFilter::New => "New",
        ProficiencyFilter::Known => "Known",
        ProficiencyFilter::Unknown => "Unknown",
    }
}

fn render_card(card: &Card, flipped: bool) -> Markup {
    let details = card.html_details();
    html! {
        div.card-container {
            div.card.flipped[flipped] data-id=(card.id().as_str()) {
                div.card-header {
                    @if !card.category.is_empty() {
                        h1 { (card.category) }
                    }
                    span.proficiency data-proficiency=(card.proficiency.as_str()) {
                        (card.proficiency.as_str())
                    }
                }
                div.card-content {
                    div.question.rich-text { (PreEscaped(card.html_question())) }
                    @if flipped {
                        div.answer.rich-text { (PreEscaped(card.html_answer())) }
                        @if !details.is_empty() {
                            ul.details {
                                @for detail in &details {
                                    li.rich-text { (PreEscaped(detail)) }
                                }
                            }
                        }
                    }
                }
                @if !card.tags().is_empty() {
                    div.tags {
                        @for tag in card.tags() {
                            span.tag { "#" (tag) }
                        }
                    }
                }
            }
        }
    }
}
