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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use flashdeck_core::Direction;
use flashdeck_core::Fallible;
use flashdeck_core::Filter;
use flashdeck_core::Proficiency;
use flashdeck_core::ProficiencyFilter;
use flashdeck_core::rng::TinyRng;
use serde::Deserialize;
use tokio::time::sleep;

use crate::cmd::study::state::ServerState;
use crate::cmd::study::template::error_page;
use crate::utils::clock_seed;

#[derive(Clone, Copy, Debug, Deserialize)]
pub enum Action {
    Flip,
    Next,
    Prev,
    Known,
    Unknown,
    New,
    Delete,
    Shuffle,
    Reset,
    Filter,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    proficiency: Option<String>,
    tag: Option<String>,
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<FormData>) -> Response {
    log::debug!("Action: {:?}", form.action);
    let result = match form.action {
        Action::Next => advance(&state, Direction::Forward).await,
        Action::Prev => advance(&state, Direction::Backward).await,
        _ => apply(&state, form),
    };
    match result {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Html(error_page(&e.to_string()).into_string()),
        )
            .into_response(),
    }
}

/// Turn the card face down, wait, then move. The lock is released while
/// waiting, so a request arriving in between can cancel the move.
async fn advance(state: &ServerState, direction: Direction) -> Fallible<()> {
    state.lock()?.begin_advance(direction);
    sleep(state.advance_delay).await;
    let moved = state.lock()?.commit_advance();
    if !moved {
        log::debug!("Pending {direction:?} move was cancelled");
    }
    Ok(())
}

fn apply(state: &ServerState, form: FormData) -> Fallible<()> {
    let mut session = state.lock()?;
    match form.action {
        Action::Flip => session.flip(),
        Action::Known => {
            session.mark_current(Proficiency::Known);
        }
        Action::Unknown => {
            session.mark_current(Proficiency::Unknown);
        }
        Action::New => {
            session.mark_current(Proficiency::New);
        }
        Action::Delete => {
            session.delete_current();
        }
        Action::Shuffle => {
            let mut rng = TinyRng::from_seed(clock_seed());
            session.shuffle(&mut rng);
        }
        Action::Reset => session.reset(),
        Action::Filter => {
            let proficiency: ProficiencyFilter = match form.proficiency.as_deref() {
                Some(value) => value.parse()?,
                None => ProficiencyFilter::All,
            };
            session.set_filter(Filter::new(proficiency, form.tag));
        }
        Action::Next | Action::Prev => {}
    }
    Ok(())
}
