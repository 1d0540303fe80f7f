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

use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::html::push_html;

/// Convert Markdown to HTML.
///
/// Raw HTML in card text is escaped rather than passed through, since card
/// content arrives from bulk imports.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });
    let mut html_output: String = String::new();
    push_html(&mut html_output, parser);
    html_output
}

/// Like [`markdown_to_html`], but strips the wrapping paragraph from
/// single-paragraph input.
pub fn markdown_to_html_inline(markdown: &str) -> String {
    let text = markdown_to_html(markdown);
    match text
        .strip_prefix("<p>")
        .and_then(|t| t.strip_suffix("</p>\n"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => text,
    }
}
