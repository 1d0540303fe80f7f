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

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use clap::Subcommand;
use flashdeck_core::Fallible;
use flashdeck_core::Filter;
use flashdeck_core::ProficiencyFilter;
use tokio::spawn;

use crate::cmd::export::export_collection;
use crate::cmd::import::import_cards;
use crate::cmd::list::list_cards;
use crate::cmd::list::list_tags;
use crate::cmd::reset::reset_collection;
use crate::cmd::stats::print_stats;
use crate::cmd::study::server::ServerConfig;
use crate::cmd::study::server::start_server;
use crate::config::Config;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the config file. By default, ./flashdeck.toml is read if it exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to the database. Overrides the config file.
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Study cards through a web interface.
    Study {
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long)]
        host: Option<String>,
        /// The port to use for the web server. Default is 8000.
        #[arg(long)]
        port: Option<u16>,
        /// Only show cards with this mastery: all, new, known or unknown.
        #[arg(long, default_value_t = ProficiencyFilter::All)]
        proficiency: ProficiencyFilter,
        /// Only show cards with this tag. A blank tag is ignored.
        #[arg(long)]
        tag: Option<String>,
        /// Shuffle the collection before starting.
        #[arg(long)]
        shuffle: bool,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Import cards from JSON files or directories of JSON files.
    Import {
        /// Files or directories to import.
        #[arg(required = true)]
        paths: Vec<String>,
        /// Add the cards to the collection instead of replacing it.
        #[arg(long)]
        append: bool,
    },
    /// Export the collection as JSON.
    Export {
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// List cards, optionally filtered.
    List {
        #[arg(long, default_value_t = ProficiencyFilter::All)]
        proficiency: ProficiencyFilter,
        #[arg(long)]
        tag: Option<String>,
    },
    /// List every tag in the collection.
    Tags,
    /// Print collection statistics.
    Stats,
    /// Discard the collection and restore the built-in deck.
    Reset,
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let database = cli.database.unwrap_or_else(|| config.database.clone());
    match cli.command {
        Command::Study {
            host,
            port,
            proficiency,
            tag,
            shuffle,
            open_browser,
        } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            if open_browser.unwrap_or(config.open_browser) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let server_config = ServerConfig {
                database,
                host,
                port,
                advance_delay: config.advance_delay(),
                filter: Filter::new(proficiency, tag),
                shuffle,
            };
            start_server(server_config).await
        }
        Command::Import { paths, append } => import_cards(&database, paths, append),
        Command::Export { output } => export_collection(&database, output),
        Command::List { proficiency, tag } => list_cards(&database, proficiency, tag),
        Command::Tags => list_tags(&database),
        Command::Stats => print_stats(&database),
        Command::Reset => reset_collection(&database),
    }
}
