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

mod cli;
mod cmd;
mod config;
#[cfg(test)]
mod helper;
mod store;
mod utils;

use std::process::exit;

use crate::cli::entrypoint;

#[tokio::main]
async fn main() {
    env_logger::init();
    match entrypoint().await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{e}");
            exit(-1);
        }
    }
}
