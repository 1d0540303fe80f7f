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

use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Local wall-clock time at millisecond precision. Used to stamp saved
/// snapshots and study sessions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }

    /// Whole seconds from `earlier` to `self`, floored at zero.
    pub fn seconds_since(self, earlier: Timestamp) -> u64 {
        (self.0 - earlier.0).num_seconds().max(0) as u64
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NaiveDateTime::parse_from_str(&value, FORMAT)
            .map(Timestamp)
            .map_err(|_| ErrorReport::new(format!("Failed to parse timestamp: '{value}'.")))
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}
