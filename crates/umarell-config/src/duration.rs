// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A duration that accepts either an integer number of nanoseconds or a
//! human-readable string (`"30s"`, `"2h"`), matching the reference
//! config format's dual encoding.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Nanos(u64),
        Human(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Nanos(n) => Ok(Duration::from_nanos(n)),
        Repr::Human(s) => humantime::parse_duration(&s).map_err(serde::de::Error::custom),
    }
}

pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Nanos(u64),
            Human(String),
        }
        let opt = Option::<Repr>::deserialize(deserializer)?;
        Ok(match opt {
            None => None,
            Some(Repr::Nanos(n)) => Some(Duration::from_nanos(n)),
            Some(Repr::Human(s)) => {
                Some(humantime::parse_duration(&s).map_err(serde::de::Error::custom)?)
            }
        })
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
