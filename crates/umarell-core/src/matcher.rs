// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Branch name to stage template resolution.

use regex::Regex;
use std::collections::BTreeMap;

/// Resolve `branch` against a project's `branches` table.
///
/// Resolution order: an exact literal key wins outright. Failing that,
/// every key beginning with `^` is tried as an anchored regular
/// expression, in lexicographic order of the key itself so the result is
/// deterministic across runs. Returns `None` if nothing matches; the
/// caller is expected to fall back to `__default__`.
pub fn match_stage<'a>(
    branch: &str,
    branches: &'a BTreeMap<String, Vec<String>>,
) -> Option<&'a [String]> {
    if let Some(templates) = branches.get(branch) {
        return Some(templates.as_slice());
    }

    // BTreeMap already iterates in lexicographic key order.
    for (key, templates) in branches {
        if !key.starts_with('^') {
            continue;
        }
        let Ok(re) = Regex::new(key) else {
            tracing::warn!(pattern = %key, "branch pattern failed to compile, skipping");
            continue;
        };
        if re.is_match(branch) {
            return Some(templates.as_slice());
        }
    }
    None
}

pub const DEFAULT_KEY: &str = "__default__";

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
