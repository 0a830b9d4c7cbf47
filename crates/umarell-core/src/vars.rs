// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Literal `{KEY}` substitution over command and stage templates.

use std::collections::BTreeMap;

/// A set of named bindings available for template expansion. Ordered so
/// iteration (and therefore debug output) is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars(BTreeMap<String, String>);

impl Vars {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Replace every `{KEY}` occurrence in `template` with its bound value.
    /// Keys without a binding are left untouched, braces and all.
    pub fn substitute(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (key, value) in &self.0 {
            let token = format!("{{{key}}}");
            if out.contains(&token) {
                out = out.replace(&token, value);
            }
        }
        out
    }

    pub fn substitute_all<'a, I>(&self, templates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        templates.into_iter().map(|t| self.substitute(t)).collect()
    }
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
