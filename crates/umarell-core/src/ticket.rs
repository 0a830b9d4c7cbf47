// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extracting a ticket number from a branch name.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("branch {branch:?} does not match the ticket pattern")]
    NoTicket { branch: String },
    #[error("ticket pattern has no capturing group")]
    NoCaptureGroup,
    #[error("captured ticket {captured:?} is not a base-10 integer")]
    NotAnInteger { captured: String },
}

/// Extract the ticket id from `branch` using `pattern`'s first capture
/// group, parsed as a base-10 integer.
pub fn extract_ticket(branch: &str, pattern: &Regex) -> Result<u64, TicketError> {
    let captures = pattern
        .captures(branch)
        .ok_or_else(|| TicketError::NoTicket { branch: branch.to_string() })?;
    let captured = captures
        .get(1)
        .ok_or(TicketError::NoCaptureGroup)?
        .as_str();
    captured
        .parse::<u64>()
        .map_err(|_| TicketError::NotAnInteger { captured: captured.to_string() })
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
