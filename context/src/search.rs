//! Deadline-guarded regex scan.
//!
//! The `regex` engine runs in linear time, so catastrophic backtracking is
//! impossible; the deadline still bounds very large inputs. It is checked
//! after every match and once after the scan, and an expired deadline
//! discards everything found so far.

use crate::context::Context;
use crate::types::SearchMatch;
use errors::ContextError;
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub(crate) fn find_bounded(
    ctx: &Context,
    pattern: &str,
    max_results: usize,
    timeout: Duration,
) -> Result<Vec<SearchMatch>, ContextError> {
    let re = Regex::new(pattern).map_err(|e| ContextError::InvalidPattern {
        reason: e.to_string(),
    })?;

    let started = Instant::now();
    let timed_out = || {
        let expired = started.elapsed() >= timeout;
        if expired {
            warn!(pattern, timeout_ms = timeout.as_millis() as u64, "search deadline expired");
        }
        expired
    };
    let timeout_error = || ContextError::SearchTimeout {
        timeout_ms: timeout.as_millis() as u64,
    };

    let mut matches = Vec::new();
    for m in re.find_iter(ctx.text()) {
        if timed_out() {
            return Err(timeout_error());
        }
        matches.push(SearchMatch {
            start: ctx.char_offset(m.start()),
            end: ctx.char_offset(m.end()),
            text: m.as_str().to_string(),
        });
        if matches.len() >= max_results {
            break;
        }
    }

    if timed_out() {
        return Err(timeout_error());
    }

    info!(pattern, count = matches.len(), "search complete");
    Ok(matches)
}
