//! Aggregate statistics over a finished message list.

use crate::message::Message;
use chrono::NaiveDate;
use serde::Serialize;

/// Calendar format of the source date strings.
const DATE_FORMAT: &str = "%Y/%m/%d";

/// First and last message dates, in parse order (not calendar order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Summary statistics for one parse run.
///
/// Recomputed wholesale from a finished message list; immutable afterward.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatStats {
    /// Number of finalized messages
    pub total_messages: usize,
    /// Number of distinct senders
    pub participants: usize,
    /// Dates of the first and last message in parse order
    pub date_range: DateRange,
    /// Messages per day, rounded to the nearest integer
    pub avg_messages_per_day: u64,
    /// Span of the conversation in days, at least 1 for non-empty lists
    pub duration_days: u64,
}

/// Compute statistics for a finished message list.
///
/// An empty list yields the zero-value stats. Duration is the absolute day
/// difference between the first and last message dates, floored to 1 so the
/// per-day average never divides by zero; boundary dates that fail to parse
/// fall back to that minimum as well.
pub fn calculate_stats(messages: &[Message], participant_count: usize) -> ChatStats {
    let Some(first) = messages.first() else {
        return ChatStats::default();
    };
    let last = messages.last().unwrap_or(first);

    let duration_days = span_days(&first.date, &last.date);
    let avg_messages_per_day = (messages.len() as f64 / duration_days as f64).round() as u64;

    ChatStats {
        total_messages: messages.len(),
        participants: participant_count,
        date_range: DateRange { start: first.date.clone(), end: last.date.clone() },
        avg_messages_per_day,
        duration_days,
    }
}

/// Absolute day difference between two source-format dates, minimum 1.
fn span_days(start: &str, end: &str) -> u64 {
    let parsed = NaiveDate::parse_from_str(start, DATE_FORMAT)
        .and_then(|s| NaiveDate::parse_from_str(end, DATE_FORMAT).map(|e| (s, e)));

    match parsed {
        Ok((s, e)) => (e - s).num_days().unsigned_abs().max(1),
        Err(err) => {
            tracing::warn!(start, end, %err, "unparseable boundary date, clamping duration to 1 day");
            1
        }
    }
}
