//! Message filtering and jump-to-date lookup.
//!
//! The viewer suspends windowing while a filter is active, so these helpers
//! produce the pre-filtered index list the window controller is handed.

use crate::message::Message;

/// Indices of messages matching a case-insensitive query on content or
/// sender. An empty or whitespace-only query matches every message.
pub fn search_messages(messages: &[Message], query: &str) -> Vec<usize> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return (0..messages.len()).collect();
    }

    messages
        .iter()
        .enumerate()
        .filter(|(_, msg)| {
            msg.content.to_lowercase().contains(&query) || msg.sender.to_lowercase().contains(&query)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Index of the first message carrying the exact source-format date.
pub fn first_index_on_date(messages: &[Message], date: &str) -> Option<usize> {
    messages.iter().position(|msg| msg.date == date)
}
