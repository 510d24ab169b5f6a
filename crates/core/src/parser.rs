//! Transcript parser for exported chat logs.
//!
//! Input format (one logical record may span multiple physical lines):
//!
//! ```text
//! [2024/3/7, 9:41:05 PM] Alice: first line of the body
//! any line that does not open a new record
//! continues the previous one
//! ```
//!
//! Parsing is best-effort: malformed lines become continuations or are
//! discarded, and unparseable timestamps are substituted with the current
//! time rather than aborting the run. Only a run that produces zero records
//! fails, with [`Error::NoMessagesParsed`].

use crate::error::{Error, Result};
use crate::message::Message;
use crate::stats::{self, ChatStats};
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Lines between progress reports (and cooperative yields) by default.
pub const PROGRESS_BATCH_SIZE: usize = 5_000;

/// Format accepted for `"{date} {time}"` timestamp derivation.
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %I:%M:%S %p";

/// Message-start pattern: `[YYYY/M/D, H:MM:SS AM|PM] sender: body`
static MESSAGE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{4}/\d{1,2}/\d{1,2}),\s+(\d{1,2}:\d{2}:\d{2}\s+[AP]M)\]\s+(.+?):\s+(.*)$")
        .expect("message-start pattern is valid")
});

/// Progress callback: percentage (0-100) and a human-readable status.
pub type ProgressFn = Box<dyn FnMut(u8, &str) + Send>;

/// Everything a successful parse run produces.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Messages in parse order (assumed, not guaranteed, chronological)
    pub messages: Vec<Message>,
    /// Aggregate statistics over the finished list
    pub stats: ChatStats,
    /// Most frequent sender, used downstream to mark outgoing messages
    pub current_user: String,
}

/// Classification of a single trimmed input line.
#[derive(Debug, PartialEq)]
enum LineKind<'a> {
    /// The line opens a new message record
    Start(MessageHeader<'a>),
    /// The line continues the open record, or is unattributable
    Continuation,
}

/// Capture groups of a message-start line.
#[derive(Debug, PartialEq)]
struct MessageHeader<'a> {
    date: &'a str,
    time: &'a str,
    sender: &'a str,
    body: &'a str,
}

/// Decide whether a line starts a new message or continues the previous one.
fn classify_line(line: &str) -> LineKind<'_> {
    match MESSAGE_START.captures(line) {
        Some(caps) => LineKind::Start(MessageHeader {
            date: caps.get(1).map_or("", |m| m.as_str()),
            time: caps.get(2).map_or("", |m| m.as_str()),
            sender: caps.get(3).map_or("", |m| m.as_str()),
            body: caps.get(4).map_or("", |m| m.as_str()),
        }),
        None => LineKind::Continuation,
    }
}

/// Combine date and time strings into a normalized timestamp.
///
/// Falls back to the current wall-clock time when the strings do not form a
/// valid instant; the message is kept either way.
fn derive_timestamp(date: &str, time: &str) -> NaiveDateTime {
    let combined = format!("{date} {time}");
    match NaiveDateTime::parse_from_str(&combined, TIMESTAMP_FORMAT) {
        Ok(ts) => ts,
        Err(err) => {
            tracing::warn!(date, time, %err, "unparseable timestamp, substituting current time");
            Local::now().naive_local()
        }
    }
}

/// A message still being assembled; content grows until the next start line.
#[derive(Debug)]
struct PendingMessage {
    date: String,
    time: String,
    sender: String,
    content: String,
    timestamp: NaiveDateTime,
}

impl PendingMessage {
    /// A record is only finalized with a non-empty sender and content.
    fn is_complete(&self) -> bool {
        !self.sender.is_empty() && !self.content.is_empty()
    }

    fn finalize(self, id: usize) -> Message {
        Message {
            id,
            date: self.date,
            time: self.time,
            sender: self.sender,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

/// Pick the most frequent sender; ties go to whoever appeared first.
fn infer_current_user(messages: &[Message], participants: &[String]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for msg in messages {
        *counts.entry(msg.sender.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for sender in participants {
        let count = counts.get(sender.as_str()).copied().unwrap_or(0);
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((sender, count));
        }
    }

    best.map(|(s, _)| s.to_string()).unwrap_or_default()
}

/// Transcript parser with optional progress reporting.
///
/// Processes the input line by line, keeping at most one pending message,
/// and yields control back to the scheduler at fixed intervals so large
/// inputs do not starve the host event loop. This is the only suspension
/// point in the crate.
pub struct TranscriptParser {
    batch_size: usize,
    on_progress: Option<ProgressFn>,
}

impl TranscriptParser {
    /// Create a parser with the default progress interval.
    pub fn new() -> Self {
        Self { batch_size: PROGRESS_BATCH_SIZE, on_progress: None }
    }

    /// Set the number of lines between progress reports and yields.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, f: impl FnMut(u8, &str) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Parse the full transcript text into messages, stats, and the inferred
    /// current user.
    ///
    /// Returns [`Error::NoMessagesParsed`] when zero valid records result.
    pub async fn parse(mut self, text: &str) -> Result<ParseOutcome> {
        let lines: Vec<&str> = text.lines().collect();
        let total = lines.len();

        let mut messages: Vec<Message> = Vec::new();
        let mut participants: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut pending: Option<PendingMessage> = None;

        self.report(0, "Parsing messages...");

        for (i, raw) in lines.iter().enumerate() {
            if i > 0 && i % self.batch_size == 0 {
                let percent = (i * 90 / total) as u8;
                self.report(percent, &format!("Processing {i} / {total} lines..."));
                tokio::task::yield_now().await;
            }

            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match classify_line(line) {
                LineKind::Start(header) => {
                    if let Some(prev) = pending.take()
                        && prev.is_complete()
                    {
                        messages.push(prev.finalize(messages.len()));
                    }

                    let sender = header.sender.trim().to_string();
                    if seen.insert(sender.clone()) {
                        participants.push(sender.clone());
                    }

                    pending = Some(PendingMessage {
                        timestamp: derive_timestamp(header.date, header.time),
                        date: header.date.to_string(),
                        time: header.time.to_string(),
                        sender,
                        content: header.body.trim().to_string(),
                    });
                }
                LineKind::Continuation => {
                    // A continuation with no open record cannot be attributed
                    // to any sender and is dropped.
                    if let Some(msg) = pending.as_mut() {
                        msg.content.push('\n');
                        msg.content.push_str(line);
                    }
                }
            }
        }

        if let Some(prev) = pending.take()
            && prev.is_complete()
        {
            messages.push(prev.finalize(messages.len()));
        }

        self.report(95, "Finalizing...");
        tokio::task::yield_now().await;

        if messages.is_empty() {
            return Err(Error::NoMessagesParsed);
        }

        let current_user = infer_current_user(&messages, &participants);
        let stats = stats::calculate_stats(&messages, participants.len());

        tracing::debug!(
            messages = messages.len(),
            participants = participants.len(),
            "transcript parsed"
        );

        self.report(100, "Complete!");

        Ok(ParseOutcome { messages, stats, current_user })
    }

    fn report(&mut self, percent: u8, status: &str) {
        if let Some(cb) = self.on_progress.as_mut() {
            cb(percent, status);
        }
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a transcript without progress reporting.
pub async fn parse_transcript(text: &str) -> Result<ParseOutcome> {
    TranscriptParser::new().parse(text).await
}
