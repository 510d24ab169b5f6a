use chrono::NaiveDateTime;
use serde::Serialize;

/// A single parsed chat message.
///
/// Created once by the parser and never mutated afterward; the stats
/// aggregator and window controller only read it. `id` is the message's
/// position in parse order, which doubles as its index in the output list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Zero-based sequence position, assigned at parse time
    pub id: usize,
    /// Source-format date string, e.g. `2024/3/7`
    pub date: String,
    /// Source-format time string with AM/PM, e.g. `9:41:05 PM`
    pub time: String,
    /// Trimmed display name of the sender
    pub sender: String,
    /// Message body; may span multiple lines joined by `\n`
    pub content: String,
    /// Normalized timestamp derived from `date` + `time`, or the wall-clock
    /// time at parse if derivation failed
    pub timestamp: NaiveDateTime,
}

impl Message {
    /// First line of the content, for single-row previews.
    pub fn preview(&self) -> &str {
        self.content.lines().next().unwrap_or("")
    }

    /// Whether the body spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.content.contains('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Message {
        Message {
            id: 0,
            date: "2024/3/7".to_string(),
            time: "9:41:05 PM".to_string(),
            sender: "Alice".to_string(),
            content: "hello\nworld".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(21, 41, 5)
                .unwrap(),
        }
    }

    #[test]
    fn test_preview_is_first_line() {
        assert_eq!(sample().preview(), "hello");
    }

    #[test]
    fn test_preview_of_empty_content() {
        let mut msg = sample();
        msg.content = String::new();
        assert_eq!(msg.preview(), "");
    }

    #[test]
    fn test_is_multiline() {
        assert!(sample().is_multiline());

        let mut msg = sample();
        msg.content = "single line".to_string();
        assert!(!msg.is_multiline());
    }
}
