use chatlens_core::{
    ChatStats, Config, Error, Message, ParseOutcome, VisibleRange, WindowController, first_index_on_date,
    search_messages,
};

/// Which screen the app is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPhase {
    /// A background parse task is running
    Loading { percent: u8, status: String },
    /// The transcript (or an error) is on screen
    Viewing,
}

/// Search input state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// The input line is focused and capturing keys
    pub active: bool,
    /// Current query text
    pub query: String,
}

/// Event emitted by a background parse task.
///
/// Tagged with the generation of the load request that spawned it; events
/// from a superseded generation are discarded so a stale parse can never
/// overwrite a newer one.
#[derive(Debug)]
pub enum ParseEvent {
    Progress {
        generation: u64,
        percent: u8,
        status: String,
    },
    Finished {
        generation: u64,
        outcome: Result<ParseOutcome, Error>,
    },
}

/// All mutable state for the viewer.
///
/// Scroll position and the visible range are owned here (through the
/// [`WindowController`]) and passed to the renderer by reference; nothing is
/// held in ambient globals.
pub struct AppState {
    /// Display name of the loaded file
    pub file_name: String,
    /// Current screen
    pub phase: ViewPhase,
    /// Parsed messages, in parse order
    pub messages: Vec<Message>,
    /// Stats for the current parse, if any
    pub stats: Option<ChatStats>,
    /// Inferred current user (most frequent sender)
    pub current_user: String,
    /// Search input
    pub search: SearchState,
    /// User-facing error from the last load attempt
    pub error: Option<String>,

    filtered: Option<Vec<usize>>,
    window: WindowController,
    scroll_offset: usize,
    viewport_rows: usize,
    generation: u64,
}

impl AppState {
    pub fn new(config: &Config, file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            phase: ViewPhase::Loading { percent: 0, status: "Reading file...".to_string() },
            messages: Vec::new(),
            stats: None,
            current_user: String::new(),
            search: SearchState::default(),
            error: None,
            filtered: None,
            window: WindowController::new(config.viewer.row_extent, config.viewer.buffer_items),
            scroll_offset: 0,
            viewport_rows: 0,
            generation: 0,
        }
    }

    // --- load lifecycle ---

    /// Start a new load, superseding any parse still in flight.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.phase = ViewPhase::Loading { percent: 0, status: "Reading file...".to_string() };
        self.error = None;
        self.generation
    }

    /// The generation of the most recent load request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a progress report, ignoring superseded generations.
    pub fn apply_progress(&mut self, generation: u64, percent: u8, status: String) {
        if generation != self.generation {
            return;
        }
        if matches!(self.phase, ViewPhase::Loading { .. }) {
            self.phase = ViewPhase::Loading { percent, status };
        }
    }

    /// Apply a finished parse, ignoring superseded generations.
    pub fn apply_outcome(&mut self, generation: u64, outcome: Result<ParseOutcome, Error>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding superseded parse result");
            return;
        }

        match outcome {
            Ok(result) => {
                self.messages = result.messages;
                self.stats = Some(result.stats);
                self.current_user = result.current_user;
                self.search = SearchState::default();
                self.filtered = None;
                self.window.set_filter_active(false);
                self.scroll_offset = 0;
                self.window.reset_range(self.messages.len(), self.viewport_rows);
            }
            Err(err) => {
                self.messages.clear();
                self.stats = None;
                self.error = Some(err.to_string());
            }
        }

        self.phase = ViewPhase::Viewing;
    }

    // --- windowing ---

    /// Rows each message card occupies.
    pub fn row_extent(&self) -> usize {
        self.window.item_extent()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// Record the current viewport height in rows.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
    }

    /// Length of the list the window runs over (filtered or full).
    pub fn visible_len(&self) -> usize {
        match &self.filtered {
            Some(indices) => indices.len(),
            None => self.messages.len(),
        }
    }

    /// Message at a position of the (optionally filtered) list.
    pub fn message_at(&self, position: usize) -> Option<&Message> {
        match &self.filtered {
            Some(indices) => indices.get(position).and_then(|&i| self.messages.get(i)),
            None => self.messages.get(position),
        }
    }

    /// Recompute the visible range for the current scroll position.
    pub fn refresh_range(&mut self) -> VisibleRange {
        self.window
            .compute_range(self.scroll_offset, self.viewport_rows, self.visible_len())
    }

    /// The current authoritative visible range.
    pub fn visible_range(&self) -> VisibleRange {
        self.window.range()
    }

    fn max_scroll(&self) -> usize {
        (self.visible_len() * self.row_extent()).saturating_sub(self.viewport_rows)
    }

    /// Index of the item at the top of the viewport.
    pub fn top_index(&self) -> usize {
        let top = self.scroll_offset / self.row_extent();
        top.min(self.visible_len().saturating_sub(1))
    }

    // --- scrolling ---

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(self.max_scroll());
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.viewport_rows as isize));
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_rows as isize);
    }

    pub fn jump_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn jump_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    /// Scroll to the first message of the next calendar date.
    pub fn jump_to_next_day(&mut self) {
        if self.filtered.is_some() {
            return;
        }
        let top = self.top_index();
        let Some(current) = self.messages.get(top) else {
            return;
        };
        if let Some(offset) = self.messages[top..].iter().position(|m| m.date != current.date) {
            let target = self.window.offset_for_index(top + offset);
            self.scroll_offset = target.min(self.max_scroll());
        }
    }

    /// Scroll to the start of the current date block, or of the previous one
    /// when already there.
    pub fn jump_to_prev_day(&mut self) {
        if self.filtered.is_some() {
            return;
        }
        let top = self.top_index();
        let Some(current) = self.messages.get(top) else {
            return;
        };

        let current_start = first_index_on_date(&self.messages, &current.date).unwrap_or(0);
        let target = if top > current_start || current_start == 0 {
            current_start
        } else {
            let prev_date = &self.messages[current_start - 1].date;
            first_index_on_date(&self.messages, prev_date).unwrap_or(0)
        };

        self.scroll_offset = self.window.offset_for_index(target).min(self.max_scroll());
    }

    // --- search ---

    /// Whether a non-empty filter is in effect.
    pub fn is_filtering(&self) -> bool {
        self.filtered.is_some()
    }

    pub fn open_search(&mut self) {
        self.search.active = true;
    }

    /// Close the input line, keeping the current filter.
    pub fn close_search(&mut self) {
        self.search.active = false;
    }

    /// Close the input line and drop the filter.
    pub fn cancel_search(&mut self) {
        self.search.active = false;
        self.search.query.clear();
        self.apply_filter();
    }

    pub fn search_push(&mut self, c: char) {
        self.search.query.push(c);
        self.apply_filter();
    }

    pub fn search_pop(&mut self) {
        self.search.query.pop();
        self.apply_filter();
    }

    /// Re-filter the list for the current query and reset the window.
    ///
    /// A non-empty query suspends windowing (the full match list is
    /// reported visible); clearing it resumes normal windowing. Either way
    /// the scroll position returns to the top.
    pub fn apply_filter(&mut self) {
        let query = self.search.query.trim();
        if query.is_empty() {
            self.filtered = None;
            self.window.set_filter_active(false);
        } else {
            self.filtered = Some(search_messages(&self.messages, query));
            self.window.set_filter_active(true);
        }

        self.scroll_offset = 0;
        self.window.reset_range(self.visible_len(), self.viewport_rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::calculate_stats;
    use chrono::NaiveDateTime;

    fn message(id: usize, date: &str, sender: &str, content: &str) -> Message {
        Message {
            id,
            date: date.to_string(),
            time: "9:00:00 AM".to_string(),
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp: NaiveDateTime::default(),
        }
    }

    fn outcome(messages: Vec<Message>) -> ParseOutcome {
        let stats = calculate_stats(&messages, 2);
        ParseOutcome { messages, stats, current_user: "Alice".to_string() }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(&Config::default(), "chat.txt");
        state.set_viewport_rows(20);
        let generation = state.begin_load();
        state.apply_outcome(
            generation,
            Ok(outcome(vec![
                message(0, "2024/3/7", "Alice", "one"),
                message(1, "2024/3/7", "Bob", "two"),
                message(2, "2024/3/8", "Alice", "three"),
                message(3, "2024/3/9", "Bob", "four"),
            ])),
        );
        state
    }

    #[test]
    fn test_load_lifecycle() {
        let state = loaded_state();
        assert_eq!(state.phase, ViewPhase::Viewing);
        assert_eq!(state.messages.len(), 4);
        assert!(state.error.is_none());
        assert_eq!(state.current_user, "Alice");

        // Range was reset for the new list.
        assert_eq!(state.visible_range().start, 0);
        assert!(state.visible_range().len() > 0);
    }

    #[test]
    fn test_superseded_outcome_is_discarded() {
        let mut state = loaded_state();
        let old = state.generation();
        state.begin_load();

        state.apply_outcome(old, Ok(outcome(vec![message(0, "2020/1/1", "Eve", "stale")])));

        // Still loading; the stale result did not land.
        assert!(matches!(state.phase, ViewPhase::Loading { .. }));
        assert_eq!(state.messages.len(), 4);
    }

    #[test]
    fn test_superseded_progress_is_discarded() {
        let mut state = AppState::new(&Config::default(), "chat.txt");
        let old = state.begin_load();
        state.begin_load();

        state.apply_progress(old, 50, "stale".to_string());
        match &state.phase {
            ViewPhase::Loading { percent, .. } => assert_eq!(*percent, 0),
            ViewPhase::Viewing => panic!("expected loading phase"),
        }
    }

    #[test]
    fn test_failed_parse_sets_error() {
        let mut state = loaded_state();
        let generation = state.begin_load();
        state.apply_outcome(generation, Err(Error::NoMessagesParsed));

        assert_eq!(state.phase, ViewPhase::Viewing);
        assert!(state.messages.is_empty());
        assert!(state.error.as_deref().unwrap_or("").contains("no messages"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = loaded_state();
        // 4 messages x 5 rows = 20 rows total, viewport 20: nothing to scroll.
        state.scroll_by(10);
        assert_eq!(state.scroll_offset(), 0);

        state.set_viewport_rows(10);
        state.scroll_by(100);
        assert_eq!(state.scroll_offset(), 10);

        state.scroll_by(-3);
        assert_eq!(state.scroll_offset(), 7);

        state.jump_top();
        assert_eq!(state.scroll_offset(), 0);

        state.jump_bottom();
        assert_eq!(state.scroll_offset(), 10);
    }

    #[test]
    fn test_filter_suspends_windowing() {
        let mut state = loaded_state();
        state.open_search();
        for c in "three".chars() {
            state.search_push(c);
        }

        assert!(state.is_filtering());
        assert_eq!(state.visible_len(), 1);
        assert_eq!(state.message_at(0).map(|m| m.id), Some(2));

        // The whole filtered list is reported visible.
        assert_eq!(state.visible_range(), VisibleRange::new(0, 1));
    }

    #[test]
    fn test_clearing_filter_restores_top_range() {
        let mut state = loaded_state();
        state.set_viewport_rows(10);
        state.open_search();
        state.search_push('x');
        state.cancel_search();

        assert!(!state.is_filtering());
        assert_eq!(state.scroll_offset(), 0);
        assert_eq!(state.visible_range().start, 0);
        assert_eq!(state.visible_range().end, 4);
    }

    #[test]
    fn test_day_jumps() {
        let mut state = loaded_state();
        state.set_viewport_rows(5);

        state.jump_to_next_day();
        assert_eq!(state.top_index(), 2);

        state.jump_to_next_day();
        assert_eq!(state.top_index(), 3);

        state.jump_to_prev_day();
        assert_eq!(state.top_index(), 2);

        state.jump_to_prev_day();
        assert_eq!(state.top_index(), 0);
    }

    #[test]
    fn test_message_at_respects_filter() {
        let mut state = loaded_state();
        assert_eq!(state.message_at(2).map(|m| m.id), Some(2));

        state.open_search();
        for c in "bob".chars() {
            state.search_push(c);
        }
        assert_eq!(state.visible_len(), 2);
        assert_eq!(state.message_at(0).map(|m| m.id), Some(1));
        assert_eq!(state.message_at(1).map(|m| m.id), Some(3));
    }
}
