//! Virtual windowing over a logically large message list.
//!
//! Maps a scroll offset and viewport extent onto the small sub-range of
//! indices that must actually be rendered, with a buffer margin on both
//! sides to mask pop-in during fast scrolling. The stored range is only
//! replaced when the newly computed bounds move far enough (hysteresis), so
//! the render list is not rebuilt on every scroll tick.

/// Half-open index bounds `[start, end)` into the message list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    /// The empty range `{0, 0}`.
    pub const EMPTY: VisibleRange = VisibleRange { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of items covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a logical index falls inside the range.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Windowing controller owning the authoritative visible range.
///
/// Constructed with a fixed per-item extent and a buffer size (both in the
/// caller's units; terminal rows here, pixels in other hosts). The range it
/// hands out always covers the viewport plus the buffer margin, clamped to
/// `[0, N]`, and is stable under small scroll deltas.
///
/// While a text filter is active, windowing is suspended and the full
/// (caller-pre-filtered) list is reported visible.
#[derive(Debug, Clone)]
pub struct WindowController {
    item_extent: usize,
    buffer: usize,
    range: VisibleRange,
    filter_active: bool,
}

impl WindowController {
    /// Create a controller for items of `item_extent` units with `buffer`
    /// extra items on each side of the viewport.
    pub fn new(item_extent: usize, buffer: usize) -> Self {
        Self {
            item_extent: item_extent.max(1),
            buffer,
            range: VisibleRange::EMPTY,
            filter_active: false,
        }
    }

    /// The current authoritative range.
    pub fn range(&self) -> VisibleRange {
        self.range
    }

    pub fn item_extent(&self) -> usize {
        self.item_extent
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    pub fn is_filter_active(&self) -> bool {
        self.filter_active
    }

    /// Suspend or resume windowing for an active text filter.
    pub fn set_filter_active(&mut self, active: bool) {
        self.filter_active = active;
    }

    /// Recompute the visible range for the given scroll position.
    ///
    /// The stored range is replaced only when a bound moves by more than
    /// half the buffer, the new bounds touch either extreme of the list, or
    /// the stored range no longer fits the list. Out-of-bounds inputs are
    /// clamped; an empty list yields `{0, 0}`.
    pub fn compute_range(&mut self, scroll_offset: usize, viewport_extent: usize, list_len: usize) -> VisibleRange {
        if self.filter_active {
            self.range = VisibleRange::new(0, list_len);
            return self.range;
        }

        if list_len == 0 {
            self.range = VisibleRange::EMPTY;
            return self.range;
        }

        let candidate = self.candidate(scroll_offset, viewport_extent, list_len);
        if self.should_replace(candidate, list_len) {
            tracing::trace!(
                start = candidate.start,
                end = candidate.end,
                "visible range replaced"
            );
            self.range = candidate;
        }

        self.range
    }

    /// Recompute from scratch at the top of the list.
    ///
    /// Called whenever the underlying list identity changes (new file
    /// loaded, filter applied or cleared); the previous range is discarded.
    pub fn reset_range(&mut self, list_len: usize, viewport_extent: usize) -> VisibleRange {
        self.range = if self.filter_active {
            VisibleRange::new(0, list_len)
        } else {
            let visible_count = viewport_extent.div_ceil(self.item_extent);
            VisibleRange::new(0, (visible_count + self.buffer).min(list_len))
        };

        self.range
    }

    /// Scroll offset that puts `index` at the top of the viewport.
    ///
    /// Does not by itself change the visible range; the host scrolls there
    /// and the next scroll event recomputes.
    pub fn offset_for_index(&self, index: usize) -> usize {
        index.saturating_mul(self.item_extent)
    }

    fn candidate(&self, scroll_offset: usize, viewport_extent: usize, list_len: usize) -> VisibleRange {
        let first_visible = scroll_offset / self.item_extent;
        let visible_count = viewport_extent.div_ceil(self.item_extent);

        let end = (first_visible + visible_count + self.buffer).min(list_len);
        let start = first_visible.saturating_sub(self.buffer).min(end);

        VisibleRange::new(start, end)
    }

    fn should_replace(&self, candidate: VisibleRange, list_len: usize) -> bool {
        if self.range.end > list_len {
            return true;
        }

        let threshold = self.buffer / 2;
        candidate.start == 0
            || candidate.end == list_len
            || candidate.start.abs_diff(self.range.start) > threshold
            || candidate.end.abs_diff(self.range.end) > threshold
    }
}
