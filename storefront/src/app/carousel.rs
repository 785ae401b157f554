//! Carousel index arithmetic.
//!
//! [`CarouselState`] is the single-item hero carousel (wraps both ways).
//! [`SectionCarousel`] is a paged strip that shows [`SECTION_PAGE_SIZE`] items
//! and steps one item at a time.

/// Items visible at once in a section carousel.
pub const SECTION_PAGE_SIZE: usize = 5;

/// Hero carousel over a collection of `item_count` elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarouselState {
    pub current_index: usize,
    pub item_count: usize,
}

impl CarouselState {
    pub fn new(item_count: usize) -> Self {
        Self { current_index: 0, item_count }
    }

    /// Collection was replaced. Returns `true` when the count changed.
    pub fn set_item_count(&mut self, item_count: usize) -> bool {
        let changed = item_count != self.item_count;
        self.item_count = item_count;
        if self.current_index >= item_count {
            self.current_index = 0;
        }
        changed
    }

    pub fn next(&mut self) {
        if self.item_count == 0 {
            return;
        }
        self.current_index = (self.current_index + 1) % self.item_count;
    }

    pub fn prev(&mut self) {
        if self.item_count == 0 {
            return;
        }
        self.current_index = if self.current_index == 0 {
            self.item_count - 1
        } else {
            self.current_index - 1
        };
    }

    /// Timer tick. Only moves when there is more than one item.
    pub fn auto_advance(&mut self) -> bool {
        if !self.should_auto_advance() {
            return false;
        }
        self.next();
        true
    }

    pub fn should_auto_advance(&self) -> bool {
        self.item_count > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCarousel {
    pub index: usize,
    pub page_size: usize,
}

impl Default for SectionCarousel {
    fn default() -> Self {
        Self {
            index: 0,
            page_size: SECTION_PAGE_SIZE,
        }
    }
}

impl SectionCarousel {
    pub fn new() -> Self {
        Self::default()
    }

    fn last_start(&self, len: usize) -> usize {
        len.saturating_sub(self.page_size)
    }

    /// Step forward; at or past the last full page wraps back to 0.
    pub fn next(&mut self, len: usize) {
        self.index = if self.index >= self.last_start(len) {
            0
        } else {
            self.index + 1
        };
    }

    /// Step back; at 0 jumps to the last full page.
    pub fn prev(&mut self, len: usize) {
        self.index = if self.index == 0 {
            self.last_start(len)
        } else {
            self.index - 1
        };
    }

    /// Currently visible slice of `items`.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.index.min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
