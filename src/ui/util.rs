use rust_decimal::Decimal;

/// Format an amount with a currency symbol, thousand separators and 2 decimal places.
/// e.g. `(1234567.89, "₹")` → `"₹1,234,567.89"`
pub(crate) fn format_amount(val: Decimal, symbol: &str) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

/// Cut `s` to at most `max` characters, marking the cut with "…".
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.char_indices().nth(max).is_none() {
        return s.to_string();
    }
    let Some(keep) = max.checked_sub(1) else {
        return String::new();
    };
    let cut = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
    format!("{}…", &s[..cut])
}

/// Selected row plus the first visible row of a scrolling table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) index: usize,
    pub(crate) scroll: usize,
}

impl ListCursor {
    /// Returns whether the selection moved.
    pub(crate) fn down(&mut self, len: usize, page: usize) -> bool {
        if self.index + 1 >= len {
            return false;
        }
        self.index += 1;
        self.follow(page);
        true
    }

    /// Returns whether the selection moved.
    pub(crate) fn up(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.scroll = self.scroll.min(self.index);
        true
    }

    pub(crate) fn top(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn bottom(&mut self, len: usize, page: usize) {
        self.index = len.saturating_sub(1);
        self.scroll = self.index.saturating_sub(page.max(1) - 1);
    }

    pub(crate) fn select(&mut self, index: usize, page: usize) {
        self.index = index;
        self.scroll = self.scroll.min(index);
        self.follow(page);
    }

    /// Pull the cursor back inside a list that may have shrunk.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
        self.scroll = self.scroll.min(self.index);
    }

    fn follow(&mut self, page: usize) {
        let page = page.max(1);
        if self.index >= self.scroll + page {
            self.scroll = self.index + 1 - page;
        }
    }
}
