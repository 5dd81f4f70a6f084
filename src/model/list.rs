// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::session::EntryId;

/// The contiguous sub-range of a list currently rendered.
///
/// Cached on the list and re-fitted whenever the list or its cursor changes;
/// shifts by the minimum amount needed to keep the cursor inside, never
/// recentering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: usize,
    len: usize,
}

impl Window {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inclusive index of the last contained entry.
    pub fn end(&self) -> usize {
        self.start + self.len.saturating_sub(1)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end()
    }
}

/// Ordered candidates for one symbol lookup, with a cursor.
///
/// Never constructed empty; the cursor is always a valid index and all cursor
/// motion wraps modulo the length instead of clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefList {
    entries: Vec<EntryId>,
    index: usize,
    symbol: Option<SmolStr>,
    window: Window,
}

impl DefList {
    /// `entries` must be non-empty; rejecting an empty candidate set with a
    /// caller-visible error is the navigation layer's job.
    pub fn new(entries: Vec<EntryId>, symbol: Option<SmolStr>, height: usize) -> Self {
        debug_assert!(!entries.is_empty(), "definition list built from zero candidates");
        let mut list = Self {
            entries,
            index: 0,
            symbol,
            window: Window { start: 0, len: 0 },
        };
        list.refit_window(height);
        list
    }

    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn symbol(&self) -> Option<&SmolStr> {
        self.symbol.as_ref()
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn current_entry(&self) -> EntryId {
        self.entries[self.index]
    }

    /// Moves the cursor by `n` (signed), wrapping modulo the length, then
    /// shifts the window minimally to re-contain it.
    pub fn index_forward(&mut self, n: i64, height: usize) {
        let len = self.entries.len() as i64;
        self.index = (self.index as i64 + n).rem_euclid(len) as usize;
        self.refit_window(height);
    }

    /// Swaps the current entry one slot up; at the top it wraps to the end.
    /// The cursor follows the entry to its new slot.
    pub fn move_current_up(&mut self, height: usize) {
        if self.entries.len() < 2 {
            return;
        }
        if self.index == 0 {
            let entry = self.entries.remove(0);
            self.entries.push(entry);
            self.index = self.entries.len() - 1;
        } else {
            self.entries.swap(self.index, self.index - 1);
            self.index -= 1;
        }
        self.refit_window(height);
    }

    /// Swaps the current entry one slot down; at the bottom it wraps to the
    /// front. The cursor follows the entry.
    pub fn move_current_down(&mut self, height: usize) {
        if self.entries.len() < 2 {
            return;
        }
        if self.index == self.entries.len() - 1 {
            let entry = self.entries.pop().expect("entries checked non-empty");
            self.entries.insert(0, entry);
            self.index = 0;
        } else {
            self.entries.swap(self.index, self.index + 1);
            self.index += 1;
        }
        self.refit_window(height);
    }

    /// Moves the current entry to the front of the list and the cursor with
    /// it.
    pub fn make_current_first(&mut self, height: usize) {
        if self.index != 0 {
            let entry = self.entries.remove(self.index);
            self.entries.insert(0, entry);
            self.index = 0;
        }
        self.refit_window(height);
    }

    /// Restores a cursor position read back from a snapshot. Out-of-range
    /// indices (the list shrank meanwhile) fall back to 0.
    pub(crate) fn restore_index(&mut self, index: usize, height: usize) {
        self.index = if index < self.entries.len() { index } else { 0 };
        self.refit_window(height);
    }

    /// Re-derives the window length from `height` and shifts the start by the
    /// minimum amount needed to contain the cursor.
    pub fn refit_window(&mut self, height: usize) {
        let len = height.max(1).min(self.entries.len());
        self.window.len = len;
        if self.index < self.window.start {
            self.window.start = self.index;
        } else if self.index > self.window.start + len - 1 {
            self.window.start = self.index + 1 - len;
        }
        let max_start = self.entries.len() - len;
        if self.window.start > max_start {
            self.window.start = max_start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DefList;
    use crate::model::session::EntryId;

    fn list_of(n: usize, height: usize) -> DefList {
        let entries = (0..n).map(EntryId::from_raw).collect();
        DefList::new(entries, None, height)
    }

    #[test]
    fn index_forward_wraps_modulo_length() {
        let mut list = list_of(3, 5);
        list.index_forward(1, 5);
        assert_eq!(list.index(), 1);
        list.index_forward(2, 5);
        assert_eq!(list.index(), 0);
        list.index_forward(-1, 5);
        assert_eq!(list.index(), 2);
    }

    #[test]
    fn index_forward_is_a_group_action() {
        let mut list = list_of(10, 4);
        let before = (list.index(), list.window());
        list.index_forward(7, 4);
        list.index_forward(-7, 4);
        assert_eq!((list.index(), list.window()), before);
    }

    #[test]
    fn window_shifts_minimally_not_recentered() {
        let mut list = list_of(10, 3);
        assert_eq!(list.window().start(), 0);
        list.index_forward(4, 3);
        // Cursor 4 is one past end 2: start shifts to 2, not to center.
        assert_eq!(list.window().start(), 2);
        assert_eq!(list.window().end(), 4);
        list.index_forward(-4, 3);
        assert_eq!(list.window().start(), 0);
    }

    #[test]
    fn move_current_up_wraps_to_end() {
        let mut list = list_of(3, 5);
        let first = list.entries()[0];
        list.move_current_up(5);
        assert_eq!(list.index(), 2);
        assert_eq!(list.entries()[2], first);
    }

    #[test]
    fn move_current_down_wraps_to_front() {
        let mut list = list_of(3, 5);
        list.index_forward(2, 5);
        let last = list.entries()[2];
        list.move_current_down(5);
        assert_eq!(list.index(), 0);
        assert_eq!(list.entries()[0], last);
    }

    #[test]
    fn make_current_first_keeps_cursor_on_entry() {
        let mut list = list_of(4, 5);
        list.index_forward(2, 5);
        let picked = list.current_entry();
        list.make_current_first(5);
        assert_eq!(list.index(), 0);
        assert_eq!(list.current_entry(), picked);
    }
}
