// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editable in-memory documents with edit-resilient markers.
//!
//! The store is a process-wide pool keyed by path. Documents stay resident
//! until the pool is torn down — an anchor held by any live session must
//! always be able to resolve into its document.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use ropey::Rope;

/// Handle of a [`Document`] inside a [`DocumentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId(usize);

impl DocId {
    pub fn as_raw(&self) -> usize {
        self.0
    }
}

/// Handle of a marker inside one document. Markers are never removed; they
/// live as long as the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(usize);

/// A resolved text position: a char index plus the 0-based line it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub char_idx: usize,
    pub line: usize,
}

#[derive(Debug)]
pub enum DocError {
    Unavailable { path: PathBuf, source: io::Error },
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { path, source } => {
                write!(f, "cannot open {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unavailable { source, .. } => Some(source),
        }
    }
}

/// One editable text buffer plus its marker table.
///
/// Edits go through [`Document::insert`]/[`Document::remove`] so every marker
/// keeps tracking the same logical point: an insertion at or before a marker
/// shifts it forward by the inserted length, a deletion strictly before it
/// shifts it back, and a deletion spanning it collapses it to the deletion
/// start.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: Rope,
    markers: Vec<usize>,
}

impl Document {
    fn new(path: PathBuf, text: Rope) -> Self {
        Self {
            path,
            text,
            markers: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &Rope {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    /// Content of the 0-based line `idx`, without its line ending.
    pub fn line(&self, idx: usize) -> String {
        let line = self.text.line(idx);
        let mut s = line.to_string();
        while s.ends_with('\n') || s.ends_with('\r') {
            s.pop();
        }
        s
    }

    /// Up to `height` lines starting at the 0-based line `start`.
    pub fn lines_from(&self, start: usize, height: usize) -> Vec<String> {
        let end = (start + height).min(self.line_count());
        (start..end).map(|idx| self.line(idx)).collect()
    }

    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let len = text.chars().count();
        self.text.insert(char_idx, text);
        for marker in &mut self.markers {
            if *marker >= char_idx {
                *marker += len;
            }
        }
    }

    pub fn remove(&mut self, range: Range<usize>) {
        let Range { start, end } = range;
        let len = end - start;
        self.text.remove(start..end);
        for marker in &mut self.markers {
            if *marker >= end {
                *marker -= len;
            } else if *marker > start {
                *marker = start;
            }
        }
    }

    pub fn place_marker(&mut self, char_idx: usize) -> MarkerId {
        debug_assert!(char_idx <= self.text.len_chars(), "marker past end of document");
        self.markers.push(char_idx);
        MarkerId(self.markers.len() - 1)
    }

    pub fn marker_position(&self, marker: MarkerId) -> Position {
        let char_idx = self.markers[marker.0];
        Position {
            char_idx,
            line: self.text.char_to_line(char_idx),
        }
    }

    /// Char index of the start of the line a tag points at.
    ///
    /// Prefers the tag's whole-line pattern: of all lines matching it, the
    /// one closest to the stated 1-based line wins, so the anchor follows a
    /// definition that drifted away from its recorded line number. Falls
    /// back to a prefix match (index tools truncate long patterns), then to
    /// the raw line number clamped to the document.
    pub fn locate(&self, line: u64, pattern: Option<&str>) -> usize {
        if let Some(pattern) = pattern {
            let escaped = regex::escape(pattern);
            if let Some(found) = self.locate_regex(&format!("(?m)^{escaped}$"), line) {
                return found;
            }
            if let Some(found) = self.locate_regex(&format!("(?m)^{escaped}"), line) {
                return found;
            }
        }
        let max_line = self.line_count().saturating_sub(1);
        let line_idx = (line.saturating_sub(1) as usize).min(max_line);
        self.text.line_to_char(line_idx)
    }

    fn locate_regex(&self, pattern: &str, stated_line: u64) -> Option<usize> {
        let regex = RegexBuilder::new(pattern).build().ok()?;
        let content = self.text.to_string();
        let stated = stated_line.saturating_sub(1) as usize;

        let mut best: Option<(usize, usize)> = None;
        for found in regex.find_iter(&content) {
            let char_idx = self.text.byte_to_char(found.start());
            let line_idx = self.text.char_to_line(char_idx);
            let line_start = self.text.line_to_char(line_idx);
            let dist = line_idx.abs_diff(stated);
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, line_start));
            }
        }
        best.map(|(_, char_idx)| char_idx)
    }
}

/// Process-wide pool of documents keyed by path.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
    by_path: BTreeMap<PathBuf, DocId>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path` read from disk, or returns the already-resident handle.
    pub fn open(&mut self, path: &Path) -> Result<DocId, DocError> {
        if let Some(id) = self.by_path.get(path) {
            return Ok(*id);
        }
        let content = fs::read_to_string(path).map_err(|source| DocError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.register(path.to_path_buf(), Rope::from_str(&content)))
    }

    /// Registers an in-memory document under `path` without touching the
    /// filesystem. Used by the demo session and tests.
    pub fn open_virtual(&mut self, path: impl Into<PathBuf>, content: &str) -> DocId {
        let path = path.into();
        if let Some(id) = self.by_path.get(&path) {
            return *id;
        }
        self.register(path, Rope::from_str(content))
    }

    fn register(&mut self, path: PathBuf, text: Rope) -> DocId {
        self.docs.push(Document::new(path.clone(), text));
        let id = DocId(self.docs.len() - 1);
        self.by_path.insert(path, id);
        id
    }

    pub fn lookup(&self, path: &Path) -> Option<DocId> {
        self.by_path.get(path).copied()
    }

    pub fn get(&self, id: DocId) -> &Document {
        &self.docs[id.0]
    }

    pub fn get_mut(&mut self, id: DocId) -> &mut Document {
        &mut self.docs[id.0]
    }

    /// Whether a cached anchor still points into the document for `path`.
    /// Fails when the anchor came from a different store generation (e.g. a
    /// session re-imported from a snapshot).
    pub fn anchor_doc_valid(&self, id: DocId, path: &Path) -> bool {
        self.docs.get(id.0).is_some_and(|doc| doc.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentStore;
    use std::path::Path;

    #[test]
    fn marker_survives_insert_before() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/a.rs", "one\ntwo\nthree\n");
        let doc = docs.get_mut(id);
        let at = doc.locate(3, None);
        let marker = doc.place_marker(at);
        assert_eq!(doc.marker_position(marker).line, 2);

        doc.insert(0, "zero\n");
        let pos = doc.marker_position(marker);
        assert_eq!(pos.line, 3);
        assert_eq!(doc.line(pos.line), "three");
    }

    #[test]
    fn marker_collapses_into_spanning_deletion() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/b.rs", "abcdef");
        let doc = docs.get_mut(id);
        let marker = doc.place_marker(4);
        doc.remove(2..5);
        assert_eq!(doc.marker_position(marker).char_idx, 2);
    }

    #[test]
    fn marker_shifts_back_after_deletion_before_it() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/c.rs", "abcdef");
        let doc = docs.get_mut(id);
        let marker = doc.place_marker(5);
        doc.remove(0..2);
        assert_eq!(doc.marker_position(marker).char_idx, 3);
    }

    #[test]
    fn locate_prefers_pattern_over_stale_line() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/d.rs", "fn a() {}\nfn b() {}\nfn target() {}\n");
        let doc = docs.get(id);
        // Stated line 1 is stale; the pattern finds the real line.
        let at = doc.locate(1, Some("fn target() {}"));
        assert_eq!(doc.text().char_to_line(at), 2);
    }

    #[test]
    fn locate_picks_match_nearest_to_stated_line() {
        let mut docs = DocumentStore::new();
        let content = "dup\nx\nx\nx\ndup\n";
        let id = docs.open_virtual("/v/e.rs", content);
        let doc = docs.get(id);
        let at = doc.locate(4, Some("dup"));
        assert_eq!(doc.text().char_to_line(at), 4);
    }

    #[test]
    fn locate_falls_back_to_clamped_line_number() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/f.rs", "only\n");
        let doc = docs.get(id);
        let at = doc.locate(99, Some("not here"));
        assert_eq!(doc.text().char_to_line(at), doc.line_count() - 1);
    }

    #[test]
    fn open_missing_file_reports_unavailable() {
        let mut docs = DocumentStore::new();
        let err = docs.open(Path::new("/definitely/not/here.rs"));
        assert!(err.is_err());
    }

    #[test]
    fn open_is_keyed_by_path() {
        let mut docs = DocumentStore::new();
        let a = docs.open_virtual("/v/same.rs", "x");
        let b = docs.open_virtual("/v/same.rs", "ignored");
        assert_eq!(a, b);
    }
}
