// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Symbol resolution: from a position in a document to candidate definition
//! locations.
//!
//! The browsing core only depends on the [`SymbolResolver`] trait; the
//! shipped implementation answers from a ctags tags file.

pub mod tags_file;

use std::fmt;

use smol_str::SmolStr;

use crate::doc::Document;
use crate::model::DefinitionTag;

pub use tags_file::{TagFileResolver, TagsError};

/// A successful lookup: the identifier found at the queried position and its
/// candidate definitions, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub symbol: SmolStr,
    pub tags: Vec<DefinitionTag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NoSymbol,
    NoDefinitions { symbol: SmolStr },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSymbol => f.write_str("no symbol at this position"),
            Self::NoDefinitions { symbol } => {
                write!(f, "no definitions found for '{symbol}'")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

pub trait SymbolResolver {
    fn resolve_symbol_at(
        &self,
        doc: &Document,
        char_idx: usize,
    ) -> Result<Resolution, ResolveError>;
}

fn is_symbol_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// The identifier at (or just before) `char_idx` in `doc`, with its char
/// range.
pub fn symbol_at(doc: &Document, char_idx: usize) -> Option<(SmolStr, std::ops::Range<usize>)> {
    let text = doc.text();
    let len = text.len_chars();
    if len == 0 {
        return None;
    }

    let mut at = char_idx.min(len - 1);
    if !is_symbol_char(text.char(at)) {
        if at == 0 || !is_symbol_char(text.char(at - 1)) {
            return None;
        }
        at -= 1;
    }

    let mut start = at;
    while start > 0 && is_symbol_char(text.char(start - 1)) {
        start -= 1;
    }
    let mut end = at + 1;
    while end < len && is_symbol_char(text.char(end)) {
        end += 1;
    }

    let symbol: String = text.slice(start..end).chars().collect();
    // A bare number is not an identifier.
    if symbol.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    Some((SmolStr::new(symbol), start..end))
}

#[cfg(test)]
mod tests {
    use super::symbol_at;
    use crate::doc::DocumentStore;

    #[test]
    fn symbol_at_finds_identifier_under_position() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/s.rs", "let total = sum(parts);\n");
        let doc = docs.get(id);
        let (symbol, range) = symbol_at(doc, 13).expect("symbol");
        assert_eq!(symbol.as_str(), "sum");
        assert_eq!(range, 12..15);
    }

    #[test]
    fn symbol_at_falls_back_to_preceding_word() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/s2.rs", "sum(");
        let doc = docs.get(id);
        let (symbol, _) = symbol_at(doc, 3).expect("symbol");
        assert_eq!(symbol.as_str(), "sum");
    }

    #[test]
    fn symbol_at_rejects_whitespace_and_numbers() {
        let mut docs = DocumentStore::new();
        let id = docs.open_virtual("/v/s3.rs", "a  42 b");
        let doc = docs.get(id);
        assert!(symbol_at(doc, 1).is_none() || symbol_at(doc, 1).unwrap().0 == "a");
        assert!(symbol_at(doc, 4).is_none());
    }
}
