// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use crate::doc::Document;
use crate::format::ctags::{parse_tags, CtagsParseError};
use crate::model::DefinitionTag;

use super::{symbol_at, Resolution, ResolveError, SymbolResolver};

/// Near matches need at least this `rapidfuzz` ratio (0..=100) to be offered
/// when no exact match exists.
const NEAR_MATCH_MIN_RATIO: f64 = 85.0;

#[derive(Debug)]
pub enum TagsError {
    Io { path: PathBuf, source: io::Error },
    Parse(CtagsParseError),
}

impl fmt::Display for TagsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read tags file {}: {source}", path.display())
            }
            Self::Parse(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for TagsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(inner) => Some(inner),
        }
    }
}

impl From<CtagsParseError> for TagsError {
    fn from(inner: CtagsParseError) -> Self {
        Self::Parse(inner)
    }
}

/// Answers symbol lookups from a parsed ctags tags file.
///
/// Exact name matches come back in file order. When there is no exact match,
/// names scoring at least [`NEAR_MATCH_MIN_RATIO`] are offered instead, best
/// first — a typo or case slip still gets the user somewhere useful.
#[derive(Debug, Clone)]
pub struct TagFileResolver {
    tags: Vec<DefinitionTag>,
    by_name: BTreeMap<SmolStr, Vec<usize>>,
}

impl TagFileResolver {
    pub fn from_file(path: &Path) -> Result<Self, TagsError> {
        let content = fs::read_to_string(path).map_err(|source| TagsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::from_text(&content, base_dir)?)
    }

    pub fn from_text(content: &str, base_dir: &Path) -> Result<Self, CtagsParseError> {
        let tags = parse_tags(content, base_dir)?;
        let mut by_name: BTreeMap<SmolStr, Vec<usize>> = BTreeMap::new();
        for (idx, tag) in tags.iter().enumerate() {
            by_name.entry(tag.name().clone()).or_default().push(idx);
        }
        Ok(Self { tags, by_name })
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Candidate definitions for `symbol`, best first; empty when nothing
    /// matches exactly or nearly.
    pub fn lookup(&self, symbol: &str) -> Vec<DefinitionTag> {
        if let Some(indices) = self.by_name.get(symbol) {
            return indices.iter().map(|&idx| self.tags[idx].clone()).collect();
        }

        let mut near: Vec<(f64, &SmolStr)> = self
            .by_name
            .keys()
            .filter_map(|name| {
                let ratio = rapidfuzz::fuzz::ratio(symbol.chars(), name.chars());
                (ratio >= NEAR_MATCH_MIN_RATIO).then_some((ratio, name))
            })
            .collect();
        near.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        near.iter()
            .flat_map(|(_, name)| {
                self.by_name[*name].iter().map(|&idx| self.tags[idx].clone())
            })
            .collect()
    }
}

impl SymbolResolver for TagFileResolver {
    fn resolve_symbol_at(
        &self,
        doc: &Document,
        char_idx: usize,
    ) -> Result<Resolution, ResolveError> {
        let (symbol, _) = symbol_at(doc, char_idx).ok_or(ResolveError::NoSymbol)?;
        let tags = self.lookup(symbol.as_str());
        if tags.is_empty() {
            return Err(ResolveError::NoDefinitions { symbol });
        }
        Ok(Resolution { symbol, tags })
    }
}
