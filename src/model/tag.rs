// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};

use smol_str::SmolStr;

/// One candidate definition location, as produced by a resolver.
///
/// The browsing core treats everything except `path`/`line`/`pattern` as
/// opaque display data. A tag never changes after the entry owning it is
/// built; re-locating after edits goes through the anchor machinery, not by
/// rewriting the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTag {
    name: SmolStr,
    path: PathBuf,
    line: u64,
    pattern: Option<String>,
    kind: Option<String>,
    signature: Option<String>,
}

impl DefinitionTag {
    pub fn new(name: impl Into<SmolStr>, path: impl Into<PathBuf>, line: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            line,
            pattern: None,
            kind: None,
            signature: None,
        }
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based line number as stated by the resolver at lookup time.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Literal content of the definition line, used to re-locate the
    /// definition after the stated line number has drifted.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn set_pattern(&mut self, pattern: Option<String>) {
        self.pattern = pattern;
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn set_signature(&mut self, signature: Option<String>) {
        self.signature = signature;
    }
}
