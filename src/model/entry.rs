// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use crate::doc::{DocId, MarkerId};

use super::session::ListId;
use super::tag::DefinitionTag;

/// Cached anchor of an entry into its backing document.
///
/// `Resolved` holds a live marker that the document shifts on every edit.
/// `Unavailable` means the backing file could not be opened; queries against
/// such an entry degrade to a placeholder instead of failing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorState {
    Unresolved,
    Resolved(DocAnchor),
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocAnchor {
    doc: DocId,
    marker: MarkerId,
}

impl DocAnchor {
    pub fn new(doc: DocId, marker: MarkerId) -> Self {
        Self { doc, marker }
    }

    pub fn doc(&self) -> DocId {
        self.doc
    }

    pub fn marker(&self) -> MarkerId {
        self.marker
    }
}

/// One candidate definition plus its peek-through history.
///
/// `branches` is ordered most-recently-created/viewed first; element 0 is
/// always the branch the chain walk follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefEntry {
    tag: DefinitionTag,
    anchor: AnchorState,
    line_offset: i64,
    branches: SmallVec<[ListId; 2]>,
}

impl DefEntry {
    pub fn new(tag: DefinitionTag) -> Self {
        Self {
            tag,
            anchor: AnchorState::Unresolved,
            line_offset: 0,
            branches: SmallVec::new(),
        }
    }

    pub fn tag(&self) -> &DefinitionTag {
        &self.tag
    }

    pub fn anchor(&self) -> AnchorState {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: AnchorState) {
        self.anchor = anchor;
    }

    /// Drops the cached anchor so the next query recomputes it.
    pub fn invalidate_anchor(&mut self) {
        self.anchor = AnchorState::Unresolved;
    }

    /// How many lines the user has scrolled away from the anchor. May be
    /// temporarily out of the document's bounds; the next content fetch
    /// clamps it and writes the clamped value back.
    pub fn line_offset(&self) -> i64 {
        self.line_offset
    }

    pub fn set_line_offset(&mut self, line_offset: i64) {
        self.line_offset = line_offset;
    }

    /// Accumulates a scroll without clamping.
    pub fn scroll(&mut self, delta: i64) {
        self.line_offset += delta;
    }

    pub fn branches(&self) -> &[ListId] {
        &self.branches
    }

    pub fn has_branches(&self) -> bool {
        !self.branches.is_empty()
    }

    pub fn first_branch(&self) -> Option<ListId> {
        self.branches.first().copied()
    }

    pub fn push_branch_front(&mut self, list_id: ListId) {
        self.branches.insert(0, list_id);
    }

    /// Appends a branch without promoting it; snapshot restore rebuilds the
    /// stored order front to back.
    pub(crate) fn push_branch_back(&mut self, list_id: ListId) {
        self.branches.push(list_id);
    }

    /// Moves branch 0 to the back, revealing the next sibling branch.
    pub fn rotate_branches_next(&mut self) {
        if self.branches.len() > 1 {
            let first = self.branches.remove(0);
            self.branches.push(first);
        }
    }

    /// Moves the last branch to the front.
    pub fn rotate_branches_prev(&mut self) {
        if self.branches.len() > 1 {
            let last = self.branches.pop().expect("branches checked non-empty");
            self.branches.insert(0, last);
        }
    }

    pub fn remove_first_branch(&mut self) -> Option<ListId> {
        if self.branches.is_empty() {
            None
        } else {
            Some(self.branches.remove(0))
        }
    }

    pub fn clear_branches(&mut self) -> usize {
        let removed = self.branches.len();
        self.branches.clear();
        removed
    }
}
