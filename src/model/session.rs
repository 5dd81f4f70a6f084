// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::entry::DefEntry;
use super::list::DefList;
use super::name::SessionName;

/// Stable handle of a [`DefList`] inside one session's tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(usize);

impl ListId {
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> usize {
        self.0
    }
}

/// Stable handle of a [`DefEntry`] inside one session's tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> usize {
        self.0
    }
}

/// Arena holding one session's definition lists and entries.
///
/// Lists reference entries, and entries reference branch lists, by id only —
/// no structural pointers, so back-navigation never fights ownership. Ids are
/// never reused; nodes detached by a branch deletion become unreachable and
/// are reclaimed with the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeekTree {
    lists: Vec<DefList>,
    entries: Vec<DefEntry>,
}

impl PeekTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_list(&mut self, list: DefList) -> ListId {
        self.lists.push(list);
        ListId(self.lists.len() - 1)
    }

    pub fn insert_entry(&mut self, entry: DefEntry) -> EntryId {
        self.entries.push(entry);
        EntryId(self.entries.len() - 1)
    }

    pub fn list(&self, id: ListId) -> &DefList {
        &self.lists[id.0]
    }

    pub fn list_mut(&mut self, id: ListId) -> &mut DefList {
        &mut self.lists[id.0]
    }

    pub fn entry(&self, id: EntryId) -> &DefEntry {
        &self.entries[id.0]
    }

    pub fn entry_mut(&mut self, id: EntryId) -> &mut DefEntry {
        &mut self.entries[id.0]
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// One browsing context: a rooted tree of definition lists plus the depth the
/// user is currently viewing at.
///
/// The currently browsed list is always recomputed by walking `depth` hops
/// from the root, following branch 0 of each level's current entry. `depth`
/// never exceeds the hops for which such a branch exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    tree: PeekTree,
    root: ListId,
    depth: usize,
    name: Option<SessionName>,
}

impl Session {
    pub fn new(tree: PeekTree, root: ListId) -> Self {
        Self {
            tree,
            root,
            depth: 0,
            name: None,
        }
    }

    pub fn tree(&self) -> &PeekTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut PeekTree {
        &mut self.tree
    }

    pub fn root(&self) -> ListId {
        self.root
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn name(&self) -> Option<&SessionName> {
        self.name.as_ref()
    }

    /// Stamps the name given at save time. A session is named at most once
    /// for its lifetime; the registry gates re-saving with a caller-visible
    /// error before ever calling this.
    pub(crate) fn stamp_name(&mut self, name: SessionName) {
        debug_assert!(self.name.is_none(), "session renamed after save");
        self.name = Some(name);
    }

    /// Walks branch 0 from the root and reports how deep the chain currently
    /// reaches (the maximum depth `chain_forward` could arrive at).
    pub fn max_reachable_depth(&self) -> usize {
        let mut list_id = self.root;
        let mut depth = 0;
        loop {
            let entry = self.tree.entry(self.tree.list(list_id).current_entry());
            match entry.first_branch() {
                Some(next) => {
                    list_id = next;
                    depth += 1;
                }
                None => return depth,
            }
        }
    }
}
