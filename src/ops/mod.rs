// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation operations over peek sessions.
//!
//! Everything here is a synchronous, single-writer mutation of one session.
//! Caller-visible failures (empty candidate sets, walking past an end of the
//! chain) come back as [`OpError`]; a broken depth invariant is a programming
//! error and panics.

use std::fmt;

use smol_str::SmolStr;

use crate::model::{DefEntry, DefList, DefinitionTag, EntryId, ListId, PeekTree, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpError {
    /// A definition list cannot be built from zero candidates.
    EmptyCandidates,
    /// `chain_backward` at depth 0.
    AtRoot,
    /// `chain_forward` on an entry that has never been peeked through.
    AtLeaf,
    /// Branch deletion on an entry with no branches.
    NoBranches,
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCandidates => f.write_str("no candidate definitions"),
            Self::AtRoot => f.write_str("already at the first list of the chain"),
            Self::AtLeaf => f.write_str("no deeper list in the chain"),
            Self::NoBranches => f.write_str("current definition has no branches"),
        }
    }
}

impl std::error::Error for OpError {}

/// Builds a session rooted at one definition list.
///
/// `symbol` is absent only when the list exists to anchor the very start of a
/// session (peeking from an explicit location rather than a lookup).
pub fn root_session(
    symbol: Option<SmolStr>,
    tags: Vec<DefinitionTag>,
    height: usize,
) -> Result<Session, OpError> {
    if tags.is_empty() {
        return Err(OpError::EmptyCandidates);
    }
    let mut tree = PeekTree::new();
    let entries = tags
        .into_iter()
        .map(|tag| tree.insert_entry(DefEntry::new(tag)))
        .collect();
    let root = tree.insert_list(DefList::new(entries, symbol, height));
    Ok(Session::new(tree, root))
}

/// The list the user is currently browsing: `depth` branch-0 hops from the
/// root.
pub fn current_list(session: &Session) -> ListId {
    let tree = session.tree();
    let mut list_id = session.root();
    for hop in 0..session.depth() {
        let entry = tree.entry(tree.list(list_id).current_entry());
        list_id = entry.first_branch().unwrap_or_else(|| {
            panic!(
                "branch chain broken at hop {hop} (depth {})",
                session.depth()
            )
        });
    }
    list_id
}

pub fn current_entry(session: &Session) -> EntryId {
    session.tree().list(current_list(session)).current_entry()
}

/// Moves the cursor of the current list by `n`, wrapping modulo its length.
pub fn index_forward(session: &mut Session, n: i64, height: usize) {
    let list_id = current_list(session);
    session.tree_mut().list_mut(list_id).index_forward(n, height);
}

pub fn move_current_up(session: &mut Session, height: usize) {
    let list_id = current_list(session);
    session.tree_mut().list_mut(list_id).move_current_up(height);
}

pub fn move_current_down(session: &mut Session, height: usize) {
    let list_id = current_list(session);
    session.tree_mut().list_mut(list_id).move_current_down(height);
}

pub fn make_current_first(session: &mut Session, height: usize) {
    let list_id = current_list(session);
    session.tree_mut().list_mut(list_id).make_current_first(height);
}

/// Scrolls the current entry's content. Only accumulates the offset — the
/// clamp happens on the next content fetch.
pub fn scroll_current(session: &mut Session, delta: i64) {
    let entry_id = current_entry(session);
    session.tree_mut().entry_mut(entry_id).scroll(delta);
}

/// Peek-through: attaches a fresh definition list under the current entry
/// and steps into it.
///
/// Fails on an empty candidate set with `depth` and `branches` untouched.
pub fn push_branch(
    session: &mut Session,
    symbol: SmolStr,
    tags: Vec<DefinitionTag>,
    height: usize,
) -> Result<(), OpError> {
    if tags.is_empty() {
        return Err(OpError::EmptyCandidates);
    }
    log::debug!(
        "push branch '{symbol}' with {} candidates at depth {}",
        tags.len(),
        session.depth()
    );

    let entry_id = current_entry(session);
    let tree = session.tree_mut();
    let entries = tags
        .into_iter()
        .map(|tag| tree.insert_entry(DefEntry::new(tag)))
        .collect();
    let list_id = tree.insert_list(DefList::new(entries, Some(symbol), height));
    tree.entry_mut(entry_id).push_branch_front(list_id);
    session.set_depth(session.depth() + 1);
    Ok(())
}

/// Steps one hop deeper along branch 0 of the current entry.
pub fn chain_forward(session: &mut Session, height: usize) -> Result<(), OpError> {
    let entry_id = current_entry(session);
    let revealed = session
        .tree()
        .entry(entry_id)
        .first_branch()
        .ok_or(OpError::AtLeaf)?;
    session.set_depth(session.depth() + 1);
    session.tree_mut().list_mut(revealed).refit_window(height);
    Ok(())
}

/// Steps one hop back towards the root.
pub fn chain_backward(session: &mut Session, height: usize) -> Result<(), OpError> {
    if session.depth() == 0 {
        return Err(OpError::AtRoot);
    }
    session.set_depth(session.depth() - 1);
    let list_id = current_list(session);
    session.tree_mut().list_mut(list_id).refit_window(height);
    Ok(())
}

/// Rotates the current entry's branches so the next sibling branch becomes
/// the one the chain follows. Does not navigate into it.
pub fn next_branch(session: &mut Session) {
    let entry_id = current_entry(session);
    session.tree_mut().entry_mut(entry_id).rotate_branches_next();
}

pub fn prev_branch(session: &mut Session) {
    let entry_id = current_entry(session);
    session.tree_mut().entry_mut(entry_id).rotate_branches_prev();
}

/// Deletes the current entry's branch 0 (the caller has already confirmed).
pub fn delete_first_branch(session: &mut Session) -> Result<(), OpError> {
    let entry_id = current_entry(session);
    let removed = session.tree_mut().entry_mut(entry_id).remove_first_branch();
    if removed.is_none() {
        return Err(OpError::NoBranches);
    }
    clamp_depth(session);
    Ok(())
}

/// Deletes all branches of the current entry (the caller has already
/// confirmed). Returns how many were removed.
pub fn delete_all_branches(session: &mut Session) -> Result<usize, OpError> {
    let entry_id = current_entry(session);
    let removed = session.tree_mut().entry_mut(entry_id).clear_branches();
    if removed == 0 {
        return Err(OpError::NoBranches);
    }
    clamp_depth(session);
    Ok(removed)
}

/// After a branch deletion, any depth pointing past the surviving chain is
/// meaningless; pull it back to the deepest reachable hop.
fn clamp_depth(session: &mut Session) {
    let max = session.max_reachable_depth();
    if session.depth() > max {
        log::debug!("clamp depth {} -> {max}", session.depth());
        session.set_depth(max);
    }
}
