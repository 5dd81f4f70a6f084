// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pull-based query surface for renderers.
//!
//! A renderer calls these after every state-changing operation; nothing here
//! pushes. Content fetches are the point where lazily accumulated scroll
//! offsets get clamped and anchors get resolved and cached.

use std::path::PathBuf;

use smol_str::SmolStr;

use crate::doc::{DocId, DocumentStore, Position};
use crate::model::{AnchorState, DocAnchor, EntryId, ListId, PeekTree, Session};
use crate::ops;

/// What a renderer shows for an entry whose document cannot be opened.
pub const UNAVAILABLE_PLACEHOLDER: &str = "(file unavailable)";

/// A captured window of document text, ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableText {
    pub lines: Vec<String>,
    pub available: bool,
    /// 0-based document line of `lines[0]`; `None` for the placeholder.
    pub start_line: Option<usize>,
}

impl RenderableText {
    fn unavailable() -> Self {
        Self {
            lines: vec![UNAVAILABLE_PLACEHOLDER.to_owned()],
            available: false,
            start_line: None,
        }
    }
}

/// Resolves (and caches) the entry's anchor.
///
/// A cached anchor is reused as long as it still points into the document for
/// the entry's path; one from a dead store generation is recomputed. A
/// document that cannot be opened caches `Unavailable` — queries degrade to
/// the placeholder until the entry is explicitly refreshed.
pub fn resolve_anchor(
    tree: &mut PeekTree,
    entry_id: EntryId,
    docs: &mut DocumentStore,
) -> Option<(DocId, Position)> {
    let entry = tree.entry(entry_id);
    match entry.anchor() {
        AnchorState::Resolved(anchor)
            if docs.anchor_doc_valid(anchor.doc(), entry.tag().path()) =>
        {
            let position = docs.get(anchor.doc()).marker_position(anchor.marker());
            return Some((anchor.doc(), position));
        }
        AnchorState::Unavailable => return None,
        _ => {}
    }

    let tag = tree.entry(entry_id).tag();
    let (path, line, pattern) = (
        tag.path().to_path_buf(),
        tag.line(),
        tag.pattern().map(str::to_owned),
    );
    match docs.open(&path) {
        Ok(doc_id) => {
            let at = docs.get(doc_id).locate(line, pattern.as_deref());
            let marker = docs.get_mut(doc_id).place_marker(at);
            tree.entry_mut(entry_id)
                .set_anchor(AnchorState::Resolved(DocAnchor::new(doc_id, marker)));
            Some((doc_id, docs.get(doc_id).marker_position(marker)))
        }
        Err(err) => {
            log::warn!("anchor degraded: {err}");
            tree.entry_mut(entry_id).set_anchor(AnchorState::Unavailable);
            None
        }
    }
}

/// Captures `height` lines of the entry's document, `line_offset` lines away
/// from its anchor.
///
/// An offset that would leave the document is clamped against its bounds and
/// the clamped value is written back into the entry, so scrolling can never
/// run away past an edge. An unavailable document yields the placeholder.
pub fn entry_content(
    tree: &mut PeekTree,
    entry_id: EntryId,
    docs: &mut DocumentStore,
    height: usize,
) -> RenderableText {
    let Some((doc_id, position)) = resolve_anchor(tree, entry_id, docs) else {
        return RenderableText::unavailable();
    };

    let doc = docs.get(doc_id);
    let anchor_line = position.line as i64;
    let last_line = doc.line_count().saturating_sub(1) as i64;
    let desired = anchor_line + tree.entry(entry_id).line_offset();
    let clamped = desired.clamp(0, last_line);
    if clamped != desired {
        tree.entry_mut(entry_id).set_line_offset(clamped - anchor_line);
    }

    let start = clamped as usize;
    RenderableText {
        lines: doc.lines_from(start, height),
        available: true,
        start_line: Some(start),
    }
}

/// Content of the session's current entry.
pub fn current_content(
    session: &mut Session,
    docs: &mut DocumentStore,
    height: usize,
) -> RenderableText {
    let entry_id = ops::current_entry(session);
    entry_content(session.tree_mut(), entry_id, docs, height)
}

/// One row of the definition list a renderer shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub id: EntryId,
    pub name: SmolStr,
    pub path: PathBuf,
    pub line: u64,
    pub kind: Option<String>,
    pub is_current: bool,
    pub has_branches: bool,
}

/// The entries inside the list's cached viewport window, in display order.
pub fn visible_entries(tree: &PeekTree, list_id: ListId) -> Vec<EntryView> {
    let list = tree.list(list_id);
    let window = list.window();
    (window.start()..=window.end())
        .map(|idx| {
            let entry_id = list.entries()[idx];
            let entry = tree.entry(entry_id);
            EntryView {
                id: entry_id,
                name: entry.tag().name().clone(),
                path: entry.tag().path().to_path_buf(),
                line: entry.tag().line(),
                kind: entry.tag().kind().map(str::to_owned),
                is_current: idx == list.index(),
                has_branches: entry.has_branches(),
            }
        })
        .collect()
}

/// How a chain link continues below its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// The current entry has never been peeked through.
    Ends,
    /// Exactly one branch: the chain continues without a choice.
    Linear,
    /// Sibling branches exist; branch rotation picks between them.
    Branching,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub symbol: Option<SmolStr>,
    pub active: bool,
    pub continuation: Continuation,
}

/// The chain of symbols along the branch-0 path, from the root as far as
/// branches exist. The link at the session's depth is flagged active; deeper
/// links are what `chain_forward` would reveal.
pub fn symbol_chain(session: &Session) -> Vec<ChainLink> {
    let tree = session.tree();
    let mut chain = Vec::new();
    let mut list_id = session.root();
    let mut hop = 0;
    loop {
        let list = tree.list(list_id);
        let entry = tree.entry(list.current_entry());
        let continuation = match entry.branches().len() {
            0 => Continuation::Ends,
            1 => Continuation::Linear,
            _ => Continuation::Branching,
        };
        chain.push(ChainLink {
            symbol: list.symbol().cloned(),
            active: hop == session.depth(),
            continuation,
        });
        match entry.first_branch() {
            Some(next) => {
                list_id = next;
                hop += 1;
            }
            None => return chain,
        }
    }
}

#[cfg(test)]
mod tests {
    use smol_str::SmolStr;

    use super::{
        current_content, entry_content, symbol_chain, visible_entries, Continuation,
        UNAVAILABLE_PLACEHOLDER,
    };
    use crate::doc::DocumentStore;
    use crate::model::DefinitionTag;
    use crate::ops;

    const HEIGHT: usize = 3;

    fn numbered_doc(docs: &mut DocumentStore, path: &str, lines: usize) {
        let content: String = (1..=lines).map(|n| format!("line {n}\n")).collect();
        docs.open_virtual(path, &content);
    }

    fn session_at(path: &str, line: u64) -> crate::model::Session {
        let tag = DefinitionTag::new("thing", path, line);
        ops::root_session(Some(SmolStr::new("thing")), vec![tag], 5).expect("session")
    }

    #[test]
    fn content_starts_at_the_anchor_line() {
        let mut docs = DocumentStore::new();
        numbered_doc(&mut docs, "/v/q1.rs", 20);
        let mut session = session_at("/v/q1.rs", 5);

        let text = current_content(&mut session, &mut docs, HEIGHT);
        assert!(text.available);
        assert_eq!(text.lines, vec!["line 5", "line 6", "line 7"]);
        assert_eq!(text.start_line, Some(4));
    }

    #[test]
    fn scroll_past_end_clamps_and_writes_back() {
        let mut docs = DocumentStore::new();
        numbered_doc(&mut docs, "/v/q2.rs", 10);
        let mut session = session_at("/v/q2.rs", 5);

        ops::scroll_current(&mut session, 100);
        let entry_id = ops::current_entry(&session);
        assert_eq!(session.tree().entry(entry_id).line_offset(), 100);

        let text = current_content(&mut session, &mut docs, HEIGHT);
        // Ten content lines plus ropey's final empty line: last line is 10.
        assert_eq!(text.start_line, Some(10));
        let clamped = session.tree().entry(entry_id).line_offset();
        assert_eq!(clamped, 6);

        // Once clamped, a second fetch is stable.
        let again = current_content(&mut session, &mut docs, HEIGHT);
        assert_eq!(again, text);
    }

    #[test]
    fn scroll_before_start_clamps_to_line_zero() {
        let mut docs = DocumentStore::new();
        numbered_doc(&mut docs, "/v/q3.rs", 10);
        let mut session = session_at("/v/q3.rs", 5);

        ops::scroll_current(&mut session, -50);
        let text = current_content(&mut session, &mut docs, HEIGHT);
        assert_eq!(text.start_line, Some(0));
        let entry_id = ops::current_entry(&session);
        assert_eq!(session.tree().entry(entry_id).line_offset(), -4);
    }

    #[test]
    fn missing_document_degrades_to_placeholder() {
        let mut docs = DocumentStore::new();
        let mut session = session_at("/nowhere/gone.rs", 1);

        let text = current_content(&mut session, &mut docs, HEIGHT);
        assert!(!text.available);
        assert_eq!(text.lines, vec![UNAVAILABLE_PLACEHOLDER.to_owned()]);
    }

    #[test]
    fn anchor_survives_insert_before_it() {
        let mut docs = DocumentStore::new();
        numbered_doc(&mut docs, "/v/q4.rs", 10);
        let mut session = session_at("/v/q4.rs", 5);

        let before = current_content(&mut session, &mut docs, 1);
        assert_eq!(before.lines, vec!["line 5"]);

        let doc_id = docs.lookup(std::path::Path::new("/v/q4.rs")).expect("doc");
        docs.get_mut(doc_id).insert(0, "// header\n// more\n");

        let after = current_content(&mut session, &mut docs, 1);
        assert_eq!(after.lines, vec!["line 5"]);
        assert_eq!(after.start_line, Some(6));
    }

    #[test]
    fn pattern_relocates_even_without_cached_anchor() {
        let mut docs = DocumentStore::new();
        docs.open_virtual("/v/q5.rs", "a\nb\nfn target() {}\nc\n");
        let mut tag = DefinitionTag::new("target", "/v/q5.rs", 1);
        tag.set_pattern(Some("fn target() {}".to_owned()));
        let mut session =
            ops::root_session(Some(SmolStr::new("target")), vec![tag], 5).expect("session");

        let text = current_content(&mut session, &mut docs, 1);
        assert_eq!(text.lines, vec!["fn target() {}"]);
    }

    #[test]
    fn visible_entries_follow_the_window() {
        let mut docs = DocumentStore::new();
        numbered_doc(&mut docs, "/v/q6.rs", 5);
        let tags: Vec<_> = (0..6)
            .map(|n| DefinitionTag::new(format!("c{n}").as_str(), "/v/q6.rs", 1))
            .collect();
        let mut session =
            ops::root_session(Some(SmolStr::new("c")), tags, 3).expect("session");

        let rows = visible_entries(session.tree(), session.root());
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_current);
        assert_eq!(rows[0].name.as_str(), "c0");

        ops::index_forward(&mut session, 4, 3);
        let rows = visible_entries(session.tree(), session.root());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.last().expect("row").name.as_str(), "c4");
        assert!(rows.last().expect("row").is_current);
    }

    #[test]
    fn chain_reports_active_depth_and_continuation() {
        let mut session = session_at("/v/q7.rs", 1);
        ops::push_branch(
            &mut session,
            SmolStr::new("inner"),
            vec![DefinitionTag::new("inner", "/v/q7.rs", 2)],
            5,
        )
        .expect("push");
        ops::push_branch(
            &mut session,
            SmolStr::new("deepest"),
            vec![DefinitionTag::new("deepest", "/v/q7.rs", 3)],
            5,
        )
        .expect("push");
        ops::chain_backward(&mut session, 5).expect("back");

        let chain = symbol_chain(&session);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].symbol.as_ref().map(SmolStr::as_str), Some("thing"));
        assert!(!chain[0].active);
        assert_eq!(chain[0].continuation, Continuation::Linear);
        assert!(chain[1].active);
        assert_eq!(chain[2].symbol.as_ref().map(SmolStr::as_str), Some("deepest"));
        assert_eq!(chain[2].continuation, Continuation::Ends);
    }

    #[test]
    fn unavailable_anchor_is_cached_until_refreshed() {
        let mut docs = DocumentStore::new();
        let mut session = session_at("/v/q8.rs", 2);

        let text = current_content(&mut session, &mut docs, 1);
        assert!(!text.available);

        // The document shows up afterwards (e.g. created on disk); a plain
        // refetch still degrades, an explicit refresh recovers.
        docs.open_virtual("/v/q8.rs", "one\ntwo\n");
        let text = current_content(&mut session, &mut docs, 1);
        assert!(!text.available);

        let entry_id = ops::current_entry(&session);
        session.tree_mut().entry_mut(entry_id).invalidate_anchor();
        let text = entry_content(session.tree_mut(), entry_id, &mut docs, 1);
        assert_eq!(text.lines, vec!["two"]);
    }
}
