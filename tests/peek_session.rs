// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end walk over a real on-disk fixture: tags lookup, session
//! rooting, peek-through, edit resilience, and registry round trips.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use smol_str::SmolStr;

use proteus::doc::DocumentStore;
use proteus::model::SessionName;
use proteus::ops;
use proteus::query;
use proteus::resolve::TagFileResolver;
use proteus::store::{self, SessionRegistry};

const HEIGHT: usize = 5;
const CONTENT_HEIGHT: usize = 3;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const LIB_RS: &str = "\
pub fn fetch() -> u32 {
    decode()
}

fn decode() -> u32 {
    7
}
";

const UTIL_RS: &str = "\
pub fn decode() -> u32 {
    0
}
";

/// Writes a tiny crate-shaped fixture plus the tags file describing it.
fn write_fixture(dir: &Path) -> PathBuf {
    fs::write(dir.join("lib.rs"), LIB_RS).unwrap();
    fs::write(dir.join("util.rs"), UTIL_RS).unwrap();

    let tags = concat!(
        "decode\tlib.rs\t/^fn decode() -> u32 {$/;\"\tf\tline:5\n",
        "decode\tutil.rs\t/^pub fn decode() -> u32 {$/;\"\tf\tline:1\n",
        "fetch\tlib.rs\t/^pub fn fetch() -> u32 {$/;\"\tf\tline:1\n",
    );
    let tags_path = dir.join("tags");
    fs::write(&tags_path, tags).unwrap();
    tags_path
}

#[test]
fn peek_walk_edit_and_restore() {
    let tmp = TempDir::new("walk");
    let tags_path = write_fixture(tmp.path());

    let resolver = TagFileResolver::from_file(&tags_path).expect("tags");
    let mut docs = DocumentStore::new();

    // Root a session at `fetch`.
    let tags = resolver.lookup("fetch");
    assert_eq!(tags.len(), 1);
    let mut session =
        ops::root_session(Some(SmolStr::new("fetch")), tags, HEIGHT).expect("session");

    let content = query::current_content(&mut session, &mut docs, CONTENT_HEIGHT);
    assert!(content.available);
    assert_eq!(content.lines[0], "pub fn fetch() -> u32 {");

    // Peek through to `decode`: two candidates, sibling comparison works.
    let decode = resolver.lookup("decode");
    assert_eq!(decode.len(), 2);
    ops::push_branch(&mut session, SmolStr::new("decode"), decode, HEIGHT).expect("push");
    assert_eq!(session.depth(), 1);

    let content = query::current_content(&mut session, &mut docs, CONTENT_HEIGHT);
    assert_eq!(content.lines[0], "fn decode() -> u32 {");

    ops::index_forward(&mut session, 1, HEIGHT);
    let content = query::current_content(&mut session, &mut docs, CONTENT_HEIGHT);
    assert_eq!(content.lines[0], "pub fn decode() -> u32 {");

    // An edit above the first candidate does not disturb its anchor.
    ops::index_forward(&mut session, 1, HEIGHT);
    let lib_path = tmp.path().join("lib.rs");
    let lib_id = docs.lookup(&lib_path).expect("lib.rs resident");
    docs.get_mut(lib_id).insert(0, "//! docs\n//! more docs\n");

    let content = query::current_content(&mut session, &mut docs, CONTENT_HEIGHT);
    assert_eq!(content.lines[0], "fn decode() -> u32 {");
    assert_eq!(content.start_line, Some(6));

    // The chain names both hops, with the active one at depth 1.
    let chain = query::symbol_chain(&session);
    let symbols: Vec<_> = chain
        .iter()
        .map(|link| link.symbol.as_ref().map(SmolStr::as_str))
        .collect();
    assert_eq!(symbols, vec![Some("fetch"), Some("decode")]);
    assert!(chain[1].active);

    // Save, snapshot, and restore into a fresh registry: the tree comes back
    // and its anchors re-resolve against a fresh document pool.
    let mut registry = SessionRegistry::new();
    registry.open_recent(session);
    registry
        .save_recent(SessionName::new("walk").expect("name"))
        .expect("save");

    let snapshot_path = tmp.path().join("sessions.json");
    store::write_snapshot(&registry, &snapshot_path).expect("write snapshot");

    let mut restored = SessionRegistry::new();
    assert_eq!(
        store::load_snapshot(&mut restored, &snapshot_path, HEIGHT).expect("load snapshot"),
        1
    );
    let session = restored.load("walk").expect("restored session");
    assert_eq!(session.depth(), 1);

    let mut fresh_docs = DocumentStore::new();
    let content = query::current_content(session, &mut fresh_docs, CONTENT_HEIGHT);
    assert!(content.available);
    // The on-disk file was never edited, so the pattern finds the original
    // line again.
    assert_eq!(content.lines[0], "fn decode() -> u32 {");
    assert_eq!(content.start_line, Some(4));
}

#[test]
fn missing_fixture_file_degrades_to_placeholder() {
    let tmp = TempDir::new("missing");
    let tags_path = write_fixture(tmp.path());
    let resolver = TagFileResolver::from_file(&tags_path).expect("tags");

    fs::remove_file(tmp.path().join("util.rs")).unwrap();

    let mut docs = DocumentStore::new();
    let decode = resolver.lookup("decode");
    let mut session =
        ops::root_session(Some(SmolStr::new("decode")), decode, HEIGHT).expect("session");

    // Candidate 0 (lib.rs) renders; candidate 1 (util.rs) degrades without
    // taking the session down.
    let content = query::current_content(&mut session, &mut docs, CONTENT_HEIGHT);
    assert!(content.available);

    ops::index_forward(&mut session, 1, HEIGHT);
    let content = query::current_content(&mut session, &mut docs, CONTENT_HEIGHT);
    assert!(!content.available);
    assert_eq!(content.lines, vec![query::UNAVAILABLE_PLACEHOLDER.to_owned()]);

    ops::index_forward(&mut session, 1, HEIGHT);
    let content = query::current_content(&mut session, &mut docs, CONTENT_HEIGHT);
    assert!(content.available);
}
