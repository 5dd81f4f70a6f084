// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};
use smol_str::SmolStr;

use super::{load_snapshot, write_snapshot, SessionRegistry, StoreError};
use crate::model::{DefinitionTag, Session, SessionName};
use crate::ops;

const HEIGHT: usize = 5;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn name(raw: &str) -> SessionName {
    SessionName::new(raw).expect("session name")
}

fn branched_session() -> Session {
    let mut session = ops::root_session(
        Some(SmolStr::new("outer")),
        vec![
            DefinitionTag::new("outer", "/p/a.rs", 10),
            DefinitionTag::new("outer", "/p/b.rs", 20),
        ],
        HEIGHT,
    )
    .expect("session");
    ops::index_forward(&mut session, 1, HEIGHT);
    ops::push_branch(
        &mut session,
        SmolStr::new("inner"),
        vec![DefinitionTag::new("inner", "/p/c.rs", 3)],
        HEIGHT,
    )
    .expect("push");
    ops::scroll_current(&mut session, 2);
    session
}

#[fixture]
fn registry() -> SessionRegistry {
    let mut registry = SessionRegistry::new();
    registry.open_recent(branched_session());
    registry
}

#[rstest]
fn save_stamps_name_and_moves_out_of_recent(mut registry: SessionRegistry) {
    registry.save_recent(name("walk")).expect("save");
    assert!(registry.recent().is_none());
    let saved = registry.get("walk").expect("saved");
    assert_eq!(saved.name().map(SessionName::as_str), Some("walk"));
}

#[rstest]
fn save_rejects_taken_name(mut registry: SessionRegistry) {
    registry.save_recent(name("walk")).expect("save");
    registry.open_recent(branched_session());
    let err = registry.save_recent(name("walk")).unwrap_err();
    assert!(matches!(err, StoreError::NameTaken { .. }));
    // The recent session is untouched and can be saved under another name.
    registry.save_recent(name("walk-2")).expect("save");
}

#[rstest]
fn save_without_recent_session_fails(mut registry: SessionRegistry) {
    registry.save_recent(name("walk")).expect("save");
    let err = registry.save_recent(name("other")).unwrap_err();
    assert!(matches!(err, StoreError::NoRecentSession));
}

#[rstest]
fn load_returns_the_same_mutable_state(mut registry: SessionRegistry) {
    registry.save_recent(name("walk")).expect("save");

    {
        let session = registry.load("walk").expect("load");
        assert_eq!(session.depth(), 1);
        ops::chain_backward(session, HEIGHT).expect("back");
    }

    // No clone, no reset: the mutation is visible on the next load.
    let session = registry.load("walk").expect("load");
    assert_eq!(session.depth(), 0);
}

#[rstest]
fn opening_a_new_recent_supersedes_the_unsaved_one(mut registry: SessionRegistry) {
    let fresh = ops::root_session(
        Some(SmolStr::new("other")),
        vec![DefinitionTag::new("other", "/p/z.rs", 1)],
        HEIGHT,
    )
    .expect("session");
    registry.open_recent(fresh);

    let recent = registry.recent().expect("recent");
    let list = recent.tree().list(recent.root());
    assert_eq!(list.symbol().map(SmolStr::as_str), Some("other"));
    assert_eq!(registry.saved_count(), 0);
}

#[rstest]
fn snapshot_roundtrip_preserves_navigation_state(mut registry: SessionRegistry) {
    registry.save_recent(name("walk")).expect("save");
    let tmp = TempDir::new("snapshot");
    let path = tmp.path().join("sessions.json");

    write_snapshot(&registry, &path).expect("write");

    let mut restored = SessionRegistry::new();
    let imported = load_snapshot(&mut restored, &path, HEIGHT).expect("load");
    assert_eq!(imported, 1);

    let original = registry.get("walk").expect("original");
    let session = restored.get("walk").expect("restored");
    assert_eq!(session.depth(), 1);
    assert_eq!(session.name().map(SessionName::as_str), Some("walk"));

    let root = session.tree().list(session.root());
    let original_root = original.tree().list(original.root());
    assert_eq!(root.index(), original_root.index());
    assert_eq!(root.len(), original_root.len());

    // The branch, its symbol, and the scrolled offset all survive.
    let entry = session.tree().entry(root.current_entry());
    let branch = session.tree().list(entry.first_branch().expect("branch"));
    assert_eq!(branch.symbol().map(SmolStr::as_str), Some("inner"));
    let inner = session.tree().entry(branch.current_entry());
    assert_eq!(inner.line_offset(), 2);
    assert_eq!(inner.tag().path(), std::path::Path::new("/p/c.rs"));
}

#[rstest]
fn snapshot_import_skips_colliding_names(mut registry: SessionRegistry) {
    registry.save_recent(name("walk")).expect("save");
    let tmp = TempDir::new("collide");
    let path = tmp.path().join("sessions.json");
    write_snapshot(&registry, &path).expect("write");

    // Importing into the same registry collides on every name.
    let imported = load_snapshot(&mut registry, &path, HEIGHT).expect("load");
    assert_eq!(imported, 0);
    assert_eq!(registry.saved_count(), 1);
}

#[test]
fn snapshot_rejects_unknown_version() {
    let tmp = TempDir::new("version");
    let path = tmp.path().join("sessions.json");
    std::fs::write(&path, r#"{"version":99,"sessions":[]}"#).unwrap();

    let mut fresh = SessionRegistry::new();
    let err = load_snapshot(&mut fresh, &path, HEIGHT).unwrap_err();
    assert!(matches!(err, StoreError::SnapshotVersion { found: 99, .. }));
}

#[test]
fn snapshot_read_of_missing_file_is_an_io_error() {
    let mut registry = SessionRegistry::new();
    let err = load_snapshot(
        &mut registry,
        std::path::Path::new("/definitely/not/here.json"),
        HEIGHT,
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}
