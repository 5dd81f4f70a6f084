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

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::{
    DefEntry, DefList, DefinitionTag, ListId, NameError, PeekTree, Session, SessionName,
};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum StoreError {
    /// The active session was already saved; its first name sticks.
    AlreadySaved { name: SessionName },
    NameTaken { name: SessionName },
    NoRecentSession,
    UnknownName { name: String },
    InvalidName { name: String, source: NameError },
    Io { path: PathBuf, source: io::Error },
    Snapshot { path: PathBuf, source: serde_json::Error },
    SnapshotVersion { path: PathBuf, found: u32 },
    EmptySnapshotList { name: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySaved { name } => {
                write!(f, "session is already saved as '{name}'")
            }
            Self::NameTaken { name } => write!(f, "a session named '{name}' already exists"),
            Self::NoRecentSession => f.write_str("no session to save"),
            Self::UnknownName { name } => write!(f, "no saved session named '{name}'"),
            Self::InvalidName { name, source } => {
                write!(f, "invalid session name '{name}': {source}")
            }
            Self::Io { path, source } => {
                write!(f, "snapshot i/o failed for {}: {source}", path.display())
            }
            Self::Snapshot { path, source } => {
                write!(f, "malformed snapshot {}: {source}", path.display())
            }
            Self::SnapshotVersion { path, found } => write!(
                f,
                "snapshot {} has version {found}, expected {SNAPSHOT_VERSION}",
                path.display()
            ),
            Self::EmptySnapshotList { name } => {
                write!(f, "snapshot session '{name}' contains an empty definition list")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidName { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Snapshot { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Owns every live session: the single most-recent (unsaved) slot plus the
/// named map.
///
/// Opening a new recent session supersedes the previous unsaved one for good.
/// Saving moves the recent session into the named map, stamping its name;
/// loading hands back the same mutable state, never a copy.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    recent: Option<Session>,
    named: BTreeMap<SessionName, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_recent(&mut self, session: Session) {
        if self.recent.is_some() {
            log::debug!("recent session superseded");
        }
        self.recent = Some(session);
    }

    pub fn recent(&self) -> Option<&Session> {
        self.recent.as_ref()
    }

    pub fn recent_mut(&mut self) -> Option<&mut Session> {
        self.recent.as_mut()
    }

    /// Promotes the recent session into the named map under a unique name.
    pub fn save_recent(&mut self, name: SessionName) -> Result<(), StoreError> {
        let recent = self.recent.as_ref().ok_or(StoreError::NoRecentSession)?;
        if let Some(existing) = recent.name() {
            return Err(StoreError::AlreadySaved {
                name: existing.clone(),
            });
        }
        if self.named.contains_key(&name) {
            return Err(StoreError::NameTaken { name });
        }

        let mut session = self.recent.take().expect("recent checked above");
        session.stamp_name(name.clone());
        log::debug!("session saved as '{name}'");
        self.named.insert(name, session);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Session> {
        self.named.get(name)
    }

    /// The saved session, with the exact mutable state it had when saved.
    pub fn load(&mut self, name: &str) -> Option<&mut Session> {
        self.named.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &SessionName> {
        self.named.keys()
    }

    pub fn saved_count(&self) -> usize {
        self.named.len()
    }

    fn insert_named(&mut self, name: SessionName, session: Session) -> Result<(), StoreError> {
        if self.named.contains_key(&name) {
            return Err(StoreError::NameTaken { name });
        }
        self.named.insert(name, session);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    sessions: Vec<SessionSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionSnapshot {
    name: String,
    depth: usize,
    root: ListSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListSnapshot {
    symbol: Option<String>,
    index: usize,
    entries: Vec<EntrySnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntrySnapshot {
    name: String,
    path: PathBuf,
    line: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    line_offset: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    branches: Vec<ListSnapshot>,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn list_to_snapshot(tree: &PeekTree, list_id: ListId) -> ListSnapshot {
    let list = tree.list(list_id);
    let entries = list
        .entries()
        .iter()
        .map(|&entry_id| {
            let entry = tree.entry(entry_id);
            let tag = entry.tag();
            EntrySnapshot {
                name: tag.name().to_string(),
                path: tag.path().to_path_buf(),
                line: tag.line(),
                pattern: tag.pattern().map(str::to_owned),
                kind: tag.kind().map(str::to_owned),
                signature: tag.signature().map(str::to_owned),
                line_offset: entry.line_offset(),
                branches: entry
                    .branches()
                    .iter()
                    .map(|&branch| list_to_snapshot(tree, branch))
                    .collect(),
            }
        })
        .collect();
    ListSnapshot {
        symbol: list.symbol().map(SmolStr::to_string),
        index: list.index(),
        entries,
    }
}

fn list_from_snapshot(
    snapshot: &ListSnapshot,
    tree: &mut PeekTree,
    height: usize,
    session_name: &str,
) -> Result<ListId, StoreError> {
    if snapshot.entries.is_empty() {
        return Err(StoreError::EmptySnapshotList {
            name: session_name.to_owned(),
        });
    }

    let mut entry_ids = Vec::with_capacity(snapshot.entries.len());
    for entry in &snapshot.entries {
        let mut tag = DefinitionTag::new(entry.name.as_str(), entry.path.clone(), entry.line);
        tag.set_pattern(entry.pattern.clone());
        tag.set_kind(entry.kind.clone());
        tag.set_signature(entry.signature.clone());

        let mut def_entry = DefEntry::new(tag);
        def_entry.set_line_offset(entry.line_offset);
        let entry_id = tree.insert_entry(def_entry);
        // The snapshot stores branches most-recent first already.
        for branch in &entry.branches {
            let branch_id = list_from_snapshot(branch, tree, height, session_name)?;
            tree.entry_mut(entry_id).push_branch_back(branch_id);
        }
        entry_ids.push(entry_id);
    }

    let symbol = snapshot.symbol.as_deref().map(SmolStr::new);
    let mut list = DefList::new(entry_ids, symbol, height);
    list.restore_index(snapshot.index, height);
    Ok(tree.insert_list(list))
}

fn session_from_snapshot(
    snapshot: &SessionSnapshot,
    height: usize,
) -> Result<(SessionName, Session), StoreError> {
    let name = SessionName::new(snapshot.name.clone()).map_err(|source| {
        StoreError::InvalidName {
            name: snapshot.name.clone(),
            source,
        }
    })?;

    let mut tree = PeekTree::new();
    let root = list_from_snapshot(&snapshot.root, &mut tree, height, &snapshot.name)?;
    let mut session = Session::new(tree, root);
    session.stamp_name(name.clone());
    let depth = snapshot.depth.min(session.max_reachable_depth());
    session.set_depth(depth);
    Ok((name, session))
}

/// Writes every named session to a JSON snapshot. The recent (unsaved) slot
/// is not exported: an unsaved session has no identity to come back under.
pub fn write_snapshot(registry: &SessionRegistry, path: &Path) -> Result<(), StoreError> {
    let sessions = registry
        .named
        .values()
        .map(|session| SessionSnapshot {
            name: session
                .name()
                .expect("named sessions are always stamped")
                .to_string(),
            depth: session.depth(),
            root: list_to_snapshot(session.tree(), session.root()),
        })
        .collect();
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        sessions,
    };

    let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a snapshot back into the registry. Anchors are not stored; they
/// re-resolve lazily on first content fetch. Sessions whose name is already
/// taken are skipped. Returns how many sessions were imported.
pub fn load_snapshot(
    registry: &mut SessionRegistry,
    path: &Path,
    height: usize,
) -> Result<usize, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SnapshotFile =
        serde_json::from_str(&content).map_err(|source| StoreError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
    if file.version != SNAPSHOT_VERSION {
        return Err(StoreError::SnapshotVersion {
            path: path.to_path_buf(),
            found: file.version,
        });
    }

    let mut imported = 0;
    for snapshot in &file.sessions {
        let (name, session) = session_from_snapshot(snapshot, height)?;
        match registry.insert_named(name, session) {
            Ok(()) => imported += 1,
            Err(StoreError::NameTaken { name }) => {
                log::warn!("snapshot session '{name}' skipped: name already in use");
            }
            Err(other) => return Err(other),
        }
    }
    Ok(imported)
}

#[cfg(test)]
mod tests;
