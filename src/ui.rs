// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared browsing context.
//!
//! Every operation receives this explicit context (active-session selector,
//! registry, config, display flag) — there is no module-level current
//! session.

use crate::ace::{AceError, AceKeys};
use crate::model::{Session, SessionName};
use crate::store::{SessionRegistry, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeekConfig {
    /// Visible entries of the browsed definition list.
    pub list_height: usize,
    /// Captured content lines per entry.
    pub content_height: usize,
    /// Ace selection alphabet, in assignment order.
    pub ace_alphabet: String,
    /// Dedicated ace cancel keys (Escape and Ctrl-G by default).
    pub ace_cancel: Vec<char>,
}

impl Default for PeekConfig {
    fn default() -> Self {
        Self {
            list_height: 5,
            content_height: 12,
            ace_alphabet: "asdfjklewcmpgh".to_owned(),
            ace_cancel: vec!['\u{1b}', '\u{7}'],
        }
    }
}

impl PeekConfig {
    pub fn ace_keys(&self) -> Result<AceKeys, AceError> {
        AceKeys::new(&self.ace_alphabet, &self.ace_cancel)
    }
}

/// Which session the context currently points commands at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSession {
    None,
    Recent,
    Named(SessionName),
}

/// The one value threaded through every user-driven operation.
#[derive(Debug)]
pub struct PeekContext {
    config: PeekConfig,
    registry: SessionRegistry,
    active: ActiveSession,
    display_active: bool,
}

impl PeekContext {
    pub fn new(config: PeekConfig) -> Self {
        Self {
            config,
            registry: SessionRegistry::new(),
            active: ActiveSession::None,
            display_active: false,
        }
    }

    pub fn config(&self) -> &PeekConfig {
        &self.config
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SessionRegistry {
        &mut self.registry
    }

    pub fn display_active(&self) -> bool {
        self.display_active
    }

    pub fn set_display_active(&mut self, display_active: bool) {
        self.display_active = display_active;
    }

    pub fn active(&self) -> &ActiveSession {
        &self.active
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.active {
            ActiveSession::None => None,
            ActiveSession::Recent => self.registry.recent(),
            ActiveSession::Named(name) => self.registry.get(name.as_str()),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match &self.active {
            ActiveSession::None => None,
            ActiveSession::Recent => self.registry.recent_mut(),
            ActiveSession::Named(name) => {
                let name = name.clone();
                self.registry.load(name.as_str())
            }
        }
    }

    /// Starts browsing a freshly rooted session, superseding the previous
    /// unsaved one.
    pub fn open_session(&mut self, session: Session) {
        self.registry.open_recent(session);
        self.active = ActiveSession::Recent;
        self.display_active = true;
    }

    /// Saves the active session. A session that already has a name keeps it;
    /// the error carries that first name as the notice.
    pub fn save_active(&mut self, name: SessionName) -> Result<(), StoreError> {
        match &self.active {
            ActiveSession::None => Err(StoreError::NoRecentSession),
            ActiveSession::Named(existing) => Err(StoreError::AlreadySaved {
                name: existing.clone(),
            }),
            ActiveSession::Recent => {
                self.registry.save_recent(name.clone())?;
                self.active = ActiveSession::Named(name);
                Ok(())
            }
        }
    }

    /// Switches browsing to a saved session, exactly as it was left.
    pub fn load_session(&mut self, name: &str) -> Result<(), StoreError> {
        let parsed = SessionName::new(name).map_err(|source| StoreError::InvalidName {
            name: name.to_owned(),
            source,
        })?;
        if self.registry.get(parsed.as_str()).is_none() {
            return Err(StoreError::UnknownName {
                name: name.to_owned(),
            });
        }
        self.active = ActiveSession::Named(parsed);
        self.display_active = true;
        Ok(())
    }
}
