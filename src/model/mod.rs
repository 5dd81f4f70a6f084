// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Sessions own a tree of definition lists (branching peek-through history)
//! whose entries anchor into editable documents.

pub mod entry;
pub mod list;
pub mod name;
pub mod session;
pub mod tag;

pub use entry::{AnchorState, DefEntry, DocAnchor};
pub use list::{DefList, Window};
pub use name::{NameError, SessionName};
pub use session::{EntryId, ListId, PeekTree, Session};
pub use tag::DefinitionTag;
