// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Saved-session registry and snapshot export.
//!
//! Sessions live in memory; the JSON snapshot is an explicit export so a
//! browsing tree can outlive the process.

pub mod registry;

pub use registry::{load_snapshot, write_snapshot, SessionRegistry, StoreError};
