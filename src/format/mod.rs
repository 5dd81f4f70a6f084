// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Definition-index format parsing.
//!
//! Currently this module covers the Universal Ctags tags-file format.

pub mod ctags;

pub use ctags::{parse_tags, CtagsParseError};
