// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use smol_str::SmolStr;

use proteus::model::{DefinitionTag, Session};
use proteus::ops;

pub const HEIGHT: usize = 5;

pub fn tags(symbol: &str, count: usize) -> Vec<DefinitionTag> {
    (0..count)
        .map(|idx| {
            let mut tag = DefinitionTag::new(
                symbol,
                format!("/bench/src/file_{idx:04}.rs"),
                (idx as u64) * 10 + 1,
            );
            tag.set_pattern(Some(format!("fn {symbol}_{idx}() {{")));
            tag
        })
        .collect()
}

/// A wide session: one list with `width` candidates.
pub fn wide_session(width: usize) -> Session {
    ops::root_session(Some(SmolStr::new("wide")), tags("wide", width), HEIGHT)
        .expect("bench session has candidates")
}

/// A deep session: `depth` single-candidate hops chained below the root,
/// browsed back to the root.
pub fn deep_session(depth: usize) -> Session {
    let mut session = wide_session(2);
    for level in 0..depth {
        let symbol = format!("hop_{level:03}");
        ops::push_branch(
            &mut session,
            SmolStr::new(&symbol),
            tags(&symbol, 2),
            HEIGHT,
        )
        .expect("bench push");
    }
    while session.depth() > 0 {
        ops::chain_backward(&mut session, HEIGHT).expect("bench rewind");
    }
    session
}
