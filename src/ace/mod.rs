// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ace selection: shortest unambiguous key sequences over ordered on-screen
//! candidates, resolved one keystroke at a time.
//!
//! The selector is a pure state machine; the caller owns the input loop and
//! the overlay that shows each candidate its remaining sequence.

use std::collections::HashSet;
use std::fmt;

use smallvec::SmallVec;

/// Key sequences stay short (one or two keys for realistic candidate counts),
/// so they live inline.
pub type AceSeq = SmallVec<[char; 4]>;

/// Validated key configuration: the selection alphabet plus dedicated cancel
/// keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AceKeys {
    alphabet: Vec<char>,
    cancel: Vec<char>,
}

impl AceKeys {
    pub fn new(alphabet: &str, cancel: &[char]) -> Result<Self, AceError> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        // Uniform-length sequences over a single key cannot tell candidates
        // apart, so one key is as invalid as none.
        if alphabet.len() < 2 {
            return Err(AceError::TooFewKeys {
                found: alphabet.len(),
            });
        }
        let mut seen = HashSet::with_capacity(alphabet.len());
        for &key in &alphabet {
            if !seen.insert(key) {
                return Err(AceError::DuplicateKey { key });
            }
        }
        for &key in cancel {
            if seen.contains(&key) {
                return Err(AceError::CancelInAlphabet { key });
            }
        }
        Ok(Self {
            alphabet,
            cancel: cancel.to_vec(),
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn alphabet_len(&self) -> usize {
        self.alphabet.len()
    }

    pub fn is_cancel(&self, key: char) -> bool {
        self.cancel.contains(&key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AceError {
    TooFewKeys { found: usize },
    DuplicateKey { key: char },
    CancelInAlphabet { key: char },
}

impl fmt::Display for AceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewKeys { found } => {
                write!(f, "ace alphabet needs at least two distinct keys (found {found})")
            }
            Self::DuplicateKey { key } => write!(f, "ace alphabet repeats key '{key}'"),
            Self::CancelInAlphabet { key } => {
                write!(f, "cancel key '{key}' is also a selection key")
            }
        }
    }
}

impl std::error::Error for AceError {}

/// Sequence length needed to tell `n` candidates apart with a `k`-key
/// alphabet: the smallest `L` with `k^L >= n` (0 for no candidates, 1 for a
/// single candidate — selection always takes a deliberate keystroke).
pub fn sequence_len(n: usize, k: usize) -> usize {
    debug_assert!(k >= 2, "alphabet validated to hold at least two keys");
    if n == 0 {
        return 0;
    }
    let mut len = 1;
    let mut reach = k;
    while reach < n {
        reach = reach.saturating_mul(k);
        len += 1;
    }
    len
}

/// Assigns each of `n` candidates a distinct sequence of uniform length
/// `sequence_len(n, k)`: candidate `i` spells `i` in base `k` over the
/// alphabet, most significant digit first. At every typed step the live
/// candidates split as evenly as the counting scheme allows.
pub fn assign_sequences(n: usize, keys: &AceKeys) -> Vec<AceSeq> {
    let k = keys.alphabet_len();
    let len = sequence_len(n, k);
    let mut sequences = Vec::with_capacity(n);
    for i in 0..n {
        let mut seq = AceSeq::from_elem(keys.alphabet()[0], len);
        let mut rest = i;
        for pos in (0..len).rev() {
            seq[pos] = keys.alphabet()[rest % k];
            rest /= k;
        }
        sequences.push(seq);
    }
    sequences
}

/// Result of feeding one keystroke to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AceStep {
    /// More keystrokes needed.
    Pending,
    /// Exactly one candidate's sequence was fully typed.
    Selected(usize),
    /// A cancel key ended the process with no selection.
    Cancelled,
    /// The key matched no live candidate; state is unchanged.
    Ignored,
}

/// Incremental resolution state: one nullable remaining-sequence slot per
/// candidate.
#[derive(Debug, Clone)]
pub struct AceSelector {
    keys: AceKeys,
    remaining: Vec<Option<AceSeq>>,
}

impl AceSelector {
    pub fn new(candidate_count: usize, keys: AceKeys) -> Self {
        let remaining = assign_sequences(candidate_count, &keys)
            .into_iter()
            .map(Some)
            .collect();
        Self { keys, remaining }
    }

    pub fn candidate_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn live_count(&self) -> usize {
        self.remaining.iter().flatten().count()
    }

    /// What the user still has to type to pick candidate `i`, or `None` once
    /// the candidate is eliminated. The renderer tags candidates with this.
    pub fn remaining_for(&self, i: usize) -> Option<&[char]> {
        self.remaining[i].as_deref()
    }

    /// Advances the state machine by one keystroke.
    ///
    /// A key matching no live sequence is reported as [`AceStep::Ignored`]
    /// and eliminates nothing — only a key that matches some candidate may
    /// eliminate the others.
    pub fn step(&mut self, key: char) -> AceStep {
        if self.keys.is_cancel(key) {
            return AceStep::Cancelled;
        }

        let matches_any = self
            .remaining
            .iter()
            .flatten()
            .any(|seq| seq.first() == Some(&key));
        if !matches_any {
            return AceStep::Ignored;
        }

        for slot in &mut self.remaining {
            let Some(seq) = slot else {
                continue;
            };
            if seq.first() == Some(&key) {
                seq.remove(0);
            } else {
                *slot = None;
            }
        }

        let mut live = self
            .remaining
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|seq| (i, seq)));
        match (live.next(), live.next()) {
            (Some((i, seq)), None) if seq.is_empty() => AceStep::Selected(i),
            _ => AceStep::Pending,
        }
    }
}
