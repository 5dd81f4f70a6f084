// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::Path;

use crate::model::DefinitionTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtagsParseError {
    MissingFile {
        line_no: usize,
    },
    MissingExCmd {
        line_no: usize,
    },
    UnterminatedPattern {
        line_no: usize,
    },
    InvalidLineField {
        line_no: usize,
        value: String,
    },
}

impl fmt::Display for CtagsParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile { line_no } => {
                write!(f, "tags line {line_no}: missing file field")
            }
            Self::MissingExCmd { line_no } => {
                write!(f, "tags line {line_no}: missing ex command field")
            }
            Self::UnterminatedPattern { line_no } => {
                write!(f, "tags line {line_no}: search pattern is not terminated")
            }
            Self::InvalidLineField { line_no, value } => {
                write!(f, "tags line {line_no}: invalid line number '{value}'")
            }
        }
    }
}

impl std::error::Error for CtagsParseError {}

/// Parses a Universal-Ctags-format tags buffer into definition tags.
///
/// `base_dir` resolves relative file fields (tags files reference files
/// relative to their own directory). `!_TAG_` pseudo-tag headers and empty
/// lines are skipped.
pub fn parse_tags(content: &str, base_dir: &Path) -> Result<Vec<DefinitionTag>, CtagsParseError> {
    let mut tags = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        if raw.is_empty() || raw.starts_with("!_TAG_") {
            continue;
        }
        tags.push(parse_tag_line(raw, line_no, base_dir)?);
    }
    Ok(tags)
}

fn parse_tag_line(
    raw: &str,
    line_no: usize,
    base_dir: &Path,
) -> Result<DefinitionTag, CtagsParseError> {
    let (name, rest) = raw
        .split_once('\t')
        .ok_or(CtagsParseError::MissingFile { line_no })?;
    let (file, rest) = rest
        .split_once('\t')
        .ok_or(CtagsParseError::MissingExCmd { line_no })?;

    // The ex command runs up to the `;"` terminator; anything after it is
    // tab-separated extension fields. Plain-format lines have no terminator
    // and no fields.
    let (excmd, fields) = match rest.split_once(";\"") {
        Some((excmd, fields)) => (excmd, fields),
        None => (rest, ""),
    };

    let (pattern, excmd_line) = parse_excmd(excmd, line_no)?;

    let mut line = excmd_line;
    let mut kind = None;
    let mut signature = None;
    for field in fields.split('\t').filter(|field| !field.is_empty()) {
        match field.split_once(':') {
            Some(("line", value)) => {
                let parsed: u64 =
                    value
                        .parse()
                        .map_err(|_| CtagsParseError::InvalidLineField {
                            line_no,
                            value: value.to_owned(),
                        })?;
                line = Some(parsed);
            }
            Some(("kind", value)) => kind = Some(value.to_owned()),
            Some(("signature", value)) => signature = Some(value.to_owned()),
            // Other known fields (scope, access, ...) are display-irrelevant
            // here.
            Some(_) => {}
            // A bare field is the short kind form.
            None => kind = Some(field.to_owned()),
        }
    }

    let path = if Path::new(file).is_absolute() {
        Path::new(file).to_path_buf()
    } else {
        base_dir.join(file)
    };

    let mut tag = DefinitionTag::new(name, path, line.unwrap_or(1));
    tag.set_pattern(pattern);
    tag.set_kind(kind);
    tag.set_signature(signature);
    Ok(tag)
}

/// Splits an ex command into (search pattern literal, stated line number).
///
/// `/^text$/` and `?text?` forms yield the unescaped inner text with the
/// `^`/`$` anchors stripped; a bare number yields the line.
fn parse_excmd(
    excmd: &str,
    line_no: usize,
) -> Result<(Option<String>, Option<u64>), CtagsParseError> {
    if let Ok(number) = excmd.parse::<u64>() {
        return Ok((None, Some(number)));
    }

    let delimiter = match excmd.chars().next() {
        Some(delimiter @ ('/' | '?')) => delimiter,
        _ => return Err(CtagsParseError::MissingExCmd { line_no }),
    };
    let inner = &excmd[1..];
    let inner = inner
        .strip_suffix(delimiter)
        .ok_or(CtagsParseError::UnterminatedPattern { line_no })?;

    let inner = inner.strip_prefix('^').unwrap_or(inner);
    let inner = inner.strip_suffix('$').unwrap_or(inner);

    let mut literal = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped) => literal.push(escaped),
                None => return Err(CtagsParseError::UnterminatedPattern { line_no }),
            }
        } else {
            literal.push(ch);
        }
    }
    Ok((Some(literal), None))
}
