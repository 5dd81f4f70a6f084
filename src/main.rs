// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! By default this loads a ctags `tags` file and opens the interactive peek
//! browser; pass a symbol to start browsing its definitions right away.
//!
//! Use `--demo` for a built-in demo session that needs no tags file.

use std::error::Error;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use proteus::ops;
use proteus::resolve::TagFileResolver;
use proteus::store;
use proteus::tui;
use proteus::ui::{PeekConfig, PeekContext};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<symbol>] [--tags <file>] [--snapshot <path>] [--height <n>] [--content-height <n>] [--log-file <path>]\n  {program} --demo\n\nLoads definitions from a Universal Ctags tags file (default: ./tags when present)\nand opens the peek browser. With <symbol>, browsing starts at that symbol's\ndefinitions; otherwise press 'o' inside the browser.\n\n--snapshot reads saved sessions from <path> at startup; 'w' writes them back.\n--height / --content-height size the definition list and the peeked content.\n--log-file appends debug logging to <path> (the terminal belongs to the UI)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    symbol: Option<String>,
    tags: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    height: Option<usize>,
    content_height: Option<usize>,
    log_file: Option<PathBuf>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--tags" => {
                if options.tags.is_some() {
                    return Err(());
                }
                options.tags = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--snapshot" => {
                if options.snapshot.is_some() {
                    return Err(());
                }
                options.snapshot = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--height" => {
                if options.height.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let height: usize = raw.parse().map_err(|_| ())?;
                if height == 0 {
                    return Err(());
                }
                options.height = Some(height);
            }
            "--content-height" => {
                if options.content_height.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let height: usize = raw.parse().map_err(|_| ())?;
                if height == 0 {
                    return Err(());
                }
                options.content_height = Some(height);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(PathBuf::from(args.next().ok_or(())?));
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.symbol.is_some() {
                    return Err(());
                }
                options.symbol = Some(arg);
            }
        }
    }

    if options.demo && (options.symbol.is_some() || options.tags.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn setup_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {message}",
                record.level(),
                record.target()
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(path)?)
        .apply()?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Some(path) = &options.log_file {
            setup_logging(path)?;
        }

        if options.demo {
            return tui::run_demo();
        }

        let mut config = PeekConfig::default();
        if let Some(height) = options.height {
            config.list_height = height;
        }
        if let Some(height) = options.content_height {
            config.content_height = height;
        }

        let resolver = match &options.tags {
            Some(path) => Some(TagFileResolver::from_file(path)?),
            None => {
                let default = Path::new("tags");
                if default.is_file() {
                    Some(TagFileResolver::from_file(default)?)
                } else {
                    None
                }
            }
        };

        let mut ctx = PeekContext::new(config);
        if let Some(path) = &options.snapshot {
            if path.is_file() {
                let list_height = ctx.config().list_height;
                let imported =
                    store::load_snapshot(ctx.registry_mut(), path, list_height)?;
                log::debug!("imported {imported} saved sessions from {}", path.display());
            }
        }

        if let Some(symbol) = &options.symbol {
            let Some(resolver) = &resolver else {
                eprintln!("{program}: a symbol was given but no tags file was found");
                std::process::exit(2);
            };
            let tags = resolver.lookup(symbol);
            if tags.is_empty() {
                eprintln!("{program}: no definitions found for '{symbol}'");
                std::process::exit(1);
            }
            let session = ops::root_session(
                Some(SmolStr::new(symbol.as_str())),
                tags,
                ctx.config().list_height,
            )?;
            ctx.open_session(session);
        }

        let docs = proteus::doc::DocumentStore::new();
        tui::run(ctx, docs, resolver, options.snapshot)
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}
