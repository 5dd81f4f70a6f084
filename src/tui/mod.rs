// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The shell drives the browsing core exclusively through the query surface
//! and the navigation operations; everything it paints is recomputed from the
//! context after each keystroke.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use smol_str::SmolStr;

use crate::ace::{AceKeys, AceSelector, AceStep};
use crate::doc::DocumentStore;
use crate::model::SessionName;
use crate::ops;
use crate::query::{self, Continuation, RenderableText};
use crate::resolve::TagFileResolver;
use crate::store;
use crate::ui::PeekContext;

const CHAIN_ACTIVE_COLOR: Color = Color::LightGreen;
const CHAIN_DIM_COLOR: Color = Color::DarkGray;
const CURRENT_ENTRY_COLOR: Color = Color::LightGreen;
const ACE_LABEL_COLOR: Color = Color::Yellow;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const SCROLL_PAGE_OVERLAP: i64 = 1;

/// Runs the interactive browser against a built-in demo session.
pub fn run_demo() -> Result<(), Box<dyn Error>> {
    let (ctx, docs, resolver) = demo_session();
    run(ctx, docs, Some(resolver), None)
}

pub fn run(
    ctx: PeekContext,
    docs: DocumentStore,
    resolver: Option<TagFileResolver>,
    snapshot_path: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(ctx, docs, resolver, snapshot_path)?;

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Raw-mode/alternate-screen guard around the ratatui terminal.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> Result<(), Box<dyn Error>> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// One selectable identifier occurrence inside the rendered content pane.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AceCandidate {
    row: usize,
    col: usize,
    len: usize,
    symbol: SmolStr,
}

#[derive(Debug)]
struct AceOverlay {
    selector: AceSelector,
    candidates: Vec<AceCandidate>,
}

/// Modal line input / confirmation running in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prompt {
    SaveName(String),
    LoadName(String),
    OpenSymbol(String),
    ConfirmDeleteFirst,
    ConfirmDeleteAll,
}

struct App {
    ctx: PeekContext,
    docs: DocumentStore,
    resolver: Option<TagFileResolver>,
    ace_keys: AceKeys,
    ace: Option<AceOverlay>,
    prompt: Option<Prompt>,
    toast: Option<String>,
    snapshot_path: Option<PathBuf>,
    should_quit: bool,
}

impl App {
    fn new(
        ctx: PeekContext,
        docs: DocumentStore,
        resolver: Option<TagFileResolver>,
        snapshot_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn Error>> {
        let ace_keys = ctx.config().ace_keys()?;
        Ok(Self {
            ctx,
            docs,
            resolver,
            ace_keys,
            ace: None,
            prompt: None,
            toast: None,
            snapshot_path,
            should_quit: false,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    fn list_height(&self) -> usize {
        self.ctx.config().list_height
    }

    fn content_height(&self) -> usize {
        self.ctx.config().content_height
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.toast = None;

        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if self.ace.is_some() {
            self.handle_ace_key(key);
            return;
        }
        self.handle_browse_key(key);
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let list_height = self.list_height();
        let page = self.content_height() as i64 - SCROLL_PAGE_OVERLAP;

        match key.code {
            KeyCode::Char('q') => {
                self.ctx.set_display_active(false);
                self.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Down => self.with_session(|session| {
                ops::index_forward(session, 1, list_height);
                Ok(())
            }),
            KeyCode::Char('p') | KeyCode::Up => self.with_session(|session| {
                ops::index_forward(session, -1, list_height);
                Ok(())
            }),
            KeyCode::Char('f') | KeyCode::Right => {
                self.with_session(|session| ops::chain_forward(session, list_height))
            }
            KeyCode::Char('b') | KeyCode::Left => {
                self.with_session(|session| ops::chain_backward(session, list_height))
            }
            KeyCode::Char(']') => self.with_session(|session| {
                ops::next_branch(session);
                Ok(())
            }),
            KeyCode::Char('[') => self.with_session(|session| {
                ops::prev_branch(session);
                Ok(())
            }),
            KeyCode::Char('K') => self.with_session(|session| {
                ops::move_current_up(session, list_height);
                Ok(())
            }),
            KeyCode::Char('J') => self.with_session(|session| {
                ops::move_current_down(session, list_height);
                Ok(())
            }),
            KeyCode::Char('1') => self.with_session(|session| {
                ops::make_current_first(session, list_height);
                Ok(())
            }),
            KeyCode::Char('d') => self.with_session(|session| {
                ops::scroll_current(session, 1);
                Ok(())
            }),
            KeyCode::Char('u') => self.with_session(|session| {
                ops::scroll_current(session, -1);
                Ok(())
            }),
            KeyCode::PageDown => self.with_session(move |session| {
                ops::scroll_current(session, page);
                Ok(())
            }),
            KeyCode::PageUp => self.with_session(move |session| {
                ops::scroll_current(session, -page);
                Ok(())
            }),
            KeyCode::Char('a') => self.start_ace(),
            KeyCode::Char('x') => self.require_session(Prompt::ConfirmDeleteFirst),
            KeyCode::Char('X') => self.require_session(Prompt::ConfirmDeleteAll),
            KeyCode::Char('s') => self.require_session(Prompt::SaveName(String::new())),
            KeyCode::Char('l') => self.prompt = Some(Prompt::LoadName(String::new())),
            KeyCode::Char('o') => self.prompt = Some(Prompt::OpenSymbol(String::new())),
            KeyCode::Char('r') => self.refresh_current_anchor(),
            KeyCode::Char('c') => self.copy_current_location(),
            KeyCode::Char('w') => self.write_snapshot(),
            _ => {}
        }
    }

    /// Runs a navigation op against the active session, turning caller-level
    /// failures and a missing session into toasts.
    fn with_session(
        &mut self,
        operation: impl FnOnce(&mut crate::model::Session) -> Result<(), ops::OpError>,
    ) {
        match self.ctx.session_mut() {
            Some(session) => {
                if let Err(err) = operation(session) {
                    self.set_toast(err.to_string());
                }
            }
            None => self.set_toast("no active session"),
        }
    }

    fn require_session(&mut self, prompt: Prompt) {
        if self.ctx.session().is_some() {
            self.prompt = Some(prompt);
        } else {
            self.set_toast("no active session");
        }
    }

    fn handle_ace_key(&mut self, key: KeyEvent) {
        let pressed = match key.code {
            KeyCode::Char(c) => c,
            KeyCode::Esc => '\u{1b}',
            _ => return,
        };

        let Some(overlay) = self.ace.as_mut() else {
            return;
        };
        match overlay.selector.step(pressed) {
            AceStep::Pending | AceStep::Ignored => {}
            AceStep::Cancelled => self.ace = None,
            AceStep::Selected(index) => {
                let symbol = overlay.candidates[index].symbol.clone();
                self.ace = None;
                self.peek_through(symbol);
            }
        }
    }

    /// Starts ace selection over the identifiers visible in the content pane.
    fn start_ace(&mut self) {
        if self.resolver.is_none() {
            self.set_toast("no tags loaded (run with --tags)");
            return;
        }
        let Some(content) = self.current_content() else {
            self.set_toast("no active session");
            return;
        };
        if !content.available {
            self.set_toast("file unavailable");
            return;
        }

        let candidates = collect_candidates(&content.lines);
        if candidates.is_empty() {
            self.set_toast("no symbols in view");
            return;
        }

        let selector = AceSelector::new(candidates.len(), self.ace_keys.clone());
        self.ace = Some(AceOverlay {
            selector,
            candidates,
        });
    }

    /// Resolves the picked symbol and pushes the result as a new branch.
    fn peek_through(&mut self, symbol: SmolStr) {
        let list_height = self.list_height();
        let tags = match &self.resolver {
            Some(resolver) => resolver.lookup(symbol.as_str()),
            None => Vec::new(),
        };
        if tags.is_empty() {
            self.set_toast(format!("no definitions found for '{symbol}'"));
            return;
        }

        let outcome = match self.ctx.session_mut() {
            Some(session) => ops::push_branch(session, symbol.clone(), tags, list_height),
            None => {
                self.set_toast("no active session");
                return;
            }
        };
        match outcome {
            Ok(()) => self.set_toast(format!("peeking '{symbol}'")),
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.clone() else {
            return;
        };
        match &prompt {
            Prompt::ConfirmDeleteFirst | Prompt::ConfirmDeleteAll => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.prompt = None;
                    let all = matches!(prompt, Prompt::ConfirmDeleteAll);
                    self.with_session(move |session| {
                        if all {
                            ops::delete_all_branches(session).map(|_| ())
                        } else {
                            ops::delete_first_branch(session)
                        }
                    });
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.prompt = None,
                _ => {}
            },
            Prompt::SaveName(input) | Prompt::LoadName(input) | Prompt::OpenSymbol(input) => {
                let mut input = input.clone();
                match key.code {
                    KeyCode::Esc => self.prompt = None,
                    KeyCode::Backspace => {
                        input.pop();
                        self.prompt = Some(rewrap_prompt(&prompt, input));
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        self.prompt = Some(rewrap_prompt(&prompt, input));
                    }
                    KeyCode::Enter => {
                        self.prompt = None;
                        self.commit_prompt(&prompt, input);
                    }
                    _ => {}
                }
            }
        }
    }

    fn commit_prompt(&mut self, prompt: &Prompt, input: String) {
        let input = input.trim().to_owned();
        if input.is_empty() {
            self.set_toast("cancelled (empty input)");
            return;
        }
        match prompt {
            Prompt::SaveName(_) => self.save_session(input),
            Prompt::LoadName(_) => match self.ctx.load_session(&input) {
                Ok(()) => self.set_toast(format!("loaded '{input}'")),
                Err(err) => self.set_toast(err.to_string()),
            },
            Prompt::OpenSymbol(_) => self.open_symbol(&input),
            Prompt::ConfirmDeleteFirst | Prompt::ConfirmDeleteAll => {}
        }
    }

    fn save_session(&mut self, input: String) {
        let name = match SessionName::new(input.clone()) {
            Ok(name) => name,
            Err(err) => {
                self.set_toast(err.to_string());
                self.prompt = Some(Prompt::SaveName(String::new()));
                return;
            }
        };
        match self.ctx.save_active(name) {
            Ok(()) => self.set_toast(format!("saved as '{input}'")),
            Err(err @ store::StoreError::NameTaken { .. }) => {
                // Re-prompt until the name is unique.
                self.set_toast(err.to_string());
                self.prompt = Some(Prompt::SaveName(String::new()));
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    /// Roots a fresh session at a symbol looked up by name.
    fn open_symbol(&mut self, symbol: &str) {
        let list_height = self.list_height();
        let tags = match &self.resolver {
            Some(resolver) => resolver.lookup(symbol),
            None => {
                self.set_toast("no tags loaded (run with --tags)");
                return;
            }
        };
        if tags.is_empty() {
            self.set_toast(format!("no definitions found for '{symbol}'"));
            return;
        }
        match ops::root_session(Some(SmolStr::new(symbol)), tags, list_height) {
            Ok(session) => {
                self.ctx.open_session(session);
                self.set_toast(format!("peeking '{symbol}'"));
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn refresh_current_anchor(&mut self) {
        let Some(session) = self.ctx.session_mut() else {
            self.set_toast("no active session");
            return;
        };
        let entry_id = ops::current_entry(session);
        session.tree_mut().entry_mut(entry_id).invalidate_anchor();
        self.set_toast("anchor refreshed");
    }

    fn copy_current_location(&mut self) {
        let Some(session) = self.ctx.session() else {
            self.set_toast("no active session");
            return;
        };
        let entry = session.tree().entry(ops::current_entry(session));
        let location = format!("{}:{}", entry.tag().path().display(), entry.tag().line());
        match copy_to_clipboard(&location) {
            Ok(via) => self.set_toast(format!("copied {location} ({via})")),
            Err(err) => self.set_toast(format!("clipboard error: {err}")),
        }
    }

    fn write_snapshot(&mut self) {
        let Some(path) = self.snapshot_path.clone() else {
            self.set_toast("no snapshot path (run with --snapshot)");
            return;
        };
        match store::write_snapshot(self.ctx.registry(), &path) {
            Ok(()) => self.set_toast(format!("snapshot written to {}", path.display())),
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn current_content(&mut self) -> Option<RenderableText> {
        let height = self.content_height();
        let session = self.ctx.session_mut()?;
        Some(query::current_content(session, &mut self.docs, height))
    }
}

fn rewrap_prompt(prompt: &Prompt, input: String) -> Prompt {
    match prompt {
        Prompt::SaveName(_) => Prompt::SaveName(input),
        Prompt::LoadName(_) => Prompt::LoadName(input),
        Prompt::OpenSymbol(_) => Prompt::OpenSymbol(input),
        Prompt::ConfirmDeleteFirst => Prompt::ConfirmDeleteFirst,
        Prompt::ConfirmDeleteAll => Prompt::ConfirmDeleteAll,
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Identifier occurrences in the content pane, left to right, top to bottom.
fn collect_candidates(lines: &[String]) -> Vec<AceCandidate> {
    let mut candidates = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let mut col = 0;
        let chars: Vec<char> = line.chars().collect();
        while col < chars.len() {
            if is_ident_char(chars[col]) && !chars[col].is_ascii_digit() {
                let start = col;
                while col < chars.len() && is_ident_char(chars[col]) {
                    col += 1;
                }
                let symbol: String = chars[start..col].iter().collect();
                candidates.push(AceCandidate {
                    row,
                    col: start,
                    len: col - start,
                    symbol: SmolStr::new(symbol),
                });
            } else {
                col += 1;
            }
        }
    }
    candidates
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    format!("\u{1b}]52;c;{}\u{7}", STANDARD.encode(text))
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let list_rows = app.list_height() as u16 + 2;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(list_rows),
            Constraint::Length(1),
        ])
        .split(area);

    draw_chain(frame, layout[0], app);
    draw_content(frame, layout[1], app);
    draw_entries(frame, layout[2], app);
    draw_footer(frame, layout[3], app);
}

fn draw_chain(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(session) = app.ctx.session() else {
        let splash = Paragraph::new("proteus — press 'o' to look up a symbol, 'q' to quit")
            .style(Style::default().fg(CHAIN_DIM_COLOR));
        frame.render_widget(splash, area);
        return;
    };

    let chain = query::symbol_chain(session);
    let mut spans = Vec::new();
    for (idx, link) in chain.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(CHAIN_DIM_COLOR)));
        }
        let label = link
            .symbol
            .as_ref()
            .map(SmolStr::to_string)
            .unwrap_or_else(|| "·".to_owned());
        let style = if link.active {
            Style::default().fg(CHAIN_ACTIVE_COLOR).bold()
        } else {
            Style::default().fg(CHAIN_DIM_COLOR)
        };
        spans.push(Span::styled(label, style));
        if link.continuation == Continuation::Branching {
            spans.push(Span::styled("*", Style::default().fg(ACE_LABEL_COLOR)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_content(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(content) = app.current_content() else {
        frame.render_widget(Block::default().borders(Borders::ALL).title(" peek "), area);
        return;
    };

    let title = match app.ctx.session() {
        Some(session) => {
            let entry = session.tree().entry(ops::current_entry(session));
            format!(" {} ", entry.tag().path().display())
        }
        None => " peek ".to_owned(),
    };

    let first_line = content.start_line.unwrap_or(0);
    let mut lines = Vec::with_capacity(content.lines.len());
    for (row, raw) in content.lines.iter().enumerate() {
        let number = if content.available {
            format!("{:>5} │ ", first_line + row + 1)
        } else {
            "      │ ".to_owned()
        };
        let mut spans = vec![Span::styled(number, Style::default().fg(CHAIN_DIM_COLOR))];
        spans.extend(content_line_spans(app, row, raw));
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

/// Splits a content line into spans, overlaying the remaining ace sequences
/// on top of their candidates while selection is active.
fn content_line_spans<'a>(app: &App, row: usize, raw: &'a str) -> Vec<Span<'a>> {
    let Some(overlay) = &app.ace else {
        return vec![Span::raw(raw.to_owned())];
    };

    let chars: Vec<char> = raw.chars().collect();
    let mut spans = Vec::new();
    let mut col = 0;
    for (index, candidate) in overlay.candidates.iter().enumerate() {
        if candidate.row != row {
            continue;
        }
        let Some(remaining) = overlay.selector.remaining_for(index) else {
            continue;
        };
        if candidate.col > col {
            spans.push(Span::raw(chars[col..candidate.col].iter().collect::<String>()));
        }
        let label: String = remaining.iter().collect();
        let label_len = label.chars().count().min(candidate.len).max(1);
        let shown: String = label.chars().take(label_len).collect();
        spans.push(Span::styled(
            shown,
            Style::default().fg(Color::Black).bg(ACE_LABEL_COLOR).bold(),
        ));
        let covered = candidate.col + label_len;
        let rest_end = candidate.col + candidate.len;
        if rest_end > covered {
            spans.push(Span::raw(chars[covered..rest_end].iter().collect::<String>()));
        }
        col = rest_end;
    }
    if col < chars.len() {
        spans.push(Span::raw(chars[col..].iter().collect::<String>()));
    }
    spans
}

fn draw_entries(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(session) = app.ctx.session() else {
        frame.render_widget(
            Block::default().borders(Borders::ALL).title(" definitions "),
            area,
        );
        return;
    };

    let list_id = ops::current_list(session);
    let list = session.tree().list(list_id);
    let rows = query::visible_entries(session.tree(), list_id);

    let title = format!(
        " {} ({}/{}) ",
        list.symbol().map(SmolStr::as_str).unwrap_or("(start)"),
        list.index() + 1,
        list.len()
    );

    let items: Vec<ListItem<'_>> = rows
        .iter()
        .map(|row| {
            let marker = if row.is_current { "▶ " } else { "  " };
            let branches = if row.has_branches { " +" } else { "" };
            let kind = row
                .kind
                .as_deref()
                .map(|kind| format!(" [{kind}]"))
                .unwrap_or_default();
            let text = format!(
                "{marker}{} {}:{}{kind}{branches}",
                row.name,
                row.path.display(),
                row.line
            );
            let style = if row.is_current {
                Style::default().fg(CURRENT_ENTRY_COLOR).bold()
            } else {
                Style::default()
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let widget =
        List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    if let Some(prompt) = &app.prompt {
        let text = match prompt {
            Prompt::SaveName(input) => format!("save session as: {input}_"),
            Prompt::LoadName(input) => format!("load session: {input}_"),
            Prompt::OpenSymbol(input) => format!("peek symbol: {input}_"),
            Prompt::ConfirmDeleteFirst => "delete current branch? (y/n)".to_owned(),
            Prompt::ConfirmDeleteAll => "delete ALL branches of this entry? (y/n)".to_owned(),
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(ACE_LABEL_COLOR)),
            area,
        );
        return;
    }

    if let Some(toast) = &app.toast {
        frame.render_widget(
            Paragraph::new(toast.clone()).style(Style::default().fg(ACE_LABEL_COLOR)),
            area,
        );
        return;
    }

    let hints = [
        ("n/p", "defs"),
        ("f/b", "chain"),
        ("[/]", "branch"),
        ("a", "ace"),
        ("o", "open"),
        ("s/l", "save/load"),
        ("x/X", "del"),
        ("q", "quit"),
    ];
    let mut spans = Vec::new();
    for (idx, (keys, label)) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*keys, Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(
            format!(" {label}"),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A self-contained session for `--demo`: a tiny virtual codebase plus the
/// tags index that describes it.
pub fn demo_session() -> (PeekContext, DocumentStore, TagFileResolver) {
    let mut docs = DocumentStore::new();
    docs.open_virtual(
        "/proteus-demo/src/main.rs",
        "mod render;\nmod store;\n\nfn main() {\n    let frame = render::compose();\n    store::persist(frame);\n}\n",
    );
    docs.open_virtual(
        "/proteus-demo/src/render.rs",
        "pub struct Frame {\n    pub rows: Vec<String>,\n}\n\npub fn compose() -> Frame {\n    let rows = gather();\n    Frame { rows }\n}\n\nfn gather() -> Vec<String> {\n    Vec::new()\n}\n",
    );
    docs.open_virtual(
        "/proteus-demo/src/store.rs",
        "use crate::render::Frame;\n\npub fn persist(frame: Frame) {\n    let _ = encode(frame);\n}\n\nfn encode(frame: Frame) -> Vec<u8> {\n    let _ = frame;\n    Vec::new()\n}\n",
    );

    let tags_text = concat!(
        "compose\tsrc/render.rs\t/^pub fn compose() -> Frame {$/;\"\tf\tline:5\n",
        "encode\tsrc/store.rs\t/^fn encode(frame: Frame) -> Vec<u8> {$/;\"\tf\tline:7\n",
        "Frame\tsrc/render.rs\t/^pub struct Frame {$/;\"\tstruct\tline:1\n",
        "gather\tsrc/render.rs\t/^fn gather() -> Vec<String> {$/;\"\tf\tline:10\n",
        "main\tsrc/main.rs\t/^fn main() {$/;\"\tf\tline:4\n",
        "persist\tsrc/store.rs\t/^pub fn persist(frame: Frame) {$/;\"\tf\tline:3\n",
    );
    let resolver = TagFileResolver::from_text(tags_text, std::path::Path::new("/proteus-demo"))
        .expect("demo tags are well-formed");

    let mut ctx = PeekContext::new(crate::ui::PeekConfig::default());
    let tags = resolver.lookup("main");
    let session = ops::root_session(Some(SmolStr::new("main")), tags, ctx.config().list_height)
        .expect("demo session has candidates");
    ctx.open_session(session);

    (ctx, docs, resolver)
}
