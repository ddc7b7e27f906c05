//! Ratatui front end for the type-ahead controller.
//!
//! Keystrokes are read on a plain thread (crossterm's reader blocks) and
//! forwarded over a channel; the async loop selects between them and the
//! controller's own events, then redraws from the latest published snapshot.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::TypeaheadConfig;
use crate::model::types::Film;
use crate::search::controller::{SearchController, Snapshot};
use crate::search::remote::RpcSearchClient;
use crate::search::source::SearchSource;
use crate::ui::components::theme::ThemePalette;
use crate::ui::view::{
    ItemKey, LOADING_TEXT, NOTHING_FOUND_TEXT, PLACEHOLDER, ResultItem, View, keyed, reselect,
};

/// What a key press means for the screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// The input text changed.
    Edit,
    SelectPrev,
    SelectNext,
    ToggleTheme,
    Ignore,
}

/// Apply a key press to the input buffer, which holds at most `max_chars`.
pub fn apply_key(key: KeyEvent, input: &mut String, max_chars: usize) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc | KeyCode::F(10) => KeyAction::Quit,
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('u') if ctrl => {
            if input.is_empty() {
                return KeyAction::Ignore;
            }
            input.clear();
            KeyAction::Edit
        }
        KeyCode::Char('w') if ctrl => {
            let trimmed = input.trim_end().len();
            let cut = input[..trimmed]
                .rfind(char::is_whitespace)
                .map_or(0, |idx| idx + 1);
            if cut == input.len() {
                return KeyAction::Ignore;
            }
            input.truncate(cut);
            KeyAction::Edit
        }
        KeyCode::Char('t') if ctrl => KeyAction::ToggleTheme,
        KeyCode::Char(_) if ctrl => KeyAction::Ignore,
        KeyCode::Char(_) if input.chars().count() >= max_chars => KeyAction::Ignore,
        KeyCode::Char(c) => {
            input.push(c);
            KeyAction::Edit
        }
        KeyCode::Backspace => {
            if input.pop().is_some() {
                KeyAction::Edit
            } else {
                KeyAction::Ignore
            }
        }
        KeyCode::Up => KeyAction::SelectPrev,
        KeyCode::Down => KeyAction::SelectNext,
        _ => KeyAction::Ignore,
    }
}

/// Everything one frame needs.
pub struct Screen<'a, R> {
    pub snapshot: &'a Snapshot<R>,
    pub selected: Option<usize>,
    pub debounce: Duration,
}

pub fn draw<R: ResultItem>(frame: &mut Frame, screen: &Screen<'_, R>, palette: ThemePalette) {
    frame.render_widget(Block::default().style(palette.canvas_style()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // search bar
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let raw = screen.snapshot.raw.as_str();
    let bar = if raw.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, palette.hint_style()))
    } else {
        Paragraph::new(Span::raw(raw.to_string()))
    };
    frame.render_widget(
        bar.block(
            Block::default()
                .title(Span::styled(" Search ", palette.title()))
                .borders(Borders::ALL)
                .border_style(palette.border_focus_style()),
        ),
        chunks[0],
    );

    let view = View::project(raw, &screen.snapshot.state);
    let body = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style());
    match &view {
        View::InputOnly => frame.render_widget(body, chunks[1]),
        View::Loading => frame.render_widget(
            Paragraph::new(Span::styled(LOADING_TEXT, palette.loading_style())).block(body),
            chunks[1],
        ),
        View::NothingFound { .. } => frame.render_widget(
            Paragraph::new(Span::styled(NOTHING_FOUND_TEXT, palette.hint_style())).block(body),
            chunks[1],
        ),
        View::Results(records) => {
            let items: Vec<ListItem> = records
                .iter()
                .enumerate()
                .map(|(idx, record)| card_item(record, idx, palette))
                .collect();
            let title = format!(" {} result{} ", items.len(), plural(items.len()));
            let list = List::new(items)
                .block(body.title(Span::styled(title, palette.hint_style())))
                .highlight_style(palette.selected_style());
            let mut state = ListState::default();
            state.select(screen.selected);
            frame.render_stateful_widget(list, chunks[1], &mut state);
        }
    }

    frame.render_widget(footer(&view, screen, palette), chunks[2]);
}

fn card_item<R: ResultItem>(record: &R, idx: usize, palette: ThemePalette) -> ListItem<'static> {
    let card = record.card();
    let mut lines = Vec::with_capacity(card.fields.len() + 3);
    lines.push(Line::from(Span::styled(card.title, palette.title())));
    for (label, value) in card.fields {
        lines.push(Line::from(vec![
            Span::styled(format!("{label}: "), palette.label_style()),
            Span::styled(value, palette.value_style()),
        ]));
    }
    if let Some(url) = card.image_url {
        lines.push(Line::from(Span::styled(url, palette.hint_style())));
    }
    lines.push(Line::from(""));
    ListItem::new(lines).style(palette.stripe(idx))
}

fn footer<R>(view: &View<'_, R>, screen: &Screen<'_, R>, palette: ThemePalette) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        format!(
            "{} | debounce {}ms | Esc quit, Ctrl-U clear, Ctrl-T theme",
            screen.snapshot.state.label(),
            screen.debounce.as_millis()
        ),
        palette.hint_style(),
    )];
    if matches!(view, View::NothingFound { failed: true }) {
        spans.push(Span::styled(
            "  lookup failed, see log",
            palette.failure_hint_style(),
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Keeps the selected card by key across result updates.
#[derive(Debug, Default)]
struct Selection {
    key: Option<ItemKey>,
    index: Option<usize>,
}

impl Selection {
    fn sync<R: ResultItem>(&mut self, records: &[R]) {
        let keys: Vec<ItemKey> = keyed(records).into_iter().map(|(k, _)| k).collect();
        self.index = reselect(&keys, self.key.as_ref());
        self.key = self.index.map(|i| keys[i].clone());
    }

    fn shift<R: ResultItem>(&mut self, records: &[R], delta: isize) {
        if records.is_empty() {
            return;
        }
        let current = self.index.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, records.len() as isize - 1) as usize;
        self.index = Some(next);
        self.key = keyed(records).into_iter().nth(next).map(|(k, _)| k);
    }
}

pub async fn run_tui(config: TypeaheadConfig) -> Result<()> {
    let client = RpcSearchClient::<Film>::new(&config.remote)
        .context("TYPEAHEAD_API_URL must point at the search endpoint")?;
    info!(endpoint = client.endpoint(), "tui_start");
    let mut controller = SearchController::new(client, config.controller.clone());

    let mut terminal = setup_or_restore(setup_terminal, teardown_terminal)?;

    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = event_loop(&mut terminal, &mut controller, rx).await;
    controller.shutdown();
    teardown_terminal()?;
    result
}

async fn event_loop<B: Backend, S>(
    terminal: &mut Terminal<B>,
    controller: &mut SearchController<S>,
    mut events: mpsc::UnboundedReceiver<Event>,
) -> Result<()>
where
    S: SearchSource,
    S::Record: ResultItem,
{
    let mut updates = controller.subscribe();
    let mut input = String::new();
    let mut selection = Selection::default();
    let mut theme_dark = true;

    loop {
        {
            let snapshot = updates.borrow_and_update();
            selection.sync(snapshot.state.records());
            let palette = if theme_dark {
                ThemePalette::dark()
            } else {
                ThemePalette::light()
            };
            let screen = Screen {
                snapshot: &*snapshot,
                selected: selection.index,
                debounce: controller.config().debounce,
            };
            terminal
                .draw(|f| draw(f, &screen, palette))
                .map_err(|e| anyhow::anyhow!("drawing frame: {e}"))?;
        }

        tokio::select! {
            ev = events.recv() => {
                let Some(ev) = ev else { break };
                let Event::Key(key) = ev else { continue };
                match apply_key(key, &mut input, controller.config().max_query_chars) {
                    KeyAction::Quit => break,
                    KeyAction::Edit => controller.set_input(input.clone()),
                    KeyAction::SelectPrev => {
                        selection.shift(controller.state().records(), -1);
                    }
                    KeyAction::SelectNext => {
                        selection.shift(controller.state().records(), 1);
                    }
                    KeyAction::ToggleTheme => theme_dark = !theme_dark,
                    KeyAction::Ignore => {}
                }
            }
            Some(step) = controller.step() => {
                debug!(?step, "controller_step");
            }
        }
    }
    Ok(())
}

/// Run `setup`; if it fails partway, run `restore` before returning the error.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    setup().inspect_err(|_| {
        let _ = restore();
    })
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("entering alternate screen")?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}
