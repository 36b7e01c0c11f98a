use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use careerlift::checklist::{CheckOutcome, DecisionOutcome};
use careerlift::classify;
use careerlift::models::{ActionDecisionPrompt, Decision, JobStatus, WeeklyActionItem};

use crate::Session;

#[derive(Clone)]
enum Row {
    Active(WeeklyActionItem),
    Completed(WeeklyActionItem),
}

impl Row {
    fn item(&self) -> &WeeklyActionItem {
        match self {
            Row::Active(item) | Row::Completed(item) => item,
        }
    }
}

struct AppState {
    rows: Vec<Row>,
    selected: usize,
    scroll_offset: u16,
    prompt: Option<ActionDecisionPrompt>,
    message: String,
}

impl AppState {
    fn new(session: &Session) -> Self {
        let mut state = Self {
            rows: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            prompt: None,
            message: String::new(),
        };
        state.rebuild(session);
        state
    }

    fn rebuild(&mut self, session: &Session) {
        self.rows = session
            .checklist
            .active_actions(&session.store)
            .into_iter()
            .map(Row::Active)
            .chain(session.checklist.completed_actions().iter().cloned().map(Row::Completed))
            .collect();
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    fn current(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    fn next(&mut self) {
        if !self.rows.is_empty() && self.selected < self.rows.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

pub fn run_checklist(session: &mut Session) -> Result<()> {
    let mut state = AppState::new(session);
    if state.rows.is_empty() {
        println!("Nothing on the checklist.");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, session);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    session: &mut Session,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, session, &mut list_state))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(prompt) = state.prompt.clone() {
            let decision = match key.code {
                KeyCode::Char('y') => Some(Decision::Confirm),
                KeyCode::Char('n') => Some(Decision::Deny),
                KeyCode::Esc => {
                    session.checklist.dismiss_prompt();
                    state.prompt = None;
                    None
                }
                _ => None,
            };
            if let Some(decision) = decision {
                let outcome =
                    session
                        .checklist
                        .apply_action_decision(&mut session.store, &prompt.action, decision);
                state.prompt = None;
                state.message = match outcome {
                    DecisionOutcome::Committed => format!("Completed: {}", prompt.action.title),
                    DecisionOutcome::Dismissed => format!("No change for {}", prompt.action.title),
                    DecisionOutcome::Ignored => String::new(),
                };
                session.save()?;
                state.rebuild(session);
            }
            list_state.select(Some(state.selected));
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Down | KeyCode::Char('j') => state.next(),
            KeyCode::Up | KeyCode::Char('k') => state.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
            KeyCode::Char(' ') | KeyCode::Char('x') => match state.current().cloned() {
                Some(Row::Active(item)) => {
                    match session.checklist.handle_check_action(&mut session.store, &item) {
                        CheckOutcome::Completed => {
                            state.message = format!("Completed: {}", item.title);
                            session.save()?;
                            state.rebuild(session);
                        }
                        CheckOutcome::Prompted(prompt) => state.prompt = Some(prompt),
                        CheckOutcome::Skipped => state.message = format!("Nothing to update for {}", item.title),
                    }
                }
                Some(Row::Completed(item)) => {
                    session.checklist.unmark_action_completed(&item);
                    state.message = format!("Restored: {}", item.title);
                    session.save()?;
                    state.rebuild(session);
                }
                None => {}
            },
            KeyCode::Char('o') => {
                if let Some(row) = state.current() {
                    let mut opened = String::new();
                    session.checklist.handle_plan_action_press(row.item(), |target| {
                        opened = match target.params.job {
                            Some(job) => format!("Open {} for {}", target.screen, job.company),
                            None => format!("Open {}", target.screen),
                        };
                    });
                    state.message = opened;
                }
            }
            _ => {}
        }
        list_state.select(Some(state.selected));
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, session: &Session, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(frame.area());

    // Left panel: checklist
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| match row {
            Row::Active(item) => ListItem::new(format!("[ ] {}", item.title)),
            Row::Completed(item) => ListItem::new(Span::styled(
                format!("[x] {}", item.title),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            )),
        })
        .collect();

    let active = state.rows.iter().filter(|row| matches!(row, Row::Active(_))).count();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" This Week ({} open) ", active)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: decision prompt or item detail
    let (title, detail) = match &state.prompt {
        Some(prompt) => (" Decision ", build_prompt(prompt)),
        None => (" Detail ", build_detail(state, session)),
    };
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer help
    let help_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let help = if state.prompt.is_some() {
        " y:confirm  n:deny  esc:cancel".to_string()
    } else if state.message.is_empty() {
        " j/k:navigate  J/K:scroll  space:check/uncheck  o:open  q:quit".to_string()
    } else {
        format!(" {}  |  space:check/uncheck  o:open  q:quit", state.message)
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        help_area[1],
    );
}

fn build_prompt(prompt: &ActionDecisionPrompt) -> Text<'_> {
    let mut lines = vec![
        Line::from(Span::styled(
            prompt.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for line in textwrap::fill(&prompt.message, 60).lines() {
        lines.push(Line::from(line.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("y  {}", prompt.confirm_label),
        Style::default().fg(Color::Green),
    )));
    lines.push(Line::from(Span::styled(
        format!("n  {}", prompt.deny_label),
        Style::default().fg(Color::Red),
    )));
    Text::from(lines)
}

fn status_style(status: JobStatus) -> Style {
    match status {
        JobStatus::Target => Style::default().fg(Color::Yellow),
        JobStatus::Applied => Style::default().fg(Color::Cyan),
        JobStatus::Interview | JobStatus::Interviewing => Style::default().fg(Color::Magenta),
        JobStatus::OfferReceived | JobStatus::OfferSigned => Style::default().fg(Color::Green),
        JobStatus::Rejected => Style::default().fg(Color::Red),
        JobStatus::NotInterested => Style::default().fg(Color::DarkGray),
    }
}

fn build_detail<'a>(state: &'a AppState, session: &'a Session) -> Text<'a> {
    let Some(row) = state.current() else {
        return Text::raw("Nothing selected");
    };
    let item = row.item();

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            item.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(item.subtitle.as_str()),
    ];

    let category = classify::tracked_action_type(&item.title)
        .map(|c| c.as_str())
        .unwrap_or("none");
    lines.push(Line::from(Span::styled(
        format!("Type: {}", category),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    // Show the live tracked copy; the item's snapshot may be stale.
    let Some(job) = item.job.as_ref().and_then(|job| session.store.find_tracked(&job.id)) else {
        return Text::from(lines);
    };

    lines.push(Line::from(Span::styled(format!("Status: {}", job.status), status_style(job.status))));
    lines.push(Line::from(format!("Location: {}", job.location)));
    if job.has_pending_action() {
        lines.push(Line::from(format!("Next: {} ({})", job.next_action, job.next_action_date)));
    }
    if job.is_overdue {
        lines.push(Line::from(Span::styled("Overdue", Style::default().fg(Color::Red))));
    }

    if !job.notes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Notes",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(&job.notes, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}
