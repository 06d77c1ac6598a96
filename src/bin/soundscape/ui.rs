//! Terminal UI: an input box, the analysis log and a status line.

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    DefaultTerminal, Frame,
};

use soundscape::{synth::RingEngine, Sonifier};

/// Lines kept in the analysis panel; older ones are dropped first.
const MAX_LOG_LINES: usize = 200;

/// What a keypress asks the app to do.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Submit(String),
    Quit,
    None,
}

/// Multi-line text being typed.
#[derive(Debug, Default)]
struct Editor {
    text: String,
}

impl Editor {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.text.push('\n');
                Action::None
            }
            KeyCode::Char('j') if ctrl => {
                self.text.push('\n');
                Action::None
            }
            KeyCode::Char('l') if ctrl => {
                self.text.clear();
                Action::None
            }
            KeyCode::Enter if !self.text.trim().is_empty() => Action::Submit(self.text.clone()),
            KeyCode::Backspace => {
                self.text.pop();
                Action::None
            }
            KeyCode::Char(c) if !ctrl => {
                self.text.push(c);
                Action::None
            }
            _ => Action::None,
        }
    }
}

pub struct App<'a> {
    sonifier: &'a mut Sonifier<RingEngine>,
    editor: Editor,
    log: Vec<String>,
    status: String,
    should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(sonifier: &'a mut Sonifier<RingEngine>) -> Self {
        Self {
            sonifier,
            editor: Editor::default(),
            log: Vec::new(),
            status: "Idle".into(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.editor.handle_key(key) {
                            Action::Submit(text) => self.submit(&text),
                            Action::Quit => self.should_quit = true,
                            Action::None => {}
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn submit(&mut self, text: &str) {
        match self.sonifier.analyze_and_play(text) {
            Ok(lines) => {
                self.log.push(String::new());
                self.log.extend(lines);
                self.status = "Playing".into();
            }
            Err(err) => {
                tracing::error!(%err, "analysis failed");
                self.status = format!("Error: {err}");
            }
        }
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(..excess);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Input
                Constraint::Min(8),    // Analysis output
                Constraint::Length(1), // Status / help
            ])
            .split(frame.area());

        let input = Paragraph::new(self.editor.text.as_str())
            .wrap(Wrap { trim: false })
            .block(Block::default().title(" Text ").borders(Borders::ALL));
        frame.render_widget(input, chunks[0]);

        // Newest lines at the bottom
        let visible = chunks[1].height.saturating_sub(2) as usize;
        let start = self.log.len().saturating_sub(visible);
        let lines: Vec<Line> = self.log[start..].iter().map(|l| Line::from(l.as_str())).collect();
        let output = Paragraph::new(lines)
            .block(Block::default().title(" Analysis ").borders(Borders::ALL));
        frame.render_widget(output, chunks[1]);

        let help = Paragraph::new(format!(
            " {}  [Enter] Analyse  [Alt+Enter] Newline  [Ctrl+L] Clear  [Esc] Quit",
            self.status
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
