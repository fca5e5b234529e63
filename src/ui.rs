use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::app::{Message, Tone, View};
use crate::config::ListMode;
use crate::controls::{Controls, Focus};

const HORIZONTAL_MARGIN: u16 = 2;
const CURSOR: &str = "█";

fn tone_style(tone: Tone) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match tone {
        Tone::Success => bold.fg(Color::Green),
        Tone::Failure => bold.fg(Color::Red),
        Tone::Info => Style::default().fg(Color::Cyan),
    }
}

fn message_line(message: Option<&Message>) -> Line<'_> {
    match message {
        Some(m) => Line::from(Span::styled(m.text.as_str(), tone_style(m.tone))),
        None => Line::default(),
    }
}

/// Keep the end of `text` that fits in `width` columns
fn tail_that_fits(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = idx;
    }
    &text[start..]
}

/// One frame of the terminal surface
pub struct Screen<'a> {
    view: &'a View,
    controls: &'a Controls,
}

impl<'a> Screen<'a> {
    pub fn new(view: &'a View, controls: &'a Controls) -> Self {
        Self { view, controls }
    }

    fn render_lists(&self, area: Rect, buf: &mut Buffer) {
        let titles: Vec<Line> = self
            .view
            .lists
            .iter()
            .map(|l| Line::from(l.label.as_str()))
            .collect();
        let selected = self.view.lists.iter().position(|l| l.selected).unwrap_or(0);
        let title = match self.view.list_mode {
            ListMode::Multi => "Word Lists",
            ListMode::Single => "Word List",
        };

        Tabs::new(titles)
            .select(selected)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .render(area, buf);
    }

    fn render_editor(&self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            "Editing {} (one word per line, Ctrl-S save, Esc cancel)",
            self.view.current_label
        );
        let text = format!("{}{CURSOR}", self.controls.editor);
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(area, buf);
    }

    fn render_practice(&self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        let dim = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // list summary
                Constraint::Length(1), // revealed word
                Constraint::Length(1), // listening
                Constraint::Length(3), // answer field
                Constraint::Length(1), // result
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(Span::styled(
            format!("{} words in {}", view.word_count, view.current_label),
            dim,
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let word_line = match (&view.revealed_word, view.buttons.toggle_reveal) {
            (Some(word), _) => Span::styled(
                word.as_str(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            (None, true) => Span::styled("• • •", dim),
            (None, false) => Span::styled(format!("press F1 to {}", view.play_label), dim),
        };
        Paragraph::new(word_line)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        if view.listening {
            Paragraph::new(Span::styled(
                "listening...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        let focused = self.controls.focus == Focus::Answer;
        let inner_width = chunks[3].width.saturating_sub(3) as usize;
        let answer = tail_that_fits(&self.controls.answer, inner_width);
        let mut spans = vec![Span::raw(answer)];
        if focused {
            spans.push(Span::raw(CURSOR));
        }
        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Your answer (Enter to check)"),
            )
            .render(chunks[3], buf);

        Paragraph::new(message_line(view.result.as_ref()))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    fn render_prompt(&self, area: Rect, buf: &mut Buffer) {
        let line = match self.controls.focus {
            Focus::NewListName => Line::from(vec![
                Span::styled("New list name: ", tone_style(Tone::Info)),
                Span::raw(self.controls.new_list_name.as_str()),
                Span::raw(CURSOR),
            ]),
            Focus::ConfirmDelete => Line::from(Span::styled(
                format!(
                    "Are you sure you want to delete the list \"{}\"? (y/n)",
                    self.view.current_label
                ),
                tone_style(Tone::Failure),
            )),
            _ => message_line(self.view.notice.as_ref()),
        };
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        let enabled = Style::default().fg(Color::Gray);
        let disabled = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
        let key = |label: String, on: bool| {
            Span::styled(format!(" {label} "), if on { enabled } else { disabled })
        };

        let spans = vec![
            key(format!("F1 {}", view.play_label), true),
            key("F2 Replay".into(), view.buttons.replay),
            key(format!("F3 {}", view.reveal_label), view.buttons.toggle_reveal),
            key("F4 Speak".into(), true),
            key("F5 Edit".into(), true),
            key("F6 Reset".into(), view.can_reset),
            key("F7 New".into(), view.list_mode == ListMode::Multi),
            key("F8 Delete".into(), view.can_delete),
            key("Tab Next list".into(), view.lists.len() > 1),
            key("Esc Quit".into(), true),
        ];
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl Widget for Screen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3), // list tabs
                Constraint::Min(8),    // editor or practice
                Constraint::Length(2), // notice / prompt
                Constraint::Length(2), // key help
            ])
            .split(area);

        self.render_lists(chunks[0], buf);
        if self.controls.focus == Focus::Editor {
            self.render_editor(chunks[1], buf);
        } else {
            self.render_practice(chunks[1], buf);
        }
        self.render_prompt(chunks[2], buf);
        self.render_help(chunks[3], buf);
    }
}
