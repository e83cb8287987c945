use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, QuestionView, Resolution};

use super::notice_line;

const LOW_TIME_SECS: u32 = 5;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.question() else {
        let waiting = Paragraph::new("Loading question...")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(waiting, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app.quiz_title(), app.remaining());
    render_question_text(frame, chunks[1], &question.prompt);
    render_options(frame, chunks[2], question);

    if let Some(notice) = app.notice() {
        frame.render_widget(
            Paragraph::new(notice_line(notice)).alignment(Alignment::Center),
            chunks[3],
        );
    }

    render_counter(frame, chunks[4], question);
    render_controls(frame, chunks[5], question.resolution.is_some());
}

fn render_header(frame: &mut Frame, area: Rect, title: &str, remaining: u32) {
    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).split(area);

    let widget = Paragraph::new(title)
        .fg(Color::Cyan)
        .bold()
        .block(Block::default().borders(Borders::BOTTOM).border_style(Color::DarkGray));
    frame.render_widget(widget, columns[0]);

    let timer_color = if remaining <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::White
    };
    let timer = Paragraph::new(format!("⏱ {:>2}s", remaining))
        .alignment(Alignment::Right)
        .fg(timer_color)
        .bold()
        .block(Block::default().borders(Borders::BOTTOM).border_style(Color::DarkGray));
    frame.render_widget(timer, columns[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn option_style(answer: &str, is_cursor: bool, resolution: Option<&Resolution>) -> Style {
    match resolution {
        Some(resolution) if answer == resolution.correct => Style::default().fg(Color::Green).bold(),
        Some(resolution) if answer == resolution.selected => Style::default().fg(Color::Red).bold(),
        Some(_) => Style::default().fg(Color::DarkGray),
        None if is_cursor => Style::default().fg(Color::Cyan).bold(),
        None => Style::default().fg(Color::Gray),
    }
}

fn render_options(frame: &mut Frame, area: Rect, question: &QuestionView) {
    let resolution = question.resolution.as_ref();
    let mut lines: Vec<Line> = Vec::with_capacity(question.answers.len() * 2);

    for (index, answer) in question.answers.iter().enumerate() {
        let is_cursor = index == question.cursor;
        let style = option_style(answer, is_cursor, resolution);
        let marker = if is_cursor { ">" } else { " " };
        let label = char::from(b'A' + (index % 26) as u8);

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(answer.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(resolution) = resolution.filter(|r| r.forced) {
        lines.push(Line::from(Span::styled(
            format!("Time's up! \"{}\" was chosen for you.", resolution.selected),
            Style::default().fg(Color::Yellow),
        )));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, area);
}

fn render_counter(frame: &mut Frame, area: Rect, question: &QuestionView) {
    let widget = Paragraph::new(Line::from(vec![
        Span::raw("Question "),
        Span::styled((question.index + 1).to_string(), Style::default().bold()),
        Span::raw(" of "),
        Span::styled(question.total.to_string(), Style::default().bold()),
    ]))
    .alignment(Alignment::Center)
    .fg(Color::Gray);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, answered: bool) {
    let text = if answered {
        "enter next question  ·  q quit"
    } else {
        "j/k navigate  ·  enter select  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
