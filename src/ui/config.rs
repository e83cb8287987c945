use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, OptionGroup};

use super::notice_line;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0]);
    for (index, group) in app.groups().iter().enumerate() {
        render_group(frame, chunks[index + 1], group, index == app.focused_group());
    }

    if let Some(notice) = app.notice() {
        frame.render_widget(
            Paragraph::new(notice_line(notice)).alignment(Alignment::Center),
            chunks[4],
        );
    }

    let ready = app.groups().iter().all(|g| g.selected.is_some());
    render_controls(frame, chunks[6], ready);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(Line::from(Span::styled(
        "TRIVIA QUIZ",
        Style::default().fg(Color::Cyan).bold(),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_group(frame: &mut Frame, area: Rect, group: &OptionGroup, focused: bool) {
    let mut spans: Vec<Span> = Vec::with_capacity(group.options.len() * 2);

    for (index, option) in group.options.iter().enumerate() {
        let is_selected = group.selected == Some(index);
        let under_cursor = focused && index == group.cursor;

        let mut style = if is_selected {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        if under_cursor {
            style = style.underlined();
        }

        spans.push(Span::styled(format!(" {} ", option.label), style));
        spans.push(Span::raw("  "));
    }

    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", group.title)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, ready: bool) {
    let start = if ready {
        Span::styled("s start quiz", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled("s start quiz", Style::default().fg(Color::DarkGray))
    };
    let widget = Paragraph::new(Line::from(vec![
        Span::styled(
            "j/k group  ·  h/l option  ·  enter select  ·  ",
            Style::default().fg(Color::DarkGray),
        ),
        start,
        Span::styled("  ·  q quit", Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
