use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{AnsweredQuestion, App, Summary};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = app.summary() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], summary);
    render_question_breakdown(frame, chunks[2], app.answered(), app.result_scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: u32) -> Color {
    match percentage {
        90.. => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, summary: Summary) {
    let grade_color = get_grade_color(summary.percentage);
    let wrong = summary.total.saturating_sub(summary.score);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ COMPLETE!",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}", summary.score, summary.total),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("Correct {}", summary.score), Style::default().fg(Color::Green)),
            Span::styled("   ·   ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Wrong {}", wrong), Style::default().fg(Color::Red)),
            Span::styled("   ·   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Percentage {}%", summary.percentage),
                Style::default().fg(grade_color),
            ),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    answered: &[AnsweredQuestion],
    scroll: usize,
) {
    let lines: Vec<Line> = answered
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let resolution = &entry.resolution;
            let (symbol, color) = if resolution.is_correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let mut spans = vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_question(&entry.prompt), Style::default().fg(Color::Gray)),
            ];
            if !resolution.is_correct {
                spans.push(Span::styled(
                    format!("  → {}", resolution.correct),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if resolution.forced {
                spans.push(Span::styled("  (timed out)", Style::default().fg(Color::Yellow)));
            }
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r take another quiz  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
