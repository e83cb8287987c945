mod config;
mod quiz;
mod result;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, AppState, Notice, NoticeKind};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Configure => config::render(frame, area, app),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
    }
}

fn notice_line(notice: &Notice) -> Line<'_> {
    let color = match notice.kind {
        NoticeKind::Warning => Color::Yellow,
        NoticeKind::Error => Color::Red,
    };
    Line::from(Span::styled(notice.text.as_str(), Style::default().fg(color)))
}
