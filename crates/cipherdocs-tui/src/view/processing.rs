use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::app::App;
use crate::view::{centered_rect, spinner_char, truncate};

/// Render the processing screen: file name, progress bar and status message.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let progress = &app.session.progress;

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(7),    // body
        Constraint::Length(1), // footer
    ])
    .split(area);

    let header = Line::from(vec![
        Span::styled(" CipherDocs ", theme.header_style()),
        Span::styled(
            " > Extracting text",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let width = chunks[1].width.saturating_sub(4).min(72);
    let panel = centered_rect(width, 7, chunks[1]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(
            " {} ",
            truncate(&app.file_name(), width.saturating_sub(4) as usize)
        ));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1), // gauge
        Constraint::Length(1),
        Constraint::Length(1), // message
        Constraint::Min(0),
    ])
    .split(inner);

    let gauge = Gauge::default()
        .gauge_style(theme.gauge_style())
        .percent(u16::from(progress.percent))
        .label(format!("{}%", progress.percent));
    f.render_widget(gauge, rows[1]);

    let message = Line::from(vec![
        Span::styled(
            format!("{} ", spinner_char(app.tick)),
            Style::default()
                .fg(theme.spinner)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(progress.message.as_str(), Style::default().fg(theme.text)),
    ]);
    f.render_widget(
        Paragraph::new(message).alignment(Alignment::Center),
        rows[3],
    );

    let footer = Line::from(Span::styled(
        " Esc/n:cancel  ?:help  q:quit",
        theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[2]);
}
