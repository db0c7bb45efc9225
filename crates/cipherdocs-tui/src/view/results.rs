use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use cipherdocs_core::{NO_TEXT_SENTINEL, PAGE_ERROR_MARKER};

use crate::app::App;
use crate::view::truncate;

/// Render the results screen: the extracted text plus copy/download/new actions.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(3),    // text
        Constraint::Length(1), // status
        Constraint::Length(1), // footer
    ])
    .split(area);

    let text_block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Text ");
    app.last_text_area = Some(text_block.inner(chunks[1]));

    let theme = &app.theme;
    let text = &app.session.text;

    let header = Line::from(vec![
        Span::styled(" CipherDocs ", theme.header_style()),
        Span::styled(
            " > Extracted Text  ",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            truncate(&app.file_name(), chunks[0].width.saturating_sub(34) as usize),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let lines: Vec<Line> = if text == NO_TEXT_SENTINEL {
        vec![Line::from(Span::styled(
            text.as_str(),
            Style::default().fg(theme.warning),
        ))]
    } else {
        text.lines()
            .map(|line| {
                if line.starts_with("--- Page ") {
                    Line::from(Span::styled(
                        line,
                        Style::default()
                            .fg(theme.active)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else if line == PAGE_ERROR_MARKER {
                    Line::from(Span::styled(line, Style::default().fg(theme.error)))
                } else {
                    Line::from(Span::styled(line, Style::default().fg(theme.text)))
                }
            })
            .collect()
    };

    let body = Paragraph::new(lines)
        .block(text_block)
        .wrap(Wrap { trim: false })
        .scroll((app.results_scroll, 0));
    f.render_widget(body, chunks[1]);

    let status = match &app.session.status {
        Some(status) => Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(theme.success),
        )),
        None => Line::from(Span::styled(
            format!(" {} characters", text.chars().count()),
            Style::default().fg(theme.dim),
        )),
    };
    f.render_widget(Paragraph::new(status), chunks[2]);

    let copy = if app.copied_until.is_some() {
        Span::styled(
            " y:Copied!",
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" y:copy", theme.footer_style())
    };
    let footer = Line::from(vec![
        copy,
        Span::styled(
            "  d:download  n:new file  j/k:scroll  ?:help  q:quit",
            theme.footer_style(),
        ),
    ]);
    f.render_widget(Paragraph::new(footer), chunks[3]);
}

/// Rows `text` takes in the results box when wrapped to `width` columns.
pub fn wrapped_height(text: &str, width: u16) -> usize {
    Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .line_count(width)
}
