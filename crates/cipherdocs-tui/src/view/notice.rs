use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use cipherdocs_core::{Notice, NoticeKind};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render a blocking notice as a centered popup.
pub fn render(f: &mut Frame, notice: &Notice, theme: &Theme) {
    let area = f.area();
    let width = area.width.saturating_sub(4).min(64);
    let popup = centered_rect(width, 8, area);

    let title = match notice.kind {
        NoticeKind::InvalidFileType => " Invalid File ",
        NoticeKind::ProcessingFailed => " Processing Failed ",
        NoticeKind::ClipboardFailed => " Clipboard ",
        NoticeKind::SaveFailed => " Download Failed ",
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", notice.message),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(detail) = &notice.detail {
        lines.push(Line::from(Span::styled(
            format!("  {detail}"),
            Style::default().fg(theme.dim),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "  Enter",
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": OK", Style::default().fg(theme.dim)),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .title(title),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
