use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;

/// Render the upload screen: file picker above, drop zone below.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // current dir
        Constraint::Min(5),    // file list
        Constraint::Length(5), // drop zone
        Constraint::Length(1), // footer
    ])
    .split(area);

    app.last_list_area = Some(chunks[2]);
    app.last_drop_zone = Some(chunks[3]);

    let theme = &app.theme;
    let picker = &app.file_picker;

    let header = Line::from(vec![
        Span::styled(" CipherDocs ", theme.header_style()),
        Span::styled(
            " > Select a PDF",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let dir_line = Line::from(vec![
        Span::styled(" \u{1F4C1} ", Style::default().fg(theme.active)),
        Span::styled(
            picker.current_dir.display().to_string(),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(dir_line), chunks[1]);

    // File list
    let visible_height = chunks[2].height.saturating_sub(2) as usize; // borders
    let scroll_offset = if picker.cursor >= visible_height {
        picker.cursor - visible_height + 1
    } else {
        0
    };

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .skip(scroll_offset)
        .take(visible_height)
        .map(|entry| {
            let (icon, style) = if entry.is_dir {
                ("\u{1F4C1} ", Style::default().fg(theme.active))
            } else if entry.is_pdf {
                ("\u{1F4C4} ", Style::default().fg(theme.text))
            } else {
                ("  ", Style::default().fg(theme.dim))
            };
            ListItem::new(Line::from(vec![
                Span::styled(icon, style),
                Span::styled(entry.name.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Files "),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    if !picker.entries.is_empty() {
        state.select(Some(picker.cursor.saturating_sub(scroll_offset)));
    }
    f.render_stateful_widget(list, chunks[2], &mut state);

    // Drop zone
    let drag_over = app.session.drag_over;
    let (headline, hint) = if drag_over {
        ("Release to drop the PDF", "")
    } else {
        (
            "Drop a PDF here",
            "or choose one above and press Enter",
        )
    };
    let drop_lines = vec![
        Line::from(Span::styled(
            headline,
            Style::default()
                .fg(if drag_over { theme.active } else { theme.text })
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint, Style::default().fg(theme.dim))),
        Line::from(Span::styled(
            "Only PDF files are accepted",
            Style::default().fg(theme.dim),
        )),
    ];
    let drop_zone = Paragraph::new(drop_lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(if drag_over {
                    BorderType::Thick
                } else {
                    BorderType::Rounded
                })
                .border_style(theme.drop_zone_style(drag_over))
                .title(" Drop Zone "),
        );
    f.render_widget(drop_zone, chunks[3]);

    let footer = Line::from(Span::styled(
        " j/k:navigate  Enter:open dir/extract  Esc:parent dir  ?:help  q:quit",
        theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[4]);
}
