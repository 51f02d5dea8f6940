use chitas_core::{DailyView, DetailState, Language, LanguageSection, Verse, ViewNode, ViewTree};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Wrap,
    },
};

use crate::app::App;

/// Colors for one theme
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    error: Color,
    verse_number: Color,
}

const LIGHT: Palette = Palette {
    fg: Color::Black,
    bg: Color::White,
    accent: Color::Blue,
    muted: Color::DarkGray,
    highlight_fg: Color::White,
    highlight_bg: Color::Blue,
    error: Color::Red,
    verse_number: Color::Magenta,
};

const DARK: Palette = Palette {
    fg: Color::White,
    bg: Color::Black,
    accent: Color::Cyan,
    muted: Color::Gray,
    highlight_fg: Color::Black,
    highlight_bg: Color::Cyan,
    error: Color::LightRed,
    verse_number: Color::Yellow,
};

fn palette(view: &DailyView) -> &'static Palette {
    if view.dark_theme {
        &DARK
    } else {
        &LIGHT
    }
}

/// Hebrew text reads right to left, so it hugs the right edge.
fn alignment_for(language: Language) -> Alignment {
    match language {
        Language::En => Alignment::Left,
        Language::He => Alignment::Right,
    }
}

/// Draw the whole screen. The detail overlay clamps `detail_scroll` to its content.
pub fn render(app: &mut App, frame: &mut Frame) {
    let view = app.controller.view();
    let colors = palette(view);
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().fg(colors.fg).bg(colors.bg)),
        area,
    );

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(view, colors, frame, header_area);
    render_body(app, colors, frame, body_area);
    render_footer(app, colors, frame, footer_area);

    if app.detail_visible() {
        render_detail(app, colors, frame, area);
    }
}

fn render_header(view: &DailyView, colors: &Palette, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Chitas & Rambam ", Style::default().fg(colors.accent).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(colors.muted),
        ),
        Span::raw("  "),
        Span::styled(view.language.display_name(), Style::default().fg(colors.muted)),
    ]);

    let mut dates = vec![Span::styled(
        format!(" {}", view.gregorian_date),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(localized) = &view.localized_date {
        dates.push(Span::styled("  |  ", Style::default().fg(colors.muted)));
        dates.push(Span::raw(localized.clone()));
    }

    let header = Paragraph::new(vec![title, Line::from(dates)]);
    frame.render_widget(header, area);
}

fn render_body(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let view = app.controller.view();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.muted))
        .title(" Today's Study ");

    if view.loading {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        let loading = Paragraph::new(format!("Loading today's learning{dots}"))
            .style(Style::default().fg(colors.muted))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if let Some(banner) = &view.banner {
        let text = vec![
            Line::styled(banner.clone(), Style::default().fg(colors.error).bold()),
            Line::default(),
            Line::styled("Press r to try again.", Style::default().fg(colors.muted)),
        ];
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let align = alignment_for(view.language);
    let mut items: Vec<ListItem> = view
        .summaries
        .iter()
        .map(|summary| {
            ListItem::new(Text::from(vec![
                Line::styled(summary.heading.clone(), Style::default().fg(colors.accent).bold())
                    .alignment(align),
                Line::from(format!("  {}", summary.value)).alignment(align),
            ]))
        })
        .collect();

    // Non-selectable divider between the fixed slots and the rest of the feed
    let divider_row = items.len();
    if !view.others.is_empty() {
        items.push(ListItem::new(Line::styled(
            "── Other learning ──",
            Style::default().fg(colors.muted),
        )));
    }

    items.extend(view.others.iter().map(|other| {
        let marker = if other.expanded { "▾" } else { "▸" };
        let mut lines = vec![Line::from(format!("{marker} {}", other.title)).alignment(align)];
        if other.expanded {
            lines.push(Line::from(format!("    {}", other.value)).alignment(align));
            if other.viewable {
                lines.push(
                    Line::styled("    Enter: view full text", Style::default().fg(colors.muted))
                        .alignment(align),
                );
            }
        }
        ListItem::new(Text::from(lines))
    }));

    let selected_row = if app.cursor < divider_row {
        app.cursor
    } else {
        app.cursor + 1
    };
    let mut state = ListState::default().with_selected(Some(selected_row));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors.highlight_bg)
                .fg(colors.highlight_fg),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    if let Some(status) = &app.status {
        let status = Paragraph::new(format!(" {status}")).style(Style::default().fg(colors.accent));
        frame.render_widget(status, area);
        return;
    }

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(colors.fg);

    let keys: &[(&str, &str)] = if app.detail_visible() {
        &[
            ("j/k", "scroll"),
            ("PgUp/PgDn", "page"),
            ("l", "language"),
            ("o", "open source"),
            ("Esc", "close"),
        ]
    } else {
        &[
            ("j/k", "nav"),
            ("Enter", "view"),
            ("space", "expand"),
            ("l", "language"),
            ("t", "theme"),
            ("r", "reload"),
            ("q", "quit"),
        ]
    };

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {key} "), key_style),
                Span::styled(format!(" {label} "), label_style),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_detail(app: &mut App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let popup_width = (area.width * 4 / 5).max(20).min(area.width.saturating_sub(2));
    let popup_height = (area.height * 4 / 5).max(5).min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let detail = app.controller.detail();
    let language = app.controller.view().language;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent))
        .style(Style::default().fg(colors.fg).bg(colors.bg))
        .title(format!(" {} ", detail.title().unwrap_or_default()));
    let inner = block.inner(popup_area);
    let width = inner.width as usize;

    // Lines are wrapped here so one Line is exactly one row on screen
    let lines = match detail {
        DetailState::Hidden => Vec::new(),
        DetailState::Loading { reference, .. } => {
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            wrap_styled(
                &format!("Loading {reference}{dots}"),
                width,
                Style::default().fg(colors.muted),
                Alignment::Left,
            )
        }
        DetailState::Loaded { tree, .. } => tree_lines(tree, language, colors, width),
        DetailState::Failed {
            message,
            fallback_url,
            ..
        } => {
            let mut lines = wrap_styled(
                "Could not load this text.",
                width,
                Style::default().fg(colors.error).bold(),
                Alignment::Left,
            );
            lines.extend(wrap_styled(message, width, Style::default().fg(colors.muted), Alignment::Left));
            lines.push(Line::default());
            lines.push(Line::raw("Read it online:"));
            lines.extend(wrap_styled(
                fallback_url,
                width,
                Style::default().fg(colors.accent).add_modifier(Modifier::UNDERLINED),
                Alignment::Left,
            ));
            lines.extend(wrap_styled(
                "Press o to open it in your browser.",
                width,
                Style::default().fg(colors.muted),
                Alignment::Left,
            ));
            lines
        }
    };

    let total_rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total_rows.saturating_sub(inner.height);
    app.detail_scroll = app.detail_scroll.min(max_scroll);
    let scroll = app.detail_scroll;

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, popup_area);

    if max_scroll > 0 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll as usize + 1).position(scroll as usize);
        frame.render_stateful_widget(
            scrollbar,
            popup_area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries; a word wider than the line is split across rows
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    let pieces = text.split_whitespace().flat_map(|word| {
        let chars: Vec<char> = word.chars().collect();
        chars
            .chunks(width)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
    });

    for piece in pieces {
        let piece_len = piece.chars().count();

        if current_len == 0 {
            current_line = piece;
            current_len = piece_len;
        } else if current_len + 1 + piece_len <= width {
            current_line.push(' ');
            current_line.push_str(&piece);
            current_len += 1 + piece_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = piece;
            current_len = piece_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn wrap_styled(text: &str, width: usize, style: Style, align: Alignment) -> Vec<Line<'static>> {
    wrap_text_to_width(text, width)
        .into_iter()
        .map(|row| Line::styled(row, style).alignment(align))
        .collect()
}

/// The selected language's section comes first; the other follows when present.
fn tree_lines(tree: &ViewTree, language: Language, colors: &Palette, width: usize) -> Vec<Line<'static>> {
    let ordered = [language, language.toggled()];
    let sections: Vec<&LanguageSection> = ordered
        .iter()
        .filter_map(|lang| tree.section(*lang))
        .collect();

    let mut lines = Vec::new();
    for (idx, section) in sections.iter().enumerate() {
        if sections.len() > 1 {
            if idx > 0 {
                lines.push(Line::default());
            }
            lines.push(
                Line::styled(
                    section.language.display_name(),
                    Style::default().fg(colors.muted).add_modifier(Modifier::BOLD),
                )
                .alignment(alignment_for(section.language)),
            );
        }
        lines.extend(section_lines(section, colors, width));
    }
    lines
}

fn section_lines(section: &LanguageSection, colors: &Palette, width: usize) -> Vec<Line<'static>> {
    let align = alignment_for(section.language);
    let mut lines = Vec::new();

    for node in &section.nodes {
        match node {
            ViewNode::TextBlock(text) => {
                for paragraph in text.lines() {
                    lines.extend(wrap_styled(paragraph, width, Style::default(), align));
                }
                lines.push(Line::default());
            }
            ViewNode::Chapter(verses) => {
                for verse in verses {
                    lines.extend(verse_lines(verse, section.language, colors, width));
                    lines.push(Line::default()); // Empty line between verses
                }
            }
            ViewNode::NoContent => {
                lines.extend(wrap_styled(
                    "No text content available.",
                    width,
                    Style::default().fg(colors.muted),
                    align,
                ));
            }
        }
    }
    lines
}

/// A numbered verse with a hanging indent, so continuation rows line up with the text.
fn verse_lines(verse: &Verse, language: Language, colors: &Palette, width: usize) -> Vec<Line<'static>> {
    let number_style = Style::default().fg(colors.verse_number).bold();
    let prefix_len = format!("{}  ", verse.position).chars().count();
    let rows = wrap_text_to_width(&verse.text, width.saturating_sub(prefix_len).max(1));
    let indent = " ".repeat(prefix_len);

    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let line = match (language, idx) {
                (Language::En, 0) => Line::from(vec![
                    Span::styled(format!("{}  ", verse.position), number_style),
                    Span::raw(row),
                ]),
                (Language::En, _) => Line::from(vec![Span::raw(indent.clone()), Span::raw(row)]),
                (Language::He, 0) => Line::from(vec![
                    Span::raw(row),
                    Span::styled(format!("  {}", verse.position), number_style),
                ]),
                (Language::He, _) => Line::from(vec![Span::raw(row), Span::raw(indent.clone())]),
            };
            line.alignment(alignment_for(language))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chitas_core::{
        render as render_tree, Bilingual, CalendarItem, CalendarSnapshot, Category, Config,
        DetailAction, DetailKey, Section, TextBody, TextResponse,
    };
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_chapter_verses_are_numbered() {
        let response = TextResponse::english(TextBody::Sections(vec![Some(Section::Chapter(
            vec![Some("first".to_string()), None, Some("third".to_string())],
        ))]));
        let tree = render_tree(&response);

        let lines = plain(&tree_lines(&tree, Language::En, &LIGHT, 60));
        assert_eq!(lines, vec!["1  first", "", "3  third", ""]);
    }

    #[test]
    fn test_empty_response_shows_placeholder() {
        let tree = render_tree(&TextResponse::default());
        let lines = plain(&tree_lines(&tree, Language::En, &DARK, 60));
        assert_eq!(lines, vec!["No text content available."]);
    }

    #[test]
    fn test_selected_language_section_comes_first() {
        let response = TextResponse {
            he: Some(TextBody::Single("בראשית".to_string())),
            ..TextResponse::english(TextBody::Single("In the beginning".to_string()))
        };
        let tree = render_tree(&response);

        let lines = plain(&tree_lines(&tree, Language::He, &LIGHT, 60));
        assert_eq!(lines[0], Language::He.display_name());
        assert_eq!(lines[1], "בראשית");
        assert!(lines.contains(&"In the beginning".to_string()));
    }

    #[test]
    fn test_wrap_text_breaks_on_words() {
        assert_eq!(wrap_text_to_width("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap_text_to_width("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text_to_width("", 10), vec![""]);
    }

    #[test]
    fn test_long_verse_keeps_hanging_indent() {
        let response = TextResponse::english(TextBody::Sections(vec![Some(Section::Chapter(
            vec![Some("one two three four five".to_string())],
        ))]));
        let tree = render_tree(&response);

        let lines = plain(&tree_lines(&tree, Language::En, &LIGHT, 12));
        assert_eq!(lines, vec!["1  one two", "   three", "   four five", ""]);
    }

    fn app_with_detail(response: TextResponse) -> App {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut app = App::new(&Config::default(), today);
        app.controller.on_calendar_loaded(Ok(CalendarSnapshot {
            date: "2024-01-15".to_string(),
            localized_date: "5 Shevat 5784".to_string(),
            items: vec![CalendarItem {
                title: Bilingual::english("Tanya Yomi"),
                display_value: Bilingual::english("Tanya, Part I 3"),
                reference: Some("Tanya, Part I 3".to_string()),
                ..CalendarItem::default()
            }],
        }));

        let action = app
            .controller
            .on_detail_request(DetailKey::Category(Category::Tanya))
            .unwrap();
        let DetailAction::Fetch { token, .. } = action else {
            panic!("expected a fetch, got {action:?}");
        };
        assert!(app.controller.on_detail_loaded(token, Ok(response)));
        app
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn long_response() -> TextResponse {
        let filler = vec!["lorem"; 400].join(" ");
        TextResponse::english(TextBody::Sections(vec![
            Some(Section::Line(format!("OPENING {filler}"))),
            Some(Section::Line(format!("{filler} CLOSING"))),
        ]))
    }

    #[test]
    fn test_end_of_wrapped_text_is_reachable() {
        let mut app = app_with_detail(long_response());

        let top = draw(&mut app);
        assert!(top.contains("OPENING"));
        assert!(!top.contains("CLOSING"));

        app.scroll_detail_down(u16::MAX);
        let bottom = draw(&mut app);
        assert!(bottom.contains("CLOSING"));
        assert!(!bottom.contains("OPENING"));

        // Scroll position is clamped, so scrolling back up responds at once
        let max = app.detail_scroll;
        assert!(max > 0 && max < u16::MAX);
        app.scroll_detail_up(1);
        assert_eq!(app.detail_scroll, max - 1);
    }

    #[test]
    fn test_scrollbar_only_for_overflowing_text() {
        let mut app = app_with_detail(long_response());
        assert!(draw(&mut app).contains('^'));

        let mut app = app_with_detail(TextResponse::english(TextBody::Single(
            "A short passage".to_string(),
        )));
        app.scroll_detail_down(u16::MAX);
        let screen = draw(&mut app);
        assert!(screen.contains("A short passage"));
        assert!(!screen.contains('^'));
        assert_eq!(app.detail_scroll, 0);
    }
}
