use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
};
use gemdex_core::{Sender, SpeciesRecord, TextInput, GENERATIONS};

use crate::app::{App, InputMode, Screen};

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries for wrapping (doesn't break mid-word)
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
            current_len = word_len;
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

/// Rows a set of lines takes once wrapped to `width`.
fn wrapped_height(lines: &[Line], width: usize) -> usize {
    lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            wrap_text_to_width(&text, width)
                .iter()
                .map(|l| l.chars().count().div_ceil(width.max(1)).max(1))
                .sum::<usize>()
        })
        .sum()
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Chat => render_chat_screen(app, frame, body_area),
        Screen::Detail => render_detail_screen(app, frame, body_area),
        Screen::Batch => render_batch_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let tab = |label: &'static str, screen: Screen| {
        if app.screen == screen {
            Span::styled(label, Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        } else {
            Span::styled(label, Style::default().fg(Color::White))
        }
    };

    let title = Line::from(vec![
        Span::styled(" gemdex ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        tab(" 1 Chat ", Screen::Chat),
        Span::raw(" "),
        tab(" 2 Pokédex ", Screen::Detail),
        Span::raw(" "),
        tab(" 3 Generations ", Screen::Batch),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::Chat => " CHAT ",
        Screen::Detail => " SEARCH ",
        Screen::Batch => " GENERATIONS ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: &[(&str, &str)] = match (app.screen, app.input_mode) {
        (Screen::Chat, InputMode::Editing) => &[("Enter", "send"), ("Esc", "stop typing")],
        (Screen::Chat, InputMode::Normal) => &[("i", "type"), ("j/k", "scroll"), ("G", "latest"), ("2/3", "pokédex"), ("q", "quit")],
        (Screen::Detail, InputMode::Editing) => &[("Enter", "search"), ("Esc", "cancel")],
        (Screen::Detail, InputMode::Normal) => &[("/", "search"), ("r", "raw json"), ("j/k", "scroll"), ("g", "generations"), ("1", "chat"), ("q", "quit")],
        (Screen::Batch, _) => &[("j/k", "generation"), ("Enter", "load"), ("J/K", "rows"), ("b", "search"), ("1", "chat"), ("q", "quit")],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw a one-line input box and place the cursor in it when editing.
fn render_input(frame: &mut Frame, area: Rect, input: &TextInput, title: &str, placeholder: &str, editing: bool) {
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor = input.cursor();
    // Keep the cursor visible on long input
    let skip = cursor.saturating_sub(inner_width.saturating_sub(1));

    let content = if input.as_str().is_empty() && !editing {
        Line::from(Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(input.as_str().chars().skip(skip).collect::<String>())
    };

    frame.render_widget(Paragraph::new(content).block(block), area);

    if editing {
        let x = area.x + 1 + (cursor - skip) as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Chat with Gemini AI: {} ", app.model));

    let mut lines: Vec<Line> = Vec::new();

    if app.chat.log().is_empty() && !app.chat.is_loading() {
        lines.push(Line::from(Span::styled(
            "Type a message...",
            Style::default().fg(Color::DarkGray),
        )));
        if !app.has_api_key {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "No GEMINI_API_KEY configured: replies will fail.",
                Style::default().fg(Color::Red),
            )));
        }
    }

    for msg in app.chat.log() {
        let (label, color) = match msg.sender {
            Sender::User => ("You:", Color::Cyan),
            Sender::Bot => ("Gemini:", Color::Yellow),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for text_line in msg.text.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        lines.push(Line::default());
    }

    if app.chat.is_loading() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let inner_height = chat_area.height.saturating_sub(2) as usize;
    let inner_width = chat_area.width.saturating_sub(2) as usize;
    let total = wrapped_height(&lines, inner_width);
    let max_scroll = total.saturating_sub(inner_height) as u16;
    if app.chat_follow {
        app.chat_scroll = max_scroll;
    } else {
        app.chat_scroll = app.chat_scroll.min(max_scroll);
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let title = if app.chat.is_loading() { " Loading... " } else { " Message (Enter to send) " };
    render_input(
        frame,
        input_area,
        app.chat.input(),
        title,
        "Type a message...",
        app.input_mode == InputMode::Editing,
    );
}

fn record_lines(record: &SpeciesRecord, base_url: &str) -> Vec<Line<'static>> {
    let label = |name: &'static str| Span::styled(name, Style::default().add_modifier(Modifier::BOLD));

    vec![
        Line::from(Span::styled(
            record.heading(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            label("Image: "),
            Span::styled(
                record.image_url.clone().unwrap_or_else(|| "(none)".to_string()),
                Style::default().fg(Color::Blue),
            ),
        ]),
        Line::from(vec![label("Height: "), Span::raw(record.height.to_string())]),
        Line::from(vec![label("Weight: "), Span::raw(record.weight.to_string())]),
        Line::from(vec![label("Types: "), Span::raw(record.types_joined())]),
        Line::default(),
        Line::from(vec![label("HTTP Method Used: "), Span::raw("GET (retrieve data)")]),
        Line::from(vec![label("Endpoint Used: "), Span::raw(record.endpoint(base_url))]),
    ]
}

fn render_detail_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [intro_area, input_area, status_area, record_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Learn About APIs Using Pokédex",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "An API lets programs talk to each other. This Pokédex fetches its data live from an external source.",
            Style::default().fg(Color::Gray),
        )),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, intro_area);

    render_input(
        frame,
        input_area,
        app.detail.search(),
        " Search ",
        "Enter Pokémon name",
        app.input_mode == InputMode::Editing,
    );

    let status = if app.detail.is_loading() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        Line::from(Span::styled(
            format!("Fetching data from Pokémon API{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else if let Some(error) = app.detail.error() {
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(status), status_area);

    let Some(record) = app.detail.record() else {
        return;
    };

    if app.detail.show_raw() {
        let [fields_area, raw_area] = Layout::horizontal([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .areas(record_area);

        let fields = Paragraph::new(record_lines(record, &app.pokeapi_base_url))
            .block(Block::default().borders(Borders::ALL).title(" Pokémon "))
            .wrap(Wrap { trim: false });
        frame.render_widget(fields, fields_area);

        let raw = Paragraph::new(record.raw_pretty())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(" Raw JSON Data (r to hide, j/k to scroll) "),
            )
            .scroll((app.detail_scroll, 0));
        frame.render_widget(raw, raw_area);
    } else {
        let fields = Paragraph::new(record_lines(record, &app.pokeapi_base_url))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Pokémon (r to view raw JSON) "),
            )
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll, 0));
        frame.render_widget(fields, record_area);
    }
}

fn render_batch_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [nav_area, table_area] = Layout::horizontal([
        Constraint::Length(22),
        Constraint::Min(0),
    ])
    .areas(area);

    let selected = app.batch.generation();
    let items: Vec<ListItem> = GENERATIONS
        .iter()
        .map(|generation| {
            let style = if *generation == selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(generation.label, style))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Generation "))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, nav_area, &mut app.generation_state);

    let title = format!(" {} Pokémon ", selected.label);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    if app.batch.is_loading() && app.batch.records().is_empty() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        frame.render_widget(Paragraph::new(format!("Loading{}", dots)).block(block), table_area);
        return;
    }

    let mut block = block;
    if let Some(error) = app.batch.error() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Red),
        )));
    } else if app.batch.is_loading() {
        block = block.title_bottom(Line::from(Span::styled(
            " Loading... ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let header = Row::new(vec!["Image", "Name", "Height", "Weight", "Type"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .batch
        .records()
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.image_url.clone().unwrap_or_default()).style(Style::default().fg(Color::Blue)),
                Cell::from(record.heading()),
                Cell::from(record.height.to_string()),
                Cell::from(record.weight.to_string()),
                Cell::from(record.types_joined()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, table_area, &mut app.table_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_wrap_text_to_width() {
        assert_eq!(wrap_text_to_width("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text_to_width("", 10), vec![""]);
    }

    #[tokio::test]
    async fn test_chat_screen_shows_labels_and_thinking() {
        let (mut app, _rx) = test_app(Screen::Chat);
        app.chat.set_input("hello gemini");
        app.send_chat();

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("You:"));
        assert!(text.contains("hello gemini"));
        assert!(text.contains("Thinking"));
    }

    #[tokio::test]
    async fn test_detail_screen_shows_record_fields() {
        let (mut app, mut rx) = test_app(Screen::Detail);
        app.start();
        let event = rx.recv().await.unwrap();
        app.apply_result(event);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("PIKACHU"));
        assert!(text.contains("Height: 4"));
        assert!(text.contains("Weight: 60"));
        assert!(text.contains("Types: electric"));
    }

    #[tokio::test]
    async fn test_batch_screen_lists_generations_and_rows() {
        let (mut app, mut rx) = test_app(Screen::Batch);
        app.start();
        let event = rx.recv().await.unwrap();
        app.apply_result(event);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Generation VIII"));
        assert!(text.contains("Generation I Pokémon"));
        assert!(text.contains("MON0"));
    }
}
