use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, NoticeLevel};
use crate::desk::AnalyzeOutcome;
use crate::models::AnalysisStatus;

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: 1/3 left, 2/3 right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Left pane: post list
            Constraint::Ratio(2, 3), // Right pane: analysis
        ])
        .split(frame.area());

    // Left pane: header + post list + key hints
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Post list
            Constraint::Length(1), // Key hints
        ])
        .split(main_chunks[0]);

    // Right pane: selected post + analysis + notice
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Selected post
            Constraint::Min(0),    // Analysis
            Constraint::Length(1), // Notice
        ])
        .split(main_chunks[1]);

    render_header(frame, app, left_chunks[0]);
    render_post_list(frame, app, left_chunks[1]);
    render_key_hints(frame, app, left_chunks[2]);

    render_selected_post(frame, app, right_chunks[0]);
    render_analysis(frame, app, right_chunks[1]);
    render_notice(frame, app, right_chunks[2]);

    if app.product_input_active {
        render_product_input(frame, app);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let product = app
        .session
        .current_product
        .as_deref()
        .unwrap_or("no product");

    let title = format!(" Blog Reviews [{}] ", app.sort.label());
    let last_hit = app.first_hit as usize + app.posts.len().saturating_sub(1);
    let stats = if app.posts.is_empty() {
        format!(" {} | no posts | fetch {}", product, app.count)
    } else {
        format!(
            " {} | posts {}-{} of {} | fetch {}",
            product, app.first_hit, last_hit, app.total_hits, app.count
        )
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_post_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .posts
        .iter()
        .map(|post| {
            let line = Line::from(vec![
                Span::styled(format!("{} ", post.post_date), Style::default().fg(Color::Blue)),
                Span::styled(post.title.as_str(), Style::default().fg(Color::White)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.posts.is_empty() {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_key_hints(frame: &mut Frame, app: &App, area: Rect) {
    let status = app
        .busy
        .unwrap_or("/:product  s:search  a:analyze  g:redo  ?:help  q:quit");

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_selected_post(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.selected_post() {
        Some(post) => Text::from(vec![
            Line::from(Span::styled(
                post.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} · {} · {}", post.blogger_name, post.post_date, post.link),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        None => Text::from("No post selected"),
    };

    let block = Block::default()
        .title(" Post ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn section<'a>(heading: &'a str, body: &'a str, color: Color) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        heading,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(body.lines().map(Line::from));
    lines.push(Line::from(""));
    lines
}

fn render_analysis(frame: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.analysis, app.analysis_status) {
        (Some(outcome), _) => {
            let result = outcome.result();
            let mut lines = Vec::new();
            if let AnalyzeOutcome::Fresh { ad_analysis, .. } = outcome {
                lines.extend(section("Promotional content", ad_analysis, Color::Yellow));
            }
            lines.extend(section("Positive opinions", &result.positive_opinions, Color::Green));
            lines.extend(section("Negative opinions", &result.negative_opinions, Color::Red));
            lines.extend(section("Overall summary", &result.summary, Color::Cyan));
            Text::from(lines)
        }
        (None, AnalysisStatus::Failed) => match &app.raw_reply {
            Some(raw) => Text::from(section("Raw reply from the model", raw, Color::Red)),
            None => Text::from("Analysis failed. Press 'g' to retry."),
        },
        (None, AnalysisStatus::NoApiKey) => Text::from(format!(
            "OpenAI API key not configured.\n\nSet OPENAI_API_KEY or add it to:\n{}\n\nExample:\nopenai_api_key = \"sk-...\"",
            crate::config::Config::config_path().display()
        )),
        (None, _) if app.session.results_available => {
            Text::from("Press 'a' to analyse the cached posts...")
        }
        (None, _) => Text::from("Press '/' to search for a product..."),
    };

    let block = Block::default()
        .title(" Analysis ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.analysis_status {
        AnalysisStatus::Cached => "✓ Cached | ",
        AnalysisStatus::Fresh => "✓ Fresh | ",
        AnalysisStatus::Failed => "❌ Failed | ",
        _ => "",
    };

    let (message, color) = match &app.notice {
        Some(notice) => (
            notice.message.as_str(),
            match notice.level {
                NoticeLevel::Info => Color::DarkGray,
                NoticeLevel::Warning => Color::Yellow,
                NoticeLevel::Error => Color::Red,
            },
        ),
        None => ("", Color::DarkGray),
    };

    let paragraph =
        Paragraph::new(format!("{status}{message}")).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_product_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" Search blogs - enter a product name ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.product_input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   < / >    First / last post",
        "",
        " Search:",
        "   / or p   Enter product name and search",
        "   s        Search current product again",
        "   f        Toggle sort (newest / relevance)",
        "   + / -    More / fewer results",
        "",
        " Analysis:",
        "   a/Enter  Analyse (uses cache)",
        "   g        Re-run analysis",
        "   o        Open post in browser",
        "   X        Reset database",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
