use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::domain::Card;
use crate::portal::time_ago::time_ago;
use crate::render::embed::{
    EmbedFailure, LoadState, LOADING_TEXT, TWITTER_WIDGET_URL, VIEW_SOURCE_TEXT,
};
use crate::render::links::LinkTarget;
use crate::render::{BlockView, Inline, TELEGRAM_PANEL_TITLE};
use crate::tui::app::{ArticleScreen, ArticleView, HomePane, HomeState, Screen, TuiApp};

pub const RETRY_TEXT: &str = "Thử lại";
pub const NOT_FOUND_TEXT: &str = "Không tìm thấy bài viết";
const HOME_CRUMB: &str = "Trang chủ";
const RELATED_TITLE: &str = "Cùng chủ đề";
const SLIDER_TITLE: &str = "Tiêu điểm trong tháng";

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match &mut app.screen {
        Screen::Home => render_home(frame, &mut app.home, chunks[0], colors),
        Screen::Article(article) => render_article(frame, article, chunks[0], colors),
    }
    render_status_bar(frame, app, chunks[1], colors);
}

fn border_style(active: bool, colors: &ColorConfig) -> Style {
    if active {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    }
}

fn highlight_style(colors: &ColorConfig) -> Style {
    Style::default()
        .bg(colors.selection_bg)
        .fg(colors.selection_fg)
        .add_modifier(Modifier::BOLD)
}

fn tag_span(tag: &str, colors: &ColorConfig) -> Span<'static> {
    Span::styled(
        format!(" {} ", tag),
        Style::default().bg(colors.tag_bg).fg(colors.tag_fg),
    )
}

fn card_line(card: &Card, emphasized: bool, colors: &ColorConfig) -> Line<'static> {
    let title_style = if emphasized {
        Style::default()
            .fg(colors.headline)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.headline)
    };
    Line::from(vec![
        tag_span(&card.tag, colors),
        Span::raw(" "),
        Span::styled(card.title.clone(), title_style),
        Span::styled(format!("  {}", card.time), Style::default().fg(colors.time)),
    ])
}

fn render_home(frame: &mut Frame, home: &mut HomeState, area: Rect, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Highlighted
            Constraint::Min(8),     // Sections
            Constraint::Length(8),  // Slider
        ])
        .split(area);

    render_highlighted_pane(frame, home, chunks[0], colors);
    render_sections_pane(frame, home, chunks[1], colors);
    render_slider_pane(frame, home, chunks[2], colors);
}

fn render_highlighted_pane(
    frame: &mut Frame,
    home: &mut HomeState,
    area: Rect,
    colors: &ColorConfig,
) {
    let is_active = home.active_pane == HomePane::Highlighted;
    let block = Block::default()
        .title(" Nổi bật ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active, colors));

    if home.feed.highlighted.is_empty() {
        let paragraph = Paragraph::new("Không có bài viết nổi bật").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let large = home.feed.large_highlights().len();
    let items: Vec<ListItem> = home
        .feed
        .highlighted
        .iter()
        .enumerate()
        .map(|(i, card)| ListItem::new(card_line(card, i < large, colors)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut home.highlight_list_state);
}

fn render_sections_pane(frame: &mut Frame, home: &mut HomeState, area: Rect, colors: &ColorConfig) {
    let is_active = home.active_pane == HomePane::Sections;

    let mut items = Vec::new();
    for section in &home.feed.sections {
        let mut header = vec![Span::styled(
            format!("▌{} ", section.label),
            Style::default()
                .fg(colors.active_border)
                .add_modifier(Modifier::BOLD),
        )];
        header.extend(card_line(&section.main, true, colors).spans);
        items.push(ListItem::new(Line::from(header)));

        for card in &section.cards {
            let mut line = vec![Span::raw("   ")];
            line.extend(card_line(card, false, colors).spans);
            items.push(ListItem::new(Line::from(line)));
        }
    }

    let title = format!(
        " Chuyên mục [{}/{}] ",
        home.section_index + 1,
        items.len().max(1)
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active, colors));

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut home.section_list_state);
}

fn render_slider_pane(frame: &mut Frame, home: &mut HomeState, area: Rect, colors: &ColorConfig) {
    let is_active = home.active_pane == HomePane::Slider;
    let carousel = &home.carousel;
    let title = format!(
        " {} [{}/{}]{} ",
        SLIDER_TITLE,
        carousel.current() + 1,
        carousel.len().max(1),
        if carousel.is_paused() { " ⏸" } else { "" }
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active, colors));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    home.slider_area = inner;

    let carousel = &home.carousel;
    let visible = carousel.visible();
    if visible.is_empty() {
        return;
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, visible.len() as u32); visible.len()])
        .split(inner);

    for (column, &index) in columns.iter().zip(visible.iter()) {
        let Some(slide) = home.feed.slides.get(index) else {
            continue;
        };
        let title_style = if index == carousel.current() {
            highlight_style(colors)
        } else {
            Style::default()
                .fg(colors.headline)
                .add_modifier(Modifier::BOLD)
        };
        let text = Text::from(vec![
            Line::from(tag_span(&slide.tag, colors)),
            Line::from(Span::styled(slide.title.clone(), title_style)),
            Line::from(Span::styled(
                slide.description.clone(),
                Style::default().fg(colors.time),
            )),
        ]);
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::RIGHT).border_style(border_style(false, colors)))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *column);
    }
}

fn render_article(frame: &mut Frame, article: &ArticleScreen, area: Rect, colors: &ColorConfig) {
    let (title, content, scroll) = match article {
        ArticleScreen::Loaded(view) => (
            format!(" {} ", view.page.article.title),
            article_text(view, area.width, colors),
            view.scroll,
        ),
        ArticleScreen::Failed { message, .. } => (
            " Lỗi ".to_string(),
            Text::from(vec![
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(colors.error),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("[R] {}", RETRY_TEXT),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ]),
            0,
        ),
        ArticleScreen::NotFound { id } => (
            format!(" {} ", id),
            Text::from(Line::from(Span::styled(
                NOT_FOUND_TEXT,
                Style::default().fg(colors.error),
            ))),
            0,
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(true, colors));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Walks links in the same order as [`ArticleView::links`] so the focused
/// one can be highlighted.
struct LinkCursor<'a> {
    next: usize,
    focused: Option<usize>,
    colors: &'a ColorConfig,
}

impl LinkCursor<'_> {
    fn style(&mut self, target: &LinkTarget) -> Style {
        let index = self.next;
        self.next += 1;
        if Some(index) == self.focused {
            return Style::default()
                .fg(self.colors.focused_link)
                .add_modifier(Modifier::REVERSED | Modifier::UNDERLINED);
        }
        let color = match target {
            LinkTarget::Internal { .. } => self.colors.internal_link,
            LinkTarget::External(_) => self.colors.external_link,
        };
        Style::default().fg(color).add_modifier(Modifier::UNDERLINED)
    }
}

fn article_text(view: &ArticleView, width: u16, colors: &ColorConfig) -> Text<'static> {
    let article = &view.page.article;
    let mut lines = Vec::new();
    let mut cursor = LinkCursor {
        next: 0,
        focused: view.focused_link,
        colors,
    };

    lines.push(Line::from(vec![
        Span::styled(format!("{} › ", HOME_CRUMB), Style::default().fg(colors.time)),
        tag_span(&article.category, colors),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        article.title.clone(),
        Style::default()
            .fg(colors.headline)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        article.subtitle.clone(),
        Style::default().add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(Span::styled(
        time_ago(Some(article.publish_time.as_str()), Utc::now()),
        Style::default().fg(colors.time),
    )));
    lines.push(image_line(&article.hero_image, colors));
    lines.push(Line::from("─".repeat(width.saturating_sub(2) as usize)));

    for (s, (section, blocks)) in article.content_sections.iter().zip(&view.sections).enumerate() {
        lines.push(Line::from(""));
        if let Some(title) = &section.title {
            lines.push(Line::from(Span::styled(
                title.clone(),
                Style::default()
                    .fg(colors.headline)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )));
        }
        for (b, block) in blocks.iter().enumerate() {
            lines.extend(block_lines(block, view.embeds.state((s, b)), &mut cursor, colors));
        }
        if let Some(image) = article.image_for_section(s) {
            lines.push(image_line(&image.src, colors));
            lines.push(Line::from(Span::styled(
                image.caption().to_string(),
                Style::default()
                    .fg(colors.time)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        RELATED_TITLE,
        Style::default()
            .fg(colors.active_border)
            .add_modifier(Modifier::BOLD),
    )));
    for (card, target) in view.page.related.iter().zip(&view.links[view.related_link_start()..]) {
        let mut spans = vec![Span::styled("• ", cursor.style(target))];
        spans.extend(card_line(card, false, colors).spans);
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

fn image_line(src: &str, colors: &ColorConfig) -> Line<'static> {
    Line::from(Span::styled(
        format!("[Ảnh] {}", src),
        Style::default().fg(colors.embed),
    ))
}

fn block_lines(
    block: &BlockView,
    state: Option<&LoadState>,
    cursor: &mut LinkCursor<'_>,
    colors: &ColorConfig,
) -> Vec<Line<'static>> {
    let embed = Style::default().fg(colors.embed);
    match block {
        BlockView::Paragraph(inlines) => {
            let spans = inlines
                .iter()
                .map(|inline| match inline {
                    Inline::Text(text) => Span::raw(text.clone()),
                    Inline::Emphasis(text) => {
                        Span::styled(text.clone(), Style::default().add_modifier(Modifier::BOLD))
                    }
                    Inline::Link { text, target } => Span::styled(text.clone(), cursor.style(target)),
                })
                .collect::<Vec<_>>();
            vec![Line::from(spans), Line::from("")]
        }
        BlockView::Video { url, embed_url } => vec![
            Line::from(Span::styled(format!("▶ Video: {}", embed_url), embed)),
            Line::from(Span::styled(url.clone(), Style::default().fg(colors.time))),
        ],
        BlockView::Telegram { url } => vec![
            Line::from(Span::styled(format!("✈ {}", TELEGRAM_PANEL_TITLE), embed)),
            Line::from(Span::styled(url.clone(), Style::default().fg(colors.external_link))),
        ],
        BlockView::Frame { src, width, height } => {
            let ready = format!("[Khung nhúng {}×{}] {}", width, height, src);
            vec![embed_state_line(state, ready, colors)]
        }
        BlockView::Script { src } => {
            let ready = match src {
                Some(src) => format!("[Script] {}", src),
                None => "[Script nội tuyến]".to_string(),
            };
            vec![embed_state_line(state, ready, colors)]
        }
        BlockView::Tweet { url, .. } => vec![Line::from(vec![
            Span::styled("[Tweet] ", embed),
            Span::styled(url.clone(), Style::default().fg(colors.external_link)),
            Span::styled(format!("  ({})", TWITTER_WIDGET_URL), Style::default().fg(colors.time)),
        ])],
        BlockView::Quote(text) => text
            .lines()
            .map(|line| {
                Line::from(Span::styled(
                    format!("│ {}", line),
                    Style::default()
                        .fg(colors.quote)
                        .add_modifier(Modifier::ITALIC),
                ))
            })
            .collect(),
    }
}

fn embed_state_line(state: Option<&LoadState>, ready: String, colors: &ColorConfig) -> Line<'static> {
    match state {
        Some(LoadState::Loading) => Line::from(Span::styled(
            LOADING_TEXT,
            Style::default().fg(colors.time),
        )),
        Some(LoadState::Failed(failure)) => {
            let mut spans = vec![Span::styled(
                failure.message(),
                Style::default().fg(colors.error),
            )];
            if let EmbedFailure::Frame { src } = failure {
                spans.push(Span::raw(". "));
                spans.push(Span::styled(
                    format!("{}: {}", VIEW_SOURCE_TEXT, src),
                    Style::default().fg(colors.external_link),
                ));
            }
            Line::from(spans)
        }
        Some(LoadState::Ready) | None => {
            Line::from(Span::styled(ready, Style::default().fg(colors.embed)))
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let status = if app.is_loading {
        LOADING_TEXT.to_string()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        match &app.screen {
            Screen::Home if app.home.feed.offline => {
                "Ngoại tuyến  Tab:Pane  j/k:Nav  h/l:Slide  p:Pause  Enter:Open  R:Reload  q:Quit"
                    .to_string()
            }
            Screen::Home => {
                "Tab:Pane  j/k:Nav  h/l:Slide  p:Pause  Enter:Open  R:Reload  q:Quit".to_string()
            }
            Screen::Article(ArticleScreen::Loaded(view)) => match view.focused() {
                Some(target) => format!("{}  (Enter:Follow  o:Browser  Esc:Back)", target.href()),
                None => "j/k:Scroll  n/N:Links  Enter:Follow  o:Browser  Esc:Back  R:Reload"
                    .to_string(),
            },
            Screen::Article(_) => format!("R:{}  Esc:Back  q:Quit", RETRY_TEXT),
        }
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}
