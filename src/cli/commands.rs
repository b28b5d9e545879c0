use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use chrono::Utc;

use crate::app::{AppContext, Result};
use crate::content::{marker, parse};
use crate::domain::Card;
use crate::portal::time_ago::time_ago;
use crate::portal::{ArticlePage, HomeFeed};
use crate::render::{BlockView, Inline, Renderer, TELEGRAM_PANEL_TITLE};

pub async fn print_home(ctx: &AppContext) -> Result<()> {
    let feed = ctx.portal.home().await;
    if feed.offline {
        eprintln!("Could not load {}, showing built-in content", ctx.portal.summary_url());
    }
    print!("{}", format_home(&feed));
    Ok(())
}

pub async fn print_article(ctx: &AppContext, id: &str) -> Result<()> {
    let page = ctx.portal.article(id).await?;
    print!("{}", format_article(&page, &ctx.renderer));
    Ok(())
}

/// Parse an HTML file (or stdin for `-`) and print one marker string per block.
pub fn print_blocks(path: &Path, renderer: Option<&Renderer>) -> Result<()> {
    let html = if path == Path::new("-") {
        let mut html = String::new();
        std::io::stdin().read_to_string(&mut html)?;
        html
    } else {
        std::fs::read_to_string(path)?
    };

    print!("{}", format_blocks(&html, renderer));
    Ok(())
}

/// Marker lines for `html`. With a renderer, each line is decoded again and
/// followed by the rendered block.
pub fn format_blocks(html: &str, renderer: Option<&Renderer>) -> String {
    let mut out = String::new();
    for line in marker::encode_all(&parse(html)) {
        let _ = writeln!(out, "{}", line);
        if let Some(view) = renderer.and_then(|r| r.render_marker(&line)) {
            let _ = writeln!(out, "  => {}", block_text(&view));
        }
    }
    out
}

fn card_line(card: &Card) -> String {
    format!("[{}] {} ({}) #{}", card.tag, card.title, card.time, card.id)
}

pub fn format_home(feed: &HomeFeed) -> String {
    let mut out = String::new();

    if !feed.highlighted.is_empty() {
        let _ = writeln!(out, "== Nổi bật ==");
        for card in feed.large_highlights() {
            let _ = writeln!(out, "* {}", card_line(card));
        }
        for card in feed.small_highlights() {
            let _ = writeln!(out, "  {}", card_line(card));
        }
        let _ = writeln!(out);
    }

    for section in &feed.sections {
        let marker = if section.is_fallback { " (mặc định)" } else { "" };
        let _ = writeln!(out, "== {}{} ==", section.label, marker);
        let _ = writeln!(out, "* {}", card_line(&section.main));
        for card in &section.cards {
            let _ = writeln!(out, "  {}", card_line(card));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "== Tiêu điểm trong tháng ==");
    for (i, slide) in feed.slides.iter().enumerate() {
        let _ = writeln!(out, "{}. [{}] {} #{}", i + 1, slide.tag, slide.title, slide.id);
    }
    out
}

fn inline_text(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => text.clone(),
        Inline::Emphasis(text) => format!("**{}**", text),
        Inline::Link { text, target } => format!("[{}]({})", text, target.href()),
    }
}

fn block_text(view: &BlockView) -> String {
    match view {
        BlockView::Paragraph(inlines) => inlines.iter().map(inline_text).collect(),
        BlockView::Video { embed_url, .. } => format!("[Video] {}", embed_url),
        BlockView::Telegram { url } => format!("[{}] {}", TELEGRAM_PANEL_TITLE, url),
        BlockView::Frame { src, width, height } => format!("[Khung nhúng {}x{}] {}", width, height, src),
        BlockView::Script { src: Some(src) } => format!("[Script] {}", src),
        BlockView::Script { src: None } => "[Script nội tuyến]".to_string(),
        BlockView::Tweet { url, .. } => format!("[Tweet] {}", url),
        BlockView::Quote(text) => text
            .lines()
            .map(|line| format!("> {}", line))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn format_article(page: &ArticlePage, renderer: &Renderer) -> String {
    let article = &page.article;
    let mut out = String::new();

    let _ = writeln!(out, "Trang chủ > {}", article.category);
    let _ = writeln!(out, "# {}", article.title);
    let _ = writeln!(out, "{}", article.subtitle);
    let _ = writeln!(out, "{}", time_ago(Some(article.publish_time.as_str()), Utc::now()));
    let _ = writeln!(out, "[Ảnh] {}", article.hero_image);

    for (i, section) in article.content_sections.iter().enumerate() {
        let _ = writeln!(out);
        if let Some(title) = &section.title {
            let _ = writeln!(out, "## {}", title);
        }
        for block in &section.blocks {
            let _ = writeln!(out, "{}", block_text(&renderer.render(block)));
        }
        if let Some(image) = article.image_for_section(i) {
            let _ = writeln!(out, "[Ảnh] {} ({})", image.src, image.caption());
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "== Cùng chủ đề ==");
    for card in &page.related {
        let _ = writeln!(out, "  {}", card_line(card));
    }
    out
}
