use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;

use crate::config::CarouselConfig;
use crate::domain::Card;
use crate::portal::{ArticlePage, Carousel, HomeFeed};
use crate::render::embed::{EmbedSession, LoadOutcome};
use crate::render::links::LinkTarget;
use crate::render::{BlockView, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomePane {
    Highlighted,
    Sections,
    Slider,
}

impl HomePane {
    pub fn next(self) -> Self {
        match self {
            HomePane::Highlighted => HomePane::Sections,
            HomePane::Sections => HomePane::Slider,
            HomePane::Slider => HomePane::Highlighted,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            HomePane::Highlighted => HomePane::Slider,
            HomePane::Sections => HomePane::Highlighted,
            HomePane::Slider => HomePane::Sections,
        }
    }
}

pub struct HomeState {
    pub feed: HomeFeed,
    pub active_pane: HomePane,
    pub highlight_index: usize,
    pub section_index: usize,
    pub highlight_list_state: ListState,
    pub section_list_state: ListState,
    pub carousel: Carousel,
    /// Inner area of the slider pane, as last drawn.
    pub slider_area: Rect,
    hovering_slider: bool,
    press_column: Option<u16>,
}

/// Pointer units per terminal column, so swipe thresholds read as pixels.
const UNITS_PER_COLUMN: i32 = 8;

impl HomeState {
    pub fn new(feed: HomeFeed, carousel: &CarouselConfig, now: Instant) -> Self {
        let carousel = Carousel::new(feed.slides.len(), carousel, now);
        let mut highlight_list_state = ListState::default();
        highlight_list_state.select(Some(0));
        let mut section_list_state = ListState::default();
        section_list_state.select(Some(0));

        Self {
            feed,
            active_pane: HomePane::Highlighted,
            highlight_index: 0,
            section_index: 0,
            highlight_list_state,
            section_list_state,
            carousel,
            slider_area: Rect::default(),
            hovering_slider: false,
            press_column: None,
        }
    }

    /// Swap in a reloaded feed, keeping selections that are still valid.
    pub fn set_feed(&mut self, feed: HomeFeed) {
        self.feed = feed;
        self.carousel.set_len(self.feed.slides.len());
        self.highlight_index = clamp(self.highlight_index, self.feed.highlighted.len());
        self.section_index = clamp(self.section_index, self.section_cards().len());
        self.highlight_list_state.select(Some(self.highlight_index));
        self.section_list_state.select(Some(self.section_index));
    }

    /// Every section card in display order, main cards first in each section.
    pub fn section_cards(&self) -> Vec<&Card> {
        self.feed
            .sections
            .iter()
            .flat_map(|section| section.all_cards())
            .collect()
    }

    /// The article behind the current selection of the active pane.
    pub fn selected_article_id(&self) -> Option<String> {
        let id = match self.active_pane {
            HomePane::Highlighted => self.feed.highlighted.get(self.highlight_index)?.id.clone(),
            HomePane::Sections => self.section_cards().get(self.section_index)?.id.clone(),
            HomePane::Slider => self.feed.slides.get(self.carousel.current())?.id.clone(),
        };
        (!id.is_empty()).then_some(id)
    }

    pub fn move_up(&mut self, now: Instant) {
        match self.active_pane {
            HomePane::Highlighted => {
                if self.highlight_index > 0 {
                    self.highlight_index -= 1;
                    self.highlight_list_state.select(Some(self.highlight_index));
                }
            }
            HomePane::Sections => {
                if self.section_index > 0 {
                    self.section_index -= 1;
                    self.section_list_state.select(Some(self.section_index));
                }
            }
            HomePane::Slider => self.carousel.prev(now),
        }
    }

    pub fn move_down(&mut self, now: Instant) {
        match self.active_pane {
            HomePane::Highlighted => {
                if self.highlight_index + 1 < self.feed.highlighted.len() {
                    self.highlight_index += 1;
                    self.highlight_list_state.select(Some(self.highlight_index));
                }
            }
            HomePane::Sections => {
                if self.section_index + 1 < self.section_cards().len() {
                    self.section_index += 1;
                    self.section_list_state.select(Some(self.section_index));
                }
            }
            HomePane::Slider => self.carousel.next(now),
        }
    }

    /// Mouse input over the slider: hovering pauses it, a drag swipes it and
    /// a click on a slide jumps to that slide.
    pub fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let inside = self
            .slider_area
            .contains(Position::new(mouse.column, mouse.row));
        let x = i32::from(mouse.column) * UNITS_PER_COLUMN;

        match mouse.kind {
            MouseEventKind::Moved => {
                if inside != self.hovering_slider {
                    self.hovering_slider = inside;
                    self.carousel.set_paused(inside);
                }
            }
            MouseEventKind::Down(MouseButton::Left) if inside => {
                self.active_pane = HomePane::Slider;
                self.press_column = Some(mouse.column);
                self.carousel.touch_start(x);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.carousel.touch_move(x),
            MouseEventKind::Up(MouseButton::Left) => {
                self.carousel.touch_move(x);
                let pressed = self.press_column.take();
                if self.carousel.touch_end(now).is_none() && pressed == Some(mouse.column) {
                    if let Some(index) = self.slide_at(mouse.column) {
                        self.carousel.go_to(index, now);
                    }
                }
            }
            _ => {}
        }
    }

    /// The slide drawn under `column`, matching the even column split of the
    /// slider pane.
    fn slide_at(&self, column: u16) -> Option<usize> {
        let area = self.slider_area;
        if area.width == 0 || column < area.x || column >= area.x + area.width {
            return None;
        }
        let visible = self.carousel.visible();
        let offset = usize::from(column - area.x);
        visible
            .get(offset * visible.len() / usize::from(area.width))
            .copied()
    }
}

fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// An open article with its rendered blocks and live embed loads.
pub struct ArticleView {
    pub page: ArticlePage,
    /// Rendered blocks, one list per content section.
    pub sections: Vec<Vec<BlockView>>,
    pub embeds: EmbedSession,
    /// Text links in reading order, followed by one link per related card.
    pub links: Vec<LinkTarget>,
    pub focused_link: Option<usize>,
    pub scroll: u16,
}

impl ArticleView {
    pub fn new(page: ArticlePage, renderer: &Renderer, embeds: EmbedSession) -> Self {
        let sections: Vec<Vec<BlockView>> = page
            .article
            .content_sections
            .iter()
            .map(|section| section.blocks.iter().map(|b| renderer.render(b)).collect())
            .collect();

        let mut links: Vec<LinkTarget> = sections
            .iter()
            .flatten()
            .flat_map(|view| view.links().cloned())
            .collect();
        links.extend(page.related.iter().map(|card| related_link(&card.id)));

        Self {
            page,
            sections,
            embeds,
            links,
            focused_link: None,
            scroll: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.page.article.id
    }

    /// Index of the first related-card link in [`Self::links`].
    pub fn related_link_start(&self) -> usize {
        self.links.len() - self.page.related.len()
    }

    pub fn focused(&self) -> Option<&LinkTarget> {
        self.focused_link.and_then(|i| self.links.get(i))
    }

    pub fn next_link(&mut self) {
        if self.links.is_empty() {
            return;
        }
        self.focused_link = Some(match self.focused_link {
            Some(i) => (i + 1) % self.links.len(),
            None => 0,
        });
    }

    pub fn prev_link(&mut self) {
        if self.links.is_empty() {
            return;
        }
        let len = self.links.len();
        self.focused_link = Some(match self.focused_link {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        });
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }
}

fn related_link(id: &str) -> LinkTarget {
    LinkTarget::Internal {
        href: format!("/posts/{}", id),
        article_id: Some(id.to_string()),
    }
}

pub enum ArticleScreen {
    Loaded(Box<ArticleView>),
    /// The document could not be fetched. `R` retries.
    Failed { id: String, message: String },
    NotFound { id: String },
}

impl ArticleScreen {
    pub fn id(&self) -> &str {
        match self {
            ArticleScreen::Loaded(view) => view.id(),
            ArticleScreen::Failed { id, .. } | ArticleScreen::NotFound { id } => id,
        }
    }
}

pub enum Screen {
    Home,
    Article(ArticleScreen),
}

pub struct TuiApp {
    pub screen: Screen,
    pub home: HomeState,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub is_loading: bool,
}

impl TuiApp {
    pub fn new(home: HomeState) -> Self {
        Self {
            screen: Screen::Home,
            home,
            should_quit: false,
            status_message: None,
            is_loading: false,
        }
    }

    pub fn article(&self) -> Option<&ArticleScreen> {
        match &self.screen {
            Screen::Article(article) => Some(article),
            Screen::Home => None,
        }
    }

    pub fn article_view_mut(&mut self) -> Option<&mut ArticleView> {
        match &mut self.screen {
            Screen::Article(ArticleScreen::Loaded(view)) => Some(view),
            _ => None,
        }
    }

    /// Leave the article, dropping its embed session.
    pub fn close_article(&mut self) {
        self.screen = Screen::Home;
    }

    pub fn show_article(&mut self, article: ArticleScreen) {
        self.screen = Screen::Article(article);
    }

    /// Route an embed load result to the open view. Results for views that
    /// were already closed are dropped.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) -> bool {
        match self.article_view_mut() {
            Some(view) => view.embeds.apply(outcome),
            None => false,
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
