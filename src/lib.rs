//! # Tintuc
//!
//! A terminal reader for a Vietnamese news portal.
//!
//! ## Architecture
//!
//! Every screen is composed from one remote summary document:
//!
//! ```text
//! Fetcher → SummaryDocument → Portal (home feed, article pages) → Renderer → UI
//! ```
//!
//! - [`fetcher`]: HTTP client for the summary document and embed resources
//! - [`content`]: HTML fragments to content blocks, and article assembly
//! - [`portal`]: Home feed, slider, related cards and built-in fallbacks
//! - [`render`]: Content blocks to views, with scoped embed loading
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the home feed
//! tintuc home
//!
//! # Print one article
//! tintuc article 1234
//!
//! # Show how an HTML fragment is split into blocks
//! tintuc blocks fragment.html
//!
//! # Launch TUI
//! tintuc
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the portal,
/// renderer and embed resolver.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/tintuc/config.toml`: API endpoint, home layout,
/// slider timing, colors and keybindings.
pub mod config;

/// Command-line interface using clap.
///
/// - `home` - Print the home feed
/// - `article <id>` - Print an article
/// - `blocks <file|->` - Print the marker encoding of an HTML fragment
/// - `tui` - Launch the TUI (default)
pub mod cli;

/// HTML content parsing and article assembly.
///
/// - [`parse`](content::parse): HTML fragment to [`ContentBlock`](domain::ContentBlock)s
/// - [`marker`](content::marker): the textual block encoding
/// - [`ArticleAssembler`](content::ArticleAssembler): raw records to articles
pub mod content;

/// Core domain models.
///
/// - [`SummaryDocument`](domain::SummaryDocument): the API payload
/// - [`ContentBlock`](domain::ContentBlock): one paragraph or embed
/// - [`Article`](domain::Article), [`Card`](domain::Card), [`Slide`](domain::Slide)
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for document fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Page composition.
///
/// - [`Portal`](portal::Portal): document fetch, home feed and article pages
/// - [`Carousel`](portal::Carousel): slider position and auto-advance
pub mod portal;

/// Block rendering, link classification and embed loading.
pub mod render;

/// Terminal user interface.
///
/// Home screen with highlighted, section and slider panes; article view with
/// link focus and live embed states.
///
/// Keybindings: j/k navigate, Tab cycles panes, h/l move the slider,
/// Enter opens, n/N cycle links, o opens in browser, Esc goes back,
/// R reloads, q quits.
pub mod tui;
