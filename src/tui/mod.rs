pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{AppContext, PortalError, Result};
use crate::render::embed::LoadOutcome;
use crate::render::links::LinkTarget;

use self::app::{ArticleScreen, ArticleView, HomeState, Screen, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const EVENT_POLL: Duration = Duration::from_millis(100);

pub async fn run(ctx: Arc<AppContext>, outcomes: mpsc::UnboundedReceiver<LoadOutcome>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, outcomes).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Tui,
    ctx: Arc<AppContext>,
    mut outcomes: mpsc::UnboundedReceiver<LoadOutcome>,
) -> Result<()> {
    let config = &ctx.config;
    let feed = ctx.portal.home().await;
    let mut tui_app = TuiApp::new(HomeState::new(feed, &config.carousel, Instant::now()));
    let event_handler = EventHandler::new(EVENT_POLL.min(config.carousel.tick()));

    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            tui_app.apply_outcome(outcome);
        }

        terminal.draw(|frame| layout::render(frame, &mut tui_app, &config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                tui_app.clear_status();
                let action = config.keybindings.get_action(&key);
                if matches!(tui_app.screen, Screen::Home) {
                    handle_home(terminal, &mut tui_app, &ctx, action).await?;
                } else {
                    handle_article(terminal, &mut tui_app, &ctx, action).await?;
                }
            }
            AppEvent::Mouse(mouse) => {
                if matches!(tui_app.screen, Screen::Home) {
                    tui_app.home.on_mouse(mouse, Instant::now());
                }
            }
            AppEvent::Tick => {
                if matches!(tui_app.screen, Screen::Home) {
                    tui_app.home.carousel.on_tick(Instant::now());
                }
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn handle_home(
    terminal: &mut Tui,
    tui_app: &mut TuiApp,
    ctx: &AppContext,
    action: Action,
) -> Result<()> {
    let now = Instant::now();
    let home = &mut tui_app.home;
    match action {
        Action::Quit => tui_app.should_quit = true,
        Action::MoveUp => home.move_up(now),
        Action::MoveDown => home.move_down(now),
        Action::NextPane => home.active_pane = home.active_pane.next(),
        Action::PrevPane => home.active_pane = home.active_pane.prev(),
        Action::SlideNext => home.carousel.next(now),
        Action::SlidePrev => home.carousel.prev(now),
        Action::ToggleSliderPause => {
            let paused = !home.carousel.is_paused();
            home.carousel.set_paused(paused);
        }
        Action::Select => {
            if let Some(id) = home.selected_article_id() {
                open_article(terminal, tui_app, ctx, id).await?;
            }
        }
        Action::Refresh => {
            tui_app.is_loading = true;
            terminal.draw(|frame| layout::render(frame, tui_app, &ctx.config.colors))?;
            let feed = ctx.portal.home().await;
            let offline = feed.offline;
            tui_app.home.set_feed(feed);
            tui_app.is_loading = false;
            if offline {
                tui_app.set_status("Không tải được dữ liệu, đang hiển thị nội dung mặc định".into());
            }
        }
        Action::Back
        | Action::NextLink
        | Action::PrevLink
        | Action::OpenInBrowser
        | Action::None => {}
    }
    Ok(())
}

async fn handle_article(
    terminal: &mut Tui,
    tui_app: &mut TuiApp,
    ctx: &AppContext,
    action: Action,
) -> Result<()> {
    match action {
        Action::Quit => tui_app.should_quit = true,
        Action::Back => tui_app.close_article(),
        Action::Refresh => {
            if let Some(id) = tui_app.article().map(|a| a.id().to_string()) {
                open_article(terminal, tui_app, ctx, id).await?;
            }
        }
        Action::Select => {
            let focused = tui_app
                .article_view_mut()
                .and_then(|view| view.focused().cloned());
            match focused {
                Some(LinkTarget::Internal {
                    article_id: Some(id),
                    ..
                }) => open_article(terminal, tui_app, ctx, id).await?,
                Some(target) => open_in_browser(tui_app, ctx, &target),
                None => {}
            }
        }
        Action::OpenInBrowser => {
            let target = match tui_app.article() {
                Some(ArticleScreen::Loaded(view)) => view.focused().cloned().unwrap_or_else(|| {
                    LinkTarget::Internal {
                        href: format!("/posts/{}", view.id()),
                        article_id: Some(view.id().to_string()),
                    }
                }),
                _ => return Ok(()),
            };
            open_in_browser(tui_app, ctx, &target);
        }
        _ => {
            if let Some(view) = tui_app.article_view_mut() {
                match action {
                    Action::MoveUp => view.scroll_up(),
                    Action::MoveDown => view.scroll_down(),
                    Action::NextLink => view.next_link(),
                    Action::PrevLink => view.prev_link(),
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// Replace the current screen with article `id`. The previous view and its
/// embed loads are torn down before the new one is fetched.
async fn open_article(
    terminal: &mut Tui,
    tui_app: &mut TuiApp,
    ctx: &AppContext,
    id: String,
) -> Result<()> {
    tui_app.close_article();
    tui_app.is_loading = true;
    terminal.draw(|frame| layout::render(frame, tui_app, &ctx.config.colors))?;

    let screen = match ctx.portal.article(&id).await {
        Ok(page) => {
            let session = ctx.embeds.open_session(&page.article);
            ArticleScreen::Loaded(Box::new(ArticleView::new(page, &ctx.renderer, session)))
        }
        Err(PortalError::ArticleNotFound(id)) => {
            tracing::info!("Article {} not found", id);
            ArticleScreen::NotFound { id }
        }
        Err(e) => {
            tracing::warn!("Failed to load article {}: {}", id, e);
            ArticleScreen::Failed {
                id,
                message: e.to_string(),
            }
        }
    };

    tui_app.is_loading = false;
    tui_app.show_article(screen);
    Ok(())
}

fn open_in_browser(tui_app: &mut TuiApp, ctx: &AppContext, target: &LinkTarget) {
    let url = ctx.renderer.links().resolve(target);
    match open::that(&url) {
        Ok(()) => tui_app.set_status(format!("Opened {}", url)),
        Err(e) => tui_app.set_status(format!("Failed to open browser: {}", e)),
    }
}
