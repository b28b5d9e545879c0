use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::portal::Portal;
use crate::render::embed::{EmbedResolver, LoadOutcome, ResourceLoader, ScriptRegistry, WidgetLoader};
use crate::render::links::LinkClassifier;
use crate::render::Renderer;

pub struct AppContext {
    pub config: Config,
    pub portal: Arc<Portal>,
    pub renderer: Renderer,
    pub embeds: EmbedResolver,
}

impl AppContext {
    /// Build the context over HTTP. Embed load outcomes arrive on the
    /// returned receiver.
    pub fn new(config: Config) -> Result<(Self, mpsc::UnboundedReceiver<LoadOutcome>)> {
        let http = HttpFetcher::new(&config.api)?;
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(http.clone());
        let loader: Arc<dyn ResourceLoader> = Arc::new(http);
        Ok(Self::with_parts(config, fetcher, loader))
    }

    pub fn with_parts(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        loader: Arc<dyn ResourceLoader>,
    ) -> (Self, mpsc::UnboundedReceiver<LoadOutcome>) {
        let portal = Arc::new(Portal::new(
            fetcher,
            config.api.summary_url.clone(),
            config.home.clone(),
        ));
        let renderer = Renderer::new(LinkClassifier::new(&config.api.site_origin));
        let (embeds, outcomes) =
            EmbedResolver::new(loader, ScriptRegistry::new(), WidgetLoader::twitter());

        (
            Self {
                config,
                portal,
                renderer,
                embeds,
            },
            outcomes,
        )
    }
}
