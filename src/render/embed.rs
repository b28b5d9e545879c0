//! Scoped loading of third-party embed resources.
//!
//! Every script or frame in an article view gets an [`EmbedSlot`]. The slot
//! owns the load task and, for scripts, a [`ScriptGuard`] that keeps the
//! script registered in the [`ScriptRegistry`]. Dropping the slot aborts the
//! task and unregisters the script, so tearing down an [`EmbedSession`]
//! leaves nothing behind for the next view.
//!
//! Load results travel back to the UI loop as [`LoadOutcome`]s over an
//! unbounded channel. Each outcome carries the generation of the session
//! that started it; a session ignores outcomes from earlier generations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{Article, ContentBlock, EmbedKind};

pub const TWITTER_WIDGET_URL: &str = "https://platform.twitter.com/widgets.js";

/// A resource an embed needs before it can be shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmbedResource {
    Script(String),
    InlineScript(String),
    Frame(String),
    Widget(String),
}

impl EmbedResource {
    /// The URL to download, if the resource lives somewhere else.
    pub fn remote_url(&self) -> Option<&str> {
        match self {
            EmbedResource::Script(url) | EmbedResource::Frame(url) | EmbedResource::Widget(url) => {
                Some(url)
            }
            EmbedResource::InlineScript(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            EmbedResource::Script(s)
            | EmbedResource::InlineScript(s)
            | EmbedResource::Frame(s)
            | EmbedResource::Widget(s) => s.trim().is_empty(),
        }
    }

    fn is_script(&self) -> bool {
        !matches!(self, EmbedResource::Frame(_))
    }

    /// Script embeds that pull in the shared Twitter widget themselves.
    fn mentions_twitter(&self) -> bool {
        matches!(self, EmbedResource::Script(src) if src.to_lowercase().contains("twitter"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to load resource: {0}")]
    Fetch(String),
    #[error("failed to execute script: {0}")]
    Execute(String),
}

#[async_trait]
pub trait ResourceLoader: Send + Sync {
    async fn load(&self, resource: &EmbedResource) -> Result<(), LoadError>;
}

/// Scripts currently injected by open article views.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    scripts: Arc<Mutex<HashMap<u64, EmbedResource>>>,
    next_id: Arc<AtomicU64>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script. It stays registered until the guard is dropped.
    pub fn inject(&self, resource: EmbedResource) -> ScriptGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Injecting script #{}: {:?}", id, resource);
        self.lock().insert(id, resource);
        ScriptGuard {
            id,
            registry: self.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, resource: &EmbedResource) -> bool {
        self.lock().values().any(|r| r == resource)
    }

    fn release(&self, id: u64) {
        if self.lock().remove(&id).is_some() {
            tracing::trace!("Released script #{}", id);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, EmbedResource>> {
        self.scripts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Keeps one script registered. Unregisters it on drop.
#[derive(Debug)]
pub struct ScriptGuard {
    id: u64,
    registry: ScriptRegistry,
}

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// "Already requested" flag for a shared widget script.
#[derive(Debug, Default)]
pub struct WidgetLoader {
    requested: AtomicBool,
}

static TWITTER_WIDGET: LazyLock<Arc<WidgetLoader>> =
    LazyLock::new(|| Arc::new(WidgetLoader::new()));

impl WidgetLoader {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// The process-wide loader for the Twitter widget.
    pub fn twitter() -> Arc<WidgetLoader> {
        TWITTER_WIDGET.clone()
    }

    /// Returns `true` for the first caller only.
    pub fn request(&self) -> bool {
        self.requested
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

/// Position of a block inside an article: `(section, block)`.
pub type BlockKey = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedFailure {
    /// A frame could not be loaded. Offers a link to the source instead.
    Frame { src: String },
    ScriptLoad,
    ScriptExecute,
}

impl EmbedFailure {
    pub fn message(&self) -> &'static str {
        match self {
            EmbedFailure::Frame { .. } => "Không thể tải nội dung nhúng",
            EmbedFailure::ScriptLoad => "Không thể tải script nhúng",
            EmbedFailure::ScriptExecute => "Không thể thực thi script nhúng",
        }
    }

    fn from_error(resource: &EmbedResource, error: &LoadError) -> Self {
        match (resource, error) {
            (EmbedResource::Frame(src), _) => EmbedFailure::Frame { src: src.clone() },
            (_, LoadError::Fetch(_)) => EmbedFailure::ScriptLoad,
            (_, LoadError::Execute(_)) => EmbedFailure::ScriptExecute,
        }
    }
}

pub const LOADING_TEXT: &str = "Đang tải...";
pub const VIEW_SOURCE_TEXT: &str = "Xem tại đây";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Terminal. Failed embeds are never retried.
    Failed(EmbedFailure),
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub key: BlockKey,
    pub result: Result<(), LoadError>,
}

/// One embed's load, tied to the lifetime of its article view.
#[derive(Debug)]
pub struct EmbedSlot {
    resource: EmbedResource,
    state: LoadState,
    guard: Option<ScriptGuard>,
    task: Option<JoinHandle<()>>,
}

impl EmbedSlot {
    pub fn resource(&self) -> &EmbedResource {
        &self.resource
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether the slot still keeps a script registered.
    pub fn holds_script(&self) -> bool {
        self.guard.is_some()
    }

    fn finish(&mut self, result: Result<(), LoadError>) {
        self.task = None;
        self.state = match result {
            Ok(()) => LoadState::Ready,
            Err(e) => {
                tracing::warn!("Embed {:?} failed: {}", self.resource, e);
                // A script that failed is not kept around.
                self.guard = None;
                LoadState::Failed(EmbedFailure::from_error(&self.resource, &e))
            }
        };
    }
}

impl Drop for EmbedSlot {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// All embed loads belonging to one open article.
#[derive(Debug)]
pub struct EmbedSession {
    generation: u64,
    slots: HashMap<BlockKey, EmbedSlot>,
}

impl EmbedSession {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn slot(&self, key: BlockKey) -> Option<&EmbedSlot> {
        self.slots.get(&key)
    }

    pub fn state(&self, key: BlockKey) -> Option<&LoadState> {
        self.slots.get(&key).map(EmbedSlot::state)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|s| s.state == LoadState::Loading)
            .count()
    }

    /// Record a finished load. Returns `false` for outcomes that belong to
    /// another session.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::trace!(
                "Ignoring outcome from view {} in view {}",
                outcome.generation,
                self.generation
            );
            return false;
        }
        match self.slots.get_mut(&outcome.key) {
            Some(slot) => {
                slot.finish(outcome.result);
                true
            }
            None => false,
        }
    }
}

/// Starts embed loads for article views.
pub struct EmbedResolver {
    loader: Arc<dyn ResourceLoader>,
    registry: ScriptRegistry,
    widget: Arc<WidgetLoader>,
    outcomes: mpsc::UnboundedSender<LoadOutcome>,
    generation: AtomicU64,
}

impl EmbedResolver {
    pub fn new(
        loader: Arc<dyn ResourceLoader>,
        registry: ScriptRegistry,
        widget: Arc<WidgetLoader>,
    ) -> (Self, mpsc::UnboundedReceiver<LoadOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        let resolver = Self {
            loader,
            registry,
            widget,
            outcomes,
            generation: AtomicU64::new(0),
        };
        (resolver, rx)
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// Start loading every embed in `article`. Must be called inside a
    /// tokio runtime.
    pub fn open_session(&self, article: &Article) -> EmbedSession {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slots = HashMap::new();

        for (s, section) in article.content_sections.iter().enumerate() {
            for (b, block) in section.blocks.iter().enumerate() {
                let Some(resource) = resource_for(block) else {
                    if matches!(block, ContentBlock::Embed { kind: EmbedKind::Tweet, .. }) {
                        self.request_widget();
                    }
                    continue;
                };
                if resource.mentions_twitter() {
                    self.request_widget();
                }
                slots.insert((s, b), self.start(generation, (s, b), resource));
            }
        }

        tracing::debug!(
            "Opened embed session {} for article {} ({} embeds)",
            generation,
            article.id,
            slots.len()
        );
        EmbedSession { generation, slots }
    }

    fn start(&self, generation: u64, key: BlockKey, resource: EmbedResource) -> EmbedSlot {
        let guard = resource
            .is_script()
            .then(|| self.registry.inject(resource.clone()));

        let loader = self.loader.clone();
        let outcomes = self.outcomes.clone();
        let task_resource = resource.clone();
        let task = tokio::spawn(async move {
            let result = loader.load(&task_resource).await;
            // The receiver is gone only when the UI has shut down.
            let _ = outcomes.send(LoadOutcome {
                generation,
                key,
                result,
            });
        });

        EmbedSlot {
            resource,
            state: LoadState::Loading,
            guard,
            task: Some(task),
        }
    }

    /// Load the shared widget script, at most once per process.
    fn request_widget(&self) {
        if !self.widget.request() {
            return;
        }
        tracing::info!("Loading shared widget {}", TWITTER_WIDGET_URL);
        let loader = self.loader.clone();
        tokio::spawn(async move {
            let widget = EmbedResource::Widget(TWITTER_WIDGET_URL.to_string());
            if let Err(e) = loader.load(&widget).await {
                tracing::warn!("Shared widget failed to load: {}", e);
            }
        });
    }
}

fn resource_for(block: &ContentBlock) -> Option<EmbedResource> {
    match block {
        ContentBlock::Embed { kind, payload, .. } => match kind {
            EmbedKind::Iframe => Some(EmbedResource::Frame(payload.clone())),
            EmbedKind::ScriptSrc => Some(EmbedResource::Script(payload.clone())),
            EmbedKind::ScriptInline => Some(EmbedResource::InlineScript(payload.clone())),
            EmbedKind::Tweet | EmbedKind::Quote => None,
        },
        ContentBlock::Paragraph { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArticleContentSection;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Loader that fails any URL containing "broken" and can be held open.
    #[derive(Default)]
    struct FakeLoader {
        calls: Mutex<Vec<EmbedResource>>,
        gate: Option<Arc<Notify>>,
        widget_loads: AtomicUsize,
    }

    #[async_trait]
    impl ResourceLoader for FakeLoader {
        async fn load(&self, resource: &EmbedResource) -> Result<(), LoadError> {
            self.calls.lock().unwrap().push(resource.clone());
            if let EmbedResource::Widget(_) = resource {
                self.widget_loads.fetch_add(1, Ordering::SeqCst);
            }
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match resource {
                EmbedResource::InlineScript(body) if body.contains("throw") => {
                    Err(LoadError::Execute("boom".into()))
                }
                other if other.remote_url().is_some_and(|u| u.contains("broken")) => {
                    Err(LoadError::Fetch("404".into()))
                }
                _ => Ok(()),
            }
        }
    }

    fn article(blocks: Vec<ContentBlock>) -> Article {
        Article {
            id: "1".into(),
            title: "t".into(),
            subtitle: "s".into(),
            category: "c".into(),
            hero_image: String::new(),
            content_sections: vec![ArticleContentSection {
                title: None,
                blocks,
            }],
            images: Vec::new(),
            publish_time: String::new(),
        }
    }

    fn setup(
        loader: Arc<FakeLoader>,
    ) -> (
        EmbedResolver,
        mpsc::UnboundedReceiver<LoadOutcome>,
        Arc<WidgetLoader>,
    ) {
        let widget = Arc::new(WidgetLoader::new());
        let (resolver, rx) = EmbedResolver::new(loader, ScriptRegistry::new(), widget.clone());
        (resolver, rx, widget)
    }

    async fn drain(session: &mut EmbedSession, rx: &mut mpsc::UnboundedReceiver<LoadOutcome>) {
        while session.pending() > 0 {
            let outcome = rx.recv().await.unwrap();
            session.apply(outcome);
        }
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let registry = ScriptRegistry::new();
        let script = EmbedResource::Script("https://a/b.js".into());
        let guard = registry.inject(script.clone());
        assert!(registry.contains(&script));
        drop(guard);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_widget_requested_once() {
        let widget = WidgetLoader::new();
        assert!(widget.request());
        assert!(!widget.request());
        assert!(widget.is_requested());
    }

    #[tokio::test]
    async fn test_outcomes_update_states() {
        let loader = Arc::new(FakeLoader::default());
        let (resolver, mut rx, _) = setup(loader);
        let mut session = resolver.open_session(&article(vec![
            ContentBlock::iframe("https://ok.example/v", "100%", "400"),
            ContentBlock::iframe("https://broken.example/v", "100%", "400"),
            ContentBlock::embed(EmbedKind::ScriptSrc, "https://broken.example/s.js"),
            ContentBlock::embed(EmbedKind::ScriptInline, "throw new Error()"),
            ContentBlock::embed(EmbedKind::Quote, "không tải gì"),
        ]));
        assert_eq!(session.len(), 4);
        assert_eq!(session.state((0, 0)), Some(&LoadState::Loading));
        assert_eq!(session.state((0, 4)), None);

        drain(&mut session, &mut rx).await;

        assert_eq!(session.state((0, 0)), Some(&LoadState::Ready));
        assert_eq!(
            session.state((0, 1)),
            Some(&LoadState::Failed(EmbedFailure::Frame {
                src: "https://broken.example/v".into()
            }))
        );
        assert_eq!(
            session.state((0, 2)),
            Some(&LoadState::Failed(EmbedFailure::ScriptLoad))
        );
        assert_eq!(
            session.state((0, 3)),
            Some(&LoadState::Failed(EmbedFailure::ScriptExecute))
        );
        // Failed scripts are unregistered straight away.
        assert!(!session.slot((0, 2)).unwrap().holds_script());
        assert!(resolver.registry().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_releases_scripts_and_ignores_late_outcomes() {
        let gate = Arc::new(Notify::new());
        let loader = Arc::new(FakeLoader {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let (resolver, mut rx, _) = setup(loader);
        let blocks = vec![ContentBlock::embed(EmbedKind::ScriptSrc, "https://a/b.js")];

        let first = resolver.open_session(&article(blocks.clone()));
        assert_eq!(resolver.registry().len(), 1);
        drop(first);
        assert!(resolver.registry().is_empty());

        let mut second = resolver.open_session(&article(blocks));
        assert_eq!(second.generation(), 2);
        let stale = LoadOutcome {
            generation: 1,
            key: (0, 0),
            result: Ok(()),
        };
        assert!(!second.apply(stale));
        assert_eq!(second.state((0, 0)), Some(&LoadState::Loading));

        gate.notify_one();
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.generation, 2);
        assert!(second.apply(outcome));
        assert_eq!(second.state((0, 0)), Some(&LoadState::Ready));
        assert!(second.slot((0, 0)).unwrap().holds_script());
        assert_eq!(resolver.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_tweets_share_one_widget_load() {
        let loader = Arc::new(FakeLoader::default());
        let (resolver, _rx, widget) = setup(loader.clone());
        let tweets = vec![
            ContentBlock::embed(EmbedKind::Tweet, "1"),
            ContentBlock::embed(EmbedKind::Tweet, "2"),
        ];

        let first = resolver.open_session(&article(tweets.clone()));
        let _second = resolver.open_session(&article(tweets));
        assert!(first.is_empty());
        assert!(widget.is_requested());

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(loader.widget_loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_twitter_script_triggers_widget() {
        let loader = Arc::new(FakeLoader::default());
        let (resolver, _rx, widget) = setup(loader);
        let _session = resolver.open_session(&article(vec![ContentBlock::embed(
            EmbedKind::ScriptSrc,
            "https://platform.twitter.com/widgets.js",
        )]));
        assert!(widget.is_requested());
    }
}
