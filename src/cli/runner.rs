//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, PagingArgs, SliceArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::fetch::StaticPages;
use crate::http::{Filters, HttpClient, JsonApiFetcher};
use crate::pagination::{AsyncLazyPagedList, LazyPagedList, ListOptions, SliceRange};
use futures::TryStreamExt;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Ping => self.ping().await,
            Commands::List {
                endpoint,
                paging,
                window,
            } => self.list(endpoint, paging, *window).await,
            Commands::Count { endpoint, paging } => self.count(endpoint, paging).await,
            Commands::Demo {
                total,
                limit,
                page_size,
                max_page_len,
                window,
            } => self.demo(*total, *limit, *page_size, *max_page_len, *window),
        }
    }

    /// Settings file, then command line overrides, then environment token
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(base_url) = &self.cli.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(token) = &self.cli.token {
            settings.token = Some(token.clone());
        }
        let settings = settings.with_env_token();
        settings.validate()?;
        Ok(settings)
    }

    fn client(settings: &Settings) -> Result<Arc<HttpClient>> {
        if settings.token.is_none() {
            warn!("No access token configured, requests will likely be rejected");
        }
        Ok(Arc::new(HttpClient::with_config(settings.http_config())?))
    }

    fn list_options(settings: &Settings, paging: &PagingArgs) -> ListOptions {
        ListOptions {
            limit: paging.limit,
            page_size: paging.page_size,
            default_page_size: settings.page_size,
        }
    }

    /// Check the token
    async fn ping(&self) -> Result<()> {
        let settings = self.settings()?;
        let client = Self::client(&settings)?;

        let id = client.ping().await?;
        self.output_message(&json!({
            "type": "PING",
            "id": id,
            "rate_limit_remaining": client.rate_limit_remaining()
        }));
        Ok(())
    }

    /// Stream an endpoint, optionally through a slice
    async fn list(&self, endpoint: &str, paging: &PagingArgs, window: SliceArgs) -> Result<()> {
        let settings = self.settings()?;
        let client = Self::client(&settings)?;
        let fetcher = JsonApiFetcher::new(client, endpoint)
            .with_filters(paging.filters.iter().cloned().collect::<Filters>());
        let mut list =
            AsyncLazyPagedList::with_options(fetcher, Self::list_options(&settings, paging))?;

        let mut emitted = 0usize;
        if window.is_set() {
            if needs_known_len(window) {
                debug!("Slice counts from the end, fetching {} in full", endpoint);
                list.len().await?;
            }
            let mut view = list.slice(SliceRange::new(window.start, window.stop, window.step))?;
            let mut items = view.stream();
            while let Some(item) = items.try_next().await? {
                self.output_message(&item);
                emitted += 1;
            }
        } else {
            let mut items = list.stream();
            while let Some(item) = items.try_next().await? {
                self.output_message(&item);
                emitted += 1;
            }
        }

        info!(
            "Listed {} items from {} ({} pages fetched, {} buffered)",
            emitted,
            endpoint,
            list.fetch_count(),
            list.buffered()
        );
        Ok(())
    }

    /// Count the items of an endpoint
    async fn count(&self, endpoint: &str, paging: &PagingArgs) -> Result<()> {
        let settings = self.settings()?;
        let client = Self::client(&settings)?;
        let fetcher = JsonApiFetcher::new(client, endpoint)
            .with_filters(paging.filters.iter().cloned().collect::<Filters>());
        let mut list =
            AsyncLazyPagedList::with_options(fetcher, Self::list_options(&settings, paging))?;

        let count = list.len().await?;
        self.output_message(&json!({
            "type": "COUNT",
            "endpoint": endpoint,
            "count": count,
            "pages": list.fetch_count()
        }));
        Ok(())
    }

    /// Exercise the engine without a network
    fn demo(
        &self,
        total: usize,
        limit: Option<usize>,
        page_size: Option<usize>,
        max_page_len: Option<usize>,
        window: SliceArgs,
    ) -> Result<()> {
        let mut source = StaticPages::new((0..total).collect::<Vec<usize>>());
        if let Some(max) = max_page_len {
            source = source.with_max_page_len(max);
        }
        let options = ListOptions {
            limit,
            page_size,
            ..ListOptions::default()
        };
        let list = LazyPagedList::with_options(source, options)?;

        if window.is_set() && needs_known_len(window) {
            list.len()?;
        }
        let items: Vec<usize> = if window.is_set() {
            list.slice(SliceRange::new(window.start, window.stop, window.step))?
                .to_vec()?
        } else {
            list.to_vec()?
        };

        let sizes = list.fetcher().requested_sizes();
        info!("Requested page sizes: {:?}", sizes);
        self.output_message(&json!({
            "type": "DEMO",
            "items": items,
            "fetches": list.fetch_count(),
            "requested_sizes": sizes,
            "page_size": list.page_size(),
            "limit": list.limit()
        }));
        Ok(())
    }

    /// Write one document to stdout
    fn output_message<T: Serialize>(&self, msg: &T) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Whether a window can only be resolved against the final length
fn needs_known_len(window: SliceArgs) -> bool {
    window.start.is_some_and(|v| v < 0)
        || window.stop.is_some_and(|v| v < 0)
        || window.step.is_some_and(|v| v < 0)
}
