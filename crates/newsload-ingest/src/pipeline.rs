use tracing::{Span, info, instrument, warn};

use crate::errors::{FetchError, LoadError};
use crate::fetcher::ArticleFeed;
use crate::loader::{LoadReport, Loader};

/// How a run ended when it did not fail while loading.
#[derive(Debug)]
pub enum PipelineOutcome {
    Loaded(LoadReport),
    /// The feed answered with no articles.
    NothingToLoad,
    /// The feed could not be read. The loader was not invoked.
    FetchFailed(FetchError),
}

/// Runs fetch then load once.
///
/// Fetch failures are fail-open: they are logged and reported as
/// [`PipelineOutcome::FetchFailed`] instead of an error. Load failures are
/// returned as errors. The synchronous load runs on tokio's blocking pool,
/// so this must be awaited inside a tokio runtime.
#[instrument(skip_all)]
pub async fn run<F>(feed: &F, loader: &Loader) -> Result<PipelineOutcome, LoadError>
where
    F: ArticleFeed + ?Sized,
{
    let articles = match feed.fetch().await {
        Ok(articles) => articles,
        Err(err) => {
            warn!(error = %err, "Failed to fetch NewsAPI data, nothing will be loaded");
            return Ok(PipelineOutcome::FetchFailed(err));
        }
    };

    if articles.is_empty() {
        info!("No articles to write");
        return Ok(PipelineOutcome::NothingToLoad);
    }

    // diesel connections block, so the load runs on the blocking pool
    let loader = loader.clone();
    let span = Span::current();
    let report = tokio::task::spawn_blocking(move || span.in_scope(|| loader.load(&articles)))
        .await??;
    Ok(PipelineOutcome::Loaded(report))
}
