use std::thread::JoinHandle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::create_channel;
use super::job::JobHandle;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractor::ExtractedProfile;
use crate::llm::LanguageModel;
use crate::pipeline::ProfileScraper;
use crate::search::{SearchQuery, SearchReport};
use crate::session::SessionStore;

const WORKER_THREAD_NAME: &str = "profile-scraper-worker";

type Reply<T> = oneshot::Sender<ScrapeResult<T>>;

enum Job {
    ScrapeSingle {
        url: String,
        reply: Reply<ExtractedProfile>,
    },
    Search {
        query: SearchQuery,
        max_profiles: Option<usize>,
        reply: Reply<SearchReport>,
    },
    ExtractCached {
        reply: Reply<Option<ExtractedProfile>>,
    },
}

/// Runs a [`ProfileScraper`] on a dedicated OS thread with its own
/// single-threaded tokio runtime.
///
/// Jobs are executed one at a time in submission order. Callers never block
/// their own executor: every method returns a [`JobHandle`] immediately.
pub struct ScraperWorker {
    sender: UnboundedSender<Job>,
    thread: JoinHandle<()>,
}

impl ScraperWorker {
    pub fn spawn<M, S>(scraper: ProfileScraper<M, S>) -> ScrapeResult<Self>
    where
        M: LanguageModel + Send + 'static,
        S: SessionStore + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (sender, receiver) = create_channel();

        let thread = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || runtime.block_on(run_jobs(scraper, receiver)))?;

        info!("Scraper worker started");
        Ok(Self { sender, thread })
    }

    pub fn scrape_single(&self, url: impl Into<String>) -> JobHandle<ExtractedProfile> {
        let (reply, rx) = oneshot::channel();
        self.submit(Job::ScrapeSingle {
            url: url.into(),
            reply,
        });
        JobHandle::new(rx)
    }

    pub fn search(&self, query: SearchQuery, max_profiles: Option<usize>) -> JobHandle<SearchReport> {
        let (reply, rx) = oneshot::channel();
        self.submit(Job::Search {
            query,
            max_profiles,
            reply,
        });
        JobHandle::new(rx)
    }

    pub fn extract_cached(&self) -> JobHandle<Option<ExtractedProfile>> {
        let (reply, rx) = oneshot::channel();
        self.submit(Job::ExtractCached { reply });
        JobHandle::new(rx)
    }

    /// Stop accepting jobs, let queued ones finish, and join the thread.
    pub fn shutdown(self) -> ScrapeResult<()> {
        let Self { sender, thread } = self;
        drop(sender);
        thread
            .join()
            .map_err(|_| ScrapeError::Other("scraper worker thread panicked".to_string()))
    }

    fn submit(&self, job: Job) {
        // On failure the job, and with it the reply sender, is dropped, so
        // the handle resolves to Cancelled.
        if self.sender.send(job).is_err() {
            warn!("Scraper worker is gone, job cancelled");
        }
    }
}

async fn run_jobs<M, S>(scraper: ProfileScraper<M, S>, mut receiver: UnboundedReceiver<Job>)
where
    M: LanguageModel,
    S: SessionStore,
{
    while let Some(job) = receiver.recv().await {
        match job {
            Job::ScrapeSingle { url, reply } => {
                debug!("Worker: scrape_single {url}");
                let _ = reply.send(scraper.scrape_single(&url).await);
            }
            Job::Search {
                query,
                max_profiles,
                reply,
            } => {
                debug!("Worker: search {:?}", query);
                let _ = reply.send(scraper.search(&query, max_profiles).await);
            }
            Job::ExtractCached { reply } => {
                debug!("Worker: extract_cached");
                let _ = reply.send(scraper.extract_cached().await);
            }
        }
    }
    info!("Scraper worker stopped");
}
