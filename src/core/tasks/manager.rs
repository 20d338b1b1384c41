use std::{
    future::Future,
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use super::{
    Services,
    TaskResult,
};
use crate::{
    controller::{
        load_page,
        PageRequest,
    },
    core::{
        models::RatingSubmission,
        FloraError,
    },
};

pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    services: Arc<Services>,
    cancel: CancellationToken,
}

impl TaskManager {
    pub fn new(services: Services) -> Result<Self, FloraError> {
        let runtime = Arc::new(Runtime::new()?);

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender, services: Arc::new(services), cancel: CancellationToken::new() })
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Cancels everything in flight. Nothing is posted after this returns.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("Cancelling outstanding tasks");
            self.cancel.cancel();
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn run<W, F>(&self, name: &'static str, work: W)
    where
        W: FnOnce(Arc<Services>) -> F + Send + 'static,
        F: Future<Output = TaskResult>,
    {
        let sender = self.sender.clone();
        let runtime = self.runtime.clone();
        let services = self.services.clone();
        let cancel = self.cancel.clone();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = work(services) => Some(result),
                }
            });

            match result {
                Some(result) if !cancel.is_cancelled() => {
                    let _ = sender.send(result);
                }
                _ => tracing::debug!(task = name, "Task cancelled, result discarded"),
            }
        });
    }

    pub fn load_stages(&self) {
        self.run("stages", |services| async move {
            let result = services.backend.stages().await.map_err(|e| {
                tracing::error!("Error fetching stages: {}", e);
                e.user_message()
            });
            TaskResult::StagesLoaded(result)
        });
    }

    pub fn load_page(&self, request: PageRequest) {
        self.run("page", move |services| async move {
            TaskResult::PageLoaded(load_page(&services.backend, &services.enricher, &request).await)
        });
    }

    pub fn submit_rating(&self, organism_id: u64, submission: RatingSubmission) {
        self.run("rating_submit", move |services| async move {
            let result =
                services.backend.submit_rating(organism_id, &submission).await.map_err(|e| e.user_message());
            TaskResult::RatingSubmitted(result)
        });
    }

    pub fn load_reviews(&self, organism_id: u64, organism_name: String) {
        self.run("reviews", move |services| async move {
            let result = services.backend.reviews(organism_id).await.map_err(|e| {
                tracing::error!(organism_id, "Error fetching reviews: {}", e);
                e.user_message()
            });
            TaskResult::ReviewsLoaded { organism_name, result }
        });
    }

    pub fn load_structure(&self, file_name: String) {
        self.run("structure", move |services| async move {
            let result = services.fetch_structure(&file_name).await.map_err(|e| {
                tracing::warn!(file = %file_name, "Structure unavailable: {}", e);
                e.user_message()
            });
            TaskResult::StructureLoaded { file_name, result }
        });
    }

    pub fn sweep_cache(&self) {
        self.run("cache_sweep", |services| async move { TaskResult::CacheSwept(services.cache.sweep()) });
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{
        Duration,
        Instant,
    };

    use super::*;
    use crate::{
        core::settings::AppSettings,
        persistence::{
            KeyValueStore,
            MemoryStore,
        },
    };

    fn manager(store: Arc<MemoryStore>) -> TaskManager {
        let settings = AppSettings {
            api_url: "http://127.0.0.1:9".to_string(),
            gbif_url: "http://127.0.0.1:9".to_string(),
            asset_url: "http://127.0.0.1:9".to_string(),
            ..AppSettings::default()
        };
        TaskManager::new(Services::new(&settings, store).unwrap()).unwrap()
    }

    fn wait_for(manager: &mut TaskManager) -> Option<TaskResult> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(result) = manager.poll_results().into_iter().next() {
                return Some(result);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn sweep_reports_removed_entries() {
        let store = Arc::new(MemoryStore::new());
        store.set("gbif_images_broken", "not json".to_string()).unwrap();
        store.set("settings", "kept".to_string()).unwrap();
        let mut manager = manager(store.clone());

        manager.sweep_cache();

        match wait_for(&mut manager) {
            Some(TaskResult::CacheSwept(removed)) => assert_eq!(removed, 1),
            other => panic!("unexpected result: {:?}", other.map(|r| r.task_type())),
        }
        assert_eq!(store.keys(), vec!["settings".to_string()]);
    }

    #[test]
    fn unreachable_backend_reports_error() {
        let mut manager = manager(Arc::new(MemoryStore::new()));
        manager.load_stages();

        match wait_for(&mut manager) {
            Some(TaskResult::StagesLoaded(Err(message))) => assert!(!message.is_empty()),
            other => panic!("unexpected result: {:?}", other.map(|r| r.task_type())),
        }
    }

    #[test]
    fn nothing_is_posted_after_shutdown() {
        let mut manager = manager(Arc::new(MemoryStore::new()));
        manager.shutdown();
        assert!(manager.is_shut_down());

        manager.sweep_cache();
        manager.load_stages();

        thread::sleep(Duration::from_millis(200));
        assert!(manager.poll_results().is_empty());
    }
}
