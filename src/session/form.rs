use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt as _;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::consumer::StreamConsumer;
use crate::protocol::types::StrategyRequest;
use crate::session::state::ResultState;

/// What the form shows: the latest result and whether a submission is still
/// in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub result: Option<ResultState>,
    pub loading: bool,
}

/// One form instance. At most one submission is observable at a time.
///
/// A new submission aborts the previous consumption task, which drops its
/// response stream. Snapshots are stamped with a generation and only
/// published while that generation is current, so a task that loses the
/// race with `submit` cannot overwrite the newer view.
pub struct FormSession {
    consumer: StreamConsumer,
    generation: Arc<AtomicU64>,
    view: Arc<watch::Sender<FormView>>,
    task: Option<JoinHandle<()>>,
}

impl FormSession {
    pub fn new(consumer: StreamConsumer) -> Self {
        let (view, _) = watch::channel(FormView::default());
        Self {
            consumer,
            generation: Arc::new(AtomicU64::new(0)),
            view: Arc::new(view),
            task: None,
        }
    }

    /// Receiver for view updates. Subscribe before submitting so the first
    /// update is not missed.
    pub fn subscribe(&self) -> watch::Receiver<FormView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> FormView {
        self.view.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.view.borrow().loading
    }

    /// Start a submission, superseding any in-flight one. Returns its
    /// generation.
    pub fn submit(&mut self, request: StrategyRequest) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = self.task.take() {
            debug!(generation, "superseding in-flight submission");
            task.abort();
        }
        self.view.send_replace(FormView {
            result: None,
            loading: true,
        });

        let mut stream = self.consumer.submit(request);
        let view = Arc::clone(&self.view);
        let current = Arc::clone(&self.generation);
        self.task = Some(tokio::spawn(async move {
            while let Some(state) = stream.next().await {
                let published = view.send_if_modified(|v| {
                    if current.load(Ordering::SeqCst) != generation {
                        return false;
                    }
                    v.result = Some(state);
                    true
                });
                if !published {
                    debug!(generation, "dropping stale snapshot");
                    return;
                }
            }
            view.send_if_modified(|v| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                v.loading = false;
                true
            });
        }));
        generation
    }

    /// Abandon the in-flight submission, keeping whatever was last shown.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.view.send_if_modified(|v| std::mem::replace(&mut v.loading, false));
    }

    /// Wait for the current submission to finish and return the final view.
    pub async fn finished(&mut self) -> FormView {
        if let Some(task) = self.task.take() {
            // An aborted task is a superseded one; its view is already stale.
            let _ = task.await;
        }
        self.view()
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
