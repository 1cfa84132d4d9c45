use crate::api::{ApiClient, NotificationFeed};
use crate::config::NotifierConfig;
use crate::errors::AgriBidResult;
use crate::session::Session;
use crate::utils::task_tracker::TaskTracker;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

const POLLER_TASK: &str = "unread-poller";

/// Anything that can report the signed-in user's notification feed.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn notifications(&self, session: &Session) -> AgriBidResult<NotificationFeed>;
}

#[async_trait]
impl NotificationSource for ApiClient {
    async fn notifications(&self, session: &Session) -> AgriBidResult<NotificationFeed> {
        ApiClient::notifications(self, session).await
    }
}

/// Result of one unread check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreadStatus {
    /// The check failed; nothing is known.
    #[default]
    Unknown,
    AllRead,
    Unread(u64),
}

impl UnreadStatus {
    pub fn has_unread(self) -> bool {
        matches!(self, UnreadStatus::Unread(_))
    }
}

impl std::fmt::Display for UnreadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnreadStatus::Unknown => write!(f, "unknown (check failed)"),
            UnreadStatus::AllRead => write!(f, "no unread notifications"),
            UnreadStatus::Unread(1) => write!(f, "1 unread notification"),
            UnreadStatus::Unread(n) => write!(f, "{n} unread notifications"),
        }
    }
}

/// Ask the backend for the unread count, keeping failures distinguishable.
pub async fn probe_unread<S>(source: &S, session: &Session) -> UnreadStatus
where
    S: NotificationSource + ?Sized,
{
    match source.notifications(session).await {
        Ok(feed) if feed.unread_count > 0 => UnreadStatus::Unread(feed.unread_count),
        Ok(_) => UnreadStatus::AllRead,
        Err(e) => {
            warn!("unread check failed: {e}");
            UnreadStatus::Unknown
        }
    }
}

/// Whether the user has unread notifications.
///
/// Fails closed: any transport, status or decode failure reads as `false`.
pub async fn check_unread<S>(source: &S, session: &Session) -> bool
where
    S: NotificationSource + ?Sized,
{
    probe_unread(source, session).await.has_unread()
}

/// Polls the unread count on a fixed interval and publishes the latest
/// [`UnreadStatus`] to subscribers.
///
/// The poll task is owned by the poller: after [`stop`](Self::stop) returns no
/// further status is published.
pub struct UnreadPoller {
    source: Arc<dyn NotificationSource>,
    session: Session,
    interval_s: u64,
    enabled: bool,
    running: Arc<Mutex<bool>>,
    task_tracker: Arc<TaskTracker>,
    status_tx: watch::Sender<UnreadStatus>,
}

impl UnreadPoller {
    pub fn new(
        source: Arc<dyn NotificationSource>,
        session: Session,
        config: &NotifierConfig,
    ) -> Self {
        let (status_tx, _) = watch::channel(UnreadStatus::Unknown);
        Self {
            source,
            session,
            interval_s: config.interval_secs,
            enabled: config.enabled,
            running: Arc::new(Mutex::new(false)),
            task_tracker: Arc::new(TaskTracker::new()),
            status_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UnreadStatus> {
        self.status_tx.subscribe()
    }

    /// Most recently published status.
    pub fn current(&self) -> UnreadStatus {
        *self.status_tx.borrow()
    }

    /// Whether a poll task is registered and has not been told to stop.
    pub async fn is_running(&self) -> bool {
        *self.running.lock().await && self.task_tracker.is_tracked(POLLER_TASK).await
    }

    pub async fn start(&self) {
        if !self.enabled {
            debug!("unread poller disabled");
            return;
        }

        *self.running.lock().await = true;
        let running = self.running.clone();
        let interval = self.interval_s.max(1);
        let source = self.source.clone();
        let session = self.session.clone();
        let status_tx = self.status_tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tokio::time::Duration::from_secs(interval));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                // First tick fires immediately so the badge is filled on start
                ticker.tick().await;
                if !*running.lock().await {
                    break;
                }

                let status = probe_unread(source.as_ref(), &session).await;
                // Hold the running lock across the send: once stop() returns
                // nothing more is published.
                let still_running = running.lock().await;
                if !*still_running {
                    debug!("unread poller stopped during poll, dropping result");
                    break;
                }
                let changed = status_tx.send_if_modified(|current| {
                    if *current == status {
                        false
                    } else {
                        *current = status;
                        true
                    }
                });
                drop(still_running);
                if changed {
                    debug!("unread status now {status}");
                }
            }
        });

        self.task_tracker
            .spawn(POLLER_TASK.to_string(), handle)
            .await;
        info!("Unread poller started (every {}s)", interval);
    }

    pub async fn stop(&self) {
        *self.running.lock().await = false;
        self.task_tracker.cancel_all().await;
    }
}
