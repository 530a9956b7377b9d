use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::session::Session;

/// One session behind its own lock. Holding the lock for a whole turn keeps
/// operations within a session strictly sequential.
pub type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_touched: Instant,
}

impl Entry {
    /// A session whose lock is held is mid-operation and never evicted.
    fn is_busy(&self) -> bool {
        self.session.try_lock().is_err()
    }
}

/// Process-wide registry of live sessions.
///
/// Bounded two ways: sessions untouched for `idle_ttl` are dropped by
/// `evict_idle`, and inserting past `max_sessions` first drops the least
/// recently touched idle session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    /// Initializes the session with defaults if and only if it is absent.
    /// The returned flag is `true` when a new session was created.
    pub async fn init(&self, id: Uuid) -> (SharedSession, bool) {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        if let Some(existing) = sessions.get_mut(&id) {
            existing.last_touched = now;
            return (existing.session.clone(), false);
        }

        if sessions.len() >= self.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let session = Arc::new(Mutex::new(Session::new()));
        sessions.insert(
            id,
            Entry {
                session: session.clone(),
                last_touched: now,
            },
        );
        info!("Initialized session {id} ({} live)", sessions.len());
        (session, true)
    }

    pub async fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let (session, _) = self.init(id).await;
        (id, session)
    }

    /// Looks the session up and marks it as touched.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = Instant::now();
        Some(entry.session.clone())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every idle session untouched for longer than `idle_ttl`.
    /// Returns how many were removed.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.is_busy() || now.duration_since(entry.last_touched) < self.idle_ttl
        });
        let removed = before - sessions.len();
        if removed > 0 {
            info!("Evicted {removed} idle sessions ({} live)", sessions.len());
        }
        removed
    }

    /// Runs `evict_idle` every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                store.evict_idle().await;
            }
        })
    }
}

fn evict_least_recent(sessions: &mut HashMap<Uuid, Entry>) {
    let oldest = sessions
        .iter()
        .filter(|(_, entry)| !entry.is_busy())
        .min_by_key(|(_, entry)| entry.last_touched)
        .map(|(id, _)| *id);

    match oldest {
        Some(id) => {
            sessions.remove(&id);
            info!("Session limit reached; evicted least recently used session {id}");
        }
        None => warn!("Session limit reached but every session is busy"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::Message;

    const HOUR: Duration = Duration::from_secs(3600);

    fn store() -> SessionStore {
        SessionStore::new(100, HOUR)
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = store();
        let id = Uuid::new_v4();

        let (first, created) = store.init(id).await;
        assert!(created);
        first.lock().await.messages.push(Message::user("Ada"));
        let before = first.lock().await.clone();

        let (second, created_again) = store.init(id).await;
        assert!(!created_again);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second.lock().await, before);
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store();
        let (id, session) = store.create().await;
        let fetched = store.get(id).await.expect("session");
        assert!(Arc::ptr_eq(&session, &fetched));
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = store();
        let (_, a) = store.create().await;
        let (_, b) = store.create().await;
        a.lock().await.messages.push(Message::user("only in a"));
        assert_eq!(b.lock().await.messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let store = store();
        let (stale, _) = store.create().await;
        let (fresh, _) = store.create().await;

        tokio::time::advance(Duration::from_secs(40 * 60)).await;
        store.get(fresh).await.expect("fresh");
        tokio::time::advance(Duration::from_secs(30 * 60)).await;

        assert_eq!(store.evict_idle().await, 1);
        assert!(store.get(stale).await.is_none());
        assert!(store.get(fresh).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_session_survives_expiry() {
        let store = store();
        let (id, session) = store.create().await;
        let turn = session.lock().await;

        tokio::time::advance(HOUR * 2).await;

        assert_eq!(store.evict_idle().await, 0);
        assert_eq!(store.len().await, 1);
        drop(turn);
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_evicts_least_recently_touched() {
        let store = SessionStore::new(2, HOUR);
        let (first, _) = store.create().await;
        tokio::time::advance(Duration::from_secs(1)).await;
        let (second, _) = store.create().await;
        tokio::time::advance(Duration::from_secs(1)).await;
        store.get(first).await.expect("first");
        tokio::time::advance(Duration::from_secs(1)).await;

        let (third, _) = store.create().await;

        assert_eq!(store.len().await, 2);
        assert!(store.get(second).await.is_none());
        assert!(store.get(first).await.is_some());
        assert!(store.get(third).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_periodically() {
        let store = SessionStore::new(100, Duration::from_secs(60));
        let (id, _) = store.create().await;
        let sweeper = store.spawn_sweeper(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(95)).await;

        assert!(store.get(id).await.is_none());
        sweeper.abort();
    }
}
