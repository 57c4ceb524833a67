use super::collab::{Profile, ResponseHandle};
use super::control::RecordAction;
use super::reply::OptionView;
use crate::model::{OwnerId, Season, SeasonRecord};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    SeasonList,
    SeasonDetail { season: usize },
    FloorDetail { season: usize, floor: usize },
}

impl SessionState {
    pub fn season(self) -> Option<usize> {
        match self {
            SessionState::SeasonDetail { season } | SessionState::FloorDetail { season, .. } => {
                Some(season)
            }
            SessionState::SeasonList => None,
        }
    }
}

/// Where the record(s) a session shows come from.
#[derive(Clone, Debug)]
pub enum Origin {
    /// Freshly fetched and not yet persisted.
    Live(Box<SeasonRecord>),
    /// Saved seasons in display order, with their pre-rendered list options.
    History {
        seasons: Vec<Season>,
        options: Vec<OptionView>,
    },
}

#[derive(Clone, Debug)]
pub struct NavigationSession {
    pub handle: ResponseHandle,
    pub requester: OwnerId,
    pub target: Profile,
    pub origin: Origin,
    pub state: SessionState,
    pub last_interaction: Instant,
}

impl NavigationSession {
    pub fn new(
        handle: ResponseHandle,
        requester: OwnerId,
        target: Profile,
        origin: Origin,
        state: SessionState,
    ) -> Self {
        Self {
            handle,
            requester,
            target,
            origin,
            state,
            last_interaction: Instant::now(),
        }
    }

    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_interaction) >= timeout
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_interaction = now;
    }

    /// The mutating action the floor picker offers for this session.
    pub fn action(&self) -> RecordAction {
        match self.origin {
            Origin::Live(_) => RecordAction::Save,
            Origin::History { .. } => RecordAction::Remove,
        }
    }

    /// Season id at a list position; a live session has exactly one.
    pub fn season_at(&self, index: usize) -> Option<Season> {
        match &self.origin {
            Origin::Live(record) => (index == 0).then_some(record.season),
            Origin::History { seasons, .. } => seasons.get(index).copied(),
        }
    }
}

/// A session shared between the map and the interaction currently working on it.
pub type SharedSession = Arc<Mutex<NavigationSession>>;

/// Sessions keyed by the response they belong to; idle entries expire lazily on access.
///
/// Map shard locks are only held to look an entry up. Work on a session happens under that
/// session's own mutex, so a slow interaction never stalls other sessions.
pub struct SessionMap {
    entries: DashMap<ResponseHandle, SharedSession>,
    idle_timeout: Duration,
    last_sweep: Mutex<Instant>,
}

impl SessionMap {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            idle_timeout,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&self, session: NavigationSession) {
        self.maybe_sweep(Instant::now());
        self.entries
            .insert(session.handle.clone(), Arc::new(Mutex::new(session)));
    }

    pub fn remove(&self, handle: &ResponseHandle) -> Option<SharedSession> {
        self.entries.remove(handle).map(|(_, session)| session)
    }

    /// Returns the live session for `handle`, refreshing its idle clock.
    ///
    /// An idle session is dropped and reported as `None`.
    pub fn checkout(&self, handle: &ResponseHandle) -> Option<SharedSession> {
        let now = Instant::now();
        self.maybe_sweep(now);
        let shared = self.entries.get(handle).map(|entry| Arc::clone(entry.value()))?;
        let mut session = shared.lock();
        if session.is_idle(now, self.idle_timeout) {
            drop(session);
            self.entries
                .remove_if(handle, |_, current| Arc::ptr_eq(current, &shared));
            return None;
        }
        session.touch(now);
        drop(session);
        Some(shared)
    }

    fn maybe_sweep(&self, now: Instant) {
        {
            let mut guard = self.last_sweep.lock();
            if now.saturating_duration_since(*guard) < self.idle_timeout {
                return;
            }
            *guard = now;
        }
        let timeout = self.idle_timeout;
        // A session locked by an in-flight interaction is in use, not idle.
        self.entries.retain(|_, shared| match shared.try_lock() {
            Some(session) => !session.is_idle(now, timeout),
            None => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn history_session() -> NavigationSession {
        NavigationSession::new(
            ResponseHandle::new(),
            OwnerId(1),
            Profile::new(OwnerId(1), "Traveler"),
            Origin::History {
                seasons: vec![Season(3), Season(4)],
                options: vec![],
            },
            SessionState::SeasonList,
        )
    }

    #[test]
    fn checkout_refreshes_idle_clock() {
        let map = SessionMap::new(Duration::from_millis(80));
        let session = history_session();
        let handle = session.handle.clone();
        map.insert(session);

        sleep(Duration::from_millis(50));
        assert!(map.checkout(&handle).is_some());
        sleep(Duration::from_millis(50));
        assert!(map.checkout(&handle).is_some());
        sleep(Duration::from_millis(120));
        assert!(map.checkout(&handle).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn unknown_handle_is_absent() {
        let map = SessionMap::new(Duration::from_secs(5));
        assert!(map.checkout(&ResponseHandle::new()).is_none());
    }

    #[test]
    fn sweep_keeps_sessions_that_are_in_use() {
        let map = SessionMap::new(Duration::from_millis(20));
        let session = history_session();
        let handle = session.handle.clone();
        map.insert(session);
        let shared = map.checkout(&handle).expect("active");
        let busy = shared.lock();
        sleep(Duration::from_millis(40));
        map.insert(history_session());
        assert_eq!(map.len(), 2);
        drop(busy);
    }

    #[test]
    fn sweep_drops_idle_sessions_on_insert() {
        let map = SessionMap::new(Duration::from_millis(20));
        map.insert(history_session());
        sleep(Duration::from_millis(40));
        map.insert(history_session());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn history_session_indexes_seasons() {
        let session = history_session();
        assert_eq!(session.action(), RecordAction::Remove);
        assert_eq!(session.season_at(1), Some(Season(4)));
        assert_eq!(session.season_at(2), None);
    }
}
