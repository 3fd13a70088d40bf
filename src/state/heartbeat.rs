//! Liveness state updated by the heartbeat task.

use std::sync::Arc;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartbeatState {
    pub status: &'static str,
    pub count: u64,
    pub last_beat: Option<DateTime<Utc>>,
    pub start_time: DateTime<Utc>,
    /// Uptime as of the last beat.
    pub uptime_seconds: u64,
}

impl HeartbeatState {
    fn started(at: DateTime<Utc>) -> Self {
        Self {
            status: "healthy",
            count: 0,
            last_beat: None,
            start_time: at,
            uptime_seconds: 0,
        }
    }

    fn next_beat(&self, now: DateTime<Utc>) -> Self {
        Self {
            count: self.count + 1,
            last_beat: Some(now),
            uptime_seconds: (now - self.start_time).num_seconds().max(0) as u64,
            ..self.clone()
        }
    }
}

/// Shared heartbeat. Readers get immutable snapshots; writers swap in a
/// new one.
pub struct Heartbeat {
    state: ArcSwap<HeartbeatState>,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(at: DateTime<Utc>) -> Self {
        Self {
            state: ArcSwap::from_pointee(HeartbeatState::started(at)),
        }
    }

    /// Record a beat now.
    pub fn beat(&self) -> Arc<HeartbeatState> {
        self.beat_at(Utc::now())
    }

    pub fn beat_at(&self, now: DateTime<Utc>) -> Arc<HeartbeatState> {
        let mut updated = None;
        self.state.rcu(|current| {
            let next = Arc::new(current.next_beat(now));
            updated = Some(next.clone());
            next
        });
        updated.unwrap_or_else(|| self.state.load_full())
    }

    pub fn snapshot(&self) -> Arc<HeartbeatState> {
        self.state.load_full()
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_initial_state() {
        let heartbeat = Heartbeat::new();
        let state = heartbeat.snapshot();
        assert_eq!(state.count, 0);
        assert!(state.last_beat.is_none());
        assert_eq!(state.status, "healthy");
    }

    #[test]
    fn test_beat_updates_count_and_uptime() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let heartbeat = Heartbeat::started_at(start);

        let first = heartbeat.beat_at(start + Duration::seconds(30));
        assert_eq!(first.count, 1);
        assert_eq!(first.uptime_seconds, 30);

        let second = heartbeat.beat_at(start + Duration::seconds(60));
        assert_eq!(second.count, 2);
        assert_eq!(second.last_beat, Some(start + Duration::seconds(60)));
        assert_eq!(*heartbeat.snapshot(), *second);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_beats() {
        let heartbeat = Heartbeat::new();
        let before = heartbeat.snapshot();
        heartbeat.beat();
        assert_eq!(before.count, 0);
        assert_eq!(heartbeat.snapshot().count, 1);
    }

    #[test]
    fn test_concurrent_beats_are_not_lost() {
        let heartbeat = Arc::new(Heartbeat::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let heartbeat = heartbeat.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        heartbeat.beat();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(heartbeat.snapshot().count, 1_000);
    }
}
