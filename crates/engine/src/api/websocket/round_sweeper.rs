//! Background release of combat rounds nobody finished.
//!
//! A player who disconnects mid-round never confirms, so the barrier would wait
//! forever. Every tick the sweeper looks at running sessions and releases the
//! rounds that have been open longer than the configured timeout, skipping the
//! players who did not roll.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{ws_combat::announce_skipped_round, WsState};

pub fn spawn_round_sweeper(state: Arc<WsState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let released = sweep_stalled_rounds(&state).await;
            if released > 0 {
                tracing::debug!(released, "Round sweep released stalled rounds");
            }
        }
    })
}

/// One pass over running sessions. Returns how many rounds were released.
pub async fn sweep_stalled_rounds(state: &WsState) -> usize {
    let release = &state.app.use_cases.combat.release_stalled;

    let candidates = match release.candidates().await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to list running sessions for round sweep");
            return 0;
        }
    };

    let mut released = 0;
    for session_id in candidates {
        match release.release(session_id).await {
            Ok(Some(skipped)) => {
                announce_skipped_round(&state.connections, session_id, &skipped);
                released += 1;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to release stalled round");
            }
        }
    }
    released
}
