//! Releasing a round before every player has confirmed.
//!
//! A disconnected player would otherwise hold the barrier forever. The host can
//! release the round at once, and a background sweep releases rounds that have
//! been open longer than the configured timeout. Missing players are skipped:
//! they neither roll nor take damage.

use std::sync::Arc;

use chrono::Duration;

use donjon_domain::{PlayerId, SessionId, SkippedRound};

use crate::infrastructure::ports::{ClockPort, SessionRepo};
use crate::use_cases::{ActionError, Committed, SessionGate};

/// Host override of the round barrier.
pub struct ForceAdvanceRound {
    gate: Arc<SessionGate>,
    clock: Arc<dyn ClockPort>,
}

impl ForceAdvanceRound {
    pub fn new(gate: Arc<SessionGate>, clock: Arc<dyn ClockPort>) -> Self {
        Self { gate, clock }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
    ) -> Result<Committed<SkippedRound>, ActionError> {
        let mut open = self.gate.open(session_id).await?;
        if !open.session.is_host(player_id) {
            return Err(ActionError::NotHost("force the round"));
        }

        let roster = open.session.player_ids.clone();
        let combat = open
            .session
            .game_state
            .combat_state
            .as_mut()
            .filter(|combat| combat.is_active)
            .ok_or_else(|| ActionError::invalid_state("no active combat"))?;
        let skipped = combat.skip_round(&roster, self.clock.now())?;

        tracing::info!(
            session_id = %session_id,
            round = skipped.round,
            skipped = skipped.skipped_players.len(),
            "Host forced the round"
        );

        self.gate.commit(open, skipped).await
    }
}

/// Timeout release of stalled rounds, driven by the sweeper.
pub struct ReleaseStalledRounds {
    sessions: Arc<dyn SessionRepo>,
    gate: Arc<SessionGate>,
    clock: Arc<dyn ClockPort>,
    /// `None` never releases anything
    timeout: Option<Duration>,
}

impl ReleaseStalledRounds {
    pub fn new(
        sessions: Arc<dyn SessionRepo>,
        gate: Arc<SessionGate>,
        clock: Arc<dyn ClockPort>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            sessions,
            gate,
            clock,
            timeout,
        }
    }

    /// Sessions that may have a stalled round.
    pub async fn candidates(&self) -> Result<Vec<SessionId>, ActionError> {
        Ok(self.sessions.list_in_progress().await?)
    }

    /// Release the session's round if it is still open past the timeout.
    ///
    /// The check runs under the session lock, so a round that completed while
    /// the sweep was queued is left alone.
    pub async fn release(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Committed<SkippedRound>>, ActionError> {
        let Some(timeout) = self.timeout else {
            return Ok(None);
        };
        let mut open = self.gate.open(session_id).await?;
        let now = self.clock.now();

        let roster = open.session.player_ids.clone();
        let Some(combat) = open
            .session
            .game_state
            .combat_state
            .as_mut()
            .filter(|combat| combat.round_expired(now, timeout))
        else {
            return Ok(None);
        };
        let skipped = combat.skip_round(&roster, now)?;

        tracing::info!(
            session_id = %session_id,
            round = skipped.round,
            skipped = ?skipped.skipped_players,
            "Stalled round released"
        );

        self.gate.commit(open, skipped).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use donjon_domain::{
        CombatModifiers, CombatState, DiceRequirement, EnemyId, SessionRecord, Stat,
    };
    use std::collections::BTreeSet;

    fn half_confirmed_fight(started: chrono::DateTime<chrono::Utc>) -> SessionRecord {
        let mut session = running_session();
        session.game_state.combat_state = Some(CombatState {
            enemy_id: EnemyId::from("goule"),
            enemy_damage: 3,
            is_active: true,
            remaining_requirements: vec![DiceRequirement::new(Stat::Force, 4)],
            confirmed_players: BTreeSet::from([alice()]),
            current_round: 3,
            blocked_turns_remaining: 0,
            modifiers: CombatModifiers::default(),
            round_started_at: Some(started),
        });
        session
    }

    #[tokio::test]
    async fn host_skips_missing_players() {
        let harness = Harness::new().with_session(half_confirmed_fight(now()));
        let force = ForceAdvanceRound::new(harness.gate.clone(), harness.clock.clone());

        let skipped = force
            .execute(session_id(), &alice())
            .await
            .unwrap()
            .into_inner();

        assert_eq!(skipped.skipped_players, vec![bob()]);
        assert_eq!(skipped.round, 4);
        let combat = harness.stored().await.game_state.combat_state.unwrap();
        assert!(combat.confirmed_players.is_empty());
        assert_eq!(combat.remaining_requirements[0].count, 4);
    }

    #[tokio::test]
    async fn only_host_may_force() {
        let harness = Harness::new().with_session(half_confirmed_fight(now()));
        let force = ForceAdvanceRound::new(harness.gate.clone(), harness.clock.clone());

        let result = force.execute(session_id(), &bob()).await;
        assert!(matches!(result, Err(ActionError::NotHost(_))));
    }

    #[tokio::test]
    async fn sweep_releases_only_expired_rounds() {
        let started = now() - Duration::seconds(121);
        let harness = Harness::new().with_session(half_confirmed_fight(started));
        let release = ReleaseStalledRounds::new(
            harness.store.clone(),
            harness.gate.clone(),
            harness.clock.clone(),
            Some(Duration::seconds(120)),
        );

        assert_eq!(release.candidates().await.unwrap(), vec![session_id()]);
        let skipped = release.release(session_id()).await.unwrap().unwrap().into_inner();
        assert_eq!(skipped.skipped_players, vec![bob()]);

        // The new round started now, so a second sweep finds nothing
        assert!(release.release(session_id()).await.unwrap().is_none());
        assert_eq!(
            harness.stored().await.game_state.combat_state.unwrap().round_started_at,
            Some(now())
        );
    }

    #[tokio::test]
    async fn fresh_round_is_left_alone() {
        let harness = Harness::new().with_session(half_confirmed_fight(now()));
        let release = ReleaseStalledRounds::new(
            harness.store.clone(),
            harness.gate.clone(),
            harness.clock.clone(),
            Some(Duration::seconds(120)),
        );

        assert!(release.release(session_id()).await.unwrap().is_none());
        let combat = harness.stored().await.game_state.combat_state.unwrap();
        assert_eq!(combat.current_round, 3);
    }
}
