use donjon_domain::{
    BarrierStatus, CombatModifiers, DiceRequirement, DiceRoll, EnemyId, SkippedRound,
};
use donjon_shared::GameEndReason;

use super::*;
use crate::use_cases::combat::CombatRequest;

pub(super) fn combat_request(
    enemy_id: String,
    enemy_damage: Option<u32>,
    player_count: Option<u32>,
    base_requirements: Option<Vec<DiceRequirement>>,
    modifiers: Option<CombatModifiers>,
) -> CombatRequest {
    CombatRequest {
        enemy_id: EnemyId::from(enemy_id),
        enemy_damage,
        player_count,
        base_requirements,
        modifiers: modifiers.unwrap_or_default(),
    }
}

pub(super) async fn handle_combat_started(
    state: &WsState,
    binding: &SessionBinding,
    request: CombatRequest,
) -> Option<ServerMessage> {
    let opened = match state
        .app
        .use_cases
        .combat
        .start
        .execute(binding.session_id, &binding.player_id, request)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "start combat")),
    };

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::CombatStarted {
            enemy_id: opened.enemy_id.to_string(),
            enemy_damage: opened.enemy_damage,
            scaled_requirements: opened.scaled_requirements.clone(),
            remaining_requirements: opened.remaining_requirements.clone(),
            current_round: opened.current_round,
        },
    );
    None
}

/// Announce a roll with its preview. Nothing is stored.
pub(super) async fn handle_roll_dice(
    state: &WsState,
    binding: &SessionBinding,
    roll: DiceRoll,
) -> Option<ServerMessage> {
    let preview = match state
        .app
        .use_cases
        .combat
        .preview
        .execute(binding.session_id, &binding.player_id, roll)
        .await
    {
        Ok(preview) => preview,
        Err(e) => return Some(action_error_response(&e, "preview roll")),
    };

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::DiceRolled {
            player_id: binding.player_id.to_string(),
            roll: preview.roll,
            roll_result: preview.result,
        },
    );
    None
}

pub(super) async fn handle_confirm_roll(
    state: &WsState,
    binding: &SessionBinding,
    roll: DiceRoll,
) -> Option<ServerMessage> {
    let confirmation = match state
        .app
        .use_cases
        .combat
        .confirm
        .execute(binding.session_id, &binding.player_id, roll)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "confirm roll")),
    };

    let session_id = binding.session_id;
    let player_id = confirmation.player_id.to_string();

    if let Some(hp) = confirmation.hp_after_damage {
        state.connections.broadcast_to_session(
            session_id,
            ServerMessage::PlayerHpUpdated {
                player_id: player_id.clone(),
                hp,
            },
        );
    }

    state.connections.broadcast_to_session(
        session_id,
        ServerMessage::RollConfirmed {
            player_id: player_id.clone(),
            roll_result: confirmation.result.clone(),
            remaining_requirements: confirmation.remaining_requirements.clone(),
            is_victory: confirmation.result.is_victory,
            current_round: confirmation.current_round,
        },
    );

    if confirmation.player_died {
        state.connections.broadcast_to_session(
            session_id,
            ServerMessage::GameEnded {
                victory: false,
                reason: Some(GameEndReason::PlayerDeath),
                player_id: Some(player_id),
            },
        );
        drop(confirmation);
        state.release_finished(session_id);
        return None;
    }

    if let BarrierStatus::RoundAdvanced { round } = confirmation.barrier {
        state
            .connections
            .broadcast_to_session(session_id, ServerMessage::AllRollsReady { round });
    }
    None
}

pub(super) async fn handle_force_advance_round(
    state: &WsState,
    binding: &SessionBinding,
) -> Option<ServerMessage> {
    let skipped = match state
        .app
        .use_cases
        .combat
        .force_advance
        .execute(binding.session_id, &binding.player_id)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "force the round")),
    };

    announce_skipped_round(&state.connections, binding.session_id, &skipped);
    None
}

/// `RoundSkipped` then `AllRollsReady`, for the host override and the sweeper.
pub(super) fn announce_skipped_round(
    connections: &ConnectionManager,
    session_id: SessionId,
    skipped: &SkippedRound,
) {
    connections.broadcast_to_session(
        session_id,
        ServerMessage::RoundSkipped {
            round: skipped.round,
            skipped_players: skipped
                .skipped_players
                .iter()
                .map(ToString::to_string)
                .collect(),
        },
    );
    connections.broadcast_to_session(
        session_id,
        ServerMessage::AllRollsReady {
            round: skipped.round,
        },
    );
}
