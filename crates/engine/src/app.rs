//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{ClockPort, ContentCatalog, SessionReader, SessionRepo};
use crate::stores::SessionLocks;
use crate::use_cases::{
    combat, event, inventory, session, CombatUseCases, EventUseCases, InventoryUseCases,
    SessionGate, SessionUseCases,
};

/// Main application state.
///
/// Holds the ports and use cases.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub locks: Arc<SessionLocks>,
    pub rules: GameRules,
    pub clock: Arc<dyn ClockPort>,
}

/// Container for the injected ports.
pub struct Repositories {
    pub sessions: Arc<dyn SessionRepo>,
    /// Same store as `sessions`, seen read-only
    pub session_reader: Arc<dyn SessionReader>,
    pub catalog: Arc<dyn ContentCatalog>,
}

/// Container for all use cases.
pub struct UseCases {
    pub session: SessionUseCases,
    pub combat: CombatUseCases,
    pub inventory: InventoryUseCases,
    pub events: EventUseCases,
}

/// Tunables that change how a game plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub inventory_capacity: usize,
    /// Rounds open longer than this are released by the sweeper
    pub round_timeout: Option<chrono::Duration>,
}

impl GameRules {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            inventory_capacity: config.inventory_capacity,
            round_timeout: config
                .round_timeout
                .and_then(|timeout| chrono::Duration::from_std(timeout).ok()),
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl App {
    pub fn new<S>(
        store: Arc<S>,
        catalog: Arc<dyn ContentCatalog>,
        clock: Arc<dyn ClockPort>,
        rules: GameRules,
    ) -> Self
    where
        S: SessionRepo + SessionReader + 'static,
    {
        let sessions: Arc<dyn SessionRepo> = store.clone();
        let session_reader: Arc<dyn SessionReader> = store;
        let locks = Arc::new(SessionLocks::new());
        let gate = Arc::new(SessionGate::new(sessions.clone(), locks.clone()));

        let session_use_cases = SessionUseCases::new(
            Arc::new(session::JoinSession::new(gate.clone())),
            Arc::new(session::SelectCharacter::new(gate.clone())),
            Arc::new(session::StartGame::new(
                gate.clone(),
                catalog.clone(),
                clock.clone(),
                rules.inventory_capacity,
            )),
            Arc::new(session::AdvanceEvent::new(gate.clone())),
            Arc::new(session::EndGame::new(gate.clone())),
        );

        let combat_use_cases = CombatUseCases::new(
            Arc::new(combat::StartCombat::new(
                gate.clone(),
                catalog.clone(),
                clock.clone(),
            )),
            Arc::new(combat::PreviewRoll::new(session_reader.clone())),
            Arc::new(combat::ConfirmRoll::new(
                gate.clone(),
                catalog.clone(),
                clock.clone(),
            )),
            Arc::new(combat::ForceAdvanceRound::new(gate.clone(), clock.clone())),
            Arc::new(combat::ReleaseStalledRounds::new(
                sessions.clone(),
                gate.clone(),
                clock.clone(),
                rules.round_timeout,
            )),
        );

        let inventory_use_cases = InventoryUseCases::new(
            Arc::new(inventory::UseItem::new(gate.clone(), catalog.clone())),
            Arc::new(inventory::AddItem::new(
                gate.clone(),
                catalog.clone(),
                rules.inventory_capacity,
            )),
        );

        let event_use_cases =
            EventUseCases::new(Arc::new(event::ResolveChoice::new(gate, catalog.clone())));

        Self {
            repositories: Repositories {
                sessions,
                session_reader,
                catalog,
            },
            use_cases: UseCases {
                session: session_use_cases,
                combat: combat_use_cases,
                inventory: inventory_use_cases,
                events: event_use_cases,
            },
            locks,
            rules,
            clock,
        }
    }
}
