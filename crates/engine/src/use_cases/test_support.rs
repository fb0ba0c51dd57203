//! Shared fixtures for use case tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use donjon_domain::{AdventureId, CharacterId, PlayerId, SessionId, SessionRecord, SessionStatus};

use crate::infrastructure::catalog::StaticCatalog;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::{ClockPort, ContentCatalog, SessionRepo};
use crate::infrastructure::session_store::InMemorySessionRepo;
use crate::stores::SessionLocks;

use super::SessionGate;

pub const SESSION_UUID: Uuid = Uuid::from_u128(0x0f1e_2d3c_4b5a_6978_8796_a5b4_c3d2_e1f0);
pub const CAPACITY: usize = 2;

pub fn session_id() -> SessionId {
    SessionId::from_uuid(SESSION_UUID)
}

pub fn alice() -> PlayerId {
    PlayerId::from("alice")
}

pub fn bob() -> PlayerId {
    PlayerId::from("bob")
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
}

/// Waiting "crypte" session hosted by alice with bob, no characters picked.
pub fn waiting_session() -> SessionRecord {
    SessionRecord::new(session_id(), "CRYP", alice(), AdventureId::from("crypte"))
        .with_player(bob())
}

/// Running session where alice (10 HP) and bob (8 HP) both have characters.
pub fn running_session() -> SessionRecord {
    let mut session = waiting_session();
    session
        .select_character(&alice(), CharacterId::from("chevalier"), 10)
        .unwrap();
    session
        .select_character(&bob(), CharacterId::from("mage"), 8)
        .unwrap();
    session.status = SessionStatus::InProgress;
    session
}

/// In-memory store, bundled catalog and a frozen clock.
pub struct Harness {
    pub store: Arc<InMemorySessionRepo>,
    pub catalog: Arc<dyn ContentCatalog>,
    pub clock: Arc<dyn ClockPort>,
    pub locks: Arc<SessionLocks>,
    pub gate: Arc<SessionGate>,
}

impl Harness {
    pub fn new() -> Self {
        Self::at(now())
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        let store = Arc::new(InMemorySessionRepo::new());
        let locks = Arc::new(SessionLocks::new());
        let gate = Arc::new(SessionGate::new(store.clone(), locks.clone()));
        Self {
            store,
            catalog: Arc::new(StaticCatalog::bundled().unwrap()),
            clock: Arc::new(FixedClock(time)),
            locks,
            gate,
        }
    }

    pub fn with_session(self, session: SessionRecord) -> Self {
        self.store.insert(session);
        self
    }

    pub async fn stored(&self) -> SessionRecord {
        self.store.get(session_id()).await.unwrap().unwrap()
    }
}
