//! Adventure definitions and the seeded randomizer that orders them.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{AdventureId, EnemyId, EventId};
use crate::value_objects::{Seed, SeededSequence};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureDefinition {
    pub id: AdventureId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Key of the event pool in the catalog
    pub events_key: String,
    pub boss_ids: Vec<EnemyId>,
}

/// The event order and boss one session plays. Computed once at game start and
/// persisted; never recomputed for that session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizedAdventure {
    pub event_ids: Vec<EventId>,
    pub boss_id: EnemyId,
}

/// Shuffle the full event pool and draw a boss from one seeded stream.
///
/// Both pools are sorted by id first, so the caller's ordering never leaks into
/// the result. The sort is byte-wise; clients sort with locale collation, which
/// agrees only for pools accepted by [`check_sortable_ids`]. The events get a Fisher-Yates pass (`i` from `n-1` down to 1,
/// `j = floor(rng * (i + 1))`) and the boss index is the next draw after it.
pub fn randomize_adventure(
    adventure_id: &AdventureId,
    event_pool: &[EventId],
    boss_pool: &[EnemyId],
    seed: Seed,
) -> Result<RandomizedAdventure, DomainError> {
    if boss_pool.is_empty() {
        return Err(DomainError::invariant(format!(
            "adventure {adventure_id} has no boss"
        )));
    }

    let mut rng = SeededSequence::new(seed);

    let mut event_ids = event_pool.to_vec();
    event_ids.sort();
    for i in (1..event_ids.len()).rev() {
        let j = rng.next_index(i + 1);
        event_ids.swap(i, j);
    }

    let mut bosses = boss_pool.to_vec();
    bosses.sort();
    let boss_id = bosses.swap_remove(rng.next_index(bosses.len()));

    Ok(RandomizedAdventure { event_ids, boss_id })
}

/// Rank of an id byte under the clients' collation: `_` before digits before
/// letters. `None` for bytes outside `[a-z0-9_]`.
fn collation_rank(byte: u8) -> Option<u8> {
    match byte {
        b'_' => Some(0),
        b'0'..=b'9' => Some(1 + byte - b'0'),
        b'a'..=b'z' => Some(11 + byte - b'a'),
        _ => None,
    }
}

/// Reject a pool whose byte order could differ from the clients' order.
///
/// Ids must be non-empty and use only lowercase ASCII letters, digits and `_`.
/// Within that set the two orders disagree only where `_` meets a digit at the
/// same position, so the byte-sorted pool is checked pair by pair.
pub fn check_sortable_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<(), DomainError> {
    let mut sorted: Vec<&str> = ids.into_iter().collect();
    if let Some(bad) = sorted
        .iter()
        .find(|id| id.is_empty() || id.bytes().any(|b| collation_rank(b).is_none()))
    {
        return Err(DomainError::validation(format!(
            "id {bad:?} must use only lowercase letters, digits and '_'"
        )));
    }

    sorted.sort_unstable();
    let collation_key = |id: &str| -> Vec<u8> { id.bytes().filter_map(collation_rank).collect() };
    for pair in sorted.windows(2) {
        if collation_key(pair[0]) > collation_key(pair[1]) {
            return Err(DomainError::validation(format!(
                "ids {} and {} sort differently on clients",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypte_events() -> Vec<EventId> {
        (1..=8).map(|n| EventId::new(format!("crypte_{n:02}"))).collect()
    }

    fn crypte_bosses() -> Vec<EnemyId> {
        vec![EnemyId::from("boss_necromancer"), EnemyId::from("boss_lich")]
    }

    fn ids(adventure: &RandomizedAdventure) -> Vec<&str> {
        adventure.event_ids.iter().map(EventId::as_str).collect()
    }

    #[test]
    fn crypte_seed_42_is_fixed() {
        let adventure = randomize_adventure(
            &AdventureId::from("crypte"),
            &crypte_events(),
            &crypte_bosses(),
            Seed::new(42),
        )
        .unwrap();

        assert_eq!(
            ids(&adventure),
            vec![
                "crypte_01", "crypte_02", "crypte_05", "crypte_03", "crypte_04", "crypte_07",
                "crypte_06", "crypte_08",
            ]
        );
        assert_eq!(adventure.boss_id.as_str(), "boss_lich");
    }

    #[test]
    fn crypte_seed_43_differs() {
        let id = AdventureId::from("crypte");
        let a = randomize_adventure(&id, &crypte_events(), &crypte_bosses(), Seed::new(42)).unwrap();
        let b = randomize_adventure(&id, &crypte_events(), &crypte_bosses(), Seed::new(43)).unwrap();

        assert_ne!(a, b);
        assert_eq!(b.boss_id.as_str(), "boss_necromancer");
    }

    #[test]
    fn input_order_does_not_matter() {
        let id = AdventureId::from("crypte");
        let mut reversed = crypte_events();
        reversed.reverse();
        let mut bosses = crypte_bosses();
        bosses.reverse();

        let a = randomize_adventure(&id, &crypte_events(), &crypte_bosses(), Seed::new(7)).unwrap();
        let b = randomize_adventure(&id, &reversed, &bosses, Seed::new(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn result_is_a_permutation_of_the_pool() {
        let id = AdventureId::from("crypte");
        let adventure =
            randomize_adventure(&id, &crypte_events(), &crypte_bosses(), Seed::new(99_999)).unwrap();

        let mut sorted = adventure.event_ids.clone();
        sorted.sort();
        assert_eq!(sorted, crypte_events());
    }

    #[test]
    fn empty_event_pool_yields_empty_order() {
        let adventure = randomize_adventure(
            &AdventureId::from("vide"),
            &[],
            &[EnemyId::from("boss_dragon")],
            Seed::new(1),
        )
        .unwrap();

        assert!(adventure.event_ids.is_empty());
        assert_eq!(adventure.boss_id.as_str(), "boss_dragon");
    }

    #[test]
    fn empty_boss_pool_is_an_invariant_violation() {
        let result = randomize_adventure(
            &AdventureId::from("crypte"),
            &crypte_events(),
            &[],
            Seed::new(42),
        );
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn crypte_ids_sort_the_same_everywhere() {
        let events = crypte_events();
        assert!(check_sortable_ids(events.iter().map(EventId::as_str)).is_ok());
        assert!(check_sortable_ids(["boss_lich", "boss_necromancer"]).is_ok());
    }

    #[test]
    fn underscore_against_digit_is_rejected() {
        // bytes put "salle1" first, collation puts "salle_" first
        let result = check_sortable_ids(["salle_a", "salle1"]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn uppercase_and_punctuation_are_rejected() {
        assert!(check_sortable_ids(["Crypte_01"]).is_err());
        assert!(check_sortable_ids(["crypte-01"]).is_err());
        assert!(check_sortable_ids([""]).is_err());
    }
}
