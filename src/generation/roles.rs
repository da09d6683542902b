//! Gameplay Role Tagging
//!
//! Optionally tags each room with a gameplay role after the graph is built.
//! Every room draws a uniform value to decide between treasure and combat,
//! then the first and last rooms are overridden to be the entry and boss
//! rooms regardless of their draws.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::room::{RoomRole, RoomVertex};

/// Assign gameplay roles to all rooms
///
/// Rooms draw in id order: a uniform `[0,1)` value below `treasure_fraction`
/// makes the room [`RoomRole::Treasure`], anything else [`RoomRole::Enemy`].
/// Room 0 is then forced to [`RoomRole::Start`] and the last room to
/// [`RoomRole::Boss`]. Their draws still happen, keeping the random stream
/// identical whether or not an override lands on a given room.
pub fn assign_roles(rooms: &mut [RoomVertex], treasure_fraction: f64, rng: &mut ChaCha8Rng) {
    for room in rooms.iter_mut() {
        let draw = rng.gen::<f64>();
        room.role = if draw < treasure_fraction {
            RoomRole::Treasure
        } else {
            RoomRole::Enemy
        };
    }

    if let Some(first) = rooms.first_mut() {
        first.role = RoomRole::Start;
    }
    if let Some(last) = rooms.last_mut() {
        last.role = RoomRole::Boss;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use rand::SeedableRng;

    fn rooms(count: usize) -> Vec<RoomVertex> {
        (0..count)
            .map(|i| RoomVertex::new(i, DVec2::new(i as f64, 0.0), 1.0))
            .collect()
    }

    #[test]
    fn test_start_and_boss_are_forced() {
        let mut rooms = rooms(10);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assign_roles(&mut rooms, 0.5, &mut rng);

        assert_eq!(rooms[0].role, RoomRole::Start);
        assert_eq!(rooms[9].role, RoomRole::Boss);

        let starts = rooms.iter().filter(|r| r.role == RoomRole::Start).count();
        let bosses = rooms.iter().filter(|r| r.role == RoomRole::Boss).count();
        assert_eq!(starts, 1);
        assert_eq!(bosses, 1);

        for room in &rooms[1..9] {
            assert!(
                room.role == RoomRole::Treasure || room.role == RoomRole::Enemy,
                "room {} has unexpected role {:?}",
                room.id,
                room.role
            );
        }
    }

    #[test]
    fn test_fraction_zero_means_no_treasure() {
        let mut rooms = rooms(12);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assign_roles(&mut rooms, 0.0, &mut rng);

        for room in &rooms[1..11] {
            assert_eq!(room.role, RoomRole::Enemy);
        }
    }

    #[test]
    fn test_fraction_one_means_all_treasure() {
        let mut rooms = rooms(12);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assign_roles(&mut rooms, 1.0, &mut rng);

        for room in &rooms[1..11] {
            assert_eq!(room.role, RoomRole::Treasure);
        }
    }

    #[test]
    fn test_role_determinism() {
        let mut rooms1 = rooms(20);
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        assign_roles(&mut rooms1, 0.3, &mut rng);

        let mut rooms2 = rooms(20);
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        assign_roles(&mut rooms2, 0.3, &mut rng);

        for (a, b) in rooms1.iter().zip(rooms2.iter()) {
            assert_eq!(a.role, b.role);
        }
    }

    #[test]
    fn test_empty_rooms() {
        let mut rooms: Vec<RoomVertex> = Vec::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assign_roles(&mut rooms, 0.5, &mut rng);
        assert!(rooms.is_empty());
    }
}
