pub mod chat;
pub mod error;
pub mod local;
pub mod net;
pub mod player;
pub mod session;
pub mod settings;
pub mod titan;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::local::LocalWorld;
    use crate::player::{Player, PlayerId, PlayerState};
    use crate::session::{SpawnPoint, TITAN_SPAWN_TAG};

    /// Create `n` test players with sequential IDs starting at 1.
    /// Player 1 is the master client. The first `titan_side` players are on
    /// the titan side.
    pub fn make_players(n: usize, titan_side: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player {
                id: i as PlayerId + 1,
                name: format!("Player{}", i + 1),
                is_master: i == 0,
                state: PlayerState {
                    is_titan_side: i < titan_side,
                    ..PlayerState::default()
                },
            })
            .collect()
    }

    /// A world seen from the master client with `spawn_points` titan spawns
    /// laid out on a line.
    pub fn authority_world(players: Vec<Player>, spawn_points: usize, seed: u64) -> LocalWorld {
        let mut world = LocalWorld::new(1, players, seed);
        world.registry.set_spawn_points(
            TITAN_SPAWN_TAG,
            (0..spawn_points)
                .map(|i| SpawnPoint::at(i as f32 * 10.0, 0.0, 0.0))
                .collect(),
        );
        world
    }

    /// Same as [`authority_world`] but seen from a non-master participant.
    pub fn remote_world(players: Vec<Player>, local_id: PlayerId, seed: u64) -> LocalWorld {
        let mut world = LocalWorld::new(local_id, players, seed);
        world.network.authority = false;
        world
    }
}
