//! Rolling geometry and footprint legality across whole levels

use tui_bloxorz::core::{
    classify, roll, BlockState, FootprintEvent, GameSession, LevelPack, Phase, Pose,
    SessionConfig,
};
use tui_bloxorz::types::{Axis, Command, Direction, Pos, SubBlock};

fn joined_states() -> Vec<BlockState> {
    let mut states = Vec::new();
    for x in 3..7 {
        for y in 3..7 {
            let c = Pos::new(x, y);
            states.push(BlockState::standing(c));
            states.push(BlockState::lying(c, Pos::new(x + 1, y)).unwrap());
            states.push(BlockState::lying(c, Pos::new(x, y + 1)).unwrap());
        }
    }
    states
}

#[test]
fn test_roll_then_opposite_restores_every_joined_state() {
    for state in joined_states() {
        for dir in Direction::ALL {
            let there = roll(state, dir);
            assert_eq!(
                roll(there, dir.opposite()),
                state,
                "{:?} rolled {:?} then back",
                state,
                dir
            );
        }
    }
}

#[test]
fn test_roll_then_opposite_restores_split_state() {
    let state = BlockState::split([Pos::new(2, 2), Pos::new(8, 1)], SubBlock::Second);
    for dir in Direction::ALL {
        assert_eq!(roll(roll(state, dir), dir.opposite()), state);
    }
}

#[test]
fn test_roll_keeps_footprint_adjacent() {
    for state in joined_states() {
        for dir in Direction::ALL {
            let next = roll(state, dir);
            let cells = next.footprint();
            match next.pose() {
                Some(Pose::Standing) => assert_eq!(cells.len(), 1),
                Some(Pose::Lying(axis)) => {
                    assert_eq!(cells.len(), 2);
                    assert_eq!(cells[0].adjacent_axis(cells[1]), Some(axis));
                }
                None => unreachable!("joined blocks never split by rolling"),
            }
        }
    }
}

#[test]
fn test_standing_roll_lies_along_direction() {
    let next = roll(BlockState::standing(Pos::new(4, 4)), Direction::Down);
    assert_eq!(next.pose(), Some(Pose::Lying(Axis::Y)));
    assert_eq!(
        next.footprint().as_slice(),
        &[Pos::new(4, 5), Pos::new(4, 6)]
    );
}

/// Tiny deterministic generator so the walk is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn test_reachable_states_are_always_supported() {
    let pack = LevelPack::builtin().unwrap();
    let mut rng = Lcg(0x5eed);

    for start in 0..pack.levels.len() {
        let config = SessionConfig {
            start_level: start,
            ..SessionConfig::from_pack(&pack)
        };
        let mut session = GameSession::new(pack.build().unwrap(), config).unwrap();

        for _ in 0..2000 {
            let command = match rng.next() % 7 {
                0 => Command::Move(Direction::Up),
                1 => Command::Move(Direction::Down),
                2 => Command::Move(Direction::Left),
                3 => Command::Move(Direction::Right),
                4 => Command::ToggleActiveSubBlock,
                5 => Command::Move(Direction::ALL[(rng.next() % 4) as usize]),
                _ => Command::RestartLevel,
            };
            session.apply_command(command);

            match session.phase() {
                Phase::Playing => {
                    let event = classify(&session.block(), session.grid(), &session.switches());
                    assert_ne!(event, FootprintEvent::Fall, "illegal resting state");
                    assert!(session.moves_remaining() >= 0);
                }
                Phase::LevelCleared => {
                    session.advance_level();
                }
                Phase::GameOver(_) => {
                    session.restart_level();
                }
            }
        }
    }
}
