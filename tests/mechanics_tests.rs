//! Switch bridges, fragile tiles, and split/merge played through a session

use tui_bloxorz::core::{
    BlockState, FootprintEvent, GameSession, LevelDef, LevelPack, Phase, SessionConfig,
    SwitchActivation,
};
use tui_bloxorz::types::{Direction, Pos, SubBlock};

fn builtin_level(index: usize) -> GameSession {
    let pack = LevelPack::builtin().unwrap();
    let config = SessionConfig {
        start_level: index,
        ..SessionConfig::from_pack(&pack)
    };
    GameSession::new(pack.build().unwrap(), config).unwrap()
}

fn single(def: LevelDef) -> GameSession {
    GameSession::new(vec![def.build(0).unwrap()], SessionConfig::default()).unwrap()
}

fn play(session: &mut GameSession, moves: &str) -> Vec<FootprintEvent> {
    moves
        .chars()
        .filter_map(|ch| {
            let dir = Direction::from_str(&ch.to_string()).unwrap();
            session.apply_move(dir)
        })
        .collect()
}

#[test]
fn test_closed_bridge_is_a_hole() {
    let mut session = builtin_level(1);
    // Standing up on the first bridge before its switch is pressed.
    assert_eq!(
        play(&mut session, "RR"),
        vec![FootprintEvent::Continue, FootprintEvent::Fall]
    );
    assert_eq!(session.lives(), 2);
    assert_eq!(session.block(), BlockState::standing(Pos::new(1, 4)));
}

#[test]
fn test_soft_switch_toggles_on_partial_cover() {
    let mut session = builtin_level(1);
    play(&mut session, "U");
    assert!(!session.switches().is_open(0));

    // Lying across (2,2)-(2,3) covers the soft switch with one cube.
    play(&mut session, "R");
    assert!(session.switches().is_open(0));
    assert!(!session.switches().is_open(1));

    // Leaving does nothing; landing on it again flips it back.
    play(&mut session, "L");
    assert!(session.switches().is_open(0));
    play(&mut session, "R");
    assert!(!session.switches().is_open(0));
}

#[test]
fn test_heavy_switch_needs_standing_block() {
    let mut session = builtin_level(1);
    play(&mut session, "URDRRRR");
    assert!(session.switches().is_open(0));
    assert!(!session.switches().is_open(1));

    play(&mut session, "UU");
    assert_eq!(session.block(), BlockState::standing(Pos::new(8, 1)));
    assert!(session.switches().is_open(1));
}

#[test]
fn test_bridges_level_clears_through_both_bridges() {
    let mut session = builtin_level(1);
    let events = play(&mut session, "URDRRRRUUDRDRRURU");
    let (last, rest) = events.split_last().unwrap();

    assert_eq!(*last, FootprintEvent::Goal);
    assert!(rest.iter().all(|e| *e == FootprintEvent::Continue));
    assert_eq!(session.phase(), Phase::LevelCleared);
}

#[test]
fn test_exact_switch_ignores_partial_cover() {
    let def = LevelDef::new("heavy", 20, &["S####G", "######", "######", "####=="]).with_switch(
        "heavy",
        SwitchActivation::Exact,
        &[(2, 0)],
        &[(4, 3), (5, 3)],
    );
    let mut session = single(def);

    // Lying over (1,0)-(2,0) touches the trigger without standing on it.
    play(&mut session, "RL");
    assert!(!session.switches().is_open(0));

    play(&mut session, "DRRU");
    assert_eq!(session.block(), BlockState::standing(Pos::new(2, 0)));
    assert!(session.switches().is_open(0));
}

#[test]
fn test_fragile_tile_only_breaks_under_standing_block() {
    let def = LevelDef::new("ice", 20, &["S#F#", "####", "###G"]);
    let mut session = single(def);

    // Lying across the fragile tile and back is fine.
    assert_eq!(
        play(&mut session, "RL"),
        vec![FootprintEvent::Continue, FootprintEvent::Continue]
    );

    let events = play(&mut session, "DRRU");
    assert_eq!(events.last(), Some(&FootprintEvent::Fall));
    assert_eq!(session.lives(), 2);
    assert_eq!(session.block(), BlockState::standing(Pos::new(0, 0)));
}

#[test]
fn test_split_on_triggers_then_merge() {
    let mut session = builtin_level(3);

    play(&mut session, "R");
    assert_eq!(
        session.block(),
        BlockState::split([Pos::new(9, 1), Pos::new(9, 7)], SubBlock::First)
    );
    assert_eq!(session.moves_remaining(), 16);

    // Walk the first cube down until it meets the second.
    play(&mut session, "DDDD");
    assert!(session.block().is_split());
    play(&mut session, "D");
    assert_eq!(
        session.block(),
        BlockState::lying(Pos::new(9, 6), Pos::new(9, 7)).unwrap()
    );

    let events = play(&mut session, "URUR");
    assert_eq!(events.last(), Some(&FootprintEvent::Goal));
}

#[test]
fn test_toggle_is_free_and_moves_other_cube() {
    let mut session = builtin_level(3);
    play(&mut session, "R");
    let before = session.moves_remaining();

    assert!(session.toggle_active_sub_block());
    assert_eq!(session.moves_remaining(), before);
    assert_eq!(session.block().active(), Some(SubBlock::Second));

    play(&mut session, "U");
    assert_eq!(
        session.block(),
        BlockState::split([Pos::new(9, 1), Pos::new(9, 6)], SubBlock::Second)
    );
    assert_eq!(session.moves_remaining(), before - 1);
}

#[test]
fn test_toggle_while_joined_does_nothing() {
    let mut session = builtin_level(0);
    assert!(!session.toggle_active_sub_block());
    assert_eq!(session.moves_remaining(), 14);
}

#[test]
fn test_split_cube_off_the_edge_falls() {
    let mut session = builtin_level(3);
    play(&mut session, "R");
    // (9,1) -> (9,0) is floor, (9,-1) is off the map.
    assert_eq!(
        play(&mut session, "UU"),
        vec![FootprintEvent::Continue, FootprintEvent::Fall]
    );
    assert!(!session.block().is_split());
    assert_eq!(session.lives(), 2);
}
