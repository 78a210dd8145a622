use crate::domain::session::{GameStatus, Item, JoinOutcome, Session};

fn started_session() -> Session {
    let mut session = Session::new("g1".to_string());
    assert_eq!(session.try_join("p1"), JoinOutcome::Joined);
    assert_eq!(session.try_join("p2"), JoinOutcome::Joined);
    session.item = Some(Item {
        name: "lamp".to_string(),
        image_url: "https://example.test/lamp.png".to_string(),
        price: 19.99,
    });
    session.status = GameStatus::InProgress;
    session.current_turn = Some("p1".to_string());
    session.round = 1;
    session
}

#[test]
fn first_entrant_is_the_creator() {
    let mut session = Session::new("g1".to_string());
    session.try_join("p1");
    session.try_join("p2");
    assert_eq!(session.creator().map(String::as_str), Some("p1"));
}

#[test]
fn roster_holds_at_most_two_distinct_players() {
    let mut session = Session::new("g1".to_string());
    assert_eq!(session.try_join("p1"), JoinOutcome::Joined);
    assert_eq!(session.try_join("p1"), JoinOutcome::AlreadyPresent);
    assert_eq!(session.try_join("p2"), JoinOutcome::Joined);
    assert_eq!(session.try_join("p3"), JoinOutcome::Full);
    assert_eq!(session.players, vec!["p1", "p2"]);
}

#[test]
fn rejoin_does_not_duplicate_roster_entry() {
    let mut session = Session::new("g1".to_string());
    session.try_join("p1");
    session.try_join("p2");
    assert_eq!(session.try_join("p2"), JoinOutcome::AlreadyPresent);
    assert_eq!(session.players.len(), 2);
}

#[test]
fn turn_alternates_between_both_players() {
    let mut session = started_session();
    for expected in ["p2", "p1", "p2", "p1"] {
        let before = session.current_turn.clone().unwrap();
        let next = session.advance_turn().unwrap();
        assert_eq!(next, expected);
        assert_ne!(next, before);
    }
}

#[test]
fn advance_turn_bumps_round() {
    let mut session = started_session();
    assert_eq!(session.round, 1);
    session.advance_turn();
    assert_eq!(session.round, 2);
    session.advance_turn();
    assert_eq!(session.round, 3);
}

#[test]
fn current_turn_stays_within_roster() {
    let mut session = started_session();
    for _ in 0..5 {
        let turn = session.advance_turn().unwrap();
        assert!(session.contains(&turn));
    }
}

#[test]
fn in_progress_requires_no_winner() {
    let mut session = started_session();
    assert!(session.in_progress());
    session.winner = Some("p1".to_string());
    assert!(!session.in_progress());
}
