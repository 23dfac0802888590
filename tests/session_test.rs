//! Tests for the single-player session store.

use tictactoe_arena::{Mark, Match, SessionErrorKind, SessionManager};

#[test]
fn test_start_and_snapshot() {
    let sessions = SessionManager::new();
    sessions.start("a".to_string(), Match::computer(Mark::X, Mark::X)).unwrap();

    let game = sessions.snapshot("a").unwrap();
    assert_eq!(game.human_mark(), Some(Mark::X));
    assert_eq!(sessions.snapshot("b").unwrap_err().kind, SessionErrorKind::NotFound);
}

#[test]
fn test_new_game_replaces_old_match() {
    let sessions = SessionManager::new();
    sessions.start("a".to_string(), Match::computer(Mark::X, Mark::X)).unwrap();
    sessions
        .with_match("a", |game| game.apply_human_move(4, Mark::X))
        .unwrap()
        .unwrap();
    assert_eq!(sessions.snapshot("a").unwrap().history(), &[4]);

    sessions.start("a".to_string(), Match::computer(Mark::O, Mark::X)).unwrap();
    let game = sessions.snapshot("a").unwrap();
    assert!(game.history().is_empty());
    assert_eq!(game.human_mark(), Some(Mark::O));
}

#[test]
fn test_sessions_are_independent() {
    let sessions = SessionManager::new();
    let shared = sessions.clone();
    sessions.start("a".to_string(), Match::computer(Mark::X, Mark::X)).unwrap();
    shared.start("b".to_string(), Match::computer(Mark::X, Mark::X)).unwrap();

    shared.with_match("b", |game| game.apply_human_move(0, Mark::X)).unwrap().unwrap();
    assert!(sessions.snapshot("a").unwrap().history().is_empty());
    assert_eq!(sessions.snapshot("b").unwrap().history(), &[0]);

    let mut ids = sessions.list().unwrap();
    ids.sort();
    assert_eq!(ids, ["a", "b"]);
}

#[test]
fn test_end_removes_session() {
    let sessions = SessionManager::new();
    sessions.start("a".to_string(), Match::two_player(Mark::X)).unwrap();
    sessions.end("a").unwrap();
    assert_eq!(
        sessions.with_match("a", |_| ()).unwrap_err().kind,
        SessionErrorKind::NotFound
    );
}

#[test]
fn test_generated_ids_differ() {
    let a = SessionManager::generate_id();
    let b = SessionManager::generate_id();
    assert_eq!(a.len(), 12);
    assert_ne!(a, b);
}

#[test]
fn test_other_sessions_usable_while_one_is_locked() {
    let sessions = SessionManager::new();
    sessions.start("a".to_string(), Match::computer(Mark::X, Mark::X)).unwrap();
    sessions.start("b".to_string(), Match::computer(Mark::X, Mark::X)).unwrap();

    let inner = sessions.clone();
    sessions
        .with_match("a", |game| {
            game.apply_human_move(4, Mark::X).unwrap();
            inner
                .with_match("b", |other| other.apply_human_move(0, Mark::X))
                .unwrap()
                .unwrap();
            assert_eq!(inner.list().unwrap().len(), 2);
            inner.start("c".to_string(), Match::two_player(Mark::X)).unwrap();
        })
        .unwrap();

    assert_eq!(sessions.snapshot("a").unwrap().history(), &[4]);
    assert_eq!(sessions.snapshot("b").unwrap().history(), &[0]);
    assert!(sessions.snapshot("c").is_ok());
}

#[test]
fn test_searches_run_in_parallel_sessions() {
    let sessions = SessionManager::new();
    let ids: Vec<String> = (0..4).map(|n| format!("s{n}")).collect();
    for id in &ids {
        sessions.start(id.clone(), Match::computer(Mark::O, Mark::X)).unwrap();
    }

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let sessions = sessions.clone();
            std::thread::spawn(move || sessions.with_match(&id, |game| game.apply_computer_move()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(0));
    }
}
