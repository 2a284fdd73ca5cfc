
use std::time::Duration;

use quiz_app::session_manager::ContentSelector;
use quiz_core::{Advance, AnswerOutcome};
use quiz_types::{Content, GameError, GameState, PollOption, PollQuestion, RoomError, new_poll_id};
use test_helpers::*;

#[tokio::test]
async fn test_created_room_has_valid_code_and_single_host() {
    let setup = TestSetup::new();
    let room = setup
        .sessions
        .create_room("Ann", None, None, 20)
        .await
        .unwrap();

    assert_eq!(room.code.len(), 6);
    assert!(room
        .code
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    assert_eq!(room.players.len(), 1);
    assert!(room.players[0].is_host);
    assert_eq!(room.game_state, GameState::Waiting);
}

#[tokio::test]
async fn test_room_codes_are_unique() {
    let setup = TestSetup::new();
    let mut codes = std::collections::HashSet::new();
    for _ in 0..20 {
        let room = setup
            .sessions
            .create_room("Ann", None, None, 20)
            .await
            .unwrap();
        assert!(codes.insert(room.code));
    }
}

#[tokio::test]
async fn test_ninth_player_is_rejected_with_capacity_error() {
    let setup = TestSetup::new();
    let (room, _) = setup
        .room_with_players(&["P1", "P2", "P3", "P4", "P5", "P6", "P7"])
        .await;
    assert_eq!(room.players.len(), 8);

    let err = setup
        .sessions
        .join_room(&room.code, "Bob", None)
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::Full { code: room.code.clone() });

    let room = setup
        .sessions
        .rooms()
        .find_room_by_code(&room.code)
        .await
        .unwrap();
    assert_eq!(room.players.len(), 8);
}

#[tokio::test]
async fn test_joining_missing_room_is_not_found() {
    let setup = TestSetup::new();
    let err = setup
        .sessions
        .join_room("NOPE99", "Bob", None)
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::NotFound { code: "NOPE99".to_string() });
}

#[tokio::test]
async fn test_start_game_sets_up_first_question() {
    let setup = TestSetup::new();
    let quiz_id = setup.insert_quiz(2, 20).await;
    let (room, ids) = setup.room_with_players(&["Bob"]).await;

    let room = setup
        .sessions
        .start_game(&room.code, &ids[0], ContentSelector::Explicit(quiz_id.clone()))
        .await
        .unwrap();

    assert_eq!(room.game_state, GameState::Playing);
    assert_eq!(room.current_question_index, 0);
    assert!(room.question_start_time.is_some());
    assert_eq!(room.content_id.as_deref(), Some(quiz_id.as_str()));
    assert!(room.players.iter().all(|p| !p.answered));
}

#[tokio::test]
async fn test_start_game_rejects_non_host_and_lone_host() {
    let setup = TestSetup::new();
    let quiz_id = setup.insert_quiz(1, 20).await;
    let (room, ids) = setup.room_with_players(&["Bob"]).await;

    let err = setup
        .sessions
        .start_game(&room.code, &ids[1], ContentSelector::Explicit(quiz_id.clone()))
        .await
        .unwrap_err();
    assert_eq!(err, GameError::NotHost);

    let lonely = setup
        .sessions
        .create_room("Solo", Some("user_solo".to_string()), None, 20)
        .await
        .unwrap();
    let err = setup
        .sessions
        .start_game(&lonely.code, "user_solo", ContentSelector::Explicit(quiz_id))
        .await
        .unwrap_err();
    assert_eq!(err, GameError::InsufficientPlayers { have: 1, need: 2 });
}

#[tokio::test]
async fn test_start_game_with_unknown_content_fails() {
    let setup = TestSetup::new();
    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let err = setup
        .sessions
        .start_game(
            &room.code,
            &ids[0],
            ContentSelector::Explicit("quiz_missing".to_string()),
        )
        .await
        .unwrap_err();
    assert_eq!(err, GameError::ContentNotFound { id: "quiz_missing".to_string() });
}

#[tokio::test]
async fn test_random_selector_generates_placeholder_when_nothing_exists() {
    let setup = TestSetup::new();
    // drop the seeded demo quiz so nothing is available
    {
        let mut store = setup.store.write().await;
        store.snapshot_mut().quizzes.clear();
    }

    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let room = setup
        .sessions
        .start_game(
            &room.code,
            &ids[0],
            ContentSelector::RandomQuiz { category: None },
        )
        .await
        .unwrap();

    assert_eq!(room.game_state, GameState::Playing);
    let content_id = room.content_id.unwrap();
    let generated = setup.sessions.contents().find_by_id(&content_id).await;
    assert!(generated.is_some());
    assert!(generated.unwrap().question_count() > 0);
}

#[tokio::test]
async fn test_full_quiz_round_trip_with_timeout_and_stats() {
    let setup = TestSetup::new();
    let quiz_id = setup.insert_quiz(2, 2).await;
    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let (ann, bob) = (ids[0].clone(), ids[1].clone());
    let code = room.code.clone();

    setup
        .sessions
        .start_game(&code, &ann, ContentSelector::Explicit(quiz_id))
        .await
        .unwrap();

    // question 1: Ann answers correct, Bob sleeps through it
    let outcome = setup.sessions.submit_answer(&code, &ann, 1).await.unwrap();
    assert!(matches!(outcome, AnswerOutcome::Scored { .. }));
    // not due yet: Bob has not answered and the clock is still running
    assert_eq!(setup.sessions.advance_if_due(&code).await.unwrap(), None);

    tokio::time::sleep(Duration::from_millis(2300)).await;
    let advance = setup.sessions.advance_if_due(&code).await.unwrap();
    assert_eq!(advance, Some(Advance::Next { question_index: 1 }));

    let room = setup.sessions.rooms().find_room_by_code(&code).await.unwrap();
    assert!(room.players.iter().all(|p| !p.answered));

    // question 2: both answer, all-answered advances without waiting
    setup.sessions.submit_answer(&code, &ann, 1).await.unwrap();
    setup.sessions.submit_answer(&code, &bob, 0).await.unwrap();
    let advance = setup.sessions.advance_if_due(&code).await.unwrap();
    let Some(Advance::Finished { winner_ids }) = advance else {
        panic!("expected the game to finish, got {advance:?}");
    };
    assert_eq!(winner_ids, vec![ann.clone()]);

    let room = setup.sessions.rooms().find_room_by_code(&code).await.unwrap();
    assert_eq!(room.game_state, GameState::Finished);
    let results = room.results.unwrap();
    assert_eq!(results[0].id, ann);
    assert!(results[0].score >= 20);
    assert_eq!(results[1].id, bob);
    assert_eq!(results[1].score, 0);

    // the registered host gets stats; the guest never will
    let user = setup.sessions.users().find_by_id(&ann).await.unwrap();
    assert_eq!(user.stats.games_played, 1);
    assert_eq!(user.stats.games_won, 1);
    assert_eq!(user.stats.total_score, results[0].score as i64);
    assert_eq!(user.stats.win_rate, 100);
}

#[tokio::test]
async fn test_answer_guards() {
    let setup = TestSetup::new();
    let quiz_id = setup.insert_quiz(1, 20).await;
    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let code = room.code.clone();

    // before the game starts
    let err = setup.sessions.submit_answer(&code, &ids[0], 1).await.unwrap_err();
    assert_eq!(err, GameError::NotPlaying);

    setup
        .sessions
        .start_game(&code, &ids[0], ContentSelector::Explicit(quiz_id))
        .await
        .unwrap();

    setup.sessions.submit_answer(&code, &ids[0], 1).await.unwrap();
    let err = setup.sessions.submit_answer(&code, &ids[0], 2).await.unwrap_err();
    assert_eq!(err, GameError::AlreadyAnswered);

    // unknown room
    let err = setup.sessions.submit_answer("NOPE99", &ids[0], 1).await.unwrap_err();
    assert_eq!(err, GameError::RoomNotFound { code: "NOPE99".to_string() });
}

#[tokio::test]
async fn test_advance_is_idempotent_for_the_same_index() {
    let setup = TestSetup::new();
    let quiz_id = setup.insert_quiz(3, 20).await;
    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let code = room.code.clone();

    setup
        .sessions
        .start_game(&code, &ids[0], ContentSelector::Explicit(quiz_id))
        .await
        .unwrap();

    let first = setup.sessions.advance_question(&code, 0).await.unwrap();
    assert_eq!(first, Advance::Next { question_index: 1 });
    let second = setup.sessions.advance_question(&code, 0).await.unwrap();
    assert_eq!(second, Advance::Stale);

    let room = setup.sessions.rooms().find_room_by_code(&code).await.unwrap();
    assert_eq!(room.current_question_index, 1);
}

#[tokio::test]
async fn test_concurrent_advance_triggers_produce_one_step() {
    let setup = TestSetup::new();
    let quiz_id = setup.insert_quiz(3, 20).await;
    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let code = room.code.clone();

    setup
        .sessions
        .start_game(&code, &ids[0], ContentSelector::Explicit(quiz_id))
        .await
        .unwrap();

    // the all-answered check and the timer check racing on question 0
    let s1 = setup.sessions.clone();
    let s2 = setup.sessions.clone();
    let c1 = code.clone();
    let c2 = code.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { s1.advance_question(&c1, 0).await }),
        tokio::spawn(async move { s2.advance_question(&c2, 0).await }),
    );
    let outcomes = [a.unwrap().unwrap(), b.unwrap().unwrap()];

    let steps = outcomes
        .iter()
        .filter(|o| matches!(o, Advance::Next { .. }))
        .count();
    let stale = outcomes.iter().filter(|o| **o == Advance::Stale).count();
    assert_eq!((steps, stale), (1, 1));

    let room = setup.sessions.rooms().find_room_by_code(&code).await.unwrap();
    assert_eq!(room.current_question_index, 1);
}

#[tokio::test]
async fn test_last_player_leaving_deletes_the_room() {
    let setup = TestSetup::new();
    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let code = room.code.clone();

    setup.sessions.leave_room(&code, &ids[1]).await;
    assert!(setup.sessions.rooms().find_room_by_code(&code).await.is_some());

    setup.sessions.leave_room(&code, &ids[0]).await;
    assert!(setup.sessions.rooms().find_room_by_code(&code).await.is_none());

    // driving a vanished room aborts silently with a not-found error
    let err = setup.sessions.advance_if_due(&code).await.unwrap_err();
    assert_eq!(err, GameError::RoomNotFound { code });
}

#[tokio::test]
async fn test_play_again_clones_content_into_fresh_room() {
    let setup = TestSetup::new();
    let quiz_id = setup.insert_quiz(1, 20).await;
    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let code = room.code.clone();

    setup
        .sessions
        .start_game(&code, &ids[0], ContentSelector::Explicit(quiz_id.clone()))
        .await
        .unwrap();
    setup.sessions.advance_question(&code, 0).await.unwrap();

    let fresh = setup
        .sessions
        .play_again(&code, "Ann", Some(ids[0].clone()))
        .await
        .unwrap();
    assert_ne!(fresh.code, code);
    assert_eq!(fresh.game_state, GameState::Waiting);
    assert_eq!(fresh.content_id.as_deref(), Some(quiz_id.as_str()));
    assert_eq!(fresh.players.len(), 1);

    // the finished room is untouched
    let old = setup.sessions.rooms().find_room_by_code(&code).await.unwrap();
    assert_eq!(old.game_state, GameState::Finished);
}

#[tokio::test]
async fn test_rejected_draft_is_not_persisted() {
    let setup = TestSetup::new();
    let mut quiz = build_quiz(1, 20);
    quiz.questions[0].answers[0].text = String::new();
    quiz.questions[0].answers[2].text = String::new();
    let id = quiz.id.clone();

    let before = setup.sessions.contents().find_by_user("system").await.len();
    let err = setup
        .sessions
        .save_content(Content::Quiz(quiz))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        quiz_types::ValidationError::EmptyAnswerText { number: 1 }
    );

    assert!(setup.sessions.contents().find_by_id(&id).await.is_none());
    assert_eq!(
        setup.sessions.contents().find_by_user("system").await.len(),
        before
    );
}

#[tokio::test]
async fn test_valid_draft_saves_and_reloads_identically() {
    let setup = TestSetup::new();
    let quiz = build_quiz(2, 30);
    let id = setup
        .sessions
        .save_content(Content::Quiz(quiz.clone()))
        .await
        .unwrap();

    let Content::Quiz(stored) = setup.sessions.contents().find_by_id(&id).await.unwrap()
    else {
        panic!("quiz came back as a poll")
    };
    assert_eq!(stored.questions.len(), quiz.questions.len());
    for (a, b) in stored.questions.iter().zip(&quiz.questions) {
        assert_eq!(a.text, b.text);
        assert_eq!(a.correct_index(), b.correct_index());
        assert_eq!(a.time_limit, b.time_limit);
    }
}

#[tokio::test]
async fn test_poll_game_accumulates_votes() {
    let setup = TestSetup::new();
    let poll = quiz_types::Poll {
        id: new_poll_id(),
        title: "Snack poll".to_string(),
        description: String::new(),
        category: "general".to_string(),
        questions: vec![PollQuestion {
            text: "Pick a snack".to_string(),
            options: vec![
                PollOption { text: "Chips".to_string(), votes: 0 },
                PollOption { text: "Fruit".to_string(), votes: 0 },
            ],
            multiple_choice: false,
            show_results: true,
        }],
        created_by: "system".to_string(),
        is_public: true,
        created_at: String::new(),
    };
    let poll_id = poll.id.clone();
    setup.sessions.contents().insert(Content::Poll(poll)).await;

    let (room, ids) = setup.room_with_players(&["Bob"]).await;
    let code = room.code.clone();
    setup
        .sessions
        .start_game(&code, &ids[0], ContentSelector::Explicit(poll_id.clone()))
        .await
        .unwrap();

    let outcome = setup.sessions.submit_answer(&code, &ids[0], 0).await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Recorded);
    setup.sessions.submit_answer(&code, &ids[1], 0).await.unwrap();

    let advance = setup.sessions.advance_if_due(&code).await.unwrap();
    let Some(Advance::Finished { winner_ids }) = advance else {
        panic!("single-question poll should finish, got {advance:?}");
    };
    // nobody scores in a poll, so everyone shares the win
    assert_eq!(winner_ids.len(), 2);

    let stored = setup.sessions.contents().find_by_id(&poll_id).await.unwrap();
    let Content::Poll(stored) = stored else { panic!("poll came back as a quiz") };
    assert_eq!(stored.questions[0].options[0].votes, 2);
    assert_eq!(stored.questions[0].options[1].votes, 0);
}
