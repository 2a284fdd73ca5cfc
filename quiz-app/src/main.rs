use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use quiz_app::{Config, ContentSelector, GameDriver, SessionManager, SyncLoop};
use quiz_core::ContentEditor;
use quiz_persistence::{ContentStore, FileBackend, RoomRegistry, shared};
use quiz_types::{Answer, Content, RoomUpdate};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Neon Quiz...");

    let config = Config::new();
    let store = shared(ContentStore::open(Box::new(FileBackend::new(
        &config.data_path,
    ))));
    let sessions = Arc::new(SessionManager::new(store.clone()));

    // One stale-room sweep at startup; abandoned rooms do not pile up
    // across sessions.
    let swept = sessions
        .rooms()
        .cleanup_stale_rooms(Duration::from_secs(config.stale_room_hours * 3600))
        .await;
    info!("startup sweep removed {swept} stale rooms");

    // Author a short quiz through the editor gate.
    let mut quiz = ContentEditor::new_quiz_draft("system");
    quiz.title = "Demo round".to_string();
    quiz.category = "general".to_string();
    for (text, options, correct) in [
        ("What is 2 + 2?", ["3", "4", "5", "22"], 1),
        ("Which planet is closest to the Sun?", ["Mercury", "Venus", "Earth", "Mars"], 0),
    ] {
        let mut question = ContentEditor::blank_quiz_question();
        question.text = text.to_string();
        question.answers = options
            .iter()
            .enumerate()
            .map(|(i, o)| Answer { text: o.to_string(), correct: i == correct })
            .collect();
        question.time_limit = 3;
        quiz.questions.push(question);
    }
    let quiz_id = quiz.id.clone();
    let content = Content::Quiz(quiz);
    if let Err(e) = ContentEditor::validate(&content) {
        tracing::error!("demo quiz failed validation: {e}");
        std::process::exit(1);
    }
    sessions.contents().insert(content).await;

    // Host and two guests.
    let room = sessions
        .create_room("Ann", None, Some(quiz_id.clone()), config.default_time_limit)
        .await
        .expect("failed to create demo room");
    let code = room.code.clone();
    let ann = room.players[0].id.clone();
    info!("room {code} is open");

    let bob = sessions.join_room(&code, "Bob", None).await.unwrap();
    let cid = sessions.join_room(&code, "Cid", None).await.unwrap();

    // Room-list screen poll, independent of the room view below.
    let (list_tx, mut list_rx) = mpsc::unbounded_channel();
    let mut list_sync = SyncLoop::with_interval(
        RoomRegistry::new(store.clone()),
        Duration::from_secs(config.poll_interval_seconds),
    );
    list_sync.start_room_list_updates(list_tx);
    tokio::spawn(async move {
        while let Some(RoomUpdate::RoomList { rooms }) = list_rx.recv().await {
            info!("{} open rooms", rooms.len());
        }
    });

    // Lobby/in-game view fed by the polling loop; demo cadence is
    // faster than the 3 s production default.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sync = SyncLoop::with_interval(
        RoomRegistry::new(store.clone()),
        Duration::from_millis(500),
    );
    sync.start_room_updates(&code, tx);
    let view = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            match update {
                RoomUpdate::Lobby { player_count, max_players, .. } => {
                    info!("lobby: {player_count}/{max_players} players");
                }
                RoomUpdate::InGame { question_index, seconds_remaining, players, .. } => {
                    let answered = players.iter().filter(|p| p.answered).count();
                    info!(
                        "question {}: {answered}/{} answered, {:?}s left",
                        question_index + 1,
                        players.len(),
                        seconds_remaining
                    );
                }
                RoomUpdate::Finished { results, .. } => {
                    for (rank, player) in results.iter().enumerate() {
                        info!("#{} {} with {} points", rank + 1, player.name, player.score);
                    }
                    break;
                }
                RoomUpdate::RoomGone { code } => {
                    info!("room {code} disappeared");
                    break;
                }
                RoomUpdate::RoomList { .. } => {}
            }
        }
    });

    sessions
        .start_game(&code, &ann, ContentSelector::Explicit(quiz_id))
        .await
        .unwrap();

    let mut driver = GameDriver::with_interval(
        sessions.clone(),
        Duration::from_millis(config.advance_interval_millis.min(250)),
    );
    driver.start(&code);

    // Question 1: Ann is right, Bob is wrong, Cid sleeps through it and
    // the timer forces the advance.
    tokio::time::sleep(Duration::from_millis(800)).await;
    sessions.submit_answer(&code, &ann, 1).await.unwrap();
    sessions.submit_answer(&code, &bob.id, 3).await.unwrap();

    // Question 2: everyone answers and the room advances early.
    tokio::time::sleep(Duration::from_secs(4)).await;
    sessions.submit_answer(&code, &ann, 0).await.unwrap();
    sessions.submit_answer(&code, &bob.id, 0).await.unwrap();
    sessions.submit_answer(&code, &cid.id, 2).await.unwrap();

    let _ = view.await;
    driver.stop();
    sync.stop_updates();
    list_sync.stop_updates();

    sessions.leave_room(&code, &cid.id).await;
    sessions.leave_room(&code, &bob.id).await;
    sessions.leave_room(&code, &ann).await;
    info!("demo complete");
}
