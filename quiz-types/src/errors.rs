use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RoomError {
    #[error("room {code} was not found, check the code")]
    NotFound { code: String },
    #[error("room {code} has no free seats, try another room")]
    Full { code: String },
    #[error("room code {code} is already taken")]
    CodeTaken { code: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("only the host can start the game")]
    NotHost,
    #[error("need at least {need} players to start, have {have}")]
    InsufficientPlayers { have: usize, need: usize },
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("the game is not accepting answers right now")]
    NotPlaying,
    #[error("you already answered this question")]
    AlreadyAnswered,
    #[error("player {id} is not in this room")]
    PlayerNotFound { id: String },
    #[error("room {code} was not found")]
    RoomNotFound { code: String },
    #[error("content {id} was not found")]
    ContentNotFound { id: String },
    #[error("content {id} has no questions to play")]
    UnplayableContent { id: String },
    #[error("answer {index} is out of range")]
    InvalidAnswer { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("enter a title of at least 3 characters")]
    TitleTooShort,
    #[error("add at least one question")]
    NoQuestions,
    #[error("question {number} has no text")]
    EmptyQuestionText { number: usize },
    #[error("question {number} has an empty answer slot")]
    EmptyAnswerText { number: usize },
    #[error("mark a correct answer for question {number}")]
    NoCorrectAnswer { number: usize },
    #[error("question {number} has more than one correct answer")]
    MultipleCorrectAnswers { number: usize },
    #[error("question {number} has an empty option slot")]
    EmptyOptionText { number: usize },
    #[error("enter a name of at least 2 characters")]
    NameTooShort,
    #[error("the password must be at least 6 characters")]
    WeakPassword,
    #[error("the name {username} is already taken")]
    UsernameTaken { username: String },
    #[error("room codes are 6 letters and digits")]
    BadRoomCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        let err = RoomError::Full { code: "ABC123".to_string() };
        assert_eq!(err.to_string(), "room ABC123 has no free seats, try another room");

        let err = GameError::InsufficientPlayers { have: 1, need: 2 };
        assert_eq!(err.to_string(), "need at least 2 players to start, have 1");

        let err = ValidationError::NoCorrectAnswer { number: 3 };
        assert_eq!(err.to_string(), "mark a correct answer for question 3");
    }

    #[test]
    fn test_capacity_distinct_from_not_found() {
        let full = RoomError::Full { code: "ABC123".to_string() };
        let missing = RoomError::NotFound { code: "ABC123".to_string() };
        assert_ne!(full, missing);
    }
}
