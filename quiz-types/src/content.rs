use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories offered by the editor, in display order.
pub const CATEGORIES: &[&str] = &[
    "general",
    "science",
    "history",
    "geography",
    "entertainment",
    "sports",
    "art",
    "technology",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub text: String,
    pub answers: Vec<Answer>,
    /// Seconds to answer; 0 means untimed.
    pub time_limit: u32,
}

impl QuizQuestion {
    pub fn correct_index(&self) -> Option<usize> {
        self.answers.iter().position(|a| a.correct)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
    pub created_by: String,
    pub is_public: bool,
    pub created_at: String, // ISO 8601 string
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollQuestion {
    pub text: String,
    pub options: Vec<PollOption>,
    pub multiple_choice: bool,
    pub show_results: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub questions: Vec<PollQuestion>,
    pub created_by: String,
    pub is_public: bool,
    pub created_at: String, // ISO 8601 string
}

/// A playable content aggregate: either a quiz or a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Quiz(Quiz),
    Poll(Poll),
}

impl Content {
    pub fn id(&self) -> &str {
        match self {
            Content::Quiz(q) => &q.id,
            Content::Poll(p) => &p.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Content::Quiz(q) => &q.title,
            Content::Poll(p) => &p.title,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            Content::Quiz(q) => &q.category,
            Content::Poll(p) => &p.category,
        }
    }

    pub fn created_by(&self) -> &str {
        match self {
            Content::Quiz(q) => &q.created_by,
            Content::Poll(p) => &p.created_by,
        }
    }

    pub fn is_public(&self) -> bool {
        match self {
            Content::Quiz(q) => q.is_public,
            Content::Poll(p) => p.is_public,
        }
    }

    pub fn question_count(&self) -> usize {
        match self {
            Content::Quiz(q) => q.questions.len(),
            Content::Poll(p) => p.questions.len(),
        }
    }

    pub fn question_text(&self, index: usize) -> Option<&str> {
        match self {
            Content::Quiz(q) => q.questions.get(index).map(|q| q.text.as_str()),
            Content::Poll(p) => p.questions.get(index).map(|q| q.text.as_str()),
        }
    }

    /// Per-question time limit override; only quiz questions carry one.
    pub fn question_time_limit(&self, index: usize) -> Option<u32> {
        match self {
            Content::Quiz(q) => q.questions.get(index).map(|q| q.time_limit),
            Content::Poll(_) => None,
        }
    }
}

pub fn new_quiz_id() -> String {
    format!("quiz_{}", Uuid::new_v4())
}

pub fn new_poll_id() -> String {
    format!("poll_{}", Uuid::new_v4())
}
