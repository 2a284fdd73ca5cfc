use chrono::Utc;
use quiz_types::{
    Answer, Content, Difficulty, Poll, PollOption, PollQuestion, Quiz, QuizQuestion,
    ValidationError, new_poll_id, new_quiz_id,
};

/// Default seconds-per-question for freshly authored quiz questions.
pub const DEFAULT_QUESTION_TIME: u32 = 20;
const ANSWER_SLOTS: usize = 4;

/// Validation gate in front of content persistence. A draft that fails
/// any rule is rejected whole; nothing is partially saved.
pub struct ContentEditor;

impl ContentEditor {
    pub fn validate(content: &Content) -> Result<(), ValidationError> {
        if content.title().trim().chars().count() < 3 {
            return Err(ValidationError::TitleTooShort);
        }
        if content.question_count() == 0 {
            return Err(ValidationError::NoQuestions);
        }
        match content {
            Content::Quiz(quiz) => Self::validate_quiz_questions(quiz),
            Content::Poll(poll) => Self::validate_poll_questions(poll),
        }
    }

    fn validate_quiz_questions(quiz: &Quiz) -> Result<(), ValidationError> {
        for (i, question) in quiz.questions.iter().enumerate() {
            let number = i + 1;
            if question.text.trim().is_empty() {
                return Err(ValidationError::EmptyQuestionText { number });
            }
            if question.answers.iter().any(|a| a.text.trim().is_empty()) {
                return Err(ValidationError::EmptyAnswerText { number });
            }
            match question.answers.iter().filter(|a| a.correct).count() {
                0 => return Err(ValidationError::NoCorrectAnswer { number }),
                1 => {}
                _ => return Err(ValidationError::MultipleCorrectAnswers { number }),
            }
        }
        Ok(())
    }

    fn validate_poll_questions(poll: &Poll) -> Result<(), ValidationError> {
        for (i, question) in poll.questions.iter().enumerate() {
            let number = i + 1;
            if question.text.trim().is_empty() {
                return Err(ValidationError::EmptyQuestionText { number });
            }
            if question.options.iter().any(|o| o.text.trim().is_empty()) {
                return Err(ValidationError::EmptyOptionText { number });
            }
        }
        Ok(())
    }

    /// Fresh quiz draft; questions are added one at a time.
    pub fn new_quiz_draft(created_by: &str) -> Quiz {
        Quiz {
            id: new_quiz_id(),
            title: String::new(),
            description: String::new(),
            category: "general".to_string(),
            difficulty: Difficulty::Medium,
            questions: Vec::new(),
            created_by: created_by.to_string(),
            is_public: true,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Fresh poll draft, pre-seeded with one blank question.
    pub fn new_poll_draft(created_by: &str) -> Poll {
        Poll {
            id: new_poll_id(),
            title: String::new(),
            description: String::new(),
            category: "general".to_string(),
            questions: vec![Self::blank_poll_question()],
            created_by: created_by.to_string(),
            is_public: true,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn blank_quiz_question() -> QuizQuestion {
        QuizQuestion {
            text: String::new(),
            answers: (0..ANSWER_SLOTS)
                .map(|_| Answer { text: String::new(), correct: false })
                .collect(),
            time_limit: DEFAULT_QUESTION_TIME,
        }
    }

    pub fn blank_poll_question() -> PollQuestion {
        PollQuestion {
            text: String::new(),
            options: (0..ANSWER_SLOTS)
                .map(|_| PollOption { text: String::new(), votes: 0 })
                .collect(),
            multiple_choice: false,
            show_results: true,
        }
    }

    /// Stand-in quiz used when a game starts and no content exists yet.
    pub fn placeholder_quiz(category: &str, created_by: &str) -> Quiz {
        let question = |text: &str, options: [&str; 4], correct: usize| QuizQuestion {
            text: text.to_string(),
            answers: options
                .iter()
                .enumerate()
                .map(|(i, o)| Answer { text: o.to_string(), correct: i == correct })
                .collect(),
            time_limit: DEFAULT_QUESTION_TIME,
        };
        Quiz {
            id: new_quiz_id(),
            title: "General knowledge warm-up".to_string(),
            description: "A quick starter round".to_string(),
            category: category.to_string(),
            difficulty: Difficulty::Easy,
            questions: vec![
                question(
                    "How many planets are in the Solar System?",
                    ["7", "8", "9", "10"],
                    1,
                ),
                question(
                    "Which ocean is the largest?",
                    ["Atlantic", "Indian", "Pacific", "Arctic"],
                    2,
                ),
                question(
                    "How many continents are there?",
                    ["5", "6", "7", "8"],
                    2,
                ),
            ],
            created_by: created_by.to_string(),
            is_public: true,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
