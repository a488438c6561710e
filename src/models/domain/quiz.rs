use serde::{Deserialize, Serialize};

use crate::models::domain::question::{NewQuestion, Question};

/// A quiz with its full question and answer tree, ordered by id.
///
/// This is the shape served to clients and the shape cached in Redis; the
/// store keeps quizzes, questions and answers in separate collections and the
/// repository reassembles them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub questions: Vec<Question>,
}

/// Insert payload for a quiz and its nested tree; the repository assigns
/// all ids.
#[derive(Clone, Debug)]
pub struct NewQuiz {
    pub title: String,
    pub questions: Vec<NewQuestion>,
}
