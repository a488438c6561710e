use serde::{Deserialize, Serialize};

use crate::models::domain::answer::{Answer, NewAnswer};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: i64,
    /// Owning quiz.
    pub quiz_id: i64,
    pub text: String,
    pub answers: Vec<Answer>,
}

#[derive(Clone, Debug)]
pub struct NewQuestion {
    pub text: String,
    pub answers: Vec<NewAnswer>,
}
