use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub id: i64,
    /// Owning question.
    pub question_id: i64,
    pub text: String,
    /// Scoring flag. Nothing stops several answers of one question carrying
    /// it; the scorer takes the first by id order.
    pub is_correct: bool,
}

#[derive(Clone, Debug)]
pub struct NewAnswer {
    pub text: String,
    pub is_correct: bool,
}
