use crate::models::domain::{Answer, Question, Quiz, User};

/// Builds an answer with generated text.
pub fn answer(id: i64, question_id: i64, is_correct: bool) -> Answer {
    Answer {
        id,
        question_id,
        text: format!("answer-{}", id),
        is_correct,
    }
}

/// Builds a question with generated text.
pub fn question(id: i64, quiz_id: i64, answers: Vec<Answer>) -> Question {
    Question {
        id,
        quiz_id,
        text: format!("question-{}", id),
        answers,
    }
}

/// A one-question quiz whose first answer is the correct one. Child ids are
/// derived from the quiz id so fixtures never collide.
pub fn sample_quiz(id: i64) -> Quiz {
    let question_id = id * 10;
    Quiz {
        id,
        title: format!("quiz-{}", id),
        questions: vec![question(
            question_id,
            id,
            vec![
                answer(question_id * 10, question_id, true),
                answer(question_id * 10 + 1, question_id, false),
            ],
        )],
    }
}

pub fn sample_user(id: i64, username: &str) -> User {
    User::new(
        id,
        username.to_string(),
        format!("{}@example.com", username),
        "$argon2id$fake-hash".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_quiz_ids_are_consistent() {
        let quiz = sample_quiz(3);
        assert_eq!(quiz.id, 3);
        assert_eq!(quiz.questions[0].quiz_id, 3);
        for answer in &quiz.questions[0].answers {
            assert_eq!(answer.question_id, quiz.questions[0].id);
        }
    }

    #[test]
    fn test_sample_quiz_has_exactly_one_correct_answer() {
        let quiz = sample_quiz(1);
        let correct = quiz.questions[0].answers.iter().filter(|a| a.is_correct).count();
        assert_eq!(correct, 1);
    }
}
