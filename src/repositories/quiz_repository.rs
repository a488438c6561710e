use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{Database, Sequences},
    errors::AppResult,
    models::domain::{Answer, NewQuiz, Question, Quiz},
};

/// Persistence for the quiz aggregate. Quizzes, questions and answers live in
/// three collections joined by id back-references; reads reassemble the full
/// tree ordered by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Quiz>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>>;
    /// Persists a quiz tree, assigning fresh ids throughout, and returns it.
    async fn insert(&self, quiz: NewQuiz) -> AppResult<Quiz>;
    async fn update_title(&self, id: i64, title: &str) -> AppResult<bool>;
    async fn delete_answer(&self, id: i64) -> AppResult<bool>;
    async fn delete_question(&self, id: i64) -> AppResult<bool>;
    /// Removes the quiz document only; callers are responsible for the
    /// children.
    async fn delete_quiz(&self, id: i64) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct QuizDoc {
    id: i64,
    title: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct QuestionDoc {
    id: i64,
    quiz_id: i64,
    text: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct AnswerDoc {
    id: i64,
    question_id: i64,
    text: String,
    is_correct: bool,
}

impl From<AnswerDoc> for Answer {
    fn from(doc: AnswerDoc) -> Self {
        Answer {
            id: doc.id,
            question_id: doc.question_id,
            text: doc.text,
            is_correct: doc.is_correct,
        }
    }
}

impl QuestionDoc {
    fn into_question(self, answers: Vec<Answer>) -> Question {
        Question {
            id: self.id,
            quiz_id: self.quiz_id,
            text: self.text,
            answers,
        }
    }
}

pub struct MongoQuizRepository {
    quizzes: Collection<QuizDoc>,
    questions: Collection<QuestionDoc>,
    answers: Collection<AnswerDoc>,
    sequences: Sequences,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            quizzes: db.get_collection("quizzes"),
            questions: db.get_collection("questions"),
            answers: db.get_collection("answers"),
            sequences: Sequences::new(db),
        }
    }

    async fn load_questions(&self, filter: mongodb::bson::Document) -> AppResult<Vec<QuestionDoc>> {
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let cursor = self.questions.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn load_answers(&self, filter: mongodb::bson::Document) -> AppResult<Vec<AnswerDoc>> {
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let cursor = self.answers.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Groups pre-sorted question and answer rows under their parents; the
    /// per-parent ordering survives because the inputs arrive id-sorted.
    fn assemble(
        quiz_docs: Vec<QuizDoc>,
        question_docs: Vec<QuestionDoc>,
        answer_docs: Vec<AnswerDoc>,
    ) -> Vec<Quiz> {
        let mut answers_by_question: HashMap<i64, Vec<Answer>> = HashMap::new();
        for doc in answer_docs {
            answers_by_question
                .entry(doc.question_id)
                .or_default()
                .push(doc.into());
        }

        let mut questions_by_quiz: HashMap<i64, Vec<Question>> = HashMap::new();
        for doc in question_docs {
            let answers = answers_by_question.remove(&doc.id).unwrap_or_default();
            questions_by_quiz
                .entry(doc.quiz_id)
                .or_default()
                .push(doc.into_question(answers));
        }

        quiz_docs
            .into_iter()
            .map(|doc| Quiz {
                questions: questions_by_quiz.remove(&doc.id).unwrap_or_default(),
                id: doc.id,
                title: doc.title,
            })
            .collect()
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let cursor = self.quizzes.find(doc! {}).with_options(options).await?;
        let quiz_docs: Vec<QuizDoc> = cursor.try_collect().await?;

        let question_docs = self.load_questions(doc! {}).await?;
        let answer_docs = self.load_answers(doc! {}).await?;

        Ok(Self::assemble(quiz_docs, question_docs, answer_docs))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>> {
        let Some(quiz_doc) = self.quizzes.find_one(doc! { "id": id }).await? else {
            return Ok(None);
        };

        let question_docs = self.load_questions(doc! { "quiz_id": id }).await?;
        let question_ids: Vec<i64> = question_docs.iter().map(|q| q.id).collect();
        let answer_docs = self
            .load_answers(doc! { "question_id": { "$in": question_ids } })
            .await?;

        Ok(Self::assemble(vec![quiz_doc], question_docs, answer_docs).pop())
    }

    async fn insert(&self, quiz: NewQuiz) -> AppResult<Quiz> {
        let quiz_id = self.sequences.next_id("quizzes").await?;

        let mut questions = Vec::with_capacity(quiz.questions.len());
        for new_question in quiz.questions {
            let question_id = self.sequences.next_id("questions").await?;
            let mut answers = Vec::with_capacity(new_question.answers.len());
            for new_answer in new_question.answers {
                answers.push(Answer {
                    id: self.sequences.next_id("answers").await?,
                    question_id,
                    text: new_answer.text,
                    is_correct: new_answer.is_correct,
                });
            }
            questions.push(Question {
                id: question_id,
                quiz_id,
                text: new_question.text,
                answers,
            });
        }

        self.quizzes
            .insert_one(&QuizDoc {
                id: quiz_id,
                title: quiz.title.clone(),
            })
            .await?;

        let question_docs: Vec<QuestionDoc> = questions
            .iter()
            .map(|q| QuestionDoc {
                id: q.id,
                quiz_id: q.quiz_id,
                text: q.text.clone(),
            })
            .collect();
        if !question_docs.is_empty() {
            self.questions.insert_many(&question_docs).await?;
        }

        let answer_docs: Vec<AnswerDoc> = questions
            .iter()
            .flat_map(|q| q.answers.iter())
            .map(|a| AnswerDoc {
                id: a.id,
                question_id: a.question_id,
                text: a.text.clone(),
                is_correct: a.is_correct,
            })
            .collect();
        if !answer_docs.is_empty() {
            self.answers.insert_many(&answer_docs).await?;
        }

        Ok(Quiz {
            id: quiz_id,
            title: quiz.title,
            questions,
        })
    }

    async fn update_title(&self, id: i64, title: &str) -> AppResult<bool> {
        let result = self
            .quizzes
            .update_one(doc! { "id": id }, doc! { "$set": { "title": title } })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_answer(&self, id: i64) -> AppResult<bool> {
        let result = self.answers.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_question(&self, id: i64) -> AppResult<bool> {
        let result = self.questions.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_quiz(&self, id: i64) -> AppResult<bool> {
        let result = self.quizzes.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz collections");

        let id_unique = || {
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };
        self.quizzes.create_index(id_unique()).await?;
        self.questions.create_index(id_unique()).await?;
        self.answers.create_index(id_unique()).await?;

        // Children are always looked up through their parent
        self.questions
            .create_index(IndexModel::builder().keys(doc! { "quiz_id": 1 }).build())
            .await?;
        self.answers
            .create_index(IndexModel::builder().keys(doc! { "question_id": 1 }).build())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_doc(id: i64, question_id: i64, is_correct: bool) -> AnswerDoc {
        AnswerDoc {
            id,
            question_id,
            text: format!("answer-{}", id),
            is_correct,
        }
    }

    fn question_doc(id: i64, quiz_id: i64) -> QuestionDoc {
        QuestionDoc {
            id,
            quiz_id,
            text: format!("question-{}", id),
        }
    }

    #[test]
    fn test_assemble_groups_children_under_parents() {
        let quizzes = vec![
            QuizDoc {
                id: 1,
                title: "first".to_string(),
            },
            QuizDoc {
                id: 2,
                title: "second".to_string(),
            },
        ];
        let questions = vec![question_doc(10, 1), question_doc(11, 1), question_doc(12, 2)];
        let answers = vec![
            answer_doc(100, 10, true),
            answer_doc(101, 10, false),
            answer_doc(102, 11, true),
            answer_doc(103, 12, false),
        ];

        let assembled = MongoQuizRepository::assemble(quizzes, questions, answers);

        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].questions.len(), 2);
        assert_eq!(assembled[0].questions[0].answers.len(), 2);
        assert_eq!(assembled[0].questions[1].answers.len(), 1);
        assert_eq!(assembled[1].questions.len(), 1);
        assert_eq!(assembled[1].questions[0].answers[0].id, 103);
    }

    #[test]
    fn test_assemble_preserves_id_order_within_parents() {
        let quizzes = vec![QuizDoc {
            id: 1,
            title: "ordered".to_string(),
        }];
        let questions = vec![question_doc(10, 1), question_doc(11, 1)];
        let answers = vec![
            answer_doc(100, 10, false),
            answer_doc(101, 10, true),
            answer_doc(102, 10, false),
        ];

        let assembled = MongoQuizRepository::assemble(quizzes, questions, answers);

        let ids: Vec<i64> = assembled[0].questions[0].answers.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
    }

    #[test]
    fn test_assemble_tolerates_childless_nodes() {
        let quizzes = vec![QuizDoc {
            id: 1,
            title: "empty".to_string(),
        }];

        let assembled = MongoQuizRepository::assemble(quizzes, vec![], vec![]);

        assert_eq!(assembled.len(), 1);
        assert!(assembled[0].questions.is_empty());
    }
}
