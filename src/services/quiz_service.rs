use std::{collections::HashMap, sync::Arc};

use validator::Validate;

use crate::{
    cache::QuizCache,
    errors::{AppError, AppResult},
    models::{
        domain::Quiz,
        dto::{
            request::{CreateQuizRequest, SubmitQuizRequest, UpdateQuizTitleRequest},
            response::QuizResult,
        },
    },
    repositories::QuizRepository,
};

/// Quiz CRUD, submission grading and the cache discipline around them.
pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    cache: QuizCache,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>, cache: QuizCache) -> Self {
        Self { repository, cache }
    }

    pub async fn get_all_quizzes(&self) -> AppResult<Vec<Quiz>> {
        self.cache.get_all().await
    }

    pub async fn get_quiz(&self, id: i64) -> AppResult<Quiz> {
        self.cache
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let quiz = self.repository.insert(request.into()).await?;
        self.cache.invalidate_on_create().await?;

        Ok(quiz)
    }

    /// Renames a quiz in the store without touching the cache. A cached tree
    /// keeps serving the old title until its entry expires.
    pub async fn update_quiz_title(&self, id: i64, request: UpdateQuizTitleRequest) -> AppResult<()> {
        request.validate()?;

        if !self.repository.update_title(id, &request.title).await? {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }

        Ok(())
    }

    /// Grades a submission against the cached tree.
    pub async fn submit_quiz(&self, id: i64, request: SubmitQuizRequest) -> AppResult<QuizResult> {
        let quiz = self.get_quiz(id).await?;
        Ok(score_submission(&quiz, &request.answers))
    }

    /// Deletes a quiz bottom-up: answers, then questions, then the quiz
    /// itself, then both cache entries. The steps are separate writes with no
    /// surrounding transaction; a failure partway leaves the quiz present
    /// with part of its tree already gone. Returns false when the quiz never
    /// existed.
    pub async fn delete_quiz(&self, id: i64) -> AppResult<bool> {
        let Some(quiz) = self.repository.find_by_id(id).await? else {
            return Ok(false);
        };

        for question in &quiz.questions {
            for answer in &question.answers {
                self.repository.delete_answer(answer.id).await?;
            }
        }
        for question in &quiz.questions {
            self.repository.delete_question(question.id).await?;
        }
        let removed = self.repository.delete_quiz(id).await?;

        self.cache.invalidate_on_delete(id).await?;

        Ok(removed)
    }
}

/// Scores one submission. Each question is worth one point, granted when the
/// submitted answer id matches that question's correct answer; the total is
/// the quiz's question count regardless of how much was answered.
///
/// The correct answer is the first one in id order with `is_correct` set.
/// Questions without any flagged answer can never score.
pub fn score_submission(quiz: &Quiz, answers: &HashMap<i64, i64>) -> QuizResult {
    let mut score = 0;

    for question in &quiz.questions {
        let correct = question.answers.iter().find(|a| a.is_correct);
        let submitted = answers.get(&question.id);

        if let (Some(correct), Some(submitted)) = (correct, submitted) {
            if correct.id == *submitted {
                score += 1;
            }
        }
    }

    QuizResult {
        score,
        total: quiz.questions.len() as u32,
    }
}
