use std::rc::Rc;

use anyhow::Result;
use log::warn;

use crate::console::Console;
use crate::controller::report;
use crate::error::StoreError;
use crate::model::{Answer, Question};
use crate::nav::node::{Controller, NewRecord, Outcome, Payload, Token};
use crate::store::Catalog;
use crate::view::table::TableRow;

/// Wrong options every question carries next to its correct answer.
pub const WRONG_ANSWERS: usize = 3;

pub struct QuestionController {
    catalog: Rc<Catalog>,
}

impl QuestionController {
    pub fn new(catalog: Rc<Catalog>) -> Self {
        Self { catalog }
    }

    fn invalid(reason: impl Into<String>) -> StoreError {
        StoreError::Invalid {
            kind: "question",
            reason: reason.into(),
        }
    }

    /// Store a question together with its answers; exactly one is correct.
    pub fn add(
        &self,
        text: &str,
        category: &str,
        correct: &str,
        wrong: &[String],
    ) -> Result<Question, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Self::invalid("text must not be empty"));
        }
        if wrong.len() != WRONG_ANSWERS {
            return Err(Self::invalid(format!(
                "expected {WRONG_ANSWERS} wrong answers, got {}",
                wrong.len()
            )));
        }
        if correct.trim().is_empty() || wrong.iter().any(|w| w.trim().is_empty()) {
            return Err(Self::invalid("answers must not be empty"));
        }
        if self.catalog.categories.get(category)?.is_none() {
            return Err(Self::invalid(format!("category {category} does not exist")));
        }

        let question = Question::new(text, category);
        let answers: Vec<Answer> = std::iter::once(Answer::new(correct.trim(), &question.id, true))
            .chain(
                wrong
                    .iter()
                    .map(|w| Answer::new(w.trim(), &question.id, false)),
            )
            .collect();

        self.catalog.questions.add(question.clone())?;
        let mut written = Vec::with_capacity(answers.len());
        for answer in answers {
            let id = answer.id.clone();
            if let Err(e) = self.catalog.answers.add(answer) {
                self.rollback(&question.id, &written);
                return Err(e);
            }
            written.push(id);
        }
        Ok(question)
    }

    /// Undo a half-written question so no question is left without its
    /// answers. Best effort: the original write error is what gets reported.
    fn rollback(&self, question: &str, answers: &[String]) {
        if let Err(e) = self.catalog.answers.delete_many(answers) {
            warn!("Could not remove answers of unfinished question {question}: {e}");
        }
        if let Err(e) = self.catalog.questions.delete_many(&[question.to_string()]) {
            warn!("Could not remove unfinished question {question}: {e}");
        }
    }

    /// Remove questions and every answer that belongs to them.
    pub fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let removed = self.catalog.questions.delete_many(ids)?;
        let orphaned: Vec<String> = self
            .catalog
            .answers
            .filter(&|a| ids.contains(&a.question))?
            .into_iter()
            .map(|a| a.id)
            .collect();
        self.catalog.answers.delete_many(&orphaned)?;
        Ok(removed)
    }

    /// Questions sorted by category name then text, as `text | category` rows.
    pub fn table_rows(&self) -> Result<Vec<TableRow>, StoreError> {
        let categories = self.catalog.categories.list()?;
        let mut rows: Vec<(String, Question)> = self
            .catalog
            .questions
            .list()?
            .into_iter()
            .map(|q| {
                let name = categories
                    .iter()
                    .find(|c| c.id == q.category)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "?".to_string());
                (name, q)
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.text.cmp(&b.1.text)));
        Ok(rows
            .into_iter()
            .map(|(name, q)| TableRow::new(q.id, vec![q.text, name]))
            .collect())
    }
}

impl Controller for QuestionController {
    fn process(&self, outcome: Outcome, console: &mut dyn Console) -> Result<Token> {
        match outcome {
            Outcome::Token(token) => return Ok(token),
            Outcome::Payload(Payload::Add(NewRecord::Question {
                text,
                category,
                correct,
                wrong,
            })) => {
                let result = self
                    .add(&text, &category, &correct, &wrong)
                    .map(|q| format!("question '{}'", q.text));
                report(console, "add question", result)?;
            }
            Outcome::Payload(Payload::Delete(ids)) => {
                let result = self.delete(&ids).map(|n| format!("{n} questions removed"));
                report(console, "delete questions", result)?;
            }
            Outcome::Payload(other) => warn!("Question controller ignored {other:?}"),
        }
        Ok(Token::Back)
    }
}
