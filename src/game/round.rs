use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

use crate::console::{select, Console};
use crate::error::GameError;
use crate::game::random::{pick, shuffle};
use crate::model::{Answer, Category, Question};
use crate::store::Catalog;

/// Outcome of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub correct: bool,
    pub time: Duration,
}

/// Plays a single question at a given difficulty level.
pub trait RoundResolver {
    fn start_round(&mut self, level: u32, console: &mut dyn Console)
        -> Result<RoundResult, GameError>;
}

impl<R: RoundResolver + ?Sized> RoundResolver for &mut R {
    fn start_round(
        &mut self,
        level: u32,
        console: &mut dyn Console,
    ) -> Result<RoundResult, GameError> {
        (**self).start_round(level, console)
    }
}

/// Shuffled answers for a question plus the id of the correct one.
#[derive(Debug, Clone)]
pub struct AnswerChoices {
    pub correct: String,
    pub choices: Vec<Answer>,
}

/// Draws questions from the catalog: a random category of the level, a random
/// question of that category, answers in random order.
pub struct CatalogRoundResolver<R> {
    catalog: Rc<Catalog>,
    rng: R,
}

impl<R: Rng> CatalogRoundResolver<R> {
    pub fn new(catalog: Rc<Catalog>, rng: R) -> Self {
        Self { catalog, rng }
    }

    pub fn random_category(&mut self, level: u32) -> Result<Category, GameError> {
        let level_record = self
            .catalog
            .level_by_value(level)?
            .ok_or_else(|| GameError::MissingContent(format!("level {level} does not exist")))?;
        let categories = self.catalog.categories_by_level(&level_record.id)?;
        pick(&mut self.rng, &categories)
            .cloned()
            .ok_or_else(|| GameError::MissingContent(format!("level {level} has no categories")))
    }

    pub fn random_question(&mut self, category: &Category) -> Result<Question, GameError> {
        let questions = self.catalog.questions_by_category(&category.id)?;
        pick(&mut self.rng, &questions).cloned().ok_or_else(|| {
            GameError::MissingContent(format!("category '{}' has no questions", category.name))
        })
    }

    pub fn answer_choices(&mut self, question: &Question) -> Result<AnswerChoices, GameError> {
        let mut choices = self.catalog.answers_by_question(&question.id)?;
        let correct = choices
            .iter()
            .find(|a| a.is_correct)
            .map(|a| a.id.clone())
            .ok_or_else(|| {
                GameError::MissingContent(format!(
                    "question '{}' has no correct answer",
                    question.text
                ))
            })?;
        shuffle(&mut self.rng, &mut choices);
        Ok(AnswerChoices { correct, choices })
    }
}

impl<R: Rng> RoundResolver for CatalogRoundResolver<R> {
    fn start_round(
        &mut self,
        level: u32,
        console: &mut dyn Console,
    ) -> Result<RoundResult, GameError> {
        let category = self.random_category(level)?;
        let question = self.random_question(&category)?;
        let answers = self.answer_choices(&question)?;
        debug!(
            "Round at level {level}: category '{}', question {}",
            category.name, question.id
        );

        console.say(&format!("Level {level} | {}\n", category.name))?;
        let labels: Vec<String> = answers.choices.iter().map(|a| a.text.clone()).collect();

        let started = Instant::now();
        let picked = select(console, &question.text, &labels)?;
        let time = started.elapsed();

        let correct = answers.choices[picked].id == answers.correct;
        info!("Level {level} answered in {time:?} (correct={correct})");
        Ok(RoundResult { correct, time })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::console::ScriptedConsole;
    use crate::model::Level;

    struct Fixture {
        catalog: Rc<Catalog>,
        question: Question,
    }

    fn fixture() -> Fixture {
        let catalog = Catalog::in_memory();
        let level = Level::new(1, 100);
        let category = Category::new("Geography", &level.id);
        let question = Question::new("Capital of France?", &category.id);
        catalog.levels.add(level).unwrap();
        catalog.categories.add(category).unwrap();
        catalog.questions.add(question.clone()).unwrap();
        for (text, ok) in [("Paris", true), ("Lyon", false), ("Nice", false), ("Lille", false)] {
            catalog
                .answers
                .add(Answer::new(text, &question.id, ok))
                .unwrap();
        }
        Fixture {
            catalog: Rc::new(catalog),
            question,
        }
    }

    /// Script line that selects `text` in the rendered choice list.
    fn line_for(output: &str, text: &str) -> String {
        output
            .lines()
            .find_map(|l| l.trim().strip_suffix(text)?.strip_suffix(". ").map(str::to_string))
            .unwrap()
    }

    #[test]
    fn test_answer_choices_keep_all_answers() {
        let fx = fixture();
        let mut resolver = CatalogRoundResolver::new(fx.catalog.clone(), StdRng::seed_from_u64(1));
        let choices = resolver.answer_choices(&fx.question).unwrap();

        assert_eq!(choices.choices.len(), 4);
        let correct: Vec<&Answer> = choices.choices.iter().filter(|a| a.is_correct).collect();
        assert_eq!(correct.len(), 1);
        assert_eq!(correct[0].id, choices.correct);
    }

    #[test]
    fn test_round_reports_correct_pick() {
        let fx = fixture();
        let seed = 42;

        // Same seed, same shuffle: render once to learn the position of "Paris".
        let mut probe = ScriptedConsole::new(&["1"]);
        CatalogRoundResolver::new(fx.catalog.clone(), StdRng::seed_from_u64(seed))
            .start_round(1, &mut probe)
            .unwrap();
        let paris = line_for(&probe.output, "Paris");
        let lyon = line_for(&probe.output, "Lyon");

        let mut console = ScriptedConsole::new(&[paris.as_str()]);
        let result = CatalogRoundResolver::new(fx.catalog.clone(), StdRng::seed_from_u64(seed))
            .start_round(1, &mut console)
            .unwrap();
        assert!(result.correct);
        assert!(console.output.contains("Capital of France?"));

        let mut console = ScriptedConsole::new(&[lyon.as_str()]);
        let result = CatalogRoundResolver::new(fx.catalog.clone(), StdRng::seed_from_u64(seed))
            .start_round(1, &mut console)
            .unwrap();
        assert!(!result.correct);
    }

    #[test]
    fn test_missing_content_is_reported() {
        let fx = fixture();
        let mut resolver = CatalogRoundResolver::new(fx.catalog.clone(), StdRng::seed_from_u64(1));
        let mut console = ScriptedConsole::new(&["1"]);

        let err = resolver.start_round(2, &mut console).unwrap_err();
        assert!(matches!(err, GameError::MissingContent(_)));

        let lonely = Level::new(3, 300);
        fx.catalog.levels.add(lonely.clone()).unwrap();
        fx.catalog
            .categories
            .add(Category::new("Empty", &lonely.id))
            .unwrap();
        let err = resolver.start_round(3, &mut console).unwrap_err();
        assert!(err.to_string().contains("no questions"));
    }

    #[test]
    fn test_question_without_correct_answer() {
        let fx = fixture();
        let ids: Vec<String> = fx
            .catalog
            .answers_by_question(&fx.question.id)
            .unwrap()
            .into_iter()
            .filter(|a| a.is_correct)
            .map(|a| a.id)
            .collect();
        fx.catalog.answers.delete_many(&ids).unwrap();

        let mut resolver = CatalogRoundResolver::new(fx.catalog.clone(), StdRng::seed_from_u64(1));
        let err = resolver.answer_choices(&fx.question).unwrap_err();
        assert!(err.to_string().contains("no correct answer"));
    }
}
