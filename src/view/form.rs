use anyhow::Result;

use crate::console::{input, pause, select, Console};
use crate::controller::question::WRONG_ANSWERS;
use crate::model::{Category, Level};
use crate::nav::node::{NewRecord, Outcome, Payload, Token, View};

fn required(what: &'static str) -> impl Fn(&str) -> Result<(), String> {
    move |value: &str| {
        if value.is_empty() {
            Err(format!("{what} is required."))
        } else {
            Ok(())
        }
    }
}

/// Forms that need records which do not exist yet show why and go back.
fn nothing_to_pick(console: &mut dyn Console, message: &str) -> Result<Outcome> {
    console.say(message)?;
    pause(console)?;
    Ok(Token::Back.into())
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

pub struct CategoryForm {
    levels: Vec<Level>,
}

impl CategoryForm {
    /// `levels` ordered by difficulty.
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }
}

impl View for CategoryForm {
    fn run(&mut self, console: &mut dyn Console) -> Result<Outcome> {
        if self.levels.is_empty() {
            return nothing_to_pick(console, "Create a level before adding categories.");
        }
        let name = input(console, "Enter category name: ", &required("A name"))?;
        let options: Vec<String> = self
            .levels
            .iter()
            .map(|l| format!("Level {} (${})", l.value, l.prize))
            .collect();
        let picked = select(console, "Select the level of difficulty:", &options)?;

        Ok(Payload::Add(NewRecord::Category {
            name,
            level: self.levels[picked].id.clone(),
        })
        .into())
    }
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

pub struct QuestionForm {
    categories: Vec<Category>,
}

impl QuestionForm {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }
}

impl View for QuestionForm {
    fn run(&mut self, console: &mut dyn Console) -> Result<Outcome> {
        if self.categories.is_empty() {
            return nothing_to_pick(console, "Create a category before adding questions.");
        }
        let text = input(console, "Enter question text: ", &required("The question"))?;
        console.say(&format!(
            "Each question has {} answer options and only one of them is valid.",
            WRONG_ANSWERS + 1
        ))?;
        let correct = input(console, "  Correct option: ", &required("The correct option"))?;
        let mut wrong = Vec::with_capacity(WRONG_ANSWERS);
        for n in 1..=WRONG_ANSWERS {
            let prompt = format!("  Wrong choice {n}: ");
            wrong.push(input(console, &prompt, &required("Every option"))?);
        }
        let names: Vec<String> = self.categories.iter().map(|c| c.name.clone()).collect();
        let picked = select(console, "Select a category:", &names)?;

        Ok(Payload::Add(NewRecord::Question {
            text,
            category: self.categories[picked].id.clone(),
            correct,
            wrong,
        })
        .into())
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

pub struct LevelForm {
    existing: Vec<Level>,
}

impl LevelForm {
    pub fn new(existing: Vec<Level>) -> Self {
        Self { existing }
    }

    fn summary(&self) -> String {
        self.existing
            .iter()
            .map(|l| format!("{}: {}", l.value, l.prize))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl View for LevelForm {
    fn run(&mut self, console: &mut dyn Console) -> Result<Outcome> {
        console.say("To create a new level, fill in the following fields:")?;
        if !self.existing.is_empty() {
            console.say(&format!("(levels already created: {})", self.summary()))?;
        }

        let taken: Vec<u32> = self.existing.iter().map(|l| l.value).collect();
        let value = input(console, "  Difficulty level: ", &|raw| match raw.parse::<u32>() {
            Ok(0) | Err(_) => Err("Enter a whole number starting at 1.".into()),
            Ok(v) if taken.contains(&v) => Err(format!("Level {v} already exists.")),
            Ok(_) => Ok(()),
        })?;
        let prize = input(console, "  Prize in dollars: ", &|raw| {
            raw.parse::<u64>()
                .map(|_| ())
                .map_err(|_| "Enter a whole number of dollars.".to_string())
        })?;

        Ok(Payload::Add(NewRecord::Level {
            value: value.parse()?,
            prize: prize.parse()?,
        })
        .into())
    }
}
