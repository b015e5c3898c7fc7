use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything a record store can hold: a serializable value keyed by a string id.
pub trait Record: Clone + Serialize + for<'de> Deserialize<'de> {
    /// Human-readable entity kind, used in file names and error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A rung of the difficulty ladder and the prize for clearing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub value: u32,
    pub prize: u64,
}

impl Level {
    pub fn new(value: u32, prize: u64) -> Self {
        Self {
            id: new_id(),
            value,
            prize,
        }
    }
}

impl Record for Level {
    const KIND: &'static str = "level";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A question category. `level` is the id of the level it is played at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub level: String,
}

impl Category {
    pub fn new(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            level: level.into(),
        }
    }
}

impl Record for Category {
    const KIND: &'static str = "category";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: String,
}

impl Question {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            category: category.into(),
        }
    }
}

impl Record for Question {
    const KIND: &'static str = "question";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub text: String,
    pub question: String,
    pub is_correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, question: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            question: question.into(),
            is_correct,
        }
    }
}

impl Record for Answer {
    const KIND: &'static str = "answer";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A player's last registered result. `time` is in seconds, two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub username: String,
    pub max_level_reached: u32,
    pub time: f64,
}

impl Player {
    pub fn new(username: impl Into<String>, max_level_reached: u32, time: f64) -> Self {
        Self {
            id: new_id(),
            username: username.into(),
            max_level_reached,
            time,
        }
    }
}

impl Record for Player {
    const KIND: &'static str = "player";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Milliseconds to seconds, rounded to two decimals.
pub fn seconds_from_millis(millis: u128) -> f64 {
    (millis as f64 / 10.0).round() / 100.0
}
