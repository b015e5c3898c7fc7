use std::fmt;

use anyhow::Result;

use crate::console::Console;

/// Drives the tree walk: descend into a child, pop one level, or ask to quit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A child key such as `"1"`. Keys that name no child keep the walk
    /// on the current node.
    Key(String),
    Back,
    Close,
}

impl Token {
    /// `"back"` and `"close"` are reserved, everything else is a key.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "back" => Token::Back,
            "close" => Token::Close,
            key => Token::Key(key.to_string()),
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Token::Key(key.into())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Key(key) => f.write_str(key),
            Token::Back => f.write_str("back"),
            Token::Close => f.write_str("close"),
        }
    }
}

/// Data a form or table hands to its controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Answer of a two-option toggle such as "Start Game" / "Back to menu".
    Toggle(bool),
    Add(NewRecord),
    /// Ids of the rows picked for removal.
    Delete(Vec<String>),
}

/// Validated form contents for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Category {
        name: String,
        level: String,
    },
    Question {
        text: String,
        category: String,
        correct: String,
        wrong: Vec<String>,
    },
    Level {
        value: u32,
        prize: u64,
    },
}

/// Raw result of running a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Token(Token),
    Payload(Payload),
}

impl From<Token> for Outcome {
    fn from(token: Token) -> Self {
        Outcome::Token(token)
    }
}

impl From<Payload> for Outcome {
    fn from(payload: Payload) -> Self {
        Outcome::Payload(payload)
    }
}

// ---------------------------------------------------------------------------
// View / controller contract
// ---------------------------------------------------------------------------

/// Something displayable that blocks until the user picks a result.
pub trait View {
    fn run(&mut self, console: &mut dyn Console) -> Result<Outcome>;
}

/// Builds a fresh view each time its node is (re)entered, so the choices
/// shown always reflect current data.
pub trait ViewFactory {
    fn build(&self) -> Result<Box<dyn View>>;
}

impl<F> ViewFactory for F
where
    F: Fn() -> Result<Box<dyn View>>,
{
    fn build(&self) -> Result<Box<dyn View>> {
        self()
    }
}

/// Turns a view's raw outcome into a navigation token, possibly performing
/// side effects (adding or deleting records) first.
pub trait Controller {
    fn process(&self, outcome: Outcome, console: &mut dyn Console) -> Result<Token>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parse_reserved() {
        assert_eq!(Token::parse("back"), Token::Back);
        assert_eq!(Token::parse("close"), Token::Close);
        assert_eq!(Token::parse("2"), Token::key("2"));
    }

    #[test]
    fn test_token_display_round_trips() {
        for raw in ["back", "close", "3"] {
            assert_eq!(Token::parse(raw).to_string(), raw);
        }
    }
}
