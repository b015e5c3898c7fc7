use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Console: the interactive terminal every view renders to
// ---------------------------------------------------------------------------

/// Line-oriented terminal. Every call blocks until the user (or the script,
/// in tests) answers.
pub trait Console {
    fn clear(&mut self) -> io::Result<()>;
    fn write(&mut self, text: &str) -> io::Result<()>;
    /// Read one line without its trailing newline. End of input is an
    /// `UnexpectedEof` error so a closed stdin can never spin a prompt loop.
    fn read_line(&mut self) -> io::Result<String>;

    fn say(&mut self, line: &str) -> io::Result<()> {
        self.write(line)?;
        self.write("\n")
    }
}

/// The process terminal.
pub struct StdConsole;

impl Console for StdConsole {
    fn clear(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(b"\x1B[2J\x1B[1;1H")?;
        out.flush()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed",
            ));
        }
        Ok(input.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

// ---------------------------------------------------------------------------
// Prompt widgets
// ---------------------------------------------------------------------------

/// Keep asking until the trimmed input is one of `valid`.
pub fn choice(console: &mut dyn Console, valid: &[&str], hint: &str) -> io::Result<String> {
    loop {
        console.write("> ")?;
        let input = console.read_line()?;
        let input = input.trim().to_lowercase();
        if let Some(found) = valid.iter().find(|v| **v == input) {
            return Ok(found.to_string());
        }
        console.say(hint)?;
    }
}

/// Two-option toggle, e.g. "Play again" / "Back to menu".
#[derive(Debug, Clone)]
pub struct Toggle {
    pub message: String,
    pub enabled: String,
    pub disabled: String,
}

impl Toggle {
    pub fn new(
        message: impl Into<String>,
        enabled: impl Into<String>,
        disabled: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            enabled: enabled.into(),
            disabled: disabled.into(),
        }
    }
}

/// Show a toggle and return `true` when the enabled option is picked.
pub fn confirm(console: &mut dyn Console, toggle: &Toggle) -> io::Result<bool> {
    console.say(&toggle.message)?;
    console.say(&format!(
        "  [y] {}    [n] {}\n",
        toggle.enabled, toggle.disabled
    ))?;
    let picked = choice(
        console,
        &["y", "n"],
        &format!("  Press [y] for {} or [n] for {}.", toggle.enabled, toggle.disabled),
    )?;
    Ok(picked == "y")
}

/// Free-text input, re-asked until `validate` accepts it.
pub fn input(
    console: &mut dyn Console,
    message: &str,
    validate: &dyn Fn(&str) -> Result<(), String>,
) -> io::Result<String> {
    loop {
        console.write(message)?;
        let value = console.read_line()?.trim().to_string();
        match validate(&value) {
            Ok(()) => return Ok(value),
            Err(reason) => console.say(&format!("  {reason}"))?,
        }
    }
}

/// Single selection from a numbered list. Returns the zero-based index.
pub fn select(console: &mut dyn Console, message: &str, options: &[String]) -> io::Result<usize> {
    console.say(message)?;
    for (i, option) in options.iter().enumerate() {
        console.say(&format!("  {}. {option}", i + 1))?;
    }
    loop {
        console.write("> ")?;
        let raw = console.read_line()?;
        match raw.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
            _ => console.say(&format!("  Pick a number from 1 to {}.", options.len()))?,
        }
    }
}

/// Wait for Enter so a message survives the next screen clear.
pub fn pause(console: &mut dyn Console) -> io::Result<()> {
    console.write("(press Enter to continue) ")?;
    console.read_line().map(|_| ())
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,\s]+").expect("separator pattern is valid"))
}

/// Parse a list of 1-based row numbers such as `"1, 3 4"` into sorted,
/// de-duplicated zero-based indexes. `None` if any entry is not a row number.
pub fn parse_selection(raw: &str, count: usize) -> Option<Vec<usize>> {
    let mut picked = Vec::new();
    for part in separator().split(raw.trim()).filter(|p| !p.is_empty()) {
        let n: usize = part.parse().ok()?;
        if n == 0 || n > count {
            return None;
        }
        picked.push(n - 1);
    }
    picked.sort_unstable();
    picked.dedup();
    if picked.is_empty() {
        None
    } else {
        Some(picked)
    }
}

// ---------------------------------------------------------------------------
// Scripted console for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct ScriptedConsole {
    inputs: std::collections::VecDeque<String>,
    pub output: String,
    pub clears: usize,
}

#[cfg(test)]
impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: String::new(),
            clears: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

#[cfg(test)]
impl Console for ScriptedConsole {
    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        self.inputs
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_reprompts_until_valid() {
        let mut console = ScriptedConsole::new(&["x", " Y "]);
        let picked = choice(&mut console, &["y", "n"], "try again").unwrap();
        assert_eq!(picked, "y");
        assert!(console.output.contains("try again"));
    }

    #[test]
    fn test_confirm_maps_to_bool() {
        let toggle = Toggle::new("Sure?", "Close", "Back");
        let mut console = ScriptedConsole::new(&["n", "y"]);
        assert!(!confirm(&mut console, &toggle).unwrap());
        assert!(confirm(&mut console, &toggle).unwrap());
        assert!(console.output.contains("[y] Close"));
    }

    #[test]
    fn test_input_validation() {
        let mut console = ScriptedConsole::new(&["", "Ada"]);
        let value = input(&mut console, "Name: ", &|v| {
            if v.is_empty() {
                Err("Name required".into())
            } else {
                Ok(())
            }
        })
        .unwrap();
        assert_eq!(value, "Ada");
        assert!(console.output.contains("Name required"));
    }

    #[test]
    fn test_select_returns_zero_based_index() {
        let options = vec!["red".to_string(), "blue".to_string()];
        let mut console = ScriptedConsole::new(&["3", "2"]);
        assert_eq!(select(&mut console, "Color?", &options).unwrap(), 1);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1, 3 3", 4), Some(vec![0, 2]));
        assert_eq!(parse_selection("5", 4), None);
        assert_eq!(parse_selection("a", 4), None);
        assert_eq!(parse_selection("", 4), None);
    }

    #[test]
    fn test_exhausted_script_is_eof() {
        let mut console = ScriptedConsole::new(&[]);
        let err = console.read_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
