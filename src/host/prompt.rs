//! Interactive prompting.

use std::io::{self, BufRead, Write};

/// Asks the user questions.
pub trait Prompter: Send + Sync {
    /// Pick one of `choices`.
    fn select(&self, title: &str, choices: &[String]) -> io::Result<String>;

    /// Free-text answer; blank input yields `default`.
    fn ask(&self, question: &str, default: &str) -> io::Result<String>;
}

/// Line-based prompter on stdin/stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn select(&self, title: &str, choices: &[String]) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{title}")?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(stdout, "  {}) {choice}", i + 1)?;
        }

        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;
            let Some(line) = read_line()? else {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "No selection made"));
            };
            match parse_selection(&line, choices) {
                Some(choice) => return Ok(choice),
                None => writeln!(stdout, "Please enter a number between 1 and {}", choices.len())?,
            }
        }
    }

    fn ask(&self, question: &str, default: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} ({default}): ")?;
        stdout.flush()?;

        let answer = read_line()?.map(|line| line.trim().to_string()).unwrap_or_default();
        Ok(if answer.is_empty() { default.to_string() } else { answer })
    }
}

/// One line from stdin without its terminator, or `None` at end of input.
fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Accepts a 1-based index or an exact (case-insensitive) choice.
fn parse_selection(input: &str, choices: &[String]) -> Option<String> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| choices.get(i)).cloned();
    }
    choices.iter().find(|choice| choice.eq_ignore_ascii_case(input)).cloned()
}
