//! Line-based prompts. Each takes its input and output streams so tests can
//! drive them with in-memory buffers.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use element::error::{ElementError, Result};
use std::io::{self, BufRead, IsTerminal, Write};

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{} ", question)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Yes/no question; an empty answer counts as yes.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    let answer = read_answer(input, output, &format!("{} (Y/n)", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "" | "y" | "yes"))
}

/// A non-empty free-text answer.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    let answer = read_answer(input, output, question)?;
    if answer.is_empty() {
        return Err(ElementError::Declined);
    }
    Ok(answer)
}

/// Pick from `choices` by number or by typing a name.
pub fn choose<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    choices: &[String],
) -> Result<String> {
    writeln!(output, "{}", question)?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, choice)?;
    }
    let answer = read_answer(input, output, ">")?;
    let picked = answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| choices.get(i))
        .cloned()
        .unwrap_or(answer);
    Ok(picked)
}

/// Collect a hidden answer from key presses. Enter finishes; Esc or Ctrl-C cancel.
fn read_secret<I>(keys: I) -> Result<String>
where
    I: IntoIterator<Item = io::Result<KeyEvent>>,
{
    let mut answer = String::new();
    for key in keys {
        let key = key?;
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => break,
            KeyCode::Esc => return Err(ElementError::Declined),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(ElementError::Declined)
            }
            KeyCode::Char(c) => answer.push(c),
            KeyCode::Backspace => {
                answer.pop();
            }
            _ => {}
        }
    }
    if answer.is_empty() {
        return Err(ElementError::Declined);
    }
    Ok(answer)
}

/// Raw mode for as long as this is alive.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn key_events() -> impl Iterator<Item = io::Result<KeyEvent>> {
    std::iter::from_fn(|| loop {
        match event::read() {
            Ok(Event::Key(key)) => return Some(Ok(key)),
            Ok(_) => continue,
            Err(e) => return Some(Err(e)),
        }
    })
}

/// Like `ask_stdin`, without echoing the answer. Piped input is read as a plain line.
pub fn ask_secret_stdin(question: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        return ask_stdin(question);
    }
    let mut stdout = io::stdout();
    write!(stdout, "{} ", question)?;
    stdout.flush()?;
    let answer = {
        let _raw = RawMode::enable()?;
        read_secret(key_events())
    };
    writeln!(stdout)?;
    answer
}

pub fn confirm_stdin(question: &str) -> Result<bool> {
    confirm(&mut io::stdin().lock(), &mut io::stdout(), question)
}

pub fn ask_stdin(question: &str) -> Result<String> {
    ask(&mut io::stdin().lock(), &mut io::stdout(), question)
}

pub fn choose_stdin(question: &str, choices: &[String]) -> Result<String> {
    choose(&mut io::stdin().lock(), &mut io::stdout(), question, choices)
}
