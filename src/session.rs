//! The question and answer loop between a person and the [`MergeEngine`]

use std::fmt::Display;
use std::io::{BufRead, Write};

use manual_sort::{Choice, MergeEngine, Next};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every comparison was answered
    Finished,
    /// The user asked to save and stop, or the input ran out
    Paused,
    /// The user stopped without saving
    Abandoned,
}

/// A single answer typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Pick(Choice),
    Save,
    Quit,
}

const HELP: &str = "Answer 1 or 2 to pick, s to save and stop, q to stop without saving";

fn parse_answer(line: &str) -> Option<Answer> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "l" | "left" => Some(Answer::Pick(Choice::Left)),
        "2" | "r" | "right" => Some(Answer::Pick(Choice::Right)),
        "s" | "save" => Some(Answer::Save),
        "q" | "quit" => Some(Answer::Quit),
        _ => None,
    }
}

/// Ask for decisions on `output` and read them from `input` until the sort is done
/// or the user stops.
///
/// `on_decision` runs after every applied decision, e.g. to autosave.
pub fn run<T, R, W>(
    engine: &mut MergeEngine<T>,
    input: &mut R,
    output: &mut W,
    bar: &indicatif::ProgressBar,
    mut on_decision: impl FnMut(&MergeEngine<T>) -> anyhow::Result<()>,
) -> anyhow::Result<Outcome>
where
    T: Clone + Display,
    R: BufRead,
    W: Write,
{
    bar.suspend(|| writeln!(output, "{HELP}"))?;

    let mut line = String::new();
    loop {
        bar.set_position(engine.percent() as u64);

        let (left, right) = match engine.peek() {
            Next::Pending { left, right } => (left.to_string(), right.to_string()),
            Next::Done(_) => {
                bar.finish_and_clear();
                return Ok(Outcome::Finished);
            }
        };

        bar.suspend(|| {
            writeln!(output)?;
            writeln!(output, "  [1] {left}")?;
            writeln!(output, "  [2] {right}")?;
            write!(output, "Which goes first? ")?;
            output.flush()
        })?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            tracing::debug!("input closed, pausing");
            return Ok(Outcome::Paused);
        }

        match parse_answer(&line) {
            Some(Answer::Pick(choice)) => {
                engine.apply(choice);
                on_decision(engine)?;
            }
            Some(Answer::Save) => return Ok(Outcome::Paused),
            Some(Answer::Quit) => return Ok(Outcome::Abandoned),
            None => bar.suspend(|| writeln!(output, "{HELP}"))?,
        }
    }
}
