//! Line-oriented prompting.
//!
//! Every prompt returns a [`PromptResult`]. When the user asks to go back to
//! the main menu the prompt yields [`PromptError::Cancelled`], which flows
//! propagate with `?` and the main menu absorbs. Closing the input yields
//! [`PromptError::EndOfInput`], which ends the program.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use acct_core::{FormatConfig, Sheet};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::display::{self, BoxLine, Style};
use crate::utils::parse_amount;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("returned to the main menu")]
    Cancelled,

    #[error("input closed")]
    EndOfInput,

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Inclusive range a numeric answer must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl Bounds {
    pub const ANY: Self = Self {
        min: None,
        max: None,
    };

    pub const NON_NEGATIVE: Self = Self {
        min: Some(Decimal::ZERO),
        max: None,
    };

    pub const PERCENT: Self = Self {
        min: Some(Decimal::ZERO),
        max: Some(Decimal::ONE_HUNDRED),
    };

    pub fn between(
        min: Decimal,
        max: Decimal,
    ) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// The message shown when `value` falls outside the range.
    pub fn violation(
        &self,
        value: Decimal,
    ) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if value < min || value > max => {
                Some(format!("the number must be between {min} and {max}"))
            }
            (Some(min), None) if value < min => {
                Some(format!("the number must be greater than or equal to {min}"))
            }
            (None, Some(max)) if value > max => {
                Some(format!("the number must be less than or equal to {max}"))
            }
            _ => None,
        }
    }
}

/// Prompts on one reader and writes to one writer.
pub struct Console<'a> {
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
    format: FormatConfig,
    style: Style,
}

impl<'a> Console<'a> {
    pub fn new(
        input: &'a mut dyn BufRead,
        output: &'a mut dyn Write,
        format: FormatConfig,
        style: Style,
    ) -> Self {
        Self {
            input,
            output,
            format,
            style,
        }
    }

    pub fn format(&self) -> &FormatConfig {
        &self.format
    }

    // ====================================================================
    // Output
    // ====================================================================

    pub fn say(
        &mut self,
        text: &str,
    ) -> PromptResult<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn rule(&mut self) -> PromptResult<()> {
        let rule = display::rule(self.style);
        self.say(&rule)
    }

    pub fn banner(
        &mut self,
        lines: &[BoxLine],
    ) -> PromptResult<()> {
        let text = display::boxed(lines, self.style);
        write!(self.output, "{text}")?;
        Ok(())
    }

    pub fn table(
        &mut self,
        sheet: &Sheet,
    ) -> PromptResult<()> {
        let text = display::table(sheet, &self.format, self.style);
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn error(
        &mut self,
        message: &str,
    ) -> PromptResult<()> {
        let label = display::bold("Error:", self.style);
        writeln!(self.output, "{label} {message}")?;
        Ok(())
    }

    /// Waits before results are shown.
    pub fn pause(
        &mut self,
        delay: Duration,
    ) -> PromptResult<()> {
        self.output.flush()?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        Ok(())
    }

    // ====================================================================
    // Input
    // ====================================================================

    fn read_line(
        &mut self,
        message: &str,
    ) -> PromptResult<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::EndOfInput);
        }
        let answer = line.trim().to_string();
        debug!(prompt = message.trim(), answer = %answer, "input");
        Ok(answer)
    }

    /// Asks whether to abandon the current flow.
    ///
    /// Returns `Err(Cancelled)` on yes; any other answer continues.
    pub fn offer_return(&mut self) -> PromptResult<()> {
        self.banner(&[
            BoxLine::title("Return to the main menu?"),
            BoxLine::Separator,
            BoxLine::text("(Y) - Yes"),
            BoxLine::text("(N) - No"),
        ])?;
        let answer = self.read_line("Answer: ")?;
        if is_yes(&answer) {
            Err(PromptError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// A non-empty line of text.
    pub fn field(
        &mut self,
        message: &str,
    ) -> PromptResult<String> {
        loop {
            let answer = self.read_line(message)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.error("the field cannot be empty")?;
            self.offer_return()?;
        }
    }

    /// A number within `bounds`; thousands separators, the currency symbol
    /// and a trailing `%` are accepted.
    pub fn number(
        &mut self,
        message: &str,
        bounds: Bounds,
    ) -> PromptResult<Decimal> {
        loop {
            let answer = self.field(message)?;
            let problem = match parse_amount(&answer, &self.format) {
                Ok(value) => match bounds.violation(value) {
                    None => return Ok(value),
                    Some(problem) => problem,
                },
                Err(e) => e.to_string(),
            };
            self.error(&problem)?;
            self.offer_return()?;
        }
    }

    /// A whole number between `min` and `max`.
    pub fn whole_number(
        &mut self,
        message: &str,
        min: u32,
        max: u32,
    ) -> PromptResult<u32> {
        let bounds = Bounds::between(Decimal::from(min), Decimal::from(max));
        loop {
            let value = self.number(message, bounds)?;
            if value.fract().is_zero() {
                if let Ok(whole) = u32::try_from(value) {
                    return Ok(whole);
                }
            }
            self.error("enter a whole number")?;
            self.offer_return()?;
        }
    }

    /// Shows a numbered menu and returns the 1-based option picked.
    pub fn menu(
        &mut self,
        title: &str,
        options: &[&str],
    ) -> PromptResult<usize> {
        let mut lines = vec![BoxLine::title(title), BoxLine::Separator];
        lines.extend(
            options
                .iter()
                .enumerate()
                .map(|(idx, option)| BoxLine::text(format!("({}) - {option}", idx + 1))),
        );
        self.banner(&lines)?;

        let max = u32::try_from(options.len()).unwrap_or(u32::MAX);
        let picked = self.whole_number("Choose an option: ", 1, max)?;
        Ok(picked as usize)
    }

    /// A yes/no question; re-asks until the answer is Y or N.
    pub fn confirm(
        &mut self,
        question: &str,
    ) -> PromptResult<bool> {
        self.banner(&[
            BoxLine::title(question),
            BoxLine::Separator,
            BoxLine::text("(Y) - Yes"),
            BoxLine::text("(N) - No"),
        ])?;
        loop {
            let answer = self.field("Answer: ")?;
            if is_yes(&answer) {
                return Ok(true);
            }
            if is_no(&answer) {
                return Ok(false);
            }
            self.error("answer Y or N")?;
        }
    }
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

fn is_no(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no")
}
