//! Interactive prompts for the operator.
//!
//! [`Prompter`] wraps any reader and writer so the menus can be driven
//! from stdin in the binary and from byte buffers in tests. The parsing
//! rules live in [`parse_choice`] and [`parse_date`].

use chrono::NaiveDate;
use log::debug;
use std::io::{BufRead, Write};

use crate::error::{DeleterError, Result};

/// Reads answers from `input` and writes menus to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_answer(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Shows a numbered menu and returns the option picked by 1-based index.
    ///
    /// A blank answer picks `default`; without one, a blank answer is an error.
    pub fn choose(
        &mut self,
        prompt: &str,
        options: &[&str],
        default: Option<&str>,
    ) -> Result<String> {
        if !prompt.is_empty() {
            writeln!(self.output, "{}", prompt)?;
        }
        for (i, option) in options.iter().enumerate() {
            if Some(*option) == default {
                writeln!(self.output, "{}. {} (default)", i + 1, option)?;
            } else {
                writeln!(self.output, "{}. {}", i + 1, option)?;
            }
        }
        if default.is_some() {
            write!(
                self.output,
                "Enter your choice (1-{}) or press Enter for default: ",
                options.len()
            )?;
        } else {
            write!(self.output, "Enter your choice (1-{}): ", options.len())?;
        }

        let answer = self.read_answer()?;
        debug!("Menu answer: {:?}", answer);
        parse_choice(&answer, options, default)
    }

    /// Asks for a date as `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub fn date(&mut self, prompt: &str, default: NaiveDate) -> Result<NaiveDate> {
        write!(
            self.output,
            "{} (YYYY or YYYY-MM or YYYY-MM-DD) [default: {}]: ",
            prompt,
            default.format("%Y-%m-%d")
        )?;

        let answer = self.read_answer()?;
        debug!("Date answer: {:?}", answer);
        parse_date(&answer, default)
    }
}

/// Maps a menu answer onto one of `options`.
///
/// # Errors
///
/// [`DeleterError::InvalidChoice`] for a non-numeric or out-of-range answer,
/// or a blank answer when there is no default.
pub fn parse_choice(answer: &str, options: &[&str], default: Option<&str>) -> Result<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return default
            .map(str::to_string)
            .ok_or_else(|| DeleterError::InvalidChoice("a choice is required".to_string()));
    }

    match answer.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Ok(options[n - 1].to_string()),
        _ => Err(DeleterError::InvalidChoice(format!(
            "'{}' is not a number between 1 and {}",
            answer,
            options.len()
        ))),
    }
}

/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`; blank yields `default`.
///
/// A year alone means January 1st; a year and month mean the 1st of that month.
///
/// # Errors
///
/// [`DeleterError::InvalidDate`] for unparsable segments, a month outside
/// 1..=12, or a day that does not exist.
pub fn parse_date(answer: &str, default: NaiveDate) -> Result<NaiveDate> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(default);
    }

    let segments: Vec<&str> = answer.split('-').collect();
    let number = |segment: &str, what: &str| -> Result<u32> {
        segment
            .parse::<u32>()
            .map_err(|_| DeleterError::InvalidDate(format!("invalid {} '{}'", what, segment)))
    };

    let (year, month, day) = match *segments.as_slice() {
        [y] => (number(y, "year")?, 1, 1),
        [y, m] => (number(y, "year")?, number(m, "month")?, 1),
        [y, m, d] => (
            number(y, "year")?,
            number(m, "month")?,
            number(d, "day")?,
        ),
        _ => {
            return Err(DeleterError::InvalidDate(
                "use YYYY or YYYY-MM or YYYY-MM-DD".to_string(),
            ))
        }
    };

    if !(1..=12).contains(&month) {
        return Err(DeleterError::InvalidDate(
            "month must be between 1 and 12".to_string(),
        ));
    }

    let year = i32::try_from(year)
        .map_err(|_| DeleterError::InvalidDate(format!("year {} out of range", year)))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DeleterError::InvalidDate(format!("{} is not a real date", answer)))
}
