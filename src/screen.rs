use std::fmt::Write;

use colored::Colorize;

use crate::apis::icanhazdadjoke::{FetchFailed, JokeRecord};

pub const TITLE: &str = "icanhazdadjoke?";
pub const PLACEHOLDER: &str = "Knock, knock...";
pub const FAVOURITES: [&str; 3] = [
    "Which side of the chicken has more feathers? The outside.",
    "Why did the Clydesdale give the pony a glass of water? Because he was a little horse!",
    "The great thing about stationery shops is they're always in the same place...",
];

const BOX_WIDTH: usize = 56;

/// The single screen: the joke currently shown and the static favourites.
pub struct JokeScreen {
    current: JokeRecord,
}

impl Default for JokeScreen {
    fn default() -> Self {
        Self { current: JokeRecord::new("", PLACEHOLDER, 0) }
    }
}

impl JokeScreen {
    pub const fn current(&self) -> &JokeRecord {
        &self.current
    }

    /// Shows a fetched joke. A failed fetch leaves the current joke in place.
    pub fn apply(&mut self, result: Result<JokeRecord, FetchFailed>) {
        match result {
            Ok(joke) => {
                log::debug!("showing joke {:?} (status {})", joke.id(), joke.status_code());
                self.current = joke;
            }
            Err(err) => log::error!("could not retrieve or decode a joke: {err}"),
        }
    }

    pub fn render(&self, in_flight: usize) -> String {
        let mut frame = String::new();
        let border = "─".repeat(BOX_WIDTH + 2);

        writeln!(frame, "{}\n", TITLE.bold()).unwrap();
        writeln!(frame, "╭{border}╮").unwrap();
        for line in wrap(self.current().text(), BOX_WIDTH) {
            let padding = BOX_WIDTH - line.chars().count();
            writeln!(frame, "│ {}{} │", line.bold(), " ".repeat(padding)).unwrap();
        }
        writeln!(frame, "╰{border}╯").unwrap();
        writeln!(frame, "{}", "♥".red()).unwrap();

        write!(frame, "{} another one!   {} quit", "[enter]".cyan(), "[q]".cyan()).unwrap();
        if in_flight > 0 {
            write!(frame, "   {}", format!("fetching… ({in_flight})").bright_black()).unwrap();
        }
        writeln!(frame, "\n").unwrap();

        writeln!(frame, "{}", "Favourites".bold()).unwrap();
        for favourite in FAVOURITES {
            writeln!(frame, "  • {favourite}").unwrap();
        }

        frame
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let split = word.char_indices().nth(width).map_or(word.len(), |(index, _)| index);
                lines.push(word[..split].to_owned());
                word = &word[split..];
            }

            let needed = if line.is_empty() { 0 } else { line.chars().count() + 1 };
            if needed + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
