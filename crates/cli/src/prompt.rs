use std::io::{self, BufRead, Write};

/// Entering one of these as a product name ends the add loop.
pub const QUIT_TOKENS: [&str; 2] = ["q", "quit"];

pub fn is_quit_token(input: &str) -> bool {
    let input = input.trim();
    QUIT_TOKENS.iter().any(|token| input.eq_ignore_ascii_case(token))
}

/// Line-based prompting over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    pub fn say_all(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    /// Prints `label` without a newline and reads one line. `None` at end of input.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Only `y`/`yes` confirm; anything else, including end of input, declines.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.say(question)?;
        let answer = self.ask("")?;
        Ok(answer.is_some_and(|answer| {
            let answer = answer.trim();
            answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
        }))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
