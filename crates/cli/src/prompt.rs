//! Terminal confirmation prompt

use std::io::{self, BufRead, Write};

use tracing::warn;

use mavuno_app::domain::carts::Confirm;

/// Asks on stderr and reads the answer from stdin. Anything but `y` or `yes`
/// is a no.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match ask(prompt, io::stdin().lock(), io::stderr().lock()) {
            Ok(answer) => answer,
            Err(error) => {
                warn!("could not read confirmation: {error}");

                false
            }
        }
    }
}

fn ask(prompt: &str, mut input: impl BufRead, mut output: impl Write) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();

    input.read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
