//! Interactive delete confirmation.

use geoadmin_core::{CascadePlan, Confirm};
use std::io::{self, BufRead, Write};

/// Asks on stdin unless `assume_yes` was given.
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, plan: &CascadePlan) -> bool {
        if let Some(warning) = plan.warning() {
            eprintln!("{warning}");
        }
        if self.assume_yes {
            return true;
        }
        ask(&mut io::stderr(), &mut io::stdin().lock(), &plan.prompt())
    }
}

/// Any I/O failure counts as "no".
fn ask(out: &mut impl Write, input: &mut impl BufRead, question: &str) -> bool {
    if write!(out, "{question} [y/N] ").and_then(|()| out.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
