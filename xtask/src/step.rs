//! One `cargo` invocation with timing and coloured pass/fail output.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// What a failing step does to the overall task.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Abort the task.
    Abort,
    /// Print a warning and carry on.
    Warn,
}

pub struct Step<'a> {
    label: &'a str,
    args: Vec<&'a str>,
    on_failure: OnFailure,
}

impl<'a> Step<'a> {
    pub fn cargo(label: &'a str, args: &[&'a str]) -> Self {
        Self {
            label,
            args: args.to_vec(),
            on_failure: OnFailure::Abort,
        }
    }

    pub fn warn_only(mut self) -> Self {
        self.on_failure = OnFailure::Warn;
        self
    }

    /// Run the step. Returns the captured output when it succeeded.
    pub fn run(&self) -> Result<Option<Output>> {
        println!("{}", format!("  {}...", self.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(&self.args)
            .output()
            .with_context(|| format!("Failed to spawn cargo for {}", self.label))?;

        if output.status.success() {
            let summary = test_summary(&String::from_utf8_lossy(&output.stdout))
                .map(|s| format!(" ({s})"))
                .unwrap_or_default();
            println!(
                "{}",
                format!(
                    "  ✓ {} passed{} in {:.2}s",
                    self.label,
                    summary,
                    start.elapsed().as_secs_f64()
                )
                .green()
            );
            println!();
            return Ok(Some(output));
        }

        match self.on_failure {
            OnFailure::Abort => {
                eprintln!("{}", format!("  ✗ {} failed", self.label).red().bold());
                eprintln!();
                for line in String::from_utf8_lossy(&output.stdout).lines() {
                    eprintln!("  {line}");
                }
                eprintln!("{}", String::from_utf8_lossy(&output.stderr));
                anyhow::bail!("{} failed", self.label);
            }
            OnFailure::Warn => {
                eprintln!("{}", format!("  ⚠ {} reported problems", self.label).yellow().bold());
                eprintln!("{}", String::from_utf8_lossy(&output.stderr));
                println!();
                Ok(None)
            }
        }
    }
}

/// Sum every "test result:" line cargo prints (one per test binary).
pub fn test_summary(output: &str) -> Option<String> {
    let mut passed = 0u64;
    let mut failed = 0u64;
    let mut found = false;

    for line in output.lines() {
        let Some(result) = line.split("test result:").nth(1) else {
            continue;
        };
        found = true;
        for part in result.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u64>() else {
                continue;
            };
            match kind {
                "passed" => passed = passed.saturating_add(count),
                "failed" => failed = failed.saturating_add(count),
                _ => {}
            }
        }
    }

    found.then(|| format!("{passed} passed, {failed} failed"))
}

pub fn banner(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!();
}

pub fn finished(what: &str, start: Instant) {
    println!(
        "{}",
        format!("✓ {what} completed in {:.2}s", start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_adds_up_binaries() {
        let out = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.01s
running 2 tests
test result: ok. 2 passed; 0 failed; 1 ignored; 0 measured; 0 filtered out; finished in 0.00s
";
        assert_eq!(test_summary(out).as_deref(), Some("5 passed, 0 failed"));
    }

    #[test]
    fn summary_missing_without_results() {
        assert_eq!(test_summary("Compiling pcm5102a v0.1.0"), None);
    }
}
