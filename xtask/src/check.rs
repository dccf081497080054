use anyhow::Result;
use std::time::Instant;

use crate::step::{self, Step};

/// Cortex-M4F/M7 target used to prove the driver stays no_std.
pub const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

pub fn run(target: &str) -> Result<()> {
    step::banner("🔍 Checking driver builds...");
    let start = Instant::now();

    // no_std: neither crate may pull in std without the `std` feature.
    Step::cargo(
        "dac-platform no_std check",
        &["check", "-p", "dac-platform", "--target", target],
    )
    .run()?;
    Step::cargo(
        "pcm5102a no_std check (defmt)",
        &["check", "-p", "pcm5102a", "--target", target, "--features", "defmt"],
    )
    .run()?;

    Step::cargo(
        "pcm5102a host check (std)",
        &["check", "-p", "pcm5102a", "--features", "std"],
    )
    .run()?;

    Step::cargo(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
    .warn_only()
    .run()?;

    if Step::cargo("Formatting", &["fmt", "--all", "--check"])
        .warn_only()
        .run()?
        .is_none()
    {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    step::finished("All checks", start);
    Ok(())
}
