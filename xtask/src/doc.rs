use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{self, Step};

pub fn run(open: bool) -> Result<()> {
    step::banner("📚 Building documentation...");
    let start = Instant::now();

    let mut args = vec![
        "doc",
        "-p",
        "dac-platform",
        "-p",
        "pcm5102a",
        "--no-deps",
        "--features",
        "pcm5102a/std",
    ];
    if open {
        args.push("--open");
    }
    Step::cargo("Documentation", &args).run()?;

    if !open {
        println!(
            "   {}",
            "Open target/doc/pcm5102a/index.html in your browser".dimmed()
        );
        println!();
    }

    step::finished("Documentation", start);
    Ok(())
}
