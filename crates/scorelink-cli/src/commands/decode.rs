//! The `scorelink decode` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use scorelink_core::parser::{session_to_toml, Session};
use scorelink_share::{decode_token, ShareFormat};

pub fn execute(input: &str, output: Option<PathBuf>) -> Result<()> {
    // Accept a bare fragment or a full URL carrying one.
    let fragment = input
        .split_once('#')
        .map(|(_, fragment)| fragment)
        .unwrap_or(input);

    let Some((format, token)) = ShareFormat::detect(fragment) else {
        anyhow::bail!("no recognized share prefix in input");
    };

    let state = decode_token(format, token)
        .with_context(|| format!("failed to decode {format} token"))?;

    let title = if state.student.name.is_empty() {
        "shared".to_string()
    } else {
        format!("{} (shared)", state.student.name)
    };
    let session = Session {
        title,
        questions: state.questions,
        student: state.student,
    };
    let toml = session_to_toml(&session)?;

    match output {
        Some(path) => {
            std::fs::write(&path, toml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{toml}"),
    }

    Ok(())
}
