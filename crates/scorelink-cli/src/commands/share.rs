//! The `scorelink share` command.

use std::path::PathBuf;

use anyhow::Result;

use scorelink_core::parser::load_session;
use scorelink_feedback::load_config_from;
use scorelink_share::share_url;

pub fn execute(
    session_path: PathBuf,
    base_url: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let session = load_session(&session_path)?;
    let config = load_config_from(config_path.as_deref())?;

    let base = base_url
        .or(config.share_base_url)
        .unwrap_or_default();
    println!(
        "{}",
        share_url(&base, &session.questions, &session.student)?
    );

    Ok(())
}
