//! The `scorelink init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create scorelink.toml
    if std::path::Path::new("scorelink.toml").exists() {
        println!("scorelink.toml already exists, skipping.");
    } else {
        std::fs::write("scorelink.toml", SAMPLE_CONFIG)?;
        println!("Created scorelink.toml");
    }

    // Create example session
    std::fs::create_dir_all("sessions")?;
    let example_path = std::path::Path::new("sessions/example.toml");
    if example_path.exists() {
        println!("sessions/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SESSION)?;
        println!("Created sessions/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit sessions/example.toml with your answer keys and entries");
    println!("  2. Run: scorelink validate --session sessions/example.toml");
    println!("  3. Run: scorelink score --session sessions/example.toml --share");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# scorelink configuration

# Base URL that share fragments are appended to.
share_base_url = "https://example.test/report"

# Narrative feedback is optional; remove this section to disable it.
[feedback]
api_key = "${SCORELINK_GEMINI_KEY}"
model = "gemini-2.0-flash"
"#;

const EXAMPLE_SESSION: &str = r#"[session]
title = "Example Mock Test"

[[questions]]
section = "reading"
category = "Vocabulary"
correct_answer = "B"

[[questions]]
section = "reading"
category = "Detail"
correct_answer = "D"

[[questions]]
section = "reading"
correct_answer = "A"

[[questions]]
section = "listening"
correct_answer = "C"

[[questions]]
section = "listening"
category = "Inference"
correct_answer = "B"
points = 2.0

[[questions]]
section = "speaking"
category = "Delivery"

[[questions]]
section = "speaking"
category = "Language Use"
points = 4.0

[[questions]]
section = "writing"
category = "Organization"

[student]
name = "Kim"

[student.answers]
R-1 = "B"
R-2 = "d"
R-3 = "C"
L-1 = "C"
L-2 = "b"
S-D-0 = "4.5"
S-D-1 = "3"
W-D-0 = "4"
"#;
