//! The `scorelink score` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use scorelink_core::model::Section;
use scorelink_core::parser::{load_session, validate_session};
use scorelink_core::report::ScoreReport;
use scorelink_core::scoring::{evaluate, EvaluationResult, SECTION_MAX};
use scorelink_core::traits::FeedbackProvider;
use scorelink_feedback::{create_provider, load_config_from};
use scorelink_share::{encode_fragment, share_url};

pub async fn execute(
    session_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
    share: bool,
    feedback: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let session = load_session(&session_path)?;

    for warning in validate_session(&session) {
        let prefix = warning
            .question_id
            .as_ref()
            .map(|id| format!("[{id}] "))
            .unwrap_or_default();
        eprintln!("WARNING: {prefix}{}", warning.message);
    }

    let config = load_config_from(config_path.as_deref())?;
    let result = evaluate(&session.questions, &session.student);
    let mut report = ScoreReport::new(result);

    if share {
        report.share_fragment = Some(encode_fragment(&session.questions, &session.student)?);
    }

    match format.as_str() {
        "json" => match &output {
            Some(path) => {
                report.save_json(path)?;
                println!("Wrote {}", path.display());
            }
            None => println!("{}", serde_json::to_string_pretty(&report)?),
        },
        "html" => {
            let path = output.unwrap_or_else(|| PathBuf::from("report.html"));
            scorelink_report::write_html_report(&report, &path)?;
            println!("Wrote {}", path.display());
        }
        _ => {
            print_text_report(&session.title, &report.result);
            if share {
                let base = config.share_base_url.clone().unwrap_or_default();
                println!(
                    "\nShare URL: {}",
                    share_url(&base, &session.questions, &session.student)?
                );
            }
        }
    }

    if feedback {
        match &config.feedback {
            Some(feedback_config) => {
                let provider = create_provider(feedback_config)?;
                match provider.narrative(&report.result).await {
                    Ok(narrative) => println!("\n{narrative}"),
                    Err(e) if e.is_unavailable() => {
                        println!("\nFeedback unavailable: {e}");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => println!("\nNo feedback provider configured."),
        }
    }

    Ok(())
}

fn print_text_report(title: &str, result: &EvaluationResult) {
    println!("{title} — {}", result.student_name);
    println!(
        "Total: {} / {} (raw points earned: {:.1})\n",
        result.total_score, result.max_score, result.actual_earned_points
    );

    let mut sections = Table::new();
    sections.set_header(vec!["Section", "Scaled Score"]);
    for section in Section::ALL {
        let score = result.section_scores.get(&section).copied().unwrap_or(0);
        sections.add_row(vec![section.to_string(), format!("{score} / {SECTION_MAX}")]);
    }
    println!("{sections}");

    if !result.category_results.is_empty() {
        let mut categories = Table::new();
        categories.set_header(vec!["Section", "Category", "Items", "Earned", "Max", "%"]);
        for category in &result.category_results {
            categories.add_row(vec![
                category.section.to_string(),
                category.category.clone(),
                category.total_questions.to_string(),
                format!("{:.1}", category.earned_points),
                format!("{:.1}", category.max_points),
                format!("{:.0}", category.percentage),
            ]);
        }
        println!("{categories}");
    }
}
