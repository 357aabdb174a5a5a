//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use scorelink_core::model::Section;
use scorelink_core::report::ScoreReport;
use scorelink_core::scoring::SECTION_MAX;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML document from a score report.
pub fn render_html(report: &ScoreReport) -> String {
    let result = &report.result;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Score report — {}</title>\n",
        html_escape(&result.student_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header with the headline score
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{} — Score Report</h1>\n",
        html_escape(&result.student_name)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Computed {} | raw points earned: {:.1}</p>\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        result.actual_earned_points
    ));
    html.push_str(&format!(
        "<div class=\"total\"><span class=\"score\">{}</span> <span class=\"of\">/ {}</span></div>\n",
        result.total_score, result.max_score
    ));
    html.push_str("</header>\n");

    // Section summary table
    html.push_str("<section class=\"sections\">\n");
    html.push_str("<h2>Sections</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Section</th><th>Scaled Score</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for section in Section::ALL {
        let score = result.section_scores.get(&section).copied().unwrap_or(0);
        html.push_str(&format!(
            "<tr><td>{section}</td><td>{score} / {SECTION_MAX}</td></tr>\n"
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Per-category achievement bars
    html.push_str("<section class=\"categories\">\n");
    html.push_str("<h2>Category Achievement</h2>\n");
    for section in Section::ALL {
        let categories: Vec<_> = result
            .category_results
            .iter()
            .filter(|c| c.section == section)
            .collect();
        if categories.is_empty() {
            continue;
        }
        html.push_str(&format!("<h3>{section}</h3>\n"));
        for category in categories {
            let width = category.percentage.clamp(0.0, 100.0);
            html.push_str(&format!(
                "<div class=\"bar-row\"><span class=\"label\">{}</span>\
                 <div class=\"bar\"><div class=\"fill\" style=\"width:{:.1}%\"></div></div>\
                 <span class=\"pct\">{:.0}%</span></div>\n",
                html_escape(&category.category),
                width,
                category.percentage
            ));
        }
    }
    html.push_str("</section>\n");

    // Reopen link, when the report was shared
    if let Some(fragment) = &report.share_fragment {
        html.push_str("<footer>\n");
        html.push_str(&format!(
            "<p class=\"share\">Shareable fragment: <code>{}</code></p>\n",
            html_escape(fragment)
        ));
        html.push_str("</footer>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ScoreReport, path: &Path) -> Result<()> {
    let html = render_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", sans-serif; max-width: 860px;
       margin: 2rem auto; padding: 0 1rem; color: #1e293b; }
header { border-bottom: 2px solid #e2e8f0; padding-bottom: 1rem; }
h1 { margin-bottom: 0.25rem; }
.meta { color: #64748b; font-size: 0.85rem; }
.total { font-size: 1.25rem; margin: 0.5rem 0; }
.total .score { font-size: 3rem; font-weight: 800; color: #4f46e5; }
.total .of { color: #94a3b8; }
table.summary { border-collapse: collapse; min-width: 50%; }
table.summary th, table.summary td { border: 1px solid #e2e8f0;
       padding: 0.5rem 1rem; text-align: left; }
table.summary th { background: #f8fafc; }
.bar-row { display: flex; align-items: center; gap: 0.75rem; margin: 0.4rem 0; }
.bar-row .label { flex: 0 0 10rem; font-weight: 600; }
.bar { flex: 1; height: 0.75rem; background: #f1f5f9; border-radius: 0.4rem;
       overflow: hidden; }
.fill { height: 100%; background: #4f46e5; border-radius: 0.4rem; }
.pct { flex: 0 0 3rem; text-align: right; font-variant-numeric: tabular-nums; }
footer { margin-top: 2rem; color: #64748b; font-size: 0.85rem;
       word-break: break-all; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use scorelink_core::model::{Question, Section, StudentInput};
    use scorelink_core::scoring::evaluate;

    fn sample_report() -> ScoreReport {
        let questions = vec![
            Question {
                correct_answer: Some("B".into()),
                category: "Vocabulary".into(),
                ..Question::mcq(Section::Reading, 1)
            },
            Question::direct(Section::Speaking, 0, "Delivery", 5.0),
        ];
        let mut student = StudentInput {
            name: "Kim <Tester>".into(),
            ..StudentInput::empty()
        };
        student.answers.insert("R-1".into(), "B".into());
        student.answers.insert("S-D-0".into(), "4".into());
        ScoreReport::new(evaluate(&questions, &student))
    }

    #[test]
    fn renders_scores_and_escapes_names() {
        let html = render_html(&sample_report());
        assert!(html.contains("Kim &lt;Tester&gt;"));
        assert!(!html.contains("Kim <Tester>"));
        assert!(html.contains("Vocabulary"));
        assert!(html.contains("Delivery"));
        assert!(html.contains("/ 120"));
        // Reading was answered perfectly, so its row shows a full score.
        assert!(html.contains("<tr><td>Reading</td><td>30 / 30</td></tr>"));
    }

    #[test]
    fn share_fragment_appears_when_present() {
        let mut report = sample_report();
        assert!(!render_html(&report).contains("Shareable fragment"));
        report.share_fragment = Some("#s=token".into());
        assert!(render_html(&report).contains("#s=token"));
    }

    #[test]
    fn writes_to_nested_path() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");
        write_html_report(&report, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
