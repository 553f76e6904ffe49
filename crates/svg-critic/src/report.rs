//! Human-readable rendering of evaluations.
//!
//! [`markdown`] renders one [`Evaluation`] with one section per aspect, in
//! the same order the evaluation serializes them. Section bodies use
//! `- **Label**: value` lines and nested bullets for suggestions.
//!
//! [`html`] renders a whole design loop history as a single progress page.

use crate::{design_loop::IterationRecord, evaluation::Evaluation};

const HTML_STYLE: [&str; 12] = [
    "body { font-family: Arial, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; }",
    "h1, h2 { color: #333; }",
    ".iteration { border: 1px solid #ddd; margin-bottom: 30px; padding: 20px; border-radius: 5px; }",
    ".iteration-header { display: flex; justify-content: space-between; align-items: center; }",
    ".score { font-size: 24px; font-weight: bold; color: #19aeff; }",
    ".svg-container { margin: 20px 0; border: 1px dashed #ccc; padding: 10px; }",
    ".suggestion { background-color: #f8f9fa; padding: 10px; margin: 5px 0; border-left: 4px solid #ffc022; }",
    ".issue { background-color: #ffebee; padding: 10px; margin: 5px 0; border-left: 4px solid #ff4141; }",
    ".metrics { display: flex; flex-wrap: wrap; gap: 20px; margin: 20px 0; }",
    ".metric-card { border: 1px solid #eee; padding: 15px; border-radius: 5px; min-width: 200px; }",
    ".metric-title { font-weight: bold; margin-bottom: 10px; }",
    ".metric-value { font-size: 20px; color: #333; }",
];

/// Renders `evaluation` as a markdown report.
pub fn markdown(evaluation: &Evaluation) -> String {
    let mut lines = vec![
        "# SVG Design Evaluation Report".to_string(),
        String::new(),
        format!("## Overall Score: {}/100", evaluation.overall_score()),
        String::new(),
        "## Critical Issues".to_string(),
    ];

    if evaluation.critical_issues().is_empty() {
        lines.push("No critical issues detected!".to_string());
    }
    for issue in evaluation.critical_issues() {
        let [first, second] = issue.elements();
        lines.push(format!(
            "- **{}**: Overlap between elements {first} and {second}",
            issue.severity().as_str().to_uppercase()
        ));
    }
    lines.push(String::new());

    let layout = evaluation.layout_assessment();
    lines.push("## Layout Assessment".to_string());
    lines.push(format!(
        "- **Balance Score**: {:.1}/100",
        layout.balance_score()
    ));
    lines.push("- **Quadrant Distribution**:".to_string());
    for (quadrant, count) in layout.quadrant_distribution() {
        lines.push(format!(
            "  - {}: {count} elements",
            quadrant.label().to_uppercase()
        ));
    }
    push_suggestions(&mut lines, layout.suggestions());

    let color = evaluation.color_harmony();
    lines.push("## Color Harmony".to_string());
    lines.push(format!("- **Unique Colors**: {}", color.unique_colors()));
    lines.push(format!(
        "- **Palette Adherence**: {:.1}%",
        color.palette_adherence()
    ));
    push_suggestions(&mut lines, color.suggestions());

    let hierarchy = evaluation.visual_hierarchy();
    lines.push("## Visual Hierarchy".to_string());
    lines.push(format!("- **Score**: {}/100", hierarchy.score()));
    if let Some(ratio) = hierarchy.size_ratio() {
        lines.push(format!("- **Size Ratio (largest:smallest)**: {ratio:.1}x"));
    }
    push_suggestions(&mut lines, hierarchy.suggestions());

    let accessibility = evaluation.accessibility();
    lines.push("## Accessibility".to_string());
    lines.push(format!("- **Score**: {:.1}/100", accessibility.score()));
    lines.push(format!(
        "- **Font Size Score**: {:.1}/100",
        accessibility.font_size_score()
    ));
    lines.push(format!(
        "- **Contrast Issues**: {}",
        accessibility.contrast_issues().len()
    ));
    for issue in accessibility.contrast_issues() {
        lines.push(format!("  - {issue}"));
    }
    push_suggestions(&mut lines, accessibility.suggestions());

    if !evaluation.suggested_code_changes().is_empty() {
        lines.push("## Suggested Code Improvements".to_string());
        for change in evaluation.suggested_code_changes() {
            lines.push(format!("- **{}**: {}", change.kind().title(), change.issue()));
            lines.push(format!("  - Suggestion: {}", change.suggestion()));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Renders a design loop history as an HTML progress page.
///
/// `input_name` is shown in the page header. `svg_file` names the SVG file
/// written for each iteration; it is embedded relative to the page, so the
/// page belongs in the same directory as the SVG files.
pub fn html(
    input_name: &str,
    history: &[IterationRecord],
    svg_file: impl Fn(&IterationRecord) -> String,
) -> String {
    let mut lines = vec![
        "<!DOCTYPE html>".to_string(),
        "<html lang='en'>".to_string(),
        "<head>".to_string(),
        "    <meta charset='UTF-8'>".to_string(),
        "    <title>SVG Design Loop - Progress Report</title>".to_string(),
        "    <style>".to_string(),
    ];
    lines.extend(HTML_STYLE.iter().map(|rule| format!("        {rule}")));
    lines.extend([
        "    </style>".to_string(),
        "</head>".to_string(),
        "<body>".to_string(),
        "    <h1>SVG Design Loop - Progress Report</h1>".to_string(),
        format!("    <p>Input SVG: {}</p>", escape_html(input_name)),
    ]);
    if let Some(last) = history.last() {
        lines.push(format!(
            "    <p>Final Score: {}/100</p>",
            last.evaluation().overall_score()
        ));
    }

    for record in history {
        push_iteration(&mut lines, record, &svg_file(record));
    }

    lines.push("</body>".to_string());
    lines.push("</html>".to_string());
    lines.join("\n")
}

fn push_iteration(lines: &mut Vec<String>, record: &IterationRecord, svg_file: &str) {
    let evaluation = record.evaluation();
    let svg_file = escape_html(svg_file);

    lines.push("    <div class='iteration'>".to_string());
    lines.push("        <div class='iteration-header'>".to_string());
    lines.push(format!("            <h2>Iteration {}</h2>", record.iteration()));
    lines.push(format!(
        "            <div class='score'>{}/100</div>",
        evaluation.overall_score()
    ));
    lines.push("        </div>".to_string());

    lines.push("        <div class='svg-container'>".to_string());
    lines.push(format!("            <h3>SVG: {svg_file}</h3>"));
    lines.push(format!(
        "            <object data='{svg_file}' type='image/svg+xml' width='100%' height='400px'></object>"
    ));
    lines.push("        </div>".to_string());

    let metrics = [
        (
            "Layout Balance",
            format!("{:.1}/100", evaluation.layout_assessment().balance_score()),
        ),
        (
            "Color Harmony",
            format!("{:.1}%", evaluation.color_harmony().palette_adherence()),
        ),
        (
            "Visual Hierarchy",
            format!("{}/100", evaluation.visual_hierarchy().score()),
        ),
        (
            "Accessibility",
            format!("{:.1}/100", evaluation.accessibility().score()),
        ),
    ];
    lines.push("        <div class='metrics'>".to_string());
    for (title, value) in metrics {
        lines.push("            <div class='metric-card'>".to_string());
        lines.push(format!("                <div class='metric-title'>{title}</div>"));
        lines.push(format!("                <div class='metric-value'>{value}</div>"));
        lines.push("            </div>".to_string());
    }
    lines.push("        </div>".to_string());

    if !evaluation.critical_issues().is_empty() {
        lines.push("        <h3>Critical Issues</h3>".to_string());
    }
    for issue in evaluation.critical_issues() {
        let [first, second] = issue.elements();
        lines.push(format!(
            "        <div class='issue'><strong>{}</strong>: Overlap between elements {} and {}</div>",
            issue.severity().as_str().to_uppercase(),
            escape_html(first),
            escape_html(second)
        ));
    }

    lines.push("        <h3>Improvement Suggestions</h3>".to_string());
    let groups = [
        ("Layout", evaluation.layout_assessment().suggestions()),
        ("Color", evaluation.color_harmony().suggestions()),
        ("Hierarchy", evaluation.visual_hierarchy().suggestions()),
        ("Accessibility", evaluation.accessibility().suggestions()),
    ];
    for (aspect, suggestions) in groups {
        for suggestion in suggestions {
            lines.push(format!(
                "        <div class='suggestion'><strong>{aspect}</strong>: {}</div>",
                escape_html(suggestion)
            ));
        }
    }

    lines.push("    </div>".to_string());
}

/// Escapes text for HTML element content and single or double quoted
/// attribute values.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Appends a suggestions list, if any, and closes the section.
fn push_suggestions(lines: &mut Vec<String>, suggestions: &[String]) {
    if !suggestions.is_empty() {
        lines.push("- **Suggestions**:".to_string());
        lines.extend(suggestions.iter().map(|s| format!("  - {s}")));
    }
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        design_loop::{DesignLoop, LoopConfig},
        evaluation::evaluate,
    };
    use svg_critic_parser::parse;

    fn report(source: &str) -> String {
        markdown(&evaluate(&parse(source).expect("valid document")))
    }

    #[test]
    fn test_empty_document_report() {
        let text = report(r#"<svg width="100" height="100"/>"#);

        assert!(text.starts_with("# SVG Design Evaluation Report\n\n## Overall Score: 65/100\n"));
        assert!(text.contains("## Critical Issues\nNo critical issues detected!\n"));
        assert!(text.contains("  - Q1: 0 elements\n  - Q2: 0 elements"));
        assert!(text.contains("- **Palette Adherence**: 0.0%"));
        assert!(!text.contains("Size Ratio"));
        assert!(!text.contains("## Suggested Code Improvements"));
    }

    #[test]
    fn test_overlap_report() {
        let text = report(
            r##"<svg width="400" height="400">
                <g id="left"><rect id="a" x="100" y="100" width="100" height="100" fill="#ff4141"/></g>
                <g id="right"><rect id="b" x="120" y="120" width="100" height="100" fill="#19aeff"/></g>
            </svg>"##,
        );

        assert!(text.contains("- **HIGH**: Overlap between elements a and b"));
        assert!(text.contains("- **Size Ratio (largest:smallest)**: 1.0x"));
        assert!(text.contains("## Suggested Code Improvements"));
        assert!(text.contains("- **Position**: Elements overlap by 64.0%"));
        assert!(text.contains("  - Suggestion: Adjust position of a or b to prevent overlap"));
    }

    #[test]
    fn test_accessibility_section_lists_contrast_issues() {
        let text = report(
            r##"<svg width="400" height="400">
                <rect id="pale" x="100" y="100" width="50" height="50" fill="white" stroke="#f0f0f0"/>
                <text x="150" y="150" font-size="8">tiny</text>
            </svg>"##,
        );
        assert!(text.contains(
            "- **Contrast Issues**: 1\n  - Low contrast white on light gray in element pale"
        ));
        assert!(
            text.contains("  - Increase font size for 1 text elements that are smaller than 10px")
        );
        assert!(text.contains(
            "- **General**: Missing element IDs\n  - Suggestion: Add ID attributes to 1 elements"
        ));
    }

    const CROWDED: &str = r##"<svg width="400" height="400">
        <g id="left"><rect id="a&amp;b" x="100" y="100" width="100" height="100" fill="purple"/></g>
        <g id="right"><rect id="c" x="120" y="120" width="100" height="100" fill="olive"/></g>
    </svg>"##;

    fn history(iterations: u32) -> Vec<IterationRecord> {
        let config = LoopConfig::new(iterations, 100).expect("valid config");
        DesignLoop::new(config)
            .run(parse(CROWDED).expect("valid document"))
            .into_history()
    }

    #[test]
    fn test_html_lists_every_iteration() {
        let history = history(2);
        let page = html("crowded.svg", &history, |record| {
            format!("crowded_{}.svg", record.iteration())
        });

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.ends_with("</html>"));
        assert!(page.contains("<p>Input SVG: crowded.svg</p>"));
        assert_eq!(page.matches("<div class='iteration'>").count(), 2);
        assert_eq!(page.matches("<div class='metric-card'>").count(), 8);

        for record in &history {
            let n = record.iteration();
            let score = record.evaluation().overall_score();
            assert!(page.contains(&format!("<h2>Iteration {n}</h2>")));
            assert!(page.contains(&format!("<div class='score'>{score}/100</div>")));
            assert!(page.contains(&format!("<object data='crowded_{n}.svg'")));
        }
        let final_score = history[1].evaluation().overall_score();
        assert!(page.contains(&format!("<p>Final Score: {final_score}/100</p>")));
    }

    #[test]
    fn test_html_escapes_labels_and_groups_suggestions() {
        let page = html("<input>.svg", &history(1), |_| "out.svg".to_string());

        assert!(page.contains("<p>Input SVG: &lt;input&gt;.svg</p>"));
        assert!(page.contains("<h3>Critical Issues</h3>"));
        assert!(page.contains(
            "<div class='issue'><strong>HIGH</strong>: Overlap between elements a&amp;b and c</div>"
        ));
        assert!(page.contains("<div class='suggestion'><strong>Color</strong>: "));
        assert!(page.contains("<div class='suggestion'><strong>Hierarchy</strong>: "));
    }

    #[test]
    fn test_html_without_history() {
        let page = html("empty.svg", &[], |_| String::new());
        assert!(!page.contains("Final Score"));
        assert!(!page.contains("<div class='iteration'>"));
    }
}
