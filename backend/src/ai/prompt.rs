//! Prompt building for date questions.
//!
//! Turns one date's records into a readable text block and wraps it with the
//! user's question.

use crate::models::{Metric, PerformanceRecord};

/// Render a metric, `N/A` when missing. Whole numbers keep one decimal (`90.0`).
fn metric_text(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e16 => format!("{:.1}", v),
        Some(v) => v.to_string(),
    }
}

/// One paragraph per record, separated by a blank line.
///
/// ```text
/// 📊 Heraldo (Mobile)
/// 🔗 https://x
/// Score: 90.0, CLS: 0.01, LCP: 1.2, SI: 2.0, TBT: 50.0, FCP: 0.9
/// ```
pub fn format_records_block(records: &[PerformanceRecord]) -> String {
    records
        .iter()
        .map(|r| {
            let metrics = Metric::ALL
                .iter()
                .map(|m| format!("{}: {}", m.label(), metric_text(r.metric(*m))))
                .collect::<Vec<_>>()
                .join(", ");
            format!("📊 {} ({})\n🔗 {}\n{}", r.outlet, r.kind, r.url, metrics)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// System prompt for the text-generation model.
pub fn system_prompt() -> String {
    r#"You are a web performance analyst. You receive Lighthouse results for a set of news outlets measured on a single date and answer questions about them.

## Metrics

- Score: Lighthouse performance score (0-100, higher is better)
- CLS: Cumulative Layout Shift (lower is better, good below 0.1)
- LCP: Largest Contentful Paint in seconds (good below 2.5)
- SI: Speed Index in seconds (lower is better)
- TBT: Total Blocking Time in milliseconds (good below 200)
- FCP: First Contentful Paint in seconds (good below 1.8)

## Rules

1. Base every statement on the data provided; N/A means the value was not measured
2. Compare outlets when the question asks for rankings or differences
3. Quote the numbers you rely on
4. Answer in the language of the question, concisely"#
        .to_string()
}

/// User message: the date, its data block and the question.
pub fn user_prompt(date: &str, question: &str, block: &str) -> String {
    format!(
        "Lighthouse results for {date}:\n\n{block}\n\nQuestion: {question}",
        date = date,
        block = block,
        question = question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outlet: &str, score: Option<f64>) -> PerformanceRecord {
        PerformanceRecord {
            outlet: outlet.into(),
            kind: "Mobile".into(),
            url: "https://x".into(),
            score,
            cls: Some(0.01),
            lcp: None,
            si: Some(2.0),
            tbt: Some(50.0),
            fcp: Some(0.9),
        }
    }

    #[test]
    fn test_block_format() {
        let block = format_records_block(&[record("Heraldo", Some(90.0))]);
        assert_eq!(
            block,
            "📊 Heraldo (Mobile)\n🔗 https://x\nScore: 90.0, CLS: 0.01, LCP: N/A, SI: 2.0, TBT: 50.0, FCP: 0.9"
        );
    }

    #[test]
    fn test_metric_text() {
        assert_eq!(metric_text(Some(90.0)), "90.0");
        assert_eq!(metric_text(Some(-3.0)), "-3.0");
        assert_eq!(metric_text(Some(0.01)), "0.01");
        assert_eq!(metric_text(Some(1250.5)), "1250.5");
        assert_eq!(metric_text(None), "N/A");
    }

    #[test]
    fn test_records_separated_by_blank_line() {
        let block = format_records_block(&[record("Heraldo", None), record("As", Some(70.0))]);
        let paragraphs: Vec<&str> = block.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].contains("Score: N/A"));
        assert!(paragraphs[1].starts_with("📊 As (Mobile)"));
    }

    #[test]
    fn test_user_prompt_contains_parts() {
        let prompt = user_prompt("2024-01-01", "Who is fastest?", "BLOCK");
        assert!(prompt.contains("2024-01-01"));
        assert!(prompt.contains("BLOCK"));
        assert!(prompt.ends_with("Question: Who is fastest?"));
    }
}
