//! Formatted terminal output for the CLI subcommands.
//!
//! We keep formatting code in one place so:
//! - the query and chart code stays clean and testable
//! - output changes are localized

use crate::chart::{ChartSpec, Datum, Trace};
use crate::report::FastFacts;

/// Format a horizontal top-N bar chart as a ranked table, largest first.
pub fn format_top_n(chart: &ChartSpec, heading: &str, unit: &str) -> String {
    let mut out = String::new();
    out.push_str(heading);
    out.push('\n');

    out.push_str(format!("{:>4} {:<32} {:>14}\n", "#", "country", unit).trim_end());
    out.push('\n');
    out.push_str(format!("{:-<4} {:-<32} {:-<14}\n", "", "", "").trim_end());
    out.push('\n');

    let Some(Trace::Bar(bar)) = chart.traces.first() else {
        return out;
    };

    // Bars are stored smallest first.
    for (rank, (x, y)) in bar.x.iter().zip(&bar.y).rev().enumerate() {
        let country = match y {
            Datum::Text(s) => s.as_str(),
            _ => "",
        };
        let value = x.as_number().map(fmt_value).unwrap_or_default();
        out.push_str(format!("{:>4} {:<32} {:>14}\n", rank + 1, truncate(country, 32), value).trim_end());
        out.push('\n');
    }

    out
}

pub fn format_facts(country: &str, facts: &FastFacts) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {country} ===\n"));
    if !facts.title.is_empty() {
        out.push_str(&facts.title);
        out.push('\n');
    }
    for line in [&facts.total, &facts.per_capita, &facts.fossil] {
        out.push_str(&format!("- {line}\n"));
    }
    out
}

fn fmt_value(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.1}")
    } else if v.abs() >= 1.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::top_n_chart;
    use crate::domain::{Category, Metric};
    use crate::report::fixtures::row;

    #[test]
    fn top_n_table_lists_largest_first() {
        let rows = vec![
            row("Chile", Category::Coal, 0.3),
            row("China", Category::Coal, 81.0),
            row("India", Category::Coal, 17.5),
        ];
        let chart = top_n_chart(&rows, Category::Coal, Metric::LastValue, 10);
        let text = format_top_n(&chart, "Top 10: Coal", "QBtu");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Top 10: Coal");
        assert!(lines[3].contains("China") && lines[3].trim_start().starts_with('1'));
        assert!(lines[4].contains("India") && lines[4].contains("17.50"));
        assert!(lines[5].contains("Chile") && lines[5].contains("0.3000"));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Saint Vincent/Grenadines", 10), "Saint Vin.");
        assert_eq!(truncate("Chile", 10), "Chile");
    }

    #[test]
    fn facts_are_bulleted() {
        let facts = FastFacts {
            title: String::new(),
            total: "a".to_string(),
            per_capita: "b".to_string(),
            fossil: "c".to_string(),
        };
        assert_eq!(format_facts("World", &facts), "=== World ===\n- a\n- b\n- c\n");
    }
}
