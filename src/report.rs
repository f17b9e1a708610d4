//! Plain-text rendering of query results.

use std::fmt::Write;

use crate::analytics::{ConversationSummary, NestedTotals};

/// Whole numbers print without a fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Left-aligned columns under a dashed rule.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{cell:<width$}");
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// One heading and one table per outer key, in insertion order.
pub fn render_totals(
    totals: &NestedTotals,
    outer_label: &str,
    inner_label: &str,
    value_label: &str,
) -> String {
    let mut out = String::new();
    for group in totals.iter() {
        let _ = writeln!(out, "{outer_label}: {}", group.key());
        let rows: Vec<Vec<String>> = group
            .iter()
            .map(|(inner, value)| vec![inner.to_string(), format_value(value)])
            .collect();
        out.push_str(&render_table(&[inner_label, value_label], &rows));
        out.push('\n');
    }
    out
}

pub fn render_conversation(summary: &ConversationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Conversation ID: {}", summary.id);
    let _ = writeln!(out, "Conversation start timestamp: {}", summary.started);
    let _ = writeln!(out, "Conversation end timestamp: {}", summary.ended);
    let _ = writeln!(out, "Has evaluations: {}", yes_no(summary.has_evaluations));
    let _ = writeln!(out, "Has surveys: {}", yes_no(summary.has_surveys));

    if !summary.participants.is_empty() {
        let rows: Vec<Vec<String>> = summary
            .participants
            .iter()
            .map(|p| vec![p.id.clone(), p.name.clone(), p.purpose.clone()])
            .collect();
        out.push_str(&render_table(&["id", "name", "purpose"], &rows));
    }
    out
}
