//! Console table rendering
//!
//! Prints the analysis result as two aligned text tables: the metrics summary
//! (sorted by total execution count, descending) and the shape reference
//! listing each shape's field names.

use crate::models::shapes::{ShapeRow, namespace_display};
use crate::services::query_stats::QueryStatsAnalysis;

/// Column alignment within a rendered table.
#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
}

/// Print both tables to stdout.
pub fn print_tables(analysis: &QueryStatsAnalysis) {
    let mut rows: Vec<ShapeRow> = analysis
        .summaries
        .iter()
        .filter_map(|(id, summary)| {
            let group = analysis.groups.get(id)?;
            ShapeRow::build(*id, summary, group)
        })
        .collect();
    rows.sort_by(|a, b| b.exec_count_total.cmp(&a.exec_count_total));

    let headers = [
        "Shape ID",
        "Namespace",
        "Shapes Count",
        "Exec Count (total)",
        "Avg Exec (ms)",
        "Avg Total Exec (ms)",
        "Docs Returned (total)",
        "Docs Returned (avg)",
        "Keys Examined (total)",
        "Keys Examined (avg)",
        "Docs Examined (total)",
        "Docs Examined (avg)",
    ];
    let mut alignments = vec![Align::Right; headers.len()];
    alignments[0] = Align::Left;
    alignments[1] = Align::Left;

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.shape_id.clone(),
                row.namespace.clone(),
                row.shapes_count.to_string(),
                row.exec_count_total.to_string(),
                format!("{:.2}", row.avg_exec_millis),
                format!("{:.2}", row.avg_total_exec_millis),
                format_total(row.docs_returned_total),
                format!("{:.2}", row.docs_returned_avg),
                format_total(row.keys_examined_total),
                format!("{:.2}", row.keys_examined_avg),
                format_total(row.docs_examined_total),
                format!("{:.2}", row.docs_examined_avg),
            ]
        })
        .collect();

    println!("\nMetrics Summary Table:");
    print!("{}", render_table(&headers, &cells, &alignments));

    println!("\nQuery Shape Reference:");
    let ref_headers = ["Shape ID", "Namespace", "Field Names"];
    let ref_cells: Vec<Vec<String>> = analysis
        .groups
        .iter()
        .filter_map(|(id, group)| {
            let namespace = namespace_display(group.namespace())?;
            let field_str = if group.field_names.is_empty() {
                "No fields".to_string()
            } else {
                group.field_names.join(", ")
            };
            Some(vec![format!("Shape {}", id), namespace, field_str])
        })
        .collect();
    print!("{}", render_table(&ref_headers, &ref_cells, &[Align::Left; 3]));
}

/// Totals arrive as f64 but are integral in practice; keep integral values
/// free of a trailing `.0`.
fn format_total(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Render an ASCII table with `+---+` borders and per-column alignment.
fn render_table(headers: &[&str], rows: &[Vec<String>], alignments: &[Align]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let border: String = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let format_row = |cells: &[String]| -> String {
        let mut line = String::from("|");
        for (i, cell) in cells.iter().enumerate() {
            let padded = match alignments[i] {
                Align::Left => format!(" {:<width$} ", cell, width = widths[i]),
                Align::Right => format!(" {:>width$} ", cell, width = widths[i]),
            };
            line.push_str(&padded);
            line.push('|');
        }
        line.push('\n');
        line
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&format_row(&header_cells));
    out.push_str(&border);
    for row in rows {
        out.push_str(&format_row(row));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_alignment() {
        let headers = ["Name", "Count"];
        let rows = vec![
            vec!["alpha".to_string(), "7".to_string()],
            vec!["b".to_string(), "1234".to_string()],
        ];
        let rendered = render_table(&headers, &rows, &[Align::Left, Align::Right]);

        assert!(rendered.contains("| Name  | Count |"));
        assert!(rendered.contains("| alpha |     7 |"));
        assert!(rendered.contains("| b     |  1234 |"));
        // 3 borders + header + 2 rows
        assert_eq!(rendered.lines().count(), 6);
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(1585.0), "1585");
        assert_eq!(format_total(2.5), "2.50");
    }
}
