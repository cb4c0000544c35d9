//! Plain-text tables for `--format table`.

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_WIDTH: usize = 4;
const GAP: &str = "  ";

/// Render aligned rows under a header line and a dashed divider.
///
/// Columns shrink (widest first) until the table fits `max_width`. Cells
/// that no longer fit are cut with an ellipsis.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_WIDTH)
        })
        .collect();
    shrink_to_fit(&mut widths, options.max_width);

    let header = join_cells(headers.iter().copied(), &widths, false);
    let divider = "-".repeat(header.chars().count());

    let mut lines = vec![header, divider];
    for row in rows {
        let cells = (0..widths.len()).map(|col| row.get(col).map_or("-", String::as_str));
        lines.push(join_cells(cells, &widths, options.color));
    }
    lines.join("\n")
}

/// Render board columns side by side, one card per line.
#[must_use]
pub fn render_columns(columns: &[(String, Vec<String>)], options: TableOptions) -> String {
    let headers: Vec<&str> = columns.iter().map(|(title, _)| title.as_str()).collect();
    let depth = columns.iter().map(|(_, cards)| cards.len()).max().unwrap_or(0);
    let rows: Vec<Vec<String>> = (0..depth)
        .map(|line| {
            columns
                .iter()
                .map(|(_, cards)| cards.get(line).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    render(&headers, &rows, options)
}

fn join_cells<'a>(
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    color: bool,
) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let text = truncate(cell, *width);
            let pad = " ".repeat(width.saturating_sub(text.chars().count()));
            if color {
                format!("{}{pad}", colorize(&text))
            } else {
                format!("{text}{pad}")
            }
        })
        .collect::<Vec<_>>()
        .join(GAP)
        .trim_end()
        .to_string()
}

fn shrink_to_fit(widths: &mut [usize], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max_width {
        let Some(widest) = widths
            .iter_mut()
            .filter(|w| **w > MIN_WIDTH)
            .max_by_key(|w| **w)
        else {
            break;
        };
        *widest -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn colorize(value: &str) -> String {
    let code = match value.trim() {
        "done" | "success" => "32",
        "pending" | "in_progress" => "33",
        "overdue" | "cancelled" | "error" | "high" => "31",
        _ => return value.to_string(),
    };
    format!("\u{1b}[{code}m{value}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "pending".to_string()],
            vec!["200".to_string(), "in_progress".to_string()],
        ];
        let out = render(&["id", "status"], &rows, PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id    status");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[3], "200   in_progress");
    }

    #[test]
    fn narrows_widest_column_to_fit() {
        let rows = vec![vec!["7".to_string(), "Call back about the lab results".to_string()]];
        let out = render(
            &["id", "title"],
            &rows,
            TableOptions {
                max_width: Some(20),
                color: false,
            },
        );
        let last = out.lines().last().unwrap();
        assert!(last.chars().count() <= 20);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn columns_render_side_by_side() {
        let columns = vec![
            ("pending (2)".to_string(), vec!["#1 a".to_string(), "#2 b".to_string()]),
            ("done (1)".to_string(), vec!["#3 c".to_string()]),
        ];
        let out = render_columns(&columns, PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "#1 a         #3 c");
        assert_eq!(lines[3], "#2 b");
    }

    #[test]
    fn colors_status_cells() {
        assert_eq!(colorize("overdue"), "\u{1b}[31moverdue\u{1b}[0m");
        assert_eq!(colorize("Task 7"), "Task 7");
    }
}
