#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

/// Render an aligned table of string rows.
///
/// Widths are measured in chars so non-ASCII titles line up. When
/// `max_width` is set, the widest columns shrink first and overflowing cells
/// are cut with an ellipsis.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(min_width(header))
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate_text(header, *width), *width, false, None))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line.trim_end().to_string());
    lines.push(divider.trim_end().to_string());

    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                let text = truncate_text(value, *width);
                let color = if options.color { status_color(&text) } else { None };
                pad(&text, *width, looks_numeric(&text), color)
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

fn min_width(header: &str) -> usize {
    header.chars().count().max(MIN_COLUMN_WIDTH)
}

fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > min_width(headers[*idx]))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);

        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

fn pad(value: &str, width: usize, right_align: bool, color: Option<&str>) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    let value = match color {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    };
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

/// ANSI color for item states and auth results.
fn status_color(value: &str) -> Option<&'static str> {
    match value {
        "committed" | "true" | "keyring" => Some("32"),
        "skipped" | "pending" | "mapped" | "media_resolved" | "env" | "file" => Some("33"),
        "failed" | "false" => Some("31"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn columns_align_on_mixed_widths() {
        let table = render_entity_table(
            &["id", "state", "title"],
            &rows(&[
                &["a", "committed", "short"],
                &["b", "failed", "a much longer title"],
            ]),
            PLAIN,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "id      state      title");
        assert_eq!(lines[2], "a       committed  short");
        assert_eq!(lines[3], "b       failed     a much longer title");
    }

    #[test]
    fn non_ascii_titles_are_measured_in_chars() {
        let table = render_entity_table(
            &["title", "state"],
            &rows(&[&["Einkäufe", "committed"], &["Notes", "skipped"]]),
            PLAIN,
        );
        let lines: Vec<&str> = table.lines().collect();
        let state_col = |line: &str| line.chars().skip(10).collect::<String>();
        assert_eq!(state_col(lines[2]), "committed");
        assert_eq!(state_col(lines[3]), "skipped");
    }

    #[test]
    fn narrow_terminal_truncates_the_widest_column() {
        let table = render_entity_table(
            &["id", "title"],
            &rows(&[&["1", "a very long title that will not fit"]]),
            TableOptions {
                max_width: Some(24),
                color: false,
            },
        );
        let row = table.lines().nth(2).expect("data row");
        assert!(row.chars().count() <= 24);
        assert!(row.ends_with('…'));
    }

    #[test]
    fn numbers_are_right_aligned() {
        let table = render_entity_table(&["key", "value"], &rows(&[&["imported", "7"]]), PLAIN);
        assert!(table.lines().nth(2).is_some_and(|line| line.ends_with("     7")));
    }

    #[test]
    fn colors_wrap_known_states_only() {
        let table = render_entity_table(
            &["state", "title"],
            &rows(&[&["failed", "x"]]),
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(table.contains("\u{1b}[31mfailed\u{1b}[0m"));
        assert!(!table.contains("\u{1b}[31mx"));
    }
}
