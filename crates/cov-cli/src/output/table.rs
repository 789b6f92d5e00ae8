//! Plain-text tables for `--format table`.

const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct Column<'a> {
    header: &'a str,
    width: usize,
    align: Align,
}

impl Column<'_> {
    fn min_width(&self) -> usize {
        self.header.chars().count().max(MIN_COLUMN_WIDTH)
    }
}

/// Render an aligned table. A column whose cells are all numeric (or `-`) is
/// right-aligned.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut columns: Vec<Column<'_>> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let cells = || rows.iter().filter_map(|row| row.get(index));
            let widest = cells().map(|cell| cell.chars().count()).max().unwrap_or(0);
            let numeric = rows.iter().any(|row| row.get(index).is_some())
                && cells().all(|cell| cell == "-" || looks_numeric(cell));
            Column {
                header,
                width: widest.max(header.chars().count()).max(MIN_COLUMN_WIDTH),
                align: if numeric { Align::Right } else { Align::Left },
            }
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut columns, max_width);
    }

    let header_line = columns
        .iter()
        .map(|column| pad(&truncate(column.header, column.width), column.width, Align::Left))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push("-".repeat(header_line.chars().count()));
    lines.insert(0, header_line);

    for row in rows {
        let line = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let cell = row.get(index).map_or("-", String::as_str);
                let text = pad(&truncate(cell, column.width), column.width, column.align);
                if options.color {
                    colorize_status(&text)
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line);
    }
    lines.join("\n")
}

/// Narrow the widest shrinkable column one character at a time until the
/// table fits or every column is at its minimum.
fn shrink_to_fit(columns: &mut [Column<'_>], max_width: usize) {
    let separators = columns.len().saturating_sub(1) * SEPARATOR.len();
    let total = |columns: &[Column<'_>]| columns.iter().map(|c| c.width).sum::<usize>() + separators;

    while total(columns) > max_width {
        let Some(widest) = columns
            .iter_mut()
            .filter(|column| column.width > column.min_width())
            .max_by_key(|column| column.width)
        else {
            break;
        };
        widest.width -= 1;
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

fn pad(value: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{value:<width$}"),
        Align::Right => format!("{value:>width$}"),
    }
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

/// Outcome and severity words get the dashboard's badge colors. Padding is
/// applied first, so only the word itself is wrapped.
fn colorize_status(cell: &str) -> String {
    let word = cell.trim();
    let code = match word.to_ascii_lowercase().as_str() {
        "pass" | "passed" | "true" => "32",
        "not run" | "not_run" | "pending" | "minor" | "undecided" => "33",
        "fail" | "failed" | "blocked" | "critical" | "major" => "31",
        _ => return cell.to_string(),
    };
    cell.replacen(word, &format!("\u{1b}[{code}m{word}\u{1b}[0m"), 1)
}
