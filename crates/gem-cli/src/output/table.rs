use gem_core::CellValue;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Smallest width a column is squeezed to when fitting the terminal.
const MIN_WIDTH: usize = 4;

struct Cell {
    text: String,
    numeric: bool,
    null: bool,
}

impl Cell {
    fn from_value(value: &CellValue) -> Self {
        Self {
            // Keep one row per line.
            text: value.to_string().replace('\n', "\\n").replace('\t', " "),
            numeric: matches!(value, CellValue::Integer(_) | CellValue::Real(_)),
            null: value.is_null(),
        }
    }
}

fn text_width(value: &str) -> usize {
    value.chars().count()
}

/// Render an aligned grid for one result set.
///
/// Numbers are right-aligned; `NULL` is dimmed when color is on.
#[must_use]
pub fn render_grid(headers: &[String], rows: &[Vec<CellValue>], options: TableOptions) -> String {
    let cells = rows
        .iter()
        .map(|row| row.iter().map(Cell::from_value).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| text_width(&cell.text))
                .max()
                .unwrap_or(0)
                .max(text_width(header))
                .max(MIN_WIDTH)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| pad(&truncate_text(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let header_line = if options.color {
        paint("1", header_line.trim_end())
    } else {
        header_line.trim_end().to_string()
    };

    let divider = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("  ");

    let row_lines = cells.iter().map(|row| {
        widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let Some(cell) = row.get(index) else {
                    return " ".repeat(*width);
                };
                let padded = pad(&truncate_text(&cell.text, *width), *width, cell.numeric);
                if options.color && cell.null {
                    paint("2", &padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    });

    let mut lines = Vec::with_capacity(2 + cells.len());
    lines.push(header_line);
    lines.push(divider);
    lines.extend(row_lines);
    lines.join("\n")
}

/// Shrink the widest columns first until the grid fits `max_width`.
fn fit_widths(widths: &mut [usize], headers: &[String], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    if widths.is_empty() {
        return;
    }

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let mut candidate_idx = None;
        let mut candidate_width = 0usize;
        for (idx, width) in widths.iter().enumerate() {
            let min_width = text_width(&headers[idx]).clamp(MIN_WIDTH, 12);
            if *width > min_width && *width > candidate_width {
                candidate_idx = Some(idx);
                candidate_width = *width;
            }
        }

        let Some(idx) = candidate_idx else {
            break;
        };

        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if text_width(value) <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text_width(value)));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

/// Wrap `value` in an SGR escape sequence.
#[must_use]
pub fn paint(code: &str, value: &str) -> String {
    format!("\u{1b}[{code}m{value}\u{1b}[0m")
}
