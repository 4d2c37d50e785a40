//! Plain-text table rendering for CLI output

use console::Style;
use whodunnitlib::{AttributionReport, WalkReport};

const NAME_WIDTH: usize = 28;
const CELL_WIDTH: usize = 10;
/// Filetypes listed per author in the author table
const TOP_TYPES: usize = 3;

/// Row ordering for the filetype table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Descending line count, ties alphabetical
    Lines,
    /// Alphabetical by name
    Name,
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        match value {
            "name" => SortOrder::Name,
            _ => SortOrder::Lines,
        }
    }
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() > max_len {
        let tail: String = chars[chars.len() - (max_len - 2)..].iter().collect();
        format!("..{}", tail)
    } else {
        name.to_string()
    }
}

fn percent(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}

fn row(name: &str, cells: &[String]) -> String {
    let mut line = format!(
        "{:<width$}",
        truncate_name(name, NAME_WIDTH - 2),
        width = NAME_WIDTH
    );
    for cell in cells {
        line.push_str(&format!(" {:>width$}", cell, width = CELL_WIDTH));
    }
    line
}

fn separator(columns: usize) -> String {
    "-".repeat(NAME_WIDTH + (CELL_WIDTH + 1) * columns)
}

/// Render lines by filetype.
pub fn render_type_table(report: &WalkReport, order: SortOrder) -> String {
    let bold = Style::new().bold();
    let names = match order {
        SortOrder::Lines => &report.sorted_by_count,
        SortOrder::Name => &report.sorted_alphabetical,
    };

    let mut out = String::new();
    let header = row(
        "Filetype",
        &["Files".to_string(), "Lines".to_string(), "Share".to_string()],
    );
    out.push_str(&format!("{}\n{}\n", bold.apply_to(header), separator(3)));

    for name in names {
        let lines = report.lines_for(name);
        let files = report.files.iter().filter(|f| &f.filetype == name).count();
        out.push_str(&row(
            name,
            &[
                files.to_string(),
                lines.to_string(),
                percent(lines, report.total_lines),
            ],
        ));
        out.push('\n');
    }

    out.push_str(&separator(3));
    out.push('\n');
    let total = row(
        &format!("Total ({} types)", names.len()),
        &[
            report.file_count().to_string(),
            report.total_lines.to_string(),
            String::new(),
        ],
    );
    out.push_str(&format!("{}\n", bold.apply_to(total)));
    out
}

/// Render lines by author, with each author's leading filetypes.
pub fn render_author_table(report: &AttributionReport) -> String {
    let bold = Style::new().bold();
    let dim = Style::new().dim();
    let total_lines = report.total_lines();

    let mut out = String::new();
    let header = row("Author", &["Lines".to_string(), "Share".to_string()]);
    out.push_str(&format!("{}  {}\n", bold.apply_to(header), bold.apply_to("Top filetypes")));
    out.push_str(&separator(2));
    out.push('\n');

    for author in report.ranked() {
        let top: Vec<String> = author
            .sorted_by_count
            .iter()
            .take(TOP_TYPES)
            .map(|filetype| format!("{} {}", filetype, author.lines_for(filetype)))
            .collect();
        out.push_str(&row(
            &author.author,
            &[
                author.total_lines.to_string(),
                percent(author.total_lines, total_lines),
            ],
        ));
        out.push_str(&format!("  {}\n", dim.apply_to(top.join(", "))));
    }

    out.push_str(&separator(2));
    out.push('\n');
    let total = row(
        &format!("Total ({} authors)", report.authors.len()),
        &[total_lines.to_string(), String::new()],
    );
    out.push_str(&format!("{}\n", bold.apply_to(total)));
    if report.files_skipped > 0 {
        out.push_str(&format!(
            "{} file(s) could not be attributed\n",
            report.files_skipped
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("a-very-long-author-name", 10), "..hor-name");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), "25.0%");
        assert_eq!(percent(0, 0), "-");
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("name"), SortOrder::Name);
        assert_eq!(SortOrder::parse("lines"), SortOrder::Lines);
    }
}
