//! Standalone printable HTML for a timetable.

use super::{Cell, TimetableGrid, TIME_SLOTS};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::time::Duration;

const CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: center; }
th { background-color: #f2f2f2; }
.subject { font-size: 16px; font-weight: bold; }
.teacher { font-size: 12px; color: #666; }
h1 { text-align: center; }
@media print {
  body { -webkit-print-color-adjust: exact; }
}
"#;

/// What the printed page is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintHeader {
    pub semester: u32,
    pub grade: Option<String>,
}

impl PrintHeader {
    pub fn title(&self) -> String {
        match &self.grade {
            Some(grade) => format!("Timetable - Semester {} Grade {}", self.semester, grade),
            None => format!("Timetable - Semester {}", self.semester),
        }
    }
}

/// Renders `grid` as a complete HTML document that opens the print dialog
/// `print_delay` after it has loaded.
pub fn render_print_document(
    grid: &TimetableGrid,
    header: &PrintHeader,
    print_delay: Duration,
) -> String {
    render_page(grid, header, print_delay).into_string()
}

fn render_page(grid: &TimetableGrid, header: &PrintHeader, print_delay: Duration) -> Markup {
    let title = header.title();
    let script = format!(
        "window.addEventListener('load', function () {{ setTimeout(function () {{ window.print(); }}, {}); }});",
        print_delay.as_millis()
    );

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                h1 { (title) }
                table {
                    tr {
                        th { "Day / Time" }
                        @for slot in TIME_SLOTS {
                            th { (slot) }
                        }
                    }
                    @for row in grid.rows() {
                        tr {
                            td { (row.day.as_str()) }
                            @for (_, cell) in &row.cells {
                                (render_cell(cell))
                            }
                        }
                    }
                }
                script { (PreEscaped(script)) }
            }
        }
    }
}

fn render_cell(cell: &Cell<'_>) -> Markup {
    html! {
        @match (cell.subject_label(), cell.teacher_label()) {
            (Some(subject), Some(teacher)) => {
                td {
                    div.subject { (subject) }
                    div.teacher { (teacher) }
                }
            }
            _ => {
                td { "-" }
            }
        }
    }
}
