use chrono::{Local, NaiveDateTime};
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use recur_core::calendar::{DayCategory, DayOfWeek};

#[derive(Debug, Clone)]
pub struct ViewOccurrence {
    pub position: usize,
    pub at: NaiveDateTime,
}

impl ViewOccurrence {
    pub fn from_dates(dates: &[NaiveDateTime]) -> Vec<Self> {
        dates
            .iter()
            .enumerate()
            .map(|(i, &at)| Self { position: i + 1, at })
            .collect()
    }
}

pub fn display_occurrences(occurrences: &[ViewOccurrence], date_format: &str) {
    if occurrences.is_empty() {
        println!("No further occurrences");
        return;
    }

    let now = Local::now().naive_local();
    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Day", "Relative"]);

    for occurrence in occurrences {
        let mut row = Row::new();
        row.add_cell(Cell::new(occurrence.position));

        let mut date_cell = Cell::new(occurrence.at.format(date_format).to_string());
        if occurrence.at < now {
            date_cell = date_cell.fg(Color::DarkGrey);
        }
        row.add_cell(date_cell);

        let day = DayOfWeek::of(occurrence.at.date());
        let day_cell = match day.category() {
            DayCategory::Weekend => Cell::new(day.short_name()).fg(Color::Yellow),
            DayCategory::Workday => Cell::new(day.short_name()),
        };
        row.add_cell(day_cell);

        let relative = HumanTime::from(occurrence.at - now);
        row.add_cell(Cell::new(relative.to_string()).add_attribute(Attribute::Italic));
        table.add_row(row);
    }

    println!("{table}");
}
