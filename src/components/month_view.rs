use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{is_selected, is_today, CalendarCursor, GridCell};
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_WIDTH: usize = 5;

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        cursor: CalendarCursor,
        grid: &[GridCell],
        week_start: u32,
        today: NaiveDate,
        selected_date: NaiveDate,
    ) {
        let theme = theme::current();
        let title = format!(" {} {} ", month_name(cursor.month()), cursor.year());

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Line::from(
            weekday_header(week_start)
                .into_iter()
                .map(|d| Span::styled(format!("{:^width$}", d, width = CELL_WIDTH), theme.header))
                .collect::<Vec<_>>(),
        );

        let weeks: Vec<Line> = grid
            .chunks(7)
            .map(|week| {
                Line::from(
                    week.iter()
                        .flat_map(|cell| render_cell(cell, today, selected_date))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        // Layout: header + weeks
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));

        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

fn render_cell(cell: &GridCell, today: NaiveDate, selected: NaiveDate) -> [Span<'static>; 2] {
    let theme = theme::current();
    let day = format!(" {:>2}", cell.day);

    if !cell.is_current_month() {
        return [
            Span::styled(day, theme.out_of_bounds),
            Span::styled("  ", theme.out_of_bounds),
        ];
    }

    let style = match (is_today(cell, today), is_selected(cell, Some(selected))) {
        (true, true) => theme.today.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        (false, true) => theme.selected,
        (true, false) => theme.today,
        (false, false) => Style::default(),
    };

    let marker = match cell.events.first() {
        Some(ev) => Span::styled(
            if cell.events.len() > 1 { "+ " } else { "* " },
            Style::default().fg(theme::status_color(&ev.status.color)),
        ),
        None => Span::raw("  "),
    };

    [Span::styled(day, style), marker]
}

/// Weekday abbreviations starting at `week_start` (0 = Sunday).
pub fn weekday_header(week_start: u32) -> Vec<&'static str> {
    (0..7)
        .map(|i| DAY_NAMES[((week_start + i) % 7) as usize])
        .collect()
}

/// Name of a 0-based month.
pub fn month_name(month: u32) -> &'static str {
    match month {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        11 => "December",
        _ => "Unknown",
    }
}
