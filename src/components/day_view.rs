use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::calendar::CalendarEvent;
use crate::store::Routine;
use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let date = app.selected_date;
        let features = app.selected_features();

        let block = Block::default()
            .title(day_title(date, area.width as usize))
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(
                count_label(features.len()),
                theme::DIM_STYLE,
            )))
            .borders(Borders::ALL)
            .border_style(theme.border);

        let mut items: Vec<ListItem> = Vec::new();

        items.push(section("Features"));
        if features.is_empty() {
            items.push(ListItem::new(Span::styled("  nothing on this day", theme::DIM_STYLE)));
        }
        items.extend(features.iter().map(format_feature));

        items.push(ListItem::new(Line::from("")));
        items.push(section("Routines"));
        if app.routines.is_empty() {
            items.push(ListItem::new(Span::styled("  no active routines", theme::DIM_STYLE)));
        }
        for (i, routine) in app.routines.iter().enumerate() {
            let done = app.completion_for(routine).map(|c| c.is_done());
            items.push(format_routine(routine, done, i == app.routine_index));
        }

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn day_title(date: NaiveDate, width: usize) -> String {
    if width >= 30 {
        format!(" {} ", date.format("%A, %B %d, %Y"))
    } else if width >= 18 {
        format!(" {} ", date.format("%b %d, %Y"))
    } else {
        format!(" {} ", date.format("%m/%d"))
    }
}

fn count_label(n: usize) -> String {
    match n {
        0 => String::new(),
        1 => " 1 feature ".to_string(),
        n => format!(" {n} features "),
    }
}

fn section(title: &'static str) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )))
}

fn format_feature(ev: &CalendarEvent) -> ListItem<'static> {
    let color = theme::status_color(&ev.status.color);
    ListItem::new(Line::from(vec![
        Span::styled("  ", Style::default().bg(color)),
        Span::styled(
            format!(" {} ", ev.duration_display()),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::raw(ev.name.clone()),
        Span::styled(format!(" ({})", ev.status.name), theme::DIM_STYLE),
    ]))
}

/// `done` is `None` when nothing was recorded for the day.
fn format_routine(routine: &Routine, done: Option<bool>, active: bool) -> ListItem<'static> {
    let checkbox = match done {
        Some(true) => " [x] ",
        Some(false) => " [~] ",
        None => " [ ] ",
    };
    let title_style = if done == Some(true) {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    let line = Line::from(vec![
        Span::styled(
            "  ",
            Style::default().bg(theme::status_color(routine.kind.color())),
        ),
        Span::raw(checkbox),
        Span::styled(routine.name.clone(), title_style),
        Span::styled(format!(" ({})", routine.kind.label()), theme::DIM_STYLE),
    ]);

    let item = ListItem::new(line);
    if active {
        item.style(theme::current().highlight)
    } else {
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_shrinks_with_width() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(day_title(date, 40), " Friday, March 15, 2024 ");
        assert_eq!(day_title(date, 20), " Mar 15, 2024 ");
        assert_eq!(day_title(date, 10), " 03/15 ");
    }

    #[test]
    fn feature_counts() {
        assert_eq!(count_label(0), "");
        assert_eq!(count_label(1), " 1 feature ");
        assert_eq!(count_label(3), " 3 features ");
    }
}
