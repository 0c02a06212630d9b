use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

pub struct StatusBar;

impl StatusBar {
    /// A status message replaces the key hints until the next key press.
    pub fn render(frame: &mut Frame, area: Rect, message: Option<&str>, week_start: u32) {
        let w = area.width as usize;
        let style = theme::current().status;

        let left = format!(" week starts {} ", crate::components::month_view::weekday_header(week_start)[0]);
        let right = match message {
            Some(msg) => format!(" {msg} "),
            None => hints(w).to_string(),
        };

        let padding = " ".repeat(w.saturating_sub(left.len() + right.len()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}

fn hints(width: usize) -> &'static str {
    if width >= 90 {
        " hjkl:Day/Week [/]:Month {/}:Year g:Go t:Today Sp:Done Tab:Routine ?:Help q:Quit "
    } else if width >= 50 {
        " [/]:Month t:Today Sp:Done ?:Help q:Quit "
    } else {
        " ?:Help q:Quit "
    }
}
