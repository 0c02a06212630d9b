use std::time::Duration;

use color_eyre::Result;
use ratatui::layout::{Constraint, Layout, Rect};
use routine_calendar::app::App;
use routine_calendar::event::{self, Action};
use routine_calendar::{components, config, logging, tui};
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let settings = config::Settings::load()?;
    logging::init(&settings.data_dir, &settings.log_filter)?;
    info!(data_dir = %settings.data_dir.display(), "starting");

    let mut app = App::new(&settings)?;

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    info!("exiting");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            render_main(frame, layout[0], app);

            if app.show_help {
                render_help(frame, area);
            }

            let prompt = app.jump_prompt();
            components::StatusBar::render(
                frame,
                layout[1],
                prompt.as_deref().or(app.status_message.as_deref()),
                app.week_start,
            );
        })?;

        let Some(key) = event::next_key_event(Duration::from_millis(100))? else {
            continue;
        };
        app.status_message = None;

        if let Some(action) = event::action_for(key, app.input_mode()) {
            apply(app, action);
        }
    }

    Ok(())
}

fn apply(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.running = false,
        Action::Help => app.show_help = true,
        Action::CloseHelp => app.show_help = false,
        Action::ShiftDays(days) => app.shift_days(days),
        Action::Navigate(nav) => app.navigate(nav),
        Action::Today => app.go_to_today(),
        Action::Refresh => app.refresh(),
        Action::ToggleRoutine => app.toggle_routine(),
        Action::NextRoutine => app.cycle_routine(),
        Action::OpenJump => app.open_jump(),
        Action::Jump(edit) => app.edit_jump(edit),
    }
}

fn render_main(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    if area.width < 60 {
        render_month(frame, area, app);
        return;
    }

    let month_w = if area.width >= 100 { 44 } else { 39 };
    let content = Layout::horizontal([Constraint::Length(month_w), Constraint::Min(20)]).split(area);
    render_month(frame, content[0], app);
    components::DayView::render(frame, content[1], app);
}

fn render_month(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    components::MonthView::render(
        frame,
        area,
        app.cursor,
        &app.grid,
        app.week_start,
        app.today,
        app.selected_date,
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 52).min(area.width);
    let popup_h = area.height.clamp(12, 20).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l", "Previous/next day"),
        entry("j/k", "Next/previous week"),
        entry("[/]", "Previous/next month"),
        entry("{/}", "Previous/next year"),
        entry("t", "Jump to today"),
        entry("g", "Go to a month (YYYY-MM)"),
        Line::from(""),
        Line::from(Span::styled("Routines", section_style)),
        entry("Tab", "Select next routine"),
        entry("Space", "Mark routine done for the day"),
        entry("r", "Reload from the store"),
        Line::from(""),
        entry("?/Esc", "Close this help"),
        entry("q", "Quit"),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
