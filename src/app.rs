use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use color_eyre::Result;
use tracing::{debug, info, warn};

use crate::calendar::{
    self, layout, navigate, CalendarCursor, CalendarEvent, GridCell, Navigation,
};
use crate::config::Settings;
use crate::event::InputMode;
use crate::store::{
    CompletedStep, CompletionPatch, NewRoutineCompletion, Routine, RoutineCompletion, Store,
};

/// Keys typed while the go-to-month prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpEdit {
    Push(char),
    Pop,
    Cancel,
    Submit,
}

pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub cursor: CalendarCursor,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub week_start: u32,
    pub grid: Vec<GridCell>,
    /// Active routines of the user, in creation order.
    pub routines: Vec<Routine>,
    pub routine_index: usize,
    /// Completions recorded on `selected_date`.
    pub day_completions: Vec<RoutineCompletion>,
    /// Text typed into the go-to-month prompt while it is open.
    pub jump_input: Option<String>,
    features: Vec<CalendarEvent>,
    pinned_today: bool,
    user_id: String,
    store: Store,
}

impl App {
    pub fn new(settings: &Settings) -> Result<Self> {
        let store = Store::open(&settings.data_dir)?;
        let today = settings
            .today
            .unwrap_or_else(|| Local::now().date_naive());

        let mut app = Self {
            running: true,
            show_help: false,
            status_message: None,
            cursor: CalendarCursor::containing(today),
            selected_date: today,
            today,
            week_start: settings.week_start,
            grid: Vec::new(),
            routines: Vec::new(),
            routine_index: 0,
            day_completions: Vec::new(),
            jump_input: None,
            features: Vec::new(),
            pinned_today: settings.today.is_some(),
            user_id: settings.user_id.clone(),
            store,
        };
        app.refresh_events()?;
        info!(user = %app.user_id, today = %today, "calendar ready");
        Ok(app)
    }

    /// Refetches the visible month's features and routines and re-lays the grid.
    pub fn refresh_events(&mut self) -> Result<()> {
        self.show(self.cursor, self.selected_date)
    }

    /// Loads everything `cursor` and `selected` need before replacing any of
    /// the visible state, so a failed load leaves the previous month intact.
    fn show(&mut self, cursor: CalendarCursor, selected: NaiveDate) -> Result<()> {
        let features = match month_range(cursor) {
            Some((start, end)) => self
                .store
                .features_for_user(&self.user_id, start, end, &Local)?,
            None => Vec::new(),
        };
        let grid = calendar::month_grid_for(cursor, self.week_start, &features)?;
        let routines: Vec<Routine> = self
            .store
            .get_user_routines(&self.user_id)?
            .into_iter()
            .filter(|r| r.is_active)
            .collect();
        let day_completions = self.completions_on(selected)?;

        self.cursor = cursor;
        self.selected_date = selected;
        self.features = features;
        self.grid = grid;
        self.routine_index = self.routine_index.min(routines.len().saturating_sub(1));
        self.routines = routines;
        self.day_completions = day_completions;
        debug!(
            year = cursor.year(),
            month = cursor.month(),
            features = self.features.len(),
            "month refreshed"
        );
        Ok(())
    }

    fn completions_on(&self, date: NaiveDate) -> Result<Vec<RoutineCompletion>> {
        let (start, end) = day_range(date);
        Ok(self
            .store
            .get_routine_completions(&self.user_id, start, end)?)
    }

    /// Features ending on the selected day.
    pub fn selected_features(&self) -> &[CalendarEvent] {
        self.grid
            .iter()
            .find(|cell| cell.is_current_month() && layout::is_selected(cell, Some(self.selected_date)))
            .map(|cell| cell.events.as_slice())
            .unwrap_or(&[])
    }

    pub fn completion_for(&self, routine: &Routine) -> Option<&RoutineCompletion> {
        self.day_completions
            .iter()
            .find(|c| c.routine_id == routine.id)
    }

    // ── Navigation ──

    pub fn navigate(&mut self, nav: Navigation) {
        let result = self.try_navigate(nav, None);
        self.report(result);
    }

    /// Moves the cursor and refetches. Without an explicit `selection` the
    /// selected day is clamped into the new month.
    fn try_navigate(&mut self, nav: Navigation, selection: Option<NaiveDate>) -> Result<()> {
        let mut moved = false;
        let cursor = navigate(self.cursor, nav, |cursor| {
            debug!(year = cursor.year(), month = cursor.month(), "navigated");
            moved = true;
        })?;
        if !moved {
            return Ok(());
        }
        let selected = match selection {
            Some(date) => date,
            None => clamp_selection(self.selected_date, cursor)?,
        };
        self.show(cursor, selected)
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        let result = self.try_select_date(date);
        self.report(result);
    }

    fn try_select_date(&mut self, date: NaiveDate) -> Result<()> {
        let target = CalendarCursor::containing(date);
        if target != self.cursor {
            let jump = Navigation::JumpTo {
                year: target.year(),
                month: target.month(),
            };
            return self.try_navigate(jump, Some(date));
        }
        self.day_completions = self.completions_on(date)?;
        self.selected_date = date;
        Ok(())
    }

    pub fn shift_days(&mut self, days: i64) {
        if let Some(date) = self
            .selected_date
            .checked_add_signed(Duration::days(days))
        {
            self.select_date(date);
        }
    }

    pub fn go_to_today(&mut self) {
        if !self.pinned_today {
            self.today = Local::now().date_naive();
        }
        self.select_date(self.today);
    }

    pub fn refresh(&mut self) {
        let result = self.refresh_events();
        if result.is_ok() {
            self.status_message = Some("Refreshed".to_string());
        }
        self.report(result);
    }

    // ── Jump prompt ──

    pub fn input_mode(&self) -> InputMode {
        if self.jump_input.is_some() {
            InputMode::Jump
        } else if self.show_help {
            InputMode::Help
        } else {
            InputMode::Normal
        }
    }

    /// Status line text while the prompt is open.
    pub fn jump_prompt(&self) -> Option<String> {
        self.jump_input
            .as_deref()
            .map(|input| format!("Go to (YYYY-MM): {input}_"))
    }

    pub fn open_jump(&mut self) {
        self.jump_input = Some(String::new());
    }

    pub fn edit_jump(&mut self, edit: JumpEdit) {
        let Some(input) = self.jump_input.as_mut() else {
            return;
        };
        match edit {
            JumpEdit::Push(c) => input.push(c),
            JumpEdit::Pop => {
                input.pop();
            }
            JumpEdit::Cancel => self.jump_input = None,
            JumpEdit::Submit => {
                let input = self.jump_input.take().unwrap_or_default();
                let result = calendar::parse_jump(&input, self.cursor)
                    .map_err(color_eyre::Report::from)
                    .and_then(|nav| self.try_navigate(nav, None));
                self.report(result);
            }
        }
    }

    // ── Routines ──

    pub fn cycle_routine(&mut self) {
        if !self.routines.is_empty() {
            self.routine_index = (self.routine_index + 1) % self.routines.len();
        }
    }

    /// Marks the selected routine done on the selected day, or completes a
    /// partial record. A fully done routine is left untouched.
    pub fn toggle_routine(&mut self) {
        let result = self.try_toggle_routine();
        self.report(result);
    }

    fn try_toggle_routine(&mut self) -> Result<()> {
        let Some(routine) = self.routines.get(self.routine_index).cloned() else {
            self.status_message = Some("No active routines".to_string());
            return Ok(());
        };
        let steps: Vec<CompletedStep> = routine
            .steps
            .iter()
            .map(|s| CompletedStep {
                product_id: s.product_id.clone(),
                completed: true,
                notes: None,
            })
            .collect();

        match self.completion_for(&routine).map(|c| (c.id.clone(), c.is_done())) {
            None => {
                let date = local_instant(self.selected_date.and_hms_opt(12, 0, 0).unwrap_or_default());
                self.store.add_routine_completion(NewRoutineCompletion {
                    user_id: self.user_id.clone(),
                    routine_id: routine.id.clone(),
                    kind: routine.kind,
                    date,
                    completed_steps: steps,
                })?;
                self.status_message = Some(format!("{} done", routine.name));
            }
            Some((id, false)) => {
                self.store.update_routine_completion(
                    &id,
                    CompletionPatch {
                        completed_steps: Some(steps),
                        ..Default::default()
                    },
                )?;
                self.status_message = Some(format!("{} completed", routine.name));
            }
            Some((_, true)) => {
                self.status_message = Some(format!("{} already done", routine.name));
                return Ok(());
            }
        }
        self.refresh_events()
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!(error = %e, "action failed");
            self.status_message = Some(format!("Error: {e}"));
        }
    }
}

/// Keeps the selected day of month, clamped to the length of `cursor`'s month.
fn clamp_selection(selected: NaiveDate, cursor: CalendarCursor) -> Result<NaiveDate> {
    if CalendarCursor::containing(selected) == cursor {
        return Ok(selected);
    }
    let len = layout::days_in_month(cursor.year(), cursor.month())?;
    let day = selected.day().min(len);
    Ok(NaiveDate::from_ymd_opt(cursor.year(), cursor.month() + 1, day).unwrap_or(selected))
}

fn local_instant(dt: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|| dt.and_utc())
}

fn day_range(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end = date.and_hms_opt(23, 59, 59).unwrap_or_default();
    (local_instant(start), local_instant(end))
}

/// `None` for months outside chrono's date range.
fn month_range(cursor: CalendarCursor) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let len = layout::days_in_month(cursor.year(), cursor.month()).ok()?;
    let first = NaiveDate::from_ymd_opt(cursor.year(), cursor.month() + 1, 1)?;
    let last = NaiveDate::from_ymd_opt(cursor.year(), cursor.month() + 1, len)?;
    Some((day_range(first).0, day_range(last).1))
}
