use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashMap};

use crate::calendar::cache::MonthCache;
use crate::calendar::{MonthGrid, GRID_COLS, GRID_ROWS};
use crate::config::PickerOpts;
use crate::error::PickerError;
use crate::format;
use crate::surface::{RenderSurface, Section};
use crate::theme::{Theme, ThemeSpec};

/// Event names `on` accepts.
pub const VALID_EVENTS: [&str; 2] = ["submit", "close"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Payload handed to registered handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Submit { date: NaiveDateTime, readable: String },
    Close,
}

pub type Handler = Box<dyn FnMut(&Event)>;

// ─── Picker ───────────────────────────────────────────────────────────────────

/// A date/time picker bound to one render surface. Owns its month cache
/// and selection state exclusively; instances never share state, so two
/// pickers in one host cannot disturb each other.
pub struct Picker<S: RenderSurface> {
    surface:   S,
    cache:     MonthCache,
    grid:      MonthGrid,
    displayed: NaiveDate,
    active:    Option<(usize, usize)>,
    selected:  NaiveDateTime,
    readable:  String,
    section:   Section,
    handlers:  HashMap<&'static str, Vec<Handler>>,
    base_theme: Theme,
    overrides:  BTreeMap<String, String>,
}

impl<S: RenderSurface> Picker<S> {
    pub fn new(surface: S, opts: PickerOpts) -> Self {
        let now = Local::now().naive_local();
        let mut cache = MonthCache::new();
        let (date, grid) = cache.get(now.date());

        let mut picker = Self {
            surface,
            cache,
            grid,
            displayed: date.with_day(1).unwrap(),
            active: None,
            selected: now,
            readable: String::new(),
            section: Section::Calendar,
            handlers: HashMap::new(),
            base_theme: Theme::default(),
            overrides: BTreeMap::new(),
        };

        picker.render(date, grid);
        picker.reset(Some(opts.selected_date.unwrap_or(now)));

        if let Some(z) = opts.z_index {
            picker.surface.set_z_index(z);
        }
        if opts.disable_time_section {
            picker.disable_time_section();
        }
        if opts.compact_mode {
            picker.compact_mode();
        }
        match opts.theme {
            Some(spec) => picker.set_theme(spec),
            None => picker.apply_theme(),
        }

        tracing::info!(selected = %picker.selected, "picker constructed");
        picker
    }

    // ── Readable state ────────────────────────────────────────────────────────

    pub fn selected_date(&self) -> NaiveDateTime { self.selected }
    pub fn readable_date(&self) -> &str          { &self.readable }
    pub fn displayed_month(&self) -> NaiveDate   { self.displayed }
    pub fn active_cell(&self) -> Option<(usize, usize)> { self.active }
    pub fn grid(&self) -> &MonthGrid             { &self.grid }
    pub fn section(&self) -> Section             { self.section }
    pub fn surface(&self) -> &S                  { &self.surface }
    pub fn surface_mut(&mut self) -> &mut S      { &mut self.surface }

    /// Registered handlers by event name, for introspection.
    pub fn handlers(&self) -> &HashMap<&'static str, Vec<Handler>> {
        &self.handlers
    }

    // ── Events ────────────────────────────────────────────────────────────────

    /// Registers a handler for `"submit"` or `"close"`. Any other name
    /// is an error. Handlers run in registration order.
    pub fn on(
        &mut self,
        event: &str,
        handler: impl FnMut(&Event) + 'static,
    ) -> Result<(), PickerError> {
        let Some(key) = VALID_EVENTS.iter().copied().find(|name| *name == event) else {
            return Err(PickerError::InvalidEventName(event.to_owned()));
        };
        self.handlers.entry(key).or_default().push(Box::new(handler));
        Ok(())
    }

    fn fire(&mut self, name: &str, event: &Event) {
        if let Some(list) = self.handlers.get_mut(name) {
            for handler in list {
                handler(event);
            }
        }
    }

    // ── Visibility ────────────────────────────────────────────────────────────

    pub fn open(&mut self) {
        self.surface.set_visible(true);
    }

    pub fn close(&mut self) {
        self.surface.set_visible(false);
    }

    /// Flips between the calendar grid and the time editor. Selection
    /// state survives the switch.
    pub fn toggle_view(&mut self) {
        self.section = match self.section {
            Section::Calendar => Section::Time,
            Section::Time => Section::Calendar,
        };
        self.surface.set_section(self.section);
    }

    pub fn compact_mode(&mut self) {
        self.surface.set_compact(true);
    }

    pub fn disable_time_section(&mut self) {
        self.surface.set_time_toggle(false);
    }

    pub fn enable_time_section(&mut self) {
        self.surface.set_time_toggle(true);
    }

    // ── Submit / cancel ───────────────────────────────────────────────────────

    /// Closes the picker and reports the selection to `"submit"`
    /// handlers.
    pub fn submit(&mut self) {
        self.close();
        tracing::info!(date = %self.selected, readable = %self.readable, "submit");
        let event = Event::Submit {
            date: self.selected,
            readable: self.readable.clone(),
        };
        self.fire("submit", &event);
    }

    /// Closes the picker and notifies `"close"` handlers. The selection
    /// is retained.
    pub fn cancel(&mut self) {
        self.close();
        self.fire("close", &Event::Close);
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Activates the cell at (row, col). Empty slots are ignored. The
    /// previously active cell is cleared first, so exactly one cell is
    /// active afterwards.
    pub fn select_cell(&mut self, row: usize, col: usize) {
        if row >= GRID_ROWS || col >= GRID_COLS {
            return;
        }
        if self.grid.day_at(row, col).is_none() {
            return;
        }

        if let Some((r, c)) = self.active.take() {
            self.surface.clear_active(r, c);
        }
        self.surface.set_active(row, col);
        self.active = Some((row, col));

        self.update_selected(Some((row, col)));
        self.update_date_components(self.selected.date());
    }

    /// Moves the displayed month one step. If a day was selected, the
    /// same day number is re-selected in the new month, falling back to
    /// the month's last day when it is shorter.
    pub fn navigate(&mut self, direction: Direction) -> Result<(), PickerError> {
        let remembered = self.active.and_then(|(r, c)| self.grid.day_at(r, c));

        let (date, grid) = match direction {
            Direction::Previous => self.cache.previous()?,
            Direction::Next => self.cache.next()?,
        };
        tracing::debug!(?direction, month = %date.format("%Y-%m"), "navigate");
        self.render(date, grid);

        if let Some(day) = remembered {
            let target = self
                .grid
                .position_of(day)
                .or_else(|| self.grid.last_populated().map(|(r, c, _)| (r, c)));
            if let Some((row, col)) = target {
                self.select_cell(row, col);
            }
        }
        Ok(())
    }

    /// Applies a 24-hour `HH:MM` string from the time editor. Empty or
    /// unparseable input is ignored.
    pub fn set_time(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let Some(clock) = format::clock_time(raw) else {
            return;
        };
        self.surface.set_time_input(raw);
        self.surface.set_clock(&clock);
        self.update_selected(None);
    }

    /// Re-seeds the picker on `date` (default: now): renders its month,
    /// sets the time fields from its time-of-day and selects its day
    /// cell unless that cell is already active.
    pub fn reset(&mut self, date: Option<NaiveDateTime>) {
        let date = date.unwrap_or_else(|| Local::now().naive_local());
        let (day_date, grid) = self.cache.get(date.date());
        self.render(day_date, grid);

        let time = format!("{:02}:{:02}", date.hour(), date.minute());
        self.surface.set_time_input(&time);
        if let Some(clock) = format::clock_time(&time) {
            self.surface.set_clock(&clock);
        }

        if let Some((row, col)) = self.grid.position_of(date.day()) {
            if self.active != Some((row, col)) {
                self.select_cell(row, col);
            }
        }
    }

    // ── Theming ───────────────────────────────────────────────────────────────

    /// Applies a theme. A named theme replaces the base palette and
    /// clears any custom overrides injected earlier; a custom map is
    /// overlaid on the current base palette.
    pub fn set_theme(&mut self, spec: ThemeSpec) {
        match spec {
            ThemeSpec::Named(name) => {
                self.overrides.clear();
                self.base_theme = Theme::named(&name).unwrap_or_else(|| {
                    // Unknown names behave like a theme class nothing
                    // styles: the name sticks, the palette stays stock.
                    let mut theme = Theme::default();
                    theme.name = name;
                    theme
                });
            }
            ThemeSpec::Custom(vars) => {
                self.overrides = vars;
            }
        }
        self.apply_theme();
    }

    fn apply_theme(&mut self) {
        let mut resolved = self.base_theme.clone();
        for (key, value) in &self.overrides {
            resolved.set(key, value);
        }
        self.surface.apply_theme(&resolved);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Writes a month grid to the surface. Trailing rows with no data
    /// are hidden, however many there are.
    fn render(&mut self, date: NaiveDate, grid: MonthGrid) {
        self.grid = grid;
        self.displayed = date.with_day(1).unwrap();
        self.active = None;

        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                self.surface.set_cell(row, col, grid.day_at(row, col));
            }
            self.surface.set_row_visible(row, row < grid.populated_rows());
        }
        self.update_date_components(date);
    }

    fn update_date_components(&mut self, date: NaiveDate) {
        let label = format!("{} {}", format::month_name(date.month()), date.year());
        self.surface.set_month_year(&label);
        self.surface.set_weekday(format::weekday_name(date));
        self.surface.set_display_date(&format::display_date(date.day()));
    }

    /// Recomputes the selected date-time and readable string from the
    /// *rendered* labels: day text of the given cell (or the display-date
    /// label with its suffix stripped), the month-year label parsed back
    /// to a month index, and the clock label parsed back to 24-hour
    /// time. A label that fails to round-trip leaves the selection as it
    /// was.
    fn update_selected(&mut self, cell: Option<(usize, usize)>) {
        let day: u32 = match cell {
            Some((row, col)) => {
                match self.surface.cell_text(row, col).and_then(|t| t.trim().parse().ok()) {
                    Some(day) => day,
                    None => return,
                }
            }
            None => {
                let label = self.surface.display_date();
                match label.trim().trim_end_matches(|c: char| c.is_ascii_alphabetic()).parse() {
                    Ok(day) => day,
                    Err(_) => return,
                }
            }
        };

        let month_year = self.surface.month_year();
        let Some((month_name, year)) = month_year.trim().split_once(' ') else { return };
        let Some(month) = format::month_index(month_name) else { return };
        let Ok(year) = year.parse::<i32>() else { return };

        let clock = self.surface.clock();
        let Some((hour, minute)) = format::parse_clock(&clock) else { return };

        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else { return };
        let Some(selected) = date.and_hms_opt(hour, minute, 0) else { return };

        self.selected = selected;
        self.readable = format!(
            "{} {} {}",
            format::display_date(day),
            month_year.trim(),
            clock.trim()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceModel;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    fn picker_at(date: NaiveDateTime) -> Picker<SurfaceModel> {
        Picker::new(
            SurfaceModel::new(),
            PickerOpts { selected_date: Some(date), ..Default::default() },
        )
    }

    #[test]
    fn construction_selects_the_configured_date() {
        let picker = picker_at(at(2024, 1, 1, 12, 0));
        assert_eq!(picker.selected_date(), at(2024, 1, 1, 12, 0));
        assert_eq!(picker.readable_date(), "1st January 2024 12:00 PM");
        assert_eq!(picker.surface().month_year(), "January 2024");
        assert_eq!(picker.surface().time_input(), "12:00");
        assert_eq!(picker.surface().active_count(), 1);
    }

    #[test]
    fn selecting_a_cell_moves_the_single_active_marker() {
        let mut picker = picker_at(at(2024, 1, 15, 9, 30));
        let (r15, c15) = picker.grid().position_of(15).unwrap();
        assert_eq!(picker.active_cell(), Some((r15, c15)));

        let (row, col) = picker.grid().position_of(22).unwrap();
        picker.select_cell(row, col);
        assert_eq!(picker.active_cell(), Some((row, col)));
        assert_eq!(picker.surface().active_count(), 1);
        assert_eq!(picker.selected_date(), at(2024, 1, 22, 9, 30));
        assert_eq!(picker.readable_date(), "22nd January 2024 09:30 AM");
        assert_eq!(picker.surface().display_date(), "22nd");

        // any further selection still leaves exactly one active cell
        for day in [1, 8, 31, 8] {
            let (row, col) = picker.grid().position_of(day).unwrap();
            picker.select_cell(row, col);
            assert_eq!(picker.surface().active_count(), 1);
        }
    }

    #[test]
    fn clicking_an_empty_slot_changes_nothing() {
        // Jan 2024 starts on Monday, so (0, 0) is an empty slot
        let mut picker = picker_at(at(2024, 1, 15, 9, 30));
        let before_active = picker.active_cell();
        let before_selected = picker.selected_date();

        picker.select_cell(0, 0);
        assert_eq!(picker.active_cell(), before_active);
        assert_eq!(picker.selected_date(), before_selected);
        assert_eq!(picker.surface().active_count(), 1);
    }

    #[test]
    fn navigation_reselects_the_same_day() {
        let mut picker = picker_at(at(2024, 1, 15, 9, 30));
        picker.navigate(Direction::Next).unwrap();
        assert_eq!(picker.displayed_month(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(picker.selected_date(), at(2024, 2, 15, 9, 30));
        assert_eq!(picker.surface().active_count(), 1);
    }

    #[test]
    fn navigation_falls_back_to_the_last_day() {
        let mut picker = picker_at(at(2024, 1, 31, 9, 30));
        picker.navigate(Direction::Next).unwrap();
        // February 2024 has 29 days; day 31 does not exist there
        assert_eq!(picker.selected_date(), at(2024, 2, 29, 9, 30));
        assert_eq!(picker.surface().active_count(), 1);
    }

    #[test]
    fn navigate_next_then_previous_restores_the_month() {
        let mut picker = picker_at(at(2024, 3, 10, 8, 0));
        let grid_before = *picker.grid();
        picker.navigate(Direction::Next).unwrap();
        picker.navigate(Direction::Previous).unwrap();
        assert_eq!(*picker.grid(), grid_before);
        assert_eq!(picker.displayed_month(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(picker.selected_date(), at(2024, 3, 10, 8, 0));
    }

    #[test]
    fn instances_are_isolated() {
        let mut a = picker_at(at(2024, 1, 15, 9, 0));
        let b = picker_at(at(2024, 1, 15, 9, 0));

        a.navigate(Direction::Next).unwrap();
        a.navigate(Direction::Next).unwrap();

        assert_eq!(a.displayed_month(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(b.displayed_month(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(b.selected_date(), at(2024, 1, 15, 9, 0));
        assert_eq!(b.surface().month_year(), "January 2024");
    }

    #[test]
    fn set_time_updates_clock_and_selection() {
        let mut picker = picker_at(at(2024, 1, 15, 9, 30));
        picker.set_time("13:05");
        assert_eq!(picker.surface().clock(), "01:05 PM");
        assert_eq!(picker.selected_date(), at(2024, 1, 15, 13, 5));
        assert!(picker.readable_date().ends_with("01:05 PM"));
    }

    #[test]
    fn blank_or_malformed_time_input_is_ignored() {
        let mut picker = picker_at(at(2024, 1, 15, 9, 30));
        picker.set_time("");
        picker.set_time("half past nine");
        assert_eq!(picker.selected_date(), at(2024, 1, 15, 9, 30));
        assert_eq!(picker.surface().clock(), "09:30 AM");
    }

    #[test]
    fn reset_seeds_the_time_editor() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        picker.reset(Some(at(2024, 1, 1, 14, 30)));
        assert_eq!(picker.surface().time_input(), "14:30");
        assert_eq!(picker.surface().clock(), "02:30 PM");
        assert_eq!(picker.selected_date(), at(2024, 1, 1, 14, 30));
    }

    #[test]
    fn reset_moves_to_another_month() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        picker.reset(Some(at(2023, 9, 25, 8, 15)));
        assert_eq!(picker.surface().month_year(), "September 2023");
        assert_eq!(picker.selected_date(), at(2023, 9, 25, 8, 15));
    }

    #[test]
    fn four_row_months_render_with_trailing_rows_hidden() {
        let picker = picker_at(at(2026, 2, 14, 10, 0));
        for row in 0..4 {
            assert!(picker.surface().row_visible(row));
        }
        assert!(!picker.surface().row_visible(4));
        assert!(!picker.surface().row_visible(5));
    }

    #[test]
    fn open_close_and_view_toggle() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        assert!(!picker.surface().visible());
        picker.open();
        assert!(picker.surface().visible());

        picker.toggle_view();
        assert_eq!(picker.section(), Section::Time);
        picker.toggle_view();
        assert_eq!(picker.section(), Section::Calendar);
        // toggling never touches the selection
        assert_eq!(picker.selected_date(), at(2024, 1, 1, 12, 0));

        picker.close();
        assert!(!picker.surface().visible());
    }

    #[test]
    fn on_rejects_unknown_event_names() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        let err = picker.on("hover", |_| {}).unwrap_err();
        assert!(matches!(err, PickerError::InvalidEventName(_)));
        assert!(picker.on("submit", |_| {}).is_ok());
        assert!(picker.on("close", |_| {}).is_ok());
        assert_eq!(picker.handlers()["submit"].len(), 1);
    }

    #[test]
    fn submit_fires_handlers_in_order_and_closes() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        picker.open();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let first = calls.clone();
        picker
            .on("submit", move |event| {
                if let Event::Submit { readable, .. } = event {
                    first.borrow_mut().push(format!("first:{readable}"));
                }
            })
            .unwrap();
        let second = calls.clone();
        picker
            .on("submit", move |_| second.borrow_mut().push("second".into()))
            .unwrap();

        picker.submit();
        assert!(!picker.surface().visible());
        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("first:1st January 2024"));
        assert_eq!(calls[0], "first:1st January 2024 12:00 PM");
        assert_eq!(calls[1], "second");
    }

    #[test]
    fn cancel_fires_close_and_keeps_the_selection() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        picker.open();

        let closed = Rc::new(RefCell::new(0));
        let counter = closed.clone();
        picker
            .on("close", move |event| {
                assert_eq!(*event, Event::Close);
                *counter.borrow_mut() += 1;
            })
            .unwrap();

        picker.cancel();
        assert_eq!(*closed.borrow(), 1);
        assert!(!picker.surface().visible());
        assert_eq!(picker.selected_date(), at(2024, 1, 1, 12, 0));
    }

    #[test]
    fn custom_theme_overlays_and_named_theme_clears() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        assert_eq!(picker.surface().theme().name, "dark");

        let vars = BTreeMap::from([("bg".to_owned(), "#123456".to_owned())]);
        picker.set_theme(ThemeSpec::Custom(vars));
        assert_eq!(picker.surface().theme().bg, "#123456");
        assert_eq!(picker.surface().theme().name, "dark");

        picker.set_theme(ThemeSpec::Named("light".into()));
        assert_eq!(picker.surface().theme().name, "light");
        assert_eq!(picker.surface().theme().bg, Theme::light().bg);
    }

    #[test]
    fn unknown_named_theme_keeps_the_name_with_stock_colors() {
        let mut picker = picker_at(at(2024, 1, 1, 12, 0));
        picker.set_theme(ThemeSpec::Named("chartreuse".into()));
        assert_eq!(picker.surface().theme().name, "chartreuse");
        assert_eq!(picker.surface().theme().bg, Theme::dark().bg);
    }

    #[test]
    fn construction_flags_reach_the_surface() {
        let mut picker = Picker::new(
            SurfaceModel::new(),
            PickerOpts {
                z_index: Some(40),
                compact_mode: true,
                disable_time_section: true,
                selected_date: Some(at(2024, 1, 1, 12, 0)),
                theme: Some(ThemeSpec::Named("light".into())),
            },
        );
        assert_eq!(picker.surface().z_index(), 40);
        assert!(picker.surface().compact());
        assert!(!picker.surface().time_toggle());
        assert_eq!(picker.surface().theme().name, "light");

        picker.enable_time_section();
        assert!(picker.surface().time_toggle());
    }
}
