//! The render surface a picker writes into and reads rendered text back
//! from. The selection state machine only talks to this trait, so it can
//! run against the in-memory [`SurfaceModel`] with no terminal attached;
//! the `tui` module draws a `SurfaceModel` with ratatui.

use crate::calendar::{GRID_COLS, GRID_ROWS};
use crate::theme::Theme;

/// Which sub-view is visible: the calendar grid or the time editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Calendar,
    Time,
}

/// Capabilities the selection controller needs from a host. Writes are
/// plain label/cell updates; the read methods return the *rendered* text,
/// which the controller re-parses when it reassembles the selection.
pub trait RenderSurface {
    /// Replaces a cell's day (None marks the slot empty) and clears any
    /// active marker the cell carried.
    fn set_cell(&mut self, row: usize, col: usize, day: Option<u32>);
    /// Rendered text of a cell; None for empty-marked slots.
    fn cell_text(&self, row: usize, col: usize) -> Option<String>;
    fn set_active(&mut self, row: usize, col: usize);
    fn clear_active(&mut self, row: usize, col: usize);
    fn set_row_visible(&mut self, row: usize, visible: bool);

    fn set_month_year(&mut self, label: &str);
    fn month_year(&self) -> String;
    fn set_weekday(&mut self, label: &str);
    fn set_display_date(&mut self, label: &str);
    fn display_date(&self) -> String;
    fn set_clock(&mut self, label: &str);
    fn clock(&self) -> String;

    fn set_time_input(&mut self, value: &str);
    fn time_input(&self) -> String;

    fn set_section(&mut self, section: Section);
    fn set_visible(&mut self, visible: bool);
    fn set_z_index(&mut self, z: u16);
    /// Compact mode hides the large display-date label.
    fn set_compact(&mut self, compact: bool);
    /// Hides or shows the calendar/time view toggle.
    fn set_time_toggle(&mut self, enabled: bool);
    fn apply_theme(&mut self, theme: &Theme);
}

/// One calendar cell as rendered: its day text (None = empty marker set)
/// and whether it carries the active highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub day:    Option<u32>,
    pub active: bool,
}

/// Plain-data render surface. Holds exactly what a host would display;
/// useful headless and as the model the ratatui adapter draws.
#[derive(Debug, Clone)]
pub struct SurfaceModel {
    cells:        [[Cell; GRID_COLS]; GRID_ROWS],
    row_visible:  [bool; GRID_ROWS],
    month_year:   String,
    weekday:      String,
    display_date: String,
    clock:        String,
    time_input:   String,
    section:      Section,
    visible:      bool,
    z_index:      u16,
    compact:      bool,
    time_toggle:  bool,
    theme:        Theme,
}

impl SurfaceModel {
    pub fn new() -> Self {
        Self {
            cells:        [[Cell::default(); GRID_COLS]; GRID_ROWS],
            row_visible:  [true; GRID_ROWS],
            month_year:   String::new(),
            weekday:      String::new(),
            display_date: String::new(),
            clock:        "12:00 PM".to_owned(),
            time_input:   "12:00".to_owned(),
            section:      Section::Calendar,
            visible:      false,
            z_index:      0,
            compact:      false,
            time_toggle:  true,
            theme:        Theme::default(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// The single active cell, if any.
    pub fn active_cell(&self) -> Option<(usize, usize)> {
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                if self.cells[row][col].active {
                    return Some((row, col));
                }
            }
        }
        None
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.active).count()
    }

    pub fn row_visible(&self, row: usize) -> bool {
        self.row_visible[row]
    }

    pub fn weekday(&self) -> &str       { &self.weekday }
    pub fn section(&self) -> Section    { self.section }
    pub fn visible(&self) -> bool       { self.visible }
    pub fn z_index(&self) -> u16        { self.z_index }
    pub fn compact(&self) -> bool       { self.compact }
    pub fn time_toggle(&self) -> bool   { self.time_toggle }
    pub fn theme(&self) -> &Theme       { &self.theme }
}

impl Default for SurfaceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for SurfaceModel {
    fn set_cell(&mut self, row: usize, col: usize, day: Option<u32>) {
        self.cells[row][col] = Cell { day, active: false };
    }

    fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.cells[row][col].day.map(|d| d.to_string())
    }

    fn set_active(&mut self, row: usize, col: usize) {
        self.cells[row][col].active = true;
    }

    fn clear_active(&mut self, row: usize, col: usize) {
        self.cells[row][col].active = false;
    }

    fn set_row_visible(&mut self, row: usize, visible: bool) {
        self.row_visible[row] = visible;
    }

    fn set_month_year(&mut self, label: &str)   { self.month_year = label.to_owned(); }
    fn month_year(&self) -> String              { self.month_year.clone() }
    fn set_weekday(&mut self, label: &str)      { self.weekday = label.to_owned(); }
    fn set_display_date(&mut self, label: &str) { self.display_date = label.to_owned(); }
    fn display_date(&self) -> String            { self.display_date.clone() }
    fn set_clock(&mut self, label: &str)        { self.clock = label.to_owned(); }
    fn clock(&self) -> String                   { self.clock.clone() }

    fn set_time_input(&mut self, value: &str)   { self.time_input = value.to_owned(); }
    fn time_input(&self) -> String              { self.time_input.clone() }

    fn set_section(&mut self, section: Section) { self.section = section; }
    fn set_visible(&mut self, visible: bool)    { self.visible = visible; }
    fn set_z_index(&mut self, z: u16)           { self.z_index = z; }
    fn set_compact(&mut self, compact: bool)    { self.compact = compact; }
    fn set_time_toggle(&mut self, enabled: bool) { self.time_toggle = enabled; }
    fn apply_theme(&mut self, theme: &Theme)    { self.theme = theme.clone(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cell_clears_the_active_marker() {
        let mut model = SurfaceModel::new();
        model.set_cell(2, 3, Some(14));
        model.set_active(2, 3);
        assert_eq!(model.active_cell(), Some((2, 3)));
        model.set_cell(2, 3, Some(15));
        assert_eq!(model.active_cell(), None);
    }

    #[test]
    fn empty_cells_have_no_text() {
        let mut model = SurfaceModel::new();
        model.set_cell(0, 0, None);
        model.set_cell(0, 1, Some(1));
        assert_eq!(model.cell_text(0, 0), None);
        assert_eq!(model.cell_text(0, 1), Some("1".to_owned()));
    }

    #[test]
    fn defaults_match_an_unopened_picker() {
        let model = SurfaceModel::new();
        assert!(!model.visible());
        assert_eq!(model.section(), Section::Calendar);
        assert_eq!(model.clock(), "12:00 PM");
        assert_eq!(model.time_input(), "12:00");
        assert!(model.time_toggle());
    }
}
