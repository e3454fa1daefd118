use chrono::{Datelike, NaiveDate};

pub mod cache;

pub const GRID_ROWS: usize = 6;
pub const GRID_COLS: usize = 7;

/// One month laid out as 6 rows of 7 day slots (None = slot outside the
/// month). Columns run Sunday..Saturday. The grid is always structurally
/// 6×7 for layout stability; `populated_rows` says how many rows actually
/// hold days (a 28-day month starting on Sunday needs only 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    cells: [[Option<u32>; GRID_COLS]; GRID_ROWS],
    populated_rows: usize,
}

impl MonthGrid {
    pub fn day_at(&self, row: usize, col: usize) -> Option<u32> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Number of rows holding at least one day, 1..=6. Rows at or past
    /// this index are padding.
    pub fn populated_rows(&self) -> usize {
        self.populated_rows
    }

    /// (row, col) of the given day number, if the month contains it.
    pub fn position_of(&self, day: u32) -> Option<(usize, usize)> {
        for row in 0..self.populated_rows {
            for col in 0..GRID_COLS {
                if self.cells[row][col] == Some(day) {
                    return Some((row, col));
                }
            }
        }
        None
    }

    /// Last populated slot: (row, col, day). Used as the fallback target
    /// when re-selecting after month navigation.
    pub fn last_populated(&self) -> Option<(usize, usize, u32)> {
        let row = self.populated_rows.checked_sub(1)?;
        (0..GRID_COLS).rev().find_map(|col| {
            self.cells[row][col].map(|day| (row, col, day))
        })
    }

    /// All day numbers in placement order.
    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().flatten().copied().flatten()
    }
}

/// Builds the calendar grid for the month containing `date`. Returns the
/// date unchanged alongside the grid; day 1 lands in the column of its
/// weekday (0 = Sunday) and rows fill left to right from there.
pub fn month_grid(date: NaiveDate) -> (NaiveDate, MonthGrid) {
    let year   = date.year();
    let month  = date.month();
    let first  = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let offset = first.weekday().num_days_from_sunday() as usize;
    let total  = days_in_month(year, month) as usize;

    let mut cells = [[None; GRID_COLS]; GRID_ROWS];
    for day in 1..=total {
        let slot = offset + day - 1;
        cells[slot / GRID_COLS][slot % GRID_COLS] = Some(day as u32);
    }

    // Row count is data-driven: 4 to 6 depending on month length and the
    // weekday of the 1st. Never assume a fifth row exists.
    let populated_rows = (offset + total).div_ceil(GRID_COLS);

    (date, MonthGrid { cells, populated_rows })
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    (next.unwrap() - first).num_days() as u32
}
