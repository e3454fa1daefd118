use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::calendar::{GRID_COLS, GRID_ROWS};
use crate::error::PickerError;
use crate::surface::{RenderSurface, Section, SurfaceModel};
use crate::theme::Theme;

/// Pane every picker attaches to when no selector is given.
pub const ROOT_PANE: &str = "root";

// ─── Host panes ───────────────────────────────────────────────────────────────

/// Named mount points inside one terminal screen. Pickers resolve their
/// target selector against this registry; lookups never cross screens.
#[derive(Debug, Clone)]
pub struct HostPanes {
    names: Vec<String>,
}

impl HostPanes {
    pub fn new() -> Self {
        Self { names: vec![ROOT_PANE.to_owned()] }
    }

    pub fn register(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Pane index for a selector; no selector means the root pane.
    pub fn resolve(&self, selector: Option<&str>) -> Result<usize, PickerError> {
        let sel = selector.unwrap_or(ROOT_PANE);
        self.names
            .iter()
            .position(|name| name == sel)
            .ok_or_else(|| PickerError::InvalidTarget(sel.to_owned()))
    }
}

impl Default for HostPanes {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Terminal surface ─────────────────────────────────────────────────────────

/// Render surface bound to one host pane. The picker writes into the
/// inner [`SurfaceModel`]; [`draw`] paints that model each frame.
#[derive(Debug, Clone)]
pub struct TermSurface {
    pane:  usize,
    model: SurfaceModel,
}

impl TermSurface {
    /// Binds a surface to the pane the selector names. Fails when no
    /// pane matches, before any picker state exists.
    pub fn mount(panes: &HostPanes, selector: Option<&str>) -> Result<Self, PickerError> {
        Ok(Self {
            pane:  panes.resolve(selector)?,
            model: SurfaceModel::new(),
        })
    }

    pub fn pane(&self) -> usize {
        self.pane
    }

    pub fn model(&self) -> &SurfaceModel {
        &self.model
    }
}

impl RenderSurface for TermSurface {
    fn set_cell(&mut self, row: usize, col: usize, day: Option<u32>) {
        self.model.set_cell(row, col, day);
    }
    fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.model.cell_text(row, col)
    }
    fn set_active(&mut self, row: usize, col: usize)   { self.model.set_active(row, col); }
    fn clear_active(&mut self, row: usize, col: usize) { self.model.clear_active(row, col); }
    fn set_row_visible(&mut self, row: usize, visible: bool) {
        self.model.set_row_visible(row, visible);
    }
    fn set_month_year(&mut self, label: &str)   { self.model.set_month_year(label); }
    fn month_year(&self) -> String              { self.model.month_year() }
    fn set_weekday(&mut self, label: &str)      { self.model.set_weekday(label); }
    fn set_display_date(&mut self, label: &str) { self.model.set_display_date(label); }
    fn display_date(&self) -> String            { self.model.display_date() }
    fn set_clock(&mut self, label: &str)        { self.model.set_clock(label); }
    fn clock(&self) -> String                   { self.model.clock() }
    fn set_time_input(&mut self, value: &str)   { self.model.set_time_input(value); }
    fn time_input(&self) -> String              { self.model.time_input() }
    fn set_section(&mut self, section: Section) { self.model.set_section(section); }
    fn set_visible(&mut self, visible: bool)    { self.model.set_visible(visible); }
    fn set_z_index(&mut self, z: u16)           { self.model.set_z_index(z); }
    fn set_compact(&mut self, compact: bool)    { self.model.set_compact(compact); }
    fn set_time_toggle(&mut self, enabled: bool) { self.model.set_time_toggle(enabled); }
    fn apply_theme(&mut self, theme: &Theme)    { self.model.apply_theme(theme); }
}

// ─── Drawing ──────────────────────────────────────────────────────────────────

/// Paints one picker's surface model. Hidden pickers draw nothing; when
/// several pickers share a screen, paint them in ascending z-index so
/// the topmost lands last.
pub fn draw(f: &mut Frame, model: &SurfaceModel, area: Rect) {
    if !model.visible() {
        return;
    }

    let t = model.theme();
    let rect = picker_rect(area);
    f.render_widget(Clear, rect);

    let title = Line::from(Span::styled(
        format!(" {} ", model.month_year()),
        Style::default().fg(t.accent_color()).add_modifier(Modifier::BOLD),
    ));
    let block = Block::default()
        .title(Title::from(title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(t.border_active_color()))
        .style(Style::default().bg(t.bg_color()));

    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let lines = match model.section() {
        Section::Calendar => calendar_lines(model, inner.width as usize),
        Section::Time     => time_lines(model),
    };

    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(t.bg_color()).fg(t.text_color()))
            .alignment(Alignment::Left),
        inner,
    );
}

fn calendar_lines(model: &SurfaceModel, width: usize) -> Vec<Line<'static>> {
    let t = model.theme();
    let mut lines: Vec<Line> = vec![];

    // Header row: Su Mo Tu We Th Fr Sa
    let hdrs: Vec<Span> = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let style = if i == 0 || i == 6 {
                Style::default().fg(t.weekend_color()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(t.text_muted_color()).add_modifier(Modifier::BOLD)
            };
            Span::styled(format!(" {d} "), style)
        })
        .collect();
    lines.push(Line::from(hdrs));
    lines.push(Line::from(Span::styled(
        "─".repeat(width),
        Style::default().fg(t.border_color()),
    )));

    for row in 0..GRID_ROWS {
        if !model.row_visible(row) {
            continue;
        }
        let spans: Vec<Span> = (0..GRID_COLS)
            .map(|col| {
                let cell = model.cell(row, col);
                let Some(day) = cell.day else {
                    return Span::raw("    ");
                };
                let style = if cell.active {
                    let (bg, fg) = t.active_highlight();
                    Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
                } else if col == 0 || col == 6 {
                    Style::default().fg(t.weekend_color())
                } else {
                    Style::default().fg(t.text_color())
                };
                Span::styled(format!(" {day:2} "), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", model.weekday()),
        Style::default().fg(t.accent_color()).add_modifier(Modifier::BOLD),
    )));
    if !model.compact() {
        lines.push(Line::from(Span::styled(
            format!("  {} {}", model.display_date(), model.month_year()),
            Style::default().fg(t.text_color()),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("  {}", model.clock()),
        Style::default().fg(t.text_muted_color()),
    )));
    if model.time_toggle() {
        lines.push(Line::from(Span::styled(
            "  v: time  [ ]: month  Enter: ok  Esc: cancel",
            Style::default().fg(t.text_muted_color()),
        )));
    }
    lines
}

fn time_lines(model: &SurfaceModel) -> Vec<Line<'static>> {
    let t = model.theme();
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Time   {}", model.time_input()),
            Style::default().fg(t.text_color()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", model.clock()),
            Style::default().fg(t.accent_color()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  ↑↓ adjust   ←→ hour/min   v: calendar",
            Style::default().fg(t.text_muted_color()),
        )),
    ]
}

/// Fixed-size picker box centered in the host pane, clamped to fit.
fn picker_rect(r: Rect) -> Rect {
    let width  = 34.min(r.width);
    let height = 16.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickerOpts;
    use crate::picker::Picker;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn mount_resolves_registered_panes() {
        let mut panes = HostPanes::new();
        panes.register("sidebar");
        assert_eq!(TermSurface::mount(&panes, None).unwrap().pane(), 0);
        assert_eq!(TermSurface::mount(&panes, Some("sidebar")).unwrap().pane(), 1);
    }

    #[test]
    fn mount_rejects_unknown_selectors() {
        let panes = HostPanes::new();
        let err = TermSurface::mount(&panes, Some("nonexistent")).unwrap_err();
        assert!(matches!(err, PickerError::InvalidTarget(ref sel) if sel == "nonexistent"));
    }

    #[test]
    fn draw_renders_an_open_picker() {
        let panes = HostPanes::new();
        let surface = TermSurface::mount(&panes, None).unwrap();
        let selected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut picker = Picker::new(
            surface,
            PickerOpts { selected_date: Some(selected), ..Default::default() },
        );
        picker.open();

        let mut term = Terminal::new(TestBackend::new(80, 24)).unwrap();
        term.draw(|f| draw(f, picker.surface().model(), f.area())).unwrap();

        let rendered = format!("{:?}", term.backend().buffer());
        assert!(rendered.contains("January 2024"));
    }

    #[test]
    fn hidden_pickers_draw_nothing() {
        let panes = HostPanes::new();
        let surface = TermSurface::mount(&panes, None).unwrap();
        let picker: Picker<TermSurface> = Picker::new(surface, PickerOpts::default());

        let mut term = Terminal::new(TestBackend::new(80, 24)).unwrap();
        term.draw(|f| draw(f, picker.surface().model(), f.area())).unwrap();

        let rendered = format!("{:?}", term.backend().buffer());
        assert!(!rendered.contains("January"));
    }
}
