use anyhow::Result;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daypick::{
    tui::{self, HostPanes, TermSurface},
    AppConfig, Direction, Event, Picker, RenderSurface, Section, Theme, ThemeSpec,
};

fn main() -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("daypick");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "daypick.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    tracing::info!("Starting daypick demo");

    let cfg     = AppConfig::load().unwrap_or_default();
    let panes   = HostPanes::new();
    let surface = TermSurface::mount(&panes, None)?;
    let mut picker = Picker::new(surface, cfg.picker_opts());

    let submitted: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let sink = submitted.clone();
    picker.on("submit", move |event| {
        if let Event::Submit { readable, .. } = event {
            *sink.borrow_mut() = Some(readable.clone());
        }
    })?;

    picker.open();
    run(&mut picker)?;

    if let Some(readable) = submitted.borrow().as_ref() {
        println!("Picked: {readable}");
    }
    Ok(())
}

// ─── TUI loop ─────────────────────────────────────────────────────────────────

fn run(picker: &mut Picker<TermSurface>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend  = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;

    let result = event_loop(&mut term, picker);

    disable_raw_mode()?;
    execute!(term.backend_mut(), LeaveAlternateScreen)?;
    term.show_cursor()?;
    result
}

/// Which time field (hour or minute) the arrow keys adjust.
#[derive(PartialEq)]
enum TimeField { Hour, Minute }

fn event_loop(
    term: &mut Terminal<CrosstermBackend<io::Stdout>>,
    picker: &mut Picker<TermSurface>,
) -> Result<()> {
    let tick = std::time::Duration::from_millis(50);
    let mut theme_idx  = 0usize;
    let mut time_field = TimeField::Hour;

    loop {
        term.draw(|f| tui::draw(f, picker.surface().model(), f.area()))?;

        if !event::poll(tick)? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else { continue };

        match (key.code, picker.section()) {
            (KeyCode::Char('q') | KeyCode::Esc, _) => {
                picker.cancel();
                return Ok(());
            }
            (KeyCode::Enter, _) => {
                picker.submit();
                return Ok(());
            }
            (KeyCode::Char('v'), _) => picker.toggle_view(),

            // ── Calendar view ────────────────────────────────────────────────
            (KeyCode::Char(']'), Section::Calendar) => picker.navigate(Direction::Next)?,
            (KeyCode::Char('['), Section::Calendar) => picker.navigate(Direction::Previous)?,
            (KeyCode::Char('t'), Section::Calendar) => picker.reset(None),
            // Shift+T — cycle through themes
            (KeyCode::Char('T'), Section::Calendar) => {
                let themes = Theme::all();
                theme_idx = (theme_idx + 1) % themes.len();
                picker.set_theme(ThemeSpec::Named(themes[theme_idx].name.clone()));
            }
            (KeyCode::Right | KeyCode::Char('l'), Section::Calendar) => move_selection(picker, 0, 1),
            (KeyCode::Left  | KeyCode::Char('h'), Section::Calendar) => move_selection(picker, 0, -1),
            (KeyCode::Down  | KeyCode::Char('j'), Section::Calendar) => move_selection(picker, 1, 0),
            (KeyCode::Up    | KeyCode::Char('k'), Section::Calendar) => move_selection(picker, -1, 0),

            // ── Time view ────────────────────────────────────────────────────
            (KeyCode::Up   | KeyCode::Char('k'), Section::Time) => adjust_time(picker, &time_field, 1),
            (KeyCode::Down | KeyCode::Char('j'), Section::Time) => adjust_time(picker, &time_field, -1),
            (KeyCode::Left | KeyCode::Char('h'), Section::Time) => time_field = TimeField::Hour,
            (KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab, Section::Time) => {
                time_field = TimeField::Minute;
            }
            _ => {}
        }
    }
}

/// Moves the active cell one step, skipping over empty slots until a
/// populated one or the grid edge is hit.
fn move_selection(picker: &mut Picker<TermSurface>, dr: i32, dc: i32) {
    let Some((row, col)) = picker.active_cell() else {
        if let Some((row, col)) = picker.grid().position_of(1) {
            picker.select_cell(row, col);
        }
        return;
    };

    let (rows, cols) = (daypick::calendar::GRID_ROWS as i32, daypick::calendar::GRID_COLS as i32);
    let mut r = row as i32 + dr;
    let mut c = col as i32 + dc;
    while (0..rows).contains(&r) && (0..cols).contains(&c) {
        if picker.grid().day_at(r as usize, c as usize).is_some() {
            picker.select_cell(r as usize, c as usize);
            return;
        }
        r += dr;
        c += dc;
    }
}

fn adjust_time(picker: &mut Picker<TermSurface>, field: &TimeField, delta: i32) {
    let input = picker.surface().time_input();
    let (hour, minute) = input
        .split_once(':')
        .and_then(|(h, m)| Some((h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)))
        .unwrap_or((12, 0));

    let (hour, minute) = match field {
        TimeField::Hour   => ((hour + delta).rem_euclid(24), minute),
        TimeField::Minute => (hour, (minute + delta * 15).rem_euclid(60)),
    };
    picker.set_time(&format!("{hour:02}:{minute:02}"));
}
