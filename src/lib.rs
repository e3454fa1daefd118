//! An embeddable date/time picker widget for terminal UIs.
//!
//! The core is renderer-agnostic: [`Picker`] drives a [`RenderSurface`]
//! (grid cells, labels, visibility) and owns its own month cache and
//! selection state, so any number of pickers can live in one host
//! without observing each other. The `tui` module binds a picker to a
//! ratatui pane; [`SurfaceModel`] runs the same state machine headless.
//!
//! ```no_run
//! use daypick::{Picker, PickerOpts, SurfaceModel};
//!
//! let mut picker = Picker::new(SurfaceModel::new(), PickerOpts::default());
//! picker.on("submit", |event| println!("{event:?}")).unwrap();
//! picker.open();
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod format;
pub mod picker;
pub mod surface;
pub mod theme;
pub mod tui;

pub use calendar::cache::MonthCache;
pub use calendar::{month_grid, MonthGrid};
pub use config::{AppConfig, PickerOpts};
pub use error::PickerError;
pub use picker::{Direction, Event, Picker};
pub use surface::{RenderSurface, Section, SurfaceModel};
pub use theme::{Theme, ThemeSpec};
