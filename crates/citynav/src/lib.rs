//! City navigation bar with a sliding selection indicator and a live clock
//! for the selected city's time zone.
//!
//! Everything here is platform independent; the browser binding lives in the
//! `citynav_web` app crate.

pub mod clock;
pub mod config;
pub mod controller;
pub mod markup;
pub mod registry;
pub mod selection;
pub mod slider;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{ChronoZoneClock, ClockError, ClockReading, ZoneClock, ZoneId, parse_time_display};
pub use config::NavConfig;
pub use controller::{NavController, NavError};
pub use markup::{MarkupPolicy, render_controls};
pub use registry::{City, CityRegistry, NavigationDocument, RegistryError};
pub use selection::Selection;
pub use slider::{Layout, SliderPlacement, parse_padding_px, place_slider};
pub use surface::{Surface, SurfaceError, TextTarget};
