use std::fmt;

use foundation::bounds::Rect;

use crate::slider::SliderPlacement;

pub const SLIDER_ID: &str = "slider";
pub const SELECTED_CLASS: &str = "selected";
pub const TRANSITION_CLASS: &str = "transition";
/// Hides the time-zone label until a city is picked.
pub const OPAQUE_CLASS: &str = "opaque";

/// Text regions of the clock readout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextTarget {
    Hour,
    Minute,
    Second,
    TimeZone,
}

impl TextTarget {
    pub const ALL: [TextTarget; 4] = [
        TextTarget::Hour,
        TextTarget::Minute,
        TextTarget::Second,
        TextTarget::TimeZone,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            TextTarget::Hour => "hh",
            TextTarget::Minute => "mm",
            TextTarget::Second => "ss",
            TextTarget::TimeZone => "time-zone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    MissingElement(String),
    Platform(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::MissingElement(what) => write!(f, "element not found: {what}"),
            SurfaceError::Platform(msg) => write!(f, "platform error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The page as seen by the controller.
///
/// Controls are addressed by their section. Reads are infallible snapshots of
/// layout; writes report missing elements so the caller can log and carry on.
pub trait Surface {
    fn viewport_width(&self) -> f64;

    /// Raw computed `padding` of the page body, e.g. `"16px"`.
    fn page_padding(&self) -> Option<String>;

    fn control_bounds(&self, section: &str) -> Option<Rect>;

    fn set_control_selected(&mut self, section: &str, selected: bool) -> Result<(), SurfaceError>;

    fn apply_slider(&mut self, placement: &SliderPlacement) -> Result<(), SurfaceError>;

    fn set_slider_transition(&mut self, enabled: bool) -> Result<(), SurfaceError>;

    fn set_text(&mut self, target: TextTarget, text: &str) -> Result<(), SurfaceError>;

    fn reveal_time_zone(&mut self) -> Result<(), SurfaceError>;

    fn insert_controls(&mut self, markup: &str) -> Result<(), SurfaceError>;

    fn reveal_page(&mut self) -> Result<(), SurfaceError>;
}
