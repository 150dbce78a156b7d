use foundation::time::Millis;

use crate::markup::MarkupPolicy;

/// Where the city list is served from, relative to the page.
pub const DEFAULT_DOCUMENT_URL: &str = "./navigation.json";

/// Viewports strictly wider than this use the horizontal (underline) layout.
pub const DEFAULT_BREAKPOINT_PX: f64 = 700.0;

pub const DEFAULT_TICK_INTERVAL: Millis = Millis(1000);

/// Quiet period after the last resize event before the slider animates again.
pub const DEFAULT_SETTLE_DELAY: Millis = Millis(200);

#[derive(Debug, Clone, PartialEq)]
pub struct NavConfig {
    pub document_url: String,
    pub breakpoint_px: f64,
    pub tick_interval: Millis,
    pub settle_delay: Millis,
    pub markup_policy: MarkupPolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            document_url: DEFAULT_DOCUMENT_URL.to_string(),
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            tick_interval: DEFAULT_TICK_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            markup_policy: MarkupPolicy::default(),
        }
    }
}
