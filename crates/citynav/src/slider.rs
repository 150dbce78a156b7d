use foundation::bounds::Rect;

/// Thickness of the collapsed axis of the slider.
pub const SLIVER_PX: f64 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Controls in a row; the slider is an underline.
    Wide,
    /// Controls stacked; the slider is a vertical bar.
    Narrow,
}

impl Layout {
    pub fn for_viewport(viewport_width: f64, breakpoint_px: f64) -> Self {
        if viewport_width > breakpoint_px {
            Layout::Wide
        } else {
            Layout::Narrow
        }
    }
}

/// Reads the leading integer of a computed `padding` value the way
/// `parseInt` would: `"16px 8px"` is 16, anything unparseable is 0.
pub fn parse_padding_px(computed: &str) -> f64 {
    let s = computed.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<u64>() {
        Ok(n) => sign * n as f64,
        Err(_) => 0.0,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliderPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SliderPlacement {
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Inline style properties, in the order they are applied.
    pub fn style_properties(&self) -> [(&'static str, String); 4] {
        [
            ("left", px(self.left)),
            ("top", px(self.top)),
            ("width", px(self.width)),
            ("height", px(self.height)),
        ]
    }
}

fn px(v: f64) -> String {
    format!("{v}px")
}

/// Places the slider over `control`. Offsets are relative to the page's
/// padding box, hence the subtraction.
pub fn place_slider(control: Rect, padding_px: f64, layout: Layout) -> SliderPlacement {
    match layout {
        Layout::Wide => SliderPlacement {
            left: control.left - padding_px,
            width: control.width,
            top: 0.0,
            height: SLIVER_PX,
        },
        Layout::Narrow => SliderPlacement {
            top: control.top - padding_px,
            height: control.height,
            left: 0.0,
            width: SLIVER_PX,
        },
    }
}
