use std::collections::{BTreeMap, BTreeSet};

use foundation::bounds::Rect;

use crate::slider::SliderPlacement;
use crate::surface::{Surface, SurfaceError, TextTarget};

/// In-memory page that records every write.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub viewport_width: f64,
    pub padding: Option<String>,
    pub controls: BTreeMap<String, Rect>,
    pub selected: BTreeSet<String>,
    pub slider: Option<SliderPlacement>,
    pub transition: bool,
    pub transition_enabled_count: usize,
    pub texts: BTreeMap<TextTarget, String>,
    /// Text targets whose element is absent from the page.
    pub missing_text: BTreeSet<TextTarget>,
    pub time_zone_revealed: bool,
    pub inserted: Vec<String>,
    pub page_revealed: bool,
    /// Order of structural writes, for sequencing assertions.
    pub ops: Vec<&'static str>,
}

impl RecordingSurface {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            padding: Some("16px".to_string()),
            controls: BTreeMap::new(),
            selected: BTreeSet::new(),
            slider: None,
            transition: true,
            transition_enabled_count: 0,
            texts: BTreeMap::new(),
            missing_text: BTreeSet::new(),
            time_zone_revealed: false,
            inserted: Vec::new(),
            page_revealed: false,
            ops: Vec::new(),
        }
    }

    pub fn with_control(mut self, section: &str, bounds: Rect) -> Self {
        self.controls.insert(section.to_string(), bounds);
        self
    }

    pub fn text(&self, target: TextTarget) -> Option<&str> {
        self.texts.get(&target).map(String::as_str)
    }
}

impl Surface for RecordingSurface {
    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn page_padding(&self) -> Option<String> {
        self.padding.clone()
    }

    fn control_bounds(&self, section: &str) -> Option<Rect> {
        self.controls.get(section).copied()
    }

    fn set_control_selected(&mut self, section: &str, selected: bool) -> Result<(), SurfaceError> {
        if !self.controls.contains_key(section) {
            return Err(SurfaceError::MissingElement(section.to_string()));
        }
        if selected {
            self.selected.insert(section.to_string());
        } else {
            self.selected.remove(section);
        }
        Ok(())
    }

    fn apply_slider(&mut self, placement: &SliderPlacement) -> Result<(), SurfaceError> {
        self.slider = Some(*placement);
        self.ops.push("apply_slider");
        Ok(())
    }

    fn set_slider_transition(&mut self, enabled: bool) -> Result<(), SurfaceError> {
        if enabled {
            self.transition_enabled_count += 1;
        }
        self.transition = enabled;
        Ok(())
    }

    fn set_text(&mut self, target: TextTarget, text: &str) -> Result<(), SurfaceError> {
        if self.missing_text.contains(&target) {
            return Err(SurfaceError::MissingElement(format!("#{}", target.element_id())));
        }
        self.texts.insert(target, text.to_string());
        Ok(())
    }

    fn reveal_time_zone(&mut self) -> Result<(), SurfaceError> {
        self.time_zone_revealed = true;
        Ok(())
    }

    fn insert_controls(&mut self, markup: &str) -> Result<(), SurfaceError> {
        self.inserted.push(markup.to_string());
        self.ops.push("insert_controls");
        Ok(())
    }

    fn reveal_page(&mut self) -> Result<(), SurfaceError> {
        self.page_revealed = true;
        self.ops.push("reveal_page");
        Ok(())
    }
}
