/// Which control is currently selected, keyed by section.
///
/// Starts empty, is set by the first activation and is only ever overwritten
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<String>,
    pub changed: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn is_selected(&self, section: &str) -> bool {
        self.current() == Some(section)
    }

    pub fn select(&mut self, section: &str) -> SelectionChange {
        let changed = !self.is_selected(section);
        let previous = self.section.replace(section.to_string());
        SelectionChange { previous, changed }
    }
}
