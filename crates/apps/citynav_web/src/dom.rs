use citynav::SliderPlacement;
use citynav::markup::CONTROL_CLASS;
use citynav::surface::{OPAQUE_CLASS, SELECTED_CLASS, SLIDER_ID, TRANSITION_CLASS};
use citynav::{Surface, SurfaceError, TextTarget};
use foundation::bounds::Rect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

fn js_err(context: &str, err: JsValue) -> SurfaceError {
    SurfaceError::Platform(format!("{context}: {err:?}"))
}

/// Rendered controls keyed by section, in document order.
struct ControlIndex<E> {
    entries: Vec<(String, E)>,
}

impl<E> ControlIndex<E> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn push(&mut self, section: String, element: E) {
        self.entries.push((section, element));
    }

    fn get(&self, section: &str) -> Option<&E> {
        self.entries
            .iter()
            .find(|(s, _)| s == section)
            .map(|(_, e)| e)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &E)> {
        self.entries.iter().map(|(s, e)| (s.as_str(), e))
    }
}

/// The live page: `<nav>` holds the controls, `#slider` is the indicator.
pub struct DomSurface {
    window: Window,
    document: Document,
    body: HtmlElement,
    nav: Element,
    slider: HtmlElement,
    controls: ControlIndex<Element>,
}

impl DomSurface {
    pub fn from_window() -> Result<Self, SurfaceError> {
        let window = web_sys::window().ok_or_else(|| SurfaceError::Platform("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SurfaceError::Platform("no document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| SurfaceError::MissingElement("body".into()))?;
        let nav = document
            .query_selector("nav")
            .map_err(|e| js_err("query nav", e))?
            .ok_or_else(|| SurfaceError::MissingElement("nav".into()))?;
        let slider = document
            .get_element_by_id(SLIDER_ID)
            .ok_or_else(|| SurfaceError::MissingElement(format!("#{SLIDER_ID}")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| SurfaceError::Platform(format!("#{SLIDER_ID} is not an HTML element")))?;

        Ok(Self {
            window,
            document,
            body,
            nav,
            slider,
            controls: ControlIndex::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn require_control(&self, section: &str) -> Result<&Element, SurfaceError> {
        self.controls
            .get(section)
            .ok_or_else(|| SurfaceError::MissingElement(format!("control '{section}'")))
    }

    /// Every rendered control with its section, in document order.
    pub fn controls(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.controls.iter()
    }

    fn index_controls(&mut self) -> Result<(), SurfaceError> {
        let nodes = self
            .nav
            .query_selector_all(&format!(".{CONTROL_CLASS}"))
            .map_err(|e| js_err("query controls", e))?;
        let mut index = ControlIndex::new();
        for i in 0..nodes.length() {
            let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Some(section) = el.get_attribute("data-section") {
                index.push(section, el);
            }
        }
        self.controls = index;
        Ok(())
    }

    fn html_element(&self, id: &str) -> Result<HtmlElement, SurfaceError> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| SurfaceError::MissingElement(format!("#{id}")))
    }
}

impl Surface for DomSurface {
    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn page_padding(&self) -> Option<String> {
        self.window
            .get_computed_style(&self.body)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("padding").ok())
    }

    fn control_bounds(&self, section: &str) -> Option<Rect> {
        let r = self.controls.get(section)?.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
    }

    fn set_control_selected(&mut self, section: &str, selected: bool) -> Result<(), SurfaceError> {
        let classes = self.require_control(section)?.class_list();
        let result = if selected {
            classes.add_1(SELECTED_CLASS)
        } else {
            classes.remove_1(SELECTED_CLASS)
        };
        result.map_err(|e| js_err("toggle selected", e))
    }

    fn apply_slider(&mut self, placement: &SliderPlacement) -> Result<(), SurfaceError> {
        let style = self.slider.style();
        for (name, value) in placement.style_properties() {
            style
                .set_property(name, &value)
                .map_err(|e| js_err("slider style", e))?;
        }
        Ok(())
    }

    fn set_slider_transition(&mut self, enabled: bool) -> Result<(), SurfaceError> {
        let classes = self.slider.class_list();
        let result = if enabled {
            classes.add_1(TRANSITION_CLASS)
        } else {
            classes.remove_1(TRANSITION_CLASS)
        };
        result.map_err(|e| js_err("toggle transition", e))
    }

    fn set_text(&mut self, target: TextTarget, text: &str) -> Result<(), SurfaceError> {
        self.html_element(target.element_id())?.set_inner_text(text);
        Ok(())
    }

    fn reveal_time_zone(&mut self) -> Result<(), SurfaceError> {
        self.html_element(TextTarget::TimeZone.element_id())?
            .class_list()
            .remove_1(OPAQUE_CLASS)
            .map_err(|e| js_err("reveal time zone", e))
    }

    fn insert_controls(&mut self, markup: &str) -> Result<(), SurfaceError> {
        self.nav
            .insert_adjacent_html("beforeend", markup)
            .map_err(|e| js_err("insert controls", e))?;
        self.index_controls()
    }

    fn reveal_page(&mut self) -> Result<(), SurfaceError> {
        self.body
            .style()
            .set_property("display", "flex")
            .map_err(|e| js_err("reveal page", e))
    }
}
