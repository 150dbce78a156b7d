//! Event handling for the navigation widget.
//!
//! [`NavController`] owns every piece of mutable state: the selection, the
//! two timer slots and the resolved zone of the selected city. The page and
//! the wall clock are reached only through [`Surface`] and [`ZoneClock`], and
//! timers only through a [`TimerHost`], so the whole widget runs natively in
//! tests.

use std::fmt;

use runtime::{TimerHost, TimerKind, TimerSlots, TimerSpec};
use tracing::{debug, trace, warn};

use crate::clock::{ClockError, ClockReading, ZoneClock, ZoneId};
use crate::config::NavConfig;
use crate::markup::render_controls;
use crate::registry::CityRegistry;
use crate::selection::Selection;
use crate::slider::{Layout, parse_padding_px, place_slider};
use crate::surface::{Surface, SurfaceError, TextTarget};

#[derive(Debug)]
pub enum NavError {
    UnknownSection(String),
    Surface(SurfaceError),
    Clock(ClockError),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::UnknownSection(s) => write!(f, "no city with section '{s}'"),
            NavError::Surface(e) => write!(f, "{e}"),
            NavError::Clock(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavError::UnknownSection(_) => None,
            NavError::Surface(e) => Some(e),
            NavError::Clock(e) => Some(e),
        }
    }
}

impl From<SurfaceError> for NavError {
    fn from(e: SurfaceError) -> Self {
        NavError::Surface(e)
    }
}

impl From<ClockError> for NavError {
    fn from(e: ClockError) -> Self {
        NavError::Clock(e)
    }
}

pub struct NavController<S, C, T: TimerHost> {
    config: NavConfig,
    registry: CityRegistry,
    selection: Selection,
    zone: Option<ZoneId>,
    surface: S,
    clock: C,
    timers: T,
    slots: TimerSlots<T::Handle>,
}

impl<S, C, T> NavController<S, C, T>
where
    S: Surface,
    C: ZoneClock,
    T: TimerHost,
{
    pub fn new(registry: CityRegistry, surface: S, clock: C, timers: T) -> Self {
        Self::with_config(NavConfig::default(), registry, surface, clock, timers)
    }

    pub fn with_config(
        config: NavConfig,
        registry: CityRegistry,
        surface: S,
        clock: C,
        timers: T,
    ) -> Self {
        Self {
            config,
            registry,
            selection: Selection::new(),
            zone: None,
            surface,
            clock,
            timers,
            slots: TimerSlots::new(),
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_zone(&self) -> Option<&ZoneId> {
        self.zone.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn is_timer_live(&self, kind: TimerKind) -> bool {
        self.slots.is_live(kind)
    }

    /// Inserts one control per city, then shows the page. The page stays
    /// hidden until the controls exist.
    pub fn mount(&mut self) -> Result<(), NavError> {
        let markup = render_controls(&self.registry, self.config.markup_policy);
        self.surface.insert_controls(&markup)?;
        self.surface.reveal_page()?;
        debug!(cities = self.registry.len(), "navigation mounted");
        Ok(())
    }

    /// Handles a click on the control for `section`.
    ///
    /// Activating the already-selected control re-applies the slider and
    /// restarts the clock without changing the selection.
    pub fn activate(&mut self, section: &str) -> Result<(), NavError> {
        if self.registry.get(section).is_none() {
            return Err(NavError::UnknownSection(section.to_string()));
        }

        if let Some(previous) = self.selection.current() {
            if let Err(e) = self.surface.set_control_selected(previous, false) {
                warn!(section = previous, error = %e, "could not unmark previous selection");
            }
        }
        if let Err(e) = self.surface.set_control_selected(section, true) {
            warn!(section, error = %e, "could not mark selection");
        }

        let change = self.selection.select(section);
        debug!(
            section,
            previous = change.previous.as_deref().unwrap_or("-"),
            changed = change.changed,
            "city selected"
        );

        if let Err(e) = self.reposition_slider() {
            warn!(section, error = %e, "slider not repositioned");
        }
        self.refresh_clock()
    }

    /// Moves the slider over the selected control. Returns `false` when
    /// nothing is selected yet.
    pub fn reposition_slider(&mut self) -> Result<bool, NavError> {
        let Some(section) = self.selection.current() else {
            return Ok(false);
        };
        let bounds = self
            .surface
            .control_bounds(section)
            .ok_or_else(|| SurfaceError::MissingElement(format!("control '{section}'")))?;
        let padding = self
            .surface
            .page_padding()
            .as_deref()
            .map(parse_padding_px)
            .unwrap_or(0.0);
        let layout = Layout::for_viewport(self.surface.viewport_width(), self.config.breakpoint_px);

        let placement = place_slider(bounds, padding, layout);
        self.surface.apply_slider(&placement)?;
        trace!(?layout, ?placement, "slider placed");
        Ok(true)
    }

    /// Restarts the clock for the selected city: cancel the old tick, show
    /// the zone label, render now, then tick every `tick_interval`.
    ///
    /// A zone the tz database does not know leaves the clock stopped.
    pub fn refresh_clock(&mut self) -> Result<(), NavError> {
        self.slots.disarm(&mut self.timers, TimerKind::ClockTick);
        self.zone = None;

        if let Err(e) = self.surface.reveal_time_zone() {
            warn!(error = %e, "time zone label not revealed");
        }

        let Some(section) = self.selection.current() else {
            return Ok(());
        };
        let city = self
            .registry
            .get(section)
            .ok_or_else(|| NavError::UnknownSection(section.to_string()))?;
        let zone = match ZoneId::for_city(city) {
            Ok(zone) => zone,
            Err(e) => {
                self.write_readout(&ClockReading::blank());
                return Err(e.into());
            }
        };
        debug!(zone = %zone, "clock started");
        self.zone = Some(zone);

        self.render_clock_logged();
        self.slots.arm(
            &mut self.timers,
            TimerSpec::interval(TimerKind::ClockTick, self.config.tick_interval),
        );
        Ok(())
    }

    /// Writes the current time of the selected zone into the readout. Each
    /// field is written independently; a missing element is logged and
    /// skipped.
    pub fn render_clock(&mut self) -> Result<(), NavError> {
        let Some(zone) = &self.zone else {
            return Ok(());
        };
        let reading = self.clock.read(zone)?;
        self.write_readout(&reading);
        Ok(())
    }

    fn write_readout(&mut self, reading: &ClockReading) {
        let fields = [
            (TextTarget::Hour, &reading.hour),
            (TextTarget::Minute, &reading.minute),
            (TextTarget::Second, &reading.second),
            (TextTarget::TimeZone, &reading.zone_name),
        ];
        for (target, text) in fields {
            if let Err(e) = self.surface.set_text(target, text) {
                warn!(element = target.element_id(), text = %text, error = %e, "could not set text");
            }
        }
    }

    fn render_clock_logged(&mut self) {
        if let Err(e) = self.render_clock() {
            warn!(error = %e, "clock not rendered");
        }
    }

    /// Snaps the slider to the new layout with animation off, and turns the
    /// animation back on once no resize has arrived for `settle_delay`.
    pub fn on_resize(&mut self) -> Result<(), NavError> {
        if self.selection.current().is_none() {
            return Ok(());
        }

        self.slots.disarm(&mut self.timers, TimerKind::TransitionSettle);
        if let Err(e) = self.surface.set_slider_transition(false) {
            warn!(error = %e, "slider transition not disabled");
        }
        let placed = self.reposition_slider();
        self.slots.arm(
            &mut self.timers,
            TimerSpec::timeout(TimerKind::TransitionSettle, self.config.settle_delay),
        );
        placed.map(|_| ())
    }

    /// Delivers a fired timer. Timers that were cancelled or already fired
    /// are ignored.
    pub fn on_timer(&mut self, kind: TimerKind) {
        if !self.slots.is_live(kind) {
            trace!(kind = kind.name(), "stale timer ignored");
            return;
        }
        match kind {
            TimerKind::ClockTick => self.render_clock_logged(),
            TimerKind::TransitionSettle => {
                self.slots.mark_fired(kind);
                if let Err(e) = self.surface.set_slider_transition(true) {
                    warn!(error = %e, "slider transition not re-enabled");
                }
                debug!("slider transition re-enabled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::{Duration, TimeZone, Utc};
    use foundation::bounds::Rect;
    use foundation::time::Millis;
    use pretty_assertions::assert_eq;
    use runtime::{TimerKind, VirtualTimers};

    use super::{NavController, NavError};
    use crate::clock::{ChronoZoneClock, ClockError};
    use crate::registry::CityRegistry;
    use crate::slider::SliderPlacement;
    use crate::surface::TextTarget;
    use crate::testing::RecordingSurface;

    type Controller = NavController<RecordingSurface, ChronoZoneClock, VirtualTimers>;

    const DOC: &str = r#"{"cities":[
        {"section":"tokyo","label":"Tokyo","area":"Asia","api":"Tokyo"},
        {"section":"new-york","label":"New York","area":"America"},
        {"section":"london","label":"London","area":"Europe","api":"London"}
    ]}"#;

    const TOKYO: Rect = Rect {
        left: 216.0,
        top: 40.0,
        width: 88.0,
        height: 24.0,
    };

    fn wide_surface() -> RecordingSurface {
        RecordingSurface::new(1024.0)
            .with_control("tokyo", TOKYO)
            .with_control("new-york", Rect::new(320.0, 40.0, 104.0, 24.0))
            .with_control("london", Rect::new(440.0, 40.0, 80.0, 24.0))
    }

    /// Controller whose wall clock starts at 2024-07-15T12:34:56Z and moves
    /// with the virtual timers.
    fn controller(surface: RecordingSurface) -> (Controller, Rc<Cell<u64>>) {
        controller_with(DOC, surface)
    }

    fn controller_with(doc: &str, surface: RecordingSurface) -> (Controller, Rc<Cell<u64>>) {
        let elapsed = Rc::new(Cell::new(0u64));
        let base = Utc.with_ymd_and_hms(2024, 7, 15, 12, 34, 56).unwrap();
        let clock_elapsed = Rc::clone(&elapsed);
        let clock = ChronoZoneClock::from_fn(move || {
            base + Duration::milliseconds(clock_elapsed.get() as i64)
        });
        let registry = CityRegistry::from_json_str(doc).unwrap();
        let ctrl = NavController::new(registry, surface, clock, VirtualTimers::new());
        (ctrl, elapsed)
    }

    /// Advances virtual time, delivering every fired timer the way the event
    /// loop would.
    fn pump(ctrl: &mut Controller, elapsed: &Cell<u64>, by: u64) -> Vec<TimerKind> {
        let fired = ctrl.timers_mut().advance(Millis(by));
        let mut kinds = Vec::new();
        for (at, kind) in fired {
            elapsed.set(at.as_u64());
            ctrl.on_timer(kind);
            kinds.push(kind);
        }
        elapsed.set(ctrl.timers().now().as_u64());
        kinds
    }

    fn readout(ctrl: &Controller) -> Vec<String> {
        TextTarget::ALL
            .iter()
            .map(|t| ctrl.surface().text(*t).unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn mount_inserts_controls_before_revealing_page() {
        let (mut ctrl, _) = controller(wide_surface());
        ctrl.mount().unwrap();

        let s = ctrl.surface();
        assert_eq!(s.ops, vec!["insert_controls", "reveal_page"]);
        assert_eq!(s.inserted[0].matches("role=\"button\"").count(), 3);
        assert!(s.inserted[0].contains("data-section=\"new-york\""));
        assert!(s.page_revealed);
    }

    #[test]
    fn nothing_is_selected_or_ticking_before_first_click() {
        let (mut ctrl, elapsed) = controller(wide_surface());
        ctrl.mount().unwrap();

        assert_eq!(ctrl.selection().current(), None);
        assert!(!ctrl.surface().time_zone_revealed);
        assert!(pump(&mut ctrl, &elapsed, 5_000).is_empty());
    }

    #[test]
    fn activation_selects_exactly_one_control() {
        let (mut ctrl, _) = controller(wide_surface());
        for section in ["tokyo", "london", "new-york"] {
            ctrl.activate(section).unwrap();
            assert_eq!(ctrl.selection().current(), Some(section));
            let selected: Vec<_> = ctrl.surface().selected.iter().map(String::as_str).collect();
            assert_eq!(selected, vec![section]);
        }
    }

    #[test]
    fn reactivating_selected_control_is_idempotent() {
        let (mut ctrl, _) = controller(wide_surface());
        ctrl.activate("tokyo").unwrap();
        let before = ctrl.selection().clone();

        ctrl.activate("tokyo").unwrap();
        assert_eq!(ctrl.selection(), &before);
        assert_eq!(ctrl.surface().selected.len(), 1);
        assert_eq!(ctrl.timers().pending_of(TimerKind::ClockTick), 1);
    }

    #[test]
    fn unknown_section_changes_nothing() {
        let (mut ctrl, _) = controller(wide_surface());
        ctrl.activate("tokyo").unwrap();

        let err = ctrl.activate("paris").unwrap_err();
        assert!(matches!(err, NavError::UnknownSection(ref s) if s == "paris"));
        assert_eq!(ctrl.selection().current(), Some("tokyo"));
        assert!(ctrl.surface().selected.contains("tokyo"));
    }

    #[test]
    fn wide_viewport_draws_underline() {
        let (mut ctrl, _) = controller(wide_surface());
        ctrl.activate("new-york").unwrap();

        let slider = ctrl.surface().slider.unwrap();
        assert_eq!(
            slider,
            SliderPlacement {
                left: 304.0,
                top: 0.0,
                width: 104.0,
                height: 1.0
            }
        );
    }

    #[test]
    fn narrow_viewport_draws_vertical_bar() {
        let surface = RecordingSurface::new(700.0)
            .with_control("tokyo", Rect::new(16.0, 16.0, 288.0, 32.0))
            .with_control("new-york", Rect::new(16.0, 48.0, 288.0, 40.0));
        let (mut ctrl, _) = controller(surface);
        ctrl.activate("new-york").unwrap();

        let slider = ctrl.surface().slider.unwrap();
        assert_eq!(
            slider,
            SliderPlacement {
                left: 0.0,
                top: 32.0,
                width: 1.0,
                height: 40.0
            }
        );
    }

    #[test]
    fn unparseable_padding_counts_as_zero() {
        let mut surface = wide_surface();
        surface.padding = Some("auto".into());
        let (mut ctrl, _) = controller(surface);
        ctrl.activate("tokyo").unwrap();
        assert_eq!(ctrl.surface().slider.unwrap().left, TOKYO.left);
    }

    #[test]
    fn tokyo_scenario() {
        let doc = r#"{"cities":[{"section":"tokyo","label":"Tokyo","area":"Asia","api":"Tokyo"}]}"#;
        let (mut ctrl, _) = controller_with(doc, RecordingSurface::new(1024.0).with_control("tokyo", TOKYO));
        ctrl.mount().unwrap();
        ctrl.activate("tokyo").unwrap();

        assert_eq!(readout(&ctrl), vec!["21", "34", "56", "JST"]);
        assert!(ctrl.surface().time_zone_revealed);
        assert_eq!(ctrl.current_zone().unwrap().name(), "Asia/Tokyo");

        // Slider offsets are relative to the padded page; shift back onto the
        // control's row to compare.
        let on_page = ctrl.surface().slider.unwrap().as_rect().translate(16.0, TOKYO.top);
        assert!(on_page.overlaps_within(&TOKYO, 1.0));
        assert!((on_page.left - TOKYO.left).abs() <= 1.0);
        assert!((on_page.right() - TOKYO.right()).abs() <= 1.0);
    }

    #[test]
    fn clock_ticks_every_second() {
        let (mut ctrl, elapsed) = controller(wide_surface());
        ctrl.activate("tokyo").unwrap();
        assert_eq!(ctrl.surface().text(TextTarget::Second), Some("56"));

        pump(&mut ctrl, &elapsed, 999);
        assert_eq!(ctrl.surface().text(TextTarget::Second), Some("56"));

        assert_eq!(pump(&mut ctrl, &elapsed, 1), vec![TimerKind::ClockTick]);
        assert_eq!(ctrl.surface().text(TextTarget::Second), Some("57"));

        let ticks = pump(&mut ctrl, &elapsed, 4_000);
        assert_eq!(ticks.len(), 4);
        assert_eq!(readout(&ctrl), vec!["21", "35", "01", "JST"]);
    }

    #[test]
    fn readout_fields_stay_in_range() {
        let (mut ctrl, elapsed) = controller(wide_surface());
        ctrl.activate("new-york").unwrap();

        for _ in 0..90 {
            pump(&mut ctrl, &elapsed, 1_000);
            let hh: u32 = ctrl.surface().text(TextTarget::Hour).unwrap().parse().unwrap();
            let mm: u32 = ctrl.surface().text(TextTarget::Minute).unwrap().parse().unwrap();
            let ss: u32 = ctrl.surface().text(TextTarget::Second).unwrap().parse().unwrap();
            assert!(hh < 24 && mm < 60 && ss < 60);
        }
        assert_eq!(ctrl.surface().text(TextTarget::TimeZone), Some("EDT"));
    }

    #[test]
    fn switching_city_leaves_one_clock_timer() {
        let (mut ctrl, elapsed) = controller(wide_surface());
        ctrl.activate("tokyo").unwrap();
        pump(&mut ctrl, &elapsed, 500);
        ctrl.activate("new-york").unwrap();

        assert_eq!(ctrl.timers().pending_of(TimerKind::ClockTick), 1);
        assert!(ctrl.is_timer_live(TimerKind::ClockTick));
        assert_eq!(readout(&ctrl), vec!["08", "34", "56", "EDT"]);

        // The new timer runs on its own schedule, a full second after the switch.
        assert!(pump(&mut ctrl, &elapsed, 999).is_empty());
        assert_eq!(pump(&mut ctrl, &elapsed, 1), vec![TimerKind::ClockTick]);
        assert_eq!(ctrl.surface().text(TextTarget::Hour), Some("08"));
    }

    #[test]
    fn missing_readout_element_does_not_block_siblings() {
        let mut surface = wide_surface();
        surface.missing_text.insert(TextTarget::Hour);
        let (mut ctrl, _) = controller(surface);

        ctrl.activate("tokyo").unwrap();
        assert_eq!(readout(&ctrl), vec!["", "34", "56", "JST"]);
    }

    #[test]
    fn unknown_zone_stops_the_clock() {
        let doc = r#"{"cities":[
            {"section":"tokyo","label":"Tokyo","area":"Asia","api":"Tokyo"},
            {"section":"atlantis","label":"Lost City","area":"Atlantis"}
        ]}"#;
        let surface = wide_surface().with_control("atlantis", Rect::new(520.0, 40.0, 90.0, 24.0));
        let (mut ctrl, elapsed) = controller_with(doc, surface);
        ctrl.activate("tokyo").unwrap();

        let err = ctrl.activate("atlantis").unwrap_err();
        assert!(matches!(
            err,
            NavError::Clock(ClockError::UnknownZone(ref id)) if id == "Atlantis/Lost_City"
        ));
        assert_eq!(ctrl.selection().current(), Some("atlantis"));
        assert!(!ctrl.is_timer_live(TimerKind::ClockTick));
        assert_eq!(ctrl.timers().pending_of(TimerKind::ClockTick), 0);
        assert!(pump(&mut ctrl, &elapsed, 3_000).is_empty());
        // Tokyo's time must not linger under the new selection.
        assert_eq!(readout(&ctrl), vec!["--", "--", "--", ""]);
    }

    #[test]
    fn lower_case_zone_ids_still_tick() {
        let doc = r#"{"cities":[
            {"section":"tokyo","label":"tokyo","area":"asia"},
            {"section":"ny","label":"New york","area":"America"}
        ]}"#;
        let surface = wide_surface()
            .with_control("ny", Rect::new(320.0, 40.0, 104.0, 24.0));
        let (mut ctrl, elapsed) = controller_with(doc, surface);

        ctrl.activate("tokyo").unwrap();
        assert_eq!(ctrl.current_zone().unwrap().name(), "Asia/Tokyo");
        assert_eq!(readout(&ctrl), vec!["21", "34", "56", "JST"]);

        ctrl.activate("ny").unwrap();
        assert_eq!(ctrl.current_zone().unwrap().name(), "America/New_York");
        assert_eq!(pump(&mut ctrl, &elapsed, 1_000), vec![TimerKind::ClockTick]);
        assert_eq!(readout(&ctrl), vec!["08", "34", "57", "EDT"]);
    }

    #[test]
    fn resize_before_selection_is_noop() {
        let (mut ctrl, _) = controller(wide_surface());
        ctrl.on_resize().unwrap();

        assert!(ctrl.surface().transition);
        assert!(ctrl.surface().slider.is_none());
        assert_eq!(ctrl.timers().pending(), 0);
    }

    #[test]
    fn resize_burst_reenables_transition_once_after_last_event() {
        let (mut ctrl, elapsed) = controller(wide_surface());
        ctrl.activate("tokyo").unwrap();

        // Five resize events, 40ms apart.
        for i in 0..5 {
            if i > 0 {
                pump(&mut ctrl, &elapsed, 40);
            }
            ctrl.on_resize().unwrap();
            assert!(!ctrl.surface().transition);
            assert_eq!(ctrl.timers().pending_of(TimerKind::TransitionSettle), 1);
        }
        let last = ctrl.timers().now();
        assert_eq!(last, Millis(160));
        assert_eq!(
            ctrl.timers().next_due(TimerKind::TransitionSettle),
            Some(Millis(360))
        );

        pump(&mut ctrl, &elapsed, 199);
        assert!(!ctrl.surface().transition);
        assert_eq!(ctrl.surface().transition_enabled_count, 0);

        pump(&mut ctrl, &elapsed, 1);
        assert!(ctrl.surface().transition);
        assert_eq!(ctrl.surface().transition_enabled_count, 1);
        assert!(!ctrl.is_timer_live(TimerKind::TransitionSettle));

        pump(&mut ctrl, &elapsed, 2_000);
        assert_eq!(ctrl.surface().transition_enabled_count, 1);
    }

    #[test]
    fn resize_across_breakpoint_switches_layout() {
        let (mut ctrl, _) = controller(wide_surface());
        ctrl.activate("tokyo").unwrap();
        assert_eq!(ctrl.surface().slider.unwrap().height, 1.0);

        let s = ctrl.surface_mut();
        s.viewport_width = 480.0;
        s.controls.insert("tokyo".into(), Rect::new(16.0, 16.0, 448.0, 32.0));
        ctrl.on_resize().unwrap();

        assert_eq!(
            ctrl.surface().slider.unwrap(),
            SliderPlacement {
                left: 0.0,
                top: 0.0,
                width: 1.0,
                height: 32.0
            }
        );
    }

    #[test]
    fn stray_settle_timer_is_ignored() {
        let (mut ctrl, _) = controller(wide_surface());
        ctrl.activate("tokyo").unwrap();
        ctrl.on_timer(TimerKind::TransitionSettle);
        assert_eq!(ctrl.surface().transition_enabled_count, 0);
    }
}
