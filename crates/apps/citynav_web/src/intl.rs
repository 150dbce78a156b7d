use citynav::{ClockError, ClockReading, ZoneClock, ZoneId, parse_time_display};
use js_sys::{Date, Object, Reflect};
use wasm_bindgen::JsValue;

/// Locale pinned so the output keeps the `HH:MM:SS Zone Name` shape that
/// [`parse_time_display`] expects.
const DISPLAY_LOCALE: &str = "en-US";

/// [`ZoneClock`] backed by the browser's `Intl` time formatting, which gives
/// long-form zone names ("Japan Standard Time").
#[derive(Debug, Default)]
pub struct IntlZoneClock;

impl IntlZoneClock {
    fn options(zone: &ZoneId) -> Object {
        let options = Object::new();
        let fields = [
            ("timeZone", zone.name()),
            ("hour", "2-digit"),
            ("minute", "2-digit"),
            ("second", "2-digit"),
            ("hourCycle", "h23"),
            ("timeZoneName", "long"),
        ];
        for (key, value) in fields {
            let _ = Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_str(value));
        }
        options
    }
}

impl ZoneClock for IntlZoneClock {
    fn read(&self, zone: &ZoneId) -> Result<ClockReading, ClockError> {
        let display: String = Date::new_0()
            .to_locale_string(DISPLAY_LOCALE, &Self::options(zone))
            .into();
        parse_time_display(&display)
    }
}
