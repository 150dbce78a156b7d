use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use std::fmt;
use tracing::{Level, debug, error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget};

use citynav::{CityRegistry, NavConfig, NavController, NavError, RegistryError, SurfaceError};
use runtime::TimerKind;

mod dom;
mod intl;
mod logging;
mod timers;

use dom::DomSurface;
use intl::IntlZoneClock;
use timers::BrowserTimers;

type WebController = NavController<DomSurface, IntlZoneClock, BrowserTimers>;

/// Keeps a DOM listener's closure alive for the page lifetime.
struct ListenerBinding {
    _target: EventTarget,
    _callback: Closure<dyn FnMut(Event)>,
}

thread_local! {
    static CONTROLLER: RefCell<Option<WebController>> = const { RefCell::new(None) };
    static LISTENERS: RefCell<Vec<ListenerBinding>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug)]
enum BootError {
    Fetch(gloo_net::Error),
    Status(u16),
    Registry(RegistryError),
    Surface(SurfaceError),
    Nav(NavError),
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::Fetch(e) => write!(f, "fetching navigation document: {e}"),
            BootError::Status(code) => write!(f, "navigation document returned HTTP {code}"),
            BootError::Registry(e) => write!(f, "{e}"),
            BootError::Surface(e) => write!(f, "{e}"),
            BootError::Nav(e) => write!(f, "{e}"),
        }
    }
}

impl From<gloo_net::Error> for BootError {
    fn from(e: gloo_net::Error) -> Self {
        BootError::Fetch(e)
    }
}

impl From<RegistryError> for BootError {
    fn from(e: RegistryError) -> Self {
        BootError::Registry(e)
    }
}

impl From<SurfaceError> for BootError {
    fn from(e: SurfaceError) -> Self {
        BootError::Surface(e)
    }
}

impl From<NavError> for BootError {
    fn from(e: NavError) -> Self {
        BootError::Nav(e)
    }
}

/// Runs `f` against the page's controller. Events that arrive while the
/// controller is borrowed, or before it exists, are dropped.
fn with_controller(event: &'static str, f: impl FnOnce(&mut WebController)) {
    CONTROLLER.with(|slot| match slot.try_borrow_mut() {
        Ok(mut guard) => match guard.as_mut() {
            Some(controller) => f(controller),
            None => debug!(event, "controller not ready"),
        },
        Err(_) => warn!(event, "controller busy; event dropped"),
    });
}

pub(crate) fn dispatch_timer(kind: TimerKind) {
    with_controller(kind.name(), |c| c.on_timer(kind));
}

fn listen(
    target: &EventTarget,
    event: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<ListenerBinding, SurfaceError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|e| SurfaceError::Platform(format!("add {event} listener: {e:?}")))?;
    Ok(ListenerBinding {
        _target: target.clone(),
        _callback: callback,
    })
}

fn bind_events(surface: &DomSurface) -> Result<Vec<ListenerBinding>, SurfaceError> {
    let mut bindings = Vec::new();

    for (section, control) in surface.controls() {
        let section = section.to_string();
        bindings.push(listen(control, "click", move |_| {
            with_controller("click", |c| {
                if let Err(e) = c.activate(&section) {
                    warn!(section = %section, error = %e, "activation failed");
                }
            });
        })?);
    }

    bindings.push(listen(surface.window(), "resize", |_| {
        with_controller("resize", |c| {
            if let Err(e) = c.on_resize() {
                warn!(error = %e, "resize not reconciled");
            }
        });
    })?);

    Ok(bindings)
}

async fn fetch_registry(url: &str) -> Result<CityRegistry, BootError> {
    let resp = Request::get(url).send().await?;
    if !resp.ok() {
        return Err(BootError::Status(resp.status()));
    }
    let text = resp.text().await?;
    Ok(CityRegistry::from_json_str(&text)?)
}

/// Loads the city list, renders the controls and wires up events. Any
/// failure leaves the page hidden.
async fn boot(config: NavConfig) -> Result<(), BootError> {
    let registry = fetch_registry(&config.document_url).await?;
    let surface = DomSurface::from_window()?;

    let mut controller =
        NavController::with_config(config, registry, surface, IntlZoneClock, BrowserTimers);
    controller.mount()?;
    let bindings = bind_events(controller.surface())?;

    debug!(cities = controller.registry().len(), "navigation ready");
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
    LISTENERS.with(|slot| slot.borrow_mut().extend(bindings));
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    logging::init(Level::DEBUG);
    spawn_local(async move {
        if let Err(err) = boot(NavConfig::default()).await {
            error!(error = %err, "navigation failed to start");
        }
    });
    Ok(())
}

/// Current selection, for the host page and debugging.
#[wasm_bindgen]
pub fn selected_section() -> Option<String> {
    CONTROLLER.with(|slot| {
        slot.try_borrow()
            .ok()?
            .as_ref()?
            .selection()
            .current()
            .map(str::to_string)
    })
}
