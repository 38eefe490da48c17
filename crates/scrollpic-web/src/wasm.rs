#![forbid(unsafe_code)]

use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use scrollpic_core::carousel::Carousel;
use scrollpic_core::config::CarouselConfig;
use scrollpic_core::error::ConfigError;
use scrollpic_core::indicator::{DATA_INDEX_ATTR, INDEX_TAG_ATTR};
use scrollpic_core::scheduler::TimerKind;
use scrollpic_core::track::Direction;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, WheelEvent};

use crate::console::Console;
use crate::dom::WebDom;
use crate::events::{self, Input};
use crate::scheduler::{BrowserScheduler, TimerSink};

type WebCarousel = Carousel<WebDom, BrowserScheduler>;
type Shared = Rc<RefCell<WebCarousel>>;

fn to_js(err: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Run `f` against the carousel unless it is gone or already borrowed.
fn with_carousel<R>(
    weak: &Weak<RefCell<WebCarousel>>,
    what: &str,
    f: impl FnOnce(&mut WebCarousel) -> R,
) -> Option<R> {
    let shared = weak.upgrade()?;
    let Ok(mut carousel) = shared.try_borrow_mut() else {
        warn!(what, "dropping re-entrant callback");
        return None;
    };
    Some(f(&mut carousel))
}

fn dispatch(weak: &Weak<RefCell<WebCarousel>>, input: Input) {
    let result = with_carousel(weak, "input", |c| match input {
        Input::Arrow(direction) => c.click_arrow(direction),
        Input::Index(display) => c.click_index(display),
        Input::Wheel(delta) => c.wheel(delta),
        Input::Enter => c.pointer_enter(),
        Input::Leave => c.pointer_leave(),
    });
    if let Some(Err(err)) = result {
        debug!(?input, %err, "input rejected");
    }
}

/// A DOM listener that stays registered until detached or dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, callback);
    }
}

/// Install a `tracing` subscriber that writes to the browser console.
///
/// `filter` uses `EnvFilter` syntax and defaults to `warn`. Calling it again
/// is a no-op.
#[wasm_bindgen(js_name = enableLogging)]
pub fn enable_logging(filter: Option<String>) {
    let filter = filter.unwrap_or_else(|| "warn".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(Console)
        .with_ansi(false)
        .without_time()
        .try_init();
}

/// JS-facing carousel.
///
/// ```js
/// const pic = new ScrollPic({ id: "hero", width: 600, height: 300 });
/// pic.init();
/// ```
#[wasm_bindgen]
pub struct ScrollPic {
    inner: Shared,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ScrollPic {
    /// Validate `options` and locate the container. The page is not touched
    /// until [`init`](Self::init).
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<ScrollPic, JsValue> {
        let json = js_sys::JSON::stringify(&options)
            .map_err(|_| to_js(ConfigError::Parse("options are not serializable".into())))?;
        let config = CarouselConfig::from_json_str(&String::from(json)).map_err(to_js)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let dom = WebDom::new(window.clone()).map_err(to_js)?;
        let container = dom
            .element_by_id(&config.id)
            .ok_or_else(|| to_js(ConfigError::ContainerNotFound(config.id.clone())))?;

        let slot: Rc<OnceCell<Weak<RefCell<WebCarousel>>>> = Rc::new(OnceCell::new());
        let sink: TimerSink = {
            let slot = Rc::clone(&slot);
            Rc::new(move |kind: TimerKind| {
                if let Some(weak) = slot.get() {
                    with_carousel(weak, kind.as_str(), |c| c.on_timer(kind));
                }
            })
        };
        let scheduler = BrowserScheduler::new(window, sink);
        let carousel = Carousel::new(config, dom, scheduler, container).map_err(to_js)?;
        let inner = Rc::new(RefCell::new(carousel));
        let _ = slot.set(Rc::downgrade(&inner));

        Ok(Self {
            inner,
            listeners: Vec::new(),
        })
    }

    /// Mount the strip and controls, bind listeners, start auto-advance.
    pub fn init(&mut self) -> Result<(), JsValue> {
        self.borrow_mut()?.initialize().map_err(to_js)?;
        match self.bind_listeners() {
            Ok(listeners) => {
                self.listeners = listeners;
                Ok(())
            }
            Err(err) => {
                self.borrow_mut()?.destroy();
                Err(err)
            }
        }
    }

    /// Cancel all timers and unbind listeners. The mounted markup stays.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        if let Ok(mut carousel) = self.inner.try_borrow_mut() {
            carousel.destroy();
        }
    }

    /// Show the next slide, as a right arrow click.
    pub fn next(&self) -> Result<(), JsValue> {
        self.borrow_mut()?
            .click_arrow(Direction::Right)
            .map_err(to_js)
    }

    /// Show the previous slide, as a left arrow click.
    pub fn prev(&self) -> Result<(), JsValue> {
        self.borrow_mut()?
            .click_arrow(Direction::Left)
            .map_err(to_js)
    }

    /// Jump to 1-based slide `display`, as an index click.
    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&self, display: usize) -> Result<(), JsValue> {
        self.borrow_mut()?.click_index(display).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn start(&self) -> Option<usize> {
        self.inner.try_borrow().ok()?.start()
    }

    #[wasm_bindgen(getter)]
    pub fn offset(&self) -> Option<f64> {
        self.inner.try_borrow().ok()?.offset()
    }

    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> Option<usize> {
        self.inner.try_borrow().ok()?.displayed_index()
    }

    /// Current state as a plain object, `undefined` before `init`.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let Some(snapshot) = self.borrow_mut()?.snapshot() else {
            return Ok(JsValue::UNDEFINED);
        };
        let json = serde_json::to_string(&snapshot).map_err(to_js)?;
        js_sys::JSON::parse(&json)
    }
}

impl ScrollPic {
    fn borrow_mut(&self) -> Result<std::cell::RefMut<'_, WebCarousel>, JsValue> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("ScrollPic is busy"))
    }

    fn bind_listeners(&self) -> Result<Vec<Listener>, JsValue> {
        let carousel = self.borrow_mut()?;
        let config = carousel.config().clone();
        let container: EventTarget = carousel.container().clone().into();
        let arrows = carousel.arrows().cloned();
        let index_wrap = carousel.index_wrap().cloned();
        let document: EventTarget = carousel.dom().document().clone().into();
        drop(carousel);

        let weak = Rc::downgrade(&self.inner);
        let mut listeners = Vec::new();

        let mut hover_targets = vec![container];
        if let Some(arrows) = arrows {
            let pairs = [
                (arrows.left, Direction::Left),
                (arrows.right, Direction::Right),
            ];
            for (element, direction) in pairs {
                let target: EventTarget = element.into();
                let weak = weak.clone();
                listeners.push(Listener::attach(&target, events::CLICK, move |_| {
                    dispatch(&weak, Input::Arrow(direction));
                })?);
                hover_targets.push(target);
            }
        }

        if config.pauseable {
            for target in &hover_targets {
                for event in [events::MOUSE_ENTER, events::MOUSE_LEAVE] {
                    let weak = weak.clone();
                    listeners.push(Listener::attach(target, event, move |e: Event| {
                        if let Some(input) = events::hover(&e.type_()) {
                            dispatch(&weak, input);
                        }
                    })?);
                }
            }
        }

        if let Some(wrap) = index_wrap {
            let weak = weak.clone();
            let target: EventTarget = wrap.into();
            listeners.push(Listener::attach(&target, events::CLICK, move |e: Event| {
                let Some(element) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let tag = element.get_attribute(INDEX_TAG_ATTR);
                let data = element.get_attribute(DATA_INDEX_ATTR);
                if let Some(input) = events::index_click(tag.as_deref(), data.as_deref()) {
                    dispatch(&weak, input);
                }
            })?);
        }

        if config.wheelable {
            let weak = weak.clone();
            listeners.push(Listener::attach(&document, events::WHEEL, move |e: Event| {
                let Some(wheel) = e.dyn_ref::<WheelEvent>() else {
                    return;
                };
                if let Some(input) = events::wheel(wheel.delta_y()) {
                    dispatch(&weak, input);
                }
            })?);
        }

        debug!(count = listeners.len(), "listeners bound");
        Ok(listeners)
    }
}

impl Drop for ScrollPic {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl core::fmt::Debug for ScrollPic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollPic")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
