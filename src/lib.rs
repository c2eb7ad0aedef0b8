pub mod clock;
pub mod config;
pub mod game;
pub mod geometry;
pub mod hud;
pub mod input;
pub mod obstacles;
pub mod player;
pub mod road;
pub mod scoring;
pub mod storage;
pub mod surface;
pub mod theme;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlDivElement, HtmlElement,
    HtmlImageElement, KeyboardEvent, Window,
};

use crate::clock::FrameClock;
use crate::config::{GameConfig, PLAYER_SPRITE_URL, TRUCK_SPRITE_URL};
use crate::game::GameController;
use crate::geometry::Viewport;
use crate::input::{Direction, InputState, TOUCH_BUTTONS, direction_for_key, is_restart_key};
use crate::storage::LocalStorageStore;
use crate::surface::{CanvasSurface, SpriteKind, Sprites};

const RESIZE_SETTLE_MS: i32 = 140;
const DIAGNOSTICS_EVERY_FRAMES: u64 = 30;

struct AppState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    document: Document,
    diagnostics_text: Option<HtmlElement>,
    fallback: Option<HtmlDivElement>,
    sprites: Sprites,
    game: GameController<LocalStorageStore>,
    storage_available: bool,
    input: InputState,
    clock: FrameClock,
    frame_count: u64,
    last_event: String,
}

struct FrameLoop {
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    pending: Cell<bool>,
}

impl FrameLoop {
    fn new(state: Rc<RefCell<AppState>>) -> Rc<Self> {
        let frames = Rc::new(Self {
            callback: RefCell::new(None),
            pending: Cell::new(false),
        });

        let weak: Weak<FrameLoop> = Rc::downgrade(&frames);
        let cb = Closure::wrap(Box::new(move |timestamp: f64| {
            let Some(frames) = weak.upgrade() else {
                return;
            };
            frames.pending.set(false);
            if run_frame(&state, timestamp) {
                frames.request();
            }
        }) as Box<dyn FnMut(f64)>);
        *frames.callback.borrow_mut() = Some(cb);

        frames
    }

    fn request(&self) {
        if self.pending.get() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        if window()
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .is_ok()
        {
            self.pending.set(true);
        }
    }
}

fn window() -> Window {
    web_sys::window().expect("missing window")
}

fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn entropy() -> u64 {
    let random = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let now = js_sys::Date::now() as u64;
    (random << 32) ^ now
}

fn set_status(document: &Document, status: &str) {
    if let Some(el) = document.document_element() {
        let _ = el.set_attribute("data-render-status", status);
    }
}

fn update_diagnostics(state: &AppState) {
    let Some(text) = &state.diagnostics_text else {
        return;
    };

    let status = state
        .document
        .document_element()
        .and_then(|el| el.get_attribute("data-render-status"))
        .unwrap_or_else(|| "unknown".to_string());

    let mut lines = vec![
        format!("status: {}", status),
        format!("event: {}", state.last_event),
        format!(
            "canvas: {}x{}",
            state.canvas.width(),
            state.canvas.height()
        ),
        format!("frames: {}", state.frame_count),
        format!(
            "sprites: player={} truck={}",
            state.sprites.player.natural_width() > 0,
            state.sprites.truck.natural_width() > 0
        ),
        format!("storage: {}", state.storage_available),
    ];
    lines.extend(state.game.diagnostics());

    text.set_text_content(Some(&lines.join("\n")));
}

fn render(state: &AppState) {
    let mut surface = CanvasSurface::new(&state.ctx, &state.sprites);
    state.game.render(&mut surface);
}

fn run_frame(state: &Rc<RefCell<AppState>>, timestamp: f64) -> bool {
    let mut guard = state.borrow_mut();
    let st = &mut *guard;

    let dt = st.clock.tick(timestamp);
    let was_running = st.game.is_running();
    st.game.update(dt, &st.input);
    render(st);
    st.frame_count += 1;

    let running = st.game.is_running();
    if was_running && !running {
        st.last_event = "game_over".to_string();
        set_status(&st.document, "game_over");
        update_diagnostics(st);
    } else if st.frame_count % DIAGNOSTICS_EVERY_FRAMES == 0 {
        update_diagnostics(st);
    }

    running
}

fn viewport_for_window(window: &Window) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(1.0).floor().max(1.0);
    let height = window.inner_height()?.as_f64().unwrap_or(1.0).floor().max(1.0);
    Ok(Viewport::new(width, height, width))
}

fn apply_resize(state: &mut AppState) -> Result<(), JsValue> {
    let viewport = viewport_for_window(&window())?;
    let width = viewport.width as u32;
    let height = viewport.height as u32;

    if state.canvas.width() != width {
        state.canvas.set_width(width);
    }
    if state.canvas.height() != height {
        state.canvas.set_height(height);
    }

    state.game.resize(viewport);
    Ok(())
}

fn restart(state: &Rc<RefCell<AppState>>, frames: &FrameLoop) {
    {
        let mut st = state.borrow_mut();
        if st.game.is_running() {
            return;
        }
        st.game.reset();
        st.clock.reset();
        st.last_event = "restart".to_string();
        set_status(&st.document, "playing");
        update_diagnostics(&st);
    }
    frames.request();
}

fn load_sprite(state: Rc<RefCell<AppState>>, kind: SpriteKind, url: &'static str) {
    let image: HtmlImageElement = {
        let st = state.borrow();
        match kind {
            SpriteKind::Player => st.sprites.player.clone(),
            SpriteKind::Truck => st.sprites.truck.clone(),
        }
    };
    image.set_src(url);

    spawn_local(async move {
        let result = JsFuture::from(image.decode()).await;

        let mut st = state.borrow_mut();
        match result {
            Ok(_) => {
                if kind == SpriteKind::Truck {
                    let size = st.sprites.truck_size();
                    st.game.set_truck_size(size);
                }
                st.last_event = format!("sprite_loaded ({})", url);
            }
            Err(err) => {
                web_sys::console::error_1(&err);
                st.last_event = format!("sprite_error ({})", url);
                if let Some(fallback) = &st.fallback {
                    let _ = fallback.remove_attribute("hidden");
                }
                set_status(&st.document, "error");
            }
        }
        update_diagnostics(&st);
    });
}

fn bind_touch_button(
    document: &Document,
    state: &Rc<RefCell<AppState>>,
    id: &str,
    direction: Direction,
) -> Result<(), JsValue> {
    let Some(button) = document.get_element_by_id(id) else {
        return Ok(());
    };

    let state_press = Rc::clone(state);
    let press = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        state_press.borrow_mut().input.set(direction, true);
    }) as Box<dyn FnMut(_)>);
    button.add_event_listener_with_callback("pointerdown", press.as_ref().unchecked_ref())?;
    press.forget();

    let state_release = Rc::clone(state);
    let release = Closure::wrap(Box::new(move |_event: Event| {
        state_release.borrow_mut().input.set(direction, false);
    }) as Box<dyn FnMut(_)>);
    for name in ["pointerup", "pointerleave", "pointercancel"] {
        button.add_event_listener_with_callback(name, release.as_ref().unchecked_ref())?;
    }
    release.forget();

    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = start_impl() {
        let message = format!("fatal: {}", js_value_to_string(&err));

        if let Some(win) = web_sys::window() {
            if let Some(doc) = win.document() {
                if let Some(el) = doc.document_element() {
                    let _ = el.set_attribute("data-render-status", "error");
                }
                if let Some(diag) = doc.get_element_by_id("diagnostics-text") {
                    diag.set_text_content(Some(&message));
                }
                if let Some(fallback) = doc.get_element_by_id("fallback") {
                    let _ = fallback.remove_attribute("hidden");
                }
            }
        }

        web_sys::console::error_1(&err);
    }
}

fn start_impl() -> Result<(), JsValue> {
    let win = window();
    let document = win
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas = document
        .get_element_by_id("gameCanvas")
        .ok_or_else(|| JsValue::from_str("Missing canvas"))?
        .dyn_into::<HtmlCanvasElement>()?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D canvas unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let diagnostics_text = document
        .get_element_by_id("diagnostics-text")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let fallback = document
        .get_element_by_id("fallback")
        .and_then(|el| el.dyn_into::<HtmlDivElement>().ok());

    let config = GameConfig::from_query(&win.location().search().unwrap_or_default());
    if config.show_diagnostics {
        if let Some(el) = document.document_element() {
            let _ = el.set_attribute("data-diag", "1");
        }
    }
    let store = LocalStorageStore::open();
    let storage_available = store.is_available();
    if !storage_available {
        web_sys::console::warn_1(&JsValue::from_str(
            "localStorage unavailable; best score will not persist",
        ));
    }

    let viewport = viewport_for_window(&win)?;
    let game = GameController::new(config, viewport, store, entropy());

    let sprites = Sprites {
        player: HtmlImageElement::new()?,
        truck: HtmlImageElement::new()?,
    };

    let state = Rc::new(RefCell::new(AppState {
        canvas,
        ctx,
        document: document.clone(),
        diagnostics_text,
        fallback,
        sprites,
        game,
        storage_available,
        input: InputState::default(),
        clock: FrameClock::default(),
        frame_count: 0,
        last_event: "init".to_string(),
    }));

    {
        let mut st = state.borrow_mut();
        apply_resize(&mut st)?;
        set_status(&document, "loading");
        update_diagnostics(&st);
    }

    let frames = FrameLoop::new(Rc::clone(&state));

    load_sprite(Rc::clone(&state), SpriteKind::Player, PLAYER_SPRITE_URL);
    load_sprite(Rc::clone(&state), SpriteKind::Truck, TRUCK_SPRITE_URL);

    let state_keydown = Rc::clone(&state);
    let frames_keydown = Rc::clone(&frames);
    let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let key = event.key();
        if let Some(direction) = direction_for_key(&key) {
            if key.starts_with("Arrow") {
                event.prevent_default();
            }
            state_keydown.borrow_mut().input.set(direction, true);
        } else if is_restart_key(&key) {
            restart(&state_keydown, &frames_keydown);
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
    on_keydown.forget();

    let state_keyup = Rc::clone(&state);
    let on_keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if let Some(direction) = direction_for_key(&event.key()) {
            state_keyup.borrow_mut().input.set(direction, false);
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("keyup", on_keyup.as_ref().unchecked_ref())?;
    on_keyup.forget();

    // Releasing keys while the window is unfocused never reaches keyup.
    let state_blur = Rc::clone(&state);
    let on_blur = Closure::wrap(Box::new(move |_event: Event| {
        let mut st = state_blur.borrow_mut();
        st.input.clear();
        st.last_event = "blur".to_string();
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref())?;
    on_blur.forget();

    for (id, direction) in TOUCH_BUTTONS {
        bind_touch_button(&document, &state, id, direction)?;
    }

    let state_pointer = Rc::clone(&state);
    let frames_pointer = Rc::clone(&frames);
    let on_pointerdown = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        restart(&state_pointer, &frames_pointer);
    }) as Box<dyn FnMut(_)>);
    state
        .borrow()
        .canvas
        .add_event_listener_with_callback("pointerdown", on_pointerdown.as_ref().unchecked_ref())?;
    on_pointerdown.forget();

    let resize_timer_handle: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));

    let state_resize_settle = Rc::clone(&state);
    let frames_settle = Rc::clone(&frames);
    let resize_settle_cb: Rc<Closure<dyn FnMut()>> = Rc::new(Closure::wrap(Box::new(move || {
        let mut st = state_resize_settle.borrow_mut();
        st.last_event = "resize_settled".to_string();
        if let Err(err) = apply_resize(&mut st) {
            st.last_event = format!("resize_error ({})", js_value_to_string(&err));
        }
        // A finished run is not redrawn by the loop, so repaint the end screen here.
        render(&st);
        update_diagnostics(&st);
        let running = st.game.is_running();
        drop(st);
        if running {
            frames_settle.request();
        }
    })
        as Box<dyn FnMut()>));

    let state_resize = Rc::clone(&state);
    let resize_timer_handle_ev = Rc::clone(&resize_timer_handle);
    let resize_settle_cb_ev = Rc::clone(&resize_settle_cb);
    let resize = Closure::wrap(Box::new(move |_event: Event| {
        state_resize.borrow_mut().last_event = "resize_event".to_string();

        if let Some(id) = resize_timer_handle_ev.borrow_mut().take() {
            window().clear_timeout_with_handle(id);
        }

        match window().set_timeout_with_callback_and_timeout_and_arguments_0(
            resize_settle_cb_ev.as_ref().as_ref().unchecked_ref(),
            RESIZE_SETTLE_MS,
        ) {
            Ok(id) => {
                *resize_timer_handle_ev.borrow_mut() = Some(id);
            }
            Err(_) => {
                let mut st = state_resize.borrow_mut();
                let _ = apply_resize(&mut st);
            }
        }
    }) as Box<dyn FnMut(_)>);

    win.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
    resize.forget();

    {
        let mut st = state.borrow_mut();
        st.last_event = "loop_start".to_string();
        set_status(&document, "playing");
        update_diagnostics(&st);
    }
    frames.request();

    Ok(())
}
