//! Drop Catcher entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use drop_catcher::audio::{AudioManager, cues_for};
    use drop_catcher::consts::NOMINAL_DT;
    use drop_catcher::renderer::{RenderError, RenderState, shapes};
    use drop_catcher::{App, RawInput, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        app: App,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: RawInput,
        last_time: f64,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let audio = AudioManager::new(
                settings.master_volume,
                settings.sfx_volume,
                settings.music_volume,
            );
            Self {
                app: App::new(Tuning::default(), settings),
                render_state: None,
                audio,
                input: RawInput::default(),
                last_time: 0.0,
            }
        }

        /// Run one frame of simulation and play its sounds
        fn update(&mut self, dt: f32, time: f64) {
            match self.app.frame(&self.input, dt, time) {
                Ok(events) => {
                    for event in &events {
                        for cue in cues_for(event) {
                            self.audio.apply(*cue);
                        }
                    }
                }
                Err(e) => log::warn!("Frame skipped: {}", e),
            }
            // One-shot input
            self.input.tapped = None;
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(session) = self.app.session() else {
                return;
            };
            let vertices = shapes::scene(session);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, self.app.viewport()) {
                    Ok(_) => {}
                    Err(RenderError::Surface(wgpu::SurfaceError::Lost)) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(hud) = self.app.hud() else { return };

            if let Some(el) = document.get_element_by_id("hud-primary") {
                el.set_text_content(Some(&hud.primary));
            }
            if let Some(el) = document.get_element_by_id("hud-secondary") {
                el.set_text_content(hud.secondary.as_deref());
            }
        }

        /// Stop the simulation and silence audio
        fn pause(&mut self) {
            if self.app.pause().is_ok() {
                self.audio.set_muted(true);
            }
        }

        fn resume(&mut self) {
            if let Ok(true) = self.app.resume() {
                self.audio.set_muted(false);
                if self
                    .app
                    .session()
                    .is_some_and(|s| !s.is_game_over())
                {
                    self.audio.start_music();
                }
            }
        }

        fn dispose(&mut self) {
            self.app.settings().save();
            self.audio.stop_music();
            self.render_state = None;
            if let Err(e) = self.app.dispose() {
                log::warn!("Dispose failed: {}", e);
            }
        }
    }

    /// Pointer position relative to the canvas, in CSS pixels
    fn touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Drop Catcher starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Surface in device pixels, input in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1) as u32;
        let client_h = canvas.client_height().max(1) as u32;
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings)));
        let seed = js_sys::Date::now() as u64;
        if let Err(e) = game.borrow_mut().app.create(seed, client_w, client_h) {
            log::error!("Failed to start: {}", e);
            return;
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_lifecycle_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Drop Catcher running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - drag start and tap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                g.input.pointer_down = Some(pos);
                g.input.tapped = Some(pos);
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - only drags while a button is held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if event.buttons() != 0 {
                    let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                    g.input.pointer_down = Some(pos);
                } else {
                    g.input.pointer_down = None;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_down = None;
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (tap + drag)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some(pos) = touch_pos(&canvas_clone, &event) {
                    g.input.pointer_down = Some(pos);
                    g.input.tapped = Some(pos);
                }
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_clone, &event) {
                    game.borrow_mut().input.pointer_down = Some(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.pointer_down = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "f" | "F" => {
                        g.app.toggle_show_fps();
                        g.app.settings().save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                // A hidden tab is always silenced
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.pause();
                    log::info!("Auto-paused (tab hidden)");
                } else {
                    g.resume();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur / focus
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.app.settings().mute_on_blur {
                    g.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().resume();
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let dpr = window.device_pixel_ratio();
                let client_w = canvas.client_width().max(1) as u32;
                let client_h = canvas.client_height().max(1) as u32;
                let width = (client_w as f64 * dpr) as u32;
                let height = (client_h as f64 * dpr) as u32;
                canvas.set_width(width);
                canvas.set_height(height);

                let mut g = game.borrow_mut();
                if let Some(ref mut render_state) = g.render_state {
                    render_state.resize(width, height);
                }
                if let Err(e) = g.app.resize(client_w, client_h) {
                    log::warn!("Resize ignored: {}", e);
                }
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page teardown
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().dispose();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.app.lifecycle() == drop_catcher::Lifecycle::Disposed {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                NOMINAL_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Drop Catcher (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    if let Err(e) = headless::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Native demo: the autopilot plays one minute at 60 FPS
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use drop_catcher::audio::cues_for;
    use drop_catcher::consts::NOMINAL_DT;
    use drop_catcher::sim::GameEvent;
    use drop_catcher::{App, RawInput, Settings, Tuning};

    const DEMO_SECONDS: u32 = 60;

    pub fn run(tuning_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
        let tuning = match tuning_path {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(&path)?)?
            }
            None => Tuning::default(),
        };

        let mut app = App::new(tuning, Settings::load());
        app.create(0x5eed, 640, 400)?;

        let input = RawInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut caught = 0u32;
        let mut missed = 0u32;
        let frames = DEMO_SECONDS * 60;
        for frame in 0..frames {
            let now_ms = frame as f64 * NOMINAL_DT as f64 * 1000.0;
            for event in app.frame(&input, NOMINAL_DT, now_ms)? {
                for cue in cues_for(&event) {
                    log::trace!("audio cue {:?}", cue);
                }
                match event {
                    GameEvent::Caught { .. } => caught += 1,
                    GameEvent::Missed { .. } => missed += 1,
                    _ => {}
                }
            }
        }

        if let Some(hud) = app.hud() {
            log::info!("{} | {}", hud.primary, hud.secondary.unwrap_or_default());
        }
        println!(
            "Demo finished: {} caught, {} missed over {}s (FPS {})",
            caught,
            missed,
            DEMO_SECONDS,
            app.fps()
        );

        app.dispose()?;
        Ok(())
    }
}
