//! Brew Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent, TouchEvent};

    use brew_catch::consts::*;
    use brew_catch::fx::Confetti;
    use brew_catch::sim::{GameEvent, GamePhase};
    use brew_catch::{PointerSample, Session, Tuning, Viewport};

    const DEFAULT_IMAGE: &str = "hidden.jpg";
    const BASKET_HEIGHT: f64 = 30.0;
    const BASKET_BOTTOM: f64 = 40.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        confetti: Confetti,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        image: HtmlImageElement,
        last_time: f64,
    }

    impl Game {
        fn viewport(&self) -> Viewport {
            viewport_of(&self.canvas)
        }

        /// Run one frame of simulation and hand effects to confetti
        fn update(&mut self, dt: f32) {
            self.session.frame(dt);
            let viewport = self.viewport();
            for event in self.session.drain_events() {
                match event {
                    GameEvent::Burst(burst) => self.confetti.emit(&burst, viewport),
                    GameEvent::GameOver => log::info!("Out of lives"),
                    GameEvent::Won => log::info!("Picture revealed!"),
                    _ => {}
                }
            }
            self.confetti.update(dt.min(MAX_FRAME_DT));
        }

        /// Draw the current frame
        fn render(&self) {
            let ctx = &self.ctx;
            let view = self.viewport();
            let (w, h) = (view.width as f64, view.height as f64);
            let frame = self.session.snapshot();

            ctx.set_fill_style_str("#1a1a2e");
            ctx.fill_rect(0.0, 0.0, w, h);

            // Puzzle, centred
            let side = if self.session.layout().compact {
                (w * 0.9).min(400.0)
            } else {
                500.0
            };
            let (left, top) = ((w - side) / 2.0, (h - side) / 2.0);
            if self.image.complete() {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(&self.image, left, top, side, side);
            }
            let cell = side / GRID_SIZE as f64;
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_font(&format!("{}px sans-serif", (cell * 0.3) as u32));
            for piece in 0..TOTAL_PIECES as u8 {
                if frame.unlocked.contains(&piece) {
                    continue;
                }
                let (row, col) = ((piece as usize / GRID_SIZE) as f64, (piece as usize % GRID_SIZE) as f64);
                let (x, y) = (left + col * cell, top + row * cell);
                ctx.set_fill_style_str("#222222");
                ctx.fill_rect(x, y, cell, cell);
                ctx.set_stroke_style_str("#333333");
                ctx.stroke_rect(x, y, cell, cell);
                ctx.set_fill_style_str("#f1c40f");
                let _ = ctx.fill_text("🍺", x + cell / 2.0, y + cell / 2.0);
            }
            ctx.set_stroke_style_str("#f1c40f");
            ctx.set_line_width(5.0);
            ctx.stroke_rect(left, top, side, side);
            ctx.set_line_width(1.0);

            // Falling items
            let item_font = if self.session.layout().compact { 35 } else { 50 };
            ctx.set_font(&format!("{}px sans-serif", item_font));
            ctx.set_text_baseline("top");
            for item in &frame.items {
                let x = self.session.layout().item_px_x(item.x) as f64;
                let _ = ctx.fill_text(item.kind.glyph(), x, item.y as f64);
            }

            // Basket
            if frame.phase == GamePhase::Running {
                let bw = self.session.layout().basket_width as f64;
                let bx = frame.basket_x as f64 - bw / 2.0;
                let by = h - BASKET_BOTTOM - BASKET_HEIGHT;
                ctx.set_fill_style_str("#8e44ad");
                ctx.fill_rect(bx, by, bw, BASKET_HEIGHT);
                ctx.set_stroke_style_str("#f1c40f");
                ctx.stroke_rect(bx, by, bw, BASKET_HEIGHT);
                ctx.set_text_baseline("bottom");
                let _ = ctx.fill_text("📦", frame.basket_x as f64, by + 10.0);
            }

            // Confetti
            for p in &self.confetti.particles {
                ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
                ctx.set_fill_style_str(&format!("#{:06x}", p.color));
                ctx.fill_rect(p.pos.x as f64, p.pos.y as f64, p.size as f64, p.size as f64);
            }
            ctx.set_global_alpha(1.0);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.session.state();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&format!("🍺 {}", state.score)));
            }
            if let Some(el) = document.get_element_by_id("hud-lives") {
                el.set_text_content(Some(&"❤️".repeat(state.lives as usize)));
            }
            if let Some(el) = document.get_element_by_id("hud-pieces") {
                el.set_text_content(Some(&format!("🔓 {}/{}", state.pieces.len(), TOTAL_PIECES)));
            }

            let overlays = [
                ("title-screen", state.phase == GamePhase::Ready),
                ("game-over", state.phase == GamePhase::Lost),
                ("game-won", state.phase == GamePhase::Won),
            ];
            for (id, visible) in overlays {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if visible { "overlay-screen" } else { "overlay-screen hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
        }
    }

    fn viewport_of(canvas: &HtmlCanvasElement) -> Viewport {
        Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32)
    }

    /// Tuning override from `<canvas data-tuning='{...}'>`, defaults otherwise
    fn load_tuning(canvas: &HtmlCanvasElement) -> Tuning {
        match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        }
    }

    fn resize_canvas(canvas: &HtmlCanvasElement) {
        canvas.set_width(canvas.client_width().max(0) as u32);
        canvas.set_height(canvas.client_height().max(0) as u32);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brew Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        resize_canvas(&canvas);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let image = HtmlImageElement::new().expect("image element");
        image.set_src(&canvas.get_attribute("data-image").unwrap_or_else(|| DEFAULT_IMAGE.to_string()));

        let seed = js_sys::Date::now() as u64;
        let tuning = load_tuning(&canvas);
        let session = Session::new(seed, tuning, viewport_of(&canvas));
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            confetti: Confetti::new(seed ^ 0x9e37_79b9),
            ctx,
            canvas,
            image,
            last_time: 0.0,
        }));

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_lifecycle(game.clone());

        request_animation_frame(game);
        log::info!("Brew Catch running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().session.pointer(PointerSample::Mouse {
                    client_x: event.client_x() as f32,
                });
            });
            let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start and move share one handler. Non-passive so
        // prevent_default stops the page from scrolling.
        let touch_options = web_sys::AddEventListenerOptions::new();
        touch_options.set_passive(false);
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = event.touches();
                let xs: Vec<f32> = (0..touches.length())
                    .filter_map(|i| touches.get(i))
                    .map(|t| t.client_x() as f32)
                    .collect();
                game.borrow_mut()
                    .session
                    .pointer(PointerSample::Touch { client_xs: &xs });
            });
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &touch_options,
            );
            closure.forget();
        }

        // Resize / rotate
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                resize_canvas(&g.canvas);
                let viewport = g.viewport();
                g.session.resize(viewport);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("play-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #play-btn, starting immediately");
            game.borrow_mut().session.start();
        }

        // Both end screens restart
        for id in ["restart-btn", "play-again-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("No #{} in page", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.session.restart(seed);
                g.confetti.clear();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop the session when the page goes away
    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().session.teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.session.is_torn_down() {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brew Catch (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    autoplay(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: the basket chases the lowest drink and ignores bombs
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64) {
    use brew_catch::sim::ItemKind;
    use brew_catch::{PointerSample, Session, Tuning, Viewport};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    let mut session = Session::new(seed, Tuning::default(), Viewport::new(1280.0, 800.0));
    session.start();

    let mut frames = 0;
    while frames < MAX_FRAMES && !session.state().phase.is_terminal() {
        let target = session
            .state()
            .items
            .iter()
            .filter(|i| i.kind != ItemKind::Bomb)
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|i| session.layout().item_px_x(i.x));
        if let Some(x) = target {
            session.pointer(PointerSample::Mouse { client_x: x });
        }
        session.frame(FRAME_DT);
        session.drain_events();
        frames += 1;
    }

    let state = session.state();
    println!(
        "seed {}: {:?} after {:.1}s - score {}, lives {}, pieces {}/16",
        seed,
        state.phase,
        frames as f32 * FRAME_DT,
        state.score,
        state.lives,
        state.pieces.len()
    );
}
