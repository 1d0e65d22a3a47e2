//! Topping Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, Event, HtmlCanvasElement, HtmlElement,
        HtmlImageElement, KeyboardEvent,
    };

    use topping_dodge::audio::web::WebAudioBackend;
    use topping_dodge::audio::{AudioEngine, BackendOpener, MelodyTicket};
    use topping_dodge::consts::SELECT_DELAY_MS;
    use topping_dodge::game::Direction;
    use topping_dodge::highscore::LocalStorageStore;
    use topping_dodge::render::{AssetStore, RenderSurface, SpriteKey, render};
    use topping_dodge::sim::{GameEvent, GamePhase, Rect, ToppingKind};
    use topping_dodge::{Game, GameConfig};

    type WebGame = Game<WebAudioBackend, LocalStorageStore>;

    /// Canvas 2D drawing surface
    struct CanvasSurface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl RenderSurface for CanvasSurface {
        type Image = HtmlImageElement;

        fn fill_vertical_gradient(&mut self, top: &str, bottom: &str) {
            let w = self.canvas.width() as f64;
            let h = self.canvas.height() as f64;
            let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
            gradient.add_color_stop(0.0, top).ok();
            gradient.add_color_stop(1.0, bottom).ok();
            self.ctx.set_fill_style_canvas_gradient(&gradient);
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }

        fn draw_image(&mut self, image: &HtmlImageElement, rect: Rect) {
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    rect.pos.x as f64,
                    rect.pos.y as f64,
                    rect.size.x as f64,
                    rect.size.y as f64,
                )
                .ok();
        }

        fn save(&mut self) {
            self.ctx.save();
        }

        fn restore(&mut self) {
            self.ctx.restore();
        }

        fn translate(&mut self, x: f32, y: f32) {
            self.ctx.translate(x as f64, y as f64).ok();
        }

        fn rotate(&mut self, angle: f32) {
            self.ctx.rotate(angle as f64).ok();
        }
    }

    /// Loaded sprite images
    #[derive(Default)]
    struct Sprites {
        images: HashMap<SpriteKey, HtmlImageElement>,
    }

    impl AssetStore for Sprites {
        type Image = HtmlImageElement;

        fn image(&self, key: SpriteKey) -> Option<&HtmlImageElement> {
            self.images.get(&key)
        }
    }

    /// Everything the page callbacks share
    struct App {
        game: WebGame,
        surface: CanvasSurface,
        sprites: Sprites,
        /// Pending melody loop timeout
        melody_timer: Option<i32>,
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(el: &Element, class: &str, on: bool) {
        let list = el.class_list();
        let _ = if on {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
    }

    fn set_class_by_id(id: &str, class: &str, on: bool) {
        if let Some(el) = element(id) {
            set_class(&el, class, on);
        }
    }

    fn set_display(id: &str, display: &str) {
        if let Some(el) = element(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
            let _ = el.style().set_property("display", display);
        }
    }

    fn topping_options() -> Vec<Element> {
        let Some(list) = document().and_then(|d| d.query_selector_all(".topping-option").ok())
        else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn listen<F>(target: &web_sys::EventTarget, event: &str, handler: F)
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn set_timeout<F: FnOnce() + 'static>(callback: F, delay_ms: i32) -> Option<i32> {
        let window = web_sys::window()?;
        let closure = Closure::once(callback);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            )
            .map_err(|e| log::error!("setTimeout failed: {:?}", e))
            .ok();
        closure.forget();
        handle
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Topping Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let config = document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
            .map(|json| GameConfig::from_json_or_default(&json))
            .unwrap_or_default();
        canvas.set_width(config.canvas_width as u32);
        canvas.set_height(config.canvas_height as u32);

        let seed = config.seed_or(js_sys::Date::now() as u64);
        let opener: BackendOpener<WebAudioBackend> = Box::new(WebAudioBackend::open);
        let audio = AudioEngine::new(opener, config.audio_enabled);
        let game: WebGame = Game::new(&config, seed, audio, LocalStorageStore);
        set_text("highScore", &game.session.high_score.to_string());

        let app = Rc::new(RefCell::new(App {
            game,
            surface: CanvasSurface { canvas, ctx },
            sprites: Sprites::default(),
            melody_timer: None,
        }));

        resize_canvas(&app);
        {
            let app = app.clone();
            listen(&window, "resize", move |_| resize_canvas(&app));
        }

        load_sprites(&app);
        setup_keyboard(&document, app.clone());
        setup_hold_button("leftBtn", Direction::Left, app.clone());
        setup_hold_button("rightBtn", Direction::Right, app.clone());
        setup_topping_selection(app.clone());
        setup_restart_button(app.clone());
        setup_mute_button(app);

        log::info!("Topping Dodge ready");
    }

    /// Match the canvas to its wrapper
    fn resize_canvas(app: &Rc<RefCell<App>>) {
        let Some(wrapper) =
            document().and_then(|d| d.query_selector(".game-wrapper").ok().flatten())
        else {
            return;
        };
        let (w, h) = (wrapper.client_width().max(0), wrapper.client_height().max(0));
        let mut a = app.borrow_mut();
        a.surface.canvas.set_width(w as u32);
        a.surface.canvas.set_height(h as u32);
        a.game.resize(w as f32, h as f32);
    }

    fn load_sprites(app: &Rc<RefCell<App>>) {
        for key in SpriteKey::all() {
            let img = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(e) => {
                    log::error!("Failed to create image for {}: {:?}", key.path(), e);
                    continue;
                }
            };

            let onload = {
                let app = app.clone();
                let img = img.clone();
                Closure::<dyn FnMut()>::new(move || {
                    log::info!("Loaded: {}", key.path());
                    app.borrow_mut().sprites.images.insert(key, img.clone());
                })
            };
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            // Missing sprites just don't get drawn
            let onerror = Closure::<dyn FnMut()>::new(move || {
                log::error!("Failed to load: {}", key.path());
            });
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();

            img.set_src(key.path());
        }
    }

    fn key_direction(event: &KeyboardEvent) -> Option<Direction> {
        match event.key().to_lowercase().as_str() {
            "a" | "arrowleft" => Some(Direction::Left),
            "d" | "arrowright" => Some(Direction::Right),
            _ => None,
        }
    }

    fn setup_keyboard(document: &Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            listen(document, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let Some(dir) = key_direction(event) else {
                    return;
                };
                let mut a = app.borrow_mut();
                if a.game.session.is_running() {
                    a.game.set_direction(dir, true);
                    event.prevent_default();
                }
            });
        }

        listen(document, "keyup", move |event| {
            if let Some(dir) = event.dyn_ref::<KeyboardEvent>().and_then(key_direction) {
                app.borrow_mut().game.set_direction(dir, false);
            }
        });
    }

    /// On-screen arrow buttons (mouse and touch)
    fn setup_hold_button(id: &str, dir: Direction, app: Rc<RefCell<App>>) {
        let Some(btn) = element(id) else {
            return;
        };

        for (event, held) in [
            ("mousedown", true),
            ("touchstart", true),
            ("mouseup", false),
            ("mouseleave", false),
            ("touchend", false),
        ] {
            let app = app.clone();
            listen(&btn, event, move |e| {
                if event == "touchstart" {
                    e.prevent_default();
                }
                app.borrow_mut().game.set_direction(dir, held);
            });
        }
    }

    fn setup_topping_selection(app: Rc<RefCell<App>>) {
        for option in topping_options() {
            let app = app.clone();
            let target = option.clone();
            listen(&option, "click", move |_| {
                for other in topping_options() {
                    set_class(&other, "selected", false);
                }
                set_class(&target, "selected", true);

                let kind = match target
                    .get_attribute("data-topping")
                    .unwrap_or_default()
                    .parse::<ToppingKind>()
                {
                    Ok(kind) => kind,
                    Err(e) => {
                        log::error!("{}", e);
                        return;
                    }
                };

                app.borrow_mut().game.click();

                let app = app.clone();
                set_timeout(move || start_run(&app, kind), SELECT_DELAY_MS);
            });
        }
    }

    fn start_run(app: &Rc<RefCell<App>>, kind: ToppingKind) {
        let ticket = {
            let mut a = app.borrow_mut();
            if a.game.session.phase != GamePhase::Idle {
                return;
            }
            a.game.start(kind, js_sys::Date::now())
        };

        set_display("startScreen", "none");
        let mobile = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
            .is_some_and(|w| w <= 768.0);
        if mobile {
            set_class_by_id("mobileControls", "active", true);
        }
        set_text("currentScore", "0");
        set_class_by_id("gameOverScreen", "show", false);

        if let Some(ticket) = ticket {
            arm_melody_timer(app, ticket);
        }

        request_animation_frame(app.clone());
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>) {
        let (events, score, running) = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            let events = a.game.update(js_sys::Date::now());
            render(&a.game.session, &mut a.surface, &a.sprites);
            (events, a.game.session.score, a.game.session.is_running())
        };

        set_text("currentScore", &score.to_string());

        for event in events {
            if let GameEvent::GameOver {
                score, high_score, ..
            } = event
            {
                show_game_over(&app, score, high_score);
            }
        }

        if running {
            request_animation_frame(app);
        }
    }

    fn show_game_over(app: &Rc<RefCell<App>>, score: u64, high_score: u64) {
        clear_melody_timer(app);
        set_class_by_id("mobileControls", "active", false);

        let selected = app.borrow().game.session.selected;
        if let Some(img) =
            element("mieResultImage").and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        {
            img.set_src(SpriteKey::splat_for(selected).path());
        }

        set_text("finalScore", &score.to_string());
        set_text("finalHighScore", &high_score.to_string());
        set_text("highScore", &high_score.to_string());
        set_class_by_id("gameOverScreen", "show", true);
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let Some(btn) = element("restartBtn") else {
            return;
        };
        listen(&btn, "click", move |_| {
            clear_melody_timer(&app);
            if !app.borrow_mut().game.restart() {
                return;
            }
            set_display("startScreen", "flex");
            set_class_by_id("gameOverScreen", "show", false);
            for option in topping_options() {
                set_class(&option, "selected", false);
            }
        });
    }

    fn setup_mute_button(app: Rc<RefCell<App>>) {
        let Some(btn) = element("muteBtn") else {
            return;
        };
        let target = btn.clone();
        listen(&btn, "click", move |_| {
            let (ticket, enabled) = {
                let mut a = app.borrow_mut();
                let ticket = a.game.toggle_audio();
                (ticket, a.game.session.audio_enabled)
            };

            set_class(&target, "muted", !enabled);
            if let Some(icon) = target.query_selector(".mute-icon").ok().flatten() {
                icon.set_text_content(Some(if enabled { "🔊" } else { "🔇" }));
            }

            if !enabled {
                clear_melody_timer(&app);
            }
            if let Some(ticket) = ticket {
                arm_melody_timer(&app, ticket);
            }
        });
    }

    /// Schedule the next melody pass, replacing any pending one
    fn arm_melody_timer(app: &Rc<RefCell<App>>, ticket: MelodyTicket) {
        clear_melody_timer(app);

        let app_cb = app.clone();
        let handle = set_timeout(
            move || {
                let next = {
                    let mut a = app_cb.borrow_mut();
                    a.melody_timer = None;
                    a.game.melody_finished(ticket.generation)
                };
                if let Some(next) = next {
                    arm_melody_timer(&app_cb, next);
                }
            },
            ticket.delay_ms as i32,
        );
        app.borrow_mut().melody_timer = handle;
    }

    fn clear_melody_timer(app: &Rc<RefCell<App>>) {
        let handle = app.borrow_mut().melody_timer.take();
        if let (Some(handle), Some(window)) = (handle, web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
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
    log::info!("Topping Dodge (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted run without a window: a simple bot dodges until it gets hit
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use topping_dodge::audio::{AudioEngine, BackendOpener, MelodyTicket, SilentBackend};
    use topping_dodge::game::Direction;
    use topping_dodge::highscore::MemoryStore;
    use topping_dodge::sim::{GameEvent, ToppingKind};
    use topping_dodge::{Game, GameConfig};

    type NativeGame = Game<SilentBackend, MemoryStore>;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after two minutes of game time
    const MAX_FRAMES: u32 = 60 * 120;
    /// How far above the bowl the bot looks
    const LOOKAHEAD: f32 = 160.0;

    pub fn run() {
        let config = GameConfig::default();
        let seed = config.seed_or(2024);
        let opener: BackendOpener<SilentBackend> = Box::new(|| Ok(SilentBackend));
        let audio = AudioEngine::new(opener, config.audio_enabled);
        let mut game: NativeGame = Game::new(&config, seed, audio, MemoryStore::default());

        let mut now = 0.0;
        let mut melody = due(game.start(ToppingKind::Sambal, now), now);

        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            steer(&mut game);

            for event in game.update(now) {
                match event {
                    GameEvent::LevelUp(level) => {
                        println!("Level {} at {:.1}s", level, now / 1000.0)
                    }
                    GameEvent::GameOver {
                        score, high_score, ..
                    } => {
                        println!(
                            "Game over after {:.1}s: score {} (best {})",
                            now / 1000.0,
                            score,
                            high_score
                        );
                        return;
                    }
                    _ => {}
                }
            }

            if let Some((ticket, at)) = melody {
                if now >= at {
                    melody = due(game.melody_finished(ticket.generation), now);
                }
            }
        }

        println!(
            "Bot survived {:.0}s, score {}",
            now / 1000.0,
            game.session.score
        );
    }

    fn due(ticket: Option<MelodyTicket>, now: f64) -> Option<(MelodyTicket, f64)> {
        ticket.map(|t| (t, now + t.delay_ms as f64))
    }

    /// Step away from the lowest dangerous topping above the bowl
    fn steer(game: &mut NativeGame) {
        let session = &game.session;
        let player = session.player.rect();
        let center = player.center().x;

        let threat = session
            .toppings
            .iter()
            .filter(|t| Some(t.kind) == session.selected)
            .map(|t| t.rect())
            .filter(|r| r.bottom() > player.pos.y - LOOKAHEAD && r.pos.y < player.bottom())
            .filter(|r| r.pos.x < player.right() + 10.0 && r.right() > player.pos.x - 10.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let dir = threat.map(|r| {
            let room_left = player.pos.x;
            let room_right = session.canvas.width - player.right();
            if r.center().x > center && room_left > player.size.x {
                Direction::Left
            } else if room_right > player.size.x {
                Direction::Right
            } else {
                Direction::Left
            }
        });

        game.set_direction(Direction::Left, dir == Some(Direction::Left));
        game.set_direction(Direction::Right, dir == Some(Direction::Right));
    }
}
