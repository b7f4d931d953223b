//! Jungle Quest entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

    use jungle_quest::audio::AudioManager;
    use jungle_quest::consts::*;
    use jungle_quest::hud::HudSnapshot;
    use jungle_quest::persistence;
    use jungle_quest::platform::input::{KeyAction, key_action};
    use jungle_quest::platform::{FrameClock, InputState, KeyValueStore, LocalStore};
    use jungle_quest::renderer::{CanvasSurface, render_world};
    use jungle_quest::settings::Settings;
    use jungle_quest::sim::{GameEvent, GamePhase, GameState, LevelBonus, tick};

    /// Overlay screens, by element id
    const SCREENS: [&str; 6] = [
        "menu-screen",
        "game-screen",
        "pause-screen",
        "level-complete-screen",
        "game-over-screen",
        "victory-screen",
    ];

    /// Keys whose browser default (scrolling) is suppressed
    const CAPTURED_KEYS: [&str; 5] = ["Space", "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn now_ms() -> u64 {
        js_sys::Date::now() as u64
    }

    fn set_hidden(doc: &Document, id: &str, hidden: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Show the game screen plus, optionally, one overlay on top
    fn show_screen(overlay: Option<&str>) {
        let Some(doc) = document() else { return };
        for id in SCREENS {
            set_hidden(&doc, id, id != "game-screen" && Some(id) != overlay);
        }
    }

    fn show_menu() {
        let Some(doc) = document() else { return };
        for id in SCREENS {
            set_hidden(&doc, id, id != "menu-screen");
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: Option<CanvasSurface>,
        clock: FrameClock,
        input: InputState,
        audio: AudioManager,
        store: Option<LocalStore>,
        settings: Settings,
        /// Last phase the overlays were synced to
        shown_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, surface: Option<CanvasSurface>) -> Self {
            let store = LocalStore::open();
            let settings = store
                .as_ref()
                .map(|s| Settings::load(s))
                .unwrap_or_default();

            let mut state = GameState::new(seed);
            state.apply_settings(&settings);
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);

            Self {
                state,
                surface,
                clock: FrameClock::new(),
                input: InputState::new(),
                audio,
                store,
                settings,
                shown_phase: GamePhase::Title,
            }
        }

        /// One animation frame
        fn frame(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            let input = self.input.tick_input();
            tick(&mut self.state, &input, dt);

            for event in self.state.drain_events() {
                self.handle_event(event);
            }

            if let Some(surface) = self.surface.as_mut() {
                render_world(&self.state, surface, self.state.stats.total_time);
            }
            self.update_hud();
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::Sound(sound) => self.audio.play(sound),
                GameEvent::SaveRequested => self.save_game(),
                GameEvent::LevelCompleted { level, bonus } => {
                    log::info!("Level {} complete, bonus {}", level, bonus.total);
                    self.save_game();
                }
                GameEvent::ShowLevelSummary { level, bonus } => self.show_summary(level, &bonus),
                GameEvent::ShowGameOver => {
                    if let Some(doc) = document() {
                        set_text(&doc, "final-score", &self.state.stats.score.to_string());
                        set_text(&doc, "final-level", &self.state.current_level.to_string());
                    }
                    self.clear_save();
                    show_screen(Some("game-over-screen"));
                }
                GameEvent::Victory => {
                    if let Some(doc) = document() {
                        set_text(&doc, "victory-score", &self.state.stats.score.to_string());
                        set_text(&doc, "victory-bananas", &self.state.stats.bananas.to_string());
                    }
                    self.clear_save();
                    show_screen(Some("victory-screen"));
                }
            }
        }

        fn show_summary(&self, level: u32, bonus: &LevelBonus) {
            if let Some(doc) = document() {
                set_text(&doc, "summary-level", &level.to_string());
                set_text(&doc, "bonus-time", &bonus.time.to_string());
                set_text(&doc, "bonus-bananas", &bonus.bananas.to_string());
                set_text(&doc, "bonus-level", &bonus.level.to_string());
                set_text(&doc, "bonus-total", &bonus.total.to_string());
                set_text(&doc, "summary-score", &self.state.stats.score.to_string());
            }
            show_screen(Some("level-complete-screen"));
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(doc) = document() else { return };
            let hud = HudSnapshot::from_state(&self.state);

            set_text(&doc, "score", &hud.score.to_string());
            set_text(&doc, "lives", &hud.lives.to_string());
            set_text(&doc, "bananas", &hud.bananas.to_string());
            set_text(&doc, "keys", &hud.keys.to_string());
            set_text(&doc, "timeline", &hud.timeline);
            set_text(&doc, "level", &hud.level.to_string());
            set_text(&doc, "level-name", &hud.level_name);

            if let Some(bar) = doc
                .get_element_by_id("quantum-energy")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let style = bar.style();
                let _ = style.set_property("width", &hud.energy_width());
                let _ = style.set_property("background", hud.energy_band.css());
            }

            // Pause overlay follows the phase; the rest are event driven
            if self.state.phase != self.shown_phase {
                match (self.shown_phase, self.state.phase) {
                    (_, GamePhase::Paused) => show_screen(Some("pause-screen")),
                    (GamePhase::Paused, GamePhase::Playing) => show_screen(None),
                    _ => {}
                }
                self.shown_phase = self.state.phase;
            }
        }

        fn save_game(&self) {
            let Some(store) = &self.store else { return };
            if !matches!(self.state.phase, GamePhase::Playing | GamePhase::LevelComplete { .. }) {
                return;
            }
            if let Err(e) = persistence::save(store, &self.state.save_data(now_ms())) {
                log::warn!("Save failed: {}", e);
            }
        }

        fn clear_save(&self) {
            if let Some(store) = &self.store {
                if let Err(e) = persistence::clear(store) {
                    log::warn!("Could not clear save: {}", e);
                }
            }
        }

        fn save_settings(&mut self) {
            self.state.apply_settings(&self.settings);
            self.audio.apply_settings(&self.settings);
            if let Some(store) = &self.store {
                if let Err(e) = self.settings.save(store) {
                    log::warn!("Settings not saved: {}", e);
                }
            }
        }

        fn start_new_game(&mut self) {
            self.clear_save();
            match self.state.start_new_game(1) {
                Ok(()) => {
                    self.begin_play();
                    log::info!("New game started");
                }
                Err(e) => log::error!("Cannot start game: {}", e),
            }
        }

        fn continue_game(&mut self) {
            let save = self.store.as_ref().and_then(|s| persistence::load(s));
            let Some(save) = save else {
                log::warn!("No save to continue from");
                return;
            };
            match self.state.continue_game(&save) {
                Ok(()) => self.begin_play(),
                Err(e) => log::error!("Cannot continue: {}", e),
            }
        }

        fn begin_play(&mut self) {
            self.clock.reset();
            self.input.clear();
            self.audio.resume();
            self.shown_phase = self.state.phase;
            show_screen(None);
        }

        fn on_key_down(&mut self, event: &KeyboardEvent) {
            let code = event.code();
            if let Some(action) = key_action(&code, event.ctrl_key(), event.shift_key()) {
                event.prevent_default();
                match action {
                    KeyAction::Cheat(cheat) => {
                        if let Err(e) = self.state.apply_cheat(cheat) {
                            log::error!("Cheat failed: {}", e);
                        }
                    }
                    KeyAction::ToggleDebug => {
                        self.state.toggle_debug();
                        log::info!("Debug overlay: {}", self.state.debug);
                    }
                    KeyAction::SaveNow => self.save_game(),
                }
                return;
            }
            if CAPTURED_KEYS.contains(&code.as_str()) {
                event.prevent_default();
            }
            self.input.key_down(&code);
            self.audio.resume();
        }

        /// Pause when the page loses focus
        fn auto_pause(&mut self, reason: &str) {
            self.input.clear();
            if self.state.phase == GamePhase::Playing {
                self.state.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    fn on_click(doc: &Document, id: &str, game: &Rc<RefCell<Game>>, f: fn(&mut Game)) {
        let Some(btn) = doc.get_element_by_id(id) else {
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            f(&mut game.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Jungle Quest starting...");

        let Some(doc) = document() else {
            log::error!("No document");
            return;
        };

        let canvas = doc
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let surface = canvas.as_ref().and_then(|canvas| {
            canvas.set_width(VIEWPORT_WIDTH as u32);
            canvas.set_height(VIEWPORT_HEIGHT as u32);
            CanvasSurface::new(canvas)
        });
        if surface.is_none() {
            log::error!("Canvas 2D unavailable - rendering disabled");
        }

        let seed = now_ms();
        let game = Rc::new(RefCell::new(Game::new(seed, surface)));
        log::info!("Game initialized with seed: {}", seed);

        // Menu
        {
            let g = game.borrow();
            let has_save = g.store.as_ref().is_some_and(|s| persistence::has_save(s));
            set_hidden(&doc, "continue-btn", !has_save);
            if g.settings.crt_effect {
                if let Some(body) = doc.body() {
                    let _ = body.class_list().add_1("crt");
                }
            }
            set_hidden(&doc, "mobile-controls", !g.settings.mobile_controls);
            set_text(&doc, "sound-btn", sound_label(g.settings.sound_enabled));
            set_text(&doc, "quality-btn", g.settings.quality.label());
        }
        set_hidden(&doc, "loading-screen", true);
        show_menu();

        on_click(&doc, "new-game-btn", &game, Game::start_new_game);
        on_click(&doc, "continue-btn", &game, Game::continue_game);
        on_click(&doc, "next-level-btn", &game, |g| match g.state.continue_to_next_level() {
            Ok(()) if g.state.phase == GamePhase::Playing => g.begin_play(),
            Ok(()) => {}
            Err(e) => log::error!("Cannot load next level: {}", e),
        });
        on_click(&doc, "restart-btn", &game, |g| match g.state.restart_level() {
            Ok(()) => g.begin_play(),
            Err(e) => log::error!("Cannot restart: {}", e),
        });
        on_click(&doc, "resume-btn", &game, |g| g.state.toggle_pause());
        on_click(&doc, "menu-btn", &game, |g| {
            g.save_game();
            g.state.phase = GamePhase::Title;
            g.shown_phase = GamePhase::Title;
            show_menu();
        });
        on_click(&doc, "sound-btn", &game, |g| {
            g.settings.sound_enabled = !g.settings.sound_enabled;
            g.save_settings();
            if let Some(doc) = document() {
                set_text(&doc, "sound-btn", sound_label(g.settings.sound_enabled));
            }
        });
        on_click(&doc, "quality-btn", &game, |g| {
            g.settings.quality = g.settings.quality.next();
            g.save_settings();
            if let Some(doc) = document() {
                set_text(&doc, "quality-btn", g.settings.quality.label());
            }
        });
        on_click(&doc, "crt-btn", &game, |g| {
            g.settings.crt_effect = !g.settings.crt_effect;
            g.save_settings();
            if let Some(body) = document().and_then(|d| d.body()) {
                let _ = body.class_list().toggle_with_force("crt", g.settings.crt_effect);
            }
        });
        on_click(&doc, "controls-btn", &game, |g| {
            g.settings.mobile_controls = !g.settings.mobile_controls;
            g.save_settings();
            if let Some(doc) = document() {
                set_hidden(&doc, "mobile-controls", !g.settings.mobile_controls);
            }
        });

        setup_keyboard(game.clone());
        setup_touch_buttons(&doc, game.clone());
        setup_auto_pause(&doc, game.clone());

        request_animation_frame(game);

        log::info!("Jungle Quest running!");
    }

    fn sound_label(on: bool) -> &'static str {
        if on { "SOUND: ON" } else { "SOUND: OFF" }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().on_key_down(&event);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen buttons carry the key code they emulate in `data-key`
    fn setup_touch_buttons(doc: &Document, game: Rc<RefCell<Game>>) {
        let Ok(nodes) = doc.query_selector_all("#mobile-controls [data-key]") else {
            return;
        };
        for i in 0..nodes.length() {
            let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(code) = el.get_attribute("data-key") else {
                continue;
            };

            for (event_name, pressed) in [("touchstart", true), ("touchend", false), ("touchcancel", false)] {
                let game = game.clone();
                let code = code.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    if pressed {
                        g.input.key_down(&code);
                        g.audio.resume();
                    } else {
                        g.input.key_up(&code);
                    }
                });
                let _ = el.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_pause(doc: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = doc.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = doc.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        let Some(window) = web_sys::window() else { return };

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.auto_pause("window blur");
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = !g.settings.sound_enabled;
                g.audio.set_muted(muted);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run of the first level with a scripted player
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use jungle_quest::audio::AudioManager;
    use jungle_quest::hud::HudSnapshot;
    use jungle_quest::persistence;
    use jungle_quest::platform::{FrameClock, MemoryStore};
    use jungle_quest::renderer::{RecordingSurface, render_world};
    use jungle_quest::settings::Settings;
    use jungle_quest::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Jungle Quest (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in the browser");

    let store = MemoryStore::new();
    let settings = Settings::load(&store);
    let audio = AudioManager::new();

    let mut state = GameState::new(42);
    state.apply_settings(&settings);
    if let Err(e) = state.start_new_game(1) {
        log::error!("Cannot start: {}", e);
        return std::process::ExitCode::FAILURE;
    }

    let mut clock = FrameClock::new();
    let mut now = 0.0;
    for frame in 0..1800u32 {
        now += 1000.0 / 60.0;
        let input = TickInput {
            right: true,
            jump: frame % 45 < 10,
            scan: frame == 120,
            ..Default::default()
        };
        tick(&mut state, &input, clock.delta(now));

        for event in state.drain_events() {
            match event {
                GameEvent::Sound(sound) => audio.play(sound),
                GameEvent::SaveRequested => {
                    if let Err(e) = persistence::save(&store, &state.save_data(frame as u64)) {
                        log::warn!("Save failed: {}", e);
                    }
                }
                other => log::info!("Event: {:?}", other),
            }
        }
    }

    let mut surface = RecordingSurface::new();
    render_world(&state, &mut surface, state.stats.total_time);

    let hud = HudSnapshot::from_state(&state);
    log::info!(
        "After {} frames: phase {:?}, score {}, lives {}, bananas {}, keys {}",
        state.frame_count,
        state.phase,
        hud.score,
        hud.lives,
        hud.bananas,
        hud.keys
    );
    log::info!(
        "{} sounds played, {} draw calls in the last frame",
        audio.history().len(),
        surface.commands.len()
    );
    std::process::ExitCode::SUCCESS
}
