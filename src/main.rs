//! Български държавни символи entry point
//!
//! The browser build runs the game; the native build plays a short scripted
//! walkthrough against the real room data as a smoke check.

use bg_symbols::sim::GameEvent;

/// Log what the simulation reported
fn log_events(events: &[GameEvent]) {
    for event in events {
        match *event {
            GameEvent::ModeChanged { from, to } => log::info!("Mode {from:?} -> {to:?}"),
            GameEvent::ExhibitOpened { room, exhibit } => {
                log::info!("Opened exhibit {exhibit} in {}", room.name())
            }
            GameEvent::AnswerGraded {
                room,
                exhibit,
                result,
            } => log::info!("Quiz {exhibit} in {} answered: {result:?}", room.name()),
            GameEvent::VictoryUnlocked => log::info!("Victory door unlocked"),
            GameEvent::SessionReset => log::info!("Session reset"),
            GameEvent::MuteToggled(muted) => log::info!("Muted: {muted}"),
            GameEvent::Quit => log::info!("Quit requested"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use thiserror::Error;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use bg_symbols::assets::{self, AssetError, PLAYER_IMAGE};
    use bg_symbols::audio::AudioPlayer;
    use bg_symbols::consts::*;
    use bg_symbols::input::{InputState, action_for_code, prevents_default};
    use bg_symbols::renderer::{Anchor, RenderState, TextItem, Viewport, build_scene, image_keys};
    use bg_symbols::sim::{GameContent, GameEvent, GameState, tick};
    use bg_symbols::{GAME_TITLE, Settings};

    #[derive(Debug, Error)]
    enum StartupError {
        #[error(transparent)]
        Asset(#[from] AssetError),
        #[error("WebGPU is not available: {0}")]
        Gpu(String),
        #[error("page element #{0} is missing")]
        Page(&'static str),
    }

    /// Absolutely positioned labels over the canvas
    struct TextLayer {
        root: HtmlElement,
        nodes: Vec<HtmlElement>,
        shown: Vec<TextItem>,
        viewport: Option<Viewport>,
    }

    impl TextLayer {
        fn new(root: HtmlElement) -> Self {
            Self {
                root,
                nodes: Vec::new(),
                shown: Vec::new(),
                viewport: None,
            }
        }

        fn node(&mut self, document: &Document, index: usize) -> Option<HtmlElement> {
            while self.nodes.len() <= index {
                let node: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
                node.set_class_name("label");
                let _ = self.root.append_child(&node);
                self.nodes.push(node);
            }
            self.nodes.get(index).cloned()
        }

        /// Bring the DOM in line with this frame's text. Untouched when
        /// nothing changed.
        fn sync(&mut self, texts: &[TextItem], viewport: Viewport, fade: f32) {
            let _ = self
                .root
                .style()
                .set_property("opacity", &format!("{:.3}", 1.0 - fade));
            if self.viewport == Some(viewport) && self.shown == texts {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            for (i, item) in texts.iter().enumerate() {
                let Some(node) = self.node(&document, i) else { return };
                let (left, top) = viewport.to_canvas(item.x, item.y);
                let style = node.style();
                let _ = style.set_property("display", "block");
                let _ = style.set_property("left", &format!("{left}px"));
                let _ = style.set_property("top", &format!("{top}px"));
                let _ = style.set_property(
                    "font-size",
                    &format!("{}px", item.font_px as f32 * viewport.scale),
                );
                let _ = style.set_property("color", &format!("#{:06X}", item.color));
                let _ = style.set_property(
                    "font-style",
                    if item.italic { "italic" } else { "normal" },
                );
                let _ = style.set_property(
                    "transform",
                    match item.anchor {
                        Anchor::TopLeft => "none",
                        Anchor::Center => "translate(-50%, -50%)",
                    },
                );
                if self.shown.get(i).map(|old| old.text.as_str()) != Some(item.text.as_str()) {
                    node.set_text_content(Some(&item.text));
                }
            }
            for node in self.nodes.iter().skip(texts.len()) {
                let _ = node.style().set_property("display", "none");
            }

            self.shown = texts.to_vec();
            self.viewport = Some(viewport);
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        input: InputState,
        render_state: RenderState,
        audio: AudioPlayer,
        text_layer: TextLayer,
        canvas: HtmlCanvasElement,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        /// Canvas size in CSS pixels, which mouse events and the text layer use
        fn css_viewport(&self) -> Viewport {
            Viewport::fit(
                self.canvas.client_width().max(1) as u32,
                self.canvas.client_height().max(1) as u32,
            )
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.snapshot();
                tick(&mut self.state, &input);
                self.input.clear_edges();
                self.accumulator -= SIM_DT;
                substeps += 1;

                self.after_tick();
                if self.state.is_exiting() {
                    break;
                }
            }
        }

        /// Hand queued sound to the audio backend and log events
        fn after_tick(&mut self) {
            for command in self.state.mixer.drain() {
                self.audio.apply(&command);
            }
            let events = self.state.drain_events();
            if events
                .iter()
                .any(|event| matches!(event, GameEvent::MuteToggled(_)))
            {
                self.settings.update_from(&self.state.mixer.settings);
                self.settings.save();
            }
            super::log_events(&events);
        }

        /// Render the current frame
        fn render(&mut self) {
            let scene = build_scene(&self.state);
            match self.render_state.render(&scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    log::error!("Surface lost, reconfiguring");
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
            let viewport = self.css_viewport();
            self.text_layer.sync(&scene.texts, viewport, scene.fade);
        }

        /// Match the drawing buffer to the canvas's on-screen size
        fn resize(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.render_state.resize(width, height);
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("{GAME_TITLE} starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        document.set_title(GAME_TITLE);

        match start(&document).await {
            Ok(game) => {
                set_visible(&document, "loading", false);
                let game = Rc::new(RefCell::new(game));
                setup_input_handlers(game.clone());
                request_animation_frame(game);
                log::info!("Game running");
            }
            Err(e) => {
                log::error!("Startup failed: {e}");
                set_visible(&document, "loading", false);
                if let Some(el) = document.get_element_by_id("error-message") {
                    el.set_text_content(Some(&e.to_string()));
                }
                set_visible(&document, "error", true);
            }
        }
    }

    async fn start(document: &Document) -> Result<Game, StartupError> {
        let settings = Settings::load();

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(StartupError::Page("canvas"))?;
        let text_root: HtmlElement = document
            .get_element_by_id("text-layer")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(StartupError::Page("text-layer"))?;

        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Gpu(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StartupError::Gpu(e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| StartupError::Gpu(e.to_string()))?;

        // Room texts and the player sprite decide the game data
        let texts = assets::fetch_level_texts().await?;
        let player = assets::fetch_image(PLAYER_IMAGE, None).await?;
        let content = GameContent {
            player_mask: assets::player_mask(&player),
            texts,
        };
        let mut state =
            GameState::new(content, settings.audio_settings()).map_err(AssetError::from)?;
        render_state.upload_image(PLAYER_IMAGE, &player);

        for key in image_keys(&state) {
            if !render_state.has_image(key) {
                let image = assets::fetch_image(key, None).await?;
                render_state.upload_image(key, &image);
            }
        }
        log::info!("Images uploaded");

        let mut audio = AudioPlayer::new();
        audio.load_tracks().await?;
        // Title music was cued by the new session; it starts once the page
        // allows audio
        for command in state.mixer.drain() {
            audio.apply(&command);
        }

        Ok(Game {
            state,
            settings,
            input: InputState::new(),
            render_state,
            audio,
            text_layer: TextLayer::new(text_root),
            canvas,
            accumulator: 0.0,
            last_time: 0.0,
        })
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = game.borrow().canvas.clone();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if prevents_default(&code) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Some(action) = action_for_code(&code) {
                    g.input.key_down(action, event.repeat());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(action) = action_for_code(&event.code()) {
                    game.borrow_mut().input.key_up(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse position in logical pixels
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let (x, y) = g
                    .css_viewport()
                    .to_logical(event.offset_x() as f32, event.offset_y() as f32);
                g.input.mouse_move(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for (name, down) in [("mousedown", true), ("mouseup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                let (x, y) = g
                    .css_viewport()
                    .to_logical(event.offset_x() as f32, event.offset_y() as f32);
                g.input.mouse_move(x, y);
                g.input.mouse_button(down);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: nothing stays held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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
        let exiting = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.state.is_exiting()
        };

        if exiting {
            log::info!("Game closed");
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                set_visible(&document, "text-layer", false);
                set_visible(&document, "exit", true);
            }
            return;
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("{} (native) starting...", bg_symbols::GAME_TITLE);
    log::info!("The playable build is the web version (`trunk serve`); running a walkthrough");

    match walkthrough::run(std::path::Path::new(".")) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Walkthrough failed: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

/// Scripted session: start, walk into the tsar room, read an exhibit, quit
#[cfg(not(target_arch = "wasm32"))]
mod walkthrough {
    use std::path::Path;

    use bg_symbols::Settings;
    use bg_symbols::assets::{AssetError, read_level_texts};
    use bg_symbols::consts::*;
    use bg_symbols::input::{Action, InputState};
    use bg_symbols::sim::{GameContent, GameState, Mask, Mode, RoomId, tick};

    fn step(state: &mut GameState, input: &mut InputState, frames: u32) {
        for _ in 0..frames {
            tick(state, &input.snapshot());
            input.clear_edges();
            let commands = state.mixer.drain();
            if !commands.is_empty() {
                log::debug!("Audio: {commands:?}");
            }
            super::log_events(&state.drain_events());
        }
    }

    /// Step until `done` holds, giving up after `limit` frames
    fn step_until(
        state: &mut GameState,
        input: &mut InputState,
        limit: u32,
        done: impl Fn(&GameState) -> bool,
    ) -> bool {
        for _ in 0..limit {
            if done(state) {
                return true;
            }
            step(state, input, 1);
        }
        done(state)
    }

    pub fn run(root: &Path) -> Result<(), AssetError> {
        let texts = read_level_texts(root)?;
        let content = GameContent {
            player_mask: Mask::filled(PLAYER_WIDTH, PLAYER_HEIGHT),
            texts,
        };
        let mut state = GameState::new(content, Settings::load().audio_settings())?;
        let mut input = InputState::new();

        // Click "start"
        let start = state.menus.title[0].rect;
        input.mouse_move(start.center_x(), start.center_y());
        input.mouse_button(true);
        step(&mut state, &mut input, 1);
        input.mouse_button(false);
        step(&mut state, &mut input, 1);
        step_until(&mut state, &mut input, FADE_FRAMES * 2, |s| s.transition.is_none());

        // Walk to the tsar house and go in
        let house = state.map.house(RoomId::Tsar).rect;
        input.key_down(Action::Right, false);
        let reached = step_until(&mut state, &mut input, 600, |s| s.player.rect.intersects(&house));
        input.key_up(Action::Right);
        if !reached {
            log::warn!("Never reached the tsar house");
        }
        input.key_down(Action::Activate, false);
        step(&mut state, &mut input, 1);
        input.key_up(Action::Activate);
        step_until(&mut state, &mut input, FADE_FRAMES * 3, |s| s.transition.is_none());

        if let Some(room) = state.current_room() {
            log::info!(
                "In {} with {} exhibits, {} of them quizzes",
                room.id.name(),
                room.exhibits.len(),
                room.answers().count()
            );
        }

        // Let the player land, then read the first exhibit
        step(&mut state, &mut input, 60);
        let trigger = state.current_room().and_then(|room| room.exhibits.first()).map(|e| e.trigger);
        if let Some(trigger) = trigger {
            state.player.place(trigger.x, trigger.y);
            input.key_down(Action::Activate, false);
            step(&mut state, &mut input, 1);
            input.key_up(Action::Activate);
            step(&mut state, &mut input, 30);

            if let Some(room) = state.current_room()
                && let Some(index) = room.displayed()
            {
                let exhibit = &room.exhibits[index];
                for line in &exhibit.lines {
                    log::info!("Exhibit {index}: {}", line.text);
                }
            } else {
                log::warn!("The first exhibit did not open");
            }

            input.key_down(Action::Activate, false);
            step(&mut state, &mut input, 1);
            input.key_up(Action::Activate);
            step(&mut state, &mut input, 1);
        }

        // Pause and quit
        input.key_down(Action::Pause, false);
        step(&mut state, &mut input, 1);
        input.key_down(Action::Quit, false);
        step(&mut state, &mut input, 1);

        log::info!(
            "Walkthrough finished after {} frames in {:?}",
            state.frame,
            state.mode
        );
        if state.mode != Mode::Exit {
            log::warn!("Expected the game to have exited");
        }
        Ok(())
    }
}
