//! Starfall entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use starfall::audio::{AudioManager, SoundEffect};
    use starfall::consts::*;
    use starfall::content::{SpriteAtlas, TextureId};
    use starfall::input::InputManager;
    use starfall::renderer::{SpriteBatch, SpriteRenderState};
    use starfall::sim::{GameEvent, World};
    use starfall::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        world: World,
        atlas: SpriteAtlas,
        render_state: Option<SpriteRenderState>,
        input: InputManager,
        audio: AudioManager,
        settings: Settings,
        highscores: HighScores,
        batch: SpriteBatch,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // One submission to the leaderboard per run
        score_submitted: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let atlas = SpriteAtlas::space_shooter();
            let world = World::new(&atlas, GAME_WIDTH, GAME_HEIGHT, seed);
            let settings = Settings::load();

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            Self {
                world,
                atlas,
                render_state: None,
                input: InputManager::new(),
                audio,
                settings,
                highscores: HighScores::load(),
                batch: SpriteBatch::new(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                score_submitted: false,
            }
        }

        /// Advance the simulation and react to its events
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            self.world.update(dt, &mut self.input, &self.atlas);

            for event in self.world.events.drain(..) {
                match event {
                    GameEvent::PlayerShot => self.audio.play(SoundEffect::Laser, 0.15),
                    GameEvent::ShieldHit => self.audio.play(SoundEffect::ShieldHit, 0.4),
                    GameEvent::EnemyExploded => self.audio.play(SoundEffect::Explosion, 0.6),
                    GameEvent::PowerUpCollected => self.audio.play(SoundEffect::PowerUp, 0.8),
                    GameEvent::GameOver => self.audio.play(SoundEffect::GameOver, 0.6),
                }
            }

            // Offer the finished run to the leaderboard once
            if self.world.is_game_over() && !self.score_submitted {
                self.score_submitted = true;
                let score = self.world.score;
                if let Some(rank) = self.highscores.add_score(score, js_sys::Date::now()) {
                    log::info!("Run over: score {score}, leaderboard rank {rank}");
                    self.highscores.save();
                } else {
                    log::info!("Run over: score {score}");
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            self.batch.clear();
            self.world.draw(&mut self.batch);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.world.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-best") {
                let best = self.highscores.top_score().unwrap_or(0);
                el.set_text_content(Some(&best.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                } else {
                    el.set_text_content(Some(""));
                }
            }

            // Show/hide game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.world.is_game_over() {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.world.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Hard reset for a new run
        fn restart(&mut self, seed: u64) {
            self.world.restart(&self.atlas, seed);
            self.score_submitted = false;
        }
    }

    /// Flat RGBA fill for placeholder texture uploads
    fn solid_texture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgba);
        }
        data
    }

    /// Dark field with a sparse hash-scattered star pattern
    fn starfield_texture(width: u32, height: u32) -> Vec<u8> {
        let mut data = solid_texture(width, height, [10, 14, 26, 255]);
        for y in 0..height {
            for x in 0..width {
                let h = x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263);
                if h % 733 == 0 {
                    let i = ((y * width + x) * 4) as usize;
                    data[i] = 220;
                    data[i + 1] = 220;
                    data[i + 2] = 255;
                }
            }
        }
        data
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Starfall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state =
            SpriteRenderState::new(surface, &adapter, width, height, (GAME_WIDTH, GAME_HEIGHT))
                .await;

        // Placeholder pixel data; real sheets are dropped in by the
        // content build without touching the simulation
        {
            let g = game.borrow();
            let (aw, ah) = g.atlas.texture_size(TextureId::ATLAS);
            render_state.upload_texture(
                TextureId::ATLAS,
                &solid_texture(aw, ah, [255, 255, 255, 255]),
                aw,
                ah,
            );
            let (ew, eh) = g.atlas.texture_size(TextureId::EXPLOSION);
            render_state.upload_texture(
                TextureId::EXPLOSION,
                &solid_texture(ew, eh, [255, 170, 60, 255]),
                ew,
                eh,
            );
            let (bw, bh) = g.atlas.texture_size(TextureId::BACKGROUND);
            render_state.upload_texture(
                TextureId::BACKGROUND,
                &starfield_texture(bw, bh),
                bw,
                bh,
            );
        }
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_blur_mute(game.clone());

        request_animation_frame(game);

        log::info!("Starfall running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Keyboard held-state plus Enter-to-restart at game over
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();

                if g.world.is_game_over() && key == "Enter" {
                    let seed = js_sys::Date::now() as u64;
                    g.restart(seed);
                    return;
                }

                match key.as_str() {
                    "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" | " " => {
                        event.prevent_default()
                    }
                    _ => {}
                }
                g.input.set_key(&key, true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.set_key(&event.key(), false);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse buttons: left = shrink, right = boost
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.set_mouse_button(event.button() as usize, true);
                // Browsers require a gesture before audio can start
                g.audio.resume();
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .set_mouse_button(event.button() as usize, false);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // The right mouse button is a gameplay input
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = document
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_blur_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            let dt = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                16.0
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
    use starfall::consts::*;
    use starfall::content::SpriteAtlas;
    use starfall::input::InputManager;
    use starfall::renderer::SpriteBatch;
    use starfall::sim::World;

    env_logger::init();
    log::info!("Starfall (native) starting...");
    log::info!("Native mode is a headless smoke run - use `trunk serve` for the web version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);

    let atlas = SpriteAtlas::space_shooter();
    let mut world = World::new(&atlas, GAME_WIDTH, GAME_HEIGHT, seed);
    let mut input = InputManager::new();
    let mut batch = SpriteBatch::new();

    // 60 simulated seconds at 16ms steps, drifting left and right
    for frame in 0..3_750u32 {
        if frame % 250 == 0 {
            let go_left = (frame / 250) % 2 == 0;
            input.set_key("arrowleft", go_left);
            input.set_key("arrowright", !go_left);
        }

        world.update(16.0, &mut input, &atlas);
        world.events.clear();

        if world.is_game_over() {
            log::info!("Run ended at frame {frame}");
            break;
        }
    }

    batch.clear();
    world.draw(&mut batch);

    println!(
        "smoke run done: score {}, {} active enemies, {} sprites in final frame{}",
        world.score,
        world.enemies.active_count(),
        batch.len(),
        if world.is_game_over() {
            " (game over)"
        } else {
            ""
        }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
