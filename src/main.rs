//! Santa Arcade entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, TouchEvent};

    use santa_arcade::arcade::Screen;
    use santa_arcade::consts::SIM_DT;
    use santa_arcade::input::Direction;
    use santa_arcade::sim::Output;
    use santa_arcade::{Arcade, ArcadeSettings, GameKind, SceneFrame};

    /// Arcade plus frame timing
    struct App {
        arcade: Arcade,
        last_time: f64,
        /// Scene built after the latest advance, read by the page's renderer
        scene: Option<SceneFrame>,
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    fn page_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Mirror the arcade's screen routing onto the page
    fn apply_screen(screen: Screen) {
        let Some(document) = page_document() else {
            return;
        };
        set_hidden(&document, "arcade-area", !screen.arcade_area);
        set_hidden(&document, "home-controls", !screen.home_controls);
        set_hidden(&document, "game-controls", !screen.game_controls);
        for kind in GameKind::ALL {
            set_hidden(&document, kind.container_id(), !screen.is_container_visible(kind));
        }
    }

    /// Write an output payload into the score and message elements
    fn show_output(out: &Output) {
        let Some(document) = page_document() else {
            return;
        };
        if let Some(score) = out.score {
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&score.to_string()));
            }
        }
        if !out.msg.is_empty() {
            if let Some(el) = document.get_element_by_id("msg") {
                el.set_text_content(Some(&out.msg.join("\n")));
            }
        }
    }

    fn install_listeners(arcade: &mut Arcade) {
        arcade.listeners.output(|out| show_output(&out));
        arcade.listeners.on_collision(|out| show_output(&out));
        arcade.listeners.on_score_changed(|score| {
            if let Some(el) = page_document().and_then(|d| d.get_element_by_id("score")) {
                el.set_text_content(Some(&score.to_string()));
            }
        });
        arcade.listeners.on_pause(|_| {
            if let Some(document) = page_document() {
                set_hidden(&document, "pause-hint", false);
            }
        });
        arcade.listeners.on_resume(|_| {
            if let Some(document) = page_document() {
                set_hidden(&document, "pause-hint", true);
            }
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger: {}", e).into());
        }

        log::info!("Santa Arcade starting...");

        let settings = ArcadeSettings::load();
        let mut arcade = Arcade::new(settings);
        install_listeners(&mut arcade);
        apply_screen(arcade.screen());

        let app = Rc::new(RefCell::new(App {
            arcade,
            last_time: 0.0,
            scene: None,
        }));
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        setup_game_buttons(app.clone());
        setup_direction_buttons(app.clone());
        setup_keyboard(app.clone());
        request_animation_frame(app);

        log::info!("Santa Arcade running!");
    }

    fn on_click(document: &Document, id: &str, mut f: impl FnMut() + 'static) {
        let Some(el) = document.get_element_by_id(id) else {
            log::debug!("No #{} on this page", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| f());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_game_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = page_document() else {
            return;
        };

        for kind in GameKind::ALL {
            let app = app.clone();
            on_click(&document, kind.button_id(), move || {
                let mut a = app.borrow_mut();
                a.arcade.select(kind);
                a.last_time = 0.0;
                apply_screen(a.arcade.screen());
            });
        }

        {
            let app = app.clone();
            on_click(&document, "homeBTN", move || {
                let mut a = app.borrow_mut();
                a.arcade.stop();
                a.scene = None;
                apply_screen(a.arcade.screen());
            });
        }

        on_click(&document, "MazeFaceControlBTN", move || {
            let mut a = app.borrow_mut();
            if let Some(enabled) = a.arcade.toggle_face_control() {
                if let Some(document) = page_document() {
                    if let Some(btn) = document.get_element_by_id("MazeFaceControlBTN") {
                        let _ = if enabled {
                            btn.class_list().add_1("active")
                        } else {
                            btn.class_list().remove_1("active")
                        };
                    }
                }
            }
        });
    }

    fn setup_direction_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = page_document() else {
            return;
        };
        let buttons = [
            ("leftBTN", Direction::Left),
            ("rightBTN", Direction::Right),
            ("upBTN", Direction::Up),
            ("downBTN", Direction::Down),
        ];

        for (id, direction) in buttons {
            {
                let app = app.clone();
                on_click(&document, id, move || {
                    if let Some(session) = app.borrow_mut().arcade.session_mut() {
                        session.press(direction);
                    }
                });
            }

            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                    if let Some(session) = app.borrow_mut().arcade.session_mut() {
                        session.touch_start(direction);
                    }
                });
                let _ = el.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                    if let Some(session) = app.borrow_mut().arcade.session_mut() {
                        session.touch_end();
                    }
                });
                let _ = el.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(session) = app.borrow_mut().arcade.session_mut() {
                session.key(event.key_code());
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;
            a.arcade.advance(dt);
            a.scene = a.arcade.session().map(|session| session.frame());
        }

        request_animation_frame(app);
    }

    fn with_session(f: impl FnOnce(&mut santa_arcade::Session)) {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                if let Some(session) = app.borrow_mut().arcade.session_mut() {
                    f(session);
                }
            }
        });
    }

    /// Wrist landmark from the page's hand tracker, normalised to [0, 1]
    #[wasm_bindgen]
    pub fn hand_landmark(x: f32, y: f32) {
        with_session(|session| session.hand(glam::Vec2::new(x, y)));
    }

    /// Face box centre from the page's face detector, in video pixels
    #[wasm_bindgen]
    pub fn face_center(center_x: f32, frame_width: f32) {
        with_session(|session| session.face(center_x, frame_width));
    }

    fn with_scene<T: Default>(f: impl FnOnce(&SceneFrame) -> T) -> T {
        APP.with(|slot| {
            slot.borrow()
                .as_ref()
                .and_then(|app| app.borrow().scene.as_ref().map(f))
                .unwrap_or_default()
        })
    }

    /// Packed vertex buffer of the current scene (xyz + rgba per vertex)
    #[wasm_bindgen]
    pub fn scene_vertices() -> Vec<u8> {
        with_scene(|scene| scene.mesh.vertex_bytes().to_vec())
    }

    /// Triangle indices into [`scene_vertices`]
    #[wasm_bindgen]
    pub fn scene_indices() -> Vec<u32> {
        with_scene(|scene| scene.mesh.indices.clone())
    }

    /// Camera, look-at target, light, light intensity and fog distance
    #[wasm_bindgen]
    pub fn scene_view() -> Vec<f32> {
        with_scene(|scene| scene.view_params().to_vec())
    }

    /// Whether the page should draw detector output over the video
    #[wasm_bindgen]
    pub fn show_face() -> bool {
        APP.with(|slot| {
            slot.borrow()
                .as_ref()
                .map(|app| app.borrow().arcade.settings.show_face)
                .unwrap_or(false)
        })
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
    log::info!("Santa Arcade (native) starting...");
    log::info!("Native mode runs each game headless - use `trunk serve` for the web version");

    let settings = santa_arcade::ArcadeSettings::load();
    let mut arcade = santa_arcade::Arcade::new(settings);
    arcade.listeners.output(|out| log::info!("output: {}", out.msg.join(" | ")));
    arcade
        .listeners
        .on_collision(|out| log::info!("collision: {}", out.msg.join(" | ")));

    println!("\nRunning headless demo...");
    demo_runner(&mut arcade);
    print_frame(&arcade);
    demo_maze(&mut arcade);
    print_frame(&arcade);
    demo_rings(&mut arcade);
    print_frame(&arcade);
    arcade.stop();
    println!("✓ Demo finished");
}

#[cfg(not(target_arch = "wasm32"))]
fn print_frame(arcade: &santa_arcade::Arcade) {
    if let Some(session) = arcade.session() {
        let frame = session.frame();
        println!(
            "  last frame: {} triangles, camera {:?}",
            frame.mesh.triangle_count(),
            frame.camera
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_runner(arcade: &mut santa_arcade::Arcade) {
    use santa_arcade::consts::SIM_DT;
    use santa_arcade::input::keys;
    use santa_arcade::{GameKind, Session};

    let session = arcade.select(GameKind::StarshipRun);
    session.key(keys::ARROW_UP);
    for frame in 0..1200 {
        if frame % 90 == 45 {
            if let Some(session) = arcade.session_mut() {
                session.key(keys::ARROW_UP);
            }
        }
        arcade.advance(SIM_DT);
    }
    if let Some(Session::Runner { state, .. }) = arcade.session() {
        println!(
            "Starship Run: score {} difficulty {} game over {}",
            state.score, state.difficulty, state.game_over
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_maze(arcade: &mut santa_arcade::Arcade) {
    use santa_arcade::consts::SIM_DT;
    use santa_arcade::input::Direction;
    use santa_arcade::{GameKind, Session};

    arcade.select(GameKind::MazeBrain);
    let pushes = [Direction::Right, Direction::Up, Direction::Left, Direction::Down];
    for frame in 0..600 {
        if frame % 20 == 0 {
            if let Some(session) = arcade.session_mut() {
                session.press(pushes[(frame / 20) % pushes.len()]);
            }
        }
        arcade.advance(SIM_DT);
    }
    if let Some(Session::Maze(brain)) = arcade.session() {
        println!(
            "Maze Brain: {:?} in a {}x{} maze, ball at {:?}",
            brain.state(),
            brain.dimension(),
            brain.dimension(),
            brain.view().ball_position
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_rings(arcade: &mut santa_arcade::Arcade) {
    use santa_arcade::consts::SIM_DT;
    use santa_arcade::{GameKind, Session};

    arcade.select(GameKind::DoughnutStars);
    for frame in 0..1200 {
        // Chase the ring with the hand
        if let Some(Session::Rings(game)) = arcade.session_mut() {
            let target = game.torus;
            let wrist = glam::Vec2::new(0.5 - target.x / 20.0, 0.5 - target.y / 20.0);
            if frame % 5 == 0 {
                game.set_hand(wrist);
            }
        }
        arcade.advance(SIM_DT);
    }
    if let Some(Session::Rings(game)) = arcade.session() {
        println!("Doughnut Stars: score {} speed {}", game.score(), game.speed());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
