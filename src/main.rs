//! Plankton entry point
//!
//! The wasm build runs the game loop in the browser. The native build is
//! the local server that serves the page and stores edited levels.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use plankton::consts::TICK;
    use plankton::persistence::web;
    use plankton::platform::{Pointer, command_for_key};
    use plankton::{Frame, Game, Settings};

    // Hands each frame's flat arrays to the page's WebGL renderer
    #[wasm_bindgen(inline_js = "
        export function submit_frame(blocks, lines, clip_from_world, world_from_clip, time) {
            const renderer = globalThis.PLANKTON_RENDERER;
            if (renderer) {
                renderer.draw({ blocks, lines, clip_from_world, world_from_clip, time });
            }
        }
    ")]
    extern "C" {
        fn submit_frame(
            blocks: &[f32],
            lines: &[f32],
            clip_from_world: &[f32],
            world_from_clip: &[f32],
            time: f32,
        );
    }

    fn submit(frame: &Frame) {
        submit_frame(
            bytemuck::cast_slice(&frame.blocks),
            bytemuck::cast_slice(&frame.lines),
            &frame.clip_from_world,
            &frame.world_from_clip,
            frame.time,
        );
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Plankton starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        resize_canvas(&canvas);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        log::info!("Game initialized with seed: {}", seed);

        web::spawn_load(game.clone());
        setup_input_handlers(&canvas, game.clone());

        request_animation_frame(game, canvas, None);

        log::info!("Plankton running!");
    }

    /// Match the backing store to the displayed size
    fn resize_canvas(canvas: &HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr).round() as u32;
        let height = (canvas.client_height() as f64 * dpr).round() as u32;
        if canvas.width() != width || canvas.height() != height {
            canvas.set_width(width);
            canvas.set_height(height);
        }
    }

    fn normalized(canvas: &HtmlCanvasElement, x: i32, y: i32) -> Option<Vec2> {
        let rect = canvas.get_bounding_client_rect();
        Pointer::normalize(
            Vec2::new(x as f32, y as f32),
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = normalized(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().pointer_moved(p);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down: click for the editor, wing for the plankton
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let p = normalized(&canvas_clone, event.client_x(), event.client_y());
                let mut g = game.borrow_mut();
                g.pointer_moved(p);
                g.pointer_down(event.shift_key());
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let p = normalized(&canvas_clone, touch.client_x(), touch.client_y());
                    let mut g = game.borrow_mut();
                    g.pointer_moved(p);
                    g.pointer_down(false);
                }
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
                if let Some(touch) = event.touches().get(0) {
                    let p = normalized(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().pointer_moved(p);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: the pointer leaves with the finger
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().pointer_left();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                if let Some(cmd) = command_for_key(&event.code(), event.shift_key()) {
                    event.prevent_default();
                    game.borrow_mut().command(cmd);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement, prev: Option<f64>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, canvas, prev, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement, prev: Option<f64>, time: f64) {
        let elapsed = prev.map_or(TICK, |p| ((time - p) / 1000.0) as f32);

        resize_canvas(&canvas);
        let aspect = canvas.client_width() as f32 / canvas.client_height().max(1) as f32;

        let (frame, outgoing) = {
            let mut g = game.borrow_mut();
            let frame = g.frame(elapsed, aspect);
            (frame, g.take_save())
        };
        submit(&frame);

        if let Some(body) = outgoing {
            web::spawn_save(game.clone(), body);
        }

        request_animation_frame(game, canvas, Some(time));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use plankton::server::{ServerConfig, run};

    env_logger::init();
    let config = ServerConfig::parse();
    log::info!("Plankton save server starting...");

    if let Err(e) = run(&config) {
        log::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
