// What you SEE:
// • Mirrored live camera with a palette header across the top.
// • Index finger up: you paint with the active color (eraser = black swatch).
// • Index + middle up: selection mode; touch a swatch in the header to switch.
// • Without a hand model configured the mouse stands in for the hand:
//   hold Left = draw, hold Right = select.
// • C clears the canvas. ESC quits.

mod camera;
mod compose;
mod config;
mod draw;
mod error;
mod gesture;
mod hand;
mod overlay;
mod paint;
mod pipeline;
mod tracker;
mod types;

use std::time::{Duration, Instant};

use camera::CameraCapture;
use config::{Config, TrackerKind};
use draw::{Drawer, draw_text_5x7};
use error::Error;
use overlay::HeaderStrips;
use pipeline::Session;
use tracker::{LandmarkProvider, PointerState, PointerTracker, SubprocessTracker};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args()?;

    /* --- Camera + window setup --- */
    let mut cam = CameraCapture::new(config.camera_index, config.width, config.height)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Virtual Paint", w as usize, h as usize)?;

    /* --- Hand source: external model or the mouse --- */
    let mut pointer = PointerTracker::default();
    let mut helper = match config.tracker.kind {
        TrackerKind::Subprocess => Some(SubprocessTracker::spawn(
            &config.tracker.command,
            &config.tracker.args,
            config.tracker.settings(),
        )?),
        TrackerKind::Pointer => {
            log::info!("no hand model configured; mouse drives the brush");
            None
        }
    };

    /* --- Painting session (canvas, brush, header strips) --- */
    let headers = HeaderStrips::load_dir(&config.palette_dir)?;
    let mut session = Session::new(&config, headers);
    let reset = session.reset_handle();

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        // 1) Fresh live frame; a camera failure ends the session.
        let live = cam.next_frame()?;

        // 2) Operator input. The clear lands at the start of the next processed frame.
        if drawer.c_pressed_once() {
            reset.request();
        }
        pointer.update(PointerState {
            pos: drawer.mouse_pos(),
            left: drawer.left_mouse_down(),
            right: drawer.right_mouse_down(),
        });

        // 3) Mirror → hands → brush/canvas → composite → header.
        let tracker: &mut dyn LandmarkProvider = match helper.as_mut() {
            Some(t) => t,
            None => &mut pointer,
        };
        let mut screen = session.process(live, tracker)?;

        // 4) HUD below the header band.
        let tool = if session.brush_color() == paint::ERASER { "ERASER" } else { "BRUSH" };
        let hud = format!("{} | {} | {}", session.mode().label(), tool, hud_fps_text);
        draw_text_5x7(&mut screen, 8, config.header_height + 8, &hud, 0x00_FF_FF_FF);

        // 5) Present.
        drawer.present(&screen)?;

        // 6) FPS counter (log + HUD once per second)
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::debug!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    log::info!("window closed; bye");
    Ok(())
}
