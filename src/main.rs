// What you SEE:
// • A sheet of paper covering a hidden picture.
// • Hold Left Mouse and drag: the paper rips along your path with ragged edges.
// • Tear enough of it and the paper gives way: flecks fall and the picture shows.
// • A runs the scripted spiral tear. R puts the paper back. ESC quits.
// • Resize the window: your tears are replayed onto the resized sheet.

mod draw;
mod fx;
mod gamma;

use clap::{Parser, ValueEnum};
use draw::{Drawer, FrameBuffer, compose_paper, draw_crosshair, draw_text_5x7};
use fx::Fx;
use gamma::LinearBlend;
use image::RgbImage;
use paper_tear::{
    AutoTearConfig, AutoTearEvent, AutoTearPlayback, ErasedPredicate, GestureState, Point,
    RevealState, TearConfig, TearEngine, TearResult, XorShift32,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "paper-tear", version, about = "Tear the paper to reveal what is underneath")]
struct Cli {
    /// Initial window width in pixels.
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Initial window height in pixels.
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Base width of each rip.
    #[arg(long, default_value_t = 30.0)]
    tear_width: f64,

    /// Random extra width added per segment.
    #[arg(long, default_value_t = 8.0)]
    jitter: f64,

    /// Torn fraction of the paper that triggers the reveal.
    #[arg(long, default_value_t = 0.05)]
    threshold: f64,

    /// Smooth rips instead of ragged bites.
    #[arg(long)]
    no_jagged: bool,

    /// Forget tears on resize instead of replaying them.
    #[arg(long)]
    no_history: bool,

    /// Which pixels count as torn.
    #[arg(long, value_enum, default_value_t = PredicateChoice::BelowOpaque)]
    predicate: PredicateChoice,

    /// Eraser opacity (1-255); 255 rips clean through.
    #[arg(long, default_value_t = 255)]
    strength: u8,

    /// Steps in the scripted spiral tear.
    #[arg(long, default_value_t = 30)]
    auto_steps: usize,

    /// Delay between spiral steps.
    #[arg(long, default_value_t = 30)]
    step_delay_ms: u64,

    /// Picture hidden under the paper (any format `image` can read).
    #[arg(long)]
    reveal_image: Option<PathBuf>,

    /// Write the paper's alpha mask as a grayscale PNG on exit.
    #[arg(long)]
    dump_mask: Option<PathBuf>,

    /// Fixed seed for the tear jitter.
    #[arg(long)]
    seed: Option<u32>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PredicateChoice {
    BelowOpaque,
    Cleared,
}

impl Cli {
    fn tear_config(&self) -> TearConfig {
        TearConfig {
            tear_width: self.tear_width,
            width_jitter: self.jitter,
            coverage_threshold: self.threshold,
            jagged_edges: !self.no_jagged,
            retain_history: !self.no_history,
            erased_predicate: match self.predicate {
                PredicateChoice::BelowOpaque => ErasedPredicate::BelowOpaque,
                PredicateChoice::Cleared => ErasedPredicate::FullyCleared,
            },
            erase_strength: self.strength,
            ..TearConfig::default()
        }
    }

    fn auto_config(&self) -> AutoTearConfig {
        AutoTearConfig {
            steps: self.auto_steps,
            step_delay: Duration::from_millis(self.step_delay_ms),
            ..AutoTearConfig::default()
        }
    }
}

/// The hidden layer at the given size: the user's picture if any, else a gradient.
fn build_underlay(picture: Option<&RgbImage>, width: usize, height: usize) -> FrameBuffer {
    match picture {
        Some(img) => FrameBuffer::from_rgb_image(img, width, height),
        None => FrameBuffer::gradient(width, height),
    }
}

fn main() -> TearResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let auto_config = cli.auto_config();
    auto_config.validate()?;

    let rng = match cli.seed {
        Some(seed) => XorShift32::from_seed(seed),
        None => XorShift32::from_entropy(),
    };
    let mut engine = TearEngine::with_rng(cli.width, cli.height, cli.tear_config(), rng)?;

    let picture = match &cli.reveal_image {
        Some(path) => Some(image::open(path)?.to_rgb8()),
        None => None,
    };

    /* --- Window + layers ---
       Visual: window opens showing intact paper. */
    let mut drawer = Drawer::new("Paper Tear", cli.width, cli.height)?;
    let (mut w, mut h) = (cli.width, cli.height);
    let mut screen = FrameBuffer::new(w, h);
    let mut under = build_underlay(picture.as_ref(), w, h);
    let mut paper = FrameBuffer::paper(w, h);
    let blend = LinearBlend::new();
    let mut fx = Fx::new(600, w, h);

    let mut auto_tear: Option<AutoTearPlayback> = None;
    let mut was_down = false;
    let mut last_pos: Option<Point> = None;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let frame_dt = now - last_frame_time;
        last_frame_time = now;

        /* 1) Follow window resizes. Visual: paper re-laid at the new size, tears replayed. */
        let (nw, nh) = drawer.size();
        if (nw, nh) != (w, h) && nw > 0 && nh > 0 {
            (w, h) = (nw, nh);
            fx.resize(w, h); // first, so a reveal on replay bursts across the new size
            engine.resize(w, h, &mut fx);
            screen = FrameBuffer::new(w, h);
            under = build_underlay(picture.as_ref(), w, h);
            paper = FrameBuffer::paper(w, h);
        }

        /* 2) Keys */
        if drawer.r_pressed_once() {
            engine.reset(); // visual: paper whole again
            fx.clear();
            auto_tear = None;
        }
        if drawer.a_pressed_once() && auto_tear.is_none() {
            auto_tear = Some(engine.start_auto_tear(&auto_config, &mut fx)?);
        }

        /* 3) Scripted tear, paced by real frame time */
        if let Some(playback) = &mut auto_tear {
            for event in playback.advance(frame_dt) {
                match event {
                    AutoTearEvent::Step(n) => {
                        if let Some(p) = engine.auto_tear_step(n, &mut fx) {
                            fx.spawn_fragments(p.x as f32, p.y as f32, 6);
                        }
                    }
                    AutoTearEvent::Finish => engine.finish_auto_tear(&mut fx),
                }
            }
            if playback.is_finished() {
                auto_tear = None;
            }
        }

        /* 4) Pointer: press / drag / release. Leaving the window ends the tear. */
        let down = drawer.left_mouse_down();
        let pos = drawer.mouse_pos();
        match (was_down, down, pos) {
            (false, true, Some(p)) => engine.on_gesture_start(p),
            (true, true, Some(p)) if last_pos != Some(p) => engine.on_gesture_move(p, &mut fx),
            (true, true, None) | (true, false, _) => engine.on_gesture_end(&mut fx),
            _ => {}
        }
        was_down = down;
        last_pos = pos;
        let tearing = engine.gesture_state() == GestureState::Dragging;
        if let (true, Some(p)) = (tearing, pos) {
            fx.spawn_fragments(p.x as f32, p.y as f32, 3); // visual: crumbs follow the pointer
        }

        /* 5) Compose paper over the hidden layer, FX on top, then crosshair + HUD */
        compose_paper(&mut screen, &under, &paper, engine.surface(), fx.cover_opacity(), &blend);
        fx.update_and_render(&mut screen, frame_dt.as_secs_f32());

        if let Some(p) = pos {
            draw_crosshair(&mut screen, p.x as i32, p.y as i32, 12, 0x00_FF_CC_33);
        }

        let status = match (engine.is_auto_tearing(), engine.reveal_state()) {
            (true, _) => "AUTO TEAR",
            (false, RevealState::Covered) => "COVERED",
            (false, RevealState::Revealed) => "REVEALED",
        };
        let hud = format!(
            "{} {:.1}% | R: RESET  A: AUTO | {}",
            status,
            engine.coverage() * 100.0,
            hud_fps_text
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        drawer.present(&screen)?;

        /* 6) FPS (log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!(fps, particles = fx.particle_count(), "frame rate");
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    if let Some(path) = &cli.dump_mask {
        engine.surface().to_mask_image().save(path)?;
        info!(path = %path.display(), coverage = engine.coverage(), "alpha mask written");
    }

    Ok(())
}
