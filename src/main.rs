use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use scheldt::{init_logging, SceneId, SceneRequest, Sim};

const FRAME_DT: f32 = 1.0 / 60.0;

/// A three-level arcade game, run headless at a fixed timestep
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene to start in
    #[arg(short, long, value_enum, default_value = "traffic")]
    scene: SceneId,

    /// How many virtual seconds to simulate
    #[arg(short = 'd', long, default_value_t = 30.0)]
    seconds: f32,

    /// Seed for all in-game randomness
    #[arg(long, default_value_t = 0xC0FFEE)]
    seed: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "frame counts stay far inside u64 range for any sane duration"
)]
fn frame_count(seconds: f32) -> u64 {
    (seconds.max(0.0) / FRAME_DT).round() as u64
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut scene = args.scene;
    let mut sim = Sim::new(scene, args.seed).context("building initial scene")?;
    for frame in 0..frame_count(args.seconds) {
        sim.step(FRAME_DT);

        for request in sim.drain_sounds() {
            debug!("sound {:?} at volume {}", request.sound, request.volume);
        }
        for ended in sim.drain_contact_ended() {
            debug!("contact ended between {:?} and {:?}", ended.sensor, ended.other);
        }
        let shakes = sim.drain_shakes();
        if shakes > 0 {
            debug!("camera shake x{shakes}");
        }
        if let Some(SceneRequest(next)) = sim.drain_scene_requests().into_iter().next() {
            info!("scene change {scene:?} -> {next:?} (score {})", sim.score());
            scene = next;
            sim = Sim::new(scene, args.seed.wrapping_add(frame)).context("building next scene")?;
        }
    }

    let summary = serde_json::json!({
        "scene": scene,
        "score": sim.score(),
        "countdown": sim.countdown(),
        "seconds": args.seconds,
    });
    info!("run summary {summary}");
    Ok(())
}
