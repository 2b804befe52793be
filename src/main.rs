//! Sprite Engine entry point
//!
//! Headless host: loads a game (the bundled demo, or a JSON file given on the
//! command line), drives it with synthetic frame timestamps and a scripted
//! key per level, and logs what happens.

use sprite_engine::sim::{GameEvent, GameStatus};
use sprite_engine::{EngineError, EngineSettings, GameModel, PlayerController};

const DEMO_GAME: &str = include_str!("../demos/meadow.json");

/// Display refresh the synthetic host pretends to run at
const FRAME_DT: f64 = 1.0 / 144.0;
/// Give up on a level after this much simulated time
const LEVEL_TIMEOUT_SECS: f64 = 30.0;
/// Key held down for each level of the demo
const DEMO_SCRIPT: [&str; 2] = ["RIGHT", "ArrowDown"];

fn main() {
    env_logger::init();
    log::info!("Sprite Engine (native) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), EngineError> {
    let json = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEMO_GAME.to_string(),
    };
    let model = GameModel::from_json(&json)?;
    let settings = EngineSettings::default();
    let mut controller = PlayerController::new(model, settings)?;

    loop {
        let key = DEMO_SCRIPT.get(controller.level_index()).copied().unwrap_or("RIGHT");
        play_level(&mut controller, key);

        log::info!(
            "Level {} finished: {:?} after {} ticks, score {:.1}",
            controller.level_index(),
            controller.status(),
            controller.tick_count(),
            controller.score()
        );
        if !controller.next_level() {
            break;
        }
    }

    println!("Final status: {:?}, score {:.1}", controller.status(), controller.score());
    Ok(())
}

/// Hold `key` and pump frames until the level ends or times out
fn play_level(controller: &mut PlayerController, key: &str) {
    let mut animation = controller.animation_loop();
    let stop = animation.stop_handle();
    controller.key_pressed(key);

    let mut now = 0.0;
    while animation.is_running() && now < LEVEL_TIMEOUT_SECS {
        animation.frame(now, |dt| {
            if let Some(report) = controller.advance(dt) {
                if report.removed > 0 || report.spawned > 0 {
                    log::debug!("Tick {}: {:?}", report.tick, report);
                }
            }
            if controller.status() != GameStatus::Playing {
                stop.stop();
            }
        });

        for event in controller.drain_events() {
            match event {
                GameEvent::ScoreAdded { .. } => {}
                GameEvent::LevelWon { by } => log::info!("Level won by sprite {:?}", by),
                GameEvent::PlayerLost { id } => log::info!("Player sprite {:?} lost", id),
                other => log::debug!("{:?}", other),
            }
        }
        now += FRAME_DT;
    }

    controller.key_released(key);
}
