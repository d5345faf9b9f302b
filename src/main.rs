//! Shatterfield entry point
//!
//! Native builds run a headless session with a simple autopilot and record
//! the final score in a JSON leaderboard. The browser build lives in
//! `shatterfield::web`.
//!
//! Usage: `shatterfield [config.json] [seed] [max_frames]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use shatterfield::driver::{FixedClock, LatestFrame};
    use shatterfield::highscores::{JsonFileStore, Leaderboard, ScoreSubmission};
    use shatterfield::sim::GameState;
    use shatterfield::{Config, Controls, Driver, normalize_angle};

    const SCORES_PATH: &str = "shatterfield_scores.json";
    const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 5;
    /// Heading error under which the autopilot stops turning (radians)
    const AIM_TOLERANCE: f32 = 0.08;

    /// Turn toward the nearest asteroid and fire once lined up
    fn autopilot(state: &GameState, controls: &mut Controls) {
        use shatterfield::input::Control;

        controls.release(Control::TurnLeft);
        controls.release(Control::TurnRight);

        let ship = &state.ship;
        let Some(target) = state
            .asteroids
            .iter()
            .filter(|a| a.is_alive())
            .min_by(|a, b| {
                let da = a.pos.distance_squared(ship.pos);
                let db = b.pos.distance_squared(ship.pos);
                da.total_cmp(&db)
            })
        else {
            return;
        };

        let delta = target.pos - ship.pos;
        // Screen y points down
        let wanted = (-delta.y).atan2(delta.x);
        let error = normalize_angle(wanted - ship.angle);
        if error > AIM_TOLERANCE {
            controls.press(Control::TurnLeft);
        } else if error < -AIM_TOLERANCE {
            controls.press(Control::TurnRight);
        } else if ship.lasers.len() < state.config.laser_max && !controls.fire_pending() {
            controls.request_fire();
        }
    }

    fn seed_from_time() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        env_logger::init();
        log::info!("Shatterfield (headless) starting...");

        let mut args = std::env::args().skip(1);
        let config = args
            .next()
            .map(Config::load_or_default)
            .unwrap_or_default();
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(seed_from_time);
        let max_frames = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_FRAMES);

        let step = config.dt();
        let mut driver = match Driver::new(config, Default::default(), seed) {
            Ok(driver) => driver,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                return;
            }
        };
        let mut clock = FixedClock::new(step, max_frames);
        let mut surface = LatestFrame::default();

        let ticks = driver.run(&mut clock, &mut surface, autopilot);
        let state = driver.state();
        log::info!(
            "Session (seed {}) finished after {} ticks: score {}, level {}, {:?}",
            state.seed,
            ticks,
            state.score,
            state.level,
            state.phase
        );
        println!(
            "score {} | level {} | ticks {}",
            state.score, state.level, ticks
        );

        let mut board = Leaderboard::new(JsonFileStore::new(SCORES_PATH));
        match board.qualifies(state.score) {
            Ok(true) => match board.submit(ScoreSubmission::new("autopilot", state.score)) {
                Ok(list) => {
                    for (i, entry) in list.iter().enumerate() {
                        println!(
                            "{:>2}. {:<10} {:>8}  {}",
                            i + 1,
                            entry.name,
                            entry.score,
                            entry.date.format("%Y-%m-%d")
                        );
                    }
                }
                Err(e) => log::warn!("Could not record score: {}", e),
            },
            Ok(false) => log::info!("Score {} did not make the leaderboard", state.score),
            Err(e) => log::warn!("Could not read leaderboard: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is shatterfield::web::start, this is just to satisfy the compiler
}
