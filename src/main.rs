//! Headless table demo
//!
//! Drives a session at a synthetic 60 Hz frame rate with periodic flipper
//! triggers and logs the HUD values. Useful for eyeballing score/life flow
//! without a renderer attached.

use tilt_core::sim::Session;

fn main() {
    env_logger::init();

    let mut session = Session::new(0xBA11);
    let frame_time = 1.0 / 60.0;

    log::info!("tilt-core demo starting");

    for frame in 0u32..36_000 {
        // Flip on fixed offsets so runs are reproducible
        if frame % 150 == 37 {
            session.trigger_left();
        }
        if frame % 190 == 61 {
            session.trigger_right();
        }
        session.drive_flippers();
        session.step(frame_time);

        if frame % 1200 == 0 {
            log::info!(
                "t={:>6.1}s score={:>6} lives={}",
                session.clock.t,
                session.score(),
                session.lives()
            );
        }
        if session.game_over() {
            break;
        }
    }

    println!("score: {}  lives: {}", session.score(), session.lives());
}
