//! Marble Race entry point
//!
//! The browser build is driven through `web::WebGame`. Natively this runs a
//! headless scripted run: hold forward, hop now and then, report the result.
//!
//! Usage: `marble-race [seed] [block-count] [max-seconds]`

#[cfg(all(not(target_arch = "wasm32"), feature = "physics"))]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use marble_race::Settings;
    use marble_race::consts::SIM_DT;
    use marble_race::physics::{RapierWorld, RigidBodyOps};
    use marble_race::sim::{Game, TickInput};

    env_logger::init();
    log::info!("Marble Race (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = Settings::load();
    if let Some(seed) = args.first().and_then(|s| s.parse().ok()) {
        settings = settings.with_seed(seed);
    }
    if let Some(count) = args.get(1).and_then(|s| s.parse().ok()) {
        settings = settings.with_count(count);
    }
    let max_seconds: f32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60.0);

    let mut game = Game::new(RapierWorld::default(), &settings);
    log::info!(
        "Course: {:?} (seed {})",
        game.level().sequence,
        game.state.blocks_seed()
    );

    let phases = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&phases);
    let subscription = game.state.subscribe_phase(move |phase| {
        log::info!("Phase -> {phase:?}");
        sink.borrow_mut().push(*phase);
    });

    let max_ticks = (max_seconds / SIM_DT) as u32;
    let mut falls = 0;
    let mut press = true;
    for tick in 0..max_ticks {
        let input = TickInput {
            forward: true,
            jump: tick % 90 == 45,
            // Re-press forward after each fall to start a new run
            any_pressed: press,
            ..Default::default()
        };
        let now = f64::from(tick) * f64::from(SIM_DT) * 1000.0;
        let report = game.tick(&input, SIM_DT, now);
        press = report.fell;

        if report.fell {
            falls += 1;
        }
        if report.finished {
            break;
        }
    }
    game.state.unsubscribe(subscription);

    let position = game
        .player_body()
        .map(RigidBodyOps::translation)
        .unwrap_or_default();

    match game.state.elapsed_ms() {
        Some(ms) => println!("Finished in {:.2}s after {falls} fall(s)", ms / 1000.0),
        None => println!(
            "Did not finish within {max_seconds}s ({falls} fall(s)), marble at {position:?}"
        ),
    }
    println!("Phase changes: {:?}", phases.borrow());
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "physics")))]
fn main() {
    env_logger::init();
    log::warn!("Built without the `physics` feature; nothing to simulate");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
