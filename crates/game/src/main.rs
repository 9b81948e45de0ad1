//! Gun Range - headless driver.
//!
//! Runs the range at its fixed timestep with a scripted player: shoot at
//! the nearest target, pull the magazine out, reload, shoot again, quit.
//! HUD text goes to the log once a second.

use anyhow::Result;
use engine_core::Time;
use game::{SimConfig, Simulation};
use glam::Vec2;
use input::{ElementState, InputState, KeyCode, MouseButton};

/// Ticks between HUD log lines.
const HUD_INTERVAL: u64 = 60;

/// Scripted player. Feeds raw input into `InputState` the way a window
/// event loop would.
struct DemoScript;

impl DemoScript {
    const FIRST_BURST: std::ops::Range<u64> = 0..120;
    const GRAB: u64 = 150;
    const DRAG: u64 = 155;
    const DROP: u64 = 160;
    const RELOAD: u64 = 220;
    const SECOND_BURST: std::ops::Range<u64> = 240..330;
    const QUIT: u64 = 390;

    fn feed(&self, tick: u64, sim: &Simulation, input: &mut InputState) {
        let aim = nearest_target(sim).unwrap_or(Vec2::new(800.0, 200.0));
        let magazine = sim
            .gun()
            .magazine()
            .position(sim.world())
            .unwrap_or_default();

        let bursts = [Self::FIRST_BURST, Self::SECOND_BURST];
        if bursts.iter().any(|b| b.contains(&tick)) {
            move_pointer(input, aim);
        }
        if bursts.iter().any(|b| b.start == tick) {
            press(input, MouseButton::Left);
        }
        if bursts.iter().any(|b| b.end - 1 == tick) {
            release(input, MouseButton::Left);
        }

        match tick {
            Self::GRAB => {
                move_pointer(input, magazine);
                press(input, MouseButton::Left);
            }
            Self::DRAG => move_pointer(input, magazine + Vec2::new(0.0, -150.0)),
            Self::DROP => release(input, MouseButton::Left),
            Self::RELOAD => {
                input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
                input.process_keyboard(KeyCode::KeyR, ElementState::Released);
            }
            Self::QUIT => input.request_quit(),
            _ => {}
        }
    }
}

fn nearest_target(sim: &Simulation) -> Option<Vec2> {
    let gun = sim.gun().position(sim.world())?;
    sim.targets()
        .iter()
        .filter_map(|t| sim.world().position(t.body().rigid_body))
        .min_by(|a, b| a.distance(gun).total_cmp(&b.distance(gun)))
}

fn move_pointer(input: &mut InputState, position: Vec2) {
    input.process_cursor_position((position.x as f64, position.y as f64));
}

fn press(input: &mut InputState, button: MouseButton) {
    input.process_mouse_button(button, ElementState::Pressed);
}

fn release(input: &mut InputState, button: MouseButton) {
    input.process_mouse_button(button, ElementState::Released);
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Gun Range");
    println!("  Left Click - Fire          Drag magazine - Detach");
    println!("  R          - Reload        Escape        - Quit");

    let config = SimConfig::load();
    let mut time = Time::with_timestep(config.fixed_timestep as f64);
    let mut sim = Simulation::new(config)?;
    let mut input = InputState::new();
    let script = DemoScript;

    log::info!("Starting Gun Range");

    while sim.is_running() {
        time.update();
        while sim.is_running() && time.should_fixed_update() {
            script.feed(sim.tick_count(), &sim, &mut input);
            sim.tick(&mut input);

            if sim.tick_count() % HUD_INTERVAL == 0 {
                let snapshot = sim.snapshot();
                let [score, status, _] = snapshot.hud_lines();
                log::info!(
                    "tick {}: {} | {} | {} bullets in flight",
                    sim.tick_count(),
                    score,
                    status,
                    snapshot.bullets.len()
                );
            }
        }
        std::thread::sleep(time.until_next_step());
    }

    log::info!(
        "Final score: {} after {:.1}s",
        sim.score(),
        time.elapsed_seconds()
    );
    Ok(())
}
