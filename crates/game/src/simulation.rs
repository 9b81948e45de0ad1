//! The fixed-step gun range: owns the physics world and every gameplay
//! object, and advances them one tick at a time.

use crate::arena::Arena;
use crate::bullet::{expire_bullets, Bullet, PlayArea};
use crate::config::SimConfig;
use crate::gun::{Gun, GUN_COLOR};
use crate::interaction::{Interaction, InteractionController};
use crate::magazine::ROUNDS_SHOWN;
use crate::snapshot::{FrameSnapshot, GunView, MagazineView, ParticleView, TargetView};
use crate::target::Target;
use anyhow::Context;
use glam::Vec2;
use input::{InputEvent, InputState};
use physics::{CollisionRouter, CollisionType, ContactBegin, Material, PhysicsWorld};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GROUND_HEIGHT: f32 = 20.0;
const WALL_THICKNESS: f32 = 20.0;
const ENVIRONMENT_MATERIAL: Material = Material::new(0.9, 0.4);
/// How far past the window a bullet may fly before it is culled.
const PLAY_AREA_MARGIN: f32 = 100.0;

pub struct Simulation {
    config: SimConfig,
    world: PhysicsWorld,
    gun: Gun,
    arena: Arena,
    router: CollisionRouter<Arena>,
    interaction: InteractionController,
    rng: StdRng,
    play_area: PlayArea,
    tick: u64,
    running: bool,
}

impl Simulation {
    /// Validate the config and build the range: ground, walls, the gun with
    /// its magazine and the targets.
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid simulation config")?;

        let width = config.window_width as f32;
        let height = config.window_height as f32;
        let mut world = PhysicsWorld::new(Vec2::new(0.0, config.gravity));

        world.add_static_box(
            Vec2::new(width / 2.0, height - GROUND_HEIGHT / 2.0),
            Vec2::new(width / 2.0, GROUND_HEIGHT / 2.0),
            ENVIRONMENT_MATERIAL,
            CollisionType::Environment,
        );
        for x in [-WALL_THICKNESS / 2.0, width + WALL_THICKNESS / 2.0] {
            world.add_static_box(
                Vec2::new(x, height / 2.0),
                Vec2::new(WALL_THICKNESS / 2.0, height / 2.0),
                ENVIRONMENT_MATERIAL,
                CollisionType::Environment,
            );
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let gun = Gun::spawn(&mut world, Vec2::new(width / 4.0, height - 100.0), config.gun)
            .context("failed to create gun")?;

        let targets = (0..config.target.count)
            .map(|_| {
                let position = Vec2::new(
                    rng.gen_range(width / 2.0..=width - 50.0),
                    rng.gen_range(50.0..=height - 50.0),
                );
                Target::spawn(&mut world, position, config.target)
            })
            .collect::<Result<Vec<_>, _>>()
            .context("failed to create targets")?;

        let margin = Vec2::splat(PLAY_AREA_MARGIN);
        let play_area = PlayArea {
            min: -margin,
            max: Vec2::new(width, height) + margin,
        };

        log::info!(
            "range ready: {}x{}, {} targets",
            config.window_width,
            config.window_height,
            targets.len()
        );

        Ok(Self {
            config,
            world,
            gun,
            arena: Arena::new(targets),
            router: Arena::router(),
            interaction: InteractionController::new(),
            rng,
            play_area,
            tick: 0,
            running: true,
        })
    }

    /// Advance one tick using the queued events and continuous state of
    /// `input`.
    pub fn tick(&mut self, input: &mut InputState) {
        if input.quit_requested() {
            self.quit();
        }
        let events = input.drain_events();
        self.tick_with(&events, input.pointer_position(), input.is_fire_held());
    }

    /// Advance one tick from explicit input.
    pub fn tick_with(&mut self, events: &[InputEvent], pointer: Vec2, trigger_held: bool) {
        let dt = self.config.fixed_timestep;

        for &event in events {
            let outcome = self
                .interaction
                .handle(event, &mut self.gun, &mut self.world);
            if outcome == Interaction::Quit {
                self.quit();
            }
        }

        self.gun.trigger_pulled = trigger_held;
        self.gun.update(&mut self.world, pointer, dt);
        self.gun
            .fire(&mut self.world, &mut self.arena.bullets, &mut self.rng);

        let contacts = self.world.step(dt);
        for (a, b) in self.router.dispatch(&mut self.arena, &contacts) {
            self.world.suppress_contacts(a, b);
        }
        self.arena.remove_spent(&mut self.world);

        for target in &mut self.arena.targets {
            target.update(&mut self.world, &mut self.rng);
        }
        expire_bullets(&mut self.world, &mut self.arena.bullets, self.play_area);

        self.tick += 1;
    }

    /// Register a collision handler next to the arena's own. A handler
    /// returning false stops the solver from resolving that pair from the
    /// next step on.
    pub fn add_collision_handler<F>(&mut self, a: CollisionType, b: CollisionType, handler: F)
    where
        F: FnMut(&mut Arena, &ContactBegin) -> bool + 'static,
    {
        self.router.add_handler(a, b, handler);
    }

    pub fn quit(&mut self) {
        if self.running {
            log::info!("quitting after {} ticks", self.tick);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn score(&self) -> u32 {
        self.arena.score
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn gun(&self) -> &Gun {
        &self.gun
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn targets(&self) -> &[Target] {
        &self.arena.targets
    }

    pub fn bullet_count(&self) -> usize {
        self.arena.bullets.len() as usize
    }

    /// Everything a renderer needs for the current frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        let gun_position = self.gun.position(&self.world).unwrap_or_default();
        let attached = self.gun.is_magazine_attached();

        let bullets = self
            .arena
            .bullets
            .query::<&Bullet>()
            .iter()
            .filter_map(|(_, bullet)| self.world.position(bullet.body.rigid_body))
            .collect();

        FrameSnapshot {
            gun: GunView {
                position: gun_position,
                angle: self.gun.angle(),
                color: GUN_COLOR,
                barrel_end: self.gun.barrel_end(&self.world).unwrap_or(gun_position),
            },
            magazine: MagazineView {
                position: self.gun.magazine().position(&self.world).unwrap_or_default(),
                attached,
                rounds_visible: if attached { ROUNDS_SHOWN } else { 0 },
            },
            muzzle_flash: self
                .gun
                .muzzle_flash()
                .particles
                .iter()
                .map(|p| ParticleView {
                    position: p.position,
                    color: p.color,
                    size: p.size,
                })
                .collect(),
            bullets,
            targets: self
                .arena
                .targets
                .iter()
                .map(|t| TargetView {
                    position: self.world.position(t.body().rigid_body).unwrap_or_default(),
                    radius: t.radius(),
                    hit: t.is_hit(),
                })
                .collect(),
            score: self.arena.score,
            status: self.gun.status_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{ElementState, MouseButton};
    use std::cell::Cell;
    use std::rc::Rc;

    fn seeded() -> Simulation {
        Simulation::new(SimConfig {
            seed: Some(42),
            ..SimConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn setup_places_gun_and_targets() {
        let sim = seeded();
        let snap = sim.snapshot();
        assert_eq!(snap.gun.position, Vec2::new(250.0, 600.0));
        assert!(snap.magazine.attached);
        assert_eq!(snap.magazine.rounds_visible, ROUNDS_SHOWN);
        assert_eq!(snap.targets.len(), 3);
        for t in &snap.targets {
            assert!((500.0..=950.0).contains(&t.position.x));
            assert!((50.0..=650.0).contains(&t.position.y));
            assert!(!t.hit);
        }
        assert_eq!(snap.status, "Attached");
        assert_eq!(snap.score, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimConfig::default();
        config.gun.mass = 0.0;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn holding_the_trigger_fires_on_cooldown() {
        let mut sim = seeded();
        let pointer = Vec2::new(800.0, 100.0);
        let mut fired = 0;
        for _ in 0..25 {
            let before = sim.gun().cooldown();
            sim.tick_with(&[], pointer, true);
            if sim.gun().cooldown() == 10 && before <= 1 {
                fired += 1;
            }
        }
        assert_eq!(fired, 3);
        assert!(sim.bullet_count() <= 3);
        assert_eq!(sim.tick_count(), 25);
    }

    #[test]
    fn detached_gun_does_not_fire() {
        let mut sim = seeded();
        let mag = sim.gun().magazine().position(sim.world()).unwrap();
        let far = mag + Vec2::new(0.0, -200.0);
        let drag = [
            InputEvent::PointerDown {
                position: mag,
                button: MouseButton::Left,
            },
            InputEvent::PointerMove { position: far },
            InputEvent::PointerUp {
                position: far,
                button: MouseButton::Left,
            },
        ];
        sim.tick_with(&drag, far, false);
        assert!(!sim.gun().is_magazine_attached());
        assert_eq!(sim.world().joint_count(), 0);

        for _ in 0..20 {
            sim.tick_with(&[], Vec2::new(800.0, 100.0), true);
        }
        assert_eq!(sim.bullet_count(), 0);
        assert_eq!(sim.snapshot().magazine.rounds_visible, 0);
    }

    #[test]
    fn input_state_drives_quit() {
        let mut sim = seeded();
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        sim.tick(&mut input);
        assert!(sim.is_running());
        input.request_quit();
        sim.tick(&mut input);
        assert!(!sim.is_running());
    }

    #[test]
    fn escape_key_stops_the_loop() {
        let mut sim = seeded();
        sim.tick_with(&[InputEvent::KeyDown(input::KeyCode::Escape)], Vec2::ZERO, false);
        assert!(!sim.is_running());
    }

    #[test]
    fn declined_contacts_stop_being_solved() {
        let mut solid = seeded();
        for _ in 0..240 {
            solid.tick_with(&[], Vec2::ZERO, false);
        }
        for t in solid.snapshot().targets {
            assert!(t.position.y < 700.0, "target sank to {}", t.position.y);
        }

        let mut ghost = seeded();
        let declined = Rc::new(Cell::new(0));
        let seen = Rc::clone(&declined);
        ghost.add_collision_handler(CollisionType::Target, CollisionType::Environment, move |_, _| {
            seen.set(seen.get() + 1);
            false
        });
        for _ in 0..240 {
            ghost.tick_with(&[], Vec2::ZERO, false);
        }
        assert!(declined.get() >= 3);
        for t in ghost.snapshot().targets {
            assert!(t.position.y > 700.0, "target held at {}", t.position.y);
        }
    }

    #[test]
    fn bullets_are_culled_eventually() {
        let mut sim = seeded();
        for _ in 0..11 {
            sim.tick_with(&[], Vec2::new(1000.0, 0.0), true);
        }
        assert!(sim.bullet_count() > 0);
        for _ in 0..200 {
            sim.tick_with(&[], Vec2::new(1000.0, 0.0), false);
        }
        assert_eq!(sim.bullet_count(), 0);
    }
}
