//! Rocket: climbs until its apex, then bursts into explosion sparks
//!
//! State only moves forward: `Launching -> Exploding -> Done`. The spark set is
//! created exactly once, on the tick the rocket stops climbing.

use crate::math::Vec2;
use crate::particles::{integrate, Body, ExplosionParticle, Particle};
use crate::random::RandomSource;
use crate::surface::{paint, Surface};
use crate::trail::TrailBuffer;
use log::debug;

pub const ROCKET_TRAIL_LENGTH: usize = 12;

/// Sparks produced by one burst
pub const EXPLOSION_PARTICLE_COUNT: usize = 30;

pub const EXPLOSION_SPEED_MIN: f32 = 2.0;
pub const EXPLOSION_SPEED_MAX: f32 = 8.0;

/// Max hue offset of a spark from its rocket, in degrees
pub const EXPLOSION_HUE_SPREAD: f32 = 30.0;

/// Bound on the rounding left over from summing gravity in f32 over a full
/// climb (at most ~60 steps from |vy| <= 12). A rocket launched at -10 ends
/// tick 50 at about -5e-6 and must still burst there.
const APEX_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RocketState {
    Launching,
    Exploding,
    Done,
}

#[derive(Debug, Clone)]
pub struct Rocket {
    pub body: Body,
    state: RocketState,
    explosion_particles: Vec<ExplosionParticle>,
    trail: TrailBuffer,
    /// Ticks since launch
    age: u32,
    exploded_at: Option<u32>,
}

impl Rocket {
    pub fn new(hue: f32, position: Vec2, velocity: Vec2, stroke_width: f32) -> Self {
        Self {
            body: Body::new(hue, position, velocity, stroke_width),
            state: RocketState::Launching,
            explosion_particles: Vec::new(),
            trail: TrailBuffer::new(position, ROCKET_TRAIL_LENGTH),
            age: 0,
            exploded_at: None,
        }
    }

    #[inline]
    pub fn state(&self) -> RocketState {
        self.state
    }

    pub fn explosion_particles(&self) -> &[ExplosionParticle] {
        &self.explosion_particles
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Tick (counted from launch) on which the burst happened
    #[inline]
    pub fn exploded_at(&self) -> Option<u32> {
        self.exploded_at
    }

    /// Burst finished and every spark has faded
    pub fn is_completely_done(&self) -> bool {
        self.state == RocketState::Done && self.explosion_particles.iter().all(Particle::is_dead)
    }

    fn explode(&mut self, rng: &mut RandomSource) {
        if !self.explosion_particles.is_empty() {
            return;
        }

        let origin = self.body.position;
        let base_hue = self.body.hue;
        let stroke_width = self.body.stroke_width;
        self.explosion_particles = (0..EXPLOSION_PARTICLE_COUNT)
            .map(|_| {
                let direction = rng.next_unit_vector();
                let speed = rng.next_float(EXPLOSION_SPEED_MIN, EXPLOSION_SPEED_MAX);
                let hue = base_hue + rng.next_float(-EXPLOSION_HUE_SPREAD, EXPLOSION_HUE_SPREAD);
                ExplosionParticle::new(hue, origin, direction * speed, stroke_width)
            })
            .collect();
        self.exploded_at = Some(self.age);

        debug!(
            "rocket exploded at ({:.1}, {:.1}) after {} ticks, hue {:.0}",
            origin.x, origin.y, self.age, self.body.hue
        );
    }

    fn draw_trail(&self, surface: &mut dyn Surface) {
        let body = &self.body;
        let visible = self.trail.len().saturating_sub(1);
        for (i, point) in self.trail.iter().take(visible).enumerate() {
            let fraction = self.trail.fade_fraction(i);
            let alpha = fraction * 0.9;
            if alpha <= 0.05 {
                continue;
            }
            let radius = (body.stroke_width * fraction * 1.8).max(1.0);
            paint(surface, *point, radius, (body.hue, 100.0, 85.0), alpha);
        }
    }
}

impl Particle for Rocket {
    fn update(&mut self, rng: &mut RandomSource) {
        match self.state {
            RocketState::Launching => {
                self.age += 1;
                integrate(&mut self.body);
                self.trail.push(self.body.position);

                // Climbing means negative y velocity; gravity flips it at the apex
                if self.body.velocity.y >= -APEX_EPSILON {
                    self.explode(rng);
                    self.state = RocketState::Exploding;
                }
            },
            RocketState::Exploding => {
                self.age += 1;
                for particle in &mut self.explosion_particles {
                    particle.update(rng);
                }
                if self.explosion_particles.iter().all(Particle::is_dead) {
                    self.state = RocketState::Done;
                    debug!("rocket burst faded after {} ticks", self.age);
                }
            },
            RocketState::Done => {},
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        match self.state {
            RocketState::Launching => {
                self.draw_trail(surface);
                paint(
                    surface,
                    self.body.position,
                    self.body.stroke_width * 2.0,
                    (self.body.hue, 100.0, 90.0),
                    1.0,
                );
            },
            RocketState::Exploding => {
                for particle in &self.explosion_particles {
                    particle.draw(surface);
                }
            },
            RocketState::Done => {},
        }
    }

    fn is_dead(&self) -> bool {
        self.is_completely_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::EXPLOSION_FADE_TICKS;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn scenario_rocket() -> Rocket {
        Rocket::new(120.0, Vec2::new(400.0, 550.0), Vec2::new(0.0, -10.0), 3.0)
    }

    #[test]
    fn test_new_rocket_is_launching() {
        let rocket = scenario_rocket();
        assert_eq!(rocket.state(), RocketState::Launching);
        assert!(rocket.explosion_particles().is_empty());
        assert_eq!(rocket.trail().len(), 1);
        assert!(!rocket.is_completely_done());
    }

    #[test]
    fn test_explodes_exactly_at_apex_tick() {
        let mut rng = RandomSource::seeded(5);
        let mut rocket = scenario_rocket();
        for tick in 1..=49 {
            rocket.update(&mut rng);
            assert_eq!(rocket.state(), RocketState::Launching, "tick {}", tick);
            assert!(rocket.explosion_particles().is_empty());
        }
        rocket.update(&mut rng);
        assert_eq!(rocket.state(), RocketState::Exploding);
        assert_eq!(rocket.explosion_particles().len(), EXPLOSION_PARTICLE_COUNT);
        assert_eq!(rocket.exploded_at(), Some(50));
    }

    #[test]
    fn test_still_climbing_rocket_does_not_explode() {
        let mut rng = RandomSource::seeded(5);
        let mut rocket = Rocket::new(120.0, Vec2::new(400.0, 550.0), Vec2::new(0.0, -10.0005), 3.0);
        for _ in 0..50 {
            rocket.update(&mut rng);
        }
        assert!(rocket.body.velocity.y < 0.0);
        assert_eq!(rocket.state(), RocketState::Launching);
        rocket.update(&mut rng);
        assert_eq!(rocket.state(), RocketState::Exploding);
        assert_eq!(rocket.exploded_at(), Some(51));
    }

    #[test]
    fn test_explosion_particles_start_fresh() {
        let mut rng = RandomSource::seeded(8);
        let mut rocket = scenario_rocket();
        while rocket.state() == RocketState::Launching {
            rocket.update(&mut rng);
        }
        let origin = rocket.body.position;
        for p in rocket.explosion_particles() {
            assert_eq!(p.lifespan(), 1.0);
            assert!(!p.is_dead());
            assert_eq!(p.body.position, origin);
            assert_eq!(p.body.stroke_width, 3.0);
            let speed = p.body.velocity.length();
            assert!(speed >= 2.0 - 1e-4 && speed < 8.0 + 1e-4, "speed {}", speed);
            assert!((p.body.hue - 120.0).abs() <= 30.0);
        }
    }

    #[test]
    fn test_state_sequence_is_monotonic() {
        let mut rng = RandomSource::seeded(21);
        let mut rocket = scenario_rocket();
        let mut seen = vec![rocket.state()];
        let mut done_since = None;
        for tick in 0..400 {
            rocket.update(&mut rng);
            if *seen.last().unwrap() != rocket.state() {
                seen.push(rocket.state());
            }
            if rocket.is_completely_done() && done_since.is_none() {
                done_since = Some(tick);
            }
            if done_since.is_some() {
                assert!(rocket.is_completely_done());
            }
        }
        assert_eq!(
            seen,
            vec![RocketState::Launching, RocketState::Exploding, RocketState::Done]
        );
        assert_eq!(
            rocket.explosion_particles().len(),
            EXPLOSION_PARTICLE_COUNT,
            "spark set never grows after the burst"
        );
    }

    #[test]
    fn test_done_after_sparks_fade() {
        let mut rng = RandomSource::seeded(2);
        let mut rocket = scenario_rocket();
        for _ in 0..50 {
            rocket.update(&mut rng);
        }
        for _ in 0..EXPLOSION_FADE_TICKS - 1 {
            rocket.update(&mut rng);
            assert_eq!(rocket.state(), RocketState::Exploding);
        }
        rocket.update(&mut rng);
        assert_eq!(rocket.state(), RocketState::Done);
        assert!(rocket.is_completely_done());
        assert!(rocket.is_dead());
    }

    #[test]
    fn test_trail_capped_while_launching() {
        let mut rng = RandomSource::seeded(3);
        let mut rocket = scenario_rocket();
        for _ in 0..30 {
            rocket.update(&mut rng);
            assert!(rocket.trail().len() <= ROCKET_TRAIL_LENGTH);
        }
        assert_eq!(rocket.trail().len(), ROCKET_TRAIL_LENGTH);
    }

    #[test]
    fn test_launching_draw_trail_then_head() {
        let mut rng = RandomSource::seeded(3);
        let mut rocket = scenario_rocket();
        for _ in 0..20 {
            rocket.update(&mut rng);
        }
        let mut surface = RecordingSurface::new(800, 600);
        rocket.draw(&mut surface);

        // 12 points, newest hidden under the head; fraction 1/12 gives alpha 0.075
        assert_eq!(surface.circle_count(), 12);
        match surface.commands.last() {
            Some(DrawCommand::Circle { center, radius, alpha, .. }) => {
                assert_eq!(*center, rocket.body.position);
                assert_eq!(*radius, 6.0);
                assert_eq!(*alpha, 1.0);
            },
            other => panic!("unexpected last command: {:?}", other),
        }
    }

    #[test]
    fn test_done_rocket_draws_nothing() {
        let mut rng = RandomSource::seeded(4);
        let mut rocket = scenario_rocket();
        while !rocket.is_completely_done() {
            rocket.update(&mut rng);
        }
        let mut surface = RecordingSurface::new(800, 600);
        rocket.draw(&mut surface);
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let run = |seed| {
            let mut rng = RandomSource::seeded(seed);
            let mut rocket = scenario_rocket();
            for _ in 0..90 {
                rocket.update(&mut rng);
            }
            rocket
                .explosion_particles()
                .iter()
                .map(|p| (p.body.position, p.body.hue))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }
}
