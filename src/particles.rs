//! Particles: shared kinematics and the explosion spark
//!
//! Every particle kind carries a `Body` and advances it with [`integrate`],
//! one call per tick. One tick is one frame of simulated time; nothing here
//! looks at the wall clock.

use crate::math::Vec2;
use crate::random::RandomSource;
use crate::surface::{paint, Surface};
use crate::trail::TrailBuffer;

/// Constant downward acceleration, applied once per tick
pub const GRAVITY: Vec2 = Vec2::new(0.0, 0.2);

/// Nominal host rate the fade timings are expressed against
pub const NOMINAL_TICK_RATE: u32 = 60;

/// Explosion sparks fade out over this many simulated seconds
pub const EXPLOSION_FADE_SECONDS: u32 = 2;

/// Ticks for an explosion spark to go from full to zero lifespan
pub const EXPLOSION_FADE_TICKS: u32 = EXPLOSION_FADE_SECONDS * NOMINAL_TICK_RATE;

pub const EXPLOSION_TRAIL_LENGTH: usize = 15;

/// Behavior shared by everything the driver or a rocket advances and draws
pub trait Particle {
    /// Advance by one tick
    fn update(&mut self, rng: &mut RandomSource);

    /// Issue draw calls for the current state
    fn draw(&self, surface: &mut dyn Surface);

    fn is_dead(&self) -> bool;
}

/// Kinematic and visual state common to all particle kinds
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Degrees, stored unwrapped
    pub hue: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub stroke_width: f32,
    /// 1.0 = fresh, 0.0 = dead
    pub lifespan: f32,
}

impl Body {
    pub fn new(hue: f32, position: Vec2, velocity: Vec2, stroke_width: f32) -> Self {
        Self {
            hue,
            position,
            velocity,
            stroke_width,
            lifespan: 1.0,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.lifespan <= 0.0
    }
}

/// Semi-implicit Euler step: gravity into velocity, then velocity into position
#[inline]
pub fn integrate(body: &mut Body) {
    body.velocity += GRAVITY;
    body.position += body.velocity;
}

/// Plain filled dot at the body's position, faded by lifespan
pub fn draw_body(body: &Body, surface: &mut dyn Surface) {
    paint(
        surface,
        body.position,
        body.stroke_width,
        (body.hue, 100.0, 50.0),
        body.lifespan.max(0.0),
    );
}

/// Particle with no behavior beyond gravity
#[derive(Debug, Clone)]
pub struct PlainParticle {
    pub body: Body,
}

impl PlainParticle {
    pub fn new(hue: f32, position: Vec2, velocity: Vec2, stroke_width: f32) -> Self {
        Self {
            body: Body::new(hue, position, velocity, stroke_width),
        }
    }
}

impl Particle for PlainParticle {
    fn update(&mut self, _rng: &mut RandomSource) {
        integrate(&mut self.body);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        draw_body(&self.body, surface);
    }

    fn is_dead(&self) -> bool {
        self.body.is_dead()
    }
}

/// Spark thrown out by a rocket burst; fades over a fixed number of ticks
/// and leaves a short trail behind it
#[derive(Debug, Clone)]
pub struct ExplosionParticle {
    pub body: Body,
    trail: TrailBuffer,
    /// Lifespan is `remaining_ticks / EXPLOSION_FADE_TICKS`, so it hits 0 exactly
    remaining_ticks: u32,
}

impl ExplosionParticle {
    pub fn new(hue: f32, position: Vec2, velocity: Vec2, stroke_width: f32) -> Self {
        Self {
            body: Body::new(hue, position, velocity, stroke_width),
            trail: TrailBuffer::new(position, EXPLOSION_TRAIL_LENGTH),
            remaining_ticks: EXPLOSION_FADE_TICKS,
        }
    }

    /// Lifespan lost per tick
    #[inline]
    pub fn fade_rate(&self) -> f32 {
        1.0 / EXPLOSION_FADE_TICKS as f32
    }

    #[inline]
    pub fn lifespan(&self) -> f32 {
        self.body.lifespan
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    fn draw_trail(&self, surface: &mut dyn Surface) {
        let body = &self.body;
        // Newest point sits under the particle itself
        let visible = self.trail.len().saturating_sub(1);
        for (i, point) in self.trail.iter().take(visible).enumerate() {
            let fraction = self.trail.fade_fraction(i);
            let alpha = fraction * body.lifespan * 0.9;
            if alpha <= 0.01 {
                continue;
            }
            let radius = (body.stroke_width * fraction * 1.2).max(0.8);
            paint(surface, *point, radius, (body.hue, 95.0, 60.0), alpha);
        }
    }
}

impl Particle for ExplosionParticle {
    fn update(&mut self, _rng: &mut RandomSource) {
        integrate(&mut self.body);

        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.body.lifespan = self.remaining_ticks as f32 / EXPLOSION_FADE_TICKS as f32;

        self.trail.push(self.body.position);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.body.lifespan <= 0.0 {
            return;
        }
        self.draw_trail(surface);
        paint(
            surface,
            self.body.position,
            self.body.stroke_width * 1.3,
            (self.body.hue, 100.0, 80.0),
            self.body.lifespan,
        );
    }

    fn is_dead(&self) -> bool {
        self.body.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn spark() -> ExplosionParticle {
        ExplosionParticle::new(200.0, Vec2::new(100.0, 100.0), Vec2::new(3.0, -4.0), 3.0)
    }

    #[test]
    fn test_integrate_is_semi_implicit() {
        let mut body = Body::new(0.0, Vec2::new(10.0, 10.0), Vec2::new(1.0, -2.0), 1.0);
        integrate(&mut body);
        // velocity updated first, then used for position
        assert!(body.velocity.approx_eq(&Vec2::new(1.0, -1.8), 1e-6));
        assert!(body.position.approx_eq(&Vec2::new(11.0, 8.2), 1e-5));
    }

    #[test]
    fn test_plain_particle_falls_and_draws_dot() {
        let mut rng = RandomSource::seeded(1);
        let mut p = PlainParticle::new(0.0, Vec2::ZERO, Vec2::ZERO, 2.0);
        p.update(&mut rng);
        assert!(p.body.velocity.y > 0.0);
        assert!(!p.is_dead());

        let mut surface = RecordingSurface::new(100, 100);
        p.draw(&mut surface);
        assert_eq!(
            surface.commands,
            vec![DrawCommand::Circle {
                center: p.body.position,
                radius: 2.0,
                color: (255, 0, 0),
                alpha: 1.0,
            }]
        );
    }

    #[test]
    fn test_spark_starts_alive() {
        let p = spark();
        assert_eq!(p.lifespan(), 1.0);
        assert!(!p.is_dead());
        assert_eq!(p.trail().len(), 1);
        assert!((p.fade_rate() - 1.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_spark_lifespan_decreases_each_tick() {
        let mut rng = RandomSource::seeded(1);
        let mut p = spark();
        let mut previous = p.lifespan();
        for _ in 0..EXPLOSION_FADE_TICKS {
            p.update(&mut rng);
            let step = previous - p.lifespan();
            assert!((step - 1.0 / 120.0).abs() < 1e-5, "step was {}", step);
            previous = p.lifespan();
        }
    }

    #[test]
    fn test_spark_dies_at_tick_120() {
        let mut rng = RandomSource::seeded(1);
        let mut p = spark();
        for _ in 0..119 {
            p.update(&mut rng);
        }
        assert!(!p.is_dead());
        p.update(&mut rng);
        assert_eq!(p.lifespan(), 0.0);
        assert!(p.is_dead());

        // stays dead
        for _ in 0..30 {
            p.update(&mut rng);
            assert_eq!(p.lifespan(), 0.0);
            assert!(p.is_dead());
        }
    }

    #[test]
    fn test_spark_trail_bounded() {
        let mut rng = RandomSource::seeded(1);
        let mut p = spark();
        for _ in 0..40 {
            p.update(&mut rng);
            assert!(p.trail().len() <= EXPLOSION_TRAIL_LENGTH);
        }
        assert_eq!(p.trail().newest(), Some(p.body.position));
    }

    #[test]
    fn test_spark_draw_trail_then_head() {
        let mut rng = RandomSource::seeded(1);
        let mut p = spark();
        for _ in 0..5 {
            p.update(&mut rng);
        }
        let mut surface = RecordingSurface::new(400, 400);
        p.draw(&mut surface);

        // 6 trail points, newest skipped, then the head
        assert_eq!(surface.circle_count(), 6);
        match surface.commands.last() {
            Some(DrawCommand::Circle { center, radius, alpha, .. }) => {
                assert_eq!(*center, p.body.position);
                assert!((radius - 3.9).abs() < 1e-5);
                assert_eq!(*alpha, p.lifespan());
            },
            other => panic!("unexpected last command: {:?}", other),
        }
    }

    #[test]
    fn test_spark_trail_radius_floor() {
        let mut rng = RandomSource::seeded(1);
        let mut p = ExplosionParticle::new(10.0, Vec2::ZERO, Vec2::ZERO, 0.1);
        for _ in 0..14 {
            p.update(&mut rng);
        }
        let mut surface = RecordingSurface::new(10, 10);
        p.draw(&mut surface);
        let trail_radii: Vec<f32> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { radius, .. } => Some(*radius),
                DrawCommand::Clear(_) => None,
            })
            .collect();
        // last entry is the head at 0.13
        for r in &trail_radii[..trail_radii.len() - 1] {
            assert_eq!(*r, 0.8);
        }
    }

    #[test]
    fn test_dead_spark_draws_nothing() {
        let mut rng = RandomSource::seeded(1);
        let mut p = spark();
        for _ in 0..EXPLOSION_FADE_TICKS {
            p.update(&mut rng);
        }
        let mut surface = RecordingSurface::new(400, 400);
        p.draw(&mut surface);
        assert!(surface.commands.is_empty());
    }
}
