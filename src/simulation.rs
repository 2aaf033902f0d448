//! Simulation driver
//!
//! Owns the active rockets and the random source. The host calls [`Simulation::tick`]
//! then [`Simulation::render`] once per frame; trigger methods (`launch_at`, `burst`,
//! `clear`, ...) take `&mut self`, so they can only run between ticks.

use crate::command::Command;
use crate::math::Vec2;
use crate::particles::Particle;
use crate::random::RandomSource;
use crate::rocket::Rocket;
use crate::surface::Surface;
use log::{debug, info};

pub const BACKGROUND: (u8, u8, u8) = (0, 0, 0);

/// Largest number of launches a single burst may schedule
pub const MAX_BURST: usize = 100;

/// Launch speed ranges: slight horizontal drift, strong upward kick
const LAUNCH_DRIFT: f32 = 1.0;
const LAUNCH_SPEED_MIN: f32 = 8.0;
const LAUNCH_SPEED_MAX: f32 = 12.0;

/// Tunables for launching
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub auto_launch: bool,
    pub launch_interval_ticks: u64,
    pub edge_margin: f32,
    pub launch_height_offset: f32,
    pub stroke_width: f32,
    pub burst_min: u32,
    pub burst_max: u32,
    pub burst_stagger_ticks: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            auto_launch: true,
            launch_interval_ticks: 60,
            edge_margin: 100.0,
            launch_height_offset: 50.0,
            stroke_width: 3.0,
            burst_min: 5,
            burst_max: 10,
            burst_stagger_ticks: 12,
        }
    }
}

/// A burst launch waiting for its tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledLaunch {
    due_tick: u64,
}

pub struct Simulation {
    rockets: Vec<Rocket>,
    scheduled: Vec<ScheduledLaunch>,
    rng: RandomSource,
    settings: SimulationSettings,
    width: f32,
    height: f32,
    tick_count: u64,
    auto_launch: bool,
    running: bool,
    launched_total: u64,
}

impl Simulation {
    pub fn new(width: u32, height: u32, settings: SimulationSettings, rng: RandomSource) -> Self {
        Self {
            rockets: Vec::with_capacity(32),
            scheduled: Vec::new(),
            rng,
            auto_launch: settings.auto_launch,
            settings,
            width: width as f32,
            height: height as f32,
            tick_count: 0,
            running: true,
            launched_total: 0,
        }
    }

    /// Advance one frame: fire due burst launches, auto-launch on cadence,
    /// update every rocket, then drop the finished ones
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.tick_count += 1;

        let now = self.tick_count;
        let due = self.scheduled.iter().filter(|s| s.due_tick <= now).count();
        if due > 0 {
            self.scheduled.retain(|s| s.due_tick > now);
            for _ in 0..due {
                self.launch_random();
            }
        }

        if self.auto_launch && self.tick_count % self.settings.launch_interval_ticks.max(1) == 0 {
            self.launch_random();
        }

        for rocket in &mut self.rockets {
            rocket.update(&mut self.rng);
        }

        let before = self.rockets.len();
        self.rockets = std::mem::take(&mut self.rockets)
            .into_iter()
            .filter(|rocket| !rocket.is_completely_done())
            .collect();
        let retired = before - self.rockets.len();
        if retired > 0 {
            debug!("retired {} rocket(s), {} active", retired, self.rockets.len());
        }
    }

    /// Clear to black and draw every rocket in launch order
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear(BACKGROUND);
        for rocket in &self.rockets {
            rocket.draw(surface);
        }
    }

    /// Launch a rocket from the bottom edge at horizontal position `x`
    ///
    /// Returns false (and launches nothing) when the surface has no area.
    pub fn launch_at(&mut self, x: f32) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            debug!("launch skipped: surface is {}x{}", self.width, self.height);
            return false;
        }

        let start = Vec2::new(x, self.height - self.settings.launch_height_offset);
        let velocity = Vec2::new(
            self.rng.next_float(-LAUNCH_DRIFT, LAUNCH_DRIFT),
            self.rng.next_float(-LAUNCH_SPEED_MAX, -LAUNCH_SPEED_MIN),
        );
        let hue = self.rng.next_float(0.0, 360.0);

        self.rockets
            .push(Rocket::new(hue, start, velocity, self.settings.stroke_width));
        self.launched_total += 1;
        debug!(
            "launched rocket #{} at x={:.1}, vy={:.2}, hue {:.0}",
            self.launched_total, x, velocity.y, hue
        );
        true
    }

    /// Launch at a random x inside the edge margins
    ///
    /// Skipped when the surface is too narrow to leave any valid position.
    pub fn launch_random(&mut self) -> bool {
        let min_x = self.settings.edge_margin;
        let max_x = self.width - self.settings.edge_margin;
        if max_x < min_x {
            debug!(
                "launch skipped: width {} leaves no room inside margin {}",
                self.width, self.settings.edge_margin
            );
            return false;
        }
        let x = self.rng.next_float(min_x, max_x);
        self.launch_at(x)
    }

    /// Schedule a random-sized burst; returns how many launches were queued
    pub fn burst(&mut self) -> usize {
        let count = self
            .rng
            .next_int(self.settings.burst_min as i32, self.settings.burst_max as i32)
            .max(0) as usize;
        self.burst_n(count)
    }

    /// Schedule `count` launches, the first on the next tick and the rest
    /// spaced `burst_stagger_ticks` apart. Counts above [`MAX_BURST`] are clamped.
    pub fn burst_n(&mut self, count: usize) -> usize {
        let count = count.min(MAX_BURST);
        let first = self.tick_count.saturating_add(1);
        let stagger = self.settings.burst_stagger_ticks;
        self.scheduled.extend((0..count as u64).map(|i| ScheduledLaunch {
            due_tick: first.saturating_add(i.saturating_mul(stagger)),
        }));
        info!("burst of {} rocket(s) scheduled", count);
        count
    }

    /// Drop every rocket and every pending burst launch
    pub fn clear(&mut self) {
        let dropped = self.rockets.len();
        self.rockets.clear();
        self.scheduled.clear();
        info!("cleared {} rocket(s)", dropped);
    }

    pub fn toggle_auto_launch(&mut self) -> bool {
        self.set_auto_launch(!self.auto_launch);
        self.auto_launch
    }

    pub fn set_auto_launch(&mut self, enabled: bool) {
        self.auto_launch = enabled;
        info!("auto launch {}", if enabled { "ON" } else { "OFF" });
    }

    /// Paused simulations keep rendering but `tick` does nothing
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
        info!("simulation {}", if running { "resumed" } else { "paused" });
    }

    /// Surface size changed; later launches use the new bounds
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
        debug!("resized to {}x{}", width, height);
    }

    /// Pick up the surface's current size if it changed
    pub fn fit_to(&mut self, surface: &dyn Surface) {
        let (w, h) = (surface.width(), surface.height());
        if (w as f32, h as f32) != (self.width, self.height) {
            self.resize(w, h);
        }
    }

    /// Execute an external trigger. `Quit` belongs to the host and is ignored.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::LaunchAt(x) => {
                self.launch_at(x);
            },
            Command::Launch => {
                self.launch_random();
            },
            Command::Burst(None) => {
                self.burst();
            },
            Command::Burst(Some(n)) => {
                self.burst_n(n);
            },
            Command::Clear => self.clear(),
            Command::ToggleAuto => {
                self.toggle_auto_launch();
            },
            Command::SetAuto(enabled) => self.set_auto_launch(enabled),
            Command::Pause => self.set_running(false),
            Command::Resume => self.set_running(true),
            Command::Quit => {},
        }
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    #[inline]
    pub fn rocket_count(&self) -> usize {
        self.rockets.len()
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[inline]
    pub fn launched_total(&self) -> u64 {
        self.launched_total
    }

    #[inline]
    pub fn auto_launch(&self) -> bool {
        self.auto_launch
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_launches(&self) -> usize {
        self.scheduled.len()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }
}
