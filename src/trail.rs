//! Bounded position history for particle trails

use crate::math::Vec2;
use std::collections::VecDeque;

/// FIFO of the most recent positions; index 0 is the oldest
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<Vec2>,
    max_length: usize,
}

impl TrailBuffer {
    /// Create a trail seeded with a starting position
    pub fn new(start: Vec2, max_length: usize) -> Self {
        let max_length = max_length.max(1);
        let mut points = VecDeque::with_capacity(max_length + 1);
        points.push_back(start);
        Self { points, max_length }
    }

    /// Append a position, evicting the oldest entries beyond capacity
    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.max_length {
            self.points.pop_front();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<Vec2> {
        self.points.back().copied()
    }

    pub fn oldest(&self) -> Option<Vec2> {
        self.points.front().copied()
    }

    /// Fade fraction for a trail point, `(index + 1) / len`
    ///
    /// Older points get smaller fractions; the newest approaches 1.0.
    #[inline]
    pub fn fade_fraction(&self, index: usize) -> f32 {
        (index + 1) as f32 / self.points.len() as f32
    }
}
