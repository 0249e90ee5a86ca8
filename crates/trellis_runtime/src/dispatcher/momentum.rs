//! Post-drag inertial scrolling
//!
//! Momentum has no timer of its own. The frame loop calls
//! [`EventDispatcher::step_momentum`](super::EventDispatcher::step_momentum)
//! once per tick; each step decays the velocity by a fixed friction factor
//! and applies `velocity * dt` as a scroll.

use std::time::Instant;

use trellis_core::Point;

use crate::config::DispatcherConfig;
use crate::scroll::scroll_by;
use crate::widget::Widget;

/// Fallback step when two ticks land on the same instant
const DEFAULT_DT: f32 = 1.0 / 60.0;
/// Longest step applied in one tick, so a stalled frame loop doesn't jump
const MAX_DT: f32 = 0.1;

#[derive(Default)]
pub(crate) struct Momentum {
    target: Option<Widget>,
    velocity: Point,
    last_update: Option<Instant>,
}

impl Momentum {
    pub(crate) fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub(crate) fn target(&self) -> Option<&Widget> {
        self.target.as_ref()
    }

    pub(crate) fn velocity(&self) -> Point {
        self.velocity
    }

    pub(crate) fn start(&mut self, target: Widget, velocity: Point, now: Instant) {
        tracing::debug!(target = %target.id(), vx = velocity.x, vy = velocity.y, "momentum started");
        self.target = Some(target);
        self.velocity = velocity;
        self.last_update = Some(now);
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(target) = self.target.take() {
            tracing::debug!(target = %target.id(), "momentum stopped");
        }
        self.velocity = Point::ZERO;
        self.last_update = None;
    }

    /// Advance one tick; returns whether momentum is still active
    pub(crate) fn step(&mut self, now: Instant, config: &DispatcherConfig) -> bool {
        let Some(target) = self.target.clone() else {
            return false;
        };
        if !target.is_attached() {
            self.cancel();
            return false;
        }

        let elapsed = self
            .last_update
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        let dt = if elapsed > 0.0 { elapsed.min(MAX_DT) } else { DEFAULT_DT };
        self.last_update = Some(now);

        self.velocity = Point::new(
            self.velocity.x * config.momentum_friction,
            self.velocity.y * config.momentum_friction,
        );
        let speed_sq = self.velocity.distance_squared(Point::ZERO);
        let stop = config.momentum_stop_velocity;
        if speed_sq < stop * stop {
            self.cancel();
            return false;
        }

        if !scroll_by(&target, self.velocity.x * dt, self.velocity.y * dt) {
            self.cancel();
            return false;
        }
        true
    }
}
