//! Timed on-screen messages.

use std::collections::VecDeque;

use gearbox_ui::Color;

use crate::config::AlerterConfig;
use crate::gear::{Gear, GearConfig, UpdateContext};
use crate::render::{DrawFrame, RenderPass};

#[derive(Debug, Clone, PartialEq)]
struct Alert {
    text: String,
    color: Color,
    age: f32,
}

/// Stack of short-lived messages in the top-left corner.
#[derive(Debug)]
pub struct Alerter {
    config: AlerterConfig,
    alerts: VecDeque<Alert>,
}

impl Alerter {
    /// Creates an alerter.
    #[must_use]
    pub fn new(config: AlerterConfig) -> Self {
        Self {
            alerts: VecDeque::with_capacity(config.max_lines),
            config,
        }
    }

    /// Tunables.
    #[must_use]
    pub const fn settings(&self) -> &AlerterConfig {
        &self.config
    }

    /// Queues a message. The oldest one goes when the line limit is hit.
    pub fn alert(&mut self, text: impl Into<String>, color: Color) {
        self.alerts.push_back(Alert {
            text: text.into(),
            color,
            age: 0.0,
        });
        while self.alerts.len() > self.config.max_lines {
            self.alerts.pop_front();
        }
    }

    /// Messages currently up, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.alerts.iter().map(|a| a.text.as_str())
    }

    /// Number of messages up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// True if nothing is up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Opacity multiplier for a message of age `age`.
    fn fade(&self, age: f32) -> f32 {
        let remaining = self.config.lifetime - age;
        if self.config.fade_time <= 0.0 {
            return 1.0;
        }
        (remaining / self.config.fade_time).clamp(0.0, 1.0)
    }
}

impl Gear for Alerter {
    fn name(&self) -> &str {
        "alerts"
    }

    fn config(&self) -> &GearConfig {
        &self.config.gear
    }

    fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.config.gear
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>, dt: f32) {
        let lifetime = self.config.lifetime;
        for alert in &mut self.alerts {
            alert.age += dt;
        }
        self.alerts.retain(|a| a.age < lifetime);
    }

    fn draw(&mut self, frame: &mut DrawFrame<'_>) {
        if frame.pass() != RenderPass::Sprite {
            return;
        }
        let mut position = self.config.position;
        for alert in &self.alerts {
            let color = alert.color.with_alpha(alert.color.a * self.fade(alert.age));
            frame.text(&alert.text, position, color);
            position.y += frame.measure(&alert.text).y + self.config.line_spacing;
        }
    }

    fn clear(&mut self) {
        self.alerts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_limit_drops_oldest() {
        let config = AlerterConfig {
            max_lines: 2,
            ..AlerterConfig::default()
        };
        let mut alerter = Alerter::new(config);
        alerter.alert("one", Color::WHITE);
        alerter.alert("two", Color::WHITE);
        alerter.alert("three", Color::WHITE);

        assert_eq!(alerter.messages().collect::<Vec<_>>(), vec!["two", "three"]);
    }

    #[test]
    fn test_fade_over_last_second() {
        let alerter = Alerter::new(AlerterConfig {
            lifetime: 5.0,
            fade_time: 1.0,
            ..AlerterConfig::default()
        });

        assert_eq!(alerter.fade(0.0), 1.0);
        assert_eq!(alerter.fade(4.5), 0.5);
        assert_eq!(alerter.fade(5.0), 0.0);
    }
}
