use rand::seq::SliceRandom;
use rand::Rng;
use std::time::SystemTime;

/// Particle for the level-up animation
#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiParticle {
    fn new(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *['✨', '🎉', '⭐', '💫', '🌟', '✓', '🎊']
                .choose(&mut rng)
                .unwrap_or(&'✨'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..4.0),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += 15.0 * dt; // gravity

        self.age += dt;
        self.age < self.max_age
    }
}

/// Animation state for the level-up celebration
#[derive(Debug)]
pub struct Confetti {
    pub particles: Vec<ConfettiParticle>,
    pub start_time: SystemTime,
    pub duration: f64, // seconds
    pub is_active: bool,
    pub panel_width: f64,
    pub panel_height: f64,
    last_update: Option<SystemTime>,
}

impl Confetti {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            start_time: SystemTime::now(),
            duration: 3.0,
            is_active: false,
            panel_width: 80.0,
            panel_height: 24.0,
            last_update: None,
        }
    }

    /// Burst particles from the center of the panel.
    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.start_time = SystemTime::now();
        self.last_update = None;
        self.is_active = true;
        self.panel_width = width as f64;
        self.panel_height = height as f64;

        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;

        for _ in 0..30 {
            let offset_x = rng.gen_range(-10.0..10.0);
            let offset_y = rng.gen_range(-4.0..4.0);
            self.particles
                .push(ConfettiParticle::new(center_x + offset_x, center_y + offset_y));
        }
    }

    /// Advance the animation by wall-clock elapsed time since the last call.
    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        let now = SystemTime::now();
        let dt = self
            .last_update
            .and_then(|last| now.duration_since(last).ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.05)
            .min(0.5);
        self.last_update = Some(now);

        self.particles.retain_mut(|p| p.update(dt));

        let elapsed = self
            .start_time
            .elapsed()
            .map(|e| e.as_secs_f64())
            .unwrap_or(self.duration);
        if self.particles.is_empty() || elapsed >= self.duration {
            self.is_active = false;
            self.particles.clear();
        }
    }

    /// Particles currently inside the panel, as cell coordinates.
    pub fn visible_particles(&self) -> impl Iterator<Item = (u16, u16, &ConfettiParticle)> {
        self.particles.iter().filter_map(|p| {
            if p.x < 0.0 || p.y < 0.0 || p.x >= self.panel_width || p.y >= self.panel_height {
                None
            } else {
                Some((p.x as u16, p.y as u16, p))
            }
        })
    }
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive_with_no_particles() {
        let confetti = Confetti::new();
        assert!(!confetti.is_active);
        assert!(confetti.particles.is_empty());
    }

    #[test]
    fn start_spawns_particles_inside_the_panel() {
        let mut confetti = Confetti::new();
        confetti.start(40, 20);
        assert!(confetti.is_active);
        assert!(!confetti.particles.is_empty());
        assert!(confetti.visible_particles().count() > 0);
    }

    #[test]
    fn update_when_inactive_is_a_no_op() {
        let mut confetti = Confetti::new();
        confetti.update();
        assert!(!confetti.is_active);
    }

    #[test]
    fn particles_age_out() {
        let mut p = ConfettiParticle::new(10.0, 10.0);
        p.max_age = 0.1;
        assert!(p.update(0.05));
        assert!(!p.update(0.1));
    }

    #[test]
    fn animation_ends_once_particles_expire() {
        let mut confetti = Confetti::new();
        confetti.start(40, 20);
        for p in &mut confetti.particles {
            p.max_age = 0.0;
        }
        confetti.update();
        assert!(!confetti.is_active);
        assert!(confetti.particles.is_empty());
    }

    #[test]
    fn off_panel_particles_are_not_visible() {
        let mut confetti = Confetti::new();
        confetti.start(40, 20);
        for p in &mut confetti.particles {
            p.x = -5.0;
        }
        assert_eq!(confetti.visible_particles().count(), 0);
    }
}
