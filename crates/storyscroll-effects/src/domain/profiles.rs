//! Emission profiles: what each celebration variant actually emits.
//!
//! A plan is a list of particle emissions with their start delays. The
//! renderer schedules them; particle physics stays with the drawing layer.

use serde::Serialize;
use storyscroll_core::rng::DeterministicRng;

use super::dispatcher::EffectVariant;

/// Particle shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleShape {
    /// Default confetti squares and circles.
    Confetti,
    /// Heart outline.
    Heart,
}

/// Normalized emitter origin; `(0, 0)` is the viewport's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Origin {
    /// Horizontal position in `[0, 1]`.
    pub x: f64,
    /// Vertical position in `[0, 1]`.
    pub y: f64,
}

/// One call into the particle system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emission {
    /// Delay after the activation edge, in milliseconds.
    pub delay_ms: u32,
    /// Number of particles.
    pub particle_count: u32,
    /// Emitter position.
    pub origin: Origin,
    /// Spread angle in degrees.
    pub spread: f64,
    /// Initial particle speed.
    pub start_velocity: f64,
    /// Per-tick velocity decay.
    pub decay: f64,
    /// Gravity multiplier.
    pub gravity: f64,
    /// Particle size multiplier.
    pub scalar: f64,
    /// Particle lifetime in animation ticks.
    pub ticks: u32,
    /// Particle shape.
    pub shape: ParticleShape,
}

impl Emission {
    fn base(origin: Origin) -> Self {
        Self {
            delay_ms: 0,
            particle_count: 0,
            origin,
            spread: 45.0,
            start_velocity: 45.0,
            decay: 0.9,
            gravity: 1.0,
            scalar: 1.0,
            ticks: 200,
            shape: ParticleShape::Confetti,
        }
    }
}

/// Everything one activation emits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectPlan {
    /// The variant this plan renders.
    pub variant: EffectVariant,
    /// Emissions in start order.
    pub emissions: Vec<Emission>,
    /// Palette shared by every emission.
    pub colors: &'static [&'static str],
}

impl EffectPlan {
    /// Total particles across all emissions.
    #[must_use]
    pub fn particle_total(&self) -> u32 {
        self.emissions.iter().map(|e| e.particle_count).sum()
    }

    /// Delay of the last emission, in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u32 {
        self.emissions.iter().map(|e| e.delay_ms).max().unwrap_or(0)
    }
}

const BURST_COLORS: &[&str] = &[
    "#E86A6A", "#FF69B4", "#F6C7C3", "#FFF0F5", "#F9B1B1", "#FFB6C1", "#ff0000",
];
const HEART_COLORS: &[&str] = &["#E86A6A", "#FF69B4", "#F6C7C3", "#F9B1B1", "#FFB6C1"];
const FIREWORK_COLORS: &[&str] = &["#E86A6A", "#FF69B4", "#F6C7C3", "#FFF0F5", "#F9B1B1", "#FFB6C1"];

const BURST_PARTICLES: f64 = 200.0;
const FIREWORKS_DURATION_MS: u32 = 3000;
const FIREWORKS_INTERVAL_MS: u32 = 250;
const FIREWORKS_PEAK_PARTICLES: f64 = 50.0;
const HEARTS_PULSE_DELAY_MS: u32 = 200;

/// Builds the emission plan for `variant`.
#[must_use]
pub fn plan_for(variant: EffectVariant, rng: &mut dyn DeterministicRng) -> EffectPlan {
    match variant {
        EffectVariant::Burst => burst(),
        EffectVariant::Hearts => hearts(),
        EffectVariant::Fireworks => fireworks(rng),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn burst_share(ratio: f64) -> u32 {
    (BURST_PARTICLES * ratio).floor() as u32
}

fn burst() -> EffectPlan {
    let origin = Origin { x: 0.5, y: 0.6 };
    let fan = |ratio: f64, spread: f64| Emission {
        particle_count: burst_share(ratio),
        spread,
        ..Emission::base(origin)
    };

    let emissions = vec![
        Emission {
            start_velocity: 55.0,
            ..fan(0.25, 26.0)
        },
        fan(0.2, 60.0),
        Emission {
            decay: 0.91,
            scalar: 0.8,
            ..fan(0.35, 100.0)
        },
        Emission {
            start_velocity: 25.0,
            decay: 0.92,
            scalar: 1.2,
            ..fan(0.1, 120.0)
        },
        Emission {
            start_velocity: 45.0,
            ..fan(0.1, 120.0)
        },
    ];

    EffectPlan {
        variant: EffectVariant::Burst,
        emissions,
        colors: BURST_COLORS,
    }
}

fn hearts() -> EffectPlan {
    let heart = |particle_count: u32, x: f64, y: f64, delay_ms: u32| Emission {
        delay_ms,
        particle_count,
        spread: 360.0,
        start_velocity: 20.0,
        decay: 0.94,
        gravity: 0.4,
        scalar: 2.0,
        ticks: 100,
        shape: ParticleShape::Heart,
        ..Emission::base(Origin { x, y })
    };

    EffectPlan {
        variant: EffectVariant::Hearts,
        emissions: vec![
            heart(30, 0.3, 0.5, 0),
            heart(30, 0.7, 0.5, 0),
            heart(20, 0.5, 0.3, HEARTS_PULSE_DELAY_MS),
        ],
        colors: HEART_COLORS,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fireworks(rng: &mut dyn DeterministicRng) -> EffectPlan {
    let duration = f64::from(FIREWORKS_DURATION_MS);
    let mut emissions = Vec::new();
    let mut delay_ms = FIREWORKS_INTERVAL_MS;

    // Particle count tapers linearly with the time left.
    while delay_ms < FIREWORKS_DURATION_MS {
        let remaining = duration - f64::from(delay_ms);
        let particle_count = (FIREWORKS_PEAK_PARTICLES * remaining / duration).floor() as u32;
        let origin = Origin {
            x: rng.next_f64() * 0.6 + 0.2,
            y: rng.next_f64() * 0.4 + 0.2,
        };
        emissions.push(Emission {
            delay_ms,
            particle_count,
            spread: 360.0,
            start_velocity: 30.0,
            ticks: 60,
            ..Emission::base(origin)
        });
        delay_ms += FIREWORKS_INTERVAL_MS;
    }

    EffectPlan {
        variant: EffectVariant::Fireworks,
        emissions,
        colors: FIREWORK_COLORS,
    }
}

#[cfg(test)]
mod tests {
    use storyscroll_test_support::{MockRng, SequenceRng};

    use super::*;

    #[test]
    fn test_burst_fans_out_two_hundred_particles() {
        let plan = plan_for(EffectVariant::Burst, &mut MockRng);

        assert_eq!(plan.emissions.len(), 5);
        assert_eq!(plan.particle_total(), 200);
        assert_eq!(plan.duration_ms(), 0);
        assert!(plan.emissions.iter().all(|e| (e.origin.y - 0.6).abs() < f64::EPSILON));
    }

    #[test]
    fn test_hearts_pulse_follows_twin_emitters() {
        let plan = plan_for(EffectVariant::Hearts, &mut MockRng);

        let delays: Vec<u32> = plan.emissions.iter().map(|e| e.delay_ms).collect();
        assert_eq!(delays, vec![0, 0, 200]);
        assert_eq!(plan.particle_total(), 80);
        assert!(plan.emissions.iter().all(|e| e.shape == ParticleShape::Heart));
    }

    #[test]
    fn test_fireworks_taper_over_three_seconds() {
        // Arrange
        let mut rng = MockRng;

        // Act
        let plan = plan_for(EffectVariant::Fireworks, &mut rng);

        // Assert
        assert_eq!(plan.emissions.len(), 11);
        assert_eq!(plan.duration_ms(), 2750);
        let counts: Vec<u32> = plan.emissions.iter().map(|e| e.particle_count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(counts[0], 45);
    }

    #[test]
    fn test_fireworks_origins_stay_in_launch_window() {
        let mut rng = SequenceRng::new(vec![0.0, 0.999, 0.5, 0.25]);

        let plan = plan_for(EffectVariant::Fireworks, &mut rng);

        for emission in &plan.emissions {
            assert!((0.2..0.8).contains(&emission.origin.x));
            assert!((0.2..0.6).contains(&emission.origin.y));
        }
        assert!((plan.emissions[0].origin.x - 0.2).abs() < 1e-9);
    }
}
