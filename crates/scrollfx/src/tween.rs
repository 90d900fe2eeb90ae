use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("unknown easing '{0}'; expected linear, power1.out, power2.out or sine.inout")]
pub struct UnknownEasing(String);

/// Easing curves available to tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    #[default]
    Power1Out,
    Power2Out,
    SineInOut,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) * 0.5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Power1Out => "power1.out",
            Easing::Power2Out => "power2.out",
            Easing::SineInOut => "sine.inout",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" | "none" => Ok(Easing::Linear),
            "power1.out" | "power1" => Ok(Easing::Power1Out),
            "power2.out" | "power2" => Ok(Easing::Power2Out),
            "sine.inout" | "sine" => Ok(Easing::SineInOut),
            _ => Err(UnknownEasing(value.to_string())),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = UnknownEasing;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(value: Easing) -> Self {
        value.name().to_string()
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON)
    }

    fn value_at(&self, now: Instant) -> (f32, bool) {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return (self.to, true);
        }
        let mix = self.easing.sample(progress);
        (self.from + (self.to - self.from) * mix, false)
    }
}

/// A scalar that animates toward its latest target.
///
/// Starting a new tween overwrites the running one and departs from the
/// value the old tween had reached at that instant.
#[derive(Debug, Clone)]
pub struct Animated {
    value: f32,
    tween: Option<Tween>,
}

impl Animated {
    pub fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the value is heading; equals [`Animated::value`] when idle.
    pub fn target(&self) -> f32 {
        self.tween.map(|tween| tween.to).unwrap_or(self.value)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.tween = None;
    }

    pub fn animate_to(&mut self, target: f32, now: Instant, duration: Duration, easing: Easing) {
        let from = self.advance(now);
        if duration.is_zero() {
            self.set(target);
            return;
        }
        self.tween = Some(Tween {
            from,
            to: target,
            start: now,
            duration,
            easing,
        });
    }

    /// Samples the running tween at `now` and returns the current value.
    pub fn advance(&mut self, now: Instant) -> f32 {
        if let Some(tween) = self.tween {
            let (value, finished) = tween.value_at(now);
            self.value = value;
            if finished {
                self.tween = None;
            }
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easings_pin_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::Power1Out,
            Easing::Power2Out,
            Easing::SineInOut,
        ] {
            assert!((easing.sample(0.0)).abs() < 1e-6, "{easing} at 0");
            assert!((easing.sample(1.0) - 1.0).abs() < 1e-6, "{easing} at 1");
        }
    }

    #[test]
    fn power1_out_decelerates() {
        let easing = Easing::Power1Out;
        let early = easing.sample(0.25) - easing.sample(0.0);
        let late = easing.sample(1.0) - easing.sample(0.75);
        assert!(early > late);
        assert!((easing.sample(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn easing_names_round_trip_through_strings() {
        assert_eq!("power1.out".parse::<Easing>().unwrap(), Easing::Power1Out);
        assert_eq!(String::from(Easing::SineInOut), "sine.inout");
        assert!("bounce".parse::<Easing>().is_err());
    }

    #[test]
    fn tween_reaches_target_after_duration() {
        let start = Instant::now();
        let mut value = Animated::new(0.0);
        value.animate_to(4.0, start, Duration::from_millis(500), Easing::Power1Out);
        assert!(value.is_animating());
        assert_eq!(value.target(), 4.0);

        let midway = value.advance(start + Duration::from_millis(250));
        assert!(midway > 0.0 && midway < 4.0);

        assert_eq!(value.advance(start + Duration::from_millis(500)), 4.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn retarget_departs_from_current_value() {
        let start = Instant::now();
        let mut value = Animated::new(0.0);
        value.animate_to(1.0, start, Duration::from_millis(100), Easing::Linear);
        let half = start + Duration::from_millis(50);
        value.animate_to(0.0, half, Duration::from_millis(100), Easing::Linear);
        assert!((value.value() - 0.5).abs() < 1e-3);
        let quarter = value.advance(half + Duration::from_millis(50));
        assert!((quarter - 0.25).abs() < 1e-3);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut value = Animated::new(2.0);
        value.animate_to(3.0, Instant::now(), Duration::ZERO, Easing::Linear);
        assert_eq!(value.value(), 3.0);
        assert!(!value.is_animating());
    }
}
