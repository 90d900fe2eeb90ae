use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("unknown shader parameter '{0}'; expected one of uFrequency, uAmplitude, uDensity, uStrength, uDeepPurple, uOpacity")]
    Unknown(String),
}

/// Shader uniforms driven by the scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    Frequency,
    Amplitude,
    Density,
    Strength,
    DeepPurple,
    Opacity,
}

impl Parameter {
    pub const COUNT: usize = 6;

    pub const ALL: [Parameter; Parameter::COUNT] = [
        Parameter::Frequency,
        Parameter::Amplitude,
        Parameter::Density,
        Parameter::Strength,
        Parameter::DeepPurple,
        Parameter::Opacity,
    ];

    /// Name of the uniform as declared in the shader program.
    pub fn uniform_name(self) -> &'static str {
        match self {
            Parameter::Frequency => "uFrequency",
            Parameter::Amplitude => "uAmplitude",
            Parameter::Density => "uDensity",
            Parameter::Strength => "uStrength",
            Parameter::DeepPurple => "uDeepPurple",
            Parameter::Opacity => "uOpacity",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uniform_name())
    }
}

impl FromStr for Parameter {
    type Err = ParameterError;

    /// Accepts the uniform name (`uDeepPurple`) or its bare form (`deep_purple`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "ufrequency" | "frequency" => Ok(Parameter::Frequency),
            "uamplitude" | "amplitude" => Ok(Parameter::Amplitude),
            "udensity" | "density" => Ok(Parameter::Density),
            "ustrength" | "strength" => Ok(Parameter::Strength),
            "udeeppurple" | "deeppurple" => Ok(Parameter::DeepPurple),
            "uopacity" | "opacity" => Ok(Parameter::Opacity),
            _ => Err(ParameterError::Unknown(value.to_string())),
        }
    }
}

/// Values a uniform takes at the top (`start`) and bottom (`end`) of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub start: f32,
    pub end: f32,
}

impl Setting {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// A setting whose uniform never moves with the scroll position.
    pub fn is_static(&self) -> bool {
        self.start == self.end
    }

    /// Linear interpolation; returns `start` and `end` exactly at the bounds.
    pub fn value_at(&self, normalized: f32) -> f32 {
        if normalized <= 0.0 {
            self.start
        } else if normalized >= 1.0 {
            self.end
        } else {
            self.start + normalized * (self.end - self.start)
        }
    }
}

/// The six scroll-driven settings, one per [`Parameter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    entries: [Setting; Parameter::COUNT],
}

impl Settings {
    pub fn get(&self, parameter: Parameter) -> Setting {
        self.entries[parameter.index()]
    }

    pub fn set(&mut self, parameter: Parameter, setting: Setting) {
        self.entries[parameter.index()] = setting;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, Setting)> + '_ {
        Parameter::ALL
            .iter()
            .map(move |parameter| (*parameter, self.get(*parameter)))
    }

    /// Uniform values before any scrolling has happened.
    pub fn initial_uniforms(&self) -> UniformValues {
        let mut values = UniformValues::zeroed();
        for (parameter, setting) in self.iter() {
            values.set(parameter, setting.start);
        }
        values
    }

    /// Maps a normalized scroll position to uniform targets, skipping
    /// parameters whose start and end coincide.
    pub fn map(&self, normalized: f32) -> Vec<(Parameter, f32)> {
        self.iter()
            .filter(|(_, setting)| !setting.is_static())
            .map(|(parameter, setting)| (parameter, setting.value_at(normalized)))
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut entries = [Setting::new(0.0, 0.0); Parameter::COUNT];
        entries[Parameter::Frequency.index()] = Setting::new(0.0, 4.0);
        entries[Parameter::Amplitude.index()] = Setting::new(4.0, 4.0);
        entries[Parameter::Density.index()] = Setting::new(1.0, 1.0);
        entries[Parameter::Strength.index()] = Setting::new(0.0, 1.1);
        entries[Parameter::DeepPurple.index()] = Setting::new(1.0, 0.0);
        entries[Parameter::Opacity.index()] = Setting::new(0.1, 0.66);
        Self { entries }
    }
}

/// Current value of every scroll-driven uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformValues {
    values: [f32; Parameter::COUNT],
}

impl UniformValues {
    pub fn zeroed() -> Self {
        Self {
            values: [0.0; Parameter::COUNT],
        }
    }

    pub fn get(&self, parameter: Parameter) -> f32 {
        self.values[parameter.index()]
    }

    pub fn set(&mut self, parameter: Parameter, value: f32) {
        self.values[parameter.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f32)> + '_ {
        Parameter::ALL
            .iter()
            .map(move |parameter| (*parameter, self.get(*parameter)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uniform_and_bare_names() {
        assert_eq!(
            "uDeepPurple".parse::<Parameter>().unwrap(),
            Parameter::DeepPurple
        );
        assert_eq!(
            "deep_purple".parse::<Parameter>().unwrap(),
            Parameter::DeepPurple
        );
        assert_eq!("Opacity".parse::<Parameter>().unwrap(), Parameter::Opacity);
        assert!(matches!(
            "uTime".parse::<Parameter>(),
            Err(ParameterError::Unknown(_))
        ));
    }

    #[test]
    fn mapper_is_exact_at_bounds() {
        let settings = Settings::default();
        for (parameter, value) in settings.map(0.0) {
            assert_eq!(value, settings.get(parameter).start);
        }
        for (parameter, value) in settings.map(1.0) {
            assert_eq!(value, settings.get(parameter).end);
        }
    }

    #[test]
    fn mapper_is_linear() {
        let setting = Setting::new(0.1, 0.66);
        let quarter = setting.value_at(0.25);
        let half = setting.value_at(0.5);
        let three_quarters = setting.value_at(0.75);
        assert!((half - 0.38).abs() < 1e-6);
        assert!(((half - quarter) - (three_quarters - half)).abs() < 1e-6);
    }

    #[test]
    fn mapper_skips_static_settings() {
        let settings = Settings::default();
        let mapped: Vec<Parameter> = settings
            .map(0.5)
            .into_iter()
            .map(|(parameter, _)| parameter)
            .collect();
        assert_eq!(
            mapped,
            vec![
                Parameter::Frequency,
                Parameter::Strength,
                Parameter::DeepPurple,
                Parameter::Opacity
            ]
        );
    }

    #[test]
    fn initial_uniforms_use_start_values() {
        let settings = Settings::default();
        let uniforms = settings.initial_uniforms();
        assert_eq!(uniforms.get(Parameter::Frequency), 0.0);
        assert_eq!(uniforms.get(Parameter::Amplitude), 4.0);
        assert_eq!(uniforms.get(Parameter::DeepPurple), 1.0);
        assert_eq!(uniforms.get(Parameter::Opacity), 0.1);
    }
}
