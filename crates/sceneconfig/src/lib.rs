use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use scrollfx::{DriverOptions, Easing, Parameter, Setting, Settings};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneConfig {
    pub version: u32,
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub settings: BTreeMap<String, SettingOverride>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub ease: f32,
    pub snap: f32,
    /// Height of each section in viewport heights.
    pub section_height: f32,
    /// Logical pixels scrolled per mouse-wheel line.
    pub wheel_line: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            ease: scrollfx::DEFAULT_EASE,
            snap: scrollfx::DEFAULT_SNAP,
            section_height: 1.0,
            wheel_line: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Radians of Y rotation added each frame.
    pub spin: f32,
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub tween: Duration,
    pub easing: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            spin: 0.01,
            tween: default_tween(),
            easing: Easing::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MeshConfig {
    pub radius: f32,
    pub detail: u32,
    pub portrait_scale: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 64,
            portrait_scale: 0.75,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 10.0,
            distance: 2.5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    #[serde(
        deserialize_with = "deserialize_antialias_opt",
        serialize_with = "serialize_antialias_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub antialias: Option<AntialiasSetting>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PointerConfig {
    pub enabled: bool,
}

/// Partial override of one scroll-driven uniform; missing bounds keep the
/// built-in value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct SettingOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

impl AntialiasSetting {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Off => "off",
            Self::Samples2 => "2",
            Self::Samples4 => "4",
            Self::Samples8 => "8",
            Self::Samples16 => "16",
        }
    }
}

fn default_sections() -> Vec<String> {
    ["Logma", "Naos", "Chara"]
        .iter()
        .map(|title| title.to_string())
        .collect()
}

fn default_tween() -> Duration {
    Duration::from_millis(500)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_duration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

fn deserialize_antialias_opt<'de, D>(deserializer: D) -> Result<Option<AntialiasSetting>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Num(i64),
    }

    let helper: Option<Helper> = Option::deserialize(deserializer)?;
    let result = match helper {
        None => None,
        Some(Helper::Str(raw)) => Some(parse_antialias(&raw).map_err(de::Error::custom)?),
        Some(Helper::Num(value)) => {
            if value < 0 {
                return Err(de::Error::custom("antialias value must be non-negative"));
            }
            let raw = value.to_string();
            Some(parse_antialias(&raw).map_err(de::Error::custom)?)
        }
    };
    Ok(result)
}

fn serialize_antialias_opt<S>(
    value: &Option<AntialiasSetting>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(setting) => serializer.serialize_str(setting.as_str()),
        None => serializer.serialize_none(),
    }
}

fn parse_antialias(raw: &str) -> Result<AntialiasSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(AntialiasSetting::Auto),
        "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(AntialiasSetting::Off),
        "2" => Ok(AntialiasSetting::Samples2),
        "4" => Ok(AntialiasSetting::Samples4),
        "8" => Ok(AntialiasSetting::Samples8),
        "16" => Ok(AntialiasSetting::Samples16),
        other => Err(format!(
            "invalid antialias setting '{other}'; use auto/off or 2/4/8/16"
        )),
    }
}

impl std::str::FromStr for AntialiasSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_antialias(raw)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            version: 1,
            sections: default_sections(),
            scroll: ScrollConfig::default(),
            motion: MotionConfig::default(),
            mesh: MeshConfig::default(),
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
            pointer: PointerConfig::default(),
            settings: BTreeMap::new(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Built-in settings with every override from the `[settings]` table applied.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();
        for (key, patch) in &self.settings {
            let parameter: Parameter = key
                .parse()
                .map_err(|err| ConfigError::Invalid(format!("settings.{key}: {err}")))?;
            let current = settings.get(parameter);
            settings.set(
                parameter,
                Setting::new(
                    patch.start.unwrap_or(current.start),
                    patch.end.unwrap_or(current.end),
                ),
            );
        }
        Ok(settings)
    }

    /// Copy of this config with all six settings spelled out under their
    /// uniform names.
    pub fn resolved(&self) -> Result<Self, ConfigError> {
        let settings = self.settings()?;
        let mut resolved = self.clone();
        resolved.settings = settings
            .iter()
            .map(|(parameter, setting)| {
                (
                    parameter.uniform_name().to_string(),
                    SettingOverride {
                        start: Some(setting.start),
                        end: Some(setting.end),
                    },
                )
            })
            .collect();
        Ok(resolved)
    }

    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            ease: self.scroll.ease,
            snap: self.scroll.snap,
            spin: self.motion.spin,
            tween: self.motion.tween,
            easing: self.motion.easing,
            portrait_scale: self.mesh.portrait_scale,
            section_height: self.scroll.section_height,
            pointer: self.pointer.enabled,
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|err| ConfigError::Invalid(format!("failed to serialize config: {err}")))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.sections.is_empty() {
            return Err(ConfigError::Invalid(
                "config must define at least one section".into(),
            ));
        }
        if let Some(index) = self.sections.iter().position(|title| title.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "section {} has an empty title",
                index + 1
            )));
        }

        let scroll = &self.scroll;
        require_finite("scroll.ease", scroll.ease)?;
        if scroll.ease <= 0.0 || scroll.ease > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "scroll.ease must be in (0, 1], got {}",
                scroll.ease
            )));
        }
        require_finite("scroll.snap", scroll.snap)?;
        if scroll.snap < 0.0 {
            return Err(ConfigError::Invalid("scroll.snap must be >= 0".into()));
        }
        require_positive("scroll.section_height", scroll.section_height)?;
        require_positive("scroll.wheel_line", scroll.wheel_line)?;

        require_finite("motion.spin", self.motion.spin)?;

        require_positive("mesh.radius", self.mesh.radius)?;
        require_positive("mesh.portrait_scale", self.mesh.portrait_scale)?;
        if self.mesh.detail > 256 {
            return Err(ConfigError::Invalid(format!(
                "mesh.detail {} is too large; maximum is 256",
                self.mesh.detail
            )));
        }

        let camera = &self.camera;
        require_finite("camera.fov", camera.fov)?;
        if camera.fov <= 0.0 || camera.fov >= 180.0 {
            return Err(ConfigError::Invalid(format!(
                "camera.fov must be in (0, 180), got {}",
                camera.fov
            )));
        }
        require_positive("camera.near", camera.near)?;
        require_positive("camera.far", camera.far)?;
        if camera.near >= camera.far {
            return Err(ConfigError::Invalid(format!(
                "camera.near ({}) must be less than camera.far ({})",
                camera.near, camera.far
            )));
        }
        require_positive("camera.distance", camera.distance)?;

        let mut seen: BTreeMap<Parameter, &str> = BTreeMap::new();
        for (key, patch) in &self.settings {
            let parameter = key
                .parse::<Parameter>()
                .map_err(|err| ConfigError::Invalid(format!("settings.{key}: {err}")))?;
            if let Some(previous) = seen.insert(parameter, key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "settings.{key} and settings.{previous} both set {}",
                    parameter.uniform_name()
                )));
            }
            if let Some(start) = patch.start {
                require_finite(&format!("settings.{key}.start"), start)?;
            }
            if let Some(end) = patch.end {
                require_finite(&format!("settings.{key}.end"), end)?;
            }
        }

        Ok(())
    }
}

fn require_finite(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a finite number")))
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be greater than zero"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1
sections = ["Logma", "Naos", "Chara", "Epilogue"]

[scroll]
ease = 0.1
wheel_line = 60

[motion]
tween = "750ms"
easing = "sine.inout"

[render]
antialias = 4

[pointer]
enabled = true

[settings.uOpacity]
end = 0.9

[settings.deep_purple]
start = 0.5
end = 0.5
"#;

    #[test]
    fn parses_sample_config() {
        let config = SceneConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.version, 1);
        assert_eq!(config.sections.len(), 4);
        assert_eq!(config.scroll.ease, 0.1);
        assert_eq!(config.scroll.snap, scrollfx::DEFAULT_SNAP);
        assert_eq!(config.scroll.wheel_line, 60.0);
        assert_eq!(config.motion.tween, Duration::from_millis(750));
        assert_eq!(config.motion.easing, Easing::SineInOut);
        assert_eq!(config.render.antialias, Some(AntialiasSetting::Samples4));
        assert!(config.pointer.enabled);
        assert_eq!(config.camera.fov, 75.0);
    }

    #[test]
    fn applies_setting_overrides() {
        let config = SceneConfig::from_toml_str(SAMPLE).unwrap();
        let settings = config.settings().unwrap();
        assert_eq!(settings.get(Parameter::Opacity), Setting::new(0.1, 0.9));
        assert_eq!(settings.get(Parameter::DeepPurple), Setting::new(0.5, 0.5));
        assert_eq!(settings.get(Parameter::Frequency), Setting::new(0.0, 4.0));
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = SceneConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(config.sections, vec!["Logma", "Naos", "Chara"]);
        assert_eq!(config.settings().unwrap(), Settings::default());
        let options = config.driver_options();
        assert_eq!(options, DriverOptions::default());
    }

    #[test]
    fn rejects_unknown_setting() {
        let config = r#"
version = 1

[settings.uTime]
start = 0
end = 1
"#;
        let err = SceneConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_two_keys_for_one_uniform() {
        let config = r#"
version = 1

[settings.uOpacity]
end = 0.9

[settings.opacity]
end = 0.2
"#;
        let err = SceneConfig::from_toml_str(config).unwrap_err();
        match err {
            ConfigError::Invalid(message) => assert!(message.contains("uOpacity"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_out_of_range_ease() {
        let config = r#"
version = 1

[scroll]
ease = 1.5
"#;
        let err = SceneConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let config = r#"
version = 1

[camera]
near = 5.0
far = 1.0
"#;
        let err = SceneConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_easing() {
        let config = r#"
version = 1

[motion]
easing = "bounce"
"#;
        let err = SceneConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn resolved_config_round_trips() {
        let config = SceneConfig::from_toml_str(SAMPLE).unwrap();
        let resolved = config.resolved().unwrap();
        assert_eq!(resolved.settings.len(), Parameter::COUNT);
        let text = resolved.to_toml_string().unwrap();
        let reparsed = SceneConfig::from_toml_str(&text).expect("reparse resolved config");
        assert_eq!(reparsed.settings().unwrap(), config.settings().unwrap());
        assert_eq!(reparsed.motion.tween, Duration::from_millis(750));
    }
}
