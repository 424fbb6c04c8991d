use crate::{
    animation::{Color, WaveParameters},
    controls::KeyBindingsConfig,
};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// The configuration file name looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct Config {
    /// The grid dimensions.
    pub grid: GridConfig,

    /// The wave animation constants.
    pub animation: AnimationConfig,

    /// How the grid is fit into the terminal.
    pub layout: LayoutConfig,

    /// The colors used.
    pub theme: ThemeConfig,

    /// The keys bound to every control.
    pub bindings: KeyBindingsConfig,
}

impl Config {
    /// Load the config from the given path or from the default location.
    ///
    /// An explicitly given file must exist. If no path is given and there's no config file in the
    /// default location, the default config is used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let contents = fs::read_to_string(&path).map_err(|e| ConfigLoadError::Io(path.clone(), e))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a config from its YAML contents.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigLoadError> {
        // An empty document deserializes as null rather than as an empty map
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The path where the config file is looked up by default.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "wavegrid")?;
        Some(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let GridConfig { columns, rows, trail } = self.grid;
        if columns < 2 {
            return Err(InvalidConfig::new("grid.columns", "must be at least 2"));
        }
        if rows < 1 {
            return Err(InvalidConfig::new("grid.rows", "must be at least 1"));
        }
        if trail < 1 {
            return Err(InvalidConfig::new("grid.trail", "must be at least 1"));
        }

        let animation = &self.animation;
        if animation.min_speed.is_nan() || animation.min_speed <= 0.0 {
            return Err(InvalidConfig::new("animation.min_speed", "must be positive"));
        }
        if !animation.max_speed.is_finite() {
            return Err(InvalidConfig::new("animation.max_speed", "must be a finite number"));
        }
        if animation.max_speed < animation.min_speed {
            return Err(InvalidConfig::new("animation.max_speed", "must not be lower than min_speed"));
        }
        if !(animation.min_speed..=animation.max_speed).contains(&animation.initial_speed) {
            return Err(InvalidConfig::new("animation.initial_speed", "must be between min_speed and max_speed"));
        }
        if animation.speed_factor.is_nan() || animation.speed_factor <= 1.0 {
            return Err(InvalidConfig::new("animation.speed_factor", "must be greater than 1"));
        }
        if !(0.0..360.0).contains(&animation.initial_hue) {
            return Err(InvalidConfig::new("animation.initial_hue", "must be in [0, 360)"));
        }
        if !animation.hue_step.is_finite() {
            return Err(InvalidConfig::new("animation.hue_step", "must be a number"));
        }
        if !(animation.hue_easing > 0.0 && animation.hue_easing <= 1.0) {
            return Err(InvalidConfig::new("animation.hue_easing", "must be in (0, 1]"));
        }
        if animation.frame_rate == 0 {
            return Err(InvalidConfig::new("animation.frame_rate", "must be at least 1"));
        }

        let fraction = self.layout.viewport_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(InvalidConfig::new("layout.viewport_fraction", "must be in (0, 1]"));
        }
        Ok(())
    }

    /// The parameters for the wave animator.
    pub fn wave_parameters(&self) -> WaveParameters {
        WaveParameters {
            columns: self.grid.columns,
            rows: self.grid.rows,
            trail: self.grid.trail,
            initial_speed: self.animation.initial_speed,
            min_speed: self.animation.min_speed,
            max_speed: self.animation.max_speed,
            speed_factor: self.animation.speed_factor,
            initial_hue: self.animation.initial_hue,
            hue_step: self.animation.hue_step,
            hue_easing: self.animation.hue_easing,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct GridConfig {
    /// The number of columns the wave travels across.
    pub columns: usize,

    /// The number of rows.
    pub rows: usize,

    /// The number of columns behind the wave front that stay lit.
    pub trail: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        let parameters = WaveParameters::default();
        Self { columns: parameters.columns, rows: parameters.rows, trail: parameters.trail }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct AnimationConfig {
    /// The number of columns the wave moves per frame at startup and after a reset.
    pub initial_speed: f32,

    /// The lowest speed reachable by slowing down.
    pub min_speed: f32,

    /// The highest speed reachable by speeding up.
    pub max_speed: f32,

    /// The factor applied to the speed when speeding up or slowing down.
    pub speed_factor: f32,

    /// The hue the wave starts with.
    pub initial_hue: f32,

    /// The number of degrees the hue rotates on every bounce.
    pub hue_step: f32,

    /// The fraction of the remaining hue difference covered every frame.
    pub hue_easing: f32,

    /// The number of frames drawn per second.
    pub frame_rate: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let parameters = WaveParameters::default();
        Self {
            initial_speed: parameters.initial_speed,
            min_speed: parameters.min_speed,
            max_speed: parameters.max_speed,
            speed_factor: parameters.speed_factor,
            initial_hue: parameters.initial_hue,
            hue_step: parameters.hue_step,
            hue_easing: parameters.hue_easing,
            frame_rate: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct LayoutConfig {
    /// The fraction of the terminal's width and height the grid may use.
    pub viewport_fraction: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { viewport_fraction: 0.7 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct ThemeConfig {
    /// The color of cells the wave isn't on.
    #[cfg_attr(feature = "json-schema", schemars(with = "String"))]
    pub background: Color,

    /// The color behind the grid, seen through the gaps between cells and the fading trail.
    #[cfg_attr(feature = "json-schema", schemars(with = "String"))]
    pub surface: Color,

    /// The color of the bounce counter.
    #[cfg_attr(feature = "json-schema", schemars(with = "String"))]
    pub text: Color,

    /// The color of labels and the control bar.
    #[cfg_attr(feature = "json-schema", schemars(with = "String"))]
    pub label: Color,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: Color::new(0xf0, 0xf0, 0xf0),
            surface: Color::new(0xff, 0xff, 0xff),
            text: Color::new(0x11, 0x18, 0x27),
            label: Color::new(0x6b, 0x72, 0x80),
        }
    }
}

/// An invalid value in the config.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid value for '{field}': {reason}")]
pub struct InvalidConfig {
    pub field: &'static str,
    pub reason: &'static str,
}

impl InvalidConfig {
    fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Errors that can occur when loading the config
#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config file {0:?}: {1}")]
    Io(PathBuf, io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] InvalidConfig),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::KeyBinding;
    use crossterm::event::KeyCode;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn defaults_match_wave_constants() {
        let config = Config::default();
        assert_eq!(config.wave_parameters(), WaveParameters::default());
        assert_eq!(config.animation.frame_rate, 60);
        assert_eq!(config.layout.viewport_fraction, 0.7);
        assert_eq!(config.theme.background, Color::new(240, 240, 240));
        config.validate().expect("default config is invalid");
    }

    #[test]
    fn empty_document() {
        assert_eq!(Config::from_yaml("").expect("parse failed"), Config::default());
        assert_eq!(Config::from_yaml("  \n").expect("parse failed"), Config::default());
    }

    #[test]
    fn partial_document() {
        let contents = r##"
grid:
  columns: 30
animation:
  initial_speed: 0.5
theme:
  background: "#000000"
bindings:
  reset: [Space]
"##;
        let config = Config::from_yaml(contents).expect("parse failed");
        assert_eq!(config.grid.columns, 30);
        assert_eq!(config.grid.rows, 15);
        assert_eq!(config.animation.initial_speed, 0.5);
        assert_eq!(config.animation.max_speed, 1.0);
        assert_eq!(config.theme.background, Color::new(0, 0, 0));
        assert_eq!(config.theme.surface, Color::new(255, 255, 255));
        assert_eq!(config.bindings.reset, vec![KeyBinding::new(KeyCode::Char(' '))]);
    }

    #[rstest]
    #[case::columns("grid: { columns: 1 }", "grid.columns")]
    #[case::rows("grid: { rows: 0 }", "grid.rows")]
    #[case::trail("grid: { trail: 0 }", "grid.trail")]
    #[case::min_speed("animation: { min_speed: 0 }", "animation.min_speed")]
    #[case::max_speed("animation: { max_speed: 0.01 }", "animation.max_speed")]
    #[case::initial_speed("animation: { initial_speed: 2.0 }", "animation.initial_speed")]
    #[case::speed_factor("animation: { speed_factor: 1.0 }", "animation.speed_factor")]
    #[case::initial_hue("animation: { initial_hue: 360 }", "animation.initial_hue")]
    #[case::hue_easing("animation: { hue_easing: 0 }", "animation.hue_easing")]
    #[case::frame_rate("animation: { frame_rate: 0 }", "animation.frame_rate")]
    #[case::fraction("layout: { viewport_fraction: 1.5 }", "layout.viewport_fraction")]
    #[case::nan_fraction("layout: { viewport_fraction: .nan }", "layout.viewport_fraction")]
    #[case::nan_hue_easing("animation: { hue_easing: .nan }", "animation.hue_easing")]
    #[case::nan_speed_factor("animation: { speed_factor: .nan }", "animation.speed_factor")]
    #[case::nan_min_speed("animation: { min_speed: .nan }", "animation.min_speed")]
    #[case::infinite_max_speed("animation: { max_speed: .inf }", "animation.max_speed")]
    #[case::nan_initial_hue("animation: { initial_hue: .nan }", "animation.initial_hue")]
    fn invalid_values(#[case] contents: &str, #[case] field: &str) {
        match Config::from_yaml(contents).expect_err("parse succeeded") {
            ConfigLoadError::Invalid(error) => assert_eq!(error.field, field),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case::unknown_field("grid: { depth: 3 }")]
    #[case::bad_color("theme: { surface: \"#12\" }")]
    #[case::bad_binding("bindings: { quit: [hyper] }")]
    #[case::bad_type("grid: { columns: many }")]
    fn unparseable(#[case] contents: &str) {
        let error = Config::from_yaml(contents).expect_err("parse succeeded");
        assert!(matches!(error, ConfigLoadError::Parse(_)), "unexpected error: {error}");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create file");
        writeln!(file, "grid:\n  rows: 4").expect("write failed");
        let config = Config::load(Some(file.path())).expect("load failed");
        assert_eq!(config.grid.rows, 4);
    }

    #[test]
    fn explicit_missing_file() {
        let dir = tempfile::tempdir().expect("failed to create dir");
        let path = dir.path().join("missing.yaml");
        let error = Config::load(Some(&path)).expect_err("load succeeded");
        assert!(matches!(error, ConfigLoadError::Io(..)));
    }

    #[test]
    fn serialized_config_loads_back() {
        let config = Config::default();
        let contents = serde_yaml::to_string(&config).expect("serialize failed");
        assert_eq!(Config::from_yaml(&contents).expect("parse failed"), config);
    }
}
