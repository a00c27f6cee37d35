//! Engine configuration loaded from an INI file.
//!
//! Missing files or keys keep the defaults, so a bare checkout runs.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 640
//! height = 360
//! scale = 2
//! title = stagehand
//!
//! [engine]
//! time_rate = 1.0
//! target_fps = 60
//! debug_colliders = false
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;
use log::info;
use thiserror::Error;

const DEFAULT_WINDOW_WIDTH: u32 = 640;
const DEFAULT_WINDOW_HEIGHT: u32 = 360;
const DEFAULT_WINDOW_SCALE: u32 = 2;
const DEFAULT_TITLE: &str = "stagehand";
const DEFAULT_TIME_RATE: f32 = 1.0;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    Load(String),
    #[error("failed to save config file: {0}")]
    Save(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Logical window width in pixels, before `scale`.
    pub window_width: u32,
    pub window_height: u32,
    /// Integer pixel scale applied by the window backend.
    pub scale: u32,
    pub title: String,
    /// Multiplier from raw to scaled delta time.
    pub time_rate: f32,
    pub target_fps: u32,
    /// Outline actor colliders after each frame.
    pub debug_colliders: bool,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            scale: DEFAULT_WINDOW_SCALE,
            title: DEFAULT_TITLE.to_string(),
            time_rate: DEFAULT_TIME_RATE,
            target_fps: DEFAULT_TARGET_FPS,
            debug_colliders: false,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load `config_path`. Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(ConfigError::Load)?;
        self.apply(&ini);
        info!(
            "Loaded config from {:?}: {}x{} x{}, time_rate={}, fps={}, debug_colliders={}",
            self.config_path,
            self.window_width,
            self.window_height,
            self.scale,
            self.time_rate,
            self.target_fps,
            self.debug_colliders
        );
        Ok(())
    }

    /// Same as [`load_from_file`](Self::load_from_file) for in-memory text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(ConfigError::Load)?;
        self.apply(&ini);
        Ok(())
    }

    fn apply(&mut self, ini: &Ini) {
        // [window]
        if let Some(width) = ini.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = ini.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(scale) = ini.getuint("window", "scale").ok().flatten() {
            self.scale = (scale as u32).max(1);
        }
        if let Some(title) = ini.get("window", "title") {
            self.title = title;
        }

        // [engine]
        if let Some(rate) = ini.getfloat("engine", "time_rate").ok().flatten() {
            self.time_rate = (rate as f32).max(0.0);
        }
        if let Some(fps) = ini.getuint("engine", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(debug) = ini.getbool("engine", "debug_colliders").ok().flatten() {
            self.debug_colliders = debug;
        }
    }

    /// Save to `config_path`, creating the file if needed.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();

        ini.set("window", "width", Some(self.window_width.to_string()));
        ini.set("window", "height", Some(self.window_height.to_string()));
        ini.set("window", "scale", Some(self.scale.to_string()));
        ini.set("window", "title", Some(self.title.clone()));

        ini.set("engine", "time_rate", Some(self.time_rate.to_string()));
        ini.set("engine", "target_fps", Some(self.target_fps.to_string()));
        ini.set(
            "engine",
            "debug_colliders",
            Some(self.debug_colliders.to_string()),
        );

        ini.write(&self.config_path)?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Physical window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width * self.scale, self.window_height * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.time_rate, 1.0);
        assert_eq!(config.window_size(), (1280, 720));
        assert!(!config.debug_colliders);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut config = EngineConfig::new();
        config
            .load_from_str("[engine]\ntime_rate = 0.5\ndebug_colliders = true\n")
            .expect("parses");
        assert_eq!(config.time_rate, 0.5);
        assert!(config.debug_colliders);
        assert_eq!(config.window_width, DEFAULT_WINDOW_WIDTH);
        assert_eq!(config.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_window_section() {
        let mut config = EngineConfig::new();
        config
            .load_from_str("[window]\nwidth = 320\nheight = 200\nscale = 0\ntitle = demo\n")
            .expect("parses");
        assert_eq!(config.window_size(), (320, 200));
        assert_eq!(config.title, "demo");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = EngineConfig::with_path("/nonexistent/stagehand.ini");
        assert!(matches!(
            config.load_from_file(),
            Err(ConfigError::Load(_))
        ));
        assert_eq!(config.time_rate, DEFAULT_TIME_RATE);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("stagehand-{}.ini", std::process::id()));
        let mut config = EngineConfig::with_path(&path);
        config.time_rate = 0.25;
        config.target_fps = 30;
        config.save_to_file().expect("writes");

        let mut loaded = EngineConfig::with_path(&path);
        loaded.load_from_file().expect("reads");
        assert_eq!(loaded.time_rate, 0.25);
        assert_eq!(loaded.target_fps, 30);
        let _ = std::fs::remove_file(&path);
    }
}
