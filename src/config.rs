//! User configuration: key bindings, parallax and spring tuning, persistence.
//!
//! Stored as a simple `key = value` text file at
//! `$XDG_CONFIG_HOME/reelview/config.toml` (default `~/.config/reelview/config.toml`).
//! Unknown keys are ignored and numeric values are clamped, so a hand-edited
//! file can never put the engine outside its working range.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::geometry::ParallaxStyle;
use crate::core::spring::SpringTiming;

/// Live BBC test card, the stream the player opens by default.
pub const DEFAULT_MEDIA_URL: &str = "https://rdmedia.bbc.co.uk/testcard/simulcast/manifests/avc-full.m3u8";

// ───────────────────────────────────────── actions ───────────

/// Every bindable user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Expand,
    Dismiss,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Expand,
        Action::Dismiss,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Expand => "expand",
            Action::Dismiss => "dismiss",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Key code plus the CTRL/ALT/SHIFT part of the modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Short form for the status bar (`"↑"`, `"Ctrl+c"`, `"Enter"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Config-file form (`"Up"`, `"Ctrl+c"`, `"Enter"`).
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        for (flag, label) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(label);
            }
        }
        let name = match (self.code, pretty) {
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Char(' '), _) => "Space".into(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Left, _) => "Left".into(),
            (KeyCode::Right, _) => "Right".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::Backspace, _) => "Backspace".into(),
            (KeyCode::Home, _) => "Home".into(),
            (KeyCode::End, _) => "End".into(),
            (KeyCode::PageUp, _) => "PageUp".into(),
            (KeyCode::PageDown, _) => "PageDown".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&name);
        s
    }

    /// Parse `"Ctrl+c"`, `"Up"`, `"q"`, `"Enter"`, `"F5"`.
    fn parse(s: &str) -> Option<Self> {
        let (mods, key) = if s.len() > 1 && s.ends_with("++") {
            (&s[..s.len() - 2], "+")
        } else {
            match s.rfind('+') {
                // A lone "+" is the plus key itself.
                Some(i) if i + 1 < s.len() => (&s[..i], &s[i + 1..]),
                _ => ("", s),
            }
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let code = match key.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.len() > 1 && k.starts_with('f') => KeyCode::F(k[1..].parse().ok()?),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub min_scale: f64,
    pub max_padding: f64,
    pub spring_duration_ms: u64,
    pub damping_ratio: f64,
    /// Animation scheduler ticks per second.
    pub frame_rate: u32,
    /// Points moved per scroll key press / wheel notch.
    pub scroll_step: f64,
    pub media_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let style = ParallaxStyle::default();
        let timing = SpringTiming::default();
        Self {
            bindings: Self::default_bindings(),
            min_scale: style.min_scale,
            max_padding: style.max_padding,
            spring_duration_ms: timing.duration.as_millis() as u64,
            damping_ratio: timing.damping_ratio,
            frame_rate: 60,
            scroll_step: 24.0,
            media_url: DEFAULT_MEDIA_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        HashMap::from([
            (ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]),
            (ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]),
            (Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]),
            (Action::PageDown, vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)]),
            (Expand, vec![KeyBind::new(Enter, n), KeyBind::new(Char('f'), n)]),
            (Dismiss, vec![KeyBind::new(Esc, n), KeyBind::new(Backspace, n)]),
            (Quit, vec![KeyBind::new(Char('q'), n)]),
        ])
    }

    /// Action bound to `event`; the binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self, fullscreen: bool) -> String {
        if fullscreen {
            format!(
                "{}/click: exit fullscreen | {}: quit",
                self.short_binding(Action::Dismiss),
                self.short_binding(Action::Quit),
            )
        } else {
            format!(
                "{}/{}/wheel: scroll | {}/click video: fullscreen | {}: quit",
                self.short_binding(Action::ScrollUp),
                self.short_binding(Action::ScrollDown),
                self.short_binding(Action::Expand),
                self.short_binding(Action::Quit),
            )
        }
    }

    pub fn parallax_style(&self) -> ParallaxStyle {
        ParallaxStyle {
            min_scale: self.min_scale,
            max_padding: self.max_padding,
        }
    }

    pub fn spring_timing(&self) -> SpringTiming {
        SpringTiming {
            duration: Duration::from_millis(self.spring_duration_ms),
            damping_ratio: self.damping_ratio,
            ..SpringTiming::default()
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate))
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            let applied = match key {
                "min_scale" => value.parse::<f64>().map(|v| config.min_scale = v.clamp(0.1, 1.0)).is_ok(),
                "max_padding" => value.parse::<f64>().map(|v| config.max_padding = v.clamp(0.0, 64.0)).is_ok(),
                "spring_duration_ms" => value
                    .parse::<u64>()
                    .map(|v| config.spring_duration_ms = v.clamp(100, 5000))
                    .is_ok(),
                "damping_ratio" => value.parse::<f64>().map(|v| config.damping_ratio = v.clamp(0.1, 2.0)).is_ok(),
                "frame_rate" => value.parse::<u32>().map(|v| config.frame_rate = v.clamp(10, 240)).is_ok(),
                "scroll_step" => value.parse::<f64>().map(|v| config.scroll_step = v.clamp(1.0, 400.0)).is_ok(),
                "media_url" => {
                    config.media_url = value.to_string();
                    true
                }
                _ => match Action::from_config_key(key) {
                    Some(action) => {
                        let parsed: Vec<KeyBind> = value
                            .split(',')
                            .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                            .collect();
                        if !parsed.is_empty() {
                            config.bindings.insert(action, parsed);
                        }
                        true
                    }
                    None => true,
                },
            };
            if !applied {
                tracing::warn!(key, value, "ignoring unparsable config value");
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# reelview configuration".to_string(),
            String::new(),
            "# Parallax".to_string(),
            format!("min_scale = {}", self.min_scale),
            format!("max_padding = {}", self.max_padding),
            format!("scroll_step = {}", self.scroll_step),
            String::new(),
            "# Transition".to_string(),
            format!("spring_duration_ms = {}", self.spring_duration_ms),
            format!("damping_ratio = {}", self.damping_ratio),
            format!("frame_rate = {}", self.frame_rate),
            String::new(),
            format!("media_url = \"{}\"", self.media_url),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `$XDG_CONFIG_HOME/reelview/config.toml`.
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("reelview").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_match_the_engine_defaults() {
        let c = AppConfig::default();
        assert_eq!(c.parallax_style(), ParallaxStyle::default());
        assert_eq!(c.spring_timing(), SpringTiming::default());
        assert_eq!(c.media_url, DEFAULT_MEDIA_URL);
        assert_eq!(c.match_key(key(KeyCode::Enter)), Some(Action::Expand));
        assert_eq!(c.match_key(key(KeyCode::Esc)), Some(Action::Dismiss));
    }

    #[test]
    fn parse_clamps_and_ignores_junk() {
        let c = AppConfig::parse(
            "# comment\n\
             min_scale = 0.01\n\
             damping_ratio = 9\n\
             frame_rate = abc\n\
             spring_duration_ms = 750\n\
             unknown_key = 1\n\
             media_url = \"https://example.invalid/x.m3u8\"\n",
        );
        assert_eq!(c.min_scale, 0.1);
        assert_eq!(c.damping_ratio, 2.0);
        assert_eq!(c.frame_rate, 60);
        assert_eq!(c.spring_timing().duration, Duration::from_millis(750));
        assert_eq!(c.media_url, "https://example.invalid/x.m3u8");
    }

    #[test]
    fn bindings_parse_with_modifiers() {
        let c = AppConfig::parse("expand = Ctrl+e, F2\nquit = Ctrl+Shift+x");
        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(c.match_key(ctrl_e), Some(Action::Expand));
        assert_eq!(c.match_key(key(KeyCode::F(2))), Some(Action::Expand));
        assert_eq!(c.match_key(key(KeyCode::Enter)), None);
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(c.match_key(x), Some(Action::Quit));
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut c = AppConfig::default();
        c.min_scale = 0.5;
        c.bindings.insert(Action::Dismiss, vec![KeyBind::new(KeyCode::Char('+'), KeyModifiers::ALT)]);
        let back = AppConfig::parse(&c.serialise());
        assert_eq!(back, c);
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut c = AppConfig::default();
        c.scroll_step = 40.0;
        c.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), c);
        assert_eq!(AppConfig::load_from(&dir.path().join("missing.toml")), AppConfig::default());
    }
}
