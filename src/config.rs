//! Construction settings: config file, environment, then command line.
//!
//! Format of `~/.config/notify-hud/config.toml`:
//! ```toml
//! uri = "wss://proxy.example.com/socket/out?clientId=me&topic=alerts&valType=json"
//! lang = "fr"
//! drawer = true
//! see_all = "https://example.com/messages"
//! ping_interval_ms = 1000
//! max_records_per_stream = 200
//! theme = "dark"
//! output = "DP-1"
//! ```
//!
//! Only `uri` is required (from any source).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::i18n::Lang;
use crate::store::DisplayMode;
use crate::theme::ThemeMode;
use crate::transport::DEFAULT_PING_INTERVAL_MS;

type Result<T> = std::result::Result<T, ConfigError>;

/// Resolved settings the application is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub uri: String,
    pub lang: Lang,
    pub mode: DisplayMode,
    pub app_messages_location: Option<String>,
    pub ping_interval_ms: u64,
    pub max_records_per_stream: Option<usize>,
    pub theme: ThemeMode,
    pub output: Option<String>,
}

impl Settings {
    pub fn for_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            lang: Lang::default(),
            mode: DisplayMode::default(),
            app_messages_location: None,
            ping_interval_ms: DEFAULT_PING_INTERVAL_MS,
            max_records_per_stream: None,
            theme: ThemeMode::default(),
            output: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub uri: Option<String>,
    pub lang: Option<Lang>,
    pub drawer: Option<bool>,
    pub see_all: Option<String>,
    pub ping_interval_ms: Option<u64>,
    pub max_records_per_stream: Option<usize>,
    pub theme: Option<ThemeMode>,
    pub output: Option<String>,
}

/// Environment overrides.
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub uri: Option<String>,
    pub lang: Option<String>,
    pub output: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|s| !s.is_empty());
        Self {
            uri: var("NOTIFY_HUD_URI"),
            lang: var("NOTIFY_HUD_LANG"),
            output: var("NOTIFY_HUD_SCREEN"),
        }
    }
}

/// Command-line flags.
#[derive(Debug, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub uri: Option<String>,
    pub lang: Option<Lang>,
    pub drawer: bool,
    pub inline: bool,
    pub see_all: Option<String>,
    pub ping_ms: Option<u64>,
    pub max_records: Option<usize>,
    pub theme: Option<ThemeMode>,
    pub output: Option<String>,
}

pub const USAGE: &str = "\
usage: notify-hud [options]

options:
  --uri <uri>            feed WebSocket uri (or NOTIFY_HUD_URI)
  --lang <en|fr>         display language (or NOTIFY_HUD_LANG)
  --drawer               keep records in a drawer, newest first
  --inline               show records as toasts, oldest first
  --see-all <url>        link target for \"See all\"
  --ping-ms <ms>         liveness interval (default 1000)
  --max-records <n>      keep at most n records per stream
  --theme <dark|light>   colour theme
  --output <name>        Wayland output (or NOTIFY_HUD_SCREEN)
  --config <path>        config file (default ~/.config/notify-hud/config.toml)
  -h, --help             show this help";

impl CliArgs {
    pub fn parse(mut args: pico_args::Arguments) -> Result<Self> {
        let cli = Self {
            config: args.opt_value_from_str::<_, String>("--config")?.map(PathBuf::from),
            uri: args.opt_value_from_str("--uri")?,
            lang: args.opt_value_from_str("--lang")?,
            drawer: args.contains("--drawer"),
            inline: args.contains("--inline"),
            see_all: args.opt_value_from_str("--see-all")?,
            ping_ms: args.opt_value_from_str("--ping-ms")?,
            max_records: args.opt_value_from_str("--max-records")?,
            theme: args.opt_value_from_str("--theme")?,
            output: args.opt_value_from_str("--output")?,
        };
        let rest = args.finish();
        if !rest.is_empty() {
            let rest: Vec<String> = rest
                .iter()
                .map(|s| s.to_string_lossy().into_owned())
                .collect();
            return Err(ConfigError::UnexpectedArgs(rest.join(" ")));
        }
        if cli.drawer && cli.inline {
            return Err(ConfigError::InvalidValue {
                key: "--drawer/--inline",
                value: "both given".to_string(),
            });
        }
        Ok(cli)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("notify-hud").join("config.toml"))
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the config file (explicit path must exist, default path may not),
/// apply environment and CLI overrides.
pub fn load(cli: CliArgs) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => load_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_file(&path)?,
            _ => FileConfig::default(),
        },
    };
    resolve(file, EnvOverrides::from_env(), cli)
}

/// Precedence: CLI > environment > file > defaults.
pub fn resolve(file: FileConfig, env: EnvOverrides, cli: CliArgs) -> Result<Settings> {
    let uri = cli
        .uri
        .or(env.uri)
        .or(file.uri)
        .filter(|u| !u.trim().is_empty())
        .ok_or(ConfigError::MissingUri)?;

    let env_lang = env
        .lang
        .map(|raw| {
            raw.parse::<Lang>().map_err(|_| ConfigError::InvalidValue {
                key: "NOTIFY_HUD_LANG",
                value: raw,
            })
        })
        .transpose()?;
    let lang = cli.lang.or(env_lang).or(file.lang).unwrap_or_default();

    let is_drawer = if cli.drawer {
        true
    } else if cli.inline {
        false
    } else {
        file.drawer.unwrap_or(false)
    };

    let ping_interval_ms = cli
        .ping_ms
        .or(file.ping_interval_ms)
        .unwrap_or(DEFAULT_PING_INTERVAL_MS);
    if ping_interval_ms == 0 {
        return Err(ConfigError::InvalidValue {
            key: "ping_interval_ms",
            value: "0".to_string(),
        });
    }

    let max_records_per_stream = cli.max_records.or(file.max_records_per_stream);
    if max_records_per_stream == Some(0) {
        return Err(ConfigError::InvalidValue {
            key: "max_records_per_stream",
            value: "0".to_string(),
        });
    }

    Ok(Settings {
        uri,
        lang,
        mode: DisplayMode::from_is_drawer(is_drawer),
        app_messages_location: cli.see_all.or(file.see_all),
        ping_interval_ms,
        max_records_per_stream,
        theme: cli.theme.or(file.theme).unwrap_or_default(),
        output: cli.output.or(env.output).or(file.output),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn args(list: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(list.iter().map(OsString::from).collect())
    }

    #[test]
    fn parse_file_config() {
        let input = r#"
uri = "wss://proxy.example.com/socket/out?clientId=me&topic=t"
lang = "fr"
drawer = true
see_all = "https://example.com/all"
max_records_per_stream = 50
theme = "light"
"#;
        let file: FileConfig = toml::from_str(input).unwrap();
        let settings = resolve(file, EnvOverrides::default(), CliArgs::default()).unwrap();
        assert_eq!(
            settings.uri,
            "wss://proxy.example.com/socket/out?clientId=me&topic=t"
        );
        assert_eq!(settings.lang, Lang::Fr);
        assert_eq!(settings.mode, DisplayMode::Drawer);
        assert_eq!(
            settings.app_messages_location.as_deref(),
            Some("https://example.com/all")
        );
        assert_eq!(settings.ping_interval_ms, DEFAULT_PING_INTERVAL_MS);
        assert_eq!(settings.max_records_per_stream, Some(50));
        assert_eq!(settings.theme, ThemeMode::Light);
    }

    #[test]
    fn unknown_file_keys_rejected() {
        assert!(toml::from_str::<FileConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_uri_is_an_error() {
        let err = resolve(
            FileConfig::default(),
            EnvOverrides::default(),
            CliArgs::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingUri));
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = FileConfig {
            uri: Some("ws://file".into()),
            lang: Some(Lang::En),
            output: Some("file-out".into()),
            ..FileConfig::default()
        };
        let env = EnvOverrides {
            uri: Some("ws://env".into()),
            lang: Some("fr".into()),
            output: Some("env-out".into()),
        };
        let cli = CliArgs::parse(args(&["--uri", "ws://cli"])).unwrap();
        let settings = resolve(file, env, cli).unwrap();
        assert_eq!(settings.uri, "ws://cli");
        assert_eq!(settings.lang, Lang::Fr);
        assert_eq!(settings.output.as_deref(), Some("env-out"));
    }

    #[test]
    fn inline_flag_overrides_file_drawer() {
        let file = FileConfig {
            uri: Some("ws://file".into()),
            drawer: Some(true),
            ..FileConfig::default()
        };
        let cli = CliArgs::parse(args(&["--inline"])).unwrap();
        let settings = resolve(file, EnvOverrides::default(), cli).unwrap();
        assert_eq!(settings.mode, DisplayMode::Inline);
    }

    #[test]
    fn cli_parses_all_flags() {
        let cli = CliArgs::parse(args(&[
            "--uri",
            "ws://x",
            "--lang",
            "fr",
            "--drawer",
            "--see-all",
            "https://example.com",
            "--ping-ms",
            "250",
            "--max-records",
            "10",
            "--theme",
            "light",
            "--output",
            "HDMI-A-1",
        ]))
        .unwrap();
        assert_eq!(cli.lang, Some(Lang::Fr));
        assert!(cli.drawer);
        assert_eq!(cli.ping_ms, Some(250));
        assert_eq!(cli.max_records, Some(10));
        assert_eq!(cli.theme, Some(ThemeMode::Light));
        assert_eq!(cli.output.as_deref(), Some("HDMI-A-1"));
    }

    #[test]
    fn cli_rejects_conflicting_modes_and_strays() {
        assert!(CliArgs::parse(args(&["--drawer", "--inline"])).is_err());
        assert!(matches!(
            CliArgs::parse(args(&["stray"])),
            Err(ConfigError::UnexpectedArgs(_))
        ));
        assert!(CliArgs::parse(args(&["--lang", "de"])).is_err());
    }

    #[test]
    fn bad_env_lang_rejected() {
        let env = EnvOverrides {
            uri: Some("ws://env".into()),
            lang: Some("klingon".into()),
            output: None,
        };
        let err = resolve(FileConfig::default(), env, CliArgs::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn zero_limits_rejected() {
        let cli = CliArgs::parse(args(&["--uri", "ws://x", "--max-records", "0"])).unwrap();
        assert!(resolve(FileConfig::default(), EnvOverrides::default(), cli).is_err());
        let cli = CliArgs::parse(args(&["--uri", "ws://x", "--ping-ms", "0"])).unwrap();
        assert!(resolve(FileConfig::default(), EnvOverrides::default(), cli).is_err());
    }

    #[test]
    fn load_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "notify-hud-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "uri = \"ws://from-file\"\nlang = \"fr\"\n").unwrap();
        let file = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(file.uri.as_deref(), Some("ws://from-file"));
        assert_eq!(file.lang, Some(Lang::Fr));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/notify-hud.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
