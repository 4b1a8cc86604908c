use std::{borrow::Cow, path::Path};

use crate::util::HOME;

macro_rules! get_path_env_var { () => { "CANCIONERO_CONFIG" } }
pub static PATH_ENV_VAR: &str = get_path_env_var!();

const POST_HOME_DEFAULT_PATH: &str = ".config/cancionero/config.toml";

/// How the user specified (or did not specify) the configuration file path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigPathChoice<'a> {
    /// Explicitly provided by a flag in the CLI.
    /// This has the highest priority, and overrides the environmental variable and default path.
    Explicit(&'a std::path::Path),
    /// Inferred based on an environmental variable.
    /// This has the second-highest priority, overriding the default path but not one passed through a CLI flag.
    Environmental(std::ffi::OsString),
    /// Automatically determined path file based on the home directory, located in `~/.config/cancionero/`.
    Automatic(std::path::PathBuf)
}
impl<'a> ConfigPathChoice<'a> {
    pub fn new(explicit: Option<&'a std::path::Path>) -> ConfigPathChoice<'a> {
        if let Some(explicit) = explicit {
            Self::Explicit(explicit)
        } else {
            std::env::var_os(PATH_ENV_VAR).map(Self::Environmental)
                .unwrap_or_else(Self::automatic)
        }
    }

    pub fn automatic() -> Self {
        Self::Automatic(HOME.join(POST_HOME_DEFAULT_PATH))
    }

    pub fn as_path(&self) -> &Path {
        match self {
            Self::Explicit(explicit) => explicit,
            Self::Environmental(environmental) => Path::new(environmental),
            Self::Automatic(automatic) => automatic
        }
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        self.as_path().to_string_lossy()
    }

    pub const fn describe_for_choice_reasoning_suffix(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicitly provided",
            Self::Automatic(_) => "the application default",
            Self::Environmental(_) => concat!("sourced from the ", get_path_env_var!(), " environmental variable")
        }
    }

    pub const fn was_auto(&self) -> bool {
        matches!(self, Self::Automatic(..))
    }
}
impl AsRef<Path> for ConfigPathChoice<'_> {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}
impl core::default::Default for ConfigPathChoice<'_> {
    fn default() -> Self {
        Self::automatic()
    }
}
