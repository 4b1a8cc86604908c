use std::sync::LazyLock;

/// User home directory. Falls back to the working directory when none is set.
pub static HOME: LazyLock<std::path::PathBuf> = LazyLock::new(|| {
    #[allow(deprecated)] // Only misbehaves on Windows, where `USERPROFILE` is still consulted first.
    std::env::home_dir().unwrap_or_default()
});

macro_rules! ferror {
    ($($t: tt)*) => {
        {
            eprintln!($($t)*);
            std::process::exit(1)
        }
    }
}

pub(crate) use ferror;
