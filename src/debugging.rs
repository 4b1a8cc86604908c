const LOG_DIRECTORY: &str = ".local/state/cancionero/logs";

#[allow(unused)]
pub struct DebuggingGuards {
    appender: Option<tracing_appender::non_blocking::WorkerGuard>
}

pub struct DebuggingSession {
    pub guards: DebuggingGuards
}

impl DebuggingSession {
    pub fn new(args: &crate::cli::Cli) -> Self {
        use tracing_subscriber::prelude::*;

        let mut layers = Vec::with_capacity(3);
        let mut appender_guard = None;

        layers.push(tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed());

        #[cfg(feature = "tokio_console")]
        if cfg!(debug_assertions) {
            layers.push(console_subscriber::ConsoleLayer::builder().spawn().boxed());
        }

        match Self::make_logging_dir() {
            Ok(_) => match tracing_appender::rolling::Builder::new()
                .filename_prefix("cancionero")
                .filename_suffix("log")
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .max_log_files(3)
                .build(crate::util::HOME.join(LOG_DIRECTORY))
            {
                Ok(appender) => {
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                    layers.push(tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .boxed()
                    );
                    appender_guard = Some(guard);
                }
                Err(error) => eprintln!("WARNING: failed to create rolling log file ({error}), file logging disabled"),
            },
            Err(error) => eprintln!("WARNING: failed to create logging directory ({error}), file logging disabled"),
        }

        tracing_subscriber::registry()
            .with(Self::get_filter(args))
            .with(layers)
            .init();

        std::panic::set_hook(Box::new(panic_hook));

        Self {
            guards: DebuggingGuards {
                appender: appender_guard
            }
        }
    }

    /// Create the logging directory if it doesn't already exist. Returns `Ok(true)` if it was created, `Ok(false)` if it already existed.
    fn make_logging_dir() -> Result<bool, std::io::Error> {
        let path = crate::util::HOME.join(LOG_DIRECTORY);
        if path.is_dir() { return Ok(false) }
        std::fs::create_dir_all(path).map(|_| true)
    }

    /// Get the filter for log output. The `CANCIONERO_LOG` environmental variable takes priority over CLI arguments.
    fn get_filter(args: &crate::cli::Cli) -> tracing_subscriber::EnvFilter {
        use tracing_subscriber::EnvFilter;

        const ENV: &str = "CANCIONERO_LOG";
        if std::env::var_os(ENV).is_some() {
            if args.verbose.is_present() {
                eprintln!("WARNING: Provided verbosity arguments were ignored as environmental variable {ENV} is set");
            }
            match EnvFilter::try_from_env(ENV) {
                Ok(filter) => return filter,
                Err(error) => eprintln!("WARNING: ignoring bad log filter in {ENV} ({error})"),
            }
        }

        match args.verbose.tracing_level() {
            Some(level) => EnvFilter::new(level.as_str()),
            None => EnvFilter::new("off")
        }
    }
}

/// Currently private @ https://github.com/rust-lang/rust/blob/52618eb338609df44978b0ca4451ab7941fd1c7a/src/tools/compiletest/src/panic_hook.rs#L75-L92
fn payload_as_str<'a>(info: &'a std::panic::PanicHookInfo<'_>) -> Option<&'a str> {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some(s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Some(s)
    } else {
        None
    }
}

fn panic_hook(info: &std::panic::PanicHookInfo) {
    use std::backtrace::*;
    use std::panic::Location;

    let backtrace = Backtrace::capture();
    let location = info.location().map(Location::to_string);
    let message = payload_as_str(info);
    let thread = std::thread::current();

    tracing::error!(
        location = location,
        backtrace = match backtrace.status() {
            BacktraceStatus::Captured => format!("{backtrace}"),
            BacktraceStatus::Disabled => "disabled (run with RUST_BACKTRACE=1)".to_string(),
            BacktraceStatus::Unsupported => "unsupported".to_string(),
            opt => format!("unknown (unrecognized status {opt:?})"),
        },
        "{} ({:?}) panicked at {}",
        thread.name()
            .map(|name| format!("thread '{name}'"))
            .unwrap_or("unnamed thread".to_string()),
        thread.id(),
        message.unwrap_or("<no message>")
    );
}
