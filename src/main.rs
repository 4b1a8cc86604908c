use std::{process::ExitCode, sync::Arc};

use catalog::{CatalogClient, Confirmation, Deletion, Preapproved, TerminalPrompt};
use catalog_api::SongId;
use config::ConfigRetrievalError;
use util::ferror;

mod browse;
mod catalog;
mod cli;
mod config;
mod debugging;
mod util;

#[tokio::main]
async fn main() -> ExitCode {
    let args: &'static cli::Cli = Box::leak(Box::new(<cli::Cli as clap::Parser>::parse()));
    let debugging = debugging::DebuggingSession::new(args);
    let config = config::Config::get(args).await;

    use cli::Command;
    let code = match args.command {
        Command::Configure { ref action } => configure(action, config).await,
        ref command => {
            let config = match config {
                Ok(config) => config,
                Err(ConfigRetrievalError::NotFound(path)) => {
                    tracing::debug!(path = %path.to_string_lossy(), "no configuration file; using defaults");
                    config::Config::default_at(path)
                }
                Err(error) => ferror!("could not read config @ {}: {error}", error.path().to_string_lossy()),
            };
            run(command, args, &config).await
        }
    };

    drop(debugging.guards); // flush logs
    code
}

async fn run(command: &cli::Command, args: &cli::Cli, config: &config::Config<'_>) -> ExitCode {
    use cli::Command;

    let api_url = args.api_url.as_deref().unwrap_or(&config.api_url);
    let api = catalog_api::Client::new(api_url, config.client_options())
        .unwrap_or_else(|error| ferror!("could not set up the catalog client: {error}"));

    let confirmation: Box<dyn Confirmation> = match command {
        Command::Delete { yes: true, .. } => Box::new(Preapproved(true)),
        _ if !config.confirm_deletes => Box::new(Preapproved(true)),
        _ => Box::new(TerminalPrompt),
    };
    let client = CatalogClient::new(api, confirmation, config.placeholder.as_str());
    tracing::debug!(base = %client.api().base_url(), "catalog client ready");

    let succeeded = match command {
        Command::List { query } => {
            let loaded = client.load(query.as_deref()).await.is_ok();
            if loaded {
                let screen = client.screen().await;
                println!("{}", screen.songs_table());
                if query.as_deref().is_none_or(str::is_empty) {
                    println!();
                    println!("{}", screen.artists_table());
                    println!();
                    println!("{}", screen.albums_table());
                }
            }
            loaded
        }
        Command::Show { id } => {
            let shown = client.enter_edit_mode(&SongId::new(id.as_str())).await.is_ok();
            if shown {
                println!("{}", client.form().await);
            }
            shown
        }
        Command::Add { fields } => {
            for (field, value) in fields.assignments() {
                client.set_field(field, value).await;
            }
            match client.submit().await {
                Ok(ack) => {
                    match (ack.id, ack.message) {
                        (Some(id), _) => println!("Added song {id}."),
                        (None, Some(message)) => println!("{message}"),
                        (None, None) => println!("Added song."),
                    }
                    true
                }
                Err(_) => false,
            }
        }
        Command::Edit { id, fields } => {
            let id = SongId::new(id.as_str());
            if client.enter_edit_mode(&id).await.is_err() {
                return ExitCode::FAILURE;
            }
            for (field, value) in fields.assignments() {
                client.set_field(field, value).await;
            }
            let updated = client.submit().await.is_ok();
            if updated {
                println!("Updated song {id}.");
            }
            updated
        }
        Command::Delete { id, .. } => match client.delete(&SongId::new(id.as_str())).await {
            Ok(Deletion::Deleted(ack)) => {
                println!("{}", ack.message.unwrap_or_else(|| format!("Deleted song {id}.")));
                true
            }
            Ok(Deletion::Declined) => {
                println!("Not deleted.");
                true
            }
            Err(_) => false,
        },
        Command::Artists | Command::Albums => {
            let loaded = client.load(None).await.is_ok();
            if loaded {
                let screen = client.screen().await;
                match command {
                    Command::Artists => println!("{}", screen.artists_table()),
                    _ => println!("{}", screen.albums_table()),
                }
            }
            loaded
        }
        Command::Browse => {
            browse::run(Arc::new(client)).await;
            true
        }
        Command::Configure { .. } => unreachable!("handled before the client is built"),
    };

    if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

async fn configure<'a>(action: &cli::ConfigurationAction, config: Result<config::Config<'a>, ConfigRetrievalError<'a>>) -> ExitCode {
    use cli::ConfigurationAction;

    match action {
        ConfigurationAction::Where { show_reason, escape } => {
            let path = match &config {
                Ok(config) => &config.path,
                Err(error) => error.path()
            };

            let path_str = path.to_string_lossy();
            let path_str = if !escape { path_str } else {
                String::from(path_str)
                    .replace(' ', "\\ ")
                    .into()
            };

            use std::io::IsTerminal;
            let show_reason = match show_reason {
                Some(show) => *show,
                None => std::io::stdout().is_terminal()
            };

            println!("{path_str}");
            if show_reason {
                eprint!("This path is used because it is {}", path.describe_for_choice_reasoning_suffix());
                if let Err(err) = &config {
                    use std::borrow::Cow;
                    eprintln!(", but {}", match err {
                        ConfigRetrievalError::DeserializationFailure { .. } => Cow::Borrowed("it couldn't be successfully deserialized"),
                        ConfigRetrievalError::NotFound { .. } => Cow::Borrowed(if path.was_auto() { "it currently doesn't exist" } else { "it couldn't be found" }),
                        ConfigRetrievalError::PermissionDenied(_) => Cow::Borrowed("the required permissions to read it are not available"),
                        ConfigRetrievalError::UnknownFs { inner, .. } => Cow::Owned(format!("an unknown error occurred trying to read it ({inner})"))
                    });
                } else {
                    eprintln!(".");
                }
            }
        },
        ConfigurationAction::Wizard => {
            let config = match config {
                Err(ConfigRetrievalError::NotFound(path)) => {
                    println!("Creating configuration file @ {}", path.to_string_lossy());
                    config::Config::create_with_wizard(path)
                }
                Ok(mut config) => {
                    println!("Modifying configuration file @ {}", config.path.to_string_lossy());
                    config.edit_with_wizard();
                    config
                },
                Err(error) => ferror!("could not read config: {error}"),
            };
            if let Err(error) = config.save_to_disk().await {
                tracing::error!(%error, "failed to save configuration");
                ferror!("{error}");
            }
            println!("Successfully saved changes!");
        }
    }

    ExitCode::SUCCESS
}
