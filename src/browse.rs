//! The interactive session. Plain lines are live searches, lines starting with `:` are commands.

use std::sync::Arc;

use catalog_api::{CatalogApi, SongId};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::catalog::{CatalogClient, Deletion, LoadOutcome, Preapproved, SongField};

pub const HELP: &str = "\
Type to search; an empty line shows the whole catalog.
  :edit ID            load a song into the form
  :set FIELD VALUE    change a form field (titulo, artista, album, genero, duracion,
                      compositor, escritor, productor, discografica)
  :form               show the form
  :submit             add the song, or update it in edit mode
  :reset              clear the form and leave edit mode
  :delete ID          delete a song (asks first)
  :artists, :albums   show the derived views
  :help, :quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Edit(SongId),
    Set(SongField, String),
    Form,
    Submit,
    Reset,
    Delete(SongId),
    Artists,
    Albums,
    Help,
    Quit,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command :{0}")]
    UnknownCommand(String),
    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

impl core::str::FromStr for Input {
    type Err = InputError;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Search(line.to_owned()));
        };

        let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        let rest = rest.trim();
        let id = |name: &'static str| Some(rest).filter(|rest| !rest.is_empty())
            .map(SongId::new)
            .ok_or(InputError::MissingArgument(name));

        Ok(match name {
            "edit" | "e" => Self::Edit(id("edit")?),
            "delete" | "rm" => Self::Delete(id("delete")?),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() { return Err(InputError::MissingArgument("set")) }
                let field = field.parse().map_err(|_| InputError::UnknownField(field.to_owned()))?;
                Self::Set(field, value.trim().to_owned())
            }
            "form" => Self::Form,
            "submit" | "save" => Self::Submit,
            "reset" | "cancel" => Self::Reset,
            "artists" => Self::Artists,
            "albums" => Self::Albums,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(InputError::UnknownCommand(other.to_owned())),
        })
    }
}

pub async fn run<A: CatalogApi + 'static>(client: Arc<CatalogClient<A>>) {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut searches = tokio::task::JoinSet::new();

    if client.load(None).await.is_ok() {
        println!("{}", client.screen().await.songs_table());
    }

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::error!(?error, "could not read input");
                break;
            }
        };

        // reap finished searches so the set does not grow for the whole session
        while searches.try_join_next().is_some() {}

        let input = match line.trim_end().parse::<Input>() {
            Ok(input) => input,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        match input {
            Input::Search(query) => {
                // not awaited: a newer line may be typed before this answers
                let client = Arc::clone(&client);
                searches.spawn(async move {
                    if let Ok(LoadOutcome::Applied(_)) = client.search(&query).await {
                        println!("{}", client.screen().await.songs_table());
                    }
                });
            }
            Input::Edit(id) => {
                if client.enter_edit_mode(&id).await.is_ok() {
                    println!("{}", client.form().await);
                }
            }
            Input::Set(field, value) => {
                client.set_field(field, value).await;
                println!("{}", client.form().await);
            }
            Input::Form => println!("{}", client.form().await),
            Input::Submit => {
                if client.submit().await.is_ok() {
                    println!("{}", client.screen().await.songs_table());
                }
            }
            Input::Reset => {
                client.exit_edit_mode().await;
                println!("{}", client.form().await);
            }
            Input::Delete(id) => {
                println!("Delete song {id}? (y/n)");
                let answer = match lines.next_line().await {
                    Ok(Some(answer)) => crate::config::wizard::str_to_boolish(&answer).unwrap_or(false),
                    _ => false,
                };
                match client.delete_with(&id, &Preapproved(answer)).await {
                    Ok(Deletion::Deleted(ack)) => {
                        if let Some(message) = ack.message {
                            println!("{message}");
                        }
                        println!("{}", client.screen().await.songs_table());
                    }
                    Ok(Deletion::Declined) => println!("Not deleted."),
                    Err(_) => {}
                }
            }
            Input::Artists => println!("{}", client.screen().await.artists_table()),
            Input::Albums => println!("{}", client.screen().await.albums_table()),
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    searches.shutdown().await;
}
