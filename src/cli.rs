use clap_verbosity_flag::{Verbosity, WarnLevel};
use clap::{Args, Parser, Subcommand};

use crate::catalog::SongField;

/// Browse and edit a song catalog served over HTTP.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The path to the configuration file to load.
    #[arg(short, long = "config", value_name = "PATH", global = true)]
    pub config_file_path: Option<std::path::PathBuf>,

    /// Base URL of the catalog backend, overriding the configured one.
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List songs, optionally filtered by title, artist or album.
    #[clap(visible_alias("ls"))]
    List {
        query: Option<String>,
    },
    /// Fetch a song and show it as it would be edited.
    Show {
        id: String,
    },
    /// Create a song.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Replace a song; fields not given keep their current value.
    Edit {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a song after confirming.
    #[clap(visible_alias("rm"))]
    Delete {
        id: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// List the distinct artists in the catalog.
    Artists,
    /// List the distinct albums in the catalog.
    Albums,
    /// Interactive session: every line typed is a live search.
    Browse,
    /// Configure the application.
    #[clap(visible_alias("config"))]
    Configure {
        #[command(subcommand)]
        action: ConfigurationAction
    }
}

#[derive(Args, Default)]
pub struct FieldArgs {
    #[arg(long, value_name = "TEXT")]
    pub titulo: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub artista: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub album: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub genero: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub duracion: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub compositor: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub escritor: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub productor: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub discografica: Option<String>,
}
impl FieldArgs {
    /// The fields that were given on the command line.
    pub fn assignments(&self) -> impl Iterator<Item = (SongField, &str)> {
        [
            (SongField::Titulo, &self.titulo),
            (SongField::Artista, &self.artista),
            (SongField::Album, &self.album),
            (SongField::Genero, &self.genero),
            (SongField::Duracion, &self.duracion),
            (SongField::Compositor, &self.compositor),
            (SongField::Escritor, &self.escritor),
            (SongField::Productor, &self.productor),
            (SongField::Discografica, &self.discografica),
        ].into_iter().filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
    }
}

#[derive(Subcommand)]
pub enum ConfigurationAction {
    /// Run the configuration wizard, starting from the current settings.
    Wizard,

    /// Print the location of the configuration file that would be used in the current context.
    #[clap(visible_alias("which"))]
    Where {
        /// Explain why the configuration file is being used, and if there were any issues trying to read it.
        /// This will be enabled by default if standard output is detected as a terminal.
        #[arg(short = 'r', long = "reason", aliases = ["why", "explain"])]
        show_reason: Option<bool>,
        /// Escape special characters (such as spaces) in the path.
        #[arg(short, long, default_value = "false")]
        escape: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_assignments() {
        let cli = Cli::try_parse_from(["cancionero", "edit", "C001", "--duracion", "3:20", "--discografica", "Sony"]).unwrap();
        let Command::Edit { id, fields } = cli.command else { panic!("expected edit") };
        assert_eq!(id, "C001");
        assert_eq!(fields.assignments().collect::<Vec<_>>(), vec![
            (SongField::Duracion, "3:20"),
            (SongField::Discografica, "Sony"),
        ]);
    }

    #[test]
    fn delete_flags() {
        let cli = Cli::try_parse_from(["cancionero", "--api-url", "http://x", "rm", "-y", "C002"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
        assert!(matches!(cli.command, Command::Delete { yes: true, ref id } if id == "C002"));
    }
}
