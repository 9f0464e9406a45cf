use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "fsv",
    about = "FsVault: browse a FileVault tree as a resource namespace",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory mapped to `/`
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Workspace filter (`filter.xml`)
    #[arg(long, global = true)]
    pub filter: Option<PathBuf>,

    /// TOML mapper configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a logical path
    Resolve(PathArgs),
    /// List the children of a logical path
    Ls(PathArgs),
    /// Show the tree below a logical path
    Tree(TreeArgs),
    /// Show the properties of a logical path
    Show(PathArgs),
}

#[derive(Args)]
pub struct PathArgs {
    #[arg(default_value = "/")]
    pub path: String,
}

#[derive(Args)]
pub struct TreeArgs {
    #[arg(default_value = "/")]
    pub path: String,
    #[arg(short, long)]
    pub depth: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "fsv", "tree", "/apps", "--depth", "2", "--root", "jcr_root", "-vv", "--format", "json",
        ]);
        assert_eq!(cli.root, Some(PathBuf::from("jcr_root")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.log_level(), Level::DEBUG);
        match cli.command {
            Command::Tree(args) => {
                assert_eq!(args.path, "/apps");
                assert_eq!(args.depth, Some(2));
            }
            _ => panic!("expected tree"),
        }
    }

    #[test]
    fn path_defaults_to_root() {
        let cli = Cli::parse_from(["fsv", "ls"]);
        assert_eq!(cli.log_level(), Level::WARN);
        match cli.command {
            Command::Ls(args) => assert_eq!(args.path, "/"),
            _ => panic!("expected ls"),
        }
    }
}
