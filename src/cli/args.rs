//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};

use crate::domain::Pid;

/// Print the process tree rooted at PID
#[derive(Parser, Debug)]
#[command(name = "ptree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root of the tree
    #[arg(required_unless_present = "completions")]
    pub pid: Option<Pid>,

    /// Deepest level to print, 0 prints the whole tree
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub depth: usize,

    /// Directory laid out like /proc
    #[arg(short = 'r', long, value_hint = ValueHint::DirPath)]
    pub proc_root: Option<PathBuf>,

    /// Show full command lines
    #[arg(short, long)]
    pub args: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Plain)]
    pub format: Format,

    /// Exit non-zero if any process information was lost
    #[arg(long)]
    pub strict: bool,

    /// Do not report lost process information on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbosity, repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<clap_complete::Shell>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Indented `pid: name` lines
    #[default]
    Plain,
    /// Box-drawing tree
    Tree,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_pid_only_when_parsing_then_unbounded_plain() {
        let cli = Cli::try_parse_from(["ptree", "42"]).unwrap();
        assert_eq!(cli.pid, Some(42));
        assert_eq!(cli.depth, 0);
        assert_eq!(cli.format, Format::Plain);
        assert!(!cli.strict);
    }

    #[test]
    fn given_depth_flag_when_parsing_then_sets_depth() {
        let cli = Cli::try_parse_from(["ptree", "-d", "2", "1"]).unwrap();
        assert_eq!(cli.depth, 2);
        assert_eq!(cli.pid, Some(1));
    }

    #[test]
    fn given_missing_pid_when_parsing_then_errors() {
        assert!(Cli::try_parse_from(["ptree"]).is_err());
    }

    #[test]
    fn given_non_numeric_pid_when_parsing_then_errors() {
        assert!(Cli::try_parse_from(["ptree", "init"]).is_err());
        assert!(Cli::try_parse_from(["ptree", "-d", "x", "1"]).is_err());
    }

    #[test]
    fn given_completions_when_parsing_then_pid_not_required() {
        let cli = Cli::try_parse_from(["ptree", "--completions", "bash"]).unwrap();
        assert!(cli.pid.is_none());
        assert_eq!(cli.completions, Some(clap_complete::Shell::Bash));
    }
}
