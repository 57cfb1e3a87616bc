//! Command dispatch

use std::io::Write;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::TreePrinter;
use crate::cli::args::{Cli, Format};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{NameStyle, Pid};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;

/// Run the command described by `cli`, writing the tree to `out`.
///
/// Returns the process exit code for a successful run.
pub fn execute_command(cli: &Cli, out: &mut dyn Write) -> CliResult<i32> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, out);
        return Ok(exitcode::OK);
    }

    let pid = cli
        .pid
        .ok_or_else(|| CliError::Usage("a PID is required".into()))?;

    let mut settings = Settings::load()?;
    if let Some(root) = &cli.proc_root {
        settings = settings.with_proc_root(root);
    }
    debug!("settings: {:?}", settings);

    let container = ServiceContainer::new(&settings);
    run(&container, cli, pid, out)
}

/// Build and print the tree for `pid` using the container's source.
#[instrument(level = "debug", skip(container, cli, out))]
pub fn run(
    container: &ServiceContainer,
    cli: &Cli,
    pid: Pid,
    out: &mut dyn Write,
) -> CliResult<i32> {
    let built = container.tree_builder().build(pid)?;

    if !cli.quiet {
        for degradation in &built.report.degradations {
            output::warning(degradation);
        }
    }

    let style = if cli.args {
        NameStyle::Full
    } else {
        NameStyle::Command
    };
    let printer = TreePrinter::new(cli.depth).with_style(style);

    match cli.format {
        Format::Plain => printer.print(&built.tree, out),
        Format::Tree => match printer.to_termtree(&built.tree) {
            Some(tree) => write!(out, "{}", tree),
            None => Ok(()),
        },
    }
    .and_then(|_| out.flush())
    .map_err(CliError::Output)?;

    if cli.strict && built.is_degraded() {
        debug!("strict: {} degradations", built.report.degradations.len());
        return Ok(exitcode::DATAERR);
    }
    Ok(exitcode::OK)
}
