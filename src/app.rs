use anyhow::Result;

use crate::cli::{parse_cli_args, usage_text, version_text, CliCommand};
use crate::command_handlers::{
    handle_export, handle_issues, handle_list, handle_mesh, handle_scan,
};

/// Run the app by parsing CLI-style args and dispatching the command.
pub async fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    execute_command(command).await
}

/// Execute a pre-parsed command. This is reusable for non-CLI entrypoints.
pub async fn execute_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Help => {
            println!("{}", usage_text());
            Ok(())
        }
        CliCommand::Version => {
            println!("{}", version_text());
            if let Ok(log_file) = hubaudit::logging::get_current_log_file() {
                println!("Log file: {}", log_file.display());
            }
            Ok(())
        }
        CliCommand::Scan {
            hubs_file,
            snapshot,
        } => handle_scan(&hubs_file, snapshot.as_deref()).await,
        CliCommand::List { snapshot } => handle_list(snapshot.as_deref()).await,
        CliCommand::Mesh { snapshot } => handle_mesh(snapshot.as_deref()).await,
        CliCommand::Issues { notify, snapshot } => {
            handle_issues(notify, snapshot.as_deref()).await
        }
        CliCommand::Export {
            format,
            output,
            snapshot,
        } => handle_export(format, output.as_deref(), snapshot.as_deref()).await,
    }
}
