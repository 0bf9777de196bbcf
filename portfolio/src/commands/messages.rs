use std::io::Write;

use clap::Subcommand;
use portfolio_config::Config;
use portfolio_persistence_contracts::MessageLog;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// Print all stored contact submissions, oldest first
    #[command(aliases(["ls", "l"]))]
    List,
}

impl MessagesCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            MessagesCommand::List => {
                let log = environment::message_log(&config);
                list(&log, &mut std::io::stdout()).await
            }
        }
    }
}

/// Writes one tab separated line per submission. Control characters, quotes
/// and tabs inside fields are escaped so that every record stays on its line.
async fn list(log: &impl MessageLog, out: &mut impl Write) -> anyhow::Result<()> {
    for submission in log.list().await? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            submission.timestamp.to_rfc3339(),
            submission.name.escape_debug(),
            submission.email.escape_debug(),
            submission.message.escape_debug(),
        )?;
    }

    Ok(())
}
