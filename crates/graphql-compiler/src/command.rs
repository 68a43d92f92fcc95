use crate::Cli;
use crate::CommandResult;

/// A `graphql-compiler` subcommand.
pub(crate) trait RunnableCommand: std::fmt::Debug {
    async fn run(self, cli: Cli) -> CommandResult;
}
