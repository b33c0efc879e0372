use crate::commands::{run_questions, run_score, run_waitlist_join, ScoreArgs, WaitlistJoinArgs};
use crate::server;
use afterly::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Afterly",
    about = "Run the Afterly readiness assessment and waitlist service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect or score the LegacyScore readiness assessment
    Assessment {
        #[command(subcommand)]
        command: AssessmentCommand,
    },
    /// Manage waitlist signups
    Waitlist {
        #[command(subcommand)]
        command: WaitlistCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AssessmentCommand {
    /// Print every question with its scored options
    Questions,
    /// Score a full set of answers and print the readiness tier
    Score(ScoreArgs),
}

#[derive(Subcommand, Debug)]
enum WaitlistCommand {
    /// Submit an email address and print the assigned position
    Join(WaitlistJoinArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assessment {
            command: AssessmentCommand::Questions,
        } => run_questions(),
        Command::Assessment {
            command: AssessmentCommand::Score(args),
        } => run_score(args),
        Command::Waitlist {
            command: WaitlistCommand::Join(args),
        } => run_waitlist_join(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_accepts_repeated_answers() {
        let cli = Cli::try_parse_from([
            "afterly",
            "assessment",
            "score",
            "--answer",
            "q1=0",
            "--answer",
            "q2=2",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Assessment {
                command: AssessmentCommand::Score(args),
            }) => {
                assert_eq!(
                    args.answers,
                    vec![("q1".to_string(), 0), ("q2".to_string(), 2)]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn malformed_answer_is_rejected() {
        let result = Cli::try_parse_from(["afterly", "assessment", "score", "--answer", "q1"]);
        assert!(result.is_err());
    }
}
