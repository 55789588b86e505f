use crate::reports::{
    run_gpa_report, run_projection, run_transcript, GpaReportArgs, ProjectArgs, TranscriptArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gradebook::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "gradebook",
    about = "Serve and generate GPA reports, transcripts, and grade projections",
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
    /// Render a report from a JSON dataset
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Score needed on the final to reach a target letter grade
    Project(ProjectArgs),
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Single-term GPA report
    Gpa(GpaReportArgs),
    /// Academic transcript across every term
    Transcript(TranscriptArgs),
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
        Command::Report {
            command: ReportCommand::Gpa(args),
        } => run_gpa_report(args),
        Command::Report {
            command: ReportCommand::Transcript(args),
        } => run_transcript(args),
        Command::Project(args) => run_projection(args),
    }
}
