use crate::batch::{
    run_exam_stage, run_interview_stage, run_policy, ExamStageArgs, InterviewStageArgs,
    PolicyArgs,
};
use crate::server;
use admission_ranker::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Admission Ranker",
    about = "Score, rank and classify exam-based admission batches",
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
    /// Normalize scores, compute group thresholds and rank exam merit
    ExamStage(ExamStageArgs),
    /// Apply interview scores, final merit and the preselection overlay
    InterviewStage(InterviewStageArgs),
    /// Print the effective scoring policy as JSON
    Policy(PolicyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Scoring policy JSON file (overrides APP_SCORING_POLICY)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::ExamStage(args) => run_exam_stage(args),
        Command::InterviewStage(args) => run_interview_stage(args),
        Command::Policy(args) => run_policy(args),
    }
}
