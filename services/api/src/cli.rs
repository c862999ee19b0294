use crate::demo::{run_assess, run_demo, run_policy, AssessArgs, DemoArgs, PolicyArgs};
use crate::server;
use agri_credit::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Agri Credit",
    about = "Score farmer questionnaires and decide loan eligibility from the command line",
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
    /// Assess a questionnaire JSON file against a loan product
    Assess(AssessArgs),
    /// Print the active scoring policy
    Policy(PolicyArgs),
    /// Score a set of sample farms against the built-in product catalog
    Demo(DemoArgs),
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
        Command::Assess(args) => run_assess(args),
        Command::Policy(args) => run_policy(args),
        Command::Demo(args) => run_demo(args),
    }
}
