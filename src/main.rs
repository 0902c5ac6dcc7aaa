use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::sync::Arc;

use cardioflow_rs::clients::{HttpCaseStore, HttpNotificationService, HttpSchedulingService};
use cardioflow_rs::server;
use cardioflow_rs::workflow::engine::ReviewWorkflow;
use cardioflow_rs::workflow::state::ReviewRequest;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP review service
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
    /// Run a single case review workflow and print the terminal state
    Review {
        /// Case identifier in the case store
        #[arg(long)]
        case_id: String,

        /// Reviewing doctor's decision: "confirmed" or "rejected"
        #[arg(long)]
        decision: String,

        /// Free-text findings from the review
        #[arg(long)]
        findings: String,

        /// Reviewing doctor's role: "junior" or "senior"
        #[arg(long)]
        role: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let workflow = Arc::new(build_workflow()?);

    match args.command {
        Commands::Serve { port } => {
            server::serve(port, workflow)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        Commands::Review {
            case_id,
            decision,
            findings,
            role,
        } => {
            let request = ReviewRequest {
                case_id,
                decision,
                findings,
                doctor_role: role,
            };
            let state = workflow.run(&request).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    Ok(())
}

fn build_workflow() -> anyhow::Result<ReviewWorkflow> {
    let store = Arc::new(HttpCaseStore::from_env()?);
    let notifier = Arc::new(HttpNotificationService::from_env()?);
    let scheduler = Arc::new(HttpSchedulingService::from_env()?);
    Ok(ReviewWorkflow::standard(store, notifier, scheduler))
}
