use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use flclient::{
    ClientSession, ServerApi, SessionStore,
    data::Dataset,
    sgd::LogisticSgd,
};

#[derive(Parser)]
#[command(name = "flclient", about = "Federated learning round client")]
struct Cli {
    /// Coordinator base url.
    #[arg(long, env = "SERVER_URL", default_value = "http://127.0.0.1:3197")]
    server: String,

    /// Identity reported to the coordinator.
    #[arg(long, env = "CLIENT_ID", default_value = "client")]
    client_id: String,

    /// Directory holding contract.json and result.json.
    #[arg(long, env = "STATE_DIR", default_value = ".")]
    state_dir: PathBuf,

    /// Seed for deterministic local training.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join a round and persist the contract.
    Join { join_code: String },
    /// Refresh the persisted contract from the coordinator.
    Sync,
    /// Train locally on a JSON dataset and persist the result.
    Train {
        #[arg(long)]
        data: PathBuf,
    },
    /// Upload the persisted training result.
    Upload,
    /// Full cycle: join, train, upload.
    Run {
        join_code: String,
        #[arg(long)]
        data: PathBuf,
    },
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let api = ServerApi::new(cli.server);
    let store = SessionStore::new(cli.state_dir);
    let mut session = ClientSession::open(api, store)?;

    match cli.command {
        Command::Join { join_code } => {
            let contract = session.join(&join_code, &cli.client_id).await?;
            info!(round = contract.round_id; "contract saved");
        }

        Command::Sync => {
            let contract = session.sync().await?;
            info!(round = contract.round_id; "contract refreshed");
        }

        Command::Train { data } => {
            let dataset = Dataset::from_json_file(data)?;
            let mut trainer = LogisticSgd::new(cli.seed);

            let metadata = session.train(&mut trainer, &dataset)?;
            info!(accuracy = metadata.accuracy; "result saved");
        }

        Command::Upload => {
            let ack = session.upload().await?;
            info!(current_round = ack.current_round; "upload acknowledged");
        }

        Command::Run { join_code, data } => {
            let dataset = Dataset::from_json_file(data)?;
            let mut trainer = LogisticSgd::new(cli.seed);

            session.join(&join_code, &cli.client_id).await?;
            session.train(&mut trainer, &dataset)?;
            let ack = session.upload().await?;
            info!(current_round = ack.current_round; "full cycle completed");
        }
    }

    Ok(())
}
