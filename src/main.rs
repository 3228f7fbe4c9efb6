use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use voting_dapp::{
    config::parse_address,
    gateway_url,
    pinning::upload_file,
    validate::CandidateForm,
    view::{NoticeLevel, VotingView},
    Config, PinataClient, VotingDapp,
};

#[derive(Parser, Debug)]
#[command(name = "voting-dapp", about = "Client for the on-chain voting contract")]
struct Cli {
    /// Wallet provider JSON-RPC endpoint
    #[arg(long, env = "RPC_URL", global = true)]
    rpc_url: Option<String>,
    /// Account to act as, defaults to the wallet's first account
    #[arg(long, env = "WALLET_ACCOUNT", global = true)]
    account: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the election, its candidates and whether you voted
    Status {
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a candidate (admin only)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        party: String,
        /// Photo to pin before registering
        #[arg(long, conflicts_with = "image_url")]
        image: Option<PathBuf>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Start an election (admin only)
    Start { title: String },
    /// Vote for a candidate
    Vote { candidate_id: u64 },
    /// End the election and reset all candidates (admin only)
    End,
    /// Show the current leader
    Winner,
    /// Pin a file and print its ipfs:// URI
    Upload { file: PathBuf },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if cli.rpc_url.is_some() {
        config.rpc_url = cli.rpc_url.clone();
    }
    if let Some(account) = &cli.account {
        config.account = Some(parse_address(account)?);
    }
    let pinning = PinataClient::from_config(&config);

    if let Command::Upload { file } = &cli.command {
        let uri = upload_file(&pinning, file).await?;
        println!("{}", uri);
        println!("{}", gateway_url(&uri, &config.pinata_gateway));
        return Ok(());
    }

    let mut dapp = match VotingDapp::connect(&config, pinning).await {
        Ok(dapp) => dapp,
        Err(e) => {
            print!("{}", VotingView::disconnected(&e).render(&config.pinata_gateway));
            return Err(e.into());
        }
    };

    let json = matches!(cli.command, Command::Status { json: true });
    let result = match cli.command {
        Command::Status { .. } | Command::Upload { .. } => Ok(()),
        Command::Register {
            name,
            age,
            party,
            image,
            image_url,
        } => {
            dapp.view.form = CandidateForm {
                name,
                age,
                party,
                image_url: image_url.unwrap_or_default(),
            };
            let uploaded = match image {
                Some(path) => dapp.upload_image(&path).await.map(|_| ()),
                None => Ok(()),
            };
            match uploaded {
                Ok(()) => dapp.register_candidate().await.map(|_| ()),
                Err(e) => Err(e),
            }
        }
        Command::Start { title } => dapp.start_election(&title).await.map(|_| ()),
        Command::Vote { candidate_id } => dapp.vote(candidate_id).await.map(|_| ()),
        Command::End => dapp.end_voting_and_reset().await.map(|_| ()),
        Command::Winner => dapp.fetch_winner().await.map(|w| {
            dapp.view.winner = Some(w);
        }),
    };

    if json {
        println!("{}", dapp.view.to_json()?);
        return Ok(());
    }
    print!("{}", dapp.view.render(&config.pinata_gateway));
    for notice in dapp.view.take_notices() {
        let tag = match notice.level {
            NoticeLevel::Loading => "…",
            NoticeLevel::Success => "✔",
            NoticeLevel::Error => "✖",
        };
        println!("{} {}", tag, notice.message);
    }
    result?;
    Ok(())
}
