use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Run the chat relay server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Set the server port
        #[arg(long, env = "PORT", default_value = "3000")]
        port: String,
    },
    /// Start a chat session in the terminal against a running server
    Chat {
        /// Base URL of the relay server
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    /// The subcommand to run. Without one the server starts with its
    /// default host and port.
    fn command(self) -> Command {
        self.command.unwrap_or_else(|| Command::Serve {
            host: String::from("0.0.0.0"),
            port: std::env::var("PORT").unwrap_or_else(|_| String::from("3000")),
        })
    }
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command() {
        Command::Serve { host, port } => {
            serve::run(host, port).await?;
        }
        Command::Chat { server } => {
            chat::run(&server).await?;
        }
    }

    Ok(())
}
