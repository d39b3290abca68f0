//! CLI command definitions for the `mchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Buyer-seller inbox on the command line.
#[derive(Parser)]
#[command(name = "mchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Data directory holding config.toml and inbox.json.
    #[arg(long, global = true, env = "MARKETCHAT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List chats, most recent first.
    #[command(alias = "ls")]
    Inbox,

    /// Start a chat about a listing.
    NewChat {
        /// Name of the other party.
        #[arg(long)]
        counterpart: String,

        /// Listing identifier (also the conversation key).
        #[arg(long)]
        listing_id: String,

        /// Listing title.
        #[arg(long)]
        title: String,

        /// Listing price.
        #[arg(long, default_value_t = 0.0)]
        price: f64,

        /// Avatar reference for the counterpart.
        #[arg(long)]
        avatar: Option<String>,

        /// Chat id (generated when omitted).
        #[arg(long)]
        id: Option<String>,
    },

    /// Merge new details into an existing chat.
    UpdateChat {
        /// Chat id.
        id: String,

        #[arg(long)]
        counterpart: Option<String>,

        #[arg(long)]
        avatar: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        price: Option<f64>,
    },

    /// Send a message as the local user.
    Send {
        /// Chat id.
        chat_id: String,

        /// Message text.
        text: String,

        /// Attachment reference.
        #[arg(long)]
        image: Option<String>,

        /// Skip the configured auto-reply.
        #[arg(long)]
        no_reply: bool,
    },

    /// Record an incoming message.
    Reply {
        /// Chat id.
        chat_id: String,

        /// Message text.
        text: String,

        /// Sender (counterpart or assistant).
        #[arg(long, default_value = "counterpart")]
        sender: String,
    },

    /// Open a chat: mark it read and print its history.
    Open {
        /// Chat id.
        chat_id: String,
    },

    /// Print the history of a listing conversation.
    History {
        /// Listing identifier.
        listing_id: String,
    },

    /// Remove a chat from the inbox.
    #[command(alias = "rm")]
    Remove {
        /// Chat id.
        chat_id: String,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}
