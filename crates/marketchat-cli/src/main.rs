//! Marketchat CLI entry point.
//!
//! Binary name: `mchat`
//!
//! Parses CLI arguments, loads config and the persisted inbox, then
//! dispatches to the matching command handler.

mod cli;
mod config;
mod snapshot_store;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    marketchat_observe::init_tracing(
        marketchat_observe::verbosity_filter(cli.verbose, cli.quiet),
        cli.otel,
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mchat", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = config::resolve_data_dir(cli.data_dir.clone());
    let state = AppState::init(data_dir).await?;
    tracing::debug!(
        data_dir = %state.data_dir.display(),
        auto_reply = state.config.auto_reply.is_some(),
        "State initialized"
    );

    let result = match cli.command {
        Commands::Inbox => cli::chat::list_inbox(&state, cli.json),

        Commands::NewChat {
            counterpart,
            listing_id,
            title,
            price,
            avatar,
            id,
        } => {
            cli::chat::new_chat(
                &state,
                id,
                counterpart,
                listing_id,
                title,
                price,
                avatar,
                cli.json,
            )
            .await
        }

        Commands::UpdateChat {
            id,
            counterpart,
            avatar,
            title,
            price,
        } => cli::chat::update_chat(&state, id, counterpart, avatar, title, price, cli.json).await,

        Commands::Send {
            chat_id,
            text,
            image,
            no_reply,
        } => cli::chat::send(&state, &chat_id, &text, image, no_reply, cli.json).await,

        Commands::Reply {
            chat_id,
            text,
            sender,
        } => cli::chat::reply(&state, &chat_id, &text, &sender, cli.json).await,

        Commands::Open { chat_id } => cli::chat::open(&state, &chat_id, cli.json).await,

        Commands::History { listing_id } => cli::chat::history(&state, &listing_id, cli.json),

        Commands::Remove { chat_id } => cli::chat::remove(&state, &chat_id, cli.json).await,

        Commands::Completions { .. } => Ok(()),
    };

    marketchat_observe::shutdown_tracing();
    result
}
