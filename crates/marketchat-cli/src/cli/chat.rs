//! Chat and inbox command handlers.

use anyhow::{Result, bail};
use chrono::Local;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use marketchat_types::message::{Message, Sender};
use marketchat_types::summary::{ChatSummary, ChatSummaryPatch};
use uuid::Uuid;

use crate::state::AppState;

/// Display time for messages created now.
fn display_now() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Print the inbox, most recent chat first.
pub fn list_inbox(state: &AppState, json: bool) -> Result<()> {
    let chats = state.inbox.inbox();
    let unread = state.inbox.unread_badge();

    if json {
        let result = serde_json::json!({
            "unread": unread,
            "chats": chats,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if chats.is_empty() {
        println!();
        println!(
            "  {} No chats yet. Start one with: {}",
            style("i").blue().bold(),
            style("mchat new-chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Chat").fg(Color::White),
        Cell::new("With").fg(Color::White),
        Cell::new("Listing").fg(Color::White),
        Cell::new("Last Message").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Unread").fg(Color::White),
    ]);

    for chat in &chats {
        let unread_cell = if chat.unread_count > 0 {
            Cell::new(format!("● {}", chat.unread_count)).fg(Color::Green)
        } else {
            Cell::new("-").fg(Color::DarkGrey)
        };

        table.add_row(vec![
            Cell::new(&chat.id).fg(Color::DarkGrey),
            Cell::new(&chat.counterpart_name),
            Cell::new(format!("{} ({:.2})", chat.listing_title, chat.listing_price)),
            Cell::new(&chat.last_message),
            Cell::new(&chat.last_message_display_time),
            unread_cell,
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {} unread across {} chat(s)",
        style(unread).cyan().bold(),
        chats.len()
    );
    println!();
    Ok(())
}

/// Create a chat for a listing.
#[allow(clippy::too_many_arguments)]
pub async fn new_chat(
    state: &AppState,
    id: Option<String>,
    counterpart: String,
    listing_id: String,
    title: String,
    price: f64,
    avatar: Option<String>,
    json: bool,
) -> Result<()> {
    let id = id.unwrap_or_else(|| Uuid::now_v7().to_string());
    if state.inbox.registry().get(&id).is_some() {
        bail!("Chat '{id}' already exists; use `mchat update-chat` to change it");
    }

    let mut patch = ChatSummaryPatch::new(&id)
        .counterpart_name(counterpart)
        .listing(listing_id, title, price);
    if let Some(avatar) = avatar {
        patch = patch.avatar(avatar);
    }

    state.inbox.upsert_chat(patch);
    state.persist().await?;

    let chat = state.inbox.registry().get(&id);
    print_chat_result(chat.as_ref(), "Started chat", json)
}

/// Merge fields into an existing chat.
pub async fn update_chat(
    state: &AppState,
    id: String,
    counterpart: Option<String>,
    avatar: Option<String>,
    title: Option<String>,
    price: Option<f64>,
    json: bool,
) -> Result<()> {
    if state.inbox.registry().get(&id).is_none() {
        bail!("Chat '{id}' not found");
    }

    let mut patch = ChatSummaryPatch::new(&id);
    patch.counterpart_name = counterpart;
    patch.avatar = avatar;
    patch.listing_title = title;
    patch.listing_price = price;

    state.inbox.upsert_chat(patch);
    state.persist().await?;

    let chat = state.inbox.registry().get(&id);
    print_chat_result(chat.as_ref(), "Updated chat", json)
}

/// Send a message and, when configured, record the canned reply.
pub async fn send(
    state: &AppState,
    chat_id: &str,
    text: &str,
    image: Option<String>,
    no_reply: bool,
    json: bool,
) -> Result<()> {
    let time = display_now();
    let Some(sent) = state.inbox.send_message(chat_id, text, &time, image) else {
        bail!("Chat '{chat_id}' not found");
    };

    let reply = if no_reply {
        None
    } else {
        state.inbox.simulate_reply(chat_id, &time)
    };
    state.persist().await?;

    if json {
        let result = serde_json::json!({
            "chat_id": chat_id,
            "sent": sent,
            "reply": reply,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        print_message(&sent);
        if let Some(reply) = &reply {
            print_message(reply);
        }
        println!();
    }
    Ok(())
}

/// Record an incoming message from the counterpart or the assistant.
pub async fn reply(
    state: &AppState,
    chat_id: &str,
    text: &str,
    sender: &str,
    json: bool,
) -> Result<()> {
    let sender: Sender = sender.parse().map_err(anyhow::Error::msg)?;
    if sender == Sender::LocalUser {
        bail!("Use `mchat send` for messages from the local user");
    }

    let Some(received) = state
        .inbox
        .receive_reply(chat_id, sender, text, &display_now())
    else {
        bail!("Chat '{chat_id}' not found");
    };
    state.persist().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&received)?);
    } else {
        println!();
        print_message(&received);
        println!();
    }
    Ok(())
}

/// Open a chat: mark it read, then print its history.
pub async fn open(state: &AppState, chat_id: &str, json: bool) -> Result<()> {
    let Some(history) = state.inbox.open_chat(chat_id) else {
        bail!("Chat '{chat_id}' not found");
    };
    state.persist().await?;
    print_history(&history, json)
}

/// Print a listing conversation without touching unread counts.
pub fn history(state: &AppState, listing_id: &str, json: bool) -> Result<()> {
    print_history(&state.inbox.history(listing_id), json)
}

/// Remove a chat. Removing an unknown chat is not an error.
pub async fn remove(state: &AppState, chat_id: &str, json: bool) -> Result<()> {
    let removed = state.inbox.remove_chat(chat_id);
    if removed {
        state.persist().await?;
    }

    if json {
        let result = serde_json::json!({
            "chat_id": chat_id,
            "removed": removed,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if removed {
        println!();
        println!("  {} Removed chat '{}'", style("ok").green(), style(chat_id).cyan());
        println!();
    } else {
        println!();
        println!(
            "  {} Chat '{}' was not in the inbox",
            style("i").blue().bold(),
            style(chat_id).cyan()
        );
        println!();
    }
    Ok(())
}

fn print_chat_result(chat: Option<&ChatSummary>, verb: &str, json: bool) -> Result<()> {
    let Some(chat) = chat else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(chat)?);
    } else {
        println!();
        println!(
            "  {} {verb} '{}' with {} about {}",
            style("ok").green(),
            style(&chat.id).cyan(),
            style(&chat.counterpart_name).cyan(),
            style(&chat.listing_title).cyan(),
        );
        println!();
    }
    Ok(())
}

fn print_history(history: &[Message], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(history)?);
        return Ok(());
    }

    println!();
    for message in history {
        print_message(message);
    }
    println!();
    Ok(())
}

fn print_message(message: &Message) {
    let who = match message.sender {
        Sender::LocalUser => style("you").green().bold(),
        Sender::Counterpart => style("them").cyan().bold(),
        Sender::AutomatedAssistant => style("assistant").magenta().bold(),
    };
    println!(
        "  {} {} {}: {}",
        style(format!("#{}", message.id)).dim(),
        style(&message.timestamp).dim(),
        who,
        message.content
    );
    if let Some(image) = &message.image {
        println!("      {} {}", style("attachment").dim(), image);
    }
}
