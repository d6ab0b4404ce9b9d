//! Discord bot commands (`!mcstatus`, `!mcplayers`, ...).
//!
//! Handles command parsing and turns query reports into embeds.

use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter};

use crate::common::RelayNotice;
use crate::hermes::{PlayersReport, StatusReport};

pub const GREEN: Colour = Colour::new(0x2ECC71);
pub const RED: Colour = Colour::new(0xE74C3C);
pub const BLUE: Colour = Colour::new(0x3498DB);
pub const ORANGE: Colour = Colour::new(0xE67E22);

/// Discord caps embed field values at 1024 characters.
const FIELD_LIMIT: usize = 1024;

/// Commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// List online players (`players`, `online`, `who`).
    Players,
    /// Check server status (`status`, `server`).
    Status,
    /// Show usage (`help`).
    Help,
}

/// Parse a command from message content.
///
/// Accepts both `!mcplayers` and `!mc players`. Returns `None` for
/// anything that is not a known command.
pub fn parse_command(prefix: &str, content: &str) -> Option<BotCommand> {
    let rest = content.trim().strip_prefix(prefix)?;
    let name = rest.split_whitespace().next()?.to_lowercase();

    match name.as_str() {
        "players" | "online" | "who" => Some(BotCommand::Players),
        "status" | "server" => Some(BotCommand::Status),
        "help" => Some(BotCommand::Help),
        _ => None,
    }
}

/// Platform-neutral description of an embed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: Colour,
    /// (name, value, inline)
    pub fields: Vec<(String, String, bool)>,
    pub footer: Option<String>,
}

impl ReportView {
    fn new(colour: Colour) -> Self {
        Self {
            title: None,
            description: None,
            colour,
            fields: Vec::new(),
            footer: None,
        }
    }

    fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push((name.into(), value.into(), inline));
        self
    }

    fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Look up a field value by name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, v, _)| v.as_str())
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new().colour(self.colour);
        if let Some(ref title) = self.title {
            embed = embed.title(title);
        }
        if let Some(ref description) = self.description {
            embed = embed.description(description);
        }
        for (name, value, inline) in &self.fields {
            embed = embed.field(name, value, *inline);
        }
        if let Some(ref footer) = self.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer));
        }
        embed
    }
}

/// "1 player", "3 players".
pub fn players_label(count: u32) -> String {
    format!("{} player{}", count, if count == 1 { "" } else { "s" })
}

/// Embed for the `status` command.
pub fn status_view(report: &StatusReport) -> ReportView {
    match report {
        StatusReport::Online { count, endpoint } => ReportView::new(GREEN)
            .title("🟢 Server Status")
            .description("Server is online and responding")
            .field("Players Online", players_label(*count), true)
            .field("API Endpoint", endpoint.as_str(), true),
        StatusReport::Degraded { status } => ReportView::new(ORANGE)
            .title("🟡 Server Status")
            .description(format!("Server responded with status code: {}", status)),
        StatusReport::Unreachable { error } => ReportView::new(RED)
            .title("🔴 Server Status")
            .description("Server is offline or unreachable")
            .field("Error", truncate_field(error), false),
    }
}

/// Embed for the `players` command.
pub fn players_view(report: &PlayersReport) -> ReportView {
    match report {
        PlayersReport::Online { count, names } => {
            let list = if names.is_empty() {
                "No players online".to_string()
            } else {
                bullet_list(names)
            };
            ReportView::new(BLUE)
                .title("🎮 Online Players")
                .field("Player Count", format!("{} online", players_label(*count)), false)
                .field("Players", list, false)
        }
        PlayersReport::Unavailable { reason } => ReportView::new(RED)
            .title("❌ Error")
            .description("Could not retrieve player information from the server.")
            .field("Error", truncate_field(reason), false),
    }
}

/// Embed for the `help` command.
pub fn help_view(prefix: &str) -> ReportView {
    ReportView::new(BLUE).title("Available Commands").description(format!(
        "• `{p}players` - List online players (also `{p}online`, `{p}who`)\n\
         • `{p}status` - Check server status (also `{p}server`)\n\
         • `{p}help` - Show this help message\n\n\
         Any other message in this channel is sent to the Minecraft chat.",
        p = prefix
    ))
}

/// Embed for a relayed notice.
pub fn notice_view(notice: &RelayNotice) -> ReportView {
    match notice {
        RelayNotice::PlayerJoined { player } => ReportView::new(GREEN)
            .title("🟢 Player Joined")
            .description(format!("**{}** joined the server", escape_markdown(player))),
        RelayNotice::PlayerLeft { player } => ReportView::new(RED)
            .title("🔴 Player Left")
            .description(format!("**{}** left the server", escape_markdown(player))),
        RelayNotice::Chat { player, message } => ReportView::new(BLUE)
            .description(format!(
                "**{}:** {}",
                escape_markdown(player),
                escape_markdown(message)
            ))
            .footer("Minecraft Chat"),
        RelayNotice::BridgeOnline => ReportView::new(GREEN)
            .title("🟢 Minecraft Bridge Online")
            .description(notice.to_string()),
    }
}

/// One `• name` line per player, cut short to fit in a field.
fn bullet_list(names: &[String]) -> String {
    let mut list = String::new();
    for (i, name) in names.iter().enumerate() {
        let line = format!("• {}", escape_markdown(name));
        let remaining = names.len() - i;
        // Leave room for the "… and N more" tail.
        if list.len() + line.len() + 1 > FIELD_LIMIT - 32 {
            list.push_str(&format!("\n… and {} more", remaining));
            break;
        }
        if !list.is_empty() {
            list.push('\n');
        }
        list.push_str(&line);
    }
    list
}

/// Backslash-escape Discord markdown so game text renders literally.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '~' | '|' | '`' | '>' | '#' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn truncate_field(text: &str) -> String {
    if text.chars().count() <= FIELD_LIMIT {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(FIELD_LIMIT - 1).collect();
    cut.push('…');
    cut
}
