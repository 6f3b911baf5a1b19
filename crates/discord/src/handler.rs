//! Discord event handler for serenity.

use std::sync::Arc;

use {
    serenity::{
        all::{Context, EventHandler, GatewayIntents, Message, Ready},
        async_trait,
    },
    tracing::{info, warn},
};

use {
    crate::chunk::chunk_message,
    yumi_chat::{ChatEngine, WeatherChain},
};

const ATTACHMENT_NOTICE: &str =
    "I can't read attachments yet — send me your question as text and I'm all ears!";
const FAILURE_NOTICE: &str = "Sorry, I couldn't come up with a reply just now. Please try again.";

/// What an inbound message asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// `!weather <query>`
    Weather(&'a str),
    /// Everything else: ordinary conversation.
    Chat(&'a str),
}

/// Route a message body to its handler.
pub fn parse_command(content: &str) -> Command<'_> {
    match content.strip_prefix("!weather") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => Command::Weather(rest.trim()),
        _ => Command::Chat(content.trim()),
    }
}

/// Handler for Discord gateway events.
pub struct YumiHandler {
    pub engine: Arc<ChatEngine>,
    pub weather: Option<Arc<WeatherChain>>,
    /// Outbound message size limit in characters.
    pub max_message_len: usize,
}

impl YumiHandler {
    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Sessions are scoped per channel: each channel (and each DM) is its
    /// own conversation.
    fn session_key(msg: &Message) -> String {
        format!("discord:{}", msg.channel_id)
    }

    async fn send_chunked(&self, ctx: &Context, msg: &Message, text: &str) {
        for chunk in chunk_message(text, self.max_message_len) {
            if let Err(e) = msg.channel_id.say(&ctx.http, chunk).await {
                warn!(error = %e, channel_id = %msg.channel_id, "failed to send reply chunk");
                break;
            }
        }
    }
}

#[async_trait]
impl EventHandler for YumiHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages (our own included) to prevent loops.
        if msg.author.bot {
            return;
        }

        if !msg.attachments.is_empty() {
            let _ = msg.channel_id.say(&ctx.http, ATTACHMENT_NOTICE).await;
            return;
        }

        let session_key = Self::session_key(&msg);
        let typing = msg.channel_id.start_typing(&ctx.http);

        let reply = match parse_command(&msg.content) {
            Command::Weather(query) if query.is_empty() => {
                Ok("Tell me a city, like `!weather Boston`.".to_string())
            },
            Command::Weather(query) => match &self.weather {
                Some(chain) => chain.report(query).await,
                None => Ok("Weather lookups aren't configured on this bot.".to_string()),
            },
            Command::Chat(text) if text.is_empty() => {
                typing.stop();
                return;
            },
            Command::Chat(text) => self.engine.respond(&session_key, text).await,
        };

        typing.stop();

        match reply {
            Ok(text) => self.send_chunked(&ctx, &msg, &text).await,
            Err(e) => {
                warn!(error = %e, session_key, "failed to produce a reply");
                let _ = msg.channel_id.say(&ctx.http, FAILURE_NOTICE).await;
            },
        }
    }
}
