//! Serenity-backed [`ChatPlatform`].

use crate::{
    ChatPlatform, OutgoingMessage, PlatformChannel, PlatformCommunity, PlatformMessage,
    PlatformMessageBuilder,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use enikki_error::{DiscordError, DiscordErrorKind, DiscordResult};
use serenity::builder::{CreateAttachment, CreateMessage, GetMessages};
use serenity::http::{GuildPagination, Http};
use serenity::model::channel::{ChannelType, Message};
use serenity::model::id::{ChannelId, GuildId, MessageId};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Page size for guild enumeration.
const GUILD_PAGE_LIMIT: u64 = 200;

/// Discord access over Serenity's REST client.
///
/// No gateway connection is opened: a digest run only needs request/response
/// calls. Every call is bounded by the configured timeout.
///
/// # Example
///
/// ```rust,ignore
/// let platform = DiscordPlatform::connect(token, Duration::from_secs(30)).await?;
/// let me = platform.current_user_id().await?;
/// platform.close().await;
/// ```
#[derive(Clone)]
pub struct DiscordPlatform {
    http: Arc<Http>,
    request_timeout: Duration,
    user_id: u64,
}

impl DiscordPlatform {
    /// Log in with `token` and verify it by fetching the bot user.
    ///
    /// # Errors
    ///
    /// Returns [`DiscordErrorKind::ConnectionFailed`] if the token is rejected
    /// or Discord cannot be reached, and [`DiscordErrorKind::Timeout`] if the
    /// check exceeds `request_timeout`.
    #[instrument(skip(token), fields(token_len = token.as_ref().len()))]
    pub async fn connect(token: impl AsRef<str>, request_timeout: Duration) -> DiscordResult<Self> {
        let http = Arc::new(Http::new(token.as_ref()));

        let user = match tokio::time::timeout(request_timeout, http.get_current_user()).await {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                error!(error = %e, "Failed to log in to Discord");
                return Err(DiscordError::new(DiscordErrorKind::ConnectionFailed(
                    e.to_string(),
                )));
            }
            Err(_) => {
                return Err(DiscordError::new(DiscordErrorKind::Timeout(format!(
                    "login after {:?}",
                    request_timeout
                ))));
            }
        };

        info!(user = %user.name, user_id = user.id.get(), "Connected to Discord");
        Ok(Self {
            http,
            request_timeout,
            user_id: user.id.get(),
        })
    }

    /// End the session.
    ///
    /// Only REST calls are made, so there is no socket to shut down; this
    /// releases the client and marks the end of the session in the logs.
    pub async fn close(self) {
        drop(self.http);
        info!("Discord session closed");
    }

    /// Run a Serenity call under the request timeout.
    async fn call<T, F>(&self, operation: &str, fut: F) -> DiscordResult<T>
    where
        F: Future<Output = serenity::Result<T>>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(DiscordError::new(DiscordErrorKind::SerenityError(format!(
                "{}: {}",
                operation, e
            )))),
            Err(_) => Err(DiscordError::new(DiscordErrorKind::Timeout(format!(
                "{} after {:?}",
                operation, self.request_timeout
            )))),
        }
    }

    fn convert_message(message: Message) -> DiscordResult<PlatformMessage> {
        let author_display_name = display_name(
            message.member.as_ref().and_then(|member| member.nick.as_deref()),
            message.author.global_name.as_deref(),
            &message.author.name,
        );

        // Discord stamps carry milliseconds; bursts within one second must keep their order.
        let created_at = DateTime::parse_from_rfc3339(&message.timestamp.to_string())
            .map(|at| at.with_timezone(&Utc))
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::InvalidId(format!(
                    "message {} has an unreadable timestamp: {}",
                    message.id, e
                )))
            })?;

        PlatformMessageBuilder::default()
            .id(message.id.get())
            .author_id(message.author.id.get())
            .author_display_name(author_display_name)
            .is_bot_author(message.author.bot)
            .content(message.content)
            .created_at(created_at)
            .build()
            .map_err(|e| DiscordError::new(DiscordErrorKind::SerenityError(e.to_string())))
    }
}

/// Guild nickname, then global display name, then username.
fn display_name(nick: Option<&str>, global_name: Option<&str>, username: &str) -> String {
    nick.or(global_name).unwrap_or(username).to_string()
}

/// Map a failed destination lookup to an error kind.
///
/// Only 403 and 404 mean the channel is unusable; anything else keeps the
/// underlying cause.
fn channel_lookup_error(channel_id: u64, status: Option<u16>, cause: String) -> DiscordError {
    match status {
        Some(403 | 404) => {
            warn!(channel_id, error = %cause, "Destination channel not accessible");
            DiscordError::new(DiscordErrorKind::ChannelNotFound(channel_id))
        }
        _ => {
            error!(channel_id, error = %cause, "Destination channel lookup failed");
            DiscordError::new(DiscordErrorKind::SerenityError(format!(
                "get_channel {}: {}",
                channel_id, cause
            )))
        }
    }
}

impl std::fmt::Debug for DiscordPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordPlatform")
            .field("user_id", &self.user_id)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn current_user_id(&self) -> DiscordResult<u64> {
        Ok(self.user_id)
    }

    #[instrument(skip(self))]
    async fn communities(&self) -> DiscordResult<Vec<PlatformCommunity>> {
        let mut communities = Vec::new();
        let mut after: Option<GuildId> = None;

        loop {
            let page = self
                .call(
                    "get_guilds",
                    self.http
                        .get_guilds(after.map(GuildPagination::After), Some(GUILD_PAGE_LIMIT)),
                )
                .await?;
            let page_len = page.len();
            after = page.last().map(|guild| guild.id);

            communities.extend(
                page.into_iter()
                    .map(|guild| PlatformCommunity::new(guild.id.get(), guild.name)),
            );

            if (page_len as u64) < GUILD_PAGE_LIMIT || after.is_none() {
                break;
            }
        }

        debug!(count = communities.len(), "Enumerated guilds");
        Ok(communities)
    }

    #[instrument(skip(self, community), fields(community = %community.name()))]
    async fn text_channels(
        &self,
        community: &PlatformCommunity,
    ) -> DiscordResult<Vec<PlatformChannel>> {
        let guild_id = GuildId::new(*community.id());
        let channels = self
            .call("get_channels", self.http.get_channels(guild_id))
            .await?;

        Ok(channels
            .into_iter()
            .filter(|channel| channel.kind == ChannelType::Text)
            .map(|channel| PlatformChannel::new(channel.id.get(), channel.name))
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_messages(
        &self,
        channel_id: u64,
        before: Option<u64>,
        limit: u8,
    ) -> DiscordResult<Vec<PlatformMessage>> {
        let mut builder = GetMessages::new().limit(limit);
        if let Some(before) = before {
            builder = builder.before(MessageId::new(before));
        }

        let messages = self
            .call(
                "get_messages",
                ChannelId::new(channel_id).messages(self.http.as_ref(), builder),
            )
            .await?;

        messages
            .into_iter()
            .map(Self::convert_message)
            .collect()
    }

    #[instrument(skip(self))]
    async fn resolve_channel(&self, channel_id: u64) -> DiscordResult<PlatformChannel> {
        let lookup = self.http.get_channel(ChannelId::new(channel_id));
        let channel = match tokio::time::timeout(self.request_timeout, lookup).await {
            Ok(Ok(channel)) => channel,
            Ok(Err(e)) => {
                let status = match &e {
                    serenity::Error::Http(http) => http.status_code().map(|code| code.as_u16()),
                    _ => None,
                };
                return Err(channel_lookup_error(channel_id, status, e.to_string()));
            }
            Err(_) => {
                return Err(DiscordError::new(DiscordErrorKind::Timeout(format!(
                    "get_channel after {:?}",
                    self.request_timeout
                ))));
            }
        };

        let guild_channel = channel.guild().ok_or_else(|| {
            warn!(channel_id, "Destination is not a guild text channel");
            DiscordError::new(DiscordErrorKind::ChannelNotFound(channel_id))
        })?;

        Ok(PlatformChannel::new(guild_channel.id.get(), guild_channel.name))
    }

    #[instrument(skip(self, message), fields(has_text = message.text.is_some(), has_attachment = message.attachment.is_some()))]
    async fn send_message(&self, channel_id: u64, message: OutgoingMessage) -> DiscordResult<()> {
        let mut builder = CreateMessage::new();
        if let Some(text) = message.text {
            builder = builder.content(text);
        }
        if let Some(attachment) = message.attachment {
            builder = builder.add_file(CreateAttachment::bytes(
                attachment.bytes().clone(),
                attachment.filename().clone(),
            ));
        }

        self.call(
            "send_message",
            ChannelId::new(channel_id).send_message(self.http.as_ref(), builder),
        )
        .await
        .map_err(|e| match e.kind {
            DiscordErrorKind::Timeout(_) => e,
            _ => DiscordError::new(DiscordErrorKind::MessageSendFailed(e.kind.to_string())),
        })?;

        Ok(())
    }
}
