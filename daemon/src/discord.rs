use anyhow::{anyhow, Result};
use discord_rich_presence::activity::{Activity, Assets, Timestamps};
use discord_rich_presence::{DiscordIpc, DiscordIpcClient};

use crate::presence::{Presence, PresenceSink};

/// [`PresenceSink`] backed by the local Discord client over its IPC socket.
pub struct DiscordPresence {
    client: DiscordIpcClient,
    large_image: String,
}

/// Values sent to Discord for one publish.
#[derive(Debug, PartialEq, Eq)]
struct ActivityFields<'a> {
    state: &'a str,
    details: &'a str,
    large_image: &'a str,
    /// Tooltip of the large image; mirrors `details`.
    large_text: &'a str,
    /// Unix seconds. Each publish restarts the elapsed-time counter.
    start: i64,
}

/// Maps `presence` onto the activity fields, stamping the current time.
fn activity_fields<'a>(presence: &'a Presence, large_image: &'a str) -> ActivityFields<'a> {
    ActivityFields {
        state: &presence.state,
        details: &presence.details,
        large_image,
        large_text: &presence.details,
        start: chrono::Utc::now().timestamp(),
    }
}

impl DiscordPresence {
    /// Creates an unconnected client for the Discord application `client_id`.
    pub fn new(client_id: &str, large_image: &str) -> Result<Self> {
        let client = DiscordIpcClient::new(client_id)
            .map_err(|e| anyhow!("Failed to create Discord IPC client: {e}"))?;
        Ok(Self {
            client,
            large_image: large_image.to_string(),
        })
    }
}

impl PresenceSink for DiscordPresence {
    fn connect(&mut self) -> Result<()> {
        self.client
            .connect()
            .map_err(|e| anyhow!("Failed to connect to Discord: {e}"))
    }

    fn publish(&mut self, presence: &Presence) -> Result<()> {
        let fields = activity_fields(presence, &self.large_image);
        let activity = Activity::new()
            .state(fields.state)
            .details(fields.details)
            .assets(
                Assets::new()
                    .large_image(fields.large_image)
                    .large_text(fields.large_text),
            )
            .timestamps(Timestamps::new().start(fields.start));
        self.client
            .set_activity(activity)
            .map_err(|e| anyhow!("Failed to update Discord presence: {e}"))
    }

    fn clear(&mut self) -> Result<()> {
        self.client
            .clear_activity()
            .map_err(|e| anyhow!("Failed to clear Discord presence: {e}"))
    }

    fn close(&mut self) -> Result<()> {
        self.clear()?;
        self.client
            .close()
            .map_err(|e| anyhow!("Failed to close Discord connection: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intro() -> Presence {
        Presence {
            state: "Projects: Intro (Tab: Intro)".to_string(),
            details: "Using FL Studio 20".to_string(),
        }
    }

    // ── activity_fields ───────────────────────────────────────────────────────

    #[test]
    fn text_fields_come_from_presence() {
        let p = intro();
        let fields = activity_fields(&p, "flstudio10");
        assert_eq!(fields.state, "Projects: Intro (Tab: Intro)");
        assert_eq!(fields.details, "Using FL Studio 20");
    }

    #[test]
    fn large_text_mirrors_details() {
        let p = intro();
        let fields = activity_fields(&p, "flstudio10");
        assert_eq!(fields.large_text, fields.details);
    }

    #[test]
    fn large_image_is_the_configured_asset() {
        let p = intro();
        assert_eq!(activity_fields(&p, "flstudio10").large_image, "flstudio10");
        assert_eq!(activity_fields(&p, "fl21").large_image, "fl21");
    }

    #[test]
    fn start_is_current_unix_time() {
        let p = intro();
        let before = chrono::Utc::now().timestamp();
        let fields = activity_fields(&p, "flstudio10");
        let after = chrono::Utc::now().timestamp();
        assert!(fields.start >= before && fields.start <= after);
        assert!(after - before <= 1);
    }
}
