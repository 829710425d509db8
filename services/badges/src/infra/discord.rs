use serde_json::json;

use crate::domain::repository::ModerationNotifier;
use crate::domain::types::{BadgeRequest, DirectoryUser};

/// Posts new badge requests to a Discord channel webhook so moderators can
/// act on them. Optional: no webhook URL configured means no-op.
#[derive(Clone)]
pub struct DiscordNotifier {
    pub client: reqwest::Client,
    pub webhook_url: Option<String>,
}

impl ModerationNotifier for DiscordNotifier {
    async fn notify_new_request(&self, request: &BadgeRequest, user: &DirectoryUser) {
        let Some(url) = &self.webhook_url else {
            return;
        };

        let color = u32::from_str_radix(request.badge_color.trim_start_matches('#'), 16)
            .unwrap_or(0x8b5cf6);

        let payload = json!({
            "embeds": [{
                "title": "New Badge Request",
                "color": color,
                "fields": [
                    { "name": "User", "value": format!("@{}", user.username), "inline": true },
                    { "name": "Request ID", "value": request.id.to_string(), "inline": true },
                    { "name": "Badge Name", "value": request.badge_name, "inline": false },
                    {
                        "name": "Description",
                        "value": request.badge_description.as_deref().unwrap_or("No description"),
                        "inline": false
                    },
                    { "name": "Color", "value": request.badge_color, "inline": true },
                    {
                        "name": "Icon URL",
                        "value": request.badge_icon_url.as_deref().unwrap_or("No custom icon"),
                        "inline": false
                    },
                ],
                "timestamp": request.created_at.to_rfc3339(),
            }],
        });

        // Failures only cost the notification, never the request.
        if let Err(e) = self.client.post(url).json(&payload).send().await {
            tracing::warn!(request_id = %request.id, error = %e, "discord notification failed");
        }
    }
}
