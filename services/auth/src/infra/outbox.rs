//! Outbox relay: drains `outbox_events` and delivers verification-code
//! emails. Events are written in the same transaction as their code, so a
//! crash between commit and send loses nothing; the relay retries with
//! backoff until delivery or the attempt cap.

use anyhow::Context as _;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Deserialize;
use uuid::Uuid;

use uservault_mailer::Mailer;

use uservault_auth_schema::outbox_events;

use crate::domain::types::CodePurpose;
use crate::infra::emails::render_code_email;

/// Give up on an event after this many delivery attempts.
const MAX_ATTEMPTS: i32 = 5;

/// Events fetched per relay tick.
const BATCH_SIZE: u64 = 20;

/// Delay between relay ticks.
const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Deserialize)]
struct CodeEventPayload {
    email: String,
    code: String,
    purpose: String,
}

pub struct OutboxRelay<M: Mailer> {
    pub db: DatabaseConnection,
    pub mailer: M,
    pub public_origin: String,
}

impl<M: Mailer> OutboxRelay<M> {
    /// Run forever. Spawned as a background task next to the HTTP server.
    pub async fn run(self) {
        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "outbox relay tick failed");
            }
            tokio::time::sleep(TICK_INTERVAL).await;
        }
    }

    /// Process one batch of due events.
    pub async fn tick(&self) -> anyhow::Result<()> {
        let now = Utc::now();
        let due = outbox_events::Entity::find()
            .filter(outbox_events::Column::ProcessedAt.is_null())
            .filter(outbox_events::Column::FailedAt.is_null())
            .filter(outbox_events::Column::NextAttemptAt.lte(now))
            .order_by_asc(outbox_events::Column::NextAttemptAt)
            .limit(BATCH_SIZE)
            .all(&self.db)
            .await
            .context("fetch due outbox events")?;

        for event in due {
            match self.deliver(&event).await {
                Ok(()) => self.mark_processed(event.id).await?,
                Err(e) => {
                    tracing::warn!(
                        event_id = %event.id,
                        attempts = event.attempts + 1,
                        error = %e,
                        "outbox delivery failed"
                    );
                    self.record_failure(&event, &e.to_string()).await?;
                }
            }
        }
        Ok(())
    }

    async fn deliver(&self, event: &outbox_events::Model) -> anyhow::Result<()> {
        match event.kind.as_str() {
            "verification_code_created" => {
                let payload: CodeEventPayload = serde_json::from_value(event.payload.clone())
                    .context("decode verification_code_created payload")?;
                let purpose = CodePurpose::from_str(&payload.purpose)
                    .with_context(|| format!("unknown code purpose {:?}", payload.purpose))?;
                let message = render_code_email(
                    &payload.email,
                    purpose,
                    &payload.code,
                    &self.public_origin,
                );
                self.mailer.send(&message).await
            }
            other => anyhow::bail!("unknown outbox event kind {other:?}"),
        }
    }

    async fn mark_processed(&self, id: Uuid) -> anyhow::Result<()> {
        outbox_events::ActiveModel {
            id: Set(id),
            processed_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark outbox event processed")?;
        Ok(())
    }

    async fn record_failure(
        &self,
        event: &outbox_events::Model,
        error: &str,
    ) -> anyhow::Result<()> {
        let attempts = event.attempts + 1;
        let now = Utc::now();
        let mut model = outbox_events::ActiveModel {
            id: Set(event.id),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            ..Default::default()
        };
        if attempts >= MAX_ATTEMPTS {
            model.failed_at = Set(Some(now));
        } else {
            // Exponential backoff: 10s, 20s, 40s, 80s.
            let delay = 10i64 << (attempts - 1);
            model.next_attempt_at = Set(now + Duration::seconds(delay));
        }
        model
            .update(&self.db)
            .await
            .context("record outbox failure")?;
        Ok(())
    }
}
