use crate::attachment::{load_attachments, Attachments};
use crate::config::{Config, RunContext};
use crate::error::{Error, Result};
use crate::slack::MessageClient;
use crate::template::build_template;

/// Post a new message, or update the one at `timestamp` when it is non-empty.
///
/// Returns the timestamp Slack reports for the message.
pub async fn dispatch(
    client: &dyn MessageClient,
    channel: &str,
    timestamp: &str,
    attachments: &Attachments,
) -> Result<String> {
    if !timestamp.is_empty() {
        tracing::info!(channel, ts = timestamp, "Updating message");
        let updated = client
            .update_message(channel, timestamp, attachments.as_slice())
            .await
            .map_err(Error::Update)?;
        return Ok(updated.ts);
    }

    tracing::info!(channel, "Posting message");
    let posted = client
        .post_message(channel, attachments.as_slice())
        .await
        .map_err(Error::Send)?;
    Ok(posted.ts)
}

/// Build the payload for this invocation and send it.
pub async fn run(config: &Config, context: &RunContext, client: &dyn MessageClient) -> Result<String> {
    let attachments = match &config.attachments_file {
        Some(path) => {
            tracing::debug!(file = %path.display(), "Using attachments file");
            load_attachments(path, &config.fields)?
        }
        None => {
            tracing::debug!(status = %config.status, fail = config.fail, "Using default template");
            build_template(context, &config.status, config.fail, &config.fields).into()
        }
    };

    dispatch(client, &config.channel, &config.timestamp, &attachments).await
}
