//! Slack Web API client backing [`ChatClient`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use slack_morphism::prelude::{
    SlackApiChatDeleteRequest, SlackApiChatPostMessageRequest, SlackApiFilesComplete,
    SlackApiFilesCompleteUploadExternalRequest, SlackApiFilesGetUploadUrlExternalRequest,
    SlackApiToken, SlackApiTokenType, SlackApiTokenValue, SlackChannelId, SlackClient,
    SlackClientHyperHttpsConnector, SlackClientSession, SlackMessageAttachment,
    SlackMessageContent, SlackTs,
};
use tracing::info;

use super::{ChatAttachment, ChatClient, FileUpload};
use crate::models::callback::FileRef;
use crate::{config::SlackConfig, AppError, Result};

/// Slack Web API wrapper shared by every request.
pub struct SlackService {
    client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    bot_token: SlackApiToken,
    http: reqwest::Client,
}

impl SlackService {
    /// Build the Slack client once for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        let client = Arc::new(SlackClient::new(connector));
        let bot_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.bot_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::Bot),
        };

        info!(bot_id = %config.bot_id, "slack service ready");

        Ok(Self {
            client,
            bot_token,
            http: reqwest::Client::new(),
        })
    }

    /// Create an HTTP session for direct API calls using the bot token.
    #[must_use]
    pub fn http_session(&self) -> SlackClientSession<'_, SlackClientHyperHttpsConnector> {
        self.client.open_session(&self.bot_token)
    }

    /// Post a message consisting of one coloured attachment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the Slack API call fails.
    pub async fn post_attachment(
        &self,
        channel: SlackChannelId,
        attachment: ChatAttachment,
    ) -> Result<()> {
        let content = SlackMessageContent {
            text: None,
            blocks: None,
            attachments: Some(vec![SlackMessageAttachment::new()
                .with_text(attachment.text)
                .with_color(attachment.color)]),
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
            markdown_text: None,
        };

        let request = SlackApiChatPostMessageRequest {
            channel,
            content,
            as_user: None,
            icon_emoji: None,
            icon_url: None,
            link_names: Some(true),
            parse: None,
            thread_ts: None,
            username: None,
            reply_broadcast: None,
            unfurl_links: None,
            unfurl_media: None,
        };

        self.http_session()
            .chat_post_message(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to post message: {err}")))?;
        Ok(())
    }

    /// Delete an existing Slack message.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the Slack API call fails.
    pub async fn delete(&self, channel: SlackChannelId, ts: SlackTs) -> Result<()> {
        let request = SlackApiChatDeleteRequest::new(channel, ts);
        self.http_session()
            .chat_delete(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to delete message: {err}")))?;
        Ok(())
    }

    /// Upload a local file to a Slack channel using the external upload flow.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read, or `AppError::Slack`
    /// if any upload step fails.
    pub async fn upload(&self, upload: FileUpload) -> Result<FileRef> {
        let content = tokio::fs::read(&upload.path).await?;
        let filename = upload
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("logs.txt")
            .to_owned();
        let session = self.http_session();

        // Step 1: Get upload URL.
        let url_request = SlackApiFilesGetUploadUrlExternalRequest::new(filename, content.len());
        let url_response = session
            .get_upload_url_external(&url_request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to get upload url: {err}")))?;
        let file_id = url_response.file_id.0.clone();

        // Step 2: Upload content to the URL.
        send_upload_content(&self.http, &url_response.upload_url.0.to_string(), content).await?;

        // Step 3: Complete the upload.
        let file_ref = SlackApiFilesComplete {
            id: url_response.file_id,
            title: Some(upload.title.clone()),
        };
        let mut complete_request = SlackApiFilesCompleteUploadExternalRequest::new(vec![file_ref]);
        complete_request.channel_id = Some(SlackChannelId(upload.channel));
        session
            .files_complete_upload_external(&complete_request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to complete upload: {err}")))?;

        info!(file_id, "log artifact uploaded");

        Ok(FileRef {
            id: file_id,
            title: upload.title,
            filetype: upload.filetype,
        })
    }
}

/// POST file bytes to a Slack-issued upload URL.
///
/// # Errors
///
/// Returns `AppError::Slack` if the request fails or the upload URL answers
/// with a non-success status.
pub async fn send_upload_content(
    http: &reqwest::Client,
    upload_url: &str,
    content: Vec<u8>,
) -> Result<()> {
    http.post(upload_url)
        .body(content)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|err| AppError::Slack(format!("failed to upload file: {err}")))?;
    Ok(())
}

impl ChatClient for SlackService {
    fn post_message(
        &self,
        channel: &str,
        attachment: ChatAttachment,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let channel = SlackChannelId(channel.to_owned());
        Box::pin(self.post_attachment(channel, attachment))
    }

    fn delete_message(
        &self,
        channel: &str,
        ts: &str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let channel = SlackChannelId(channel.to_owned());
        let ts = SlackTs(ts.to_owned());
        Box::pin(self.delete(channel, ts))
    }

    fn upload_file(
        &self,
        upload: FileUpload,
    ) -> Pin<Box<dyn Future<Output = Result<FileRef>> + Send + '_>> {
        Box::pin(self.upload(upload))
    }
}
