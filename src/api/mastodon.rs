//! Mastodon API client

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{Account, List, Notification, Relationship, Status};

use super::ApiError;

/// Ancestors and descendants of one status
#[derive(Debug, Deserialize)]
pub struct ThreadContext {
    /// Statuses this one replies to, oldest first
    pub ancestors: Vec<Status>,
    /// Replies to this status
    pub descendants: Vec<Status>,
}

/// Parameters for posting a status
#[derive(Debug, Serialize, Default)]
pub struct NewStatus {
    /// Status text
    pub status: String,
    /// Visibility override (public, unlisted, private, direct)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Status being replied to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_id: Option<String>,
    /// Content warning text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoiler_text: Option<String>,
}

/// Mastodon API client bound to one instance and access token
pub struct MastodonClient {
    client: Client,
    instance: String,
    access_token: String,
}

impl MastodonClient {
    /// Create a new client for `instance` (scheme included)
    pub fn new(instance: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            instance: instance.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// The instance base URL
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Build API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/v1{}", self.instance, endpoint)
    }

    async fn check(method: &'static str, endpoint: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        // Error bodies are usually {"error": "..."}.
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        Err(ApiError::Status {
            method,
            endpoint: endpoint.to_string(),
            status,
            message,
        }
        .into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {endpoint}");
        let response = self
            .client
            .get(self.api_url(endpoint))
            .query(query)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("GET {endpoint} failed"))?;
        Self::check("GET", endpoint, response)
            .await?
            .json()
            .await
            .with_context(|| format!("failed to parse response of GET {endpoint}"))
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!("POST {endpoint}");
        let response = self
            .client
            .post(self.api_url(endpoint))
            .json(body)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("POST {endpoint} failed"))?;
        Self::check("POST", endpoint, response)
            .await?
            .json()
            .await
            .with_context(|| format!("failed to parse response of POST {endpoint}"))
    }

    async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.post_json(endpoint, &serde_json::json!({})).await
    }

    async fn post_no_response(&self, endpoint: &str) -> Result<()> {
        tracing::debug!("POST {endpoint}");
        let response = self
            .client
            .post(self.api_url(endpoint))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("POST {endpoint} failed"))?;
        Self::check("POST", endpoint, response).await?;
        Ok(())
    }

    async fn delete(&self, endpoint: &str) -> Result<()> {
        tracing::debug!("DELETE {endpoint}");
        let response = self
            .client
            .delete(self.api_url(endpoint))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("DELETE {endpoint} failed"))?;
        Self::check("DELETE", endpoint, response).await?;
        Ok(())
    }

    fn limit_query(limit: Option<usize>) -> Vec<(&'static str, String)> {
        limit.map_or_else(Vec::new, |n| vec![("limit", n.to_string())])
    }

    // ==================== Timelines ====================

    /// Home timeline
    pub async fn timeline_home(&self, limit: Option<usize>) -> Result<Vec<Status>> {
        self.get_json("/timelines/home", &Self::limit_query(limit))
            .await
    }

    /// Public timeline; `local` restricts to this instance
    pub async fn timeline_public(&self, local: bool, limit: Option<usize>) -> Result<Vec<Status>> {
        let mut query = Self::limit_query(limit);
        query.push(("local", local.to_string()));
        self.get_json("/timelines/public", &query).await
    }

    /// Hashtag timeline
    pub async fn timeline_tag(&self, tag: &str, limit: Option<usize>) -> Result<Vec<Status>> {
        self.get_json(
            &format!("/timelines/tag/{}", urlencoding::encode(tag)),
            &Self::limit_query(limit),
        )
        .await
    }

    /// Timeline of a user-defined list
    pub async fn timeline_list(&self, list_id: &str, limit: Option<usize>) -> Result<Vec<Status>> {
        self.get_json(
            &format!("/timelines/list/{list_id}"),
            &Self::limit_query(limit),
        )
        .await
    }

    // ==================== Statuses ====================

    /// Fetch a single status
    pub async fn status(&self, id: &str) -> Result<Status> {
        self.get_json(&format!("/statuses/{id}"), &[]).await
    }

    /// Fetch the thread around a status
    pub async fn status_context(&self, id: &str) -> Result<ThreadContext> {
        self.get_json(&format!("/statuses/{id}/context"), &[]).await
    }

    /// Post a new status
    pub async fn post_status(&self, new_status: &NewStatus) -> Result<Status> {
        self.post_json("/statuses", new_status).await
    }

    /// Delete a status
    pub async fn delete_status(&self, id: &str) -> Result<()> {
        self.delete(&format!("/statuses/{id}")).await
    }

    /// Favorite a status
    pub async fn favourite(&self, id: &str) -> Result<Status> {
        self.post_empty(&format!("/statuses/{id}/favourite")).await
    }

    /// Remove a favorite
    pub async fn unfavourite(&self, id: &str) -> Result<Status> {
        self.post_empty(&format!("/statuses/{id}/unfavourite"))
            .await
    }

    /// Boost a status
    pub async fn reblog(&self, id: &str) -> Result<Status> {
        self.post_empty(&format!("/statuses/{id}/reblog")).await
    }

    /// Remove a boost
    pub async fn unreblog(&self, id: &str) -> Result<Status> {
        self.post_empty(&format!("/statuses/{id}/unreblog")).await
    }

    /// Bookmark a status
    pub async fn bookmark(&self, id: &str) -> Result<Status> {
        self.post_empty(&format!("/statuses/{id}/bookmark")).await
    }

    /// Remove a bookmark
    pub async fn unbookmark(&self, id: &str) -> Result<Status> {
        self.post_empty(&format!("/statuses/{id}/unbookmark"))
            .await
    }

    /// Statuses we have bookmarked
    pub async fn bookmarks(&self, limit: Option<usize>) -> Result<Vec<Status>> {
        self.get_json("/bookmarks", &Self::limit_query(limit)).await
    }

    /// Statuses we have favorited
    pub async fn favourites(&self, limit: Option<usize>) -> Result<Vec<Status>> {
        self.get_json("/favourites", &Self::limit_query(limit))
            .await
    }

    /// Vote on a poll
    pub async fn poll_vote(&self, poll_id: &str, choices: &[usize]) -> Result<()> {
        let body = serde_json::json!({ "choices": choices });
        let _: serde_json::Value = self
            .post_json(&format!("/polls/{poll_id}/votes"), &body)
            .await?;
        Ok(())
    }

    // ==================== Notifications ====================

    /// Recent notifications
    pub async fn notifications(&self, limit: Option<usize>) -> Result<Vec<Notification>> {
        self.get_json("/notifications", &Self::limit_query(limit))
            .await
    }

    /// Dismiss one notification
    pub async fn dismiss_notification(&self, id: &str) -> Result<()> {
        self.post_no_response(&format!("/notifications/{id}/dismiss"))
            .await
    }

    /// Clear all notifications
    pub async fn clear_notifications(&self) -> Result<()> {
        self.post_no_response("/notifications/clear").await
    }

    // ==================== Accounts ====================

    /// Verify credentials and return the authenticated account
    pub async fn verify_credentials(&self) -> Result<Account> {
        self.get_json("/accounts/verify_credentials", &[]).await
    }

    /// Fetch an account by ID
    pub async fn account(&self, id: &str) -> Result<Account> {
        self.get_json(&format!("/accounts/{id}"), &[]).await
    }

    /// Search accounts by name or handle
    pub async fn account_search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Account>> {
        let mut params = Self::limit_query(limit);
        params.push(("q", query.to_string()));
        self.get_json("/accounts/search", &params).await
    }

    /// Statuses posted by an account
    pub async fn account_statuses(&self, id: &str, limit: Option<usize>) -> Result<Vec<Status>> {
        self.get_json(
            &format!("/accounts/{id}/statuses"),
            &Self::limit_query(limit),
        )
        .await
    }

    /// Accounts following `id`
    pub async fn followers(&self, id: &str, limit: Option<usize>) -> Result<Vec<Account>> {
        self.get_json(
            &format!("/accounts/{id}/followers"),
            &Self::limit_query(limit),
        )
        .await
    }

    /// Accounts that `id` follows
    pub async fn following(&self, id: &str, limit: Option<usize>) -> Result<Vec<Account>> {
        self.get_json(
            &format!("/accounts/{id}/following"),
            &Self::limit_query(limit),
        )
        .await
    }

    /// Follow an account
    pub async fn follow(&self, id: &str) -> Result<Relationship> {
        self.post_empty(&format!("/accounts/{id}/follow")).await
    }

    /// Unfollow an account
    pub async fn unfollow(&self, id: &str) -> Result<Relationship> {
        self.post_empty(&format!("/accounts/{id}/unfollow")).await
    }

    /// Block an account
    pub async fn block(&self, id: &str) -> Result<Relationship> {
        self.post_empty(&format!("/accounts/{id}/block")).await
    }

    /// Unblock an account
    pub async fn unblock(&self, id: &str) -> Result<Relationship> {
        self.post_empty(&format!("/accounts/{id}/unblock")).await
    }

    /// Mute an account
    pub async fn mute(&self, id: &str) -> Result<Relationship> {
        self.post_empty(&format!("/accounts/{id}/mute")).await
    }

    /// Unmute an account
    pub async fn unmute(&self, id: &str) -> Result<Relationship> {
        self.post_empty(&format!("/accounts/{id}/unmute")).await
    }

    /// Blocked accounts
    pub async fn blocks(&self, limit: Option<usize>) -> Result<Vec<Account>> {
        self.get_json("/blocks", &Self::limit_query(limit)).await
    }

    /// Muted accounts
    pub async fn mutes(&self, limit: Option<usize>) -> Result<Vec<Account>> {
        self.get_json("/mutes", &Self::limit_query(limit)).await
    }

    /// Pending incoming follow requests
    pub async fn follow_requests(&self) -> Result<Vec<Account>> {
        self.get_json("/follow_requests", &[]).await
    }

    /// Accept a follow request
    pub async fn authorize_follow(&self, id: &str) -> Result<()> {
        self.post_no_response(&format!("/follow_requests/{id}/authorize"))
            .await
    }

    /// Reject a follow request
    pub async fn reject_follow(&self, id: &str) -> Result<()> {
        self.post_no_response(&format!("/follow_requests/{id}/reject"))
            .await
    }

    // ==================== Lists ====================

    /// All lists of the authenticated user
    pub async fn lists(&self) -> Result<Vec<List>> {
        self.get_json("/lists", &[]).await
    }

    /// Create a list
    pub async fn create_list(&self, title: &str) -> Result<List> {
        self.post_json("/lists", &serde_json::json!({ "title": title }))
            .await
    }

    /// Rename a list
    pub async fn rename_list(&self, id: &str, title: &str) -> Result<List> {
        let endpoint = format!("/lists/{id}");
        tracing::debug!("PUT {endpoint}");
        let response = self
            .client
            .put(self.api_url(&endpoint))
            .json(&serde_json::json!({ "title": title }))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("PUT {endpoint} failed"))?;
        Self::check("PUT", &endpoint, response)
            .await?
            .json()
            .await
            .with_context(|| format!("failed to parse response of PUT {endpoint}"))
    }

    /// Delete a list
    pub async fn delete_list(&self, id: &str) -> Result<()> {
        self.delete(&format!("/lists/{id}")).await
    }

    /// Accounts in a list
    pub async fn list_accounts(&self, id: &str) -> Result<Vec<Account>> {
        self.get_json(&format!("/lists/{id}/accounts"), &[("limit", "0".to_string())])
            .await
    }

    /// Add accounts to a list
    pub async fn list_add_accounts(&self, id: &str, account_ids: &[String]) -> Result<()> {
        let body = serde_json::json!({ "account_ids": account_ids });
        let endpoint = format!("/lists/{id}/accounts");
        tracing::debug!("POST {endpoint}");
        let response = self
            .client
            .post(self.api_url(&endpoint))
            .json(&body)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("POST {endpoint} failed"))?;
        Self::check("POST", &endpoint, response).await?;
        Ok(())
    }

    /// Remove accounts from a list
    pub async fn list_remove_accounts(&self, id: &str, account_ids: &[String]) -> Result<()> {
        let body = serde_json::json!({ "account_ids": account_ids });
        let endpoint = format!("/lists/{id}/accounts");
        tracing::debug!("DELETE {endpoint}");
        let response = self
            .client
            .delete(self.api_url(&endpoint))
            .json(&body)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .with_context(|| format!("DELETE {endpoint} failed"))?;
        Self::check("DELETE", &endpoint, response).await?;
        Ok(())
    }
}

/// OAuth authentication flow
pub mod oauth {
    use super::{Client, Context, Deserialize, Result};

    /// Registered OAuth application credentials
    #[derive(Debug, Deserialize)]
    pub struct OAuthApp {
        /// OAuth client ID
        pub client_id: String,
        /// OAuth client secret
        pub client_secret: String,
    }

    /// OAuth access token response
    #[derive(Debug, Deserialize)]
    pub struct OAuthToken {
        /// Access token for API requests
        pub access_token: String,
    }

    const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
    const SCOPES: &str = "read write follow";

    /// Register an OAuth application with an instance
    pub async fn register_app(instance: &str) -> Result<OAuthApp> {
        let client = Client::new();
        let url = format!("{}/api/v1/apps", instance.trim_end_matches('/'));

        let params = [
            ("client_name", "tootline"),
            ("redirect_uris", REDIRECT_URI),
            ("scopes", SCOPES),
            ("website", "https://github.com/tootline/tootline"),
        ];

        let response = client
            .post(&url)
            .form(&params)
            .send()
            .await
            .context("Failed to register app")?;

        response
            .json()
            .await
            .context("Failed to parse app registration response")
    }

    /// The authorization URL for the user to visit
    pub fn get_auth_url(instance: &str, client_id: &str) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}",
            instance.trim_end_matches('/'),
            client_id,
            urlencoding::encode(REDIRECT_URI),
            urlencoding::encode(SCOPES),
        )
    }

    /// Exchange an authorization code for an access token
    pub async fn get_token(
        instance: &str,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<OAuthToken> {
        let client = Client::new();
        let url = format!("{}/oauth/token", instance.trim_end_matches('/'));

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", REDIRECT_URI),
            ("code", code),
            ("scope", SCOPES),
        ];

        let response = client
            .post(&url)
            .form(&params)
            .send()
            .await
            .context("Failed to get access token")?;

        response
            .json()
            .await
            .context("Failed to parse token response")
    }
}
