//! HTTP client for the managed backend
//!
//! One `StoreClient` per signed-in session. All table access goes through
//! `/rest/v1/{table}` with `column=op.value` filters; auth goes through
//! `/auth/v1`; server-side functions through `/rest/v1/rpc/{function}`.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::auth::{Credentials, Session};
use crate::query::Query;
use crate::{Error, Result};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

pub struct StoreClient {
    http: Client,
    base_url: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            access_token: RwLock::new(None),
        }
    }

    /// Adopt a previously persisted session (token cache restore)
    pub async fn set_session(&self, session: &Session) {
        let mut token = self.access_token.write().await;
        *token = Some(session.access_token.clone());
    }

    pub async fn is_authenticated(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    /// Password-grant sign-in; the returned session's access token is kept
    /// for subsequent requests
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let response = self
            .http
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Auth(message));
        }

        let session: Session = response.json().await?;
        self.set_session(&session).await;
        Ok(session)
    }

    /// Revoke the session server-side and drop the cached token. The token
    /// is dropped even if the revocation call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let token = {
            let mut guard = self.access_token.write().await;
            guard.take()
        };

        if let Some(token) = token {
            let response = self
                .http
                .post(format!("{}/auth/v1/logout", self.base_url))
                .header("apikey", &self.api_key)
                .header(AUTHORIZATION, format!("Bearer {}", token))
                .send()
                .await?;
            if !response.status().is_success() {
                tracing::warn!("Sign-out revocation failed: {}", response.status());
            }
        }
        Ok(())
    }

    /// Insert a row and return the stored representation
    pub async fn insert<T, B>(&self, table: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .rest(reqwest::Method::POST, table)
            .await
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(body);
        let response = Self::check(request.send().await?, table).await?;
        Ok(response.json().await?)
    }

    /// Patch a row by id and return the stored representation
    pub async fn update<T, B>(&self, table: &str, id: impl ToString, patch: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .rest(reqwest::Method::PATCH, table)
            .await
            .query(&[("id", format!("eq.{}", id.to_string()))])
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(patch);
        let response = Self::check(request.send().await?, table).await?;
        Ok(response.json().await?)
    }

    /// Fetch all rows matching the query
    pub async fn select<T>(&self, table: &str, query: &Query) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let request = self
            .rest(reqwest::Method::GET, table)
            .await
            .query(query.pairs());
        let response = Self::check(request.send().await?, table).await?;
        Ok(response.json().await?)
    }

    /// Fetch at most one row; zero rows is a normal `Ok(None)` outcome, not
    /// an error
    pub async fn select_one<T>(&self, table: &str, query: &Query) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let limited = query.clone().limit(1);
        let mut rows = self.select::<T>(table, &limited).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// Delete a row by id
    pub async fn delete(&self, table: &str, id: impl ToString) -> Result<()> {
        let request = self
            .rest(reqwest::Method::DELETE, table)
            .await
            .query(&[("id", format!("eq.{}", id.to_string()))]);
        Self::check(request.send().await?, table).await?;
        Ok(())
    }

    /// Update the signed-in user's auth record (e.g. password)
    pub async fn update_user<B>(&self, attributes: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .http
            .put(format!("{}/auth/v1/user", self.base_url))
            .headers(self.auth_headers().await)
            .json(attributes);
        let response = Self::check(request.send().await?, "user").await?;
        Ok(response.json().await?)
    }

    /// Call a server-side function; a `null`/empty body maps to `Value::Null`
    pub async fn rpc<B>(&self, function: &str, args: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .http
            .post(format!("{}/rest/v1/rpc/{}", self.base_url, function))
            .headers(self.auth_headers().await)
            .json(args);
        let response = Self::check(request.send().await?, function).await?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn rest(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .headers(self.auth_headers().await)
    }

    async fn auth_headers(&self) -> HeaderMap {
        let bearer = {
            let token = self.access_token.read().await;
            token.clone().unwrap_or_else(|| self.api_key.clone())
        };

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", bearer)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn check(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(message)),
            // The single-object Accept header turns "no matching row" into 406
            StatusCode::NOT_ACCEPTABLE | StatusCode::NOT_FOUND => {
                Err(Error::NotFound(context.to_string()))
            }
            _ => Err(Error::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }
}
