// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entries::{NewCategory, NewTransaction};
use crate::errors::{CoreError, CoreResult};
use crate::models::{Category, Session, SummaryResult, Transaction};
use crate::store::{CategoryStore, TransactionStore};
use crate::utils::http_client;

/// `{ success, data, message }` wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Maps a non-success HTTP status onto the error kind callers act on.
pub fn error_for_status(status: StatusCode, message: Option<String>) -> CoreError {
    let message = message.unwrap_or_else(|| status.to_string());
    match status {
        StatusCode::CONFLICT => CoreError::Conflict(message),
        StatusCode::NOT_FOUND => CoreError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            CoreError::Validation(message)
        }
        _ => CoreError::Network(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

/// Blocking client for the SakuBumi REST API. The session is handed in at
/// construction; nothing global is consulted when a request goes out.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Option<Session>) -> CoreResult<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// `POST /auth/login`. The returned session is meant to be passed to
    /// [`ApiClient::new`].
    pub fn login(base_url: &str, email: &str, password: &str) -> CoreResult<Session> {
        let client = Self::new(base_url, None)?;
        let session: Session = client.send(
            client
                .http
                .post(client.url("/auth/login"))
                .json(&Credentials { email, password }),
        )?;
        let who = session.user.as_ref().map(|u| u.name.as_str()).unwrap_or("?");
        tracing::info!(user = %who, "logged in");
        Ok(session)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn logout(&mut self) -> Option<Session> {
        self.session.take()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `<base><collection>/<id>` with `id` percent-encoded as one segment.
    fn item_url(&self, collection: &str, id: &str) -> CoreResult<Url> {
        let invalid = |why: String| CoreError::Network(format!("API URL {}: {}", self.base_url, why));
        let mut url = Url::parse(&self.url(collection)).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot take a path".into()))?
            .push(id);
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(s) => req.bearer_auth(&s.access_token),
            None => req,
        }
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> CoreResult<T> {
        let resp = self.authorize(req).send()?;
        let status = resp.status();
        let body = resp.text()?;
        let envelope: Option<Envelope<T>> = serde_json::from_str(&body).ok();
        tracing::debug!(%status, bytes = body.len(), "api response");

        if !status.is_success() {
            return Err(error_for_status(status, envelope.and_then(|e| e.message)));
        }
        let envelope = envelope
            .ok_or_else(|| CoreError::Network(format!("Malformed response body: {}", body)))?;
        if !envelope.success {
            return Err(CoreError::Network(
                envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".into()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| CoreError::Network("Response carried no data".into()))
    }

    fn send_empty(&self, req: RequestBuilder) -> CoreResult<()> {
        let resp = self.authorize(req).send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let message = resp
            .text()
            .ok()
            .and_then(|b| serde_json::from_str::<Envelope<serde_json::Value>>(&b).ok())
            .and_then(|e| e.message);
        Err(error_for_status(status, message))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> CoreResult<T> {
        tracing::debug!(%path, "GET");
        self.send(self.http.get(self.url(path)))
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> CoreResult<T> {
        tracing::debug!(%path, "POST");
        self.send(self.http.post(self.url(path)).json(body))
    }

    fn delete(&self, url: Url) -> CoreResult<()> {
        tracing::debug!(%url, "DELETE");
        self.send_empty(self.http.delete(url))
    }
}

impl CategoryStore for ApiClient {
    fn list_categories(&self) -> CoreResult<Vec<Category>> {
        self.get("/categories")
    }

    fn create_category(&mut self, draft: &NewCategory) -> CoreResult<Category> {
        self.post("/categories", draft)
    }

    fn delete_category(&mut self, id: &str) -> CoreResult<()> {
        self.delete(self.item_url("/categories", id)?)
    }
}

impl TransactionStore for ApiClient {
    fn list_transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.get("/transactions")
    }

    fn summary(&self) -> CoreResult<Option<SummaryResult>> {
        self.get("/transactions/summary").map(Some)
    }

    fn create_transaction(&mut self, draft: &NewTransaction) -> CoreResult<Transaction> {
        self.post("/transactions", draft)
    }

    fn delete_transaction(&mut self, id: &str) -> CoreResult<()> {
        self.delete(self.item_url("/transactions", id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_mapping_keeps_conflict_distinct() {
        let err = error_for_status(
            StatusCode::CONFLICT,
            Some("Kategori masih digunakan oleh transaksi".into()),
        );
        assert_eq!(
            err,
            CoreError::Conflict("Kategori masih digunakan oleh transaksi".into())
        );
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, None),
            CoreError::NotFound(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::UNPROCESSABLE_ENTITY, None),
            CoreError::Validation(_)
        ));
        let server = error_for_status(StatusCode::BAD_GATEWAY, None);
        assert!(server.is_retryable());
    }

    #[test]
    fn login_envelope_decodes_into_session() {
        let env: Envelope<Session> = serde_json::from_value(json!({
            "success": true,
            "data": {
                "user": {"id": "u1", "name": "Ayu", "email": "ayu@example.com"},
                "accessToken": "tok"
            }
        }))
        .unwrap();
        let session = env.data.unwrap();
        assert_eq!(session.access_token, "tok");
        assert_eq!(session.user.unwrap().name, "Ayu");
    }

    #[test]
    fn logout_clears_session() {
        let session = Session::from_token(" tok ");
        assert_eq!(session.access_token, "tok");
        let mut client = ApiClient::new("http://localhost:9/api/", Some(session)).unwrap();
        assert_eq!(client.url("/categories"), "http://localhost:9/api/categories");
        assert_eq!(
            client.item_url("/transactions", "tx-1").unwrap().as_str(),
            "http://localhost:9/api/transactions/tx-1"
        );
        assert!(client.logout().is_some());
        assert!(client.session().is_none());
    }

    #[test]
    fn item_ids_are_encoded_as_a_single_segment() {
        let client = ApiClient::new("http://localhost:9/api", None).unwrap();
        let url = client.item_url("/categories", "a/b?c#d").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9/api/categories/a%2Fb%3Fc%23d");
        assert_eq!(url.path_segments().unwrap().count(), 3);
        assert!(url.query().is_none());
    }
}
