//! HTTP backend client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    api::{
        ApiError, ShopApi,
        models::{Envelope, LoginRequest, LoginResponse, NewOrder, OrderSummary, Product},
    },
    pricing::Promotion,
    session::Session,
};

/// [`ShopApi`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpShopApi {
    base_url: String,
    http: Client,
}

impl HttpShopApi {
    /// Creates a client for the API rooted at `base_url`, e.g. `"http://localhost:5000/api"`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;

        read_envelope(response).await
    }
}

/// Decodes an envelope, turning `success: false` and non-2xx answers into errors.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    let envelope: Envelope<T> = match serde_json::from_str(&text) {
        Ok(envelope) => envelope,
        Err(error) if status.is_success() => {
            return Err(ApiError::UnexpectedResponse(error.to_string()));
        }
        Err(_) => return Err(ApiError::Status(status)),
    };

    if status.is_success() && envelope.success {
        return Ok(envelope);
    }

    match envelope.message {
        Some(message) if !message.trim().is_empty() => Err(ApiError::Rejected(message)),
        _ if status.is_success() => Err(ApiError::UnexpectedResponse(
            "request was not successful".to_string(),
        )),
        _ => Err(ApiError::Status(status)),
    }
}

fn require_data<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
    envelope
        .data
        .ok_or_else(|| ApiError::UnexpectedResponse("response has no data".to_string()))
}

#[async_trait]
impl ShopApi for HttpShopApi {
    #[instrument(skip(self))]
    async fn validate_promotion(&self, code: &str) -> Result<Promotion, ApiError> {
        let request = self
            .http
            .post(self.url("promotions/validate"))
            .json(&serde_json::json!({ "code": code }));

        require_data(Self::send(request).await?)
    }

    #[instrument(skip_all, fields(items = order.items.len()))]
    async fn create_order(
        &self,
        token: &str,
        order: &NewOrder,
    ) -> Result<Option<String>, ApiError> {
        let request = self.http.post(self.url("orders")).bearer_auth(token).json(order);

        let envelope: Envelope<serde_json::Value> = Self::send(request).await?;
        debug!("order accepted");

        Ok(envelope.message)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let request = self.http.get(self.url(&format!("products/{id}")));

        require_data(Self::send(request).await?)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response = self
            .http
            .post(self.url("auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let body: LoginResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(error) if status.is_success() => {
                return Err(ApiError::UnexpectedResponse(error.to_string()));
            }
            Err(_) => return Err(ApiError::Status(status)),
        };

        if !status.is_success() || !body.success {
            return Err(match body.message {
                Some(message) => ApiError::Rejected(message),
                None => ApiError::Status(status),
            });
        }

        let token = body
            .token
            .ok_or_else(|| ApiError::UnexpectedResponse("login response has no token".into()))?;

        Ok(Session {
            token,
            user: body.user.map(Into::into),
        })
    }

    #[instrument(skip(self, token))]
    async fn list_orders(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<Vec<OrderSummary>, ApiError> {
        let request = self
            .http
            .get(self.url(&format!("orders/user/{user_id}")))
            .bearer_auth(token);

        let envelope: Envelope<Vec<OrderSummary>> = Self::send(request).await?;

        Ok(envelope.data.unwrap_or_default())
    }
}
