//! GraphQL-over-HTTP implementation of [`DiscountBackend`].

use async_trait::async_trait;
use common::{BookingId, Money};
use domain::DiscountCode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{ApplicationResponse, DiscountBackend, ValidationResponse};

const VALIDATE_QUERY: &str = r#"
query ValidateDiscountCode($code: String!, $subtotal: Int!) {
  validateDiscountCode(code: $code, subtotal: $subtotal) {
    valid
    reason
    calculatedDiscount
    finalPriceCents
    discountCode {
      code
      type
      amount
      validUntil
      maxUses
      currentUses
      status
    }
  }
}
"#;

const APPLY_MUTATION: &str = r#"
mutation ApplyDiscountCode($code: String!, $bookingId: Int!) {
  applyDiscountCode(code: $code, bookingId: $bookingId) {
    success
    message
    discountApplied
  }
}
"#;

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Serialize)]
struct ValidateVariables<'a> {
    code: &'a str,
    subtotal: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyVariables<'a> {
    code: &'a str,
    booking_id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateData {
    validate_discount_code: ValidationResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplyData {
    apply_discount_code: ApplicationResponse,
}

/// Talks to the booking backend's GraphQL endpoint.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GraphQlBackend {
    client: Client,
    endpoint: String,
}

impl GraphQlBackend {
    /// Creates a backend posting to `endpoint` (e.g. `http://api:4000/graphql`).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<V, T>(&self, query: &str, variables: V) -> Result<T, ClientError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        let messages: Vec<_> = body.errors.into_iter().map(|e| e.message).collect();
        match body.data {
            Some(data) => {
                if !messages.is_empty() {
                    tracing::warn!(errors = %messages.join("; "), "GraphQL response carried partial errors");
                }
                Ok(data)
            }
            None if !messages.is_empty() => Err(ClientError::GraphQl(messages.join("; "))),
            None => Err(ClientError::Parse("response contained no data".to_string())),
        }
    }
}

#[async_trait]
impl DiscountBackend for GraphQlBackend {
    async fn validate_code(
        &self,
        code: &DiscountCode,
        subtotal: Money,
    ) -> Result<ValidationResponse, ClientError> {
        let variables = ValidateVariables {
            code: code.as_str(),
            subtotal: subtotal.cents(),
        };
        let data: ValidateData = self.execute(VALIDATE_QUERY, variables).await?;
        Ok(data.validate_discount_code)
    }

    async fn apply_code(
        &self,
        code: &DiscountCode,
        booking_id: BookingId,
    ) -> Result<ApplicationResponse, ClientError> {
        let variables = ApplyVariables {
            code: code.as_str(),
            booking_id: booking_id.get(),
        };
        let data: ApplyData = self.execute(APPLY_MUTATION, variables).await?;
        Ok(data.apply_discount_code)
    }
}
