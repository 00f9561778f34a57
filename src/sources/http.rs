//! Shared HTTP plumbing for the vendor APIs

use crate::config::HttpConfig;
use crate::error::{ChargelogError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// Substitute `{name}` placeholders in a URL template
pub fn render_template(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut url = template.to_string();
    for (name, value) in values {
        url = url.replace(&format!("{{{}}}", name), value);
    }

    if let Some(start) = url.find('{') {
        let rest = &url[start..];
        let end = rest.find('}').map_or(rest.len(), |i| i + 1);
        return Err(ChargelogError::config(format!(
            "Unresolved placeholder {} in endpoint {}",
            &rest[..end],
            template
        )));
    }
    Ok(url)
}

/// Pull a finite, non-negative number out of a JSON payload. Numeric strings
/// are accepted because some vendors quote their values.
pub fn extract_number(body: &Value, pointer: &str) -> Option<f64> {
    let raw = body.pointer(pointer)?;
    let number = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (number.is_finite() && number >= 0.0).then_some(number)
}

/// One configured vendor endpoint returning a single numeric value
#[derive(Clone)]
pub struct VendorEndpoint {
    source_name: &'static str,
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
    value_pointer: String,
    logger: StructuredLogger,
}

impl VendorEndpoint {
    /// Build an endpoint with its own HTTP client
    pub fn new(
        source_name: &'static str,
        http: &HttpConfig,
        url: String,
        auth_token: &str,
        value_pointer: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_seconds))
            .user_agent(http.user_agent.clone())
            .build()?;

        let token = auth_token.trim();
        let logger = get_logger_with_context(
            LogContext::new(source_name).with_field("pointer", value_pointer.clone()),
        );

        Ok(Self {
            source_name,
            client,
            url,
            auth_token: (!token.is_empty()).then(|| token.to_string()),
            value_pointer,
            logger,
        })
    }

    /// Resolved request URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// JSON pointer used to locate the value
    pub fn value_pointer(&self) -> &str {
        &self.value_pointer
    }

    /// Perform the `GET` and extract the configured value
    pub async fn fetch_number(&self) -> Result<f64> {
        let mut request = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ChargelogError::fetch(self.source_name, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChargelogError::fetch(
                self.source_name,
                format!("HTTP {}", status),
            ));
        }

        let body: Value = resp.json().await.map_err(|e| {
            ChargelogError::fetch(self.source_name, format!("invalid JSON body: {}", e))
        })?;

        let value = extract_number(&body, &self.value_pointer).ok_or_else(|| {
            ChargelogError::fetch(
                self.source_name,
                format!("no usable number at {}", self.value_pointer),
            )
        })?;

        self.logger.trace(&format!("Read {} from {}", value, self.url));
        Ok(value)
    }
}
