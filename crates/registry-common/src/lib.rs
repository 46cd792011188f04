use serde::{Deserialize, Serialize};

pub mod logging;

// ============================================================================
// Broker Envelope Types
// ============================================================================

/// A raw message received from a request queue, with the metadata needed to
/// answer it.
///
/// The payload is kept as bytes: decoding it into a typed entity is the job of
/// the request pipeline, so that a malformed body still gets a structured reply.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub payload: Vec<u8>,
    pub correlation_id: Option<String>,
    pub reply_to: Option<String>,
    /// Raw value of the `authorization` header, if any
    pub authorization: Option<String>,
    pub receipt_handle: String,
    pub queue_identifier: String,
}

impl Delivery {
    /// Correlation id and reply destination, when both are present and non-empty.
    ///
    /// A delivery without them cannot be answered.
    pub fn reply_address(&self) -> Option<ReplyAddress> {
        let correlation_id = self.correlation_id.as_deref().filter(|s| !s.is_empty())?;
        let reply_to = self.reply_to.as_deref().filter(|s| !s.is_empty())?;
        Some(ReplyAddress {
            correlation_id: correlation_id.to_string(),
            reply_to: reply_to.to_string(),
        })
    }

    /// Bearer token carried by the delivery, with any `Bearer ` prefix removed.
    pub fn bearer_token(&self) -> Option<&str> {
        let raw = self.authorization.as_deref()?;
        let token = extract_bearer_token(raw).unwrap_or(raw).trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

/// Where and under which correlation id a reply must be sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyAddress {
    pub correlation_id: String,
    pub reply_to: String,
}

/// What the consume loop does with a delivery once its handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Processing finished (successfully or with a rejection reply)
    Ack,
    /// Hand the delivery back to the broker
    Nack { requeue: bool },
}

/// Extract bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery() -> Delivery {
        Delivery {
            payload: b"{}".to_vec(),
            correlation_id: Some("corr-1".to_string()),
            reply_to: Some("amq.gen-reply".to_string()),
            authorization: None,
            receipt_handle: "q:1:0".to_string(),
            queue_identifier: "q".to_string(),
        }
    }

    #[test]
    fn test_reply_address() {
        let d = delivery();
        let address = d.reply_address().unwrap();
        assert_eq!(address.correlation_id, "corr-1");
        assert_eq!(address.reply_to, "amq.gen-reply");
    }

    #[test]
    fn test_reply_address_requires_both_parts() {
        let mut d = delivery();
        d.reply_to = Some(String::new());
        assert!(d.reply_address().is_none());

        let mut d = delivery();
        d.correlation_id = None;
        assert!(d.reply_address().is_none());
    }

    #[test]
    fn test_bearer_token() {
        let mut d = delivery();
        assert_eq!(d.bearer_token(), None);

        d.authorization = Some("Bearer abc.def.ghi".to_string());
        assert_eq!(d.bearer_token(), Some("abc.def.ghi"));

        d.authorization = Some("abc.def.ghi".to_string());
        assert_eq!(d.bearer_token(), Some("abc.def.ghi"));

        d.authorization = Some("Bearer ".to_string());
        assert_eq!(d.bearer_token(), None);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }
}
