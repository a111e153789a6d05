use http::StatusCode;
use shikkha_api::ValidationError;

use crate::transport::TransportError;

/// Every failure the frontend can run into. All of them are shown to the user the same way, a
/// dismissible modal with [`ClientError::user_message`], and none of them is retried.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("No stored credential")]
    MissingCredential,
    #[error("Error performing HTTP request: {0}")]
    Transport(#[from] TransportError),
    #[error("Response is not successful: {0}")]
    Status(StatusCode),
    #[error("Error decoding json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid response payload: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Request rejected by the server: {0}")]
    Rejected(String),
    #[error("Invalid input: {0}")]
    InvalidDraft(&'static str),
    #[error("Streaming error: {0}")]
    Stream(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = core::result::Result<T, ClientError>;

impl ClientError {
    /// The Bangla message shown in the error modal.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential => "অনুগ্রহ করে আগে লগইন করুন।".to_string(),
            Self::Transport(_) => "সার্ভারের সাথে সংযোগ করা যায়নি। আবার চেষ্টা করুন।".to_string(),
            Self::Status(status) => format!(
                "সার্ভার থেকে ত্রুটি এসেছে (স্ট্যাটাস {})। আবার চেষ্টা করুন।",
                status.as_u16()
            ),
            Self::Decode(_) | Self::Invalid(_) => "সার্ভারের উত্তর বোঝা যায়নি।".to_string(),
            Self::Rejected(message) if !message.trim().is_empty() => message.clone(),
            Self::Rejected(_) => "অনুরোধটি সম্পন্ন করা যায়নি।".to_string(),
            Self::InvalidDraft(_) => "অনুগ্রহ করে সবগুলো ঘর পূরণ করুন।".to_string(),
            Self::Stream(_) => "ভিডিও চালানো যায়নি।".to_string(),
            Self::Storage(_) => "ব্রাউজারে তথ্য সংরক্ষণ করা যায়নি।".to_string(),
            Self::Config(_) => "অ্যাপের কনফিগারেশনে সমস্যা আছে।".to_string(),
        }
    }
}
