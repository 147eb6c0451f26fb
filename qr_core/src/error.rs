use thiserror::Error;

/// Failure of a single encoder tier.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("payload does not fit in a QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
    #[error("encoder service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid encoder endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Failure of the whole render chain.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to render: payload is empty")]
    EmptyPayload,
    #[error("all encoder tiers failed")]
    Exhausted(#[source] EncodeError),
}
