use std::fmt;
use std::io::Cursor;
use std::time::Duration;

use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::{EncodeError, RenderError};

/// Rendered image edge length in pixels.
pub const QR_SIZE: u32 = 300;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_CHART_ENDPOINT: &str = "https://chart.googleapis.com/chart";
pub const DEFAULT_QR_SERVER_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// The three encoder capabilities, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    /// In-process encoding via the `qrcode` crate.
    Native,
    /// Remote chart-rendering image endpoint.
    ChartApi,
    /// Remote QR image endpoint with a margin parameter.
    QrServer,
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncoderKind::Native => "native",
            EncoderKind::ChartApi => "chart-api",
            EncoderKind::QrServer => "qr-server",
        };
        f.write_str(name)
    }
}

/// A successful render: PNG bytes plus the tier that produced them.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub png: Vec<u8>,
    pub encoder: EncoderKind,
}

/// One encoder tier. Implementations must be pure with respect to the
/// payload: the same payload yields an equivalent image.
pub trait Encoder {
    fn kind(&self) -> EncoderKind;
    fn encode(&self, payload: &str) -> Result<Vec<u8>, EncodeError>;
}

/// Tier 1: encode locally with error-correction level H, at least
/// [`QR_SIZE`] pixels square, black modules on white.
pub struct NativeEncoder;

impl Encoder for NativeEncoder {
    fn kind(&self) -> EncoderKind {
        EncoderKind::Native
    }

    fn encode(&self, payload: &str) -> Result<Vec<u8>, EncodeError> {
        let code = QrCode::with_error_correction_level(payload, EcLevel::H)?;
        let img = code
            .render::<Luma<u8>>()
            .min_dimensions(QR_SIZE, QR_SIZE)
            .dark_color(Luma([0u8]))
            .light_color(Luma([255u8]))
            .build();
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

fn fetch_png(url: Url) -> Result<Vec<u8>, EncodeError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()?;
    let resp = client.get(url).send()?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Tier 2: pre-rendered PNG from a chart-rendering service.
pub struct ChartApiEncoder {
    endpoint: String,
}

impl ChartApiEncoder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        ChartApiEncoder {
            endpoint: endpoint.into(),
        }
    }

    /// Request URL with the payload carried URL-encoded in the query.
    pub fn request_url(&self, payload: &str) -> Result<Url, EncodeError> {
        let size = format!("{QR_SIZE}x{QR_SIZE}");
        Ok(Url::parse_with_params(
            &self.endpoint,
            [
                ("chs", size.as_str()),
                ("cht", "qr"),
                ("chl", payload),
                ("choe", "UTF-8"),
            ],
        )?)
    }
}

impl Default for ChartApiEncoder {
    fn default() -> Self {
        ChartApiEncoder::new(DEFAULT_CHART_ENDPOINT)
    }
}

impl Encoder for ChartApiEncoder {
    fn kind(&self) -> EncoderKind {
        EncoderKind::ChartApi
    }

    fn encode(&self, payload: &str) -> Result<Vec<u8>, EncodeError> {
        fetch_png(self.request_url(payload)?)
    }
}

/// Tier 3: second remote QR image service, equivalent contract plus a
/// fixed margin.
pub struct QrServerEncoder {
    endpoint: String,
}

impl QrServerEncoder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        QrServerEncoder {
            endpoint: endpoint.into(),
        }
    }

    pub fn request_url(&self, payload: &str) -> Result<Url, EncodeError> {
        let size = format!("{QR_SIZE}x{QR_SIZE}");
        Ok(Url::parse_with_params(
            &self.endpoint,
            [
                ("size", size.as_str()),
                ("data", payload),
                ("format", "png"),
                ("margin", "10"),
            ],
        )?)
    }
}

impl Default for QrServerEncoder {
    fn default() -> Self {
        QrServerEncoder::new(DEFAULT_QR_SERVER_ENDPOINT)
    }
}

impl Encoder for QrServerEncoder {
    fn kind(&self) -> EncoderKind {
        EncoderKind::QrServer
    }

    fn encode(&self, payload: &str) -> Result<Vec<u8>, EncodeError> {
        fetch_png(self.request_url(payload)?)
    }
}

/// Ordered fallback chain over encoder tiers. Each tier failure is logged
/// and the next tier is tried with the identical payload; only exhaustion
/// of the whole chain is reported to the caller.
pub struct EncoderChain {
    tiers: Vec<Box<dyn Encoder>>,
}

impl EncoderChain {
    pub fn new(tiers: Vec<Box<dyn Encoder>>) -> Self {
        EncoderChain { tiers }
    }

    /// The default three-tier chain: native, then the two remote services.
    pub fn standard(chart_endpoint: Option<&str>, qr_server_endpoint: Option<&str>) -> Self {
        EncoderChain::new(vec![
            Box::new(NativeEncoder),
            Box::new(
                chart_endpoint
                    .map(ChartApiEncoder::new)
                    .unwrap_or_default(),
            ),
            Box::new(
                qr_server_endpoint
                    .map(QrServerEncoder::new)
                    .unwrap_or_default(),
            ),
        ])
    }

    /// A chain pinned to one tier, with no fallback.
    pub fn single(encoder: Box<dyn Encoder>) -> Self {
        EncoderChain::new(vec![encoder])
    }

    pub fn render(&self, payload: &str) -> Result<Rendered, RenderError> {
        if payload.is_empty() {
            return Err(RenderError::EmptyPayload);
        }
        let mut last_err = None;
        for tier in &self.tiers {
            match tier.encode(payload) {
                Ok(png) => {
                    debug!(encoder = %tier.kind(), bytes = png.len(), "encoder tier succeeded");
                    return Ok(Rendered {
                        png,
                        encoder: tier.kind(),
                    });
                }
                Err(e) => {
                    warn!(encoder = %tier.kind(), error = %e, "encoder tier failed, falling through");
                    last_err = Some(e);
                }
            }
        }
        match last_err {
            Some(e) => Err(RenderError::Exhausted(e)),
            None => Err(RenderError::EmptyPayload),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct FailingEncoder {
        kind: EncoderKind,
        seen: Rc<RefCell<Vec<(EncoderKind, String)>>>,
    }

    impl Encoder for FailingEncoder {
        fn kind(&self) -> EncoderKind {
            self.kind
        }

        fn encode(&self, payload: &str) -> Result<Vec<u8>, EncodeError> {
            self.seen.borrow_mut().push((self.kind, payload.to_string()));
            Err(EncodeError::Qr(qrcode::types::QrError::DataTooLong))
        }
    }

    struct FixedEncoder(EncoderKind);

    impl Encoder for FixedEncoder {
        fn kind(&self) -> EncoderKind {
            self.0
        }

        fn encode(&self, _payload: &str) -> Result<Vec<u8>, EncodeError> {
            Ok(vec![1, 2, 3])
        }
    }

    #[test]
    fn native_encoder_emits_png() {
        let png = NativeEncoder.encode("https://example.com").unwrap();
        // PNG signature
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn chain_reports_successful_tier() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let chain = EncoderChain::new(vec![
            Box::new(FailingEncoder {
                kind: EncoderKind::Native,
                seen: Rc::clone(&seen),
            }),
            Box::new(FixedEncoder(EncoderKind::ChartApi)),
        ]);
        let rendered = chain.render("hello").unwrap();
        assert_eq!(rendered.encoder, EncoderKind::ChartApi);
        assert_eq!(rendered.png, vec![1, 2, 3]);
        assert_eq!(seen.borrow().as_slice(), [(EncoderKind::Native, "hello".to_string())]);
    }

    #[test]
    fn chain_passes_same_payload_to_each_tier_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let chain = EncoderChain::new(vec![
            Box::new(FailingEncoder {
                kind: EncoderKind::Native,
                seen: Rc::clone(&seen),
            }),
            Box::new(FailingEncoder {
                kind: EncoderKind::ChartApi,
                seen: Rc::clone(&seen),
            }),
        ]);
        let err = chain.render("same payload").unwrap_err();
        assert!(matches!(err, RenderError::Exhausted(_)));
        assert_eq!(
            seen.borrow().as_slice(),
            [
                (EncoderKind::Native, "same payload".to_string()),
                (EncoderKind::ChartApi, "same payload".to_string()),
            ]
        );
    }

    #[test]
    fn chain_rejects_empty_payload() {
        let chain = EncoderChain::single(Box::new(FixedEncoder(EncoderKind::Native)));
        assert!(matches!(
            chain.render(""),
            Err(RenderError::EmptyPayload)
        ));
    }

    #[test]
    fn chart_request_url_escapes_payload() {
        let url = ChartApiEncoder::default()
            .request_url("a b&c/d")
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("chl=a+b%26c%2Fd"));
        assert!(query.contains("chs=300x300"));
        assert!(query.contains("cht=qr"));
        assert!(query.contains("choe=UTF-8"));
    }

    #[test]
    fn qr_server_request_url_carries_margin() {
        let url = QrServerEncoder::default().request_url("hi there").unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("data=hi+there"));
        assert!(query.contains("size=300x300"));
        assert!(query.contains("format=png"));
        assert!(query.contains("margin=10"));
    }
}
