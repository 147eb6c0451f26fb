use anyhow::Result;
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};

/// Renders the payload as a terminal QR code. Colors are inverted so the
/// code scans against a dark terminal background.
pub fn unicode_qr(payload: &str) -> Result<String> {
    Ok(QrCode::with_error_correction_level(payload, EcLevel::H)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}
