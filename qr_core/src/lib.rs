//! Core logic for the tri-mode QR code generator.
//!
//! - [`payload`]: pure formatters turning form fields into URL, text, or
//!   vCard payload strings.
//! - [`session`]: the form state machine with a generation counter for
//!   discarding stale render completions.
//! - [`render`]: the tiered encoder chain (native, then two remote image
//!   services) that turns a payload into PNG bytes.
//! - [`locale`]: the two bundled translation tables.

pub mod error;
pub mod locale;
pub mod payload;
pub mod render;
pub mod session;

pub use error::{EncodeError, RenderError};
pub use locale::{Locale, Messages};
pub use payload::{ContactRecord, Mode};
pub use render::{Encoder, EncoderChain, EncoderKind, Rendered};
pub use session::{FormSession, RenderRequest};
