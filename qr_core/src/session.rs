use crate::payload::{format_url, format_vcard, ContactRecord, Mode};

/// One render attempt, issued per field mutation. The generation number
/// lets a caller recognize a completion that belongs to an older edit and
/// drop it instead of displaying stale output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub payload: String,
    pub generation: u64,
}

/// Transient form state: the active mode, the three mode inputs, and a
/// generation counter. The payload is always derived, never stored.
#[derive(Debug, Clone)]
pub struct FormSession {
    mode: Mode,
    url_input: String,
    text_input: String,
    contact: ContactRecord,
    generation: u64,
}

impl FormSession {
    pub fn new(mode: Mode) -> Self {
        FormSession {
            mode,
            url_input: String::new(),
            text_input: String::new(),
            contact: ContactRecord::default(),
            generation: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn contact(&self) -> &ContactRecord {
        &self.contact
    }

    /// Derives the payload from the active mode and its source fields.
    /// Contact mode produces nothing until the identity gate passes.
    pub fn payload(&self) -> String {
        match self.mode {
            Mode::Url => format_url(&self.url_input),
            Mode::Text => self.text_input.clone(),
            Mode::Contact if self.contact.has_identity() => format_vcard(&self.contact),
            Mode::Contact => String::new(),
        }
    }

    pub fn set_mode(&mut self, mode: Mode) -> RenderRequest {
        self.mode = mode;
        self.bump()
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> RenderRequest {
        self.url_input = url.into();
        self.bump()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> RenderRequest {
        self.text_input = text.into();
        self.bump()
    }

    pub fn set_contact(&mut self, contact: ContactRecord) -> RenderRequest {
        self.contact = contact;
        self.bump()
    }

    /// Edits contact fields in place, e.g. a single keystroke in one field.
    pub fn update_contact(&mut self, edit: impl FnOnce(&mut ContactRecord)) -> RenderRequest {
        edit(&mut self.contact);
        self.bump()
    }

    /// Clears every field. The mode stays put.
    pub fn reset(&mut self) -> RenderRequest {
        self.url_input.clear();
        self.text_input.clear();
        self.contact = ContactRecord::default();
        self.bump()
    }

    /// True while no later edit has superseded the given request.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn bump(&mut self) -> RenderRequest {
        self.generation += 1;
        RenderRequest {
            payload: self.payload(),
            generation: self.generation,
        }
    }
}
