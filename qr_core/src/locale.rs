use std::fmt;

/// The two bundled UI locales. Selected once at startup and passed into
/// the output layer; there is no process-wide locale state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    EnUs,
    ViVn,
}

/// User-facing strings surfaced by the command-line front end.
pub struct Messages {
    pub app_title: &'static str,
    pub app_description: &'static str,
    pub generated_qr_code: &'static str,
    pub scan_qr_code: &'static str,
    pub fill_form_prompt: &'static str,
    pub download: &'static str,
    pub copy_data: &'static str,
    pub copied: &'static str,
    pub qr_code_data: &'static str,
}

static EN_US: Messages = Messages {
    app_title: "QR Code Generator",
    app_description: "Generate QR codes for URLs, text, and contact information",
    generated_qr_code: "Generated QR Code",
    scan_qr_code: "Scan this QR code with your device",
    fill_form_prompt: "Fill in the form to generate your QR code",
    download: "Saved",
    copy_data: "Copy Data",
    copied: "Copied!",
    qr_code_data: "QR Code Data:",
};

static VI_VN: Messages = Messages {
    app_title: "Trình tạo mã QR",
    app_description: "Tạo mã QR cho URL, văn bản và thông tin liên hệ",
    generated_qr_code: "Mã QR đã tạo",
    scan_qr_code: "Quét mã QR này bằng thiết bị của bạn",
    fill_form_prompt: "Điền vào biểu mẫu để tạo mã QR",
    download: "Đã lưu",
    copy_data: "Sao chép dữ liệu",
    copied: "Đã sao chép!",
    qr_code_data: "Dữ liệu mã QR:",
};

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::EnUs, Locale::ViVn];

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::ViVn => "vi-VN",
        }
    }

    /// Resolves a BCP-47 tag: exact match first, then a locale sharing the
    /// language prefix, then en-US.
    pub fn matching(tag: &str) -> Locale {
        if let Some(exact) = Locale::ALL.iter().find(|l| l.tag() == tag) {
            return *exact;
        }
        let lang = tag.split('-').next().unwrap_or("");
        if lang.is_empty() {
            return Locale::default();
        }
        Locale::ALL
            .iter()
            .find(|l| l.tag().split('-').next() == Some(lang))
            .copied()
            .unwrap_or_default()
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Locale::EnUs => &EN_US,
            Locale::ViVn => &VI_VN,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tag_matches() {
        assert_eq!(Locale::matching("vi-VN"), Locale::ViVn);
        assert_eq!(Locale::matching("en-US"), Locale::EnUs);
    }

    #[test]
    fn language_prefix_matches() {
        assert_eq!(Locale::matching("vi"), Locale::ViVn);
        assert_eq!(Locale::matching("vi-XX"), Locale::ViVn);
        assert_eq!(Locale::matching("en-GB"), Locale::EnUs);
    }

    #[test]
    fn unknown_tag_falls_back_to_en_us() {
        assert_eq!(Locale::matching("fr-FR"), Locale::EnUs);
        assert_eq!(Locale::matching(""), Locale::EnUs);
    }

    #[test]
    fn tables_differ() {
        assert_ne!(
            Locale::EnUs.messages().copied,
            Locale::ViVn.messages().copied
        );
    }
}
