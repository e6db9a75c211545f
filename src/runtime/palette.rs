//! Semantic colors and categories for decoded output

/// Semantic palette entry for a decoded sample.
///
/// The renderer owns the actual color for each entry; [`StandardColor::default_hex`]
/// is only the reference rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardColor {
    Data,
    Control,
    Address,
    Preamble,
    ChecksumOk,
    ChecksumBad,
    Error,
    Idle,
}

impl StandardColor {
    pub const COUNT: usize = 8;

    pub const ALL: [StandardColor; Self::COUNT] = [
        StandardColor::Data,
        StandardColor::Control,
        StandardColor::Address,
        StandardColor::Preamble,
        StandardColor::ChecksumOk,
        StandardColor::ChecksumBad,
        StandardColor::Error,
        StandardColor::Idle,
    ];

    /// Palette index, 0..8
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn default_hex(self) -> &'static str {
        match self {
            StandardColor::Data => "#336699",
            StandardColor::Control => "#c000a0",
            StandardColor::Address => "#ffff00",
            StandardColor::Preamble => "#808080",
            StandardColor::ChecksumOk => "#00ff00",
            StandardColor::ChecksumBad => "#ff0000",
            StandardColor::Error => "#ff0000",
            StandardColor::Idle => "#404040",
        }
    }
}

/// Decoder grouping, used only for UI menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Analysis,
    Bus,
    Clock,
    Math,
    Memory,
    Serial,
    Misc,
}

/// Render one byte of a textual channel.
///
/// Printable ASCII renders as itself, CR/LF/BS as `\r`, `\n`, `\b`, and
/// anything else as `\xHH`.
pub fn ascii_text(byte: u8) -> String {
    match byte {
        b' '..=b'~' => char::from(byte).to_string(),
        b'\r' => "\\r".to_string(),
        b'\n' => "\\n".to_string(),
        0x08 => "\\b".to_string(),
        _ => format!("\\x{:02x}", byte),
    }
}
