use crossterm::style::Color;
use supports_color::Stream;

/// Detect the level of color support
pub fn color_level() -> ColorLevel {
    match supports_color::on(Stream::Stdout) {
        Some(level) => match level.has_16m {
            true => ColorLevel::TrueColor,
            false => match level.has_256 {
                true => ColorLevel::Color256,
                false => ColorLevel::Color16,
            },
        },
        None => ColorLevel::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// No color support
    None,
    /// 16 basic colors
    Color16,
    /// 256 ANSI colors
    Color256,
    /// True color (24-bit RGB)
    TrueColor,
}

/// Colors of the terminal backend. Every slot is `None` on monochrome
/// terminals, where focus is shown by reversing instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Option<Color>,
    pub accent: Option<Color>,
    pub muted: Option<Color>,
    pub focus: Option<Color>,
    pub danger: Option<Color>,
    pub warning: Option<Color>,
}

impl Palette {
    pub fn for_level(level: ColorLevel) -> Self {
        match level {
            ColorLevel::None => Self {
                text: None,
                accent: None,
                muted: None,
                focus: None,
                danger: None,
                warning: None,
            },
            ColorLevel::Color16 => Self {
                text: Some(Color::Reset),
                accent: Some(Color::Cyan),
                muted: Some(Color::DarkGrey),
                focus: Some(Color::DarkBlue),
                danger: Some(Color::Red),
                warning: Some(Color::Yellow),
            },
            ColorLevel::Color256 => Self {
                text: Some(Color::Reset),
                accent: Some(Color::AnsiValue(39)),
                muted: Some(Color::AnsiValue(244)),
                focus: Some(Color::AnsiValue(24)),
                danger: Some(Color::AnsiValue(203)),
                warning: Some(Color::AnsiValue(214)),
            },
            ColorLevel::TrueColor => Self {
                text: Some(Color::Reset),
                accent: Some(Color::Rgb { r: 0x34, g: 0xa4, b: 0xeb }),
                muted: Some(Color::Rgb { r: 0x80, g: 0x80, b: 0x80 }),
                focus: Some(Color::Rgb { r: 0x1f, g: 0x3a, b: 0x5f }),
                danger: Some(Color::Rgb { r: 0xe0, g: 0x5d, b: 0x5d }),
                warning: Some(Color::Rgb { r: 0xf0, g: 0xad, b: 0x4e }),
            },
        }
    }

    pub fn detect() -> Self {
        Self::for_level(color_level())
    }

    /// Foreground for a widget's style tag, e.g. `"outline danger"`.
    pub fn for_style(&self, style: Option<&str>) -> Option<Color> {
        let style = style.unwrap_or_default();
        let has = |word: &str| style.split_whitespace().any(|w| w == word);
        if has("danger") {
            self.danger
        } else if has("warning") {
            self.warning
        } else if has("info") || has("primary") {
            self.accent
        } else {
            self.text
        }
    }
}
