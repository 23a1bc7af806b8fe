//! Template Catalog: the closed set of visual templates and the colour
//! profile each resolves to. The preview and the print renderer both go
//! through [`style_for`], which is what keeps on-screen and exported output
//! visually identical.

pub mod handlers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual template identifiers. Unknown ids deserialize to [`TemplateId::Modern`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TemplateId {
    #[default]
    Modern,
    Minimalist,
    Elegant,
    Creative,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Modern,
        TemplateId::Minimalist,
        TemplateId::Elegant,
        TemplateId::Creative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Minimalist => "minimalist",
            TemplateId::Elegant => "elegant",
            TemplateId::Creative => "creative",
        }
    }

    /// Resolves an id, falling back to `modern` for anything unrecognised.
    pub fn lenient(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

impl From<String> for TemplateId {
    fn from(id: String) -> Self {
        TemplateId::lenient(&id)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Colours
// ────────────────────────────────────────────────────────────────────────────

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// CSS notation, e.g. `#2563eb`.
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0.0 – 1.0 for PDF colour operators.
    pub fn unit_rgb(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

/// Neutral colours shared by every template.
pub mod palette {
    use super::Color;

    pub const WHITE: Color = Color::hex(0xffffff);
    pub const INK: Color = Color::hex(0x1e293b);
    pub const BODY: Color = Color::hex(0x475569);
    pub const MUTED: Color = Color::hex(0x64748b);
    pub const PILL: Color = Color::hex(0xf1f5f9);
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// Concrete colours a template resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleProfile {
    pub header_background: Color,
    pub accent_color: Color,
    pub skill_badge_background: Color,
}

const MODERN: StyleProfile = StyleProfile {
    header_background: Color::hex(0x2563eb),
    accent_color: Color::hex(0x059669),
    skill_badge_background: Color::hex(0x2563eb),
};

const MINIMALIST: StyleProfile = StyleProfile {
    header_background: Color::hex(0x1e293b),
    accent_color: Color::hex(0x475569),
    skill_badge_background: Color::hex(0x475569),
};

const ELEGANT: StyleProfile = StyleProfile {
    header_background: Color::hex(0x7c3aed),
    accent_color: Color::hex(0x6366f1),
    skill_badge_background: Color::hex(0x7c3aed),
};

const CREATIVE: StyleProfile = StyleProfile {
    header_background: Color::hex(0xf97316),
    accent_color: Color::hex(0x14b8a6),
    skill_badge_background: Color::hex(0xf97316),
};

pub fn profile(template: TemplateId) -> StyleProfile {
    match template {
        TemplateId::Modern => MODERN,
        TemplateId::Minimalist => MINIMALIST,
        TemplateId::Elegant => ELEGANT,
        TemplateId::Creative => CREATIVE,
    }
}

/// Looks up a profile by raw id. Never fails: unknown ids get the `modern` profile.
pub fn style_for(id: &str) -> StyleProfile {
    profile(TemplateId::lenient(id))
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog metadata
// ────────────────────────────────────────────────────────────────────────────

/// Display metadata for the template picker.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub preview: &'static str,
    pub style: StyleProfile,
}

pub fn catalog() -> Vec<TemplateInfo> {
    TemplateId::ALL.into_iter().map(info).collect()
}

fn info(id: TemplateId) -> TemplateInfo {
    let (name, description, preview) = match id {
        TemplateId::Modern => (
            "Modern Professional",
            "Clean design with colorful accents",
            "Blue & emerald gradient header",
        ),
        TemplateId::Minimalist => (
            "Minimalist",
            "Simple and clean layout",
            "Black & white professional",
        ),
        TemplateId::Elegant => (
            "Elegant Classic",
            "Sophisticated and timeless",
            "Purple accent professional",
        ),
        TemplateId::Creative => (
            "Creative Bold",
            "Stand out with vibrant design",
            "Orange & teal creative layout",
        ),
    };
    TemplateInfo {
        id,
        name,
        description,
        preview,
        style: profile(id),
    }
}
