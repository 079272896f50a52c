//! Classifier directives.
//!
//! The intent classifier emits an ordered list of strings shaped like
//! `"<tag> <payload>"`. Tags are matched by prefix, so `"general"` also
//! matches `"generalize ..."`; this mirrors what the classifier contract
//! promises and nothing stricter.

use std::fmt;

/// Marker whose presence anywhere in a directive requests image generation.
pub const GENERATE_MARKER: &str = "generate ";

/// Known directive tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveTag {
    General,
    Realtime,
    Open,
    Close,
    Play,
    System,
    Content,
    GoogleSearch,
    YoutubeSearch,
    Generate,
    Exit,
}

impl DirectiveTag {
    /// Tags handled together by the automation handler.
    pub const AUTOMATION: [DirectiveTag; 7] = [
        Self::Open,
        Self::Close,
        Self::Play,
        Self::System,
        Self::Content,
        Self::GoogleSearch,
        Self::YoutubeSearch,
    ];

    const ALL: [DirectiveTag; 11] = [
        Self::General,
        Self::Realtime,
        Self::Open,
        Self::Close,
        Self::Play,
        Self::System,
        Self::Content,
        Self::GoogleSearch,
        Self::YoutubeSearch,
        Self::Generate,
        Self::Exit,
    ];

    /// The prefix a directive must start with to carry this tag.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Realtime => "realtime",
            Self::Open => "open",
            Self::Close => "close",
            Self::Play => "play",
            Self::System => "system",
            Self::Content => "content",
            Self::GoogleSearch => "google search",
            Self::YoutubeSearch => "youtube search",
            Self::Generate => "generate",
            Self::Exit => "exit",
        }
    }

    pub fn is_automation(self) -> bool {
        Self::AUTOMATION.contains(&self)
    }
}

impl fmt::Display for DirectiveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// One tagged instruction as emitted by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive(String);

impl Directive {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if the directive starts with `tag`'s prefix.
    pub fn has_tag(&self, tag: DirectiveTag) -> bool {
        self.0.starts_with(tag.prefix())
    }

    /// The first known tag this directive starts with.
    pub fn tag(&self) -> Option<DirectiveTag> {
        DirectiveTag::ALL.into_iter().find(|tag| self.has_tag(*tag))
    }

    /// `true` if the directive carries any automation tag.
    pub fn is_automation(&self) -> bool {
        DirectiveTag::AUTOMATION.iter().any(|tag| self.has_tag(*tag))
    }

    /// Everything after the first word, whitespace-normalised.
    pub fn payload(&self) -> String {
        self.0.split_whitespace().skip(1).collect::<Vec<_>>().join(" ")
    }

    /// The image prompt, if the directive contains [`GENERATE_MARKER`].
    ///
    /// The marker is found by substring search, so it also matches inside a
    /// payload (`"general please generate a cat"`). The prompt is the text
    /// after the first occurrence.
    pub fn image_prompt(&self) -> Option<&str> {
        self.0
            .find(GENERATE_MARKER)
            .map(|idx| self.0[idx + GENERATE_MARKER.len()..].trim())
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Directive {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Directive {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
