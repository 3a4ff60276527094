//! Composite tag grammar.
//!
//! A composite tag joins a statement marker and a component marker (plus the
//! component label when the token sits inside a component) into one class:
//!
//! | Tag              | Statement | Component          |
//! |------------------|-----------|--------------------|
//! | `B B attribute`  | beginning | beginning attribute|
//! | `I I attribute`  | inside    | inside attribute   |
//! | `I O`            | inside    | outside            |
//! | `O O`            | outside   | outside            |
//!
//! [`CompositeTag`] is the strict form produced by the encoder. Classifier
//! output goes through [`CompositeTag::parse_lenient`] into [`DecodedTag`],
//! which never fails.
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised by strict tag parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagParseError {
    #[error("empty tag")]
    Empty,

    #[error("unknown position marker: {0}")]
    UnknownMarker(String),

    #[error("missing component marker in tag: {0}")]
    MissingComponent(String),

    #[error("component marker without label in tag: {0}")]
    MissingLabel(String),

    #[error("label on an outside component in tag: {0}")]
    UnexpectedLabel(String),

    #[error("outside statement cannot carry a component: {0}")]
    OutsideWithComponent(String),
}

/// Position of a token within a run: beginning, inside or outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    Beginning,
    Inside,
    Outside,
}

impl Marker {
    /// Short code used on the wire.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Marker::Beginning => "B",
            Marker::Inside => "I",
            Marker::Outside => "O",
        }
    }

    #[must_use]
    pub fn is_outside(self) -> bool {
        self == Marker::Outside
    }

    fn from_code(word: &str) -> Option<Self> {
        match word {
            "B" => Some(Marker::Beginning),
            "I" => Some(Marker::Inside),
            "O" => Some(Marker::Outside),
            _ => None,
        }
    }

    /// Accepts short codes as well as the spelled-out words, any case.
    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "b" | "beginning" | "begin" => Some(Marker::Beginning),
            "i" | "inside" => Some(Marker::Inside),
            "o" | "outside" => Some(Marker::Outside),
            _ => None,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Component position and label of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentTag {
    Outside,
    Beginning(String),
    Inside(String),
}

impl ComponentTag {
    #[must_use]
    pub fn marker(&self) -> Marker {
        match self {
            ComponentTag::Outside => Marker::Outside,
            ComponentTag::Beginning(_) => Marker::Beginning,
            ComponentTag::Inside(_) => Marker::Inside,
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            ComponentTag::Outside => None,
            ComponentTag::Beginning(label) | ComponentTag::Inside(label) => Some(label),
        }
    }
}

/// The classification target of one token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeTag {
    pub statement: Marker,
    pub component: ComponentTag,
}

/// Loosely parsed tag: the four fields the decoder works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTag {
    pub statement: Marker,
    pub component: Marker,
    pub label: Option<String>,
}

impl CompositeTag {
    /// Tag for background text: outside any statement and component.
    #[must_use]
    pub fn background() -> Self {
        Self {
            statement: Marker::Outside,
            component: ComponentTag::Outside,
        }
    }

    /// Build a tag, refusing a component on an outside statement.
    pub fn new(statement: Marker, component: ComponentTag) -> Result<Self, TagParseError> {
        if statement.is_outside() && component != ComponentTag::Outside {
            let tag = Self {
                statement,
                component,
            };
            return Err(TagParseError::OutsideWithComponent(tag.to_string()));
        }
        Ok(Self {
            statement,
            component,
        })
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.component.label()
    }

    #[must_use]
    pub fn decoded(&self) -> DecodedTag {
        DecodedTag {
            statement: self.statement,
            component: self.component.marker(),
            label: self.label().map(str::to_string),
        }
    }

    /// Parse classifier output without failing.
    ///
    /// Well-formed tags decode exactly as [`FromStr`] reads them. Otherwise the
    /// first marker is the statement position, optionally followed by a filler
    /// word (`statement` / `component`), and the second marker is the
    /// component position. Whatever remains is the label, kept as written. A
    /// missing statement marker reads as outside; a missing component marker
    /// reads as inside when a label follows and as outside otherwise.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> DecodedTag {
        if let Ok(tag) = raw.parse::<CompositeTag>() {
            return tag.decoded();
        }

        let mut markers = Vec::with_capacity(2);
        let mut rest = raw;
        while markers.len() < 2 {
            let Some((word, tail)) = split_word(rest) else {
                break;
            };
            let Some(marker) = Marker::from_word(word) else {
                break;
            };
            markers.push(marker);
            rest = tail;

            if markers.len() == 1 {
                if let Some((_, tail)) = split_word(rest).filter(|(w, _)| is_filler(w)) {
                    rest = tail;
                }
            }
        }

        let label = rest.trim();
        let label = (!label.is_empty()).then(|| label.to_string());

        let statement = markers.first().copied().unwrap_or(Marker::Outside);
        let component = match markers.get(1) {
            Some(marker) => *marker,
            None if label.is_some() => Marker::Inside,
            None => Marker::Outside,
        };

        DecodedTag {
            statement,
            component,
            label: if component.is_outside() { None } else { label },
        }
    }
}

/// Leading word of `s` and the text after it.
fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some(s.split_at(end))
}

fn is_filler(word: &str) -> bool {
    word.eq_ignore_ascii_case("statement") || word.eq_ignore_ascii_case("component")
}

impl fmt::Display for CompositeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.statement, self.component.marker())?;
        if let Some(label) = self.label() {
            write!(f, " {label}")?;
        }
        Ok(())
    }
}

impl FromStr for CompositeTag {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(TagParseError::Empty);
        }

        let mut parts = s.splitn(3, ' ');
        let statement = parts.next().unwrap_or_default();
        let statement = Marker::from_code(statement)
            .ok_or_else(|| TagParseError::UnknownMarker(statement.to_string()))?;

        let component = parts
            .next()
            .ok_or_else(|| TagParseError::MissingComponent(s.to_string()))?;
        let component = Marker::from_code(component)
            .ok_or_else(|| TagParseError::UnknownMarker(component.to_string()))?;

        let label = parts.next().filter(|l| !l.is_empty());
        let component = match (component, label) {
            (Marker::Outside, None) => ComponentTag::Outside,
            (Marker::Outside, Some(_)) => return Err(TagParseError::UnexpectedLabel(s.to_string())),
            (_, None) => return Err(TagParseError::MissingLabel(s.to_string())),
            (Marker::Beginning, Some(l)) => ComponentTag::Beginning(l.to_string()),
            (Marker::Inside, Some(l)) => ComponentTag::Inside(l.to_string()),
        };

        CompositeTag::new(statement, component)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn marker() -> impl Strategy<Value = Marker> {
        prop_oneof![
            Just(Marker::Beginning),
            Just(Marker::Inside),
            Just(Marker::Outside)
        ]
    }

    fn composite() -> impl Strategy<Value = CompositeTag> {
        let word = "statement|component|[a-z]{1,8}";
        let label = format!("({word})( ({word}))?");
        (marker(), marker(), proptest::string::string_regex(&label).unwrap()).prop_map(|(s, c, label)| {
            let component = match (s, c) {
                (Marker::Outside, _) | (_, Marker::Outside) => ComponentTag::Outside,
                (_, Marker::Beginning) => ComponentTag::Beginning(label),
                (_, Marker::Inside) => ComponentTag::Inside(label),
            };
            CompositeTag {
                statement: s,
                component,
            }
        })
    }

    proptest! {
        /// Encoding then strict decoding yields the same tag.
        #[test]
        fn roundtrip_strict(t in composite()) {
            let parsed: CompositeTag = t.to_string().parse().unwrap();
            prop_assert_eq!(parsed, t);
        }

        /// The lenient parser agrees with the strict one on well-formed tags.
        #[test]
        fn roundtrip_lenient(t in composite()) {
            prop_assert_eq!(CompositeTag::parse_lenient(&t.to_string()), t.decoded());
        }

        /// Lenient parsing accepts anything.
        #[test]
        fn lenient_never_panics(raw in ".{0,40}") {
            let decoded = CompositeTag::parse_lenient(&raw);
            if decoded.component.is_outside() {
                prop_assert!(decoded.label.is_none());
            }
        }
    }
}
