//! Declarative structural paths
//!
//! A `Path` is an ordered list of "descend to the N-th child element named
//! TAG" steps, written as `table[2]/tr[1]/td[0]`. Layouts describe where data
//! lives with paths instead of inline index arithmetic.
//!
//! Rows under a `table` are looked up through the implicit `tbody`, `thead`
//! and `tfoot` wrappers the HTML parser inserts, so `table[0]/tr[1]` matches
//! whether or not the markup spelled out a `tbody`.

use std::fmt;
use std::str::FromStr;

use scraper::ElementRef;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// One positional step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub tag: String,
    pub index: usize,
}

impl Step {
    pub fn new(tag: &str, index: usize) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            index,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    /// The empty path resolves to the starting element itself
    pub fn root() -> Self {
        Self::default()
    }

    /// Append a step (builder style)
    pub fn child(mut self, tag: &str, index: usize) -> Self {
        self.steps.push(Step::new(tag, index));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Follow every step from `start`; `None` when any step is missing
    pub fn resolve<'a>(&self, start: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let mut current = start;
        for step in &self.steps {
            current = children_named(current, &step.tag).into_iter().nth(step.index)?;
        }
        Some(current)
    }
}

/// Child elements with the given tag name, in document order.
///
/// `tr` children of a `table` include rows nested in section wrappers.
pub fn children_named<'a>(parent: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    let mut out = Vec::new();
    let look_through_sections = tag == "tr" && parent.value().name() == "table";

    for child in parent.children().filter_map(ElementRef::wrap) {
        let name = child.value().name();
        if name == tag {
            out.push(child);
        } else if look_through_sections && matches!(name, "tbody" | "thead" | "tfoot") {
            out.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == tag),
            );
        }
    }

    out
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}[{}]", step.tag, step.index)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Error;

    /// Parse `tag[index]/tag[index]/...`. An empty string is the root path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Path::root());
        }

        let mut path = Path::root();
        for segment in trimmed.split('/') {
            let segment = segment.trim();
            let open = segment.find('[').ok_or_else(|| invalid("missing '['"))?;
            let close = segment
                .strip_suffix(']')
                .ok_or_else(|| invalid("missing trailing ']'"))?;

            let tag = &segment[..open];
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid("tag must be alphanumeric"));
            }

            let index: usize = close[open + 1..]
                .parse()
                .map_err(|_| invalid("index must be a non-negative integer"))?;

            path = path.child(tag, index);
        }

        Ok(path)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_parse_and_display() {
        let path: Path = "table[2]/TR[1]/td[0]".parse().unwrap();
        assert_eq!(path.steps().len(), 3);
        assert_eq!(path.steps()[1], Step::new("tr", 1));
        assert_eq!(path.to_string(), "table[2]/tr[1]/td[0]");

        assert!("".parse::<Path>().unwrap().is_root());
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["table", "table[x]", "table[1", "[1]", "ta-ble[0]", "td[-1]"] {
            assert!(
                matches!(bad.parse::<Path>(), Err(Error::InvalidPath { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_uses_text_form() {
        let path = Path::root().child("td", 1).child("a", 0);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""td[1]/a[0]""#);

        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_resolve_through_implicit_tbody() {
        let html = Html::parse_document(
            r#"
            <div id="root">
                <table><tr><td>skip</td></tr></table>
                <table>
                    <tr><td>r0</td></tr>
                    <tr><td>r1c0</td><td><span>x</span><a href="/y">link</a></td></tr>
                </table>
            </div>
            "#,
        );
        let root = html
            .select(&Selector::parse("#root").unwrap())
            .next()
            .unwrap();

        let path: Path = "table[1]/tr[1]/td[1]/a[0]".parse().unwrap();
        let anchor = path.resolve(root).unwrap();
        assert_eq!(anchor.value().attr("href"), Some("/y"));

        let missing: Path = "table[1]/tr[5]".parse().unwrap();
        assert!(missing.resolve(root).is_none());

        assert_eq!(Path::root().resolve(root).unwrap().value().attr("id"), Some("root"));
    }
}
