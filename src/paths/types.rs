//! Path pattern types

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$").unwrap()
});
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

/// Kind of value a path parameter holds, most specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Decimal digits
    Id,
    /// Lower-case UUID
    Uuid,
    /// `YYYY-MM-DD`
    Date,
    /// Lower-case words joined by dashes
    Slug,
    /// Anything else
    Param,
}

impl ParamKind {
    const ALL: [ParamKind; 5] = [
        ParamKind::Id,
        ParamKind::Uuid,
        ParamKind::Date,
        ParamKind::Slug,
        ParamKind::Param,
    ];

    /// Parameter name used in templates
    pub fn name(self) -> &'static str {
        match self {
            ParamKind::Id => "id",
            ParamKind::Uuid => "uuid",
            ParamKind::Date => "date",
            ParamKind::Slug => "slug",
            ParamKind::Param => "param",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ParamKind::Id => "Numeric identifier",
            ParamKind::Uuid => "UUID identifier",
            ParamKind::Date => "Date in YYYY-MM-DD format",
            ParamKind::Slug => "URL-friendly identifier",
            ParamKind::Param => "Path parameter",
        }
    }

    /// Whether a concrete segment value fits this kind
    pub fn matches(self, value: &str) -> bool {
        match self {
            ParamKind::Id => DIGITS.is_match(value),
            ParamKind::Uuid => UUID.is_match(value),
            ParamKind::Date => DATE.is_match(value),
            ParamKind::Slug => SLUG.is_match(value),
            ParamKind::Param => !value.is_empty(),
        }
    }

    /// Most specific kind that fits every value
    pub fn classify(values: &[&str]) -> ParamKind {
        Self::ALL
            .into_iter()
            .find(|kind| values.iter().all(|v| kind.matches(v)))
            .unwrap_or(ParamKind::Param)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One segment of a path template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    Literal { value: String },
    Param { name: String, kind: ParamKind },
}

impl Segment {
    pub fn literal(value: impl Into<String>) -> Self {
        Segment::Literal {
            value: value.into(),
        }
    }

    pub fn param(name: impl Into<String>, kind: ParamKind) -> Self {
        Segment::Param {
            name: name.into(),
            kind,
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Segment::Literal { value: literal } => literal == value,
            Segment::Param { kind, .. } => kind.matches(value),
        }
    }

    fn render(&self) -> String {
        match self {
            Segment::Literal { value } => value.clone(),
            Segment::Param { name, .. } => format!("{{{name}}}"),
        }
    }
}

/// A detected path template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathPattern {
    /// Rendered template (`/users/{id}`)
    pub template: String,

    pub segments: Vec<Segment>,

    /// Matches on the leading segments only; deeper segments are kept as-is
    pub prefix: bool,

    pub description: String,
}

impl PathPattern {
    /// Create a pattern matching whole paths
    pub fn new(segments: Vec<Segment>, description: impl Into<String>) -> Self {
        Self {
            template: render(&segments),
            segments,
            prefix: false,
            description: description.into(),
        }
    }

    /// Create a pattern matching leading segments
    pub fn prefix(segments: Vec<Segment>, description: impl Into<String>) -> Self {
        Self {
            prefix: true,
            ..Self::new(segments, description)
        }
    }

    /// Whether `segments` (a split concrete path) fit this pattern
    pub fn matches(&self, segments: &[&str]) -> bool {
        let length_ok = if self.prefix {
            segments.len() >= self.segments.len()
        } else {
            segments.len() == self.segments.len()
        };

        length_ok
            && self
                .segments
                .iter()
                .zip(segments)
                .all(|(pattern, value)| pattern.matches(value))
    }

    /// Template the concrete `segments`; call only when [`matches`](Self::matches)
    pub fn apply(&self, segments: &[&str]) -> String {
        let rendered: Vec<String> = segments
            .iter()
            .enumerate()
            .map(|(i, value)| match self.segments.get(i) {
                Some(segment) => segment.render(),
                None => (*value).to_string(),
            })
            .collect();
        format!("/{}", rendered.join("/"))
    }

    /// Sort key: whole-path patterns first, then by parameter specificity
    pub(crate) fn rank(&self) -> (bool, usize, &str) {
        let specificity = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal { .. } => 0,
                Segment::Param { kind, .. } => *kind as usize + 1,
            })
            .sum();
        (self.prefix, specificity, &self.template)
    }
}

fn render(segments: &[Segment]) -> String {
    let rendered: Vec<String> = segments.iter().map(Segment::render).collect();
    format!("/{}", rendered.join("/"))
}
