//! Path pattern detector

use super::types::{ParamKind, PathPattern, Segment};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Detects templated paths from observed concrete paths
///
/// Paths are grouped by their first segment and segment count. Within a
/// group of two or more paths, positions whose values differ become
/// parameters named after the kind of value seen there. Independently, a
/// numeric or UUID second segment (`/users/123/...`) registers the
/// `/users/{id}` (or `{uuid}`) prefix pattern.
#[derive(Debug, Clone, Default)]
pub struct PathPatternDetector {
    /// First segment -> observed paths
    observations: BTreeMap<String, Vec<String>>,
    /// Template -> pattern
    patterns: BTreeMap<String, PathPattern>,
}

impl PathPatternDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed path
    pub fn add_path(&mut self, path: &str) {
        let base = split(path).first().copied().unwrap_or_default().to_string();
        self.observations
            .entry(base)
            .or_default()
            .push(path.to_string());
    }

    /// Number of recorded paths
    pub fn path_count(&self) -> usize {
        self.observations.values().map(Vec::len).sum()
    }

    /// Derive patterns from every recorded path
    pub fn analyze_patterns(&mut self) {
        let mut detected = Vec::new();

        for (base, paths) in &self.observations {
            let mut by_length: BTreeMap<usize, Vec<Vec<&str>>> = BTreeMap::new();
            for path in paths {
                let segments = split(path);
                by_length.entry(segments.len()).or_default().push(segments);
            }

            detected.extend(
                by_length
                    .values()
                    .filter(|group| group.len() >= 2)
                    .filter_map(|group| group_pattern(group)),
            );

            // prefix patterns last: they replace a same-named group pattern
            detected.extend(rest_patterns(base, paths));
        }

        for pattern in detected {
            self.patterns.insert(pattern.template.clone(), pattern);
        }

        debug!(
            "Detected {} path patterns from {} paths",
            self.patterns.len(),
            self.path_count()
        );
    }

    /// Detected patterns by template
    pub fn patterns(&self) -> &BTreeMap<String, PathPattern> {
        &self.patterns
    }

    /// Template for a concrete path, or the path itself when nothing matches
    ///
    /// Whole-path patterns are preferred over prefix patterns, then the
    /// most specific parameter kinds win.
    pub fn templatize_path(&self, path: &str) -> String {
        if self.patterns.contains_key(path) {
            return path.to_string();
        }

        let segments = split(path);
        self.patterns
            .values()
            .filter(|pattern| pattern.matches(&segments))
            .min_by(|a, b| a.rank().cmp(&b.rank()))
            .map_or_else(|| path.to_string(), |pattern| pattern.apply(&segments))
    }
}

/// Parameter name/value pairs of `path` under `template`, in path order
pub fn path_parameters(path: &str, template: &str) -> Vec<(String, String)> {
    split(template)
        .into_iter()
        .zip(split(path))
        .filter_map(|(segment, value)| {
            segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .map(|name| (name.to_string(), value.to_string()))
        })
        .collect()
}

fn split(path: &str) -> Vec<&str> {
    path.trim_matches('/').split('/').collect()
}

/// Pattern for a group of equally long paths, `None` if nothing varies
fn group_pattern(group: &[Vec<&str>]) -> Option<PathPattern> {
    let length = group.first()?.len();
    let mut segments = Vec::with_capacity(length);
    let mut kinds = Vec::new();
    let mut name_counts: HashMap<&str, usize> = HashMap::new();

    for position in 0..length {
        let mut values: Vec<&str> = group.iter().map(|segments| segments[position]).collect();
        values.sort_unstable();
        values.dedup();

        if let [only] = values.as_slice() {
            segments.push(Segment::literal(*only));
            continue;
        }

        let kind = ParamKind::classify(&values);
        let count = name_counts.entry(kind.name()).or_insert(0);
        *count += 1;
        let name = if *count == 1 {
            kind.name().to_string()
        } else {
            format!("{}{}", kind.name(), count)
        };

        segments.push(Segment::param(name, kind));
        kinds.push(kind);
    }

    let description = match kinds.as_slice() {
        [] => return None,
        [kind] => kind.description(),
        _ => "Path parameters",
    };
    Some(PathPattern::new(segments, description))
}

/// `/base/{id}` and `/base/{uuid}` when any path has such a second segment
fn rest_patterns(base: &str, paths: &[String]) -> Vec<PathPattern> {
    [(ParamKind::Id, "Resource ID"), (ParamKind::Uuid, "Resource UUID")]
        .into_iter()
        .filter(|(kind, _)| {
            paths.iter().any(|path| {
                let segments = split(path);
                segments.len() >= 2 && kind.matches(segments[1])
            })
        })
        .map(|(kind, description)| {
            PathPattern::prefix(
                vec![Segment::literal(base), Segment::param(kind.name(), kind)],
                description,
            )
        })
        .collect()
}
