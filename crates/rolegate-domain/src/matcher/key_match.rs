/// Reports whether `path` matches `pattern`.
///
/// Both are split on `/` and compared segment by segment:
/// - a pattern segment `:name` matches any single non-empty path segment;
/// - a final pattern segment `*` matches the remainder, which must hold at
///   least one segment (`/api/*` matches `/api/` and `/api/a/b`, not `/api`);
/// - every other segment, including `*` in any other position, must be
///   equal byte for byte.
///
/// Matching is case-sensitive and performs no URL decoding.
pub fn key_match2(path: &str, pattern: &str) -> bool {
    let mut path_segments = path.split('/');
    let mut pattern_segments = pattern.split('/').peekable();

    while let Some(expected) = pattern_segments.next() {
        let is_last = pattern_segments.peek().is_none();
        if is_last && expected == "*" {
            return path_segments.next().is_some();
        }

        let Some(actual) = path_segments.next() else {
            return false;
        };
        let matched = if is_parameter(expected) {
            !actual.is_empty()
        } else {
            actual == expected
        };
        if !matched {
            return false;
        }
    }

    path_segments.next().is_none()
}

fn is_parameter(segment: &str) -> bool {
    segment.len() > 1 && segment.starts_with(':')
}
