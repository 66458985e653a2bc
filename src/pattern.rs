//! Route patterns and the matchers compiled from them.
//!
//! A pattern can contain named parameters, which match a single path
//! segment:
//! ```ignore
//!  Pattern: /blog/:category/:post
//!
//!   /blog/rust/request-routers            match: category="rust", post="request-routers"
//!   /blog/rust/request-routers/           match (one trailing slash is ignored)
//!   /blog/rust/                           no match
//!   /blog/rust/request-routers/comments   no match
//! ```
//!
//! Patterns compile in one of two forms. The *exact* form, used by the verb
//! methods, matches the pattern and nothing below it. The *prefix* form,
//! used by [`Router::route`](crate::Router::route), matches the pattern and
//! everything below it, capturing the remainder of the path:
//! ```ignore
//!  Prefix pattern: /files
//!
//!   /files                             match: rest=""
//!   /files/                            match: rest=""
//!   /files/LICENSE                     match: rest="LICENSE"
//!   /files/templates/article.html      match: rest="templates/article.html"
//!   /filesystem                        no match
//! ```
use crate::error::PatternError;
use crate::params::Params;

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Parameter name reserved for the remainder captured by prefix patterns.
pub(crate) const REST: &str = "_rest";

/// Options that influence how a pattern is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Compare literal segments byte for byte instead of ASCII case-insensitively.
    pub case_sensitive: bool,
    /// Do not treat `/foo/` as equivalent to `/foo` for exact patterns.
    pub strict: bool,
}

/// What a successful match captured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Captures {
    /// Named parameters, in the order they appear in the pattern.
    pub params: Params,
    /// The unmatched remainder of the path, without its leading `/`.
    /// Always `None` for exact patterns.
    pub rest: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Capture {
    Whole,
    Rest,
}

/// A compiled route pattern.
pub struct Pattern {
    source: String,
    matcher: matchit::Router<Capture>,
    options: MatchOptions,
    prefix: bool,
}

impl Pattern {
    /// Compiles a pattern that matches exactly one path, modulo a single
    /// trailing slash unless [`MatchOptions::strict`] is set.
    pub fn exact(pattern: &str, options: MatchOptions) -> Result<Self, PatternError> {
        let base = Self::normalize(pattern, options)?;
        let route = if options.strict {
            base
        } else {
            trim_trailing_slash(&base).to_owned()
        };

        let mut matcher = matchit::Router::new();
        insert(&mut matcher, pattern, route, Capture::Whole)?;

        Ok(Self {
            source: pattern.to_owned(),
            matcher,
            options,
            prefix: false,
        })
    }

    /// Compiles a pattern that matches its own path and every path below it.
    pub fn prefix(pattern: &str, options: MatchOptions) -> Result<Self, PatternError> {
        let base = Self::normalize(pattern, options)?;
        let base = trim_trailing_slash(&base);

        let mut matcher = matchit::Router::new();
        insert(&mut matcher, pattern, base.to_owned(), Capture::Whole)?;
        let wildcard = match base {
            "/" => format!("/*{}", REST),
            base => format!("{}/*{}", base, REST),
        };
        insert(&mut matcher, pattern, wildcard, Capture::Rest)?;

        Ok(Self {
            source: pattern.to_owned(),
            matcher,
            options,
            prefix: true,
        })
    }

    fn normalize(pattern: &str, options: MatchOptions) -> Result<String, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(pattern.to_owned()));
        }

        let reserved = pattern
            .split('/')
            .any(|segment| parameter_name(segment) == Some(REST));
        if reserved {
            return Err(PatternError::ReservedName(pattern.to_owned()));
        }

        Ok(match options.case_sensitive {
            true => pattern.to_owned(),
            false => lowercase_literals(pattern),
        })
    }

    /// The pattern as it was registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    /// Matches a path against the pattern, returning `None` when it does not
    /// match.
    ///
    /// Parameter values are percent-decoded. A value that does not decode to
    /// valid UTF-8 is kept as it appeared in the path. The prefix remainder
    /// is never decoded.
    pub fn matches(&self, path: &str) -> Option<Captures> {
        if self.options.case_sensitive {
            return self.lookup(path, path);
        }

        let folded = fold_case(path);
        self.lookup(path, &folded)
    }

    // `folded` is `path` with the same byte layout, possibly case-folded.
    // Captured values are cut out of `path` at the offsets found in `folded`.
    fn lookup(&self, path: &str, folded: &str) -> Option<Captures> {
        let found = match self.matcher.at(folded) {
            Ok(found) => found,
            Err(_) if !self.options.strict || self.prefix => {
                let trimmed = trim_trailing_slash(folded);
                if trimmed.len() == folded.len() {
                    return None;
                }
                self.matcher.at(trimmed).ok()?
            }
            Err(_) => return None,
        };

        let mut captures = Captures::default();
        for (key, value) in found.params.iter() {
            let value = original(path, folded, value);
            if key == REST {
                captures.rest = Some(value.to_owned());
            } else {
                captures.params.insert(key, decode(value));
            }
        }

        if let Capture::Whole = found.value {
            if self.prefix {
                captures.rest = Some(String::new());
            }
        }

        Some(captures)
    }
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("prefix", &self.prefix)
            .field("options", &self.options)
            .finish()
    }
}

fn insert(
    matcher: &mut matchit::Router<Capture>,
    pattern: &str,
    route: String,
    capture: Capture,
) -> Result<(), PatternError> {
    matcher
        .insert(route, capture)
        .map_err(|err| PatternError::Invalid {
            pattern: pattern.to_owned(),
            reason: err.to_string(),
        })
}

// Only allocates when there is something to fold.
fn fold_case(path: &str) -> Cow<'_, str> {
    if path.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(path.to_ascii_lowercase())
    } else {
        Cow::Borrowed(path)
    }
}

fn original<'p>(path: &'p str, folded: &str, value: &str) -> &'p str {
    let start = value.as_ptr() as usize - folded.as_ptr() as usize;
    &path[start..start + value.len()]
}

fn decode(value: &str) -> String {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_owned(),
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

fn parameter_start(segment: &str) -> Option<usize> {
    segment.find(|c: char| c == ':' || c == '*')
}

fn parameter_name(segment: &str) -> Option<&str> {
    parameter_start(segment).map(|at| &segment[at + 1..])
}

// Parameter names keep their casing; only the literal text before them is folded.
fn lowercase_literals(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| match parameter_start(segment) {
            Some(at) => {
                let (literal, parameter) = segment.split_at(at);
                format!("{}{}", literal.to_ascii_lowercase(), parameter)
            }
            None => segment.to_ascii_lowercase(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(pattern: &str) -> Pattern {
        Pattern::exact(pattern, MatchOptions::default()).unwrap()
    }

    fn prefix(pattern: &str) -> Pattern {
        Pattern::prefix(pattern, MatchOptions::default()).unwrap()
    }

    #[test]
    fn exact_matches_modulo_one_trailing_slash() {
        let p = exact("/test");
        assert!(p.matches("/test").is_some());
        assert!(p.matches("/test/").is_some());
        assert!(p.matches("/test//").is_none());
        assert!(p.matches("/test/baby").is_none());
        assert!(p.matches("/tes").is_none());
        assert_eq!(p.matches("/test").unwrap().rest, None);
    }

    #[test]
    fn exact_root() {
        let p = exact("/");
        assert!(p.matches("/").is_some());
        assert!(p.matches("/a").is_none());
    }

    #[test]
    fn exact_named_parameters() {
        let p = exact("/blog/:category/:post");
        let captures = p.matches("/blog/rust/request-routers/").unwrap();
        assert_eq!(captures.params.get("category"), Some("rust"));
        assert_eq!(captures.params.get("post"), Some("request-routers"));
        assert!(p.matches("/blog/rust/").is_none());
        assert!(p.matches("/blog/rust/request-routers/comments").is_none());
    }

    #[test]
    fn strict_exact_rejects_trailing_slash() {
        let options = MatchOptions {
            strict: true,
            ..MatchOptions::default()
        };
        let p = Pattern::exact("/test", options).unwrap();
        assert!(p.matches("/test").is_some());
        assert!(p.matches("/test/").is_none());
    }

    #[test]
    fn prefix_captures_remainder() {
        let p = prefix("/blabla");
        assert_eq!(p.matches("/blabla").unwrap().rest.as_deref(), Some(""));
        assert_eq!(p.matches("/blabla/").unwrap().rest.as_deref(), Some(""));
        assert_eq!(
            p.matches("/blabla/test/qsdqsd").unwrap().rest.as_deref(),
            Some("test/qsdqsd")
        );
        assert!(p.matches("/blablabla").is_none());
        assert!(p.matches("/other").is_none());
    }

    #[test]
    fn prefix_trailing_slash_in_pattern_is_equivalent() {
        let with = prefix("/blabla/");
        let without = prefix("/blabla");
        for path in &["/blabla", "/blabla/", "/blabla/x"] {
            assert_eq!(with.matches(path), without.matches(path));
        }
    }

    #[test]
    fn prefix_root_matches_everything() {
        let p = prefix("/");
        assert_eq!(p.matches("/").unwrap().rest.as_deref(), Some(""));
        assert_eq!(p.matches("/a/b").unwrap().rest.as_deref(), Some("a/b"));
    }

    #[test]
    fn prefix_keeps_rest_out_of_params() {
        let p = prefix("/users/:id");
        let captures = p.matches("/users/42/posts").unwrap();
        assert_eq!(captures.params.get("id"), Some("42"));
        assert_eq!(captures.params.get(REST), None);
        assert_eq!(captures.params.len(), 1);
        assert_eq!(captures.rest.as_deref(), Some("posts"));
    }

    #[test]
    fn literals_fold_case_but_values_do_not() {
        let p = exact("/Users/:Name");
        let captures = p.matches("/USERS/Gordon").unwrap();
        assert_eq!(captures.params.get("Name"), Some("Gordon"));

        let p = prefix("/api");
        assert_eq!(p.matches("/API/Items").unwrap().rest.as_deref(), Some("Items"));
    }

    #[test]
    fn case_sensitive_literals() {
        let options = MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        };
        let p = Pattern::exact("/Users", options).unwrap();
        assert!(p.matches("/Users").is_some());
        assert!(p.matches("/users").is_none());
    }

    #[test]
    fn rejects_bad_patterns() {
        assert_eq!(
            Pattern::exact("test", MatchOptions::default()).unwrap_err(),
            PatternError::MissingLeadingSlash("test".to_owned())
        );
        assert_eq!(
            Pattern::prefix("/a/:_rest", MatchOptions::default()).unwrap_err(),
            PatternError::ReservedName("/a/:_rest".to_owned())
        );
        assert_eq!(
            Pattern::exact("/a/x:_rest", MatchOptions::default()).unwrap_err(),
            PatternError::ReservedName("/a/x:_rest".to_owned())
        );
        assert!(matches!(
            Pattern::prefix("/files/*path", MatchOptions::default()),
            Err(PatternError::Invalid { .. })
        ));
    }

    #[test]
    fn parameter_values_are_percent_decoded() {
        let p = exact("/u/:name");
        let captures = p.matches("/u/John%20Doe").unwrap();
        assert_eq!(captures.params.get("name"), Some("John Doe"));

        let captures = p.matches("/u/caf%C3%A9").unwrap();
        assert_eq!(captures.params.get("name"), Some("café"));
    }

    #[test]
    fn undecodable_parameter_values_are_kept_raw() {
        let p = exact("/u/:name");
        let captures = p.matches("/u/%FF%FE").unwrap();
        assert_eq!(captures.params.get("name"), Some("%FF%FE"));
    }

    #[test]
    fn prefix_remainder_is_not_decoded() {
        let p = prefix("/files/:dir");
        let captures = p.matches("/files/My%20Docs/a%2Fb").unwrap();
        assert_eq!(captures.params.get("dir"), Some("My Docs"));
        assert_eq!(captures.rest.as_deref(), Some("a%2Fb"));
    }

    #[test]
    fn parameter_in_middle_of_segment_keeps_its_name() {
        let p = exact("/File_:Name");
        let captures = p.matches("/file_X").unwrap();
        assert_eq!(captures.params.get("Name"), Some("X"));
        assert_eq!(captures.params.get("name"), None);

        let captures = p.matches("/FILE_Report").unwrap();
        assert_eq!(captures.params.get("Name"), Some("Report"));
    }

    #[test]
    fn fold_case_only_copies_paths_with_uppercase() {
        assert!(matches!(fold_case("/users/42"), Cow::Borrowed("/users/42")));
        assert!(matches!(fold_case("/"), Cow::Borrowed("/")));
        assert_eq!(fold_case("/Users/42"), Cow::<str>::Owned("/users/42".to_owned()));

        let p = exact("/Users/:id");
        assert_eq!(p.matches("/users/42").unwrap().params.get("id"), Some("42"));
        assert_eq!(p.matches("/USERS/Ab").unwrap().params.get("id"), Some("Ab"));
    }

    // Every pattern of one to three segments built from a literal, a
    // mixed-case literal and a parameter, matched against the path it
    // describes.
    fn generated_routes() -> Vec<(String, String, Vec<(String, String)>)> {
        let mut shapes: Vec<Vec<u8>> = vec![vec![]];
        let mut routes = Vec::new();
        for _ in 0..3 {
            shapes = shapes
                .iter()
                .flat_map(|shape| {
                    (0..3u8).map(move |kind| {
                        let mut next = shape.clone();
                        next.push(kind);
                        next
                    })
                })
                .collect();

            for shape in &shapes {
                let mut pattern = String::new();
                let mut path = String::new();
                let mut params = Vec::new();
                for (i, kind) in shape.iter().enumerate() {
                    match *kind {
                        0 => {
                            pattern.push_str("/seg");
                            path.push_str("/seg");
                        }
                        1 => {
                            pattern.push_str("/Mixed");
                            path.push_str("/mIXED");
                        }
                        _ => {
                            let key = format!("p{}", i);
                            let value = format!("Val{}", i);
                            pattern.push_str(&format!("/:{}", key));
                            path.push_str(&format!("/{}", value));
                            params.push((key, value));
                        }
                    }
                }
                routes.push((pattern, path, params));
            }
        }
        routes
    }

    fn expected(params: &[(String, String)]) -> Params {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn generated_prefix_patterns_match_below_themselves() {
        for (pattern, path, params) in generated_routes() {
            let p = prefix(&pattern);
            let params = expected(&params);

            let cases = [
                (path.clone(), ""),
                (format!("{}/", path), ""),
                (format!("{}/x", path), "x"),
                (format!("{}/x/y", path), "x/y"),
            ];
            for (input, rest) in cases.iter() {
                let captures = p
                    .matches(input)
                    .unwrap_or_else(|| panic!("{} should match {}", pattern, input));
                assert_eq!(captures.params, params, "{} against {}", pattern, input);
                assert_eq!(captures.rest.as_deref(), Some(*rest), "{} against {}", pattern, input);
            }
        }
    }

    #[test]
    fn generated_exact_patterns_match_only_themselves() {
        for (pattern, path, params) in generated_routes() {
            let p = exact(&pattern);
            let params = expected(&params);

            let bare = p.matches(&path).unwrap_or_else(|| panic!("{} should match {}", pattern, path));
            let slashed = p
                .matches(&format!("{}/", path))
                .unwrap_or_else(|| panic!("{} should match {}/", pattern, path));
            assert_eq!(bare.params, params, "{}", pattern);
            assert_eq!(slashed.params, params, "{}", pattern);
            assert_eq!(bare.rest, None);

            assert!(p.matches(&format!("{}/x", path)).is_none(), "{}", pattern);
            assert!(p.matches(&format!("{}//", path)).is_none(), "{}", pattern);
        }
    }
}
