//! Shader source preprocessing
//!
//! Resolves `#include "path"` directives by textual substitution. Scanning is
//! left to right over the string as it is being rewritten: a directive is
//! replaced by the fetched text and the scan resumes at the start of that
//! text, so includes inside included files are resolved in discovery order.
//! Paths are used literally (no resolution relative to the including file).
//!
//! The resolver keeps a stack of the include regions the scan is currently
//! inside. Including a path that is already on the stack fails with
//! [`PreprocessError::Cycle`]. Substitutions are also counted against a
//! budget ([`PreprocessError::SubstitutionLimit`]).

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Default number of substitutions allowed per `process` call
pub const DEFAULT_MAX_SUBSTITUTIONS: usize = 64;

const DIRECTIVE: &str = "#include";

/// Error type for source fetches
#[derive(Debug)]
pub enum FetchError {
    /// No source exists at the path
    NotFound(String),
    /// The source exists but could not be read
    Io { path: String, source: io::Error },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound(path) => write!(f, "Shader source not found: {}", path),
            FetchError::Io { path, source } => {
                write!(f, "Failed to read shader source {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::NotFound(_) => None,
            FetchError::Io { source, .. } => Some(source),
        }
    }
}

/// Error type for preprocessing
#[derive(Debug)]
pub enum PreprocessError {
    /// A referenced source could not be fetched
    Fetch(FetchError),
    /// A path includes itself, directly or through other includes
    Cycle { chain: Vec<String> },
    /// More substitutions were needed than the budget allows
    SubstitutionLimit { limit: usize, path: String },
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessError::Fetch(err) => write!(f, "Include failed: {}", err),
            PreprocessError::Cycle { chain } => {
                write!(f, "Include cycle: {}", chain.join(" -> "))
            }
            PreprocessError::SubstitutionLimit { limit, path } => write!(
                f,
                "Include limit of {} substitutions exceeded at \"{}\"",
                limit, path
            ),
        }
    }
}

impl std::error::Error for PreprocessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreprocessError::Fetch(err) => Some(err),
            PreprocessError::Cycle { .. } | PreprocessError::SubstitutionLimit { .. } => None,
        }
    }
}

impl From<FetchError> for PreprocessError {
    fn from(err: FetchError) -> Self {
        PreprocessError::Fetch(err)
    }
}

/// Fetches shader source text by path
pub trait SourceFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

impl<F: SourceFetcher + ?Sized> SourceFetcher for &F {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        (**self).fetch(path)
    }
}

/// Reads sources from files below a root directory
#[derive(Clone, Debug)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl SourceFetcher for FileFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound(path.to_string()),
            _ => FetchError::Io {
                path: path.to_string(),
                source: e,
            },
        })
    }
}

/// In-memory sources keyed by path
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    sources: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a source
    pub fn with(mut self, path: &str, source: &str) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: &str, source: &str) {
        self.sources.insert(path.to_string(), source.to_string());
    }
}

impl SourceFetcher for MemoryFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

/// A directive found in source text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Byte offset of `#include`
    pub start: usize,
    /// The whole directive text, `#include` through the closing quote
    pub text: &'a str,
    /// The quoted path
    pub path: &'a str,
}

/// Find the first well-formed directive starting at or after byte `from`
///
/// Well-formed means `#include`, one or more whitespace characters, then a
/// double-quoted non-empty path.
pub fn find_directive(source: &str, from: usize) -> Option<Directive<'_>> {
    let mut search = from;
    while search <= source.len() {
        let found = search + source.get(search..)?.find(DIRECTIVE)?;
        if let Some(directive) = parse_directive_at(source, found) {
            return Some(directive);
        }
        search = found + DIRECTIVE.len();
    }
    None
}

fn parse_directive_at(source: &str, start: usize) -> Option<Directive<'_>> {
    let rest = &source[start + DIRECTIVE.len()..];
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }
    let quoted = trimmed.strip_prefix('"')?;
    let close = quoted.find('"')?;
    if close == 0 {
        return None;
    }
    let path = &quoted[..close];
    let end = source.len() - quoted.len() + close + 1;
    Some(Directive {
        start,
        text: &source[start..end],
        path,
    })
}

/// Count the well-formed directives in `source`
pub fn count_directives(source: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(directive) = find_directive(source, from) {
        count += 1;
        from = directive.start + directive.text.len();
    }
    count
}

/// Include resolver over a [`SourceFetcher`]
pub struct Preprocessor<F> {
    fetcher: F,
    max_substitutions: usize,
}

impl<F: SourceFetcher> Preprocessor<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_substitutions: DEFAULT_MAX_SUBSTITUTIONS,
        }
    }

    /// Builder: set the substitution budget
    pub fn with_max_substitutions(mut self, max_substitutions: usize) -> Self {
        self.max_substitutions = max_substitutions;
        self
    }

    /// Fetch `path` and resolve its includes
    ///
    /// `path` itself takes part in cycle detection.
    pub fn load(&self, path: &str) -> Result<String, PreprocessError> {
        let source = self.fetcher.fetch(path)?;
        self.resolve(source, Some(path))
    }

    /// Resolve every include in `source`
    pub fn process(&self, source: &str) -> Result<String, PreprocessError> {
        self.resolve(source.to_string(), None)
    }

    fn resolve(&self, mut output: String, root: Option<&str>) -> Result<String, PreprocessError> {
        // Open include regions, outermost first: (path, end offset of its text)
        let mut open: Vec<(String, usize)> = Vec::new();
        if let Some(root) = root {
            open.push((root.to_string(), output.len()));
        }
        let mut cursor = 0;
        let mut substitutions = 0;

        while let Some(directive) = find_directive(&output, cursor) {
            let start = directive.start;
            let end = start + directive.text.len();
            let path = directive.path.to_string();

            while open.last().is_some_and(|(_, region_end)| *region_end <= start) {
                open.pop();
            }

            if open.iter().any(|(open_path, _)| *open_path == path) {
                let mut chain: Vec<String> = open.iter().map(|(p, _)| p.clone()).collect();
                chain.push(path);
                return Err(PreprocessError::Cycle { chain });
            }

            if substitutions == self.max_substitutions {
                return Err(PreprocessError::SubstitutionLimit {
                    limit: self.max_substitutions,
                    path,
                });
            }

            let included = self.fetcher.fetch(&path)?;
            log::debug!("Including \"{}\" ({} bytes)", path, included.len());
            output.replace_range(start..end, &included);
            substitutions += 1;

            for (_, region_end) in open.iter_mut() {
                *region_end = if *region_end >= end {
                    *region_end + included.len() - (end - start)
                } else {
                    // Directive straddles the end of the region
                    start + included.len()
                };
            }
            open.push((path, start + included.len()));

            // Re-scan the substituted text so nested includes are resolved
            cursor = start;
        }

        Ok(output)
    }
}

/// Resolve includes in `source` with the default budget
pub fn process<F: SourceFetcher>(source: &str, fetcher: F) -> Result<String, PreprocessError> {
    Preprocessor::new(fetcher).process(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_directives_unchanged() {
        let source = "fn main() {}\n// #include without quotes\n";
        let out = process(source, MemoryFetcher::new()).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_single_include() {
        let fetcher = MemoryFetcher::new().with("lib.wgsl", "fn helper() {}");
        let out = process("#include \"lib.wgsl\"\nfn main() {}", fetcher).unwrap();
        assert_eq!(out, "fn helper() {}\nfn main() {}");
    }

    #[test]
    fn test_multiple_includes_in_order() {
        let fetcher = MemoryFetcher::new().with("x", "X").with("y", "Y");
        let source = "A\n#include \"x\"\nB\n#include   \"y\"\nC";
        let out = process(source, fetcher).unwrap();
        assert_eq!(out, "A\nX\nB\nY\nC");
        assert_eq!(count_directives(&out), 0);
    }

    #[test]
    fn test_repeated_directive_is_resolved_each_time() {
        let fetcher = MemoryFetcher::new().with("x", "X");
        let out = process("#include \"x\" #include \"x\"", fetcher).unwrap();
        assert_eq!(out, "X X");
    }

    #[test]
    fn test_matches_manual_substitution() {
        let fetcher = MemoryFetcher::new()
            .with("a.wgsl", "const A: f32 = 1.0;")
            .with("b.wgsl", "const B: f32 = 2.0;")
            .with("c.wgsl", "const C: f32 = 3.0;");
        let source = "#include \"a.wgsl\"\n#include \"b.wgsl\"\nbody\n#include \"c.wgsl\"\n";
        let manual = source
            .replacen("#include \"a.wgsl\"", "const A: f32 = 1.0;", 1)
            .replacen("#include \"b.wgsl\"", "const B: f32 = 2.0;", 1)
            .replacen("#include \"c.wgsl\"", "const C: f32 = 3.0;", 1);
        let out = process(source, fetcher).unwrap();
        assert_eq!(out, manual);
        assert_eq!(count_directives(&out), 0);
    }

    #[test]
    fn test_tab_and_newline_count_as_whitespace() {
        let fetcher = MemoryFetcher::new().with("x", "X");
        assert_eq!(process("#include\t\"x\"", &fetcher).unwrap(), "X");
        assert_eq!(process("#include\n\"x\"", &fetcher).unwrap(), "X");
    }

    #[test]
    fn test_malformed_directives_ignored() {
        let source = "#include\"x\"\n#include \"\"\n#include \"unterminated\n#include <x>";
        let out = process(source, MemoryFetcher::new()).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_malformed_then_wellformed() {
        let fetcher = MemoryFetcher::new().with("x", "X");
        let out = process("#include<y>\n#include \"x\"", fetcher).unwrap();
        assert_eq!(out, "#include<y>\nX");
    }

    #[test]
    fn test_nested_include_is_resolved() {
        let fetcher = MemoryFetcher::new()
            .with("outer.wgsl", "#include \"inner.wgsl\"\nfn outer() {}")
            .with("inner.wgsl", "fn inner() {}");
        let out = process("#include \"outer.wgsl\"\nfn main() {}", fetcher).unwrap();
        assert_eq!(out, "fn inner() {}\nfn outer() {}\nfn main() {}");
    }

    #[test]
    fn test_shared_include_is_not_a_cycle() {
        let fetcher = MemoryFetcher::new()
            .with("a", "#include \"b\"\n#include \"c\"")
            .with("b", "#include \"d\"\nB")
            .with("c", "#include \"d\"\nC")
            .with("d", "D");
        let out = process("#include \"a\"", fetcher).unwrap();
        assert_eq!(out, "D\nB\nD\nC");
    }

    #[test]
    fn test_missing_include_propagates_fetch_error() {
        let err = process("#include \"missing.wgsl\"", MemoryFetcher::new()).unwrap_err();
        match err {
            PreprocessError::Fetch(FetchError::NotFound(path)) => assert_eq!(path, "missing.wgsl"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_self_include_is_a_cycle() {
        let fetcher = MemoryFetcher::new().with("loop.wgsl", "#include \"loop.wgsl\"\n");
        let err = process("#include \"loop.wgsl\"", &fetcher).unwrap_err();
        match err {
            PreprocessError::Cycle { chain } => {
                assert_eq!(chain, vec!["loop.wgsl".to_string(), "loop.wgsl".to_string()]);
            }
            other => panic!("Expected Cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_mutual_include_is_a_cycle() {
        let fetcher = MemoryFetcher::new()
            .with("a.wgsl", "// a\n#include \"b.wgsl\"\n")
            .with("b.wgsl", "// b\n#include \"a.wgsl\"\n");
        let err = process("#include \"a.wgsl\"", &fetcher).unwrap_err();
        match err {
            PreprocessError::Cycle { chain } => assert_eq!(chain, vec!["a.wgsl", "b.wgsl", "a.wgsl"]),
            other => panic!("Expected Cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_load_detects_root_cycle() {
        let fetcher = MemoryFetcher::new().with("vertex.wgsl", "#include \"vertex.wgsl\"");
        let err = Preprocessor::new(fetcher).load("vertex.wgsl").unwrap_err();
        assert!(matches!(err, PreprocessError::Cycle { .. }));
        assert_eq!(err.to_string(), "Include cycle: vertex.wgsl -> vertex.wgsl");
    }

    #[test]
    fn test_budget_allows_exactly_max_substitutions() {
        let fetcher = MemoryFetcher::new().with("x", "X");
        let source = "#include \"x\" #include \"x\" #include \"x\"";
        let pre = Preprocessor::new(&fetcher).with_max_substitutions(3);
        assert_eq!(pre.process(source).unwrap(), "X X X");
        let pre = Preprocessor::new(&fetcher).with_max_substitutions(2);
        match pre.process(source).unwrap_err() {
            PreprocessError::SubstitutionLimit { limit, path } => {
                assert_eq!(limit, 2);
                assert_eq!(path, "x");
            }
            other => panic!("Expected SubstitutionLimit, got {:?}", other),
        }
    }

    #[test]
    fn test_load_fetches_then_processes() {
        let fetcher = MemoryFetcher::new()
            .with("vertex.wgsl", "#include \"common.wgsl\"\nfn vs() {}")
            .with("common.wgsl", "fn common() {}");
        let out = Preprocessor::new(fetcher).load("vertex.wgsl").unwrap();
        assert_eq!(out, "fn common() {}\nfn vs() {}");
    }

    #[test]
    fn test_find_directive_reports_span() {
        let source = "abc #include  \"p.wgsl\" def";
        let d = find_directive(source, 0).unwrap();
        assert_eq!(d.start, 4);
        assert_eq!(d.text, "#include  \"p.wgsl\"");
        assert_eq!(d.path, "p.wgsl");
        assert!(find_directive(source, 5).is_none());
    }

    #[test]
    fn test_multibyte_included_text() {
        let fetcher = MemoryFetcher::new().with("x", "// héllo wörld\n");
        let out = process("#include \"x\"\n#include \"x\"", fetcher).unwrap();
        assert_eq!(out, "// héllo wörld\n\n// héllo wörld\n");
    }

    #[test]
    fn test_file_fetcher_reads_below_root() {
        let dir = std::env::temp_dir().join(format!("spincube_fetch_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("inc.wgsl"), "fn from_file() {}").unwrap();

        let fetcher = FileFetcher::new(&dir);
        assert_eq!(fetcher.fetch("inc.wgsl").unwrap(), "fn from_file() {}");
        assert!(matches!(fetcher.fetch("nope.wgsl"), Err(FetchError::NotFound(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_error_display() {
        let err = PreprocessError::from(FetchError::NotFound("a.wgsl".to_string()));
        assert!(err.to_string().contains("a.wgsl"));
        let err = PreprocessError::SubstitutionLimit {
            limit: 4,
            path: "b.wgsl".to_string(),
        };
        assert!(err.to_string().contains("4"));
        assert!(err.to_string().contains("b.wgsl"));
    }
}
