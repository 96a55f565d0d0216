//! Walks a source tree, tokenizes each file, and dispatches tokens to rules.

use crate::config::Config;
use crate::context::FileContext;
use crate::rule::{Rule, RuleBox};
use crate::tokenizer::{TokenizeError, Tokenizer};
use crate::tokens::TokenStream;
use crate::types::{LintResult, Violation};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Applied on top of any configured excludes.
const DEFAULT_EXCLUDES: &[&str] = &["**/vendor/**", "**/node_modules/**"];

/// Errors that abort an analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A file could not be read, or the root could not be resolved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be tokenized and `fail_on_parse_error` is set.
    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Tokenizer error.
        source: TokenizeError,
    },

    /// Directory walk error.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An include or exclude pattern is not a valid glob.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// The bounded worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// [`AnalyzerBuilder::build`] was called without a tokenizer.
    #[error("No tokenizer configured")]
    MissingTokenizer,
}

/// Builder for an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    rules: Vec<RuleBox>,
    excludes: Vec<String>,
    includes: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory to walk. Falls back to `analyzer.root` from the config.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Language frontend. Required.
    #[must_use]
    pub fn tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(self, rule: R) -> Self {
        self.rule_box(Box::new(rule))
    }

    /// Adds an already boxed rule, as returned by presets.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob.
    #[must_use]
    pub fn exclude(self, pattern: impl Into<String>) -> Self {
        self.excludes([pattern])
    }

    /// Adds several exclude globs.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob. Once any is set, only matching files are checked.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    /// Configuration for discovery and rule toggles.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Abort on the first file that fails to tokenize instead of skipping it.
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no tokenizer was set, the current directory
    /// cannot be resolved, or a glob pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let tokenizer = self.tokenizer.ok_or(AnalyzerError::MissingTokenizer)?;
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(root)
        };

        let excludes = DEFAULT_EXCLUDES
            .iter()
            .map(|p| (*p).to_string())
            .chain(self.excludes)
            .chain(config.analyzer.exclude.iter().cloned());
        let includes = self
            .includes
            .into_iter()
            .chain(config.analyzer.include.iter().cloned());
        let filter = PathFilter::new(excludes, includes)?;

        let mut rules = self.rules;
        for rule in &mut rules {
            if let Some(block) = config.rule(rule.name()) {
                rule.apply_config(block);
            }
        }

        Ok(Analyzer {
            root,
            tokenizer,
            rules,
            filter,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Compiled include and exclude globs, checked against root-relative paths.
struct PathFilter {
    excludes: Vec<(glob::Pattern, String)>,
    includes: Vec<glob::Pattern>,
}

impl PathFilter {
    fn new(
        excludes: impl IntoIterator<Item = String>,
        includes: impl IntoIterator<Item = String>,
    ) -> Result<Self, glob::PatternError> {
        let excludes = excludes
            .into_iter()
            .map(|p| {
                let fragment = p.replace("**", "");
                glob::Pattern::new(&p).map(|glob| (glob, fragment))
            })
            .collect::<Result<_, _>>()?;
        let includes = includes
            .into_iter()
            .map(|p| glob::Pattern::new(&p))
            .collect::<Result<_, _>>()?;
        Ok(Self { excludes, includes })
    }

    /// `relative` must not start with a separator.
    fn excluded(&self, relative: &Path) -> bool {
        // Leading separator so `/vendor/` also hits a top-level `vendor/`.
        let anchored = format!("/{}", relative.to_string_lossy());
        self.excludes.iter().any(|(glob, fragment)| {
            glob.matches_path(relative) || (!fragment.is_empty() && anchored.contains(fragment))
        })
    }

    fn included(&self, relative: &Path) -> bool {
        self.includes.is_empty() || self.includes.iter().any(|p| p.matches_path(relative))
    }

    fn accepts(&self, relative: &Path) -> bool {
        self.included(relative) && !self.excluded(relative)
    }
}

/// Runs rules over every matching file under a root.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    tokenizer: Box<dyn Tokenizer>,
    rules: Vec<RuleBox>,
    filter: PathFilter,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Absolute root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of registered rules, including disabled ones.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes every discovered file.
    ///
    /// Files that fail to tokenize are logged and skipped unless
    /// `fail_on_parse_error` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails, a file cannot be read, or a
    /// file fails to tokenize while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let files = self.discover_files()?;
        info!(
            "Found {} {} files to analyze",
            files.len(),
            self.tokenizer.language_id()
        );

        let outcomes = match self.config.analyzer.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| self.analyze_files(&files)),
            None => self.analyze_files(&files),
        };

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, source }) if !self.fail_on_parse_error => {
                    warn!("Skipping {}: {}", path.display(), source);
                }
                Err(e) => return Err(e),
            }
        }
        result.sort();

        info!("Analysis complete: {}", result.summary());
        Ok(result)
    }

    fn analyze_files(&self, files: &[PathBuf]) -> Vec<Result<Vec<Violation>, AnalyzerError>> {
        files
            .par_iter()
            .map(|path| -> Result<Vec<Violation>, AnalyzerError> {
                debug!("Analyzing: {}", path.display());
                let content = std::fs::read_to_string(path)?;
                self.analyze_source(&FileContext::new(path, &content, &self.root))
            })
            .collect()
    }

    /// Tokenizes `ctx.content` and runs every enabled rule over it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the source fails to tokenize.
    pub fn analyze_source(&self, ctx: &FileContext) -> Result<Vec<Violation>, AnalyzerError> {
        let tokens = self
            .tokenizer
            .tokenize(ctx.content)
            .map_err(|source| AnalyzerError::Parse {
                path: ctx.path.to_path_buf(),
                source,
            })?;

        let active: Vec<&RuleBox> = self
            .rules
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        let mut violations = Vec::new();
        for (position, token) in tokens.tokens().iter().enumerate() {
            let watching = active
                .iter()
                .filter(|rule| rule.watched_tokens().contains(&token.kind));
            for rule in watching {
                trace!("{} at token {}", rule.name(), position);
                violations.extend(rule.process(ctx, &tokens, position));
            }
        }
        Ok(violations)
    }

    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let respect_gitignore = self.config.analyzer.respect_gitignore;
        let walker = ignore::WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(respect_gitignore)
            .git_exclude(respect_gitignore)
            .require_git(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.tokenizer.handles(path) {
                continue;
            }
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if self.filter.accepts(relative) {
                files.push(path.to_path_buf());
            } else {
                debug!("Excluding: {}", relative.display());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{Token, TokenBuffer, TokenKind};
    use std::fs;

    /// Splits on whitespace; every word is an identifier.
    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        fn language_id(&self) -> &'static str {
            "words"
        }
        fn extensions(&self) -> &'static [&'static str] {
            &[".txt"]
        }
        fn tokenize(&self, source: &str) -> Result<TokenBuffer, TokenizeError> {
            Ok(TokenBuffer::new(
                source
                    .split_whitespace()
                    .map(|w| Token::new(TokenKind::Identifier, w))
                    .collect(),
            ))
        }
    }

    fn filter(excludes: &[&str], includes: &[&str]) -> PathFilter {
        PathFilter::new(
            DEFAULT_EXCLUDES
                .iter()
                .chain(excludes)
                .map(|p| (*p).to_string()),
            includes.iter().map(|p| (*p).to_string()),
        )
        .unwrap()
    }

    #[test]
    fn builder_requires_tokenizer() {
        assert!(matches!(
            Analyzer::builder().root(".").build(),
            Err(AnalyzerError::MissingTokenizer)
        ));
    }

    #[test]
    fn builder_resolves_relative_root() {
        let analyzer = Analyzer::builder()
            .root(".")
            .tokenizer(WordTokenizer)
            .build()
            .unwrap();
        assert!(analyzer.root().is_absolute());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn builder_rejects_bad_glob() {
        let err = Analyzer::builder()
            .tokenizer(WordTokenizer)
            .include("src/[")
            .build();
        assert!(matches!(err, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn default_excludes_always_apply() {
        let f = filter(&["**/cache/**"], &[]);
        assert!(f.excluded(Path::new("vendor/a.txt")));
        assert!(f.excluded(Path::new("lib/node_modules/a.txt")));
        assert!(f.excluded(Path::new("var/cache/b.txt")));
        assert!(!f.excluded(Path::new("src/c.txt")));
        assert!(!f.excluded(Path::new("src/vendored.txt")));
    }

    #[test]
    fn includes_narrow_the_set() {
        let f = filter(&[], &["src/**"]);
        assert!(f.accepts(Path::new("src/a.txt")));
        assert!(!f.accepts(Path::new("b.txt")));
        assert!(!f.accepts(Path::new("src/vendor/a.txt")));
    }

    #[test]
    fn discovers_only_handled_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one two").unwrap();
        fs::write(dir.path().join("b.md"), "three").unwrap();
        fs::create_dir(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor/c.txt"), "four").unwrap();

        let analyzer = Analyzer::builder()
            .root(dir.path())
            .tokenizer(WordTokenizer)
            .build()
            .unwrap();
        assert_eq!(analyzer.analyze().unwrap().files_checked, 1);
    }

    #[test]
    fn include_patterns_filter_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.txt"), "x").unwrap();
        fs::write(dir.path().join("b.txt"), "y").unwrap();

        let analyzer = Analyzer::builder()
            .root(dir.path())
            .tokenizer(WordTokenizer)
            .include("src/**")
            .build()
            .unwrap();
        assert_eq!(analyzer.analyze().unwrap().files_checked, 1);
    }

    #[test]
    fn bounded_parallelism() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("{i}.txt")), "w").unwrap();
        }
        let mut config = Config::default();
        config.analyzer.parallelism = Some(2);

        let analyzer = Analyzer::builder()
            .root(dir.path())
            .tokenizer(WordTokenizer)
            .config(config)
            .build()
            .unwrap();
        assert_eq!(analyzer.analyze().unwrap().files_checked, 5);
    }
}
