//! Core types for plan log summarization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

// ============================================================================
// Operations
// ============================================================================

/// The effect a planned change has on a resource.
///
/// The derived ordering is the output order of every summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCategory {
    /// Resource will be created
    Create,
    /// Resource must be destroyed and created again
    Replace,
    /// Resource will be updated in-place
    Update,
    /// Resource will be destroyed
    Destroy,
}

impl OperationCategory {
    /// All categories, in output order.
    pub const ALL: [Self; 4] = [Self::Create, Self::Replace, Self::Update, Self::Destroy];

    /// Name shown in summary lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Replace => "Replace",
            Self::Update => "In-place Update",
            Self::Destroy => "Destroy",
        }
    }

    /// Whether the operation removes an existing resource.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Replace | Self::Destroy)
    }

    /// Tone of the indent glyph on this category's detail lines.
    pub fn indent_tone(&self) -> Tone {
        match self {
            Self::Create => Tone::Positive,
            Self::Update => Tone::Caution,
            Self::Replace | Self::Destroy => Tone::Alert,
        }
    }
}

impl fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Input
// ============================================================================

/// One existing line of the displayed log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Display index already assigned by the log
    pub index: u64,
    /// Raw content, either plain text or rendered markup
    pub content: String,
}

impl LogLine {
    /// Create a new log line.
    pub fn new(index: u64, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
        }
    }
}

/// Totals stated by the plan's own summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    /// Resources to add
    pub to_add: u32,
    /// Resources to change in-place
    pub to_change: u32,
    /// Resources to destroy
    pub to_destroy: u32,
}

impl DeclarationRecord {
    /// Create a declaration from its three totals.
    pub fn new(to_add: u32, to_change: u32, to_destroy: u32) -> Self {
        Self {
            to_add,
            to_change,
            to_destroy,
        }
    }

    /// The declared totals as buckets.
    pub fn buckets(&self) -> Buckets {
        Buckets {
            add: u64::from(self.to_add),
            change: u64::from(self.to_change),
            destroy: u64::from(self.to_destroy),
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Which marker set a log is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Pick markup when the log contains rendered spans, plain otherwise
    #[default]
    Auto,
    /// Rendered job log markup (GitLab spans)
    Markup,
    /// Terminal text as printed by `terraform plan`
    Plain,
}

impl Dialect {
    /// Resolve `Auto` against the lines about to be classified.
    pub fn resolve(self, lines: &[LogLine]) -> Self {
        match self {
            Self::Auto if lines.iter().any(|l| l.content.contains("<span")) => Self::Markup,
            Self::Auto => Self::Plain,
            other => other,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Markup => write!(f, "markup"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// What to do when a log holds more than one declaration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationPolicy {
    /// Later declarations replace earlier ones
    #[default]
    Last,
    /// Keep the first declaration, ignore the rest
    First,
    /// Refuse to summarize
    Reject,
}

impl fmt::Display for DeclarationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Last => write!(f, "last"),
            Self::First => write!(f, "first"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Original log lines grouped by operation category.
///
/// Every category is always present, possibly with an empty list, and each
/// list keeps the original log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationIndex {
    dialect: Dialect,
    entries: BTreeMap<OperationCategory, Vec<LogLine>>,
}

impl ClassificationIndex {
    /// Create an empty index for a resolved dialect.
    pub fn new(dialect: Dialect) -> Self {
        let entries = OperationCategory::ALL
            .into_iter()
            .map(|c| (c, Vec::new()))
            .collect();
        Self { dialect, entries }
    }

    /// Dialect the lines were matched with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Record a line under a category.
    pub fn push(&mut self, category: OperationCategory, line: LogLine) {
        self.entries.entry(category).or_default().push(line);
    }

    /// Lines classified under a category.
    pub fn lines(&self, category: OperationCategory) -> &[LogLine] {
        self.entries.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of lines classified under a category.
    pub fn count(&self, category: OperationCategory) -> usize {
        self.lines(category).len()
    }

    /// Total number of classified lines.
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Per-category counts.
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            create: self.count(OperationCategory::Create),
            replace: self.count(OperationCategory::Replace),
            update: self.count(OperationCategory::Update),
            destroy: self.count(OperationCategory::Destroy),
        }
    }

    /// Iterate categories in output order with their lines.
    pub fn iter(&self) -> impl Iterator<Item = (OperationCategory, &[LogLine])> {
        OperationCategory::ALL
            .into_iter()
            .map(move |c| (c, self.lines(c)))
    }
}

/// Output of the classifier for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The winning declaration, if any line declared totals
    pub declaration: Option<DeclarationRecord>,
    /// Operation lines by category
    pub index: ClassificationIndex,
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Number of classified lines per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Lines marked for creation
    pub create: usize,
    /// Lines marked for replacement
    pub replace: usize,
    /// Lines marked for in-place update
    pub update: usize,
    /// Lines marked for destruction
    pub destroy: usize,
}

impl CategoryCounts {
    /// Count for a single category.
    pub fn get(&self, category: OperationCategory) -> usize {
        match category {
            OperationCategory::Create => self.create,
            OperationCategory::Replace => self.replace,
            OperationCategory::Update => self.update,
            OperationCategory::Destroy => self.destroy,
        }
    }
}

/// One of the three totals a plan declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// `to add`: creates plus replaces
    Add,
    /// `to change`: in-place updates
    Change,
    /// `to destroy`: replaces plus destroys
    Destroy,
}

impl Bucket {
    /// All buckets, in comparison order.
    pub const ALL: [Self; 3] = [Self::Add, Self::Change, Self::Destroy];
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Change => write!(f, "change"),
            Self::Destroy => write!(f, "destroy"),
        }
    }
}

/// Values for all three buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buckets {
    /// Add total
    pub add: u64,
    /// Change total
    pub change: u64,
    /// Destroy total
    pub destroy: u64,
}

impl Buckets {
    /// Value of a single bucket.
    pub fn get(&self, bucket: Bucket) -> u64 {
        match bucket {
            Bucket::Add => self.add,
            Bucket::Change => self.change,
            Bucket::Destroy => self.destroy,
        }
    }
}

/// Verdict of comparing classified lines against the declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconciliationResult {
    /// Every bucket matched the declaration
    Validated {
        /// Lines per category
        counts: CategoryCounts,
    },
    /// A bucket disagreed with the declaration
    Mismatch {
        /// First bucket found to disagree
        bucket: Bucket,
        /// Totals stated by the declaration
        expected: Buckets,
        /// Totals derived from classified lines
        actual: Buckets,
    },
}

impl ReconciliationResult {
    /// Whether the classified lines agree with the declaration.
    pub fn is_validated(&self) -> bool {
        matches!(self, Self::Validated { .. })
    }
}

// ============================================================================
// Output
// ============================================================================

/// Semantic color of a synthesized line or glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Non-destructive information
    Positive,
    /// Feature header
    Info,
    /// Changes that keep the resource
    Caution,
    /// Destructive changes and mismatches
    Alert,
    /// Uncolored text
    Plain,
}

impl Tone {
    /// Terminal color name used by the job log's `term-fg-*` classes.
    pub fn color_name(&self) -> Option<&'static str> {
        match self {
            Self::Positive => Some("green"),
            Self::Info => Some("cyan"),
            Self::Caution => Some("yellow"),
            Self::Alert => Some("red"),
            Self::Plain => None,
        }
    }
}

/// Leading glyph of a detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    /// Glyph drawn before the text
    pub glyph: char,
    /// Color of the glyph
    pub tone: Tone,
}

/// A derived display line appended after the original log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedLine {
    /// Display index continuing the log's numbering
    pub index: u64,
    /// Color of the text
    pub tone: Tone,
    /// Optional leading glyph
    pub indent: Option<Indent>,
    /// Text content, free of any markup
    pub text: String,
    /// Whether a separator follows the text
    pub trailing_separator: bool,
}

/// Serializable report of one summarization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Totals declared by the plan
    pub declaration: DeclarationRecord,
    /// Outcome of the count check
    pub reconciliation: ReconciliationResult,
    /// Resource identifiers per category
    pub resources: BTreeMap<OperationCategory, Vec<String>>,
}

// ============================================================================
// Readiness
// ============================================================================

/// Polling configuration for the readiness wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessConfig {
    /// Delay between two probe attempts
    pub interval: Duration,
    /// Maximum number of probe attempts
    pub max_retry: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_retry: 30,
        }
    }
}

impl ReadinessConfig {
    /// Create a new readiness config.
    pub fn new(interval: Duration, max_retry: u32) -> Self {
        Self {
            interval,
            max_retry,
        }
    }

    /// Longest time the wait can sleep before giving up.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_retry.saturating_sub(1)
    }
}
