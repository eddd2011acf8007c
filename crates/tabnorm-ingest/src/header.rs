//! Header row detection.
//!
//! The detector runs an ordered chain of [`HeaderRule`]s over the first
//! `header_scan_rows` non-blank records of a file. The first rule that
//! returns a row wins. If none does, row 0 is used with low confidence.

use std::sync::LazyLock;

use regex::Regex;

use tabnorm_model::{AnalysisConfig, HeaderDetection, HeaderRuleKind};

/// Leading `YYYY`, `YYYYMM`, `YYYY-MM` or `YYYYMmm` of a data cell.
static PERIOD_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}[M-]?[0-9]{2}").expect("Invalid period prefix regex")
});

/// Whole-cell `YYYY`, `YYYY-MM` or `YYYYMmm` token.
static PERIOD_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{4}M[0-9]{2}|[0-9]{4}-[0-9]{2}|[0-9]{4})$")
        .expect("Invalid period token regex")
});

/// Cells made only of digits and number punctuation.
static NUMBER_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.,\- ]+$").expect("Invalid number chars regex"));

/// Header pairs that identify known layouts without keyword counting.
const FIXED_HEADER_PAIRS: &[(&str, &str)] = &[
    ("sectors", "sub-sectors-level1"),
    ("observation date", "observation value"),
];

/// Cells examined for fixed header pairs.
const FIXED_PAIR_CELLS: usize = 10;

/// Cells examined by the wide-shape rule.
const WIDE_SHAPE_CELLS: usize = 5;

/// The scan window handed to every rule.
#[derive(Debug, Clone, Copy)]
pub struct HeaderProbe<'a> {
    rows: &'a [Vec<String>],
    config: &'a AnalysisConfig,
}

impl<'a> HeaderProbe<'a> {
    /// Limits `records` to the configured scan window.
    pub fn new(records: &'a [Vec<String>], config: &'a AnalysisConfig) -> Self {
        let limit = records.len().min(config.header_scan_rows);
        Self {
            rows: &records[..limit],
            config,
        }
    }

    pub fn rows(&self) -> &'a [Vec<String>] {
        self.rows
    }

    pub fn config(&self) -> &'a AnalysisConfig {
        self.config
    }

    fn row(&self, index: usize) -> Option<&'a [String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Share of non-null cells in row `index` that are not numbers.
    ///
    /// Returns `None` for rows without any non-null cell.
    pub fn string_ratio(&self, index: usize) -> Option<f64> {
        let row = self.row(index)?;
        let mut non_null = 0usize;
        let mut string_like = 0usize;
        for cell in row.iter().filter(|cell| !self.config.is_na(cell)) {
            non_null += 1;
            if cell.trim().parse::<f64>().is_err() {
                string_like += 1;
            }
        }
        (non_null > 0).then(|| string_like as f64 / non_null as f64)
    }
}

/// A single header detection heuristic.
pub trait HeaderRule: Send + Sync {
    /// Rule identifier recorded on the detection result.
    fn kind(&self) -> HeaderRuleKind;

    /// Returns the header row this rule accepts, if any.
    fn find(&self, probe: &HeaderProbe<'_>) -> Option<usize>;
}

/// Two or more header keywords (or a known header pair) followed by a row
/// that starts with a number or a period.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordRule;

impl KeywordRule {
    fn is_keyword_line(row: &[String], keywords: &[String]) -> bool {
        let line = row.join(",").to_lowercase();
        let hits = keywords
            .iter()
            .filter(|keyword| line.contains(keyword.as_str()))
            .count();
        if hits >= 2 {
            return true;
        }

        let cells: Vec<String> = row
            .iter()
            .take(FIXED_PAIR_CELLS)
            .map(|cell| cell.trim_matches(|c| c == '"' || c == ' ').to_lowercase())
            .collect();
        FIXED_HEADER_PAIRS.iter().any(|(left, right)| {
            cells.iter().any(|cell| cell == left) && cells.iter().any(|cell| cell == right)
        })
    }

    fn starts_with_data(row: &[String]) -> bool {
        let Some(first) = row.first() else {
            return false;
        };
        let first = first.trim_matches(|c| c == '"' || c == ' ');
        is_plain_decimal(first) || PERIOD_PREFIX_REGEX.is_match(first)
    }
}

impl HeaderRule for KeywordRule {
    fn kind(&self) -> HeaderRuleKind {
        HeaderRuleKind::Keyword
    }

    fn find(&self, probe: &HeaderProbe<'_>) -> Option<usize> {
        let keywords = &probe.config().header_keywords;
        probe.rows().windows(2).position(|pair| {
            Self::is_keyword_line(&pair[0], keywords) && Self::starts_with_data(&pair[1])
        })
    }
}

/// A period label followed by a text cell, under a row with an empty second
/// cell. Finds a wide block that starts partway through a file.
#[derive(Debug, Default, Clone, Copy)]
pub struct WideShapeRule;

impl HeaderRule for WideShapeRule {
    fn kind(&self) -> HeaderRuleKind {
        HeaderRuleKind::WideShape
    }

    fn find(&self, probe: &HeaderProbe<'_>) -> Option<usize> {
        let rows = probe.rows();
        (0..rows.len()).find(|&index| {
            let cells: Vec<&str> = rows[index]
                .iter()
                .take(WIDE_SHAPE_CELLS)
                .map(|cell| cell.trim_matches(|c| c == '"' || c == ' '))
                .collect();
            let (Some(first), Some(second)) = (cells.first(), cells.get(1)) else {
                return false;
            };
            if !PERIOD_TOKEN_REGEX.is_match(first)
                || second.is_empty()
                || NUMBER_CHARS_REGEX.is_match(second)
            {
                return false;
            }
            match index.checked_sub(1).map(|prev| &rows[prev]) {
                None => true,
                Some(previous) => previous.get(1).is_none_or(|cell| cell.trim().is_empty()),
            }
        })
    }
}

/// A mostly-text row followed by a mostly-numeric row.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringRatioRule;

impl HeaderRule for StringRatioRule {
    fn kind(&self) -> HeaderRuleKind {
        HeaderRuleKind::StringRatio
    }

    fn find(&self, probe: &HeaderProbe<'_>) -> Option<usize> {
        let threshold = probe.config().header_min_string_ratio;
        (0..probe.rows().len()).find(|&index| {
            let Some(ratio) = probe.string_ratio(index) else {
                return false;
            };
            if ratio < threshold {
                return false;
            }
            probe
                .string_ratio(index + 1)
                .is_some_and(|next| next < threshold)
        })
    }
}

/// The row with the highest string ratio, if it reaches the threshold.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxStringRatioRule;

impl HeaderRule for MaxStringRatioRule {
    fn kind(&self) -> HeaderRuleKind {
        HeaderRuleKind::MaxStringRatio
    }

    fn find(&self, probe: &HeaderProbe<'_>) -> Option<usize> {
        let threshold = probe.config().header_min_string_ratio;
        let mut best: Option<(usize, f64)> = None;
        for index in 0..probe.rows().len() {
            let Some(ratio) = probe.string_ratio(index) else {
                continue;
            };
            // Earliest row wins ties.
            if best.is_none_or(|(_, top)| ratio > top) {
                best = Some((index, ratio));
            }
        }
        best.filter(|&(_, ratio)| ratio >= threshold)
            .map(|(index, _)| index)
    }
}

/// Ordered chain of header rules.
pub struct HeaderDetector {
    rules: Vec<Box<dyn HeaderRule>>,
}

impl HeaderDetector {
    /// Builds a detector from an explicit rule order.
    pub fn with_rules(rules: Vec<Box<dyn HeaderRule>>) -> Self {
        Self { rules }
    }

    /// Keyword, wide-shape, string-ratio, then max string ratio.
    pub fn standard() -> Self {
        Self::with_rules(vec![
            Box::new(KeywordRule),
            Box::new(WideShapeRule),
            Box::new(StringRatioRule),
            Box::new(MaxStringRatioRule),
        ])
    }

    pub fn rule_kinds(&self) -> Vec<HeaderRuleKind> {
        self.rules.iter().map(|rule| rule.kind()).collect()
    }

    /// Finds the header row among `records` (blank records already removed).
    pub fn detect(&self, records: &[Vec<String>], config: &AnalysisConfig) -> HeaderDetection {
        let probe = HeaderProbe::new(records, config);
        if probe.rows().is_empty() {
            return HeaderDetection::fallback();
        }
        for rule in &self.rules {
            if let Some(row) = rule.find(&probe) {
                tracing::debug!(row, rule = %rule.kind(), "header row detected");
                return HeaderDetection::new(row, rule.kind());
            }
        }
        tracing::debug!("no header rule matched, using row 0");
        HeaderDetection::fallback()
    }
}

impl Default for HeaderDetector {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for HeaderDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderDetector")
            .field("rules", &self.rule_kinds())
            .finish()
    }
}

/// Runs the standard rule chain.
pub fn detect_header_row(records: &[Vec<String>], config: &AnalysisConfig) -> HeaderDetection {
    HeaderDetector::standard().detect(records, config)
}

/// Digits with at most one decimal point.
fn is_plain_decimal(value: &str) -> bool {
    let digits = value.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
