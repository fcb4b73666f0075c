//! Marker pattern tables and evidence scanning
//!
//! Evidence text is split into clauses. Each clause is scanned against
//! ordered pattern tables: native (inheritance) markers first, whose spans
//! are then masked so that e.g. the "soome" inside "soome-ugri" is never
//! read as Finnish; then comparison markers, which cut the clause into a
//! main part and a comparison tail; then borrowing markers and donor
//! language names in the main part. Only a cognate listing in the tail
//! counts as an inheritance signal. All patterns are compiled once.

use etymtag_domain::origin::LANGUAGE_ALIASES;
use etymtag_domain::{classify_language, Language};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// A compiled marker: regex + name reported in rationales
struct MarkerPattern {
    name: &'static str,
    regex: Regex,
}

/// (name, regex) pairs per marker kind, in priority order
const NATIVE_PATTERNS: &[(&str, &str)] = &[
    ("proto-finnic", r"(?i)\b(?:from\s+)?proto-?(?:finnic|uralic|finno-?ugric|samic)\b"),
    ("finno-ugric", r"(?i)\b(?:finno|fenno)[- ]?ugric\b"),
    ("uralic", r"(?i)\buralic\b"),
    ("inherited", r"(?i)\binherited\b|\bnative\s+(?:\p{L}+\s+)?(?:word|vocabulary|stem)\b"),
    ("soome-ugri", r"(?i)\bsoome-?ugri\w*"),
    ("läänemeresoome", r"(?i)\bläänemeresoome\w*"),
    ("algsoome", r"(?i)\b(?:ürg|alg)(?:soome|eesti|uurali)\w*"),
    ("uurali", r"(?i)\buurali\w*"),
    ("omakeelne", r"(?i)\b(?:omakeelne|algupärane|päris-?eesti\w*|tüvisõna)\b"),
];

const BORROWING_PATTERNS: &[(&str, &str)] = &[
    ("borrowed", r"(?i)\bborrow(?:ed|ing|ings)?\b"),
    ("loanword", r"(?i)\bloan(?:word)?s?\b"),
    ("laen", r"(?i)\blaen\w*"),
    ("keelest", r"(?i)\bkeelest\b"),
];

/// Name of the comparison pattern that lists cognates
const COGNATE: &str = "cognate";

/// Replaces native marker spans so later patterns cannot match inside them
const MASK: char = '\u{1}';

const COMPARISON_PATTERNS: &[(&str, &str)] = &[
    ("compare", r"(?i)\b(?:cf|compare|comp|vrd|vt)\b"),
    ("cognate", r"(?i)\bcognates?\b|\brelated\s+to\b|\bakin\s+to\b|\bsugulas\w*"),
];

/// Finnic and Uralic relatives; naming one in a comparison is an
/// inheritance signal, not a borrowing
const KIN_LANGUAGES: &str = r"(?i)\b(?:finnish|estonian|karelian|votic|vepsian|livonian|ingrian|sami|saami|mari|mordvin\w*|erzya|moksha|komi|udmurt|hungarian|mansi|khanty|soome|eesti|karjala|vadja|vepsa|liivi|isuri|ungari)\b";

/// Dictionary abbreviations whose trailing dot must not end a clause
const ABBREVIATIONS: &str = r"(?i)\b(cf|vrd|vt|comp|sks|alamsks|rts|vn|lad|ingl|prants|vm|jt|nt)\.";

static NATIVE: LazyLock<Vec<MarkerPattern>> = LazyLock::new(|| compile(NATIVE_PATTERNS));
static BORROWING: LazyLock<Vec<MarkerPattern>> = LazyLock::new(|| compile(BORROWING_PATTERNS));
static COMPARISON: LazyLock<Vec<MarkerPattern>> = LazyLock::new(|| compile(COMPARISON_PATTERNS));

static KIN: LazyLock<Regex> = LazyLock::new(|| compile_one(KIN_LANGUAGES));
static ABBREVIATION_DOT: LazyLock<Regex> = LazyLock::new(|| compile_one(ABBREVIATIONS));
static CLAUSE_BREAK: LazyLock<Regex> = LazyLock::new(|| compile_one(r"[;\n]|[.!?]\s+"));

/// Any taxonomy alias, longest first so "low german" wins over "german"
static LANGUAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let mut aliases: Vec<&str> = LANGUAGE_ALIASES.iter().map(|(alias, _)| *alias).collect();
    aliases.sort_by_key(|alias| std::cmp::Reverse(alias.len()));
    let alternation = aliases
        .iter()
        .map(|alias| regex::escape(alias).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    compile_one(&format!(r"(?i)\b(?:{})\b", alternation))
});

/// "from <Name>" with up to three capitalized words
static FROM_NAME: LazyLock<Regex> = LazyLock::new(|| {
    compile_one(r"\b[Ff]rom\s+(?:the\s+)?(\p{Lu}[\p{L}-]*(?:\s+\p{Lu}[\p{L}-]*){0,2})")
});

/// "<name> keelest" ("from the <name> language")
static KEELEST_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile_one(r"(?i)\b([\p{L}-]+)\s+keelest\b"));

fn compile(patterns: &[(&'static str, &str)]) -> Vec<MarkerPattern> {
    patterns
        .iter()
        .map(|(name, pattern)| MarkerPattern {
            name,
            regex: compile_one(pattern),
        })
        .collect()
}

fn compile_one(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Failed to compile regex '{}': {}", pattern, e))
}

/// Everything the scanner found in one piece of evidence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    /// The evidence text was empty or blank
    pub empty: bool,

    /// Names of native markers found (including kin-language comparisons)
    pub native_markers: Vec<String>,

    /// Names of borrowing markers found
    pub borrowing_markers: Vec<String>,

    /// Donor languages tied to an explicit borrowing marker
    pub explicit_donors: BTreeSet<Language>,

    /// Donor languages mentioned without any borrowing marker
    pub implied_donors: BTreeSet<Language>,

    /// Language names cited as a source that the taxonomy does not cover
    pub unmapped: Vec<String>,
}

impl Signals {
    /// Any native marker present
    pub fn has_native(&self) -> bool {
        !self.native_markers.is_empty()
    }

    /// Any borrowing marker present
    pub fn has_borrowing(&self) -> bool {
        !self.borrowing_markers.is_empty()
    }

    fn note(list: &mut Vec<String>, name: &str) {
        if !list.iter().any(|n| n == name) {
            list.push(name.to_string());
        }
    }
}

/// Scan evidence text for markers and donor languages
pub fn scan(text: &str) -> Signals {
    let mut signals = Signals::default();

    if text.trim().is_empty() {
        signals.empty = true;
        return signals;
    }

    let text = ABBREVIATION_DOT.replace_all(text, "$1");
    for clause in CLAUSE_BREAK.split(&text) {
        scan_clause(clause, &mut signals);
    }

    let explicit = signals.explicit_donors.clone();
    signals.implied_donors.retain(|lang| !explicit.contains(lang));
    signals
}

fn scan_clause(clause: &str, signals: &mut Signals) {
    let clause = mask_native(clause, signals);

    let cut = COMPARISON
        .iter()
        .filter_map(|p| p.regex.find(&clause))
        .map(|m| m.start())
        .min()
        .unwrap_or(clause.len());
    let (main, comparison) = clause.split_at(cut);

    let cognate_tail = COMPARISON
        .iter()
        .filter(|p| p.name == COGNATE)
        .find_map(|p| p.regex.find(comparison))
        .map(|m| &comparison[m.end()..]);
    if let Some(kin) = cognate_tail.and_then(|tail| KIN.find(tail)) {
        Signals::note(
            &mut signals.native_markers,
            &format!("cognate:{}", kin.as_str().to_lowercase()),
        );
    }

    let mut borrowing_here = false;
    for pattern in BORROWING.iter() {
        if pattern.regex.is_match(main) {
            Signals::note(&mut signals.borrowing_markers, pattern.name);
            borrowing_here = true;
        }
    }
    if arrow_marks_borrowing(main) {
        Signals::note(&mut signals.borrowing_markers, "arrow");
        borrowing_here = true;
    }

    for caps in FROM_NAME.captures_iter(main) {
        let name = &caps[1];
        match leading_language(name) {
            Some(lang) => {
                signals.explicit_donors.insert(lang);
            }
            None if KIN.is_match(name) => continue,
            None => Signals::note(&mut signals.unmapped, name.trim()),
        }
        Signals::note(&mut signals.borrowing_markers, "from");
        borrowing_here = true;
    }

    for caps in KEELEST_NAME.captures_iter(main) {
        let name = &caps[1];
        if classify_language(name).is_none() && !KIN.is_match(name) {
            Signals::note(&mut signals.unmapped, name);
        }
    }

    for found in LANGUAGE_NAME.find_iter(main) {
        if let Some(lang) = classify_language(found.as_str()) {
            if borrowing_here {
                signals.explicit_donors.insert(lang);
            } else {
                signals.implied_donors.insert(lang);
            }
        }
    }
}

/// A `<` counts as a borrowing arrow unless what it points at is a native
/// marker ("< ürgsoome *käüdäk" is an inheritance chain)
fn arrow_marks_borrowing(main: &str) -> bool {
    main.match_indices('<').any(|(at, _)| {
        let target = main[at + 1..].trim_start();
        !target.is_empty() && !target.starts_with(MASK)
    })
}

/// Record native markers and mask out their spans
fn mask_native(clause: &str, signals: &mut Signals) -> String {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for pattern in NATIVE.iter() {
        for m in pattern.regex.find_iter(clause) {
            Signals::note(&mut signals.native_markers, pattern.name);
            spans.push((m.start(), m.end()));
        }
    }

    if spans.is_empty() {
        return clause.to_string();
    }

    spans.sort_unstable();
    let mut masked = String::with_capacity(clause.len());
    let mut last = 0;
    for (start, end) in spans {
        if start < last {
            // Overlapping match; blank whatever extends past the previous span
            if end > last {
                masked.extend(std::iter::repeat(MASK).take(end - last));
                last = end;
            }
            continue;
        }
        masked.push_str(&clause[last..start]);
        masked.extend(std::iter::repeat(MASK).take(end - start));
        last = end;
    }
    masked.push_str(&clause[last..]);
    masked
}

/// Longest run of leading words (at most three) that names a language
fn leading_language(name: &str) -> Option<Language> {
    let words: Vec<&str> = name.split_whitespace().collect();
    (1..=words.len().min(3))
        .rev()
        .find_map(|n| classify_language(&words[..n].join(" ")))
}
