//! Origin taxonomy - the closed set of etymological labels
//!
//! Every resolved lemma carries exactly one [`OriginTag`]. The set of donor
//! languages is closed: recognizing a new language means adding a
//! [`Language`] variant and its aliases here, bumping [`TAXONOMY_VERSION`],
//! and nothing else.

use std::fmt;

/// Version of the tag set. Bumped whenever a language or tag is added.
pub const TAXONOMY_VERSION: u32 = 1;

/// Donor languages recognized by the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    /// German (standard, High and Baltic German)
    German,
    /// Swedish
    Swedish,
    /// Russian
    Russian,
    /// Low German (including Middle Low German and Low Saxon)
    LowGerman,
    /// Latin
    Latin,
    /// French
    French,
    /// English
    English,
    /// Finnish
    Finnish,
    /// Latvian
    Latvian,
    /// Lithuanian
    Lithuanian,
    /// Baltic (unspecified or proto-language)
    Baltic,
}

impl Language {
    /// Every language in the taxonomy, in declaration order
    pub const ALL: [Language; 11] = [
        Language::German,
        Language::Swedish,
        Language::Russian,
        Language::LowGerman,
        Language::Latin,
        Language::French,
        Language::English,
        Language::Finnish,
        Language::Latvian,
        Language::Lithuanian,
        Language::Baltic,
    ];

    /// Get the language key used inside `loan:<language>` tags
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::German => "german",
            Language::Swedish => "swedish",
            Language::Russian => "russian",
            Language::LowGerman => "low_german",
            Language::Latin => "latin",
            Language::French => "french",
            Language::English => "english",
            Language::Finnish => "finnish",
            Language::Latvian => "latvian",
            Language::Lithuanian => "lithuanian",
            Language::Baltic => "baltic",
        }
    }

    /// Parse a language key (the part after `loan:`)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.as_str() == s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical etymological origin label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginTag {
    /// Inherited Finnic / Finno-Ugric / Uralic vocabulary
    NativeFinnic,
    /// Borrowed from a single recognized donor language
    Loan(Language),
    /// Evidence names more than one plausible donor language
    LoanMultiple,
    /// No evidence, or evidence that could not be classified
    Unknown,
}

impl OriginTag {
    /// Get the canonical string form (`native_finnic`, `loan:german`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginTag::NativeFinnic => "native_finnic",
            OriginTag::Loan(Language::German) => "loan:german",
            OriginTag::Loan(Language::Swedish) => "loan:swedish",
            OriginTag::Loan(Language::Russian) => "loan:russian",
            OriginTag::Loan(Language::LowGerman) => "loan:low_german",
            OriginTag::Loan(Language::Latin) => "loan:latin",
            OriginTag::Loan(Language::French) => "loan:french",
            OriginTag::Loan(Language::English) => "loan:english",
            OriginTag::Loan(Language::Finnish) => "loan:finnish",
            OriginTag::Loan(Language::Latvian) => "loan:latvian",
            OriginTag::Loan(Language::Lithuanian) => "loan:lithuanian",
            OriginTag::Loan(Language::Baltic) => "loan:baltic",
            OriginTag::LoanMultiple => "loan:multiple",
            OriginTag::Unknown => "unknown",
        }
    }

    /// Parse a tag from its canonical string form
    ///
    /// Only the exact canonical strings are accepted; ad-hoc values such as
    /// `loan:gothic` are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "native_finnic" => Some(OriginTag::NativeFinnic),
            "loan:multiple" => Some(OriginTag::LoanMultiple),
            "unknown" => Some(OriginTag::Unknown),
            other => other
                .strip_prefix("loan:")
                .and_then(Language::parse)
                .map(OriginTag::Loan),
        }
    }
}

impl fmt::Display for OriginTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OriginTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid origin tag: {}", s))
    }
}

/// Recognized names, spelling variants and abbreviations per donor language.
///
/// Aliases are lower-case. English names appear as they do in dictionary
/// prose, Estonian ones as the uninflected stem used before `keelest`
/// ("from the ... language") plus the usual dictionary abbreviations.
pub const LANGUAGE_ALIASES: &[(&str, Language)] = &[
    ("middle low german", Language::LowGerman),
    ("low german", Language::LowGerman),
    ("low saxon", Language::LowGerman),
    ("keskalamsaksa", Language::LowGerman),
    ("alamsaksa", Language::LowGerman),
    ("madalsaksa", Language::LowGerman),
    ("alamsks", Language::LowGerman),
    ("baltic german", Language::German),
    ("middle high german", Language::German),
    ("high german", Language::German),
    ("german", Language::German),
    ("baltisaksa", Language::German),
    ("ülemsaksa", Language::German),
    ("saksa", Language::German),
    ("sks", Language::German),
    ("old swedish", Language::Swedish),
    ("swedish", Language::Swedish),
    ("vanarootsi", Language::Swedish),
    ("rootsi", Language::Swedish),
    ("rts", Language::Swedish),
    ("old russian", Language::Russian),
    ("russian", Language::Russian),
    ("vanavene", Language::Russian),
    ("vene", Language::Russian),
    ("vn", Language::Russian),
    ("medieval latin", Language::Latin),
    ("late latin", Language::Latin),
    ("latin", Language::Latin),
    ("keskladina", Language::Latin),
    ("ladina", Language::Latin),
    ("lad", Language::Latin),
    ("old french", Language::French),
    ("french", Language::French),
    ("prantsuse", Language::French),
    ("prants", Language::French),
    ("english", Language::English),
    ("inglise", Language::English),
    ("ingl", Language::English),
    ("finnish", Language::Finnish),
    ("soome", Language::Finnish),
    ("latvian", Language::Latvian),
    ("läti", Language::Latvian),
    ("lithuanian", Language::Lithuanian),
    ("leedu", Language::Lithuanian),
    ("proto-baltic", Language::Baltic),
    ("baltic", Language::Baltic),
    ("balti", Language::Baltic),
];

/// Map a donor-language name to its taxonomy language.
///
/// Matching is case-insensitive and whitespace-normalized but otherwise
/// exact against [`LANGUAGE_ALIASES`]. `None` means the name is *unmapped*:
/// evidence names a language the taxonomy does not cover, which callers
/// must keep distinct from having no evidence at all.
///
/// # Examples
///
/// ```
/// use etymtag_domain::{classify_language, Language};
///
/// assert_eq!(classify_language("Middle Low German"), Some(Language::LowGerman));
/// assert_eq!(classify_language("vene"), Some(Language::Russian));
/// assert_eq!(classify_language("Gothic"), None);
/// ```
pub fn classify_language(name: &str) -> Option<Language> {
    let key = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, lang)| *lang)
}
