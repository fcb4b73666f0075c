//! Token input readers.
//!
//! Tokenization and lemmatization happen upstream. The usual input is the
//! lemmatizer's TSV output, one token per line: `surface<TAB>lemma<TAB>pos`.
//! Plain text is accepted as a fallback, with the lower-cased surface form
//! standing in for the lemma.

use crate::error::{CliError, Result};
use etymtag_domain::TokenInput;

/// Parse lemmatizer TSV output.
///
/// Blank lines and `#` comments are skipped. A missing lemma column falls
/// back to the lower-cased surface form; an empty or `_` pos is absent.
pub fn parse_tsv(content: &str) -> Result<Vec<TokenInput>> {
    let mut tokens = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t').map(str::trim);
        let surface = fields.next().unwrap_or_default();
        if surface.is_empty() {
            return Err(CliError::InvalidInput(format!(
                "line {}: empty surface form",
                index + 1
            )));
        }

        let lemma = match fields.next() {
            Some(lemma) if !lemma.is_empty() => lemma.to_string(),
            _ => surface.to_lowercase(),
        };
        let pos = fields
            .next()
            .filter(|pos| !pos.is_empty() && *pos != "_")
            .map(str::to_string);

        tokens.push(TokenInput::new(surface, lemma, pos));
    }

    Ok(tokens)
}

/// Split plain text into word tokens.
pub fn parse_plain(content: &str) -> Vec<TokenInput> {
    content
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|word| word.trim_matches('-'))
        .filter(|word| !word.is_empty())
        .map(|word| TokenInput::new(word, word.to_lowercase(), None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsv() {
        let content = "# sentence 1\nTere\ttere\tI\n\nlasteaias\tlasteaed\tS\nja\tja\t_\n";
        let tokens = parse_tsv(content).unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], TokenInput::new("Tere", "tere", Some("I".to_string())));
        assert_eq!(tokens[1].lemma, "lasteaed");
        assert_eq!(tokens[2].pos, None);
    }

    #[test]
    fn test_parse_tsv_without_lemma() {
        let tokens = parse_tsv("Peegel\n").unwrap();
        assert_eq!(tokens[0].surface, "Peegel");
        assert_eq!(tokens[0].lemma, "peegel");
        assert_eq!(tokens[0].pos, None);
    }

    #[test]
    fn test_parse_tsv_rejects_empty_surface() {
        let result = parse_tsv("\tlemma\tS\n");
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_plain() {
        let tokens = parse_plain("Tere, Mari! Lasteaed on Tallinna-lähedal.");
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(
            surfaces,
            vec!["Tere", "Mari", "Lasteaed", "on", "Tallinna-lähedal"]
        );
        assert_eq!(tokens[2].lemma, "lasteaed");
    }
}
