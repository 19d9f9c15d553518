//! Utility functions for pulling identifiers out of Antimony text blocks

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_IDENTIFIER: Regex = Regex::new(r"^\w+").unwrap();
}

/// Leading `\w+` identifier of a line, if any
///
/// Comment lines (`// ...`) and blank lines have no leading identifier.
pub(crate) fn leading_identifier(line: &str) -> Option<&str> {
    LEADING_IDENTIFIER
        .find(line.trim_start())
        .map(|m| m.as_str())
}

/// Leading identifiers of every non-blank, non-comment line in a block
pub(crate) fn block_identifiers(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .filter_map(|line| leading_identifier(line).map(str::to_string))
        .collect()
}

/// Whether `word` occurs in `text` as a whole word
///
/// Matching is word-boundary aware so that e.g. `k1` does not match inside
/// `k10`.
pub(crate) fn contains_word(text: &str, word: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    // The escaped identifier is always a valid pattern
    let re = Regex::new(&pattern).unwrap();
    re.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_identifier_of_reaction_line() {
        assert_eq!(leading_identifier("R1: A => B; k1*A;"), Some("R1"));
        assert_eq!(leading_identifier("   TGFbR1: Smad2 => pSmad2;"), Some("TGFbR1"));
    }

    #[test]
    fn comments_and_blanks_have_no_identifier() {
        assert_eq!(leading_identifier("// MAPK module"), None);
        assert_eq!(leading_identifier(""), None);
        assert_eq!(leading_identifier("   "), None);
    }

    #[test]
    fn block_identifiers_skip_comments() {
        let block = "
            //TGFb module
            TGFbR1: Smad2 => pSmad2 ; k1*Smad2;
            TGFbR2: pSmad2 => Smad2 ; k2*pSmad2;
        ";
        assert_eq!(block_identifiers(block), vec!["TGFbR1", "TGFbR2"]);
    }

    #[test]
    fn word_containment_respects_boundaries() {
        let text = "R1: A => B; k10*A;";
        assert!(contains_word(text, "k10"));
        assert!(!contains_word(text, "k1"));
        assert!(contains_word("k1*A + k2*B", "k1"));
    }
}
