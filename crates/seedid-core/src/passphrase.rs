//! Passphrase canonicalization and strength advisory
//!
//! Every master-key derivation starts from [`normalize`]. The same rules must
//! hold on every platform, otherwise the same words typed on two devices would
//! open two different identities.
//!
//! # Strength Levels
//!
//! | Level     | Bits    | Meaning                                         |
//! |-----------|---------|-------------------------------------------------|
//! | Dangerous | < 28    | Trivially brute-forceable                       |
//! | Weak      | 28–59   | Falls to an offline attack on a single GPU rig  |
//! | Fair      | 60–89   | Below the recommendation for a permanent root   |
//! | Strong    | 90–127  | About seven Diceware words or more              |
//! | Excellent | ≥ 128   | Beyond brute-force for the foreseeable future   |
//!
//! The passphrase is the only secret and there is no reset, so the bar sits
//! higher than for an ordinary encryption password. The analysis is a
//! warning, never a gate.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::error::ValidationError;

/// Minimum recommended entropy for a SeedID passphrase (bits)
pub const RECOMMENDED_ENTROPY_BITS: f64 = 90.0;

/// Entropy contributed by one word drawn uniformly from a 7776-word
/// Diceware list (log2 7776).
pub const DICEWARE_BITS_PER_WORD: f64 = 12.925;

/// Canonicalize passphrase text: NFKD, lowercase, trim ASCII whitespace.
///
/// ```
/// use seedid_core::passphrase::normalize;
/// assert_eq!(normalize("  Hello WORLD  ").unwrap(), "hello world");
/// assert_eq!(normalize("\u{00C0} la carte").unwrap(), "a\u{0300} la carte");
/// ```
pub fn normalize(text: &str) -> Result<String, ValidationError> {
    let decomposed: String = text.nfkd().collect();
    let lowered = decomposed.to_lowercase();
    let trimmed = lowered.trim_matches(|c: char| c.is_ascii_whitespace());

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPassphrase);
    }

    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PassphraseStrength {
    Dangerous,
    Weak,
    Fair,
    Strong,
    Excellent,
}

impl PassphraseStrength {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Dangerous => "Dangerous: trivially crackable, anyone could rebuild these keys",
            Self::Weak => "Weak: an offline attacker can recover the identity",
            Self::Fair => "Fair: add more words before using this as a permanent identity",
            Self::Strong => "Strong: meets the recommendation for a permanent identity",
            Self::Excellent => "Excellent: beyond brute-force for the foreseeable future",
        }
    }

    fn from_bits(bits: f64) -> Self {
        if bits < 28.0 {
            Self::Dangerous
        } else if bits < 60.0 {
            Self::Weak
        } else if bits < RECOMMENDED_ENTROPY_BITS {
            Self::Fair
        } else if bits < 128.0 {
            Self::Strong
        } else {
            Self::Excellent
        }
    }
}

#[derive(Debug, Clone)]
pub struct PassphraseAnalysis {
    /// Estimated entropy in bits
    pub entropy_bits: f64,
    /// Whitespace-separated words in the normalized passphrase
    pub word_count: usize,
    pub strength: PassphraseStrength,
    /// Specific warnings (empty if no issues)
    pub warnings: Vec<String>,
    pub meets_recommendation: bool,
}

/// Words that show up in every cracking dictionary
const COMMON_WORDS: &[&str] = &[
    "password",
    "123456",
    "qwerty",
    "letmein",
    "iloveyou",
    "bitcoin",
    "satoshi",
    "ethereum",
    "solana",
    "wallet",
    "seed",
    "crypto",
    "correct horse battery staple",
];

/// Estimate the entropy of a passphrase.
///
/// Multi-word passphrases are scored as Diceware draws; anything else falls
/// back to character-class analysis. Both paths take the normalized form, so
/// case and Unicode composition earn nothing.
pub fn assess_passphrase(text: &str) -> PassphraseAnalysis {
    let normalized = match normalize(text) {
        Ok(n) => n,
        Err(_) => {
            return PassphraseAnalysis {
                entropy_bits: 0.0,
                word_count: 0,
                strength: PassphraseStrength::Dangerous,
                warnings: vec!["Passphrase is empty".to_string()],
                meets_recommendation: false,
            }
        }
    };

    let mut warnings = Vec::new();

    let has_common_word = COMMON_WORDS.iter().any(|&w| normalized.contains(w));
    if has_common_word {
        warnings.push("Contains a well-known word or phrase".to_string());
    }

    let words: Vec<&str> = normalized.split_whitespace().collect();
    let word_count = words.len();
    let is_word_list =
        word_count >= 2 && words.iter().all(|w| w.chars().all(char::is_alphabetic));

    let mut entropy = if is_word_list {
        let unique: HashSet<&str> = words.iter().copied().collect();
        if unique.len() < word_count {
            warnings.push("Repeated words add no entropy".to_string());
        }
        unique.len() as f64 * DICEWARE_BITS_PER_WORD
    } else {
        character_entropy(&normalized, &mut warnings)
    };

    if has_common_word {
        entropy *= 0.5;
    }

    if is_word_list && word_count < 7 {
        warnings.push(format!(
            "Only {} words; 7 or more Diceware words are recommended",
            word_count
        ));
    }

    let strength = PassphraseStrength::from_bits(entropy);

    PassphraseAnalysis {
        entropy_bits: entropy,
        word_count,
        strength,
        warnings,
        meets_recommendation: strength >= PassphraseStrength::Strong,
    }
}

fn character_entropy(normalized: &str, warnings: &mut Vec<String>) -> f64 {
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_symbol = false;
    let mut has_other = false;

    for ch in normalized.chars() {
        if ch.is_ascii_lowercase() {
            has_lower = true;
        } else if ch.is_ascii_digit() {
            has_digit = true;
        } else if ch.is_ascii_punctuation() || ch == ' ' {
            has_symbol = true;
        } else {
            has_other = true;
        }
    }

    // Uppercase is gone after normalization, so it never widens the charset.
    let mut charset_size: f64 = 0.0;
    if has_lower {
        charset_size += 26.0;
    }
    if has_digit {
        charset_size += 10.0;
    }
    if has_symbol {
        charset_size += 33.0;
    }
    if has_other {
        charset_size += 100.0;
    }
    let charset_size = charset_size.max(2.0);

    let len = normalized.chars().count() as f64;
    let mut entropy = len * charset_size.log2();

    let unique_chars: HashSet<char> = normalized.chars().collect();
    let unique_ratio = unique_chars.len() as f64 / len;
    if unique_ratio < 0.5 {
        entropy -= (1.0 - unique_ratio) * entropy * 0.3;
        warnings.push("Too many repeated characters".to_string());
    }

    let sequential = count_sequential(normalized);
    if sequential > 2 {
        entropy -= sequential as f64 * 2.0;
        warnings.push("Contains sequential patterns".to_string());
    }

    if len < 20.0 {
        warnings.push("Passphrase is short; prefer several random words".to_string());
    }

    entropy.max(0.0)
}

/// Count ascending or descending runs of three code points (abc, 321, ...)
fn count_sequential(text: &str) -> usize {
    let chars: Vec<u32> = text.chars().map(|c| c as u32).collect();
    chars
        .windows(3)
        .filter(|w| {
            let (a, b, c) = (w[0], w[1], w[2]);
            (b == a + 1 && c == b + 1) || (a > 1 && b == a - 1 && c == b - 1)
        })
        .count()
}
