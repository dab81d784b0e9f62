//utils.rs
use deunicode::deunicode_with_tofu;
use rand::Rng;

pub const SENTIMENT_MIN: i32 = 70;
pub const SENTIMENT_MAX: i32 = 100;

/// Base slug budget; leaves room for a `-N` suffix in the 255-char column.
pub const MAX_SLUG_LEN: usize = 200;

/// URL-safe slug: ASCII transliteration, lowercase, `[a-z0-9]` words joined
/// by single hyphens, cut at a word boundary to at most [`MAX_SLUG_LEN`]
/// bytes. Names with nothing usable become `place`.
pub fn generate_slug(text: &str) -> String {
    let slug = deunicode_with_tofu(text, " ")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect::<String>();

    let mut capped = String::new();
    for word in slug
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|s| !s.is_empty())
    {
        if capped.is_empty() {
            // ASCII only at this point, so any byte index is a char boundary.
            capped.push_str(&word[..word.len().min(MAX_SLUG_LEN)]);
        } else if capped.len() + 1 + word.len() <= MAX_SLUG_LEN {
            capped.push('-');
            capped.push_str(word);
        } else {
            break;
        }
    }
    let slug = capped;

    if slug.is_empty() {
        "place".to_string()
    } else {
        slug
    }
}

// Stand-in for a sentiment classifier until a real one is wired in.
pub fn simulated_sentiment_score() -> i32 {
    rand::rng().random_range(SENTIMENT_MIN..=SENTIMENT_MAX)
}
