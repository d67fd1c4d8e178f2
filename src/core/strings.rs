use regex::{Captures, Regex};
use std::sync::LazyLock;

static HYPHEN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([A-Za-z0-9_])").expect("hyphen pattern is valid"));

/// `-` 轉駝峰：`margin-left` -> `marginLeft`
pub fn camelize(input: &str) -> String {
    HYPHEN_WORD
        .replace_all(input, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("margin-left"), "marginLeft");
        assert_eq!(camelize("border-top-left-radius"), "borderTopLeftRadius");
        assert_eq!(camelize("width"), "width");
        assert_eq!(camelize(""), "");
    }

    #[test]
    fn test_camelize_edge_cases() {
        assert_eq!(camelize("a--b"), "a-B");
        assert_eq!(camelize("trailing-"), "trailing-");
        assert_eq!(camelize("-webkit-box"), "WebkitBox");
        assert_eq!(camelize("item-2"), "item2");
        assert_eq!(camelize("snake-_case"), "snake_case");
    }
}
