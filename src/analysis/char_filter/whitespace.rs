use super::CharFilter;

/// Collapses whitespace runs into a single ASCII space and trims both ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceCharFilter;

impl WhitespaceCharFilter {
    pub fn new() -> Self {
        Self
    }
}

impl CharFilter for WhitespaceCharFilter {
    fn filter(&self, input: &str) -> String {
        input.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_and_trim() {
        let filter = WhitespaceCharFilter::new();
        assert_eq!(filter.filter("  java \t 工程师\n"), "java 工程师");
        assert_eq!(filter.filter("\u{3000}文员\u{3000}"), "文员");
        assert_eq!(filter.filter("   "), "");
    }
}
