use regex::{Captures, Regex};

use super::CharFilter;
use crate::error::{OccucodeError, Result};

/// The bare recruiting verb stripped from titles.
pub const DEFAULT_RECRUITMENT_TERM: &str = "招聘";

/// Compounds that embed the recruiting verb but name an occupation.
pub const DEFAULT_RECRUITMENT_WHITELIST: &[&str] = &[
    "招聘专员",
    "招聘师",
    "招聘主管",
    "招聘经理",
    "招聘顾问",
    "招聘助理",
];

/// Removes the recruiting verb ("招聘 …") while keeping whitelisted compounds
/// such as "招聘专员" verbatim.
///
/// Every occurrence is judged on its own: in "招聘招聘专员" the first verb is
/// removed and the compound survives.
#[derive(Debug, Clone)]
pub struct RecruitmentVerbCharFilter {
    pattern: Regex,
}

impl RecruitmentVerbCharFilter {
    pub fn new() -> Result<Self> {
        Self::with_whitelist(DEFAULT_RECRUITMENT_TERM, DEFAULT_RECRUITMENT_WHITELIST)
    }

    pub fn with_whitelist<S: AsRef<str>>(term: &str, whitelist: &[S]) -> Result<Self> {
        if term.trim().is_empty() {
            return Err(OccucodeError::analysis("recruitment term must not be empty"));
        }

        let mut compounds: Vec<&str> = whitelist
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .collect();
        compounds.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));

        let verb = regex::escape(term.trim());
        let source = if compounds.is_empty() {
            format!("()({verb})")
        } else {
            let keep = compounds
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            format!("({keep})|({verb})")
        };

        let pattern = Regex::new(&source)
            .map_err(|e| OccucodeError::analysis(format!("invalid recruitment pattern: {e}")))?;
        Ok(Self { pattern })
    }
}

impl CharFilter for RecruitmentVerbCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, |caps: &Captures<'_>| match caps.get(1) {
                Some(keep) if !keep.as_str().is_empty() => keep.as_str().to_string(),
                _ => String::new(),
            })
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "recruitment_verb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_verb_removed() {
        let filter = RecruitmentVerbCharFilter::new().unwrap();
        assert_eq!(filter.filter("招聘"), "");
        assert_eq!(filter.filter("急聘招聘会计"), "急聘会计");
    }

    #[test]
    fn test_whitelisted_compound_kept() {
        let filter = RecruitmentVerbCharFilter::new().unwrap();
        assert_eq!(filter.filter("招聘专员"), "招聘专员");
        assert_eq!(filter.filter("高级招聘经理"), "高级招聘经理");
    }

    #[test]
    fn test_bare_verb_removed_next_to_compound() {
        let filter = RecruitmentVerbCharFilter::new().unwrap();
        assert_eq!(filter.filter("招聘招聘专员"), "招聘专员");
        assert_eq!(filter.filter("招聘专员，招聘"), "招聘专员，");
    }

    #[test]
    fn test_empty_whitelist() {
        let filter = RecruitmentVerbCharFilter::with_whitelist("招聘", &[] as &[&str]).unwrap();
        assert_eq!(filter.filter("招聘专员"), "专员");
    }
}
