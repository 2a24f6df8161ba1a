//! Recruitment boilerplate removal.
//!
//! Job titles scraped from listings routinely carry perks, pay figures and
//! schedule notes glued onto the actual occupation ("储备店长+带薪培训+免费住宿",
//! "客服月入过万双休"). This filter deletes those fragments with an ordered list
//! of named regex rules. Rules run one after another, so a later rule sees the
//! text with earlier matches already removed.

use super::CharFilter;
use super::pattern_replace::PatternReplaceCharFilter;
use crate::error::Result;

const CN_DIGIT: &str = "零一二三四五六七八九十";
const PAY_UNIT: &str = "kKwW千万";

/// A single named removal rule.
#[derive(Debug, Clone)]
pub struct BoilerplateRule {
    name: String,
    filter: PatternReplaceCharFilter,
}

impl BoilerplateRule {
    /// Compile a rule that deletes every match of `pattern`.
    pub fn new<S: Into<String>>(name: S, pattern: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            filter: PatternReplaceCharFilter::remove(pattern)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.filter.pattern()
    }
}

/// The built-in rule set, in application order.
///
/// Schedule rules run before the pay rules so that "月休4天" is removed whole
/// instead of losing only its "4天" tail to the per-period pay rule.
pub fn default_rule_patterns() -> Vec<(&'static str, String)> {
    vec![
        (
            "perks",
            r"(?:提供|\+|有|包|管)(?:五险一金|六险一金|带薪(?:培训|年假)?|师傅带教|法休|[吃住社保饭补餐免费宿舍分红])+"
                .to_string(),
        ),
        (
            "acceptance",
            r"(?:接受)?[小白无经验生熟手]+[均皆都]?可|(?:经验|学历|男女|年龄)不限".to_string(),
        ),
        ("negotiable", r"(?:薪资|待遇|工资|薪酬)面议".to_string()),
        ("shift_hours", format!(r"早[{CN_DIGIT}0-9]+晚[{CN_DIGIT}0-9]+")),
        ("clock_time", format!(r"[{CN_DIGIT}0-9]+点[上下]班")),
        (
            "rotation",
            format!(r"上[{CN_DIGIT}百千万几0-9]+休[{CN_DIGIT}百千万几0-9]+|做[{CN_DIGIT}0-9]休[{CN_DIGIT}0-9]"),
        ),
        ("monthly_rest", format!(r"月休[{CN_DIGIT}0-9]+天")),
        ("weekly_rest", r"(?:周末)?[单双法]休".to_string()),
        ("fixed_shift", r"长期?[白夜]班".to_string()),
        (
            "monthly_income",
            format!(r"月(?:收入|入|薪|均)?过?[0-9]+(?:\.[0-9]+)?[{PAY_UNIT}]?\+?起?"),
        ),
        (
            "monthly_income_words",
            r"月(?:(?:收入|入|薪|均)过?|过)[一二两三四五六七八九十]*[千万]\+?起?".to_string(),
        ),
        (
            "labelled_salary",
            format!(
                r"(?:年薪|综合薪资|保障薪资|薪资|无责底薪|底薪|无责|工资)[0-9]+(?:\.[0-9]+)?[{PAY_UNIT}亿]?\+?"
            ),
        ),
        (
            "salary_label_suffix",
            format!(r"[0-9]+(?:\.[0-9]+)?[{PAY_UNIT}]?(?:年薪|保障薪资|薪资|底薪|无责)"),
        ),
        (
            "salary_range",
            format!(
                r"[¥￥]?[0-9]+(?:\.[0-9]+)?[{PAY_UNIT}]?(?:-|~|～|到|至)[¥￥]?[0-9]+(?:\.[0-9]+)?[{PAY_UNIT}]?元?"
            ),
        ),
        (
            "pay_per_period",
            r"[¥￥]?[0-9]+[kK]?元?/?(?:一天|每天|每月|天|月)".to_string(),
        ),
        ("pay_magnitude", r"[¥￥]?[0-9]+(?:\.[0-9]+)?[kK千万]".to_string()),
    ]
}

/// Deletes recruitment boilerplate using an ordered rule list.
#[derive(Debug, Clone)]
pub struct BoilerplateCharFilter {
    rules: Vec<BoilerplateRule>,
}

impl BoilerplateCharFilter {
    /// Create a filter with the built-in rule set.
    pub fn new() -> Result<Self> {
        let rules = default_rule_patterns()
            .into_iter()
            .map(|(name, pattern)| BoilerplateRule::new(name, &pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Append a rule that runs after all existing ones.
    pub fn add_rule(mut self, rule: BoilerplateRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[BoilerplateRule] {
        &self.rules
    }
}

impl CharFilter for BoilerplateCharFilter {
    fn filter(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |text, rule| rule.filter.filter(&text))
    }

    fn name(&self) -> &'static str {
        "boilerplate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str) -> String {
        BoilerplateCharFilter::new().unwrap().filter(text)
    }

    #[test]
    fn test_perks_removed() {
        assert_eq!(clean("提供吃住社保"), "");
        assert_eq!(clean("储备副店长+带薪培训+免费住宿"), "储备副店长");
        assert_eq!(clean("普工有五险一金"), "普工");
    }

    #[test]
    fn test_perk_prefix_does_not_eat_titles() {
        assert_eq!(clean("管培生"), "管培生");
        assert_eq!(clean("包装工"), "包装工");
    }

    #[test]
    fn test_acceptance_phrases() {
        assert_eq!(clean("电话客服生熟手均可"), "电话客服");
        assert_eq!(clean("仓管接受小白可"), "仓管");
        assert_eq!(clean("司机经验不限"), "司机");
    }

    #[test]
    fn test_salary_figures() {
        assert_eq!(clean("月入过万"), "");
        assert_eq!(clean("客服月入8000"), "客服");
        assert_eq!(clean("薪资面议"), "");
        assert_eq!(clean("销售底薪5000"), "销售");
        assert_eq!(clean("运营8-12k"), "运营");
        assert_eq!(clean("普工200/天"), "普工");
        assert_eq!(clean("主管年薪30万"), "主管");
    }

    #[test]
    fn test_schedule_patterns() {
        assert_eq!(clean("保安早八晚五"), "保安");
        assert_eq!(clean("店员6点下班"), "店员");
        assert_eq!(clean("保洁上六休一"), "保洁");
        assert_eq!(clean("前台月休4天"), "前台");
        assert_eq!(clean("文员周末双休"), "文员");
        assert_eq!(clean("打包工人长白班"), "打包工人");
        assert_eq!(clean("普工长期夜班"), "普工");
    }

    #[test]
    fn test_three_d_designator_untouched() {
        assert_eq!(clean("3D设计师"), "3D设计师");
    }

    #[test]
    fn test_extra_rule_runs_last() {
        let filter = BoilerplateCharFilter::new()
            .unwrap()
            .add_rule(BoilerplateRule::new("urgent", "急招").unwrap());
        assert_eq!(filter.filter("急招文员双休"), "文员");
        assert_eq!(filter.rules().last().unwrap().name(), "urgent");
    }
}
