use std::io::Write;

use occucode::analysis::normalizer::{JobTitleNormalizer, NormalizerConfig};
use occucode::error::Result;

#[test]
fn recruitment_postings_reduce_to_the_occupation() -> Result<()> {
    let normalizer = JobTitleNormalizer::new()?;

    let cases = [
        ("提供吃住社保，月入过万，招聘专员J10050，北京市", "招聘专员"),
        ("薪资面议，3D设计师，上海市", "3D设计师"),
        ("高薪诚聘 Java工程师 8-12k 双休", "Java工程师"),
        ("UE4开发工程师（上海）", "UE4开发工程师"),
        ("急聘：服务员（包吃住）", "服务员"),
        ("打包工人长白班", "打包工人"),
        ("日结算专员", "日结算专员"),
        ("高薪酬专员", "高薪酬专员"),
        ("招聘：前台文员", "前台文员"),
        ("b2b销售", "b2b销售"),
        ("B2B销售", "B2B销售"),
    ];
    for (raw, expected) in cases {
        assert_eq!(normalizer.normalize(raw), expected, "input {raw:?}");
    }
    Ok(())
}

#[test]
fn normalization_is_a_fixed_point() -> Result<()> {
    let normalizer = JobTitleNormalizer::new()?;

    for raw in [
        "提供吃住社保，月入过万，有五险一金，招聘专员J10050，北京市",
        "储备干部（月薪8000+） 长白班",
        "【急招】普工/包装工 日结",
        "深圳市 电商运营 底薪加提成",
        "招招招招招聘聘聘聘聘会计",
        "",
    ] {
        let once = normalizer.normalize(raw);
        let twice = normalizer.normalize(&once);
        assert_eq!(once, twice, "input {raw:?}");
    }
    Ok(())
}

#[test]
fn custom_stopword_file_replaces_builtin_list() -> Result<()> {
    let mut stopwords = tempfile::NamedTempFile::new()?;
    writeln!(stopwords, "# local list")?;
    writeln!(stopwords, "实习")?;

    let config = NormalizerConfig {
        stopwords_path: Some(stopwords.path().to_path_buf()),
        ..NormalizerConfig::default()
    };
    let normalizer = JobTitleNormalizer::from_config(&config)?;

    assert_eq!(normalizer.normalize("实习 会计"), "会计");
    // "急招" is only in the bundled list.
    assert_eq!(normalizer.normalize("急招 会计"), "急招 会计");
    Ok(())
}

#[test]
fn config_round_trips_through_json() -> Result<()> {
    let json = r#"{ "extra_stopwords": ["储备"], "stopword_boundary": "ascii_aware" }"#;
    let config: NormalizerConfig = serde_json::from_str(json)?;
    assert_eq!(config.recruitment_term, "招聘");

    let normalizer = JobTitleNormalizer::from_config(&config)?;
    assert_eq!(normalizer.normalize("储备店长"), "店长");
    assert_eq!(normalizer.normalize("急招会计"), "会计");
    Ok(())
}
