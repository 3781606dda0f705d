mod common;

use common::{TestWorkspace, fixture_bytes};
use parts_mapper::error::MappingError;
use parts_mapper::mapping::{MappingRule, MappingTable, Resolution};
use parts_mapper::reader::ReadOptions;
use parts_mapper::template::Template;

#[test]
fn builtin_parts_mapping_tags_sources_and_literals() {
    let mapping = MappingTable::builtin_parts().expect("builtin mapping");
    assert_eq!(mapping.len(), 17);
    assert_eq!(
        mapping.get("Part Code"),
        Some(&Resolution::SourceField("Sku".to_string()))
    );
    assert_eq!(
        mapping.get("HS Code"),
        Some(&Resolution::SourceField("US H.S Codes".to_string()))
    );
    assert_eq!(
        mapping.get("TT"),
        Some(&Resolution::Literal("02".to_string()))
    );
    assert_eq!(
        mapping.get("TPL Possible"),
        Some(&Resolution::Literal("NO".to_string()))
    );
    assert_eq!(mapping.get("Notes"), None);
}

#[test]
fn yaml_rules_and_legacy_entries_load_together() {
    let mapping = MappingTable::from_yaml_str(
        r#"
rules:
  - column: Part Code
    source: Sku
  - column: Vend Code
    literal: _GEN
legacy:
  Cust Ctry: CA
"#,
    )
    .expect("parse mapping");
    assert_eq!(mapping.len(), 3);
    assert_eq!(
        mapping.get("Vend Code"),
        Some(&Resolution::Literal("_GEN".to_string()))
    );
    assert_eq!(
        mapping.get("Cust Ctry"),
        Some(&Resolution::SourceField("CA".to_string()))
    );
}

#[test]
fn duplicate_output_columns_are_rejected() {
    let err = MappingTable::new(vec![
        MappingRule::source("Desc1", "Description"),
        MappingRule::literal("Desc1", "n/a"),
    ])
    .expect_err("duplicate column");
    assert!(matches!(err, MappingError::DuplicateColumn { ref column } if column == "Desc1"));
}

#[test]
fn duplicate_between_rules_and_legacy_is_rejected() {
    let err = MappingTable::from_yaml_str(
        "rules:\n  - column: TT\n    literal: \"02\"\nlegacy:\n  TT: Transport\n",
    )
    .expect_err("duplicate column");
    assert!(matches!(err, MappingError::DuplicateColumn { .. }));
}

#[test]
fn rule_with_both_source_and_literal_is_ambiguous() {
    let err = MappingTable::from_yaml_str(
        "rules:\n  - column: COE\n    source: Origin\n    literal: _GN\n",
    )
    .expect_err("ambiguous rule");
    assert!(matches!(err, MappingError::AmbiguousRule { ref column } if column == "COE"));
}

#[test]
fn rule_without_resolution_is_rejected() {
    let err = MappingTable::from_yaml_str("rules:\n  - column: COE\n").expect_err("empty rule");
    assert!(matches!(err, MappingError::EmptyRule { .. }));
}

#[test]
fn blank_output_column_is_rejected() {
    let err = MappingTable::new(vec![MappingRule::literal("  ", "x")]).expect_err("blank");
    assert!(matches!(err, MappingError::BlankColumn));
}

#[test]
fn malformed_yaml_reports_parse_error() {
    let err = MappingTable::from_yaml_str("rules: [").expect_err("bad yaml");
    assert!(matches!(err, MappingError::Parse(_)));
}

#[test]
fn load_reads_mapping_file_and_names_it_in_errors() {
    let workspace = TestWorkspace::new();
    let good = workspace.write(
        "mapping.yml",
        b"rules:\n  - column: Part Code\n    source: Sku\n",
    );
    let mapping = MappingTable::load(&good).expect("load mapping");
    assert_eq!(mapping.rules()[0], MappingRule::source("Part Code", "Sku"));

    let bad = workspace.write("bad.yml", b"rules:\n  - column: X\n");
    let err = MappingTable::load(&bad).expect_err("invalid rule");
    let rendered = format!("{err:#}");
    assert!(rendered.contains("bad.yml"), "{rendered}");
    assert!(rendered.contains("neither"), "{rendered}");
}

#[test]
fn coverage_reports_unmapped_and_unknown_columns() {
    let template = Template::load(
        &fixture_bytes("Parts_Template.csv"),
        &ReadOptions::default(),
    )
    .expect("template");
    let mapping = MappingTable::new(vec![
        MappingRule::source("Part Code", "Sku"),
        MappingRule::literal("Warehouse", "MAIN"),
    ])
    .expect("mapping");

    let coverage = mapping.coverage(&template);
    assert_eq!(coverage.unknown_columns, vec!["Warehouse".to_string()]);
    assert_eq!(coverage.unmapped_columns.len(), template.width() - 1);
    assert!(!coverage.unmapped_columns.contains(&"Part Code".to_string()));

    let builtin = MappingTable::builtin_parts().expect("builtin");
    let coverage = builtin.coverage(&template);
    assert_eq!(coverage.unmapped_columns, vec!["Notes".to_string()]);
    assert!(coverage.unknown_columns.is_empty());
}
