mod common;

use common::fixture_bytes;
use parts_mapper::error::MapError;
use parts_mapper::reader::ReadOptions;
use parts_mapper::template::Template;

#[test]
fn load_reads_header_and_type_row_and_ignores_samples() {
    let template = Template::load(&fixture_bytes("Parts_Template.csv"), &ReadOptions::default())
        .expect("load template");
    assert_eq!(template.width(), 18);
    assert_eq!(template.header()[0], "Part Code");
    assert_eq!(template.header()[17], "Notes");
    assert_eq!(template.type_row()[5], "numeric");
    assert!(template.type_row().iter().all(|tag| !tag.starts_with("SAMPLE")));
}

#[test]
fn quoted_header_cells_are_unquoted() {
    let template = Template::load(
        b"\"Weight, kg\",Code\nnumeric,text\n",
        &ReadOptions::default(),
    )
    .expect("load template");
    assert_eq!(template.header(), ["Weight, kg".to_string(), "Code".to_string()]);
}

#[test]
fn mismatched_type_row_is_a_shape_error() {
    let err = Template::load(b"A,B,C\ntext,text\n", &ReadOptions::default())
        .expect_err("shape mismatch");
    match err {
        MapError::TemplateShape { header, type_row } => {
            assert_eq!(header, 3);
            assert_eq!(type_row, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn header_only_template_is_missing_its_type_row() {
    let err = Template::load(b"A,B\n", &ReadOptions::default()).expect_err("no type row");
    assert!(matches!(err, MapError::MissingTypeRow));
}

#[test]
fn empty_template_is_rejected() {
    let err = Template::load(b"", &ReadOptions::default()).expect_err("empty template");
    assert!(matches!(err, MapError::EmptyTemplate));
}

#[test]
fn new_enforces_parallel_lengths() {
    let template = Template::new(
        vec!["A".to_string(), "B".to_string()],
        vec!["text".to_string(), "text".to_string()],
    )
    .expect("valid template");
    assert_eq!(template.width(), 2);

    let err = Template::new(vec!["A".to_string()], Vec::new()).expect_err("invalid template");
    assert!(matches!(err, MapError::TemplateShape { header: 1, type_row: 0 }));
}

#[test]
fn semicolon_templates_load_with_matching_delimiter() {
    let options = ReadOptions {
        delimiter: b';',
        ..ReadOptions::default()
    };
    let template = Template::load(b"A;B\ntext;numeric\n", &options).expect("load template");
    assert_eq!(template.type_row(), ["text".to_string(), "numeric".to_string()]);
}

#[test]
fn blank_second_line_is_an_empty_type_tag() {
    let template =
        Template::load(b"Part Code\n\nSAMPLE-1\n", &ReadOptions::default()).expect("load");
    assert_eq!(template.header(), ["Part Code".to_string()]);
    assert_eq!(template.type_row(), [String::new()]);

    let template = Template::load(b"Part Code\n\n", &ReadOptions::default()).expect("load");
    assert_eq!(template.type_row(), [String::new()]);
}

#[test]
fn blank_second_line_does_not_hide_a_shape_error() {
    let err = Template::load(b"A,B\n\ntext,text\n", &ReadOptions::default())
        .expect_err("blank type row");
    assert!(matches!(err, MapError::TemplateShape { header: 2, type_row: 1 }));
}

#[test]
fn crlf_template_lines_are_trimmed() {
    let template = Template::load(b"A,B\r\ntext,numeric\r\nx,1\r\n", &ReadOptions::default())
        .expect("load template");
    assert_eq!(template.type_row(), ["text".to_string(), "numeric".to_string()]);
}
