use parts_mapper::engine::{MissingSourcePolicy, transform};
use parts_mapper::mapping::{MappingRule, MappingTable};
use parts_mapper::reader::{ReadOptions, parse};
use parts_mapper::rows::Row;
use parts_mapper::template::Template;
use parts_mapper::writer::{TypeRowPolicy, WriteOptions, render};
use proptest::prelude::*;

fn parts_template() -> Template {
    Template::new(
        vec!["Part Code".to_string(), "Desc1".to_string(), "Vend Price".to_string()],
        vec!["text".to_string(), "text".to_string(), "numeric".to_string()],
    )
    .expect("template")
}

fn output_row(template: &Template, values: &[&str]) -> Row {
    Row::from_pairs(template.header().iter().cloned().zip(values.iter().copied()))
}

#[test]
fn render_writes_header_type_row_and_records() {
    let template = parts_template();
    let rows = vec![output_row(&template, &["ABC123", "Widget", "12.50"])];
    let bytes = render(&rows, &template, &WriteOptions::default()).expect("render");
    assert_eq!(
        String::from_utf8(bytes).expect("utf-8"),
        "Part Code,Desc1,Vend Price\ntext,text,numeric\nABC123,Widget,12.50\n"
    );
}

#[test]
fn render_quotes_only_cells_that_need_it() {
    let template = parts_template();
    let rows = vec![output_row(
        &template,
        &["A,1", "Gasket \"HD\"", "two\nlines"],
    )];
    let bytes = render(&rows, &template, &WriteOptions::default()).expect("render");
    let text = String::from_utf8(bytes).expect("utf-8");
    assert!(text.ends_with("\"A,1\",\"Gasket \"\"HD\"\"\",\"two\nlines\"\n"), "{text}");
}

#[test]
fn empty_rows_render_to_nothing() {
    let bytes = render(&[], &parts_template(), &WriteOptions::default()).expect("render");
    assert!(bytes.is_empty());
}

#[test]
fn placeholder_policy_tags_every_column() {
    let template = parts_template();
    let rows = vec![output_row(&template, &["A1", "", ""])];
    let options = WriteOptions {
        type_row: TypeRowPolicy::Placeholder,
        ..WriteOptions::default()
    };
    let text = String::from_utf8(render(&rows, &template, &options).expect("render"))
        .expect("utf-8");
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines[1], "text,text,text");
    assert_eq!(lines[2], "A1,,");
}

#[test]
fn rows_in_another_order_are_written_in_template_order() {
    let template = parts_template();
    let rows = vec![Row::from_pairs([
        ("Vend Price", "3.10"),
        ("Part Code", "XYZ9"),
    ])];
    let text = String::from_utf8(
        render(&rows, &template, &WriteOptions::default()).expect("render"),
    )
    .expect("utf-8");
    assert_eq!(text.lines().nth(2), Some("XYZ9,,3.10"));
}

#[test]
fn output_delimiter_and_encoding_are_applied() {
    let template = parts_template();
    let rows = vec![output_row(&template, &["A1", "Café", "1"])];
    let options = WriteOptions {
        delimiter: b'\t',
        encoding: encoding_rs::WINDOWS_1252,
        ..WriteOptions::default()
    };
    let bytes = render(&rows, &template, &options).expect("render");
    assert!(bytes.ends_with(b"A1\tCaf\xE9\t1\n"));
}

#[test]
fn unencodable_output_is_an_error() {
    let template = parts_template();
    let rows = vec![output_row(&template, &["A1", "雪", "1"])];
    let options = WriteOptions {
        encoding: encoding_rs::WINDOWS_1252,
        ..WriteOptions::default()
    };
    assert!(render(&rows, &template, &options).is_err());
}

fn cell() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,\"\n]{0,12}"
}

proptest! {
    #[test]
    fn rendered_output_parses_back_to_the_same_rows(
        records in proptest::collection::vec((cell(), cell(), cell()), 1..12),
    ) {
        let template = parts_template();
        let mapping = MappingTable::new(vec![
            MappingRule::source("Part Code", "Sku"),
            MappingRule::source("Desc1", "Description"),
            MappingRule::source("Vend Price", "Cost"),
        ])
        .expect("mapping");
        let input = records
            .iter()
            .map(|(sku, description, cost)| {
                Row::from_pairs([
                    ("Sku", sku.clone()),
                    ("Description", description.clone()),
                    ("Cost", cost.clone()),
                ])
            })
            .collect::<Vec<_>>();

        let mapped = transform(&input, &template, &mapping, MissingSourcePolicy::default());
        let bytes = render(&mapped, &template, &WriteOptions::default()).expect("render");
        let reparsed = parse(&bytes, &ReadOptions::default()).expect("parse rendered output");

        prop_assert_eq!(reparsed[0].values(), template.type_row());
        let data = &reparsed[1..];
        prop_assert_eq!(data.len(), mapped.len());
        for (parsed, expected) in data.iter().zip(&mapped) {
            prop_assert_eq!(parsed.columns(), expected.columns());
            prop_assert_eq!(parsed.values(), expected.values());
        }
    }
}
