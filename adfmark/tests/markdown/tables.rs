//! Table conversion tests.

use adfmark::adf::{Block, Inline, TableCell};
use adfmark::{convert, convert_with_warnings, ConvertOptions, Preset, WarningKind};

const TWO_BY_TWO: &str = "\
| Name | Role |
| ---- | ---- |
| Ada  | Eng  |
| Grace | Eng |
";

fn cell_text(cell: &TableCell) -> String {
    cell.content()
        .iter()
        .filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph.content.iter().filter_map(|node| {
                match node {
                    Inline::Text(run) => Some(run.text.as_str()),
                    _ => None,
                }
            })),
            _ => None,
        })
        .flatten()
        .collect()
}

#[test]
fn test_table_structure_header_and_body() {
    let doc = convert(TWO_BY_TWO, ConvertOptions::default()).expect("Should convert markdown");
    match &doc.content[0] {
        Block::Table(table) => {
            assert_eq!(table.content.len(), 3);
            let header = &table.content[0];
            assert!(header
                .content
                .iter()
                .all(|cell| matches!(cell, TableCell::Header { .. })));
            assert_eq!(cell_text(&header.content[0]), "Name");

            for row in &table.content[1..] {
                assert!(row
                    .content
                    .iter()
                    .all(|cell| matches!(cell, TableCell::Cell { .. })));
            }
            assert_eq!(cell_text(&table.content[2].content[0]), "Grace");
        }
        other => panic!("Expected table, found {other:?}"),
    }
}

#[test]
fn test_every_cell_wraps_content_in_one_paragraph() {
    let doc = convert(TWO_BY_TWO, ConvertOptions::default()).expect("Should convert markdown");
    match &doc.content[0] {
        Block::Table(table) => {
            for row in &table.content {
                for cell in &row.content {
                    assert_eq!(cell.content().len(), 1);
                    assert!(matches!(cell.content()[0], Block::Paragraph(_)));
                }
            }
        }
        other => panic!("Expected table, found {other:?}"),
    }
}

#[test]
fn test_empty_cells_still_get_a_paragraph() {
    let md = "\
| a |  |
| - | - |
|  | b |
";
    let doc = convert(md, ConvertOptions::default()).expect("Should convert markdown");
    match &doc.content[0] {
        Block::Table(table) => {
            let empty_header = &table.content[0].content[1];
            assert_eq!(empty_header.content().len(), 1);
            match &empty_header.content()[0] {
                Block::Paragraph(paragraph) => assert!(paragraph.content.is_empty()),
                other => panic!("Expected empty paragraph, found {other:?}"),
            }
            assert_eq!(cell_text(&table.content[1].content[1]), "b");
        }
        other => panic!("Expected table, found {other:?}"),
    }
}

#[test]
fn test_formatted_cell_content_keeps_marks() {
    let md = "\
| h |
| - |
| **bold** |
";
    let doc = convert(md, ConvertOptions::default()).expect("Should convert markdown");
    match &doc.content[0] {
        Block::Table(table) => match &table.content[1].content[0].content()[0] {
            Block::Paragraph(paragraph) => match &paragraph.content[0] {
                Inline::Text(run) => {
                    assert_eq!(run.text, "bold");
                    assert!(!run.marks.is_empty());
                }
                other => panic!("Expected text run, found {other:?}"),
            },
            other => panic!("Expected paragraph, found {other:?}"),
        },
        other => panic!("Expected table, found {other:?}"),
    }
}

#[test]
fn test_comment_preset_warns_about_tables_but_emits_them() {
    let conversion = convert_with_warnings(TWO_BY_TWO, ConvertOptions::for_preset(Preset::Comment))
        .expect("Should convert markdown");
    // The warning is additive: the table is still fully formed.
    match &conversion.document.content[0] {
        Block::Table(table) => assert_eq!(table.content.len(), 3),
        other => panic!("Expected table, found {other:?}"),
    }
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::RiskyFeature));
}

#[test]
fn test_no_risky_table_warning_outside_comments() {
    let mut options = ConvertOptions::for_preset(Preset::Story);
    options.warn_on_risky_nodes = Some(true);
    let conversion =
        convert_with_warnings(TWO_BY_TWO, options).expect("Should convert markdown");
    assert!(conversion.warnings.is_empty());
}

#[test]
fn test_risky_table_warning_can_be_muted() {
    let mut options = ConvertOptions::for_preset(Preset::Comment);
    options.warn_on_risky_nodes = Some(false);
    let conversion =
        convert_with_warnings(TWO_BY_TWO, options).expect("Should convert markdown");
    assert!(conversion.warnings.is_empty());
}
