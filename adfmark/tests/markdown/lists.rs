//! List conversion tests: bullet/ordered lists, nesting, and the task item
//! split behavior.

use adfmark::adf::{Block, Inline, TaskState};
use adfmark::{convert, convert_with_warnings, ConvertOptions, Document, WarningKind};

fn to_doc(md: &str) -> Document {
    convert(md, ConvertOptions::default()).expect("Should convert markdown")
}

fn item_text(item_content: &[Block]) -> String {
    item_content
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

fn task_text(content: &[Inline]) -> String {
    content
        .iter()
        .filter_map(|node| match node {
            Inline::Text(run) => Some(run.text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_bullet_list_items() {
    let doc = to_doc("- one\n- two\n- three\n");
    match &doc.content[0] {
        Block::BulletList(list) => {
            assert_eq!(list.content.len(), 3);
            assert_eq!(item_text(&list.content[1].content), "two");
        }
        other => panic!("Expected bullet list, found {other:?}"),
    }
}

#[test]
fn test_ordered_list_from_one_has_no_attrs() {
    let doc = to_doc("1. first\n2. second\n");
    match &doc.content[0] {
        Block::OrderedList(list) => {
            assert!(list.attrs.is_none());
            assert_eq!(list.content.len(), 2);
        }
        other => panic!("Expected ordered list, found {other:?}"),
    }
}

#[test]
fn test_ordered_list_keeps_offset_start() {
    let doc = to_doc("4. fourth\n5. fifth\n");
    match &doc.content[0] {
        Block::OrderedList(list) => {
            let attrs = list.attrs.as_ref().expect("Should carry an order attr");
            assert_eq!(attrs.order, 4);
        }
        other => panic!("Expected ordered list, found {other:?}"),
    }
}

#[test]
fn test_nested_list_stays_inside_parent_item() {
    let doc = to_doc("- parent\n  - child\n");
    match &doc.content[0] {
        Block::BulletList(list) => {
            assert_eq!(list.content.len(), 1);
            let item = &list.content[0];
            assert!(matches!(item.content[0], Block::Paragraph(_)));
            match &item.content[1] {
                Block::BulletList(nested) => {
                    assert_eq!(item_text(&nested.content[0].content), "child");
                }
                other => panic!("Expected nested bullet list, found {other:?}"),
            }
        }
        other => panic!("Expected bullet list, found {other:?}"),
    }
}

#[test]
fn test_task_and_regular_items_split_into_adjacent_blocks() {
    let doc = to_doc("- [ ] A\n- B\n");
    assert_eq!(doc.content.len(), 2);
    match &doc.content[0] {
        Block::TaskList(tasks) => {
            assert_eq!(tasks.content.len(), 1);
            assert_eq!(tasks.content[0].state(), TaskState::Todo);
            assert_eq!(task_text(&tasks.content[0].content), "A");
        }
        other => panic!("Expected task list first, found {other:?}"),
    }
    match &doc.content[1] {
        Block::BulletList(list) => {
            assert_eq!(list.content.len(), 1);
            assert_eq!(item_text(&list.content[0].content), "B");
        }
        other => panic!("Expected bullet list second, found {other:?}"),
    }
}

#[test]
fn test_interleaved_items_split_on_every_switch() {
    let doc = to_doc("- [ ] A\n- B\n- [x] C\n- D\n");
    assert_eq!(doc.content.len(), 4);
    assert!(matches!(doc.content[0], Block::TaskList(_)));
    assert!(matches!(doc.content[1], Block::BulletList(_)));
    assert!(matches!(doc.content[2], Block::TaskList(_)));
    assert!(matches!(doc.content[3], Block::BulletList(_)));
}

#[test]
fn test_task_states_follow_checkboxes() {
    let doc = to_doc("- [ ] open\n- [x] closed\n- [X] also closed\n");
    match &doc.content[0] {
        Block::TaskList(tasks) => {
            let states: Vec<TaskState> = tasks.content.iter().map(|item| item.state()).collect();
            assert_eq!(
                states,
                vec![TaskState::Todo, TaskState::Done, TaskState::Done]
            );
            assert_eq!(task_text(&tasks.content[0].content), "open");
        }
        other => panic!("Expected task list, found {other:?}"),
    }
}

#[test]
fn test_task_local_ids_are_unique_within_a_document() {
    let doc = to_doc("- [ ] a\n- [ ] b\n\ntext\n\n- [x] c\n");
    let mut ids: Vec<String> = Vec::new();
    for block in &doc.content {
        if let Block::TaskList(tasks) = block {
            ids.push(tasks.attrs.local_id.clone());
            for item in &tasks.content {
                ids.push(item.attrs.local_id.clone());
            }
        }
    }
    assert_eq!(ids.len(), 5);
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len(), "local ids must not repeat: {ids:?}");
    assert!(ids.iter().all(|id| !id.is_empty()));
}

#[test]
fn test_task_item_extra_blocks_dropped_with_one_warning() {
    let md = "- [ ] keep this\n\n  but not this paragraph\n";
    let conversion =
        convert_with_warnings(md, ConvertOptions::default()).expect("Should convert markdown");
    match &conversion.document.content[0] {
        Block::TaskList(tasks) => {
            assert_eq!(task_text(&tasks.content[0].content), "keep this");
        }
        other => panic!("Expected task list, found {other:?}"),
    }
    let lossy: Vec<_> = conversion
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::LossyConversion)
        .collect();
    assert_eq!(lossy.len(), 1);
    assert!(lossy[0].message.contains("task items"));
}

#[test]
fn test_list_item_drops_disallowed_blocks_with_one_warning() {
    // A quote inside a list item has no representation there; the item keeps
    // its paragraph and the quote goes, with a single warning for the item.
    let md = "- kept\n\n  > dropped\n\n  also kept\n";
    let conversion =
        convert_with_warnings(md, ConvertOptions::default()).expect("Should convert markdown");
    match &conversion.document.content[0] {
        Block::BulletList(list) => {
            let item = &list.content[0];
            assert_eq!(item.content.len(), 2);
            assert!(item
                .content
                .iter()
                .all(|block| matches!(block, Block::Paragraph(_))));
        }
        other => panic!("Expected bullet list, found {other:?}"),
    }
    let lossy: Vec<_> = conversion
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::LossyConversion)
        .collect();
    assert_eq!(lossy.len(), 1);
}

#[test]
fn test_list_item_emptied_by_filtering_gets_empty_paragraph() {
    let md = "- > only a quote\n";
    let conversion =
        convert_with_warnings(md, ConvertOptions::default()).expect("Should convert markdown");
    match &conversion.document.content[0] {
        Block::BulletList(list) => {
            let item = &list.content[0];
            assert_eq!(item.content.len(), 1);
            match &item.content[0] {
                Block::Paragraph(paragraph) => assert!(paragraph.content.is_empty()),
                other => panic!("Expected empty paragraph, found {other:?}"),
            }
        }
        other => panic!("Expected bullet list, found {other:?}"),
    }
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::LossyConversion));
}

#[test]
fn test_ordered_lists_never_produce_task_items() {
    let doc = to_doc("1. [ ] looks like a task\n2. plain\n");
    assert_eq!(doc.content.len(), 1);
    match &doc.content[0] {
        Block::OrderedList(list) => assert_eq!(list.content.len(), 2),
        other => panic!("Expected ordered list, found {other:?}"),
    }
}

#[test]
fn test_task_item_leading_whitespace_is_stripped() {
    let doc = to_doc("- [ ]   spaced out\n");
    match &doc.content[0] {
        Block::TaskList(tasks) => {
            assert_eq!(task_text(&tasks.content[0].content), "spaced out");
        }
        other => panic!("Expected task list, found {other:?}"),
    }
}

#[test]
fn test_nested_list_under_task_item_is_dropped() {
    let md = "- [ ] parent\n  - nested child\n";
    let conversion =
        convert_with_warnings(md, ConvertOptions::default()).expect("Should convert markdown");
    match &conversion.document.content[0] {
        Block::TaskList(tasks) => {
            assert_eq!(tasks.content.len(), 1);
            assert_eq!(task_text(&tasks.content[0].content), "parent");
        }
        other => panic!("Expected task list, found {other:?}"),
    }
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::LossyConversion && w.message.contains("task items")));
}
