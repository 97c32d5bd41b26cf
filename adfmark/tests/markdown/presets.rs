//! Preset policy tests: the heading gate matrix, strict mode aborts, and
//! comment-specific downgrades.

use adfmark::adf::{Block, Inline, Mark};
use adfmark::{convert, convert_with_warnings, ConvertOptions, Preset, WarningKind};

fn heading_options(preset: Preset) -> ConvertOptions {
    ConvertOptions {
        use_headings: Some(true),
        ..ConvertOptions::for_preset(preset)
    }
}

#[test]
fn test_comment_heading_downgrades_to_bold_paragraph() {
    let doc = convert("## H\n", ConvertOptions::for_preset(Preset::Comment))
        .expect("Should convert markdown");
    assert_eq!(doc.content.len(), 1);
    match &doc.content[0] {
        Block::Paragraph(paragraph) => match paragraph.content.as_slice() {
            [Inline::Text(run)] => {
                assert_eq!(run.text, "H");
                assert!(run.has_mark(&Mark::Strong));
            }
            other => panic!("Expected one bold run, found {other:?}"),
        },
        other => panic!("Expected paragraph, found {other:?}"),
    }
}

#[test]
fn test_comment_heading_downgrade_is_warned() {
    let conversion = convert_with_warnings("## H\n", ConvertOptions::for_preset(Preset::Comment))
        .expect("Should convert markdown");
    let lossy: Vec<_> = conversion
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::LossyConversion)
        .collect();
    assert!(!lossy.is_empty());
    assert_eq!(lossy[0].line, Some(1));
    assert_eq!(lossy[0].original_text.as_deref(), Some("## H"));
    assert!(lossy[0].message.contains("comment"));
}

#[test]
fn test_comment_never_permits_headings_even_with_opt_in() {
    let doc =
        convert("# Top\n", heading_options(Preset::Comment)).expect("Should convert markdown");
    assert!(matches!(doc.content[0], Block::Paragraph(_)));
}

#[test]
fn test_task_preset_never_permits_headings() {
    let doc = convert("# Top\n", heading_options(Preset::Task)).expect("Should convert markdown");
    assert!(matches!(doc.content[0], Block::Paragraph(_)));
}

#[test]
fn test_story_heading_with_opt_in_is_a_real_heading() {
    let conversion = convert_with_warnings("## H\n", heading_options(Preset::Story))
        .expect("Should convert markdown");
    assert!(conversion.warnings.is_empty());
    match &conversion.document.content[0] {
        Block::Heading(heading) => {
            assert_eq!(heading.level(), 2);
            match heading.content.as_slice() {
                [Inline::Text(run)] => {
                    assert_eq!(run.text, "H");
                    assert!(run.marks.is_empty());
                }
                other => panic!("Expected plain heading text, found {other:?}"),
            }
        }
        other => panic!("Expected heading, found {other:?}"),
    }
}

#[test]
fn test_story_without_opt_in_downgrades() {
    let doc = convert("## H\n", ConvertOptions::for_preset(Preset::Story))
        .expect("Should convert markdown");
    assert!(matches!(doc.content[0], Block::Paragraph(_)));
}

#[test]
fn test_default_preset_supports_headings_on_opt_in() {
    let doc =
        convert("### Sub\n", heading_options(Preset::Default)).expect("Should convert markdown");
    match &doc.content[0] {
        Block::Heading(heading) => assert_eq!(heading.level(), 3),
        other => panic!("Expected heading, found {other:?}"),
    }
}

#[test]
fn test_heading_beyond_max_level_downgrades() {
    let options = ConvertOptions {
        max_heading_level: Some(2),
        ..heading_options(Preset::Story)
    };
    let conversion =
        convert_with_warnings("### Deep\n## Fine\n", options).expect("Should convert markdown");
    assert!(matches!(conversion.document.content[0], Block::Paragraph(_)));
    assert!(matches!(conversion.document.content[1], Block::Heading(_)));
    let warning = conversion
        .warnings
        .iter()
        .find(|w| w.kind == WarningKind::LossyConversion)
        .expect("Should warn about the deep heading");
    assert!(warning.message.contains("exceeds"));
}

#[test]
fn test_strict_mode_aborts_on_preset_incompatible_heading() {
    let options = ConvertOptions {
        strict_mode: Some(true),
        ..ConvertOptions::for_preset(Preset::Comment)
    };
    let err = convert("## H\n", options).expect_err("Strict comment headings should abort");
    assert_eq!(err.kind, WarningKind::UnsupportedFeature);
    assert_eq!(err.line, Some(1));
    assert_eq!(err.original_text.as_deref(), Some("## H"));

    // The same input converts fine when strict mode is off.
    assert!(convert("## H\n", ConvertOptions::for_preset(Preset::Comment)).is_ok());
}

#[test]
fn test_strict_mode_aborts_on_too_deep_heading() {
    let options = ConvertOptions {
        strict_mode: Some(true),
        max_heading_level: Some(1),
        ..heading_options(Preset::Story)
    };
    let err = convert("## H\n", options).expect_err("Deep headings should abort in strict mode");
    assert!(err.message.contains("exceeds"));
}

#[test]
fn test_convert_with_warnings_also_raises_on_strict_abort() {
    let options = ConvertOptions {
        strict_mode: Some(true),
        ..ConvertOptions::for_preset(Preset::Comment)
    };
    assert!(convert_with_warnings("## H\n", options).is_err());
}

#[test]
fn test_empty_heading_downgrade_keeps_emphasis_signal() {
    let doc = convert("##\n", ConvertOptions::for_preset(Preset::Comment))
        .expect("Should convert markdown");
    match &doc.content[0] {
        Block::Paragraph(paragraph) => match paragraph.content.as_slice() {
            [Inline::Text(run)] => {
                assert_eq!(run.text, "");
                assert_eq!(run.marks, vec![Mark::Strong]);
            }
            other => panic!("Expected one empty bold run, found {other:?}"),
        },
        other => panic!("Expected paragraph, found {other:?}"),
    }
}

#[test]
fn test_heading_downgrade_bolds_every_run_and_remerges() {
    // "already bold" and the plain tail end up with identical mark sets, so
    // they must come back as one run.
    let conversion = convert_with_warnings(
        "## **bold** tail\n",
        ConvertOptions::for_preset(Preset::Comment),
    )
    .expect("Should convert markdown");
    match &conversion.document.content[0] {
        Block::Paragraph(paragraph) => match paragraph.content.as_slice() {
            [Inline::Text(run)] => {
                assert_eq!(run.text, "bold tail");
                assert_eq!(run.marks, vec![Mark::Strong]);
            }
            other => panic!("Expected one merged bold run, found {other:?}"),
        },
        other => panic!("Expected paragraph, found {other:?}"),
    }
}

#[test]
fn test_comment_unwraps_block_quotes() {
    let conversion = convert_with_warnings(
        "> quoted text\n",
        ConvertOptions::for_preset(Preset::Comment),
    )
    .expect("Should convert markdown");
    assert_eq!(conversion.document.content.len(), 1);
    assert!(matches!(conversion.document.content[0], Block::Paragraph(_)));
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::LossyConversion));
}

#[test]
fn test_comment_unwrap_splices_all_inner_blocks() {
    let md = "> first\n>\n> second\n";
    let doc = convert(md, ConvertOptions::for_preset(Preset::Comment))
        .expect("Should convert markdown");
    assert_eq!(doc.content.len(), 2);
    assert!(doc
        .content
        .iter()
        .all(|block| matches!(block, Block::Paragraph(_))));
}

#[test]
fn test_lossy_downgrades_do_not_abort_in_strict_mode() {
    // Dropped list item content and unwrapped quotes stay warnings even
    // under strict mode; only headings and rules escalate.
    let options = ConvertOptions {
        strict_mode: Some(true),
        ..ConvertOptions::for_preset(Preset::Comment)
    };
    let conversion = convert_with_warnings("> quoted\n\n- [ ] a\n\n  extra\n", options)
        .expect("Lossy-but-representable constructs should not abort");
    assert!(conversion
        .warnings
        .iter()
        .all(|w| w.kind == WarningKind::LossyConversion));
    assert!(!conversion.warnings.is_empty());
}
