use std::ffi::OsString;

use notionmark::{data::equivalent_trees, PrintOptions, TableStyle};

const INPUT_DIR: &str = "./tests/input_files";

fn input_files() -> impl Iterator<Item = (OsString, String)> {
    std::fs::read_dir(INPUT_DIR)
        .expect("Should be able to access input directory")
        .map(|file| {
            let file_path = file
                .expect("Should be able to access files in input directory")
                .path();
            let input =
                std::fs::read_to_string(&file_path).expect("Should be able to read input files");
            let name = file_path
                .file_name()
                .map(OsString::from)
                .expect("Should be a file");
            (name, input)
        })
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_roundtrip(options: &PrintOptions) {
    init_logger();
    for (name, input) in input_files() {
        // arrange
        let parsed = notionmark::parse(&input);

        // act
        let printed = notionmark::print_with(&parsed, options);
        let reparsed = notionmark::parse(&printed);

        // assert
        assert!(!parsed.is_empty(), "{name:?} parsed into nothing");
        if !equivalent_trees(&parsed, &reparsed) {
            text_diff::print_diff(&input, &printed, "\n");
            panic!("{name:?} changed after printing:\n{parsed:#?}\nvs\n{reparsed:#?}");
        }
    }
}

#[test]
fn roundtrip_pipe_tables() {
    assert_roundtrip(&PrintOptions::default());
}

#[test]
fn roundtrip_preserved_tables() {
    assert_roundtrip(&PrintOptions {
        table_style: TableStyle::Preserve,
        ..PrintOptions::default()
    });
}

#[test]
fn roundtrip_wide_indent() {
    assert_roundtrip(&PrintOptions {
        indent_width: 4,
        ..PrintOptions::default()
    });
}

#[test]
fn printing_is_stable() {
    init_logger();
    for (name, input) in input_files() {
        // arrange
        let once = notionmark::print(&notionmark::parse(&input));

        // act
        let twice = notionmark::print(&notionmark::parse(&once));

        // assert
        if once != twice {
            text_diff::print_diff(&once, &twice, "\n");
            panic!("Printing {name:?} is not stable");
        }
    }
}

#[test]
fn every_block_kind_is_covered() {
    use notionmark::BlockType;

    fn collect(nodes: &[notionmark::AstNode], kinds: &mut Vec<BlockType>) {
        for node in nodes {
            kinds.push(node.kind);
            collect(&node.children, kinds);
        }
    }

    let mut kinds = Vec::new();
    for (_, input) in input_files() {
        collect(&notionmark::parse(&input), &mut kinds);
    }

    let missing: Vec<_> = BlockType::SUPPORTED
        .iter()
        .filter(|kind| !kinds.contains(kind))
        .collect();
    assert!(missing.is_empty(), "Input files miss {missing:?}");
}
