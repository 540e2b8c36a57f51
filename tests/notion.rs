use notionmark::{
    data::{AstNode, BlockType},
    notion::plain_text,
};

const SCENARIO: &str = "# Title with **bold**

> # Toggle Heading
> Content inside toggle

> Simple quote

https://cdn.soundcloud.com/audio.mp3

[Link test](https://notion.so)
";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn end_to_end_scenario() {
    init_logger();

    // act
    let blocks = notionmark::markdown_to_notion(SCENARIO);

    // assert
    let kinds: Vec<_> = blocks.iter().map(|block| block.kind()).collect();
    assert_eq!(kinds, ["heading_1", "heading_1", "quote", "audio", "paragraph"]);
    assert!(blocks
        .iter()
        .any(|block| block.is_toggleable() || block.kind() == "toggle"));

    let title = blocks[0].rich_text().expect("Headings have text");
    assert_eq!(plain_text(title), "Title with bold");
    assert!(title.iter().any(|run| run.annotations.bold && run.content() == "bold"));

    let toggle_heading = &blocks[1];
    assert!(toggle_heading.is_toggleable());
    assert_eq!(toggle_heading.children().len(), 1);

    let link = blocks[4].rich_text().expect("Paragraphs have text");
    assert_eq!(link.len(), 1);
    assert_eq!(link[0].content(), "Link test");
    assert_eq!(link[0].url(), Some("https://notion.so"));
}

#[test]
fn toggle_with_single_child() {
    // arrange
    let node = AstNode::with_rich_text(BlockType::Toggle, "Toggle title")
        .with_children(vec![AstNode::with_rich_text(BlockType::Paragraph, "child")]);

    // act
    let blocks = notionmark::convert(&[node]);

    // assert
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind(), "toggle");
    let title = blocks[0].rich_text().expect("Toggles have text");
    assert_eq!(title[0].content(), "Toggle title");
    assert_eq!(blocks[0].children().len(), 1);
    assert_eq!(blocks[0].children()[0].kind(), "paragraph");
}

#[test]
fn parsed_toggle_converts_with_children() {
    // act
    let blocks = notionmark::markdown_to_notion("> Line 1\n> Line 2\n> Line 3\n> Line 4");

    // assert
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind(), "toggle");
    let children: Vec<_> = blocks[0]
        .children()
        .iter()
        .map(|child| plain_text(child.rich_text().unwrap_or_default()))
        .collect();
    assert_eq!(children, ["Line 2", "Line 3", "Line 4"]);
}

#[test]
fn soundcloud_is_audio() {
    let nodes = notionmark::parse("https://cdn.soundcloud.com/podcast.mp3");

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind, BlockType::Audio);
    assert_eq!(notionmark::convert(&nodes)[0].kind(), "audio");
}

#[test]
fn long_text_is_split_into_runs() {
    // arrange
    let options = notionmark::ConvertOptions {
        max_text_length: 10,
        ..notionmark::ConvertOptions::default()
    };
    let nodes = notionmark::parse(&"word ".repeat(10));

    // act
    let blocks = notionmark::convert_with(&nodes, &options);

    // assert
    let runs = blocks[0].rich_text().expect("Paragraphs have text");
    assert!(runs.len() > 1);
    assert!(runs.iter().all(|run| run.content().chars().count() <= 10));
    assert_eq!(plain_text(runs), "word ".repeat(10).trim());
}

#[cfg(feature = "serde")]
mod wire {
    use serde_json::{json, Value};

    fn to_json(markdown: &str) -> Value {
        serde_json::to_value(notionmark::markdown_to_notion(markdown)).expect("Should serialize")
    }

    #[test]
    fn scenario_shape() {
        // act
        let json = to_json(super::SCENARIO);

        // assert
        assert_eq!(json[0]["object"], "block");
        assert_eq!(json[0]["type"], "heading_1");
        assert_eq!(json[0]["heading_1"]["rich_text"][1]["text"]["content"], "bold");
        assert_eq!(json[0]["heading_1"]["rich_text"][1]["annotations"]["bold"], true);
        assert_eq!(json[1]["heading_1"]["is_toggleable"], true);
        assert_eq!(json[1]["heading_1"]["children"][0]["type"], "paragraph");
        assert_eq!(
            json[3]["audio"],
            json!({
                "type": "external",
                "external": { "url": "https://cdn.soundcloud.com/audio.mp3" }
            })
        );
        assert_eq!(
            json[4]["paragraph"]["rich_text"][0]["text"]["link"]["url"],
            "https://notion.so"
        );
    }

    #[test]
    fn callout_shape() {
        // act
        let json = to_json("> [!warning] Careful\n> really");

        // assert
        assert_eq!(json[0]["type"], "callout");
        assert_eq!(json[0]["callout"]["icon"], json!({ "type": "emoji", "emoji": "⚠️" }));
        assert_eq!(json[0]["callout"]["color"], "yellow_background");
    }

    #[test]
    fn table_shape() {
        // act
        let json = to_json("| a | b |\n| --- | --- |\n| 1 | 2 |");

        // assert
        let table = &json[0]["table"];
        assert_eq!(table["table_width"], 2);
        assert_eq!(table["has_column_header"], true);
        assert_eq!(table["children"][1]["type"], "table_row");
        assert_eq!(
            table["children"][1]["table_row"]["cells"][1][0]["text"]["content"],
            "2"
        );
    }

    #[test]
    fn blocks_read_back() {
        // arrange
        let blocks = notionmark::markdown_to_notion(super::SCENARIO);

        // act
        let json = serde_json::to_string(&blocks).expect("Should serialize");
        let back: Vec<notionmark::NotionBlock> =
            serde_json::from_str(&json).expect("Should deserialize");

        // assert
        assert_eq!(back, blocks);
    }
}
