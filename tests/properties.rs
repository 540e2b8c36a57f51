use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use notionmark::{data::equivalent_trees, notion::plain_text, parse_rich_text};

const WORDS: [&str; 10] = [
    "alpha", "beta", "gamma", "delta", "notion", "block", "rust", "text", "42", "émoji",
];
const ROUNDS: u64 = 200;

fn words(rng: &mut StdRng, count: std::ops::RangeInclusive<usize>) -> String {
    let count = rng.gen_range(count);
    (0..count)
        .map(|_| *WORDS.choose(rng).expect("Words are not empty"))
        .join(" ")
}

/// Inline fragment along with the text it should render as
fn fragment(rng: &mut StdRng) -> (String, String) {
    let text = words(rng, 1..=2);
    let markup = match rng.gen_range(0..6) {
        0 => format!("**{text}**"),
        1 => format!("*{text}*"),
        2 => format!("`{text}`"),
        3 => format!("~~{text}~~"),
        4 => format!("[{text}](https://example.com/{})", text.replace(' ', "-")),
        _ => text.clone(),
    };
    (markup, text)
}

#[test]
fn matched_delimiters_never_leak() {
    for seed in 0..ROUNDS {
        // arrange
        let mut rng = StdRng::seed_from_u64(seed);
        let fragments: Vec<_> = (0..rng.gen_range(1..6)).map(|_| fragment(&mut rng)).collect();
        let input = fragments.iter().map(|(markup, _)| markup).join(" ");
        let expected = fragments.iter().map(|(_, text)| text).join(" ");

        // act
        let runs = parse_rich_text(&input);

        // assert
        let output = plain_text(&runs);
        assert_eq!(output, expected, "Rendering {input:?}");
        assert!(
            !output.contains(['*', '`', '~', '[', ']', '(', ')']),
            "Delimiters left in {output:?}"
        );
        assert!(!output.contains("https://"), "Url leaked from {input:?}");
    }
}

fn list(rng: &mut StdRng) -> String {
    let mut depth = 0;
    (0..rng.gen_range(1..6))
        .map(|i| {
            if i > 0 {
                depth = rng.gen_range(0..=depth + 1);
            }
            let marker = *["-", "*", "+", "1.", "2)", "- [ ]", "- [x]"]
                .choose(rng)
                .expect("Markers are not empty");
            format!("{}{marker} {}", "  ".repeat(depth), words(rng, 1..=3))
        })
        .join("\n")
}

fn table(rng: &mut StdRng) -> String {
    let width = rng.gen_range(2..5);
    let rows: Vec<Vec<String>> = (0..rng.gen_range(2..5))
        .map(|_| (0..width).map(|_| words(rng, 1..=2)).collect())
        .collect();
    match rng.gen_range(0..3) {
        0 => rows.iter().map(|row| row.join(",")).join("\n"),
        1 => rows.iter().map(|row| row.join("\t")).join("\n"),
        _ => rows
            .iter()
            .map(|row| format!("| {} |", row.join(" | ")))
            .join("\n"),
    }
}

fn block(rng: &mut StdRng) -> String {
    match rng.gen_range(0..11) {
        0 => format!("{} {}", "#".repeat(rng.gen_range(1..=3)), words(rng, 1..=4)),
        1 => list(rng),
        2 => format!("> {}", words(rng, 1..=5)),
        3 => std::iter::once(format!("> {}:", words(rng, 1..=2)))
            .chain((0..rng.gen_range(1..4)).map(|_| format!("> {}", words(rng, 1..=3))))
            .join("\n"),
        4 => format!(
            "> {} {}\n> {}",
            "#".repeat(rng.gen_range(1..=3)),
            words(rng, 1..=2),
            words(rng, 1..=3)
        ),
        5 => format!(
            "> [!{}] {}\n> {}",
            ["note", "tip", "warning", "custom"]
                .choose(rng)
                .expect("Labels are not empty"),
            words(rng, 1..=3),
            words(rng, 1..=3)
        ),
        6 => format!("```rust\n{}\n{}\n```", words(rng, 1..=3), words(rng, 0..=3)),
        7 => "---".to_owned(),
        8 => table(rng),
        9 => ["https://example.com/a.mp3", "https://example.com/a.pdf", "https://example.com/a.png", "https://example.com/page"]
            .choose(rng)
            .expect("Urls are not empty")
            .to_string(),
        _ => (0..rng.gen_range(1..4))
            .map(|_| fragment(rng).0)
            .join(" "),
    }
}

#[test]
fn random_documents_roundtrip() {
    let _ = env_logger::builder().is_test(true).try_init();
    for seed in 0..ROUNDS {
        // arrange
        let mut rng = StdRng::seed_from_u64(seed);
        let input = (0..rng.gen_range(1..8)).map(|_| block(&mut rng)).join("\n\n");
        let parsed = notionmark::parse(&input);

        // act
        let printed = notionmark::print(&parsed);
        let reparsed = notionmark::parse(&printed);

        // assert
        if !equivalent_trees(&parsed, &reparsed) {
            text_diff::print_diff(&input, &printed, "\n");
            panic!("Seed {seed} changed after printing:\n{parsed:#?}\nvs\n{reparsed:#?}");
        }
    }
}
