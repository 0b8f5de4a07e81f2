//! Snapshot tests for terminal rendering.

use drybones::formats::FormatRegistry;
use drybones::parsing::parse_document;
use drybones::rendering::{render_line, render_lines, RenderOptions};
use drybones::testing::{line_from_body, sample_text};
use drybones::ParseOptions;
use insta::assert_snapshot;

fn sample_document() -> drybones::LinesAndResidues {
    parse_document(&sample_text(), ParseOptions::default()).unwrap()
}

#[test]
fn test_sample_at_full_width() {
    let document = sample_document();
    let text = render_lines(document.iter_lines(), &RenderOptions::default());
    assert_snapshot!(text, @r"
    N:           Kaikai 1
    Baseline:    kati    | anu
    Parse:       kat-i   | anu
    Gloss:       dog-NOM | run
    Translation: the dog runs

    N:           Kaikai 2
    Baseline:    anu
    Translation: it runs
    ");
}

#[test]
fn test_narrow_terminal_splits_columns() {
    let document = sample_document();
    let line = document.find("Kaikai 1").unwrap();
    let options = RenderOptions::default().with_target_width(20);
    assert_snapshot!(render_line(line, &options).join("\n"), @r"
    N:           Kaikai 1
    Baseline:    kati
    Parse:       kat-i
    Gloss:       dog-NOM
    Translation: the dog runs
    - - - - - - - -
    Baseline:    anu
    Parse:       anu
    Gloss:       run
    Translation: the dog runs
    ");
}

#[test]
fn test_pretty_format_matches_renderer() {
    let document = sample_document();
    let registry = FormatRegistry::with_render_options(RenderOptions::default());
    let pretty = registry.serialize(&document, "pretty").unwrap();
    assert_eq!(
        pretty,
        render_lines(document.iter_lines(), &RenderOptions::default())
    );
}

#[test]
fn test_wide_and_combining_characters() {
    let line = line_from_body("N: A 1\nBaseline: \u{14b}\u{28a}\u{301} \u{672c} x\nGloss: 1SG book Q");
    let rendered = render_line(&line, &RenderOptions::default());
    assert_eq!(
        rendered,
        vec![
            "N:        A 1".to_string(),
            "Baseline: \u{14b}\u{28a}\u{301}  | \u{672c}   | x".to_string(),
            "Gloss:    1SG | book | Q".to_string(),
        ]
    );
}
