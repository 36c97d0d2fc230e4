//! Integration tests for the HTML deck builder.
//!
//! Each test writes a spec into a temporary directory and builds the deck
//! next to it.

use deckgen::{build_deck, BuildOptions, Error};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A minimal PNG header, enough for a file the builder copies verbatim.
const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x10\0\0\0\x10\x08\x06\0\0\0";

fn write_spec(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn slide_files(out: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(out.join("slides"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

const SPEC: &str = r#"
output:
  web_dir: unused
slides:
  - type: cover
    title: Quarterly Review
    subtitle: Operations
    tagline: Q3
  - type: agenda
    items: [Results, Outlook, Questions]
  - type: section
    title: Results
  - type: two-column
    title: Then and now
    left: [Manual checks]
    right: [Automated checks]
  - type: checklist
    title: Done
    items: [Audit, Training]
  - type: qna
"#;

#[test]
fn test_builds_one_file_per_slide() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(tmp.path(), "deck.yml", SPEC);
    let out = tmp.path().join("web");

    let summary = build_deck(&BuildOptions::new(&spec).with_out(&out)).unwrap();

    assert_eq!(summary.slides.len(), 6);
    assert_eq!(
        slide_files(&out),
        vec![
            "slide01.html",
            "slide02.html",
            "slide03.html",
            "slide04.html",
            "slide05.html",
            "slide06.html"
        ]
    );

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    let positions: Vec<usize> = summary
        .slides
        .iter()
        .map(|s| index.find(&format!("\"{}\"", s.file)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(index.contains("<title>Quarterly Review</title>"));

    let cover = fs::read_to_string(out.join("slides/slide01.html")).unwrap();
    assert!(cover.contains("Quarterly Review"));
    assert!(cover.contains("Operations"));

    let qna = fs::read_to_string(out.join("slides/slide06.html")).unwrap();
    assert!(qna.contains("Q&amp;A"));
}

#[test]
fn test_deck_json_copies_spec() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(tmp.path(), "deck.yml", SPEC);
    let out = tmp.path().join("web");
    build_deck(&BuildOptions::new(&spec).with_out(&out)).unwrap();

    let text = fs::read_to_string(out.join("deck.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["slides"].as_array().unwrap().len(), 6);
    assert_eq!(json["slides"][0]["title"], "Quarterly Review");
}

#[test]
fn test_output_dir_from_spec() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("from-spec");
    let text = format!(
        "output:\n  web_dir: {}\nslides:\n  - type: qna\n",
        out.display()
    );
    let spec = write_spec(tmp.path(), "deck.yaml", &text);

    let summary = build_deck(&BuildOptions::new(&spec)).unwrap();
    assert_eq!(summary.out_dir, out);
    assert!(out.join("slides/slide01.html").is_file());
}

#[test]
fn test_missing_output_dir() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(tmp.path(), "deck.yml", "slides:\n  - type: qna\n");
    let err = build_deck(&BuildOptions::new(&spec)).unwrap_err();
    assert!(matches!(err, Error::MissingOutputDir));
}

#[test]
fn test_existing_output_needs_force() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(tmp.path(), "deck.yml", SPEC);
    let out = tmp.path().join("web");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.txt"), "old").unwrap();

    let err = build_deck(&BuildOptions::new(&spec).with_out(&out)).unwrap_err();
    assert!(matches!(err, Error::OutputExists(_)));
    assert!(err.to_string().contains("--force"));
    assert_eq!(fs::read_to_string(out.join("stale.txt")).unwrap(), "old");
    assert!(!out.join("index.html").exists());

    build_deck(&BuildOptions::new(&spec).with_out(&out).with_force(true)).unwrap();
    assert!(!out.join("stale.txt").exists());
    assert!(out.join("index.html").is_file());
    assert_eq!(slide_files(&out).len(), 6);
}

#[test]
fn test_unknown_type_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(
        tmp.path(),
        "deck.yml",
        "slides:\n  - type: cover\n    title: Hi\n  - type: timeline\n",
    );
    let out = tmp.path().join("web");

    let err = build_deck(&BuildOptions::new(&spec).with_out(&out)).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported slide type \"timeline\" on slide 2");
    assert!(!out.exists());
}

#[test]
fn test_missing_type_is_reported_by_position() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(
        tmp.path(),
        "deck.json",
        r#"{"slides": [{"type": "qna"}, {"title": "No type"}]}"#,
    );
    let err = build_deck(&BuildOptions::new(&spec).with_out(tmp.path().join("web"))).unwrap_err();
    assert!(matches!(err, Error::MissingSlideType(2)));
}

#[test]
fn test_shared_chart_copied_once() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("charts")).unwrap();
    fs::write(tmp.path().join("charts/load.png"), PNG).unwrap();
    let spec = write_spec(
        tmp.path(),
        "deck.yml",
        r#"
slides:
  - type: example
    title: Line 1
    chart_image: charts/load.png
    data_pairs: [[Peak, 120 t/h]]
  - type: example
    title: Line 2
    chart_image: ./charts/load.png
"#,
    );
    let out = tmp.path().join("web");

    let summary = build_deck(&BuildOptions::new(&spec).with_out(&out)).unwrap();
    assert_eq!(summary.assets, 1);

    let assets: Vec<_> = fs::read_dir(out.join("assets")).unwrap().collect();
    assert_eq!(assets.len(), 1);
    assert_eq!(fs::read(out.join("assets/load.png")).unwrap(), PNG);

    for file in ["slide01.html", "slide02.html"] {
        let html = fs::read_to_string(out.join("slides").join(file)).unwrap();
        assert!(html.contains("src=\"../assets/load.png\""), "{}", file);
    }
    let first = fs::read_to_string(out.join("slides/slide01.html")).unwrap();
    assert!(first.contains("Peak → 120 t/h"));
}

#[test]
fn test_missing_chart_fails_before_writing() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(
        tmp.path(),
        "deck.yml",
        "slides:\n  - type: example\n    chart_image: charts/none.png\n",
    );
    let out = tmp.path().join("web");

    let err = build_deck(&BuildOptions::new(&spec).with_out(&out)).unwrap_err();
    assert!(matches!(err, Error::AssetNotFound(_)));
    assert!(!out.exists());
}

#[test]
fn test_custom_theme() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(tmp.path(), "deck.yml", "slides:\n  - type: section\n    title: Next\n");
    let theme = write_spec(
        tmp.path(),
        "brand.json",
        r##"{"name": "Brand", "font": "Georgia", "colors": {"primary": "#112233", "accentBlue": "#445566", "lightGray": "#EEEEEE", "charcoal": "#222222", "white": "#FFFFFF"}}"##,
    );
    let out = tmp.path().join("web");

    build_deck(&BuildOptions::new(&spec).with_out(&out).with_theme(&theme)).unwrap();
    let html = fs::read_to_string(out.join("slides/slide01.html")).unwrap();
    assert!(html.contains("background: #112233; color: #FFFFFF;"));
    assert!(html.contains("font-family: Georgia"));
}

#[test]
fn test_empty_deck() {
    let tmp = TempDir::new().unwrap();
    let spec = write_spec(tmp.path(), "deck.yml", "slides: []\n");
    let out = tmp.path().join("web");

    let summary = build_deck(&BuildOptions::new(&spec).with_out(&out)).unwrap();
    assert!(summary.slides.is_empty());
    assert!(slide_files(&out).is_empty());
    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("<title>Valmet Deck</title>"));
}
