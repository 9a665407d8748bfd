//! Property tests over generated documents.

use std::fmt::Write;

use mdextra::{Construct, Extensions, ExtraOptions, MarkdownExtra, normalize_escapes};
use mdextra_renderer::Converter;
use proptest::prelude::*;

fn converter(options: ExtraOptions) -> Converter {
    let mut converter = Converter::sanitizing();
    MarkdownExtra::init(&mut converter, options);
    converter
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..8).prop_map(|words| words.join(" "))
}

/// A piped table and its column count. Body rows vary in width.
fn sized_table() -> impl Strategy<Value = (usize, String)> {
    (1usize..5)
        .prop_flat_map(|columns| {
            (
                prop::collection::vec(word(), columns),
                prop::collection::vec(prop::collection::vec(word(), 1..7), 0..5),
            )
        })
        .prop_map(|(header, rows)| {
            let mut table = format!("| {} |\n|{}\n", header.join(" | "), "---|".repeat(header.len()));
            for row in rows {
                let _ = writeln!(table, "| {} |", row.join(" | "));
            }
            (header.len(), table)
        })
}

fn table() -> impl Strategy<Value = String> {
    sized_table().prop_map(|(_, table)| table)
}

/// A construct the matchers rewrite when it stands on its own.
fn construct() -> impl Strategy<Value = String> {
    prop_oneof![
        table(),
        (word(), sentence()).prop_map(|(lang, body)| format!("```{lang}\n{body}\n```")),
        (word(), sentence()).prop_map(|(term, def)| format!("{term}\n:   {def}")),
        (sentence(), word()).prop_map(|(title, id)| format!("## {title} {{#{id} .section}}")),
    ]
}

/// A construct placed where the baseline treats it as code or raw HTML, and
/// the fenced code matcher does not apply.
fn shielded() -> impl Strategy<Value = String> {
    let context = prop_oneof![
        Just(("~~~\n", "\n~~~")),
        Just(("````\n", "\n````")),
        Just(("<div>\n", "\n</div>")),
        Just(("<pre>\n", "\n</pre>")),
    ];
    prop_oneof![
        (context, construct()).prop_map(|((open, close), body)| format!("{open}{body}{close}")),
        construct().prop_map(|body| {
            body.lines()
                .map(|line| format!("    {line}"))
                .collect::<Vec<_>>()
                .join("\n")
        }),
    ]
}

fn block() -> impl Strategy<Value = String> {
    prop_oneof![
        sentence(),
        construct(),
        shielded(),
        construct().prop_map(|body| format!("```\n{body}\n```")),
        sentence().prop_map(|text| format!("{text} ~X0X ~XX0XX")),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 0..8).prop_map(|blocks| blocks.join("\n\n"))
}

proptest! {
    #[test]
    fn prop_escape_normalization_idempotent(text in r"[a-z|:\\ \n]{0,64}") {
        let once = normalize_escapes(&text);
        prop_assert_eq!(normalize_escapes(&once), once);
    }

    #[test]
    fn prop_escaped_delimiters_removed(text in r"[a-z|:\\ ]{0,64}") {
        let normalized = normalize_escapes(&text);
        prop_assert!(!normalized.contains(r"\|"));
        prop_assert!(!normalized.contains(r"\:"));
    }

    #[test]
    fn prop_table_rows_match_header_width(
        (columns, table) in sized_table()
    ) {
        let mut converter = converter(
            ExtraOptions::default().with_extensions(Extensions::only([Construct::Tables])),
        );
        let html = converter.make_html(&table).unwrap();

        prop_assert_eq!(html.matches("<th>").count(), columns);
        let body = html.split("</thead>").nth(1).unwrap_or_default();
        for row in body.split("<tr>").skip(1) {
            prop_assert_eq!(row.matches("<td>").count(), columns);
        }
    }

    #[test]
    fn prop_every_placeholder_resolved(
        markdown in document(),
        enabled in prop::sample::subsequence(Construct::ALL.to_vec(), 0..=Construct::ALL.len())
    ) {
        let mut converter = converter(
            ExtraOptions::default().with_extensions(Extensions::only(enabled)),
        );
        let html = converter.make_html(&markdown);

        prop_assert!(html.is_ok());
        let html = html.unwrap();
        prop_assert!(!html.contains("<p>~X"));
        prop_assert!(!html.contains("&lt;p&gt;~X"));
        prop_assert!(!html.contains("~TX"));
    }

    #[test]
    fn prop_shielded_constructs_render_as_baseline(body in shielded()) {
        let mut baseline = Converter::sanitizing();
        let mut extra = converter(ExtraOptions::default());

        prop_assert_eq!(extra.make_html(&body).unwrap(), baseline.make_html(&body).unwrap());
    }

    #[test]
    fn prop_instances_do_not_share_state(first in document(), second in document()) {
        let mut a = converter(ExtraOptions::default());
        let mut b = converter(ExtraOptions::default().with_table_class("other"));

        let before = a.make_html(&first).unwrap();
        b.make_html(&second).unwrap();
        let after = a.make_html(&first).unwrap();

        prop_assert_eq!(before, after);
    }
}

