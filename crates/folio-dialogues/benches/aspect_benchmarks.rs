//! Benchmarks for the embed size constraint and the share dialogue update.
//!
//! `update()` runs after every field change in the dialogue, so the full
//! recomputation is measured alongside the constraint math.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_core::config::FolioConfig;
use folio_dialogues::aspect::{parse_dimension, AspectConstraint};
use folio_dialogues::providers::{FocusLog, MemoryClipboard, MemoryViewer, RequiredStatement};
use folio_dialogues::{ShareCollaborators, ShareDialogue};

fn bench_constraint(c: &mut Criterion) {
    let constraint = AspectConstraint::default();

    c.bench_function("derive_height_from_width_sweep", |b| {
        b.iter(|| {
            for width in (0..10_000_i64).step_by(37) {
                black_box(constraint.derive_height_from_width(black_box(width)));
            }
        })
    });

    c.bench_function("derive_width_from_height_sweep", |b| {
        b.iter(|| {
            for height in (0..8_000_i64).step_by(29) {
                black_box(constraint.derive_width_from_height(black_box(height)));
            }
        })
    });

    c.bench_function("parse_dimension_mixed", |b| {
        let inputs = ["640", " 1024 ", "300.5", "", "wide", "-20", "99999999999"];
        b.iter(|| {
            for input in inputs {
                black_box(parse_dimension(black_box(input)));
            }
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let viewer = Arc::new(MemoryViewer::new());
    viewer.set_share_url(Some("https://example.org/viewer#page=12".into()));
    viewer.set_manifest_url(Some("https://example.org/iiif/manifest.json".into()));
    viewer.set_embed_base_url(Some("https://example.org/embed".into()));
    viewer.set_required_statement(Some(RequiredStatement::new("CC-BY 4.0")));

    let mut config = FolioConfig::default();
    config.share_dialogue.embed_enabled = true;
    config.share_dialogue.share_manifests_enabled = true;

    let collaborators = ShareCollaborators::from_memory(
        viewer,
        Arc::new(MemoryClipboard::new()),
        Arc::new(FocusLog::new()),
    );
    let mut dialogue = ShareDialogue::new(collaborators, &config).expect("valid config");
    dialogue.select_preset("custom");

    c.bench_function("share_dialogue_update", |b| b.iter(|| dialogue.update()));

    c.bench_function("share_dialogue_edit_width", |b| {
        b.iter(|| dialogue.edit_width(black_box("1234")))
    });
}

criterion_group!(benches, bench_constraint, bench_update);
criterion_main!(benches);
