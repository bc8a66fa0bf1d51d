//! Benchmarks for relayout layout performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks lay out synthetic pages: a running header, a title,
//! body paragraphs and a small table per page.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relayout::{render, BBox, LayoutEngine, LayoutOptions, Page, RenderOptions};

const TITLES: [&str; 4] = ["MONTAGE", "BRANCHEMENT", "ENTRETIEN", "GARANTIE"];
const PARTS: [&str; 6] = ["Vis", "Cheville", "Support", "Platine", "Capot", "Joint"];

/// Creates a synthetic page with a header, a title, body text and a table.
fn create_test_page(number: u32) -> Page {
    let mut page = Page::a4(number)
        .with_text(BBox::new(40.0, 20.0, 400.0, 30.0), "Notice de montage", 8.0)
        .with_text(
            BBox::new(40.0, 160.0, 400.0, 176.0),
            TITLES[number as usize % TITLES.len()],
            14.0,
        );

    let mut y = 190.0;
    for line in 0..12 {
        page = page.with_text(
            BBox::new(40.0, y, 550.0, y + 10.0),
            format!("Ligne {} du paragraphe de la page {} avec du texte courant", line, number),
            9.0,
        );
        y += 14.0;
    }

    for (row, part) in PARTS.iter().enumerate() {
        let size = if row == 0 { 11.0 } else { 9.0 };
        page = page
            .with_text(BBox::new(40.0, y, 180.0, y + 10.0), *part, size)
            .with_text(BBox::new(200.0, y, 350.0, y + 10.0), "Acier", size)
            .with_text(BBox::new(370.0, y, 550.0, y + 10.0), "Fournie", size);
        y += 14.0;
    }

    page.with_image(BBox::new(40.0, y + 10.0, 300.0, y + 150.0), format!("p{}-img0", number))
}

fn create_test_pages(page_count: u32) -> Vec<Page> {
    (1..=page_count).map(create_test_page).collect()
}

/// Benchmark single-document layout at various sizes.
fn bench_layout(c: &mut Criterion) {
    let engine = LayoutEngine::new(LayoutOptions::default()).unwrap();
    let mut group = c.benchmark_group("layout");

    for page_count in [1, 10, 50].iter() {
        let pages = create_test_pages(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let _ = engine.extract_pages("bench", black_box(pages.clone()));
            });
        });
    }

    group.finish();
}

/// Benchmark parallel batch layout.
fn bench_batch(c: &mut Criterion) {
    let engine = LayoutEngine::new(LayoutOptions::default()).unwrap();
    let docs: Vec<Vec<Page>> = (0..16).map(|_| create_test_pages(10)).collect();

    c.bench_function("batch_16x10_pages", |b| {
        b.iter(|| {
            let sources = docs
                .iter()
                .enumerate()
                .map(|(i, pages)| relayout::VecPageSource::new(format!("doc-{}", i), pages.clone()))
                .collect();
            let _ = engine.extract_batch(black_box(sources));
        });
    });
}

/// Benchmark rendering a reconstructed document.
fn bench_render(c: &mut Criterion) {
    let engine = LayoutEngine::new(LayoutOptions::default()).unwrap();
    let doc = engine.extract_pages("bench", create_test_pages(10)).unwrap();
    let options = RenderOptions::default();

    c.bench_function("render_markdown", |b| {
        b.iter(|| render::to_markdown(black_box(&doc), &options).unwrap());
    });

    c.bench_function("render_html", |b| {
        b.iter(|| render::to_html(black_box(&doc), &options).unwrap());
    });
}

criterion_group!(benches, bench_layout, bench_batch, bench_render);
criterion_main!(benches);
