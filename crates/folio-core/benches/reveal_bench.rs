#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use folio_core::memory::{MemoryElement, MemoryPage};
use folio_core::{PageConfig, PageController};
use std::hint::black_box;

fn page_with_items(count: usize) -> MemoryPage {
    let mut page = MemoryPage::new(900.0);
    page.push(MemoryElement::new("div").id("orderCounter"));
    page.push(MemoryElement::new("span").id("orderCount").text("0"));
    for category in ["all", "drinks", "mains"] {
        page.push(
            MemoryElement::new("button")
                .class("nav-btn")
                .attr("data-category", category),
        );
    }
    for i in 0..count {
        let category = if i % 2 == 0 { "drinks" } else { "mains" };
        let item = page.push(
            MemoryElement::new("div")
                .class("menu-item")
                .attr("data-category", category)
                .top(i as f64 * 120.0),
        );
        page.push_child(
            item,
            MemoryElement::new("button").class("order-btn").text("Review"),
        );
    }
    page
}

fn bench_scroll_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("folio/reveal");

    for count in [32usize, 256] {
        group.bench_function(format!("scroll_through_{count}_items"), |b| {
            b.iter(|| {
                let mut controller =
                    PageController::mount(page_with_items(count), PageConfig::default())
                        .expect("bench page should mount");
                let mut revealed = 0;
                for _ in 0..count / 4 {
                    controller.view_mut().scroll_by(480.0);
                    revealed += controller.on_scroll();
                }
                black_box(revealed);
            });
        });
    }

    group.finish();
}

fn bench_filter_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("folio/filter");
    group.bench_function("toggle_256_items", |b| {
        let mut controller = PageController::mount(page_with_items(256), PageConfig::default())
            .expect("bench page should mount");
        b.iter(|| {
            black_box(controller.on_filter_select("drinks"));
            black_box(controller.on_filter_select("all"));
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scroll_reveal, bench_filter_toggle);
criterion_main!(benches);
