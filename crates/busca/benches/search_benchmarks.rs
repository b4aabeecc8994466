use busca::{Catalog, FieldValue, Filter, Record, Schema, SearchQuery};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::borrow::Cow;

struct Item {
    id: String,
    name: String,
    group: String,
    forms: Vec<String>,
}

impl Record for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "group" => Some(FieldValue::Text(&self.group)),
            "forms" => Some(FieldValue::List(&self.forms)),
            _ => None,
        }
    }
}

fn build_catalog(size: usize) -> Catalog<Item> {
    let groups = ["hipertensão", "diabetes", "asma", "dislipidemia"];
    let items = (0..size)
        .map(|i| Item {
            id: format!("item-{i}"),
            name: format!("Composto Genérico {i} {} mg", (i % 8 + 1) * 10),
            group: groups[i % groups.len()].to_string(),
            forms: vec!["comprimido".to_string(), format!("cápsula {} mg", i % 50)],
        })
        .collect();

    Catalog::new(
        items,
        Schema::new()
            .weighted_field("name", 3)
            .field("group")
            .field("forms"),
    )
    .expect("unique ids")
}

fn bench_search(c: &mut Criterion) {
    let catalog = build_catalog(5_000);

    c.bench_function("search_two_tokens", |b| {
        let query = SearchQuery::new("composto 20 mg");
        b.iter(|| black_box(catalog.search(black_box(&query)).len()))
    });

    c.bench_function("search_filtered_browse", |b| {
        let query = SearchQuery::new("").with_filter(Filter::equals("group", "diabetes"));
        b.iter(|| black_box(catalog.search(black_box(&query)).len()))
    });

    c.bench_function("catalog_build_5000", |b| {
        b.iter(|| black_box(build_catalog(5_000).len()))
    });
}

criterion_group!(search_benches, bench_search);
criterion_main!(search_benches);
