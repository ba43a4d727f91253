use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ocrfix::desquish::Desquisher;
use ocrfix::oracle::SymSpellDictionary;
use ocrfix::tokenizer::tokenize;
use std::hint::black_box;

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "corn", "field", "well",
    "known", "every", "thing", "some", "where", "under", "stand", "ground", "water", "fall",
    "book", "keeper", "light", "house", "rain", "bow", "sun", "flower", "time", "table",
];

fn dictionary() -> SymSpellDictionary {
    SymSpellDictionary::from_words("en", WORDS.iter().copied())
}

/// A page of text with the usual OCR noise: squished words, stray symbols,
/// numbers and hyphenated line-ends.
fn sample_page(paragraphs: usize) -> String {
    let paragraph = "The quick brown fox jumps over the lazydog. Everything somewhere \
                     under-stands the groundwater, 1834 ~~ the lighthouse keeper's \
                     rainbow (sunflower) timetable; well-known bookkeeper!\n\n";
    paragraph.repeat(paragraphs)
}

fn bench_desquish(c: &mut Criterion) {
    let dict = dictionary();
    let desquisher = Desquisher::new();
    let mut group = c.benchmark_group("desquish");

    for token in ["cornfield", "lighthouse", "bookkeepertimetable", "qwzxkvjq"] {
        group.bench_with_input(BenchmarkId::from_parameter(token), token, |b, token| {
            b.iter(|| desquisher.desquish(black_box(token), &dict))
        });
    }
    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for paragraphs in [1usize, 10, 100] {
        let page = sample_page(paragraphs);
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &page, |b, page| {
            b.iter(|| tokenize(black_box(page)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_desquish, bench_tokenize);
criterion_main!(benches);
