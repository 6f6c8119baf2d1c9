//! 爬虫过滤性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hitcounter::config::HitsConfig;
use hitcounter::hits::BotFilter;
use std::hint::black_box;

const USER_AGENTS: &[(&str, &str)] = &[
    (
        "chrome",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    (
        "googlebot",
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    ),
    ("whatsapp", "WhatsApp/2.23.20.0 A"),
    ("empty", ""),
];

fn bench_default_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("bot_filter/default_patterns");
    let filter = BotFilter::from_config(&HitsConfig::default());

    for (name, ua) in USER_AGENTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), ua, |b, ua| {
            b.iter(|| filter.is_bot(black_box(ua)));
        });
    }

    group.finish();
}

fn bench_pattern_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("bot_filter/pattern_count");
    let ua = USER_AGENTS[0].1;

    // 不匹配时需要遍历全部模式
    for count in [12usize, 100, 1000] {
        let patterns: Vec<String> = (0..count).map(|i| format!("crawler-{}", i)).collect();
        let filter = BotFilter::new(&patterns);
        group.bench_with_input(BenchmarkId::from_parameter(count), &filter, |b, filter| {
            b.iter(|| filter.is_bot(black_box(ua)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_default_patterns, bench_pattern_count);
criterion_main!(benches);
