use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

use grimhall_choreo_core::{
    Clip, Config, Easing, Engine, Keyframe, ShotBinding, TargetResolver, Value,
};

struct MapResolver(HashMap<String, String>);
impl TargetResolver for MapResolver {
    fn resolve(&mut self, path: &str) -> Option<String> {
        self.0.get(path).cloned()
    }
}

fn mk_clip(i: usize) -> Clip {
    Clip::new(
        &format!("clip{i}"),
        &format!("hero/bone{i}"),
        (0..=30)
            .step_by(5)
            .map(|f| Keyframe {
                frame: f,
                value: Value::Float(f as f32 * 0.1),
            })
            .collect(),
        Easing::EaseInOut,
    )
}

fn bench_update(c: &mut Criterion) {
    let mut eng = Engine::new(Config::default());
    let mut map = HashMap::new();
    let mut bindings = Vec::new();
    for i in 0..24 {
        let id = eng.load_clip(mk_clip(i));
        map.insert(format!("hero/bone{i}"), format!("h:{i}"));
        bindings.push(ShotBinding::new(id));
    }
    eng.prebind(&mut MapResolver(map));
    eng.play_loop(&bindings, 1.0);

    c.bench_function("engine_update_24_clips", |b| {
        b.iter(|| {
            let out = eng.update(1.0);
            criterion::black_box(out.changes.len());
        })
    });
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
