//! Benchmarks for mixing growing numbers of looped voices.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use trackmix::{
    engine::{mixer::Mixer, voice::Voice},
    Ear, EngineConfig, PlayMode, Track,
};

use crate::BLOCK_SIZES;

const VOICE_COUNTS: &[usize] = &[1, 8, 32];

fn mixer_with_voices(count: usize, rate: f64) -> Mixer {
    let config = EngineConfig::default().initial_volume(0.8);
    let mixer = Mixer::new(&config);
    for n in 0..count {
        // Distinct lengths so voices wrap at different frames
        let track = Track::sine(220.0 * (n + 1) as f64, 0.1, 44_100, 4_410 + 37 * n).unwrap();
        mixer.add_voice(Voice::new(track, PlayMode::Loop));
    }
    mixer.set_freq_scale(rate, Ear::Both);
    mixer
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        for &count in VOICE_COUNTS {
            let mixer = mixer_with_voices(count, 1.0);
            group.bench_with_input(
                BenchmarkId::new(format!("{count}_voices"), size),
                &size,
                |b, _| b.iter(|| mixer.process(black_box(&mut buffer))),
            );

            let mixer = mixer_with_voices(count, 1.37);
            group.bench_with_input(
                BenchmarkId::new(format!("{count}_voices_scaled"), size),
                &size,
                |b, _| b.iter(|| mixer.process(black_box(&mut buffer))),
            );
        }
    }

    group.finish();
}
