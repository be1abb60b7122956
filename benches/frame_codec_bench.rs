//! Performance benchmarks for the SDN frame codec and recognizer.
//!
//! Run with:
//! ```sh
//! cargo bench --bench frame_codec_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sdn_core::{Address, MessageId, NodeType};
use sdn_protocol::{Frame, Payload, Recognizer};
use std::hint::black_box;

fn simple_frame() -> Frame {
    Frame {
        msg_id: MessageId::from(0x02),
        need_ack: false,
        from_node_type: NodeType::ALL,
        to_node_type: NodeType::ALL,
        from_addr: Address::new(0x13, 0x3d, 0xc6),
        to_addr: Address::MASTER,
        payload: Payload::CtrlStop { reserved: 0 },
    }
}

fn complex_frame() -> Frame {
    Frame {
        msg_id: MessageId::from(0x0D),
        need_ack: true,
        from_node_type: NodeType::from(0x08),
        to_node_type: NodeType::ALL,
        from_addr: Address::new(0x13, 0x3d, 0xc6),
        to_addr: Address::MASTER,
        payload: Payload::PostMotorPosition {
            position_pulses: 2403,
            position_percent: 16,
            tilt_percent: 255,
            ip: None,
            tilt_degrees: Some(1200),
        },
    }
}

fn bench_encode_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_simple");
    group.throughput(Throughput::Elements(1));
    let frame = simple_frame();

    group.bench_function("encode_simple_frame", |b| {
        b.iter(|| black_box(black_box(&frame).encode()));
    });
    group.finish();
}

fn bench_encode_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_complex");
    group.throughput(Throughput::Elements(1));
    let frame = complex_frame();

    group.bench_function("encode_complex_frame", |b| {
        b.iter(|| black_box(black_box(&frame).encode()));
    });
    group.finish();
}

fn bench_decode_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_simple");
    group.throughput(Throughput::Elements(1));
    let bytes = simple_frame().encode();

    group.bench_function("decode_simple_frame", |b| {
        b.iter(|| black_box(Frame::try_parse(black_box(&bytes))));
    });
    group.finish();
}

fn bench_decode_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_complex");
    group.throughput(Throughput::Elements(1));
    let bytes = complex_frame().encode();

    group.bench_function("decode_complex_frame", |b| {
        b.iter(|| black_box(Frame::try_parse(black_box(&bytes))));
    });
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    group.throughput(Throughput::Elements(1));
    let frame = complex_frame();

    group.bench_function("roundtrip_complex_frame", |b| {
        b.iter(|| {
            let bytes = black_box(&frame).encode();
            black_box(Frame::try_parse(&bytes));
        });
    });
    group.finish();
}

fn bench_recognizer_clean_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognizer_clean_stream");

    for frame_count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*frame_count as u64));

        let mut stream = Vec::new();
        for _ in 0..*frame_count {
            stream.extend(simple_frame().encode());
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(frame_count),
            &stream,
            |b, stream| {
                b.iter(|| {
                    let mut recognizer = Recognizer::new();
                    let frames = recognizer.add_bytes(black_box(stream));
                    black_box(frames);
                });
            },
        );
    }

    group.finish();
}

fn bench_recognizer_with_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognizer_with_noise");
    group.throughput(Throughput::Elements(1));

    let mut stream = vec![0x11, 0x42, 0x00, 0xAB, 0xCD, 0x00, 0xFF];
    stream.extend(simple_frame().encode());
    stream.extend(vec![0xFF, 0x00, 0x17]);

    group.bench_function("recognize_one_frame_amid_noise", |b| {
        b.iter(|| {
            let mut recognizer = Recognizer::new();
            let frames = recognizer.add_bytes(black_box(&stream));
            black_box(frames);
        });
    });
    group.finish();
}

fn bench_recognizer_byte_at_a_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognizer_byte_at_a_time");
    group.throughput(Throughput::Elements(1));
    let bytes = complex_frame().encode();

    group.bench_function("feed_one_frame_byte_by_byte", |b| {
        b.iter(|| {
            let mut recognizer = Recognizer::new();
            let mut found = None;
            for &byte in &bytes {
                if let Some(frame) = recognizer.add_byte(black_box(byte)) {
                    found = Some(frame);
                }
            }
            black_box(found);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encode_simple,
    bench_encode_complex,
    bench_decode_simple,
    bench_decode_complex,
    bench_roundtrip,
    bench_recognizer_clean_stream,
    bench_recognizer_with_noise,
    bench_recognizer_byte_at_a_time,
);

criterion_main!(benches);
