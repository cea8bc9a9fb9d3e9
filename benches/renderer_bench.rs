// Renderer Benchmarks
// Performance benchmarks for the per-scanline rendering path

use calcboy::core::{LineSink, Scanline, FIX_PALETTE_LEN, LCD_HEIGHT, LCD_WIDTH};
use calcboy::display::{swizzle_cgb, FrameBuffer, PaletteTable, Renderer, ScaleMode};
use calcboy::save::{Codec, Lz4Codec};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Scanlines with a repeating shade pattern
fn test_lines() -> Vec<[u8; LCD_WIDTH]> {
    (0..LCD_HEIGHT)
        .map(|line| {
            let mut pixels = [0u8; LCD_WIDTH];
            for (x, pixel) in pixels.iter_mut().enumerate() {
                *pixel = ((x + line) / 4 % 4) as u8;
            }
            pixels
        })
        .collect()
}

/// Benchmark a full frame (144 scanlines) for each scaling strategy
fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_frame");
    let lines = test_lines();

    for mode in [
        ScaleMode::Centered,
        ScaleMode::Maximized2x,
        ScaleMode::MaximizedRatio,
    ] {
        group.bench_function(mode.name(), |b| {
            let mut renderer = Renderer::new(PaletteTable::default(), mode);
            let mut frame_buffer = FrameBuffer::new();

            b.iter(|| {
                let mut sink = renderer.bind(&mut frame_buffer);
                for (line, pixels) in lines.iter().enumerate() {
                    sink.draw_line(Scanline::indexed(pixels, line as u8));
                }
                black_box(frame_buffer.row(0)[0]);
            });
        });
    }

    group.bench_function("skipped", |b| {
        let mut renderer = Renderer::default();
        renderer.set_skip_next_frame(true);
        let mut frame_buffer = FrameBuffer::new();

        b.iter(|| {
            let mut sink = renderer.bind(&mut frame_buffer);
            for (line, pixels) in lines.iter().enumerate() {
                sink.draw_line(Scanline::indexed(pixels, line as u8));
            }
        });
    });

    group.finish();
}

/// Benchmark the color-mode path
fn bench_color_mode(c: &mut Criterion) {
    let lines = test_lines();
    let mut table = [0u16; FIX_PALETTE_LEN];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = (i as u16) * 0x0209;
    }

    c.bench_function("color_mode_frame", |b| {
        let mut renderer = Renderer::default();
        let mut frame_buffer = FrameBuffer::new();

        b.iter(|| {
            let mut sink = renderer.bind(&mut frame_buffer);
            for (line, pixels) in lines.iter().enumerate() {
                sink.draw_line(Scanline::extended(pixels, line as u8, &table));
            }
        });
    });

    c.bench_function("swizzle_cgb", |b| {
        b.iter(|| {
            let mut acc = 0u16;
            for color in 0..0x8000u16 {
                acc ^= swizzle_cgb(black_box(color));
            }
            black_box(acc)
        });
    });
}

/// Benchmark save compression at a typical cartridge RAM size
fn bench_save_codec(c: &mut Criterion) {
    let mut data = vec![0xFFu8; 32 * 1024];
    for (i, byte) in data.iter_mut().enumerate().step_by(7) {
        *byte = (i % 251) as u8;
    }
    let compressed = Lz4Codec.compress(&data, data.len() * 2).unwrap();

    c.bench_function("save_compress_32k", |b| {
        b.iter(|| black_box(Lz4Codec.compress(black_box(&data), 64 * 1024).unwrap()));
    });

    c.bench_function("save_decompress_32k", |b| {
        let mut out = vec![0u8; data.len()];
        b.iter(|| black_box(Lz4Codec.decompress(black_box(&compressed), &mut out).unwrap()));
    });
}

criterion_group!(benches, bench_full_frame, bench_color_mode, bench_save_codec);
criterion_main!(benches);
