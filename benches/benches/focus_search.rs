// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_keyboard::overlap;
use understory_keyboard::view::{
    Container, TextField, View, editing_control_at, find_focus_target,
};

/// `rows` forms of `fields` fields each; the last field of the last form is focused.
fn gen_forms(rows: usize, fields: usize) -> Rc<dyn View> {
    let form_height = 40.0 * fields as f64;
    let mut root = Container::new(Rect::new(0.0, 0.0, 400.0, rows as f64 * form_height));
    for r in 0..rows {
        let y = r as f64 * form_height;
        let mut form = Container::new(Rect::new(0.0, y, 400.0, y + form_height));
        for f in 0..fields {
            let fy = f as f64 * 40.0;
            let field = TextField::new(Rect::new(10.0, fy, 390.0, fy + 30.0));
            if r + 1 == rows && f + 1 == fields {
                field.focus();
            }
            form = form.with_subview(Rc::new(field));
        }
        root = root.with_subview(Rc::new(form));
    }
    Rc::new(root)
}

/// A chain of `depth` nested containers around one focused field.
fn gen_chain(depth: usize) -> Rc<dyn View> {
    let field = TextField::new(Rect::new(0.0, 0.0, 100.0, 30.0));
    field.focus();
    let mut node: Rc<dyn View> = Rc::new(field);
    for _ in 0..depth {
        node = Rc::new(Container::new(Rect::new(0.0, 1.0, 400.0, 800.0)).with_subview(node));
    }
    node
}

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("focus_wide");
    for &rows in &[8usize, 32, 128] {
        let root = gen_forms(rows, 8);
        group.throughput(Throughput::Elements((rows * 8) as u64));
        group.bench_function(format!("find_focus_rows{}", rows), |b| {
            b.iter(|| black_box(find_focus_target(&*root).map(|t| t.frame.y1)));
        });
        group.bench_function(format!("editing_control_miss_rows{}", rows), |b| {
            b.iter(|| black_box(editing_control_at(&*root, Point::new(5.0, 5.0)).is_some()));
        });
    }
    group.finish();
}

fn bench_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("focus_deep");
    for &depth in &[16usize, 128, 512] {
        let root = gen_chain(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("find_focus_depth{}", depth), |b| {
            b.iter(|| black_box(find_focus_target(&*root).map(|t| t.frame.y1)));
        });
    }
    group.finish();
}

fn bench_overlap(c: &mut Criterion) {
    let keyboard = Rect::new(0.0, 480.0, 400.0, 780.0);
    c.bench_function("overlap_compute", |b| {
        b.iter(|| {
            black_box(overlap::compute(
                black_box(keyboard),
                black_box(Some(500.0)),
                black_box(Some(800.0)),
                16.0,
            ))
        });
    });
}

criterion_group!(benches, bench_wide, bench_deep, bench_overlap);
criterion_main!(benches);
