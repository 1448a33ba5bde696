use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roomcast::room::{ClientHandle, Room};

fn bench_broadcast_fan_out(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let room = Room::new("bench");

    // Keep receivers alive so every send succeeds.
    let mut receivers = Vec::new();
    rt.block_on(async {
        for i in 0..100 {
            let (handle, rx) = ClientHandle::channel();
            room.join(format!("peer-{i}"), handle).await;
            receivers.push(rx);
        }
    });

    c.bench_function("broadcast_100_members", |b| {
        b.iter(|| {
            rt.block_on(room.broadcast_text(black_box("alice hello everyone")));
        })
    });
}

fn bench_join_leave_churn(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let room = Room::new("bench");

    c.bench_function("join_leave_churn", |b| {
        b.iter(|| {
            rt.block_on(async {
                let (handle, _rx) = ClientHandle::channel();
                room.join(black_box("churn"), handle).await;
                room.leave(black_box("churn")).await;
            });
        })
    });
}

criterion_group!(benches, bench_broadcast_fan_out, bench_join_leave_churn);
criterion_main!(benches);
