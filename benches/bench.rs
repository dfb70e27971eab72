use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mpeg2ts_header::packet::Packet;
use mpeg2ts_header::pes::PesHeader;

const PACKET_COUNT: usize = 10_000;

// PCR-bearing packets, each followed by a PES header with PTS and DTS
fn make_stream() -> Vec<u8> {
    let mut buf = Vec::with_capacity(Packet::SIZE * PACKET_COUNT);
    for i in 0..PACKET_COUNT {
        let mut pk = [0xffu8; Packet::SIZE];
        pk[0] = Packet::SYNC_BYTE;
        pk[1] = 0x41;
        pk[2] = 0x00;
        pk[3] = 0x30 | (i & 0xf) as u8;
        pk[4] = 7;
        pk[5] = 0x50;
        pk[6..12].copy_from_slice(&[0, 0, (i >> 8) as u8, i as u8, 0x7e, 0]);
        pk[12..31].copy_from_slice(&[
            0x00, 0x00, 0x01, 0xe0, 0x00, 0x00, 0x80, 0xc0, 0x0a, 0x31, 0x00, 0x05, 0xbf, 0x21,
            0x11, 0x00, 0x05, 0xa3, 0xb1,
        ]);
        buf.extend_from_slice(&pk[..]);
    }
    buf
}

fn decode(c: &mut Criterion) {
    let buf = make_stream();
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function("packets", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for chunk in buf.chunks_exact(Packet::SIZE) {
                let pk = Packet::try_new(chunk).unwrap();
                if let Ok(Some(af)) = pk.adaptation_field() {
                    if let Ok(pcr) = af.pcr() {
                        total = total.wrapping_add(pcr.value());
                    }
                }
                if let Some(payload) = pk.payload() {
                    if let Ok(header) = PesHeader::from_bytes(payload) {
                        if let (Ok(pts), Ok(dts)) = (header.pts(), header.dts()) {
                            total = total.wrapping_add(pts.value() ^ dts.value());
                        }
                    }
                }
            }
            black_box(total)
        })
    });
    group.finish();
}

criterion_group!(benches, decode);
criterion_main!(benches);
