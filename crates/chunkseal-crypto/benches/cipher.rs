use chunkseal_crypto::{derive_key, ChunkCipher, CipherOptions, KdfParams};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

fn cipher() -> ChunkCipher {
    ChunkCipher::init(CipherOptions::with_key(vec![0x5Au8; 32])).unwrap()
}

#[divan::bench]
fn bench_derive_key(bencher: divan::Bencher) {
    let params = KdfParams::default();
    bencher.bench(|| {
        derive_key(
            divan::black_box(&[0x5Au8; 32]),
            divan::black_box(&[0x11u8; 32]),
            &params,
        )
        .unwrap()
    });
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt(bencher: divan::Bencher, size: usize) {
    let cipher = cipher();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| cipher.encrypt(divan::black_box(&data)).unwrap());
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_decrypt(bencher: divan::Bencher, size: usize) {
    let cipher = cipher();
    let frame = cipher.encrypt(&make_data(size)).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| cipher.decrypt(divan::black_box(&frame)).unwrap());
}

fn main() {
    divan::main();
}
