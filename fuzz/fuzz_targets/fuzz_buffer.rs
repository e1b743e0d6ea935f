#![no_main]

use arbitrary::Arbitrary;
use bufevent::{BufferPool, ByteBuffer, Encoding, PoolOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug, Clone, Copy)]
enum Enc {
    Ascii,
    Utf8,
    Utf16Le,
    Base64,
    Latin1,
    Hex,
}

impl From<Enc> for Encoding {
    fn from(enc: Enc) -> Self {
        match enc {
            Enc::Ascii => Encoding::Ascii,
            Enc::Utf8 => Encoding::Utf8,
            Enc::Utf16Le => Encoding::Utf16Le,
            Enc::Base64 => Encoding::Base64,
            Enc::Latin1 => Encoding::Latin1,
            Enc::Hex => Encoding::Hex,
        }
    }
}

/// One step against a small set of buffers. Indices pick a buffer modulo the
/// current set size.
#[derive(Arbitrary, Debug)]
enum Op {
    FromString(String, Enc),
    FromBytes(Vec<u8>),
    Pooled(u16),
    Slice(u8, u16, u16),
    Copy { src: u8, dst: u8, target_start: u16, start: u16, end: u16 },
    Fill(u8, u8, u16, u16),
    FillStr(u8, String, Enc),
    Write(u8, String, u16, Enc),
    Decode(u8, Enc, u16, u16),
    Concat(u8, u8, Option<u16>),
}

#[derive(Arbitrary, Debug)]
struct Input {
    pool_size: u16,
    ops: Vec<Op>,
}

fn pick(buffers: &[ByteBuffer], i: u8) -> &ByteBuffer {
    &buffers[usize::from(i) % buffers.len()]
}

fn check_codecs(bytes: &[u8]) {
    for enc in [Encoding::Base64, Encoding::Hex] {
        assert_eq!(enc.encode(&enc.decode(bytes)), bytes, "{enc} round trip");
    }
    let text = Encoding::Utf8.decode(bytes);
    assert_eq!(Encoding::Utf16Le.decode(&Encoding::Utf16Le.encode(&text)), text);
}

fuzz_target!(|input: Input| {
    let mut pool = BufferPool::new(PoolOptions {
        pool_size: usize::from(input.pool_size).max(16),
    });
    let mut buffers = vec![ByteBuffer::from("seed")];

    for op in input.ops.into_iter().take(64) {
        let next = match op {
            Op::FromString(text, enc) => Some(ByteBuffer::from_string(&text, enc.into())),
            Op::FromBytes(bytes) => {
                check_codecs(&bytes);
                Some(ByteBuffer::from_vec(bytes))
            }
            Op::Pooled(size) => pool.alloc_unsafe(size).ok(),
            Op::Slice(i, start, end) => {
                Some(pick(&buffers, i).slice(usize::from(start)..usize::from(end)))
            }
            Op::Copy { src, dst, target_start, start, end } => {
                let (src, dst) = (pick(&buffers, src), pick(&buffers, dst));
                if let Ok(n) = src.copy(dst, target_start.into(), usize::from(start)..usize::from(end)) {
                    assert!(n <= dst.len() && n <= src.len());
                }
                None
            }
            Op::Fill(i, value, start, end) => {
                let buf = pick(&buffers, i);
                if buf.fill(value, usize::from(start)..usize::from(end)).is_ok() {
                    buf.with_bytes(|bytes| {
                        assert!(bytes[usize::from(start)..usize::from(end)].iter().all(|&b| b == value));
                    });
                }
                None
            }
            Op::FillStr(i, pattern, enc) => {
                let _ = pick(&buffers, i).fill_str(&pattern, enc.into(), ..);
                None
            }
            Op::Write(i, text, offset, enc) => {
                let buf = pick(&buffers, i);
                if let Ok(n) = buf.write(&text, offset.into(), enc.into()) {
                    assert!(usize::from(offset) + n <= buf.len());
                }
                None
            }
            Op::Decode(i, enc, start, end) => {
                let _ = pick(&buffers, i).to_string_range(enc.into(), usize::from(start)..usize::from(end));
                None
            }
            Op::Concat(a, b, total) => {
                let (a, b) = (pick(&buffers, a), pick(&buffers, b));
                match total {
                    Some(total) => ByteBuffer::concat_with_length([a, b], total).ok(),
                    None => Some(ByteBuffer::concat([a, b])),
                }
            }
        };
        if let Some(buf) = next {
            buffers.push(buf);
        }
        for buf in &buffers {
            buf.assert_invariants();
        }
    }

    for buf in &buffers {
        let json = serde_json::to_string(buf).unwrap();
        let back: ByteBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, buf);
    }
});
