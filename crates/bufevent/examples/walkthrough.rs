//! Walks through the buffer and registry APIs, printing what each step does.
//!
//! Run with
//!
//! ```bash
//! cargo run -p bufevent --example walkthrough
//! ```

use std::{cell::Cell, rc::Rc};

use bufevent::{
    BufferError, BufferPool, ByteBuffer, EmitError, Encoding, EventRegistry, EventTarget, Listener,
    Payload,
};

/// A download that reports progress through its own registry.
struct Download {
    events: EventRegistry<usize>,
}

impl EventTarget<usize> for Download {
    fn events(&self) -> &EventRegistry<usize> {
        &self.events
    }
}

impl Download {
    fn run(&self, chunks: &[ByteBuffer]) -> Result<ByteBuffer, EmitError> {
        let mut received = 0;
        for chunk in chunks {
            received += chunk.len();
            self.emit("progress", Payload::Data(received))?;
        }
        self.emit("done", Payload::Data(received))?;
        Ok(ByteBuffer::concat(chunks))
    }
}

fn buffers() -> Result<(), BufferError> {
    let hello = ByteBuffer::from_string("hello", Encoding::Ascii);
    println!("{hello:?}");
    println!("hex    {}", hello.to_string_with(Encoding::Hex));
    println!("base64 {}", hello.to_string_with(Encoding::Base64));

    let text = "www.runoob.com我";
    for enc in [Encoding::Utf8, Encoding::Utf16Le, Encoding::Latin1] {
        println!("{text:?} is {} bytes as {enc}", enc.byte_length(text));
    }

    let b1 = ByteBuffer::from("abcdefghijkl");
    let b2 = ByteBuffer::from("RUNOOB");
    b2.copy(&b1, 2, ..)?;
    println!("after copy: {b1}");

    let window = b1.slice(2..8);
    window.fill_str("xy", Encoding::Utf8, ..)?;
    println!("after filling a slice: {b1}");

    let mut pool = BufferPool::default();
    let scratch = pool.alloc_unsafe(16)?.fill(0, ..)?.to_vec();
    println!("pooled scratch of {} bytes, {} left in slab", scratch.len(), pool.remaining());
    Ok(())
}

fn registry() -> Result<(), EmitError> {
    let download = Download {
        events: EventRegistry::new(),
    };
    let last = Rc::new(Cell::new(0));

    let seen = Rc::clone(&last);
    let progress = Listener::new(move |payload: &Payload<usize>| {
        if let Some(&n) = payload.data() {
            seen.set(n);
            println!("progress: {n} bytes");
        }
        Ok(())
    });
    download.on("progress", &progress)?;
    download.once(
        "done",
        &Listener::new(|payload| {
            println!("done: {:?}", payload.data());
            Ok(())
        }),
    )?;

    let chunks = ["菜鸟", "教程"].map(ByteBuffer::from);
    let body = download.run(&chunks)?;
    println!("body: {body} ({} bytes, last progress {})", body.len(), last.get());

    download.off("progress", &progress)?;
    println!("listeners left: {:?}", download.events().event_names());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    buffers()?;
    registry()?;
    Ok(())
}
