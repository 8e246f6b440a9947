//! Byte round-trip through both FIFO flavors.
//!
//! Usage:
//!     cargo run --example roundtrip [--features tracing]
//!
//! Each loop pushes a block of pseudo-random bytes with `push_array`, pops it
//! back with `pop_array` and compares. The process exits with -1 on a push
//! failure, -2 on a pop failure and -3 on a data mismatch.

use std::process;

use ringfifo::{BufferFifo, Fifo, InlineFifo, Storage};

const FIFO_SIZE: usize = 1024;
const CIRCULAR_LOOP: usize = 50_000;
const IO_DATA_BYTE_COUNT: usize = 17;

enum Failure {
    Push(usize),
    Pop(usize),
    Mismatch(usize),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Push(_) => -1,
            Failure::Pop(_) => -2,
            Failure::Mismatch(_) => -3,
        }
    }
}

fn round_trip<S: Storage<Item = u8>>(
    fifo: &mut Fifo<S>,
    rng: &mut fastrand::Rng,
) -> Result<(), Failure> {
    let mut push_data = [0u8; IO_DATA_BYTE_COUNT];
    let mut pop_data = [0u8; IO_DATA_BYTE_COUNT];

    for i in 0..CIRCULAR_LOOP {
        let random_data = rng.u8(..);
        for byte in push_data.iter_mut() {
            *byte = random_data.wrapping_mul(i as u8);
        }

        fifo.push_array(&push_data).map_err(|_| Failure::Push(i))?;
        fifo.pop_array(&mut pop_data).map_err(|_| Failure::Pop(i))?;

        if push_data != pop_data {
            return Err(Failure::Mismatch(i));
        }
    }
    Ok(())
}

fn report(flavor: &str, result: Result<(), Failure>) {
    match result {
        Ok(()) => println!("{flavor}: io data check no error"),
        Err(failure) => {
            match failure {
                Failure::Push(i) => println!("{flavor}: push data failed: {i}"),
                Failure::Pop(i) => println!("{flavor}: pop data failed: {i}"),
                Failure::Mismatch(i) => println!("{flavor}: data mismatch at loop {i}"),
            }
            process::exit(failure.exit_code());
        }
    }
}

fn main() {
    ringfifo::init_tracing();

    let seed = std::env::var("ROUNDTRIP_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    let mut rng = fastrand::Rng::with_seed(seed);

    let mut buf = vec![0u8; FIFO_SIZE];
    let mut external: BufferFifo<u8> = match Fifo::with_buffer(&mut buf) {
        Ok(fifo) => fifo,
        Err(err) => {
            println!("external buffer rejected: {err}");
            process::exit(-1);
        }
    };
    report("external", round_trip(&mut external, &mut rng));

    let mut inline: Box<InlineFifo<u8, FIFO_SIZE>> = Box::default();
    report("inline", round_trip(&mut *inline, &mut rng));
}
