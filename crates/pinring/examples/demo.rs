//! Walkthrough of the reader API on a 16-slot ring, then a producer feeding
//! a blocking consumer.
//!
//! Run with: RUST_LOG=pinring_rs=trace cargo run -p pinring-rs --example demo

use pinring_rs::{RingBuilder, RingError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), RingError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ring = RingBuilder::new()
        .extend_values((0..16).map(|i| vec![i]))
        .connect()?;

    let current = ring.current().expect("fresh ring has a current slot");
    println!("current: {}", current[0]);
    {
        let nth = ring.try_nth(5)?;
        println!("nth(5):  {}", nth[0]);
    }
    {
        let oldest = ring.oldest().expect("fresh ring has an oldest slot");
        println!("oldest:  {}", oldest[0]);
    }
    {
        let window = ring.current_window(5);
        println!("window[4]: {}", window[4][0]);
    }
    drop(current);
    println!("layout: {}", ring.snapshot());

    // Producer/consumer: the consumer follows every publish in order
    let ring = Arc::new(ring);
    let consumer = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || {
            let mut seen = Vec::new();
            for holder in ring.next_wait_window(8) {
                println!("consumer: seq {} -> {:?}", holder.seq(), *holder);
                seen.push(holder[0]);
            }
            seen
        })
    };

    let mut next = 100;
    while !consumer.is_finished() {
        match ring.write_with(|buf| {
            buf.clear();
            buf.push(next);
        }) {
            Ok(seq) => {
                tracing::info!(seq, value = next, "published");
                next += 1;
            }
            Err(err) if err.is_recoverable() => thread::yield_now(),
            Err(err) => return Err(err),
        }
        thread::sleep(Duration::from_millis(10));
    }

    let seen = consumer.join().expect("consumer panicked");
    println!("consumer saw {seen:?}");
    println!("layout: {}", ring.snapshot());
    Ok(())
}
