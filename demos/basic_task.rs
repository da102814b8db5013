//! # Example: basic_task
//!
//! Runs one task on the default runtime and watches it from two observers.
//!
//! Shows how to:
//! - Describe a work body with [`WorkFn`].
//! - Register observers fluently and pick a delivery context.
//! - Execute the same task twice.
//!
//! ## Flow
//! ```text
//! Task::execute() ──► pool thread: Work::run(&Emitter)
//!                         ├─► emit_success(n) ──► work-loop: Printer / Counter
//!                         └─► emit_complete(..) ─► work-loop: Printer / Counter
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_task
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use taskcast::{Config, Emitter, Observer, Runtime, Task, ThreadModel, WorkFn};

type Out<'a> = Emitter<'a, u64, String, &'static str>;

/// Prints every signal with the thread it arrived on.
struct Printer;

impl Observer<u64, String, &'static str> for Printer {
    fn on_success(&self, v: &u64) {
        println!("[{}] success: {v}", thread_name());
    }
    fn on_fail(&self, e: &String) {
        println!("[{}] fail: {e}", thread_name());
    }
    fn on_complete(&self, c: &&'static str) {
        println!("[{}] complete: {c}", thread_name());
    }
}

/// Counts completed runs.
#[derive(Default)]
struct Counter(AtomicUsize);

impl Observer<u64, String, &'static str> for Counter {
    fn on_success(&self, _: &u64) {}
    fn on_fail(&self, _: &String) {}
    fn on_complete(&self, _: &&'static str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn thread_name() -> String {
    std::thread::current()
        .name()
        .unwrap_or("<unnamed>")
        .to_string()
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let rt = Runtime::builder(Config::default()).build()?;

    let task = Task::new(
        &rt,
        WorkFn::new("collatz", |emit: &Out<'_>| {
            let mut n = 27u64 + emit.execution();
            let mut steps = 0u64;
            while n != 1 {
                n = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
                steps += 1;
                if steps > 10_000 {
                    emit.emit_fail(format!("gave up after {steps} steps"));
                    emit.emit_complete("aborted");
                    return;
                }
            }
            emit.emit_success(steps);
            emit.emit_complete("done");
        }),
    );

    let counter = Arc::new(Counter::default());
    task.register_observer(Arc::new(Printer))?
        .register_observer(counter.clone())?
        .subscribe_on(ThreadModel::Worker)
        .execute()
        .execute();

    for _ in 0..50 {
        if counter.0.load(Ordering::SeqCst) == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    println!("runs completed: {}", counter.0.load(Ordering::SeqCst));

    rt.shutdown();
    Ok(())
}
