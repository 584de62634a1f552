use pretty_assertions::assert_eq;
use runtime_console_core::{ConsoleConfig, LogConsole, Severity};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

#[test]
fn test_concurrent_producers_lose_nothing() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut console = LogConsole::new(ConsoleConfig {
        queue_capacity: THREADS * PER_THREAD,
        history_cap: THREADS * PER_THREAD,
        ..ConsoleConfig::default()
    })
    .unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let producers: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let handle = console.handle();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let severity = if i % 10 == 0 {
                        Severity::Warning
                    } else {
                        Severity::Info
                    };
                    handle.submit(format!("t{thread_id}-{i}"), format!("thread {thread_id}"), severity);
                }
            })
        })
        .collect();

    // Tick concurrently with the producers
    let watcher = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for producer in producers {
                producer.join().unwrap();
            }
            done.store(true, Ordering::SeqCst);
        })
    };
    while !done.load(Ordering::SeqCst) {
        console.tick();
    }
    watcher.join().unwrap();
    console.tick();

    assert_eq!(console.history_len(), THREADS * PER_THREAD);
    assert_eq!(console.registry_len(), THREADS * PER_THREAD);
    assert_eq!(console.dropped(), 0);
    assert_eq!(console.totals().warning, THREADS * PER_THREAD / 10);

    // Every producer's submissions keep their relative order
    let mut next_per_thread: HashMap<String, usize> = HashMap::new();
    for entry in console.history() {
        let (thread, index) = entry.message().split_once('-').unwrap();
        let index: usize = index.parse().unwrap();
        let expected = next_per_thread.entry(thread.to_string()).or_default();
        assert_eq!(index, *expected);
        *expected += 1;
    }
    assert_eq!(next_per_thread.len(), THREADS);
    console.assert_consistent();
}

#[test]
fn test_concurrent_duplicates_fold_into_one_entry() {
    let mut console = LogConsole::new(ConsoleConfig {
        queue_capacity: THREADS * PER_THREAD,
        history_cap: THREADS * PER_THREAD,
        start_collapsed: true,
        ..ConsoleConfig::default()
    })
    .unwrap();

    let producers: Vec<_> = (0..THREADS)
        .map(|_| {
            let handle = console.handle();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    handle.submit("heartbeat", "", Severity::Info);
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    console.tick();

    assert_eq!(console.registry_len(), 1);
    assert_eq!(console.display().len(), 1);
    assert_eq!(
        console.display().get(0).unwrap().repeat_count() as usize,
        THREADS * PER_THREAD
    );
    console.assert_consistent();
}
