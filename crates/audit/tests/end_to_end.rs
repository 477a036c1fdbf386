//! End-to-end: rule line -> baseline -> passes -> alerts on a real TCP collector.

use std::fs::{self, File};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use filewatch_audit::{assemble_jobs, run_pass};
use filewatch_core::{Destination, RetryPolicy, TOOL_NAME};
use filewatch_notify::{Dispatcher, TcpNotifier};
use filewatch_rules::parse_rules;

/// Accepts connections forever and stores each connection's payload.
async fn spawn_collector() -> (u16, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let received = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&received);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut payload = String::new();
            if socket.read_to_string(&mut payload).await.is_ok() {
                sink.lock().unwrap().push(payload);
            }
        }
    });

    (port, received)
}

async fn wait_for_batches(received: &Arc<Mutex<Vec<String>>>, count: usize) -> Vec<String> {
    for _ in 0..100 {
        {
            let batches = received.lock().unwrap();
            if batches.len() >= count {
                return batches.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("collector did not receive {count} batches");
}

#[tokio::test]
async fn touch_then_delete_is_reported_pass_by_pass() {
    let root = TempDir::new().unwrap();
    let watched = root.path().join("watched");
    fs::create_dir_all(watched.join("skipme")).unwrap();
    let file = watched.join("a.txt");
    fs::write(&file, "hello").unwrap();
    fs::write(watched.join("skipme/hidden.txt"), "not audited").unwrap();

    let rules = format!("# test rules\nf\t1\t0\t0\t0\t1\t\t{}\tskipme\n", watched.display());
    let assembly = assemble_jobs(parse_rules(&rules));
    assert!(assembly.skipped.is_empty());
    assert_eq!(assembly.jobs.len(), 1);
    let job = &assembly.jobs[0];
    assert_eq!(job.baseline().len(), 1, "pruned subtree is not in the baseline");

    let (port, received) = spawn_collector().await;
    let dispatcher = Dispatcher::new(Box::new(TcpNotifier::new(
        Destination::new("127.0.0.1", port),
        RetryPolicy::default(),
        TOOL_NAME,
    )));

    // Pass 1: nothing changed.
    let first = run_pass(job, 0, &dispatcher).await;
    assert!(first.alerts.is_empty());
    assert_eq!(first.delivered, 0);

    // Pass 2: advance the modification time.
    let touched = job.baseline()[0].mtime + Duration::from_secs(120);
    File::options().write(true).open(&file).unwrap().set_modified(touched).unwrap();

    let second = run_pass(job, 0, &dispatcher).await;
    assert_eq!(second.alerts.len(), 1);
    assert!(second.alerts[0].is_modification());
    assert_eq!(second.delivered, 1);
    let text = second.alerts[0].to_string();
    assert!(text.contains("a.txt"));
    assert!(text.contains("mtime1=") && text.contains("mtime0="));

    let batches = wait_for_batches(&received, 1).await;
    assert!(batches[0].starts_with("<105>"));
    assert!(batches[0].contains(&format!("{TOOL_NAME}[{}] ", std::process::id())));
    assert!(batches[0].ends_with(&text));

    // Pass 3: delete the file.
    fs::remove_file(&file).unwrap();
    let third = run_pass(job, 0, &dispatcher).await;
    assert_eq!(third.alerts.len(), 1);
    assert!(third.alerts[0].is_deletion());
    assert_eq!(third.delivered, 1);

    let batches = wait_for_batches(&received, 2).await;
    assert!(batches[1].contains("job[0]: file deletion: "));
    assert!(batches[1].contains("a.txt"));
}

#[tokio::test]
async fn refusing_collector_drops_batch_without_failing() {
    let root = TempDir::new().unwrap();
    let file = root.path().join("a.txt");
    fs::write(&file, "hello").unwrap();

    let assembly = assemble_jobs(parse_rules(&format!(
        "d\t1\t0\t0\t0\t1\t\t{}\t\n",
        root.path().display()
    )));
    let job = &assembly.jobs[0];

    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dispatcher = Dispatcher::new(Box::new(TcpNotifier::new(
        Destination::new("127.0.0.1", port),
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(30),
        },
        TOOL_NAME,
    )));

    fs::remove_file(&file).unwrap();
    let started = std::time::Instant::now();
    let report = run_pass(job, 0, &dispatcher).await;

    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.delivered, 0);
    assert!(started.elapsed() >= Duration::from_millis(60));
}
