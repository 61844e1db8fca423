/// Executor behaviour against a real interpreter.
use std::path::Path;
use std::time::{Duration, Instant};

use sift_exec::execute;

#[tokio::test]
async fn test_print_example() {
    require_python!();
    let result = execute("print('hi')", 5).await;
    assert!(result.success);
    assert_eq!(result.output, "hi\n");
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn test_runtime_failure_is_captured_verbatim() {
    require_python!();
    let result = execute("raise RuntimeError('nope')\n", 5).await;
    assert!(!result.success);
    assert_eq!(result.exit_code, Some(1));
    let stderr = result.error.unwrap();
    assert!(stderr.contains("Traceback"));
    assert!(stderr.contains("RuntimeError: nope"));
}

#[tokio::test]
async fn test_infinite_loop_times_out_cleanly() {
    require_python!();
    let source = "import sys\nprint(__file__, flush=True)\nwhile True:\n    pass\n";
    let started = Instant::now();
    let result = execute(source, 1).await;
    let waited = started.elapsed();

    assert!(!result.success);
    assert!(result.timed_out);
    assert!(result.error.as_deref().unwrap().contains("1 seconds"));
    assert!(waited <= Duration::from_secs(3), "took {waited:?}");

    let script = result.output.trim().to_string();
    assert!(script.ends_with(".py"), "unexpected output {script:?}");
    assert!(!Path::new(&script).exists(), "temp file {script} left behind");
    #[cfg(target_os = "linux")]
    assert!(!crate::common::process_with_arg_exists(&script));
}

#[tokio::test]
async fn test_memory_is_never_negative() {
    require_python!();
    let result = execute("data = [0] * 100000\nprint(len(data))\n", 5).await;
    assert!(result.success);
    assert!(result.memory_usage >= 0.0);
    if let Some(peak) = result.child_peak_memory {
        assert!(peak >= 0.0);
    }
}

#[tokio::test]
async fn test_concurrent_runs_are_isolated() {
    require_python!();
    let runs: Vec<_> = (0..4)
        .map(|i| {
            let source = format!("print(__file__)\nprint({i})\n");
            tokio::spawn(async move { execute(&source, 5).await })
        })
        .collect();
    let mut files = Vec::new();
    for (i, run) in runs.into_iter().enumerate() {
        let result = run.await.unwrap();
        assert!(result.success);
        let mut lines = result.output.lines();
        files.push(lines.next().unwrap().to_string());
        assert_eq!(lines.next(), Some(i.to_string().as_str()));
    }
    files.sort();
    files.dedup();
    assert_eq!(files.len(), 4, "temp file names collided");
}

#[cfg(unix)]
#[tokio::test]
async fn test_descendant_in_new_session_cannot_stall_timeout() {
    require_python!();
    let source = "import subprocess, sys\n\
                  p = subprocess.Popen([sys.executable, '-c', 'import time; time.sleep(10)'], start_new_session=True)\n\
                  print('spawned', p.pid, flush=True)\n\
                  while True:\n    pass\n";
    let started = Instant::now();
    let result = execute(source, 1).await;
    let waited = started.elapsed();

    let line = result.output.lines().next().unwrap_or_default().to_string();
    if let Some(pid) = line.strip_prefix("spawned ") {
        let _ = std::process::Command::new("kill").args(["-9", pid]).status();
    }
    assert!(result.timed_out);
    assert!(line.starts_with("spawned "), "partial output lost: {:?}", result.output);
    assert!(waited <= Duration::from_secs(3), "took {waited:?}");
}
