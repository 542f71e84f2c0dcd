use std::fs;
use std::sync::Arc;
use std::thread;

use atomicfs::{FileWriter, WriterOptions};
use tempfile::tempdir;

#[test]
fn shared_writer_handles_parallel_destinations() {
    let td = tempdir().unwrap();
    let writer = Arc::new(FileWriter::new(WriterOptions::default().staging_dir(td.path()).mode(0o600)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let w = Arc::clone(&writer);
            let dest = td.path().join(format!("file-{i}.txt"));
            thread::spawn(move || w.write_bytes(format!("payload {i}"), &dest).map(|o| o.bytes))
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }

    for i in 0..8 {
        let got = fs::read_to_string(td.path().join(format!("file-{i}.txt"))).unwrap();
        assert_eq!(got, format!("payload {i}"));
    }
    assert_eq!(fs::read_dir(td.path()).unwrap().count(), 8);
}

#[cfg(unix)]
#[test]
fn racing_writes_to_one_destination_leave_one_whole_version() {
    let td = tempdir().unwrap();
    let dest = td.path().join("shared.txt");
    let writer = FileWriter::new(WriterOptions::default().staging_dir(td.path()).mode(0o600));
    let payloads: Vec<String> = (0..6).map(|i| format!("{i}").repeat(64 * 1024)).collect();

    thread::scope(|s| {
        for p in &payloads {
            let w = writer.clone();
            let dest = &dest;
            s.spawn(move || w.write_bytes(p, dest).unwrap());
        }
    });

    let got = fs::read_to_string(&dest).unwrap();
    assert!(payloads.contains(&got), "destination holds a mixed or partial version");
    assert_eq!(fs::read_dir(td.path()).unwrap().count(), 1);
}
