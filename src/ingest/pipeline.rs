//! Concurrent body loader.
//!
//! A producer thread streams data lines into a bounded channel, a pool of
//! parser workers turns them into rows, a supervisor closes the row channel
//! once every worker has reported, and the calling thread drains rows into
//! the relation while logging progress on a timer.
//!
//! ```text
//! file -> producer -> [lines] -> worker * N -> [rows] -> aggregator
//!                                    |                      ^
//!                                    +-> [ctl] -> supervisor (closes rows)
//! ```
//!
//! Workers finish in any order, so the relation's row order is not the file's.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Relation, Row, Schema};

use super::parse::{parse_line, Fit, Line};

/// Counters gathered while loading one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Data lines read (header excluded)
    pub lines: usize,
    /// Rows collected into the relation
    pub rows: usize,
    /// Cells classified as numbers
    pub numbers: usize,
    /// Rows that had trailing fields dropped
    pub truncated: usize,
    /// Rows that were padded with empty strings
    pub padded: usize,
    /// Parser workers that ran
    pub workers: usize,
}

/// Completion signal a worker sends to the supervisor
#[derive(Debug, Default)]
struct WorkerReport {
    rows: usize,
    numbers: usize,
    truncated: usize,
    padded: usize,
}

/// Load every data line of `path` as rows fitted to `schema`.
pub fn read_body(path: &Path, schema: &Schema, config: &Config) -> Result<(Relation, LoadStats)> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    let workers = config.workers.max(1);
    let arity = schema.len();

    let (line_tx, line_rx) = bounded::<Line>(config.line_capacity.max(1));
    let (row_tx, row_rx) = bounded::<Row>(config.row_capacity.max(1));
    let (ctl_tx, ctl_rx) = bounded::<WorkerReport>(workers);

    thread::scope(|scope| {
        let producer = scope.spawn(move || produce_lines(BufReader::new(file), line_tx));

        let parsers: Vec<_> = (0..workers)
            .map(|id| {
                let lines = line_rx.clone();
                let rows = row_tx.clone();
                let ctl = ctl_tx.clone();
                scope.spawn(move || parse_lines(id, arity, lines, rows, ctl))
            })
            .collect();
        drop(line_rx);
        drop(ctl_tx);

        let supervisor = scope.spawn(move || supervise(workers, ctl_rx, row_tx));

        let relation = aggregate(path, row_rx, config.progress_interval);

        let mut panicked = false;
        for parser in parsers {
            panicked |= parser.join().is_err();
        }
        let reports = supervisor.join();
        let produced = producer.join();

        let (reports, produced) = match (reports, produced) {
            (Ok(reports), Ok(produced)) if !panicked && reports.len() == workers => {
                (reports, produced)
            }
            _ => {
                return Err(Error::Worker {
                    path: path.to_path_buf(),
                })
            }
        };
        let lines = produced.map_err(|e| Error::io(path, e))?;

        let mut stats = LoadStats {
            lines,
            rows: relation.len(),
            workers,
            ..LoadStats::default()
        };
        for report in reports {
            stats.numbers += report.numbers;
            stats.truncated += report.truncated;
            stats.padded += report.padded;
        }

        Ok((relation, stats))
    })
}

/// Send every line after the header, returning how many were sent.
///
/// Lines are read as bytes; invalid UTF-8 is replaced rather than failing the
/// load, so only real I/O errors end production early.
fn produce_lines<R: BufRead>(mut reader: R, lines: Sender<Line>) -> io::Result<usize> {
    let mut sent = 0;
    let mut line_no = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if line_no > 0 {
            let text = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(text) => text,
                Err(e) => {
                    warn!("line {}: invalid UTF-8, replacing bad bytes", line_no);
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            if lines.send(Line { line_no, text }).is_err() {
                break;
            }
            sent += 1;
        }
        line_no += 1;
    }
    Ok(sent)
}

fn parse_lines(
    id: usize,
    arity: usize,
    lines: Receiver<Line>,
    rows: Sender<Row>,
    ctl: Sender<WorkerReport>,
) {
    let mut report = WorkerReport::default();

    for line in lines.iter() {
        let (row, fit) = parse_line(&line.text, arity);
        match fit {
            Fit::Exact => {}
            Fit::Truncated(dropped) => {
                warn!("line {}: truncating object (-{} fields)", line.line_no, dropped);
                report.truncated += 1;
            }
            Fit::Padded(_) => {
                warn!("line {}: missing fields, appending blank strings", line.line_no);
                report.padded += 1;
            }
        }

        report.numbers += row.cells.iter().filter(|v| v.is_number()).count();
        report.rows += 1;

        if rows.send(row).is_err() {
            break;
        }
    }

    // The row channel closes only after every worker handle is gone.
    drop(rows);
    debug!("parser {} found {} numbers ({} rows)", id, report.numbers, report.rows);
    let _ = ctl.send(report);
}

/// Wait for one report per worker, then close the row channel.
///
/// Stops early if the control channel disconnects, which only happens when a
/// worker died without reporting.
fn supervise(workers: usize, ctl: Receiver<WorkerReport>, rows: Sender<Row>) -> Vec<WorkerReport> {
    let mut reports = Vec::with_capacity(workers);
    while reports.len() < workers {
        match ctl.recv() {
            Ok(report) => reports.push(report),
            Err(_) => break,
        }
    }
    drop(rows);
    reports
}

fn aggregate(path: &Path, rows: Receiver<Row>, interval: Duration) -> Relation {
    let ticker = tick(interval);
    let mut relation = Relation::new();

    loop {
        select! {
            recv(ticker) -> _ => {
                info!("loading {} ({} tuples)", path.display(), relation.len());
            },
            recv(rows) -> row => match row {
                Ok(row) => relation.push(row),
                Err(_) => break,
            },
        }
    }

    relation
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use rustc_hash::FxHashSet;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::model::{Field, Value};

    fn schema(names: &[&str]) -> Schema {
        names.iter().copied().map(Field::new).collect()
    }

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_produce_lines_skips_header() {
        let (tx, rx) = bounded(16);
        let sent = produce_lines(Cursor::new("h1\th2\na\tb\n\nc\td"), tx).unwrap();
        assert_eq!(sent, 3);

        let lines: Vec<Line> = rx.iter().collect();
        assert_eq!(
            lines,
            vec![
                Line { line_no: 1, text: "a\tb\n".into() },
                Line { line_no: 2, text: "\n".into() },
                Line { line_no: 3, text: "c\td".into() },
            ]
        );
    }

    #[test]
    fn test_produce_lines_stops_when_workers_gone() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let sent = produce_lines(Cursor::new("h\n1\n2\n"), tx).unwrap();
        assert_eq!(sent, 0);
    }

    #[test]
    fn test_supervisor_closes_rows_after_all_reports() {
        let (row_tx, row_rx) = bounded::<Row>(1);
        let (ctl_tx, ctl_rx) = bounded(2);
        ctl_tx.send(WorkerReport::default()).unwrap();
        ctl_tx.send(WorkerReport::default()).unwrap();

        let reports = supervise(2, ctl_rx, row_tx);
        assert_eq!(reports.len(), 2);
        assert!(row_rx.recv().is_err());
    }

    #[test]
    fn test_supervisor_stops_on_lost_worker() {
        let (row_tx, row_rx) = bounded::<Row>(1);
        let (ctl_tx, ctl_rx) = bounded(2);
        ctl_tx.send(WorkerReport::default()).unwrap();
        drop(ctl_tx);

        let reports = supervise(3, ctl_rx, row_tx);
        assert_eq!(reports.len(), 1);
        assert!(row_rx.recv().is_err());
    }

    #[test]
    fn test_read_body_counts() {
        let file = write_file("a\tb\n1\t2\n3\n4\t5\t6\nx\ty\n");
        let config = Config::default().with_workers(3);
        let (relation, stats) = read_body(file.path(), &schema(&["a", "b"]), &config).unwrap();

        assert_eq!(relation.len(), 4);
        assert!(relation.iter().all(|row| row.len() == 2));
        assert_eq!(
            stats,
            LoadStats {
                lines: 4,
                rows: 4,
                numbers: 5,
                truncated: 1,
                padded: 1,
                workers: 3,
            }
        );
    }

    #[test]
    fn test_read_body_header_only() {
        let file = write_file("a\tb\n");
        let (relation, stats) =
            read_body(file.path(), &schema(&["a", "b"]), &Config::default()).unwrap();
        assert!(relation.is_empty());
        assert_eq!(stats.lines, 0);
    }

    #[test]
    fn test_read_body_row_set_independent_of_workers() {
        let mut contents = String::from("id\tname\tscore\n");
        for i in 0..2000 {
            contents.push_str(&format!("{}\tname{}\t{}\n", i, i % 17, i as f64 / 4.0));
        }
        let file = write_file(&contents);
        let schema = schema(&["id", "name", "score"]);

        let mut expected: Option<FxHashSet<Row>> = None;
        for workers in [1, 2, 8] {
            let config = Config::default()
                .with_workers(workers)
                .with_channel_capacity(16);
            let (relation, _) = read_body(file.path(), &schema, &config).unwrap();
            assert_eq!(relation.len(), 2000);

            let set: FxHashSet<Row> = relation.iter().cloned().collect();
            match &expected {
                Some(expected) => assert_eq!(&set, expected),
                None => expected = Some(set),
            }
        }

        let expected = expected.unwrap();
        assert!(expected.contains(&Row::new(vec![
            Value::Number(42.0),
            Value::from("name8"),
            Value::Number(10.5),
        ])));
    }

    #[test]
    fn test_produce_lines_replaces_invalid_utf8() {
        let (tx, rx) = bounded(16);
        let sent = produce_lines(Cursor::new(&b"name\ncaf\xe9\nbob\n"[..]), tx).unwrap();
        assert_eq!(sent, 2);

        let texts: Vec<String> = rx.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["caf\u{FFFD}\n".to_string(), "bob\n".to_string()]);
    }

    #[test]
    fn test_read_body_keeps_invalid_utf8_rows() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"id\tname\n1\tada\n2\tcaf\xe9\n3\tbob\n").unwrap();
        let (relation, stats) =
            read_body(file.path(), &schema(&["id", "name"]), &Config::default()).unwrap();

        assert_eq!(stats.lines, 3);
        let rows: FxHashSet<Row> = relation.iter().cloned().collect();
        let expected: FxHashSet<Row> = [
            Row::new(vec![Value::Number(1.0), Value::from("ada")]),
            Row::new(vec![Value::Number(2.0), Value::from("caf\u{FFFD}")]),
            Row::new(vec![Value::Number(3.0), Value::from("bob")]),
        ]
        .into_iter()
        .collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_progress_ticks_leave_rows_untouched() {
        let mut contents = String::from("n\tlabel\n");
        for i in 0..5000 {
            contents.push_str(&format!("{}\tl{}\n", i, i % 7));
        }
        let file = write_file(&contents);
        let schema = schema(&["n", "label"]);

        let quiet = Config::default().with_workers(4);
        let noisy = quiet
            .clone()
            .with_progress_interval(Duration::from_micros(1));

        let (baseline, _) = read_body(file.path(), &schema, &quiet).unwrap();
        let (ticked, stats) = read_body(file.path(), &schema, &noisy).unwrap();

        assert_eq!(ticked.len(), 5000);
        assert_eq!(stats.rows, 5000);
        let baseline: FxHashSet<Row> = baseline.iter().cloned().collect();
        let ticked: FxHashSet<Row> = ticked.iter().cloned().collect();
        assert_eq!(ticked, baseline);
    }
}
