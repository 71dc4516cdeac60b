//! Byte sources for the simulator.
//!
//! A background thread reads the input and sends raw chunks over a channel, so
//! the render loop never blocks on I/O. Chunks are not line aligned, just like
//! USB packets on the device.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{error, info};

use crate::timing::REPLAY_LINE_INTERVAL;

const READ_CHUNK: usize = 256;

pub enum Source {
    /// Whatever is piped in, forwarded as it arrives.
    Stdin,
    /// A JSON lines file, one line every [`REPLAY_LINE_INTERVAL`].
    Replay(PathBuf),
}

/// Start the reader thread. The channel disconnects when the input ends.
pub fn spawn_reader(source: Source) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || match source {
        Source::Stdin => forward_stdin(&tx),
        Source::Replay(path) => replay_file(&path, &tx),
    });
    rx
}

fn forward_stdin(tx: &Sender<Vec<u8>>) {
    let mut stdin = io::stdin().lock();
    let mut buf = [0u8; READ_CHUNK];
    loop {
        match stdin.read(&mut buf) {
            Ok(0) => {
                info!("stdin closed");
                return;
            }
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                error!("stdin read failed: {e}");
                return;
            }
        }
    }
}

fn replay_file(
    path: &PathBuf,
    tx: &Sender<Vec<u8>>,
) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("cannot open {}: {e}", path.display());
            return;
        }
    };
    info!("replaying {}", path.display());

    for line in BufReader::new(file).lines() {
        let mut bytes = match line {
            Ok(line) => line.into_bytes(),
            Err(e) => {
                error!("read failed: {e}");
                return;
            }
        };
        bytes.push(b'\n');
        if tx.send(bytes).is_err() {
            return;
        }
        thread::sleep(REPLAY_LINE_INTERVAL);
    }
    info!("replay finished");
}
