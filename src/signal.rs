//! The activity socket: how editor plugins reach a running tracker.
//!
//! The listener accepts localhost TCP connections and reads one language
//! identifier per line; every line becomes an edit notice on the event
//! channel. Anything that can write a line to a socket can act as an editor
//! plugin (`levelup ping rust`, or `echo rust | nc 127.0.0.1 43217`).

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use crate::runtime::PanelEvent;

/// A received line, as the language of an edit notice. Blank means the
/// editor didn't know the language.
fn notice_language(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Bind the activity socket and feed edit notices into `tx`.
/// Returns the bound port (useful when asked to bind port 0).
pub fn spawn_listener(port: u16, tx: Sender<PanelEvent>) -> io::Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;
    let bound = listener.local_addr()?.port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let tx = tx.clone();
            thread::spawn(move || {
                let reader = BufReader::new(stream);
                for line in reader.lines() {
                    let Ok(line) = line else { break };
                    if tx.send(PanelEvent::Edit(notice_language(&line))).is_err() {
                        return;
                    }
                }
            });
        }
    });

    Ok(bound)
}

/// Send one activity signal to a running tracker. Used by `levelup ping`.
pub fn send_ping(port: u16, language: &str) -> io::Result<()> {
    let mut stream = TcpStream::connect(("127.0.0.1", port))?;
    stream.set_write_timeout(Some(Duration::from_secs(2)))?;
    writeln!(stream, "{}", language)?;
    Ok(())
}
