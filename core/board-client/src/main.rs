//! Summary board client entrypoint.
//!
//! Owns the persistent connection to the snapshot producer: reads
//! newline-delimited text messages, applies each one through the engine, and
//! writes the rendered document to disk whenever a valid snapshot lands.
//! Malformed lines are dropped without touching the last written document. A
//! heartbeat thread keeps the transport alive; nothing else is sent and no
//! reply is parsed. Reconnection is deliberately out of scope: one
//! connection attempt, and the process exits when the stream ends.

use board_core::{BoardEngine, BoardError};
use board_protocol::{HEARTBEAT_INTERVAL_SECS, HEARTBEAT_PAYLOAD, MAX_SNAPSHOT_BYTES};
use clap::Parser;
use std::env;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "board-client", about = "Live summary board client")]
struct Args {
    /// Address of the snapshot producer.
    #[arg(long, default_value = "127.0.0.1:8765")]
    addr: String,

    /// Where the rendered board document is written.
    #[arg(long, default_value = "board.html")]
    out: PathBuf,
}

fn main() {
    init_logging();
    let args = Args::parse();

    let stream = match TcpStream::connect(&args.addr) {
        Ok(stream) => stream,
        Err(err) => {
            error!(error = %err, addr = %args.addr, "Failed to connect to snapshot producer");
            std::process::exit(1);
        }
    };
    info!(addr = %args.addr, out = %args.out.display(), "Summary board client connected");

    match stream.try_clone() {
        Ok(writer) => spawn_heartbeat(writer),
        Err(err) => warn!(error = %err, "Heartbeat disabled; could not clone stream"),
    }

    let mut engine = BoardEngine::new();

    // Render the empty state up front so the document exists before the
    // first snapshot arrives.
    if let Err(err) = write_document(&args.out, &engine) {
        error!(error = %err, "Failed to write initial document");
        std::process::exit(1);
    }

    if let Err(err) = pump_messages(BufReader::new(stream), &mut engine, &args.out) {
        error!(error = %err, "Snapshot channel failed");
        std::process::exit(1);
    }
    info!("Snapshot channel closed");
}

fn init_logging() {
    let debug_enabled = env::var("BOARD_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn spawn_heartbeat(mut writer: TcpStream) {
    thread::spawn(move || loop {
        thread::sleep(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        if let Err(err) = writeln!(writer, "{}", HEARTBEAT_PAYLOAD) {
            warn!(error = %err, "Heartbeat write failed; stopping heartbeats");
            break;
        }
    });
}

/// Reads messages until the stream ends. Each valid snapshot is applied and
/// rendered; invalid ones leave the engine and the written document alone.
/// Lines are read through a size cap so an oversized message is dropped
/// without ever being buffered whole.
fn pump_messages<R: BufRead>(
    mut reader: R,
    engine: &mut BoardEngine,
    out: &Path,
) -> Result<(), BoardError> {
    let channel_err = |source| BoardError::Io {
        context: "reading snapshot channel".to_string(),
        source,
    };
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .by_ref()
            .take(MAX_SNAPSHOT_BYTES as u64 + 1)
            .read_until(b'\n', &mut buf)
            .map_err(channel_err)?;
        if read == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        } else if buf.len() > MAX_SNAPSHOT_BYTES {
            // Hit the cap mid-line; skip to the next newline unbuffered.
            warn!(limit = MAX_SNAPSHOT_BYTES, "Dropping oversized snapshot message");
            discard_rest_of_line(&mut reader).map_err(channel_err)?;
            continue;
        }
        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        if engine.apply_message(&line).is_ok() {
            write_document(out, engine)?;
        }
    }
}

fn discard_rest_of_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|b| *b == b'\n') {
            Some(newline) => {
                reader.consume(newline + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

fn write_document(out: &Path, engine: &BoardEngine) -> Result<(), BoardError> {
    fs_err::write(out, document(&engine.render_html())).map_err(|source| BoardError::Io {
        context: format!("writing {}", out.display()),
        source,
    })
}

fn document(fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Summary Board</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        DOCUMENT_STYLE, fragment
    )
}

const DOCUMENT_STYLE: &str = "\
body{font-family:sans-serif;background:#f6f8fa;margin:0;padding:1rem}\
.empty-state{color:#667;padding:2rem;text-align:center}\
.group{background:#fff;border:1px solid #d8dee4;border-radius:6px;margin-bottom:1rem}\
.group-header{display:flex;align-items:center;gap:.5rem;padding:.5rem .75rem;font-weight:600;cursor:pointer}\
.group-header svg{width:16px;height:16px;fill:none;stroke:currentColor;stroke-width:2}\
.items.collapsed{display:none}\
.item{border-top:1px solid #eceff2}\
.item-head{display:flex;align-items:center;gap:.6rem;padding:.5rem .75rem;cursor:pointer}\
.color-dot{width:10px;height:10px;border-radius:50%;flex-shrink:0}\
.item-title{font-weight:600}\
.item-summary{color:#667;font-size:.85rem;white-space:pre-line}\
.item-caret{margin-left:auto}\
.item-caret svg{width:14px;height:14px;fill:none;stroke:currentColor;stroke-width:2}\
.item.open .item-caret{transform:rotate(90deg)}\
.content-body{padding:.25rem .75rem .75rem}\
.content-body.hidden{display:none}\
.content-body-inner pre{background:#f0f2f5;padding:.5rem;border-radius:4px;overflow-x:auto}";
