//! Check SDP files against the RFC 4566 grammar.
//!
//! Usage:
//!   sdp_check [OPTIONS] [FILE.sdp ...]
//!   sdp_check < file.sdp
//!
//! Options:
//!   --human, -H      Human-readable output
//!   --canonical, -c  Print the canonical form of each valid session
//!   --latin1         Decode text as ISO-8859-1 when no charset is declared
//!
//! Exits with status 1 if any input fails to parse. Set RUST_LOG=debug for
//! driver logging on stderr.

use sdpgrammar::{parse_with, serialize, Charset, ParseError, ParseOptions, SessionDescription};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy)]
enum OutputStyle {
    Compact,
    Human,
}

fn take_flag(args: &mut Vec<String>, long: &str, short: Option<&str>) -> bool {
    match args
        .iter()
        .position(|a| a == long || Some(a.as_str()) == short)
    {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

fn print_ok(name: &str, session: &SessionDescription, style: OutputStyle) {
    match style {
        OutputStyle::Compact => {
            println!(
                "{}: ok: {} time(s), {} media",
                name,
                session.times.len(),
                session.media.len()
            );
        }
        OutputStyle::Human => {
            println!("  {}: valid", name);
            println!("    session: {:?}", session.session_name);
            println!(
                "    origin:  {} {} {}",
                session.origin.username, session.origin.session_id, session.origin.address
            );
            for m in &session.media {
                let conn = m
                    .effective_connection(session)
                    .map(|c| c.address.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "    media:   {} {} {} [{}] @ {}",
                    m.media,
                    m.port,
                    m.protocol,
                    m.formats.join(" "),
                    conn
                );
            }
        }
    }
}

fn print_error(name: &str, e: &ParseError, style: OutputStyle) {
    match style {
        OutputStyle::Compact => {
            println!("{}:{}: error: {} [{} match]", name, e.offset, e.kind, e.matched);
        }
        OutputStyle::Human => {
            println!("  {} byte {}: {}", name, e.offset, e.kind);
            println!("    outcome: {} match", e.matched);
            println!("    near:    {:?}", e.context);
        }
    }
}

/// Returns false when the input did not parse.
fn check(
    name: &str,
    bytes: &[u8],
    options: &ParseOptions,
    style: OutputStyle,
    canonical: bool,
) -> io::Result<bool> {
    match parse_with(bytes, options) {
        Ok(session) => {
            if canonical {
                io::stdout().write_all(&serialize(&session))?;
            } else {
                print_ok(name, &session, style);
            }
            Ok(true)
        }
        Err(e) => {
            print_error(name, &e, style);
            Ok(false)
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let style = if take_flag(&mut args, "--human", Some("-H")) {
        OutputStyle::Human
    } else {
        OutputStyle::Compact
    };
    let canonical = take_flag(&mut args, "--canonical", Some("-c"));
    let mut options = ParseOptions::default();
    if take_flag(&mut args, "--latin1", None) {
        options.default_charset = Charset::Iso8859_1;
    }

    let mut failures = 0usize;
    if args.is_empty() {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        if !check("<stdin>", &bytes, &options, style, canonical)? {
            failures += 1;
        }
    } else {
        for path in &args {
            let path = Path::new(path);
            let bytes = match std::fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    failures += 1;
                    continue;
                }
            };
            if !check(&path.display().to_string(), &bytes, &options, style, canonical)? {
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("sdp_check: {} input(s) failed", failures);
        std::process::exit(1);
    }
    Ok(())
}
