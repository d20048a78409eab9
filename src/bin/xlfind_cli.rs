//! CLI tool for xlfind - searches an XLSX workbook and outputs the hits as JSON
//!
//! Usage:
//!   xlfind_cli <input.xlsx> <query>               # Hits as JSON to stdout
//!   xlfind_cli --config session.conf <query>      # Workbook and hidden sheets from a config file
//!   xlfind_cli <input.xlsx> <query> -o hits.json  # Hits as JSON to a file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use xlfind::{Session, SessionConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: xlfind_cli <input.xlsx | --config file> <query> [-o output.json]");
        std::process::exit(1);
    }

    let (config, rest) = if args[1] == "--config" {
        let text = match fs::read_to_string(&args[2]) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error reading {}: {}", args[2], e);
                std::process::exit(1);
            }
        };
        match SessionConfig::from_kv_str(&text) {
            Ok(c) => (c, &args[3..]),
            Err(e) => {
                eprintln!("Error in {}: {}", args[2], e);
                std::process::exit(1);
            }
        }
    } else {
        let config = SessionConfig {
            file_path: Some(PathBuf::from(&args[1])),
            ..SessionConfig::default()
        };
        (config, &args[2..])
    };

    let Some(query) = rest.first() else {
        eprintln!("Missing query");
        std::process::exit(1);
    };
    let output_path = if rest.len() > 2 && rest[1] == "-o" {
        Some(&rest[2])
    } else {
        None
    };

    let mut session = Session::new(config);
    if let Err(e) = session.load_file(None) {
        eprintln!("Error loading workbook: {}", e);
        std::process::exit(1);
    }

    let results = match session.search(query) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error searching: {}", e);
            std::process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(results.hits()) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
