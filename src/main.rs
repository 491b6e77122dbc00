// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Koukku CLI
//!
//! Command-line access to the helpers modules use at runtime.

use std::env;
use std::process::ExitCode;

use koukku::utils::{decode_payload, extract_csp_from_html, nonce_from_policy, query_params};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("koukku=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "jwt" => {
            if args.len() < 3 {
                eprintln!("Usage: koukku jwt <token>");
                return ExitCode::from(1);
            }
            decode_jwt(&args[2])
        }
        "query" => {
            if args.len() < 3 {
                eprintln!("Usage: koukku query <url>");
                return ExitCode::from(1);
            }
            show_query(&args[2])
        }
        "nonce" => {
            if args.len() < 3 {
                eprintln!("Usage: koukku nonce <url>");
                return ExitCode::from(1);
            }
            find_nonce(&args[2]).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("koukku {}", koukku::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Koukku - Runtime Hooks for Launcher Modules

USAGE:
    koukku <COMMAND> [ARGS]

COMMANDS:
    jwt <token>     Decode and print a JWT payload
    query <url>     List the query parameters of a URL
    nonce <url>     Fetch a page and print its CSP nonce
    help            Show this help message
    version         Show version information

EXAMPLES:
    koukku jwt "Bearer eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiI0MiJ9.c2ln"
    koukku query "https://example.com/callback?code=abc&state=xyz"
    koukku nonce https://example.com/login
"#
    );
}

fn decode_jwt(token: &str) -> ExitCode {
    match decode_payload(token) {
        Ok(payload) => {
            match serde_json::to_string_pretty(&payload) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{}", payload),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to decode token: {}", e);
            ExitCode::from(1)
        }
    }
}

fn show_query(url: &str) -> ExitCode {
    let params = query_params(url);
    if params.is_empty() {
        println!("No query parameters");
        return ExitCode::SUCCESS;
    }

    println!("=== Query Parameters ({}) ===", params.len());
    for (name, value) in &params {
        println!("  {} = {}", name, value);
    }
    ExitCode::SUCCESS
}

async fn find_nonce(url: &str) -> ExitCode {
    println!("Fetching: {}", url);

    let response = match reqwest::get(url).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to fetch page: {}", e);
            return ExitCode::from(1);
        }
    };

    let header_policy = response
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let html = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Failed to read body: {}", e);
            return ExitCode::from(1);
        }
    };

    let sources = [
        ("header", header_policy),
        ("meta", extract_csp_from_html(&html)),
    ];

    let mut found = false;
    for (source, policy) in sources {
        let Some(policy) = policy else { continue };
        tracing::debug!(source, policy = %policy, "Found CSP");

        if let Some(nonce) = nonce_from_policy(&policy) {
            println!("Nonce ({}): {}", source, nonce);
            found = true;
        }
    }

    if !found {
        println!("No CSP nonce found");
    }
    ExitCode::SUCCESS
}
