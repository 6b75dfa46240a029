use std::env;
use std::process;

use anyhow::{Context, Result};

mod builtins;
mod command;
mod input;
mod jobs;
mod prompt;
mod shell;
mod signal_handler;
mod tokenizer;

fn print_help() {
    println!("ush - micro unix shell");
    println!();
    println!("Usage: ush [OPTIONS]");
    println!("  -h, --help       Print this help");
    println!("  -v, --version    Print version");
}

fn print_version() {
    println!("ush v0.1.0");
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        process::exit(0);
    }

    if args.iter().any(|a| a == "-v" || a == "--version" || a == "-V") {
        print_version();
        process::exit(0);
    }

    signal_handler::install().context("failed to install SIGCHLD handler")?;

    let mut shell = shell::Shell::new();
    shell.run()
}
