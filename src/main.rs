use colored::Colorize;
use std::process;

fn main() {
    match cmdlex::cli::run() {
        Ok(Some(code)) => process::exit(code),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
