use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}ℹ️{} {}", FG_BLUE, BOLD, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}✅{} {}", FG_GREEN, BOLD, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}⚠️{} {}", FG_YELLOW, BOLD, RESET, msg);
}

/// Aligned `label : value` line for operator summaries.
pub fn field<L: fmt::Display, V: fmt::Display>(label: L, value: V) {
    println!("   {}{:<12}{} : {}", BOLD, label.to_string(), RESET, value);
}
