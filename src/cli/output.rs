use colored::Colorize;
use rust_decimal::Decimal;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Section => "",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => format!("{} {text}", build_label(kind)).cyan().to_string(),
        MessageKind::Success => format!("{} {text}", build_label(kind)).green().to_string(),
        MessageKind::Warning => format!("{} {text}", build_label(kind)).yellow().to_string(),
        MessageKind::Error => format!("{} {text}", build_label(kind)).red().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let styled = apply_style(kind, message);
    match kind {
        MessageKind::Error | MessageKind::Warning => eprintln!("{styled}"),
        _ => println!("{styled}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Plain, unstyled line.
pub fn line(message: impl fmt::Display) {
    println!("{message}");
}

/// Two-decimal rendering used for every amount shown in the shell.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{rounded:.2}");
    if amount.is_sign_negative() {
        text.red().to_string()
    } else {
        text
    }
}

/// Disables ANSI styling, e.g. when output is piped.
pub fn disable_color() {
    colored::control::set_override(false);
}
