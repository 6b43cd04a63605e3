//! Interactive terminal prompts
//!
//! Used by `auth login` to collect credentials. The password prompt runs
//! the terminal in raw mode and never echoes; the plain prompt is ordinary
//! line input.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal,
};
use secrecy::SecretString;

/// Prompt for a line of visible input
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read input")?;

    Ok(input.trim().to_string())
}

/// Prompt for a secret without echoing
///
/// Characters are collected in raw mode; Backspace edits, Enter submits,
/// Esc or Ctrl+C cancels.
pub fn prompt_password(prompt: &str) -> Result<SecretString> {
    print!("{prompt}");
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let result = read_hidden();
    terminal::disable_raw_mode()?;

    // The user's Enter never echoed; keep the prompt line tidy
    println!();

    result.map(SecretString::new)
}

fn read_hidden() -> Result<String> {
    let mut input = String::new();
    loop {
        match event::read()? {
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                ..
            }) if modifiers.contains(event::KeyModifiers::CONTROL) => {
                anyhow::bail!("Input cancelled");
            }
            Event::Key(KeyEvent {
                code: KeyCode::Char(c),
                ..
            }) => {
                input.push(c);
            }
            Event::Key(KeyEvent {
                code: KeyCode::Backspace,
                ..
            }) => {
                input.pop();
            }
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            }) => break,
            Event::Key(KeyEvent {
                code: KeyCode::Esc, ..
            }) => {
                anyhow::bail!("Input cancelled");
            }
            _ => {}
        }
    }
    Ok(input)
}
