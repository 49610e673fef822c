//! Scripted input for headless runs.
//!
//! Each line is typed into the game as-is, except comments (`#`) and
//! directives that drive the clock:
//!
//! - `:wait N` delivers N simulation pulses
//! - `:system N` delivers N animation-only pulses
//! - `:skip` delivers one forced-skip pulse
use anyhow::{Context, Result, bail};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Input(String),
    Wait(u64),
    System(u64),
    Skip,
}

/// Parse one script line. Comments yield `None`; a blank line is ENTER.
pub fn parse_line(line: &str) -> Result<Option<Directive>> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim_start().starts_with('#') {
        return Ok(None);
    }
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Ok(Some(Directive::Input(trimmed.to_string())));
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let count = parts
        .next()
        .map(str::parse::<u64>)
        .transpose()
        .with_context(|| format!("bad count in directive {trimmed:?}"))?;
    let directive = match (name, count) {
        ("wait", Some(n)) => Directive::Wait(n),
        ("wait", None) => Directive::Wait(1),
        ("system", Some(n)) => Directive::System(n),
        ("system", None) => Directive::System(1),
        ("skip", None) => Directive::Skip,
        _ => bail!("unknown script directive {trimmed:?}"),
    };
    Ok(Some(directive))
}

pub fn parse(source: &str) -> Result<Vec<Directive>> {
    let mut directives = Vec::new();
    for (number, line) in source.lines().enumerate() {
        if let Some(directive) =
            parse_line(line).with_context(|| format!("script line {}", number + 1))?
        {
            directives.push(directive);
        }
    }
    Ok(directives)
}

/// Read and parse a script file; `-` reads stdin.
pub fn load(path: &Path) -> Result<Vec<Directive>> {
    let source = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read script from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?
    };
    parse(&source)
}
