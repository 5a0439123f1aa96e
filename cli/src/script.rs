//! Line-oriented input script.
//!
//! Each stdin line is one input event:
//!
//! ```text
//! key <name> [shift] [ctrl] [meta]
//! down <x> <y>
//! move <x> <y>
//! up
//! drop <path>
//! status
//! tick
//! quit
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::PathBuf;

use anyhow::{Context, bail};
use mono_pipeline::{Key, Modifiers, PointerEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptLine {
    Key { key: Key, mods: Modifiers },
    Pointer(PointerEvent),
    Drop(PathBuf),
    Status,
    Tick,
    Quit,
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ScriptLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    let parsed = match command {
        "key" => parse_key(rest)?,
        "down" => {
            let (x, y) = parse_point(rest)?;
            ScriptLine::Pointer(PointerEvent::Down { x, y })
        }
        "move" => {
            let (x, y) = parse_point(rest)?;
            ScriptLine::Pointer(PointerEvent::Move { x, y })
        }
        "up" => ScriptLine::Pointer(PointerEvent::Up),
        "drop" => {
            if rest.is_empty() {
                bail!("drop needs a path");
            }
            ScriptLine::Drop(PathBuf::from(rest))
        }
        "status" => ScriptLine::Status,
        "tick" => ScriptLine::Tick,
        "quit" | "exit" => ScriptLine::Quit,
        other => bail!("unknown command '{other}'"),
    };
    Ok(Some(parsed))
}

fn parse_key(rest: &str) -> anyhow::Result<ScriptLine> {
    let mut words = rest.split_whitespace();
    let name = words.next().context("key needs a name")?;
    let key = key_from_name(name)?;

    let mut mods = Modifiers::NONE;
    for word in words {
        match word {
            "shift" => mods.shift = true,
            "ctrl" => mods.ctrl = true,
            "meta" | "cmd" => mods.meta = true,
            other => bail!("unknown modifier '{other}'"),
        }
    }
    Ok(ScriptLine::Key { key, mods })
}

fn key_from_name(name: &str) -> anyhow::Result<Key> {
    let key = match name.to_ascii_lowercase().as_str() {
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => bail!("unknown key '{name}'"),
            }
        }
    };
    Ok(key)
}

fn parse_point(rest: &str) -> anyhow::Result<(f32, f32)> {
    let mut words = rest.split_whitespace();
    let mut coord = |axis: &str| -> anyhow::Result<f32> {
        words
            .next()
            .with_context(|| format!("missing {axis} coordinate"))?
            .parse()
            .with_context(|| format!("invalid {axis} coordinate"))
    };
    let x = coord("x")?;
    let y = coord("y")?;
    Ok((x, y))
}
