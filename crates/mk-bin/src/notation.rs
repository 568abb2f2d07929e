//! Key-notation parser for script input.
//!
//! A script is a sequence of keystrokes: bare characters stand for
//! themselves, whitespace separates keystrokes without producing any,
//! and angle brackets carry named keys and chords (`<Esc>`, `<CR>`,
//! `<C-o>`, `<S-Left>`).

use anyhow::{Result, bail};
use core_keys::{KeyInput, KeyToken, ModMask, NamedKey};

pub fn parse_script(input: &str) -> Result<Vec<KeyInput>> {
    let mut keys = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c == '<' {
            let mut body = String::new();
            loop {
                match chars.next() {
                    Some('>') => break,
                    Some(inner) => body.push(inner),
                    None => bail!("unterminated angle notation: <{body}"),
                }
            }
            keys.push(parse_angle(&body)?);
        } else {
            keys.push(KeyInput::ch(c));
        }
    }
    Ok(keys)
}

fn parse_angle(body: &str) -> Result<KeyInput> {
    let mut mods = ModMask::empty();
    let mut rest = body;
    loop {
        let Some((prefix, tail)) = rest.split_once('-') else {
            break;
        };
        let mask = match prefix {
            "C" | "c" => ModMask::CTRL,
            "A" | "a" => ModMask::ALT,
            "S" | "s" => ModMask::SHIFT,
            "M" | "m" => ModMask::META,
            _ => break,
        };
        mods |= mask;
        rest = tail;
    }

    let token = match rest {
        "Esc" | "esc" => KeyToken::Named(NamedKey::Escape),
        "CR" | "cr" | "Enter" | "enter" => KeyToken::Named(NamedKey::Enter),
        "BS" | "bs" => KeyToken::Named(NamedKey::Backspace),
        "Del" | "del" => KeyToken::Named(NamedKey::Delete),
        "Tab" | "tab" => KeyToken::Named(NamedKey::Tab),
        "Home" | "home" => KeyToken::Named(NamedKey::Home),
        "End" | "end" => KeyToken::Named(NamedKey::End),
        "Left" | "left" => KeyToken::Named(NamedKey::Left),
        "Right" | "right" => KeyToken::Named(NamedKey::Right),
        "Up" | "up" => KeyToken::Named(NamedKey::Up),
        "Down" | "down" => KeyToken::Named(NamedKey::Down),
        "Space" | "space" => KeyToken::Char(' '),
        "lt" => KeyToken::Char('<'),
        other => {
            let mut rest_chars = other.chars();
            match (rest_chars.next(), rest_chars.next()) {
                (Some(c), None) => KeyToken::Char(c),
                _ => bail!("unknown key name: <{body}>"),
            }
        }
    };
    Ok(KeyInput::with_mods(token, mods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_characters_parse_individually() {
        let keys = parse_script("dw").unwrap();
        assert_eq!(keys, vec![KeyInput::ch('d'), KeyInput::ch('w')]);
    }

    #[test]
    fn whitespace_separates_without_emitting() {
        let keys = parse_script("d w\nx").unwrap();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn named_keys_and_chords() {
        let keys = parse_script("<Esc><C-o><S-Left>").unwrap();
        assert_eq!(
            keys,
            vec![
                KeyInput::named(NamedKey::Escape),
                KeyInput::ctrl('o'),
                KeyInput::with_mods(KeyToken::Named(NamedKey::Left), ModMask::SHIFT),
            ]
        );
    }

    #[test]
    fn stacked_modifiers() {
        let keys = parse_script("<C-A-x>").unwrap();
        assert_eq!(
            keys,
            vec![KeyInput::with_mods(
                KeyToken::Char('x'),
                ModMask::CTRL | ModMask::ALT
            )]
        );
    }

    #[test]
    fn escaped_less_than() {
        let keys = parse_script("<lt>").unwrap();
        assert_eq!(keys, vec![KeyInput::ch('<')]);
    }

    #[test]
    fn unterminated_notation_is_an_error() {
        assert!(parse_script("<C-o").is_err());
        assert!(parse_script("<Bogus>").is_err());
    }
}
