//! Key-event to PTY byte translation.
//!
//! Focused PTY zones receive canonical VT sequences: control chords as
//! C0 bytes, Alt as an ESC prefix, arrows and Home/End as CSI finals,
//! paging keys as CSI-tilde. Keys without a translation return `None`
//! and are dropped rather than guessed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn key_event_to_bytes(key: &KeyEvent) -> Option<Vec<u8>> {
    let mods = key.modifiers;
    match key.code {
        KeyCode::Char(ch) => Some(encode_char(ch, mods)),
        KeyCode::Enter => Some(alt_prefixed(mods, vec![b'\r'])),
        KeyCode::Tab => Some(alt_prefixed(mods, vec![b'\t'])),
        KeyCode::BackTab => Some(b"\x1b[Z".to_vec()),
        KeyCode::Backspace => Some(alt_prefixed(mods, vec![0x7f])),
        KeyCode::Esc => Some(vec![0x1b]),
        KeyCode::Up => Some(csi_final(mods, 'A')),
        KeyCode::Down => Some(csi_final(mods, 'B')),
        KeyCode::Right => Some(csi_final(mods, 'C')),
        KeyCode::Left => Some(csi_final(mods, 'D')),
        KeyCode::Home => Some(csi_final(mods, 'H')),
        KeyCode::End => Some(csi_final(mods, 'F')),
        KeyCode::Insert => Some(csi_tilde(mods, 2)),
        KeyCode::Delete => Some(csi_tilde(mods, 3)),
        KeyCode::PageUp => Some(csi_tilde(mods, 5)),
        KeyCode::PageDown => Some(csi_tilde(mods, 6)),
        _ => None,
    }
}

fn encode_char(ch: char, mods: KeyModifiers) -> Vec<u8> {
    let base = if mods.contains(KeyModifiers::CONTROL) {
        let folded = ch.to_ascii_lowercase();
        if folded.is_ascii_lowercase() {
            vec![(folded as u8 - b'a') + 1]
        } else {
            utf8_bytes(ch)
        }
    } else {
        utf8_bytes(ch)
    };
    alt_prefixed(mods, base)
}

fn utf8_bytes(ch: char) -> Vec<u8> {
    let mut buffer = [0u8; 4];
    ch.encode_utf8(&mut buffer).as_bytes().to_vec()
}

fn alt_prefixed(mods: KeyModifiers, bytes: Vec<u8>) -> Vec<u8> {
    if !mods.contains(KeyModifiers::ALT) {
        return bytes;
    }
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.push(0x1b);
    out.extend(bytes);
    out
}

/// xterm-style modifier parameter: 1 + Shift(1) + Alt(2) + Ctrl(4).
fn modifier_param(mods: KeyModifiers) -> Option<u8> {
    let mut value = 1;
    if mods.contains(KeyModifiers::SHIFT) {
        value += 1;
    }
    if mods.contains(KeyModifiers::ALT) {
        value += 2;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        value += 4;
    }
    (value > 1).then_some(value)
}

fn csi_final(mods: KeyModifiers, final_char: char) -> Vec<u8> {
    match modifier_param(mods) {
        Some(param) => format!("\x1b[1;{param}{final_char}").into_bytes(),
        None => format!("\x1b[{final_char}").into_bytes(),
    }
}

fn csi_tilde(mods: KeyModifiers, code: u8) -> Vec<u8> {
    match modifier_param(mods) {
        Some(param) => format!("\x1b[{code};{param}~").into_bytes(),
        None => format!("\x1b[{code}~").into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn printable_chars_pass_through() {
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(vec![b'a'])
        );
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Char('é'), KeyModifiers::NONE)),
            Some("é".as_bytes().to_vec())
        );
    }

    #[test]
    fn ctrl_letters_become_control_codes() {
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(vec![0x03])
        );
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Char('A'), KeyModifiers::CONTROL)),
            Some(vec![0x01])
        );
    }

    #[test]
    fn alt_adds_escape_prefix() {
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Char('x'), KeyModifiers::ALT)),
            Some(vec![0x1b, b'x'])
        );
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Backspace, KeyModifiers::ALT)),
            Some(vec![0x1b, 0x7f])
        );
    }

    #[test]
    fn arrows_and_paging_are_csi() {
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Up, KeyModifiers::NONE)),
            Some(b"\x1b[A".to_vec())
        );
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Up, KeyModifiers::CONTROL)),
            Some(b"\x1b[1;5A".to_vec())
        );
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::PageDown, KeyModifiers::NONE)),
            Some(b"\x1b[6~".to_vec())
        );
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Delete, KeyModifiers::SHIFT)),
            Some(b"\x1b[3;2~".to_vec())
        );
    }

    #[test]
    fn enter_is_carriage_return() {
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(vec![b'\r'])
        );
    }

    #[test]
    fn unmapped_keys_are_none() {
        assert_eq!(
            key_event_to_bytes(&key(KeyCode::F(5), KeyModifiers::NONE)),
            None
        );
    }
}
