//! 十六进制转储
//!
//! 每行 16 字节：偏移量、十六进制字节、可打印 ASCII。用于 trace 级别的收发日志。

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// 生成多行十六进制转储文本
///
/// ```
/// use dobot_protocol::hex_dump;
///
/// let dump = hex_dump(&[0xAA, 0xAA, 0x02, 0x01, 0x00, 0xFF]);
/// assert_eq!(dump, "0000  AA AA 02 01 00 FF                                |......|");
/// ```
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        if line > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:04X} ", line * BYTES_PER_LINE);
        for i in 0..BYTES_PER_LINE {
            match chunk.get(i) {
                Some(b) => {
                    let _ = write!(out, " {:02X}", b);
                },
                None => out.push_str("   "),
            }
        }
        out.push_str("  |");
        out.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push('|');
    }
    out
}

/// 单行紧凑格式（`AA AA 02 ...`）
pub fn hex_line(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(hex_dump(&[]), "");
        assert_eq!(hex_line(&[]), "");
    }

    #[test]
    fn test_multi_line() {
        let data: Vec<u8> = (0x41..0x41 + 20).collect();
        let dump = hex_dump(&data);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000  41 42"));
        assert!(lines[0].ends_with("|ABCDEFGHIJKLMNOP|"));
        assert!(lines[1].starts_with("0010  51 52 53 54"));
        assert!(lines[1].ends_with("|QRST|"));
        // 不足 16 字节的行需补齐，ASCII 列对齐
        assert_eq!(lines[0].find('|'), lines[1].find('|'));
    }

    #[test]
    fn test_hex_line() {
        assert_eq!(hex_line(&[0xAA, 0x01, 0xFF]), "AA 01 FF");
    }
}
