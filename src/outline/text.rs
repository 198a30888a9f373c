//! PDF text string encoding (ISO 32000-1:2008, Section 7.9.2.2).
//!
//! Outline titles are text strings: either PDFDocEncoding bytes or UTF-16BE
//! prefixed with a byte order mark.

/// Decode a PDF text string that may be UTF-16BE (with BOM), UTF-8 (with BOM,
/// PDF 2.0) or PDFDocEncoding.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16_pairs: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16_lossy(&utf16_pairs)
    } else if bytes.len() >= 3 && bytes[..3] == [0xEF, 0xBB, 0xBF] {
        String::from_utf8_lossy(&bytes[3..]).into_owned()
    } else {
        bytes.iter().filter_map(|&b| pdfdoc_char(b)).collect()
    }
}

/// Encode `text` as a PDF text string.
///
/// Plain ASCII is written as-is (ASCII is a subset of PDFDocEncoding);
/// anything else becomes UTF-16BE with BOM.
pub fn encode_text_string(text: &str) -> Vec<u8> {
    if text
        .chars()
        .all(|c| matches!(c, '\t' | '\n' | '\r' | ' '..='~'))
    {
        return text.as_bytes().to_vec();
    }

    let mut result = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        result.extend_from_slice(&unit.to_be_bytes());
    }
    result
}

/// PDFDocEncoding code point to char.
fn pdfdoc_char(code: u8) -> Option<char> {
    let c = match code {
        0x18 => '\u{02D8}', // breve
        0x19 => '\u{02C7}', // caron
        0x1A => '\u{02C6}', // circumflex
        0x1B => '\u{02D9}', // dotaccent
        0x1C => '\u{02DD}', // hungarumlaut
        0x1D => '\u{02DB}', // ogonek
        0x1E => '\u{02DA}', // ring
        0x1F => '\u{02DC}', // tilde
        0x7F => return None,
        0x80 => '\u{2022}',
        0x81 => '\u{2020}',
        0x82 => '\u{2021}',
        0x83 => '\u{2026}',
        0x84 => '\u{2014}',
        0x85 => '\u{2013}',
        0x86 => '\u{0192}',
        0x87 => '\u{2044}',
        0x88 => '\u{2039}',
        0x89 => '\u{203A}',
        0x8A => '\u{2212}',
        0x8B => '\u{2030}',
        0x8C => '\u{201E}',
        0x8D => '\u{201C}',
        0x8E => '\u{201D}',
        0x8F => '\u{2018}',
        0x90 => '\u{2019}',
        0x91 => '\u{201A}',
        0x92 => '\u{2122}',
        0x93 => '\u{FB01}',
        0x94 => '\u{FB02}',
        0x95 => '\u{0141}',
        0x96 => '\u{0152}',
        0x97 => '\u{0160}',
        0x98 => '\u{0178}',
        0x99 => '\u{017D}',
        0x9A => '\u{0131}',
        0x9B => '\u{0142}',
        0x9C => '\u{0153}',
        0x9D => '\u{0161}',
        0x9E => '\u{017E}',
        0x9F => return None,
        0xA0 => '\u{20AC}', // Euro
        0xAD => return None,
        _ => code as char,
    };
    Some(c)
}
