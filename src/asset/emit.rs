//! Binary to assembly transcription.
//!
//! The payload is linked into the firmware as read-only data between two
//! global labels:
//!
//! ```text
//! .data
//! .section .rodata.embedded
//! .global main_js_start
//! main_js_start:
//! .byte 0x1f, 0x8b, 0x08, ...
//! .global main_js_end
//! main_js_end:
//! ```

use std::fmt::Write;

/// Bytes per `.byte` directive.
const BYTES_PER_LINE: usize = 16;

/// Render `bytes` as a GNU assembler data section bound to `<symbol>_start`
/// and `<symbol>_end`.
pub fn emit(bytes: &[u8], symbol: &str) -> String {
    // ".byte" + 16 * " 0xNN," per line
    let mut out = String::with_capacity(bytes.len() * 6 + 128);

    out.push_str(".data\n.section .rodata.embedded\n");
    let _ = writeln!(out, ".global {symbol}_start\n{symbol}_start:");

    for chunk in bytes.chunks(BYTES_PER_LINE) {
        out.push_str(".byte");
        for (i, byte) in chunk.iter().enumerate() {
            let sep = if i == 0 { "" } else { "," };
            let _ = write!(out, "{sep} 0x{byte:02x}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, ".global {symbol}_end\n{symbol}_end:");
    out
}
