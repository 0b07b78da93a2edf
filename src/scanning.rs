// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Addr, Base, ScanDefect, ScanError, Scanned, V6_LEN};

/**
Extract the longest valid IP address prefix out of `input`.

The grammar is deliberately looser than `inet_pton`: next to standard
dotted-quad and compressed-IPv6 notation it accepts the historical
`inet_aton` forms (bare 32-bit integers, 1-4 dotted components in
decimal, octal or `0x` hex, magnitude redistribution into the final
component) and an embedded IPv4 tail inside an IPv6 address.

The scan stops at the first byte that cannot extend the address; text
after that point is the caller's problem, so addresses embedded in
larger expressions ("1.2.3.4/24", "::1,ff00::") scan cleanly. On
success [Scanned::consumed] is the length of the matched prefix; on
failure [ScanError::consumed] points at the offending byte. A NUL byte
terminates the scan like end of input.
*/
pub fn scan_addr(input: &str) -> Result<Scanned, ScanError> {
    let mut cur = Cursor::new(input.as_bytes());
    let mut head: [u16; 8] = [0; 8];
    let mut tail: [u16; 8] = [0; 8];
    let mut head_n: usize = 0;
    let mut tail_n: usize = 0;
    // groups seen after "::" land in `tail`
    let mut in_tail: bool = false;
    let mut v4: [u64; 4] = [0; 4];
    let mut v4_n: usize = 0;
    let mut colons: usize = 0;

    loop {
        let mut fmt = Fmt::Inv;
        let mut hex_chars: usize = 0;
        let mut o: u64 = 0;
        let mut d: u64 = 0;
        let mut h: u64 = 0;

        if cur.cur == b':' && cur.prev == b':' && cur.prev2 == b':' {
            return Err(halt(ScanDefect::ColonRun, &cur));
        }
        if cur.cur == b'.' && cur.prev == b'.' {
            return Err(halt(ScanDefect::DotRun, &cur));
        }

        /*
         * One numeric component. All three base interpretations are
         * accumulated in parallel; the width checks apply only to the
         * base the component turns out to be in.
         */
        if let Some(first) = hex_dig_ord(cur.cur) {
            let mut digval: u64 = first;
            let mut last_o: u64 = 0;
            let mut last_d: u64 = 0;
            let mut last_h: u64 = 0;
            fmt = Fmt::Unset;
            if cur.prev == b':' && cur.prev2 != b':' && head_n + tail_n == 0 {
                return Err(halt(ScanDefect::LoneLeadingColon, &cur));
            }
            loop {
                if digval > 9 {
                    hex_chars += 1;
                }
                o = o.wrapping_mul(8).wrapping_add(digval);
                if fmt == Fmt::Oct {
                    width_checks(o, last_o, Base::Oct, v4_n).map_err(|k| halt(k, &cur))?;
                }
                last_o = o;
                d = d.wrapping_mul(10).wrapping_add(digval);
                if fmt == Fmt::Unset {
                    width_checks(d, last_d, Base::Dec, v4_n).map_err(|k| halt(k, &cur))?;
                }
                last_d = d;
                h = h.wrapping_mul(16).wrapping_add(digval);
                if fmt == Fmt::Hex {
                    width_checks(h, last_h, Base::Hex, v4_n).map_err(|k| halt(k, &cur))?;
                }
                last_h = h;
                if colons > 0 && h > 0xFFFF {
                    return Err(halt(ScanDefect::GroupOverflow, &cur));
                }
                if hex_chars > 0 && fmt == Fmt::Unset && h > 0xFFFF {
                    return Err(halt(ScanDefect::WideBareHex, &cur));
                }
                cur.bump();
                // "0x" / "00x..." switches the component to explicit hex
                if h == 0 && (cur.cur == b'x' || cur.cur == b'X') {
                    fmt = Fmt::Hex;
                    cur.bump();
                }
                digval = match hex_dig_ord(cur.cur) {
                    Some(v) => v,
                    None => break,
                };
                // a leading zero followed by a nonzero digit means octal
                if h == 0 && fmt != Fmt::Hex && (b'1'..=b'9').contains(&cur.cur) {
                    fmt = Fmt::Oct;
                }
            }
        }

        // component followed by ':' or end of address: a 16-bit group
        if cur.cur != b'.' && v4_n == 0 && fmt != Fmt::Inv {
            if cur.cur == b':' && fmt == Fmt::Hex {
                return Err(halt(ScanDefect::HexBeforeColon, &cur));
            }
            if cur.cur != b':' && fmt == Fmt::Hex && colons > 0 {
                return Err(halt(ScanDefect::HexAfterColons, &cur));
            }
            if cur.cur == b':' && h > 0xFFFF {
                return Err(halt(ScanDefect::WideGroup, &cur));
            }
            if fmt == Fmt::Unset || fmt == Fmt::Oct {
                if head_n + tail_n >= 8 {
                    return Err(halt(ScanDefect::TooManyGroups, &cur));
                }
                // v6 groups read as hex whatever the component looked like
                if in_tail {
                    tail[tail_n] = h as u16;
                    tail_n += 1;
                } else {
                    head[head_n] = h as u16;
                    head_n += 1;
                }
            }
        }

        if cur.cur == b':' {
            if head_n + tail_n >= 8 {
                return Err(halt(ScanDefect::TooManyColons, &cur));
            }
            colons += 1;
            if cur.prev == b':' {
                if in_tail {
                    return Err(halt(ScanDefect::SecondGap, &cur));
                }
                in_tail = true;
            }
            cur.bump();
            continue;
        }

        // component followed by '.' or end of address: an IPv4 component
        if fmt != Fmt::Inv {
            if colons > 0 && v4_n == 0 && cur.cur != b'.' {
                // "1::2": the final group is not a dotted component
            } else {
                if colons > 0 && !(head_n == 6 || in_tail) {
                    return Err(halt(ScanDefect::MisplacedTail, &cur));
                }
                if v4_n >= 4 {
                    return Err(halt(ScanDefect::TooManyOctets, &cur));
                }
                v4[v4_n] = match fmt {
                    Fmt::Hex => h,
                    Fmt::Oct => o,
                    _ => {
                        if hex_chars > 0 && colons == 0 {
                            return Err(halt(ScanDefect::BareHexOctet, &cur));
                        }
                        d
                    }
                };
                v4_n += 1;
            }
        }

        if cur.cur == b'.' {
            if v4_n >= 4 {
                return Err(halt(ScanDefect::TooManyDots, &cur));
            }
            if head_n + tail_n > 6 {
                return Err(halt(ScanDefect::DotAfterGroups, &cur));
            }
            // a component with a '.' on both sides must fit one byte
            if v4_n >= 2 && v4[v4_n - 1] > 0xFF {
                return Err(halt(ScanDefect::InnerOctetRange, &cur));
            }
            cur.bump();
            continue;
        }

        if cur.prev == b':' && cur.prev2 != b':' {
            return Err(halt(ScanDefect::TrailingColon, &cur));
        }
        if cur.prev == b'.' {
            return Err(halt(ScanDefect::TrailingDot, &cur));
        }
        break;
    }

    let consumed: usize = cur.consumed();
    let fail = |kind: ScanDefect| ScanError { kind, consumed };

    let addr: Addr = if colons > 0 {
        if v4_n != 0 && v4_n != 4 {
            return Err(fail(ScanDefect::TailArity));
        }
        if v4_n == 4 && head_n + tail_n > 6 {
            return Err(fail(ScanDefect::TailAfterGroups));
        }
        let mut bytes: [u8; V6_LEN] = [0; V6_LEN];
        let mut at: usize = 0;
        for g in &head[..head_n] {
            bytes[at..at + 2].copy_from_slice(&g.to_be_bytes());
            at += 2;
        }
        // "::" stands for however many zero groups are left over
        let groups: usize = if v4_n == 4 { 6 } else { 8 };
        at += 2 * (groups - head_n - tail_n);
        for g in &tail[..tail_n] {
            bytes[at..at + 2].copy_from_slice(&g.to_be_bytes());
            at += 2;
        }
        if v4_n == 4 {
            if v4[0] > 0xFF {
                return Err(fail(ScanDefect::FirstOctetRange));
            }
            bytes[12] = v4[0] as u8;
            bytes[13] = v4[1] as u8;
            bytes[14] = v4[2] as u8;
            bytes[15] = v4[3] as u8;
        }
        Addr::from_v6(bytes)
    } else {
        // the final dotted component absorbs the remaining width
        let octets: [u8; 4] = match v4_n {
            0 => return Err(fail(ScanDefect::NoComponents)),
            1 => (v4[0] as u32).to_be_bytes(),
            2 | 3 | 4 if v4[0] > 0xFF => return Err(fail(ScanDefect::FirstOctetRange)),
            2 => [v4[0] as u8, (v4[1] >> 16) as u8, (v4[1] >> 8) as u8, v4[1] as u8],
            3 => [v4[0] as u8, v4[1] as u8, (v4[2] >> 8) as u8, v4[2] as u8],
            4 => [v4[0] as u8, v4[1] as u8, v4[2] as u8, v4[3] as u8],
            _ => return Err(fail(ScanDefect::TailArityCheck)),
        };
        Addr::from_v4(octets)
    };

    Ok(Scanned { addr, consumed })
}

/* -------------------------------------------------------------------------- */

/// Numeral format of the component being read.
#[derive(Clone, Copy, Eq, PartialEq)]
enum Fmt {
    /// no component at all this round
    Inv,
    /// digits seen, base still open (plain decimal if it stays this way)
    Unset,
    Oct,
    Hex,
}

fn halt(kind: ScanDefect, cur: &Cursor) -> ScanError {
    ScanError { kind, consumed: cur.consumed() }
}

const fn hex_dig_ord(c: u8) -> Option<u64> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u64),
        b'a'..=b'f' => Some((c - b'a' + 10) as u64),
        b'A'..=b'F' => Some((c - b'A' + 10) as u64),
        _ => None,
    }
}

/// Width limit of a potentially-final dotted component at index `v4_n`:
/// the later the component starts, the fewer address bytes are left for
/// it to fill.
const fn max_final(v4_n: usize) -> u64 {
    match v4_n {
        1 => 0x00FF_FFFF,
        2 => 0xFFFF,
        _ => 0xFF,
    }
}

fn width_checks(t: u64, prev: u64, base: Base, v4_n: usize) -> Result<(), ScanDefect> {
    if v4_n > 0 && t > max_final(v4_n) {
        return Err(ScanDefect::OctetOverflow(base));
    }
    if t > 0xFFFF_FFFF {
        return Err(ScanDefect::ValueOverflow(base));
    }
    if prev > t {
        return Err(ScanDefect::ValueWrap(base));
    }
    Ok(())
}

/**
Byte cursor with two characters of look-back.

`cur` is the byte under inspection, `prev`/`prev2` the two before it;
past the end (or at an embedded NUL) `cur` reads as 0, which no grammar
byte matches. [Cursor::consumed] is the offset of `cur`, and since only
ASCII bytes are ever matched it always lands on a UTF-8 boundary.
*/
struct Cursor<'a> {
    input: &'a [u8],
    next: usize,
    cur: u8,
    prev: u8,
    prev2: u8,
    read: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        let mut c = Cursor { input, next: 0, cur: 0, prev: 0, prev2: 0, read: 0 };
        c.bump();
        c
    }

    fn bump(&mut self) {
        self.prev2 = self.prev;
        self.prev = self.cur;
        self.cur = match self.input.get(self.next) {
            Some(&b) if b != 0 => b,
            _ => 0,
        };
        self.next += 1;
        self.read += 1;
    }

    /// Offset of the byte currently under inspection.
    fn consumed(&self) -> usize {
        self.read - 1
    }
}

/* -------------------------------------------------------------------------- */
