// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    scan_addr, Addr, Compiled, IpFam, RangeDefect, RangeError, RangeItem, RangeList, Scanned,
    RANGE_ITEM_TEXT_MAX,
};
use ipnet::{IpNet, Ipv6Net};
use std::{
    fmt,
    net::{IpAddr, Ipv6Addr},
};
use tracing::error;

impl RangeList {
    /**
    Compile a textual range list into an ordered [RangeList].

    The list is a sequence of expressions separated by commas and/or
    whitespace (any byte <= `' '`). Each expression is a single address
    `A`, an inclusive range `A-B` with both bounds in the same family,
    or a CIDR block `A/N`. List order is preserved: it is the match
    order of [RangeList::match_ordinal].

    On failure the error carries the offset of the failed expression
    and the items compiled before it; the input up to
    [Compiled::consumed] round-trips through the `Display` form into an
    equivalent list.
    */
    pub fn compile(input: &str) -> Result<Compiled, RangeError> {
        let bytes: &[u8] = input.as_bytes();
        let mut items: Vec<RangeItem> = Vec::new();
        let mut pos: usize = 0;

        loop {
            while pos < bytes.len() && bytes[pos] != 0 && (bytes[pos] == b',' || bytes[pos] <= b' ')
            {
                pos += 1;
            }
            if pos >= bytes.len() || bytes[pos] == 0 {
                break;
            }

            let low: Scanned = match scan_addr(&input[pos..]) {
                Ok(s) => s,
                Err(e) => return Err(compile_err(RangeDefect::Addr(e), pos, items)),
            };
            pos += low.consumed;

            let item: RangeItem = match bytes.get(pos) {
                Some(b'-') => {
                    pos += 1;
                    let high: Scanned = match scan_addr(&input[pos..]) {
                        Ok(s) => s,
                        Err(e) => return Err(compile_err(RangeDefect::Addr(e), pos, items)),
                    };
                    if high.addr.fam() != low.addr.fam() {
                        return Err(compile_err(RangeDefect::BoundMismatch, pos, items));
                    }
                    pos += high.consumed;
                    RangeItem::from_bounds(low.addr, high.addr)
                }
                Some(b'/') => {
                    pos += 1;
                    // a leading zero would make "A/0" (the whole address
                    // space) valid; it never is in an access list
                    if !matches!(bytes.get(pos), Some(b'1'..=b'9')) {
                        return Err(compile_err(RangeDefect::Prefix, pos, items));
                    }
                    let mut prefix: u32 = 0;
                    while let Some(b @ b'0'..=b'9') = bytes.get(pos) {
                        prefix = prefix.saturating_mul(10).saturating_add(u32::from(b - b'0'));
                        pos += 1;
                    }
                    if prefix > low.addr.fam().bits() {
                        return Err(compile_err(RangeDefect::PrefixRange(prefix), pos, items));
                    }
                    cidr_block(low.addr, prefix)
                }
                // anything else (separator, end of input, or text the
                // next round will choke on) closes a single-address item
                _ => RangeItem::host(low.addr),
            };
            items.push(item);
        }

        Ok(Compiled { list: RangeList { items }, consumed: pos })
    }

    /// 1-based position of the first item containing `addr`, 0 if none.
    pub fn match_ordinal(&self, addr: &Addr) -> usize {
        for (i, item) in self.items.iter().enumerate() {
            if item.contains(addr) {
                return i + 1;
            }
        }
        0
    }

    /// Like `to_string`, but stops before any item that might not fit in
    /// `cap` bytes. Truncation is item-granular: the output is always a
    /// valid (possibly shorter) range list.
    pub fn to_text_bounded(&self, cap: usize) -> String {
        let mut out = String::new();
        for (i, item) in self.items.iter().enumerate() {
            if cap.saturating_sub(out.len()) < RANGE_ITEM_TEXT_MAX {
                break;
            }
            out.push_str(&item.to_string());
            if i + 1 < self.items.len() {
                out.push(',');
            }
        }
        out
    }
}

fn compile_err(kind: RangeDefect, consumed: usize, items: Vec<RangeItem>) -> RangeError {
    let err = RangeError { kind, consumed, partial: RangeList { items } };
    error!("range list compile failed: {}", err);
    err
}

impl fmt::Display for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RangeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low() == self.high() {
            write!(f, "{}", self.low())
        } else {
            write!(f, "{}-{}", self.low(), self.high())
        }
    }
}

/* -------------------------------------------------------------------------- */

impl RangeItem {
    /**
    Decompose the interval into the minimal set of CIDR blocks covering
    exactly its addresses, in ascending order. Works on block arithmetic,
    never enumeration, so arbitrarily large IPv6 ranges are fine.

    An inverted interval (`high < low`) yields an empty set, matching
    what [RangeItem::contains] says about it.
    */
    pub fn to_cidrs(&self) -> Vec<IpNet> {
        let fam: IpFam = self.fam();
        let bits: u8 = fam.bits() as u8;
        let mut low: u128 = self.low().to_bits();
        let high: u128 = self.high().to_bits();
        let mut out: Vec<IpNet> = Vec::new();

        // full v6 space, where the block size itself overflows u128
        if fam == IpFam::V6 && low == 0 && high == u128::MAX {
            if let Ok(net) = Ipv6Net::new(Ipv6Addr::UNSPECIFIED, 0) {
                out.push(IpNet::V6(net));
            }
            return out;
        }

        while low <= high {
            // widest block aligned at `low`
            let tz: u8 = low.trailing_zeros() as u8;
            let max_align_prefix: u8 = bits.saturating_sub(tz.min(bits));

            // widest block that fits in what is left
            let remaining: u128 = (high - low).saturating_add(1);
            let max_fit_prefix: u8 = bits - floor_log2_u128(remaining);

            let prefix: u8 = max_align_prefix.max(max_fit_prefix);
            let net_addr: IpAddr = Addr::from_bits(fam, low).into();
            if let Ok(net) = IpNet::new(net_addr, prefix) {
                out.push(net);
            }

            // prefix 0 for v6 was handled above; 1 << 128 must not happen
            if bits == 128 && prefix == 0 {
                break;
            }
            low = match low.checked_add(1u128 << u32::from(bits - prefix)) {
                Some(v) => v,
                None => break, // block ended at the top of the v6 space
            };
        }
        out
    }
}

/// The inclusive interval covered by `addr/prefix`, with host bits
/// cleared in the low bound and set in the high bound.
fn cidr_block(addr: Addr, prefix: u32) -> RangeItem {
    let fam: IpFam = addr.fam();
    let mask: u128 = mask_bits(fam.bits(), prefix);
    let all: u128 = mask_bits(fam.bits(), fam.bits());
    let low: u128 = addr.to_bits() & mask;
    let high: u128 = low | (!mask & all);
    RangeItem::from_bounds(Addr::from_bits(fam, low), Addr::from_bits(fam, high))
}

/// Netmask of `prefix` leading ones in an address `bits` wide.
fn mask_bits(bits: u32, prefix: u32) -> u128 {
    if prefix == 0 {
        return 0;
    }
    let all: u128 = if bits == 128 { !0u128 } else { (1u128 << bits) - 1 };
    if prefix >= bits {
        return all;
    }
    all & !((1u128 << (bits - prefix)) - 1)
}

fn floor_log2_u128(x: u128) -> u8 {
    debug_assert!(x >= 1);
    127u8.saturating_sub(x.leading_zeros() as u8)
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScanDefect;

    const ACL: &str = "1.2.3.4,1.2.3.8-1.2.3.10,FF00::1/8,10.10.10.255/30";

    fn addr(s: &str) -> Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_end_to_end_ordinals() {
        let list = RangeList::compile(ACL).unwrap().list;
        assert_eq!(list.len(), 4);

        assert_eq!(list.match_ordinal(&addr("1.2.3.4")), 1);
        assert_eq!(list.match_ordinal(&addr("1.2.3.8")), 2);
        assert_eq!(list.match_ordinal(&addr("1.2.3.9")), 2);
        assert_eq!(list.match_ordinal(&addr("1.2.3.10")), 2);
        assert_eq!(list.match_ordinal(&addr("1.2.3.11")), 0);
        assert_eq!(list.match_ordinal(&addr("FF00::")), 3);
        assert_eq!(list.match_ordinal(&addr("FFFF::")), 3);
        assert_eq!(list.match_ordinal(&addr("FE00::")), 0);
        assert_eq!(list.match_ordinal(&addr("10.10.10.252")), 4);
        assert_eq!(list.match_ordinal(&addr("10.10.10.254")), 4);
        assert_eq!(list.match_ordinal(&addr("10.10.10.255")), 4);
        assert_eq!(list.match_ordinal(&addr("10.10.10.251")), 0);
        assert_eq!(list.match_ordinal(&addr("10.10.11.0")), 0);
        // the families never cross-match
        assert_eq!(list.match_ordinal(&addr("1::1")), 0);
    }

    #[test]
    fn test_cidr_expansion() {
        let list = RangeList::compile("10.10.10.255/30").unwrap().list;
        let item = &list.items()[0];
        assert_eq!(item.low().to_string(), "10.10.10.252");
        assert_eq!(item.high().to_string(), "10.10.10.255");
    }

    #[test]
    fn test_display_is_canonical() {
        let compiled = RangeList::compile(ACL).unwrap();
        assert_eq!(compiled.consumed, ACL.len());
        assert_eq!(
            compiled.list.to_string(),
            "1.2.3.4,1.2.3.8-1.2.3.10,\
             ff00::-ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff,\
             10.10.10.252-10.10.10.255"
        );
        // the canonical text compiles back to the same list
        let again = RangeList::compile(&compiled.list.to_string()).unwrap();
        assert_eq!(again.list, compiled.list);
    }

    #[test]
    fn test_separators_and_empty_input() {
        let compiled = RangeList::compile("").unwrap();
        assert!(compiled.list.is_empty());
        assert_eq!(compiled.consumed, 0);
        assert_eq!(compiled.list.match_ordinal(&addr("1.2.3.4")), 0);

        let input = "  1.2.3.4 ,\t::1,,\n 10.0.0.0/8  ";
        let compiled = RangeList::compile(input).unwrap();
        assert_eq!(compiled.list.len(), 3);
        assert_eq!(compiled.consumed, input.len());
    }

    #[test]
    fn test_compile_errors() {
        let err = RangeList::compile("1.2.3.4,notanip").unwrap_err();
        assert_eq!(err.consumed, 8);
        assert_eq!(err.partial.len(), 1);
        assert!(matches!(err.kind, RangeDefect::Addr(_)));

        let err = RangeList::compile("1.2.3.4-::1").unwrap_err();
        assert_eq!(err.kind, RangeDefect::BoundMismatch);
        assert_eq!(err.consumed, 8);

        let err = RangeList::compile("1.2.3.4/0").unwrap_err();
        assert_eq!(err.kind, RangeDefect::Prefix);
        let err = RangeList::compile("1.2.3.4/x").unwrap_err();
        assert_eq!(err.kind, RangeDefect::Prefix);
        let err = RangeList::compile("1.2.3.4/33").unwrap_err();
        assert_eq!(err.kind, RangeDefect::PrefixRange(33));
        assert!(RangeList::compile("1.2.3.4/32").is_ok());
        assert!(RangeList::compile("::1/128").is_ok());
        let err = RangeList::compile("::1/129").unwrap_err();
        assert_eq!(err.kind, RangeDefect::PrefixRange(129));
    }

    #[test]
    fn test_unseparated_text_fails_on_next_round() {
        // the scan stops at 'x'; the leftover text is the next
        // expression, and it is not an address
        let err = RangeList::compile("1.2.3.4x").unwrap_err();
        assert_eq!(err.consumed, 7);
        assert_eq!(err.partial.len(), 1);
        match err.kind {
            RangeDefect::Addr(e) => assert_eq!(e.kind, ScanDefect::NoComponents),
            other => panic!("unexpected defect {other:?}"),
        }
    }

    #[test]
    fn test_bounded_text() {
        let list = RangeList::compile(ACL).unwrap().list;
        let full = list.to_text_bounded(1024);
        assert_eq!(full, list.to_string());

        // item 3 is the long v6 range; cut the capacity under it
        let cut = list.to_text_bounded(full.len() - 1);
        assert!(full.starts_with(&cut));
        assert!(cut.len() < full.len());
        assert_eq!(list.to_text_bounded(0), "");
    }

    #[test]
    fn test_to_cidrs() {
        let list = RangeList::compile("1.2.3.8-1.2.3.10").unwrap().list;
        let cidrs = list.items()[0].to_cidrs();
        let texts: Vec<String> = cidrs.iter().map(|n| n.to_string()).collect();
        assert_eq!(texts, ["1.2.3.8/31", "1.2.3.10/32"]);

        let list = RangeList::compile("10.10.10.255/30").unwrap().list;
        let cidrs = list.items()[0].to_cidrs();
        assert_eq!(cidrs.len(), 1);
        assert_eq!(cidrs[0].to_string(), "10.10.10.252/30");

        // the v6 range runs to the top of the address space
        let list = RangeList::compile("FF00::1/8").unwrap().list;
        let cidrs = list.items()[0].to_cidrs();
        assert_eq!(cidrs.len(), 1);
        assert_eq!(cidrs[0].to_string(), "ff00::/8");

        let full = RangeItem::from_bounds(addr("::"), addr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"));
        let cidrs = full.to_cidrs();
        assert_eq!(cidrs.len(), 1);
        assert_eq!(cidrs[0].to_string(), "::/0");
    }
}
