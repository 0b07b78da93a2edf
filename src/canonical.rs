// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{structs::Addr, IpFam};
use std::fmt;

/**
Canonical text form of an address: the one rendering the scanner maps
back onto the same bytes, usable as a stable comparison key.

IPv4 is plain decimal dotted quad. IPv6 follows the RFC 5952 shape:
lowercase hex groups with no leading zeros, the leftmost of the longest
all-zero group runs collapsed to `::` (a lone zero group stays written
out), and the IPv4-mapped prefix rendered as `::ffff:` plus a dotted
quad.
*/
impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fam() {
            IpFam::V4 => fmt_v4(self.as_bytes(), f),
            IpFam::V6 => fmt_v6(self.as_bytes(), f),
        }
    }
}

fn fmt_v4(b: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}.{}", b[0], b[1], b[2], b[3])
}

fn fmt_v6(b: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if b[..10].iter().all(|&x| x == 0) && b[10] == 0xFF && b[11] == 0xFF {
        write!(f, "::ffff:")?;
        return fmt_v4(&b[12..], f);
    }

    let mut groups: [u16; 8] = [0; 8];
    for (i, g) in groups.iter_mut().enumerate() {
        *g = u16::from_be_bytes([b[2 * i], b[2 * i + 1]]);
    }

    // leftmost maximal zero run; a single zero group is left alone
    let mut run_at: usize = 8;
    let mut run_len: usize = 0;
    let mut i: usize = 0;
    while i < 8 {
        let mut j: usize = i;
        while j < 8 && groups[j] == 0 {
            j += 1;
        }
        if j - i > run_len {
            run_len = j - i;
            run_at = i;
        }
        i = j + 1;
    }

    let mut i: usize = 0;
    while i < 8 {
        if run_len >= 2 && i == run_at {
            if i == 0 {
                f.write_str(":")?;
            }
            f.write_str(":")?;
            i += run_len;
            continue;
        }
        write!(f, "{:x}", groups[i])?;
        if i != 7 {
            f.write_str(":")?;
        }
        i += 1;
    }
    Ok(())
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_addr;

    fn canon(s: &str) -> String {
        scan_addr(s).unwrap().addr.to_string()
    }

    #[test]
    fn test_leftmost_longest_zero_run() {
        // two equal-length runs: the leftmost one wins
        assert_eq!(canon("1:0:0:4:5:0:0:8"), "1::4:5:0:0:8");
        assert_eq!(canon("1:0:0:4:5:6:0:0"), "1::4:5:6:0:0");
        assert_eq!(canon("0:0:3:4:5:6:0:0"), "::3:4:5:6:0:0");
        // the later run is longer
        assert_eq!(canon("1:0:0:4:0:0:0:8"), "1:0:0:4::8");
    }

    #[test]
    fn test_lone_zero_group_not_compressed() {
        assert_eq!(canon("1:2:3:0:5:6:7:8"), "1:2:3:0:5:6:7:8");
        assert_eq!(canon("0:1:2:3:4:5:6:7"), "0:1:2:3:4:5:6:7");
        assert_eq!(canon("1:2:3:4:5:6:7:0"), "1:2:3:4:5:6:7:0");
    }

    #[test]
    fn test_run_position_edges() {
        assert_eq!(canon("::"), "::");
        assert_eq!(canon("2::"), "2::");
        assert_eq!(canon("::2"), "::2");
        assert_eq!(canon("1:2:3:4::7:8"), "1:2:3:4::7:8");
    }

    #[test]
    fn test_mapped_form() {
        let addr = scan_addr("::FfFf:1.2.3.4").unwrap().addr;
        assert_eq!(addr.to_string(), "::ffff:1.2.3.4");
        // 0xFFFE in the mapped slot is an ordinary group
        assert_eq!(canon("::fffe:1.2.3.4"), "::fffe:102:304");
    }

    #[test]
    fn test_round_trip_fully_consumes() {
        const VECTORS: &[&str] = &[
            "1.2.3.4",
            "255.255.255.255",
            "0.0.0.0",
            "::",
            "::1",
            "ffff::",
            "1:2:3:4:5:6:7:8",
            "::ffff:1.2.3.4",
            "1::4:5:0:0:8",
            "fe80::aa:bb:cc:dd",
        ];
        for &v in VECTORS {
            let first = scan_addr(v).unwrap();
            let text = first.addr.to_string();
            let again = scan_addr(&text).unwrap();
            assert_eq!(again.addr, first.addr, "round trip of {v:?}");
            assert_eq!(again.consumed, text.len(), "full consumption of {text:?}");
            // canonicalization is idempotent
            assert_eq!(again.addr.to_string(), text);
        }
    }
}
