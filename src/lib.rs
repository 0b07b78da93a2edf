// Copyright (c) 2025-2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Legacy-tolerant IP address text handling.

This crate scans the longest valid address prefix out of a string
(accepting bare-integer, octal and hex IPv4 forms next to standard dotted
and compressed-IPv6 notation), renders binary addresses back into their
single canonical text form, and compiles comma/whitespace-separated lists
of addresses, ranges and CIDR prefixes into an ordered [RangeList] for
first-match access control checks.

No I/O, no shared state; every operation is linear in input length.
*/

mod canonical;
mod ranges;
mod scanning;
mod strings;
mod structs;

use std::{error, fmt};
use strings::*;

pub use scanning::scan_addr;
pub use structs::{Addr, Compiled, IpFam, RangeItem, RangeList, Scanned};

pub(crate) const V4_LEN: usize = 4;
pub(crate) const V6_LEN: usize = 16;

/// Worst-case canonical text width of an IPv4 address ("255.255.255.255").
pub const V4_TEXT_MAX: usize = 15;
/// Worst-case canonical text width of an IPv6 address.
pub const V6_TEXT_MAX: usize = 45;
/// Worst-case text width of one range list item ("low-high" plus a separator).
pub const RANGE_ITEM_TEXT_MAX: usize = 2 * V6_TEXT_MAX + 2;

/// Numeral base inferred for a single address component.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Base {
    Dec,
    Oct,
    Hex,
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base::Dec => f.write_str(BASE_DEC),
            Base::Oct => f.write_str(BASE_OCT),
            Base::Hex => f.write_str(BASE_HEX),
        }
    }
}

/**
One structural defect class per way an address scan can go wrong.

Each variant corresponds to exactly one check in the scanner, so callers
can tell a duplicated separator from a field overflow from a misplaced
IPv4 tail without string matching. The numeric-field defects carry the
[Base] the component was being read in.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanDefect {
    /// `":::"`
    ColonRun,
    /// `".."`
    DotRun,
    /// a component after a lone leading `':'` (`":3"`)
    LoneLeadingColon,
    /// dotted component wider than its position allows
    OctetOverflow(Base),
    /// component wider than 32 bits
    ValueOverflow(Base),
    /// component wrapped the 64-bit accumulator
    ValueWrap(Base),
    /// group wider than 16 bits in a `':'` context (`"::ffff1"`)
    GroupOverflow,
    /// unprefixed hex word wider than 16 bits outside `':'` context (`"abcde"`)
    WideBareHex,
    /// explicit `0x` group directly before `':'` (`"0x1:"`)
    HexBeforeColon,
    /// explicit `0x` group terminating a `':'` address (`"::0x1"`)
    HexAfterColons,
    /// first group wider than 16 bits before `':'` (`"10000:3"`)
    WideGroup,
    /// a ninth group
    TooManyGroups,
    /// `':'` after eight groups
    TooManyColons,
    /// a second `"::"`
    SecondGap,
    /// dotted tail not after six groups or `"::"` (`"1:2.3.4.5"`)
    MisplacedTail,
    /// a fifth dotted component
    TooManyOctets,
    /// bare hex digits in a dotted/bare component (`"abcd"`)
    BareHexOctet,
    /// non-final dotted component exceeds 255
    InnerOctetRange,
    /// `'.'` after four dotted components (`"1.2.3.4."`)
    TooManyDots,
    /// `'.'` after more than six groups
    DotAfterGroups,
    /// address ends with a lone `':'`
    TrailingColon,
    /// address ends with `'.'`
    TrailingDot,
    /// embedded IPv4 tail with the wrong component count (`"::ffff:1.2"`)
    TailArity,
    /// 4-component tail after more than six groups
    TailAfterGroups,
    /// nothing parseable at all
    NoComponents,
    /// tail arity re-check at assembly (defensive)
    TailArityCheck,
    /// first dotted component exceeds 255 (`"300.1.2.3"`)
    FirstOctetRange,
    /// scan succeeded but did not consume the whole string (`Addr::from_str`)
    TrailingText,
}

impl fmt::Display for ScanDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanDefect::ColonRun => f.write_str(ERR_COLON_RUN),
            ScanDefect::DotRun => f.write_str(ERR_DOT_RUN),
            ScanDefect::LoneLeadingColon => f.write_str(ERR_LONE_COLON),
            ScanDefect::OctetOverflow(b) => write!(f, "{ERR_OCTET_WIDE} ({b})"),
            ScanDefect::ValueOverflow(b) => write!(f, "{ERR_VALUE_WIDE} ({b})"),
            ScanDefect::ValueWrap(b) => write!(f, "{ERR_VALUE_WRAP} ({b})"),
            ScanDefect::GroupOverflow => f.write_str(ERR_GROUP_WIDE),
            ScanDefect::WideBareHex => f.write_str(ERR_BARE_HEX_WIDE),
            ScanDefect::HexBeforeColon => f.write_str(ERR_HEX_BEFORE_COLON),
            ScanDefect::HexAfterColons => f.write_str(ERR_HEX_AFTER_COLONS),
            ScanDefect::WideGroup => f.write_str(ERR_WIDE_GROUP),
            ScanDefect::TooManyGroups => f.write_str(ERR_MANY_GROUPS),
            ScanDefect::TooManyColons => f.write_str(ERR_MANY_COLONS),
            ScanDefect::SecondGap => f.write_str(ERR_SECOND_GAP),
            ScanDefect::MisplacedTail => f.write_str(ERR_TAIL_PLACE),
            ScanDefect::TooManyOctets => f.write_str(ERR_MANY_OCTETS),
            ScanDefect::BareHexOctet => f.write_str(ERR_BARE_HEX_OCTET),
            ScanDefect::InnerOctetRange => f.write_str(ERR_OCTET_RANGE),
            ScanDefect::TooManyDots => f.write_str(ERR_MANY_DOTS),
            ScanDefect::DotAfterGroups => f.write_str(ERR_DOT_AFTER_GROUPS),
            ScanDefect::TrailingColon => f.write_str(ERR_TRAIL_COLON),
            ScanDefect::TrailingDot => f.write_str(ERR_TRAIL_DOT),
            ScanDefect::TailArity => f.write_str(ERR_TAIL_ARITY),
            ScanDefect::TailAfterGroups => f.write_str(ERR_TAIL_GROUPS),
            ScanDefect::NoComponents => f.write_str(ERR_NO_COMPONENTS),
            ScanDefect::TailArityCheck => f.write_str(ERR_TAIL_CHECK),
            ScanDefect::FirstOctetRange => f.write_str(ERR_FIRST_OCTET),
            ScanDefect::TrailingText => f.write_str(ERR_TRAIL_TEXT),
        }
    }
}

/// A failed address scan: the defect plus how many bytes matched before it.
///
/// `consumed` points at the exact offending byte, so a caller embedding
/// the address in a larger string can report its position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanError {
    pub kind: ScanDefect,
    pub consumed: usize,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ERR_SCAN}: {} ({ERR_AT_BYTE} {})", self.kind, self.consumed)
    }
}

impl error::Error for ScanError {}

/// What went wrong while compiling one range list expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RangeDefect {
    /// an embedded address failed to scan
    Addr(ScanError),
    /// `"A-B"` where A and B are not the same family
    BoundMismatch,
    /// `"A/N"` where N does not start with a digit 1-9
    Prefix,
    /// `"A/N"` where N exceeds the address width in bits
    PrefixRange(u32),
}

impl fmt::Display for RangeDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeDefect::Addr(e) => write!(f, "{e}"),
            RangeDefect::BoundMismatch => f.write_str(ERR_BOUND_MIX),
            RangeDefect::Prefix => f.write_str(ERR_PREFIX_FMT),
            RangeDefect::PrefixRange(n) => write!(f, "{ERR_PREFIX_RANGE}: {n}"),
        }
    }
}

/**
A failed range list compile.

`consumed` covers the expressions accepted before the defect. The
partially built list travels inside the error: the receiver owns it and
decides whether to inspect or drop it, which pins down the cleanup
responsibility the error path would otherwise leave ambiguous.
*/
#[derive(Debug)]
pub struct RangeError {
    pub kind: RangeDefect,
    pub consumed: usize,
    pub partial: RangeList,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ERR_COMPILE}: {} ({ERR_AT_BYTE} {})", self.kind, self.consumed)
    }
}

impl error::Error for RangeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            RangeDefect::Addr(e) => Some(e),
            _ => None,
        }
    }
}
