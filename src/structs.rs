// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{scan_addr, RangeDefect, ScanDefect, ScanError, V4_LEN, V6_LEN};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

/// IP address family
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum IpFam {
    V4,
    V6,
}

impl IpFam {
    /// Address width in bytes: 4 or 16.
    pub const fn len(self) -> usize {
        match self {
            IpFam::V4 => V4_LEN,
            IpFam::V6 => V6_LEN,
        }
    }

    /// Address width in bits: 32 or 128.
    pub const fn bits(self) -> u32 {
        match self {
            IpFam::V4 => 32,
            IpFam::V6 => 128,
        }
    }
}

/**
A fixed-width binary IP address: 4 (V4) or 16 (V6) big-endian bytes,
never anything in between.

The backing array is always 16 bytes; for V4 addresses the trailing 12
bytes are zero, which lets ordering and equality derive structurally
(family first, then bytes).
*/
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Addr {
    fam: IpFam,
    bytes: [u8; 16],
}

impl Addr {
    pub fn from_v4(octets: [u8; V4_LEN]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..V4_LEN].copy_from_slice(&octets);
        Addr { fam: IpFam::V4, bytes }
    }

    pub fn from_v6(octets: [u8; V6_LEN]) -> Self {
        Addr { fam: IpFam::V6, bytes: octets }
    }

    pub fn fam(&self) -> IpFam {
        self.fam
    }

    /// Address width in bytes: 4 or 16.
    pub fn len(&self) -> usize {
        self.fam.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Exactly the live big-endian bytes (4 or 16).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The address as a fixed-width big-endian integer.
    pub(crate) fn to_bits(self) -> u128 {
        match self.fam {
            IpFam::V4 => {
                let mut o = [0u8; 4];
                o.copy_from_slice(&self.bytes[..V4_LEN]);
                u32::from_be_bytes(o) as u128
            }
            IpFam::V6 => u128::from_be_bytes(self.bytes),
        }
    }

    /// Inverse of [Addr::to_bits]; the value must fit the family width.
    pub(crate) fn from_bits(fam: IpFam, v: u128) -> Self {
        match fam {
            IpFam::V4 => Addr::from_v4((v as u32).to_be_bytes()),
            IpFam::V6 => Addr::from_v6(v.to_be_bytes()),
        }
    }
}

impl From<Ipv4Addr> for Addr {
    fn from(a: Ipv4Addr) -> Self {
        Addr::from_v4(a.octets())
    }
}

impl From<Ipv6Addr> for Addr {
    fn from(a: Ipv6Addr) -> Self {
        Addr::from_v6(a.octets())
    }
}

impl From<IpAddr> for Addr {
    fn from(a: IpAddr) -> Self {
        match a {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<&Addr> for IpAddr {
    fn from(a: &Addr) -> Self {
        match a.fam {
            IpFam::V4 => {
                let mut o = [0u8; 4];
                o.copy_from_slice(&a.bytes[..V4_LEN]);
                IpAddr::V4(Ipv4Addr::from(o))
            }
            IpFam::V6 => IpAddr::V6(Ipv6Addr::from(a.bytes)),
        }
    }
}

impl From<Addr> for IpAddr {
    fn from(a: Addr) -> Self {
        IpAddr::from(&a)
    }
}

impl FromStr for Addr {
    type Err = ScanError;

    /// Strict form of [scan_addr]: the whole string must be one address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scanned: Scanned = scan_addr(s)?;
        if scanned.consumed != s.len() {
            return Err(ScanError {
                kind: ScanDefect::TrailingText,
                consumed: scanned.consumed,
            });
        }
        Ok(scanned.addr)
    }
}

impl Serialize for Addr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Addr {
    fn deserialize<D>(deserializer: D) -> Result<Addr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Addr>().map_err(de::Error::custom)
    }
}

/// A successful address scan: the address plus how many bytes it covered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scanned {
    pub addr: Addr,
    /// bytes of input belonging to the matched address
    pub consumed: usize,
}

/// A successful range list compile.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Compiled {
    pub list: RangeList,
    /// bytes of input consumed, including separators
    pub consumed: usize,
}

/* -------------------------------------------------------------------------- */

/// Inclusive interval of same-family addresses (endpoints included).
///
/// No ordering is enforced between the bounds; a caller that constructs
/// `high < low` gets an item nothing matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RangeItem {
    low: Addr,
    high: Addr,
}

impl RangeItem {
    /// Build an item from two bounds of the same family.
    pub fn new(low: Addr, high: Addr) -> Result<Self, RangeDefect> {
        if low.fam() != high.fam() {
            return Err(RangeDefect::BoundMismatch);
        }
        Ok(RangeItem { low, high })
    }

    /// The single-address interval `[addr, addr]`.
    pub fn host(addr: Addr) -> Self {
        RangeItem { low: addr, high: addr }
    }

    pub(crate) fn from_bounds(low: Addr, high: Addr) -> Self {
        debug_assert_eq!(low.fam(), high.fam());
        RangeItem { low, high }
    }

    pub fn low(&self) -> &Addr {
        &self.low
    }

    pub fn high(&self) -> &Addr {
        &self.high
    }

    pub fn fam(&self) -> IpFam {
        self.low.fam()
    }

    /// Whether `addr` lies inside the interval. Always false for the
    /// other family.
    pub fn contains(&self, addr: &Addr) -> bool {
        addr.fam() == self.fam()
            && addr.as_bytes() >= self.low.as_bytes()
            && addr.as_bytes() <= self.high.as_bytes()
    }
}

/**
An ordered list of [RangeItem]s compiled from text.

Order is semantic: [RangeList::match_ordinal] returns the first (lowest
index) hit. Built once by [RangeList::compile], read-only afterwards; a
plain owned vector, so it is freely shareable between readers.
*/
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RangeList {
    pub(crate) items: Vec<RangeItem>,
}

impl RangeList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RangeItem] {
        &self.items
    }
}

impl Serialize for RangeList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RangeList {
    fn deserialize<D>(deserializer: D) -> Result<RangeList, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let compiled: Compiled = RangeList::compile(&s).map_err(de::Error::custom)?;
        Ok(compiled.list)
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_V4: &str = "192.168.1.1";
    const TEST_V6: &str = "2001:db8::1";
    const TEST_PART: &str = "1.2.3.4/24";

    #[test]
    fn test_from_str_requires_full_consumption() {
        assert!(TEST_V4.parse::<Addr>().is_ok());
        assert!(TEST_V6.parse::<Addr>().is_ok());
        let err = TEST_PART.parse::<Addr>().unwrap_err();
        assert_eq!(err.kind, ScanDefect::TrailingText);
        assert_eq!(err.consumed, 7);
    }

    #[test]
    fn test_std_conversions_roundtrip() {
        let std_v4: IpAddr = TEST_V4.parse().unwrap();
        let std_v6: IpAddr = TEST_V6.parse().unwrap();
        assert_eq!(IpAddr::from(Addr::from(std_v4)), std_v4);
        assert_eq!(IpAddr::from(Addr::from(std_v6)), std_v6);
    }

    #[test]
    fn test_ordering_is_family_then_bytes() {
        let a: Addr = "1.2.3.4".parse().unwrap();
        let b: Addr = "1.2.3.5".parse().unwrap();
        let c: Addr = "::1".parse().unwrap();
        assert!(a < b);
        assert!(b < c); // any V4 sorts before any V6
    }

    #[test]
    fn test_item_rejects_mixed_families() {
        let v4: Addr = "1.2.3.4".parse().unwrap();
        let v6: Addr = "::1".parse().unwrap();
        assert_eq!(RangeItem::new(v4, v6).unwrap_err(), RangeDefect::BoundMismatch);
        assert!(RangeItem::new(v4, v4).is_ok());
    }

    #[test]
    fn test_contains_respects_family() {
        let low: Addr = "10.0.0.1".parse().unwrap();
        let high: Addr = "10.0.0.9".parse().unwrap();
        let item = RangeItem::new(low, high).unwrap();
        assert!(item.contains(&"10.0.0.5".parse().unwrap()));
        assert!(!item.contains(&"10.0.0.10".parse().unwrap()));
        assert!(!item.contains(&"::1".parse().unwrap()));
    }

    #[test]
    fn test_serde_string_form() {
        let addr: Addr = "::ffff:1.2.3.4".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"::ffff:1.2.3.4\"");
        let back: Addr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);

        let list = RangeList::compile("1.2.3.4,10.0.0.0/8").unwrap().list;
        let json = serde_json::to_string(&list).unwrap();
        let back: RangeList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
