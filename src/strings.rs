// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

// scanning.rs
pub(crate) static ERR_COLON_RUN: &str = "three ':' in a row";
pub(crate) static ERR_DOT_RUN: &str = "two '.' in a row";
pub(crate) static ERR_LONE_COLON: &str = "address cannot start with a single ':'";
pub(crate) static ERR_OCTET_WIDE: &str = "dotted component too wide for its position";
pub(crate) static ERR_VALUE_WIDE: &str = "value does not fit in 32 bits";
pub(crate) static ERR_VALUE_WRAP: &str = "value wrapped the accumulator";
pub(crate) static ERR_GROUP_WIDE: &str = "group does not fit in 16 bits";
pub(crate) static ERR_BARE_HEX_WIDE: &str = "unprefixed hex word wider than 16 bits";
pub(crate) static ERR_HEX_BEFORE_COLON: &str = "'0x' group directly before ':'";
pub(crate) static ERR_HEX_AFTER_COLONS: &str = "'0x' group cannot end a ':' address";
pub(crate) static ERR_WIDE_GROUP: &str = "group before ':' does not fit in 16 bits";
pub(crate) static ERR_MANY_GROUPS: &str = "more than 8 groups";
pub(crate) static ERR_MANY_COLONS: &str = "':' after 8 groups";
pub(crate) static ERR_SECOND_GAP: &str = "a second '::'";
pub(crate) static ERR_TAIL_PLACE: &str = "dotted tail must follow 6 groups or '::'";
pub(crate) static ERR_MANY_OCTETS: &str = "more than 4 dotted components";
pub(crate) static ERR_BARE_HEX_OCTET: &str = "hex digits in a dotted component need '0x'";
pub(crate) static ERR_OCTET_RANGE: &str = "non-final dotted component exceeds 255";
pub(crate) static ERR_MANY_DOTS: &str = "'.' after 4 dotted components";
pub(crate) static ERR_DOT_AFTER_GROUPS: &str = "dotted tail after more than 6 groups";
pub(crate) static ERR_TRAIL_COLON: &str = "trailing ':'";
pub(crate) static ERR_TRAIL_DOT: &str = "trailing '.'";
pub(crate) static ERR_TAIL_ARITY: &str = "embedded IPv4 tail needs exactly 4 components";
pub(crate) static ERR_TAIL_GROUPS: &str = "IPv4 tail after more than 6 groups";
pub(crate) static ERR_NO_COMPONENTS: &str = "no address components";
pub(crate) static ERR_TAIL_CHECK: &str = "IPv4 tail arity check";
pub(crate) static ERR_FIRST_OCTET: &str = "first dotted component exceeds 255";
pub(crate) static ERR_TRAIL_TEXT: &str = "trailing text after address";
pub(crate) static ERR_SCAN: &str = "address scan failed";
pub(crate) static ERR_AT_BYTE: &str = "at byte";

// ranges.rs
pub(crate) static ERR_BOUND_MIX: &str = "range bounds mix IPv4 and IPv6";
pub(crate) static ERR_PREFIX_FMT: &str = "prefix length must start with a digit 1-9";
pub(crate) static ERR_PREFIX_RANGE: &str = "prefix length out of range";
pub(crate) static ERR_COMPILE: &str = "range list compile failed";

// Base
pub(crate) static BASE_DEC: &str = "decimal";
pub(crate) static BASE_OCT: &str = "octal";
pub(crate) static BASE_HEX: &str = "hex";
