//! Address codec and CIDR matching property tests
//!
//! - Every canonical dotted quad round-trips through parse/format
//! - Prefix 32 matches only the base address
//! - Prefix 0 matches everything
//! - Matching agrees with a 32-bit mask comparison for every prefix length

use proptest::prelude::*;
use stratus_core::{matches, CidrBlock, Ipv4Address};

fn arb_address() -> impl Strategy<Value = Ipv4Address> {
    any::<[u8; 4]>().prop_map(Ipv4Address::from_octets)
}

fn mask_reference(address: Ipv4Address, base: Ipv4Address, prefix_len: u8) -> bool {
    if prefix_len == 0 {
        return true;
    }
    let mask = u32::MAX << (32 - u32::from(prefix_len));
    address.to_bits() & mask == base.to_bits() & mask
}

proptest! {
    #[test]
    fn dotted_quad_round_trips(octets in any::<[u8; 4]>()) {
        let text = format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3]);
        let parsed = Ipv4Address::parse(&text).unwrap();
        prop_assert_eq!(parsed.octets(), octets);
        prop_assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn bits_round_trip(bits in any::<u32>()) {
        prop_assert_eq!(Ipv4Address::from_bits(bits).to_bits(), bits);
    }

    #[test]
    fn prefix_32_matches_only_itself(a in arb_address(), b in arb_address()) {
        let block = CidrBlock::host(b);
        prop_assert!(matches(b, &block));
        prop_assert_eq!(matches(a, &block), a == b);
    }

    #[test]
    fn prefix_0_matches_everything(a in arb_address(), base in arb_address()) {
        let block = CidrBlock::new(base, 0).unwrap();
        prop_assert!(matches(a, &block));
    }

    #[test]
    fn octet_matching_agrees_with_word_mask(
        a in arb_address(),
        base in arb_address(),
        prefix_len in 0u8..=32,
    ) {
        let block = CidrBlock::new(base, prefix_len).unwrap();
        prop_assert_eq!(matches(a, &block), mask_reference(a, base, prefix_len));
    }

    #[test]
    fn cidr_text_round_trips(base in arb_address(), prefix_len in 0u8..=32) {
        let block = CidrBlock::new(base, prefix_len).unwrap();
        let text = block.to_string();
        prop_assert_eq!(CidrBlock::parse(&text).unwrap(), block);
    }
}

#[test]
fn partial_byte_literals() {
    let addr = |s: &str| Ipv4Address::parse(s).unwrap();
    let block = |s: &str| CidrBlock::parse(s).unwrap();

    // 10.0.0.0/30 spans .0 through .3 only.
    assert!(!block("10.0.0.0/30").contains(addr("10.0.0.5")));
    assert!(!block("10.0.0.0/30").contains(addr("10.0.0.4")));
    assert!(block("10.0.0.0/30").contains(addr("10.0.0.3")));
    assert!(!block("10.0.0.8/30").contains(addr("10.0.0.5")));
    assert!(block("10.0.0.4/30").contains(addr("10.0.0.5")));
}
