//! Baud configuration tests.

use rstest::rstest;
use uartsim_core::common::ConfigError;
use uartsim_core::common::constants::MAX_BAUD_DIVISOR;
use uartsim_core::uart::BaudConfig;

#[test]
fn baud_rejects_zero() {
    assert!(matches!(BaudConfig::new(0), Err(ConfigError::ZeroDivisor)));
}

#[test]
fn baud_default_is_25() {
    assert_eq!(BaudConfig::default().divisor(), 25);
}

#[rstest]
#[case(1, 0, 0)]
#[case(2, 1, 2)]
#[case(3, 2, 3)]
#[case(4, 3, 5)]
#[case(25, 24, 36)]
fn baud_countdowns(#[case] divisor: u32, #[case] bit: u32, #[case] first_sample: u32) {
    let baud = BaudConfig::new(divisor).unwrap();
    assert_eq!(baud.bit_countdown(), bit);
    assert_eq!(baud.first_sample_countdown(), first_sample);
}

#[rstest]
#[case(0x0000_0019, 25)]
#[case(0x0100_0019, 25)]
#[case(0xFF00_0364, 868)]
#[case(0x00FF_FFFF, 0x00FF_FFFF)]
fn baud_setup_register_uses_low_24_bits(#[case] raw: u32, #[case] divisor: u32) {
    assert_eq!(BaudConfig::from_setup_register(raw).unwrap().divisor(), divisor);
}

#[test]
fn baud_setup_register_zero_field_rejected() {
    assert!(matches!(
        BaudConfig::from_setup_register(0xFF00_0000),
        Err(ConfigError::ZeroDivisor)
    ));
}

#[test]
fn baud_largest_divisor_has_countdowns() {
    let baud = BaudConfig::new(MAX_BAUD_DIVISOR).unwrap();
    assert_eq!(baud.bit_countdown(), 0x00FF_FFFE);
    assert_eq!(baud.first_sample_countdown(), 0x00FF_FFFF + 0x007F_FFFF - 1);
}

#[rstest]
#[case(0x0100_0000)]
#[case(u32::MAX)]
fn baud_rejects_divisor_wider_than_setup_field(#[case] divisor: u32) {
    assert!(matches!(
        BaudConfig::new(divisor),
        Err(ConfigError::DivisorTooLarge(d)) if d == divisor
    ));
}
