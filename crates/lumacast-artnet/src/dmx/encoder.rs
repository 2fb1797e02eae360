//! Color to DMX channel mapping per fixture type

use super::DmxBuffer;
use crate::config::FixtureType;
use crate::sampling::Rgb;
use crate::senders::ComputedFixture;

/// Luma weights for the single dimmer channel
const LUMA_R: f64 = 0.279;
const LUMA_G: f64 = 0.547;
const LUMA_B: f64 = 0.106;

/// Perceptually weighted intensity of a color
pub fn luma(color: Rgb) -> u8 {
    let y = LUMA_R * f64::from(color.r) + LUMA_G * f64::from(color.g) + LUMA_B * f64::from(color.b);
    y.round() as u8
}

/// Split a color into saturated RGB plus a shared white component.
///
/// Returns `[r - w, g - w, b - w, w]` with `w = min(r, g, b)`.
pub fn rgbw(color: Rgb) -> [u8; 4] {
    let w = color.r.min(color.g).min(color.b);
    [color.r - w, color.g - w, color.b - w, w]
}

/// Write a fixture's channels for `color` at its address.
///
/// Only `fixture_type.channels_required()` bytes starting at `fixture.address`
/// are touched. The address range is checked when the configuration is built,
/// not here.
pub fn encode(buffer: &mut DmxBuffer, fixture: &ComputedFixture, color: Rgb) {
    let out = &mut buffer[fixture.address..];
    match fixture.fixture_type {
        FixtureType::Dimmer => out[0] = luma(color),
        FixtureType::Rgb => out[..3].copy_from_slice(&[color.r, color.g, color.b]),
        FixtureType::Rgbw => out[..4].copy_from_slice(&rgbw(color)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmx::UNIVERSE_SIZE;
    use crate::geometry::Rectangle;
    use proptest::prelude::*;

    fn fixture(fixture_type: FixtureType, address: usize) -> ComputedFixture {
        ComputedFixture {
            fixture_type,
            address,
            rectangle: Rectangle::from_corner(0.0, 0.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_encode_rgb() {
        let mut dmx_data = [0u8; UNIVERSE_SIZE];
        encode(&mut dmx_data, &fixture(FixtureType::Rgb, 0), Rgb::new(255, 128, 64));

        assert_eq!(dmx_data[0], 255); // Red
        assert_eq!(dmx_data[1], 128); // Green
        assert_eq!(dmx_data[2], 64); // Blue
        assert!(dmx_data[3..].iter().all(|v| *v == 0));
    }

    #[test]
    fn test_encode_rgbw() {
        let mut dmx_data = [0u8; UNIVERSE_SIZE];
        encode(&mut dmx_data, &fixture(FixtureType::Rgbw, 10), Rgb::new(200, 150, 100));
        assert_eq!(&dmx_data[10..14], &[100, 50, 0, 100]);
    }

    #[test]
    fn test_encode_dimmer() {
        let mut dmx_data = [0u8; UNIVERSE_SIZE];
        encode(&mut dmx_data, &fixture(FixtureType::Dimmer, 511), Rgb::new(255, 255, 255));
        // 0.932 * 255 = 237.66
        assert_eq!(dmx_data[511], 238);
        assert!(dmx_data[..511].iter().all(|v| *v == 0));
    }

    #[test]
    fn test_luma_rounds() {
        assert_eq!(luma(Rgb::new(0, 0, 0)), 0);
        // 0.279 * 10 + 0.547 * 20 + 0.106 * 30 = 16.91
        assert_eq!(luma(Rgb::new(10, 20, 30)), 17);
        assert_eq!(luma(Rgb::new(0, 255, 0)), 139);
    }

    #[test]
    fn test_white_only() {
        assert_eq!(rgbw(Rgb::new(80, 80, 80)), [0, 0, 0, 80]);
    }

    proptest! {
        #[test]
        fn prop_encode_touches_only_fixture_channels(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
            kind in prop_oneof![
                Just(FixtureType::Dimmer),
                Just(FixtureType::Rgb),
                Just(FixtureType::Rgbw)
            ],
            address_seed in 0usize..UNIVERSE_SIZE
        ) {
            let width = kind.channels_required();
            let address = address_seed.min(UNIVERSE_SIZE - width);

            let mut dmx_data = [0xAAu8; UNIVERSE_SIZE];
            encode(&mut dmx_data, &fixture(kind, address), Rgb::new(r, g, b));

            for (i, value) in dmx_data.iter().enumerate() {
                if i < address || i >= address + width {
                    prop_assert_eq!(*value, 0xAA);
                }
            }
        }

        #[test]
        fn prop_rgbw_reconstructs_color(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let [rr, gg, bb, w] = rgbw(Rgb::new(r, g, b));
            prop_assert_eq!(w, r.min(g).min(b));
            prop_assert_eq!(rr as u16 + w as u16, r as u16);
            prop_assert_eq!(gg as u16 + w as u16, g as u16);
            prop_assert_eq!(bb as u16 + w as u16, b as u16);
            // At least one color channel is fully carried by white
            prop_assert_eq!(rr.min(gg).min(bb), 0);
        }

        #[test]
        fn prop_luma_is_monotonic(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
            dr in any::<u8>(), dg in any::<u8>(), db in any::<u8>()
        ) {
            let base = Rgb::new(r, g, b);
            let brighter = Rgb::new(r.saturating_add(dr), g.saturating_add(dg), b.saturating_add(db));
            prop_assert!(luma(brighter) >= luma(base));
            prop_assert_eq!(luma(base), luma(base));
        }
    }
}
