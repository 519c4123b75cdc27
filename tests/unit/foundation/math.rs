use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn ease_out_cubic_endpoints_and_clamp() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert_eq!(ease_out_cubic(2.0), 1.0);
    assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
}

#[test]
fn luma_extremes() {
    assert_eq!(luma_u8(0, 0, 0), 0);
    assert_eq!(luma_u8(255, 255, 255), 255);
    assert!(luma_u8(255, 0, 0) < 80);
    assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
}
