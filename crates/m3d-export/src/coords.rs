//! Source-to-target axis remapping
//!
//! The host is Z-up, the target format is Y-up: `(x, y, z) -> (x, z, -y)`.

use m3d_core::Vec3;

/// Map a host-space position or normal into target space
pub fn remap(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// Inverse of [`remap`]
pub fn unmap(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_remap_axes() {
        assert_eq!(remap(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 3.0, -2.0));
        // host up (+Z) becomes target up (+Y)
        assert_eq!(remap(Vec3::new(0.0, 0.0, 1.0)), Vec3::new(0.0, 1.0, -0.0));
    }

    #[test]
    fn test_remap_is_not_an_involution() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_ne!(remap(remap(v)), v);
    }

    proptest! {
        #[test]
        fn unmap_inverts_remap(x in -1e6f64..1e6, y in -1e6f64..1e6, z in -1e6f64..1e6) {
            let v = Vec3::new(x, y, z);
            prop_assert_eq!(unmap(remap(v)), v);
            prop_assert_eq!(remap(unmap(v)), v);
        }
    }
}
