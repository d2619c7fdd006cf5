//! Per-object spatial transform with an incrementally maintained matrix
//! cache.
//!
//! The composed matrix is `M = M_T · M_R · M_S` (translate leftmost, scale
//! rightmost). Each setter recomputes the one elementary matrix that changed
//! and combines it with the memoized product of the other two, so a stream
//! of single-axis updates costs O(1) matrix multiplies instead of
//! recomputing both pairwise products every call.

use glam::{EulerRot, Mat4, Vec3};

#[cfg(test)]
use std::cell::Cell;

/// Translation / rotation / uniform-scale state plus the memoized matrices
/// derived from it.
///
/// Rotation is Euler radians about X, Y, Z composed in intrinsic X·Y·Z
/// order. Scale is uniform; that it commutes with rotation is what makes
/// `(M_T·M_S)·M_R` and `(M_T·M_R)·M_S` both equal `M_T·M_R·M_S`.
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Vec3,
    scale: f32,

    translate_matrix: Mat4,
    rotate_matrix: Mat4,
    scale_matrix: Mat4,
    total: Mat4,

    // Pairwise products. A slot is `None` after a setter touched one of its
    // two factors; the next setter for the remaining group recomputes it.
    rotate_scale: Option<Mat4>,
    translate_scale: Option<Mat4>,
    translate_rotate: Option<Mat4>,

    #[cfg(test)]
    muls: Cell<u32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform: origin, no rotation, scale 1.
    ///
    /// The pairwise caches start populated (identity products), so the very
    /// first setter already takes the amortized path.
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            translate_matrix: Mat4::IDENTITY,
            rotate_matrix: Mat4::IDENTITY,
            scale_matrix: Mat4::IDENTITY,
            total: Mat4::IDENTITY,
            rotate_scale: Some(Mat4::IDENTITY),
            translate_scale: Some(Mat4::IDENTITY),
            translate_rotate: Some(Mat4::IDENTITY),
            #[cfg(test)]
            muls: Cell::new(0),
        }
    }

    /// Rebuilds a transform from raw scalars.
    ///
    /// Used when duplicating an object: the scalars carry over, the
    /// memoization state does not.
    pub fn from_parts(translation: Vec3, rotation: Vec3, scale: f32) -> Self {
        let mut transform = Self::identity();
        transform.translation = translation;
        transform.rotation = rotation;
        transform.scale = scale;

        transform.translate_matrix = Mat4::from_translation(translation);
        transform.rotate_matrix = rotation_matrix(rotation);
        transform.scale_matrix = Mat4::from_scale(Vec3::splat(scale));

        let rotate_scale = transform.mul(transform.rotate_matrix, transform.scale_matrix);
        transform.total = transform.mul(transform.translate_matrix, rotate_scale);
        transform.rotate_scale = Some(rotate_scale);
        transform.translate_scale = None;
        transform.translate_rotate = None;
        transform
    }

    // ── setters ───────────────────────────────────────────────────────────

    pub fn set_translate_x(&mut self, value: f32) {
        self.translation.x = value;
        self.refresh_translation();
    }

    pub fn set_translate_y(&mut self, value: f32) {
        self.translation.y = value;
        self.refresh_translation();
    }

    pub fn set_translate_z(&mut self, value: f32) {
        self.translation.z = value;
        self.refresh_translation();
    }

    pub fn set_rotate_x(&mut self, radians: f32) {
        self.rotation.x = radians;
        self.refresh_rotation();
    }

    pub fn set_rotate_y(&mut self, radians: f32) {
        self.rotation.y = radians;
        self.refresh_rotation();
    }

    pub fn set_rotate_z(&mut self, radians: f32) {
        self.rotation.z = radians;
        self.refresh_rotation();
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.refresh_scale();
    }

    // ── getters ───────────────────────────────────────────────────────────
    //
    // Raw scalars only; no derived values, no failure modes.

    pub fn translate_x(&self) -> f32 {
        self.translation.x
    }

    pub fn translate_y(&self) -> f32 {
        self.translation.y
    }

    pub fn translate_z(&self) -> f32 {
        self.translation.z
    }

    pub fn rotate_x(&self) -> f32 {
        self.rotation.x
    }

    pub fn rotate_y(&self) -> f32 {
        self.rotation.y
    }

    pub fn rotate_z(&self) -> f32 {
        self.rotation.z
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub(crate) fn translation(&self) -> Vec3 {
        self.translation
    }

    pub(crate) fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// The composed `M_T · M_R · M_S` for the current scalars.
    ///
    /// Setters keep this up to date eagerly; reading it never recomputes.
    #[inline]
    pub fn total_matrix(&self) -> Mat4 {
        self.total
    }

    // ── cache maintenance ─────────────────────────────────────────────────
    //
    // Each refresh follows the same shape:
    // 1. rebuild the elementary matrix for the changed group
    // 2. fill the memo for the product of the two untouched groups if absent
    // 3. combine, placing the changed group per the fixed composition order
    // 4. clear the two memos that contain the changed group

    fn refresh_translation(&mut self) {
        self.translate_matrix = Mat4::from_translation(self.translation);
        let rotate_scale = match self.rotate_scale {
            Some(m) => m,
            None => {
                let m = self.mul(self.rotate_matrix, self.scale_matrix);
                self.rotate_scale = Some(m);
                m
            }
        };
        self.total = self.mul(self.translate_matrix, rotate_scale);
        self.translate_scale = None;
        self.translate_rotate = None;
    }

    fn refresh_rotation(&mut self) {
        self.rotate_matrix = rotation_matrix(self.rotation);
        let translate_scale = match self.translate_scale {
            Some(m) => m,
            None => {
                let m = self.mul(self.translate_matrix, self.scale_matrix);
                self.translate_scale = Some(m);
                m
            }
        };
        self.total = self.mul(translate_scale, self.rotate_matrix);
        self.rotate_scale = None;
        self.translate_rotate = None;
    }

    fn refresh_scale(&mut self) {
        self.scale_matrix = Mat4::from_scale(Vec3::splat(self.scale));
        let translate_rotate = match self.translate_rotate {
            Some(m) => m,
            None => {
                let m = self.mul(self.translate_matrix, self.rotate_matrix);
                self.translate_rotate = Some(m);
                m
            }
        };
        self.total = self.mul(translate_rotate, self.scale_matrix);
        self.rotate_scale = None;
        self.translate_scale = None;
    }

    #[inline]
    fn mul(&self, a: Mat4, b: Mat4) -> Mat4 {
        #[cfg(test)]
        self.muls.set(self.muls.get() + 1);
        a * b
    }

    #[cfg(test)]
    fn memo_state(&self) -> (Option<Mat4>, Option<Mat4>, Option<Mat4>) {
        (self.rotate_scale, self.translate_scale, self.translate_rotate)
    }

    #[cfg(test)]
    fn mul_count(&self) -> u32 {
        self.muls.get()
    }
}

fn rotation_matrix(rotation: Vec3) -> Mat4 {
    Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    /// Non-cached reference: the composed matrix straight from scalars.
    fn reference(translation: Vec3, rotation: Vec3, scale: f32) -> Mat4 {
        Mat4::from_translation(translation)
            * rotation_matrix(rotation)
            * Mat4::from_scale(Vec3::splat(scale))
    }

    fn assert_close(actual: Mat4, expected: Mat4, epsilon: f32) {
        let a = actual.to_cols_array();
        let e = expected.to_cols_array();
        for (i, (&av, &ev)) in a.iter().zip(e.iter()).enumerate() {
            assert!(
                (av - ev).abs() <= epsilon,
                "matrix element {i}: {av} vs {ev} (epsilon {epsilon})"
            );
        }
    }

    /// Tiny xorshift so interleavings are randomized but reproducible.
    struct Rng(u32);

    impl Rng {
        fn next(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }

        fn value(&mut self) -> f32 {
            (self.next() % 2000) as f32 / 100.0 - 10.0
        }
    }

    #[test]
    fn fresh_transform_is_identity() {
        let transform = Transform::identity();
        assert_eq!(transform.total_matrix(), Mat4::IDENTITY);
        assert_eq!(transform.scale(), 1.0);
        assert_eq!(transform.translate_x(), 0.0);
        assert_eq!(transform.rotate_z(), 0.0);
    }

    #[test]
    fn getters_return_raw_scalars() {
        let mut transform = Transform::identity();
        transform.set_translate_y(4.5);
        transform.set_rotate_x(0.25);
        transform.set_scale(3.0);

        assert_eq!(transform.translate_y(), 4.5);
        assert_eq!(transform.rotate_x(), 0.25);
        assert_eq!(transform.scale(), 3.0);
        assert_eq!(transform.translate_x(), 0.0);
    }

    #[test]
    fn translation_only_composition_is_exact() {
        let mut transform = Transform::identity();
        transform.set_translate_x(2.0);
        transform.set_translate_z(-7.5);
        transform.set_scale(2.0);

        // No trigonometry involved, so the match is exact.
        assert_eq!(
            transform.total_matrix(),
            reference(Vec3::new(2.0, 0.0, -7.5), Vec3::ZERO, 2.0)
        );
    }

    #[test]
    fn translate_rotate_translate_matches_direct_computation() {
        let mut transform = Transform::identity();
        transform.set_translate_x(2.0);
        transform.set_rotate_y(FRAC_PI_2);
        transform.set_translate_x(3.0);

        let expected = reference(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, FRAC_PI_2, 0.0), 1.0);
        assert_close(transform.total_matrix(), expected, 1e-5);
    }

    #[test]
    fn randomized_setter_interleavings_match_reference() {
        let mut rng = Rng(0x5eed_1234);

        for _ in 0..50 {
            let mut transform = Transform::identity();
            for _ in 0..40 {
                let value = rng.value();
                match rng.next() % 9 {
                    0 => transform.set_translate_x(value),
                    1 => transform.set_translate_y(value),
                    2 => transform.set_translate_z(value),
                    3 => transform.set_rotate_x(value),
                    4 => transform.set_rotate_y(value),
                    5 => transform.set_rotate_z(value),
                    _ => transform.set_scale(value),
                }
            }

            let expected = reference(
                transform.translation(),
                transform.rotation(),
                transform.scale(),
            );
            assert_close(transform.total_matrix(), expected, 1e-4);
        }
    }

    #[test]
    fn translation_change_keeps_rotate_scale_memo_intact() {
        let mut transform = Transform::identity();
        transform.set_rotate_y(0.7);
        transform.set_scale(2.0);

        // The first translation change rebuilds the rotate·scale memo...
        transform.set_translate_x(5.0);
        let (rotate_scale, _, _) = transform.memo_state();
        let before = rotate_scale.expect("rotate·scale must be cached after a translation change");

        // ...and the second must reuse it untouched.
        transform.set_translate_y(-1.0);

        let (rotate_scale, translate_scale, translate_rotate) = transform.memo_state();
        // Byte-identical: the memo was reused, not recomputed.
        assert_eq!(rotate_scale.unwrap().to_cols_array(), before.to_cols_array());
        // Both translation-dependent memos are stale and cleared.
        assert!(translate_scale.is_none());
        assert!(translate_rotate.is_none());
    }

    #[test]
    fn rotation_change_keeps_translate_scale_memo() {
        let mut transform = Transform::identity();
        transform.set_translate_x(1.0);
        transform.set_rotate_z(0.3);

        let (_, translate_scale, _) = transform.memo_state();
        let before = translate_scale.expect("translate·scale must be cached after a rotation change");

        transform.set_rotate_x(1.1);

        let (rotate_scale, translate_scale, translate_rotate) = transform.memo_state();
        assert_eq!(translate_scale.unwrap().to_cols_array(), before.to_cols_array());
        assert!(rotate_scale.is_none());
        assert!(translate_rotate.is_none());
    }

    #[test]
    fn repeated_single_axis_updates_take_one_multiply_each() {
        let mut transform = Transform::identity();

        // First translation: memo is pre-populated, so only total = T · (R·S).
        transform.set_translate_x(1.0);
        assert_eq!(transform.mul_count(), 1);

        // Continuous motion along one axis stays at one multiply per update.
        transform.set_translate_x(2.0);
        transform.set_translate_x(3.0);
        transform.set_translate_x(4.0);
        assert_eq!(transform.mul_count(), 4);

        // Switching groups pays one extra multiply to rebuild the pair memo,
        // then amortizes again.
        transform.set_rotate_y(0.5);
        assert_eq!(transform.mul_count(), 6); // T·S rebuild + total
        transform.set_rotate_y(0.6);
        assert_eq!(transform.mul_count(), 7); // memo reused
        transform.set_scale(2.0);
        assert_eq!(transform.mul_count(), 9); // T·R rebuild + total
        transform.set_scale(3.0);
        assert_eq!(transform.mul_count(), 10);
    }

    #[test]
    fn from_parts_rebuilds_total_without_copying_memos() {
        let mut source = Transform::identity();
        source.set_translate_x(2.0);
        source.set_rotate_y(0.9);
        source.set_scale(0.5);

        let copy = Transform::from_parts(
            source.translation(),
            source.rotation(),
            source.scale(),
        );

        assert_close(copy.total_matrix(), source.total_matrix(), 1e-6);
        assert_eq!(copy.translate_x(), 2.0);
        assert_eq!(copy.rotate_y(), 0.9);
        assert_eq!(copy.scale(), 0.5);
    }

    #[test]
    fn mutating_a_clone_leaves_the_original_alone() {
        let mut original = Transform::identity();
        original.set_translate_x(1.0);

        let mut copy =
            Transform::from_parts(original.translation(), original.rotation(), original.scale());
        copy.set_translate_x(9.0);
        copy.set_rotate_z(1.0);

        assert_eq!(original.translate_x(), 1.0);
        assert_eq!(original.rotate_z(), 0.0);
        assert_close(
            original.total_matrix(),
            reference(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 1.0),
            0.0,
        );
    }
}
