//! Procedural placement of decorative entities.
//!
//! Two scatter policies share one input description, [`PlacementSpec`]:
//!
//! - **Annulus**: `angle ~ U(0, 2π)`, `radius ~ U(inner, outer)`,
//!   position `(sin(angle) * radius, height, cos(angle) * radius)`. Used for
//!   the ring of graves around the house.
//! - **Box**: position `(U(-w/2, w/2), height, U(-d/2, d/2))`. Used for rocks
//!   on the lawn and donuts floating around the title text.
//!
//! Neither policy avoids overlaps. Generators draw from the `Rng` they are
//! given; with a seeded spec ([`PlacementSpec::rng`]) the output is
//! reproducible.
//!
//! The third policy, [`FrameAssembly`], is deterministic: it places the four
//! bars of a window frame rigidly around an anchor.
//!
//! ```
//! use diorama::*;
//!
//! let graves = PlacementSpec::annulus(50, 3.0, 9.0).unwrap().seed(7);
//! let transforms = generate(&graves, &mut graves.rng());
//! assert_eq!(transforms.len(), 50);
//! ```

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::transform::Transform;

/// Closed interval `[min, max]` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    /// Fails when the bounds are inverted, not finite, or too far apart to sample.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        let span = Self { min, max };
        span.validate("span")?;
        Ok(span)
    }

    /// A zero-width span that always yields `value`.
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// `[-half, half]`.
    pub const fn symmetric(half: f32) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Draws a value. A zero-width span returns its bound without touching `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    fn validate(&self, what: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(Error::InvalidPlacement(format!(
                "{what} [{}, {}] is not finite",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(Error::InvalidPlacement(format!(
                "{what} [{}, {}] is inverted",
                self.min, self.max
            )));
        }
        // The uniform sampler scales the width by 1 / (1 - ε); that must stay finite.
        if !((self.max - self.min) / (1.0 - f32::EPSILON)).is_finite() {
            return Err(Error::InvalidPlacement(format!(
                "{what} [{}, {}] is too wide to sample",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Where on the ground plane entities may land.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    /// Ring around the origin between two radii.
    Annulus { inner: f32, outer: f32 },
    /// Axis-aligned rectangle centred on the origin.
    Box { width: f32, depth: f32 },
}

/// Input of one scatter pass. Immutable once generation starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub count: usize,
    pub region: Region,
    /// Y coordinate of each entity.
    pub height: Span,
    /// Euler angle range per axis (x, y, z).
    pub rotation: [Span; 3],
    /// Uniform scale factor.
    pub scale: Span,
    /// Fixed seed for reproducible layouts. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PlacementSpec {
    /// Ring scatter with the grave defaults: height jitter ±0.5, yaw and roll
    /// jitter ±0.2 rad, unit scale.
    pub fn annulus(count: usize, inner: f32, outer: f32) -> Result<Self> {
        let spec = Self {
            count,
            region: Region::Annulus { inner, outer },
            height: Span::symmetric(0.5),
            rotation: [Span::fixed(0.0), Span::symmetric(0.2), Span::symmetric(0.2)],
            scale: Span::fixed(1.0),
            seed: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Rectangle scatter with the rock defaults: resting at y = 0.1, no
    /// rotation, size drawn from `[0, 0.2]`.
    pub fn scatter_box(count: usize, width: f32, depth: f32) -> Result<Self> {
        let spec = Self {
            count,
            region: Region::Box { width, depth },
            height: Span::fixed(0.1),
            rotation: [Span::fixed(0.0); 3],
            scale: Span { min: 0.0, max: 0.2 },
            seed: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn height(mut self, height: Span) -> Result<Self> {
        height.validate("height")?;
        self.height = height;
        Ok(self)
    }

    pub fn rotation(mut self, x: Span, y: Span, z: Span) -> Result<Self> {
        for (span, axis) in [(x, "rotation.x"), (y, "rotation.y"), (z, "rotation.z")] {
            span.validate(axis)?;
        }
        self.rotation = [x, y, z];
        Ok(self)
    }

    pub fn scale(mut self, scale: Span) -> Result<Self> {
        scale.validate("scale")?;
        self.scale = scale;
        Ok(self)
    }

    /// Checks every range. Specs built through the constructors and setters are
    /// always valid; this is for specs assembled by hand or deserialized.
    pub fn validate(&self) -> Result<()> {
        match self.region {
            Region::Annulus { inner, outer } => {
                Span { min: inner, max: outer }.validate("radius")?;
                if inner < 0.0 {
                    return Err(Error::InvalidPlacement(format!(
                        "inner radius {inner} is negative"
                    )));
                }
            }
            Region::Box { width, depth } => {
                let extent = |v: f32| v.is_finite() && v >= 0.0;
                if !(extent(width) && extent(depth)) {
                    return Err(Error::InvalidPlacement(format!(
                        "box {width}x{depth} must be finite and non-negative"
                    )));
                }
                Span::symmetric(width / 2.0).validate("box width")?;
                Span::symmetric(depth / 2.0).validate("box depth")?;
            }
        }
        self.height.validate("height")?;
        for (span, axis) in self.rotation.iter().zip(["rotation.x", "rotation.y", "rotation.z"]) {
            span.validate(axis)?;
        }
        self.scale.validate("scale")
    }

    /// The random source for this spec: seeded when `seed` is set, otherwise
    /// from OS entropy. Call this at the outermost level, then pass the
    /// generator down.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Produces exactly `spec.count` transforms inside `spec.region`.
pub fn generate<R: Rng + ?Sized>(spec: &PlacementSpec, rng: &mut R) -> Vec<Transform> {
    match spec.region {
        Region::Annulus { inner, outer } => annular_scatter(spec, Span { min: inner, max: outer }, rng),
        Region::Box { width, depth } => box_scatter(spec, width, depth, rng),
    }
}

/// Ring placement. Draw order per entity: angle, radius, height, rotation, scale.
pub fn annular_scatter<R: Rng + ?Sized>(
    spec: &PlacementSpec,
    radius: Span,
    rng: &mut R,
) -> Vec<Transform> {
    (0..spec.count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let r = radius.sample(rng);
            let y = spec.height.sample(rng);
            let position = Vec3::new(angle.sin() * r, y, angle.cos() * r);
            Transform::from_position(position)
                .rotation(sample_rotation(&spec.rotation, rng))
                .uniform_scale(spec.scale.sample(rng))
        })
        .collect()
}

/// Rectangle placement. Draw order per entity: scale, x, height, z, rotation.
pub fn box_scatter<R: Rng + ?Sized>(
    spec: &PlacementSpec,
    width: f32,
    depth: f32,
    rng: &mut R,
) -> Vec<Transform> {
    let x_span = Span::symmetric(width / 2.0);
    let z_span = Span::symmetric(depth / 2.0);
    (0..spec.count)
        .map(|_| {
            let size = spec.scale.sample(rng);
            let x = x_span.sample(rng);
            let y = spec.height.sample(rng);
            let z = z_span.sample(rng);
            Transform::from_position(Vec3::new(x, y, z))
                .rotation(sample_rotation(&spec.rotation, rng))
                .uniform_scale(size)
        })
        .collect()
}

fn sample_rotation<R: Rng + ?Sized>(spans: &[Span; 3], rng: &mut R) -> Vec3 {
    let x = spans[0].sample(rng);
    let y = spans[1].sample(rng);
    let z = spans[2].sample(rng);
    Vec3::new(x, y, z)
}

/// Which bar of a window frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePartKind {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePart {
    pub kind: FramePartKind,
    /// Placement in the anchor's parent space.
    pub transform: Transform,
}

/// Four bars around a rectangular opening, placed rigidly around an anchor.
///
/// Offsets are taken along the anchor's local axes: top and bottom at
/// `±half_height` on local Y, left and right at `∓half_width` on local X.
/// Each bar inherits the anchor's rotation, so rotating the anchor turns the
/// whole frame as one piece.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameAssembly {
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for FrameAssembly {
    fn default() -> Self {
        Self {
            half_width: 0.45,
            half_height: 0.5,
        }
    }
}

impl FrameAssembly {
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width,
            half_height,
        }
    }

    /// Local offsets in top, bottom, left, right order.
    pub fn offsets(&self) -> [(FramePartKind, Vec3); 4] {
        [
            (FramePartKind::Top, Vec3::new(0.0, self.half_height, 0.0)),
            (FramePartKind::Bottom, Vec3::new(0.0, -self.half_height, 0.0)),
            (FramePartKind::Left, Vec3::new(-self.half_width, 0.0, 0.0)),
            (FramePartKind::Right, Vec3::new(self.half_width, 0.0, 0.0)),
        ]
    }

    /// World placement of the four bars for a frame anchored at `anchor`.
    pub fn parts(&self, anchor: &Transform) -> [FramePart; 4] {
        self.offsets().map(|(kind, offset)| FramePart {
            kind,
            transform: anchor.compose(&Transform::from_position(offset)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn annulus_stays_inside_the_ring() {
        let spec = PlacementSpec::annulus(50, 3.0, 9.0).unwrap();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let transforms = generate(&spec, &mut rng);
            assert_eq!(transforms.len(), 50);
            for t in transforms {
                let r = Vec3::new(t.position.x, 0.0, t.position.z).length();
                assert!((3.0 - 1e-4..=9.0 + 1e-4).contains(&r), "radius {r}");
                assert!((-0.5..=0.5).contains(&t.position.y));
                assert!(t.rotation.y.abs() <= 0.2 && t.rotation.z.abs() <= 0.2);
                assert_eq!(t.rotation.x, 0.0);
                assert_eq!(t.scale, Vec3::ONE);
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let spec = PlacementSpec::annulus(50, 3.0, 9.0).unwrap().seed(42);
        let a = generate(&spec, &mut spec.rng());
        let b = generate(&spec, &mut spec.rng());
        assert_eq!(a, b);

        let other = generate(&spec, &mut StdRng::seed_from_u64(43));
        assert_ne!(a, other);
    }

    #[test]
    fn box_scatter_respects_bounds() {
        let spec = PlacementSpec::scatter_box(10, 10.0, 10.0).unwrap().seed(3);
        let rocks = generate(&spec, &mut spec.rng());
        assert_eq!(rocks.len(), 10);
        for rock in rocks {
            assert!(rock.position.x.abs() <= 5.0 && rock.position.z.abs() <= 5.0);
            assert_eq!(rock.position.y, 0.1);
            assert!((0.0..=0.2).contains(&rock.scale.x));
            assert_eq!(rock.scale, Vec3::splat(rock.scale.x));
        }
    }

    #[test]
    fn box_scatter_with_vertical_spread_and_tumble() {
        let spec = PlacementSpec::scatter_box(100, 10.0, 10.0)
            .unwrap()
            .height(Span::symmetric(5.0))
            .unwrap()
            .rotation(
                Span::new(0.0, std::f32::consts::PI).unwrap(),
                Span::new(0.0, std::f32::consts::PI).unwrap(),
                Span::fixed(0.0),
            )
            .unwrap()
            .scale(Span::new(0.0, 1.0).unwrap())
            .unwrap()
            .seed(9);
        let donuts = generate(&spec, &mut spec.rng());
        assert_eq!(donuts.len(), 100);
        assert!(donuts.iter().any(|d| d.position.y > 1.0));
        assert!(donuts.iter().any(|d| d.position.y < -1.0));
        assert!(donuts.iter().all(|d| (0.0..=std::f32::consts::PI).contains(&d.rotation.x)));
    }

    #[test]
    fn zero_count_yields_nothing() {
        let spec = PlacementSpec::annulus(0, 3.0, 9.0).unwrap();
        assert!(generate(&spec, &mut spec.rng()).is_empty());
    }

    #[test]
    fn degenerate_ring_is_a_circle() {
        let spec = PlacementSpec::annulus(5, 4.0, 4.0).unwrap().seed(1);
        for t in generate(&spec, &mut spec.rng()) {
            let r = Vec3::new(t.position.x, 0.0, t.position.z).length();
            assert_abs_diff_eq!(r, 4.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn inverted_ranges_are_rejected_up_front() {
        let err = PlacementSpec::annulus(50, 9.0, 3.0).unwrap_err();
        assert!(matches!(err, Error::InvalidPlacement(_)));
        assert!(PlacementSpec::annulus(5, -1.0, 3.0).is_err());
        assert!(PlacementSpec::scatter_box(5, -1.0, 3.0).is_err());
        assert!(Span::new(1.0, 0.0).is_err());
        assert!(Span::new(f32::NAN, 1.0).is_err());

        let spec = PlacementSpec::annulus(5, 3.0, 9.0).unwrap();
        assert!(spec.clone().scale(Span { min: 2.0, max: 1.0 }).is_err());
        let mut hand_built = spec;
        hand_built.height = Span { min: 1.0, max: -1.0 };
        assert!(hand_built.validate().is_err());
    }

    #[test]
    fn overflowing_widths_are_rejected_up_front() {
        let err = Span::new(-f32::MAX, f32::MAX).unwrap_err();
        assert!(err.is_invalid_argument());

        let spec = PlacementSpec::annulus(3, 3.0, 9.0).unwrap();
        let wide = Span {
            min: -f32::MAX,
            max: f32::MAX,
        };
        assert!(spec.clone().height(wide).is_err());
        assert!(PlacementSpec::annulus(3, 0.0, f32::MAX).is_err());
        assert!(PlacementSpec::scatter_box(3, f32::MAX, 1.0).is_err());

        let mut hand_built = spec;
        hand_built.rotation[1] = wide;
        assert!(hand_built.validate().is_err());

        // Wide but representable ranges still sample.
        let roomy = PlacementSpec::annulus(3, 3.0, 9.0)
            .unwrap()
            .height(Span::new(-1.0e30, 1.0e30).unwrap())
            .unwrap()
            .seed(4);
        let transforms = generate(&roomy, &mut roomy.rng());
        assert_eq!(transforms.len(), 3);
        assert!(transforms.iter().all(|t| roomy.height.contains(t.position.y)));
    }

    #[test]
    fn spec_round_trips_through_toml() {
        let spec = PlacementSpec::annulus(50, 3.0, 9.0).unwrap().seed(5);
        let text = toml::to_string(&spec).unwrap();
        let back: PlacementSpec = toml::from_str(&text).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn frame_parts_at_origin() {
        let parts = FrameAssembly::default().parts(&Transform::new());
        let positions: Vec<Vec3> = parts.iter().map(|p| p.transform.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec3::new(0.0, 0.5, 0.0),
                Vec3::new(0.0, -0.5, 0.0),
                Vec3::new(-0.45, 0.0, 0.0),
                Vec3::new(0.45, 0.0, 0.0),
            ]
        );
        assert!(parts.iter().all(|p| p.transform.rotation == Vec3::ZERO));
    }

    #[test]
    fn rotated_frame_moves_as_one_unit() {
        let anchor = Transform::from_position(Vec3::new(2.04, 1.0, 1.0)).yaw(FRAC_PI_2);
        let parts = FrameAssembly::default().parts(&anchor);

        for part in &parts {
            assert_eq!(part.transform.rotation, anchor.rotation);
        }
        let left = parts[2].transform.position;
        let right = parts[3].transform.position;
        // Local X maps to world -Z after a quarter yaw.
        assert_abs_diff_eq!(left.z, 1.45, epsilon = 1e-6);
        assert_abs_diff_eq!(right.z, 0.55, epsilon = 1e-6);
        assert_abs_diff_eq!(left.x, 2.04, epsilon = 1e-6);
        assert_abs_diff_eq!((left - right).length(), 0.9, epsilon = 1e-6);

        let top = parts[0].transform.position;
        assert_abs_diff_eq!(top.y, 1.5, epsilon = 1e-6);
    }
}
