use crate::core::models::coordinates::position_in;
use nalgebra::Point3;

/// Computes the torsion angle of four points, in degrees within `[0, 360)`.
///
/// The angle is the rotation about the `b -> c` axis that carries the `(a, b, c)` plane onto
/// the `(b, c, d)` plane, using the IUPAC sign convention before wrapping: a right-handed
/// rotation is positive, so negative angles map onto `(180, 360)`. Degenerate (collinear)
/// input yields `0`.
pub fn torsion_degrees(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let b1 = b - a;
    let b2 = c - b;
    let b3 = d - c;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);

    wrap_degrees(y.atan2(x).to_degrees())
}

/// Measures the torsion over four atoms of a flat coordinate vector.
///
/// Returns `None` if any index lies outside the vector.
pub fn torsion_from_coords(coords: &[f64], atoms: [usize; 4]) -> Option<f64> {
    let a = position_in(coords, atoms[0])?;
    let b = position_in(coords, atoms[1])?;
    let c = position_in(coords, atoms[2])?;
    let d = position_in(coords, atoms[3])?;
    Some(torsion_degrees(&a, &b, &c, &d))
}

fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn dihedral_points(angle_degrees: f64) -> [Point3<f64>; 4] {
        let phi = angle_degrees.to_radians();
        [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(phi.cos(), phi.sin(), 1.0),
        ]
    }

    #[test]
    fn torsion_reproduces_constructed_angles() {
        for angle in [0.0, 30.0, 90.0, 179.0, 180.0, 181.0, 200.0, 270.0, 359.0] {
            let [a, b, c, d] = dihedral_points(angle);
            let measured = torsion_degrees(&a, &b, &c, &d);
            assert!(
                f64_approx_equal(measured, angle),
                "expected {angle}, measured {measured}"
            );
        }
    }

    #[test]
    fn torsion_is_wrapped_into_positive_range() {
        let [a, b, c, d] = dihedral_points(-45.0);
        let measured = torsion_degrees(&a, &b, &c, &d);
        assert!(f64_approx_equal(measured, 315.0));
    }

    #[test]
    fn reversing_the_chain_preserves_the_angle() {
        let [a, b, c, d] = dihedral_points(123.0);
        let forward = torsion_degrees(&a, &b, &c, &d);
        let backward = torsion_degrees(&d, &c, &b, &a);
        assert!(f64_approx_equal(forward, backward));
    }

    #[test]
    fn collinear_points_yield_zero() {
        let p = |z: f64| Point3::new(0.0, 0.0, z);
        assert_eq!(torsion_degrees(&p(0.0), &p(1.0), &p(2.0), &p(3.0)), 0.0);
    }

    #[test]
    fn torsion_from_coords_reads_flat_vector() {
        let points = dihedral_points(200.0);
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        let measured = torsion_from_coords(&coords, [0, 1, 2, 3]).unwrap();
        assert!(f64_approx_equal(measured, 200.0));
        assert_eq!(torsion_from_coords(&coords, [0, 1, 2, 4]), None);
    }

    #[test]
    fn wrap_degrees_never_returns_full_turn() {
        assert_eq!(wrap_degrees(-1e-20), 0.0);
        assert!(f64_approx_equal(wrap_degrees(-90.0), 270.0));
        assert!(f64_approx_equal(wrap_degrees(360.0), 0.0));
    }
}
