//! Gauss quadrature rules for numerical integration.
//!
//! Provides standard Gauss-Legendre rules for:
//! - 1D line integration (element edges)
//! - Quadrilateral area integration (tensor product)

/// A Gauss quadrature point with natural coordinates and weight.
#[derive(Debug, Clone, Copy)]
pub struct GaussPoint {
    /// Natural coordinates (ξ, η) in [-1, 1]².
    pub coords: [f64; 2],
    /// Integration weight.
    pub weight: f64,
}

impl GaussPoint {
    /// Create a new Gauss point.
    pub fn new(coords: [f64; 2], weight: f64) -> Self {
        Self { coords, weight }
    }

    /// Get ξ (first natural coordinate).
    #[inline]
    pub fn xi(&self) -> f64 {
        self.coords[0]
    }

    /// Get η (second natural coordinate).
    #[inline]
    pub fn eta(&self) -> f64 {
        self.coords[1]
    }
}

/// 1D Gauss-Legendre quadrature points and weights.
///
/// Returns (point, weight) pairs for integration on [-1, 1].
///
/// # Arguments
///
/// * `n` - Number of integration points (1, 2, 3, or 4)
///
/// # Panics
///
/// Panics if `n` is not in 1..=4.
pub fn gauss_1d(n: usize) -> Vec<(f64, f64)> {
    match n {
        1 => vec![(0.0, 2.0)],
        2 => {
            let p = 1.0 / 3.0_f64.sqrt();
            vec![(-p, 1.0), (p, 1.0)]
        }
        3 => {
            let p = (3.0 / 5.0_f64).sqrt();
            vec![(-p, 5.0 / 9.0), (0.0, 8.0 / 9.0), (p, 5.0 / 9.0)]
        }
        4 => {
            // Points: ±√((3 ∓ 2√(6/5))/7)
            let sqrt_6_5 = (6.0 / 5.0_f64).sqrt();
            let p1 = ((3.0 - 2.0 * sqrt_6_5) / 7.0).sqrt();
            let p2 = ((3.0 + 2.0 * sqrt_6_5) / 7.0).sqrt();
            // Weights: (18 ± √30) / 36
            let sqrt_30 = 30.0_f64.sqrt();
            let w1 = (18.0 + sqrt_30) / 36.0;
            let w2 = (18.0 - sqrt_30) / 36.0;
            vec![(-p2, w2), (-p1, w1), (p1, w1), (p2, w2)]
        }
        _ => panic!("gauss_1d: n must be 1, 2, 3, or 4, got {}", n),
    }
}

/// Quadrilateral Gauss quadrature points.
///
/// Returns integration points for a reference quadrilateral with ξ, η ∈ [-1, 1].
///
/// Uses tensor product of 1D Gauss-Legendre rules.
///
/// # Arguments
///
/// * `n` - Number of points per direction (1, 2, or 3)
///
/// Returns n² total integration points.
///
/// # Integration Order
///
/// - n=1: Exact for polynomials up to degree 1
/// - n=2: Exact for polynomials up to degree 3 (standard for Quad4)
/// - n=3: Exact for polynomials up to degree 5
///
/// # Panics
///
/// Panics if `n` is not 1, 2, or 3.
pub fn gauss_quad(n: usize) -> Vec<GaussPoint> {
    if !(1..=3).contains(&n) {
        panic!("gauss_quad: n must be 1, 2, or 3, got {}", n);
    }

    let rule_1d = gauss_1d(n);
    let mut points = Vec::with_capacity(n * n);

    for &(xi, w_xi) in &rule_1d {
        for &(eta, w_eta) in &rule_1d {
            points.push(GaussPoint::new([xi, eta], w_xi * w_eta));
        }
    }

    points
}
