use super::*;
use crate::kernel::KernelKind;

fn ramp(width: usize, height: usize) -> Raster<f64> {
    Raster::from_fn(width, height, |x, y| 3.0 * x as f64 - 2.0 * y as f64 + 1.0)
}

#[test]
fn test_gradient_forward_difference() {
    let field = gradient(&ramp(5, 4));
    assert_eq!(field.at(0, 0), (3.0, -2.0));
    assert_eq!(field.at(3, 2), (3.0, -2.0));
    // Last column / row have no forward neighbor.
    assert_eq!(field.dx[(4, 1)], 0.0);
    assert_eq!(field.dy[(1, 3)], 0.0);
}

#[test]
fn test_from_source_uses_the_fill_stencil() {
    let source = Raster::from_fn(6, 6, |x, y| (x * x + 2 * y * x) as f64);
    for kind in [KernelKind::Cross, KernelKind::Full] {
        let Guidance::Laplacian(lap) = Guidance::from_source(&source, kind) else {
            panic!("expected a Laplacian");
        };
        assert_eq!(lap, LaplacianKernel::from_kind(kind).apply(&source));
    }
}

#[test]
fn test_laplacian_from_gradient_matches_cross_kernel_inside() {
    let source = Raster::from_fn(7, 6, |x, y| ((x * x) as f64) * 0.5 + (x * y) as f64 - y as f64);
    let derived = laplacian_from_gradient(&gradient(&source));
    let direct = LaplacianKernel::cross().apply(&source);
    for y in 1..5 {
        for x in 1..6 {
            assert!(
                (derived[(x, y)] - direct[(x, y)]).abs() < 1e-12,
                "({x}, {y}): {} vs {}",
                derived[(x, y)],
                direct[(x, y)]
            );
        }
    }
}

#[test]
fn test_laplacian_of_ramp_is_zero_inside() {
    let lap = laplacian_from_gradient(&gradient(&ramp(6, 6)));
    for y in 1..5 {
        for x in 1..5 {
            assert!(lap[(x, y)].abs() < 1e-12);
        }
    }
}

#[test]
fn test_gradient_field_new_checks_size() {
    let err = GradientField::new(Raster::new_default(3, 3), Raster::new_default(3, 2)).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));
}

#[test]
fn test_resolve_poisson() {
    let field = gradient(&ramp(4, 4));
    let guidance = Guidance::Gradient(field);
    let resolved = guidance.resolve(FillMethod::Poisson).unwrap();
    assert!(matches!(resolved, Resolved::Laplacian(Cow::Owned(_))));

    let lap = Guidance::Laplacian(Raster::new_filled(4, 4, 1.5));
    let resolved = lap.resolve(FillMethod::Poisson).unwrap();
    assert_eq!(resolved.laplacian(2, 2), 1.5);
}

#[test]
fn test_resolve_variational_rejects_laplacian() {
    let lap = Guidance::Laplacian(Raster::new_default(4, 4));
    let err = lap.resolve(FillMethod::Variational).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedGuidance {
            method: FillMethod::Variational
        }
    ));
}

#[test]
fn test_resolve_zero_for_every_method() {
    for method in [FillMethod::Poisson, FillMethod::Variational, FillMethod::Neumann] {
        let resolved = Guidance::Zero.resolve(method).unwrap();
        assert_eq!(resolved.laplacian(0, 0), 0.0);
        assert_eq!(resolved.gradient(0, 0), (0.0, 0.0));
    }
}

#[test]
fn test_for_method_picks_representation() {
    let source = ramp(5, 5);
    let poisson = Guidance::for_method(&source, &FillConfig::poisson());
    assert!(matches!(poisson, Guidance::Laplacian(_)));
    let variational = Guidance::for_method(&source, &FillConfig::variational());
    assert!(matches!(variational, Guidance::Gradient(_)));

    let full = FillConfig::poisson().with_kernel(KernelKind::Full);
    let Guidance::Laplacian(lap) = Guidance::for_method(&source, &full) else {
        panic!("expected a Laplacian");
    };
    // Full stencil of a linear ramp is zero away from the border too.
    assert!(lap[(2, 2)].abs() < 1e-12);
}

#[test]
fn test_dimensions_check() {
    assert!(Guidance::Zero.ensure_dimensions((3, 3)).is_ok());
    let guidance = Guidance::Laplacian(Raster::new_default(3, 4));
    assert!(guidance.ensure_dimensions((3, 3)).is_err());
}
