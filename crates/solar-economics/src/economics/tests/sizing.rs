use super::common::*;
use crate::economics::domain::{SunExposure, UsageSignal};
use crate::economics::sizing::{size_system, SizingCalculator};

#[test]
fn sizes_to_cover_offset_fraction_of_usage() {
    let tables = tables();
    let outcome = SizingCalculator::new(&tables).size(&input("CA", Some(UsageSignal::Kwh(1_000.0))));

    assert_eq!(outcome.annual_consumption_kwh, 12_000.0);
    assert_close(outcome.target_annual_production, 9_600.0, 1e-9);
    assert_eq!(outcome.system_size_kw(), 7.38);
    assert!(!outcome.sized.roof_limited);
}

#[test]
fn converts_bill_at_default_rate() {
    let tables = tables();
    let calculator = SizingCalculator::new(&tables);
    let monthly = calculator.monthly_kwh(Some(UsageSignal::Bill(150.0)), 0.15);
    assert_close(monthly, 1_000.0, 1e-6);

    let from_bill = size_system(&tables, &input("CA", Some(UsageSignal::Bill(150.0))));
    let from_kwh = size_system(&tables, &input("CA", Some(UsageSignal::Kwh(1_000.0))));
    assert_eq!(from_bill, from_kwh);
}

#[test]
fn bill_conversion_uses_supplied_utility_rate() {
    let tables = tables();
    let mut household = input("CA", Some(UsageSignal::Bill(150.0)));
    household.utility_rate = Some(0.30);
    let outcome = SizingCalculator::new(&tables).size(&household);
    assert_close(outcome.monthly_kwh, 500.0, 1e-6);
    assert_eq!(outcome.utility_rate, 0.30);
}

#[test]
fn falls_back_to_default_consumption() {
    let tables = tables();
    let outcome = SizingCalculator::new(&tables).size(&input("TX", None));
    assert_eq!(outcome.monthly_kwh, 500.0);
    assert_eq!(outcome.system_size_kw(), 3.69);
}

#[test]
fn weak_sun_inflates_system_size() {
    let tables = tables();
    let mut poor = input("CA", Some(UsageSignal::Kwh(1_000.0)));
    poor.sun_exposure = SunExposure::Poor;
    let mut excellent = poor.clone();
    excellent.sun_exposure = SunExposure::Excellent;

    let poor_size = size_system(&tables, &poor);
    let good_size = size_system(&tables, &input("CA", Some(UsageSignal::Kwh(1_000.0))));
    let excellent_size = size_system(&tables, &excellent);

    assert_eq!(poor_size, 10.55);
    assert!(poor_size > good_size && good_size > excellent_size);
}

#[test]
fn unknown_sun_exposure_uses_neutral_multiplier() {
    let tables = tables();
    let mut unknown = input("CA", Some(UsageSignal::Kwh(1_000.0)));
    unknown.sun_exposure = SunExposure::parse("partly cloudy");
    assert_eq!(unknown.sun_exposure, SunExposure::Unknown);
    assert_eq!(
        size_system(&tables, &unknown),
        size_system(&tables, &input("CA", Some(UsageSignal::Kwh(1_000.0))))
    );
}

#[test]
fn roof_area_caps_system_size() {
    let tables = tables();
    let mut small_roof = input("CA", Some(UsageSignal::Kwh(1_000.0)));
    small_roof.roof_square_feet = 400.0;

    let outcome = SizingCalculator::new(&tables).size(&small_roof);
    assert_eq!(outcome.sized.roof_cap_kw, Some(5.0));
    assert_eq!(outcome.system_size_kw(), 5.0);
    assert!(outcome.sized.roof_limited);
}

#[test]
fn empty_roof_area_is_unconstrained() {
    let tables = tables();
    for area in [0.0, -25.0, f64::NAN] {
        let mut household = input("CA", Some(UsageSignal::Kwh(1_000.0)));
        household.roof_square_feet = area;
        let outcome = SizingCalculator::new(&tables).size(&household);
        assert_eq!(outcome.sized.roof_cap_kw, None);
        assert_eq!(outcome.system_size_kw(), 7.38);
    }
}

#[test]
fn zero_consumption_resolves_to_minimum_size() {
    let tables = tables();
    for usage in [UsageSignal::Kwh(0.0), UsageSignal::Kwh(-40.0), UsageSignal::Bill(0.0)] {
        let size = size_system(&tables, &input("CA", Some(usage)));
        assert_eq!(size, tables.assumptions.minimum_system_kw);
        assert!(size.is_finite() && size > 0.0);
    }
}

#[test]
fn usage_signal_prefers_metered_kwh() {
    assert_eq!(
        UsageSignal::from_parts(Some(900.0), Some(120.0)),
        Some(UsageSignal::Kwh(900.0))
    );
    assert_eq!(
        UsageSignal::from_parts(None, Some(120.0)),
        Some(UsageSignal::Bill(120.0))
    );
    assert_eq!(UsageSignal::from_parts(None, None), None);
}
