//! End-to-end dispatch scenarios through the public API: single worked
//! hours, merit-order priority, and full config-to-report runs.

use chrono::{NaiveDate, NaiveDateTime};
use rstest::rstest;

use power_balance_sim::config::Config;
use power_balance_sim::dispatch::{
    DispatchEngine, HydroReservoir, HydrogenFlex, HydrogenParams, ReservoirParams,
};
use power_balance_sim::domain::HourRecord;
use power_balance_sim::report::RunReport;
use power_balance_sim::scenario;
use power_balance_sim::series::SeriesStore;
use power_balance_sim::simulation::Simulation;

fn midnight() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hour_record(
    consumption_gw: f64,
    must_run_gw: f64,
    hydro_min_gw: f64,
    hydro_max_gw: f64,
    trade_limit_gw: f64,
) -> HourRecord {
    HourRecord {
        timestamp: midnight(),
        consumption_gw,
        must_run_gw,
        hydro_inflow_gw: 0.0,
        trade_limit_gw,
        hydro_min_gw,
        hydro_max_gw,
    }
}

fn ample_reservoir() -> HydroReservoir {
    HydroReservoir::new(ReservoirParams {
        capacity_gwh: 1000.0,
        initial_storage_gwh: 500.0,
    })
    .unwrap()
}

#[rstest]
#[case::hydro_covers_need(10.0, 6.0, 0.0, 10.0, 5.0, (4.0, 0.0, 0.0, 0.0))]
#[case::capped_hydro_imports_then_falls_short(10.0, 6.0, 0.0, 2.0, 1.0, (2.0, 1.0, 1.0, 0.0))]
#[case::surplus_pumped_then_exported(5.0, 9.0, -3.0, 10.0, 10.0, (-3.0, -1.0, 0.0, 0.0))]
#[case::flat_hour_leaves_everything_idle(8.0, 8.0, 0.0, 10.0, 5.0, (0.0, 0.0, 0.0, 0.0))]
fn test_worked_merit_order_hours(
    #[case] consumption_gw: f64,
    #[case] must_run_gw: f64,
    #[case] hydro_min_gw: f64,
    #[case] hydro_max_gw: f64,
    #[case] trade_limit_gw: f64,
    #[case] expected: (f64, f64, f64, f64),
) {
    let engine = DispatchEngine::new();
    let mut reservoir = ample_reservoir();
    let mut hydrogen = HydrogenFlex::idle();

    let record = hour_record(
        consumption_gw,
        must_run_gw,
        hydro_min_gw,
        hydro_max_gw,
        trade_limit_gw,
    );
    let result = engine
        .dispatch_hour(&record, &mut reservoir, &mut hydrogen)
        .unwrap();

    let (hydro, trade, shortage, excess) = expected;
    assert!((result.hydro_gw - hydro).abs() < 1e-9);
    assert!((result.trade_gw - trade).abs() < 1e-9);
    assert!((result.shortage_gw - shortage).abs() < 1e-9);
    assert!((result.excess_gw - excess).abs() < 1e-9);
    assert!(result.verify_balance());
    assert_eq!(result.hydrogen_flex_gw, 0.0);
}

#[rstest]
fn test_storage_limits_hydro_before_turbine_capacity() {
    let engine = DispatchEngine::new();
    // 2 GWh stored, no inflow: one hour can at most dispatch 2 GW even
    // though the turbines could do 10.
    let mut reservoir = HydroReservoir::new(ReservoirParams {
        capacity_gwh: 1000.0,
        initial_storage_gwh: 2.0,
    })
    .unwrap();
    let mut hydrogen = HydrogenFlex::idle();

    let record = hour_record(10.0, 6.0, 0.0, 10.0, 1.0);
    let result = engine
        .dispatch_hour(&record, &mut reservoir, &mut hydrogen)
        .unwrap();

    assert!((result.hydro_gw - 2.0).abs() < 1e-9);
    assert!((result.trade_gw - 1.0).abs() < 1e-9);
    assert!((result.shortage_gw - 1.0).abs() < 1e-9);
    assert_eq!(reservoir.stored_gwh(), 0.0);
}

#[rstest]
fn test_hydrogen_flex_is_drawn_before_trade() {
    let engine = DispatchEngine::new();
    let mut reservoir = ample_reservoir();
    let mut hydrogen = HydrogenFlex::new(HydrogenParams {
        baseline_gw: 5.0,
        max_release_gw: 5.0,
        max_absorb_gw: 5.0,
        window_hours: 24,
        min_production_gwh: 0.0,
        max_production_gwh: 240.0,
        initial_store_gwh: 0.0,
        store_drain_gwh: 0.0,
    })
    .unwrap();

    // Need 16 GW: hydro covers 13, hydrogen releases the remaining 3,
    // trade stays untouched.
    let record = hour_record(20.0, 4.0, 0.0, 13.0, 5.0);
    let result = engine
        .dispatch_hour(&record, &mut reservoir, &mut hydrogen)
        .unwrap();

    assert!((result.hydro_gw - 13.0).abs() < 1e-9);
    assert!((result.hydrogen_flex_gw - 3.0).abs() < 1e-9);
    assert_eq!(result.trade_gw, 0.0);
    assert!(result.is_balanced());
}

#[rstest]
fn test_multi_hour_surplus_charges_hydrogen_then_exports() {
    let start = midnight();
    let hours = 6;
    let series = SeriesStore::builder(start, hours)
        .with_consumption(vec![10.0; hours])
        .with_must_run(vec![18.0; hours])
        .with_hydro_inflow(vec![0.0; hours])
        .with_trade_limit(2.0)
        .with_hydro_bounds(0.0, 13.0)
        .build()
        .unwrap();

    let hydrogen = HydrogenFlex::new(HydrogenParams {
        baseline_gw: 5.0,
        max_release_gw: 5.0,
        max_absorb_gw: 5.0,
        window_hours: 24,
        min_production_gwh: 0.0,
        max_production_gwh: 240.0,
        initial_store_gwh: 0.0,
        store_drain_gwh: 0.0,
    })
    .unwrap();

    let mut sim = Simulation::new(series, ample_reservoir(), hydrogen);
    let out = sim.run().unwrap();
    out.verify().unwrap();

    // Surplus of 8 GW per hour: hydrogen absorbs 5, trade exports 2,
    // 1 GW is left as excess. Hydro cannot absorb (min bound 0).
    for result in &out.results {
        assert!((result.hydrogen_flex_gw + 5.0).abs() < 1e-9);
        assert!((result.trade_gw + 2.0).abs() < 1e-9);
        assert!((result.excess_gw - 1.0).abs() < 1e-9);
        assert_eq!(result.shortage_gw, 0.0);
    }

    // Extra production accumulates in the hydrogen store: baseline 5 plus
    // 5 absorbed, over 6 hours.
    assert!((out.final_hydrogen.store_gwh - 60.0).abs() < 1e-9);
    assert!((out.final_hydrogen.absorbed_total_gwh - 30.0).abs() < 1e-9);
}

#[rstest]
fn test_reference_config_runs_a_clean_year() {
    let mut config = Config::default();
    config.simulation.years = 1;
    config.simulation.random_seed = Some(5);

    let mut sim = scenario::build_simulation(&config).unwrap();
    let out = sim.run().unwrap();
    out.verify().unwrap();

    assert_eq!(out.len(), 8760);

    let report = RunReport::from_output(&out);
    assert_eq!(report.years.len(), 1);
    let year = &report.years[0];

    // Annual consumption sits near the configured mean (32.25 GW is
    // about 282 TWh/yr); the seasonal term cancels over a full year.
    assert!((year.consumption_twh - 282.5).abs() < 1.0);

    // Every hour accounted for: energy in equals energy out.
    let supplied = year.must_run_twh + year.hydro_twh
        + (year.hydrogen_released_twh - year.hydrogen_absorbed_twh)
        + (year.import_twh - year.export_twh)
        + year.shortage_twh
        - year.excess_twh;
    assert!((supplied - year.consumption_twh).abs() < 1e-6);

    // Reservoir stayed inside its physical band the whole year.
    assert!(report.reservoir_min_gwh >= 0.0);
    assert!(report.reservoir_max_gwh <= 33_600.0);
}

#[rstest]
fn test_same_seed_gives_identical_runs() {
    let run = || {
        let mut config = Config::default();
        config.simulation.years = 1;
        config.simulation.random_seed = Some(42);
        let mut sim = scenario::build_simulation(&config).unwrap();
        sim.run().unwrap()
    };

    let a = run();
    let b = run();
    assert_eq!(a.results, b.results);
    assert_eq!(a.reservoir_gwh, b.reservoir_gwh);
    assert_eq!(a.hydrogen_store_gwh, b.hydrogen_store_gwh);
}

#[rstest]
fn test_truncated_run_is_a_prefix_of_the_full_run() {
    let build = || {
        let mut config = Config::default();
        config.simulation.years = 1;
        config.simulation.random_seed = Some(7);
        scenario::build_simulation(&config).unwrap()
    };

    let mut full = build();
    let full_out = full.run().unwrap();

    let mut truncated = build();
    let prefix = truncated.run_hours(1000).unwrap();

    assert_eq!(prefix.len(), 1000);
    assert_eq!(&full_out.results[..1000], &prefix.results[..]);
}
