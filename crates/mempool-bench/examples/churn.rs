//! Drive the memory test harness through a churn workload and print the
//! pool report after each phase.
//!
//! Set `RUST_LOG=mempool_arena=debug` to watch blocks being created and
//! leftovers being salvaged.

use mempool_arena::PoolConfig;
use mempool_bench::{churn_profile, run_profile};
use mempool_test_utils::MemTest;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut test = MemTest::new(PoolConfig::new(4096))?;

    println!("=== Phase 1: 64 objects, 8 arrays of 10 ===");
    test.new_objs(64)?;
    test.new_arrs(8, 10)?;
    print!("{}", test.report());

    println!("\n=== Phase 2: delete 20 random objects and 3 arrays ===");
    test.delete_random_objs(20)?;
    test.delete_random_arrs(3)?;
    print!("{}", test.report());

    println!("\n=== Phase 3: 5,000-step churn ===");
    run_profile(&mut test, &churn_profile(7, 5_000))?;
    print!("{}", test.report());
    tracing::info!(
        live_objs = test.live_objs(),
        live_arrs = test.live_arrs(),
        intact = test.all_intact(),
        "churn finished"
    );

    println!("\n=== Phase 4: reset to 8 KiB blocks ===");
    test.reset(Some(8192))?;
    print!("{}", test.report());

    Ok(())
}
